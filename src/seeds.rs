//! Built-in challenge lists so the app is useful without any configuration.

use crate::domain::{ChallengeDescriptor, QuizDescriptor, Role};

fn quiz(question: &str, options: [&str; 4], correct: usize) -> Option<QuizDescriptor> {
  Some(QuizDescriptor {
    question: question.into(),
    options: options.iter().map(|o| o.to_string()).collect(),
    correct_option_index: correct,
  })
}

fn challenge(role: Role, slug: &str, label: &str, subtitle: &str, quiz: Option<QuizDescriptor>) -> ChallengeDescriptor {
  ChallengeDescriptor {
    id: format!("{}.{}", role.key(), slug),
    label: label.into(),
    subtitle: subtitle.into(),
    quiz,
  }
}

pub fn seed_challenges(role: Role) -> Vec<ChallengeDescriptor> {
  match role {
    Role::Student => student_challenges(),
    Role::Mentor => mentor_challenges(),
    Role::Parent => parent_challenges(),
  }
}

fn student_challenges() -> Vec<ChallengeDescriptor> {
  let r = Role::Student;
  vec![
    challenge(
      r,
      "insecurity-in-learning-environment",
      "Insecurity in Learning Environment",
      "(such as bullying, terrorism, harassment, unsafe school conditions)",
      quiz(
        "What is one effective way to make learning environments safe for students?",
        [
          "A) Ignoring bullying and hoping it stops",
          "B) Establishing anti-bullying policies and providing secure school conditions",
          "C) Offering online/virtual learning options where students can learn safely from home",
          "D) Creating awareness programs where students are trained on safety and respect",
        ],
        2,
      ),
    ),
    challenge(
      r,
      "lack-of-qualified-teachers",
      "Lack of Qualified Teachers",
      "(inexperienced teachers hired cheaply, or teachers without updated knowledge especially in STEM)",
      quiz(
        "Why is it important for teachers to have updated knowledge, especially in STEM areas?",
        [
          "A) So they can pass exams easily",
          "B) To inspire students with relevant and modern skills",
          "C) To avoid giving homework",
          "D) To reduce the cost of teaching",
        ],
        1,
      ),
    ),
    challenge(
      r,
      "boring-teaching-methods",
      "Boring Teaching Methods",
      "(clinging to traditional methods, memorization, lack of creativity)",
      quiz(
        "Which of these makes learning more engaging than traditional rote memorization?",
        [
          "A) Group projects and discussions",
          "B) Only repeating notes",
          "C) Punishment and strict silence",
          "D) Copying textbooks word-for-word",
        ],
        0,
      ),
    ),
    challenge(
      r,
      "lack-of-mentorship",
      "Lack of Mentorship",
      "(no guidance, lack of follow-up, no constructive feedback)",
      quiz(
        "What is one key role of a mentor in learning?",
        [
          "A) To give constructive feedback and guidance",
          "B) To force students to memorize",
          "C) To replace parents",
          "D) To give out punishments",
        ],
        0,
      ),
    ),
    challenge(
      r,
      "personal-needs-and-learning-style",
      "Lack of Understanding of My Personal Needs, Interests, Learning Style & Language",
      "(teachers ignore individuality, interests, or language differences)",
      quiz(
        "Why is it important for teachers to understand different learning styles and student interests?",
        [
          "A) So all students feel supported and can learn effectively",
          "B) So teachers don't have to work hard",
          "C) To make students all learn in the same way",
          "D) To reduce study hours",
        ],
        0,
      ),
    ),
    challenge(
      r,
      "weak-subject-foundation",
      "Lack of Adequate Foundation and Understanding of Subject",
      "(basic concepts not well taught, no one to guide my path)",
      quiz(
        "If a student misses the basics of a subject, what is the best step forward?",
        [
          "A) Ignore it and move on",
          "B) Go back to review the foundation with help",
          "C) Drop the subject completely",
          "D) Only cram for exams",
        ],
        1,
      ),
    ),
    challenge(
      r,
      "other",
      "Other Challenges",
      "(something else not listed above)",
      quiz(
        "Why is it important for learners to express other challenges not listed?",
        [
          "A) Because every student's learning journey is unique",
          "B) To waste time",
          "C) To avoid responsibility",
          "D) To confuse teachers",
        ],
        0,
      ),
    ),
  ]
}

fn mentor_challenges() -> Vec<ChallengeDescriptor> {
  let r = Role::Mentor;
  vec![
    challenge(r, "learning-in-progress", "Learning is still in progress", "Students are not fully grasping concepts", None),
    challenge(r, "large-class-sizes", "Large class sizes", "Too many students to help individually", None),
    challenge(r, "training-and-resources", "Lack of training and resources", "Need better tools and support", None),
    challenge(r, "insecurity-in-schools", "Insecurity in schools", "Safety concerns for everyone", None),
    challenge(r, "bureaucratic-barriers", "Bureaucratic barriers", "Too much administrative work", None),
    challenge(r, "other", "Other challenges", "Specific to your learning environment", None),
  ]
}

fn parent_challenges() -> Vec<ChallengeDescriptor> {
  let r = Role::Parent;
  vec![
    challenge(r, "learning-in-progress", "Learning is still in progress", "Child is not fully grasping concepts", None),
    challenge(r, "finding-good-schools", "Finding good schools", "Quality education options", None),
    challenge(r, "education-costs", "Affording education costs", "Financial challenges", None),
    challenge(r, "school-safety", "School safety concerns", "Worries about child safety", None),
    challenge(r, "learning-at-home", "Supporting learning at home", "How to help effectively", None),
    challenge(r, "other", "Other challenges", "Related to your child's education", None),
  ]
}
