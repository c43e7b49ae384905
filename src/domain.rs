//! Domain models shared by the core: roles, challenge descriptors, quizzes and wizard steps.

use serde::{Deserialize, Serialize};

/// Who is using the app on this device.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Student,
  /// Older builds of the frontend called this role "teacher".
  #[serde(alias = "teacher")]
  Mentor,
  Parent,
}

impl Role {
  pub const ALL: [Role; 3] = [Role::Student, Role::Mentor, Role::Parent];

  /// Label shown on the reflection report.
  pub fn label(self) -> &'static str {
    match self {
      Role::Student => "Student",
      Role::Mentor => "Teacher/Mentor",
      Role::Parent => "Parent",
    }
  }

  /// Stable lowercase key, also used as the id prefix in the catalog.
  pub fn key(self) -> &'static str {
    match self {
      Role::Student => "student",
      Role::Mentor => "mentor",
      Role::Parent => "parent",
    }
  }

  pub fn parse(s: &str) -> Option<Role> {
    match s.trim().to_ascii_lowercase().as_str() {
      "student" => Some(Role::Student),
      "mentor" | "teacher" => Some(Role::Mentor),
      "parent" => Some(Role::Parent),
      _ => None,
    }
  }
}

impl std::fmt::Display for Role {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.key())
  }
}

/// Multiple-choice question attached to a challenge.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizDescriptor {
  pub question: String,
  pub options: Vec<String>,
  pub correct_option_index: usize,
}

impl QuizDescriptor {
  /// At least two options and a correct index that points at one of them.
  pub fn is_well_formed(&self) -> bool {
    self.options.len() >= 2 && self.correct_option_index < self.options.len()
  }

  pub fn is_correct(&self, index: usize) -> bool {
    index == self.correct_option_index
  }
}

/// A learning challenge a user can self-report.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChallengeDescriptor {
  pub id: String,
  pub label: String,
  pub subtitle: String,
  #[serde(default)]
  pub quiz: Option<QuizDescriptor>,
}

/// Where a challenge-resolution pass currently is.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Step {
  #[default]
  SelectChallenge,
  Quiz,
  ActionPlan,
  Report,
}
