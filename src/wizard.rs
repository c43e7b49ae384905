//! Wizard controller: the state machine behind one challenge-resolution pass.
//!
//!   SelectChallenge -> Quiz -> ActionPlan -> Report -> (reset) SelectChallenge
//!
//! `WizardController::apply` is a reducer: it takes the session by value and
//! hands it back together with an `Outcome`. Intents that are not valid for
//! the current step are ignored and leave the session untouched; every
//! handler checks all of its preconditions before it mutates anything.
//!
//! Quiz is skipped when the selected challenge has no quiz. Points and the
//! completed set survive the reset; everything else is per pass.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::catalog::Catalog;
use crate::domain::{ChallengeDescriptor, QuizDescriptor, Role, Step};

pub const QUIZ_CORRECT_POINTS: u32 = 10;
pub const ACTION_PLAN_POINTS: u32 = 5;

/// How challenges are picked on the SelectChallenge step.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
  /// Picking one challenge advances immediately.
  #[default]
  Single,
  /// Toggle a set, then confirm explicitly.
  Multi,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WizardSession {
  step: Step,
  selected: Option<ChallengeDescriptor>,
  /// Multi-select only; kept in toggle order.
  selected_set: Vec<ChallengeDescriptor>,
  quiz_answer_index: Option<usize>,
  quiz_resolved: bool,
  action_plan_text: String,
  points: u32,
  completed: BTreeSet<String>,
}

impl WizardSession {
  pub fn new() -> Self { Self::default() }

  pub fn step(&self) -> Step { self.step }
  pub fn selected_challenge(&self) -> Option<&ChallengeDescriptor> { self.selected.as_ref() }
  pub fn selected_set(&self) -> &[ChallengeDescriptor] { &self.selected_set }
  pub fn quiz_answer_index(&self) -> Option<usize> { self.quiz_answer_index }
  pub fn quiz_resolved(&self) -> bool { self.quiz_resolved }
  pub fn action_plan_text(&self) -> &str { &self.action_plan_text }
  pub fn points(&self) -> u32 { self.points }
  pub fn completed_challenge_ids(&self) -> &BTreeSet<String> { &self.completed }
}

/// User intents emitted by the presentation layer. Challenges are named by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
  SelectChallenge(String),
  ToggleChallenge(String),
  ConfirmSelection,
  SubmitAnswer(usize),
  SubmitPlan(String),
  CompleteChallenge,
}

impl Intent {
  pub fn name(&self) -> &'static str {
    match self {
      Intent::SelectChallenge(_) => "select_challenge",
      Intent::ToggleChallenge(_) => "toggle_challenge",
      Intent::ConfirmSelection => "confirm_selection",
      Intent::SubmitAnswer(_) => "submit_answer",
      Intent::SubmitPlan(_) => "submit_plan",
      Intent::CompleteChallenge => "complete_challenge",
    }
  }
}

/// Why an intent was ignored. Never shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTransition {
  #[error("{intent} is not valid at step {step:?}")]
  WrongStep { intent: &'static str, step: Step },
  #[error("{intent} is not available in {mode:?} selection mode")]
  WrongMode { intent: &'static str, mode: SelectionMode },
  #[error("unknown challenge id '{0}'")]
  UnknownChallenge(String),
  #[error("no challenge selected")]
  EmptySelection,
  #[error("selected challenge has no quiz")]
  MissingQuiz,
  #[error("quiz answer already locked")]
  AnswerLocked,
  #[error("answer index {index} out of range for {options} options")]
  AnswerOutOfRange { index: usize, options: usize },
  #[error("action plan is empty")]
  EmptyPlan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  Applied { awarded: u32 },
  Ignored(InvalidTransition),
}

impl Outcome {
  pub fn is_applied(&self) -> bool { matches!(self, Outcome::Applied { .. }) }
}

/// Result of the locked quiz answer in the current pass.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
  pub answer_index: usize,
  pub correct_option_index: usize,
  pub is_correct: bool,
}

#[derive(Clone, Debug)]
pub struct WizardController {
  catalog: Arc<Catalog>,
  role: Role,
  mode: SelectionMode,
}

impl WizardController {
  pub fn new(catalog: Arc<Catalog>, role: Role, mode: SelectionMode) -> Self {
    Self { catalog, role, mode }
  }

  pub fn role(&self) -> Role { self.role }
  pub fn mode(&self) -> SelectionMode { self.mode }

  pub fn challenges(&self) -> &[ChallengeDescriptor] {
    self.catalog.list_for(self.role)
  }

  /// Quiz of the challenge driving the current pass, if any.
  pub fn quiz_for_session(&self, session: &WizardSession) -> Option<&QuizDescriptor> {
    session.selected.as_ref().and_then(|c| self.catalog.quiz_for(&c.id))
  }

  pub fn quiz_result(&self, session: &WizardSession) -> Option<QuizResult> {
    let answer_index = session.quiz_answer_index()?;
    let quiz = self.quiz_for_session(session)?;
    Some(QuizResult {
      answer_index,
      correct_option_index: quiz.correct_option_index,
      is_correct: quiz.is_correct(answer_index),
    })
  }

  #[instrument(level = "debug", target = "wizard", skip(self, session, intent), fields(role = %self.role, step = ?session.step, intent = intent.name()))]
  pub fn apply(&self, mut session: WizardSession, intent: Intent) -> (WizardSession, Outcome) {
    let name = intent.name();
    let res = match intent {
      Intent::SelectChallenge(id) => self.select_challenge(&mut session, &id),
      Intent::ToggleChallenge(id) => self.toggle_challenge(&mut session, &id),
      Intent::ConfirmSelection => self.confirm_selection(&mut session),
      Intent::SubmitAnswer(index) => self.submit_answer(&mut session, index),
      Intent::SubmitPlan(text) => self.submit_plan(&mut session, &text),
      Intent::CompleteChallenge => self.complete_challenge(&mut session),
    };
    match res {
      Ok(awarded) => {
        debug!(target: "wizard", intent = name, awarded, points = session.points, step = ?session.step, "Intent applied");
        (session, Outcome::Applied { awarded })
      }
      Err(reason) => {
        debug!(target: "wizard", intent = name, %reason, "Intent ignored");
        (session, Outcome::Ignored(reason))
      }
    }
  }

  fn expect_step(&self, session: &WizardSession, step: Step, intent: &'static str) -> Result<(), InvalidTransition> {
    if session.step == step {
      Ok(())
    } else {
      Err(InvalidTransition::WrongStep { intent, step: session.step })
    }
  }

  fn expect_mode(&self, mode: SelectionMode, intent: &'static str) -> Result<(), InvalidTransition> {
    if self.mode == mode {
      Ok(())
    } else {
      Err(InvalidTransition::WrongMode { intent, mode: self.mode })
    }
  }

  fn lookup(&self, id: &str) -> Result<&ChallengeDescriptor, InvalidTransition> {
    self.catalog
      .find(self.role, id)
      .ok_or_else(|| InvalidTransition::UnknownChallenge(id.to_string()))
  }

  /// Enter the pass for `challenge`: Quiz when it has one, else straight to ActionPlan.
  fn begin_pass(&self, session: &mut WizardSession, challenge: ChallengeDescriptor) {
    session.step = if self.catalog.quiz_for(&challenge.id).is_some() { Step::Quiz } else { Step::ActionPlan };
    session.selected = Some(challenge);
  }

  fn select_challenge(&self, session: &mut WizardSession, id: &str) -> Result<u32, InvalidTransition> {
    const INTENT: &str = "select_challenge";
    self.expect_step(session, Step::SelectChallenge, INTENT)?;
    self.expect_mode(SelectionMode::Single, INTENT)?;
    let challenge = self.lookup(id)?.clone();
    self.begin_pass(session, challenge);
    Ok(0)
  }

  fn toggle_challenge(&self, session: &mut WizardSession, id: &str) -> Result<u32, InvalidTransition> {
    const INTENT: &str = "toggle_challenge";
    self.expect_step(session, Step::SelectChallenge, INTENT)?;
    self.expect_mode(SelectionMode::Multi, INTENT)?;
    let challenge = self.lookup(id)?;
    if let Some(pos) = session.selected_set.iter().position(|c| c.id == challenge.id) {
      session.selected_set.remove(pos);
    } else {
      session.selected_set.push(challenge.clone());
    }
    Ok(0)
  }

  fn confirm_selection(&self, session: &mut WizardSession) -> Result<u32, InvalidTransition> {
    const INTENT: &str = "confirm_selection";
    self.expect_step(session, Step::SelectChallenge, INTENT)?;
    self.expect_mode(SelectionMode::Multi, INTENT)?;
    let first = session.selected_set.first().cloned().ok_or(InvalidTransition::EmptySelection)?;
    self.begin_pass(session, first);
    Ok(0)
  }

  fn submit_answer(&self, session: &mut WizardSession, index: usize) -> Result<u32, InvalidTransition> {
    self.expect_step(session, Step::Quiz, "submit_answer")?;
    if session.quiz_answer_index.is_some() {
      return Err(InvalidTransition::AnswerLocked);
    }
    let quiz = self.quiz_for_session(session).ok_or(InvalidTransition::MissingQuiz)?;
    if index >= quiz.options.len() {
      return Err(InvalidTransition::AnswerOutOfRange { index, options: quiz.options.len() });
    }
    let awarded = if quiz.is_correct(index) { QUIZ_CORRECT_POINTS } else { 0 };

    session.quiz_answer_index = Some(index);
    session.quiz_resolved = true;
    session.points = session.points.saturating_add(awarded);
    session.step = Step::ActionPlan;
    Ok(awarded)
  }

  fn submit_plan(&self, session: &mut WizardSession, text: &str) -> Result<u32, InvalidTransition> {
    self.expect_step(session, Step::ActionPlan, "submit_plan")?;
    let plan = text.trim();
    if plan.is_empty() {
      return Err(InvalidTransition::EmptyPlan);
    }
    session.action_plan_text = plan.to_string();
    session.points = session.points.saturating_add(ACTION_PLAN_POINTS);
    session.step = Step::Report;
    Ok(ACTION_PLAN_POINTS)
  }

  fn complete_challenge(&self, session: &mut WizardSession) -> Result<u32, InvalidTransition> {
    self.expect_step(session, Step::Report, "complete_challenge")?;
    if let Some(c) = session.selected.take() {
      session.completed.insert(c.id);
    }
    session.step = Step::SelectChallenge;
    session.selected_set.clear();
    session.quiz_answer_index = None;
    session.quiz_resolved = false;
    session.action_plan_text.clear();
    Ok(0)
  }
}
