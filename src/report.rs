//! Contribution Reflection Report (CRR): the summary shown at the Report step.

use serde::Serialize;

use crate::config::ReportCopy;
use crate::domain::{Role, Step};
use crate::util::fill_template;
use crate::wizard::WizardSession;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContributionReport {
  pub role_label: String,
  pub challenge: String,
  pub subtitle: String,
  pub action_plan: String,
  pub reflection_author: String,
  pub reflection: String,
  #[serde(skip)]
  text_template: String,
}

impl ContributionReport {
  pub fn render_text(&self) -> String {
    fill_template(&self.text_template, &[
      ("role", self.role_label.as_str()),
      ("challenge", self.challenge.as_str()),
      ("subtitle", self.subtitle.as_str()),
      ("action_plan", self.action_plan.as_str()),
      ("author", self.reflection_author.as_str()),
      ("reflection", self.reflection.as_str()),
    ])
  }
}

/// `None` unless the session sits on the Report step with a challenge selected.
pub fn build(role: Role, session: &WizardSession, copy: &ReportCopy) -> Option<ContributionReport> {
  if session.step() != Step::Report {
    return None;
  }
  let challenge = session.selected_challenge()?;
  Some(ContributionReport {
    role_label: role.label().to_string(),
    challenge: challenge.label.clone(),
    subtitle: challenge.subtitle.clone(),
    action_plan: session.action_plan_text().to_string(),
    reflection_author: copy.reflection_author.clone(),
    reflection: copy.reflection.clone(),
    text_template: copy.text_template.clone(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  use crate::catalog::Catalog;
  use crate::wizard::{Intent, SelectionMode, WizardController};

  fn at_report(role: Role, mode: SelectionMode, intents: Vec<Intent>) -> WizardSession {
    let ctl = WizardController::new(Arc::new(Catalog::builtin()), role, mode);
    intents.into_iter().fold(WizardSession::new(), |s, i| ctl.apply(s, i).0)
  }

  #[test]
  fn report_only_at_report_step() {
    let copy = ReportCopy::default();
    assert!(build(Role::Student, &WizardSession::new(), &copy).is_none());

    let s = at_report(Role::Student, SelectionMode::Single, vec![
      Intent::SelectChallenge("student.lack-of-mentorship".into()),
      Intent::SubmitAnswer(0),
    ]);
    assert!(build(Role::Student, &s, &copy).is_none());
  }

  #[test]
  fn report_combines_role_challenge_and_plan() {
    let copy = ReportCopy::default();
    let s = at_report(Role::Mentor, SelectionMode::Multi, vec![
      Intent::ToggleChallenge("mentor.large-class-sizes".into()),
      Intent::ConfirmSelection,
      Intent::SubmitPlan("Set up peer tutoring pairs".into()),
    ]);
    let r = build(Role::Mentor, &s, &copy).expect("report");
    assert_eq!(r.role_label, "Teacher/Mentor");
    assert_eq!(r.challenge, "Large class sizes");
    assert_eq!(r.action_plan, "Set up peer tutoring pairs");
    assert_eq!(r.reflection_author, "Efemena Preye Akioya");

    let text = r.render_text();
    assert!(text.contains("Your Role: Teacher/Mentor"));
    assert!(text.contains("Your Action Plan: Set up peer tutoring pairs"));
    assert!(!text.contains('{'));
  }

  #[test]
  fn template_is_not_serialized() {
    let s = at_report(Role::Parent, SelectionMode::Multi, vec![
      Intent::ToggleChallenge("parent.learning-at-home".into()),
      Intent::ConfirmSelection,
      Intent::SubmitPlan("Read together nightly".into()),
    ]);
    let r = build(Role::Parent, &s, &ReportCopy::default()).expect("report");
    let v = serde_json::to_value(&r).expect("json");
    assert_eq!(v["roleLabel"], "Parent");
    assert!(v.get("textTemplate").is_none());
  }
}
