//! Dashboard summary: greeting, points, rank progress, completion and badges.

use serde::Serialize;

use crate::domain::Role;
use crate::identity::Identity;
use crate::rank::{points_to_next_rank, rank_for, unlocked_badges, Rank};
use crate::wizard::WizardSession;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
  pub greeting: String,
  pub tagline: &'static str,
  pub points: u32,
  pub rank: Rank,
  pub rank_label: &'static str,
  pub points_to_next_rank: Option<u32>,
  pub next_rank_label: Option<&'static str>,
  pub completed: usize,
  pub total: usize,
  pub progress_percent: u32,
  pub badges: Vec<Rank>,
}

pub fn greeting(identity: &Identity) -> String {
  match identity.role() {
    Role::Student => format!("Welcome back, {}!", identity.name()),
    Role::Mentor => format!("Welcome, Mentor {}!", identity.name()),
    Role::Parent => format!("Welcome, {}!", identity.name()),
  }
}

pub fn tagline(role: Role) -> &'static str {
  match role {
    Role::Student => "Continue your learning journey",
    Role::Mentor => "Guide and support your students",
    Role::Parent => "Monitor and support your child's education",
  }
}

/// Completed challenges as a whole percentage of `total`, capped at 100.
pub fn progress_percent(completed: usize, total: usize) -> u32 {
  if total == 0 {
    return 0;
  }
  let pct = completed.saturating_mul(100) / total;
  pct.min(100) as u32
}

pub fn summarize(identity: &Identity, session: &WizardSession, total: usize) -> DashboardSummary {
  let points = session.points();
  let rank = rank_for(points);
  let completed = session.completed_challenge_ids().len();
  DashboardSummary {
    greeting: greeting(identity),
    tagline: tagline(identity.role()),
    points,
    rank,
    rank_label: rank.label(),
    points_to_next_rank: points_to_next_rank(points),
    next_rank_label: rank.next().map(Rank::label),
    completed,
    total,
    progress_percent: progress_percent(completed, total),
    badges: unlocked_badges(points),
  }
}
