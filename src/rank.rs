//! Scoring and rank tiers.

use serde::Serialize;

pub const IMPACT_FELLOW_THRESHOLD: u32 = 50;
pub const SDG_MENTOR_THRESHOLD: u32 = 100;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
  Beginner,
  ImpactFellow,
  SdgMentor,
}

impl Rank {
  pub const ALL: [Rank; 3] = [Rank::Beginner, Rank::ImpactFellow, Rank::SdgMentor];

  pub fn label(self) -> &'static str {
    match self {
      Rank::Beginner => "Beginner",
      Rank::ImpactFellow => "Impact Fellow",
      Rank::SdgMentor => "SDG Mentor",
    }
  }

  /// Minimum points to hold this rank.
  pub fn threshold(self) -> u32 {
    match self {
      Rank::Beginner => 0,
      Rank::ImpactFellow => IMPACT_FELLOW_THRESHOLD,
      Rank::SdgMentor => SDG_MENTOR_THRESHOLD,
    }
  }

  pub fn next(self) -> Option<Rank> {
    match self {
      Rank::Beginner => Some(Rank::ImpactFellow),
      Rank::ImpactFellow => Some(Rank::SdgMentor),
      Rank::SdgMentor => None,
    }
  }
}

pub fn rank_for(points: u32) -> Rank {
  if points >= SDG_MENTOR_THRESHOLD {
    Rank::SdgMentor
  } else if points >= IMPACT_FELLOW_THRESHOLD {
    Rank::ImpactFellow
  } else {
    Rank::Beginner
  }
}

/// `None` once the top rank is reached.
pub fn points_to_next_rank(points: u32) -> Option<u32> {
  rank_for(points).next().map(|next| next.threshold() - points)
}

/// Badges earned so far, lowest first. Beginner is always unlocked.
pub fn unlocked_badges(points: u32) -> Vec<Rank> {
  Rank::ALL.into_iter().filter(|r| points >= r.threshold()).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn boundaries() {
    assert_eq!(rank_for(0), Rank::Beginner);
    assert_eq!(rank_for(49), Rank::Beginner);
    assert_eq!(rank_for(50), Rank::ImpactFellow);
    assert_eq!(rank_for(99), Rank::ImpactFellow);
    assert_eq!(rank_for(100), Rank::SdgMentor);
    assert_eq!(rank_for(u32::MAX), Rank::SdgMentor);
  }

  #[test]
  fn distance_to_next_rank() {
    assert_eq!(points_to_next_rank(0), Some(50));
    assert_eq!(points_to_next_rank(15), Some(35));
    assert_eq!(points_to_next_rank(50), Some(50));
    assert_eq!(points_to_next_rank(99), Some(1));
    assert_eq!(points_to_next_rank(100), None);
  }

  #[test]
  fn badges_follow_thresholds() {
    assert_eq!(unlocked_badges(0), vec![Rank::Beginner]);
    assert_eq!(unlocked_badges(75), vec![Rank::Beginner, Rank::ImpactFellow]);
    assert_eq!(unlocked_badges(100).len(), 3);
  }

  #[test]
  fn labels() {
    assert_eq!(Rank::SdgMentor.label(), "SDG Mentor");
    assert_eq!(serde_json::to_string(&Rank::ImpactFellow).expect("json"), "\"impact_fellow\"");
  }
}
