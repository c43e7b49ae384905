//! Challenge catalog: static, role-keyed challenge lists and the quiz lookup.
//!
//! Built once at startup (built-in seeds, optionally replaced per role by
//! `[[challenges]]` entries from the config) and then only read.

use std::collections::{HashMap, HashSet};

use tracing::{error, info, instrument};

use crate::config::ChallengeCfg;
use crate::domain::{ChallengeDescriptor, QuizDescriptor, Role};
use crate::seeds::seed_challenges;
use crate::util::slugify;

#[derive(Clone, Debug)]
pub struct Catalog {
  by_role: HashMap<Role, Vec<ChallengeDescriptor>>,
}

impl Catalog {
  pub fn builtin() -> Self {
    let by_role = Role::ALL.iter().map(|&r| (r, seed_challenges(r))).collect();
    Self { by_role }
  }

  /// Build from config entries. Invalid entries are skipped; a role with no
  /// valid entries keeps its built-in list.
  #[instrument(level = "info", skip_all, fields(entries = entries.len()))]
  pub fn from_entries(entries: &[ChallengeCfg]) -> Self {
    let mut by_role: HashMap<Role, Vec<ChallengeDescriptor>> = HashMap::new();
    let mut seen: HashSet<String> = HashSet::new();

    for cc in entries {
      let id = match &cc.id {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => format!("{}.{}", cc.role.key(), slugify(&cc.label)),
      };
      if cc.label.trim().is_empty() {
        error!(target: "edumentor", %id, "Skipping catalog entry: empty label.");
        continue;
      }
      if let Some(q) = &cc.quiz {
        if !q.is_well_formed() {
          error!(target: "edumentor", %id, options = q.options.len(), correct = q.correct_option_index, "Skipping catalog entry: malformed quiz.");
          continue;
        }
      }
      if !seen.insert(id.clone()) {
        error!(target: "edumentor", %id, "Skipping catalog entry: duplicate id.");
        continue;
      }
      by_role.entry(cc.role).or_default().push(ChallengeDescriptor {
        id,
        label: cc.label.trim().to_string(),
        subtitle: cc.subtitle.clone(),
        quiz: cc.quiz.clone(),
      });
    }

    for role in Role::ALL {
      let list = by_role.entry(role).or_default();
      if list.is_empty() {
        list.extend(seed_challenges(role).into_iter().filter(|c| !seen.contains(&c.id)));
        info!(target: "edumentor", %role, count = list.len(), "Using built-in challenges");
      } else {
        info!(target: "edumentor", %role, count = list.len(), "Using configured challenges");
      }
    }
    Self { by_role }
  }

  pub fn list_for(&self, role: Role) -> &[ChallengeDescriptor] {
    self.by_role.get(&role).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn find(&self, role: Role, id: &str) -> Option<&ChallengeDescriptor> {
    self.list_for(role).iter().find(|c| c.id == id)
  }

  pub fn quiz_for(&self, challenge_id: &str) -> Option<&QuizDescriptor> {
    self.by_role
      .values()
      .flat_map(|list| list.iter())
      .find(|c| c.id == challenge_id)
      .and_then(|c| c.quiz.as_ref())
  }
}
