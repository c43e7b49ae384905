//! Core behaviors shared by both HTTP and WebSocket handlers:
//! login/logout through the identity gate and the session store.

use tracing::{error, info, instrument, warn};

use crate::domain::Role;
use crate::identity::{validate, Identity, ValidationError};
use crate::session_store::StoreError;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
  #[error(transparent)]
  Invalid(#[from] ValidationError),
  #[error(transparent)]
  Store(#[from] StoreError),
}

pub fn current_identity(state: &AppState) -> Option<Identity> {
  state.store.load()
}

/// Validate and persist. An unknown role string counts as no role selected.
#[instrument(level = "info", skip(state, name, role), fields(name_len = name.len(), role = role.unwrap_or("")))]
pub fn login(state: &AppState, name: &str, role: Option<&str>) -> Result<Identity, LoginError> {
  let role = role.and_then(Role::parse);
  let identity = validate(name, role).map_err(|e| {
    warn!(target: "identity", error = %e, "Login rejected");
    e
  })?;
  state.store.save(&identity).map_err(|e| {
    error!(target: "identity", error = %e, "Failed to persist session");
    e
  })?;
  info!(target: "identity", role = %identity.role(), at = %identity.login_timestamp(), "Logged in");
  Ok(identity)
}

#[instrument(level = "info", skip(state))]
pub fn logout(state: &AppState) -> Result<(), StoreError> {
  state.store.clear().map_err(|e| {
    error!(target: "identity", error = %e, "Failed to clear session");
    e
  })?;
  info!(target: "identity", "Logged out");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  use crate::catalog::Catalog;
  use crate::config::{FlowCfg, ReportCopy};
  use crate::session_store::MemorySessionStore;

  fn state() -> AppState {
    AppState::with_store(Catalog::builtin(), Arc::new(MemorySessionStore::new()), FlowCfg::default(), ReportCopy::default())
  }

  #[test]
  fn login_persists_and_logout_clears() {
    let st = state();
    assert!(current_identity(&st).is_none());
    let id = login(&st, " Bob ", Some("student")).expect("login");
    assert_eq!(id.name(), "Bob");
    assert_eq!(current_identity(&st), Some(id));
    logout(&st).expect("logout");
    assert!(current_identity(&st).is_none());
  }

  #[test]
  fn unknown_role_reports_missing_role() {
    let st = state();
    let err = login(&st, "Bob", Some("principal")).expect_err("should fail");
    assert!(matches!(err, LoginError::Invalid(ValidationError::MissingRole)));
    assert_eq!(err.to_string(), "Please select your role");
    assert!(current_identity(&st).is_none());
  }

  #[test]
  fn failed_login_keeps_previous_session() {
    let st = state();
    let id = login(&st, "Ada", Some("mentor")).expect("login");
    assert!(login(&st, "A", Some("mentor")).is_err());
    assert_eq!(current_identity(&st), Some(id));
  }
}
