//! Identity gate: validates a proposed name/role pair and produces the `Identity` record.
//!
//! Name checks run before the role check so a form with both fields missing
//! reports the name problem first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Role;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;

/// The logged-in user on this device. Built only through `validate`/`validate_at`
/// (or read back from the session store) and never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
  name: String,
  role: Role,
  #[serde(alias = "loginDate")]
  login_timestamp: DateTime<Utc>,
}

impl Identity {
  pub fn name(&self) -> &str { &self.name }
  pub fn role(&self) -> Role { self.role }
  pub fn login_timestamp(&self) -> DateTime<Utc> { self.login_timestamp }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
  #[error("Please enter your name")]
  EmptyName,
  #[error("Name must be at least 2 characters")]
  NameTooShort,
  #[error("Name must be less than 50 characters")]
  NameTooLong,
  #[error("Please select your role")]
  MissingRole,
}

pub fn validate(name: &str, role: Option<Role>) -> Result<Identity, ValidationError> {
  validate_at(name, role, Utc::now())
}

pub fn validate_at(name: &str, role: Option<Role>, now: DateTime<Utc>) -> Result<Identity, ValidationError> {
  let trimmed = name.trim();
  let len = trimmed.chars().count();
  if len == 0 {
    return Err(ValidationError::EmptyName);
  }
  if len < NAME_MIN_CHARS {
    return Err(ValidationError::NameTooShort);
  }
  if len > NAME_MAX_CHARS {
    return Err(ValidationError::NameTooLong);
  }
  let role = role.ok_or(ValidationError::MissingRole)?;
  Ok(Identity { name: trimmed.to_string(), role, login_timestamp: now })
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).single().expect("valid instant")
  }

  #[test]
  fn name_errors_in_order() {
    assert_eq!(validate("", Some(Role::Student)), Err(ValidationError::EmptyName));
    assert_eq!(validate("   ", Some(Role::Student)), Err(ValidationError::EmptyName));
    assert_eq!(validate("A", Some(Role::Student)), Err(ValidationError::NameTooShort));
    let long = "x".repeat(51);
    assert_eq!(validate(&long, Some(Role::Parent)), Err(ValidationError::NameTooLong));
    assert!(validate(&"x".repeat(50), Some(Role::Parent)).is_ok());
  }

  #[test]
  fn name_error_reported_before_missing_role() {
    assert_eq!(validate("", None), Err(ValidationError::EmptyName));
    assert_eq!(validate(" Bob ", None), Err(ValidationError::MissingRole));
  }

  #[test]
  fn success_trims_and_stamps() {
    let id = validate_at(" Bob ", Some(Role::Student), t0()).expect("valid");
    assert_eq!(id.name(), "Bob");
    assert_eq!(id.role(), Role::Student);
    assert_eq!(id.login_timestamp(), t0());
  }

  #[test]
  fn length_counts_characters_not_bytes() {
    // two chars, six bytes
    assert!(validate("李明", Some(Role::Student)).is_ok());
  }

  #[test]
  fn messages_are_user_facing() {
    assert_eq!(ValidationError::MissingRole.to_string(), "Please select your role");
    assert_eq!(ValidationError::NameTooShort.to_string(), "Name must be at least 2 characters");
  }

  #[test]
  fn record_shape_and_legacy_key() {
    let id = validate_at("Ada", Some(Role::Mentor), t0()).expect("valid");
    let v = serde_json::to_value(&id).expect("json");
    assert_eq!(v["name"], "Ada");
    assert_eq!(v["role"], "mentor");
    assert!(v["loginTimestamp"].as_str().expect("ts").starts_with("2026-10-14T09:30:00"));

    let legacy = r#"{"name":"Ada","role":"mentor","loginDate":"2026-10-14T09:30:00Z"}"#;
    let back: Identity = serde_json::from_str(legacy).expect("legacy record");
    assert_eq!(back, id);
  }
}
