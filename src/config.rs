//! Loading application configuration (server, storage, flow modes, report copy, catalog) from TOML.
//!
//! Every section is optional; an absent file means built-in defaults.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{QuizDescriptor, Role};
use crate::wizard::SelectionMode;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub server: ServerCfg,
  #[serde(default)]
  pub storage: StorageCfg,
  #[serde(default)]
  pub flow: FlowCfg,
  #[serde(default)]
  pub report: ReportCopy,
  #[serde(default)]
  pub challenges: Vec<ChallengeCfg>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerCfg {
  pub host: String,
  pub port: u16,
  pub static_dir: PathBuf,
}

impl Default for ServerCfg {
  fn default() -> Self {
    Self { host: "127.0.0.1".into(), port: 3000, static_dir: PathBuf::from("./static") }
  }
}

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(default)]
pub struct StorageCfg {
  /// Directory holding the session record. Defaults to the platform data dir.
  pub data_dir: Option<PathBuf>,
  /// Keep the session in memory only.
  pub ephemeral: bool,
}

/// Selection variant per role dashboard.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct FlowCfg {
  pub student: SelectionMode,
  pub mentor: SelectionMode,
  pub parent: SelectionMode,
}

impl Default for FlowCfg {
  fn default() -> Self {
    Self { student: SelectionMode::Single, mentor: SelectionMode::Multi, parent: SelectionMode::Multi }
  }
}

impl FlowCfg {
  pub fn mode_for(&self, role: Role) -> SelectionMode {
    match role {
      Role::Student => self.student,
      Role::Mentor => self.mentor,
      Role::Parent => self.parent,
    }
  }
}

/// Copy shown on the Contribution Reflection Report.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ReportCopy {
  pub reflection_author: String,
  pub reflection: String,
  /// Plain-text rendering; keys: {role}, {challenge}, {subtitle}, {action_plan}, {author}, {reflection}.
  pub text_template: String,
}

impl Default for ReportCopy {
  fn default() -> Self {
    Self {
      reflection_author: "Efemena Preye Akioya".into(),
      reflection: "Every small action contributes to a larger change. Education reform in Nigeria will not only come from government; \
it will come from students, teachers, and mentors who refuse to accept failure as final.\n\n\
Keep reflecting, because lifelong learning starts with awareness."
        .into(),
      text_template: "Contribution Reflection Report (CRR)\n\
Your Role: {role}\n\
Your Challenge: {challenge} {subtitle}\n\
Your Action Plan: {action_plan}\n\n\
Personal Reflection (from {author}):\n{reflection}\n"
        .into(),
    }
  }
}

/// Catalog entry accepted in TOML configuration. Replaces the built-in list for its role.
#[derive(Clone, Debug, Deserialize)]
pub struct ChallengeCfg {
  pub role: Role,
  /// Defaults to `<role>.<slug of label>`.
  #[serde(default)] pub id: Option<String>,
  pub label: String,
  #[serde(default)] pub subtitle: String,
  #[serde(default)] pub quiz: Option<QuizDescriptor>,
}

impl AppConfig {
  pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(s)
  }

  /// `PORT` wins over the configured port, as in most container setups.
  pub fn apply_env_overrides(&mut self) {
    if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
      self.server.port = port;
    }
  }
}

/// Load `AppConfig` from EDUMENTOR_CONFIG. Any IO/parse error is logged and yields defaults.
pub fn load_app_config_from_env() -> AppConfig {
  let mut cfg = match std::env::var("EDUMENTOR_CONFIG").ok() {
    None => AppConfig::default(),
    Some(path) => match std::fs::read_to_string(&path) {
      Ok(s) => match AppConfig::from_toml_str(&s) {
        Ok(cfg) => {
          info!(target: "edumentor", %path, "Loaded app config (TOML)");
          cfg
        }
        Err(e) => {
          error!(target: "edumentor", %path, error = %e, "Failed to parse TOML config; using defaults");
          AppConfig::default()
        }
      },
      Err(e) => {
        error!(target: "edumentor", %path, error = %e, "Failed to read TOML config file; using defaults");
        AppConfig::default()
      }
    },
  };
  cfg.apply_env_overrides();
  cfg
}
