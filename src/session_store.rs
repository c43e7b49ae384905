//! Session store: keeps the single logged-in `Identity` on this device.
//!
//! At most one record exists at a time. Reads fail soft: a record that does
//! not parse is purged and reported as "no session".

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, instrument, warn};

use crate::identity::Identity;

/// File name of the persisted record inside the data directory.
pub const STORAGE_KEY: &str = "edumentor_user.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("session storage I/O failed: {0}")]
  Io(#[from] std::io::Error),
  #[error("failed to encode session record: {0}")]
  Encode(#[from] serde_json::Error),
}

pub trait SessionStore: Send + Sync {
  fn load(&self) -> Option<Identity>;
  fn save(&self, identity: &Identity) -> Result<(), StoreError>;
  fn clear(&self) -> Result<(), StoreError>;
}

/// JSON file under a data directory, e.g. `~/.local/share/edumentor/edumentor_user.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
  path: PathBuf,
}

impl FileSessionStore {
  pub fn new(data_dir: impl AsRef<Path>) -> Self {
    Self { path: data_dir.as_ref().join(STORAGE_KEY) }
  }

  /// Platform data directory, or the working directory when none is known.
  pub fn default_dir() -> PathBuf {
    dirs::data_local_dir()
      .map(|d| d.join("edumentor"))
      .unwrap_or_else(|| PathBuf::from(".edumentor"))
  }

  pub fn path(&self) -> &Path { &self.path }

  fn purge(&self) {
    if let Err(e) = std::fs::remove_file(&self.path) {
      warn!(target: "session_store", path = %self.path.display(), error = %e, "Failed to purge malformed session record");
    }
  }
}

impl SessionStore for FileSessionStore {
  #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
  fn load(&self) -> Option<Identity> {
    let raw = match std::fs::read_to_string(&self.path) {
      Ok(s) => s,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
      Err(e) => {
        warn!(target: "session_store", error = %e, "Session record unreadable; treating as absent");
        return None;
      }
    };
    match serde_json::from_str::<Identity>(&raw) {
      Ok(identity) => {
        debug!(target: "session_store", role = %identity.role(), "Session restored");
        Some(identity)
      }
      Err(e) => {
        warn!(target: "session_store", error = %e, bytes = raw.len(), "Malformed session record; purging");
        self.purge();
        None
      }
    }
  }

  #[instrument(level = "debug", skip(self, identity), fields(path = %self.path.display()))]
  fn save(&self, identity: &Identity) -> Result<(), StoreError> {
    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_vec(identity)?;
    std::fs::write(&self.path, body)?;
    Ok(())
  }

  #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
  fn clear(&self) -> Result<(), StoreError> {
    match std::fs::remove_file(&self.path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}

/// In-process store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
  slot: Mutex<Option<Identity>>,
}

impl MemorySessionStore {
  pub fn new() -> Self { Self::default() }

  fn slot(&self) -> std::sync::MutexGuard<'_, Option<Identity>> {
    self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl SessionStore for MemorySessionStore {
  fn load(&self) -> Option<Identity> {
    self.slot().clone()
  }

  fn save(&self, identity: &Identity) -> Result<(), StoreError> {
    *self.slot() = Some(identity.clone());
    Ok(())
  }

  fn clear(&self) -> Result<(), StoreError> {
    *self.slot() = None;
    Ok(())
  }
}
