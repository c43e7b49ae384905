//! Application state: the catalog, the session store, and per-role flow settings.
//!
//! Everything here is read-only after startup except the session record
//! behind `store`. Wizard sessions are not kept here; each WebSocket
//! connection owns its own.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::catalog::Catalog;
use crate::config::{AppConfig, FlowCfg, ReportCopy};
use crate::domain::Role;
use crate::session_store::{FileSessionStore, MemorySessionStore, SessionStore};
use crate::wizard::WizardController;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub store: Arc<dyn SessionStore>,
    pub flow: FlowCfg,
    pub report: ReportCopy,
}

impl AppState {
    /// Build state from config: catalog (seeds or `[[challenges]]`), store, flow modes.
    #[instrument(level = "info", skip_all)]
    pub fn new(cfg: &AppConfig) -> Self {
        let catalog = if cfg.challenges.is_empty() {
            Catalog::builtin()
        } else {
            Catalog::from_entries(&cfg.challenges)
        };

        let store: Arc<dyn SessionStore> = if cfg.storage.ephemeral {
            info!(target: "edumentor", "Session storage: in-memory (ephemeral)");
            Arc::new(MemorySessionStore::new())
        } else {
            let dir = cfg
                .storage
                .data_dir
                .clone()
                .unwrap_or_else(FileSessionStore::default_dir);
            let file = FileSessionStore::new(dir);
            info!(target: "edumentor", path = %file.path().display(), "Session storage: local file");
            Arc::new(file)
        };

        for role in Role::ALL {
            info!(target: "edumentor", %role, mode = ?cfg.flow.mode_for(role), challenges = catalog.list_for(role).len(), "Startup catalog inventory");
        }

        Self::with_store(catalog, store, cfg.flow, cfg.report.clone())
    }

    pub fn with_store(catalog: Catalog, store: Arc<dyn SessionStore>, flow: FlowCfg, report: ReportCopy) -> Self {
        Self { catalog: Arc::new(catalog), store, flow, report }
    }

    /// Controller for a role dashboard, configured with that role's selection mode.
    pub fn controller_for(&self, role: Role) -> WizardController {
        WizardController::new(self.catalog.clone(), role, self.flow.mode_for(role))
    }
}
