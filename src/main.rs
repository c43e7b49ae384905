//! Edumentor · local engagement backend
//!
//! - Identity gate + on-device session record
//! - Role-keyed challenge catalog with quizzes
//! - Wizard controller (select → quiz → action plan → report) driven over WebSocket
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   EDUMENTOR_CONFIG : path to TOML config (server, storage, flow, report copy, catalog)
//!   PORT             : u16, overrides `server.port` (default 3000)
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod identity;
mod session_store;
mod seeds;
mod catalog;
mod rank;
mod wizard;
mod report;
mod dashboard;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::load_app_config_from_env;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = load_app_config_from_env();

  // Catalog, session store and flow modes; read-only after this point.
  let state = Arc::new(AppState::new(&cfg));

  let app = build_router(state, &cfg.server.static_dir);

  let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
    .parse()
    .unwrap_or_else(|e| {
      warn!(target: "edumentor", host = %cfg.server.host, error = %e, "Invalid server.host; binding to loopback");
      SocketAddr::from(([127, 0, 0, 1], cfg.server.port))
    });

  let listener = TcpListener::bind(addr).await?;
  info!(target: "edumentor", %addr, static_dir = %cfg.server.static_dir.display(), "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "edumentor", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(target: "edumentor", error = %e, "Failed to listen for Ctrl-C; running until killed");
    std::future::pending::<()>().await;
  }
}
