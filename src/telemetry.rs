//! Log setup for the Edumentor backend.
//!
//! `LOG_LEVEL` takes `EnvFilter` directives and falls back to `DEFAULT_FILTER`.
//! `LOG_FORMAT=json` switches to one JSON object per line.
//!
//! Targets: `edumentor` (startup, catalog, WS transport), `wizard` (intents
//! applied or ignored), `identity` (login/logout), `session_store` (device
//! record I/O). Names and action-plan text are logged as lengths only.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,wizard=debug,edumentor=debug,tower_http=info,axum=info";

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_tracing() {
    let filter = filter_from_env();
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
