//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::{path::Path, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws` (wizard intents)
/// - REST-ish API under `/api/v1/...` (identity, catalog, rank)
/// - Static SPA from `static_dir` with index fallback
/// - CORS (allow any origin/method/headers); the server binds to loopback by default
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new(static_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/session", get(http::http_get_session))
        .route("/api/v1/login", post(http::http_post_login))
        .route("/api/v1/logout", post(http::http_post_logout))
        .route("/api/v1/catalog", get(http::http_get_catalog))
        .route("/api/v1/rank", get(http::http_get_rank))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::catalog::Catalog;
    use crate::config::{FlowCfg, ReportCopy};
    use crate::session_store::MemorySessionStore;

    fn app() -> Router {
        let state = AppState::with_store(
            Catalog::builtin(),
            Arc::new(MemorySessionStore::new()),
            FlowCfg::default(),
            ReportCopy::default(),
        );
        build_router(Arc::new(state), Path::new("./static"))
    }

    async fn call(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = app.clone().oneshot(req).await.expect("response");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
        let v = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, v)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, v) = call(&app(), get("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["ok"], true);
    }

    #[tokio::test]
    async fn login_session_logout_cycle() {
        let app = app();
        let (_, v) = call(&app, get("/api/v1/session")).await;
        assert!(v["identity"].is_null());

        let (status, v) = call(&app, post_json("/api/v1/login", serde_json::json!({"name": " Bob ", "role": "student"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["name"], "Bob");
        assert_eq!(v["role"], "student");
        assert!(v["loginTimestamp"].is_string());

        let (_, v) = call(&app, get("/api/v1/session")).await;
        assert_eq!(v["identity"]["name"], "Bob");

        let (status, _) = call(&app, post_json("/api/v1/logout", serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, v) = call(&app, get("/api/v1/session")).await;
        assert!(v["identity"].is_null());
    }

    #[tokio::test]
    async fn invalid_login_returns_first_message() {
        let (status, v) = call(&app(), post_json("/api/v1/login", serde_json::json!({"name": "", "role": null}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(v["message"], "Please enter your name");
    }

    #[tokio::test]
    async fn catalog_by_query_or_session() {
        let app = app();
        let (status, v) = call(&app, get("/api/v1/catalog?role=mentor")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["mode"], "multi");
        assert_eq!(v["challenges"][0]["hasQuiz"], false);

        let (status, _) = call(&app, get("/api/v1/catalog")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        call(&app, post_json("/api/v1/login", serde_json::json!({"name": "Ada", "role": "student"}))).await;
        let (_, v) = call(&app, get("/api/v1/catalog")).await;
        assert_eq!(v["role"], "student");
        assert_eq!(v["challenges"].as_array().map(|a| a.len()), Some(7));
    }

    #[tokio::test]
    async fn rank_endpoint() {
        let (_, v) = call(&app(), get("/api/v1/rank?points=99")).await;
        assert_eq!(v["rank"], "impact_fellow");
        assert_eq!(v["pointsToNextRank"], 1);
        let (_, v) = call(&app(), get("/api/v1/rank?points=100")).await;
        assert!(v["pointsToNextRank"].is_null());
    }
}
