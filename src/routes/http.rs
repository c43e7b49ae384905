//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; logs carry parameters and basic result info, never names.

use std::sync::Arc;
use axum::{extract::{State, Query}, http::StatusCode, response::{IntoResponse, Response}, Json};
use tracing::{info, instrument};

use crate::domain::Role;
use crate::logic::{current_identity, login, logout, LoginError};
use crate::protocol::*;
use crate::rank::{points_to_next_rank, rank_for, unlocked_badges};
use crate::state::AppState;

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
  (status, Json(ErrorOut { message: message.into() })).into_response()
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(SessionOut { identity: current_identity(&state) })
}

#[instrument(level = "info", skip(state, body), fields(name_len = body.name.len()))]
pub async fn http_post_login(
  State(state): State<Arc<AppState>>,
  Json(body): Json<LoginIn>,
) -> Response {
  match login(&state, &body.name, body.role.as_deref()) {
    Ok(identity) => Json(identity).into_response(),
    Err(LoginError::Invalid(e)) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    Err(LoginError::Store(_)) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Could not save your session on this device"),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_logout(State(state): State<Arc<AppState>>) -> Response {
  match logout(&state) {
    Ok(()) => StatusCode::NO_CONTENT.into_response(),
    Err(_) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Could not clear your session on this device"),
  }
}

/// Catalog for `?role=`, or for the logged-in user's role when omitted.
#[instrument(level = "info", skip(state), fields(role = ?q.role))]
pub async fn http_get_catalog(
  State(state): State<Arc<AppState>>,
  Query(q): Query<CatalogQuery>,
) -> Response {
  let role = match q.role.as_deref() {
    Some(r) => Role::parse(r),
    None => current_identity(&state).map(|id| id.role()),
  };
  let Some(role) = role else {
    return error_response(StatusCode::BAD_REQUEST, "Please select your role");
  };
  let challenges: Vec<ChallengeOut> = state.catalog.list_for(role).iter().map(to_out).collect();
  info!(target: "edumentor", %role, count = challenges.len(), "HTTP catalog served");
  Json(CatalogOut { role, mode: state.flow.mode_for(role), challenges }).into_response()
}

#[instrument(level = "info", fields(points = q.points))]
pub async fn http_get_rank(Query(q): Query<RankQuery>) -> impl IntoResponse {
  let rank = rank_for(q.points);
  Json(RankOut {
    points: q.points,
    rank,
    label: rank.label(),
    points_to_next_rank: points_to_next_rank(q.points),
    badges: unlocked_badges(q.points),
  })
}
