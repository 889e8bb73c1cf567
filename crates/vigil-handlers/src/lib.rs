//! vigil-handlers — HTTP handlers for the vigil health checking core.
//!
//! Renders the aggregate state kept by [`Health`] so an orchestrated
//! container platform can probe a cheap, always-current endpoint:
//!
//! | Handler | Body | Healthy | Failed |
//! |---|---|---|---|
//! | [`basic_handler`] | plain text | `200 "ok"` | `503 "failed"` |
//! | [`json_handler`] | `{"status", "details"}` | `200` | `503` |
//!
//! Both read a snapshot; no check is executed on the request path.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use vigil_core::Health;

/// GET handler answering `ok` / `failed` from the global failure predicate.
pub async fn basic_handler(State(health): State<Arc<Health>>) -> impl IntoResponse {
    if health.failed() {
        (StatusCode::SERVICE_UNAVAILABLE, "failed")
    } else {
        (StatusCode::OK, "ok")
    }
}

/// GET handler rendering every check's latest state as JSON.
///
/// The body is `{"status": "ok"|"failed", "details": {<name>: <state>}}`;
/// the status code mirrors the global failure predicate.
pub async fn json_handler(State(health): State<Arc<Health>>) -> impl IntoResponse {
    let (states, failed) = health.state();
    let (code, status) = if failed {
        (StatusCode::SERVICE_UNAVAILABLE, "failed")
    } else {
        (StatusCode::OK, "ok")
    };

    let body = json!({
        "status": status,
        "details": states,
    });
    (code, Json(body))
}

/// Convenience router mounting the JSON handler at `/healthcheck` and the
/// plain one at `/healthcheck/basic`.
pub fn router(health: Arc<Health>) -> Router {
    Router::new()
        .route("/healthcheck", get(json_handler))
        .route("/healthcheck/basic", get(basic_handler))
        .with_state(health)
}
