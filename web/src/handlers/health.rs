//! Liveness, banner and metrics endpoints.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode};

/// Service banner.
///
/// ```text
/// GET /
/// ```
#[allow(clippy::unused_async)]
pub async fn root() -> &'static str {
    concat!("banking-service ", env!("CARGO_PKG_VERSION"))
}

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service is running.
/// This endpoint does NOT check the ledger.
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Prometheus text exposition.
///
/// ```text
/// GET /metrics
/// ```
#[allow(clippy::unused_async)]
pub async fn metrics(State(state): State<AppState>) -> (StatusCode, String) {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}
