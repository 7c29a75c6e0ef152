//! Router configuration.

use crate::handlers::{
    balance, health_check, login, logout, metrics, root, transactions, transfer,
};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use std::path::Path;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Build the complete Axum router.
///
/// - `/login`, `/transfer`, `/balance`, `/transactions`, `/logout`
/// - `/health`, and `/metrics` when a recorder is installed
/// - `/` serves the banner, or `index.html` from `static_dir` when one is
///   given; other unknown paths fall back to the static directory
///
/// Every response carries `X-Correlation-ID`.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/login", post(login))
        .route("/transfer", post(transfer))
        .route("/balance", get(balance))
        .route("/transactions", get(transactions))
        .route("/logout", post(logout))
        .route("/health", get(health_check));

    if state.metrics.is_some() {
        router = router.route("/metrics", get(metrics));
    }

    router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.route("/", get(root)),
    };

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
}
