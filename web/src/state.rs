//! Application state for Axum handlers.

use banking_core::{BankingService, SessionGuard};
use metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Banking operations
    pub service: BankingService,
    /// Session resolution for protected routes
    pub guard: SessionGuard,
    /// Prometheus renderer, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(service: BankingService) -> Self {
        let guard = service.guard();
        Self {
            service,
            guard,
            metrics: None,
        }
    }

    /// Expose metrics at `/metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
