//! Injected dependencies and per-request context.

use crate::environment::{Clock, SystemClock};
use crate::events::OperationEvent;
use crate::store::LedgerStore;
use banking_telemetry::{Actor, TelemetryHub};
use std::sync::Arc;
use uuid::Uuid;

/// Per-request data threaded through every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    correlation_id: String,
}

impl OperationContext {
    /// Context for a request with a known correlation id.
    #[must_use]
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
        }
    }

    /// Context with a freshly generated correlation id.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// The request's correlation id.
    #[must_use]
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }
}

/// Everything an operation needs from the outside world.
#[derive(Clone)]
pub struct BankingEnvironment {
    /// Ledger persistence
    pub store: Arc<dyn LedgerStore>,
    /// Time source
    pub clock: Arc<dyn Clock>,
    /// Telemetry fan-out
    pub telemetry: TelemetryHub,
}

impl std::fmt::Debug for BankingEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BankingEnvironment")
            .field("telemetry", &self.telemetry)
            .finish_non_exhaustive()
    }
}

impl BankingEnvironment {
    /// Environment using the system clock.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>, telemetry: TelemetryHub) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            telemetry,
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Count an operation outcome and emit its telemetry event.
    ///
    /// Never fails: sink errors are handled inside the hub.
    pub async fn record(&self, ctx: &OperationContext, actor: Actor, event: OperationEvent) {
        metrics::counter!(
            "banking.operations.total",
            "operation" => event.operation(),
            "outcome" => event.outcome()
        )
        .increment(1);

        let event = event.into_telemetry(actor, ctx.correlation_id(), self.clock.now());
        self.telemetry.emit(event).await;
    }
}
