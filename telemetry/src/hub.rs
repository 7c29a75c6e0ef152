//! Fan-out of telemetry events to configured sinks.

use crate::error::TelemetryError;
use crate::event::TelemetryEvent;
use crate::sink::TelemetrySink;
use futures::future::join_all;
use std::sync::Arc;

/// How [`TelemetryHub::emit`] schedules delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// Spawn delivery on the runtime and return immediately.
    #[default]
    Detached,
    /// Await every sink before returning. Used by tests.
    Inline,
}

/// Result of handing one event to one sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkReport {
    /// Sink name
    pub sink: &'static str,
    /// What the sink reported
    pub result: Result<(), TelemetryError>,
}

/// Broadcasts events to every registered sink.
///
/// Cloning is cheap; the sink list is shared.
#[derive(Clone, Default)]
pub struct TelemetryHub {
    sinks: Arc<[Arc<dyn TelemetrySink>]>,
    dispatch: Dispatch,
}

impl std::fmt::Debug for TelemetryHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryHub")
            .field("sinks", &self.sink_names())
            .field("dispatch", &self.dispatch)
            .finish()
    }
}

impl TelemetryHub {
    /// Create a hub with detached dispatch.
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn TelemetrySink>>) -> Self {
        Self {
            sinks: sinks.into(),
            dispatch: Dispatch::Detached,
        }
    }

    /// A hub with no sinks. Events are dropped.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Change the dispatch mode.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Names of the registered sinks, in registration order.
    #[must_use]
    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }

    /// Emit an event.
    ///
    /// With [`Dispatch::Detached`] this returns before any sink runs; the
    /// caller's response is never held up by delivery.
    pub async fn emit(&self, event: TelemetryEvent) {
        if self.sinks.is_empty() {
            return;
        }

        match self.dispatch {
            Dispatch::Inline => {
                self.deliver(event).await;
            }
            Dispatch::Detached => {
                if tokio::runtime::Handle::try_current().is_err() {
                    tracing::warn!(
                        event_type = %event.event_type,
                        "No async runtime available; telemetry event dropped"
                    );
                    return;
                }
                let hub = self.clone();
                tokio::spawn(async move {
                    hub.deliver(event).await;
                });
            }
        }
    }

    /// Deliver an event to every sink and wait for all of them.
    ///
    /// The correlation id is settled first so all sinks agree on it.
    /// Failures are logged here and returned for inspection.
    pub async fn deliver(&self, mut event: TelemetryEvent) -> Vec<SinkReport> {
        event.settle_correlation_id();
        let event = &event;

        let reports = join_all(self.sinks.iter().map(|sink| async move {
            SinkReport {
                sink: sink.name(),
                result: sink.send(event).await,
            }
        }))
        .await;

        for report in &reports {
            if let Err(error) = &report.result {
                metrics::counter!("telemetry.sink.failures", "sink" => report.sink).increment(1);
                tracing::warn!(
                    sink = report.sink,
                    event_type = %event.event_type,
                    correlation_id = event.correlation_id.as_deref().unwrap_or_default(),
                    error = %error,
                    "Telemetry sink failed; event dropped for this sink"
                );
            }
        }

        reports
    }
}
