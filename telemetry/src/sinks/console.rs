//! Line-formatted sink backed by `tracing`.

use crate::event::TelemetryEvent;
use crate::sink::{SinkFuture, TelemetrySink};
use serde_json::Value;

/// Writes each event as a single `tracing` line.
///
/// Formatting and destination follow whatever subscriber the process
/// installed, so this sink inherits text or JSON output from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Create a console sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TelemetrySink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    fn send<'a>(&'a self, event: &'a TelemetryEvent) -> SinkFuture<'a> {
        Box::pin(async move {
            let payload = Value::Object(event.data.clone());
            tracing::info!(
                target: "banking::telemetry",
                event_type = %event.event_type,
                user_id = event.actor.resolved_id(),
                user_name = event.actor.resolved_name(),
                correlation_id = event.correlation_id.as_deref().unwrap_or_default(),
                data = %payload,
                "telemetry event {}",
                event.event_type
            );
            Ok(())
        })
    }
}
