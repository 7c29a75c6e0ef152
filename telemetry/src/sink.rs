//! The sink abstraction.

use crate::error::TelemetryError;
use crate::event::TelemetryEvent;
use std::future::Future;
use std::pin::Pin;

/// Future returned by [`TelemetrySink::send`].
pub type SinkFuture<'a> = Pin<Box<dyn Future<Output = Result<(), TelemetryError>> + Send + 'a>>;

/// A destination for telemetry events.
///
/// Each sink owns its own formatting. Implementations should return an
/// error rather than log it; the hub logs and counts failures uniformly.
///
/// # Dyn Compatibility
///
/// `send` returns a boxed future instead of using `async fn` so sinks can
/// be stored as `Arc<dyn TelemetrySink>`.
pub trait TelemetrySink: Send + Sync {
    /// Short name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Deliver one event.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError`] if the sink could not record the event.
    fn send<'a>(&'a self, event: &'a TelemetryEvent) -> SinkFuture<'a>;
}
