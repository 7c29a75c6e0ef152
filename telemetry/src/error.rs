//! Error types for telemetry sinks.

use thiserror::Error;

/// Errors a sink can report back to the [`TelemetryHub`](crate::TelemetryHub).
///
/// These never reach the caller of a banking operation: the hub logs them
/// and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// Sink configuration could not be turned into a working sink.
    #[error("Invalid telemetry configuration: {0}")]
    Config(String),

    /// The event collector answered with a non-2xx status.
    #[error("Event collector rejected event with status {status}: {body}")]
    Rejected {
        /// HTTP status code returned by the collector
        status: u16,
        /// Response body (truncated)
        body: String,
    },

    /// The request to the event collector never completed.
    #[error("Event collector transport error: {0}")]
    Transport(String),

    /// The event could not be serialized.
    #[error("Failed to encode telemetry event: {0}")]
    Encoding(String),

    /// Local file output failed.
    #[error("Telemetry sink I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for TelemetryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<std::io::Error> for TelemetryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
