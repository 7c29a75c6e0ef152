//! Collector envelope.

use super::config::HecConfig;
use crate::event::TelemetryEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body POSTed to the collector for one event.
///
/// ```json
/// {
///   "time": 1735689600.123,
///   "host": "bank-01",
///   "source": "banking-app",
///   "sourcetype": "_json",
///   "event": {
///     "event_type": "transfer_success",
///     "user_id": "1",
///     "user_name": "John Doe",
///     "data": { "amount": 100 },
///     "app": "banking-app",
///     "environment": "development",
///     "correlation_id": "6f1c..."
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Emission time in unix seconds with millisecond precision
    pub time: f64,
    /// Emitting host
    pub host: String,
    /// Source name
    pub source: String,
    /// Sourcetype
    pub sourcetype: String,
    /// Target index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    /// The event itself
    pub event: EnvelopeEvent,
}

/// The `event` member of an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeEvent {
    /// Event type tag
    pub event_type: String,
    /// Resolved actor id
    pub user_id: String,
    /// Resolved actor name
    pub user_name: String,
    /// Event payload
    pub data: Value,
    /// Application name
    pub app: String,
    /// Deployment environment
    pub environment: String,
    /// Correlation id
    pub correlation_id: String,
}

impl Envelope {
    /// Wrap an event.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // millisecond timestamps fit comfortably in f64
    pub fn build(event: &TelemetryEvent, config: &HecConfig, host: &str) -> Self {
        Self {
            time: event.timestamp.timestamp_millis() as f64 / 1000.0,
            host: host.to_string(),
            source: config.source.clone(),
            sourcetype: config.sourcetype.clone(),
            index: config.index.clone(),
            event: EnvelopeEvent {
                event_type: event.event_type.clone(),
                user_id: event.actor.resolved_id().to_string(),
                user_name: event.actor.resolved_name().to_string(),
                data: Value::Object(event.data.clone()),
                app: config.app.clone(),
                environment: config.environment.clone(),
                correlation_id: event.effective_correlation_id(),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::event::{Actor, PAYLOAD_CORRELATION_KEY};
    use chrono::{TimeZone, Utc};

    fn event() -> TelemetryEvent {
        TelemetryEvent::new(
            "transfer_success",
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
        .with_actor(Actor::identified("1", "john_doe", "John Doe"))
        .with_field("amount", 100)
    }

    #[test]
    fn test_envelope_shape() {
        let config = HecConfig::default().with_index("banking");
        let envelope = Envelope::build(&event(), &config, "bank-01");
        let json = serde_json::to_value(&envelope).unwrap();

        assert!((envelope.time - 1_735_689_600.0).abs() < f64::EPSILON);
        assert_eq!(json["host"], "bank-01");
        assert_eq!(json["source"], "banking-app");
        assert_eq!(json["sourcetype"], "_json");
        assert_eq!(json["index"], "banking");
        assert_eq!(json["event"]["event_type"], "transfer_success");
        assert_eq!(json["event"]["user_id"], "1");
        assert_eq!(json["event"]["user_name"], "John Doe");
        assert_eq!(json["event"]["data"]["amount"], 100);
        assert_eq!(json["event"]["app"], "banking-app");
        assert_eq!(json["event"]["environment"], "development");
        assert!(!json["event"]["correlation_id"].as_str().unwrap().is_empty());
    }

    #[test]
    fn test_index_omitted_when_unset() {
        let envelope = Envelope::build(&event(), &HecConfig::default(), "bank-01");
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("index").is_none());
    }

    #[test]
    fn test_payload_correlation_id_is_echoed() {
        let event = event()
            .with_correlation_id("request-level")
            .with_field(PAYLOAD_CORRELATION_KEY, "caller-supplied");
        let envelope = Envelope::build(&event, &HecConfig::default(), "bank-01");
        assert_eq!(envelope.event.correlation_id, "caller-supplied");
    }

    #[test]
    fn test_unknown_actor_placeholders() {
        let event = TelemetryEvent::new("session_rejected", Utc::now());
        let envelope = Envelope::build(&event, &HecConfig::default(), "bank-01");
        assert_eq!(envelope.event.user_id, "unknown");
        assert_eq!(envelope.event.user_name, "unknown");
    }
}
