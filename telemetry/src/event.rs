//! Telemetry event model.
//!
//! A [`TelemetryEvent`] is the single internal record produced per banking
//! operation. It carries an open-ended event type, the acting user (if any),
//! a free-form JSON payload and the request's correlation id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Placeholder used wherever an actor field cannot be resolved.
pub const UNKNOWN: &str = "unknown";

/// Payload key that, when present, overrides the event's correlation id.
pub const PAYLOAD_CORRELATION_KEY: &str = "correlationId";

/// The user on whose behalf an event was emitted.
///
/// All fields are optional: unauthenticated requests and failed logins
/// produce events with a partial or empty actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable user identifier
    pub id: Option<String>,
    /// Login name
    pub username: Option<String>,
    /// Human-readable name
    pub display_name: Option<String>,
}

impl Actor {
    /// An actor with nothing known about it.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            id: None,
            username: None,
            display_name: None,
        }
    }

    /// A fully identified actor.
    #[must_use]
    pub fn identified(
        id: impl Into<String>,
        username: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            username: Some(username.into()),
            display_name: Some(display_name.into()),
        }
    }

    /// An actor known only by the username it presented (e.g. a failed login).
    #[must_use]
    pub fn claimed(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: Some(username.into()),
            display_name: None,
        }
    }

    /// Identifier for envelopes: id, then username, then [`UNKNOWN`].
    #[must_use]
    pub fn resolved_id(&self) -> &str {
        non_empty(self.id.as_deref())
            .or_else(|| non_empty(self.username.as_deref()))
            .unwrap_or(UNKNOWN)
    }

    /// Display name for envelopes: display name, then [`UNKNOWN`].
    #[must_use]
    pub fn resolved_name(&self) -> &str {
        non_empty(self.display_name.as_deref()).unwrap_or(UNKNOWN)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// One telemetry event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Event type tag, e.g. `transfer_success`
    pub event_type: String,
    /// Who triggered the event
    pub actor: Actor,
    /// Free-form structured payload
    pub data: Map<String, Value>,
    /// Correlation id threaded from the originating request
    pub correlation_id: Option<String>,
    /// When the event was emitted
    pub timestamp: DateTime<Utc>,
}

impl TelemetryEvent {
    /// Create an event with an anonymous actor and an empty payload.
    #[must_use]
    pub fn new(event_type: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_type: event_type.into(),
            actor: Actor::anonymous(),
            data: Map::new(),
            correlation_id: None,
            timestamp,
        }
    }

    /// Set the actor.
    #[must_use]
    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = actor;
        self
    }

    /// Set the correlation id.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Add one payload field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Replace the payload.
    #[must_use]
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Correlation id to report for this event.
    ///
    /// Precedence: a non-empty `correlationId` string in the payload, then
    /// the event's own correlation id, then a freshly generated UUID.
    #[must_use]
    pub fn effective_correlation_id(&self) -> String {
        self.data
            .get(PAYLOAD_CORRELATION_KEY)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .or_else(|| self.correlation_id.as_deref().filter(|id| !id.is_empty()))
            .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string)
    }

    /// Pin the effective correlation id so every sink reports the same value.
    pub fn settle_correlation_id(&mut self) {
        let id = self.effective_correlation_id();
        self.correlation_id = Some(id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_falls_back_to_username_then_unknown() {
        let claimed = Actor::claimed("john_doe");
        assert_eq!(claimed.resolved_id(), "john_doe");
        assert_eq!(claimed.resolved_name(), UNKNOWN);

        assert_eq!(Actor::anonymous().resolved_id(), UNKNOWN);

        let full = Actor::identified("1", "john_doe", "John Doe");
        assert_eq!(full.resolved_id(), "1");
        assert_eq!(full.resolved_name(), "John Doe");
    }

    #[test]
    fn test_blank_actor_fields_are_ignored() {
        let actor = Actor {
            id: Some(String::new()),
            username: Some("  ".to_string()),
            display_name: Some(String::new()),
        };
        assert_eq!(actor.resolved_id(), UNKNOWN);
        assert_eq!(actor.resolved_name(), UNKNOWN);
    }

    #[test]
    fn test_payload_correlation_id_wins() {
        let event = TelemetryEvent::new("transfer_success", Utc::now())
            .with_correlation_id("request-id")
            .with_field(PAYLOAD_CORRELATION_KEY, "payload-id");

        assert_eq!(event.effective_correlation_id(), "payload-id");
    }

    #[test]
    fn test_own_correlation_id_used_when_payload_lacks_one() {
        let event =
            TelemetryEvent::new("logout", Utc::now()).with_correlation_id("request-id");
        assert_eq!(event.effective_correlation_id(), "request-id");
    }

    #[test]
    fn test_fresh_correlation_id_generated() {
        let mut event = TelemetryEvent::new("logout", Utc::now())
            .with_field(PAYLOAD_CORRELATION_KEY, 42);

        let generated = event.effective_correlation_id();
        assert!(Uuid::parse_str(&generated).is_ok());

        event.settle_correlation_id();
        let settled = event.correlation_id.clone().unwrap();
        assert_eq!(event.effective_correlation_id(), settled);
    }
}
