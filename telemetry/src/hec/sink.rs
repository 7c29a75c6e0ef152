//! Event collector sink.

use super::config::{local_hostname, HecConfig};
use super::envelope::Envelope;
use crate::error::TelemetryError;
use crate::event::TelemetryEvent;
use crate::sink::{SinkFuture, TelemetrySink};
use reqwest::{header, Client, Url};

const MAX_ERROR_BODY: usize = 512;

/// What happened to one event handed to [`HecSink::deliver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// No collector configured; the event was only logged locally.
    Skipped,
    /// The collector accepted the event.
    Delivered {
        /// HTTP status returned
        status: u16,
    },
    /// The collector answered with a non-2xx status.
    Rejected {
        /// HTTP status returned
        status: u16,
        /// Response body (truncated)
        body: String,
    },
    /// The request failed before a response arrived.
    Failed(String),
}

#[derive(Debug, Clone)]
struct Target {
    url: Url,
    authorization: String,
}

/// Posts one envelope per event to an HTTP event collector.
#[derive(Debug, Clone)]
pub struct HecSink {
    config: HecConfig,
    host: String,
    target: Option<Target>,
    client: Client,
}

impl HecSink {
    /// Build a sink from configuration.
    ///
    /// An endpoint that is not a valid `http`/`https` URL is logged and
    /// treated as absent, so the sink still logs locally.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Config`] if the HTTP client cannot be built.
    pub fn new(config: HecConfig) -> Result<Self, TelemetryError> {
        let target = match config.target() {
            Ok(target) => target.map(|(url, authorization)| Target { url, authorization }),
            Err(error) => {
                tracing::warn!(%error, "Event collector disabled; falling back to local logging");
                None
            }
        };

        if !config.verify_tls && target.is_some() {
            tracing::warn!("Event collector TLS certificate verification is DISABLED");
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.timeout)
            .build()
            .map_err(|e| TelemetryError::Config(format!("failed to build HTTP client: {e}")))?;

        let host = config.host.clone().unwrap_or_else(local_hostname);

        Ok(Self {
            config,
            host,
            target,
            client,
        })
    }

    /// Whether events will be sent over the network.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.target.is_some()
    }

    /// Host name stamped on envelopes.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Build the envelope this sink would send for `event`.
    #[must_use]
    pub fn envelope(&self, event: &TelemetryEvent) -> Envelope {
        Envelope::build(event, &self.config, &self.host)
    }

    /// Send one event. Never retries and never panics.
    pub async fn deliver(&self, event: &TelemetryEvent) -> DeliveryOutcome {
        let Some(target) = &self.target else {
            tracing::info!(
                event_type = %event.event_type,
                user_id = event.actor.resolved_id(),
                "Event collector not configured; {} logged locally only",
                event.event_type
            );
            return DeliveryOutcome::Skipped;
        };

        let envelope = self.envelope(event);

        let response = match self
            .client
            .post(target.url.clone())
            .header(header::AUTHORIZATION, &target.authorization)
            .json(&envelope)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return DeliveryOutcome::Failed(e.to_string()),
        };

        let status = response.status();
        if status.is_success() {
            tracing::debug!(
                event_type = %event.event_type,
                status = status.as_u16(),
                "Event delivered to collector"
            );
            return DeliveryOutcome::Delivered {
                status: status.as_u16(),
            };
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }

        DeliveryOutcome::Rejected {
            status: status.as_u16(),
            body,
        }
    }
}

impl TelemetrySink for HecSink {
    fn name(&self) -> &'static str {
        "hec"
    }

    fn send<'a>(&'a self, event: &'a TelemetryEvent) -> SinkFuture<'a> {
        Box::pin(async move {
            match self.deliver(event).await {
                DeliveryOutcome::Skipped | DeliveryOutcome::Delivered { .. } => Ok(()),
                DeliveryOutcome::Rejected { status, body } => {
                    Err(TelemetryError::Rejected { status, body })
                }
                DeliveryOutcome::Failed(reason) => Err(TelemetryError::Transport(reason)),
            }
        })
    }
}
