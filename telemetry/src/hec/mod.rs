//! HTTP Event Collector delivery.
//!
//! Each event is wrapped in a fixed [`Envelope`] and POSTed on its own to a
//! configured collector endpoint with an `Authorization: <scheme> <token>`
//! header. Delivery is best effort:
//!
//! - no endpoint or token: the event is logged locally, nothing is sent
//! - one request per event, no batching
//! - non-2xx responses and transport errors are reported, never retried
//!
//! TLS certificate verification is on unless the configuration explicitly
//! opts out with [`HecConfig::insecure_skip_verify`].

mod config;
mod envelope;
mod sink;

pub use config::{local_hostname, HecConfig, DEFAULT_AUTH_SCHEME, DEFAULT_SOURCETYPE};
pub use envelope::{Envelope, EnvelopeEvent};
pub use sink::{DeliveryOutcome, HecSink};
