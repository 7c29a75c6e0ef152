//! Operation telemetry for the banking service.
//!
//! Every banking operation produces exactly one [`TelemetryEvent`]. The
//! [`TelemetryHub`] fans that event out to zero or more sinks, each of which
//! owns its own formatting:
//!
//! ```text
//!                      ┌──────────────┐
//!  operation ─────────►│ TelemetryHub │
//!                      └──────┬───────┘
//!             ┌───────────────┼────────────────┐
//!             ▼               ▼                ▼
//!      ┌────────────┐  ┌─────────────┐  ┌────────────┐
//!      │ConsoleSink │  │JsonLinesSink│  │  HecSink   │──► HTTP event collector
//!      └────────────┘  └─────────────┘  └────────────┘
//! ```
//!
//! # Delivery contract
//!
//! - Sinks never influence the operation that produced the event.
//! - Sink failures are logged and counted, never surfaced, never retried.
//! - The event collector sink degrades to a local log line when it has no
//!   endpoint or token.
//!
//! # Example
//!
//! ```ignore
//! use banking_telemetry::{ConsoleSink, TelemetryEvent, TelemetryHub};
//! use std::sync::Arc;
//!
//! let hub = TelemetryHub::new(vec![Arc::new(ConsoleSink::new())]);
//! hub.emit(TelemetryEvent::new("login_success", chrono::Utc::now())).await;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod event;
pub mod hec;
pub mod hub;
pub mod sink;
pub mod sinks;

pub use config::TelemetryConfig;
pub use error::TelemetryError;
pub use event::{Actor, TelemetryEvent, PAYLOAD_CORRELATION_KEY, UNKNOWN};
pub use hec::{DeliveryOutcome, Envelope, HecConfig, HecSink};
pub use hub::{Dispatch, SinkReport, TelemetryHub};
pub use sink::{SinkFuture, TelemetrySink};
pub use sinks::{ConsoleSink, JsonLinesSink};
