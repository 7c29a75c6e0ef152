//! HTTP surface for the banking service.
//!
//! # Request Flow
//!
//! 1. **Correlation** middleware assigns the request id and opens a span
//! 2. **Extract** the correlation context, session and body
//! 3. **Call** one [`BankingService`](banking_core::BankingService) operation
//! 4. **Map** the result to JSON, or [`AppError`] to `{code, message}`
//!
//! Telemetry is emitted inside the operation and never changes the response.
//!
//! # Example
//!
//! ```ignore
//! use banking_web::{AppState, build_router};
//!
//! let app = build_router(AppState::new(service), None);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export key types for convenience
pub use config::{Config, DEFAULT_LOG_FILTER, LogFormat, ServerConfig};
pub use error::AppError;
pub use extractors::{Authenticated, CorrelationId, SESSION_HEADER};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
pub use routes::build_router;
pub use state::AppState;
