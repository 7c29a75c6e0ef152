//! Custom Axum extractors.
//!
//! - `CorrelationId`: the request's correlation id, as an [`OperationContext`]
//! - `Authenticated`: the caller resolved from the `session-id` header
//!
//! # Examples
//!
//! ```ignore
//! async fn handler(
//!     State(state): State<AppState>,
//!     CorrelationId(ctx): CorrelationId,
//!     Authenticated(principal): Authenticated,
//! ) -> Result<Json<BalanceResponse>, AppError> {
//!     Ok(Json(state.service.balance(&ctx, &principal, "checking").await?))
//! }
//! ```

use crate::error::AppError;
use crate::middleware::{CORRELATION_ID_HEADER, RequestCorrelation, correlation_from_header};
use crate::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use banking_core::{OperationContext, Principal};

/// Header carrying the opaque session id.
pub const SESSION_HEADER: &str = "session-id";

fn context_from_parts(parts: &Parts) -> OperationContext {
    let id = parts.extensions.get::<RequestCorrelation>().map_or_else(
        || correlation_from_header(parts.headers.get(CORRELATION_ID_HEADER)),
        |correlation| correlation.0,
    );
    OperationContext::new(id.to_string())
}

/// Correlation id for request tracing.
///
/// Reads the id the correlation middleware stored on the request. Without
/// the middleware it falls back to the `X-Correlation-ID` header, or a new
/// UUID v4.
#[derive(Debug, Clone)]
pub struct CorrelationId(pub OperationContext);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(context_from_parts(parts)))
    }
}

/// The caller of a protected route.
///
/// Rejects with 401 when the session header is missing, malformed, unknown
/// or belongs to a deleted user.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = context_from_parts(parts);
        let raw = parts
            .headers
            .get(SESSION_HEADER)
            .map(|value| value.to_str().unwrap_or_default());

        let principal = state.guard.authenticate(&ctx, raw).await?;
        Ok(Self(principal))
    }
}
