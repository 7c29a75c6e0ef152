//! Session resolution for protected operations.

use crate::context::{BankingEnvironment, OperationContext};
use crate::error::{BankingError, Result};
use crate::events::OperationEvent;
use crate::types::{SessionId, User, UserId};
use banking_telemetry::Actor;

/// Why a session was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    /// No session id was supplied
    Missing,
    /// The supplied id is not a session id
    Malformed,
    /// No session with this id exists
    Unknown,
    /// The session's user no longer exists
    Orphaned,
    /// The ledger could not be read
    StoreUnavailable,
}

impl SessionRejection {
    /// Telemetry reason string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Malformed => "malformed",
            Self::Unknown => "unknown",
            Self::Orphaned => "orphaned",
            Self::StoreUnavailable => "store_unavailable",
        }
    }
}

/// The authenticated caller of a protected operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Session the request presented
    pub session_id: SessionId,
    /// Resolved user id
    pub user_id: UserId,
    /// Login name
    pub username: String,
    /// Display name
    pub name: String,
}

impl Principal {
    fn new(session_id: SessionId, user: &User) -> Self {
        Self {
            session_id,
            user_id: user.id.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }

    /// Telemetry actor for this caller.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::identified(self.user_id.as_str(), &self.username, &self.name)
    }
}

/// Maps a request-supplied session id to a [`Principal`].
///
/// Sessions never expire and are never rotated.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    env: BankingEnvironment,
}

impl SessionGuard {
    /// Create a guard over the given environment.
    #[must_use]
    pub const fn new(env: BankingEnvironment) -> Self {
        Self { env }
    }

    /// Resolve a raw session id.
    ///
    /// Every rejection emits a `session_rejected` event.
    ///
    /// # Errors
    ///
    /// - [`BankingError::Unauthenticated`] if the id is missing, malformed,
    ///   unknown, or points at a user that no longer exists
    /// - [`BankingError::Store`] if the ledger cannot be loaded
    pub async fn authenticate(
        &self,
        ctx: &OperationContext,
        raw_session_id: Option<&str>,
    ) -> Result<Principal> {
        let session_id = match raw_session_id.map(str::trim).filter(|s| !s.is_empty()) {
            None => return Err(self.reject(ctx, SessionRejection::Missing).await),
            Some(raw) => match raw.parse::<SessionId>() {
                Ok(id) => id,
                Err(_) => return Err(self.reject(ctx, SessionRejection::Malformed).await),
            },
        };

        let state = match self.env.store.load().await {
            Ok(state) => state,
            Err(error) => {
                self.record_rejection(ctx, SessionRejection::StoreUnavailable)
                    .await;
                return Err(error.into());
            }
        };
        let Some(session) = state.sessions.get(&session_id) else {
            return Err(self.reject(ctx, SessionRejection::Unknown).await);
        };
        let Some(user) = state.user(&session.user_id) else {
            return Err(self.reject(ctx, SessionRejection::Orphaned).await);
        };

        Ok(Principal::new(session_id, user))
    }

    async fn reject(&self, ctx: &OperationContext, reason: SessionRejection) -> BankingError {
        self.record_rejection(ctx, reason).await;
        BankingError::Unauthenticated
    }

    async fn record_rejection(&self, ctx: &OperationContext, reason: SessionRejection) {
        tracing::debug!(
            correlation_id = ctx.correlation_id(),
            reason = reason.as_str(),
            "Session rejected"
        );
        self.env
            .record(
                ctx,
                Actor::anonymous(),
                OperationEvent::SessionRejected {
                    reason: reason.as_str(),
                },
            )
            .await;
    }
}
