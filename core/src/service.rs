//! The banking operations.
//!
//! Every operation loads the ledger, validates, mutates and saves, then emits
//! exactly one [`OperationEvent`] whatever the outcome. Telemetry never
//! changes the returned result.

use crate::context::{BankingEnvironment, OperationContext};
use crate::error::{BankingError, Result};
use crate::events::OperationEvent;
use crate::filter::TransactionFilter;
use crate::messages::{
    BalanceResponse, LoginRequest, LoginResponse, LogoutResponse, TransactionsResponse,
    TransferRequest, TransferResponse,
};
use crate::session::{Principal, SessionGuard};
use crate::types::{LedgerState, Session, SessionId, TransactionId, TransactionRecord, User};
use banking_telemetry::Actor;
use rust_decimal::Decimal;

/// Login, transfer, balance, transactions and logout over a ledger store.
#[derive(Debug, Clone)]
pub struct BankingService {
    env: BankingEnvironment,
}

impl BankingService {
    /// Create a service over the given environment.
    #[must_use]
    pub const fn new(env: BankingEnvironment) -> Self {
        Self { env }
    }

    /// The injected environment.
    #[must_use]
    pub const fn environment(&self) -> &BankingEnvironment {
        &self.env
    }

    /// A session guard sharing this service's environment.
    #[must_use]
    pub fn guard(&self) -> SessionGuard {
        SessionGuard::new(self.env.clone())
    }

    /// Check credentials and open a session.
    ///
    /// # Errors
    ///
    /// - [`BankingError::InvalidCredentials`] if the username is unknown or the
    ///   password does not match; no session is created
    /// - [`BankingError::Store`] if the ledger cannot be loaded or saved
    #[tracing::instrument(skip_all, fields(correlation_id = ctx.correlation_id(), username = %request.username))]
    pub async fn login(
        &self,
        ctx: &OperationContext,
        request: LoginRequest,
    ) -> Result<LoginResponse> {
        match self.open_session(&request).await {
            Ok((user, session_id)) => {
                tracing::info!(user_id = %user.id, "Login succeeded");
                self.env
                    .record(
                        ctx,
                        user.actor(),
                        OperationEvent::LoginSucceeded {
                            username: user.username.clone(),
                        },
                    )
                    .await;
                Ok(LoginResponse {
                    session_id,
                    user: user.summary(),
                })
            }
            Err(error) => {
                tracing::info!(reason = error.reason(), "Login failed");
                self.env
                    .record(
                        ctx,
                        Actor::claimed(&request.username),
                        OperationEvent::LoginFailed {
                            username: request.username,
                            reason: error.reason(),
                        },
                    )
                    .await;
                Err(error)
            }
        }
    }

    async fn open_session(&self, request: &LoginRequest) -> Result<(User, SessionId)> {
        let mut state = self.env.store.load().await?;

        let user = match state.users.get(&request.username) {
            Some(user) if user.password == request.password => user.clone(),
            _ => return Err(BankingError::InvalidCredentials),
        };

        let session_id = SessionId::new();
        state.sessions.insert(
            session_id,
            Session {
                user_id: user.id.clone(),
                created_at: self.env.clock.now(),
            },
        );
        self.env.store.save(&state).await?;
        Ok((user, session_id))
    }

    /// Move funds between two of the caller's accounts.
    ///
    /// On success the source is debited, the destination credited and one
    /// record carrying the correlation id is appended. On failure the ledger
    /// is untouched.
    ///
    /// # Errors
    ///
    /// - [`BankingError::InvalidAmount`] if the amount is not positive
    /// - [`BankingError::InvalidSourceAccount`] if the source kind is unknown
    /// - [`BankingError::InvalidDestinationAccount`] if the destination kind is
    ///   unknown or equals the source
    /// - [`BankingError::InsufficientFunds`] if the source balance is too low
    /// - [`BankingError::Unauthenticated`] if the caller's user has vanished
    /// - [`BankingError::Store`] if the ledger cannot be loaded or saved
    #[tracing::instrument(skip_all, fields(correlation_id = ctx.correlation_id(), user_id = %principal.user_id))]
    pub async fn transfer(
        &self,
        ctx: &OperationContext,
        principal: &Principal,
        request: TransferRequest,
    ) -> Result<TransferResponse> {
        match self.commit_transfer(ctx, principal, &request).await {
            Ok((response, transaction_id)) => {
                tracing::info!(
                    amount = %request.amount,
                    from = %request.from_account,
                    to = %request.to_account,
                    "Transfer completed"
                );
                self.env
                    .record(
                        ctx,
                        principal.actor(),
                        OperationEvent::TransferSucceeded {
                            amount: request.amount,
                            from: request.from_account,
                            to: request.to_account,
                            new_balance: response.new_balance,
                            transaction_id: transaction_id.to_string(),
                        },
                    )
                    .await;
                Ok(response)
            }
            Err(error) => {
                tracing::info!(reason = error.reason(), "Transfer rejected");
                self.env
                    .record(
                        ctx,
                        principal.actor(),
                        OperationEvent::TransferFailed {
                            amount: request.amount,
                            from: request.from_account,
                            to: request.to_account,
                            reason: error.reason(),
                        },
                    )
                    .await;
                Err(error)
            }
        }
    }

    async fn commit_transfer(
        &self,
        ctx: &OperationContext,
        principal: &Principal,
        request: &TransferRequest,
    ) -> Result<(TransferResponse, TransactionId)> {
        let mut state = self.env.store.load().await?;
        let applied = self.apply_transfer(ctx, principal, request, &mut state)?;
        self.env.store.save(&state).await?;
        Ok(applied)
    }

    fn apply_transfer(
        &self,
        ctx: &OperationContext,
        principal: &Principal,
        request: &TransferRequest,
        state: &mut LedgerState,
    ) -> Result<(TransferResponse, TransactionId)> {
        if request.amount <= Decimal::ZERO {
            return Err(BankingError::InvalidAmount);
        }

        let from = request.from_account.as_str();
        let to = request.to_account.as_str();
        let user = state
            .user_mut(&principal.user_id)
            .ok_or(BankingError::Unauthenticated)?;

        let source_balance = user
            .account(from)
            .map(|account| account.balance)
            .ok_or_else(|| BankingError::InvalidSourceAccount(from.to_string()))?;
        if from == to || user.account(to).is_none() {
            return Err(BankingError::InvalidDestinationAccount(to.to_string()));
        }
        if source_balance < request.amount {
            return Err(BankingError::InsufficientFunds {
                account: from.to_string(),
            });
        }

        let new_balance = adjust(user, from, -request.amount);
        adjust(user, to, request.amount);
        let to_account_name = user
            .account(to)
            .map(|account| account.name.clone())
            .unwrap_or_default();
        let user_id = user.id.clone();

        let transaction_id = TransactionId::new();
        state.transactions.push(TransactionRecord {
            id: transaction_id,
            from: from.to_string(),
            to: to.to_string(),
            user_id,
            amount: request.amount,
            timestamp: self.env.clock.now(),
            correlation_id: ctx.correlation_id().to_string(),
        });

        Ok((
            TransferResponse {
                success: true,
                new_balance,
                to_account_name,
            },
            transaction_id,
        ))
    }

    /// Balance of one of the caller's accounts.
    ///
    /// # Errors
    ///
    /// - [`BankingError::InvalidAccount`] if the caller has no such account
    /// - [`BankingError::Unauthenticated`] if the caller's user has vanished
    /// - [`BankingError::Store`] if the ledger cannot be loaded
    #[tracing::instrument(skip_all, fields(correlation_id = ctx.correlation_id(), user_id = %principal.user_id, account = account))]
    pub async fn balance(
        &self,
        ctx: &OperationContext,
        principal: &Principal,
        account: &str,
    ) -> Result<BalanceResponse> {
        let result = self.read_balance(principal, account).await;
        let event = match &result {
            Ok(response) => OperationEvent::BalanceChecked {
                account: account.to_string(),
                balance: response.balance,
            },
            Err(error) => {
                tracing::info!(reason = error.reason(), "Balance check failed");
                OperationEvent::BalanceCheckFailed {
                    account: account.to_string(),
                    reason: error.reason(),
                }
            }
        };
        self.env.record(ctx, principal.actor(), event).await;
        result
    }

    async fn read_balance(&self, principal: &Principal, account: &str) -> Result<BalanceResponse> {
        let state = self.env.store.load().await?;
        let user = state
            .user(&principal.user_id)
            .ok_or(BankingError::Unauthenticated)?;
        let found = user
            .account(account)
            .ok_or_else(|| BankingError::InvalidAccount(account.to_string()))?;

        Ok(BalanceResponse {
            balance: found.balance,
            account_name: found.name.clone(),
            account_type: found.kind.clone(),
        })
    }

    /// The caller's transaction history, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BankingError::Store`] if the ledger cannot be loaded.
    #[tracing::instrument(skip_all, fields(correlation_id = ctx.correlation_id(), user_id = %principal.user_id))]
    pub async fn transactions(
        &self,
        ctx: &OperationContext,
        principal: &Principal,
        filter: &TransactionFilter,
    ) -> Result<TransactionsResponse> {
        let transactions = match self.env.store.load().await {
            Ok(state) => filter.apply(&state.transactions, &principal.user_id),
            Err(error) => {
                let error = BankingError::from(error);
                tracing::info!(reason = error.reason(), "Transactions unavailable");
                self.env
                    .record(
                        ctx,
                        principal.actor(),
                        OperationEvent::TransactionsViewFailed {
                            reason: error.reason(),
                        },
                    )
                    .await;
                return Err(error);
            }
        };

        tracing::debug!(count = transactions.len(), "Transactions listed");
        self.env
            .record(
                ctx,
                principal.actor(),
                OperationEvent::TransactionsViewed {
                    count: transactions.len(),
                    account_type: filter.account_type.clone(),
                    start_date: filter.start_date.clone(),
                    end_date: filter.end_date.clone(),
                },
            )
            .await;

        Ok(TransactionsResponse { transactions })
    }

    /// End the caller's session.
    ///
    /// # Errors
    ///
    /// Returns [`BankingError::Store`] if the ledger cannot be loaded or saved.
    #[tracing::instrument(skip_all, fields(correlation_id = ctx.correlation_id(), user_id = %principal.user_id))]
    pub async fn logout(
        &self,
        ctx: &OperationContext,
        principal: &Principal,
    ) -> Result<LogoutResponse> {
        match self.close_session(principal).await {
            Ok(()) => {
                tracing::info!("Logged out");
                self.env
                    .record(ctx, principal.actor(), OperationEvent::LoggedOut)
                    .await;
                Ok(LogoutResponse { success: true })
            }
            Err(error) => {
                tracing::info!(reason = error.reason(), "Logout failed");
                self.env
                    .record(
                        ctx,
                        principal.actor(),
                        OperationEvent::LogoutFailed {
                            reason: error.reason(),
                        },
                    )
                    .await;
                Err(error)
            }
        }
    }

    async fn close_session(&self, principal: &Principal) -> Result<()> {
        let mut state = self.env.store.load().await?;
        if state.sessions.remove(&principal.session_id).is_some() {
            self.env.store.save(&state).await?;
        }
        Ok(())
    }
}

/// Add `delta` to an account that is known to exist; returns the new balance.
fn adjust(user: &mut User, kind: &str, delta: Decimal) -> Decimal {
    user.accounts.get_mut(kind).map_or(Decimal::ZERO, |account| {
        account.balance += delta;
        account.balance
    })
}
