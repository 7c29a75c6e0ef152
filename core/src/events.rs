//! The one event emitted per banking operation.
//!
//! Each operation produces exactly one [`OperationEvent`]; the environment
//! turns it into a [`TelemetryEvent`] and hands it to the hub. Sinks decide
//! how to format it.

use banking_telemetry::{Actor, TelemetryEvent};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};

/// Outcome of a banking operation, as seen by telemetry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationEvent {
    /// Credentials matched and a session was created
    LoginSucceeded {
        /// Login name
        username: String,
    },
    /// Credentials did not match
    LoginFailed {
        /// Login name presented
        username: String,
        /// Machine reason
        reason: &'static str,
    },
    /// Funds moved between two of the user's accounts
    TransferSucceeded {
        /// Amount moved
        amount: Decimal,
        /// Source account kind
        from: String,
        /// Destination account kind
        to: String,
        /// Source balance after the debit
        new_balance: Decimal,
        /// Record appended to the log
        transaction_id: String,
    },
    /// Transfer was rejected; the ledger is unchanged
    TransferFailed {
        /// Amount requested
        amount: Decimal,
        /// Source account kind
        from: String,
        /// Destination account kind
        to: String,
        /// Machine reason
        reason: &'static str,
    },
    /// Balance read
    BalanceChecked {
        /// Account kind
        account: String,
        /// Current balance
        balance: Decimal,
    },
    /// Balance requested for an unknown account kind
    BalanceCheckFailed {
        /// Account kind requested
        account: String,
        /// Machine reason
        reason: &'static str,
    },
    /// Transaction history listed
    TransactionsViewed {
        /// Number of records returned
        count: usize,
        /// Account filter, if any
        account_type: Option<String>,
        /// Start bound as supplied
        start_date: Option<String>,
        /// End bound as supplied
        end_date: Option<String>,
    },
    /// Transaction history could not be read
    TransactionsViewFailed {
        /// Machine reason
        reason: &'static str,
    },
    /// Session ended
    LoggedOut,
    /// Session could not be ended
    LogoutFailed {
        /// Machine reason
        reason: &'static str,
    },
    /// A protected request carried no usable session
    SessionRejected {
        /// Why the session was refused
        reason: &'static str,
    },
}

impl OperationEvent {
    /// Event type tag carried by the telemetry event.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::LoginSucceeded { .. } => "login_success",
            Self::LoginFailed { .. } => "login_failed",
            Self::TransferSucceeded { .. } => "transfer_success",
            Self::TransferFailed { .. } => "transfer_failed",
            Self::BalanceChecked { .. } => "balance_check",
            Self::BalanceCheckFailed { .. } => "balance_check_failed",
            Self::TransactionsViewed { .. } => "transactions_viewed",
            Self::TransactionsViewFailed { .. } => "transactions_view_failed",
            Self::LoggedOut => "logout",
            Self::LogoutFailed { .. } => "logout_failed",
            Self::SessionRejected { .. } => "session_rejected",
        }
    }

    /// Operation name, used as a metric label.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::LoginSucceeded { .. } | Self::LoginFailed { .. } => "login",
            Self::TransferSucceeded { .. } | Self::TransferFailed { .. } => "transfer",
            Self::BalanceChecked { .. } | Self::BalanceCheckFailed { .. } => "balance",
            Self::TransactionsViewed { .. } | Self::TransactionsViewFailed { .. } => {
                "transactions"
            }
            Self::LoggedOut | Self::LogoutFailed { .. } => "logout",
            Self::SessionRejected { .. } => "session",
        }
    }

    /// `success` or `failure`.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::LoginFailed { .. }
            | Self::TransferFailed { .. }
            | Self::BalanceCheckFailed { .. }
            | Self::TransactionsViewFailed { .. }
            | Self::LogoutFailed { .. }
            | Self::SessionRejected { .. } => "failure",
            _ => "success",
        }
    }

    /// Structured payload for sinks.
    #[must_use]
    pub fn payload(&self) -> Map<String, Value> {
        let value = match self {
            Self::LoginSucceeded { username } => json!({ "username": username }),
            Self::LoginFailed { username, reason } => {
                json!({ "username": username, "reason": reason })
            }
            Self::TransferSucceeded {
                amount,
                from,
                to,
                new_balance,
                transaction_id,
            } => json!({
                "amount": amount,
                "fromAccount": from,
                "toAccount": to,
                "newBalance": new_balance,
                "transactionId": transaction_id,
            }),
            Self::TransferFailed {
                amount,
                from,
                to,
                reason,
            } => json!({
                "amount": amount,
                "fromAccount": from,
                "toAccount": to,
                "reason": reason,
            }),
            Self::BalanceChecked { account, balance } => {
                json!({ "account": account, "balance": balance })
            }
            Self::BalanceCheckFailed { account, reason } => {
                json!({ "account": account, "reason": reason })
            }
            Self::TransactionsViewed {
                count,
                account_type,
                start_date,
                end_date,
            } => json!({
                "count": count,
                "accountType": account_type,
                "startDate": start_date,
                "endDate": end_date,
            }),
            Self::LoggedOut => json!({}),
            Self::TransactionsViewFailed { reason }
            | Self::LogoutFailed { reason }
            | Self::SessionRejected { reason } => json!({ "reason": reason }),
        };

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Build the telemetry event for this outcome.
    #[must_use]
    pub fn into_telemetry(
        self,
        actor: Actor,
        correlation_id: &str,
        timestamp: DateTime<Utc>,
    ) -> TelemetryEvent {
        TelemetryEvent::new(self.event_type(), timestamp)
            .with_actor(actor)
            .with_correlation_id(correlation_id)
            .with_data(self.payload())
    }
}
