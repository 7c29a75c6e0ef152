//! Request and response bodies of the banking operations.

use crate::types::{SessionId, TransactionRecord, UserSummary};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_source_account() -> String {
    "checking".to_string()
}

/// Login credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub username: String,
    /// Plaintext password
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Session id to send with protected requests
    pub session_id: SessionId,
    /// The logged-in user, without credentials
    pub user: UserSummary,
}

/// Move money between two of the caller's accounts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Amount to move; must be positive
    pub amount: Decimal,
    /// Destination account kind
    pub to_account: String,
    /// Source account kind
    #[serde(default = "default_source_account")]
    pub from_account: String,
}

/// Successful transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    /// Always `true`
    pub success: bool,
    /// Source balance after the debit
    pub new_balance: Decimal,
    /// Display name of the destination account
    pub to_account_name: String,
}

/// Balance of one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    /// Current balance
    pub balance: Decimal,
    /// Display name
    pub account_name: String,
    /// Account kind
    pub account_type: String,
}

/// Transaction history, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsResponse {
    /// Matching records
    pub transactions: Vec<TransactionRecord>,
}

/// Result of a logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Always `true`
    pub success: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_source_defaults_to_checking() {
        let request: TransferRequest =
            serde_json::from_str(r#"{"amount": 100, "toAccount": "savings"}"#).unwrap();
        assert_eq!(request.from_account, "checking");
        assert_eq!(request.amount, Decimal::from(100));
    }

    #[test]
    fn test_fractional_amounts_parse() {
        let request: TransferRequest = serde_json::from_str(
            r#"{"amount": 12.5, "toAccount": "checking", "fromAccount": "savings"}"#,
        )
        .unwrap();
        assert_eq!(request.amount, Decimal::new(125, 1));
        assert_eq!(request.from_account, "savings");
    }
}
