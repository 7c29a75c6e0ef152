//! Error types for banking operations and ledger storage.

use thiserror::Error;

/// Errors raised by a [`LedgerStore`](crate::store::LedgerStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The persisted ledger could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Broad class of a [`BankingError`], used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was well-formed but its content is unacceptable
    Validation,
    /// The caller is not (or could not be) authenticated
    Authentication,
    /// The ledger could not be read or written
    Storage,
}

/// Errors returned by banking operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BankingError {
    /// Transfer amount was zero or negative.
    #[error("Transfer amount must be greater than zero")]
    InvalidAmount,

    /// The source account kind does not exist for the user.
    #[error("Invalid source account: {0}")]
    InvalidSourceAccount(String),

    /// The destination account kind does not exist for the user,
    /// or is the same as the source.
    #[error("Invalid destination account: {0}")]
    InvalidDestinationAccount(String),

    /// The source balance does not cover the amount.
    #[error("Insufficient funds in {account}")]
    InsufficientFunds {
        /// Source account kind
        account: String,
    },

    /// Balance requested for an account kind the user does not hold.
    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    /// Username or password did not match.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No usable session accompanied the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// The ledger store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BankingError {
    /// Stable machine-readable reason, used in response bodies and telemetry.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InvalidSourceAccount(_) => "INVALID_SOURCE_ACCOUNT",
            Self::InvalidDestinationAccount(_) => "INVALID_DESTINATION_ACCOUNT",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::InvalidAccount(_) => "INVALID_ACCOUNT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Store(_) => "STORAGE_ERROR",
        }
    }

    /// Which class of failure this is.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount
            | Self::InvalidSourceAccount(_)
            | Self::InvalidDestinationAccount(_)
            | Self::InsufficientFunds { .. }
            | Self::InvalidAccount(_) => ErrorKind::Validation,
            Self::InvalidCredentials | Self::Unauthenticated => ErrorKind::Authentication,
            Self::Store(_) => ErrorKind::Storage,
        }
    }
}

/// Result alias for banking operations.
pub type Result<T> = std::result::Result<T, BankingError>;
