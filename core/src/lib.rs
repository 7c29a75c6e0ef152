//! # Banking Core
//!
//! Ledger, session guard and banking operations.
//!
//! ## Flow
//!
//! A request resolves its session through the [`SessionGuard`], then calls
//! one [`BankingService`] operation. The operation loads the ledger from the
//! injected [`LedgerStore`], validates and mutates it, saves it, and emits
//! exactly one [`OperationEvent`] to the telemetry hub.
//!
//! ## Dependency injection
//!
//! - [`LedgerStore`]: persistence (`InMemoryLedgerStore`, `JsonFileLedgerStore`)
//! - [`environment::Clock`]: time source
//! - [`banking_telemetry::TelemetryHub`]: event fan-out
//!
//! All three live in a [`BankingEnvironment`].
//!
//! ## Example
//!
//! ```ignore
//! use banking_core::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryLedgerStore::new(demo_ledger()));
//! let service = BankingService::new(BankingEnvironment::new(store, TelemetryHub::disabled()));
//! let ctx = OperationContext::generate();
//!
//! let login = service
//!     .login(&ctx, LoginRequest { username: "john_doe".into(), password: "password123".into() })
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod error;
pub mod events;
pub mod filter;
pub mod messages;
pub mod seed;
pub mod service;
pub mod session;
pub mod store;
pub mod types;

pub use banking_telemetry::TelemetryHub;
pub use context::{BankingEnvironment, OperationContext};
pub use error::{BankingError, ErrorKind, StoreError};
pub use events::OperationEvent;
pub use filter::TransactionFilter;
pub use messages::{
    BalanceResponse, LoginRequest, LoginResponse, LogoutResponse, TransactionsResponse,
    TransferRequest, TransferResponse,
};
pub use seed::{DEMO_PASSWORD, demo_ledger};
pub use service::BankingService;
pub use session::{Principal, SessionGuard, SessionRejection};
pub use store::{InMemoryLedgerStore, JsonFileLedgerStore, LedgerStore, StoreFuture};
pub use types::{
    Account, LedgerState, Session, SessionId, TransactionId, TransactionRecord, User, UserId,
    UserSummary,
};

/// Environment traits for dependency injection.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
