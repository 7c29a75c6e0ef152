//! # Banking Testing
//!
//! Test doubles and fixtures for the banking workspace.
//!
//! This crate provides:
//! - A fixed [`Clock`] for deterministic timestamps
//! - [`RecordingSink`], a telemetry sink that keeps every event it receives
//! - [`FaultyLedgerStore`], an in-memory ledger whose loads or saves can be
//!   made to fail
//! - [`CapturedLogs`], a `tracing` writer that buffers formatted output
//! - [`TestBank`], a demo ledger wired to all of the above
//!
//! ## Example
//!
//! ```ignore
//! use banking_testing::TestBank;
//!
//! #[tokio::test]
//! async fn test_balance() {
//!     let bank = TestBank::new();
//!     let john = bank.sign_in("john_doe").await;
//!     let balance = bank.service.balance(&bank.ctx(), &john, "checking").await.unwrap();
//!     assert_eq!(balance.account_type, "checking");
//! }
//! ```

use banking_core::environment::Clock;
use chrono::{DateTime, Utc};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use banking_core::{InMemoryLedgerStore, LedgerState, LedgerStore, StoreError, StoreFuture};
    use banking_telemetry::{SinkFuture, TelemetryEvent, TelemetrySink};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use banking_testing::mocks::FixedClock;
    /// use banking_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Telemetry sink that keeps every event.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    impl RecordingSink {
        /// Create an empty recorder
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// All events received so far
        #[must_use]
        pub fn events(&self) -> Vec<TelemetryEvent> {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Event types received so far, in order
        #[must_use]
        pub fn event_types(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .map(|event| event.event_type)
                .collect()
        }

        /// Drop everything recorded so far
        pub fn clear(&self) {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }
    }

    impl TelemetrySink for RecordingSink {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn send<'a>(&'a self, event: &'a TelemetryEvent) -> SinkFuture<'a> {
            Box::pin(async move {
                self.events
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(event.clone());
                Ok(())
            })
        }
    }

    /// In-memory ledger with switchable storage failures.
    ///
    /// Healthy until [`fail_loads`](Self::fail_loads) or
    /// [`fail_saves`](Self::fail_saves) is turned on; failing calls return
    /// `StoreError::Io("disk full")` and leave the held state untouched.
    #[derive(Debug, Default)]
    pub struct FaultyLedgerStore {
        inner: InMemoryLedgerStore,
        fail_loads: AtomicBool,
        fail_saves: AtomicBool,
    }

    impl FaultyLedgerStore {
        /// Create a healthy store holding `state`
        #[must_use]
        pub fn new(state: LedgerState) -> Self {
            Self {
                inner: InMemoryLedgerStore::new(state),
                fail_loads: AtomicBool::new(false),
                fail_saves: AtomicBool::new(false),
            }
        }

        /// Make every `load` fail, or stop failing
        pub fn fail_loads(&self, fail: bool) {
            self.fail_loads.store(fail, Ordering::SeqCst);
        }

        /// Make every `save` fail, or stop failing
        pub fn fail_saves(&self, fail: bool) {
            self.fail_saves.store(fail, Ordering::SeqCst);
        }

        fn disk_full() -> StoreError {
            StoreError::Io("disk full".to_string())
        }
    }

    impl LedgerStore for FaultyLedgerStore {
        fn load(&self) -> StoreFuture<'_, LedgerState> {
            if self.fail_loads.load(Ordering::SeqCst) {
                return Box::pin(async { Err(Self::disk_full()) });
            }
            self.inner.load()
        }

        fn save<'a>(&'a self, state: &'a LedgerState) -> StoreFuture<'a, ()> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Box::pin(async { Err(Self::disk_full()) });
            }
            self.inner.save(state)
        }
    }
}

/// Log capture for assertions on `tracing` output.
pub mod logs {
    use std::io;
    use std::sync::{Arc, Mutex, PoisonError};
    use tracing_subscriber::fmt::MakeWriter;

    /// Shared buffer that a fmt subscriber writes into.
    ///
    /// ```ignore
    /// let logs = CapturedLogs::new();
    /// let _guard = tracing::subscriber::set_default(logs.subscriber());
    /// tracing::info!("hello");
    /// assert!(logs.contents().contains("hello"));
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct CapturedLogs {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl CapturedLogs {
        /// Create an empty buffer
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// A subscriber that logs everything at `DEBUG` and above into this
        /// buffer, without ANSI colours.
        #[must_use]
        pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + use<> {
            tracing_subscriber::fmt()
                .with_writer(self.clone())
                .with_ansi(false)
                .with_max_level(tracing::Level::DEBUG)
                .finish()
        }

        /// Everything written so far
        #[must_use]
        pub fn contents(&self) -> String {
            let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
            String::from_utf8_lossy(&buffer).into_owned()
        }
    }

    /// Writer handed out by [`CapturedLogs`].
    #[derive(Debug)]
    pub struct CapturedWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl io::Write for CapturedWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedWriter;

        fn make_writer(&'a self) -> Self::Writer {
            CapturedWriter {
                buffer: Arc::clone(&self.buffer),
            }
        }
    }
}

/// Fixture builders.
pub mod fixtures {
    use super::mocks::{FaultyLedgerStore, RecordingSink, test_clock};
    use banking_core::{
        BankingEnvironment, BankingService, DEMO_PASSWORD, LoginRequest, OperationContext,
        Principal, demo_ledger,
    };
    use banking_telemetry::{Dispatch, TelemetryHub, TelemetrySink};
    use std::sync::Arc;

    /// Demo ledger with inline telemetry into a [`RecordingSink`] and a
    /// fixed clock. The store starts healthy; see [`FaultyLedgerStore`].
    #[derive(Debug, Clone)]
    pub struct TestBank {
        /// Service under test
        pub service: BankingService,
        /// Backing store, for direct inspection
        pub store: Arc<FaultyLedgerStore>,
        /// Every telemetry event emitted
        pub sink: Arc<RecordingSink>,
    }

    impl Default for TestBank {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestBank {
        /// Build the fixture.
        #[must_use]
        pub fn new() -> Self {
            let store = Arc::new(FaultyLedgerStore::new(demo_ledger()));
            let sink = Arc::new(RecordingSink::new());
            let sinks: Vec<Arc<dyn TelemetrySink>> = vec![sink.clone()];
            let hub = TelemetryHub::new(sinks).with_dispatch(Dispatch::Inline);
            let env = BankingEnvironment::new(store.clone(), hub)
                .with_clock(Arc::new(test_clock()));

            Self {
                service: BankingService::new(env),
                store,
                sink,
            }
        }

        /// A fresh request context.
        #[must_use]
        pub fn ctx(&self) -> OperationContext {
            OperationContext::generate()
        }

        /// Log a demo user in and resolve the resulting session.
        ///
        /// # Panics
        ///
        /// Panics if the user is not a demo user.
        #[allow(clippy::expect_used)]
        pub async fn sign_in(&self, username: &str) -> Principal {
            let ctx = self.ctx();
            let login = self
                .service
                .login(
                    &ctx,
                    LoginRequest {
                        username: username.to_string(),
                        password: DEMO_PASSWORD.to_string(),
                    },
                )
                .await
                .expect("demo login should succeed");
            self.service
                .guard()
                .authenticate(&ctx, Some(&login.session_id.to_string()))
                .await
                .expect("fresh session should authenticate")
        }
    }
}

// Re-export commonly used items
pub use fixtures::TestBank;
pub use logs::CapturedLogs;
pub use mocks::{FaultyLedgerStore, FixedClock, RecordingSink, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_captured_logs_collects_output() {
        let logs = CapturedLogs::new();
        tracing::subscriber::with_default(logs.subscriber(), || {
            tracing::info!(event_type = "logout", "captured line");
        });
        let contents = logs.contents();
        assert!(contents.contains("captured line"));
        assert!(contents.contains("logout"));
    }

    #[tokio::test]
    async fn test_faulty_store_fails_on_demand() {
        use banking_core::{LedgerStore, StoreError, demo_ledger};

        let store = FaultyLedgerStore::new(demo_ledger());
        let state = store.load().await.unwrap();

        store.fail_saves(true);
        assert_eq!(
            store.save(&state).await,
            Err(StoreError::Io("disk full".to_string()))
        );
        assert!(store.load().await.is_ok());

        store.fail_loads(true);
        assert!(store.load().await.is_err());
        store.fail_loads(false);
        store.fail_saves(false);
        assert!(store.save(&state).await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_in_records_login_event() {
        let bank = TestBank::new();
        let principal = bank.sign_in("jane_smith").await;
        assert_eq!(principal.name, "Jane Smith");
        assert_eq!(bank.sink.event_types(), vec!["login_success"]);
    }
}
