//! Ledger persistence.
//!
//! The ledger is read and written wholesale: every operation loads the full
//! [`LedgerState`], mutates it, and saves it back.
//!
//! # Concurrency
//!
//! There is no locking across `load`/modify/`save`. Two concurrent transfers
//! from the same account can both pass the balance check and overdraw it.
//! This is a known gap of the single-process demo ledger and is not fixed
//! here; anything treating this as a template for real money must add a
//! transactional store.

use crate::error::StoreError;
use crate::types::LedgerState;
use std::future::Future;
use std::pin::Pin;

mod json_file;
mod memory;

pub use json_file::JsonFileLedgerStore;
pub use memory::InMemoryLedgerStore;

/// Future returned by [`LedgerStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Persistence for the full ledger state.
///
/// # Dyn Compatibility
///
/// Methods return boxed futures so stores can be held as
/// `Arc<dyn LedgerStore>`.
pub trait LedgerStore: Send + Sync {
    /// Load the current ledger.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read or decoded.
    fn load(&self) -> StoreFuture<'_, LedgerState>;

    /// Replace the persisted ledger.
    ///
    /// A subsequent `load` sees either the previous state or `state`, never
    /// a partial write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the state cannot be encoded or written.
    fn save<'a>(&'a self, state: &'a LedgerState) -> StoreFuture<'a, ()>;
}
