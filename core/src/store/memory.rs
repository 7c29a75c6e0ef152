use super::{LedgerStore, StoreFuture};
use crate::types::LedgerState;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Ledger held in process memory.
///
/// Used by tests and by ephemeral runs without `LEDGER_PATH`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedgerStore {
    /// Create a store holding `state`.
    #[must_use]
    pub fn new(state: LedgerState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load(&self) -> StoreFuture<'_, LedgerState> {
        Box::pin(async move { Ok(self.state.read().await.clone()) })
    }

    fn save<'a>(&'a self, state: &'a LedgerState) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            *self.state.write().await = state.clone();
            Ok(())
        })
    }
}
