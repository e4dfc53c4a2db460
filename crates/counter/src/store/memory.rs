//! In-memory backend for tests and ephemeral (no data file) deployments.

use std::sync::{Mutex, PoisonError};

use super::{BackendError, OrderBackend, StoredState};

/// Keeps the persisted document in memory; contents are lost on restart.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<StoredState>,
}

impl OrderBackend for MemoryBackend {
    fn load(&self) -> Result<StoredState, BackendError> {
        Ok(self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, state: &StoredState) -> Result<(), BackendError> {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state.clone();
        Ok(())
    }
}
