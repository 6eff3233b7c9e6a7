//! Per-record async mutual exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

/// A map of lazily created `tokio` mutexes, one per record id.
///
/// Holding the guard returned by [`RecordLocks::acquire`] excludes every
/// other holder of the same id; different ids never contend. Entries nobody
/// holds or waits on are pruned on the next acquisition.
///
/// Every component that read-modify-writes records (syncs, edits, reminder
/// bookkeeping) must share one instance.
#[derive(Debug, Default)]
pub struct RecordLocks {
    slots: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl RecordLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until `key` is free and take it.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(key.to_owned()).or_default())
        };
        slot.lock_owned().await
    }

    /// Number of keys currently tracked.
    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
