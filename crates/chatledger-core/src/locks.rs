//! Per-sheet serialization of read-decide-write sequences.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per sheet name (case-insensitive).
#[derive(Debug, Default)]
pub struct SheetLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SheetLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other command holds `sheet`.
    pub async fn acquire(&self, sheet: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.entry(sheet.trim().to_uppercase())
                .or_default()
                .clone()
        };
        lock.lock_owned().await
    }

    pub fn tracked_sheets(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
