//! Thread-safe handle for multi-threaded hosts.
//!
//! One exclusive lock guards the whole store, so no other thread can ever
//! observe a cascade half-applied.

use crate::{EntityStore, StoreError};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<EntityStore>>,
}

impl SharedStore {
    #[must_use]
    pub fn new(store: EntityStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, EntityStore>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Run a read-only closure under the lock.
    pub fn read<T>(&self, f: impl FnOnce(&EntityStore) -> T) -> Result<T, StoreError> {
        Ok(f(&*self.lock()?))
    }

    /// Run a mutating closure under the lock.
    pub fn write<T>(&self, f: impl FnOnce(&mut EntityStore) -> T) -> Result<T, StoreError> {
        Ok(f(&mut *self.lock()?))
    }
}

impl From<EntityStore> for SharedStore {
    fn from(store: EntityStore) -> Self {
        Self::new(store)
    }
}
