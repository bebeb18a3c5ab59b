//! Per-key operation serialization.
//!
//! Store operations on one configuration are several dependent round-trips
//! (existence check, read, write); interleaving two of them on the same key
//! loses updates. [`KeyLockRegistry`] hands out one lock per configuration
//! key so same-key operations serialize while different keys never contend.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use crate::domain::ConfigurationKey;


/// Lazily populated map of one mutex per configuration key.
///
/// The registry lock is held only for the lookup-or-insert, never for the
/// duration of the guarded operation. Clones share the underlying map, so
/// components that must serialize against each other can hold clones of one
/// registry.
#[derive(Clone, Default)]
pub struct KeyLockRegistry {
    locks: Arc<Mutex<HashMap<ConfigurationKey, Arc<Mutex<()>>>>>,
}

impl KeyLockRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `operation` while holding the lock for `key`.
    ///
    /// The lock is released when `operation` returns, including by panic.
    /// The lock is not re-entrant: `operation` must not call back into
    /// `with_lock` for the same key.
    pub fn with_lock<T>(&self, key: &ConfigurationKey, operation: impl FnOnce() -> T) -> T {
        let lock = self.lock_for(key);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        operation()
    }

    fn lock_for(&self, key: &ConfigurationKey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key.clone()).or_default())
    }
}
