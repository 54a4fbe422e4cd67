//! Per-account mutual exclusion.

use crate::account::AccountId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// One lock per account, created on first use and dropped once no caller
/// holds or waits on it.
///
/// Closures run under [`with_account`](Self::with_account) for the same
/// account never overlap; different accounts do not block each other.
#[derive(Debug, Default)]
pub struct AccountLocks {
    slots: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the lock for `account_id`.
    pub fn with_account<T>(&self, account_id: AccountId, f: impl FnOnce() -> T) -> T {
        let slot = {
            // Guarded values are `()`, so a poisoned lock carries no broken state.
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(account_id).or_default())
        };

        let result = {
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };

        // Slots are only cloned under the registry lock, so a count of two
        // (the map and this caller) means nobody else is holding or waiting.
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(&slot) == 2 {
            slots.remove(&account_id);
        }
        result
    }
}
