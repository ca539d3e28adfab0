//! Per-key lock registry serializing writers on the same identity key.

use carrel_core::document::DocumentKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Registry size above which unused entries are swept.
const PRUNE_THRESHOLD: usize = 1024;

/// Hands out one async mutex per identity key, so concurrent upserts to the
/// same key linearize while different keys proceed independently.
///
/// Entries are pruned under the registry mutex once nothing outside the map
/// holds them; a lock is never replaced while a writer still holds it.
pub(crate) struct KeyLocks {
    inner: Mutex<HashMap<DocumentKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub fn lock_for(&self, key: &DocumentKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if inner.len() > PRUNE_THRESHOLD {
            inner.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        inner
            .entry(key.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(lane: i32) -> DocumentKey {
        DocumentKey {
            flowcell_barcode: "fc".to_string(),
            lane,
            library_name: "lib".to_string(),
            location: None,
        }
    }

    #[test]
    fn same_key_shares_a_lock() {
        let locks = KeyLocks::new();
        let a = locks.lock_for(&key(1));
        let b = locks.lock_for(&key(1));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_keys_get_distinct_locks() {
        let locks = KeyLocks::new();
        let a = locks.lock_for(&key(1));
        let b = locks.lock_for(&key(2));
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn prune_keeps_held_locks() {
        let locks = KeyLocks::new();
        let held = locks.lock_for(&key(-1));
        for lane in 0..(PRUNE_THRESHOLD as i32 + 2) {
            locks.lock_for(&key(lane));
        }
        // the held entry survived the sweep
        let again = locks.lock_for(&key(-1));
        assert!(Arc::ptr_eq(&held, &again));
    }
}
