//! Memoization Cache Module
//!
//! Concurrent map of decoded values that can never change once stored.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

// == Memo Cache ==
/// Insert-only map guarded by a reader/writer lock.
///
/// Entries are never overwritten or evicted.
#[derive(Debug)]
pub struct MemoCache<V> {
    entries: RwLock<HashMap<String, Arc<V>>>,
}

impl<V> MemoCache<V> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Looks up `key` under the shared lock.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.entries.read().get(key).cloned()
    }

    /// Stores `value` unless `key` is already present.
    ///
    /// Returns the value held by the cache afterwards.
    pub fn insert_if_absent(&self, key: &str, value: V) -> Arc<V> {
        let mut entries = self.entries.write();
        entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(value))
            .clone()
    }

    /// Returns the number of cached values.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<V> Default for MemoCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
