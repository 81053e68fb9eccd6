//! Cache Overlay Module
//!
//! In-memory map of decoded values layered over the durable index.
//!
//! ## Responsibilities
//! - Hold pending writes until the next commit drains them
//! - Memoize values already decoded from the value log
//! - Win over the index on key collisions (most recent write rules)
//!
//! An entry here is either not yet durable or durable-but-materialized;
//! the overlay cannot tell the two apart, and does not need to: a
//! commit rewrites the union of overlay and durable data, then clears
//! the overlay entirely.

use std::collections::btree_map;
use std::collections::BTreeMap;

/// Key → decoded value overlay
#[derive(Debug)]
pub struct CacheOverlay<V> {
    entries: BTreeMap<String, V>,
}

impl<V> CacheOverlay<V> {
    /// Create an empty overlay
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert or replace; later writes to the same key simply win
    pub fn insert(&mut self, key: String, value: V) {
        self.entries.insert(key, value);
    }

    /// Remove a key; absent keys are a no-op
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Bulk insert from any (key, value) source
    pub fn extend(&mut self, entries: impl IntoIterator<Item = (String, V)>) {
        self.entries.extend(entries);
    }

    /// (key, value) pairs in key order
    pub fn iter(&self) -> btree_map::Iter<'_, String, V> {
        self.entries.iter()
    }
}

impl<V> Default for CacheOverlay<V> {
    fn default() -> Self {
        Self::new()
    }
}
