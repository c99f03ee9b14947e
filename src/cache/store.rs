//! Cache Store Module
//!
//! Time-bounded key-value storage with expiry checked at read time.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheKey, CacheStats};

// == Cache Store ==
/// Session-scoped response storage.
///
/// There is no background sweep and no size bound: a stale entry stays until it
/// is read, invalidated or cleared.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<CacheKey, CacheEntry>,
    /// Keys populated by a preload fetch
    preloaded: HashSet<CacheKey>,
    /// Read counters
    stats: CacheStats,
    /// Freshness window
    ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store whose entries stay fresh for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            preloaded: HashSet::new(),
            stats: CacheStats::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Get ==
    /// Returns the value for `key` if present and fresh.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get(&mut self, key: &CacheKey) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_expired(self.ttl) => true,
            Some(entry) => {
                self.stats.record_hit();
                return Some(entry.value.clone());
            }
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_expiration();
        } else {
            self.stats.record_miss();
        }
        None
    }

    // == Set ==
    /// Stores `value` under `key`, overwriting and restamping any previous entry.
    pub fn set(&mut self, key: CacheKey, value: Value) {
        self.entries.insert(key, CacheEntry::new(value));
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was present.
    pub fn delete(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry and every preload marker.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.preloaded.clear();
    }

    // == Remove Matching ==
    /// Removes every key containing `pattern` as a substring.
    ///
    /// Returns the number of entries removed.
    pub fn remove_matching(&mut self, pattern: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.contains(pattern));
        before - self.entries.len()
    }

    /// Current keys, sorted.
    pub fn keys(&self) -> Vec<CacheKey> {
        let mut keys: Vec<CacheKey> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Records that `key` was populated by a preload fetch.
    pub fn mark_preloaded(&mut self, key: CacheKey) {
        self.preloaded.insert(key);
    }

    pub fn is_preloaded(&self, key: &CacheKey) -> bool {
        self.preloaded.contains(key)
    }

    // == Stats ==
    /// Returns a diagnostic snapshot.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.size = self.entries.len();
        stats.preloaded_items = self.preloaded.len();
        stats.keys = self.keys().into_iter().map(|k| k.to_string()).collect();
        stats
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
