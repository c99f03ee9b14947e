//! Cache Statistics Module
//!
//! Diagnostic snapshot of the cache: size, preload markers, keys and counters.

use serde::Serialize;

// == Cache Stats ==
/// Diagnostic view of the cache. Not used for any caching decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of stored entries (fresh or not yet evicted)
    pub size: usize,
    /// Number of keys populated by a preload fetch
    pub preloaded_items: usize,
    /// Every stored key, sorted
    pub keys: Vec<String>,
    /// Reads answered from a fresh entry
    pub hits: u64,
    /// Reads that found no usable entry
    pub misses: u64,
    /// Entries evicted lazily because they were read after expiring
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// An expired read is both a miss and an eviction.
    pub fn record_expiration(&mut self) {
        self.misses += 1;
        self.expirations += 1;
    }
}
