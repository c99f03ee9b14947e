//! Cache Entry Module
//!
//! Defines a stored response together with the instant it was stored.

use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

// == Cache Entry ==
/// A cached response payload.
///
/// Freshness is not stored; it is derived from `stored_at` at read time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload, passed through unmodified
    pub value: Value,
    /// When the payload was stored
    pub stored_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current instant.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    /// Time elapsed since the entry was stored.
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.stored_at)
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry whose age equals the TTL is already expired.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }

    /// Remaining freshness, zero once expired.
    pub fn ttl_remaining(&self, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.age())
    }
}
