//! Cache Module
//!
//! In-memory response caching with lazy TTL expiry and single-flight request
//! coalescing.

mod coalescer;
mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use coalescer::{Admission, FetchOutcome, RequestCoalescer, SharedFetch};
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default freshness window of a cached response
pub const DEFAULT_TTL: std::time::Duration = std::time::Duration::from_secs(5 * 60);
