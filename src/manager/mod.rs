//! Cache Manager Module
//!
//! Combines the cache store, the request coalescer and the fetch gateway into the
//! data layer's public API, together with the page-aware preloading policy.

mod accessors;
mod facade;
pub mod pages;
mod readiness;

pub use facade::CacheManager;
pub use pages::PagePolicy;
pub use readiness::{ManagerSlot, WaitPolicy};
