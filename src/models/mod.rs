//! Request and response models for the data layer
//!
//! This module defines the option structs callers pass to the cache manager and
//! the payload shapes the navigation layer reads from the backend.

pub mod options;
pub mod responses;

// Re-export commonly used types
pub use options::{Endpoint, FetchOptions, Params, Priority};
pub use responses::PartialContent;
