//! Dashboard Cache - client-side data layer for a financial dashboard
//!
//! Caches backend responses with a freshness window, coalesces concurrent
//! requests for the same data into one network call, and preloads the data a
//! page needs as the user navigates between pages.

pub mod cache;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod gateway;
pub mod manager;
pub mod models;
pub mod navigation;
pub mod session;
pub mod tasks;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::CacheStats;
pub use config::Config;
pub use error::{FetchError, NavigationError};
pub use gateway::{HttpGateway, RequestOptions, Transport};
pub use manager::CacheManager;
pub use models::{Endpoint, FetchOptions, Params};
pub use navigation::{NavigationController, NavigationEvent};
pub use session::Session;
