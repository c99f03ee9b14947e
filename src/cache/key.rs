//! Cache Key Module
//!
//! Derives the identifier of a request from its endpoint and parameters.

use std::fmt;

use serde::Serialize;

use crate::models::Params;

// == Cache Key ==
/// Identifier of a cached request, rendered as `"{url}:{params}"`.
///
/// Parameters come from a sorted map, so logically identical requests derive the
/// same key regardless of the order their parameters were inserted in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for `url` with `params`.
    pub fn derive(url: &str, params: &Params) -> Self {
        // A map of JSON values always serializes
        let params = serde_json::to_string(params).unwrap_or_else(|_| "{}".to_string());
        CacheKey(format!("{url}:{params}"))
    }

    /// Key for `url` without parameters.
    pub fn for_url(url: &str) -> Self {
        Self::derive(url, &Params::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `pattern` occurs anywhere in the key.
    pub fn contains(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
