//! Request option DTOs
//!
//! Explicit replacement for a free-form options bag: every recognized option is a
//! named field with a default, and unknown fields are rejected on deserialization.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameters of a request.
///
/// A sorted map, so the serialized form is independent of insertion order.
pub type Params = BTreeMap<String, Value>;

/// Scheduling hint attached to a fetch.
///
/// Advisory only: the coalescer serves callers first-come-first-served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// Options for a single cache-manager fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchOptions {
    /// Query parameters; part of the cache key
    pub params: Params,
    /// Skip the freshness check (still coalesces with an in-flight call)
    pub force_refresh: bool,
    /// Mark the resulting key as preload-origin in stats
    pub preload: bool,
    /// Advisory scheduling hint
    pub priority: Priority,
    /// Extra request headers, merged over the JSON default
    pub headers: BTreeMap<String, String>,
    /// Per-request deadline in milliseconds
    pub timeout_ms: Option<u64>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options used by low-priority cache warm-up fetches.
    pub fn preload() -> Self {
        Self {
            preload: true,
            priority: Priority::Low,
            ..Self::default()
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Deadline as a [`Duration`], if one was set.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

// == Endpoint ==
/// One entry of a batch fetch: a bare URL or a URL with its own options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    Url(String),
    WithOptions { url: String, options: FetchOptions },
}

impl Endpoint {
    pub fn with_options(url: impl Into<String>, options: FetchOptions) -> Self {
        Endpoint::WithOptions {
            url: url.into(),
            options,
        }
    }

    /// Splits into URL and options, defaulting the options for bare URLs.
    pub fn into_parts(self) -> (String, FetchOptions) {
        match self {
            Endpoint::Url(url) => (url, FetchOptions::default()),
            Endpoint::WithOptions { url, options } => (url, options),
        }
    }
}

impl From<&str> for Endpoint {
    fn from(url: &str) -> Self {
        Endpoint::Url(url.to_string())
    }
}

impl From<String> for Endpoint {
    fn from(url: String) -> Self {
        Endpoint::Url(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let opts = FetchOptions::default();
        assert!(opts.params.is_empty());
        assert!(!opts.force_refresh);
        assert!(!opts.preload);
        assert_eq!(opts.priority, Priority::Normal);
        assert!(opts.timeout().is_none());
    }

    #[test]
    fn test_options_deserialize_partial() {
        let json = r#"{"force_refresh": true, "params": {"bank_code": "VCB"}, "priority": "low"}"#;
        let opts: FetchOptions = serde_json::from_str(json).unwrap();
        assert!(opts.force_refresh);
        assert!(!opts.preload);
        assert_eq!(opts.priority, Priority::Low);
        assert_eq!(opts.params["bank_code"], "VCB");
    }

    #[test]
    fn test_options_reject_unknown_fields() {
        let json = r#"{"forceRefresh": true}"#;
        assert!(serde_json::from_str::<FetchOptions>(json).is_err());
    }

    #[test]
    fn test_preload_options() {
        let opts = FetchOptions::preload();
        assert!(opts.preload);
        assert_eq!(opts.priority, Priority::Low);
    }

    #[test]
    fn test_timeout_roundtrip() {
        let opts = FetchOptions::new().with_timeout(Duration::from_secs(10));
        assert_eq!(opts.timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_endpoint_deserialize_both_shapes() {
        let json = r#"["/api/news", {"url": "/api/stock/data", "options": {"params": {"bank_code": "ACB"}}}]"#;
        let endpoints: Vec<Endpoint> = serde_json::from_str(json).unwrap();
        assert_eq!(endpoints[0], Endpoint::from("/api/news"));
        let (url, opts) = endpoints[1].clone().into_parts();
        assert_eq!(url, "/api/stock/data");
        assert_eq!(opts.params["bank_code"], "ACB");
    }
}
