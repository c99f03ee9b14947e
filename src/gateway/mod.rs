//! Fetch Gateway Module
//!
//! Performs the network call behind the cache and normalizes every failure into a
//! [`FetchError`](crate::error::FetchError).

mod http;

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::Result;
use crate::models::{FetchOptions, Params};

pub use http::HttpGateway;

// == Transport ==
/// Something that can turn a URL and options into a JSON payload.
///
/// The HTTP implementation is [`HttpGateway`]; tests substitute in-memory ones.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, url: &str, options: &RequestOptions) -> Result<Value>;
}

// == Request Options ==
/// Transport-level options for one call.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method, GET unless stated otherwise
    pub method: Method,
    /// Headers merged over `Content-Type: application/json`
    pub headers: BTreeMap<String, String>,
    /// Query-string pairs appended to the URL
    pub query: Vec<(String, String)>,
    /// Deadline after which the call is aborted
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: BTreeMap::new(),
            query: Vec::new(),
            timeout: None,
        }
    }
}

impl RequestOptions {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Transport options for a cache-manager fetch.
    pub fn from_fetch_options(options: &FetchOptions) -> Self {
        Self {
            method: Method::GET,
            headers: options.headers.clone(),
            query: query_pairs(&options.params),
            timeout: options.timeout(),
        }
    }
}

/// Renders params as query pairs: strings verbatim, everything else as JSON text.
fn query_pairs(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(name, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (name.clone(), rendered)
        })
        .collect()
}
