//! HTTP Gateway
//!
//! reqwest-backed [`Transport`] talking to the dashboard backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use super::{RequestOptions, Transport};
use crate::config::Config;
use crate::error::{FetchError, Result};

/// Calls the backend over HTTP and decodes JSON bodies.
///
/// Relative endpoints such as `/api/news` are resolved against `base_url`. There
/// is no retry: every failure is returned to the caller as-is.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    default_timeout: Option<Duration>,
}

impl HttpGateway {
    /// Creates a gateway for the backend at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
        let client = Client::builder()
            .build()
            .map_err(|e| FetchError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            default_timeout: None,
        })
    }

    /// Creates a gateway for the backend named in `config`, applying its data
    /// fetch deadline.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.base_url)?.with_default_timeout(config.request_timeout))
    }

    /// Applies `timeout` to every call that does not set its own.
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `url` against the base unless it is already absolute.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        match Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(_) => self
                .base_url
                .join(url)
                .map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}"))),
        }
    }

    fn headers(options: &RequestOptions) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FetchError::InvalidRequest(format!("header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| FetchError::InvalidRequest(format!("header value {value:?}: {e}")))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl Transport for HttpGateway {
    async fn call(&self, url: &str, options: &RequestOptions) -> Result<Value> {
        let target = self.resolve(url)?;
        let headers = Self::headers(options)?;

        let mut request = self
            .client
            .request(options.method.clone(), target)
            .headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(timeout) = options.timeout.or(self.default_timeout) {
            request = request.timeout(timeout);
        }

        debug!(url, method = %options.method, "sending request");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_endpoint() {
        let gateway = HttpGateway::new("http://127.0.0.1:8000").unwrap();
        let url = gateway.resolve("/api/news/42").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/news/42");
    }

    #[test]
    fn test_resolve_keeps_query_string() {
        let gateway = HttpGateway::new("http://127.0.0.1:8000").unwrap();
        let url = gateway.resolve("/api/stock/data?bank_code=VCB").unwrap();
        assert_eq!(url.query(), Some("bank_code=VCB"));
    }

    #[test]
    fn test_resolve_absolute_endpoint() {
        let gateway = HttpGateway::new("http://127.0.0.1:8000").unwrap();
        let url = gateway.resolve("https://example.org/api/news").unwrap();
        assert_eq!(url.host_str(), Some("example.org"));
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            request_timeout: Some(Duration::from_secs(3)),
            ..Config::default().with_base_url("http://backend:9000")
        };
        let gateway = HttpGateway::from_config(&config).unwrap();
        assert_eq!(gateway.base_url().as_str(), "http://backend:9000/");
        assert_eq!(gateway.default_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpGateway::new("not a url"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_headers_merge_over_json_default() {
        let opts = RequestOptions::default().with_header("X-Requested-With", "XMLHttpRequest");
        let headers = HttpGateway::headers(&opts).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers["x-requested-with"], "XMLHttpRequest");
    }

    #[test]
    fn test_caller_can_override_content_type() {
        let opts = RequestOptions::default().with_header("Content-Type", "text/plain");
        let headers = HttpGateway::headers(&opts).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let opts = RequestOptions::default().with_header("bad header", "x");
        assert!(matches!(
            HttpGateway::headers(&opts),
            Err(FetchError::InvalidRequest(_))
        ));
    }
}
