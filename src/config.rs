//! Configuration Module
//!
//! Handles loading the data-layer configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_TTL;

/// Default backend origin used when `DASHBOARD_API_BASE` is not set.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Data-layer configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend origin that relative endpoints are resolved against
    pub base_url: String,
    /// How long a cached response stays fresh
    pub ttl: Duration,
    /// Deadline for data fetches, None = no deadline
    pub request_timeout: Option<Duration>,
    /// Deadline for partial-content navigation fetches
    pub navigation_timeout: Duration,
    /// Poll interval while waiting for the cache manager to come up
    pub manager_wait_interval: Duration,
    /// Poll attempts before giving up on the cache manager
    pub manager_wait_attempts: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DASHBOARD_API_BASE` - Backend origin (default: http://127.0.0.1:8000)
    /// - `CACHE_TTL_SECS` - Cache freshness window in seconds (default: 300)
    /// - `REQUEST_TIMEOUT_SECS` - Data fetch deadline in seconds (default: none)
    /// - `NAVIGATION_TIMEOUT_SECS` - Navigation fetch deadline in seconds (default: 10)
    /// - `MANAGER_WAIT_INTERVAL_MS` - Readiness poll interval (default: 50)
    /// - `MANAGER_WAIT_ATTEMPTS` - Readiness poll attempts (default: 100)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("DASHBOARD_API_BASE").unwrap_or(defaults.base_url),
            ttl: env_parse("CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.ttl),
            request_timeout: env_parse("REQUEST_TIMEOUT_SECS").map(Duration::from_secs),
            navigation_timeout: env_parse("NAVIGATION_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.navigation_timeout),
            manager_wait_interval: env_parse("MANAGER_WAIT_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.manager_wait_interval),
            manager_wait_attempts: env_parse("MANAGER_WAIT_ATTEMPTS")
                .unwrap_or(defaults.manager_wait_attempts),
        }
    }

    /// Overrides the backend origin.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the freshness window.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    parse_value(env::var(name).ok())
}

/// Parses a raw variable; out-of-range or malformed values count as unset.
fn parse_value<T: FromStr>(raw: Option<String>) -> Option<T> {
    raw.and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            ttl: DEFAULT_TTL,
            request_timeout: None,
            navigation_timeout: Duration::from_secs(10),
            manager_wait_interval: Duration::from_millis(50),
            manager_wait_attempts: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.ttl, DEFAULT_TTL);
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert!(config.request_timeout.is_none());
        assert_eq!(config.navigation_timeout, Duration::from_secs(10));
        assert_eq!(config.manager_wait_interval, Duration::from_millis(50));
        assert_eq!(config.manager_wait_attempts, 100);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("DASHBOARD_API_BASE");
        env::remove_var("CACHE_TTL_SECS");
        env::remove_var("REQUEST_TIMEOUT_SECS");
        env::remove_var("NAVIGATION_TIMEOUT_SECS");
        env::remove_var("MANAGER_WAIT_INTERVAL_MS");
        env::remove_var("MANAGER_WAIT_ATTEMPTS");

        let config = Config::from_env();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert!(config.request_timeout.is_none());
        assert_eq!(config.navigation_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_parse_value_rejects_out_of_range() {
        assert_eq!(parse_value::<u32>(Some("7".to_string())), Some(7));
        assert_eq!(parse_value::<u32>(Some(" 12 ".to_string())), Some(12));
        assert_eq!(parse_value::<u32>(Some("4294967296".to_string())), None);
        assert_eq!(parse_value::<u32>(Some("-1".to_string())), None);
        assert_eq!(parse_value::<u64>(Some("soon".to_string())), None);
        assert_eq!(parse_value::<u64>(None), None);
    }

    #[test]
    fn test_config_builders() {
        let config = Config::default()
            .with_base_url("http://backend:9000")
            .with_ttl(Duration::from_secs(1));
        assert_eq!(config.base_url, "http://backend:9000");
        assert_eq!(config.ttl, Duration::from_secs(1));
    }
}
