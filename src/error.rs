//! Error types for the data layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Fetch Error Enum ==
/// Failure of a single backend request.
///
/// Cloneable so that every caller coalesced onto the same in-flight request
/// observes the identical error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Backend answered with a non-success status
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// Transport could not complete (connectivity, abort or deadline)
    #[error("Network error: {message}")]
    Network { message: String, timed_out: bool },

    /// Response body was not valid JSON (or not the expected shape)
    #[error("Malformed response body: {0}")]
    Parse(String),

    /// Endpoint could not be resolved against the base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request options could not be turned into a request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The shared computation died before producing an outcome
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FetchError {
    /// Builds the timeout flavour of [`FetchError::Network`].
    pub fn timeout(message: impl Into<String>) -> Self {
        FetchError::Network {
            message: message.into(),
            timed_out: true,
        }
    }

    /// Returns the HTTP status for [`FetchError::Http`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the transport gave up because of a deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Network { timed_out: true, .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return FetchError::Parse(err.to_string());
        }
        FetchError::Network {
            message: err.to_string(),
            timed_out: err.is_timeout(),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

// == Navigation Error Enum ==
/// Failure of a page transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Partial-content request failed
    #[error("Navigation request failed: {0}")]
    Fetch(#[from] FetchError),

    /// Partial-content body carried an `error` field
    #[error("Server rejected navigation: {0}")]
    Server(String),

    /// The cache manager never became available
    #[error("Cache manager unavailable after {attempts} attempts")]
    ManagerUnavailable { attempts: u32 },
}

// == Result Type Alias ==
/// Convenience Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
