//! Response DTOs read from the backend
//!
//! Data endpoints are passed through as opaque JSON; only the partial-content
//! payload used for page transitions has a known shape.

use serde::{Deserialize, Serialize};

/// Body of a partial-content response (one per logical page).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialContent {
    /// Markup for the main content area
    #[serde(default)]
    pub content: String,
    /// Page title to apply after the swap
    #[serde(default)]
    pub title: Option<String>,
    /// Inline scripts shipped with the fragment
    #[serde(default)]
    pub scripts: Option<String>,
    /// Server-side failure message; a present value aborts the navigation
    #[serde(default)]
    pub error: Option<String>,
}
