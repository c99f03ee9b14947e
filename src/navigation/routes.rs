//! Route Map
//!
//! Which page paths the navigation layer handles and where their partial content
//! comes from.

use std::collections::BTreeMap;

use reqwest::Url;

use crate::endpoints::{DEFAULT_BANK_CODE, PARTIAL_PREFIX};

/// Mapping from page path to partial-content endpoint.
#[derive(Debug, Clone)]
pub struct RouteMap {
    routes: BTreeMap<String, String>,
    fallback: String,
}

impl Default for RouteMap {
    fn default() -> Self {
        Self::dashboard()
    }
}

impl RouteMap {
    /// The dashboard's pages.
    pub fn dashboard() -> Self {
        let partial = |page: &str| format!("{PARTIAL_PREFIX}/{page}");
        let mut routes = BTreeMap::new();
        routes.insert("/".to_string(), partial("priceboard"));
        for page in ["priceboard", "information", "report", "analytics", "stock"] {
            routes.insert(format!("/{page}"), partial(page));
        }
        Self {
            routes,
            fallback: partial("priceboard"),
        }
    }

    /// Partial-content endpoint for `path`; unknown paths get the priceboard.
    pub fn partial_endpoint(&self, path: &str) -> String {
        if path.starts_with("/stock") {
            let bank_code =
                query_param(path, "bank_code").unwrap_or_else(|| DEFAULT_BANK_CODE.to_string());
            return format!("{PARTIAL_PREFIX}/stock?bank_code={bank_code}");
        }
        self.routes
            .get(path)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// Whether a link to `href` should be handled without a full page load.
    pub fn should_intercept(&self, href: &str) -> bool {
        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("http")
            || href.contains("mailto:")
        {
            return false;
        }
        self.routes.contains_key(href) || href.starts_with("/stock")
    }
}

/// Value of query parameter `name` in a page path such as `/stock?bank_code=VCB`.
pub fn query_param(path: &str, name: &str) -> Option<String> {
    let url = Url::parse("http://localhost").ok()?.join(path).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_endpoints() {
        let routes = RouteMap::dashboard();
        assert_eq!(routes.partial_endpoint("/"), "/api/partial/priceboard");
        assert_eq!(routes.partial_endpoint("/information"), "/api/partial/information");
        assert_eq!(routes.partial_endpoint("/report"), "/api/partial/report");
        assert_eq!(routes.partial_endpoint("/nowhere"), "/api/partial/priceboard");
    }

    #[test]
    fn test_stock_partial_keeps_bank_code() {
        let routes = RouteMap::dashboard();
        assert_eq!(
            routes.partial_endpoint("/stock?bank_code=ACB"),
            "/api/partial/stock?bank_code=ACB"
        );
        assert_eq!(
            routes.partial_endpoint("/stock"),
            "/api/partial/stock?bank_code=VCB"
        );
    }

    #[test]
    fn test_should_intercept() {
        let routes = RouteMap::dashboard();
        assert!(routes.should_intercept("/analytics"));
        assert!(routes.should_intercept("/stock?bank_code=TCB"));
        assert!(!routes.should_intercept("#top"));
        assert!(!routes.should_intercept("https://example.org/analytics"));
        assert!(!routes.should_intercept("mailto:desk@example.org"));
        assert!(!routes.should_intercept("/logout"));
        assert!(!routes.should_intercept(""));
    }

    #[test]
    fn test_query_param() {
        assert_eq!(query_param("/stock?bank_code=VCB", "bank_code").as_deref(), Some("VCB"));
        assert_eq!(query_param("/stock?x=1&bank_code=M%20B", "bank_code").as_deref(), Some("M B"));
        assert_eq!(query_param("/stock", "bank_code"), None);
        assert_eq!(query_param("/stock?bank_code=", "bank_code"), None);
    }
}
