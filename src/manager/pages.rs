//! Page Policy Module
//!
//! Static knowledge of which endpoints each dashboard page depends on: what to
//! warm up before navigating there, what to load once it is shown and which
//! cache keys belong to it.

use std::collections::BTreeMap;

use crate::endpoints;
use crate::navigation::query_param;

/// Page paths with their own entry in the policy table.
pub const PRICEBOARD: &str = "/priceboard";
pub const INFORMATION: &str = "/information";
pub const ANALYTICS: &str = "/analytics";
pub const STOCK: &str = "/stock";

// == Page Policy ==
/// Mapping from page paths to the endpoints they need.
#[derive(Debug, Clone)]
pub struct PagePolicy {
    /// Ordered critical endpoints per page path
    critical: BTreeMap<String, Vec<String>>,
    /// Endpoints warmed once at application start
    startup: Vec<String>,
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self::dashboard()
    }
}

impl PagePolicy {
    /// The financial dashboard's page table.
    pub fn dashboard() -> Self {
        let mut critical = BTreeMap::new();
        critical.insert(
            PRICEBOARD.to_string(),
            vec![
                endpoints::INDEX_SUMMARY.to_string(),
                endpoints::MARKET_CAP.to_string(),
                endpoints::NEWS.to_string(),
            ],
        );
        critical.insert(
            INFORMATION.to_string(),
            vec![endpoints::FINANCIAL_DATA.to_string()],
        );
        critical.insert(
            ANALYTICS.to_string(),
            vec![endpoints::ANALYTICS_DATA.to_string()],
        );
        critical.insert(STOCK.to_string(), vec![endpoints::STOCK_DATA.to_string()]);

        Self {
            critical,
            startup: vec![
                endpoints::NEWS.to_string(),
                endpoints::MARKET_CAP.to_string(),
                endpoints::INDEX_SUMMARY.to_string(),
            ],
        }
    }

    /// Strips the query string and maps the root onto the priceboard.
    pub fn normalize(path: &str) -> &str {
        let path = path.split('?').next().unwrap_or(path);
        match path {
            "" | "/" => PRICEBOARD,
            other => other,
        }
    }

    fn is_stock(path: &str) -> bool {
        path.starts_with(STOCK)
    }

    /// Endpoints to preload before navigating to `path`.
    pub fn critical_endpoints(&self, path: &str) -> &[String] {
        let page = if Self::is_stock(path) {
            STOCK
        } else {
            Self::normalize(path)
        };
        self.critical.get(page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Endpoints to load once `path` is shown.
    ///
    /// Stock pages load the data of the bank named in the path's `bank_code`.
    pub fn page_endpoints(&self, path: &str) -> Vec<String> {
        if Self::is_stock(path) {
            let bank_code = query_param(path, "bank_code")
                .unwrap_or_else(|| endpoints::DEFAULT_BANK_CODE.to_string());
            return vec![endpoints::stock_data(&bank_code)];
        }
        self.critical_endpoints(path).to_vec()
    }

    pub fn startup_endpoints(&self) -> &[String] {
        &self.startup
    }

    /// Key substring owned by `path`: `stock` for stock pages, otherwise the
    /// leading path segment. The root has an empty family.
    pub fn cache_family(path: &str) -> String {
        if Self::is_stock(path) {
            return "stock".to_string();
        }
        path.split('?')
            .next()
            .unwrap_or_default()
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string()
    }

    /// Substrings whose keys are invalidated together with `path`: its family
    /// plus the endpoints the page loads.
    ///
    /// The root owns every key, so its only pattern is the empty one.
    pub fn invalidation_patterns(&self, path: &str) -> Vec<String> {
        let family = Self::cache_family(path);
        if family.is_empty() {
            return vec![family];
        }
        let mut patterns = vec![family];
        for endpoint in self.page_endpoints(path) {
            let endpoint = endpoint.split('?').next().unwrap_or_default().to_string();
            if !patterns.contains(&endpoint) {
                patterns.push(endpoint);
            }
        }
        patterns.retain(|p| !p.is_empty());
        patterns
    }
}
