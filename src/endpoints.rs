//! Backend endpoint paths
//!
//! JSON data endpoints consumed by the dashboard views, plus the partial-content
//! endpoints the navigation layer swaps page bodies from.

pub const NEWS: &str = "/api/news";
pub const MARKET_CAP: &str = "/api/market-cap";
pub const INDEX_SUMMARY: &str = "/api/index/all";
pub const FINANCIAL_DATA: &str = "/api/financial/data";
pub const FINANCIAL_CHART_DATA: &str = "/api/financial/chart-data";
pub const TOTAL_CAPITAL: &str = "/api/capital/total";
pub const ANALYTICS_DATA: &str = "/api/analytics/data";
pub const STOCK_DATA: &str = "/api/stock/data";
pub const DASHBOARD_BATCH: &str = "/api/batch/dashboard-data";

pub const PARTIAL_PREFIX: &str = "/api/partial";

/// Bank code used when a stock page path does not name one.
pub const DEFAULT_BANK_CODE: &str = "VCB";

pub fn news_by_id(id: impl std::fmt::Display) -> String {
    format!("{NEWS}/{id}")
}

pub fn financial_chart(line_item_id: impl std::fmt::Display) -> String {
    format!("{FINANCIAL_CHART_DATA}/{line_item_id}")
}

pub fn stock_data(bank_code: &str) -> String {
    format!("{STOCK_DATA}?bank_code={bank_code}")
}
