//! Typed shortcuts for the dashboard's common endpoints.

use std::fmt::Display;

use serde_json::Value;

use crate::endpoints;
use crate::error::Result;
use crate::manager::CacheManager;
use crate::models::FetchOptions;

impl CacheManager {
    pub async fn news(&self) -> Result<Value> {
        self.fetch(endpoints::NEWS, FetchOptions::new()).await
    }

    pub async fn news_by_id(&self, id: impl Display) -> Result<Value> {
        self.fetch(&endpoints::news_by_id(id), FetchOptions::new())
            .await
    }

    pub async fn market_cap(&self) -> Result<Value> {
        self.fetch(endpoints::MARKET_CAP, FetchOptions::new()).await
    }

    /// Snapshot of every market index.
    pub async fn indices(&self) -> Result<Value> {
        self.fetch(endpoints::INDEX_SUMMARY, FetchOptions::new())
            .await
    }

    /// Chart series for one financial line item.
    pub async fn financial_chart(&self, line_item_id: impl Display) -> Result<Value> {
        self.fetch(&endpoints::financial_chart(line_item_id), FetchOptions::new())
            .await
    }

    /// Total capital for a line item in a given quarter.
    pub async fn total_capital(&self, year: i32, quarter: u8, line_item_id: i64) -> Result<Value> {
        let options = FetchOptions::new()
            .with_param("year", year)
            .with_param("quarter", quarter)
            .with_param("line_item_id", line_item_id);
        self.fetch(endpoints::TOTAL_CAPITAL, options).await
    }

    /// Bundle of the priceboard's datasets in one response.
    pub async fn dashboard_data(&self) -> Result<Value> {
        self.fetch(endpoints::DASHBOARD_BATCH, FetchOptions::new())
            .await
    }
}
