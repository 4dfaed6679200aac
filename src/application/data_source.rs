// Data source trait - the collaborators the dashboard store loads from
use crate::domain::inventory::InventoryData;
use crate::domain::market::MarketTrend;
use crate::domain::sales::SalesData;
use crate::domain::selector::{Platform, Timeframe, Warehouse};
use crate::domain::social::SocialMetrics;
use async_trait::async_trait;

#[async_trait]
pub trait DashboardDataSource: Send + Sync {
    /// Revenue totals, trend series and breakdowns for a timeframe
    async fn fetch_sales(&self, timeframe: Timeframe) -> anyhow::Result<SalesData>;

    /// Capacity and per-product stock, narrowed to one warehouse unless `All`
    async fn fetch_inventory(&self, warehouse: Warehouse) -> anyhow::Result<InventoryData>;

    /// Titled market analysis for a free-text query
    async fn fetch_market_trends(&self, query: &str) -> anyhow::Result<MarketTrend>;

    /// Follower, engagement and audience metrics for one or all platforms
    async fn fetch_social_metrics(&self, platform: Platform) -> anyhow::Result<SocialMetrics>;
}
