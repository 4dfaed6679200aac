// Dashboard domain model - point-in-time view of every dataset slot
use super::inventory::InventoryData;
use super::market::MarketTrend;
use super::sales::SalesData;
use super::selector::{Platform, Timeframe, Warehouse};
use super::social::SocialMetrics;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// What a consumer sees of one dataset slot.
#[derive(Debug, Serialize)]
pub struct SlotSnapshot<S, T> {
    pub data: Option<Arc<T>>,
    pub loading: bool,
    pub selector: S,
}

// Payloads are shared through the Arc, never deep-cloned
impl<S: Clone, T> Clone for SlotSnapshot<S, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading,
            selector: self.selector.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub sales: SlotSnapshot<Timeframe, SalesData>,
    pub inventory: SlotSnapshot<Warehouse, InventoryData>,
    pub market_trends: SlotSnapshot<String, MarketTrend>,
    pub social_metrics: SlotSnapshot<Platform, SocialMetrics>,
    pub last_refresh: Option<DateTime<Utc>>,
}

impl DashboardSnapshot {
    pub fn any_loading(&self) -> bool {
        self.sales.loading
            || self.inventory.loading
            || self.market_trends.loading
            || self.social_metrics.loading
    }
}
