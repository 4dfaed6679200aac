// Market trend domain model
use serde::{Deserialize, Serialize};

/// Analysis result for a trends query. `data` is keyed by the matched topic
/// and has no fixed schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTrend {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub data: serde_json::Value,
}
