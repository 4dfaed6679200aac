// Assistant domain model - spoken commands and metric forecasts
use super::selector::Timeframe;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("command must not be empty")]
    Empty,
}

/// Trim a transcribed command; blank commands are rejected.
pub fn parse_command(s: &str) -> Result<String, CommandError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(CommandError::Empty);
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandIntent {
    SalesSummary,
    InventoryCheck,
    SocialMediaMetrics,
    ScheduleReminder,
    CompetitorAnalysis,
    Unknown,
}

/// Answer to a voice command. `data` carries the figures behind `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandReply {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub intent: CommandIntent,
}

/// Metric a forecast can be requested for. Any other name gets a general
/// performance outlook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMetric {
    Sales,
    Engagement,
    Inventory,
    General,
}

impl ForecastMetric {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "sales" => ForecastMetric::Sales,
            "engagement" => ForecastMetric::Engagement,
            "inventory" => ForecastMetric::Inventory,
            _ => ForecastMetric::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMetric::Sales => "sales",
            ForecastMetric::Engagement => "engagement",
            ForecastMetric::Inventory => "inventory",
            ForecastMetric::General => "general",
        }
    }
}

impl fmt::Display for ForecastMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
    Uncertain,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastFactor {
    pub name: String,
    pub impact: Impact,
    pub direction: Direction,
}

impl ForecastFactor {
    pub fn new(name: &str, impact: Impact, direction: Direction) -> Self {
        Self {
            name: name.to_string(),
            impact,
            direction,
        }
    }
}

/// Projected values for one metric, one point per future period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub metric: String,
    pub period: Timeframe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    #[serde(default)]
    pub forecast: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depletion: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restock: Option<f64>,
    pub confidence: u8,
    pub factors: Vec<ForecastFactor>,
}
