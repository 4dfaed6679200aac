// Selector domain models - the filter values that drive each dataset load
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_TRENDS_QUERY: &str = "fragrance industry";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("unknown timeframe '{0}' (expected daily, weekly or monthly)")]
    Timeframe(String),
    #[error("unknown warehouse '{0}' (expected all, las-vegas, nice, dubai or riyadh)")]
    Warehouse(String),
    #[error("unknown platform '{0}' (expected all, instagram or tiktok)")]
    Platform(String),
    #[error("market trends query must not be empty")]
    EmptyQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Timeframe::Daily),
            "weekly" => Ok(Timeframe::Weekly),
            "monthly" => Ok(Timeframe::Monthly),
            _ => Err(SelectorError::Timeframe(s.to_string())),
        }
    }
}

/// Warehouse filter for inventory. `All` aggregates every site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Warehouse {
    #[default]
    All,
    LasVegas,
    Nice,
    Dubai,
    Riyadh,
}

impl Warehouse {
    pub const SITES: [Warehouse; 4] = [
        Warehouse::LasVegas,
        Warehouse::Nice,
        Warehouse::Dubai,
        Warehouse::Riyadh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Warehouse::All => "all",
            Warehouse::LasVegas => "las-vegas",
            Warehouse::Nice => "nice",
            Warehouse::Dubai => "dubai",
            Warehouse::Riyadh => "riyadh",
        }
    }
}

impl fmt::Display for Warehouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Warehouse {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Warehouse::All),
            "las-vegas" => Ok(Warehouse::LasVegas),
            "nice" => Ok(Warehouse::Nice),
            "dubai" => Ok(Warehouse::Dubai),
            "riyadh" => Ok(Warehouse::Riyadh),
            _ => Err(SelectorError::Warehouse(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    All,
    Instagram,
    Tiktok,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::All => "all",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Platform::All),
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::Tiktok),
            _ => Err(SelectorError::Platform(s.to_string())),
        }
    }
}

/// Normalize a free-text trends query; blank queries are rejected.
pub fn parse_trends_query(s: &str) -> Result<String, SelectorError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SelectorError::EmptyQuery);
    }
    Ok(trimmed.to_string())
}
