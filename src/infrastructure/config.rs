use crate::application::dashboard_store::StoreSettings;
use crate::application::dataset_slot::StalePolicy;
use crate::domain::selector::{DEFAULT_TRENDS_QUERY, Platform, Timeframe, Warehouse, parse_trends_query};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

const ENV_PREFIX: &str = "DASHBOARD";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub stale_policy: StalePolicy,
    #[serde(default)]
    pub defaults: SelectorDefaults,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub source: SourceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SelectorDefaults {
    #[serde(default)]
    pub timeframe: Timeframe,
    #[serde(default)]
    pub warehouse: Warehouse,
    #[serde(default = "default_trends_query")]
    pub trends_query: String,
    #[serde(default)]
    pub platform: Platform,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceSettings {
    Fixture {
        #[serde(default = "default_latency_ms")]
        latency_ms: u64,
    },
    N8n {
        webhook_base_url: String,
        #[serde(default)]
        api_key: Option<String>,
    },
}

fn default_refresh_interval_secs() -> u64 {
    300
}

fn default_trends_query() -> String {
    DEFAULT_TRENDS_QUERY.to_string()
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_latency_ms() -> u64 {
    1000
}

impl Default for SelectorDefaults {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::default(),
            warehouse: Warehouse::default(),
            trends_query: default_trends_query(),
            platform: Platform::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings::Fixture {
            latency_ms: default_latency_ms(),
        }
    }
}

impl DashboardConfig {
    pub fn store_settings(&self) -> anyhow::Result<StoreSettings> {
        anyhow::ensure!(
            self.refresh_interval_secs > 0,
            "refresh_interval_secs must be greater than zero"
        );

        Ok(StoreSettings {
            refresh_interval: Duration::from_secs(self.refresh_interval_secs),
            stale_policy: self.stale_policy,
            timeframe: self.defaults.timeframe,
            warehouse: self.defaults.warehouse,
            trends_query: parse_trends_query(&self.defaults.trends_query)?,
            platform: self.defaults.platform,
        })
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Load `config/dashboard.toml` (optional) overlaid with `DASHBOARD__*`
/// environment variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(environment())
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
fn parse_dashboard_config(toml: &str) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(settings.try_deserialize()?)
}
