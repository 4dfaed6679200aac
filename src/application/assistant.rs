// Assistant trait - answers spoken commands and projects metrics forward
use crate::domain::assistant::{CommandReply, Forecast, ForecastMetric};
use crate::domain::selector::Timeframe;
use async_trait::async_trait;

#[async_trait]
pub trait DashboardAssistant: Send + Sync {
    /// Interpret a transcribed command and answer it
    async fn process_command(&self, command: &str) -> anyhow::Result<CommandReply>;

    async fn create_forecast(&self, metric: ForecastMetric, period: Timeframe) -> anyhow::Result<Forecast>;
}
