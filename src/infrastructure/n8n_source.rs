// n8n data source - dataset workflows exposed as n8n webhooks
use crate::application::assistant::DashboardAssistant;
use crate::application::data_source::DashboardDataSource;
use crate::domain::assistant::{CommandReply, Forecast, ForecastMetric};
use crate::domain::inventory::InventoryData;
use crate::domain::market::MarketTrend;
use crate::domain::sales::SalesData;
use crate::domain::selector::{Platform, Timeframe, Warehouse};
use crate::domain::social::SocialMetrics;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

const SALES_WORKFLOW: &str = "woocommerce-sales-data";
const INVENTORY_WORKFLOW: &str = "woocommerce-inventory";
const MARKET_TRENDS_WORKFLOW: &str = "grok-market-trends";
const SOCIAL_WORKFLOW: &str = "social-media-metrics";
const ASSISTANT_WORKFLOW: &str = "grok-integration";

#[derive(Debug, Clone)]
pub struct N8nDataSource {
    client: reqwest::Client,
    webhook_base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorkflowResponse<T> {
    data: T,
}

/// Envelope returned by the market analysis workflow.
#[derive(Debug, Deserialize)]
struct TrendAnalysis {
    results: MarketTrend,
}

/// Envelope returned by the assistant workflow for a command.
#[derive(Debug, Deserialize)]
struct CommandEnvelope {
    response: CommandReply,
}

#[derive(Debug, Deserialize)]
struct ForecastEnvelope {
    forecast: Forecast,
}

impl N8nDataSource {
    pub fn new(webhook_base_url: String, api_key: Option<String>) -> Self {
        let mut webhook_base_url = webhook_base_url.trim_end_matches('/').to_string();
        webhook_base_url.push('/');

        Self {
            client: reqwest::Client::new(),
            webhook_base_url,
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    fn webhook_url(&self, workflow: &str) -> String {
        format!("{}{}", self.webhook_base_url, workflow)
    }

    async fn execute_workflow<T: DeserializeOwned>(&self, workflow: &str, parameters: Value) -> Result<T> {
        let url = self.webhook_url(workflow);
        tracing::debug!("Executing n8n workflow {} with parameters {}", workflow, parameters);

        let mut request = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(&json!({ "parameters": parameters }));

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send request to n8n workflow {}", workflow))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("n8n workflow {} failed with status {}: {}", workflow, status, body);
        }

        let payload = response
            .json::<WorkflowResponse<T>>()
            .await
            .with_context(|| format!("Failed to parse n8n workflow {} response", workflow))?;

        Ok(payload.data)
    }
}

#[async_trait]
impl DashboardDataSource for N8nDataSource {
    async fn fetch_sales(&self, timeframe: Timeframe) -> Result<SalesData> {
        self.execute_workflow(SALES_WORKFLOW, json!({ "timeframe": timeframe }))
            .await
    }

    async fn fetch_inventory(&self, warehouse: Warehouse) -> Result<InventoryData> {
        self.execute_workflow(INVENTORY_WORKFLOW, json!({ "warehouse": warehouse }))
            .await
    }

    async fn fetch_market_trends(&self, query: &str) -> Result<MarketTrend> {
        let analysis: TrendAnalysis = self
            .execute_workflow(MARKET_TRENDS_WORKFLOW, json!({ "query": query }))
            .await?;
        Ok(analysis.results)
    }

    async fn fetch_social_metrics(&self, platform: Platform) -> Result<SocialMetrics> {
        self.execute_workflow(SOCIAL_WORKFLOW, json!({ "platform": platform }))
            .await
    }
}

#[async_trait]
impl DashboardAssistant for N8nDataSource {
    async fn process_command(&self, command: &str) -> Result<CommandReply> {
        let envelope: CommandEnvelope = self
            .execute_workflow(ASSISTANT_WORKFLOW, json!({ "task": "command", "command": command }))
            .await?;
        Ok(envelope.response)
    }

    async fn create_forecast(&self, metric: ForecastMetric, period: Timeframe) -> Result<Forecast> {
        let envelope: ForecastEnvelope = self
            .execute_workflow(
                ASSISTANT_WORKFLOW,
                json!({ "task": "forecast", "metric": metric, "period": period }),
            )
            .await?;
        Ok(envelope.forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assistant::CommandIntent;

    #[test]
    fn test_webhook_url_normalizes_trailing_slash() {
        let source = N8nDataSource::new("http://localhost:5678/webhook".to_string(), None);
        assert_eq!(
            source.webhook_url(SALES_WORKFLOW),
            "http://localhost:5678/webhook/woocommerce-sales-data"
        );

        let source = N8nDataSource::new("http://localhost:5678/webhook//".to_string(), Some(String::new()));
        assert_eq!(
            source.webhook_url(INVENTORY_WORKFLOW),
            "http://localhost:5678/webhook/woocommerce-inventory"
        );
        assert!(source.api_key.is_none());
    }

    #[test]
    fn test_trend_envelope_unwraps_results() {
        let json = r#"{
            "data": {
                "query": "competitors",
                "status": "success",
                "results": {
                    "title": "Competitor Analysis",
                    "summary": "Byredo and Diptyque lead social engagement.",
                    "data": {"leaders": ["Byredo"]}
                }
            }
        }"#;

        let response: WorkflowResponse<TrendAnalysis> = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.results.title, "Competitor Analysis");
        assert_eq!(response.data.results.data["leaders"][0], "Byredo");
    }

    #[test]
    fn test_assistant_envelopes_unwrap() {
        let json = r#"{
            "data": {
                "status": "success",
                "response": {
                    "text": "Dubai is at 43% capacity.",
                    "data": {"warehouses": {"dubai": 43}},
                    "intent": "inventory_check"
                }
            }
        }"#;
        let response: WorkflowResponse<CommandEnvelope> = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.response.intent, CommandIntent::InventoryCheck);

        let json = r#"{
            "data": {
                "forecast": {
                    "metric": "Sales",
                    "period": "weekly",
                    "current": 368000,
                    "forecast": [378500, 392700],
                    "growth": 30.1,
                    "confidence": 89,
                    "factors": [{"name": "Seasonal demand", "impact": "high", "direction": "positive"}]
                }
            }
        }"#;
        let response: WorkflowResponse<ForecastEnvelope> = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.forecast.period, Timeframe::Weekly);
        assert_eq!(response.data.forecast.forecast, vec![378_500.0, 392_700.0]);
    }

    #[tokio::test]
    async fn test_unreachable_webhook_is_an_error() {
        // Bind an ephemeral port and release it so nothing is listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = N8nDataSource::new(format!("http://{}/webhook/", addr), None);
        let result = source.fetch_sales(Timeframe::Daily).await;
        assert!(result.is_err());
        assert!(source.process_command("show sales").await.is_err());
    }
}
