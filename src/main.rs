// Main entry point - Dependency injection and server setup
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use executive_dashboard::application::assistant::DashboardAssistant;
use executive_dashboard::application::dashboard_store::DashboardStore;
use executive_dashboard::application::data_source::DashboardDataSource;
use executive_dashboard::infrastructure::config::{SourceSettings, load_dashboard_config};
use executive_dashboard::infrastructure::fixture_source::FixtureDataSource;
use executive_dashboard::infrastructure::n8n_source::N8nDataSource;
use executive_dashboard::presentation::app_state::AppState;
use executive_dashboard::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;
    let settings = config.store_settings()?;

    // Create data source and assistant (infrastructure layer)
    let (source, assistant): (Arc<dyn DashboardDataSource>, Arc<dyn DashboardAssistant>) = match &config.source {
        SourceSettings::Fixture { latency_ms } => {
            tracing::info!("Using fixture data source ({} ms simulated latency)", latency_ms);
            let fixtures = Arc::new(FixtureDataSource::new(Duration::from_millis(*latency_ms)));
            (fixtures.clone(), fixtures)
        }
        SourceSettings::N8n {
            webhook_base_url,
            api_key,
        } => {
            tracing::info!("Using n8n data source at {}", webhook_base_url);
            let n8n = Arc::new(N8nDataSource::new(webhook_base_url.clone(), api_key.clone()));
            (n8n.clone(), n8n)
        }
    };

    // Create the store (application layer) and start refreshing
    let store = Arc::new(DashboardStore::new(source, settings));
    store.init();

    // Build router (presentation layer)
    let router = build_router(Arc::new(AppState {
        store: store.clone(),
        assistant,
    }));

    let listener = tokio::net::TcpListener::bind(config.server.bind).await?;
    tracing::info!("Starting executive dashboard service on {}", config.server.bind);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.dispose().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Without a signal handler the server runs until killed
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
