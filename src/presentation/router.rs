// Route table for the dashboard HTTP surface
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    create_forecast, get_dashboard, health_check, process_command, refresh_dashboard, set_selector,
    stream_dashboard,
};
use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/events", get(stream_dashboard))
        .route("/dashboard/refresh", post(refresh_dashboard))
        .route("/dashboard/:dataset/selector", put(set_selector))
        .route("/dashboard/command", post(process_command))
        .route("/dashboard/forecast", post(create_forecast))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
