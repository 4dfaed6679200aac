// HTTP request handlers
use crate::application::assistant::DashboardAssistant;
use crate::domain::assistant::{CommandReply, Forecast, ForecastMetric, parse_command};
use crate::domain::dashboard::DashboardSnapshot;
use crate::domain::selector::{Platform, SelectorError, Timeframe, Warehouse, parse_trends_query};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use chrono::{DateTime, Utc};
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

#[derive(Deserialize)]
pub struct SelectorUpdate {
    pub value: String,
}

#[derive(Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

#[derive(Serialize)]
pub struct CommandResponse {
    pub response: CommandReply,
    pub timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct ForecastRequest {
    pub metric: String,
    #[serde(default)]
    pub period: Option<Timeframe>,
}

#[derive(Serialize)]
pub struct ForecastResponse {
    pub forecast: Forecast,
    pub timestamp: DateTime<Utc>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current state of every dataset slot
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.store.snapshot())
}

/// Change one dataset's selector. Answers 202 when a reload was triggered
/// and 200 when the value was already selected.
pub async fn set_selector(
    Path(dataset): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<SelectorUpdate>,
) -> Response {
    let store = &state.store;
    let result: Result<bool, SelectorError> = match dataset.as_str() {
        "sales" => update
            .value
            .parse::<Timeframe>()
            .map(|timeframe| store.set_sales_timeframe(timeframe).is_some()),
        "inventory" => update
            .value
            .parse::<Warehouse>()
            .map(|warehouse| store.set_inventory_warehouse(warehouse).is_some()),
        "trends" => parse_trends_query(&update.value).map(|query| store.set_trends_query(query).is_some()),
        "social" => update
            .value
            .parse::<Platform>()
            .map(|platform| store.set_social_platform(platform).is_some()),
        _ => {
            return (StatusCode::NOT_FOUND, format!("unknown dataset '{}'", dataset)).into_response();
        }
    };

    match result {
        Ok(true) => (StatusCode::ACCEPTED, Json(store.snapshot())).into_response(),
        Ok(false) => (StatusCode::OK, Json(store.snapshot())).into_response(),
        Err(e) => {
            tracing::warn!("Rejected selector for {}: {}", dataset, e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Trigger a refresh of every dataset without waiting for it
pub async fn refresh_dashboard(State(state): State<Arc<AppState>>) -> StatusCode {
    tokio::spawn(state.store.refresh_all());
    StatusCode::ACCEPTED
}

/// Answer a transcribed voice command
pub async fn process_command(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CommandRequest>,
) -> Response {
    let command = match parse_command(&request.command) {
        Ok(command) => command,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.assistant.process_command(&command).await {
        Ok(response) => Json(CommandResponse {
            response,
            timestamp: Utc::now(),
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Error processing command \"{}\": {:#}", command, e);
            (StatusCode::BAD_GATEWAY, "could not process command").into_response()
        }
    }
}

/// Project a metric forward; the period defaults to monthly
pub async fn create_forecast(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ForecastRequest>,
) -> Response {
    let metric = ForecastMetric::from_name(&request.metric);
    let period = request.period.unwrap_or(Timeframe::Monthly);

    match state.assistant.create_forecast(metric, period).await {
        Ok(forecast) => Json(ForecastResponse {
            forecast,
            timestamp: Utc::now(),
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Error generating {} forecast: {:#}", metric, e);
            (StatusCode::BAD_GATEWAY, "could not generate forecast").into_response()
        }
    }
}

/// Server-sent events: the current snapshot, then one per store change
pub async fn stream_dashboard(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let store = state.store.clone();
    let events = WatchStream::new(store.subscribe()).map(move |revision| {
        Event::default()
            .event("snapshot")
            .id(revision.to_string())
            .json_data(store.snapshot())
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
