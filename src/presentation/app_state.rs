// Application state for HTTP handlers
use crate::application::assistant::DashboardAssistant;
use crate::application::dashboard_store::DashboardStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DashboardStore>,
    pub assistant: Arc<dyn DashboardAssistant>,
}
