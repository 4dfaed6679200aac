// Presentation layer - HTTP surface read by dashboard clients
pub mod app_state;
pub mod handlers;
pub mod router;
