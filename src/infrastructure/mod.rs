// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod fixture_source;
pub mod n8n_source;
