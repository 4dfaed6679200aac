// Application layer - Dataset slots, the store that owns them, and their scheduling
pub mod assistant;
pub mod dashboard_store;
pub mod data_source;
pub mod dataset_slot;
pub mod refresh_scheduler;
