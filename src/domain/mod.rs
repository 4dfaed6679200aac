// Domain layer - Dataset payloads, selectors and snapshots
pub mod assistant;
pub mod dashboard;
pub mod inventory;
pub mod market;
pub mod sales;
pub mod selector;
pub mod social;
