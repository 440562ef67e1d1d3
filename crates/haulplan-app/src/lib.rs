//! Application service layer - shipment planning, config, reference data

pub mod app;
pub mod config;
pub mod constants;
pub mod repository;

pub use app::{LoadRouting, PlanningService, ShipmentQuote, ShipmentRequest};
pub use config::PlannerConfig;
pub use repository::StaticReference;
