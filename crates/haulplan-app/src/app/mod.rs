//! Use cases

pub mod planning_service;

pub use planning_service::{LoadRouting, PlanningService, ShipmentQuote, ShipmentRequest};
