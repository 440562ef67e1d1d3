//! Core types for heavy-haul load planning

mod error;
mod geo;
mod money;

pub use error::*;
pub use geo::GeoPoint;
pub use money::Cents;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Inches in one foot
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Pounds in one short ton
pub const LBS_PER_TON: f64 = 2000.0;

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
