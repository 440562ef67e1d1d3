//! Repository trait definitions for reference data and external lookups

use thiserror::Error;

use crate::model::{StatePermitData, TrailerType};
use haulplan_types::GeoPoint;

/// Source of trailer types
pub trait TrailerCatalog {
    /// All trailers in popularity order
    fn trailers(&self) -> &[TrailerType];

    /// Find a trailer by id
    fn find_trailer(&self, id: &str) -> Option<&TrailerType> {
        self.trailers().iter().find(|t| t.id == id)
    }
}

impl TrailerCatalog for Vec<TrailerType> {
    fn trailers(&self) -> &[TrailerType] {
        self
    }
}

impl TrailerCatalog for [TrailerType] {
    fn trailers(&self) -> &[TrailerType] {
        self
    }
}

/// Source of state permit schedules
pub trait PermitRegistry {
    /// Permit data for a two-letter code (case-insensitive)
    fn state(&self, code: &str) -> Option<&StatePermitData>;

    /// Every code the registry knows
    fn codes(&self) -> Vec<String>;
}

/// Reverse-geocoding failure at one point
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    #[error("Geocoding timed out")]
    Timeout,

    #[error("Point is outside any US state")]
    OutsideCoverage,

    #[error("Geocoding provider error: {0}")]
    Provider(String),
}

/// Point-to-jurisdiction lookup supplied by the routing provider
pub trait StateGeocoder {
    /// Two-letter code of the state containing `point`
    fn state_at(&self, point: &GeoPoint) -> Result<String, GeocodeError>;
}
