//! Low-clearance structures

use serde::{Deserialize, Serialize};

use haulplan_types::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowClearanceBridge {
    pub id: String,
    pub state: String,
    pub route: String,
    pub description: String,
    pub location: GeoPoint,
    pub clearance_ft: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearanceConflict {
    pub bridge: LowClearanceBridge,
    pub load_height_ft: f64,
    /// Distance from the nearest route sample point
    pub distance_miles: f64,
    pub shortfall_ft: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearanceReport {
    pub conflicts: Vec<ClearanceConflict>,
    /// False when the sample points were too sparse to trust the check
    pub complete: bool,
    #[serde(default)]
    pub warnings: Vec<String>,
}
