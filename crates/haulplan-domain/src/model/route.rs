//! Route alternatives

use serde::{Deserialize, Serialize};

use super::permit::RoutePermitSummary;
use haulplan_types::GeoPoint;

/// In-state distance along a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSegment {
    pub state: String,
    pub distance_miles: f64,
}

impl StateSegment {
    pub fn new(state: impl Into<String>, distance_miles: f64) -> Self {
        Self {
            state: state.into(),
            distance_miles,
        }
    }
}

/// A candidate route as supplied by the routing provider, before permit evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub segments: Vec<StateSegment>,
    pub total_distance_miles: f64,
    pub total_duration_hours: f64,
    #[serde(default)]
    pub sample_points: Vec<GeoPoint>,
    /// Named highways the route uses
    #[serde(default)]
    pub highways: Vec<String>,
}

/// A candidate route with its permit computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAlternative {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub segments: Vec<StateSegment>,
    pub total_distance_miles: f64,
    pub total_duration_hours: f64,
    pub permits: RoutePermitSummary,
}

impl RouteAlternative {
    pub fn from_candidate(candidate: &RouteCandidate, permits: RoutePermitSummary) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            segments: candidate.segments.clone(),
            total_distance_miles: candidate.total_distance_miles,
            total_duration_hours: candidate.total_duration_hours,
            permits,
        }
    }

    pub fn state_count(&self) -> usize {
        self.segments.len()
    }

    pub fn total_cost(&self) -> haulplan_types::Cents {
        self.permits.total_cost
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
