//! Low-clearance bridge screening along a sampled route

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{ClearanceConflict, ClearanceReport, LowClearanceBridge};
use haulplan_types::GeoPoint;

pub const INCOMPLETE_WARNING: &str = "bridge check incomplete — insufficient route points";

const MILES_PER_DEGREE_LAT: f64 = 69.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearancePolicy {
    /// Bridges farther than this from the route line are ignored
    pub search_radius_miles: f64,
    /// Required headroom above the load
    pub buffer_ft: f64,
    /// Larger gaps between consecutive points make the check incomplete
    pub max_point_spacing_miles: f64,
}

impl Default for ClearancePolicy {
    fn default() -> Self {
        Self {
            search_radius_miles: 0.5,
            buffer_ft: 0.25,
            max_point_spacing_miles: 25.0,
        }
    }
}

/// Distance from `p` to the segment `a`–`b` on a local flat projection
fn distance_to_leg_miles(p: &GeoPoint, a: &GeoPoint, b: &GeoPoint) -> f64 {
    let miles_per_degree_lng = MILES_PER_DEGREE_LAT * p.lat.to_radians().cos();
    let to_xy = |g: &GeoPoint| ((g.lng - p.lng) * miles_per_degree_lng, (g.lat - p.lat) * MILES_PER_DEGREE_LAT);
    let (ax, ay) = to_xy(a);
    let (bx, by) = to_xy(b);
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (-(ax * dx + ay * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    (cx * cx + cy * cy).sqrt()
}

fn distance_to_route_miles(p: &GeoPoint, points: &[GeoPoint]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => p.haversine_miles(only),
        _ => points
            .windows(2)
            .map(|w| distance_to_leg_miles(p, &w[0], &w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Catalogued bridges near the route that the load cannot pass under
pub fn check_route_clearances(
    points: &[GeoPoint],
    overall_height_ft: f64,
    bridges: &[LowClearanceBridge],
    policy: &ClearancePolicy,
) -> ClearanceReport {
    let mut report = ClearanceReport {
        complete: true,
        ..ClearanceReport::default()
    };

    if points.len() < 2 {
        report.complete = false;
    } else if let Some(gap) = points
        .windows(2)
        .map(|w| w[0].haversine_miles(&w[1]))
        .find(|gap| *gap > policy.max_point_spacing_miles)
    {
        report.complete = false;
        report.warnings.push(format!(
            "Route points {:.1} miles apart exceed the {:.0} mile sampling limit",
            gap, policy.max_point_spacing_miles
        ));
    }
    if !report.complete {
        warn!(points = points.len(), "sparse route sampling");
        report.warnings.insert(0, INCOMPLETE_WARNING.to_string());
    }

    let required_ft = overall_height_ft + policy.buffer_ft;
    for bridge in bridges.iter().filter(|b| b.clearance_ft < required_ft) {
        let distance = distance_to_route_miles(&bridge.location, points);
        if distance <= policy.search_radius_miles {
            debug!(bridge = %bridge.id, clearance = bridge.clearance_ft, distance, "clearance conflict");
            report.conflicts.push(ClearanceConflict {
                bridge: bridge.clone(),
                load_height_ft: overall_height_ft,
                distance_miles: distance,
                shortfall_ft: required_ft - bridge.clearance_ft,
            });
        }
    }
    for c in &report.conflicts {
        report.warnings.push(format!(
            "{} on {} ({}): {:.2} ft clearance, load needs {:.2} ft",
            c.bridge.description, c.bridge.route, c.bridge.state, c.bridge.clearance_ft, required_ft
        ));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridge(id: &str, lat: f64, lng: f64, clearance: f64) -> LowClearanceBridge {
        LowClearanceBridge {
            id: id.to_string(),
            state: "TX".to_string(),
            route: "I-35".to_string(),
            description: format!("Overpass {}", id),
            location: GeoPoint::new(lat, lng),
            clearance_ft: clearance,
        }
    }

    fn route() -> Vec<GeoPoint> {
        // Northbound, 0.1 degree steps (~7 miles)
        (0..5).map(|i| GeoPoint::new(30.0 + 0.1 * f64::from(i), -97.7)).collect()
    }

    #[test]
    fn test_low_bridge_on_route_flagged() {
        let bridges = vec![bridge("low", 30.15, -97.7, 14.0), bridge("tall", 30.25, -97.7, 16.5)];
        let report = check_route_clearances(&route(), 14.5, &bridges, &ClearancePolicy::default());
        assert!(report.complete);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].bridge.id, "low");
        assert!((report.conflicts[0].shortfall_ft - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_bridge_off_route_ignored() {
        // ~5 miles east of the line
        let bridges = vec![bridge("far", 30.15, -97.62, 12.0)];
        let report = check_route_clearances(&route(), 14.5, &bridges, &ClearancePolicy::default());
        assert!(report.conflicts.is_empty());
    }

    #[test]
    fn test_buffer_applies() {
        let bridges = vec![bridge("tight", 30.2, -97.7, 14.6)];
        let report = check_route_clearances(&route(), 14.5, &bridges, &ClearancePolicy::default());
        assert_eq!(report.conflicts.len(), 1);
    }

    #[test]
    fn test_insufficient_points_incomplete() {
        let report = check_route_clearances(&[GeoPoint::new(30.0, -97.7)], 14.5, &[], &ClearancePolicy::default());
        assert!(!report.complete);
        assert_eq!(report.warnings[0], INCOMPLETE_WARNING);
    }

    #[test]
    fn test_sparse_points_incomplete() {
        let points = vec![GeoPoint::new(30.0, -97.7), GeoPoint::new(31.0, -97.7)];
        let report = check_route_clearances(&points, 14.5, &[], &ClearancePolicy::default());
        assert!(!report.complete);
        assert!(report.warnings.iter().any(|w| w.contains("sampling limit")));
    }
}
