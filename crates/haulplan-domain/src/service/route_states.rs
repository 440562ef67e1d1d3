//! Traversed-state detection from sampled route points
//!
//! Each sample point is reverse-geocoded. Legs between two points in the same
//! state count toward that state; a leg that crosses a boundary is split
//! evenly. Points that fail to geocode inherit their neighbours' states, so a
//! provider outage at one point never aborts the whole detection.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::StateSegment;
use crate::repository::StateGeocoder;
use haulplan_types::GeoPoint;

/// Relative gap between summed legs and the provider's total that triggers a warning
const DISTANCE_MISMATCH_RATIO: f64 = 0.15;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteStates {
    /// States in route order with in-state miles
    pub segments: Vec<StateSegment>,
    /// Points that failed to geocode
    pub failed_points: usize,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl RouteStates {
    pub fn state_codes(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.state.clone()).collect()
    }
}

fn add_miles(segments: &mut Vec<StateSegment>, state: &str, miles: f64) {
    match segments.last_mut() {
        Some(last) if last.state == state => last.distance_miles += miles,
        _ => segments.push(StateSegment::new(state, miles)),
    }
}

/// Fill unknown points from the nearest earlier known point, or the next one at the start
fn fill_unknown(states: &mut [Option<String>]) {
    let mut last: Option<String> = None;
    for s in states.iter_mut() {
        match s {
            Some(code) => last = Some(code.clone()),
            None => *s = last.clone(),
        }
    }
    let mut next: Option<String> = None;
    for s in states.iter_mut().rev() {
        match s {
            Some(code) => next = Some(code.clone()),
            None => *s = next.clone(),
        }
    }
}

pub fn detect_route_states<G: StateGeocoder + ?Sized>(
    points: &[GeoPoint],
    provider_total_miles: Option<f64>,
    geocoder: &G,
) -> RouteStates {
    let mut result = RouteStates::default();

    let mut states: Vec<Option<String>> = Vec::with_capacity(points.len());
    for (i, point) in points.iter().enumerate() {
        match geocoder.state_at(point) {
            Ok(code) => states.push(Some(code.trim().to_ascii_uppercase())),
            Err(err) => {
                warn!(index = i, error = %err, "geocode failed");
                result.failed_points += 1;
                states.push(None);
            }
        }
    }
    if result.failed_points > 0 {
        result.warnings.push(format!(
            "{} of {} route points could not be geocoded; their states were interpolated",
            result.failed_points,
            points.len()
        ));
    }

    if states.iter().all(Option::is_none) {
        result
            .warnings
            .push("No route point could be assigned to a state; state coverage unavailable".to_string());
        return result;
    }
    fill_unknown(&mut states);
    let codes: Vec<String> = states.into_iter().flatten().collect();

    if codes.len() == 1 {
        result
            .segments
            .push(StateSegment::new(codes[0].clone(), provider_total_miles.unwrap_or(0.0)));
        return result;
    }

    for (i, leg) in points.windows(2).enumerate() {
        let miles = leg[0].haversine_miles(&leg[1]);
        let (from, to) = (&codes[i], &codes[i + 1]);
        if from == to {
            add_miles(&mut result.segments, from, miles);
        } else {
            add_miles(&mut result.segments, from, miles / 2.0);
            add_miles(&mut result.segments, to, miles / 2.0);
        }
    }

    let summed: f64 = result.segments.iter().map(|s| s.distance_miles).sum();
    if let Some(total) = provider_total_miles.filter(|t| *t > 0.0) {
        if summed > 0.0 {
            let mismatch = (summed - total).abs() / total;
            if mismatch > DISTANCE_MISMATCH_RATIO {
                result.warnings.push(format!(
                    "Sampled distance {:.0} mi differs from the provider's {:.0} mi by {:.0}%; state mileage scaled to the provider total",
                    summed,
                    total,
                    mismatch * 100.0
                ));
            }
            let factor = total / summed;
            for s in &mut result.segments {
                s.distance_miles *= factor;
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::GeocodeError;

    /// Latitude bands: below 34 is TX, 34–37 OK, above 37 KS; exactly 35.5 times out
    struct Bands;

    impl StateGeocoder for Bands {
        fn state_at(&self, point: &GeoPoint) -> Result<String, GeocodeError> {
            if (point.lat - 35.5).abs() < 1e-9 {
                return Err(GeocodeError::Timeout);
            }
            Ok(if point.lat < 34.0 {
                "TX"
            } else if point.lat < 37.0 {
                "ok"
            } else {
                "KS"
            }
            .to_string())
        }
    }

    struct Nowhere;

    impl StateGeocoder for Nowhere {
        fn state_at(&self, _point: &GeoPoint) -> Result<String, GeocodeError> {
            Err(GeocodeError::OutsideCoverage)
        }
    }

    fn northbound(lats: &[f64]) -> Vec<GeoPoint> {
        lats.iter().map(|lat| GeoPoint::new(*lat, -97.5)).collect()
    }

    #[test]
    fn test_states_in_order_with_codes_normalised() {
        let points = northbound(&[32.0, 33.0, 34.5, 36.0, 37.5, 38.0]);
        let result = detect_route_states(&points, None, &Bands);
        assert_eq!(result.state_codes(), vec!["TX", "OK", "KS"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_failed_point_skipped_with_warning() {
        let points = northbound(&[33.0, 34.5, 35.5, 36.5, 37.5]);
        let result = detect_route_states(&points, None, &Bands);
        assert_eq!(result.failed_points, 1);
        assert_eq!(result.state_codes(), vec!["TX", "OK", "KS"]);
        assert!(result.warnings[0].contains("could not be geocoded"));
    }

    #[test]
    fn test_scaled_to_provider_total() {
        let points = northbound(&[32.0, 33.0, 34.5, 36.0]);
        let result = detect_route_states(&points, Some(400.0), &Bands);
        let total: f64 = result.segments.iter().map(|s| s.distance_miles).sum();
        assert!((total - 400.0).abs() < 1e-6);
        // ~276 sampled vs 400: mismatch warning
        assert!(result.warnings.iter().any(|w| w.contains("provider")));
    }

    #[test]
    fn test_zero_coverage_is_empty() {
        let result = detect_route_states(&northbound(&[32.0, 33.0]), Some(100.0), &Nowhere);
        assert!(result.segments.is_empty());
        assert_eq!(result.failed_points, 2);
        assert!(result.warnings.iter().any(|w| w.contains("coverage unavailable")));
    }

    #[test]
    fn test_single_state_route_takes_provider_distance() {
        let result = detect_route_states(&northbound(&[32.0, 32.5, 33.0]), Some(120.0), &Bands);
        assert_eq!(result.segments.len(), 1);
        assert!((result.segments[0].distance_miles - 120.0).abs() < 1e-6);
    }
}
