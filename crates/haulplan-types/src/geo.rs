//! Geographic sample points

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A WGS84 latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in statute miles
    pub fn haversine_miles(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_MILES * a.sqrt().asin()
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_dallas_to_oklahoma_city() {
        let dallas = GeoPoint::new(32.7767, -96.7970);
        let okc = GeoPoint::new(35.4676, -97.5164);
        let miles = dallas.haversine_miles(&okc);
        assert!((miles - 190.0).abs() < 5.0, "got {}", miles);
    }

    #[test]
    fn test_zero_distance() {
        let p = GeoPoint::new(40.0, -100.0);
        assert!(p.haversine_miles(&p).abs() < 1e-9);
    }

    #[test]
    fn test_validity() {
        assert!(GeoPoint::new(45.0, -93.0).is_valid());
        assert!(!GeoPoint::new(95.0, -93.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }
}
