//! Catalogued low-clearance structures on common oversize corridors

use std::sync::LazyLock;

use haulplan_domain::model::LowClearanceBridge;
use haulplan_types::GeoPoint;

fn bridge(id: &str, state: &str, route: &str, description: &str, lat: f64, lng: f64, clearance_ft: f64) -> LowClearanceBridge {
    LowClearanceBridge {
        id: id.to_string(),
        state: state.to_string(),
        route: route.to_string(),
        description: description.to_string(),
        location: GeoPoint::new(lat, lng),
        clearance_ft,
    }
}

pub static LOW_CLEARANCE_BRIDGES: LazyLock<Vec<LowClearanceBridge>> = LazyLock::new(|| {
    vec![
        bridge("nc-gregson", "NC", "Gregson St", "Norfolk Southern trestle, Durham", 36.0025, -78.9066, 12.33),
        bridge("ma-storrow-1", "MA", "Storrow Dr", "Storrow Drive underpasses, Boston", 42.3536, -71.0806, 10.0),
        bridge("ny-southern-state", "NY", "Southern State Pkwy", "Parkway overpasses, Long Island", 40.6860, -73.6460, 10.5),
        bridge("ny-i278-kosciuszko", "NY", "I-278", "BQE overpasses, Brooklyn", 40.6937, -73.9880, 13.0),
        bridge("il-lower-wacker", "IL", "Lower Wacker Dr", "Lower Wacker Drive, Chicago", 41.8868, -87.6290, 12.5),
        bridge("pa-i76-underpass", "PA", "I-76", "Schuylkill Expressway rail overpass", 39.9735, -75.1970, 13.25),
        bridge("tx-i45-houston", "TX", "I-45", "Rail overpass near downtown Houston", 29.7710, -95.3610, 14.0),
        bridge("tx-i35-austin", "TX", "I-35", "Upper deck crossover, Austin", 30.2800, -97.7330, 14.5),
        bridge("ca-i5-la", "CA", "I-5", "Rail bridge near Los Angeles river", 34.0800, -118.2240, 14.25),
        bridge("ca-us101-sf", "CA", "US-101", "Central Freeway ramp, San Francisco", 37.7715, -122.4195, 13.5),
        bridge("oh-i71-cincy", "OH", "I-71", "Rail overpass, Cincinnati", 39.1030, -84.5050, 14.1),
        bridge("mo-i70-kc", "MO", "I-70", "Rail overpass, Kansas City", 39.1030, -94.5700, 14.3),
        bridge("ga-i75-atl", "GA", "I-75/85", "Downtown Connector overpass, Atlanta", 33.7600, -84.3880, 14.6),
        bridge("wa-i5-seattle", "WA", "I-5", "Convention Center lid, Seattle", 47.6110, -122.3310, 14.4),
        bridge("mn-i94-stpaul", "MN", "I-94", "Rail overpass, St. Paul", 44.9530, -93.1000, 14.2),
    ]
});

/// Catalogued structures in `state`
pub fn bridges_in(state: &str) -> Vec<&'static LowClearanceBridge> {
    LOW_CLEARANCE_BRIDGES
        .iter()
        .filter(|b| b.state.eq_ignore_ascii_case(state))
        .collect()
}
