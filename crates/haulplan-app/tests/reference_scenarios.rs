//! Planning scenarios against the built-in reference tables

use chrono::NaiveDate;

use haulplan_app::constants::{all_state_codes, get_state_by_code, SEASONAL_RESTRICTIONS, TRAILER_CATALOG};
use haulplan_app::StaticReference;
use haulplan_domain::model::{CargoEnvelope, CargoItem, StateSegment, TrailerCategory};
use haulplan_domain::service::legacy::{from_legacy_format, to_legacy_format};
use haulplan_domain::service::{
    calculate_route_permits, calculate_state_permit, check_route_seasonal_restrictions, plan_loads,
    select_trucks, EscortRates, PermitInput, PermitPolicy, PlanOptions,
};
use haulplan_types::Cents;

const FIFTY_STATES_AND_DC: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC",
    "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV", "WI", "WY",
];

fn segments(states: &[(&str, f64)]) -> Vec<StateSegment> {
    states.iter().map(|(s, d)| StateSegment::new(*s, *d)).collect()
}

fn route_permits(env: CargoEnvelope, states: &[(&str, f64)]) -> haulplan_domain::model::RoutePermitSummary {
    let input = PermitInput::new(env)
        .with_securement_included(true)
        .as_of(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    calculate_route_permits(
        &StaticReference,
        &segments(states),
        &input,
        &PermitPolicy::default(),
        &EscortRates::default(),
    )
}

#[test]
fn test_catalog_dimensions_positive() {
    assert!(!TRAILER_CATALOG.is_empty());
    for t in TRAILER_CATALOG.iter() {
        assert!(t.deck_length_ft > 0.0, "{}", t.id);
        assert!(t.deck_width_ft > 0.0, "{}", t.id);
        assert!(t.max_cargo_weight_lbs > 0.0, "{}", t.id);
    }
}

#[test]
fn test_every_state_has_positive_limits() {
    assert_eq!(all_state_codes().len(), 51);
    for code in FIFTY_STATES_AND_DC {
        let state = get_state_by_code(code).unwrap_or_else(|| panic!("missing {}", code));
        assert!(state.legal_limits.max_width_ft > 0.0);
        assert!(state.legal_limits.max_height_ft > 0.0);
        assert!(state.legal_limits.weight.gross_lbs > 0.0);
    }
    assert!(get_state_by_code(" tx ").is_some());
}

#[test]
fn test_small_cargo_prefers_flatbed() {
    let env = CargoEnvelope::new(10.0, 6.0, 7.0, 15_000.0);
    let recs = select_trucks(&StaticReference, &env);
    let top = &recs[0];
    assert_eq!(top.trailer.category, TrailerCategory::Flatbed);
    assert!(top.score > 50.0);
}

#[test]
fn test_legal_load_needs_no_permit_fees() {
    let summary = route_permits(
        CargoEnvelope::new(48.0, 8.5, 13.5, 80_000.0),
        &[("TX", 600.0), ("CA", 400.0)],
    );
    assert_eq!(summary.states.len(), 2);
    assert_eq!(summary.total_permit_fees, Cents::ZERO);
    assert!(summary.states.iter().all(|s| !s.permit_required()));
}

#[test]
fn test_oversize_load_pays_in_every_state() {
    let summary = route_permits(
        CargoEnvelope::new(75.0, 12.0, 14.5, 120_000.0),
        &[("TX", 300.0), ("OK", 220.0), ("KS", 180.0)],
    );
    assert_eq!(summary.states.len(), 3);
    assert!(summary.total_permit_fees > Cents::ZERO);
    assert!(summary.states.iter().all(|s| s.oversize_required && s.overweight_required));
}

#[test]
fn test_sixteen_foot_width_is_superload_in_california() {
    let summary = route_permits(CargoEnvelope::new(60.0, 16.0, 13.0, 100_000.0), &[("CA", 250.0)]);
    let ca = &summary.states[0];
    assert!(ca.is_superload);
    assert!(summary.is_superload);
    assert!(!ca.continuous_permit_available);
}

#[test]
fn test_frost_laws_march_but_not_august() {
    let route = ["MN", "WI", "MI"];
    let march = check_route_seasonal_restrictions(
        &route,
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
        &SEASONAL_RESTRICTIONS,
    );
    assert!(march.has_restrictions);
    assert!(!march.warnings.is_empty());

    let august = check_route_seasonal_restrictions(
        &route,
        NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
        &SEASONAL_RESTRICTIONS,
    );
    assert!(!august.has_restrictions);
}

#[test]
fn test_legacy_round_trip_and_oversize_boundary() {
    let item = CargoItem::new("Transformer", 22.25, 8.5, 10.0, 41_300.0).with_id("t-1");
    let legacy = to_legacy_format(&item);
    assert!(!legacy.is_oversize);
    let back = from_legacy_format(&legacy);
    assert!((back.length_ft - item.length_ft).abs() < 1e-9);
    assert!((back.width_ft - item.width_ft).abs() < 1e-9);
    assert!((back.height_ft - item.height_ft).abs() < 1e-9);
    assert!((back.weight_lbs - item.weight_lbs).abs() < 1e-9);

    let wide = CargoItem::new("Wide", 20.0, 8.6, 6.0, 5_000.0);
    assert!(to_legacy_format(&wide).is_oversize);
    let tall = CargoItem::new("Tall", 20.0, 8.0, 10.1, 5_000.0);
    assert!(to_legacy_format(&tall).is_oversize);
}

#[test]
fn test_state_permit_is_repeatable() {
    let tx = get_state_by_code("TX").unwrap();
    let input = PermitInput::new(CargoEnvelope::new(70.0, 13.0, 15.0, 130_000.0)).with_distance(400.0);
    let policy = PermitPolicy::default();
    let a = calculate_state_permit(tx, &input, &policy);
    let b = calculate_state_permit(tx, &input, &policy);
    assert_eq!(a.estimated_fee, b.estimated_fee);
    assert_eq!(a.oversize_required, b.oversize_required);
    assert_eq!(a.overweight_required, b.overweight_required);
    assert_eq!(a.is_superload, b.is_superload);
    assert_eq!(a, b);
}

#[test]
fn test_planned_loads_conserve_items_and_axle_weight() {
    let items = vec![
        CargoItem::new("Excavator", 30.0, 10.0, 10.0, 45_000.0).with_id("exc"),
        CargoItem::new("Crate", 8.0, 6.0, 5.0, 4_000.0).with_id("crate").with_quantity(4),
        CargoItem::new("Beam", 60.0, 2.0, 2.0, 12_000.0).with_id("beam"),
        CargoItem::new("Pallet", 4.0, 4.0, 4.0, 1_500.0).with_id("pallet").with_stackable(true).with_quantity(6),
    ];
    let plan = plan_loads(&items, &StaticReference, &PlanOptions::default()).unwrap();

    for item in &items {
        let in_loads = plan.loads.iter().filter(|l| l.contains_item(&item.id)).count();
        let unassigned = plan.unassigned_items.iter().filter(|u| u.item.id == item.id).count();
        assert_eq!(in_loads + unassigned, 1, "{}", item.id);
    }

    for load in &plan.loads {
        let Some(report) = &load.weight_distribution else {
            continue;
        };
        let cargo: f64 = match &load.placements_3d {
            Some(placed) => placed.iter().filter(|p| !p.failed).map(|p| p.weight_lbs).sum(),
            None => load.weight_lbs,
        };
        let expected = load.trailer.combination_tare_lbs() + cargo;
        assert!(
            (report.axle_weights.sum_lbs() - expected).abs() < 1.0,
            "{}: {} vs {}",
            load.id,
            report.axle_weights.sum_lbs(),
            expected
        );
    }
}
