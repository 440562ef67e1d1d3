//! Route-level permit aggregation and escort costing

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::permit_calculator::{calculate_state_permit, PermitInput, PermitPolicy};
use super::seasonal::apply_seasonal_limits;
use crate::model::{EscortCost, RoutePermitSummary, SeasonalRestriction, StateSegment};
use crate::repository::PermitRegistry;
use haulplan_types::Cents;

/// Escort pricing and travel assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscortRates {
    /// Per pilot car per day
    pub escort_daily: Cents,
    pub pole_car_daily: Cents,
    pub police_hourly: Cents,
    pub police_minimum_hours: f64,
    /// Miles an oversize move covers in one day
    pub average_daily_miles: f64,
    pub police_speed_mph: f64,
}

impl Default for EscortRates {
    fn default() -> Self {
        Self {
            escort_daily: Cents::from_dollars(600),
            pole_car_daily: Cents::from_dollars(750),
            police_hourly: Cents::from_dollars(150),
            police_minimum_hours: 4.0,
            average_daily_miles: 300.0,
            police_speed_mph: 45.0,
        }
    }
}

/// Trip date and frost-law table used to reduce legal gross before calculation
#[derive(Debug, Clone, Copy)]
pub struct SeasonalAdjustment<'a> {
    pub date: NaiveDate,
    pub table: &'a [SeasonalRestriction],
}

pub fn trip_days(total_miles: f64, average_daily_miles: f64) -> u32 {
    if total_miles <= 0.0 || average_daily_miles <= 0.0 {
        return 0;
    }
    (total_miles / average_daily_miles).ceil() as u32
}

pub fn calculate_route_permits<R: PermitRegistry + ?Sized>(
    registry: &R,
    segments: &[StateSegment],
    input: &PermitInput,
    policy: &PermitPolicy,
    rates: &EscortRates,
) -> RoutePermitSummary {
    calculate_route_permits_seasonal(registry, segments, input, policy, rates, None)
}

pub fn calculate_route_permits_seasonal<R: PermitRegistry + ?Sized>(
    registry: &R,
    segments: &[StateSegment],
    input: &PermitInput,
    policy: &PermitPolicy,
    rates: &EscortRates,
    seasonal: Option<SeasonalAdjustment<'_>>,
) -> RoutePermitSummary {
    let mut summary = RoutePermitSummary::default();
    let mut police_miles = 0.0;

    for segment in segments {
        summary.total_distance_miles += segment.distance_miles;

        let Some(state) = registry.state(&segment.state) else {
            warn!(state = %segment.state, "unknown state skipped");
            summary
                .warnings
                .push(format!("Unknown state '{}' skipped; no permit data", segment.state));
            summary.skipped_states.push(segment.state.clone());
            continue;
        };

        let state_input = PermitInput {
            distance_miles: Some(segment.distance_miles),
            ..input.clone()
        };
        let mut requirement = match seasonal {
            Some(adj) => {
                let (adjusted, notes) = apply_seasonal_limits(state, adj.date, adj.table);
                let mut req = calculate_state_permit(&adjusted, &state_input, policy);
                req.warnings.extend(notes);
                req
            }
            None => calculate_state_permit(state, &state_input, policy),
        };
        requirement.state = state.code.clone();

        if requirement.escort.police {
            police_miles += segment.distance_miles;
        }
        summary.total_permit_fees += requirement.estimated_fee;
        summary.max_escort_count = summary.max_escort_count.max(requirement.escort.count);
        summary.needs_pole_car |= requirement.escort.pole_car;
        summary.needs_police |= requirement.escort.police;
        summary.is_superload |= requirement.is_superload;
        summary.bridge_analysis_required |= requirement.bridge_analysis_required;
        summary.states.push(requirement);
    }

    summary.escort_cost = escort_cost(&summary, police_miles, rates);
    summary.total_cost = summary.total_permit_fees + summary.escort_cost.total;

    info!(
        states = summary.states.len(),
        skipped = summary.skipped_states.len(),
        fees = summary.total_permit_fees.0,
        escorts = summary.max_escort_count,
        "route permits"
    );
    summary
}

/// Hours billed for police escort: the minimum call-out covers the whole trip
pub fn police_hours(police_miles: f64, rates: &EscortRates) -> f64 {
    if police_miles <= 0.0 || rates.police_speed_mph <= 0.0 {
        return 0.0;
    }
    (police_miles / rates.police_speed_mph).max(rates.police_minimum_hours)
}

/// Pole cars count toward the escort total but are billed at their own rate
fn escort_cost(summary: &RoutePermitSummary, police_miles: f64, rates: &EscortRates) -> EscortCost {
    let days = trip_days(summary.total_distance_miles, rates.average_daily_miles);
    let pole_cars = u32::from(summary.needs_pole_car);
    let pilots = summary
        .states
        .iter()
        .map(|s| u32::from(s.escort.pilot_cars()))
        .max()
        .unwrap_or(0);
    let police_hours = police_hours(police_miles, rates);

    let escort_cost = rates.escort_daily * (pilots * days);
    let pole_car_cost = rates.pole_car_daily * (pole_cars * days);
    let police_cost = rates.police_hourly.scale(police_hours);
    let escorted = summary.max_escort_count > 0 || summary.needs_police;

    EscortCost {
        trip_days: if escorted { days } else { 0 },
        escort_count: summary.max_escort_count,
        escort_cost,
        pole_car_cost,
        police_hours,
        police_cost,
        total: escort_cost + pole_car_cost + police_cost,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::model::{CargoEnvelope, MonthDay, StatePermitData, WeightReduction};
    use crate::test_support::sample_state;

    struct Registry(HashMap<String, StatePermitData>);

    impl Registry {
        fn of(codes: &[&str]) -> Self {
            Registry(codes.iter().map(|c| (c.to_string(), sample_state(c))).collect())
        }
    }

    impl PermitRegistry for Registry {
        fn state(&self, code: &str) -> Option<&StatePermitData> {
            self.0.get(&code.to_ascii_uppercase())
        }

        fn codes(&self) -> Vec<String> {
            self.0.keys().cloned().collect()
        }
    }

    fn segments(list: &[(&str, f64)]) -> Vec<StateSegment> {
        list.iter().map(|(s, d)| StateSegment::new(*s, *d)).collect()
    }

    #[test]
    fn test_legal_load_costs_nothing() {
        let registry = Registry::of(&["TX", "CA"]);
        let input = PermitInput::new(CargoEnvelope::new(48.0, 8.5, 13.5, 80_000.0)).with_securement_included(true);
        let summary = calculate_route_permits(
            &registry,
            &segments(&[("TX", 600.0), ("CA", 400.0)]),
            &input,
            &PermitPolicy::default(),
            &EscortRates::default(),
        );
        assert_eq!(summary.states.len(), 2);
        assert_eq!(summary.total_permit_fees, Cents::ZERO);
        assert_eq!(summary.escort_cost.total, Cents::ZERO);
    }

    #[test]
    fn test_unknown_state_skipped() {
        let registry = Registry::of(&["TX", "OK"]);
        let input = PermitInput::new(CargoEnvelope::new(75.0, 12.0, 14.5, 120_000.0));
        let summary = calculate_route_permits(
            &registry,
            &segments(&[("TX", 300.0), ("ZZ", 10.0), ("OK", 200.0)]),
            &input,
            &PermitPolicy::default(),
            &EscortRates::default(),
        );
        assert_eq!(summary.states.len(), 2);
        assert_eq!(summary.skipped_states, vec!["ZZ".to_string()]);
        assert!(summary.warnings.iter().any(|w| w.contains("ZZ")));
        assert!((summary.total_distance_miles - 510.0).abs() < 1e-9);
    }

    #[test]
    fn test_escort_cost_from_trip_days() {
        let registry = Registry::of(&["TX", "OK"]);
        // 13 ft + 10 in wide: one pilot car in both states; 15.5 ft tall: pole car
        let input = PermitInput::new(CargoEnvelope::new(60.0, 13.0, 15.5, 70_000.0));
        let summary = calculate_route_permits(
            &registry,
            &segments(&[("TX", 400.0), ("OK", 200.0)]),
            &input,
            &PermitPolicy::default(),
            &EscortRates::default(),
        );
        assert_eq!(summary.max_escort_count, 1);
        assert!(summary.needs_pole_car);
        let cost = &summary.escort_cost;
        assert_eq!(cost.trip_days, 2);
        assert_eq!(cost.escort_cost, Cents::ZERO);
        assert_eq!(cost.pole_car_cost, Cents::from_dollars(1_500));
        assert_eq!(summary.total_cost, summary.total_permit_fees + Cents::from_dollars(1_500));
    }

    #[test]
    fn test_police_hours_use_minimum() {
        let registry = Registry::of(&["TX"]);
        let input = PermitInput::new(CargoEnvelope::new(60.0, 18.5, 13.0, 70_000.0)).with_securement_included(true);
        let summary = calculate_route_permits(
            &registry,
            &segments(&[("TX", 90.0)]),
            &input,
            &PermitPolicy::default(),
            &EscortRates::default(),
        );
        assert!(summary.needs_police);
        assert!((summary.escort_cost.police_hours - 4.0).abs() < 1e-9);
        assert_eq!(summary.escort_cost.police_cost, Cents::from_dollars(600));
        // Two pilot cars for one day
        assert_eq!(summary.escort_cost.escort_cost, Cents::from_dollars(1_200));
    }

    #[test]
    fn test_seasonal_reduction_triggers_overweight() {
        let registry = Registry::of(&["MN"]);
        let table = vec![SeasonalRestriction {
            state: "MN".to_string(),
            name: "Spring load restrictions".to_string(),
            start: MonthDay::new(3, 1),
            end: MonthDay::new(5, 15),
            reduction: WeightReduction::Percent(10.0),
            applies_to: "Trunk highways".to_string(),
            notes: String::new(),
        }];
        let input = PermitInput::new(CargoEnvelope::new(48.0, 8.5, 13.0, 76_000.0)).with_securement_included(true);
        let segs = segments(&[("MN", 100.0)]);

        let summer = calculate_route_permits(
            &registry,
            &segs,
            &input,
            &PermitPolicy::default(),
            &EscortRates::default(),
        );
        assert!(!summer.states[0].overweight_required);

        let spring = calculate_route_permits_seasonal(
            &registry,
            &segs,
            &input,
            &PermitPolicy::default(),
            &EscortRates::default(),
            Some(SeasonalAdjustment {
                date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
                table: &table,
            }),
        );
        assert!(spring.states[0].overweight_required);
        assert!(spring.states[0].warnings.iter().any(|w| w.contains("Spring load restrictions")));
    }

    #[test]
    fn test_police_minimum_applies_once_per_trip() {
        let registry = Registry::of(&["CA", "NY", "PA", "OH"]);
        let input = PermitInput::new(CargoEnvelope::new(60.0, 18.5, 13.0, 70_000.0)).with_securement_included(true);
        let summary = calculate_route_permits(
            &registry,
            &segments(&[("CA", 45.0), ("NY", 45.0), ("PA", 45.0), ("OH", 45.0)]),
            &input,
            &PermitPolicy::default(),
            &EscortRates::default(),
        );
        assert!(summary.states.iter().all(|s| s.escort.police));
        // 180 police miles at 45 mph is exactly the 4-hour minimum
        assert!((summary.escort_cost.police_hours - 4.0).abs() < 1e-9);
        assert_eq!(summary.escort_cost.police_cost, Cents::from_dollars(600));

        let long = calculate_route_permits(
            &registry,
            &segments(&[("CA", 135.0), ("NY", 135.0)]),
            &input,
            &PermitPolicy::default(),
            &EscortRates::default(),
        );
        assert!((long.escort_cost.police_hours - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_pilot_billed_when_pole_car_needed_elsewhere() {
        let mut tall_only = sample_state("TX");
        tall_only.escorts.width_one_ft = 20.0;
        tall_only.escorts.width_two_ft = None;
        let mut wide_only = sample_state("OK");
        wide_only.escorts.height_pole_car_ft = None;
        let registry = Registry(HashMap::from([
            ("TX".to_string(), tall_only),
            ("OK".to_string(), wide_only),
        ]));
        let input = PermitInput::new(CargoEnvelope::new(60.0, 13.0, 15.5, 70_000.0)).with_securement_included(true);
        let summary = calculate_route_permits(
            &registry,
            &segments(&[("TX", 300.0), ("OK", 300.0)]),
            &input,
            &PermitPolicy::default(),
            &EscortRates::default(),
        );
        let tx = summary.state("TX").unwrap();
        let ok = summary.state("OK").unwrap();
        assert!(tx.escort.pole_car && tx.escort.pilot_cars() == 0);
        assert!(!ok.escort.pole_car && ok.escort.pilot_cars() == 1);

        let cost = &summary.escort_cost;
        assert_eq!(cost.trip_days, 2);
        assert_eq!(cost.pole_car_cost, Cents::from_dollars(1_500));
        assert_eq!(cost.escort_cost, Cents::from_dollars(1_200));
    }

    #[test]
    fn test_trip_days() {
        assert_eq!(trip_days(0.0, 300.0), 0);
        assert_eq!(trip_days(300.0, 300.0), 1);
        assert_eq!(trip_days(301.0, 300.0), 2);
    }
}
