//! Per-load cost breakdown: trailer days, fuel, permits and escorts

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::fuel::{DieselPriceIndex, FuelSurchargeCurve};
use super::route_permits::trip_days;
use crate::model::{PlannedLoad, RoutePermitSummary, TrailerCategory};
use haulplan_types::Cents;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailerDayRate {
    pub category: TrailerCategory,
    pub rate: Cents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostPolicy {
    pub truck_mpg: f64,
    pub average_daily_miles: f64,
    pub day_rates: Vec<TrailerDayRate>,
    /// Used for categories without an explicit rate
    pub default_day_rate: Cents,
    pub fuel_surcharge: FuelSurchargeCurve,
    /// Replaces the index lookup when set
    pub diesel_price_override: Option<Cents>,
}

impl Default for CostPolicy {
    fn default() -> Self {
        let rate = |category, dollars| TrailerDayRate {
            category,
            rate: Cents::from_dollars(dollars),
        };
        Self {
            truck_mpg: 5.5,
            average_daily_miles: 300.0,
            day_rates: vec![
                rate(TrailerCategory::Flatbed, 450),
                rate(TrailerCategory::StepDeck, 500),
                rate(TrailerCategory::Conestoga, 550),
                rate(TrailerCategory::Landoll, 600),
                rate(TrailerCategory::DoubleDrop, 650),
                rate(TrailerCategory::Stretch, 750),
                rate(TrailerCategory::Rgn, 850),
                rate(TrailerCategory::Lowboy, 900),
                rate(TrailerCategory::MultiAxle, 1_200),
                rate(TrailerCategory::Perimeter, 1_800),
                rate(TrailerCategory::Schnabel, 2_500),
            ],
            default_day_rate: Cents::from_dollars(500),
            fuel_surcharge: FuelSurchargeCurve::default(),
            diesel_price_override: None,
        }
    }
}

impl CostPolicy {
    pub fn day_rate(&self, category: TrailerCategory) -> Cents {
        self.day_rates
            .iter()
            .find(|r| r.category == category)
            .map_or(self.default_day_rate, |r| r.rate)
    }
}

/// Trip facts for one load on its chosen route
#[derive(Debug, Clone, Copy)]
pub struct LoadCostInputs<'a> {
    pub distance_miles: f64,
    pub trip_date: NaiveDate,
    pub permits: Option<&'a RoutePermitSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub load_id: String,
    pub trailer_category: TrailerCategory,
    pub distance_miles: f64,
    pub trip_days: u32,
    pub day_rate: Cents,
    pub trailer_cost: Cents,
    pub gallons: f64,
    /// Index price before surcharge, per gallon
    pub diesel_price: Cents,
    pub surcharge_percent: f64,
    pub fuel_price: Cents,
    pub fuel_cost: Cents,
    pub permit_fees: Cents,
    pub escort_cost: Cents,
    pub total: Cents,
    #[serde(default)]
    pub warnings: Vec<String>,
}

pub fn estimate_load_cost(
    load: &PlannedLoad,
    inputs: &LoadCostInputs<'_>,
    policy: &CostPolicy,
    index: &DieselPriceIndex,
) -> CostBreakdown {
    let mut warnings = Vec::new();
    let distance = inputs.distance_miles.max(0.0);
    let days = trip_days(distance, policy.average_daily_miles);
    let day_rate = policy.day_rate(load.trailer.category);
    let trailer_cost = day_rate * days;

    let gallons = if policy.truck_mpg > 0.0 {
        distance / policy.truck_mpg
    } else {
        warnings.push("Truck MPG is not positive; fuel cost omitted".to_string());
        0.0
    };

    let diesel_price = match policy.diesel_price_override {
        Some(price) => price,
        None => match index.price_on(inputs.trip_date) {
            Some(quote) => {
                if let Some(w) = quote.warning {
                    warn!(load = %load.id, "{}", w);
                    warnings.push(w);
                }
                quote.price
            }
            None => {
                warnings.push("No diesel price available; fuel cost omitted".to_string());
                Cents::ZERO
            }
        },
    };
    let surcharge_percent = policy.fuel_surcharge.percent_for(diesel_price);
    let fuel_price = policy.fuel_surcharge.adjusted_price(diesel_price);
    let fuel_cost = fuel_price.scale(gallons);

    let (permit_fees, escort_cost) = inputs
        .permits
        .map_or((Cents::ZERO, Cents::ZERO), |p| (p.total_permit_fees, p.escort_cost.total));

    let total = trailer_cost + fuel_cost + permit_fees + escort_cost;
    debug!(load = %load.id, days, fuel = fuel_cost.0, total = total.0, "load cost");

    CostBreakdown {
        load_id: load.id.clone(),
        trailer_category: load.trailer.category,
        distance_miles: distance,
        trip_days: days,
        day_rate,
        trailer_cost,
        gallons,
        diesel_price,
        surcharge_percent,
        fuel_price,
        fuel_cost,
        permit_fees,
        escort_cost,
        total,
        warnings,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanCostSummary {
    pub loads: Vec<CostBreakdown>,
    pub total_trailer_cost: Cents,
    pub total_fuel_cost: Cents,
    pub total_permit_fees: Cents,
    pub total_escort_cost: Cents,
    pub total_cost: Cents,
    pub item_count: usize,
    pub average_cost_per_item: Cents,
}

/// Totals across loads; the per-item average is over cargo line items
pub fn summarize_plan_costs(loads: Vec<CostBreakdown>, item_count: usize) -> PlanCostSummary {
    let total_trailer_cost = loads.iter().map(|l| l.trailer_cost).sum();
    let total_fuel_cost = loads.iter().map(|l| l.fuel_cost).sum();
    let total_permit_fees = loads.iter().map(|l| l.permit_fees).sum();
    let total_escort_cost = loads.iter().map(|l| l.escort_cost).sum();
    let total_cost: Cents = loads.iter().map(|l| l.total).sum();
    let average_cost_per_item = if item_count == 0 {
        Cents::ZERO
    } else {
        total_cost.scale(1.0 / item_count as f64)
    };
    PlanCostSummary {
        loads,
        total_trailer_cost,
        total_fuel_cost,
        total_permit_fees,
        total_escort_cost,
        total_cost,
        item_count,
        average_cost_per_item,
    }
}
