//! Planning Service - end-to-end shipment quote
//!
//! This service orchestrates the complete planning workflow:
//! 1. Validate the request
//! 2. Plan loads against the trailer catalog (KPRA caps from the primary route)
//! 3. Price permits and escorts for every load on every route alternative
//! 4. Recommend routes for the fleet and report per-truck divergences
//! 5. Cost each load on its route
//! 6. Validate hours of service
//! 7. Screen low-clearance bridges and seasonal restrictions

use std::collections::HashSet;
use std::path::Path;
use std::thread;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use haulplan_domain::model::{
    CargoItem, ClearanceReport, HosStatus, LoadHos, LoadPlan, PlannedLoad, RouteAlternative,
    RouteCandidate, RoutePermitSummary, SeasonalCheck,
};
use haulplan_domain::service::clearance::{check_route_clearances, ClearancePolicy};
use haulplan_domain::service::cost_optimizer::{estimate_load_cost, summarize_plan_costs, LoadCostInputs};
use haulplan_domain::service::hos_validator::{validate_trip_hos, TripHosInput};
use haulplan_domain::service::kpra::KpraLimit;
use haulplan_domain::service::load_planner::{plan_loads, PlanOptions};
use haulplan_domain::service::permit_calculator::PermitInput;
use haulplan_domain::service::route_analyzer::{
    analyze_routes_per_truck, weights::MAX_ALTERNATIVES, FleetRouteAnalysis, TruckRoutes,
};
use haulplan_domain::service::route_permits::{calculate_route_permits_seasonal, SeasonalAdjustment};
use haulplan_domain::service::seasonal::check_route_seasonal_restrictions;
use haulplan_domain::{PermitRegistry, TrailerCatalog};
use haulplan_types::{Error, Result, ValidationError};

use crate::config::PlannerConfig;
use crate::constants::{DIESEL_PRICE_INDEX, LOW_CLEARANCE_BRIDGES, SEASONAL_RESTRICTIONS};
use crate::repository::StaticReference;

/// Cargo manifest plus 1-3 candidate routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub items: Vec<CargoItem>,
    /// The first route is the primary one
    pub routes: Vec<RouteCandidate>,
    #[serde(default)]
    pub trip_date: Option<NaiveDate>,
    /// Delivery stops in route order
    #[serde(default)]
    pub destination_order: Vec<String>,
    #[serde(default)]
    pub overweight_permitted: Option<bool>,
    /// Driver clock at dispatch
    #[serde(default)]
    pub driver_status: Option<HosStatus>,
}

/// Route outcome for one planned load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRouting {
    pub load_id: String,
    pub route_id: String,
    /// True when this load should leave the shared route
    pub diverges: bool,
    pub permits: RoutePermitSummary,
    pub clearance: ClearanceReport,
    pub seasonal: SeasonalCheck,
}

impl ShipmentRequest {
    /// Load a request from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentQuote {
    pub trip_date: NaiveDate,
    /// Loads with cost and HOS summaries filled in
    pub plan: LoadPlan,
    pub route_analysis: Option<FleetRouteAnalysis>,
    pub routing: Vec<LoadRouting>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Shipment planner over a trailer catalog and a permit registry
pub struct PlanningService<C = StaticReference, R = StaticReference> {
    catalog: C,
    registry: R,
    config: PlannerConfig,
}

impl PlanningService {
    /// Planner over the built-in reference tables
    pub fn new(config: PlannerConfig) -> Self {
        Self::with_reference(StaticReference, StaticReference, config)
    }
}

impl<C, R> PlanningService<C, R>
where
    C: TrailerCatalog + Sync,
    R: PermitRegistry + Sync,
{
    pub fn with_reference(catalog: C, registry: R, config: PlannerConfig) -> Self {
        Self {
            catalog,
            registry,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    fn validate(request: &ShipmentRequest) -> std::result::Result<(), ValidationError> {
        if request.routes.is_empty() {
            return Err(ValidationError::InvalidRequest("at least one route is required".to_string()));
        }
        if request.routes.len() > MAX_ALTERNATIVES {
            return Err(ValidationError::InvalidRequest(format!(
                "at most {} route alternatives are supported",
                MAX_ALTERNATIVES
            )));
        }
        let mut ids = HashSet::new();
        for route in &request.routes {
            if !ids.insert(route.id.as_str()) {
                return Err(ValidationError::InvalidRequest(format!(
                    "route id '{}' is used more than once",
                    route.id
                )));
            }
            if route.segments.is_empty() {
                return Err(ValidationError::InvalidRequest(format!(
                    "route '{}' has no state segments",
                    route.id
                )));
            }
            if !route.total_distance_miles.is_finite() || route.total_distance_miles < 0.0 {
                return Err(ValidationError::InvalidRequest(format!(
                    "route '{}' has an invalid distance",
                    route.id
                )));
            }
        }
        Ok(())
    }

    fn trip_date(&self, request: &ShipmentRequest) -> NaiveDate {
        request
            .trip_date
            .or(self.config.planner.default_trip_date)
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// KPRA caps of every state on the route that has one
    pub fn kpra_limits(&self, route: &RouteCandidate) -> Vec<KpraLimit> {
        route
            .segments
            .iter()
            .filter_map(|seg| {
                let state = self.registry.state(&seg.state)?;
                state.kpra_limit_ft.map(|limit| KpraLimit::new(state.code.clone(), limit))
            })
            .collect()
    }

    /// Permits and escorts for one load on one route, seasonal limits applied
    pub fn evaluate_route(&self, load: &PlannedLoad, route: &RouteCandidate, date: NaiveDate) -> RouteAlternative {
        let mut input = PermitInput::new(load.permit_envelope(self.config.permits.securement_allowance_inches))
            .with_securement_included(true)
            .with_highways(route.highways.clone())
            .as_of(date);
        if !route.sample_points.is_empty() {
            input = input.with_sample_points(route.sample_points.clone());
        }
        let permits = calculate_route_permits_seasonal(
            &self.registry,
            &route.segments,
            &input,
            &self.config.permits,
            &self.config.escort,
            Some(SeasonalAdjustment {
                date,
                table: &SEASONAL_RESTRICTIONS,
            }),
        );
        RouteAlternative::from_candidate(route, permits)
    }

    fn evaluate_load(&self, load: &PlannedLoad, routes: &[RouteCandidate], date: NaiveDate) -> TruckRoutes {
        TruckRoutes {
            truck_id: load.id.clone(),
            alternatives: routes.iter().map(|r| self.evaluate_route(load, r, date)).collect(),
        }
    }

    fn evaluate_all(&self, loads: &[PlannedLoad], routes: &[RouteCandidate], date: NaiveDate) -> Result<Vec<TruckRoutes>> {
        if !self.config.planner.parallel || loads.len() < 2 {
            return Ok(loads.iter().map(|l| self.evaluate_load(l, routes, date)).collect());
        }
        thread::scope(|s| {
            let handles: Vec<_> = loads
                .iter()
                .map(|load| s.spawn(move || self.evaluate_load(load, routes, date)))
                .collect();
            handles
                .into_iter()
                .map(|h| {
                    h.join()
                        .map_err(|_| Error::Route("route evaluation worker panicked".to_string()))
                })
                .collect()
        })
    }

    pub fn plan_shipment(&self, request: &ShipmentRequest) -> Result<ShipmentQuote> {
        Self::validate(request)?;
        let date = self.trip_date(request);
        let primary = &request.routes[0];

        let options = PlanOptions {
            stacking: self.config.stacking.clone(),
            kpra_limits: self.kpra_limits(primary),
            overweight_permitted: request.overweight_permitted,
            destination_order: request.destination_order.clone(),
        };
        let mut plan = plan_loads(&request.items, &self.catalog, &options)?;
        info!(
            loads = plan.loads.len(),
            unassigned = plan.unassigned_items.len(),
            %date,
            "loads planned"
        );

        let mut warnings = Vec::new();
        if plan.loads.is_empty() {
            warnings.push("No cargo could be assigned to a trailer; routing skipped".to_string());
            return Ok(ShipmentQuote {
                trip_date: date,
                plan,
                route_analysis: None,
                routing: Vec::new(),
                warnings,
            });
        }

        let trucks = self.evaluate_all(&plan.loads, &request.routes, date)?;
        let fleet = analyze_routes_per_truck(&trucks)?;
        info!(route = %fleet.shared.recommended_route_id, "shared route recommended");
        for d in &fleet.divergences {
            warn!(truck = %d.truck_id, route = %d.recommended_route_id, "route divergence");
            warnings.push(d.reasoning.clone());
        }

        let mut routing = Vec::with_capacity(plan.loads.len());
        let mut costs = Vec::with_capacity(plan.loads.len());
        let mut hos = Vec::with_capacity(plan.loads.len());

        for (load, truck) in plan.loads.iter().zip(&trucks) {
            let divergence = fleet.divergences.iter().find(|d| d.truck_id == load.id);
            let route_id = divergence
                .map(|d| d.recommended_route_id.as_str())
                .unwrap_or(fleet.shared.recommended_route_id.as_str());
            let (Some(alt), Some(candidate)) = (
                truck.alternatives.iter().find(|a| a.id == route_id),
                request.routes.iter().find(|r| r.id == route_id),
            ) else {
                return Err(Error::Route(format!("route '{}' missing for {}", route_id, load.id)));
            };
            debug!(load = %load.id, route = route_id, "route assigned");

            costs.push(estimate_load_cost(
                load,
                &LoadCostInputs {
                    distance_miles: alt.total_distance_miles,
                    trip_date: date,
                    permits: Some(&alt.permits),
                },
                &self.config.cost,
                &DIESEL_PRICE_INDEX,
            ));

            let mut hos_input = TripHosInput::new(alt.total_distance_miles);
            if let Some(status) = request.driver_status {
                hos_input = hos_input.with_start_status(status);
            }
            let validation = validate_trip_hos(&hos_input, &self.config.hos);
            if let Some(reason) = &validation.infeasible_reason {
                warnings.push(format!("{}: {}", load.id, reason));
            }
            hos.push(LoadHos {
                load_id: load.id.clone(),
                route_id: route_id.to_string(),
                validation,
            });

            let clearance = check_route_clearances(
                &candidate.sample_points,
                load.height_ft,
                &LOW_CLEARANCE_BRIDGES,
                &ClearancePolicy::default(),
            );
            let states: Vec<&str> = alt.segments.iter().map(|s| s.state.as_str()).collect();
            let seasonal = check_route_seasonal_restrictions(&states, date, &SEASONAL_RESTRICTIONS);

            routing.push(LoadRouting {
                load_id: load.id.clone(),
                route_id: route_id.to_string(),
                diverges: divergence.is_some(),
                permits: alt.permits.clone(),
                clearance,
                seasonal,
            });
        }

        plan.cost = Some(summarize_plan_costs(costs, plan.total_items));
        plan.hos = Some(hos);

        Ok(ShipmentQuote {
            trip_date: date,
            plan,
            route_analysis: Some(fleet),
            routing,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulplan_domain::model::StateSegment;

    fn route(id: &str, states: &[(&str, f64)]) -> RouteCandidate {
        RouteCandidate {
            id: id.to_string(),
            name: format!("Route {}", id),
            segments: states.iter().map(|(s, d)| StateSegment::new(*s, *d)).collect(),
            total_distance_miles: states.iter().map(|(_, d)| d).sum(),
            total_duration_hours: states.iter().map(|(_, d)| d / 55.0).sum(),
            sample_points: Vec::new(),
            highways: Vec::new(),
        }
    }

    fn request(items: Vec<CargoItem>, routes: Vec<RouteCandidate>) -> ShipmentRequest {
        ShipmentRequest {
            items,
            routes,
            trip_date: NaiveDate::from_ymd_opt(2026, 8, 15),
            destination_order: Vec::new(),
            overweight_permitted: None,
            driver_status: None,
        }
    }

    #[test]
    fn test_rejects_missing_routes() {
        let service = PlanningService::new(PlannerConfig::default());
        let req = request(vec![CargoItem::new("Crate", 10.0, 6.0, 7.0, 15_000.0)], Vec::new());
        assert!(matches!(
            service.plan_shipment(&req),
            Err(Error::Validation(ValidationError::InvalidRequest(_)))
        ));
    }

    #[test]
    fn test_rejects_duplicate_route_ids() {
        let service = PlanningService::new(PlannerConfig::default());
        let req = request(
            vec![CargoItem::new("Crate", 10.0, 6.0, 7.0, 15_000.0)],
            vec![route("i-40", &[("TX", 300.0)]), route("i-40", &[("OK", 250.0)])],
        );
        assert!(matches!(
            service.plan_shipment(&req),
            Err(Error::Validation(ValidationError::InvalidRequest(msg))) if msg.contains("i-40")
        ));
    }

    #[test]
    fn test_rejects_empty_cargo() {
        let service = PlanningService::new(PlannerConfig::default());
        let req = request(Vec::new(), vec![route("a", &[("TX", 300.0)])]);
        assert!(matches!(
            service.plan_shipment(&req),
            Err(Error::Validation(ValidationError::EmptyCargo))
        ));
    }

    #[test]
    fn test_kpra_limits_from_route_states() {
        let service = PlanningService::new(PlannerConfig::default());
        let limits = service.kpra_limits(&route("west", &[("NV", 100.0), ("CA", 300.0), ("OR", 200.0)]));
        let codes: Vec<&str> = limits.iter().map(|l| l.state.as_str()).collect();
        assert_eq!(codes, vec!["CA", "OR"]);
        assert_eq!(limits[0].limit_ft, 40.0);
    }

    #[test]
    fn test_small_shipment_quote() {
        let service = PlanningService::new(PlannerConfig::default());
        let items = vec![CargoItem::new("Crate", 10.0, 6.0, 7.0, 15_000.0).with_id("crate-1")];
        let quote = service
            .plan_shipment(&request(items, vec![route("a", &[("TX", 250.0), ("OK", 150.0)])]))
            .unwrap();

        assert_eq!(quote.plan.loads.len(), 1);
        assert_eq!(quote.routing.len(), 1);
        assert_eq!(quote.routing[0].route_id, "a");
        assert_eq!(quote.routing[0].permits.total_permit_fees, haulplan_types::Cents::ZERO);
        // No sample points supplied
        assert!(!quote.routing[0].clearance.complete);
        let cost = quote.plan.cost.as_ref().unwrap();
        assert_eq!(cost.loads.len(), 1);
        assert!(cost.total_cost > haulplan_types::Cents::ZERO);
        let hos = quote.plan.hos.as_ref().unwrap();
        assert!(hos[0].validation.feasible);
    }
}
