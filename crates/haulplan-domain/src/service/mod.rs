//! Domain services

pub mod bridge_formula;
pub mod clearance;
pub mod cost_optimizer;
pub mod fuel;
pub mod hos_validator;
pub mod item_constraints;
pub mod kpra;
pub mod legacy;
pub mod load_planner;
pub mod permit_calculator;
pub mod pipeline;
pub mod route_analyzer;
pub mod route_permits;
pub mod route_states;
pub mod seasonal;
pub mod securement;
pub mod stacking;
pub mod truck_selector;
pub mod validation;
pub mod weight_distribution;

pub use clearance::{check_route_clearances, ClearancePolicy};
pub use cost_optimizer::{
    estimate_load_cost, summarize_plan_costs, CostBreakdown, CostPolicy, LoadCostInputs,
    PlanCostSummary,
};
pub use fuel::{DieselPriceIndex, DieselPricePoint, FuelSurchargeCurve};
pub use hos_validator::{validate_trip_hos, HosCycle, HosPolicy, TripHosInput};
pub use kpra::KpraLimit;
pub use legacy::{from_legacy_format, to_legacy_format, LegacyCargoItem};
pub use load_planner::{plan_loads, PlanOptions};
pub use permit_calculator::{calculate_state_permit, PermitInput, PermitPolicy};
pub use route_analyzer::{analyze_routes, analyze_routes_per_truck, RouteAnalysis, TruckRoutes};
pub use route_permits::{calculate_route_permits, calculate_route_permits_seasonal, EscortRates};
pub use route_states::{detect_route_states, RouteStates};
pub use seasonal::{apply_seasonal_limits, check_route_seasonal_restrictions};
pub use stacking::StackingOptions;
pub use truck_selector::{select_trucks, TruckRecommendation};
pub use validation::validate_cargo_items;
