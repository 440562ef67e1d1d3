//! State permit schedules and computed permit requirements

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use haulplan_types::{Cents, GeoPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Width,
    Height,
    Length,
}

impl Dimension {
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Width => "width",
            Dimension::Height => "height",
            Dimension::Length => "length",
        }
    }
}

/// How dimension surcharge brackets combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeModel {
    /// Every bracket the load meets is added
    Cumulative,
    /// Only the highest bracket met (per dimension) applies
    Tiered,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightLimits {
    pub gross_lbs: f64,
    pub single_axle_lbs: f64,
    pub tandem_axle_lbs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegalLimits {
    pub max_width_ft: f64,
    pub max_height_ft: f64,
    pub max_length_ft: f64,
    pub weight: WeightLimits,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionSurcharge {
    pub dimension: Dimension,
    /// Applies when the dimension strictly exceeds this value
    pub above_ft: f64,
    pub fee: Cents,
}

/// Annual / continuous permit and the envelope it covers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualPermit {
    pub fee: Cents,
    pub max_width_ft: f64,
    pub max_height_ft: f64,
    pub max_length_ft: f64,
    pub max_weight_lbs: f64,
}

impl AnnualPermit {
    pub fn covers(&self, width_ft: f64, height_ft: f64, length_ft: f64, weight_lbs: f64) -> bool {
        width_ft <= self.max_width_ft
            && height_ft <= self.max_height_ft
            && length_ft <= self.max_length_ft
            && weight_lbs <= self.max_weight_lbs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OversizeSchedule {
    pub base_fee: Cents,
    pub surcharge_model: SurchargeModel,
    #[serde(default)]
    pub surcharges: Vec<DimensionSurcharge>,
    #[serde(default)]
    pub annual: Option<AnnualPermit>,
    pub processing_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBracket {
    /// Applies when gross weight strictly exceeds this value
    pub above_lbs: f64,
    pub fee: Cents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverweightSchedule {
    pub base_fee: Cents,
    /// Cents per in-state mile
    #[serde(default)]
    pub per_mile: Option<Cents>,
    /// Cents per gross ton per in-state mile
    #[serde(default)]
    pub ton_mile: Option<Cents>,
    /// Highest bracket met is added on top of distance fees
    #[serde(default)]
    pub weight_brackets: Vec<WeightBracket>,
}

/// Thresholds above which escorts are required. Counts are 0, 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscortRules {
    pub width_one_ft: f64,
    #[serde(default)]
    pub width_two_ft: Option<f64>,
    /// Height that requires a pole car (counts as one escort)
    #[serde(default)]
    pub height_pole_car_ft: Option<f64>,
    #[serde(default)]
    pub length_one_ft: Option<f64>,
    #[serde(default)]
    pub length_two_ft: Option<f64>,
    #[serde(default)]
    pub police_width_ft: Option<f64>,
    #[serde(default)]
    pub police_height_ft: Option<f64>,
    #[serde(default)]
    pub police_length_ft: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRestrictions {
    pub daylight_only: bool,
    pub weekend_travel: bool,
    pub holiday_travel: bool,
    /// Free-text curfews (metro rush hours etc.)
    #[serde(default)]
    pub curfews: Vec<String>,
}

impl TravelRestrictions {
    /// Restrictions as human-readable lines
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.daylight_only {
            lines.push("Travel limited to daylight hours (30 min after sunrise to 30 min before sunset)".to_string());
        }
        if !self.weekend_travel {
            lines.push("No weekend travel".to_string());
        }
        if !self.holiday_travel {
            lines.push("No travel on observed holidays".to_string());
        }
        lines.extend(self.curfews.iter().cloned());
        lines
    }
}

/// Superload classification thresholds (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuperloadThresholds {
    pub width_ft: f64,
    pub height_ft: f64,
    pub length_ft: f64,
    pub weight_lbs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeAnalysisRule {
    pub weight_threshold_lbs: f64,
    #[serde(default)]
    pub width_threshold_ft: Option<f64>,
    pub cost_min: Cents,
    pub cost_max: Cents,
    pub processing_time: String,
}

/// Latitude/longitude rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }
}

/// A city or authority permit nested inside a state's regime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialJurisdiction {
    pub name: String,
    pub bounds: GeoBounds,
    pub permit_fee: Cents,
    #[serde(default)]
    pub notes: String,
}

/// A named highway with its own posted limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictedRoute {
    pub highway: String,
    #[serde(default)]
    pub max_width_ft: Option<f64>,
    #[serde(default)]
    pub max_height_ft: Option<f64>,
    #[serde(default)]
    pub max_length_ft: Option<f64>,
    #[serde(default)]
    pub max_weight_lbs: Option<f64>,
    /// Whether an oversize permit can authorise travel beyond the posted limits
    pub permit_available: bool,
    #[serde(default)]
    pub notes: String,
}

/// Permit regime of one state or DC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePermitData {
    pub code: String,
    pub name: String,
    pub legal_limits: LegalLimits,
    pub oversize: OversizeSchedule,
    pub overweight: OverweightSchedule,
    pub escorts: EscortRules,
    pub travel: TravelRestrictions,
    pub superload: SuperloadThresholds,
    #[serde(default)]
    pub bridge_analysis: Option<BridgeAnalysisRule>,
    #[serde(default)]
    pub special_jurisdictions: Vec<SpecialJurisdiction>,
    #[serde(default)]
    pub restricted_routes: Vec<RestrictedRoute>,
    /// Kingpin-to-rear-axle cap
    #[serde(default)]
    pub kpra_limit_ft: Option<f64>,
    pub last_verified: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeLine {
    pub label: String,
    pub amount: Cents,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EscortRequirement {
    pub count: u8,
    pub pole_car: bool,
    pub police: bool,
    #[serde(default)]
    pub reasons: Vec<String>,
}

impl EscortRequirement {
    /// Pilot cars beyond the pole car, which doubles as the lead escort
    pub fn pilot_cars(&self) -> u8 {
        self.count.saturating_sub(u8::from(self.pole_car))
    }
}

/// Estimated engineering review for a heavy or wide move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeAnalysisEstimate {
    pub cost_min: Cents,
    pub cost_max: Cents,
    pub processing_time: String,
    /// True when the federal default stood in for missing state data
    pub federal_default: bool,
}

/// Permit outcome for one state, one envelope and one in-state distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermitRequirement {
    pub state: String,
    pub state_name: String,
    pub distance_miles: f64,
    pub oversize_required: bool,
    pub overweight_required: bool,
    pub is_superload: bool,
    pub bridge_analysis_required: bool,
    #[serde(default)]
    pub bridge_analysis: Option<BridgeAnalysisEstimate>,
    pub continuous_permit_available: bool,
    pub escort: EscortRequirement,
    pub estimated_fee: Cents,
    #[serde(default)]
    pub fee_breakdown: Vec<FeeLine>,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub restrictions: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl PermitRequirement {
    pub fn permit_required(&self) -> bool {
        self.oversize_required || self.overweight_required
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EscortCost {
    pub trip_days: u32,
    pub escort_count: u8,
    pub escort_cost: Cents,
    pub pole_car_cost: Cents,
    pub police_hours: f64,
    pub police_cost: Cents,
    pub total: Cents,
}

/// Permits for every traversed state of one route and one envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePermitSummary {
    pub states: Vec<PermitRequirement>,
    pub total_permit_fees: Cents,
    pub max_escort_count: u8,
    pub needs_pole_car: bool,
    pub needs_police: bool,
    pub escort_cost: EscortCost,
    pub is_superload: bool,
    pub bridge_analysis_required: bool,
    pub total_distance_miles: f64,
    /// Permit fees plus escort cost
    pub total_cost: Cents,
    #[serde(default)]
    pub skipped_states: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl RoutePermitSummary {
    pub fn restriction_count(&self) -> usize {
        self.states.iter().map(|s| s.restrictions.len()).sum()
    }

    pub fn state(&self, code: &str) -> Option<&PermitRequirement> {
        self.states.iter().find(|s| s.state.eq_ignore_ascii_case(code))
    }
}
