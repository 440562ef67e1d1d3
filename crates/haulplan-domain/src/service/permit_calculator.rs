//! Single-state oversize/overweight permit calculation
//!
//! `calculate_state_permit` is a pure function of the state record, the
//! envelope and the policy. Every fee is integer cents; distance and tonnage
//! factors go through [`Cents::scale`] once per fee line.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::federal::{DEFAULT_BRIDGE_ANALYSIS_WEIGHT_LBS, DEFAULT_BRIDGE_ANALYSIS_WIDTH_FT};
use crate::model::{
    BridgeAnalysisEstimate, BridgeAnalysisRule, CargoEnvelope, Dimension, DimensionSurcharge, EscortRequirement,
    FeeLine, PermitRequirement, StatePermitData, SurchargeModel,
};
use haulplan_types::{Cents, GeoPoint, INCHES_PER_FOOT, LBS_PER_TON};

/// Configurable permit policy constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermitPolicy {
    /// Chains, binders and edge protectors added to raw cargo width
    pub securement_allowance_inches: f64,
    /// Stand-in distance when a distance-based fee applies and none was supplied
    pub minimum_distance_miles: f64,
    /// Permit data older than this before `as_of` is flagged
    pub stale_after_days: i64,
}

impl Default for PermitPolicy {
    fn default() -> Self {
        Self {
            securement_allowance_inches: 10.0,
            minimum_distance_miles: 50.0,
            stale_after_days: 365,
        }
    }
}

/// Vehicle envelope and trip facts for one permit evaluation.
///
/// `envelope.height_ft` is overall height above the road and
/// `envelope.weight_lbs` is gross vehicle weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermitInput {
    pub envelope: CargoEnvelope,
    #[serde(default)]
    pub width_includes_securement: bool,
    /// In-state miles
    #[serde(default)]
    pub distance_miles: Option<f64>,
    /// Route samples used for special-jurisdiction detection
    #[serde(default)]
    pub sample_points: Option<Vec<GeoPoint>>,
    /// Named highways on the route, for restricted-route checks
    #[serde(default)]
    pub highways: Vec<String>,
    /// Reference date for staleness checks
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl PermitInput {
    pub fn new(envelope: CargoEnvelope) -> Self {
        Self {
            envelope,
            width_includes_securement: false,
            distance_miles: None,
            sample_points: None,
            highways: Vec::new(),
            as_of: None,
        }
    }

    pub fn with_distance(mut self, miles: f64) -> Self {
        self.distance_miles = Some(miles);
        self
    }

    pub fn with_securement_included(mut self, included: bool) -> Self {
        self.width_includes_securement = included;
        self
    }

    pub fn with_sample_points(mut self, points: Vec<GeoPoint>) -> Self {
        self.sample_points = Some(points);
        self
    }

    pub fn with_highways(mut self, highways: Vec<String>) -> Self {
        self.highways = highways;
        self
    }

    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    /// Width compared against limits
    pub fn transport_width_ft(&self, policy: &PermitPolicy) -> f64 {
        if self.width_includes_securement {
            self.envelope.width_ft
        } else {
            self.envelope.width_ft + policy.securement_allowance_inches / INCHES_PER_FOOT
        }
    }
}

/// Federal stand-in when a state publishes no bridge-analysis rule
pub fn federal_bridge_analysis_rule() -> BridgeAnalysisRule {
    BridgeAnalysisRule {
        weight_threshold_lbs: DEFAULT_BRIDGE_ANALYSIS_WEIGHT_LBS,
        width_threshold_ft: Some(DEFAULT_BRIDGE_ANALYSIS_WIDTH_FT),
        cost_min: Cents::from_dollars(2_500),
        cost_max: Cents::from_dollars(15_000),
        processing_time: "4–8 weeks".to_string(),
    }
}

fn dimension_value(dimension: Dimension, width: f64, height: f64, length: f64) -> f64 {
    match dimension {
        Dimension::Width => width,
        Dimension::Height => height,
        Dimension::Length => length,
    }
}

/// Surcharge brackets the load meets, combined per the state's model
fn dimension_surcharges(
    model: SurchargeModel,
    surcharges: &[DimensionSurcharge],
    width: f64,
    height: f64,
    length: f64,
) -> Vec<DimensionSurcharge> {
    let met = surcharges
        .iter()
        .filter(|s| dimension_value(s.dimension, width, height, length) > s.above_ft);
    match model {
        SurchargeModel::Cumulative => met.copied().collect(),
        SurchargeModel::Tiered => {
            let mut highest: Vec<DimensionSurcharge> = Vec::new();
            for s in met {
                match highest.iter_mut().find(|h| h.dimension == s.dimension) {
                    Some(h) if s.above_ft > h.above_ft => *h = *s,
                    Some(_) => {}
                    None => highest.push(*s),
                }
            }
            highest
        }
    }
}

fn escort_requirement(state: &StatePermitData, width: f64, height: f64, length: f64) -> EscortRequirement {
    let rules = &state.escorts;
    let exceeds = |value: f64, threshold: Option<f64>| threshold.is_some_and(|t| value > t);

    let mut req = EscortRequirement::default();
    let by_width = if exceeds(width, rules.width_two_ft) {
        2
    } else if width > rules.width_one_ft {
        1
    } else {
        0
    };
    if by_width > 0 {
        req.reasons.push(format!("{} escort(s) for {:.1} ft width", by_width, width));
    }

    let by_height = if exceeds(height, rules.height_pole_car_ft) {
        req.pole_car = true;
        req.reasons.push(format!("Height pole car for {:.1} ft overall height", height));
        1
    } else {
        0
    };

    let by_length = if exceeds(length, rules.length_two_ft) {
        2
    } else if exceeds(length, rules.length_one_ft) {
        1
    } else {
        0
    };
    if by_length > 0 {
        req.reasons.push(format!("{} escort(s) for {:.1} ft length", by_length, length));
    }

    req.count = by_width.max(by_height).max(by_length);
    req.police = exceeds(width, rules.police_width_ft)
        || exceeds(height, rules.police_height_ft)
        || exceeds(length, rules.police_length_ft);
    if req.police {
        req.reasons.push("Police escort required".to_string());
    }
    req
}

/// Permit requirement for one state
pub fn calculate_state_permit(
    state: &StatePermitData,
    input: &PermitInput,
    policy: &PermitPolicy,
) -> PermitRequirement {
    let env = &input.envelope;
    let width = input.transport_width_ft(policy);
    let height = env.height_ft;
    let length = env.length_ft;
    let gross = env.weight_lbs;
    let limits = &state.legal_limits;

    let mut reasons = Vec::new();
    let mut warnings = Vec::new();
    let mut fees: Vec<FeeLine> = Vec::new();

    if width > limits.max_width_ft {
        reasons.push(format!("Width {:.2} ft exceeds {:.1} ft legal limit", width, limits.max_width_ft));
    }
    if height > limits.max_height_ft {
        reasons.push(format!("Height {:.2} ft exceeds {:.1} ft legal limit", height, limits.max_height_ft));
    }
    if length > limits.max_length_ft {
        reasons.push(format!("Length {:.2} ft exceeds {:.1} ft legal limit", length, limits.max_length_ft));
    }
    let oversize_required = !reasons.is_empty();
    let overweight_required = gross > limits.weight.gross_lbs;
    if overweight_required {
        reasons.push(format!(
            "Gross {:.0} lbs exceeds {:.0} lbs legal limit",
            gross, limits.weight.gross_lbs
        ));
    }
    let permit_required = oversize_required || overweight_required;

    if oversize_required {
        fees.push(FeeLine {
            label: "Oversize permit".to_string(),
            amount: state.oversize.base_fee,
        });
        for s in dimension_surcharges(
            state.oversize.surcharge_model,
            &state.oversize.surcharges,
            width,
            height,
            length,
        ) {
            fees.push(FeeLine {
                label: format!("{} over {:.1} ft", s.dimension.label(), s.above_ft),
                amount: s.fee,
            });
        }
    }

    if overweight_required {
        let ow = &state.overweight;
        fees.push(FeeLine {
            label: "Overweight permit".to_string(),
            amount: ow.base_fee,
        });

        if ow.per_mile.is_some() || ow.ton_mile.is_some() {
            let miles = match input.distance_miles {
                Some(miles) => miles,
                None => {
                    warnings.push(format!(
                        "No in-state distance supplied; distance fee estimated on {:.0} miles, actual cost may be higher",
                        policy.minimum_distance_miles
                    ));
                    policy.minimum_distance_miles
                }
            };
            let per_mile = ow.per_mile.map(|rate| rate.scale(miles));
            let ton_mile = ow.ton_mile.map(|rate| rate.scale(gross / LBS_PER_TON * miles));
            let distance_fee = match (per_mile, ton_mile) {
                (Some(pm), Some(tm)) => {
                    warnings.push(format!(
                        "{} publishes both per-mile ({}) and ton-mile ({}) fees; the larger is used",
                        state.code, pm, tm
                    ));
                    if pm >= tm {
                        Some(("Per-mile fee", pm))
                    } else {
                        Some(("Ton-mile fee", tm))
                    }
                }
                (Some(pm), None) => Some(("Per-mile fee", pm)),
                (None, Some(tm)) => Some(("Ton-mile fee", tm)),
                (None, None) => None,
            };
            if let Some((label, amount)) = distance_fee {
                fees.push(FeeLine {
                    label: format!("{} ({:.0} mi)", label, miles),
                    amount,
                });
            }
        }

        if let Some(bracket) = ow
            .weight_brackets
            .iter()
            .filter(|b| gross > b.above_lbs)
            .max_by(|a, b| a.above_lbs.total_cmp(&b.above_lbs))
        {
            fees.push(FeeLine {
                label: format!("Weight over {:.0} lbs", bracket.above_lbs),
                amount: bracket.fee,
            });
        }
    }

    if permit_required && !state.special_jurisdictions.is_empty() {
        match &input.sample_points {
            Some(points) => {
                for j in &state.special_jurisdictions {
                    if points.iter().any(|p| j.bounds.contains(p)) {
                        fees.push(FeeLine {
                            label: format!("{} permit", j.name),
                            amount: j.permit_fee,
                        });
                        reasons.push(format!("Route enters {}, which issues its own permit", j.name));
                    }
                }
            }
            None => {
                for j in &state.special_jurisdictions {
                    warnings.push(format!(
                        "Route points not supplied: a {} permit ({}) may also be required",
                        j.name, j.permit_fee
                    ));
                }
            }
        }
    }

    let escort = escort_requirement(state, width, height, length);

    let sl = &state.superload;
    let is_superload =
        width >= sl.width_ft || height >= sl.height_ft || length >= sl.length_ft || gross >= sl.weight_lbs;
    if is_superload {
        reasons.push("Superload: engineering review and route survey required".to_string());
    }

    let (rule, federal_default) = match &state.bridge_analysis {
        Some(rule) => (rule.clone(), false),
        None => (federal_bridge_analysis_rule(), true),
    };
    let bridge_analysis_required =
        gross > rule.weight_threshold_lbs || rule.width_threshold_ft.is_some_and(|w| width > w);
    let bridge_analysis = bridge_analysis_required.then(|| {
        if federal_default {
            warnings.push(format!(
                "{} has no bridge-analysis data; federal default thresholds applied",
                state.code
            ));
        }
        BridgeAnalysisEstimate {
            cost_min: rule.cost_min,
            cost_max: rule.cost_max,
            processing_time: rule.processing_time.clone(),
            federal_default,
        }
    });

    let continuous_permit_available = permit_required
        && !bridge_analysis_required
        && !is_superload
        && state
            .oversize
            .annual
            .is_some_and(|annual| annual.covers(width, height, length, gross));
    if continuous_permit_available {
        if let Some(annual) = &state.oversize.annual {
            reasons.push(format!("Annual permit available ({})", annual.fee));
        }
    }

    for route in &state.restricted_routes {
        let named = input.highways.is_empty()
            || input
                .highways
                .iter()
                .any(|h| h.trim().eq_ignore_ascii_case(route.highway.trim()));
        if !named {
            continue;
        }
        let over = |value: f64, limit: Option<f64>| limit.is_some_and(|l| value > l);
        let mut exceeded = Vec::new();
        if over(width, route.max_width_ft) {
            exceeded.push("width");
        }
        if over(height, route.max_height_ft) {
            exceeded.push("height");
        }
        if over(length, route.max_length_ft) {
            exceeded.push("length");
        }
        if over(gross, route.max_weight_lbs) {
            exceeded.push("weight");
        }
        if exceeded.is_empty() {
            continue;
        }
        if route.permit_available {
            warnings.push(format!(
                "{} posted {} limit exceeded; travel on it needs permit approval",
                route.highway,
                exceeded.join("/")
            ));
        } else {
            warnings.push(format!(
                "Must avoid {}: posted {} limit exceeded and no permit is available",
                route.highway,
                exceeded.join("/")
            ));
        }
    }

    let restrictions = if permit_required {
        state.travel.describe()
    } else {
        Vec::new()
    };

    if let Some(as_of) = input.as_of {
        let age = (as_of - state.last_verified).num_days();
        if age > policy.stale_after_days {
            warn!(state = %state.code, age_days = age, "stale permit data");
            warnings.push(format!(
                "{} permit data last verified {} ({} days ago); confirm fees with the state",
                state.code, state.last_verified, age
            ));
        }
    }

    let estimated_fee: Cents = fees.iter().map(|f| f.amount).sum();
    debug!(
        state = %state.code,
        oversize = oversize_required,
        overweight = overweight_required,
        fee = estimated_fee.0,
        escorts = escort.count,
        "state permit"
    );

    PermitRequirement {
        state: state.code.clone(),
        state_name: state.name.clone(),
        distance_miles: input.distance_miles.unwrap_or(0.0),
        oversize_required,
        overweight_required,
        is_superload,
        bridge_analysis_required,
        bridge_analysis,
        continuous_permit_available,
        escort,
        estimated_fee,
        fee_breakdown: fees,
        reasons,
        restrictions,
        warnings,
    }
}
