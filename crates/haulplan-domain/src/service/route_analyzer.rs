//! Route alternative scoring and recommendation

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::RouteAlternative;
use haulplan_types::{Cents, ValidationError};

/// Scoring policy; weights sum to 1
pub mod weights {
    pub const COST: f64 = 0.40;
    pub const DURATION: f64 = 0.20;
    pub const STATE_COUNT: f64 = 0.15;
    pub const RESTRICTIONS: f64 = 0.15;
    pub const SUPERLOAD: f64 = 0.10;

    pub const MAX_ALTERNATIVES: usize = 3;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteScore {
    pub route_id: String,
    /// 0–100
    pub total: f64,
    pub cost: f64,
    pub duration: f64,
    pub state_count: f64,
    pub restrictions: f64,
    pub superload: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteComparison {
    pub route_id: String,
    pub route_name: String,
    /// Positive when this route costs more than the recommendation
    pub cost_delta: Cents,
    pub duration_delta_hours: f64,
    pub distance_delta_miles: f64,
    pub state_count_delta: i64,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAnalysis {
    pub recommended_route_id: String,
    pub scores: Vec<RouteScore>,
    pub reasoning: Vec<String>,
    pub comparisons: Vec<RouteComparison>,
}

impl RouteAnalysis {
    pub fn score_of(&self, route_id: &str) -> Option<&RouteScore> {
        self.scores.iter().find(|s| s.route_id == route_id)
    }
}

/// Route alternatives evaluated for one truck's envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckRoutes {
    pub truck_id: String,
    pub alternatives: Vec<RouteAlternative>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckRouteAnalysis {
    pub truck_id: String,
    pub analysis: RouteAnalysis,
}

/// A truck that should not follow the shared route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDivergence {
    pub truck_id: String,
    pub shared_route_id: String,
    pub recommended_route_id: String,
    pub avoids_superload: bool,
    /// Permit and escort saving versus the shared route
    pub cost_saving: Cents,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetRouteAnalysis {
    pub shared: RouteAnalysis,
    pub per_truck: Vec<TruckRouteAnalysis>,
    pub divergences: Vec<RouteDivergence>,
}

/// Lower raw values score higher; all-equal metrics score full marks
fn normalize_lower_better(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    values
        .iter()
        .map(|v| if range <= 0.0 { 1.0 } else { (max - v) / range })
        .collect()
}

fn check_alternatives(alternatives: &[RouteAlternative]) -> Result<(), ValidationError> {
    if alternatives.is_empty() {
        return Err(ValidationError::InvalidRequest("no route alternatives supplied".to_string()));
    }
    if alternatives.len() > weights::MAX_ALTERNATIVES {
        return Err(ValidationError::InvalidRequest(format!(
            "at most {} route alternatives can be compared, got {}",
            weights::MAX_ALTERNATIVES,
            alternatives.len()
        )));
    }
    for (i, alt) in alternatives.iter().enumerate() {
        if alternatives[..i].iter().any(|other| other.id == alt.id) {
            return Err(ValidationError::InvalidRequest(format!(
                "route id '{}' appears more than once",
                alt.id
            )));
        }
    }
    Ok(())
}

/// Strictly lowest value, or `None` when another alternative ties it
fn unique_min<T: PartialOrd + Copy>(values: &[T]) -> Option<usize> {
    let (mut best, mut tied) = (0, false);
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v < values[best] {
            best = i;
            tied = false;
        } else if *v == values[best] {
            tied = true;
        }
    }
    (!tied).then_some(best)
}

fn reasoning_for(winner: usize, alternatives: &[RouteAlternative]) -> Vec<String> {
    let mut reasons = Vec::new();
    if alternatives.len() < 2 {
        reasons.push("Only one route alternative was evaluated".to_string());
        return reasons;
    }
    let costs: Vec<Cents> = alternatives.iter().map(|a| a.total_cost()).collect();
    let hours: Vec<f64> = alternatives.iter().map(|a| a.total_duration_hours).collect();
    let states: Vec<usize> = alternatives.iter().map(|a| a.state_count()).collect();

    if unique_min(&costs) == Some(winner) {
        reasons.push(format!("Cheapest permits and escorts ({})", costs[winner]));
    }
    if unique_min(&hours) == Some(winner) {
        reasons.push(format!("Fastest ({:.1} hours)", hours[winner]));
    }
    if unique_min(&states) == Some(winner) {
        reasons.push(format!("Fewest states ({})", states[winner]));
    }
    let superloads = alternatives.iter().filter(|a| a.permits.is_superload).count();
    if !alternatives[winner].permits.is_superload && superloads > 0 {
        reasons.push("Avoids superload classification".to_string());
    }
    reasons
}

fn compare(alt: &RouteAlternative, best: &RouteAlternative) -> RouteComparison {
    let cost_delta = alt.total_cost() - best.total_cost();
    let duration_delta = alt.total_duration_hours - best.total_duration_hours;
    let distance_delta = alt.total_distance_miles - best.total_distance_miles;
    let state_delta = alt.state_count() as i64 - best.state_count() as i64;
    let restriction_delta = alt.permits.restriction_count() as i64 - best.permits.restriction_count() as i64;

    let mut pros = Vec::new();
    let mut cons = Vec::new();
    match cost_delta.0.cmp(&0) {
        std::cmp::Ordering::Less => pros.push(format!("{} cheaper", Cents(-cost_delta.0))),
        std::cmp::Ordering::Greater => cons.push(format!("{} more expensive", cost_delta)),
        std::cmp::Ordering::Equal => {}
    }
    if duration_delta < 0.0 {
        pros.push(format!("{:.1} hours faster", -duration_delta));
    } else if duration_delta > 0.0 {
        cons.push(format!("{:.1} hours slower", duration_delta));
    }
    if state_delta < 0 {
        pros.push(format!("{} fewer state(s)", -state_delta));
    } else if state_delta > 0 {
        cons.push(format!("{} more state(s)", state_delta));
    }
    if restriction_delta < 0 {
        pros.push(format!("{} fewer travel restriction(s)", -restriction_delta));
    } else if restriction_delta > 0 {
        cons.push(format!("{} more travel restriction(s)", restriction_delta));
    }
    match (alt.permits.is_superload, best.permits.is_superload) {
        (false, true) => pros.push("Avoids superload classification".to_string()),
        (true, false) => cons.push("Superload classification".to_string()),
        _ => {}
    }

    RouteComparison {
        route_id: alt.id.clone(),
        route_name: alt.display_name().to_string(),
        cost_delta,
        duration_delta_hours: duration_delta,
        distance_delta_miles: distance_delta,
        state_count_delta: state_delta,
        pros,
        cons,
    }
}

/// Score 1–3 alternatives and recommend one
pub fn analyze_routes(alternatives: &[RouteAlternative]) -> Result<RouteAnalysis, ValidationError> {
    check_alternatives(alternatives)?;

    let cost = normalize_lower_better(
        &alternatives
            .iter()
            .map(|a| a.total_cost().0 as f64)
            .collect::<Vec<_>>(),
    );
    let duration = normalize_lower_better(
        &alternatives
            .iter()
            .map(|a| a.total_duration_hours)
            .collect::<Vec<_>>(),
    );
    let states = normalize_lower_better(
        &alternatives
            .iter()
            .map(|a| a.state_count() as f64)
            .collect::<Vec<_>>(),
    );
    let restrictions = normalize_lower_better(
        &alternatives
            .iter()
            .map(|a| a.permits.restriction_count() as f64)
            .collect::<Vec<_>>(),
    );

    let scores: Vec<RouteScore> = alternatives
        .iter()
        .enumerate()
        .map(|(i, alt)| {
            let superload = if alt.permits.is_superload { 0.0 } else { 1.0 };
            let total = 100.0
                * (weights::COST * cost[i]
                    + weights::DURATION * duration[i]
                    + weights::STATE_COUNT * states[i]
                    + weights::RESTRICTIONS * restrictions[i]
                    + weights::SUPERLOAD * superload);
            RouteScore {
                route_id: alt.id.clone(),
                total,
                cost: cost[i],
                duration: duration[i],
                state_count: states[i],
                restrictions: restrictions[i],
                superload,
            }
        })
        .collect();

    // Earlier alternatives win exact ties
    let mut winner = 0;
    for (i, s) in scores.iter().enumerate().skip(1) {
        if s.total > scores[winner].total + 1e-9 {
            winner = i;
        }
    }

    let best = &alternatives[winner];
    let comparisons = alternatives
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != winner)
        .map(|(_, alt)| compare(alt, best))
        .collect();

    Ok(RouteAnalysis {
        recommended_route_id: best.id.clone(),
        reasoning: reasoning_for(winner, alternatives),
        scores,
        comparisons,
    })
}

/// Fleet totals per route id, in the first truck's route order
fn fleet_aggregate(trucks: &[TruckRoutes]) -> Vec<RouteAlternative> {
    let Some(first) = trucks.first() else {
        return Vec::new();
    };
    first
        .alternatives
        .iter()
        .filter(|alt| {
            trucks
                .iter()
                .all(|t| t.alternatives.iter().any(|a| a.id == alt.id))
        })
        .map(|alt| {
            let mut aggregate = alt.clone();
            let mut permits = alt.permits.clone();
            for truck in &trucks[1..] {
                if let Some(other) = truck.alternatives.iter().find(|a| a.id == alt.id) {
                    permits.total_permit_fees += other.permits.total_permit_fees;
                    permits.escort_cost.total += other.permits.escort_cost.total;
                    permits.total_cost += other.permits.total_cost;
                    permits.is_superload |= other.permits.is_superload;
                    permits.states.extend(other.permits.states.iter().cloned());
                }
            }
            aggregate.permits = permits;
            aggregate
        })
        .collect()
}

/// Per-truck analyses plus one shared recommendation and every truck that should diverge from it
pub fn analyze_routes_per_truck(trucks: &[TruckRoutes]) -> Result<FleetRouteAnalysis, ValidationError> {
    if trucks.is_empty() {
        return Err(ValidationError::InvalidRequest("no trucks supplied".to_string()));
    }
    let aggregate = fleet_aggregate(trucks);
    if aggregate.is_empty() {
        return Err(ValidationError::InvalidRequest(
            "trucks share no common route alternative".to_string(),
        ));
    }
    let shared = analyze_routes(&aggregate)?;

    let mut per_truck = Vec::new();
    let mut divergences = Vec::new();
    for truck in trucks {
        let analysis = analyze_routes(&truck.alternatives)?;
        let own = truck
            .alternatives
            .iter()
            .find(|a| a.id == analysis.recommended_route_id);
        let on_shared = truck
            .alternatives
            .iter()
            .find(|a| a.id == shared.recommended_route_id);

        if let (Some(own), Some(on_shared)) = (own, on_shared) {
            if own.id != on_shared.id {
                let avoids_superload = on_shared.permits.is_superload && !own.permits.is_superload;
                let cost_saving = on_shared.total_cost() - own.total_cost();
                if avoids_superload || cost_saving > Cents::ZERO {
                    let mut parts = Vec::new();
                    if avoids_superload {
                        parts.push(format!("avoids superload classification on {}", on_shared.display_name()));
                    }
                    if cost_saving > Cents::ZERO {
                        parts.push(format!("saves {} in permits and escorts", cost_saving));
                    }
                    divergences.push(RouteDivergence {
                        truck_id: truck.truck_id.clone(),
                        shared_route_id: on_shared.id.clone(),
                        recommended_route_id: own.id.clone(),
                        avoids_superload,
                        cost_saving,
                        reasoning: format!(
                            "Truck {} should take {} instead of the shared {}: {}",
                            truck.truck_id,
                            own.display_name(),
                            on_shared.display_name(),
                            parts.join(" and ")
                        ),
                    });
                }
            }
        }
        per_truck.push(TruckRouteAnalysis {
            truck_id: truck.truck_id.clone(),
            analysis,
        });
    }

    info!(
        shared = %shared.recommended_route_id,
        trucks = trucks.len(),
        divergences = divergences.len(),
        "route analysis"
    );
    Ok(FleetRouteAnalysis {
        shared,
        per_truck,
        divergences,
    })
}
