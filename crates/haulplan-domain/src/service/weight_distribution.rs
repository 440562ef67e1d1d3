//! Axle weight distribution
//!
//! Fixed lever model: the trailer is a beam resting on the kingpin and on the
//! centroid of its axle groups. The kingpin reaction is shared by the steer and
//! drive axles in proportion to their distance from the fifth wheel, and the
//! power unit's own weight is split by a fixed steer share. Trailer-side groups
//! carry equal weight per axle.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bridge_formula::{bridge_formula_limit, check_bridge_formula, AxleLoadPoint, BridgeFormulaReport};
use super::kpra::{validate_kpra, KpraReport};
use super::pipeline::{LoadValidator, ValidationContext};
use crate::federal::{
    LEGAL_GROSS_LBS, SINGLE_AXLE_LIMIT_LBS, STEER_TIRE_RATING_LBS, TANDEM_AXLE_LIMIT_LBS,
    TANDEM_MAX_SPREAD_FT,
};
use crate::model::{AxleGroup, AxleGroupKind, AxleGroupLoad, AxleWeights, PlannedLoad, TrailerType};

/// Share of the balance score given to fore/aft centring
const LONGITUDINAL_WEIGHT: f64 = 0.7;
const LATERAL_WEIGHT: f64 = 0.3;

/// A cargo weight at a point on the deck (`x` from the deck front, `y` from the left edge)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckLoad {
    pub x_ft: f64,
    pub y_ft: f64,
    pub weight_lbs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxleDistribution {
    pub axle_weights: AxleWeights,
    pub kingpin_load_lbs: f64,
    /// Individual axles, front to rear
    pub axles: Vec<AxleLoadPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightDistributionReport {
    pub axle_weights: AxleWeights,
    pub kingpin_load_lbs: f64,
    pub cargo_cg_x_ft: f64,
    pub cargo_cg_y_ft: f64,
    /// 0–100, 100 when the cargo centre of gravity sits on the deck centre
    pub balance_score: f64,
    pub bridge: BridgeFormulaReport,
    pub kpra: KpraReport,
    pub compliant: bool,
    #[serde(default)]
    pub violations: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Federal limit for one axle group
pub fn group_limit_lbs(group: &AxleGroup) -> f64 {
    match group.axle_count {
        0 | 1 => SINGLE_AXLE_LIMIT_LBS,
        2 if group.spread_ft <= TANDEM_MAX_SPREAD_FT => TANDEM_AXLE_LIMIT_LBS,
        n => bridge_formula_limit(group.spread_ft, u32::from(n)).unwrap_or(SINGLE_AXLE_LIMIT_LBS),
    }
}

/// Distribute tare, power unit and cargo weight over the axle groups
pub fn compute_axle_weights(trailer: &TrailerType, cargo: &[DeckLoad]) -> AxleDistribution {
    let axles = &trailer.axles;
    let setback = axles.kingpin_setback_ft;
    let tare_position = trailer.deck_length_ft / 2.0 - setback;

    let mut point_loads: Vec<(f64, f64)> = Vec::with_capacity(cargo.len() + 1);
    point_loads.push((tare_position, trailer.tare_weight_lbs));
    point_loads.extend(cargo.iter().map(|c| (c.x_ft - setback, c.weight_lbs)));

    let total_trailer_side: f64 = point_loads.iter().map(|(_, w)| w).sum();
    let on_trailer_axles = match axles.trailer_axle_centroid_ft() {
        Some(centroid) if centroid.abs() > f64::EPSILON => {
            point_loads.iter().map(|(p, w)| w * p / centroid).sum::<f64>()
        }
        _ => 0.0,
    };
    let kingpin = total_trailer_side - on_trailer_axles;

    let steer_pos = axles.steer.position_ft;
    let drive_pos = axles.drive.position_ft;
    let wheelbase = drive_pos - steer_pos;
    let kingpin_to_steer = if wheelbase.abs() > f64::EPSILON {
        kingpin * drive_pos / wheelbase
    } else {
        0.0
    };
    let kingpin_to_drive = kingpin - kingpin_to_steer;

    let pu = trailer.power_unit_weight_lbs;
    let steer_weight = pu * axles.power_unit_steer_share + kingpin_to_steer;
    let drive_weight = pu * (1.0 - axles.power_unit_steer_share) + kingpin_to_drive;

    let trailer_axles = axles.trailer_axle_count();
    let mut groups = vec![
        group_load(&axles.steer, steer_weight),
        group_load(&axles.drive, drive_weight),
    ];
    groups.extend(axles.trailer_groups.iter().map(|g| {
        let share = if trailer_axles > 0 {
            f64::from(g.axle_count) / f64::from(trailer_axles)
        } else {
            0.0
        };
        group_load(g, on_trailer_axles * share)
    }));

    let mut axle_points = Vec::new();
    for (group, load) in axles.groups().into_iter().zip(&groups) {
        let positions = group.axle_positions();
        let per_axle = load.weight_lbs / positions.len() as f64;
        axle_points.extend(positions.into_iter().map(|position_ft| AxleLoadPoint {
            position_ft,
            weight_lbs: per_axle,
        }));
    }

    let gross_lbs = pu + total_trailer_side;
    AxleDistribution {
        axle_weights: AxleWeights { groups, gross_lbs },
        kingpin_load_lbs: kingpin,
        axles: axle_points,
    }
}

fn group_load(group: &AxleGroup, weight_lbs: f64) -> AxleGroupLoad {
    AxleGroupLoad {
        label: group.label.clone(),
        kind: group.kind,
        axle_count: group.axle_count,
        weight_lbs,
        limit_lbs: group_limit_lbs(group),
    }
}

/// 0–100 score from the cargo centre of gravity's offset from the deck centre
pub fn balance_score(trailer: &TrailerType, cg_x_ft: f64, cg_y_ft: f64) -> f64 {
    let half_length = trailer.deck_length_ft / 2.0;
    let half_width = trailer.deck_width_ft / 2.0;
    if half_length <= 0.0 || half_width <= 0.0 {
        return 0.0;
    }
    let dx = ((cg_x_ft - half_length).abs() / half_length).min(1.0);
    let dy = ((cg_y_ft - half_width).abs() / half_width).min(1.0);
    (100.0 * (1.0 - LONGITUDINAL_WEIGHT * dx - LATERAL_WEIGHT * dy)).clamp(0.0, 100.0)
}

/// Cargo weights from 3D placements, or centred on the deck when the load has none
fn deck_loads(load: &PlannedLoad, warnings: &mut Vec<String>) -> Vec<DeckLoad> {
    match &load.placements_3d {
        Some(placements) => placements
            .iter()
            .filter(|p| !p.failed)
            .map(|p| DeckLoad {
                x_ft: p.center_x_ft(),
                y_ft: p.center_y_ft(),
                weight_lbs: p.weight_lbs,
            })
            .collect(),
        None => {
            warnings.push("No placements available; cargo assumed centred on the deck".to_string());
            vec![DeckLoad {
                x_ft: load.trailer.deck_length_ft / 2.0,
                y_ft: load.trailer.deck_width_ft / 2.0,
                weight_lbs: load.weight_lbs,
            }]
        }
    }
}

pub fn analyze_weight_distribution(load: &PlannedLoad, ctx: &ValidationContext<'_>) -> WeightDistributionReport {
    let mut warnings = Vec::new();
    let mut violations = Vec::new();
    let cargo = deck_loads(load, &mut warnings);
    let trailer = &load.trailer;
    let distribution = compute_axle_weights(trailer, &cargo);

    let cargo_weight: f64 = cargo.iter().map(|c| c.weight_lbs).sum();
    let (cg_x, cg_y) = if cargo_weight > 0.0 {
        (
            cargo.iter().map(|c| c.x_ft * c.weight_lbs).sum::<f64>() / cargo_weight,
            cargo.iter().map(|c| c.y_ft * c.weight_lbs).sum::<f64>() / cargo_weight,
        )
    } else {
        (trailer.deck_length_ft / 2.0, trailer.deck_width_ft / 2.0)
    };

    let permitted = ctx
        .overweight_permitted
        .unwrap_or_else(|| distribution.axle_weights.gross_lbs > LEGAL_GROSS_LBS);

    // Permitted moves carry axle exceedances on the permit; unpermitted ones are violations.
    let mut exceedances = Vec::new();
    for group in distribution.axle_weights.groups.iter().filter(|g| g.is_over_limit()) {
        exceedances.push(format!(
            "{}: {:.0} lbs exceeds {:.0} lbs limit",
            group.label, group.weight_lbs, group.limit_lbs
        ));
    }

    let bridge = check_bridge_formula(&distribution.axles, permitted);
    for check in bridge.violations() {
        exceedances.push(format!(
            "Bridge formula: axles {}-{} carry {:.0} lbs over {:.1} ft (limit {:.0} lbs)",
            check.first_axle + 1,
            check.last_axle + 1,
            check.load_lbs,
            check.span_ft,
            check.limit_lbs
        ));
    }
    if permitted {
        warnings.extend(exceedances.into_iter().map(|e| format!("{} (overweight permit required)", e)));
    } else {
        violations.extend(exceedances);
    }

    let kpra = validate_kpra(trailer, ctx.kpra_limits);
    if let Some(kpra_ft) = kpra.kpra_ft {
        for check in kpra.checks.iter().filter(|c| !c.compliant) {
            violations.push(format!(
                "KPRA {:.1} ft exceeds {} limit of {:.1} ft",
                kpra_ft, check.state, check.limit_ft
            ));
        }
    }

    if distribution.kingpin_load_lbs < 0.0 {
        warnings.push("Cargo centre of gravity is behind the trailer axles; the kingpin is unloaded".to_string());
    }
    let steer = distribution.axle_weights.steer_lbs();
    if steer > STEER_TIRE_RATING_LBS {
        warnings.push(format!(
            "Steer axle at {:.0} lbs exceeds the typical {:.0} lbs tyre rating",
            steer, STEER_TIRE_RATING_LBS
        ));
    }

    let score = balance_score(trailer, cg_x, cg_y);
    debug!(load = %load.id, balance = score, gross = distribution.axle_weights.gross_lbs, "weight distribution");

    WeightDistributionReport {
        compliant: violations.is_empty(),
        axle_weights: distribution.axle_weights,
        kingpin_load_lbs: distribution.kingpin_load_lbs,
        cargo_cg_x_ft: cg_x,
        cargo_cg_y_ft: cg_y,
        balance_score: score,
        bridge,
        kpra,
        violations,
        warnings,
    }
}

pub struct WeightDistributionValidator;

impl LoadValidator for WeightDistributionValidator {
    fn name(&self) -> &'static str {
        "weight-distribution"
    }

    fn annotate(&self, load: &mut PlannedLoad, ctx: &ValidationContext<'_>) {
        let report = analyze_weight_distribution(load, ctx);
        load.warnings.extend(report.violations.iter().cloned());
        load.warnings.extend(report.warnings.iter().cloned());
        load.weight_distribution = Some(report);
    }
}

/// Trailer-side groups only, for reporting
pub fn trailer_group_loads(weights: &AxleWeights) -> impl Iterator<Item = &AxleGroupLoad> {
    weights
        .groups
        .iter()
        .filter(|g| !matches!(g.kind, AxleGroupKind::Steer | AxleGroupKind::Drive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CargoItem, Placement3D};
    use crate::service::kpra::KpraLimit;
    use crate::service::stacking::StackingOptions;
    use crate::test_support::{flatbed_48, rgn};

    fn ctx<'a>(stacking: &'a StackingOptions, kpra: &'a [KpraLimit]) -> ValidationContext<'a> {
        ValidationContext {
            stacking,
            kpra_limits: kpra,
            overweight_permitted: None,
            destination_order: &[],
        }
    }

    fn placed(x: f64, length: f64, weight: f64) -> Placement3D {
        Placement3D {
            item_id: "cargo".to_string(),
            unit_index: 0,
            x_ft: x,
            y_ft: 0.0,
            z_ft: 0.0,
            length_ft: length,
            width_ft: 8.5,
            height_ft: 4.0,
            weight_lbs: weight,
            layer: 1,
            deck_height_ft: 5.0,
            rotated: false,
            failed: false,
        }
    }

    fn load_with(trailer: TrailerType, placements: Vec<Placement3D>) -> PlannedLoad {
        let weight: f64 = placements.iter().map(|p| p.weight_lbs).sum();
        let item = CargoItem::new("cargo", 10.0, 8.5, 4.0, weight).with_id("cargo");
        let mut load = PlannedLoad::new("load-1", trailer, vec![item]);
        load.placements_3d = Some(placements);
        load.refresh_aggregates();
        load
    }

    #[test]
    fn test_groups_sum_to_gross() {
        let trailer = flatbed_48();
        let cargo = [
            DeckLoad { x_ft: 8.0, y_ft: 4.25, weight_lbs: 12_000.0 },
            DeckLoad { x_ft: 30.0, y_ft: 4.25, weight_lbs: 20_000.0 },
        ];
        let d = compute_axle_weights(&trailer, &cargo);
        let expected = trailer.combination_tare_lbs() + 32_000.0;
        assert!((d.axle_weights.sum_lbs() - expected).abs() < 1e-6);
        assert!((d.axle_weights.gross_lbs - expected).abs() < 1e-6);
        let per_axle: f64 = d.axles.iter().map(|a| a.weight_lbs).sum();
        assert!((per_axle - expected).abs() < 1e-6);
    }

    #[test]
    fn test_centred_cargo_split() {
        let trailer = flatbed_48();
        let d = compute_axle_weights(&trailer, &[DeckLoad { x_ft: 24.0, y_ft: 4.25, weight_lbs: 40_000.0 }]);
        assert!((d.axle_weights.steer_lbs() - 11_579.6).abs() < 1.0);
        assert!((d.axle_weights.drive_lbs() - 30_012.5).abs() < 1.0);
        let trailer_group = trailer_group_loads(&d.axle_weights).next().unwrap();
        assert!((trailer_group.weight_lbs - 27_907.9).abs() < 1.0);
        assert!(d.axle_weights.groups.iter().all(|g| !g.is_over_limit()));
    }

    #[test]
    fn test_balance_score() {
        let trailer = flatbed_48();
        assert!((balance_score(&trailer, 24.0, 4.25) - 100.0).abs() < 1e-9);
        assert!((balance_score(&trailer, 36.0, 4.25) - 65.0).abs() < 1e-9);
        assert!((balance_score(&trailer, 0.0, 0.0) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_cargo_behind_axles_warns() {
        let load = load_with(flatbed_48(), vec![placed(45.0, 8.0, 30_000.0)]);
        let stacking = StackingOptions::default();
        let report = analyze_weight_distribution(&load, &ctx(&stacking, &[]));
        assert!(report.kingpin_load_lbs < 0.0);
        assert!(report.warnings.iter().any(|w| w.contains("kingpin")));
        assert!((report.balance_score - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_overloaded_tandem_is_violation_when_unpermitted() {
        let load = load_with(flatbed_48(), vec![placed(30.0, 16.0, 40_000.0)]);
        let stacking = StackingOptions::default();
        let report = analyze_weight_distribution(&load, &ctx(&stacking, &[]));
        assert!(!report.compliant);
        assert!(report.violations.iter().any(|v| v.starts_with("Trailer tandem")));
    }

    #[test]
    fn test_kpra_violation() {
        let load = load_with(rgn(), vec![placed(10.0, 10.0, 20_000.0)]);
        let stacking = StackingOptions::default();
        let limits = vec![KpraLimit::new("CA", 38.0)];
        let report = analyze_weight_distribution(&load, &ctx(&stacking, &limits));
        assert!(!report.kpra.compliant);
        assert!(report.violations.iter().any(|v| v.contains("CA")));
    }
}
