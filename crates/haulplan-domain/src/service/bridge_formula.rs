//! Federal Bridge Formula B (23 CFR 658.17)
//!
//! `W = 500 × (L·N/(N−1) + 12N + 36)` for every run of consecutive axles,
//! where L is the run's span in feet and N its axle count.

use serde::{Deserialize, Serialize};

use crate::federal::{
    LEGAL_GROSS_LBS, TANDEM_AXLE_LIMIT_LBS, TANDEM_MAX_SPREAD_FT, TANDEM_PAIR_EXCEPTION_FT,
};

/// One axle with its computed load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxleLoadPoint {
    /// Measured from the kingpin, rearward positive
    pub position_ft: f64,
    pub weight_lbs: f64,
}

/// Formula result for one run of consecutive axles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeCheck {
    /// Index of the first axle (front to rear, 0 = steer)
    pub first_axle: usize,
    pub last_axle: usize,
    pub axle_count: u32,
    pub span_ft: f64,
    pub load_lbs: f64,
    pub limit_lbs: f64,
}

impl BridgeCheck {
    pub fn passes(&self) -> bool {
        self.load_lbs <= self.limit_lbs + 0.5
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeFormulaReport {
    pub checks: Vec<BridgeCheck>,
    pub compliant: bool,
    /// Set when the 80,000 lb interstate cap bounded the full-vehicle run
    #[serde(default)]
    pub gross_cap_lbs: Option<f64>,
}

impl BridgeFormulaReport {
    pub fn violations(&self) -> impl Iterator<Item = &BridgeCheck> {
        self.checks.iter().filter(|c| !c.passes())
    }
}

/// Allowed weight on `axle_count` axles spanning `span_ft`, rounded to the nearest 500 lb.
/// `None` for fewer than two axles.
pub fn bridge_formula_limit(span_ft: f64, axle_count: u32) -> Option<f64> {
    if axle_count < 2 {
        return None;
    }
    let n = f64::from(axle_count);
    let l = span_ft.max(0.0).round();
    let units = l * n / (n - 1.0) + 12.0 * n + 36.0;
    Some(units.round() * 500.0)
}

/// Limit for a run after the statutory overrides
fn run_limit(span_ft: f64, axle_count: u32) -> Option<f64> {
    let formula = bridge_formula_limit(span_ft, axle_count)?;
    if axle_count == 2 && span_ft <= TANDEM_MAX_SPREAD_FT {
        return Some(TANDEM_AXLE_LIMIT_LBS);
    }
    if axle_count == 4 && span_ft >= TANDEM_PAIR_EXCEPTION_FT {
        return Some(formula.max(2.0 * TANDEM_AXLE_LIMIT_LBS));
    }
    Some(formula)
}

/// Check every run of two or more consecutive axles.
///
/// When `permitted` is false the run covering the whole vehicle is also capped at
/// the 80,000 lb interstate gross.
pub fn check_bridge_formula(axles: &[AxleLoadPoint], permitted: bool) -> BridgeFormulaReport {
    let mut sorted = axles.to_vec();
    sorted.sort_by(|a, b| a.position_ft.total_cmp(&b.position_ft));

    let mut checks = Vec::new();
    let mut gross_cap_lbs = None;
    let last_index = sorted.len().saturating_sub(1);

    for first in 0..sorted.len() {
        let mut load = sorted[first].weight_lbs;
        for last in first + 1..sorted.len() {
            load += sorted[last].weight_lbs;
            let axle_count = (last - first + 1) as u32;
            let span = sorted[last].position_ft - sorted[first].position_ft;
            let Some(mut limit) = run_limit(span, axle_count) else {
                continue;
            };
            if !permitted && first == 0 && last == last_index && limit > LEGAL_GROSS_LBS {
                limit = LEGAL_GROSS_LBS;
                gross_cap_lbs = Some(LEGAL_GROSS_LBS);
            }
            checks.push(BridgeCheck {
                first_axle: first,
                last_axle: last,
                axle_count,
                span_ft: span,
                load_lbs: load,
                limit_lbs: limit,
            });
        }
    }

    let compliant = checks.iter().all(BridgeCheck::passes);
    BridgeFormulaReport {
        checks,
        compliant,
        gross_cap_lbs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formula_table_values() {
        assert_eq!(bridge_formula_limit(4.0, 2), Some(34_000.0));
        assert_eq!(bridge_formula_limit(10.0, 3), Some(43_500.0));
        assert_eq!(bridge_formula_limit(51.0, 5), Some(80_000.0));
        assert_eq!(bridge_formula_limit(20.0, 1), None);
    }

    #[test]
    fn test_span_rounded_to_foot() {
        assert_eq!(bridge_formula_limit(9.6, 3), bridge_formula_limit(10.0, 3));
    }

    #[test]
    fn test_tandem_override() {
        assert_eq!(run_limit(4.3, 2), Some(TANDEM_AXLE_LIMIT_LBS));
        assert_eq!(run_limit(10.0, 2), Some(40_000.0));
    }

    #[test]
    fn test_two_tandem_exception() {
        assert_eq!(bridge_formula_limit(36.0, 4), Some(66_000.0));
        assert_eq!(run_limit(36.0, 4), Some(68_000.0));
        assert_eq!(run_limit(35.0, 4), bridge_formula_limit(35.0, 4));
    }

    fn five_axle(loads: [f64; 5]) -> Vec<AxleLoadPoint> {
        let positions = [-19.0, -1.15, 3.15, 35.95, 40.05];
        positions
            .iter()
            .zip(loads)
            .map(|(&position_ft, weight_lbs)| AxleLoadPoint {
                position_ft,
                weight_lbs,
            })
            .collect()
    }

    #[test]
    fn test_legal_five_axle_passes() {
        let report = check_bridge_formula(&five_axle([12_000.0, 17_000.0, 17_000.0, 17_000.0, 17_000.0]), false);
        assert!(report.compliant);
        assert_eq!(report.checks.len(), 10);
    }

    #[test]
    fn test_gross_cap_when_unpermitted() {
        let axles = five_axle([13_000.0, 17_000.0, 17_000.0, 17_000.0, 17_000.0]);
        let unpermitted = check_bridge_formula(&axles, false);
        assert!(!unpermitted.compliant);
        assert_eq!(unpermitted.gross_cap_lbs, Some(LEGAL_GROSS_LBS));

        let permitted = check_bridge_formula(&axles, true);
        assert!(permitted.compliant);
        assert_eq!(permitted.gross_cap_lbs, None);
    }

    #[test]
    fn test_overloaded_tandem_flagged() {
        let report = check_bridge_formula(&five_axle([10_000.0, 16_000.0, 16_000.0, 18_000.0, 18_000.0]), true);
        let violations: Vec<_> = report.violations().collect();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].first_axle, 3);
        assert_eq!(violations[0].axle_count, 2);
    }
}
