//! Kingpin-to-rear-axle checks

use serde::{Deserialize, Serialize};

use crate::model::TrailerType;

/// A state's KPRA cap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpraLimit {
    pub state: String,
    pub limit_ft: f64,
}

impl KpraLimit {
    pub fn new(state: impl Into<String>, limit_ft: f64) -> Self {
        Self {
            state: state.into(),
            limit_ft,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpraCheck {
    pub state: String,
    pub limit_ft: f64,
    pub compliant: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpraReport {
    pub kpra_ft: Option<f64>,
    pub checks: Vec<KpraCheck>,
    pub compliant: bool,
}

impl KpraReport {
    pub fn failing_states(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| !c.compliant)
            .map(|c| c.state.as_str())
            .collect()
    }
}

/// Compare the trailer's KPRA against each configured limit.
/// A trailer without trailer axles has no KPRA and passes.
pub fn validate_kpra(trailer: &TrailerType, limits: &[KpraLimit]) -> KpraReport {
    let kpra_ft = trailer.kpra_ft();
    let checks: Vec<KpraCheck> = limits
        .iter()
        .map(|limit| KpraCheck {
            state: limit.state.clone(),
            limit_ft: limit.limit_ft,
            compliant: kpra_ft.map_or(true, |k| k <= limit.limit_ft + 1e-9),
        })
        .collect();
    let compliant = checks.iter().all(|c| c.compliant);
    KpraReport {
        kpra_ft,
        checks,
        compliant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AxleConfiguration, AxleGroup, AxleGroupKind, LoadingMethod, TrailerCategory};

    fn flatbed(axle_position_ft: f64) -> TrailerType {
        TrailerType {
            id: "fb53".to_string(),
            name: "Flatbed 53'".to_string(),
            category: TrailerCategory::Flatbed,
            deck_length_ft: 53.0,
            deck_width_ft: 8.5,
            deck_height_ft: 5.0,
            well_length_ft: None,
            well_height_ft: None,
            well_offset_ft: None,
            max_cargo_length_ft: 56.0,
            max_cargo_width_ft: 16.0,
            max_cargo_height_ft: 11.0,
            max_cargo_weight_lbs: 48_000.0,
            tare_weight_lbs: 11_000.0,
            power_unit_weight_lbs: 19_000.0,
            legal_cargo_height_override_ft: None,
            loading_method: LoadingMethod::Crane,
            axles: AxleConfiguration::with_standard_tractor(
                vec![AxleGroup::new("Trailer tandem", AxleGroupKind::Trailer, 2, 4.1, axle_position_ft)],
                3.0,
            ),
            tie_down_spacing_ft: 2.0,
            popularity_rank: 1,
        }
    }

    #[test]
    fn test_california_limit() {
        let limits = vec![KpraLimit::new("CA", 40.0), KpraLimit::new("OR", 43.0)];
        let report = validate_kpra(&flatbed(42.0), &limits);
        assert!(!report.compliant);
        assert_eq!(report.failing_states(), vec!["CA"]);

        let report = validate_kpra(&flatbed(40.0), &limits);
        assert!(report.compliant);
    }

    #[test]
    fn test_no_limits_passes() {
        let report = validate_kpra(&flatbed(46.0), &[]);
        assert!(report.compliant);
        assert_eq!(report.kpra_ft, Some(46.0));
    }
}
