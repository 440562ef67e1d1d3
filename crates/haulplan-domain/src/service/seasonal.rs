//! Seasonal weight adjustments

use chrono::NaiveDate;
use tracing::debug;

use crate::federal::LEGAL_GROSS_LBS;
use crate::model::{ActiveRestriction, SeasonalCheck, SeasonalRestriction, StatePermitData};

/// Restrictions in force for `state` on `date`
pub fn active_restrictions<'a>(
    state: &str,
    date: NaiveDate,
    table: &'a [SeasonalRestriction],
) -> Vec<&'a SeasonalRestriction> {
    table
        .iter()
        .filter(|r| r.state.eq_ignore_ascii_case(state) && r.is_active_on(date))
        .collect()
}

/// Lowest gross after every active reduction; the strictest restriction wins
fn adjusted_gross(legal_gross: f64, active: &[&SeasonalRestriction]) -> f64 {
    active
        .iter()
        .map(|r| r.reduction.apply(legal_gross))
        .fold(legal_gross, f64::min)
}

/// Copy of `state` with its legal gross reduced for `date`, plus one warning per active restriction
pub fn apply_seasonal_limits(
    state: &StatePermitData,
    date: NaiveDate,
    table: &[SeasonalRestriction],
) -> (StatePermitData, Vec<String>) {
    let active = active_restrictions(&state.code, date, table);
    let mut adjusted = state.clone();
    if active.is_empty() {
        return (adjusted, Vec::new());
    }

    let legal = state.legal_limits.weight.gross_lbs;
    let reduced = adjusted_gross(legal, &active);
    adjusted.legal_limits.weight.gross_lbs = reduced;

    let warnings = active
        .iter()
        .map(|r| {
            format!(
                "{} {} in effect on {}: legal gross reduced from {:.0} to {:.0} lbs ({})",
                r.state, r.name, date, legal, reduced, r.applies_to
            )
        })
        .collect();
    debug!(state = %state.code, %date, legal, reduced, "seasonal reduction applied");
    (adjusted, warnings)
}

/// Seasonal restrictions along a route. The base gross is the federal 80,000 lbs.
pub fn check_route_seasonal_restrictions<S: AsRef<str>>(
    states: &[S],
    date: NaiveDate,
    table: &[SeasonalRestriction],
) -> SeasonalCheck {
    let mut check = SeasonalCheck::default();
    for state in states {
        let state = state.as_ref();
        for r in active_restrictions(state, date, table) {
            let adjusted = r.reduction.apply(LEGAL_GROSS_LBS);
            check.warnings.push(format!(
                "{}: {} ({}/{} to {}/{}) limits gross to {:.0} lbs on {}",
                r.state, r.name, r.start.month, r.start.day, r.end.month, r.end.day, adjusted, r.applies_to
            ));
            check.active.push(ActiveRestriction {
                restriction: r.clone(),
                legal_gross_lbs: LEGAL_GROSS_LBS,
                adjusted_gross_lbs: adjusted,
            });
        }
    }
    check.has_restrictions = !check.active.is_empty();
    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MonthDay, WeightReduction};
    use crate::test_support::sample_state;

    fn table() -> Vec<SeasonalRestriction> {
        vec![
            SeasonalRestriction {
                state: "MN".to_string(),
                name: "Spring load restrictions".to_string(),
                start: MonthDay::new(3, 1),
                end: MonthDay::new(5, 15),
                reduction: WeightReduction::Percent(10.0),
                applies_to: "Trunk highways".to_string(),
                notes: String::new(),
            },
            SeasonalRestriction {
                state: "MN".to_string(),
                name: "County road frost law".to_string(),
                start: MonthDay::new(3, 10),
                end: MonthDay::new(4, 30),
                reduction: WeightReduction::CapLbs(64_000.0),
                applies_to: "County roads".to_string(),
                notes: String::new(),
            },
            SeasonalRestriction {
                state: "WI".to_string(),
                name: "Frost law".to_string(),
                start: MonthDay::new(3, 1),
                end: MonthDay::new(5, 1),
                reduction: WeightReduction::Percent(20.0),
                applies_to: "Posted highways".to_string(),
                notes: String::new(),
            },
        ]
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn test_route_check_march_vs_august() {
        let states = ["MN", "WI", "MI"];
        let march = check_route_seasonal_restrictions(&states, date(3, 15), &table());
        assert!(march.has_restrictions);
        assert_eq!(march.active.len(), 3);
        assert_eq!(march.warnings.len(), 3);

        let august = check_route_seasonal_restrictions(&states, date(8, 15), &table());
        assert!(!august.has_restrictions);
        assert!(august.warnings.is_empty());
    }

    #[test]
    fn test_strictest_reduction_applies() {
        let (adjusted, warnings) = apply_seasonal_limits(&sample_state("MN"), date(3, 15), &table());
        assert!((adjusted.legal_limits.weight.gross_lbs - 64_000.0).abs() < 1e-6);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_unaffected_state_unchanged() {
        let state = sample_state("TX");
        let (adjusted, warnings) = apply_seasonal_limits(&state, date(3, 15), &table());
        assert_eq!(adjusted, state);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_code_match_is_case_insensitive() {
        assert_eq!(active_restrictions("wi", date(4, 1), &table()).len(), 1);
    }
}
