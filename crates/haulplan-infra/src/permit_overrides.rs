//! State permit overrides
//!
//! Permit schedules change more often than releases ship. An override file is a
//! JSON array of complete `StatePermitData` records that replace the built-in
//! entry for the same code.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use haulplan_domain::model::StatePermitData;
use haulplan_types::{Error, Result};

/// Parse an override document. Codes are normalised to upper case.
pub fn parse_permit_overrides(content: &str) -> Result<Vec<StatePermitData>> {
    let mut states: Vec<StatePermitData> = serde_json::from_str(content)?;
    let mut seen = HashSet::new();
    for state in &mut states {
        state.code = state.code.trim().to_uppercase();
        if state.code.len() != 2 || !state.code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::UnknownState(state.code.clone()));
        }
        if !seen.insert(state.code.clone()) {
            warn!(state = %state.code, "duplicate override; the last entry wins");
        }
    }
    Ok(states)
}

/// Load overrides from a JSON file
pub fn load_permit_overrides(path: &Path) -> Result<Vec<StatePermitData>> {
    let content = std::fs::read_to_string(path)?;
    let states = parse_permit_overrides(&content)?;
    info!(path = %path.display(), count = states.len(), "permit overrides loaded");
    Ok(states)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn override_json(code: &str, gross_lbs: f64, oversize_fee: i64) -> String {
        format!(
            r#"{{
                "code": "{code}",
                "name": "Override {code}",
                "legal_limits": {{
                    "max_width_ft": 8.5,
                    "max_height_ft": 14.0,
                    "max_length_ft": 53.0,
                    "weight": {{ "gross_lbs": {gross_lbs}, "single_axle_lbs": 20000, "tandem_axle_lbs": 34000 }}
                }},
                "oversize": {{ "base_fee": {oversize_fee}, "surcharge_model": "cumulative", "processing_time": "Same day" }},
                "overweight": {{ "base_fee": 7500 }},
                "escorts": {{ "width_one_ft": 12.0 }},
                "travel": {{ "daylight_only": true, "weekend_travel": false, "holiday_travel": false }},
                "superload": {{ "width_ft": 16.0, "height_ft": 16.0, "length_ft": 150.0, "weight_lbs": 200000 }},
                "last_verified": "2026-09-01"
            }}"#
        )
    }

    #[test]
    fn test_parse_normalises_codes() {
        let doc = format!("[{}]", override_json("tx", 84_000.0, 9000));
        let states = parse_permit_overrides(&doc).unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].code, "TX");
        assert_eq!(states[0].legal_limits.weight.gross_lbs, 84_000.0);
        assert_eq!(states[0].oversize.base_fee, haulplan_types::Cents(9000));
        assert!(states[0].bridge_analysis.is_none());
    }

    #[test]
    fn test_rejects_bad_codes_and_json() {
        let doc = format!("[{}]", override_json("Texas", 80_000.0, 6000));
        assert!(matches!(parse_permit_overrides(&doc), Err(Error::UnknownState(_))));
        assert!(matches!(parse_permit_overrides("{not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(
            &path,
            format!("[{},{}]", override_json("MN", 80_000.0, 1500), override_json("WI", 80_000.0, 2000)),
        )
        .unwrap();
        let states = load_permit_overrides(&path).unwrap();
        let codes: Vec<&str> = states.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["MN", "WI"]);

        assert!(matches!(
            load_permit_overrides(&dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }
}
