//! Permit registry with file overrides layered over a base registry

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use tracing::debug;

use haulplan_domain::model::StatePermitData;
use haulplan_domain::repository::PermitRegistry;
use haulplan_types::Result;

use crate::permit_overrides::load_permit_overrides;

/// Override entries win over the base registry for the same code
#[derive(Debug, Clone)]
pub struct LayeredPermitRegistry<B> {
    base: B,
    overrides: HashMap<String, StatePermitData>,
}

impl<B: PermitRegistry> LayeredPermitRegistry<B> {
    pub fn new(base: B) -> Self {
        Self {
            base,
            overrides: HashMap::new(),
        }
    }

    pub fn with_overrides(base: B, states: Vec<StatePermitData>) -> Self {
        let mut registry = Self::new(base);
        for state in states {
            registry.insert(state);
        }
        registry
    }

    /// Base registry plus the overrides in a JSON file
    pub fn from_file(base: B, path: &Path) -> Result<Self> {
        Ok(Self::with_overrides(base, load_permit_overrides(path)?))
    }

    pub fn insert(&mut self, state: StatePermitData) {
        let code = state.code.trim().to_uppercase();
        debug!(state = %code, replaces_base = self.base.state(&code).is_some(), "permit override");
        self.overrides.insert(code, state);
    }

    /// Codes served from the override layer, sorted
    pub fn overridden_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.overrides.keys().cloned().collect();
        codes.sort();
        codes
    }

    pub fn base(&self) -> &B {
        &self.base
    }
}

impl<B: PermitRegistry> PermitRegistry for LayeredPermitRegistry<B> {
    fn state(&self, code: &str) -> Option<&StatePermitData> {
        let key = code.trim().to_uppercase();
        self.overrides.get(&key).or_else(|| self.base.state(&key))
    }

    fn codes(&self) -> Vec<String> {
        let mut codes: BTreeSet<String> = self.base.codes().into_iter().collect();
        codes.extend(self.overrides.keys().cloned());
        codes.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permit_overrides::parse_permit_overrides;
    use crate::permit_overrides::tests::override_json;

    /// Base registry holding the given records
    struct MapRegistry(HashMap<String, StatePermitData>);

    impl PermitRegistry for MapRegistry {
        fn state(&self, code: &str) -> Option<&StatePermitData> {
            self.0.get(&code.to_uppercase())
        }

        fn codes(&self) -> Vec<String> {
            self.0.keys().cloned().collect()
        }
    }

    fn base() -> MapRegistry {
        let doc = format!(
            "[{},{}]",
            override_json("TX", 80_000.0, 6000),
            override_json("OK", 80_000.0, 4000)
        );
        MapRegistry(
            parse_permit_overrides(&doc)
                .unwrap()
                .into_iter()
                .map(|s| (s.code.clone(), s))
                .collect(),
        )
    }

    #[test]
    fn test_override_wins_and_base_falls_through() {
        let overrides = parse_permit_overrides(&format!("[{}]", override_json("TX", 84_000.0, 9000))).unwrap();
        let registry = LayeredPermitRegistry::with_overrides(base(), overrides);

        assert_eq!(registry.state("tx").unwrap().legal_limits.weight.gross_lbs, 84_000.0);
        assert_eq!(registry.state("OK").unwrap().legal_limits.weight.gross_lbs, 80_000.0);
        assert!(registry.state("ZZ").is_none());
        assert_eq!(registry.overridden_codes(), vec!["TX".to_string()]);
    }

    #[test]
    fn test_codes_are_union() {
        let overrides = parse_permit_overrides(&format!("[{}]", override_json("KS", 80_000.0, 2000))).unwrap();
        let registry = LayeredPermitRegistry::with_overrides(base(), overrides);
        assert_eq!(registry.codes(), vec!["KS", "OK", "TX"]);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(&path, format!("[{}]", override_json("OK", 90_000.0, 4000))).unwrap();
        let registry = LayeredPermitRegistry::from_file(base(), &path).unwrap();
        assert_eq!(registry.state("OK").unwrap().legal_limits.weight.gross_lbs, 90_000.0);
    }
}
