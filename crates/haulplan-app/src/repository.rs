//! Repository adapters over the built-in reference tables

use haulplan_domain::model::{StatePermitData, TrailerType};
use haulplan_domain::{PermitRegistry, TrailerCatalog};

use crate::constants::{all_state_codes, get_state_by_code, TRAILER_CATALOG};

/// Built-in trailer catalog and state permit tables
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticReference;

impl TrailerCatalog for StaticReference {
    fn trailers(&self) -> &[TrailerType] {
        &TRAILER_CATALOG
    }
}

impl PermitRegistry for StaticReference {
    fn state(&self, code: &str) -> Option<&StatePermitData> {
        get_state_by_code(code)
    }

    fn codes(&self) -> Vec<String> {
        all_state_codes().into_iter().map(str::to_string).collect()
    }
}
