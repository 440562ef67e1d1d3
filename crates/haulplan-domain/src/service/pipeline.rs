//! Per-load validator pipeline
//!
//! Each validator annotates a [`PlannedLoad`] in place and never rejects it;
//! violations land in the load's reports and warnings.

use tracing::debug;

use super::item_constraints::ItemConstraintValidator;
use super::kpra::KpraLimit;
use super::securement::SecurementValidator;
use super::stacking::{StackingOptions, StackingValidator};
use super::weight_distribution::WeightDistributionValidator;
use crate::model::PlannedLoad;

/// Inputs shared by every validator in one planning run
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub stacking: &'a StackingOptions,
    /// KPRA caps of the states the load will traverse
    pub kpra_limits: &'a [KpraLimit],
    /// Overrides the permitted flag used by the bridge check; derived from
    /// the load's permit list when absent
    pub overweight_permitted: Option<bool>,
    /// Delivery stops in route order
    pub destination_order: &'a [String],
}

pub trait LoadValidator: Send + Sync {
    fn name(&self) -> &'static str;

    fn annotate(&self, load: &mut PlannedLoad, ctx: &ValidationContext<'_>);
}

/// Stacking, weight distribution, item constraints, securement
pub fn default_pipeline() -> Vec<Box<dyn LoadValidator>> {
    vec![
        Box::new(StackingValidator),
        Box::new(WeightDistributionValidator),
        Box::new(ItemConstraintValidator),
        Box::new(SecurementValidator),
    ]
}

pub fn run_pipeline(
    load: &mut PlannedLoad,
    pipeline: &[Box<dyn LoadValidator>],
    ctx: &ValidationContext<'_>,
) {
    for validator in pipeline {
        debug!(load = %load.id, validator = validator.name(), "running validator");
        validator.annotate(load, ctx);
    }
}
