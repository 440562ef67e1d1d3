//! Multi-trailer load planning
//!
//! First-fit-decreasing over cargo lines. A line is never split: all of its
//! units travel on one trailer. An open load only accepts a line when the
//! stacking engine can still place every unit on it and the trailer's weight
//! capacity holds; otherwise a new load is opened on the best trailer that can
//! take the line alone. Lines no trailer can take are reported, not dropped.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::kpra::KpraLimit;
use super::pipeline::{default_pipeline, run_pipeline, LoadValidator, ValidationContext};
use super::stacking::{stack_units, StackingOptions};
use super::truck_selector::select_trucks;
use super::validation::validate_cargo_items;
use crate::model::{CargoEnvelope, CargoItem, LoadPlan, PlannedLoad, TrailerType, UnassignedItem};
use crate::repository::TrailerCatalog;
use haulplan_types::ValidationError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanOptions {
    pub stacking: StackingOptions,
    /// KPRA caps of the states on the intended route
    pub kpra_limits: Vec<KpraLimit>,
    pub overweight_permitted: Option<bool>,
    /// Delivery stops in route order
    pub destination_order: Vec<String>,
}

impl PlanOptions {
    pub fn context(&self) -> ValidationContext<'_> {
        ValidationContext {
            stacking: &self.stacking,
            kpra_limits: &self.kpra_limits,
            overweight_permitted: self.overweight_permitted,
            destination_order: &self.destination_order,
        }
    }
}

struct OpenLoad {
    trailer: TrailerType,
    items: Vec<CargoItem>,
    weight_lbs: f64,
}

impl OpenLoad {
    fn accepts(&self, item: &CargoItem, stacking: &StackingOptions) -> bool {
        if self.weight_lbs + item.total_weight() > self.trailer.max_cargo_weight_lbs + 1e-6 {
            return false;
        }
        let mut trial = self.items.clone();
        trial.push(item.clone());
        stack_units(&self.trailer, &trial, stacking).summary.all_placed()
    }
}

/// Larger and heavier lines first
fn packing_key(item: &CargoItem) -> f64 {
    item.unit_volume() * f64::from(item.quantity) * item.total_weight()
}

fn describe(item: &CargoItem) -> String {
    format!(
        "{:.1} x {:.1} x {:.1} ft, {:.0} lbs",
        item.length_ft,
        item.width_ft,
        item.height_ft,
        item.total_weight()
    )
}

/// Plan with the default validator pipeline
pub fn plan_loads<C: TrailerCatalog + ?Sized>(
    items: &[CargoItem],
    catalog: &C,
    options: &PlanOptions,
) -> Result<LoadPlan, ValidationError> {
    plan_loads_with(items, catalog, options, &default_pipeline())
}

pub fn plan_loads_with<C: TrailerCatalog + ?Sized>(
    items: &[CargoItem],
    catalog: &C,
    options: &PlanOptions,
    pipeline: &[Box<dyn LoadValidator>],
) -> Result<LoadPlan, ValidationError> {
    validate_cargo_items(items)?;

    let mut order: Vec<&CargoItem> = items.iter().collect();
    order.sort_by(|a, b| packing_key(b).total_cmp(&packing_key(a)));

    let mut open: Vec<OpenLoad> = Vec::new();
    let mut unassigned = Vec::new();

    for item in order {
        if let Some(load) = open.iter_mut().find(|l| l.accepts(item, &options.stacking)) {
            debug!(item = %item.id, trailer = %load.trailer.id, "added to open load");
            load.weight_lbs += item.total_weight();
            load.items.push(item.clone());
            continue;
        }

        let recommendations = select_trucks(catalog, &CargoEnvelope::from_item(item));
        let fitting = recommendations.iter().find(|rec| {
            stack_units(&rec.trailer, std::slice::from_ref(item), &options.stacking)
                .summary
                .all_placed()
        });

        match fitting {
            Some(rec) => {
                debug!(item = %item.id, trailer = %rec.trailer.id, score = rec.score, "opened load");
                open.push(OpenLoad {
                    trailer: rec.trailer.clone(),
                    items: vec![item.clone()],
                    weight_lbs: item.total_weight(),
                });
            }
            None => {
                let reason = if recommendations.is_empty() {
                    format!("No catalog trailer can carry {} ({})", item.label(), describe(item))
                } else {
                    format!(
                        "{} unit(s) of {} could not all be placed on any suitable trailer ({})",
                        item.quantity,
                        item.label(),
                        describe(item)
                    )
                };
                debug!(item = %item.id, %reason, "unassigned");
                unassigned.push(UnassignedItem {
                    item: item.clone(),
                    reason,
                });
            }
        }
    }

    let ctx = options.context();
    let loads: Vec<PlannedLoad> = open
        .into_iter()
        .enumerate()
        .map(|(i, open)| {
            let mut load = PlannedLoad::new(format!("load-{}", i + 1), open.trailer, open.items);
            run_pipeline(&mut load, pipeline, &ctx);
            load
        })
        .collect();

    let plan = assemble_plan(items, loads, unassigned);
    info!(
        loads = plan.loads.len(),
        unassigned = plan.unassigned_items.len(),
        weight_lbs = plan.total_weight_lbs,
        "load plan complete"
    );
    Ok(plan)
}

fn assemble_plan(items: &[CargoItem], loads: Vec<PlannedLoad>, unassigned: Vec<UnassignedItem>) -> LoadPlan {
    let mut violations = Vec::new();
    for load in &loads {
        if let Some(report) = &load.constraints {
            for v in &report.violations {
                let mut v = v.clone();
                v.load_id = Some(load.id.clone());
                violations.push(v);
            }
        }
    }

    let scores: Vec<f64> = loads
        .iter()
        .filter_map(|l| l.weight_distribution.as_ref().map(|w| w.balance_score))
        .collect();
    let balance_score = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    let mut warnings = Vec::new();
    if !unassigned.is_empty() {
        warnings.push(format!("{} cargo line(s) could not be assigned to any trailer", unassigned.len()));
    }
    let illegal = loads.iter().filter(|l| !l.is_legal).count();
    if illegal > 0 {
        warnings.push(format!("{} load(s) exceed federal limits and need permits", illegal));
    }

    LoadPlan {
        total_weight_lbs: loads.iter().map(|l| l.weight_lbs).sum(),
        total_items: items.len(),
        assigned_items: loads.iter().map(|l| l.items.len()).sum(),
        total_units: items.iter().map(|i| i.quantity).sum(),
        loads,
        unassigned_items: unassigned,
        constraint_violations: violations,
        balance_score,
        cost: None,
        hos: None,
        warnings,
    }
}
