//! Planned loads and load plans

use serde::{Deserialize, Serialize};

use super::cargo::{CargoEnvelope, CargoItem};
use super::hos::LoadHos;
use super::trailer::{AxleGroupKind, TrailerType};
use crate::federal::{LEGAL_GROSS_LBS, LEGAL_HEIGHT_FT, LEGAL_TRAILER_LENGTH_FT, LEGAL_WIDTH_FT};
use crate::service::cost_optimizer::PlanCostSummary;
use crate::service::item_constraints::{ConstraintReport, ConstraintViolation};
use crate::service::securement::SecurementPlan;
use crate::service::stacking::StackingSummary;
use crate::service::weight_distribution::WeightDistributionReport;
use haulplan_types::INCHES_PER_FOOT;

/// Floor position of one cargo unit. `x` runs from the deck front, `y` from the left edge
/// (negative when a wide unit overhangs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPlacement {
    pub item_id: String,
    pub unit_index: u32,
    pub x_ft: f64,
    pub y_ft: f64,
    pub length_ft: f64,
    pub width_ft: f64,
    pub rotated: bool,
}

/// Position of one unit in three dimensions; `z` is measured from the surface of the
/// deck region the unit stands in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement3D {
    pub item_id: String,
    pub unit_index: u32,
    pub x_ft: f64,
    pub y_ft: f64,
    pub z_ft: f64,
    pub length_ft: f64,
    pub width_ft: f64,
    pub height_ft: f64,
    pub weight_lbs: f64,
    pub layer: u32,
    /// Height of the deck surface under this unit
    pub deck_height_ft: f64,
    pub rotated: bool,
    pub failed: bool,
}

impl Placement3D {
    pub fn top_ft(&self) -> f64 {
        self.z_ft + self.height_ft
    }

    pub fn overall_top_ft(&self) -> f64 {
        self.deck_height_ft + self.top_ft()
    }

    pub fn center_x_ft(&self) -> f64 {
        self.x_ft + self.length_ft / 2.0
    }

    pub fn center_y_ft(&self) -> f64 {
        self.y_ft + self.width_ft / 2.0
    }

    /// Floor footprints intersect (touching edges do not count)
    pub fn overlaps_footprint(&self, other: &Placement3D) -> bool {
        const EPS: f64 = 1e-6;
        self.x_ft < other.x_ft + other.length_ft - EPS
            && other.x_ft < self.x_ft + self.length_ft - EPS
            && self.y_ft < other.y_ft + other.width_ft - EPS
            && other.y_ft < self.y_ft + self.width_ft - EPS
    }

    /// Shortest horizontal gap between footprints (0 when touching or overlapping)
    pub fn footprint_gap_ft(&self, other: &Placement3D) -> f64 {
        let dx = (other.x_ft - (self.x_ft + self.length_ft))
            .max(self.x_ft - (other.x_ft + other.length_ft))
            .max(0.0);
        let dy = (other.y_ft - (self.y_ft + self.width_ft))
            .max(self.y_ft - (other.y_ft + other.width_ft))
            .max(0.0);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn to_floor(&self) -> ItemPlacement {
        ItemPlacement {
            item_id: self.item_id.clone(),
            unit_index: self.unit_index,
            x_ft: self.x_ft,
            y_ft: self.y_ft,
            length_ft: self.length_ft,
            width_ft: self.width_ft,
            rotated: self.rotated,
        }
    }
}

/// Computed weight on one axle group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxleGroupLoad {
    pub label: String,
    pub kind: AxleGroupKind,
    pub axle_count: u8,
    pub weight_lbs: f64,
    pub limit_lbs: f64,
}

impl AxleGroupLoad {
    pub fn is_over_limit(&self) -> bool {
        self.weight_lbs > self.limit_lbs + 0.5
    }
}

/// Per-group weights plus gross vehicle weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxleWeights {
    pub groups: Vec<AxleGroupLoad>,
    pub gross_lbs: f64,
}

impl AxleWeights {
    pub fn sum_lbs(&self) -> f64 {
        self.groups.iter().map(|g| g.weight_lbs).sum()
    }

    pub fn steer_lbs(&self) -> f64 {
        self.groups
            .iter()
            .filter(|g| g.kind == AxleGroupKind::Steer)
            .map(|g| g.weight_lbs)
            .sum()
    }

    pub fn drive_lbs(&self) -> f64 {
        self.groups
            .iter()
            .filter(|g| g.kind == AxleGroupKind::Drive)
            .map(|g| g.weight_lbs)
            .sum()
    }
}

/// One trailer assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedLoad {
    pub id: String,
    pub trailer: TrailerType,
    pub items: Vec<CargoItem>,
    /// Longest extent of cargo measured from the deck front (includes overhang)
    pub length_ft: f64,
    /// Widest cargo unit
    pub width_ft: f64,
    /// Overall loaded height above the road
    pub height_ft: f64,
    /// Total cargo weight
    pub weight_lbs: f64,
    pub placements: Vec<ItemPlacement>,
    #[serde(default)]
    pub placements_3d: Option<Vec<Placement3D>>,
    #[serde(default)]
    pub stacking: Option<StackingSummary>,
    #[serde(default)]
    pub weight_distribution: Option<WeightDistributionReport>,
    #[serde(default)]
    pub constraints: Option<ConstraintReport>,
    #[serde(default)]
    pub securement: Option<SecurementPlan>,
    pub is_legal: bool,
    #[serde(default)]
    pub permits_required: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl PlannedLoad {
    pub fn new(id: impl Into<String>, trailer: TrailerType, items: Vec<CargoItem>) -> Self {
        let mut load = Self {
            id: id.into(),
            trailer,
            items,
            length_ft: 0.0,
            width_ft: 0.0,
            height_ft: 0.0,
            weight_lbs: 0.0,
            placements: Vec::new(),
            placements_3d: None,
            stacking: None,
            weight_distribution: None,
            constraints: None,
            securement: None,
            is_legal: false,
            permits_required: Vec::new(),
            warnings: Vec::new(),
        };
        load.refresh_aggregates();
        load
    }

    pub fn cargo_envelope(&self) -> CargoEnvelope {
        CargoEnvelope::from_items(&self.items)
    }

    pub fn gross_weight_lbs(&self) -> f64 {
        self.trailer.combination_tare_lbs() + self.weight_lbs
    }

    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Envelope handed to the permit calculator: vehicle width already includes the
    /// securement allowance, height is overall, weight is gross
    pub fn permit_envelope(&self, securement_allowance_in: f64) -> CargoEnvelope {
        let width = (self.width_ft + securement_allowance_in / INCHES_PER_FOOT).max(self.trailer.deck_width_ft);
        CargoEnvelope::new(
            self.length_ft.max(self.trailer.deck_length_ft),
            width,
            self.height_ft,
            self.gross_weight_lbs(),
        )
    }

    /// Recompute dimensions, weight, legality and the permit list from items and placements
    pub fn refresh_aggregates(&mut self) {
        let envelope = self.cargo_envelope();
        self.weight_lbs = envelope.weight_lbs;

        let placed: Vec<&Placement3D> = self
            .placements_3d
            .iter()
            .flatten()
            .filter(|p| !p.failed)
            .collect();

        if placed.is_empty() {
            self.length_ft = envelope.length_ft;
            self.width_ft = envelope.width_ft;
            self.height_ft = self.trailer.lowest_deck_height_ft() + envelope.height_ft;
        } else {
            self.length_ft = placed
                .iter()
                .map(|p| p.x_ft + p.length_ft)
                .fold(0.0, f64::max);
            let left = placed.iter().map(|p| p.y_ft).fold(f64::INFINITY, f64::min);
            let right = placed
                .iter()
                .map(|p| p.y_ft + p.width_ft)
                .fold(f64::NEG_INFINITY, f64::max);
            self.width_ft = right - left;
            self.height_ft = placed.iter().map(|p| p.overall_top_ft()).fold(0.0, f64::max);
        }

        let gross = self.gross_weight_lbs();
        let mut permits = Vec::new();
        if self.width_ft > LEGAL_WIDTH_FT {
            permits.push(format!(
                "Oversize width ({:.1} ft > {:.1} ft)",
                self.width_ft, LEGAL_WIDTH_FT
            ));
        }
        if self.height_ft > LEGAL_HEIGHT_FT {
            permits.push(format!(
                "Oversize height ({:.1} ft > {:.1} ft)",
                self.height_ft, LEGAL_HEIGHT_FT
            ));
        }
        if self.length_ft > LEGAL_TRAILER_LENGTH_FT {
            permits.push(format!(
                "Oversize length ({:.1} ft > {:.1} ft)",
                self.length_ft, LEGAL_TRAILER_LENGTH_FT
            ));
        }
        if gross > LEGAL_GROSS_LBS {
            permits.push(format!(
                "Overweight ({:.0} lbs gross > {:.0} lbs)",
                gross, LEGAL_GROSS_LBS
            ));
        }
        self.is_legal = permits.is_empty();
        self.permits_required = permits;
    }

    pub fn contains_item(&self, item_id: &str) -> bool {
        self.items.iter().any(|i| i.id == item_id)
    }
}

/// Cargo that no catalog trailer could take
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedItem {
    pub item: CargoItem,
    pub reason: String,
}

/// Full result for one cargo manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadPlan {
    pub loads: Vec<PlannedLoad>,
    pub unassigned_items: Vec<UnassignedItem>,
    /// Cargo weight on all planned loads
    pub total_weight_lbs: f64,
    /// Input cargo lines
    pub total_items: usize,
    pub assigned_items: usize,
    pub total_units: u32,
    #[serde(default)]
    pub constraint_violations: Vec<ConstraintViolation>,
    /// Mean of per-load balance scores
    #[serde(default)]
    pub balance_score: Option<f64>,
    #[serde(default)]
    pub cost: Option<PlanCostSummary>,
    #[serde(default)]
    pub hos: Option<Vec<LoadHos>>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl LoadPlan {
    pub fn trailer_count(&self) -> usize {
        self.loads.len()
    }

    pub fn is_fully_assigned(&self) -> bool {
        self.unassigned_items.is_empty()
    }

    pub fn find_load(&self, load_id: &str) -> Option<&PlannedLoad> {
        self.loads.iter().find(|l| l.id == load_id)
    }
}
