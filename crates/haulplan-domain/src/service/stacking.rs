//! 3D stacking engine
//!
//! Units are laid on the deck floor first with shelf packing per deck region
//! (rows across the deck, front to rear). Units that find no floor space are
//! stacked on existing columns when the stacking rules allow it. Anything left
//! over is recorded as a failed placement rather than dropped.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pipeline::{LoadValidator, ValidationContext};
use crate::model::{CargoItem, DeckRegion, Placement3D, PlannedLoad, TrailerType};

const EPS: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackingOptions {
    /// Floor layer included
    pub max_layers: u32,
    /// Weight any one base unit may carry above it
    pub max_layer_load_lbs: f64,
    pub allow_rotation: bool,
}

impl Default for StackingOptions {
    fn default() -> Self {
        Self {
            max_layers: 3,
            max_layer_load_lbs: 10_000.0,
            allow_rotation: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackingSummary {
    pub placed_units: u32,
    pub failed_units: u32,
    pub layers_used: u32,
    /// Highest occupied top above the road
    pub effective_height_ft: f64,
    /// Floor footprint as a percentage of deck area
    pub floor_utilization: f64,
    #[serde(default)]
    pub failed_item_ids: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl StackingSummary {
    pub fn all_placed(&self) -> bool {
        self.failed_units == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackingResult {
    pub placements: Vec<Placement3D>,
    pub summary: StackingSummary,
}

struct Unit<'a> {
    item: &'a CargoItem,
    index: u32,
}

struct Row {
    x_ft: f64,
    depth_ft: f64,
    used_width_ft: f64,
    full: bool,
}

struct RegionState {
    region: DeckRegion,
    legal_clearance_ft: f64,
    physical_clearance_ft: f64,
    /// Rows may end here; the rear region extends to the physical cargo length
    max_end_ft: f64,
    cursor_ft: f64,
    rows: Vec<Row>,
}

impl RegionState {
    fn place(&mut self, length: f64, width: f64, deck_width: f64, max_width: f64) -> Option<(f64, f64)> {
        if width > deck_width + EPS {
            if width > max_width + EPS {
                return None;
            }
            // Over-width units ride alone in their row, centred.
            let x = self.open_row(length, width, deck_width, true)?;
            return Some((x, (deck_width - width) / 2.0));
        }

        for row in self.rows.iter_mut().filter(|r| !r.full) {
            if length <= row.depth_ft + EPS && row.used_width_ft + width <= deck_width + EPS {
                let y = row.used_width_ft;
                row.used_width_ft += width;
                return Some((row.x_ft, y));
            }
        }

        let x = self.open_row(length, width, deck_width, false)?;
        Some((x, 0.0))
    }

    fn open_row(&mut self, length: f64, width: f64, deck_width: f64, full: bool) -> Option<f64> {
        if self.cursor_ft >= self.region.end_ft() - EPS || self.cursor_ft + length > self.max_end_ft + EPS {
            return None;
        }
        let x = self.cursor_ft;
        self.rows.push(Row {
            x_ft: x,
            depth_ft: length,
            used_width_ft: width.min(deck_width),
            full,
        });
        self.cursor_ft += length;
        Some(x)
    }
}

struct Column {
    region: usize,
    /// Placement indices, bottom to top
    levels: Vec<usize>,
    load_above_base_lbs: f64,
}

/// Place every unit of `items` on `trailer`
pub fn stack_units(trailer: &TrailerType, items: &[CargoItem], options: &StackingOptions) -> StackingResult {
    let mut regions: Vec<RegionState> = trailer
        .deck_regions()
        .into_iter()
        .map(|region| {
            let is_rear = (region.end_ft() - trailer.deck_length_ft).abs() < EPS;
            RegionState {
                legal_clearance_ft: trailer.legal_clearance_ft(&region),
                physical_clearance_ft: trailer.physical_clearance_ft(&region),
                max_end_ft: if is_rear {
                    trailer.max_cargo_length_ft.max(trailer.deck_length_ft)
                } else {
                    region.end_ft()
                },
                cursor_ft: region.start_ft,
                rows: Vec::new(),
                region,
            }
        })
        .collect();

    let upper_legal = regions
        .iter()
        .filter(|r| !r.region.is_well)
        .map(|r| r.legal_clearance_ft)
        .fold(f64::INFINITY, f64::min);

    let mut units: Vec<Unit> = items
        .iter()
        .flat_map(|item| (0..item.quantity).map(move |index| Unit { item, index }))
        .collect();
    units.sort_by(|a, b| {
        let key = |u: &Unit| {
            (
                trailer.has_well() && u.item.height_ft > upper_legal + EPS,
                !u.item.stackable || u.item.bottom_only,
            )
        };
        key(b)
            .cmp(&key(a))
            .then(b.item.unit_footprint().total_cmp(&a.item.unit_footprint()))
            .then(b.item.weight_lbs.total_cmp(&a.item.weight_lbs))
    });

    let mut placements: Vec<Placement3D> = Vec::with_capacity(units.len());
    let mut unit_items: Vec<&CargoItem> = Vec::with_capacity(units.len());
    let mut columns: Vec<Column> = Vec::new();

    for unit in &units {
        let placed = match place_on_floor(trailer, &mut regions, unit, options) {
            Some((region, placement)) => {
                columns.push(Column {
                    region,
                    levels: vec![placements.len()],
                    load_above_base_lbs: 0.0,
                });
                Some(placement)
            }
            None => place_on_stack(&regions, &mut columns, &placements, &unit_items, unit, options),
        };

        let placement = placed.unwrap_or_else(|| {
            debug!(item = %unit.item.id, unit = unit.index, "unit could not be placed");
            Placement3D {
                item_id: unit.item.id.clone(),
                unit_index: unit.index,
                x_ft: 0.0,
                y_ft: 0.0,
                z_ft: 0.0,
                length_ft: unit.item.length_ft,
                width_ft: unit.item.width_ft,
                height_ft: unit.item.height_ft,
                weight_lbs: unit.item.weight_lbs,
                layer: 0,
                deck_height_ft: trailer.deck_height_ft,
                rotated: false,
                failed: true,
            }
        });
        placements.push(placement);
        unit_items.push(unit.item);
    }

    let summary = summarize(trailer, &placements, &unit_items);
    StackingResult { placements, summary }
}

fn orientations(item: &CargoItem, allow_rotation: bool) -> Vec<(f64, f64, bool)> {
    let mut out = vec![(item.length_ft, item.width_ft, false)];
    if allow_rotation && (item.length_ft - item.width_ft).abs() > EPS {
        out.push((item.width_ft, item.length_ft, true));
    }
    out
}

fn place_on_floor(
    trailer: &TrailerType,
    regions: &mut [RegionState],
    unit: &Unit,
    options: &StackingOptions,
) -> Option<(usize, Placement3D)> {
    let height = unit.item.height_ft;
    // Regions where the unit stays legal come first, then the tallest physical clearance.
    let mut order: Vec<usize> = (0..regions.len())
        .filter(|&i| height <= regions[i].physical_clearance_ft + EPS)
        .collect();
    order.sort_by(|&a, &b| {
        let legal = |i: usize| height <= regions[i].legal_clearance_ft + EPS;
        legal(b)
            .cmp(&legal(a))
            .then_with(|| {
                if legal(a) {
                    regions[a].region.start_ft.total_cmp(&regions[b].region.start_ft)
                } else {
                    regions[b].physical_clearance_ft.total_cmp(&regions[a].physical_clearance_ft)
                }
            })
    });

    for i in order {
        for (length, width, rotated) in orientations(unit.item, options.allow_rotation) {
            if let Some((x, y)) = regions[i].place(length, width, trailer.deck_width_ft, trailer.max_cargo_width_ft) {
                let placement = Placement3D {
                    item_id: unit.item.id.clone(),
                    unit_index: unit.index,
                    x_ft: x,
                    y_ft: y,
                    z_ft: 0.0,
                    length_ft: length,
                    width_ft: width,
                    height_ft: height,
                    weight_lbs: unit.item.weight_lbs,
                    layer: 1,
                    deck_height_ft: regions[i].region.deck_height_ft,
                    rotated,
                    failed: false,
                };
                return Some((i, placement));
            }
        }
    }
    None
}

fn place_on_stack(
    regions: &[RegionState],
    columns: &mut [Column],
    placements: &[Placement3D],
    unit_items: &[&CargoItem],
    unit: &Unit,
    options: &StackingOptions,
) -> Option<Placement3D> {
    let item = unit.item;
    if !item.stackable || item.bottom_only {
        return None;
    }

    // Best fit: the smallest supporting top that takes the unit.
    let mut best: Option<(usize, f64, (f64, f64, bool))> = None;
    for (ci, column) in columns.iter().enumerate() {
        if column.levels.len() as u32 + 1 > options.max_layers {
            continue;
        }
        if column.load_above_base_lbs + item.weight_lbs > options.max_layer_load_lbs + EPS {
            continue;
        }
        if column.levels.iter().any(|&p| !unit_items[p].stackable) {
            continue;
        }
        if column
            .levels
            .iter()
            .any(|&p| unit_items[p].fragile && item.weight_lbs >= unit_items[p].weight_lbs)
        {
            continue;
        }
        let Some(&top_index) = column.levels.last() else {
            continue;
        };
        let top = &placements[top_index];
        if top.top_ft() + item.height_ft > regions[column.region].legal_clearance_ft + EPS {
            continue;
        }
        let Some(fit) = orientations(item, options.allow_rotation)
            .into_iter()
            .find(|&(l, w, _)| l <= top.length_ft + EPS && w <= top.width_ft + EPS)
        else {
            continue;
        };
        let area = top.length_ft * top.width_ft;
        if best.map_or(true, |(_, best_area, _)| area < best_area - EPS) {
            best = Some((ci, area, fit));
        }
    }

    let (ci, _, (length, width, rotated)) = best?;
    let column = &mut columns[ci];
    let top_index = *column.levels.last()?;
    let top = &placements[top_index];
    let placement = Placement3D {
        item_id: item.id.clone(),
        unit_index: unit.index,
        x_ft: top.x_ft,
        y_ft: top.y_ft,
        z_ft: top.top_ft(),
        length_ft: length,
        width_ft: width,
        height_ft: item.height_ft,
        weight_lbs: item.weight_lbs,
        layer: column.levels.len() as u32 + 1,
        deck_height_ft: top.deck_height_ft,
        rotated,
        failed: false,
    };
    column.levels.push(placements.len());
    column.load_above_base_lbs += item.weight_lbs;
    Some(placement)
}

fn summarize(trailer: &TrailerType, placements: &[Placement3D], unit_items: &[&CargoItem]) -> StackingSummary {
    let placed: Vec<&Placement3D> = placements.iter().filter(|p| !p.failed).collect();
    let failed: Vec<(&Placement3D, &&CargoItem)> = placements
        .iter()
        .zip(unit_items)
        .filter(|(p, _)| p.failed)
        .collect();

    let deck_area = trailer.deck_length_ft * trailer.deck_width_ft;
    let floor_area: f64 = placed
        .iter()
        .filter(|p| p.layer == 1)
        .map(|p| p.length_ft * p.width_ft)
        .sum();

    let mut failed_item_ids: Vec<String> = Vec::new();
    let mut warnings = Vec::new();
    for (p, item) in &failed {
        if !failed_item_ids.contains(&p.item_id) {
            failed_item_ids.push(p.item_id.clone());
        }
        warnings.push(format!(
            "Unit {} of '{}' could not be placed on {}",
            p.unit_index + 1,
            item.label(),
            trailer.name
        ));
    }

    StackingSummary {
        placed_units: placed.len() as u32,
        failed_units: failed.len() as u32,
        layers_used: placed.iter().map(|p| p.layer).max().unwrap_or(0),
        effective_height_ft: placed.iter().map(|p| p.overall_top_ft()).fold(0.0, f64::max),
        floor_utilization: if deck_area > 0.0 {
            (floor_area / deck_area * 100.0).min(100.0)
        } else {
            0.0
        },
        failed_item_ids,
        warnings,
    }
}

/// Runs the stacking engine and records placements on the load
pub struct StackingValidator;

impl LoadValidator for StackingValidator {
    fn name(&self) -> &'static str {
        "stacking"
    }

    fn annotate(&self, load: &mut PlannedLoad, ctx: &ValidationContext<'_>) {
        let result = stack_units(&load.trailer, &load.items, ctx.stacking);
        load.placements = result
            .placements
            .iter()
            .filter(|p| !p.failed)
            .map(Placement3D::to_floor)
            .collect();
        load.warnings.extend(result.summary.warnings.iter().cloned());
        load.placements_3d = Some(result.placements);
        load.stacking = Some(result.summary);
        load.refresh_aggregates();
    }
}
