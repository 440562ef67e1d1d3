//! Cargo securement planning (49 CFR 393.100–393.136)

use serde::{Deserialize, Serialize};

use super::pipeline::{LoadValidator, ValidationContext};
use crate::federal::{HEAVY_ARTICLE_LBS, HEAVY_ARTICLE_MIN_TIE_DOWNS, SECUREMENT_WLL_RATIO};
use crate::model::{CargoItem, PlannedLoad};

/// One tie-down per this many feet of article length
const FEET_PER_TIE_DOWN: f64 = 10.0;
const MIN_TIE_DOWNS: u32 = 2;
const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieDownDevice {
    Strap4In,
    Grade70ThreeEighths,
    Grade70OneHalf,
    Grade100FiveEighths,
}

impl TieDownDevice {
    pub const ALL: [TieDownDevice; 4] = [
        TieDownDevice::Strap4In,
        TieDownDevice::Grade70ThreeEighths,
        TieDownDevice::Grade70OneHalf,
        TieDownDevice::Grade100FiveEighths,
    ];

    /// Working load limit in pounds
    pub fn wll_lbs(&self) -> f64 {
        match self {
            TieDownDevice::Strap4In => 5_400.0,
            TieDownDevice::Grade70ThreeEighths => 6_600.0,
            TieDownDevice::Grade70OneHalf => 11_300.0,
            TieDownDevice::Grade100FiveEighths => 22_600.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TieDownDevice::Strap4In => "4\" synthetic strap",
            TieDownDevice::Grade70ThreeEighths => "3/8\" grade 70 chain",
            TieDownDevice::Grade70OneHalf => "1/2\" grade 70 chain",
            TieDownDevice::Grade100FiveEighths => "5/8\" grade 100 chain",
        }
    }

    /// Starting device for an article of this weight
    pub fn for_weight(weight_lbs: f64) -> Self {
        if weight_lbs <= 10_000.0 {
            TieDownDevice::Strap4In
        } else if weight_lbs <= 20_000.0 {
            TieDownDevice::Grade70ThreeEighths
        } else if weight_lbs <= 40_000.0 {
            TieDownDevice::Grade70OneHalf
        } else {
            TieDownDevice::Grade100FiveEighths
        }
    }
}

/// One unit covered by a securement group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecuredUnit {
    pub item_id: String,
    pub unit_index: u32,
}

/// Units whose longitudinal spans overlap share the same tie-downs: a row of units side by
/// side, or a stack, is strapped as one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSecurement {
    pub units: Vec<SecuredUnit>,
    /// Distance of the block's front face from the deck front
    pub start_ft: f64,
    pub length_ft: f64,
    pub weight_lbs: f64,
    pub device: TieDownDevice,
    pub tie_downs: u32,
    pub aggregate_wll_lbs: f64,
    pub required_wll_lbs: f64,
    /// Deck anchors within reach of the block
    pub available_positions: u32,
    pub compliant: bool,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurementPlan {
    pub groups: Vec<GroupSecurement>,
    pub total_tie_downs: u32,
    pub total_wll_lbs: f64,
    /// Tie-downs the trailer's anchor points can take
    pub trailer_capacity: u32,
    pub compliant: bool,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Device and count for one block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TieDownChoice {
    pub device: TieDownDevice,
    pub tie_downs: u32,
    pub aggregate_wll_lbs: f64,
    pub required_wll_lbs: f64,
    pub compliant: bool,
}

/// Minimum tie-down count by block length and the heaviest single article in it
pub fn minimum_tie_downs(length_ft: f64, heaviest_article_lbs: f64) -> u32 {
    let by_length = (length_ft / FEET_PER_TIE_DOWN).ceil().max(0.0) as u32;
    let mut count = by_length.max(MIN_TIE_DOWNS);
    if heaviest_article_lbs > HEAVY_ARTICLE_LBS {
        count = count.max(HEAVY_ARTICLE_MIN_TIE_DOWNS);
    }
    count
}

/// Deck anchors a tie-down can reach from a block spanning `start..end`: every anchor over the
/// block plus one pitch beyond each end.
pub fn anchors_alongside(start_ft: f64, end_ft: f64, spacing_ft: f64, deck_length_ft: f64) -> u32 {
    if spacing_ft <= 0.0 {
        return 0;
    }
    let lo = (start_ft - spacing_ft).max(0.0);
    let hi = (end_ft + spacing_ft).min(deck_length_ft);
    if hi < lo {
        return 0;
    }
    let first = (lo / spacing_ft - EPS).ceil();
    let last = (hi / spacing_ft + EPS).floor();
    if last < first {
        0
    } else {
        (last - first) as u32 + 1
    }
}

/// Pick device and count for a block. A stronger device is tried only while the WLL
/// requirement, not the length or heavy-article minimum, drives the count past the anchors.
pub fn secure_block(weight_lbs: f64, heaviest_article_lbs: f64, length_ft: f64, available: u32) -> TieDownChoice {
    let required = weight_lbs * SECUREMENT_WLL_RATIO;
    let minimum = minimum_tie_downs(length_ft, heaviest_article_lbs);
    let start = TieDownDevice::for_weight(weight_lbs);
    let count_for = |device: TieDownDevice| minimum.max((required / device.wll_lbs()).ceil() as u32);

    let mut device = start;
    let mut tie_downs = count_for(start);
    for candidate in TieDownDevice::ALL.into_iter().filter(|d| *d > start) {
        if tie_downs <= available || tie_downs == minimum {
            break;
        }
        device = candidate;
        tie_downs = count_for(candidate);
    }

    let aggregate = device.wll_lbs() * f64::from(tie_downs);
    TieDownChoice {
        device,
        tie_downs,
        aggregate_wll_lbs: aggregate,
        required_wll_lbs: required,
        compliant: tie_downs <= available && aggregate >= required,
    }
}

struct Span<'a> {
    item: &'a CargoItem,
    unit_index: u32,
    start_ft: f64,
    end_ft: f64,
}

/// Merge spans into blocks of overlapping longitudinal extent
fn group_spans(mut spans: Vec<Span<'_>>) -> Vec<Vec<Span<'_>>> {
    spans.sort_by(|a, b| a.start_ft.total_cmp(&b.start_ft));
    let mut groups: Vec<Vec<Span<'_>>> = Vec::new();
    let mut group_end = f64::NEG_INFINITY;
    for span in spans {
        if span.start_ft < group_end - EPS {
            if let Some(group) = groups.last_mut() {
                group_end = group_end.max(span.end_ft);
                group.push(span);
                continue;
            }
        }
        group_end = span.end_ft;
        groups.push(vec![span]);
    }
    groups
}

fn secure_group(group: &[Span<'_>], spacing_ft: f64, deck_length_ft: f64) -> GroupSecurement {
    let start = group.iter().map(|s| s.start_ft).fold(f64::INFINITY, f64::min);
    let end = group.iter().map(|s| s.end_ft).fold(f64::NEG_INFINITY, f64::max);
    let weight: f64 = group.iter().map(|s| s.item.weight_lbs).sum();
    let heaviest = group.iter().map(|s| s.item.weight_lbs).fold(0.0, f64::max);
    let length = end - start;

    let available = anchors_alongside(start, end, spacing_ft, deck_length_ft);
    let choice = secure_block(weight, heaviest, length, available);

    let mut notes = Vec::new();
    if group.iter().any(|s| s.item.fragile) {
        notes.push("Use edge protectors under every tie-down".to_string());
    }
    for span in group.iter().filter(|s| s.item.hazmat) {
        let note = format!(
            "Hazmat class {}: placard the vehicle and carry shipping papers",
            span.item.hazmat_class.as_deref().unwrap_or("unspecified")
        );
        if !notes.contains(&note) {
            notes.push(note);
        }
    }
    if choice.tie_downs > available {
        notes.push(format!(
            "Needs {} tie-downs but only {} anchors are within reach",
            choice.tie_downs, available
        ));
    }

    GroupSecurement {
        units: group
            .iter()
            .map(|s| SecuredUnit {
                item_id: s.item.id.clone(),
                unit_index: s.unit_index,
            })
            .collect(),
        start_ft: start,
        length_ft: length,
        weight_lbs: weight,
        device: choice.device,
        tie_downs: choice.tie_downs,
        aggregate_wll_lbs: choice.aggregate_wll_lbs,
        required_wll_lbs: choice.required_wll_lbs,
        available_positions: available,
        compliant: choice.compliant,
        notes,
    }
}

pub fn plan_securement(load: &PlannedLoad) -> SecurementPlan {
    let trailer = &load.trailer;
    let spacing = trailer.tie_down_spacing_ft;

    let groups: Vec<GroupSecurement> = match &load.placements_3d {
        Some(placements) => {
            let spans: Vec<Span<'_>> = placements
                .iter()
                .filter(|p| !p.failed)
                .filter_map(|p| {
                    let item = load.items.iter().find(|i| i.id == p.item_id)?;
                    Some(Span {
                        item,
                        unit_index: p.unit_index,
                        start_ft: p.x_ft,
                        end_ft: p.x_ft + p.length_ft,
                    })
                })
                .collect();
            group_spans(spans)
                .iter()
                .map(|g| secure_group(g, spacing, trailer.deck_length_ft))
                .collect()
        }
        // Without a layout every unit is its own block at the deck front
        None => load
            .items
            .iter()
            .flat_map(|item| {
                (0..item.quantity).map(move |index| Span {
                    item,
                    unit_index: index,
                    start_ft: 0.0,
                    end_ft: item.length_ft,
                })
            })
            .map(|span| secure_group(std::slice::from_ref(&span), spacing, trailer.deck_length_ft))
            .collect(),
    };

    let total_tie_downs: u32 = groups.iter().map(|g| g.tie_downs).sum();
    let total_wll_lbs: f64 = groups.iter().map(|g| g.aggregate_wll_lbs).sum();
    // Each tie-down uses an anchor on both sides of the deck.
    let trailer_capacity = trailer.tie_down_points() / 2;

    let mut issues = Vec::new();
    for group in groups.iter().filter(|g| !g.compliant) {
        let label = group
            .units
            .first()
            .and_then(|u| load.items.iter().find(|i| i.id == u.item_id))
            .map_or("cargo", |i| i.label());
        issues.push(format!(
            "Block at {:.1} ft ({} unit(s), '{}'): {} x {} gives {:.0} lbs WLL against {:.0} lbs required with {} anchors",
            group.start_ft,
            group.units.len(),
            label,
            group.tie_downs,
            group.device.label(),
            group.aggregate_wll_lbs,
            group.required_wll_lbs,
            group.available_positions
        ));
    }
    if total_tie_downs > trailer_capacity {
        issues.push(format!(
            "{} tie-downs required but {} has anchor points for {}",
            total_tie_downs, trailer.name, trailer_capacity
        ));
    }

    let mut notes: Vec<String> = Vec::new();
    for group in groups.iter().filter(|g| g.compliant) {
        for note in &group.notes {
            if !notes.contains(note) {
                notes.push(note.clone());
            }
        }
    }

    SecurementPlan {
        compliant: issues.is_empty(),
        groups,
        total_tie_downs,
        total_wll_lbs,
        trailer_capacity,
        issues,
        notes,
    }
}

pub struct SecurementValidator;

impl LoadValidator for SecurementValidator {
    fn name(&self) -> &'static str {
        "securement"
    }

    fn annotate(&self, load: &mut PlannedLoad, _ctx: &ValidationContext<'_>) {
        let plan = plan_securement(load);
        load.warnings.extend(plan.issues.iter().cloned());
        load.securement = Some(plan);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Placement3D;
    use crate::test_support::flatbed_48;

    fn unit_at(item: &CargoItem, unit_index: u32, x: f64, y: f64, z: f64) -> Placement3D {
        Placement3D {
            item_id: item.id.clone(),
            unit_index,
            x_ft: x,
            y_ft: y,
            z_ft: z,
            length_ft: item.length_ft,
            width_ft: item.width_ft,
            height_ft: item.height_ft,
            weight_lbs: item.weight_lbs,
            layer: if z > 0.0 { 2 } else { 1 },
            deck_height_ft: 5.0,
            rotated: false,
            failed: false,
        }
    }

    #[test]
    fn test_minimum_counts() {
        assert_eq!(minimum_tie_downs(4.0, 1_000.0), 2);
        assert_eq!(minimum_tie_downs(25.0, 5_000.0), 3);
        assert_eq!(minimum_tie_downs(8.0, 12_000.0), 4);
        assert_eq!(minimum_tie_downs(48.0, 30_000.0), 5);
    }

    #[test]
    fn test_anchors_alongside() {
        // Anchors every 2 ft on a 48 ft deck
        assert_eq!(anchors_alongside(0.0, 1.5, 2.0, 48.0), 2);
        assert_eq!(anchors_alongside(10.0, 14.0, 2.0, 48.0), 5);
        assert_eq!(anchors_alongside(44.0, 50.0, 2.0, 48.0), 4);
        assert_eq!(anchors_alongside(0.0, 4.0, 0.0, 48.0), 0);
    }

    #[test]
    fn test_wll_raises_count() {
        // 30,000 lbs needs 15,000 WLL: two 1/2" chains reach 22,600 but the heavy rule needs 4.
        let choice = secure_block(30_000.0, 30_000.0, 20.0, 12);
        assert_eq!(choice.device, TieDownDevice::Grade70OneHalf);
        assert_eq!(choice.tie_downs, 4);
        assert!(choice.compliant);
        assert!(choice.aggregate_wll_lbs >= choice.required_wll_lbs);
    }

    #[test]
    fn test_strap_count_driven_by_wll() {
        let choice = secure_block(9_000.0, 9_000.0, 4.0, 4);
        assert_eq!(choice.device, TieDownDevice::Strap4In);
        assert_eq!(choice.tie_downs, 2);
    }

    #[test]
    fn test_device_kept_when_wll_already_met() {
        // The heavy-article minimum of 4 is what outruns the 3 anchors; a bigger chain cannot help.
        let choice = secure_block(12_000.0, 12_000.0, 2.0, 3);
        assert_eq!(choice.device, TieDownDevice::Grade70ThreeEighths);
        assert_eq!(choice.tie_downs, 4);
        assert!(!choice.compliant);
    }

    #[test]
    fn test_heavy_block_uses_grade_100() {
        // A 6 ft block of light articles weighing 60,000 lbs in total
        let choice = secure_block(60_000.0, 8_000.0, 6.0, 4);
        assert_eq!(choice.device, TieDownDevice::Grade100FiveEighths);
        assert_eq!(choice.tie_downs, 2);
        assert!(choice.compliant);

        let too_heavy = secure_block(200_000.0, 200_000.0, 1.0, 2);
        assert_eq!(too_heavy.device, TieDownDevice::Grade100FiveEighths);
        assert_eq!(too_heavy.tie_downs, 5);
        assert!(!too_heavy.compliant);
    }

    #[test]
    fn test_short_light_article_is_compliant() {
        let box_item = CargoItem::new("parts box", 1.5, 1.5, 1.5, 200.0);
        let load = PlannedLoad::new("load-1", flatbed_48(), vec![box_item]);
        let plan = plan_securement(&load);
        assert_eq!(plan.groups.len(), 1);
        let group = &plan.groups[0];
        assert_eq!(group.device, TieDownDevice::Strap4In);
        assert_eq!(group.tie_downs, 2);
        assert_eq!(group.available_positions, 2);
        assert!(plan.compliant, "{:?}", plan.issues);
    }

    #[test]
    fn test_palletized_rows_share_tie_downs() {
        let pallet = CargoItem::new("pallet", 4.0, 4.0, 4.0, 1_500.0)
            .with_id("pallet")
            .with_quantity(20);
        let placements: Vec<Placement3D> = (0..20u32)
            .map(|i| unit_at(&pallet, i, f64::from(i / 2) * 4.0, f64::from(i % 2) * 4.0, 0.0))
            .collect();
        let mut load = PlannedLoad::new("load-1", flatbed_48(), vec![pallet]);
        load.placements_3d = Some(placements);

        let plan = plan_securement(&load);
        assert_eq!(plan.groups.len(), 10);
        assert!(plan.groups.iter().all(|g| g.units.len() == 2 && g.tie_downs == 2));
        assert_eq!(plan.total_tie_downs, 20);
        assert_eq!(plan.trailer_capacity, 25);
        assert!(plan.compliant, "{:?}", plan.issues);
    }

    #[test]
    fn test_stack_is_one_block() {
        let crate_item = CargoItem::new("crate", 6.0, 4.0, 3.0, 2_000.0)
            .with_id("crate")
            .with_quantity(2)
            .with_stackable(true);
        let mut load = PlannedLoad::new("load-1", flatbed_48(), vec![crate_item.clone()]);
        load.placements_3d = Some(vec![
            unit_at(&crate_item, 0, 0.0, 0.0, 0.0),
            unit_at(&crate_item, 1, 0.0, 0.0, 3.0),
        ]);
        let plan = plan_securement(&load);
        assert_eq!(plan.groups.len(), 1);
        assert!((plan.groups[0].weight_lbs - 4_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_plan_without_placements_uses_item_length() {
        let items = vec![CargoItem::new("pipe", 40.0, 4.0, 2.0, 8_000.0)
            .with_quantity(2)
            .with_fragile(true)];
        let load = PlannedLoad::new("load-1", flatbed_48(), items);
        let plan = plan_securement(&load);
        assert_eq!(plan.groups.len(), 2);
        assert_eq!(plan.total_tie_downs, 8);
        assert_eq!(plan.trailer_capacity, 25);
        assert!(plan.compliant);
        assert!(plan.notes.iter().any(|n| n.contains("edge protectors")));
    }
}
