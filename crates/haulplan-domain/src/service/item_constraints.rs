//! Item-level loading constraints and loading sequence

use serde::{Deserialize, Serialize};

use super::pipeline::{LoadValidator, ValidationContext};
use crate::model::{CargoItem, Placement3D, PlannedLoad};

const EPS: f64 = 1e-6;

/// Hazmat units closer than this are considered adjacent
const HAZMAT_ADJACENCY_FT: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    FragileUnderHeavy,
    BottomOnlyElevated,
    HazmatIncompatible,
    HazmatUnclassified,
    DestinationBlocked,
    PriorityBuried,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    pub kind: ConstraintKind,
    pub severity: Severity,
    pub item_ids: Vec<String>,
    #[serde(default)]
    pub load_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadingInstruction {
    pub step: u32,
    pub item_id: String,
    pub unit_index: u32,
    pub layer: u32,
    pub x_ft: f64,
    #[serde(default)]
    pub destination: Option<String>,
    pub instruction: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintReport {
    pub violations: Vec<ConstraintViolation>,
    pub instructions: Vec<LoadingInstruction>,
    /// No error-severity violations
    pub compliant: bool,
}

/// Main class of a DOT hazard class string ("5.1" stays "5.1", "1.4S" becomes "1")
fn normalize_class(class: &str) -> String {
    let trimmed = class.trim();
    if trimmed.starts_with('1') && (trimmed.len() == 1 || trimmed[1..].starts_with('.')) {
        return "1".to_string();
    }
    trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

const INCOMPATIBLE_CLASSES: &[(&str, &str)] = &[
    ("2.1", "5.1"),
    ("3", "5.1"),
    ("3", "5.2"),
    ("4.1", "5.1"),
    ("4.2", "5.1"),
    ("4.3", "8"),
    ("6.1", "3"),
];

/// Segregation table (simplified 49 CFR 177.848); explosives segregate from everything
pub fn classes_incompatible(a: &str, b: &str) -> bool {
    let (a, b) = (normalize_class(a), normalize_class(b));
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if (a == "1") != (b == "1") {
        return true;
    }
    INCOMPATIBLE_CLASSES
        .iter()
        .any(|&(x, y)| (a == x && b == y) || (a == y && b == x))
}

/// `upper` rests on or above `lower` and their footprints overlap
fn is_above(upper: &Placement3D, lower: &Placement3D) -> bool {
    upper.layer > lower.layer
        && upper.z_ft >= lower.top_ft() - EPS
        && upper.overlaps_footprint(lower)
}

fn find_item<'a>(items: &'a [CargoItem], p: &Placement3D) -> Option<&'a CargoItem> {
    items.iter().find(|i| i.id == p.item_id)
}

fn stop_rank(destination: Option<&str>, order: &[String]) -> Option<usize> {
    destination.map(|d| order.iter().position(|o| o == d).unwrap_or(order.len()))
}

/// Destinations in route order, from the context or by first appearance in the items
fn destination_order(items: &[CargoItem], configured: &[String]) -> Vec<String> {
    if !configured.is_empty() {
        return configured.to_vec();
    }
    let mut order: Vec<String> = Vec::new();
    for d in items.iter().filter_map(|i| i.destination.as_ref()) {
        if !order.contains(d) {
            order.push(d.clone());
        }
    }
    order
}

pub fn check_item_constraints(load: &PlannedLoad, ctx: &ValidationContext<'_>) -> ConstraintReport {
    let placements: Vec<&Placement3D> = load
        .placements_3d
        .iter()
        .flatten()
        .filter(|p| !p.failed)
        .collect();
    let order = destination_order(&load.items, ctx.destination_order);
    let end_loaded = load.trailer.loading_method.is_end_loaded();

    let mut violations = Vec::new();
    let mut push = |kind: ConstraintKind, severity: Severity, ids: Vec<&str>, message: String| {
        violations.push(ConstraintViolation {
            kind,
            severity,
            item_ids: ids.into_iter().map(str::to_string).collect(),
            load_id: Some(load.id.clone()),
            message,
        });
    };

    for p in &placements {
        let Some(item) = find_item(&load.items, p) else { continue };
        if item.bottom_only && p.z_ft > EPS {
            push(
                ConstraintKind::BottomOnlyElevated,
                Severity::Error,
                vec![item.id.as_str()],
                format!("'{}' must ride on the deck but is stacked {:.1} ft up", item.label(), p.z_ft),
            );
        }
    }

    for (i, a) in placements.iter().enumerate() {
        let Some(item_a) = find_item(&load.items, a) else { continue };
        for b in placements.iter().skip(i + 1) {
            let Some(item_b) = find_item(&load.items, b) else { continue };

            for (lower, lower_item, upper, upper_item) in [(a, item_a, b, item_b), (b, item_b, a, item_a)] {
                if !is_above(upper, lower) {
                    continue;
                }
                if lower_item.fragile && upper.weight_lbs > lower.weight_lbs {
                    push(
                        ConstraintKind::FragileUnderHeavy,
                        Severity::Error,
                        vec![lower_item.id.as_str(), upper_item.id.as_str()],
                        format!(
                            "Fragile '{}' is under heavier '{}' ({:.0} lbs > {:.0} lbs)",
                            lower_item.label(),
                            upper_item.label(),
                            upper.weight_lbs,
                            lower.weight_lbs
                        ),
                    );
                }
                if lower_item.priority == Some(1) && lower_item.id != upper_item.id {
                    push(
                        ConstraintKind::PriorityBuried,
                        Severity::Warning,
                        vec![lower_item.id.as_str(), upper_item.id.as_str()],
                        format!("Priority item '{}' is buried under '{}'", lower_item.label(), upper_item.label()),
                    );
                }
                let ranks = (
                    stop_rank(lower_item.destination.as_deref(), &order),
                    stop_rank(upper_item.destination.as_deref(), &order),
                );
                if let (Some(lower_rank), Some(upper_rank)) = ranks {
                    if upper_rank > lower_rank {
                        push(
                            ConstraintKind::DestinationBlocked,
                            Severity::Warning,
                            vec![lower_item.id.as_str(), upper_item.id.as_str()],
                            format!(
                                "'{}' for an earlier stop is under '{}'",
                                lower_item.label(),
                                upper_item.label()
                            ),
                        );
                    }
                }
            }

            if end_loaded && a.layer == 1 && b.layer == 1 {
                let lateral_overlap = a.y_ft < b.y_ft + b.width_ft - EPS && b.y_ft < a.y_ft + a.width_ft - EPS;
                let ranks = (
                    stop_rank(item_a.destination.as_deref(), &order),
                    stop_rank(item_b.destination.as_deref(), &order),
                );
                if let (true, (Some(rank_a), Some(rank_b))) = (lateral_overlap, ranks) {
                    // Cargo comes off the rear: earlier stops must sit behind later ones.
                    let (front, front_item, rear, rear_item, front_rank, rear_rank) = if a.x_ft <= b.x_ft {
                        (a, item_a, b, item_b, rank_a, rank_b)
                    } else {
                        (b, item_b, a, item_a, rank_b, rank_a)
                    };
                    if front_rank < rear_rank && rear.x_ft >= front.x_ft + front.length_ft - EPS {
                        push(
                            ConstraintKind::DestinationBlocked,
                            Severity::Warning,
                            vec![front_item.id.as_str(), rear_item.id.as_str()],
                            format!(
                                "'{}' for an earlier stop is blocked by '{}' at the rear",
                                front_item.label(),
                                rear_item.label()
                            ),
                        );
                    }
                }
            }

            if item_a.hazmat && item_b.hazmat && item_a.id != item_b.id {
                let adjacent = a.footprint_gap_ft(b) <= HAZMAT_ADJACENCY_FT || is_above(a, b) || is_above(b, a);
                if adjacent {
                    match (&item_a.hazmat_class, &item_b.hazmat_class) {
                        (Some(ca), Some(cb)) if classes_incompatible(ca, cb) => push(
                            ConstraintKind::HazmatIncompatible,
                            Severity::Error,
                            vec![item_a.id.as_str(), item_b.id.as_str()],
                            format!(
                                "Hazard classes {} ('{}') and {} ('{}') must be segregated",
                                ca,
                                item_a.label(),
                                cb,
                                item_b.label()
                            ),
                        ),
                        (None, _) | (_, None) => push(
                            ConstraintKind::HazmatUnclassified,
                            Severity::Warning,
                            vec![item_a.id.as_str(), item_b.id.as_str()],
                            format!(
                                "Unclassified hazmat next to other hazmat ('{}', '{}'); confirm segregation",
                                item_a.label(),
                                item_b.label()
                            ),
                        ),
                        _ => {}
                    }
                }
            }
        }
    }

    dedupe(&mut violations);
    let instructions = loading_sequence(load, &placements, &order, end_loaded);
    let compliant = violations.iter().all(|v| v.severity != Severity::Error);
    ConstraintReport {
        violations,
        instructions,
        compliant,
    }
}

/// Multi-unit lines raise the same violation once per unit pair
fn dedupe(violations: &mut Vec<ConstraintViolation>) {
    let mut seen: Vec<(ConstraintKind, Vec<String>)> = Vec::new();
    violations.retain(|v| {
        let key = (v.kind, v.item_ids.clone());
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });
}

/// Floor before stacked, last stop first, then front to rear
fn loading_sequence(
    load: &PlannedLoad,
    placements: &[&Placement3D],
    order: &[String],
    end_loaded: bool,
) -> Vec<LoadingInstruction> {
    let mut sorted: Vec<&Placement3D> = placements.to_vec();
    sorted.sort_by(|a, b| {
        let rank = |p: &Placement3D| {
            stop_rank(find_item(&load.items, p).and_then(|i| i.destination.as_deref()), order).unwrap_or(usize::MAX)
        };
        a.layer
            .cmp(&b.layer)
            .then(rank(*b).cmp(&rank(*a)))
            .then(a.x_ft.total_cmp(&b.x_ft))
    });

    let mut out = Vec::with_capacity(sorted.len());
    for (i, p) in sorted.iter().enumerate() {
        let item = find_item(&load.items, p);
        let label = item.map_or(p.item_id.as_str(), |i| i.label());
        let position = if p.layer == 1 {
            "on the deck".to_string()
        } else {
            format!("on layer {}", p.layer)
        };
        let mut instruction = format!(
            "{} unit {} of '{}' at {:.1} ft from the front, {}",
            if end_loaded { "Roll on" } else { "Lift" },
            p.unit_index + 1,
            label,
            p.x_ft,
            position
        );
        let next_layer = sorted.get(i + 1).map(|n| n.layer);
        if next_layer.map_or(true, |l| l != p.layer) {
            instruction.push_str("; secure this layer before continuing");
        }
        out.push(LoadingInstruction {
            step: i as u32 + 1,
            item_id: p.item_id.clone(),
            unit_index: p.unit_index,
            layer: p.layer,
            x_ft: p.x_ft,
            destination: item.and_then(|i| i.destination.clone()),
            instruction,
        });
    }
    out
}

pub struct ItemConstraintValidator;

impl LoadValidator for ItemConstraintValidator {
    fn name(&self) -> &'static str {
        "item-constraints"
    }

    fn annotate(&self, load: &mut PlannedLoad, ctx: &ValidationContext<'_>) {
        let report = check_item_constraints(load, ctx);
        load.warnings.extend(
            report
                .violations
                .iter()
                .filter(|v| v.severity == Severity::Error)
                .map(|v| v.message.clone()),
        );
        load.constraints = Some(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LoadingMethod, TrailerType};
    use crate::service::stacking::StackingOptions;
    use crate::test_support::flatbed_48;

    fn placement(id: &str, x: f64, y: f64, z: f64, layer: u32, weight: f64) -> Placement3D {
        Placement3D {
            item_id: id.to_string(),
            unit_index: 0,
            x_ft: x,
            y_ft: y,
            z_ft: z,
            length_ft: 8.0,
            width_ft: 4.0,
            height_ft: 3.0,
            weight_lbs: weight,
            layer,
            deck_height_ft: 5.0,
            rotated: false,
            failed: false,
        }
    }

    fn load(trailer: TrailerType, items: Vec<CargoItem>, placements: Vec<Placement3D>) -> PlannedLoad {
        let mut load = PlannedLoad::new("load-1", trailer, items);
        load.placements_3d = Some(placements);
        load
    }

    fn check(load: &PlannedLoad, order: &[String]) -> ConstraintReport {
        let stacking = StackingOptions::default();
        let ctx = ValidationContext {
            stacking: &stacking,
            kpra_limits: &[],
            overweight_permitted: None,
            destination_order: order,
        };
        check_item_constraints(load, &ctx)
    }

    fn item(id: &str, weight: f64) -> CargoItem {
        CargoItem::new(id, 8.0, 4.0, 3.0, weight).with_id(id)
    }

    #[test]
    fn test_class_table() {
        assert!(classes_incompatible("3", "5.1"));
        assert!(classes_incompatible("5.1", "3"));
        assert!(classes_incompatible("1.4S", "8"));
        assert!(!classes_incompatible("1.1", "1.4"));
        assert!(!classes_incompatible("3", "8"));
    }

    #[test]
    fn test_fragile_under_heavy() {
        let l = load(
            flatbed_48(),
            vec![item("glass", 500.0).with_fragile(true), item("steel", 2000.0)],
            vec![placement("glass", 0.0, 0.0, 0.0, 1, 500.0), placement("steel", 0.0, 0.0, 3.0, 2, 2000.0)],
        );
        let report = check(&l, &[]);
        assert!(!report.compliant);
        assert!(report.violations.iter().any(|v| v.kind == ConstraintKind::FragileUnderHeavy));
    }

    #[test]
    fn test_incompatible_hazmat_adjacent() {
        let l = load(
            flatbed_48(),
            vec![item("fuel", 1000.0).with_hazmat("3"), item("oxidizer", 1000.0).with_hazmat("5.1")],
            vec![placement("fuel", 0.0, 0.0, 0.0, 1, 1000.0), placement("oxidizer", 10.0, 0.0, 0.0, 1, 1000.0)],
        );
        let report = check(&l, &[]);
        assert!(report.violations.iter().any(|v| v.kind == ConstraintKind::HazmatIncompatible));

        let far = load(
            flatbed_48(),
            vec![item("fuel", 1000.0).with_hazmat("3"), item("oxidizer", 1000.0).with_hazmat("5.1")],
            vec![placement("fuel", 0.0, 0.0, 0.0, 1, 1000.0), placement("oxidizer", 30.0, 0.0, 0.0, 1, 1000.0)],
        );
        assert!(check(&far, &[]).compliant);
    }

    #[test]
    fn test_destination_blocking_vertical() {
        let l = load(
            flatbed_48(),
            vec![
                item("first", 1000.0).with_destination("Dallas"),
                item("second", 500.0).with_destination("Tulsa"),
            ],
            vec![placement("first", 0.0, 0.0, 0.0, 1, 1000.0), placement("second", 0.0, 0.0, 3.0, 2, 500.0)],
        );
        let order = vec!["Dallas".to_string(), "Tulsa".to_string()];
        let report = check(&l, &order);
        assert!(report.compliant);
        assert!(report.violations.iter().any(|v| v.kind == ConstraintKind::DestinationBlocked));
    }

    #[test]
    fn test_destination_blocking_longitudinal_end_loaded() {
        let trailer = TrailerType {
            loading_method: LoadingMethod::RampLoad,
            ..flatbed_48()
        };
        let items = vec![
            item("first", 1000.0).with_destination("A"),
            item("second", 1000.0).with_destination("B"),
        ];
        let blocked = load(
            trailer.clone(),
            items.clone(),
            vec![placement("first", 0.0, 0.0, 0.0, 1, 1000.0), placement("second", 8.0, 0.0, 0.0, 1, 1000.0)],
        );
        assert!(check(&blocked, &[]).violations.iter().any(|v| v.kind == ConstraintKind::DestinationBlocked));

        let ok = load(
            trailer,
            items,
            vec![placement("second", 0.0, 0.0, 0.0, 1, 1000.0), placement("first", 8.0, 0.0, 0.0, 1, 1000.0)],
        );
        assert!(check(&ok, &[]).violations.is_empty());
    }

    #[test]
    fn test_loading_sequence_floor_first_last_stop_first() {
        let l = load(
            flatbed_48(),
            vec![
                item("early", 1000.0).with_destination("A"),
                item("late", 1000.0).with_destination("B"),
                item("top", 200.0).with_stackable(true),
            ],
            vec![
                placement("early", 0.0, 0.0, 0.0, 1, 1000.0),
                placement("late", 8.0, 0.0, 0.0, 1, 1000.0),
                placement("top", 0.0, 0.0, 3.0, 2, 200.0),
            ],
        );
        let report = check(&l, &[]);
        let ids: Vec<&str> = report.instructions.iter().map(|i| i.item_id.as_str()).collect();
        assert_eq!(ids, vec!["late", "early", "top"]);
        assert!(report.instructions[1].instruction.contains("secure"));
        assert_eq!(report.instructions[2].step, 3);
    }

    #[test]
    fn test_priority_buried() {
        let l = load(
            flatbed_48(),
            vec![item("urgent", 1000.0).with_priority(1), item("other", 500.0)],
            vec![placement("urgent", 0.0, 0.0, 0.0, 1, 1000.0), placement("other", 0.0, 0.0, 3.0, 2, 500.0)],
        );
        let report = check(&l, &[]);
        assert!(report.violations.iter().any(|v| v.kind == ConstraintKind::PriorityBuried));
    }
}
