//! Boundary validation of incoming cargo

use haulplan_types::{ItemIssue, ValidationError};

use crate::model::CargoItem;

fn issue(item: &CargoItem, field: &str, reason: impl Into<String>) -> ItemIssue {
    ItemIssue {
        item_id: item.id.clone(),
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Issues found on one item; empty when the item is plannable
pub fn item_issues(item: &CargoItem) -> Vec<ItemIssue> {
    let mut issues = Vec::new();
    if item.id.trim().is_empty() {
        issues.push(issue(item, "id", "must not be empty"));
    }
    if item.quantity == 0 {
        issues.push(issue(item, "quantity", "must be at least 1"));
    }
    for (field, value) in [
        ("length_ft", item.length_ft),
        ("width_ft", item.width_ft),
        ("height_ft", item.height_ft),
        ("weight_lbs", item.weight_lbs),
    ] {
        if !value.is_finite() {
            issues.push(issue(item, field, "must be a finite number"));
        } else if value <= 0.0 {
            issues.push(issue(item, field, format!("must be greater than zero (got {})", value)));
        }
    }
    if item.hazmat_class.is_some() && !item.hazmat {
        issues.push(issue(item, "hazmat_class", "is set but the item is not flagged hazmat"));
    }
    issues
}

/// Reject empty manifests and report every invalid field of every item
pub fn validate_cargo_items(items: &[CargoItem]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyCargo);
    }

    let mut issues: Vec<ItemIssue> = items.iter().flat_map(item_issues).collect();

    let mut seen = std::collections::HashSet::new();
    for item in items {
        if !seen.insert(item.id.as_str()) {
            issues.push(issue(item, "id", "is duplicated in the manifest"));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::InvalidItems(issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_rejected() {
        assert_eq!(validate_cargo_items(&[]), Err(ValidationError::EmptyCargo));
    }

    #[test]
    fn test_valid_items_pass() {
        let items = vec![
            CargoItem::new("a", 10.0, 6.0, 7.0, 15_000.0),
            CargoItem::new("b", 4.0, 4.0, 4.0, 500.0).with_quantity(3),
        ];
        assert!(validate_cargo_items(&items).is_ok());
    }

    #[test]
    fn test_every_issue_reported() {
        let items = vec![
            CargoItem::new("zero", 0.0, 6.0, 7.0, 1_000.0).with_id("zero"),
            CargoItem::new("nan", 5.0, f64::NAN, 7.0, -3.0).with_id("nan").with_quantity(0),
        ];
        let Err(ValidationError::InvalidItems(issues)) = validate_cargo_items(&items) else {
            panic!("expected invalid items");
        };
        assert_eq!(issues.len(), 4);
        assert!(issues.iter().any(|i| i.item_id == "zero" && i.field == "length_ft"));
        assert!(issues.iter().any(|i| i.item_id == "nan" && i.field == "width_ft"));
        assert!(issues.iter().any(|i| i.item_id == "nan" && i.field == "weight_lbs"));
        assert!(issues.iter().any(|i| i.item_id == "nan" && i.field == "quantity"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let items = vec![
            CargoItem::new("a", 1.0, 1.0, 1.0, 1.0).with_id("x"),
            CargoItem::new("b", 1.0, 1.0, 1.0, 1.0).with_id("x"),
        ];
        assert!(matches!(
            validate_cargo_items(&items),
            Err(ValidationError::InvalidItems(issues)) if issues.len() == 1
        ));
    }
}
