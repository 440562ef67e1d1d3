//! Inch-based legacy cargo interchange

use serde::{Deserialize, Serialize};

use crate::federal::{LEGACY_OVERSIZE_CARGO_HEIGHT_FT, LEGAL_WIDTH_FT};
use crate::model::CargoItem;
use haulplan_types::INCHES_PER_FOOT;

/// Cargo record of the older inch/pound interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyCargoItem {
    pub id: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub description: String,
    pub quantity: u32,
    pub length_inches: f64,
    pub width_inches: f64,
    pub height_inches: f64,
    pub weight_lbs: f64,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default)]
    pub fragile: bool,
    #[serde(default)]
    pub hazmat: bool,
    /// Width over 8.5 ft or cargo height over 10 ft
    pub is_oversize: bool,
}

pub fn is_legacy_oversize(width_ft: f64, height_ft: f64) -> bool {
    width_ft > LEGAL_WIDTH_FT || height_ft > LEGACY_OVERSIZE_CARGO_HEIGHT_FT
}

pub fn to_legacy_format(item: &CargoItem) -> LegacyCargoItem {
    LegacyCargoItem {
        id: item.id.clone(),
        sku: item.sku.clone(),
        description: item.description.clone(),
        quantity: item.quantity,
        length_inches: item.length_ft * INCHES_PER_FOOT,
        width_inches: item.width_ft * INCHES_PER_FOOT,
        height_inches: item.height_ft * INCHES_PER_FOOT,
        weight_lbs: item.weight_lbs,
        stackable: item.stackable,
        fragile: item.fragile,
        hazmat: item.hazmat,
        is_oversize: is_legacy_oversize(item.width_ft, item.height_ft),
    }
}

/// Fields the legacy record never carried come back as defaults
pub fn from_legacy_format(legacy: &LegacyCargoItem) -> CargoItem {
    CargoItem {
        id: legacy.id.clone(),
        sku: legacy.sku.clone(),
        description: legacy.description.clone(),
        quantity: legacy.quantity,
        length_ft: legacy.length_inches / INCHES_PER_FOOT,
        width_ft: legacy.width_inches / INCHES_PER_FOOT,
        height_ft: legacy.height_inches / INCHES_PER_FOOT,
        weight_lbs: legacy.weight_lbs,
        stackable: legacy.stackable,
        fragile: legacy.fragile,
        hazmat: legacy.hazmat,
        hazmat_class: None,
        bottom_only: false,
        priority: None,
        destination: None,
    }
}
