//! Cargo items and envelopes

use serde::{Deserialize, Serialize};

/// One line of cargo as supplied by the upstream extraction step.
///
/// Dimensions are feet and `weight_lbs` is the weight of a single unit.
/// Quantity multiplies weight but never footprint: every unit gets its own
/// placement slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoItem {
    pub id: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub length_ft: f64,
    pub width_ft: f64,
    pub height_ft: f64,
    /// Weight of one unit
    pub weight_lbs: f64,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default)]
    pub fragile: bool,
    #[serde(default)]
    pub hazmat: bool,
    /// DOT hazard class (e.g. "3", "5.1") when `hazmat` is set
    #[serde(default)]
    pub hazmat_class: Option<String>,
    #[serde(default)]
    pub bottom_only: bool,
    /// 1 is the highest priority
    #[serde(default)]
    pub priority: Option<u8>,
    /// Delivery stop tag
    #[serde(default)]
    pub destination: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

impl CargoItem {
    pub fn new(description: impl Into<String>, length_ft: f64, width_ft: f64, height_ft: f64, weight_lbs: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sku: None,
            description: description.into(),
            quantity: 1,
            length_ft,
            width_ft,
            height_ft,
            weight_lbs,
            stackable: false,
            fragile: false,
            hazmat: false,
            hazmat_class: None,
            bottom_only: false,
            priority: None,
            destination: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_stackable(mut self, stackable: bool) -> Self {
        self.stackable = stackable;
        self
    }

    pub fn with_fragile(mut self, fragile: bool) -> Self {
        self.fragile = fragile;
        self
    }

    pub fn with_hazmat(mut self, class: impl Into<String>) -> Self {
        self.hazmat = true;
        self.hazmat_class = Some(class.into());
        self
    }

    pub fn with_bottom_only(mut self, bottom_only: bool) -> Self {
        self.bottom_only = bottom_only;
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Weight of all units
    pub fn total_weight(&self) -> f64 {
        self.weight_lbs * f64::from(self.quantity)
    }

    /// Footprint of one unit in square feet
    pub fn unit_footprint(&self) -> f64 {
        self.length_ft * self.width_ft
    }

    pub fn unit_volume(&self) -> f64 {
        self.length_ft * self.width_ft * self.height_ft
    }

    /// Dimensions and weight are positive and the line has at least one unit
    pub fn is_plannable(&self) -> bool {
        self.quantity >= 1
            && [self.length_ft, self.width_ft, self.height_ft, self.weight_lbs]
                .iter()
                .all(|v| v.is_finite() && *v > 0.0)
    }

    pub fn label(&self) -> &str {
        if self.description.is_empty() {
            &self.id
        } else {
            &self.description
        }
    }
}

/// Outer envelope of one or more items: largest dimension in each axis and summed weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CargoEnvelope {
    pub length_ft: f64,
    pub width_ft: f64,
    pub height_ft: f64,
    pub weight_lbs: f64,
}

impl CargoEnvelope {
    pub fn new(length_ft: f64, width_ft: f64, height_ft: f64, weight_lbs: f64) -> Self {
        Self {
            length_ft,
            width_ft,
            height_ft,
            weight_lbs,
        }
    }

    pub fn from_item(item: &CargoItem) -> Self {
        Self::new(item.length_ft, item.width_ft, item.height_ft, item.total_weight())
    }

    pub fn from_items(items: &[CargoItem]) -> Self {
        items.iter().fold(Self::new(0.0, 0.0, 0.0, 0.0), |env, item| Self {
            length_ft: env.length_ft.max(item.length_ft),
            width_ft: env.width_ft.max(item.width_ft),
            height_ft: env.height_ft.max(item.height_ft),
            weight_lbs: env.weight_lbs + item.total_weight(),
        })
    }
}
