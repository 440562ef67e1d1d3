//! Seasonal (frost law) weight restrictions

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar day independent of year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.month(), date.day())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum WeightReduction {
    /// Legal gross reduced by this percentage
    Percent(f64),
    /// Legal gross capped at this weight
    CapLbs(f64),
}

impl WeightReduction {
    pub fn apply(&self, gross_lbs: f64) -> f64 {
        match *self {
            WeightReduction::Percent(pct) => gross_lbs * (1.0 - pct / 100.0),
            WeightReduction::CapLbs(cap) => gross_lbs.min(cap),
        }
    }
}

/// A recurring annual restriction window; `end` may fall before `start`
/// for windows that span the new year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalRestriction {
    pub state: String,
    pub name: String,
    pub start: MonthDay,
    pub end: MonthDay,
    pub reduction: WeightReduction,
    pub applies_to: String,
    #[serde(default)]
    pub notes: String,
}

impl SeasonalRestriction {
    /// Inclusive on both ends
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        let day = MonthDay::of(date);
        if self.start <= self.end {
            self.start <= day && day <= self.end
        } else {
            day >= self.start || day <= self.end
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveRestriction {
    pub restriction: SeasonalRestriction,
    pub legal_gross_lbs: f64,
    pub adjusted_gross_lbs: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalCheck {
    pub has_restrictions: bool,
    pub active: Vec<ActiveRestriction>,
    #[serde(default)]
    pub warnings: Vec<String>,
}
