//! Trailer catalog types

use serde::{Deserialize, Serialize};

use crate::federal::{LEGAL_HEIGHT_FT, LEGAL_TRAILER_LENGTH_FT, LEGAL_WIDTH_FT};

/// Trailer families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailerCategory {
    Flatbed,
    StepDeck,
    DoubleDrop,
    Conestoga,
    Rgn,
    Lowboy,
    Stretch,
    Landoll,
    MultiAxle,
    Schnabel,
    Perimeter,
}

impl TrailerCategory {
    pub fn label(&self) -> &'static str {
        match self {
            TrailerCategory::Flatbed => "Flatbed",
            TrailerCategory::StepDeck => "Step Deck",
            TrailerCategory::DoubleDrop => "Double Drop",
            TrailerCategory::Conestoga => "Conestoga",
            TrailerCategory::Rgn => "RGN",
            TrailerCategory::Lowboy => "Lowboy",
            TrailerCategory::Stretch => "Stretch",
            TrailerCategory::Landoll => "Landoll",
            TrailerCategory::MultiAxle => "Multi-Axle",
            TrailerCategory::Schnabel => "Schnabel",
            TrailerCategory::Perimeter => "Perimeter",
        }
    }

    pub fn all() -> &'static [TrailerCategory] {
        &[
            TrailerCategory::Flatbed,
            TrailerCategory::StepDeck,
            TrailerCategory::DoubleDrop,
            TrailerCategory::Conestoga,
            TrailerCategory::Rgn,
            TrailerCategory::Lowboy,
            TrailerCategory::Stretch,
            TrailerCategory::Landoll,
            TrailerCategory::MultiAxle,
            TrailerCategory::Schnabel,
            TrailerCategory::Perimeter,
        ]
    }

    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        Self::all().iter().copied().find(|c| {
            let label: String = c
                .label()
                .chars()
                .filter(|ch| ch.is_ascii_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            label == normalized
        })
    }
}

impl std::fmt::Display for TrailerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingMethod {
    Crane,
    Forklift,
    DriveOn,
    RampLoad,
    TiltDeck,
}

impl LoadingMethod {
    /// Cargo goes on and comes off over one end of the deck
    pub fn is_end_loaded(&self) -> bool {
        matches!(
            self,
            LoadingMethod::DriveOn | LoadingMethod::RampLoad | LoadingMethod::TiltDeck
        )
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "crane" => Some(LoadingMethod::Crane),
            "forklift" => Some(LoadingMethod::Forklift),
            "drive_on" | "driveon" => Some(LoadingMethod::DriveOn),
            "ramp" | "ramp_load" | "rampload" => Some(LoadingMethod::RampLoad),
            "tilt" | "tilt_deck" | "tiltdeck" => Some(LoadingMethod::TiltDeck),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxleGroupKind {
    Steer,
    Drive,
    Trailer,
    Jeep,
    Booster,
}

/// A set of axles treated as one group.
///
/// `position_ft` is the group centroid measured from the kingpin, positive
/// toward the rear; tractor axles sit at negative or small positive positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxleGroup {
    pub label: String,
    pub kind: AxleGroupKind,
    pub axle_count: u8,
    /// First-to-last axle distance within the group
    pub spread_ft: f64,
    pub position_ft: f64,
}

impl AxleGroup {
    pub fn new(label: impl Into<String>, kind: AxleGroupKind, axle_count: u8, spread_ft: f64, position_ft: f64) -> Self {
        Self {
            label: label.into(),
            kind,
            axle_count,
            spread_ft,
            position_ft,
        }
    }

    /// Positions of the individual axles, front to rear
    pub fn axle_positions(&self) -> Vec<f64> {
        let n = self.axle_count.max(1) as usize;
        if n == 1 {
            return vec![self.position_ft];
        }
        let first = self.position_ft - self.spread_ft / 2.0;
        let step = self.spread_ft / (n - 1) as f64;
        (0..n).map(|i| first + step * i as f64).collect()
    }
}

/// Tractor plus trailer axle layout used by the weight-transfer model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxleConfiguration {
    pub steer: AxleGroup,
    pub drive: AxleGroup,
    /// Trailer-side groups, front to rear
    pub trailer_groups: Vec<AxleGroup>,
    /// How far the kingpin sits behind the deck front
    pub kingpin_setback_ft: f64,
    /// Share of the empty power unit carried on the steer axle
    pub power_unit_steer_share: f64,
}

impl AxleConfiguration {
    /// Standard three-axle tractor (20 ft wheelbase, fifth wheel 1 ft ahead of the drive tandem)
    pub fn with_standard_tractor(trailer_groups: Vec<AxleGroup>, kingpin_setback_ft: f64) -> Self {
        Self {
            steer: AxleGroup::new("Steer", AxleGroupKind::Steer, 1, 0.0, -19.0),
            drive: AxleGroup::new("Drive tandem", AxleGroupKind::Drive, 2, 4.3, 1.0),
            trailer_groups,
            kingpin_setback_ft,
            power_unit_steer_share: 0.55,
        }
    }

    /// All groups, front to rear
    pub fn groups(&self) -> Vec<&AxleGroup> {
        let mut groups = vec![&self.steer, &self.drive];
        groups.extend(self.trailer_groups.iter());
        groups
    }

    pub fn trailer_axle_count(&self) -> u32 {
        self.trailer_groups.iter().map(|g| u32::from(g.axle_count)).sum()
    }

    pub fn total_axle_count(&self) -> u32 {
        u32::from(self.steer.axle_count) + u32::from(self.drive.axle_count) + self.trailer_axle_count()
    }

    /// Axle-count weighted centroid of the trailer-side groups
    pub fn trailer_axle_centroid_ft(&self) -> Option<f64> {
        let count = self.trailer_axle_count();
        if count == 0 {
            return None;
        }
        let moment: f64 = self
            .trailer_groups
            .iter()
            .map(|g| g.position_ft * f64::from(g.axle_count))
            .sum();
        Some(moment / f64::from(count))
    }
}

/// A contiguous part of the deck at one height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeckRegion {
    /// Distance from the deck front
    pub start_ft: f64,
    pub length_ft: f64,
    pub deck_height_ft: f64,
    pub is_well: bool,
}

impl DeckRegion {
    pub fn end_ft(&self) -> f64 {
        self.start_ft + self.length_ft
    }
}

/// Static catalog entry for one trailer/truck combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailerType {
    pub id: String,
    pub name: String,
    pub category: TrailerCategory,
    pub deck_length_ft: f64,
    pub deck_width_ft: f64,
    /// Height of the main (upper) deck above the road
    pub deck_height_ft: f64,
    #[serde(default)]
    pub well_length_ft: Option<f64>,
    #[serde(default)]
    pub well_height_ft: Option<f64>,
    /// Well start measured from the deck front; rear of the deck when absent
    #[serde(default)]
    pub well_offset_ft: Option<f64>,
    /// Physical capacity including permitted overhang
    pub max_cargo_length_ft: f64,
    pub max_cargo_width_ft: f64,
    /// Tallest cargo the lowest deck can physically carry
    pub max_cargo_height_ft: f64,
    pub max_cargo_weight_lbs: f64,
    pub tare_weight_lbs: f64,
    pub power_unit_weight_lbs: f64,
    /// Replaces the 13.5 ft derived legal cargo height
    #[serde(default)]
    pub legal_cargo_height_override_ft: Option<f64>,
    pub loading_method: LoadingMethod,
    pub axles: AxleConfiguration,
    /// Spacing of stake pockets / D-rings along each side
    #[serde(default = "default_tie_down_spacing")]
    pub tie_down_spacing_ft: f64,
    /// Lower is more common
    #[serde(default)]
    pub popularity_rank: u32,
}

fn default_tie_down_spacing() -> f64 {
    2.0
}

impl TrailerType {
    pub fn has_well(&self) -> bool {
        self.well_length_ft.is_some() && self.well_height_ft.is_some()
    }

    /// Height of the lowest load-carrying surface
    pub fn lowest_deck_height_ft(&self) -> f64 {
        match self.well_height_ft {
            Some(h) if self.has_well() => h.min(self.deck_height_ft),
            _ => self.deck_height_ft,
        }
    }

    /// Tallest cargo that keeps the loaded vehicle within the 13.5 ft default
    pub fn max_legal_cargo_height_ft(&self) -> f64 {
        self.legal_cargo_height_override_ft
            .unwrap_or(LEGAL_HEIGHT_FT - self.lowest_deck_height_ft())
    }

    pub fn max_legal_cargo_width_ft(&self) -> f64 {
        LEGAL_WIDTH_FT
    }

    pub fn legal_cargo_length_ft(&self) -> f64 {
        self.deck_length_ft.min(LEGAL_TRAILER_LENGTH_FT)
    }

    /// Overall height of the tallest physically carriable load
    pub fn max_overall_height_ft(&self) -> f64 {
        self.lowest_deck_height_ft() + self.max_cargo_height_ft
    }

    /// Empty weight of the combination (power unit + trailer)
    pub fn combination_tare_lbs(&self) -> f64 {
        self.tare_weight_lbs + self.power_unit_weight_lbs
    }

    /// Kingpin to the centre of the rearmost trailer axle group
    pub fn kpra_ft(&self) -> Option<f64> {
        self.axles.trailer_groups.last().map(|g| g.position_ft)
    }

    /// Deck split into upper sections and the well, front to rear
    pub fn deck_regions(&self) -> Vec<DeckRegion> {
        let (Some(well_length), Some(well_height)) = (self.well_length_ft, self.well_height_ft) else {
            return vec![DeckRegion {
                start_ft: 0.0,
                length_ft: self.deck_length_ft,
                deck_height_ft: self.deck_height_ft,
                is_well: false,
            }];
        };
        let well_length = well_length.min(self.deck_length_ft);
        let offset = self
            .well_offset_ft
            .unwrap_or(self.deck_length_ft - well_length)
            .clamp(0.0, self.deck_length_ft - well_length);

        let mut regions = Vec::with_capacity(3);
        if offset > 0.0 {
            regions.push(DeckRegion {
                start_ft: 0.0,
                length_ft: offset,
                deck_height_ft: self.deck_height_ft,
                is_well: false,
            });
        }
        regions.push(DeckRegion {
            start_ft: offset,
            length_ft: well_length,
            deck_height_ft: well_height,
            is_well: true,
        });
        let rear = self.deck_length_ft - offset - well_length;
        if rear > 0.0 {
            regions.push(DeckRegion {
                start_ft: offset + well_length,
                length_ft: rear,
                deck_height_ft: self.deck_height_ft,
                is_well: false,
            });
        }
        regions
    }

    /// Physical height available above a region's surface
    pub fn physical_clearance_ft(&self, region: &DeckRegion) -> f64 {
        self.max_overall_height_ft() - region.deck_height_ft
    }

    /// Height available above a region's surface without a height permit
    pub fn legal_clearance_ft(&self, region: &DeckRegion) -> f64 {
        self.lowest_deck_height_ft() + self.max_legal_cargo_height_ft() - region.deck_height_ft
    }

    /// Upper-deck physical clearance (cargo taller than this must ride in the well)
    pub fn upper_deck_clearance_ft(&self) -> f64 {
        self.max_overall_height_ft() - self.deck_height_ft
    }

    /// Stake pockets / D-rings available along both sides
    pub fn tie_down_points(&self) -> u32 {
        if self.tie_down_spacing_ft <= 0.0 {
            return 0;
        }
        2 * ((self.deck_length_ft / self.tie_down_spacing_ft).floor() as u32 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_deck() -> TrailerType {
        TrailerType {
            id: "sd48".to_string(),
            name: "Step Deck 48'".to_string(),
            category: TrailerCategory::StepDeck,
            deck_length_ft: 48.0,
            deck_width_ft: 8.5,
            deck_height_ft: 5.0,
            well_length_ft: Some(37.0),
            well_height_ft: Some(3.5),
            well_offset_ft: None,
            max_cargo_length_ft: 51.0,
            max_cargo_width_ft: 16.0,
            max_cargo_height_ft: 12.5,
            max_cargo_weight_lbs: 48_000.0,
            tare_weight_lbs: 12_500.0,
            power_unit_weight_lbs: 19_000.0,
            legal_cargo_height_override_ft: None,
            loading_method: LoadingMethod::Crane,
            axles: AxleConfiguration::with_standard_tractor(
                vec![AxleGroup::new("Trailer tandem", AxleGroupKind::Trailer, 2, 4.1, 38.0)],
                3.0,
            ),
            tie_down_spacing_ft: 2.0,
            popularity_rank: 3,
        }
    }

    #[test]
    fn test_step_deck_regions() {
        let regions = step_deck().deck_regions();
        assert_eq!(regions.len(), 2);
        assert!(!regions[0].is_well);
        assert!((regions[0].length_ft - 11.0).abs() < 1e-9);
        assert!(regions[1].is_well);
        assert!((regions[1].start_ft - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_legal_height_uses_lowest_deck() {
        let t = step_deck();
        assert!((t.max_legal_cargo_height_ft() - 10.0).abs() < 1e-9);
        let regions = t.deck_regions();
        assert!((t.legal_clearance_ft(&regions[0]) - 8.5).abs() < 1e-9);
        assert!((t.legal_clearance_ft(&regions[1]) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_axle_positions_evenly_spaced() {
        let g = AxleGroup::new("Tridem", AxleGroupKind::Trailer, 3, 10.0, 40.0);
        assert_eq!(g.axle_positions(), vec![35.0, 40.0, 45.0]);
    }

    #[test]
    fn test_kpra_and_tare() {
        let t = step_deck();
        assert_eq!(t.kpra_ft(), Some(38.0));
        assert!((t.combination_tare_lbs() - 31_500.0).abs() < f64::EPSILON);
        assert_eq!(t.axles.total_axle_count(), 5);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(TrailerCategory::parse("step-deck"), Some(TrailerCategory::StepDeck));
        assert_eq!(TrailerCategory::parse("RGN"), Some(TrailerCategory::Rgn));
        assert_eq!(TrailerCategory::parse("multi axle"), Some(TrailerCategory::MultiAxle));
        assert_eq!(TrailerCategory::parse("boat"), None);
    }
}
