//! Trailer catalog for common open-deck and heavy-haul equipment

use std::sync::LazyLock;

use haulplan_domain::model::{
    AxleConfiguration, AxleGroup, AxleGroupKind, LoadingMethod, TrailerCategory, TrailerType,
};

fn tandem(position_ft: f64) -> AxleGroup {
    AxleGroup::new("Trailer tandem", AxleGroupKind::Trailer, 2, 4.1, position_ft)
}

fn tridem(position_ft: f64) -> AxleGroup {
    AxleGroup::new("Trailer tridem", AxleGroupKind::Trailer, 3, 9.0, position_ft)
}

fn flatbed(id: &str, name: &str, deck_length_ft: f64, rank: u32) -> TrailerType {
    TrailerType {
        id: id.to_string(),
        name: name.to_string(),
        category: TrailerCategory::Flatbed,
        deck_length_ft,
        deck_width_ft: 8.5,
        deck_height_ft: 5.0,
        well_length_ft: None,
        well_height_ft: None,
        well_offset_ft: None,
        max_cargo_length_ft: deck_length_ft + 5.0,
        max_cargo_width_ft: 16.0,
        max_cargo_height_ft: 11.0,
        max_cargo_weight_lbs: 48_000.0,
        tare_weight_lbs: 10_500.0,
        power_unit_weight_lbs: 19_000.0,
        legal_cargo_height_override_ft: None,
        loading_method: LoadingMethod::Crane,
        axles: AxleConfiguration::with_standard_tractor(vec![tandem(deck_length_ft - 10.0)], 3.0),
        tie_down_spacing_ft: 2.0,
        popularity_rank: rank,
    }
}

/// All catalog trailers in popularity order
pub static TRAILER_CATALOG: LazyLock<Vec<TrailerType>> = LazyLock::new(|| {
    vec![
        flatbed("flatbed-48", "Flatbed 48'", 48.0, 1),
        TrailerType {
            max_cargo_weight_lbs: 47_000.0,
            tare_weight_lbs: 11_000.0,
            ..flatbed("flatbed-53", "Flatbed 53'", 53.0, 2)
        },
        TrailerType {
            category: TrailerCategory::StepDeck,
            well_length_ft: Some(37.0),
            well_height_ft: Some(3.5),
            max_cargo_height_ft: 12.0,
            max_cargo_weight_lbs: 46_000.0,
            tare_weight_lbs: 12_000.0,
            ..flatbed("step-deck-48", "Step Deck 48'", 48.0, 3)
        },
        TrailerType {
            category: TrailerCategory::StepDeck,
            well_length_ft: Some(42.0),
            well_height_ft: Some(3.5),
            max_cargo_height_ft: 12.0,
            max_cargo_weight_lbs: 45_000.0,
            tare_weight_lbs: 12_800.0,
            ..flatbed("step-deck-53", "Step Deck 53'", 53.0, 4)
        },
        TrailerType {
            category: TrailerCategory::Conestoga,
            max_cargo_length_ft: 48.0,
            max_cargo_width_ft: 8.5,
            max_cargo_height_ft: 8.0,
            max_cargo_weight_lbs: 44_000.0,
            tare_weight_lbs: 13_500.0,
            loading_method: LoadingMethod::Forklift,
            ..flatbed("conestoga-48", "Conestoga 48'", 48.0, 5)
        },
        TrailerType {
            category: TrailerCategory::DoubleDrop,
            deck_height_ft: 3.5,
            well_length_ft: Some(29.0),
            well_height_ft: Some(1.83),
            well_offset_ft: Some(10.0),
            max_cargo_length_ft: 48.0,
            max_cargo_height_ft: 11.5,
            max_cargo_weight_lbs: 40_000.0,
            tare_weight_lbs: 15_000.0,
            ..flatbed("double-drop-48", "Double Drop 48' (29' well)", 48.0, 6)
        },
        TrailerType {
            category: TrailerCategory::Rgn,
            deck_length_ft: 29.0,
            deck_height_ft: 2.0,
            max_cargo_length_ft: 29.0,
            max_cargo_height_ft: 11.5,
            max_cargo_weight_lbs: 42_000.0,
            tare_weight_lbs: 17_500.0,
            loading_method: LoadingMethod::DriveOn,
            axles: AxleConfiguration::with_standard_tractor(vec![tandem(38.0)], 11.0),
            ..flatbed("rgn-2axle", "RGN 2-Axle (29' well)", 29.0, 7)
        },
        TrailerType {
            category: TrailerCategory::Rgn,
            deck_length_ft: 29.0,
            deck_height_ft: 2.0,
            max_cargo_length_ft: 29.0,
            max_cargo_height_ft: 11.5,
            max_cargo_weight_lbs: 60_000.0,
            tare_weight_lbs: 20_000.0,
            power_unit_weight_lbs: 20_000.0,
            loading_method: LoadingMethod::DriveOn,
            axles: AxleConfiguration::with_standard_tractor(vec![tridem(40.0)], 11.0),
            ..flatbed("rgn-3axle", "RGN 3-Axle (29' well)", 29.0, 8)
        },
        TrailerType {
            category: TrailerCategory::Lowboy,
            deck_length_ft: 26.0,
            deck_width_ft: 8.5,
            deck_height_ft: 1.5,
            max_cargo_length_ft: 28.0,
            max_cargo_width_ft: 16.0,
            max_cargo_height_ft: 12.0,
            max_cargo_weight_lbs: 80_000.0,
            tare_weight_lbs: 24_000.0,
            power_unit_weight_lbs: 21_000.0,
            loading_method: LoadingMethod::RampLoad,
            axles: AxleConfiguration::with_standard_tractor(
                vec![AxleGroup::new("Trailer quad", AxleGroupKind::Trailer, 4, 13.5, 40.0)],
                10.0,
            ),
            ..flatbed("lowboy-4axle", "Lowboy 4-Axle Fixed Neck", 26.0, 9)
        },
        TrailerType {
            category: TrailerCategory::Stretch,
            max_cargo_length_ft: 80.0,
            max_cargo_weight_lbs: 43_000.0,
            tare_weight_lbs: 14_500.0,
            axles: AxleConfiguration::with_standard_tractor(vec![tandem(68.0)], 3.0),
            ..flatbed("stretch-flatbed-80", "Stretch Flatbed 48'-80'", 80.0, 10)
        },
        TrailerType {
            category: TrailerCategory::Landoll,
            deck_height_ft: 3.25,
            max_cargo_length_ft: 53.0,
            max_cargo_height_ft: 10.0,
            max_cargo_weight_lbs: 50_000.0,
            tare_weight_lbs: 16_500.0,
            loading_method: LoadingMethod::TiltDeck,
            ..flatbed("landoll-53", "Landoll Traveling-Axle 53'", 53.0, 11)
        },
        TrailerType {
            category: TrailerCategory::MultiAxle,
            deck_length_ft: 30.0,
            deck_width_ft: 10.0,
            deck_height_ft: 2.0,
            max_cargo_length_ft: 40.0,
            max_cargo_width_ft: 20.0,
            max_cargo_height_ft: 13.0,
            max_cargo_weight_lbs: 160_000.0,
            tare_weight_lbs: 42_000.0,
            power_unit_weight_lbs: 24_000.0,
            loading_method: LoadingMethod::DriveOn,
            axles: AxleConfiguration::with_standard_tractor(
                vec![
                    AxleGroup::new("Jeep", AxleGroupKind::Jeep, 2, 4.5, 2.0),
                    AxleGroup::new("Main deck", AxleGroupKind::Trailer, 5, 20.0, 44.0),
                    AxleGroup::new("Booster", AxleGroupKind::Booster, 2, 4.5, 62.0),
                ],
                12.0,
            ),
            ..flatbed("multi-axle-13", "13-Axle Lowboy with Jeep and Booster", 30.0, 12)
        },
        TrailerType {
            category: TrailerCategory::Perimeter,
            deck_length_ft: 40.0,
            deck_width_ft: 12.0,
            deck_height_ft: 3.0,
            well_length_ft: Some(26.0),
            well_height_ft: Some(0.75),
            well_offset_ft: Some(7.0),
            max_cargo_length_ft: 40.0,
            max_cargo_width_ft: 20.0,
            max_cargo_height_ft: 14.0,
            max_cargo_weight_lbs: 200_000.0,
            tare_weight_lbs: 60_000.0,
            power_unit_weight_lbs: 26_000.0,
            axles: AxleConfiguration::with_standard_tractor(
                vec![
                    AxleGroup::new("Front dolly", AxleGroupKind::Jeep, 4, 13.5, 4.0),
                    AxleGroup::new("Rear bogie", AxleGroupKind::Trailer, 6, 22.5, 60.0),
                ],
                8.0,
            ),
            ..flatbed("perimeter-200", "Perimeter Frame 200T", 40.0, 13)
        },
        TrailerType {
            category: TrailerCategory::Schnabel,
            deck_length_ft: 90.0,
            deck_width_ft: 12.0,
            deck_height_ft: 2.5,
            max_cargo_length_ft: 120.0,
            max_cargo_width_ft: 20.0,
            max_cargo_height_ft: 14.0,
            max_cargo_weight_lbs: 400_000.0,
            tare_weight_lbs: 110_000.0,
            power_unit_weight_lbs: 30_000.0,
            axles: AxleConfiguration::with_standard_tractor(
                vec![
                    AxleGroup::new("Front bogie", AxleGroupKind::Trailer, 8, 31.5, 10.0),
                    AxleGroup::new("Rear bogie", AxleGroupKind::Trailer, 8, 31.5, 110.0),
                ],
                5.0,
            ),
            ..flatbed("schnabel-16", "Schnabel 16-Line", 90.0, 14)
        },
    ]
});

/// Catalog trailer by id
pub fn get_trailer(id: &str) -> Option<&'static TrailerType> {
    TRAILER_CATALOG.iter().find(|t| t.id == id)
}
