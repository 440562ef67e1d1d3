//! Trailer and state fixtures shared by unit tests

use chrono::NaiveDate;

use crate::model::*;
use haulplan_types::Cents;

pub fn flatbed_48() -> TrailerType {
    TrailerType {
        id: "flatbed-48".to_string(),
        name: "Flatbed 48'".to_string(),
        category: TrailerCategory::Flatbed,
        deck_length_ft: 48.0,
        deck_width_ft: 8.5,
        deck_height_ft: 5.0,
        well_length_ft: None,
        well_height_ft: None,
        well_offset_ft: None,
        max_cargo_length_ft: 53.0,
        max_cargo_width_ft: 16.0,
        max_cargo_height_ft: 11.0,
        max_cargo_weight_lbs: 48_000.0,
        tare_weight_lbs: 10_500.0,
        power_unit_weight_lbs: 19_000.0,
        legal_cargo_height_override_ft: None,
        loading_method: LoadingMethod::Crane,
        axles: AxleConfiguration::with_standard_tractor(
            vec![AxleGroup::new("Trailer tandem", AxleGroupKind::Trailer, 2, 4.1, 38.0)],
            3.0,
        ),
        tie_down_spacing_ft: 2.0,
        popularity_rank: 2,
    }
}

pub fn step_deck_48() -> TrailerType {
    TrailerType {
        id: "step-deck-48".to_string(),
        name: "Step Deck 48'".to_string(),
        category: TrailerCategory::StepDeck,
        deck_height_ft: 5.0,
        well_length_ft: Some(37.0),
        well_height_ft: Some(3.5),
        max_cargo_height_ft: 12.5,
        tare_weight_lbs: 12_000.0,
        popularity_rank: 4,
        ..flatbed_48()
    }
}

pub fn rgn() -> TrailerType {
    TrailerType {
        id: "rgn-29".to_string(),
        name: "RGN 29' well".to_string(),
        category: TrailerCategory::Rgn,
        deck_length_ft: 29.0,
        deck_width_ft: 8.5,
        deck_height_ft: 2.0,
        max_cargo_length_ft: 29.0,
        max_cargo_width_ft: 16.0,
        max_cargo_height_ft: 11.5,
        max_cargo_weight_lbs: 80_000.0,
        tare_weight_lbs: 20_000.0,
        power_unit_weight_lbs: 20_000.0,
        loading_method: LoadingMethod::DriveOn,
        axles: AxleConfiguration::with_standard_tractor(
            vec![AxleGroup::new("Trailer tridem", AxleGroupKind::Trailer, 3, 9.0, 40.0)],
            11.0,
        ),
        popularity_rank: 7,
        ..flatbed_48()
    }
}

/// A generic state with round numbers for fee arithmetic
pub fn sample_state(code: &str) -> StatePermitData {
    StatePermitData {
        code: code.to_string(),
        name: format!("State {}", code),
        legal_limits: LegalLimits {
            max_width_ft: 8.5,
            max_height_ft: 13.5,
            max_length_ft: 53.0,
            weight: WeightLimits {
                gross_lbs: 80_000.0,
                single_axle_lbs: 20_000.0,
                tandem_axle_lbs: 34_000.0,
            },
        },
        oversize: OversizeSchedule {
            base_fee: Cents::from_dollars(60),
            surcharge_model: SurchargeModel::Cumulative,
            surcharges: vec![
                DimensionSurcharge {
                    dimension: Dimension::Width,
                    above_ft: 12.0,
                    fee: Cents::from_dollars(20),
                },
                DimensionSurcharge {
                    dimension: Dimension::Width,
                    above_ft: 14.0,
                    fee: Cents::from_dollars(40),
                },
                DimensionSurcharge {
                    dimension: Dimension::Height,
                    above_ft: 15.0,
                    fee: Cents::from_dollars(25),
                },
            ],
            annual: Some(AnnualPermit {
                fee: Cents::from_dollars(500),
                max_width_ft: 14.0,
                max_height_ft: 14.5,
                max_length_ft: 110.0,
                max_weight_lbs: 120_000.0,
            }),
            processing_time: "Same day".to_string(),
        },
        overweight: OverweightSchedule {
            base_fee: Cents::from_dollars(90),
            per_mile: Some(Cents(50)),
            ton_mile: None,
            weight_brackets: vec![
                WeightBracket {
                    above_lbs: 120_000.0,
                    fee: Cents::from_dollars(100),
                },
                WeightBracket {
                    above_lbs: 150_000.0,
                    fee: Cents::from_dollars(250),
                },
            ],
        },
        escorts: EscortRules {
            width_one_ft: 12.0,
            width_two_ft: Some(16.0),
            height_pole_car_ft: Some(15.0),
            length_one_ft: Some(90.0),
            length_two_ft: Some(125.0),
            police_width_ft: Some(18.0),
            police_height_ft: None,
            police_length_ft: None,
        },
        travel: TravelRestrictions {
            daylight_only: true,
            weekend_travel: false,
            holiday_travel: false,
            curfews: vec![],
        },
        superload: SuperloadThresholds {
            width_ft: 16.0,
            height_ft: 17.0,
            length_ft: 125.0,
            weight_lbs: 200_000.0,
        },
        bridge_analysis: None,
        special_jurisdictions: vec![],
        restricted_routes: vec![],
        kpra_limit_ft: None,
        last_verified: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
    }
}
