//! Single-trip permit schedules for the 50 states and DC
//!
//! Rows carry the figures that vary from state to state; `build` expands a row
//! into a full record and `extras` adds bridge rules, nested city permits,
//! restricted highways and KPRA caps where a state has them.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;

use haulplan_domain::federal::{LEGAL_GROSS_LBS, LEGAL_TRAILER_LENGTH_FT, LEGAL_WIDTH_FT};
use haulplan_domain::model::{
    AnnualPermit, BridgeAnalysisRule, Dimension, DimensionSurcharge, EscortRules, GeoBounds,
    LegalLimits, OverweightSchedule, OversizeSchedule, RestrictedRoute, SpecialJurisdiction,
    StatePermitData, SuperloadThresholds, SurchargeModel, TravelRestrictions, WeightBracket,
    WeightLimits,
};
use haulplan_types::Cents;

#[derive(Clone, Copy)]
struct Row {
    code: &'static str,
    name: &'static str,
    legal_height_ft: f64,
    legal_length_ft: f64,
    /// Dollars
    oversize_fee: i64,
    overweight_fee: i64,
    model: SurchargeModel,
    /// Width, height and length brackets as (above_ft, dollars)
    width_brackets: &'static [(f64, i64)],
    height_brackets: &'static [(f64, i64)],
    length_brackets: &'static [(f64, i64)],
    per_mile_cents: Option<i64>,
    ton_mile_cents: Option<i64>,
    weight_brackets: &'static [(f64, i64)],
    /// Annual fee in dollars with its width/height/length/weight envelope
    annual: Option<(i64, f64, f64, f64, f64)>,
    escort_width_one: f64,
    escort_width_two: f64,
    pole_car_height: Option<f64>,
    escort_length_one: Option<f64>,
    escort_length_two: Option<f64>,
    police_width: Option<f64>,
    daylight_only: bool,
    weekend_travel: bool,
    superload: (f64, f64, f64, f64),
    processing: &'static str,
    verified: (i32, u32, u32),
}

const BASE: Row = Row {
    code: "",
    name: "",
    legal_height_ft: 13.5,
    legal_length_ft: LEGAL_TRAILER_LENGTH_FT,
    oversize_fee: 30,
    overweight_fee: 50,
    model: SurchargeModel::Cumulative,
    width_brackets: &[],
    height_brackets: &[],
    length_brackets: &[],
    per_mile_cents: None,
    ton_mile_cents: None,
    weight_brackets: &[],
    annual: None,
    escort_width_one: 12.0,
    escort_width_two: 16.0,
    pole_car_height: Some(16.0),
    escort_length_one: Some(100.0),
    escort_length_two: Some(125.0),
    police_width: None,
    daylight_only: true,
    weekend_travel: false,
    superload: (16.0, 16.0, 150.0, 200_000.0),
    processing: "1-2 business days",
    verified: (2026, 1, 15),
};

const ROWS: &[Row] = &[
    Row {
        code: "AL",
        name: "Alabama",
        oversize_fee: 20,
        overweight_fee: 20,
        ton_mile_cents: Some(5),
        width_brackets: &[(12.0, 10), (14.0, 20)],
        annual: Some((500, 12.0, 14.5, 100.0, 120_000.0)),
        superload: (16.0, 16.0, 150.0, 150_000.0),
        ..BASE
    },
    Row {
        code: "AK",
        name: "Alaska",
        legal_height_ft: 15.0,
        legal_length_ft: 75.0,
        oversize_fee: 20,
        overweight_fee: 20,
        per_mile_cents: Some(3),
        escort_width_one: 13.0,
        escort_width_two: 16.0,
        pole_car_height: Some(17.0),
        weekend_travel: true,
        superload: (20.0, 17.0, 150.0, 200_000.0),
        verified: (2025, 9, 4),
        ..BASE
    },
    Row {
        code: "AZ",
        name: "Arizona",
        legal_height_ft: 14.0,
        oversize_fee: 15,
        overweight_fee: 75,
        annual: Some((360, 14.0, 16.0, 120.0, 250_000.0)),
        escort_width_one: 14.0,
        escort_width_two: 17.0,
        pole_car_height: Some(16.0),
        superload: (20.0, 17.0, 120.0, 250_000.0),
        ..BASE
    },
    Row {
        code: "AR",
        name: "Arkansas",
        oversize_fee: 17,
        overweight_fee: 17,
        ton_mile_cents: Some(4),
        width_brackets: &[(12.0, 10), (14.0, 15), (16.0, 25)],
        annual: Some((500, 12.0, 15.0, 100.0, 100_000.0)),
        escort_width_one: 12.0,
        escort_width_two: 16.0,
        ..BASE
    },
    Row {
        code: "CA",
        name: "California",
        legal_height_ft: 14.0,
        oversize_fee: 16,
        overweight_fee: 16,
        model: SurchargeModel::Tiered,
        width_brackets: &[(12.0, 0), (14.0, 9)],
        annual: Some((90, 16.0, 15.0, 135.0, 120_000.0)),
        escort_width_one: 12.0,
        escort_width_two: 14.0,
        pole_car_height: Some(15.0),
        escort_length_one: Some(120.0),
        escort_length_two: Some(135.0),
        police_width: Some(20.0),
        superload: (16.0, 17.0, 135.0, 200_000.0),
        processing: "Same day (online); 3-5 days for extra-legal review",
        verified: (2026, 2, 3),
        ..BASE
    },
    Row {
        code: "CO",
        name: "Colorado",
        legal_height_ft: 13.0,
        oversize_fee: 15,
        overweight_fee: 15,
        ton_mile_cents: Some(6),
        annual: Some((250, 14.0, 15.0, 120.0, 110_000.0)),
        escort_width_one: 13.0,
        escort_width_two: 16.0,
        superload: (17.0, 16.0, 130.0, 200_000.0),
        ..BASE
    },
    Row {
        code: "CT",
        name: "Connecticut",
        oversize_fee: 40,
        overweight_fee: 40,
        per_mile_cents: Some(25),
        weight_brackets: &[(100_000.0, 50), (120_000.0, 150)],
        escort_width_one: 12.0,
        escort_width_two: 14.0,
        pole_car_height: Some(14.5),
        police_width: Some(16.0),
        superload: (14.0, 14.5, 120.0, 120_000.0),
        processing: "2-3 business days",
        ..BASE
    },
    Row {
        code: "DE",
        name: "Delaware",
        oversize_fee: 25,
        overweight_fee: 25,
        per_mile_cents: Some(30),
        escort_width_one: 12.0,
        escort_width_two: 15.0,
        police_width: Some(15.0),
        superload: (15.0, 15.0, 120.0, 120_000.0),
        ..BASE
    },
    Row {
        code: "DC",
        name: "District of Columbia",
        legal_length_ft: 48.0,
        oversize_fee: 50,
        overweight_fee: 50,
        per_mile_cents: Some(100),
        escort_width_one: 10.0,
        escort_width_two: 12.0,
        pole_car_height: Some(14.0),
        police_width: Some(12.0),
        superload: (12.0, 14.0, 80.0, 100_000.0),
        processing: "3-5 business days",
        ..BASE
    },
    Row {
        code: "FL",
        name: "Florida",
        oversize_fee: 20,
        overweight_fee: 20,
        per_mile_cents: Some(47),
        annual: Some((500, 12.0, 14.5, 95.0, 112_000.0)),
        escort_width_one: 12.0,
        escort_width_two: 15.0,
        pole_car_height: Some(15.0),
        police_width: Some(16.0),
        superload: (16.0, 18.0, 150.0, 199_000.0),
        ..BASE
    },
    Row {
        code: "GA",
        name: "Georgia",
        oversize_fee: 30,
        overweight_fee: 30,
        weight_brackets: &[(100_000.0, 25), (125_000.0, 75), (150_000.0, 125)],
        annual: Some((150, 12.0, 15.0, 100.0, 100_000.0)),
        escort_width_one: 12.0,
        escort_width_two: 16.0,
        pole_car_height: Some(15.5),
        superload: (16.0, 16.0, 125.0, 180_000.0),
        ..BASE
    },
    Row {
        code: "HI",
        name: "Hawaii",
        legal_height_ft: 14.0,
        legal_length_ft: 48.0,
        oversize_fee: 15,
        overweight_fee: 15,
        escort_width_one: 10.0,
        escort_width_two: 13.0,
        police_width: Some(14.0),
        superload: (14.0, 15.0, 100.0, 150_000.0),
        processing: "5 business days",
        ..BASE
    },
    Row {
        code: "ID",
        name: "Idaho",
        legal_height_ft: 14.0,
        oversize_fee: 35,
        overweight_fee: 60,
        ton_mile_cents: Some(3),
        annual: Some((54, 14.5, 15.0, 115.0, 105_500.0)),
        escort_width_one: 14.0,
        escort_width_two: 16.0,
        superload: (16.0, 16.0, 150.0, 200_000.0),
        weekend_travel: true,
        ..BASE
    },
    Row {
        code: "IL",
        name: "Illinois",
        oversize_fee: 20,
        overweight_fee: 20,
        per_mile_cents: Some(15),
        weight_brackets: &[(100_000.0, 20), (120_000.0, 60), (150_000.0, 120)],
        annual: Some((250, 14.5, 14.5, 110.0, 100_000.0)),
        escort_width_one: 14.5,
        escort_width_two: 18.0,
        pole_car_height: Some(15.0),
        police_width: Some(18.0),
        superload: (18.0, 16.0, 145.0, 120_000.0),
        ..BASE
    },
    Row {
        code: "IN",
        name: "Indiana",
        oversize_fee: 20,
        overweight_fee: 20,
        ton_mile_cents: Some(4),
        per_mile_cents: Some(35),
        escort_width_one: 12.4,
        escort_width_two: 14.5,
        pole_car_height: Some(14.5),
        police_width: Some(16.0),
        superload: (16.0, 15.0, 110.0, 120_000.0),
        ..BASE
    },
    Row {
        code: "IA",
        name: "Iowa",
        oversize_fee: 10,
        overweight_fee: 10,
        ton_mile_cents: Some(4),
        annual: Some((120, 14.0, 15.0, 120.0, 130_000.0)),
        escort_width_one: 14.5,
        escort_width_two: 16.0,
        superload: (16.0, 16.0, 120.0, 156_000.0),
        ..BASE
    },
    Row {
        code: "KS",
        name: "Kansas",
        legal_height_ft: 14.0,
        oversize_fee: 15,
        overweight_fee: 20,
        per_mile_cents: Some(10),
        annual: Some((75, 14.0, 15.0, 120.0, 110_000.0)),
        escort_width_one: 14.0,
        escort_width_two: 16.5,
        pole_car_height: Some(17.0),
        superload: (16.5, 17.0, 126.0, 150_000.0),
        ..BASE
    },
    Row {
        code: "KY",
        name: "Kentucky",
        oversize_fee: 60,
        overweight_fee: 60,
        annual: Some((200, 12.0, 15.0, 100.0, 120_000.0)),
        escort_width_one: 12.0,
        escort_width_two: 14.5,
        pole_car_height: Some(15.5),
        superload: (16.0, 15.5, 120.0, 150_000.0),
        ..BASE
    },
    Row {
        code: "LA",
        name: "Louisiana",
        oversize_fee: 10,
        overweight_fee: 10,
        ton_mile_cents: Some(3),
        width_brackets: &[(12.0, 0), (14.0, 33), (16.0, 66)],
        annual: Some((700, 12.0, 14.0, 90.0, 108_000.0)),
        escort_width_one: 12.0,
        escort_width_two: 16.0,
        pole_car_height: Some(15.0),
        superload: (16.0, 17.0, 125.0, 232_000.0),
        ..BASE
    },
    Row {
        code: "ME",
        name: "Maine",
        oversize_fee: 18,
        overweight_fee: 18,
        per_mile_cents: Some(20),
        escort_width_one: 12.0,
        escort_width_two: 14.0,
        pole_car_height: Some(14.0),
        police_width: Some(16.0),
        superload: (16.0, 15.0, 125.0, 150_000.0),
        ..BASE
    },
    Row {
        code: "MD",
        name: "Maryland",
        oversize_fee: 30,
        overweight_fee: 30,
        per_mile_cents: Some(50),
        escort_width_one: 13.0,
        escort_width_two: 16.0,
        pole_car_height: Some(14.5),
        police_width: Some(16.0),
        superload: (16.0, 16.0, 120.0, 150_000.0),
        ..BASE
    },
    Row {
        code: "MA",
        name: "Massachusetts",
        oversize_fee: 25,
        overweight_fee: 25,
        per_mile_cents: Some(20),
        escort_width_one: 12.0,
        escort_width_two: 14.0,
        pole_car_height: Some(14.0),
        police_width: Some(14.0),
        superload: (14.0, 14.5, 100.0, 130_000.0),
        processing: "2-4 business days",
        ..BASE
    },
    Row {
        code: "MI",
        name: "Michigan",
        oversize_fee: 15,
        overweight_fee: 50,
        weight_brackets: &[(100_000.0, 25), (150_000.0, 100)],
        annual: Some((30, 14.0, 14.5, 100.0, 120_000.0)),
        escort_width_one: 14.0,
        escort_width_two: 16.0,
        pole_car_height: Some(14.5),
        superload: (16.0, 15.0, 150.0, 150_000.0),
        ..BASE
    },
    Row {
        code: "MN",
        name: "Minnesota",
        oversize_fee: 15,
        overweight_fee: 36,
        weight_brackets: &[(100_000.0, 20), (150_000.0, 100), (200_000.0, 250)],
        annual: Some((48, 14.5, 15.0, 110.0, 105_000.0)),
        escort_width_one: 12.5,
        escort_width_two: 16.0,
        pole_car_height: Some(15.5),
        superload: (16.0, 16.0, 125.0, 150_000.0),
        ..BASE
    },
    Row {
        code: "MS",
        name: "Mississippi",
        oversize_fee: 15,
        overweight_fee: 15,
        per_mile_cents: Some(10),
        ton_mile_cents: Some(5),
        annual: Some((400, 12.0, 15.0, 99.0, 120_000.0)),
        escort_width_one: 12.0,
        escort_width_two: 16.0,
        superload: (16.0, 16.0, 120.0, 180_000.0),
        ..BASE
    },
    Row {
        code: "MO",
        name: "Missouri",
        legal_height_ft: 14.0,
        oversize_fee: 15,
        overweight_fee: 15,
        weight_brackets: &[(80_000.0, 15), (120_000.0, 60), (160_000.0, 150)],
        annual: Some((100, 14.0, 15.0, 100.0, 100_000.0)),
        escort_width_one: 14.0,
        escort_width_two: 16.0,
        superload: (16.0, 16.0, 150.0, 160_000.0),
        ..BASE
    },
    Row {
        code: "MT",
        name: "Montana",
        legal_height_ft: 14.0,
        oversize_fee: 10,
        overweight_fee: 20,
        ton_mile_cents: Some(2),
        annual: Some((70, 16.0, 16.0, 110.0, 120_000.0)),
        escort_width_one: 16.0,
        escort_width_two: 18.0,
        superload: (18.0, 17.0, 150.0, 210_000.0),
        weekend_travel: true,
        ..BASE
    },
    Row {
        code: "NE",
        name: "Nebraska",
        legal_height_ft: 14.5,
        oversize_fee: 15,
        overweight_fee: 15,
        ton_mile_cents: Some(3),
        annual: Some((100, 14.0, 15.0, 110.0, 110_000.0)),
        escort_width_one: 14.5,
        escort_width_two: 16.0,
        superload: (16.0, 17.0, 150.0, 160_000.0),
        ..BASE
    },
    Row {
        code: "NV",
        name: "Nevada",
        legal_height_ft: 14.0,
        legal_length_ft: 53.0,
        oversize_fee: 25,
        overweight_fee: 25,
        annual: Some((60, 14.0, 16.0, 105.0, 129_000.0)),
        escort_width_one: 12.0,
        escort_width_two: 17.0,
        pole_car_height: Some(16.0),
        superload: (17.0, 17.0, 130.0, 250_000.0),
        ..BASE
    },
    Row {
        code: "NH",
        name: "New Hampshire",
        oversize_fee: 30,
        overweight_fee: 30,
        per_mile_cents: Some(12),
        escort_width_one: 12.0,
        escort_width_two: 14.0,
        pole_car_height: Some(14.5),
        police_width: Some(14.0),
        superload: (14.0, 15.0, 115.0, 120_000.0),
        ..BASE
    },
    Row {
        code: "NJ",
        name: "New Jersey",
        oversize_fee: 25,
        overweight_fee: 50,
        per_mile_cents: Some(35),
        escort_width_one: 12.0,
        escort_width_two: 14.0,
        pole_car_height: Some(14.5),
        police_width: Some(14.0),
        superload: (14.0, 14.5, 100.0, 120_000.0),
        processing: "3 business days",
        ..BASE
    },
    Row {
        code: "NM",
        name: "New Mexico",
        legal_height_ft: 14.0,
        oversize_fee: 25,
        overweight_fee: 25,
        ton_mile_cents: Some(3),
        annual: Some((300, 14.0, 16.0, 120.0, 120_000.0)),
        escort_width_one: 14.0,
        escort_width_two: 18.0,
        superload: (20.0, 18.0, 120.0, 200_000.0),
        ..BASE
    },
    Row {
        code: "NY",
        name: "New York",
        oversize_fee: 40,
        overweight_fee: 80,
        per_mile_cents: Some(40),
        model: SurchargeModel::Tiered,
        width_brackets: &[(12.0, 25), (14.0, 50), (16.0, 100)],
        height_brackets: &[(14.0, 25), (15.0, 50)],
        escort_width_one: 12.0,
        escort_width_two: 14.0,
        pole_car_height: Some(14.0),
        police_width: Some(16.0),
        superload: (16.0, 16.0, 160.0, 200_000.0),
        processing: "2-5 business days",
        ..BASE
    },
    Row {
        code: "NC",
        name: "North Carolina",
        oversize_fee: 12,
        overweight_fee: 12,
        weight_brackets: &[(90_000.0, 12), (112_000.0, 50), (132_000.0, 100)],
        annual: Some((100, 12.0, 14.5, 100.0, 112_000.0)),
        escort_width_one: 12.0,
        escort_width_two: 15.0,
        pole_car_height: Some(14.5),
        police_width: Some(15.0),
        superload: (15.0, 15.0, 125.0, 132_000.0),
        ..BASE
    },
    Row {
        code: "ND",
        name: "North Dakota",
        legal_height_ft: 14.0,
        oversize_fee: 20,
        overweight_fee: 20,
        ton_mile_cents: Some(3),
        annual: Some((100, 14.5, 15.0, 110.0, 105_500.0)),
        escort_width_one: 14.5,
        escort_width_two: 18.0,
        superload: (18.0, 18.0, 120.0, 150_000.0),
        weekend_travel: true,
        ..BASE
    },
    Row {
        code: "OH",
        name: "Ohio",
        oversize_fee: 65,
        overweight_fee: 65,
        ton_mile_cents: Some(4),
        annual: Some((340, 14.0, 14.5, 90.0, 120_000.0)),
        escort_width_one: 13.0,
        escort_width_two: 16.0,
        pole_car_height: Some(14.5),
        police_width: Some(16.0),
        superload: (16.0, 15.0, 120.0, 120_000.0),
        ..BASE
    },
    Row {
        code: "OK",
        name: "Oklahoma",
        oversize_fee: 40,
        overweight_fee: 40,
        per_mile_cents: Some(5),
        ton_mile_cents: Some(4),
        width_brackets: &[(12.0, 10), (14.0, 20), (16.0, 40)],
        annual: Some((500, 12.0, 14.5, 100.0, 120_000.0)),
        escort_width_one: 12.0,
        escort_width_two: 16.0,
        pole_car_height: Some(15.0),
        superload: (16.0, 16.0, 125.0, 160_000.0),
        ..BASE
    },
    Row {
        code: "OR",
        name: "Oregon",
        legal_height_ft: 14.0,
        oversize_fee: 8,
        overweight_fee: 8,
        per_mile_cents: Some(20),
        annual: Some((20, 14.0, 14.5, 105.0, 105_500.0)),
        escort_width_one: 14.0,
        escort_width_two: 16.0,
        superload: (16.0, 17.0, 150.0, 200_000.0),
        ..BASE
    },
    Row {
        code: "PA",
        name: "Pennsylvania",
        oversize_fee: 25,
        overweight_fee: 25,
        ton_mile_cents: Some(3),
        escort_width_one: 13.0,
        escort_width_two: 16.0,
        pole_car_height: Some(14.5),
        police_width: Some(16.0),
        superload: (16.0, 15.0, 160.0, 201_000.0),
        ..BASE
    },
    Row {
        code: "RI",
        name: "Rhode Island",
        oversize_fee: 20,
        overweight_fee: 20,
        per_mile_cents: Some(15),
        escort_width_one: 12.0,
        escort_width_two: 14.0,
        pole_car_height: Some(14.0),
        police_width: Some(14.0),
        superload: (14.0, 14.5, 100.0, 120_000.0),
        ..BASE
    },
    Row {
        code: "SC",
        name: "South Carolina",
        oversize_fee: 30,
        overweight_fee: 30,
        annual: Some((100, 12.0, 14.5, 100.0, 110_000.0)),
        escort_width_one: 12.0,
        escort_width_two: 14.0,
        pole_car_height: Some(15.0),
        police_width: Some(16.0),
        superload: (16.0, 16.0, 125.0, 130_000.0),
        ..BASE
    },
    Row {
        code: "SD",
        name: "South Dakota",
        legal_height_ft: 14.0,
        oversize_fee: 20,
        overweight_fee: 20,
        ton_mile_cents: Some(3),
        annual: Some((250, 16.0, 15.0, 120.0, 120_000.0)),
        escort_width_one: 16.0,
        escort_width_two: 18.0,
        superload: (18.0, 18.0, 150.0, 200_000.0),
        weekend_travel: true,
        ..BASE
    },
    Row {
        code: "TN",
        name: "Tennessee",
        oversize_fee: 15,
        overweight_fee: 15,
        ton_mile_cents: Some(5),
        annual: Some((500, 12.0, 15.0, 100.0, 120_000.0)),
        escort_width_one: 12.0,
        escort_width_two: 14.0,
        pole_car_height: Some(15.0),
        superload: (16.0, 15.0, 125.0, 165_000.0),
        ..BASE
    },
    Row {
        code: "TX",
        name: "Texas",
        legal_height_ft: 14.0,
        oversize_fee: 60,
        overweight_fee: 75,
        model: SurchargeModel::Tiered,
        width_brackets: &[(14.0, 15), (16.0, 35)],
        height_brackets: &[(16.0, 15), (18.0, 40)],
        length_brackets: &[(110.0, 15), (125.0, 40)],
        weight_brackets: &[(120_000.0, 50), (160_000.0, 125), (200_000.0, 250)],
        annual: Some((2_000, 14.0, 14.0, 110.0, 120_000.0)),
        escort_width_one: 14.0,
        escort_width_two: 16.0,
        pole_car_height: Some(17.0),
        escort_length_one: Some(110.0),
        escort_length_two: Some(125.0),
        police_width: Some(20.0),
        weekend_travel: true,
        superload: (20.0, 18.0, 125.0, 254_300.0),
        processing: "Same day (TxPROS)",
        verified: (2026, 1, 20),
        ..BASE
    },
    Row {
        code: "UT",
        name: "Utah",
        legal_height_ft: 14.0,
        oversize_fee: 30,
        overweight_fee: 30,
        ton_mile_cents: Some(3),
        annual: Some((90, 14.0, 16.0, 105.0, 125_000.0)),
        escort_width_one: 14.0,
        escort_width_two: 17.0,
        superload: (17.0, 17.5, 120.0, 200_000.0),
        ..BASE
    },
    Row {
        code: "VT",
        name: "Vermont",
        oversize_fee: 20,
        overweight_fee: 20,
        per_mile_cents: Some(15),
        escort_width_one: 12.0,
        escort_width_two: 14.0,
        pole_car_height: Some(14.5),
        police_width: Some(15.0),
        superload: (15.0, 15.0, 100.0, 120_000.0),
        ..BASE
    },
    Row {
        code: "VA",
        name: "Virginia",
        oversize_fee: 20,
        overweight_fee: 20,
        per_mile_cents: Some(25),
        weight_brackets: &[(110_000.0, 40), (150_000.0, 100)],
        annual: Some((210, 12.0, 14.5, 100.0, 115_000.0)),
        escort_width_one: 12.0,
        escort_width_two: 14.0,
        pole_car_height: Some(15.0),
        police_width: Some(16.0),
        superload: (15.0, 15.0, 110.0, 150_000.0),
        ..BASE
    },
    Row {
        code: "WA",
        name: "Washington",
        legal_height_ft: 14.0,
        oversize_fee: 10,
        overweight_fee: 15,
        ton_mile_cents: Some(2),
        annual: Some((100, 14.0, 15.0, 125.0, 105_500.0)),
        escort_width_one: 14.0,
        escort_width_two: 16.0,
        superload: (16.0, 16.0, 125.0, 200_000.0),
        ..BASE
    },
    Row {
        code: "WV",
        name: "West Virginia",
        oversize_fee: 20,
        overweight_fee: 20,
        ton_mile_cents: Some(4),
        annual: Some((100, 12.0, 15.0, 95.0, 120_000.0)),
        escort_width_one: 12.0,
        escort_width_two: 14.5,
        pole_car_height: Some(15.0),
        superload: (16.0, 15.5, 120.0, 150_000.0),
        ..BASE
    },
    Row {
        code: "WI",
        name: "Wisconsin",
        oversize_fee: 20,
        overweight_fee: 20,
        weight_brackets: &[(90_000.0, 15), (120_000.0, 60), (150_000.0, 150)],
        annual: Some((90, 15.0, 14.5, 110.0, 110_000.0)),
        escort_width_one: 15.0,
        escort_width_two: 16.0,
        pole_car_height: Some(15.5),
        superload: (16.0, 15.5, 150.0, 170_000.0),
        ..BASE
    },
    Row {
        code: "WY",
        name: "Wyoming",
        legal_height_ft: 14.0,
        oversize_fee: 25,
        overweight_fee: 25,
        ton_mile_cents: Some(3),
        annual: Some((250, 17.0, 16.0, 110.0, 117_000.0)),
        escort_width_one: 14.0,
        escort_width_two: 18.0,
        superload: (18.0, 17.0, 150.0, 200_000.0),
        weekend_travel: true,
        ..BASE
    },
];

fn brackets(dimension: Dimension, list: &[(f64, i64)]) -> impl Iterator<Item = DimensionSurcharge> + '_ {
    list.iter().map(move |&(above_ft, dollars)| DimensionSurcharge {
        dimension,
        above_ft,
        fee: Cents::from_dollars(dollars),
    })
}

fn build(row: &Row) -> StatePermitData {
    let surcharges = brackets(Dimension::Width, row.width_brackets)
        .chain(brackets(Dimension::Height, row.height_brackets))
        .chain(brackets(Dimension::Length, row.length_brackets))
        .collect();
    let (y, m, d) = row.verified;
    StatePermitData {
        code: row.code.to_string(),
        name: row.name.to_string(),
        legal_limits: LegalLimits {
            max_width_ft: LEGAL_WIDTH_FT,
            max_height_ft: row.legal_height_ft,
            max_length_ft: row.legal_length_ft,
            weight: WeightLimits {
                gross_lbs: LEGAL_GROSS_LBS,
                single_axle_lbs: 20_000.0,
                tandem_axle_lbs: 34_000.0,
            },
        },
        oversize: OversizeSchedule {
            base_fee: Cents::from_dollars(row.oversize_fee),
            surcharge_model: row.model,
            surcharges,
            annual: row.annual.map(|(fee, w, h, l, wt)| AnnualPermit {
                fee: Cents::from_dollars(fee),
                max_width_ft: w,
                max_height_ft: h,
                max_length_ft: l,
                max_weight_lbs: wt,
            }),
            processing_time: row.processing.to_string(),
        },
        overweight: OverweightSchedule {
            base_fee: Cents::from_dollars(row.overweight_fee),
            per_mile: row.per_mile_cents.map(Cents),
            ton_mile: row.ton_mile_cents.map(Cents),
            weight_brackets: row
                .weight_brackets
                .iter()
                .map(|&(above_lbs, dollars)| WeightBracket {
                    above_lbs,
                    fee: Cents::from_dollars(dollars),
                })
                .collect(),
        },
        escorts: EscortRules {
            width_one_ft: row.escort_width_one,
            width_two_ft: Some(row.escort_width_two),
            height_pole_car_ft: row.pole_car_height,
            length_one_ft: row.escort_length_one,
            length_two_ft: row.escort_length_two,
            police_width_ft: row.police_width,
            police_height_ft: None,
            police_length_ft: None,
        },
        travel: TravelRestrictions {
            daylight_only: row.daylight_only,
            weekend_travel: row.weekend_travel,
            holiday_travel: false,
            curfews: Vec::new(),
        },
        superload: SuperloadThresholds {
            width_ft: row.superload.0,
            height_ft: row.superload.1,
            length_ft: row.superload.2,
            weight_lbs: row.superload.3,
        },
        bridge_analysis: None,
        special_jurisdictions: Vec::new(),
        restricted_routes: Vec::new(),
        kpra_limit_ft: None,
        last_verified: NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN),
    }
}

fn bridge_rule(weight_lbs: f64, width_ft: Option<f64>, min: i64, max: i64, time: &str) -> BridgeAnalysisRule {
    BridgeAnalysisRule {
        weight_threshold_lbs: weight_lbs,
        width_threshold_ft: width_ft,
        cost_min: Cents::from_dollars(min),
        cost_max: Cents::from_dollars(max),
        processing_time: time.to_string(),
    }
}

fn city(name: &str, bounds: (f64, f64, f64, f64), dollars: i64, notes: &str) -> SpecialJurisdiction {
    SpecialJurisdiction {
        name: name.to_string(),
        bounds: GeoBounds {
            min_lat: bounds.0,
            max_lat: bounds.1,
            min_lng: bounds.2,
            max_lng: bounds.3,
        },
        permit_fee: Cents::from_dollars(dollars),
        notes: notes.to_string(),
    }
}

fn restricted(highway: &str, width: Option<f64>, height: Option<f64>, permit_available: bool, notes: &str) -> RestrictedRoute {
    RestrictedRoute {
        highway: highway.to_string(),
        max_width_ft: width,
        max_height_ft: height,
        max_length_ft: None,
        max_weight_lbs: None,
        permit_available,
        notes: notes.to_string(),
    }
}

fn extras(state: &mut StatePermitData) {
    match state.code.as_str() {
        "CA" => {
            state.kpra_limit_ft = Some(40.0);
            state.bridge_analysis = Some(bridge_rule(150_000.0, Some(16.0), 3_000, 20_000, "6-10 weeks"));
            state.travel.curfews.push(
                "Los Angeles and Bay Area metro: no movement 6-9 AM and 3-7 PM weekdays".to_string(),
            );
            state.restricted_routes.push(restricted(
                "US-101 (Big Sur)",
                Some(10.0),
                None,
                false,
                "Narrow coastal highway",
            ));
        }
        "OR" | "WA" => state.kpra_limit_ft = Some(43.0),
        "TX" => {
            state.bridge_analysis = Some(bridge_rule(200_000.0, Some(20.0), 2_000, 12_000, "3-6 weeks"));
            state.travel.curfews.push(
                "Houston, Dallas, Fort Worth, San Antonio, Austin: no movement 7-9 AM and 4-7 PM weekdays"
                    .to_string(),
            );
        }
        "NY" => {
            state.special_jurisdictions.push(city(
                "New York City",
                (40.49, 40.92, -74.26, -73.70),
                195,
                "NYC DOT oversize permit required in addition to the state permit",
            ));
            state.restricted_routes.push(restricted(
                "Parkways (all)",
                None,
                Some(12.0),
                false,
                "Commercial vehicles prohibited; many bridges below 11 ft",
            ));
            state.bridge_analysis = Some(bridge_rule(160_000.0, None, 5_000, 25_000, "8-12 weeks"));
        }
        "IL" => {
            state.special_jurisdictions.push(city(
                "City of Chicago",
                (41.64, 42.03, -87.95, -87.52),
                60,
                "Chicago DOT oversize permit on city streets",
            ));
            state.bridge_analysis = Some(bridge_rule(120_000.0, None, 1_500, 8_000, "4-6 weeks"));
        }
        "PA" => {
            state.bridge_analysis = Some(bridge_rule(201_000.0, Some(16.0), 2_500, 15_000, "4-8 weeks"));
            state.restricted_routes.push(restricted(
                "PA Turnpike",
                Some(13.0),
                Some(14.5),
                true,
                "Turnpike Commission permit required above posted limits",
            ));
        }
        "MA" => {
            state.special_jurisdictions.push(city(
                "City of Boston",
                (42.23, 42.40, -71.19, -70.99),
                100,
                "Boston Transportation Department street occupancy permit",
            ));
            state.restricted_routes.push(restricted(
                "Storrow Drive",
                None,
                Some(10.0),
                false,
                "Commercial vehicles prohibited on the parkway",
            ));
        }
        "DC" => {
            state.travel.curfews.push("No movement 7-9:30 AM and 4-6:30 PM weekdays".to_string());
        }
        "FL" => {
            state.bridge_analysis = Some(bridge_rule(199_000.0, None, 2_000, 10_000, "3-5 weeks"));
        }
        "LA" => {
            state.bridge_analysis = Some(bridge_rule(232_000.0, None, 2_500, 12_000, "4-6 weeks"));
        }
        "NJ" => {
            state.restricted_routes.push(restricted(
                "Garden State Parkway",
                None,
                None,
                false,
                "Trucks over 10,000 lbs prohibited north of exit 105",
            ));
        }
        "CO" => {
            state.restricted_routes.push(restricted(
                "I-70 Eisenhower Tunnel",
                None,
                Some(13.9),
                false,
                "Over-height loads must use Loveland Pass (US-6)",
            ));
        }
        _ => {}
    }
}

/// Permit data keyed by upper-case code
pub static STATE_PERMITS: LazyLock<HashMap<&'static str, StatePermitData>> = LazyLock::new(|| {
    ROWS.iter()
        .map(|row| {
            let mut state = build(row);
            extras(&mut state);
            (row.code, state)
        })
        .collect()
});

/// Permit data for a two-letter code (case-insensitive)
pub fn get_state_by_code(code: &str) -> Option<&'static StatePermitData> {
    STATE_PERMITS.get(code.trim().to_ascii_uppercase().as_str())
}

/// Every supported code, sorted
pub fn all_state_codes() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = ROWS.iter().map(|r| r.code).collect();
    codes.sort_unstable();
    codes
}
