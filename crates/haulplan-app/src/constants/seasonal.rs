//! Frost-law and spring thaw restrictions
//!
//! Windows are the typical posting periods. Agencies move the actual dates
//! with the thaw each year, so results carry a warning rather than a guarantee.

use std::sync::LazyLock;

use haulplan_domain::model::{MonthDay, SeasonalRestriction, WeightReduction};

fn restriction(
    state: &str,
    name: &str,
    start: (u32, u32),
    end: (u32, u32),
    reduction: WeightReduction,
    applies_to: &str,
    notes: &str,
) -> SeasonalRestriction {
    SeasonalRestriction {
        state: state.to_string(),
        name: name.to_string(),
        start: MonthDay::new(start.0, start.1),
        end: MonthDay::new(end.0, end.1),
        reduction,
        applies_to: applies_to.to_string(),
        notes: notes.to_string(),
    }
}

pub static SEASONAL_RESTRICTIONS: LazyLock<Vec<SeasonalRestriction>> = LazyLock::new(|| {
    use WeightReduction::{CapLbs, Percent};
    vec![
        restriction(
            "MN",
            "Spring load restrictions",
            (3, 1),
            (5, 15),
            Percent(10.0),
            "Trunk highways not designated 10-ton",
            "Start dates are set per frost zone by MnDOT",
        ),
        restriction(
            "WI",
            "Frost law",
            (3, 1),
            (5, 15),
            Percent(20.0),
            "Posted state and county highways",
            "",
        ),
        restriction(
            "MI",
            "Seasonal weight restrictions",
            (3, 1),
            (5, 31),
            Percent(25.0),
            "Rigid pavements; flexible pavements reduced 35%",
            "All-season routes are exempt",
        ),
        restriction(
            "ND",
            "Spring load restrictions",
            (3, 10),
            (5, 15),
            CapLbs(64_000.0),
            "Highways posted for 6-ton or 7-ton axle limits",
            "",
        ),
        restriction(
            "SD",
            "Spring load limits",
            (3, 1),
            (4, 30),
            Percent(15.0),
            "State highways posted by SDDOT",
            "",
        ),
        restriction(
            "IA",
            "Embargoed roads",
            (3, 15),
            (4, 30),
            CapLbs(70_000.0),
            "Embargoed secondary roads",
            "County engineers post embargoes individually",
        ),
        restriction(
            "ME",
            "Posted roads (mud season)",
            (3, 1),
            (5, 15),
            CapLbs(23_000.0),
            "Posted state and town ways",
            "",
        ),
        restriction(
            "VT",
            "Mud season postings",
            (3, 1),
            (5, 15),
            CapLbs(24_000.0),
            "Posted town highways",
            "",
        ),
        restriction(
            "NH",
            "Frost heave postings",
            (3, 1),
            (5, 1),
            CapLbs(60_000.0),
            "Posted state highways",
            "",
        ),
        restriction(
            "PA",
            "Posted and bonded roads",
            (2, 15),
            (5, 1),
            Percent(10.0),
            "Roads posted under 67 Pa. Code 189",
            "",
        ),
        restriction(
            "MT",
            "Spring load restrictions",
            (3, 1),
            (5, 1),
            Percent(25.0),
            "Posted secondary highways",
            "",
        ),
        restriction(
            "AK",
            "Seasonal weight restrictions",
            (3, 15),
            (5, 31),
            Percent(25.0),
            "Interior and northern highways",
            "Actual dates set by DOT&PF region",
        ),
        restriction(
            "ND",
            "Winter frozen-road limit",
            (12, 1),
            (1, 31),
            CapLbs(80_000.0),
            "Gravel township roads",
            "Window spans the new year",
        ),
    ]
});

/// Restrictions listed for one state
pub fn restrictions_for(state: &str) -> Vec<&'static SeasonalRestriction> {
    SEASONAL_RESTRICTIONS
        .iter()
        .filter(|r| r.state.eq_ignore_ascii_case(state))
        .collect()
}
