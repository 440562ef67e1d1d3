//! US on-highway diesel average, first Monday of each month, cents per gallon

use std::sync::LazyLock;

use chrono::NaiveDate;

use haulplan_domain::service::fuel::{DieselPriceIndex, DieselPricePoint};
use haulplan_types::Cents;

const POINTS: &[((i32, u32, u32), i64)] = &[
    ((2025, 1, 6), 361),
    ((2025, 2, 3), 367),
    ((2025, 3, 3), 368),
    ((2025, 4, 7), 363),
    ((2025, 5, 5), 352),
    ((2025, 6, 2), 349),
    ((2025, 7, 7), 367),
    ((2025, 8, 4), 374),
    ((2025, 9, 1), 370),
    ((2025, 10, 6), 371),
    ((2025, 11, 3), 375),
    ((2025, 12, 1), 379),
    ((2026, 1, 5), 377),
    ((2026, 2, 2), 381),
    ((2026, 3, 2), 389),
    ((2026, 4, 6), 402),
    ((2026, 5, 4), 398),
    ((2026, 6, 1), 392),
    ((2026, 7, 6), 395),
    ((2026, 8, 3), 404),
    ((2026, 9, 7), 411),
    ((2026, 10, 5), 408),
];

pub static DIESEL_PRICE_INDEX: LazyLock<DieselPriceIndex> = LazyLock::new(|| {
    DieselPriceIndex::new(
        POINTS
            .iter()
            .filter_map(|&((y, m, d), cents)| {
                NaiveDate::from_ymd_opt(y, m, d).map(|date| DieselPricePoint {
                    date,
                    price: Cents(cents),
                })
            })
            .collect(),
    )
});
