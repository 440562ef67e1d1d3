//! Date-indexed diesel pricing and the fuel surcharge curve

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use haulplan_types::Cents;

/// Days past the newest index point before a price is reported as stale
pub const STALE_PRICE_DAYS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieselPricePoint {
    pub date: NaiveDate,
    /// Per gallon
    pub price: Cents,
}

/// Price in effect on a date, and which index point it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieselQuote {
    pub price: Cents,
    pub effective_date: NaiveDate,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DieselPriceIndex {
    points: Vec<DieselPricePoint>,
}

impl DieselPriceIndex {
    pub fn new(mut points: Vec<DieselPricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    pub fn points(&self) -> &[DieselPricePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Latest point on or before `date`
    pub fn price_on(&self, date: NaiveDate) -> Option<DieselQuote> {
        let first = self.points.first()?;
        let idx = self.points.partition_point(|p| p.date <= date);
        if idx == 0 {
            return Some(DieselQuote {
                price: first.price,
                effective_date: first.date,
                warning: Some(format!(
                    "No diesel price before {}; using the earliest index price from {}",
                    date, first.date
                )),
            });
        }
        let point = self.points[idx - 1];
        let age = (date - point.date).num_days();
        let warning = (idx == self.points.len() && age > STALE_PRICE_DAYS).then(|| {
            format!(
                "Diesel price from {} is {} days old; fuel cost may be inaccurate",
                point.date, age
            )
        });
        Some(DieselQuote {
            price: point.price,
            effective_date: point.date,
            warning,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurchargeBracket {
    /// Diesel price at or above which this bracket applies
    pub min_price: Cents,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelSurchargeCurve {
    pub brackets: Vec<SurchargeBracket>,
}

impl Default for FuelSurchargeCurve {
    fn default() -> Self {
        let bracket = |cents, percent| SurchargeBracket {
            min_price: Cents(cents),
            percent,
        };
        Self {
            brackets: vec![
                bracket(350, 0.0),
                bracket(400, 3.0),
                bracket(450, 6.0),
                bracket(500, 10.0),
            ],
        }
    }
}

impl FuelSurchargeCurve {
    /// Percent of the highest bracket the price meets, 0 below every bracket
    pub fn percent_for(&self, price: Cents) -> f64 {
        self.brackets
            .iter()
            .filter(|b| price >= b.min_price)
            .max_by_key(|b| b.min_price)
            .map_or(0.0, |b| b.percent)
    }

    /// Per-gallon price including the surcharge
    pub fn adjusted_price(&self, price: Cents) -> Cents {
        price.scale(1.0 + self.percent_for(price) / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn index() -> DieselPriceIndex {
        DieselPriceIndex::new(vec![
            DieselPricePoint { date: date(2026, 3, 2), price: Cents(389) },
            DieselPricePoint { date: date(2026, 1, 5), price: Cents(362) },
            DieselPricePoint { date: date(2026, 2, 2), price: Cents(375) },
        ])
    }

    #[test]
    fn test_latest_point_on_or_before() {
        let quote = index().price_on(date(2026, 2, 20)).unwrap();
        assert_eq!(quote.price, Cents(375));
        assert_eq!(quote.effective_date, date(2026, 2, 2));
        assert!(quote.warning.is_none());

        let exact = index().price_on(date(2026, 3, 2)).unwrap();
        assert_eq!(exact.price, Cents(389));
    }

    #[test]
    fn test_before_first_point_warns() {
        let quote = index().price_on(date(2025, 12, 1)).unwrap();
        assert_eq!(quote.price, Cents(362));
        assert!(quote.warning.unwrap().contains("earliest"));
    }

    #[test]
    fn test_stale_price_warns() {
        assert!(index().price_on(date(2026, 4, 30)).unwrap().warning.is_none());
        let quote = index().price_on(date(2026, 5, 10)).unwrap();
        assert!(quote.warning.unwrap().contains("days old"));
    }

    #[test]
    fn test_empty_index() {
        assert!(DieselPriceIndex::default().price_on(date(2026, 1, 1)).is_none());
    }

    #[test]
    fn test_surcharge_highest_bracket_met() {
        let curve = FuelSurchargeCurve::default();
        assert_eq!(curve.percent_for(Cents(300)), 0.0);
        assert_eq!(curve.percent_for(Cents(420)), 3.0);
        assert_eq!(curve.percent_for(Cents(500)), 10.0);
        assert_eq!(curve.adjusted_price(Cents(450)), Cents(477));
    }
}
