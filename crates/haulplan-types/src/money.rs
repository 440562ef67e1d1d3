//! Integer-cent money

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

/// Money in whole US cents.
///
/// Fee arithmetic stays in integers; `scale` is the only place a fractional
/// factor is applied, and it rounds once to the nearest cent.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub const fn from_dollars(dollars: i64) -> Self {
        Cents(dollars * 100)
    }

    /// Multiply by a fractional quantity (miles, ton-miles, days) and round to the cent
    pub fn scale(self, factor: f64) -> Self {
        if !factor.is_finite() {
            return Cents::ZERO;
        }
        Cents((self.0 as f64 * factor).round() as i64)
    }

    /// Value in dollars, for display only
    pub fn dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0 + rhs.0)
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Cents) {
        self.0 += rhs.0;
    }
}

impl Sub for Cents {
    type Output = Cents;

    fn sub(self, rhs: Cents) -> Cents {
        Cents(self.0 - rhs.0)
    }
}

impl Mul<u32> for Cents {
    type Output = Cents;

    fn mul(self, rhs: u32) -> Cents {
        Cents(self.0 * i64::from(rhs))
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
        iter.fold(Cents::ZERO, |acc, c| acc + c)
    }
}

impl<'a> Sum<&'a Cents> for Cents {
    fn sum<I: Iterator<Item = &'a Cents>>(iter: I) -> Cents {
        iter.fold(Cents::ZERO, |acc, c| acc + *c)
    }
}

impl std::fmt::Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let dollars = (abs / 100).to_string();
        let cents = abs % 100;

        let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
        for (i, ch) in dollars.chars().enumerate() {
            if i > 0 && (dollars.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "{}${}.{:02}", sign, grouped, cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Cents(123_456_78).to_string(), "$123,456.78");
        assert_eq!(Cents(5).to_string(), "$0.05");
        assert_eq!(Cents(-150_00).to_string(), "-$150.00");
        assert_eq!(Cents::from_dollars(1_000).to_string(), "$1,000.00");
    }

    #[test]
    fn test_scale_rounds_once() {
        // 4 cents per ton-mile x 20 tons x 127.5 miles = 10,200 cents
        assert_eq!(Cents(4).scale(20.0 * 127.5), Cents(10_200));
        assert_eq!(Cents(3).scale(0.5), Cents(2));
        assert_eq!(Cents(100).scale(f64::NAN), Cents::ZERO);
    }

    #[test]
    fn test_repeated_addition_has_no_drift() {
        let total: Cents = std::iter::repeat(Cents(10)).take(1_000).sum();
        assert_eq!(total, Cents(10_000));
    }
}
