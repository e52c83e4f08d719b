//! Type-safe price representation using decimal arithmetic.
//!
//! Prices travel through persisted cart blobs as plain JSON numbers, so
//! [`Price`] serializes via `rust_decimal::serde::float` rather than the
//! string form used for API payloads.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Quantity;

/// A unit price in the store's currency.
///
/// No validation is performed: zero and negative amounts are accepted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self(self.0 * Decimal::from(quantity.get()))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }
}

impl std::str::FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim_start_matches('$').parse::<Decimal>().map(Self)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<Quantity> for Price {
    type Output = Self;

    fn mul(self, rhs: Quantity) -> Self {
        self.times(rhs)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_cents(1999).to_string(), "$19.99");
        assert_eq!(Price::from(10).to_string(), "$10.00");
    }

    #[test]
    fn test_price_parse() {
        assert_eq!("19.99".parse::<Price>().ok(), Some(Price::from_cents(1999)));
        assert_eq!("$5".parse::<Price>().ok(), Some(Price::from(5)));
        assert!("ten".parse::<Price>().is_err());
    }

    #[test]
    fn test_price_serializes_as_number() {
        let json = serde_json::to_value(Price::from(10)).ok();
        assert!(json.as_ref().is_some_and(serde_json::Value::is_number));

        let parsed: Option<Price> = serde_json::from_str("10").ok();
        assert_eq!(parsed, Some(Price::from(10)));

        let parsed: Option<Price> = serde_json::from_str("-2.5").ok();
        assert_eq!(parsed, Some(Price::from_cents(-250)));
    }

    #[test]
    fn test_price_times_quantity() {
        let three = Quantity::new(3).unwrap_or(Quantity::ONE);
        assert_eq!(Price::from_cents(250) * three, Price::from_cents(750));
    }

    #[test]
    fn test_price_sum() {
        let total: Price = [Price::from(1), Price::from_cents(50), Price::from(2)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(350));
    }
}
