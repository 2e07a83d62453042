//! Exact currency amounts
//!
//! Prices and totals are decimal values with two fractional digits. They
//! are never represented as binary floating point, so repeated increments
//! cannot drift and two totals over equal carts compare equal.

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

const SCALE: u32 = 2;

/// Largest accepted price, in cents
///
/// A line is at most `u32::MAX` cups at this price, so neither `times` nor
/// summing every line of a cart can leave `Decimal` range.
const MAX_CENTS: i64 = 100_000_000;

/// Non-negative currency amount in dollars
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Build an amount from a number of cents
    pub fn from_cents(cents: u32) -> Self {
        Self::normalized(Decimal::from_i128_with_scale(i128::from(cents), SCALE))
    }

    /// Parse `"10.00"`, `"$10.00"` or `"4"`
    ///
    /// Negative values, more than two fractional digits and anything above
    /// $1,000,000.00 are rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let value = Decimal::from_str(digits)
            .map_err(|e| Error::InvalidAmount(format!("{}: {}", text, e)))?;

        if value.is_sign_negative() && !value.is_zero() {
            return Err(Error::InvalidAmount(format!("{} is negative", text)));
        }
        if value.scale() > SCALE {
            return Err(Error::InvalidAmount(format!(
                "{} has more than {} decimal places",
                text, SCALE
            )));
        }

        if value > Self::max_value() {
            return Err(Error::InvalidAmount(format!(
                "{} is above the {} limit",
                text,
                Self(Self::max_value())
            )));
        }

        Ok(Self::normalized(value))
    }

    /// Price of `quantity` units at this amount each
    pub fn times(self, quantity: u32) -> Self {
        Self::normalized(self.0 * Decimal::from(quantity))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// The bare number with exactly two decimals, e.g. `10.00`
    pub fn to_plain_string(&self) -> String {
        format!("{:.2}", self.0)
    }

    fn max_value() -> Decimal {
        Decimal::new(MAX_CENTS, SCALE)
    }

    fn normalized(mut value: Decimal) -> Self {
        value.rescale(SCALE);
        Self(value)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Self::normalized(self.0 + rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.to_plain_string())
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Amount {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_plain_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let amount = Amount::parse("$10.00").unwrap();
        assert_eq!(amount.to_string(), "$10.00");
        assert_eq!(Amount::parse("4").unwrap().to_string(), "$4.00");
        assert_eq!(Amount::from_cents(1999).to_string(), "$19.99");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Amount::parse("-1.00").is_err());
        assert!(Amount::parse("1.005").is_err());
        assert!(Amount::parse("ten").is_err());
    }

    #[test]
    fn test_parse_caps_large_prices() {
        assert_eq!(Amount::parse("1000000").unwrap().to_string(), "$1000000.00");

        for text in ["1000000.01", "79228162514264337593543950335"] {
            let err = Amount::parse(text).unwrap_err();
            assert_eq!(err.code(), "invalid_amount", "{}", text);
        }
    }

    #[test]
    fn test_largest_cart_stays_in_range() {
        let line = Amount::parse("1000000").unwrap().times(u32::MAX);
        let total: Amount = std::iter::repeat(line).take(1000).sum();
        assert_eq!(total.to_plain_string(), "4294967295000000000.00");
    }

    #[test]
    fn test_repeated_addition_does_not_drift() {
        let dime = Amount::parse("0.10").unwrap();
        let total: Amount = std::iter::repeat(dime).take(1000).sum();
        assert_eq!(total, Amount::parse("100.00").unwrap());
        assert_eq!(total.to_plain_string(), "100.00");
    }

    #[test]
    fn test_times_and_equality_ignore_input_scale() {
        let a = Amount::parse("7").unwrap().times(3);
        let b = Amount::parse("21.00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_plain_string(), b.to_plain_string());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let amount = Amount::parse("8").unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"8.00\"");
        let back: Amount = serde_json::from_str("\"8.00\"").unwrap();
        assert_eq!(back, amount);
    }
}
