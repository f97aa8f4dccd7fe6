//! Fixed-point money stored as integer cents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// An amount of money in cents.
///
/// Parsed from `"12"`, `"12.5"` or `"12.50"` and always displayed with two
/// decimals.
///
/// # Examples
///
/// ```
/// use frontdesk::Money;
///
/// let price: Money = "1299.5".parse().unwrap();
/// assert_eq!(price.cents(), 129_950);
/// assert_eq!(price.to_string(), "1299.50");
/// assert_eq!(price.percent_of(10).to_string(), "129.95");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates an amount from whole units.
    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// The amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// True for amounts below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns the negated amount.
    #[must_use]
    pub const fn negate(self) -> Self {
        Self(-self.0)
    }

    /// Addition that reports overflow as a limit error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LimitExceeded`] on overflow.
    pub fn checked_add(self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| overflow("addition"))
    }

    /// Subtraction that reports overflow as a limit error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LimitExceeded`] on overflow.
    pub fn checked_sub(self, other: Self) -> Result<Self> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or_else(|| overflow("subtraction"))
    }

    /// Multiplication by a whole count (days, quantity).
    ///
    /// # Errors
    ///
    /// Returns [`Error::LimitExceeded`] on overflow.
    pub fn checked_times(self, count: i64) -> Result<Self> {
        self.0
            .checked_mul(count)
            .map(Self)
            .ok_or_else(|| overflow("multiplication"))
    }

    /// `percent`% of this amount, rounded half away from zero to the cent.
    ///
    /// Values above 100 scale up, so `percent_of(120)` is a 1.2 multiplier.
    #[must_use]
    pub fn percent_of(self, percent: u32) -> Self {
        let product = i128::from(self.0) * i128::from(percent);
        let rounded = if product >= 0 {
            (product + 50) / 100
        } else {
            (product - 50) / 100
        };
        Self(i64::try_from(rounded).unwrap_or(if rounded > 0 { i64::MAX } else { i64::MIN }))
    }

    /// Parses a decimal amount, naming `field` in the validation error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for anything that is not a number with
    /// at most two decimals.
    pub fn parse_field(field: &str, input: &str) -> Result<Self> {
        parse_cents(input.trim())
            .map(Self)
            .ok_or_else(|| Error::validation(field, format!("'{}' is not a valid amount", input.trim())))
    }
}

fn overflow(op: &str) -> Error {
    Error::LimitExceeded {
        details: format!("amount overflow in {op}"),
    }
}

fn parse_cents(input: &str) -> Option<i64> {
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    if fraction.len() > 2 || (digits.contains('.') && fraction.is_empty()) {
        return None;
    }

    let units: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut frac: i64 = if fraction.is_empty() { 0 } else { fraction.parse().ok()? };
    if fraction.len() == 1 {
        frac *= 10;
    }

    let cents = units.checked_mul(100)?.checked_add(frac)?;
    Some(if negative { -cents } else { cents })
}

impl FromStr for Money {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_field("amount", s)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMoney {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = match RawMoney::deserialize(deserializer)? {
            RawMoney::Integer(units) => {
                return units
                    .checked_mul(100)
                    .map(Self)
                    .ok_or_else(|| serde::de::Error::custom("amount out of range"));
            }
            RawMoney::Float(value) => format!("{value:.2}"),
            RawMoney::Text(text) => text,
        };
        parse_cents(text.trim())
            .map(Self)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount '{text}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_zero_one_or_two_decimals() {
        assert_eq!("12".parse::<Money>().unwrap().cents(), 1200);
        assert_eq!("12.5".parse::<Money>().unwrap().cents(), 1250);
        assert_eq!("12.50".parse::<Money>().unwrap().cents(), 1250);
        assert_eq!(".75".parse::<Money>().unwrap().cents(), 75);
        assert_eq!("-3.05".parse::<Money>().unwrap().cents(), -305);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "abc", "1.234", "12.", "1,000", "--1", "1.2.3", "."] {
            assert!(bad.parse::<Money>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_field_names_field() {
        let err = Money::parse_field("fare", "x").unwrap_err();
        assert!(err.to_string().contains("fare"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(123_456).to_string(), "1234.56");
        assert_eq!(Money::from_cents(-150).to_string(), "-1.50");
    }

    #[test]
    fn test_percent_of_rounds_to_cent() {
        assert_eq!(Money::from_cents(999).percent_of(10).cents(), 100);
        assert_eq!(Money::from_units(100).percent_of(120).cents(), 12_000);
        assert_eq!(Money::from_cents(-999).percent_of(10).cents(), -100);
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_units(10);
        let b = Money::from_cents(250);
        assert_eq!(a.checked_add(b).unwrap().cents(), 1250);
        assert_eq!(b.checked_sub(a).unwrap().cents(), -750);
        assert_eq!(b.checked_times(3).unwrap().cents(), 750);
        assert!(Money::from_cents(i64::MAX).checked_add(b).is_err());
    }

    #[test]
    fn test_serde_round_trip_through_yaml() {
        let from_float: Money = serde_yaml::from_str("500.00").unwrap();
        assert_eq!(from_float.cents(), 50_000);
        let from_int: Money = serde_yaml::from_str("1000").unwrap();
        assert_eq!(from_int.cents(), 100_000);
        let from_text: Money = serde_yaml::from_str("'12.5'").unwrap();
        assert_eq!(from_text.cents(), 1250);
        assert_eq!(serde_json::to_string(&from_text).unwrap(), "\"12.50\"");
    }
}
