//! Field validators shared by every program.
//!
//! Each validator returns the cleaned value or an [`Error::Validation`]
//! naming the offending field, so menus can print the message and move on.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};

use crate::error::{Error, Result};

/// Date format used for every stored date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format used for trip times and clinic slots.
pub const TIME_FORMAT: &str = "%H:%M";

/// Trims `value` and rejects it when empty.
///
/// # Errors
///
/// Returns a validation error for blank input.
///
/// # Examples
///
/// ```
/// use frontdesk::validate::required;
///
/// assert_eq!(required("name", "  Ana ").unwrap(), "Ana");
/// assert!(required("name", "   ").is_err());
/// ```
pub fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Checks `lo <= value <= hi`.
///
/// # Errors
///
/// Returns a validation error when the value is out of range.
pub fn in_range<T>(field: &str, value: T, lo: T, hi: T) -> Result<T>
where
    T: PartialOrd + Display + Copy,
{
    if value < lo || value > hi {
        return Err(Error::validation(
            field,
            format!("must be between {lo} and {hi}, got {value}"),
        ));
    }
    Ok(value)
}

/// Checks `value > 0`.
///
/// # Errors
///
/// Returns a validation error for zero or negative values.
pub fn positive<T>(field: &str, value: T) -> Result<T>
where
    T: PartialOrd + Display + Copy + Default,
{
    if value <= T::default() {
        return Err(Error::validation(
            field,
            format!("must be greater than 0, got {value}"),
        ));
    }
    Ok(value)
}

/// Checks `value >= 0`.
///
/// # Errors
///
/// Returns a validation error for negative values.
pub fn non_negative<T>(field: &str, value: T) -> Result<T>
where
    T: PartialOrd + Display + Copy + Default,
{
    if value < T::default() {
        return Err(Error::validation(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(value)
}

/// Accepts a non-empty string of ASCII digits (contact numbers).
///
/// # Errors
///
/// Returns a validation error for blank input or any non-digit.
pub fn digits_only(field: &str, value: &str) -> Result<String> {
    let value = required(field, value)?;
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::validation(field, "must contain digits only"));
    }
    Ok(value)
}

/// Parses a number from console input.
///
/// # Errors
///
/// Returns a validation error when the text is not a valid `T`.
pub fn parse_number<T: FromStr>(field: &str, value: &str) -> Result<T> {
    let value = value.trim();
    value
        .parse()
        .map_err(|_| Error::validation(field, format!("'{value}' is not a valid number")))
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns a validation error for any other format or an impossible date.
///
/// # Examples
///
/// ```
/// use frontdesk::validate::parse_date;
///
/// assert!(parse_date("date", "2025-02-28").is_ok());
/// assert!(parse_date("date", "2025-02-30").is_err());
/// assert!(parse_date("date", "28/02/2025").is_err());
/// ```
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| Error::validation(field, format!("'{value}' is not a YYYY-MM-DD date")))
}

/// Parses an `HH:MM` 24-hour time.
///
/// # Errors
///
/// Returns a validation error for any other format.
pub fn parse_time(field: &str, value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| Error::validation(field, format!("'{value}' is not an HH:MM time")))
}

/// Matches `value` against `allowed` ignoring case and returns the
/// canonical spelling.
///
/// # Errors
///
/// Returns a validation error listing the allowed values.
///
/// # Examples
///
/// ```
/// use frontdesk::validate::one_of;
///
/// assert_eq!(one_of("payment", "paid", &["Paid", "Unpaid"]).unwrap(), "Paid");
/// assert!(one_of("payment", "maybe", &["Paid", "Unpaid"]).is_err());
/// ```
pub fn one_of<'a>(field: &str, value: &str, allowed: &[&'a str]) -> Result<&'a str> {
    let value = value.trim();
    allowed
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(value))
        .copied()
        .ok_or_else(|| Error::validation(field, format!("must be one of {}", allowed.join("/"))))
}
