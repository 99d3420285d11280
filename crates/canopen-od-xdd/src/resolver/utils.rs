// crates/canopen-od-xdd/src/resolver/utils.rs

//! Attribute helpers that turn absent or malformed values into located errors.

use crate::error::XddError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// `xsd:date`, ignoring any timezone suffix.
const DATE_FORMAT: &str = "%Y-%m-%d";
/// `xsd:time`, ignoring fractional seconds and any timezone suffix.
const TIME_FORMAT: &str = "%H:%M:%S";

pub(super) fn required<'a>(
    value: Option<&'a str>,
    location: &str,
    missing: &'static str,
) -> Result<&'a str, XddError> {
    value.ok_or_else(|| XddError::Schema {
        location: location.to_string(),
        missing,
    })
}

/// Parses an optional attribute. Absent yields `Ok(None)`.
pub(super) fn typed<T>(
    value: Option<&str>,
    location: &str,
    attribute: &'static str,
    expected: &'static str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<Option<T>, XddError> {
    match value {
        None => Ok(None),
        Some(text) => parse(text).map(Some).ok_or_else(|| XddError::Type {
            location: location.to_string(),
            attribute,
            value: text.to_string(),
            expected,
        }),
    }
}

/// Parses a required attribute.
pub(super) fn typed_required<T>(
    value: Option<&str>,
    location: &str,
    attribute: &'static str,
    expected: &'static str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, XddError> {
    let text = required(value, location, attribute)?;
    parse(text).ok_or_else(|| XddError::Type {
        location: location.to_string(),
        attribute,
        value: text.to_string(),
        expected,
    })
}

pub(super) fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim().get(..10)?, DATE_FORMAT).ok()
}

pub(super) fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text.trim().get(..8)?, TIME_FORMAT).ok()
}

/// Combines a date and a time attribute. The time defaults to midnight; a
/// time without a date is ignored.
pub(super) fn timestamp(
    date: Option<&str>,
    time: Option<&str>,
    location: &str,
    date_attribute: &'static str,
    time_attribute: &'static str,
) -> Result<Option<NaiveDateTime>, XddError> {
    let Some(date) = typed(date, location, date_attribute, "xsd:date", parse_date)? else {
        return Ok(None);
    };
    let time = typed(time, location, time_attribute, "xsd:time", parse_time)?
        .unwrap_or(NaiveTime::MIN);
    Ok(Some(date.and_time(time)))
}

/// `"1.2"` -> `(1, 2)`, `"3"` -> `(3, 0)`.
pub(super) fn parse_file_version(text: &str) -> Option<(u8, u8)> {
    let text = text.trim();
    match text.split_once('.') {
        Some((version, revision)) => Some((version.parse().ok()?, revision.parse().ok()?)),
        None => Some((text.parse().ok()?, 0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_version() {
        assert_eq!(parse_file_version("1.2"), Some((1, 2)));
        assert_eq!(parse_file_version("4"), Some((4, 0)));
        assert_eq!(parse_file_version("1.x"), None);
    }

    #[test]
    fn test_timestamp_ignores_zone_suffix() {
        let at = timestamp(Some("2024-03-14"), Some("09:30:00+01:00"), "ProfileBody", "d", "t")
            .unwrap()
            .unwrap();
        assert_eq!(at.format("%Y-%m-%d %H:%M").to_string(), "2024-03-14 09:30");
        assert_eq!(timestamp(None, Some("09:30:00"), "ProfileBody", "d", "t").unwrap(), None);
    }

    #[test]
    fn test_type_error_carries_location() {
        let err = typed_required(Some("x"), "deviceCommissioning", "nodeID", "node id", |t| {
            t.parse::<u8>().ok()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            XddError::Type { attribute: "nodeID", ref value, .. } if value == "x"
        ));
    }
}
