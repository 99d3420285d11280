// crates/canopen-od/src/od/value.rs

use crate::error::ValueError;
use crate::types::DataType;
use core::cmp::Ordering;

/// A value literal parsed under its declared [`DataType`].
#[derive(Debug, Clone, PartialEq)]
pub enum OdValue {
    Boolean(bool),
    /// All signed integer widths.
    Integer(i64),
    /// All unsigned integer widths, including TIME_OF_DAY and TIME_DIFFERENCE.
    Unsigned(u64),
    Real32(f32),
    Real64(f64),
    VisibleString(String),
    OctetString(Vec<u8>),
    UnicodeString(Vec<u16>),
    /// Domains carry no inline value.
    Domain,
}

impl OdValue {
    /// Numeric ordering between two parsed values. `None` for non-numeric values.
    pub fn compare(&self, other: &OdValue) -> Option<Ordering> {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => self.as_f64()?.partial_cmp(&other.as_f64()?),
        }
    }

    pub fn as_i128(&self) -> Option<i128> {
        match self {
            OdValue::Boolean(b) => Some(i128::from(*b)),
            OdValue::Integer(v) => Some(i128::from(*v)),
            OdValue::Unsigned(v) => Some(i128::from(*v)),
            OdValue::Real32(_)
            | OdValue::Real64(_)
            | OdValue::VisibleString(_)
            | OdValue::OctetString(_)
            | OdValue::UnicodeString(_)
            | OdValue::Domain => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OdValue::Real32(v) => Some(f64::from(*v)),
            OdValue::Real64(v) => Some(*v),
            other => other.as_i128().map(|v| v as f64),
        }
    }

    /// The value as an unsigned integer, if it is one (or a non-negative signed one).
    pub fn as_u64(&self) -> Option<u64> {
        self.as_i128().and_then(|v| u64::try_from(v).ok())
    }
}

/// Returns `true` when the literal refers to the node id (`$NODEID+0x180`).
pub fn has_node_id_reference(text: &str) -> bool {
    text.to_ascii_uppercase().contains("$NODEID")
}

/// Parses `text` under the grammar of `data_type`.
///
/// Integer literals may be decimal or `0x` hex, optionally signed, and may add
/// `$NODEID` terms which evaluate to `node_id`. Empty numeric text is zero.
pub fn parse_value(data_type: DataType, text: &str, node_id: u8) -> Result<OdValue, ValueError> {
    let unparseable = || ValueError::Unparseable {
        data_type,
        text: text.to_string(),
    };
    let trimmed = text.trim();

    match data_type {
        DataType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" => Ok(OdValue::Boolean(true)),
            "false" => Ok(OdValue::Boolean(false)),
            _ => {
                let v = integer_in_range(data_type, text, node_id)?;
                Ok(OdValue::Boolean(v != 0))
            }
        },
        DataType::Integer8
        | DataType::Integer16
        | DataType::Integer24
        | DataType::Integer32
        | DataType::Integer40
        | DataType::Integer48
        | DataType::Integer56
        | DataType::Integer64 => {
            let v = integer_in_range(data_type, text, node_id)?;
            i64::try_from(v).map(OdValue::Integer).map_err(|_| out_of_range(data_type, text))
        }
        DataType::Unsigned8
        | DataType::Unsigned16
        | DataType::Unsigned24
        | DataType::Unsigned32
        | DataType::Unsigned40
        | DataType::Unsigned48
        | DataType::Unsigned56
        | DataType::Unsigned64
        | DataType::TimeOfDay
        | DataType::TimeDifference => {
            let v = integer_in_range(data_type, text, node_id)?;
            u64::try_from(v).map(OdValue::Unsigned).map_err(|_| out_of_range(data_type, text))
        }
        DataType::Real32 => {
            if trimmed.is_empty() {
                return Ok(OdValue::Real32(0.0));
            }
            let v: f64 = trimmed.parse().map_err(|_| unparseable())?;
            if !v.is_finite() {
                return Err(unparseable());
            }
            if v.abs() > f64::from(f32::MAX) {
                return Err(out_of_range(data_type, text));
            }
            Ok(OdValue::Real32(v as f32))
        }
        DataType::Real64 => {
            if trimmed.is_empty() {
                return Ok(OdValue::Real64(0.0));
            }
            let v: f64 = trimmed.parse().map_err(|_| unparseable())?;
            if !v.is_finite() {
                return Err(unparseable());
            }
            Ok(OdValue::Real64(v))
        }
        DataType::VisibleString => Ok(OdValue::VisibleString(text.to_string())),
        DataType::UnicodeString => Ok(OdValue::UnicodeString(text.encode_utf16().collect())),
        DataType::OctetString => {
            let digits: String = trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
                .unwrap_or(trimmed)
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            hex::decode(&digits)
                .map(OdValue::OctetString)
                .map_err(|_| unparseable())
        }
        DataType::Domain => Ok(OdValue::Domain),
    }
}

fn out_of_range(data_type: DataType, text: &str) -> ValueError {
    ValueError::OutOfRange {
        data_type,
        text: text.to_string(),
    }
}

fn integer_in_range(data_type: DataType, text: &str, node_id: u8) -> Result<i128, ValueError> {
    let value = evaluate_integer(text, node_id).ok_or_else(|| ValueError::Unparseable {
        data_type,
        text: text.to_string(),
    })?;
    match data_type.integer_range() {
        Some((min, max)) if value < min || value > max => Err(out_of_range(data_type, text)),
        _ => Ok(value),
    }
}

/// Evaluates an integer literal with optional `$NODEID` terms joined by `+`.
fn evaluate_integer(text: &str, node_id: u8) -> Option<i128> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0);
    }
    if !has_node_id_reference(text) {
        return parse_signed_literal(text);
    }
    text.split('+').try_fold(0i128, |acc, term| {
        let term = term.trim();
        let value = if term.eq_ignore_ascii_case("$NODEID") {
            i128::from(node_id)
        } else {
            parse_signed_literal(term)?
        };
        acc.checked_add(value)
    })
}

fn parse_signed_literal(text: &str) -> Option<i128> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let magnitude = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(hex) if !hex.is_empty() => u128::from_str_radix(hex, 16).ok()?,
        Some(_) => return None,
        None if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) => {
            rest.parse::<u128>().ok()?
        }
        None => return None,
    };
    let magnitude = i128::try_from(magnitude).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integers() {
        assert_eq!(
            parse_value(DataType::Unsigned32, "0x00000191", 0),
            Ok(OdValue::Unsigned(0x191))
        );
        assert_eq!(parse_value(DataType::Integer16, "-42", 0), Ok(OdValue::Integer(-42)));
        assert_eq!(parse_value(DataType::Unsigned8, "", 0), Ok(OdValue::Unsigned(0)));
        assert!(matches!(
            parse_value(DataType::Unsigned8, "256", 0),
            Err(ValueError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_value(DataType::Integer8, "-129", 0),
            Err(ValueError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_value(DataType::Unsigned16, "12ab", 0),
            Err(ValueError::Unparseable { .. })
        ));
    }

    #[test]
    fn test_parse_integer_extremes() {
        assert_eq!(
            parse_value(DataType::Unsigned64, "0xFFFFFFFFFFFFFFFF", 0),
            Ok(OdValue::Unsigned(u64::MAX))
        );
        assert_eq!(
            parse_value(DataType::Integer64, "-9223372036854775808", 0),
            Ok(OdValue::Integer(i64::MIN))
        );
        assert!(matches!(
            parse_value(DataType::Unsigned24, "0x1000000", 0),
            Err(ValueError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_node_id_expressions() {
        assert_eq!(
            parse_value(DataType::Unsigned32, "$NODEID+0x180", 5),
            Ok(OdValue::Unsigned(0x185))
        );
        assert_eq!(
            parse_value(DataType::Unsigned32, "0x200+$NodeId", 1),
            Ok(OdValue::Unsigned(0x201))
        );
        assert!(has_node_id_reference("$NODEID+0x180"));
        assert!(!has_node_id_reference("0x180"));
    }

    #[test]
    fn test_parse_non_integers() {
        assert_eq!(parse_value(DataType::Boolean, "true", 0), Ok(OdValue::Boolean(true)));
        assert_eq!(parse_value(DataType::Boolean, "0", 0), Ok(OdValue::Boolean(false)));
        assert!(parse_value(DataType::Boolean, "2", 0).is_err());
        assert_eq!(parse_value(DataType::Real32, "1.5", 0), Ok(OdValue::Real32(1.5)));
        assert!(parse_value(DataType::Real64, "inf", 0).is_err());
        assert!(matches!(
            parse_value(DataType::Real32, "1e39", 0),
            Err(ValueError::OutOfRange { .. })
        ));
        assert_eq!(
            parse_value(DataType::OctetString, "0x01 02 ff", 0),
            Ok(OdValue::OctetString(vec![0x01, 0x02, 0xFF]))
        );
        assert!(parse_value(DataType::OctetString, "0x123", 0).is_err());
        assert_eq!(
            parse_value(DataType::UnicodeString, "Hi", 0),
            Ok(OdValue::UnicodeString(vec![0x48, 0x69]))
        );
        assert_eq!(parse_value(DataType::Domain, "anything", 0), Ok(OdValue::Domain));
    }

    #[test]
    fn test_compare_mixed_numeric() {
        let low = OdValue::Integer(-1);
        let high = OdValue::Unsigned(10);
        assert_eq!(low.compare(&high), Some(Ordering::Less));
        assert_eq!(
            OdValue::Real32(2.5).compare(&OdValue::Real32(2.5)),
            Some(Ordering::Equal)
        );
        assert_eq!(OdValue::Domain.compare(&high), None);
    }
}
