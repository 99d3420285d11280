// crates/canopen-od/src/export/literal.rs

//! C types and initializer literals for sub-object values.

use super::ExportFailure;
use crate::od::{OdSubObject, OdValue, parse_value};
use crate::types::DataType;

/// The C storage of one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum CType {
    Scalar(&'static str),
    /// `char name[N]`, including the terminator.
    Chars(usize),
    /// `uint8_t name[N]`
    Bytes(usize),
    /// `uint16_t name[N]`, including the terminator.
    Units(usize),
}

impl CType {
    /// Declarator for `name`: `uint8_t OD_1001`, `char OD_1008[12]`.
    pub fn declare(&self, name: &str) -> String {
        match self {
            CType::Scalar(ty) => format!("{ty} {name}"),
            CType::Chars(n) => format!("char {name}[{n}]"),
            CType::Bytes(n) => format!("uint8_t {name}[{n}]"),
            CType::Units(n) => format!("uint16_t {name}[{n}]"),
        }
    }
}

/// A rendered value: its C type and initializer.
pub(super) struct Rendered {
    pub ctype: CType,
    pub literal: String,
}

/// `$NODEID` evaluates to 0: the stack adds the node id at runtime.
const EXPORT_NODE_ID: u8 = 0;

pub(super) fn render(sub: &OdSubObject) -> Result<Rendered, ExportFailure> {
    let value = parse_value(sub.data_type, sub.effective_value(), EXPORT_NODE_ID)
        .map_err(ExportFailure::InvalidValue)?;

    match (sub.data_type, value) {
        (_, OdValue::Domain) => Err(ExportFailure::Domain),
        (DataType::Boolean, OdValue::Boolean(b)) => scalar("uint8_t", u8::from(b).to_string()),
        (DataType::Unsigned8, OdValue::Unsigned(v)) => scalar("uint8_t", v.to_string()),
        (DataType::Unsigned16, OdValue::Unsigned(v)) => scalar("uint16_t", v.to_string()),
        (DataType::Unsigned24 | DataType::Unsigned32, OdValue::Unsigned(v)) => {
            scalar("uint32_t", format!("0x{v:08X}"))
        }
        (
            DataType::Unsigned40
            | DataType::Unsigned48
            | DataType::Unsigned56
            | DataType::Unsigned64
            | DataType::TimeOfDay
            | DataType::TimeDifference,
            OdValue::Unsigned(v),
        ) => scalar("uint64_t", format!("0x{v:016X}ULL")),
        (DataType::Integer8, OdValue::Integer(v)) => scalar("int8_t", v.to_string()),
        (DataType::Integer16, OdValue::Integer(v)) => scalar("int16_t", v.to_string()),
        (DataType::Integer24 | DataType::Integer32, OdValue::Integer(v)) => {
            let literal = if v == i64::from(i32::MIN) {
                "(-2147483647 - 1)".to_string()
            } else {
                v.to_string()
            };
            scalar("int32_t", literal)
        }
        (
            DataType::Integer40 | DataType::Integer48 | DataType::Integer56 | DataType::Integer64,
            OdValue::Integer(v),
        ) => {
            let literal = if v == i64::MIN {
                "(-9223372036854775807LL - 1)".to_string()
            } else {
                format!("{v}LL")
            };
            scalar("int64_t", literal)
        }
        (DataType::Real32, OdValue::Real32(v)) => scalar("float", format!("{v:?}f")),
        (DataType::Real64, OdValue::Real64(v)) => scalar("double", format!("{v:?}")),
        (DataType::VisibleString, OdValue::VisibleString(s)) => Ok(Rendered {
            ctype: CType::Chars(s.len() + 1),
            literal: c_string(&s),
        }),
        (DataType::OctetString, OdValue::OctetString(bytes)) => {
            if bytes.is_empty() {
                return Err(ExportFailure::EmptyOctetString);
            }
            let items: Vec<String> = bytes.iter().map(|b| format!("0x{b:02X}")).collect();
            Ok(Rendered {
                ctype: CType::Bytes(bytes.len()),
                literal: format!("{{{}}}", items.join(", ")),
            })
        }
        (DataType::UnicodeString, OdValue::UnicodeString(units)) => {
            let items: Vec<String> = units
                .iter()
                .chain(std::iter::once(&0))
                .map(|u| format!("0x{u:04X}"))
                .collect();
            Ok(Rendered {
                ctype: CType::Units(units.len() + 1),
                literal: format!("{{{}}}", items.join(", ")),
            })
        }
        (data_type, value) => Err(ExportFailure::Unsupported(format!(
            "{data_type} cannot hold {value:?}"
        ))),
    }
}

fn scalar(ty: &'static str, literal: String) -> Result<Rendered, ExportFailure> {
    Ok(Rendered {
        ctype: CType::Scalar(ty),
        literal,
    })
}

/// Quotes `s` as a C string literal. Bytes outside printable ASCII become
/// three-digit octal escapes, which cannot swallow a following digit.
fn c_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for byte in s.bytes() {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7E => out.push(char::from(byte)),
            _ => out.push_str(&format!("\\{byte:03o}")),
        }
    }
    out.push('"');
    out
}
