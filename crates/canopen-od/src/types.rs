// crates/canopen-od/src/types.rs

//! Closed enumerations shared by every reader, writer and the code generator.
//!
//! Each enum carries its own token codecs. Dispatch is always an exhaustive
//! `match` so adding a variant breaks every format that does not handle it.

use core::fmt;

/// Structural kind of an Object Dictionary entry.
/// (Reference: CiA 301, Table 42)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectType {
    /// A single value, stored at sub-index 0.
    Var,
    /// Homogeneous indexed values; sub-index 0 holds the entry count.
    Array,
    /// Heterogeneous named fields; sub-index 0 holds the entry count.
    Record,
}

impl ObjectType {
    /// The numeric object code (7, 8 or 9).
    pub const fn code(self) -> u8 {
        match self {
            ObjectType::Var => 7,
            ObjectType::Array => 8,
            ObjectType::Record => 9,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            7 => Some(ObjectType::Var),
            8 => Some(ObjectType::Array),
            9 => Some(ObjectType::Record),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ObjectType::Var => "VAR",
            ObjectType::Array => "ARRAY",
            ObjectType::Record => "RECORD",
        }
    }

    /// Parses `0x7`, `7` or `VAR` (case-insensitive).
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.to_ascii_uppercase().as_str() {
            "VAR" => return Some(ObjectType::Var),
            "ARRAY" => return Some(ObjectType::Array),
            "RECORD" => return Some(ObjectType::Record),
            _ => {}
        }
        crate::utils::parse_u64(text)
            .and_then(|code| u8::try_from(code).ok())
            .and_then(Self::from_code)
    }

    /// Returns `true` for objects whose data lives in sub-indices 1..n.
    pub const fn is_complex(self) -> bool {
        match self {
            ObjectType::Var => false,
            ObjectType::Array | ObjectType::Record => true,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static data types of CiA 301, Table 44.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    Boolean,
    Integer8,
    Integer16,
    Integer32,
    Unsigned8,
    Unsigned16,
    Unsigned32,
    Real32,
    VisibleString,
    OctetString,
    UnicodeString,
    TimeOfDay,
    TimeDifference,
    Domain,
    Integer24,
    Real64,
    Integer40,
    Integer48,
    Integer56,
    Integer64,
    Unsigned24,
    Unsigned40,
    Unsigned48,
    Unsigned56,
    Unsigned64,
}

impl DataType {
    pub const ALL: [DataType; 25] = [
        DataType::Boolean,
        DataType::Integer8,
        DataType::Integer16,
        DataType::Integer32,
        DataType::Unsigned8,
        DataType::Unsigned16,
        DataType::Unsigned32,
        DataType::Real32,
        DataType::VisibleString,
        DataType::OctetString,
        DataType::UnicodeString,
        DataType::TimeOfDay,
        DataType::TimeDifference,
        DataType::Domain,
        DataType::Integer24,
        DataType::Real64,
        DataType::Integer40,
        DataType::Integer48,
        DataType::Integer56,
        DataType::Integer64,
        DataType::Unsigned24,
        DataType::Unsigned40,
        DataType::Unsigned48,
        DataType::Unsigned56,
        DataType::Unsigned64,
    ];

    /// The data type index used in EDS `DataType=` keys and XDD `dataType` attributes.
    pub const fn code(self) -> u16 {
        match self {
            DataType::Boolean => 0x0001,
            DataType::Integer8 => 0x0002,
            DataType::Integer16 => 0x0003,
            DataType::Integer32 => 0x0004,
            DataType::Unsigned8 => 0x0005,
            DataType::Unsigned16 => 0x0006,
            DataType::Unsigned32 => 0x0007,
            DataType::Real32 => 0x0008,
            DataType::VisibleString => 0x0009,
            DataType::OctetString => 0x000A,
            DataType::UnicodeString => 0x000B,
            DataType::TimeOfDay => 0x000C,
            DataType::TimeDifference => 0x000D,
            DataType::Domain => 0x000F,
            DataType::Integer24 => 0x0010,
            DataType::Real64 => 0x0011,
            DataType::Integer40 => 0x0012,
            DataType::Integer48 => 0x0013,
            DataType::Integer56 => 0x0014,
            DataType::Integer64 => 0x0015,
            DataType::Unsigned24 => 0x0016,
            DataType::Unsigned40 => 0x0018,
            DataType::Unsigned48 => 0x0019,
            DataType::Unsigned56 => 0x001A,
            DataType::Unsigned64 => 0x001B,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|dt| dt.code() == code)
    }

    pub const fn name(self) -> &'static str {
        match self {
            DataType::Boolean => "BOOLEAN",
            DataType::Integer8 => "INTEGER8",
            DataType::Integer16 => "INTEGER16",
            DataType::Integer32 => "INTEGER32",
            DataType::Unsigned8 => "UNSIGNED8",
            DataType::Unsigned16 => "UNSIGNED16",
            DataType::Unsigned32 => "UNSIGNED32",
            DataType::Real32 => "REAL32",
            DataType::VisibleString => "VISIBLE_STRING",
            DataType::OctetString => "OCTET_STRING",
            DataType::UnicodeString => "UNICODE_STRING",
            DataType::TimeOfDay => "TIME_OF_DAY",
            DataType::TimeDifference => "TIME_DIFFERENCE",
            DataType::Domain => "DOMAIN",
            DataType::Integer24 => "INTEGER24",
            DataType::Real64 => "REAL64",
            DataType::Integer40 => "INTEGER40",
            DataType::Integer48 => "INTEGER48",
            DataType::Integer56 => "INTEGER56",
            DataType::Integer64 => "INTEGER64",
            DataType::Unsigned24 => "UNSIGNED24",
            DataType::Unsigned40 => "UNSIGNED40",
            DataType::Unsigned48 => "UNSIGNED48",
            DataType::Unsigned56 => "UNSIGNED56",
            DataType::Unsigned64 => "UNSIGNED64",
        }
    }

    /// Parses a data type name (`UNSIGNED32`) or code (`0x0007`, `0007`).
    /// Bare codes are always read as hex, as both EDS and XDD write them.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(dt) = Self::ALL
            .iter()
            .copied()
            .find(|dt| dt.name().eq_ignore_ascii_case(text))
        {
            return Some(dt);
        }
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        u16::from_str_radix(digits, 16)
            .ok()
            .and_then(Self::from_code)
    }

    /// Size in bits when mapped into a PDO. `None` for variable-length types.
    pub const fn bit_length(self) -> Option<u32> {
        match self {
            DataType::Boolean => Some(1),
            DataType::Integer8 | DataType::Unsigned8 => Some(8),
            DataType::Integer16 | DataType::Unsigned16 => Some(16),
            DataType::Integer24 | DataType::Unsigned24 => Some(24),
            DataType::Integer32 | DataType::Unsigned32 | DataType::Real32 => Some(32),
            DataType::Integer40 | DataType::Unsigned40 => Some(40),
            DataType::Integer48
            | DataType::Unsigned48
            | DataType::TimeOfDay
            | DataType::TimeDifference => Some(48),
            DataType::Integer56 | DataType::Unsigned56 => Some(56),
            DataType::Integer64 | DataType::Unsigned64 | DataType::Real64 => Some(64),
            DataType::VisibleString
            | DataType::OctetString
            | DataType::UnicodeString
            | DataType::Domain => None,
        }
    }

    /// Inclusive integer bounds for integer-valued types.
    pub fn integer_range(self) -> Option<(i128, i128)> {
        let signed = |bits: u32| (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1);
        let unsigned = |bits: u32| (0, (1i128 << bits) - 1);
        match self {
            DataType::Boolean => Some((0, 1)),
            DataType::Integer8 => Some(signed(8)),
            DataType::Integer16 => Some(signed(16)),
            DataType::Integer24 => Some(signed(24)),
            DataType::Integer32 => Some(signed(32)),
            DataType::Integer40 => Some(signed(40)),
            DataType::Integer48 => Some(signed(48)),
            DataType::Integer56 => Some(signed(56)),
            DataType::Integer64 => Some(signed(64)),
            DataType::Unsigned8 => Some(unsigned(8)),
            DataType::Unsigned16 => Some(unsigned(16)),
            DataType::Unsigned24 => Some(unsigned(24)),
            DataType::Unsigned32 => Some(unsigned(32)),
            DataType::Unsigned40 => Some(unsigned(40)),
            DataType::Unsigned48 | DataType::TimeOfDay | DataType::TimeDifference => {
                Some(unsigned(48))
            }
            DataType::Unsigned56 => Some(unsigned(56)),
            DataType::Unsigned64 => Some(unsigned(64)),
            DataType::Real32
            | DataType::Real64
            | DataType::VisibleString
            | DataType::OctetString
            | DataType::UnicodeString
            | DataType::Domain => None,
        }
    }

    /// `true` for the integer, boolean and real types that support limits.
    pub fn is_numeric(self) -> bool {
        self.integer_range().is_some() || matches!(self, DataType::Real32 | DataType::Real64)
    }

    pub const fn is_signed(self) -> bool {
        match self {
            DataType::Integer8
            | DataType::Integer16
            | DataType::Integer24
            | DataType::Integer32
            | DataType::Integer40
            | DataType::Integer48
            | DataType::Integer56
            | DataType::Integer64
            | DataType::Real32
            | DataType::Real64 => true,
            DataType::Boolean
            | DataType::Unsigned8
            | DataType::Unsigned16
            | DataType::Unsigned24
            | DataType::Unsigned32
            | DataType::Unsigned40
            | DataType::Unsigned48
            | DataType::Unsigned56
            | DataType::Unsigned64
            | DataType::VisibleString
            | DataType::OctetString
            | DataType::UnicodeString
            | DataType::TimeOfDay
            | DataType::TimeDifference
            | DataType::Domain => false,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// SDO access right of a sub-object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessSdo {
    None,
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessSdo {
    pub const fn token(self) -> &'static str {
        match self {
            AccessSdo::None => "no",
            AccessSdo::ReadOnly => "ro",
            AccessSdo::WriteOnly => "wo",
            AccessSdo::ReadWrite => "rw",
        }
    }

    /// Accepts the written tokens plus the legacy `const`, `rwr` and `rww` spellings.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "no" | "none" => Some(AccessSdo::None),
            "ro" | "const" => Some(AccessSdo::ReadOnly),
            "wo" => Some(AccessSdo::WriteOnly),
            "rw" | "rwr" | "rww" => Some(AccessSdo::ReadWrite),
            _ => None,
        }
    }
}

impl fmt::Display for AccessSdo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Whether a sub-object may be carried in a PDO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessPdo {
    No,
    Optional,
    Required,
}

impl AccessPdo {
    /// Token used by the EDS `AccessPDO` key.
    pub const fn eds_token(self) -> &'static str {
        match self {
            AccessPdo::No => "no",
            AccessPdo::Optional => "optional",
            AccessPdo::Required => "required",
        }
    }

    pub fn from_eds_token(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "no" => Some(AccessPdo::No),
            "optional" => Some(AccessPdo::Optional),
            "required" => Some(AccessPdo::Required),
            _ => None,
        }
    }

    /// Token used by the XDD `PDOmapping` attribute (CiA 311 `t_PDOmapping`).
    pub const fn xdd_token(self) -> &'static str {
        match self {
            AccessPdo::No => "no",
            AccessPdo::Optional => "optional",
            AccessPdo::Required => "default",
        }
    }

    /// Direction-specific `TPDO`/`RPDO` values collapse to `Optional`.
    pub fn from_xdd_token(text: &str) -> Option<Self> {
        match text.trim() {
            "no" => Some(AccessPdo::No),
            "optional" | "TPDO" | "RPDO" => Some(AccessPdo::Optional),
            "default" => Some(AccessPdo::Required),
            _ => None,
        }
    }
}

/// Whether a sub-object may be carried in a safety-relevant SRDO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessSrdo {
    No,
    Optional,
    Required,
}

impl AccessSrdo {
    pub const fn token(self) -> &'static str {
        match self {
            AccessSrdo::No => "no",
            AccessSrdo::Optional => "optional",
            AccessSrdo::Required => "required",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "no" => Some(AccessSrdo::No),
            "optional" => Some(AccessSrdo::Optional),
            "required" => Some(AccessSrdo::Required),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_parse_accepts_names_and_codes() {
        assert_eq!(DataType::parse("UNSIGNED32"), Some(DataType::Unsigned32));
        assert_eq!(DataType::parse("unsigned32"), Some(DataType::Unsigned32));
        assert_eq!(DataType::parse("0x0007"), Some(DataType::Unsigned32));
        assert_eq!(DataType::parse("0007"), Some(DataType::Unsigned32));
        assert_eq!(DataType::parse("0x001B"), Some(DataType::Unsigned64));
        assert_eq!(DataType::parse("0x000E"), None);
        assert_eq!(DataType::parse("FLOAT"), None);
    }

    #[test]
    fn test_data_type_codes_are_unique() {
        for dt in DataType::ALL {
            assert_eq!(DataType::from_code(dt.code()), Some(dt));
        }
    }

    #[test]
    fn test_integer_range() {
        assert_eq!(DataType::Unsigned8.integer_range(), Some((0, 255)));
        assert_eq!(DataType::Integer16.integer_range(), Some((-32768, 32767)));
        assert_eq!(
            DataType::Unsigned64.integer_range(),
            Some((0, u64::MAX as i128))
        );
        assert_eq!(DataType::VisibleString.integer_range(), None);
    }

    #[test]
    fn test_numeric_and_signed_types() {
        assert!(DataType::Boolean.is_numeric());
        assert!(DataType::Real64.is_numeric());
        assert!(!DataType::OctetString.is_numeric());
        assert!(DataType::Integer24.is_signed());
        assert!(DataType::Real32.is_signed());
        assert!(!DataType::Unsigned64.is_signed());
        assert!(!DataType::VisibleString.is_signed());
    }

    #[test]
    fn test_object_type_parse() {
        assert_eq!(ObjectType::parse("0x7"), Some(ObjectType::Var));
        assert_eq!(ObjectType::parse("8"), Some(ObjectType::Array));
        assert_eq!(ObjectType::parse("record"), Some(ObjectType::Record));
        assert_eq!(ObjectType::parse("0x2"), None);
    }

    #[test]
    fn test_access_tokens() {
        assert_eq!(AccessSdo::parse("const"), Some(AccessSdo::ReadOnly));
        assert_eq!(AccessSdo::parse("RWW"), Some(AccessSdo::ReadWrite));
        assert_eq!(AccessSdo::parse(AccessSdo::None.token()), Some(AccessSdo::None));
        assert_eq!(AccessPdo::from_xdd_token("TPDO"), Some(AccessPdo::Optional));
        assert_eq!(
            AccessPdo::from_xdd_token(AccessPdo::Required.xdd_token()),
            Some(AccessPdo::Required)
        );
        assert_eq!(AccessSrdo::parse("maybe"), None);
    }
}
