// crates/canopen-od/src/error.rs

use crate::types::DataType;
use thiserror::Error;

/// Why a line of an EDS file was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseReason {
    /// A section whose first four characters are hex is neither `XXXX` nor `XXXXsubY`.
    InvalidSectionName,
    /// A line that is neither a comment, a section header nor `Key=Value`.
    MalformedLine,
    /// A required key is absent from the section.
    MissingKey(&'static str),
    /// A key is present but its value does not parse.
    InvalidValue {
        key: String,
        data_type: Option<DataType>,
    },
    /// The same section name appears twice.
    DuplicateSection,
    /// A `Key=Value` line appears before the first section header.
    KeyOutsideSection,
    /// A `XXXXsubY` section without its `XXXX` parent.
    MissingParentSection,
}

impl core::fmt::Display for ParseReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseReason::InvalidSectionName => write!(f, "invalid object section name"),
            ParseReason::MalformedLine => write!(f, "malformed line"),
            ParseReason::MissingKey(key) => write!(f, "missing required key '{key}'"),
            ParseReason::InvalidValue {
                key,
                data_type: Some(dt),
            } => write!(f, "value of '{key}' is not a valid {dt}"),
            ParseReason::InvalidValue {
                key,
                data_type: None,
            } => write!(f, "invalid value for '{key}'"),
            ParseReason::DuplicateSection => write!(f, "duplicate section"),
            ParseReason::KeyOutsideSection => write!(f, "key outside of any section"),
            ParseReason::MissingParentSection => {
                write!(f, "sub-index section without its object section")
            }
        }
    }
}

/// Errors produced while reading an EDS document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EdsError {
    /// `line` is 1-based; `text` is the offending line, trimmed.
    #[error("line {line}: {reason}: '{text}'")]
    Parse {
        line: usize,
        text: String,
        reason: ParseReason,
    },
}

/// Errors produced by the value grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("'{text}' is not a valid {data_type} value")]
    Unparseable { data_type: DataType, text: String },
    #[error("'{text}' is out of range for {data_type}")]
    OutOfRange { data_type: DataType, text: String },
}

/// Errors produced when editing an [`ObjectDictionary`](crate::od::ObjectDictionary).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OdError {
    #[error("object 0x{0:04X} already exists")]
    IndexExists(u16),
    #[error("object 0x{0:04X} does not exist")]
    IndexNotFound(u16),
    #[error("object 0x{index:04X} has no sub-index {sub_index}")]
    SubIndexNotFound { index: u16, sub_index: u8 },
    #[error("'{0}' is not a 16-bit hex index")]
    InvalidIndex(String),
    #[error("object 0x{0:04X} is not an ARRAY or RECORD")]
    NotComplex(u16),
    #[error("object 0x{0:04X} has no free sub-index")]
    SubIndexExhausted(u16),
}

/// Returned by long-running operations when their [`CancelToken`](crate::CancelToken) fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;
