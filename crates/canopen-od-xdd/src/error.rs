// crates/canopen-od-xdd/src/error.rs

use core::fmt;
use quick_xml::errors::serialize::{DeError, SeError};
use thiserror::Error;

/// Errors that can occur during XDD parsing or serialization.
#[derive(Debug, Error)]
pub enum XddError {
    /// An error from the underlying `quick-xml` deserializer.
    #[error("XML parsing error: {0}")]
    XmlParsing(#[from] DeError),

    /// An error from the underlying `quick-xml` serializer.
    #[error("XML serializing error: {0}")]
    XmlSerializing(#[from] SeError),

    #[error("formatting error: {0}")]
    Fmt(#[from] fmt::Error),

    /// A required element or attribute is absent.
    #[error("{location}: missing required {missing}")]
    Schema {
        location: String,
        missing: &'static str,
    },

    /// An attribute is present but does not parse under its declared type.
    #[error("{location}: {attribute}=\"{value}\" is not a valid {expected}")]
    Type {
        location: String,
        attribute: &'static str,
        value: String,
        expected: &'static str,
    },
}
