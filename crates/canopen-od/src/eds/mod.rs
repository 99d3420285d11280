// crates/canopen-od/src/eds/mod.rs

//! The INI-like Electronic Data Sheet format (CiA 306).

mod builder;
mod parser;

pub use builder::save_eds_to_string;
pub use parser::load_eds_from_str;

use std::borrow::Cow;

const FILE_INFO: &str = "FileInfo";
const DEVICE_INFO: &str = "DeviceInfo";
const DUMMY_USAGE: &str = "DummyUsage";
const COMMENTS: &str = "Comments";
const MANDATORY_OBJECTS: &str = "MandatoryObjects";
const OPTIONAL_OBJECTS: &str = "OptionalObjects";
const MANUFACTURER_OBJECTS: &str = "ManufacturerObjects";
/// The misspelling is part of CiA 306.
const DEVICE_COMMISSIONING: &str = "DeviceComissioning";
const DEVICE_COMMISSIONING_ALT: &str = "DeviceCommissioning";

/// `CreationTime=10:15AM`
const TIME_FORMAT: &str = "%I:%M%p";
/// `CreationTime=10:15:30AM`, used only when the seconds are not zero.
const TIME_FORMAT_SECONDS: &str = "%I:%M:%S%p";
/// `CreationDate=01-20-2024`
const DATE_FORMAT: &str = "%m-%d-%Y";

/// Holds the name of a VAR's value when it differs from the object name.
const SUB_PARAMETER_NAME: &str = "SubParameterName";

/// Keeps a value on one line: `\`, CR and LF become `\\`, `\r` and `\n`.
fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '\r', '\n']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Reverses [`escape`]. A backslash before any other character is kept as is.
fn unescape(value: &str) -> Cow<'_, str> {
    if !value.contains('\\') {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('\\') => out.push('\\'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            _ => {
                out.push('\\');
                continue;
            }
        }
        chars.next();
    }
    Cow::Owned(out)
}

/// Which object list an index is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectList {
    Mandatory,
    Optional,
    Manufacturer,
}

impl ObjectList {
    fn of(index: u16) -> Self {
        match index {
            0x1000 | 0x1001 | 0x1018 => ObjectList::Mandatory,
            0x2000..=0x5FFF => ObjectList::Manufacturer,
            _ => ObjectList::Optional,
        }
    }
}
