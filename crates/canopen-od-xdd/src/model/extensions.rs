// crates/canopen-od-xdd/src/model/extensions.rs

//! Elements that carry EDS content the CiA 311 schema has no place for:
//! free-text comments and unrecognized EDS sections.

use serde::{Deserialize, Serialize};

/// `<Comments><line text="..."/></Comments>`
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Comments {
    #[serde(rename = "line", default)]
    pub line: Vec<CommentLine>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct CommentLine {
    #[serde(rename = "@text", default)]
    pub text: String,
}

/// `<VendorSections><section name="..."><entry key=".." value=".."/></section></VendorSections>`
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct VendorSections {
    #[serde(rename = "section", default)]
    pub section: Vec<VendorSection>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct VendorSection {
    #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "entry", default)]
    pub entry: Vec<VendorEntry>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct VendorEntry {
    #[serde(rename = "@key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "@value", default)]
    pub value: String,
}
