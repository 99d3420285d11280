// crates/canopen-od-xdd/src/model/app_layers.rs

//! Contains model structs related to `<ApplicationLayers>`.
//! (Schema: `ProfileBody_CommunicationNetwork_CANopen.xsd`)

use serde::{Deserialize, Serialize};

/// Contains the object list and the dummy usage declaration.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ApplicationLayers {
    #[serde(rename = "CANopenObjectList", default)]
    pub object_list: CanOpenObjectList,

    #[serde(rename = "dummyUsage", default, skip_serializing_if = "Option::is_none")]
    pub dummy_usage: Option<DummyUsage>,
}

/// A list of all Object Dictionary entries.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct CanOpenObjectList {
    #[serde(rename = "CANopenObject", default)]
    pub object: Vec<CanOpenObject>,
}

/// `<dummy entry="Dummy0001=1"/>`
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct DummyUsage {
    #[serde(rename = "dummy", default)]
    pub dummy: Vec<Dummy>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Dummy {
    #[serde(rename = "@entry")]
    pub entry: String,
}

/// Represents an Object Dictionary index (e.g., `<CANopenObject index="1018" ...>`).
///
/// A VAR carries its value attributes directly; ARRAY and RECORD objects
/// list their entries as `<CANopenSubObject>` children.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct CanOpenObject {
    /// The OD index as a hex string (e.g., "1018").
    #[serde(rename = "@index", default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Name of a VAR's value when it differs from `name`.
    #[serde(rename = "@subName", default, skip_serializing_if = "Option::is_none")]
    pub sub_name: Option<String>,

    /// The object type code (e.g., "9" for RECORD).
    #[serde(rename = "@objectType", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,

    /// The data type code as four hex digits (e.g., "0007").
    #[serde(rename = "@dataType", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    /// `ro`, `wo`, `rw` or `const`.
    #[serde(rename = "@accessType", default, skip_serializing_if = "Option::is_none")]
    pub access_type: Option<String>,

    #[serde(rename = "@defaultValue", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(rename = "@actualValue", default, skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<String>,

    #[serde(rename = "@lowLimit", default, skip_serializing_if = "Option::is_none")]
    pub low_limit: Option<String>,

    #[serde(rename = "@highLimit", default, skip_serializing_if = "Option::is_none")]
    pub high_limit: Option<String>,

    /// `no`, `optional`, `default`, `TPDO` or `RPDO`.
    #[serde(rename = "@PDOmapping", default, skip_serializing_if = "Option::is_none")]
    pub pdo_mapping: Option<String>,

    #[serde(rename = "@SRDOmapping", default, skip_serializing_if = "Option::is_none")]
    pub srdo_mapping: Option<String>,

    /// The legacy EDS `PDOMapping` flag.
    #[serde(
        rename = "@PDOmappingFlag",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pdo_mapping_flag: Option<String>,

    #[serde(rename = "@subNumber", default, skip_serializing_if = "Option::is_none")]
    pub sub_number: Option<String>,

    #[serde(rename = "CANopenSubObject", default, skip_serializing_if = "Vec::is_empty")]
    pub sub_object: Vec<CanOpenSubObject>,
}

/// Represents a sub-index entry (e.g., `<CANopenSubObject subIndex="01" ...>`).
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct CanOpenSubObject {
    /// The sub-index as a hex string (e.g., "01").
    #[serde(rename = "@subIndex", default, skip_serializing_if = "Option::is_none")]
    pub sub_index: Option<String>,

    #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "@objectType", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,

    /// The data type code as four hex digits (e.g., "0007").
    #[serde(rename = "@dataType", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    /// `ro`, `wo`, `rw` or `const`.
    #[serde(rename = "@accessType", default, skip_serializing_if = "Option::is_none")]
    pub access_type: Option<String>,

    #[serde(rename = "@defaultValue", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(rename = "@actualValue", default, skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<String>,

    #[serde(rename = "@lowLimit", default, skip_serializing_if = "Option::is_none")]
    pub low_limit: Option<String>,

    #[serde(rename = "@highLimit", default, skip_serializing_if = "Option::is_none")]
    pub high_limit: Option<String>,

    /// `no`, `optional`, `default`, `TPDO` or `RPDO`.
    #[serde(rename = "@PDOmapping", default, skip_serializing_if = "Option::is_none")]
    pub pdo_mapping: Option<String>,

    #[serde(rename = "@SRDOmapping", default, skip_serializing_if = "Option::is_none")]
    pub srdo_mapping: Option<String>,

    /// The legacy EDS `PDOMapping` flag.
    #[serde(
        rename = "@PDOmappingFlag",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pdo_mapping_flag: Option<String>,
}

/// The value attributes shared by `<CANopenObject>` (for VARs) and
/// `<CANopenSubObject>`, detached from either element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueAttributes {
    pub data_type: Option<String>,
    pub access_type: Option<String>,
    pub default_value: Option<String>,
    pub actual_value: Option<String>,
    pub low_limit: Option<String>,
    pub high_limit: Option<String>,
    pub pdo_mapping: Option<String>,
    pub srdo_mapping: Option<String>,
    pub pdo_mapping_flag: Option<String>,
}

macro_rules! value_attributes {
    ($element:ty) => {
        impl $element {
            pub fn value_attributes(&self) -> ValueAttributes {
                ValueAttributes {
                    data_type: self.data_type.clone(),
                    access_type: self.access_type.clone(),
                    default_value: self.default_value.clone(),
                    actual_value: self.actual_value.clone(),
                    low_limit: self.low_limit.clone(),
                    high_limit: self.high_limit.clone(),
                    pdo_mapping: self.pdo_mapping.clone(),
                    srdo_mapping: self.srdo_mapping.clone(),
                    pdo_mapping_flag: self.pdo_mapping_flag.clone(),
                }
            }

            pub fn set_value_attributes(&mut self, value: ValueAttributes) {
                self.data_type = value.data_type;
                self.access_type = value.access_type;
                self.default_value = value.default_value;
                self.actual_value = value.actual_value;
                self.low_limit = value.low_limit;
                self.high_limit = value.high_limit;
                self.pdo_mapping = value.pdo_mapping;
                self.srdo_mapping = value.srdo_mapping;
                self.pdo_mapping_flag = value.pdo_mapping_flag;
            }
        }
    };
}

value_attributes!(CanOpenObject);
value_attributes!(CanOpenSubObject);
