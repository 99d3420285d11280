// crates/canopen-od-xdd/src/model/identity.rs

//! Contains model structs related to `<DeviceIdentity>`.
//! (Schema: `ProfileBody_Device_CANopen.xsd`)

use serde::{Deserialize, Serialize};

/// The `<DeviceIdentity>` block of the device profile. Every child is a plain
/// text element; absent ones map to empty / unknown values.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct DeviceIdentity {
    #[serde(rename = "vendorName", default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,

    #[serde(rename = "vendorID", default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,

    #[serde(rename = "productName", default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    #[serde(rename = "productID", default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    #[serde(
        rename = "revisionNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub revision_number: Option<String>,

    #[serde(rename = "orderNumber", default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
}
