//! Internal `serde` data structures that map directly to the CiA 311 XML schema.
//!
//! These structs are annotated with `serde` attributes to facilitate parsing
//! via `quick-xml` and are not intended for direct public use. Attribute values
//! are kept as strings; typing them is the resolver's job so that a bad value
//! can be reported with its location.

#![allow(clippy::pedantic)] // XML schema naming conventions differ from Rust

use serde::{Deserialize, Serialize};

pub mod app_layers;
pub mod extensions;
pub mod header;
pub mod identity;
pub mod net_mgmt;

pub use app_layers::ApplicationLayers;
pub use extensions::{Comments, VendorSections};
pub use header::ProfileHeader;
pub use identity::DeviceIdentity;
pub use net_mgmt::{NetworkManagement, TransportLayers};

pub const DEVICE_PROFILE: &str = "ProfileBody_Device_CANopen";
pub const COMMUNICATION_PROFILE: &str = "ProfileBody_CommunicationNetwork_CANopen";

/// The root element of an XDD/XDC file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "ISO15745ProfileContainer")]
pub struct Iso15745ProfileContainer {
    #[serde(rename = "@xmlns", default)]
    pub xmlns: String,

    #[serde(rename = "@xmlns:xsi", default)]
    pub xmlns_xsi: String,

    /// Usually one device profile and one communication profile.
    #[serde(rename = "ISO15745Profile", default)]
    pub profile: Vec<Iso15745Profile>,
}

impl Default for Iso15745ProfileContainer {
    fn default() -> Self {
        Self {
            xmlns: "http://www.canopen.org/xml/1.0".into(),
            xmlns_xsi: "http://www.w3.org/2001/XMLSchema-instance".into(),
            profile: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Iso15745Profile {
    #[serde(rename = "ProfileHeader", default)]
    pub profile_header: ProfileHeader,

    #[serde(rename = "ProfileBody")]
    pub profile_body: ProfileBody,
}

/// The body of either profile. Device profiles carry the identity, communication
/// profiles the object list and network data; both carry the file metadata.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ProfileBody {
    #[serde(rename = "@xsi:type", default, skip_serializing_if = "Option::is_none")]
    pub xsi_type: Option<String>,

    // --- File metadata (ag_ProfileBody) ---
    #[serde(rename = "@fileName", default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "@fileCreator", default, skip_serializing_if = "Option::is_none")]
    pub file_creator: Option<String>,
    #[serde(
        rename = "@fileCreationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub file_creation_date: Option<String>,
    #[serde(
        rename = "@fileCreationTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub file_creation_time: Option<String>,
    #[serde(
        rename = "@fileModifiedBy",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub file_modified_by: Option<String>,
    #[serde(
        rename = "@fileModificationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub file_modification_date: Option<String>,
    #[serde(
        rename = "@fileModificationTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub file_modification_time: Option<String>,
    /// `<version>.<revision>`, e.g. "1.2".
    #[serde(rename = "@fileVersion", default, skip_serializing_if = "Option::is_none")]
    pub file_version: Option<String>,
    /// EDS `EDSVersion`, carried for lossless conversion.
    #[serde(rename = "@edsVersion", default, skip_serializing_if = "Option::is_none")]
    pub eds_version: Option<String>,

    // --- Device profile ---
    #[serde(
        rename = "DeviceIdentity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub device_identity: Option<DeviceIdentity>,

    #[serde(rename = "Comments", default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Comments>,

    #[serde(
        rename = "VendorSections",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub vendor_sections: Option<VendorSections>,

    // --- Communication profile ---
    #[serde(
        rename = "ApplicationLayers",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub application_layers: Option<ApplicationLayers>,

    #[serde(
        rename = "TransportLayers",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transport_layers: Option<TransportLayers>,

    #[serde(
        rename = "NetworkManagement",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub network_management: Option<NetworkManagement>,
}
