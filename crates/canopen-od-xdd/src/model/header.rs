//! Contains model structs related to the `<ProfileHeader>`.
//!
//! (Schema: `ISO15745ProfileContainer.xsd`)

use serde::{Deserialize, Serialize};

/// References the specific part and edition of the ISO 15745 standard.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Iso15745Reference {
    #[serde(rename = "ISO15745Part")]
    pub iso15745_part: u32,
    #[serde(rename = "ISO15745Edition")]
    pub iso15745_edition: u32,
    #[serde(rename = "ProfileTechnology")]
    pub profile_technology: String,
}

impl Iso15745Reference {
    /// ISO 15745-2 (CAN-based systems), edition 1.
    pub fn canopen() -> Self {
        Self {
            iso15745_part: 2,
            iso15745_edition: 1,
            profile_technology: "CANopen".into(),
        }
    }
}

/// Metadata header for the profile.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ProfileHeader {
    #[serde(rename = "ProfileIdentification", default)]
    pub profile_identification: String,

    #[serde(rename = "ProfileRevision", default)]
    pub profile_revision: String,

    /// Carries the file description.
    #[serde(rename = "ProfileName", default)]
    pub profile_name: String,

    #[serde(rename = "ProfileSource", default)]
    pub profile_source: String,

    /// `Device` or `CommunicationNetwork`.
    #[serde(rename = "ProfileClassID", default)]
    pub profile_class_id: String,

    #[serde(
        rename = "ISO15745Reference",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub iso15745_reference: Option<Iso15745Reference>,
}
