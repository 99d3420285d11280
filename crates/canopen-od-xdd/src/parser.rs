// src/parser.rs

use crate::error::XddError;
use crate::model;
use crate::resolver::resolve_device;
use canopen_od::Device;

/// Parses an XDD (or XDC) document into a [`Device`].
///
/// Elements the engine does not model, such as `ApplicationProcess`, are
/// skipped. A `dummyUsage` list is ignored because the writer regenerates it.
///
/// # Errors
/// - `XddError::XmlParsing` when the text is not well-formed XML.
/// - `XddError::Schema` when the communication profile, its object list or a
///   required attribute is absent.
/// - `XddError::Type` when an attribute does not parse under its type.
pub fn load_xdd_from_str(xml_content: &str) -> Result<Device, XddError> {
    // 1. Deserialize the raw XML string into our internal model.
    let container: model::Iso15745ProfileContainer = quick_xml::de::from_str(xml_content)?;

    // 2. Type every attribute and assemble the device.
    resolve_device(&container)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_xml() {
        let result = load_xdd_from_str("<ISO15745ProfileContainer><ISO15745Profile>");
        assert!(matches!(result, Err(XddError::XmlParsing(_))));
    }

    #[test]
    fn test_missing_communication_profile() {
        let xml = r#"<ISO15745ProfileContainer>
  <ISO15745Profile>
    <ProfileHeader/>
    <ProfileBody xsi:type="ProfileBody_Device_CANopen" fileName="x.xdd"/>
  </ISO15745Profile>
</ISO15745ProfileContainer>"#;
        let result = load_xdd_from_str(xml);
        assert!(matches!(
            result,
            Err(XddError::Schema {
                missing: "ProfileBody_CommunicationNetwork_CANopen",
                ..
            })
        ));
    }
}
