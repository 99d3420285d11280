//! Serializes a [`Device`] into an XDD document.
//!
//! The public model is first converted into the internal `model` structs, which
//! `quick-xml` then writes out.

mod od;

use crate::error::XddError;
use crate::model::extensions::{CommentLine, Comments, VendorEntry, VendorSection, VendorSections};
use crate::model::header::{Iso15745Reference, ProfileHeader};
use crate::model::identity::DeviceIdentity;
use crate::model::net_mgmt::{
    self, BaudRate, GeneralFeatures, MasterFeatures, NetworkManagement, PhysicalLayer,
    SupportedBaudRate, TransportLayers,
};
use crate::model::{
    COMMUNICATION_PROFILE, DEVICE_PROFILE, Iso15745Profile, Iso15745ProfileContainer, ProfileBody,
};
use canopen_od::{BaudRates, Device, FileInfo};
use chrono::NaiveDateTime;
use core::fmt::Write;
use log::debug;
use serde::Serialize;

/// Serializes `device` into an XDD XML string.
///
/// The output holds a device profile (identity, comments, vendor sections)
/// and a communication profile (object list, bit rates, network settings).
pub fn save_xdd_to_string(device: &Device) -> Result<String, XddError> {
    // 1. Device profile.
    let device_profile = build_device_profile(device);

    // 2. Communication profile.
    let comm_profile = build_comm_profile(device);

    // 3. Wrap in container.
    let container = Iso15745ProfileContainer {
        profile: vec![device_profile, comm_profile],
        ..Default::default()
    };

    // 4. Serialize to string.
    let mut buffer = String::new();
    write!(&mut buffer, "{}", "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\r\n")?;

    let mut serializer = quick_xml::se::Serializer::new(&mut buffer);
    serializer.indent(' ', 2);

    container.serialize(serializer)?;
    debug!(
        "Serialized XDD with {} objects",
        device.object_dictionary.len()
    );
    Ok(buffer)
}

fn build_header(file_info: &FileInfo, class_id: &str) -> ProfileHeader {
    ProfileHeader {
        profile_identification: "CANopen device profile".to_string(),
        profile_revision: "1".to_string(),
        profile_name: file_info.description.clone(),
        profile_source: String::new(),
        profile_class_id: class_id.to_string(),
        iso15745_reference: Some(Iso15745Reference::canopen()),
    }
}

/// The file attributes repeated on both profile bodies.
fn build_body(file_info: &FileInfo, xsi_type: &str) -> ProfileBody {
    let date = |at: Option<NaiveDateTime>| at.map(|at| at.format("%Y-%m-%d").to_string());
    let time = |at: Option<NaiveDateTime>| at.map(|at| at.format("%H:%M:%S").to_string());
    ProfileBody {
        xsi_type: Some(xsi_type.to_string()),
        file_name: Some(file_info.file_name.clone()),
        file_creator: Some(file_info.created_by.clone()),
        file_creation_date: date(file_info.creation),
        file_creation_time: time(file_info.creation),
        file_modified_by: Some(file_info.modified_by.clone()),
        file_modification_date: date(file_info.modification),
        file_modification_time: time(file_info.modification),
        file_version: Some(format!(
            "{}.{}",
            file_info.file_version, file_info.file_revision
        )),
        eds_version: Some(file_info.eds_version.clone()),
        ..Default::default()
    }
}

fn build_device_profile(device: &Device) -> Iso15745Profile {
    let info = &device.device_info;
    let text = |value: &str| (!value.is_empty()).then(|| value.to_string());
    let number = |value: Option<u32>| value.map(|n| format!("0x{n:08X}"));

    let mut body = build_body(&device.file_info, DEVICE_PROFILE);
    body.device_identity = Some(DeviceIdentity {
        vendor_name: text(&info.vendor_name),
        vendor_id: number(info.vendor_number),
        product_name: text(&info.product_name),
        product_id: number(info.product_number),
        revision_number: number(info.revision_number),
        order_number: text(&info.order_code),
    });
    if !device.comments.is_empty() {
        body.comments = Some(Comments {
            line: device
                .comments
                .iter()
                .map(|line| CommentLine { text: line.clone() })
                .collect(),
        });
    }
    if !device.vendor_sections.is_empty() {
        body.vendor_sections = Some(VendorSections {
            section: device
                .vendor_sections
                .iter()
                .map(|section| VendorSection {
                    name: Some(section.name.clone()),
                    entry: section
                        .entries
                        .iter()
                        .map(|(key, value)| VendorEntry {
                            key: Some(key.clone()),
                            value: value.clone(),
                        })
                        .collect(),
                })
                .collect(),
        });
    }

    Iso15745Profile {
        profile_header: build_header(&device.file_info, "Device"),
        profile_body: body,
    }
}

fn build_comm_profile(device: &Device) -> Iso15745Profile {
    let mut body = build_body(&device.file_info, COMMUNICATION_PROFILE);
    body.application_layers = Some(od::build_application_layers(&device.object_dictionary));
    body.transport_layers = Some(build_transport_layers(&device.device_info.baud_rates));
    body.network_management = Some(build_network_management(device));

    Iso15745Profile {
        profile_header: build_header(&device.file_info, "CommunicationNetwork"),
        profile_body: body,
    }
}

fn build_transport_layers(rates: &BaudRates) -> TransportLayers {
    TransportLayers {
        physical_layer: PhysicalLayer {
            baud_rate: BaudRate {
                supported_baud_rate: BaudRates::RATES
                    .iter()
                    .filter(|kbps| rates.supports(**kbps))
                    .map(|kbps| SupportedBaudRate {
                        value: format!("{kbps} Kbps"),
                    })
                    .collect(),
            },
        },
    }
}

fn build_network_management(device: &Device) -> NetworkManagement {
    let info = &device.device_info;
    let commissioning = &device.commissioning;
    NetworkManagement {
        general_features: GeneralFeatures {
            group_messaging: Some(info.group_messaging.to_string()),
            dynamic_channels: Some(info.dynamic_channels_supported.to_string()),
            granularity: Some(info.granularity.to_string()),
            nr_of_rx_pdo: Some(info.nr_of_rx_pdo.to_string()),
            nr_of_tx_pdo: Some(info.nr_of_tx_pdo.to_string()),
            boot_up_slave: Some(info.simple_boot_up_slave.to_string()),
            layer_setting_service_slave: Some(info.lss_supported.to_string()),
        },
        master_features: Some(MasterFeatures {
            boot_up_master: Some(info.simple_boot_up_master.to_string()),
        }),
        device_commissioning: Some(net_mgmt::DeviceCommissioning {
            node_id: Some(commissioning.node_id.to_string()),
            node_name: Some(commissioning.node_name.clone()),
            actual_baud_rate: Some(format!("{} Kbps", commissioning.baud_rate)),
            network_number: Some(commissioning.net_number.to_string()),
            network_name: Some(commissioning.network_name.clone()),
            canopen_manager: Some(commissioning.canopen_manager.to_string()),
            lss_serial_number: Some(commissioning.lss_serial_number.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_starts_with_declaration() {
        let xml = save_xdd_to_string(&Device::minimal_profile()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\r\n"));
        assert!(xml.contains("<ISO15745ProfileContainer"));
        assert!(xml.contains("xsi:type=\"ProfileBody_CommunicationNetwork_CANopen\""));
    }

    #[test]
    fn test_file_version_carries_revision() {
        let mut device = Device::minimal_profile();
        device.file_info.file_revision = 3;
        let xml = save_xdd_to_string(&device).unwrap();
        assert!(xml.contains("fileVersion=\"1.3\""));
    }

    #[test]
    fn test_unset_identity_numbers_are_left_out() {
        let mut device = Device::new();
        device.device_info.vendor_number = Some(0x1234);
        let xml = save_xdd_to_string(&device).unwrap();
        assert!(xml.contains("<vendorID>0x00001234</vendorID>"));
        assert!(!xml.contains("<productID>"));
    }
}
