// crates/canopen-od-xdd/src/resolver/device.rs

//! File metadata, identity and network settings.

use super::utils::{parse_file_version, timestamp, typed, typed_required};
use crate::error::XddError;
use crate::model::Iso15745Profile;
use crate::model::extensions::{Comments, VendorSections};
use crate::model::identity::DeviceIdentity;
use crate::model::net_mgmt::{self, NetworkManagement, TransportLayers};
use canopen_od::utils::{parse_bool, parse_unsigned};
use canopen_od::{BaudRates, DeviceCommissioning, DeviceInfo, FileInfo, VendorSection};
use log::{debug, warn};

const BODY: &str = "ProfileBody";

pub(super) fn resolve_file_info(profile: &Iso15745Profile) -> Result<FileInfo, XddError> {
    let body = &profile.profile_body;
    let (file_version, file_revision) = typed(
        body.file_version.as_deref(),
        BODY,
        "fileVersion",
        "file version",
        parse_file_version,
    )?
    .unwrap_or((0, 0));

    Ok(FileInfo {
        file_name: body.file_name.clone().unwrap_or_default(),
        file_version,
        file_revision,
        eds_version: body.eds_version.clone().unwrap_or_default(),
        description: profile.profile_header.profile_name.clone(),
        creation: timestamp(
            body.file_creation_date.as_deref(),
            body.file_creation_time.as_deref(),
            BODY,
            "fileCreationDate",
            "fileCreationTime",
        )?,
        created_by: body.file_creator.clone().unwrap_or_default(),
        modification: timestamp(
            body.file_modification_date.as_deref(),
            body.file_modification_time.as_deref(),
            BODY,
            "fileModificationDate",
            "fileModificationTime",
        )?,
        modified_by: body.file_modified_by.clone().unwrap_or_default(),
    })
}

pub(super) fn resolve_identity(
    identity: &DeviceIdentity,
    info: &mut DeviceInfo,
) -> Result<(), XddError> {
    const LOCATION: &str = "DeviceIdentity";
    let number = |value: &Option<String>, element: &'static str| {
        typed(text(value), LOCATION, element, "32-bit number", parse_unsigned::<u32>)
    };

    info.vendor_name = text(&identity.vendor_name).unwrap_or_default().to_string();
    info.vendor_number = number(&identity.vendor_id, "vendorID")?;
    info.product_name = text(&identity.product_name).unwrap_or_default().to_string();
    info.product_number = number(&identity.product_id, "productID")?;
    info.revision_number = number(&identity.revision_number, "revisionNumber")?;
    info.order_code = text(&identity.order_number).unwrap_or_default().to_string();
    Ok(())
}

/// Empty elements count as absent.
fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|t| !t.is_empty())
}

pub(super) fn resolve_comments(comments: &Comments) -> Vec<String> {
    comments.line.iter().map(|line| line.text.clone()).collect()
}

pub(super) fn resolve_vendor_sections(sections: &VendorSections) -> Vec<VendorSection> {
    sections
        .section
        .iter()
        .filter_map(|section| {
            let Some(name) = section.name.clone() else {
                warn!("Dropping a vendor section without a name");
                return None;
            };
            let entries = section
                .entry
                .iter()
                .filter_map(|entry| match &entry.key {
                    Some(key) => Some((key.clone(), entry.value.clone())),
                    None => {
                        warn!("Dropping an entry without a key from vendor section '{name}'");
                        None
                    }
                })
                .collect();
            Some(VendorSection { name, entries })
        })
        .collect()
}

/// `"250 Kbps"` -> 250. `"1 Mbps"` is also accepted.
fn parse_baud_rate(text: &str) -> Option<u16> {
    let text = text.trim();
    let (number, unit) = text.split_once(' ').unwrap_or((text, "Kbps"));
    let number: u16 = number.parse().ok()?;
    match unit.trim().to_ascii_lowercase().as_str() {
        "kbps" => Some(number),
        "mbps" => number.checked_mul(1000),
        _ => None,
    }
}

pub(super) fn resolve_baud_rates(transport: &TransportLayers) -> Result<BaudRates, XddError> {
    const LOCATION: &str = "supportedBaudRate";
    let mut rates = BaudRates::default();
    for supported in &transport.physical_layer.baud_rate.supported_baud_rate {
        if supported.value.eq_ignore_ascii_case("auto-baudRate") {
            debug!("Ignoring auto-baudRate");
            continue;
        }
        let kbps = typed(
            Some(supported.value.as_str()),
            LOCATION,
            "value",
            "CANopen bit rate",
            |text| parse_baud_rate(text).filter(|kbps| BaudRates::RATES.contains(kbps)),
        )?;
        if let Some(kbps) = kbps {
            rates.set(kbps, true);
        }
    }
    Ok(rates)
}

pub(super) fn resolve_features(
    management: &NetworkManagement,
    info: &mut DeviceInfo,
) -> Result<(), XddError> {
    const LOCATION: &str = "CANopenGeneralFeatures";
    let features = &management.general_features;
    let flag = |value: &Option<String>, attribute: &'static str| {
        typed(value.as_deref(), LOCATION, attribute, "boolean", parse_bool)
            .map(Option::unwrap_or_default)
    };

    info.group_messaging = flag(&features.group_messaging, "groupMessaging")?;
    info.dynamic_channels_supported = typed(
        features.dynamic_channels.as_deref(),
        LOCATION,
        "dynamicChannels",
        "8-bit number",
        parse_unsigned,
    )?
    .unwrap_or(0);
    info.granularity = typed(
        features.granularity.as_deref(),
        LOCATION,
        "granularity",
        "8-bit number",
        parse_unsigned,
    )?
    .unwrap_or(0);
    info.nr_of_rx_pdo = typed(
        features.nr_of_rx_pdo.as_deref(),
        LOCATION,
        "nrOfRxPDO",
        "16-bit number",
        parse_unsigned,
    )?
    .unwrap_or(0);
    info.nr_of_tx_pdo = typed(
        features.nr_of_tx_pdo.as_deref(),
        LOCATION,
        "nrOfTxPDO",
        "16-bit number",
        parse_unsigned,
    )?
    .unwrap_or(0);
    info.simple_boot_up_slave = flag(&features.boot_up_slave, "bootUpSlave")?;
    info.lss_supported = flag(&features.layer_setting_service_slave, "layerSettingServiceSlave")?;

    if let Some(master) = &management.master_features {
        info.simple_boot_up_master = typed(
            master.boot_up_master.as_deref(),
            "CANopenMasterFeatures",
            "bootUpMaster",
            "boolean",
            parse_bool,
        )?
        .unwrap_or_default();
    }
    Ok(())
}

pub(super) fn resolve_commissioning(
    commissioning: &net_mgmt::DeviceCommissioning,
) -> Result<DeviceCommissioning, XddError> {
    const LOCATION: &str = "deviceCommissioning";
    Ok(DeviceCommissioning {
        node_id: typed_required(
            commissioning.node_id.as_deref(),
            LOCATION,
            "nodeID",
            "node id",
            parse_unsigned,
        )?,
        node_name: commissioning.node_name.clone().unwrap_or_default(),
        baud_rate: typed(
            commissioning.actual_baud_rate.as_deref(),
            LOCATION,
            "actualBaudRate",
            "CANopen bit rate",
            parse_baud_rate,
        )?
        .unwrap_or(0),
        net_number: typed(
            commissioning.network_number.as_deref(),
            LOCATION,
            "networkNumber",
            "32-bit number",
            parse_unsigned,
        )?
        .unwrap_or(0),
        network_name: commissioning.network_name.clone().unwrap_or_default(),
        canopen_manager: typed(
            commissioning.canopen_manager.as_deref(),
            LOCATION,
            "CANopenManager",
            "boolean",
            parse_bool,
        )?
        .unwrap_or_default(),
        lss_serial_number: typed(
            commissioning.lss_serial_number.as_deref(),
            LOCATION,
            "LSS_SerialNumber",
            "32-bit number",
            parse_unsigned,
        )?
        .unwrap_or(0),
    })
}
