// crates/canopen-od-xdd/src/resolver/mod.rs

//! Turns the raw XML model into a [`Device`].
//!
//! The model keeps every attribute as text; this is where the text is typed
//! and where missing required attributes are reported.

mod device;
mod od;
mod utils;

use crate::error::XddError;
use crate::model::{
    COMMUNICATION_PROFILE, DEVICE_PROFILE, Iso15745Profile, Iso15745ProfileContainer,
};
use canopen_od::Device;
use log::{debug, warn};

pub(crate) fn resolve_device(container: &Iso15745ProfileContainer) -> Result<Device, XddError> {
    // 1. Locate the two profile bodies. The communication profile may also be
    // recognised by its object list when `xsi:type` is missing.
    let communication = find_profile(container, COMMUNICATION_PROFILE, |profile| {
        profile.profile_body.application_layers.is_some()
    })
    .ok_or_else(|| XddError::Schema {
        location: "ISO15745ProfileContainer".to_string(),
        missing: "ProfileBody_CommunicationNetwork_CANopen",
    })?;
    let device_profile = find_profile(container, DEVICE_PROFILE, |profile| {
        profile.profile_body.device_identity.is_some()
    });
    if device_profile.is_none() {
        warn!(
            "No device profile found; identity and file metadata come from the communication profile"
        );
    }
    let primary = device_profile.unwrap_or(communication);

    let application_layers = communication
        .profile_body
        .application_layers
        .as_ref()
        .ok_or_else(|| XddError::Schema {
            location: "ProfileBody_CommunicationNetwork_CANopen".to_string(),
            missing: "ApplicationLayers",
        })?;

    // 2. Metadata and identity.
    let mut device = Device::new();
    device.file_info = device::resolve_file_info(primary)?;
    if let Some(identity) = &primary.profile_body.device_identity {
        device::resolve_identity(identity, &mut device.device_info)?;
    }
    if let Some(comments) = &primary.profile_body.comments {
        device.comments = device::resolve_comments(comments);
    }
    if let Some(sections) = &primary.profile_body.vendor_sections {
        device.vendor_sections = device::resolve_vendor_sections(sections);
    }

    // 3. Network settings. Commissioning supplies the node id needed to check
    // `$NODEID` values, so it is resolved before the objects.
    if let Some(transport) = &communication.profile_body.transport_layers {
        device.device_info.baud_rates = device::resolve_baud_rates(transport)?;
    }
    if let Some(management) = &communication.profile_body.network_management {
        device::resolve_features(management, &mut device.device_info)?;
        if let Some(commissioning) = &management.device_commissioning {
            device.commissioning = device::resolve_commissioning(commissioning)?;
        }
    }

    // 4. The object dictionary.
    let node_id = device.commissioning.node_id;
    for object in &application_layers.object_list.object {
        let (index, object) = od::resolve_object(object, node_id)?;
        if device.object_dictionary.insert(index, object).is_some() {
            warn!("CANopenObject {index:04X} is defined more than once; the last one wins");
        }
    }

    debug!(
        "Resolved XDD with {} objects and {} vendor sections",
        device.object_dictionary.len(),
        device.vendor_sections.len()
    );
    Ok(device)
}

fn find_profile<'a>(
    container: &'a Iso15745ProfileContainer,
    xsi_type: &str,
    fallback: impl Fn(&Iso15745Profile) -> bool,
) -> Option<&'a Iso15745Profile> {
    let declared = |profile: &&Iso15745Profile| {
        profile
            .profile_body
            .xsi_type
            .as_deref()
            .is_some_and(|t| t == xsi_type || t.ends_with(&format!(":{xsi_type}")))
    };
    container
        .profile
        .iter()
        .find(declared)
        .or_else(|| container.profile.iter().find(|p| fallback(p)))
}
