//! Builds the `<ApplicationLayers>` element from an [`ObjectDictionary`].

use crate::model::app_layers::{
    ApplicationLayers, CanOpenObject, CanOpenObjectList, CanOpenSubObject, Dummy, DummyUsage,
    ValueAttributes,
};
use canopen_od::od::format_index;
use canopen_od::{ObjectDictionary, ObjectType, OdObject, OdSubObject};
use log::trace;

pub(super) fn build_application_layers(od: &ObjectDictionary) -> ApplicationLayers {
    ApplicationLayers {
        object_list: CanOpenObjectList {
            object: od
                .iter()
                .map(|(index, object)| build_object(index, object))
                .collect(),
        },
        dummy_usage: Some(build_dummy_usage()),
    }
}

fn build_object(index: u16, object: &OdObject) -> CanOpenObject {
    trace!("Building CANopenObject {}", format_index(index));
    let mut element = CanOpenObject {
        index: Some(format_index(index)),
        name: Some(object.name.clone()),
        object_type: Some(object.object_type.code().to_string()),
        ..Default::default()
    };

    match object.object_type {
        ObjectType::Var => {
            if let Some(sub) = object.sub(0) {
                if sub.name != object.name {
                    element.sub_name = Some(sub.name.clone());
                }
                element.set_value_attributes(value_attributes(sub));
            }
        }
        ObjectType::Array | ObjectType::Record => {
            element.sub_number = Some(object.sub_objects.len().to_string());
            element.sub_object = object
                .sub_objects
                .iter()
                .map(|(sub_index, sub)| {
                    let mut child = CanOpenSubObject {
                        sub_index: Some(format!("{sub_index:02X}")),
                        name: Some(sub.name.clone()),
                        object_type: Some(ObjectType::Var.code().to_string()),
                        ..Default::default()
                    };
                    child.set_value_attributes(value_attributes(sub));
                    child
                })
                .collect();
        }
    }
    element
}

fn value_attributes(sub: &OdSubObject) -> ValueAttributes {
    ValueAttributes {
        data_type: Some(format!("{:04X}", sub.data_type.code())),
        access_type: Some(sub.access_sdo.token().to_string()),
        default_value: Some(sub.default_value.clone()),
        actual_value: sub.actual_value.clone(),
        low_limit: sub.low_limit.clone(),
        high_limit: sub.high_limit.clone(),
        pdo_mapping: Some(sub.access_pdo.xdd_token().to_string()),
        srdo_mapping: Some(sub.access_srdo.token().to_string()),
        pdo_mapping_flag: sub.pdo_mapping.map(|flag| flag.to_string()),
    }
}

/// Dummy entries 0x0001..=0x0007 stand in for the basic data types in PDO
/// mappings. All of them are declared usable.
fn build_dummy_usage() -> DummyUsage {
    DummyUsage {
        dummy: (0x0001..=0x0007u16)
            .map(|index| Dummy {
                entry: format!("Dummy{index:04X}=1"),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopen_od::{AccessPdo, AccessSdo, DataType, Device};

    #[test]
    fn test_var_carries_value_on_the_object() {
        let device = Device::minimal_profile();
        let layers = build_application_layers(&device.object_dictionary);
        let device_type = &layers.object_list.object[0];
        assert_eq!(device_type.index.as_deref(), Some("1000"));
        assert_eq!(device_type.object_type.as_deref(), Some("7"));
        assert_eq!(device_type.data_type.as_deref(), Some("0007"));
        assert!(device_type.sub_object.is_empty());
        assert_eq!(device_type.sub_name, None);
    }

    #[test]
    fn test_var_with_distinct_value_name_writes_sub_name() {
        let mut device = Device::minimal_profile();
        device
            .object_dictionary
            .modify(0x1001, |object| {
                if let Some(sub) = object.sub_objects.get_mut(&0) {
                    sub.name = "Error flags".into();
                }
            })
            .unwrap();
        let layers = build_application_layers(&device.object_dictionary);
        let error_register = &layers.object_list.object[1];
        assert_eq!(error_register.index.as_deref(), Some("1001"));
        assert_eq!(error_register.sub_name.as_deref(), Some("Error flags"));
    }

    #[test]
    fn test_record_lists_every_sub_object() {
        let device = Device::minimal_profile();
        let layers = build_application_layers(&device.object_dictionary);
        let identity = &layers.object_list.object[2];
        assert_eq!(identity.index.as_deref(), Some("1018"));
        assert_eq!(identity.sub_number.as_deref(), Some("5"));
        assert_eq!(identity.sub_object[0].sub_index.as_deref(), Some("00"));
        assert_eq!(identity.data_type, None);
    }

    #[test]
    fn test_required_pdo_access_is_written_as_default() {
        let sub = OdSubObject::new("Output", DataType::Unsigned8, AccessSdo::ReadWrite, "0")
            .with_access_pdo(AccessPdo::Required);
        let attributes = value_attributes(&sub);
        assert_eq!(attributes.pdo_mapping.as_deref(), Some("default"));
        assert_eq!(attributes.pdo_mapping_flag, None);
    }

    #[test]
    fn test_dummy_usage_lists_seven_entries() {
        let usage = build_dummy_usage();
        assert_eq!(usage.dummy.len(), 7);
        assert_eq!(usage.dummy[0].entry, "Dummy0001=1");
    }
}
