// crates/canopen-od-xdd/src/resolver/od.rs

use super::utils::{required, typed, typed_required};
use crate::error::XddError;
use crate::model::app_layers::{CanOpenObject, CanOpenSubObject, ValueAttributes};
use canopen_od::od::parse_value;
use canopen_od::utils::{parse_bool, parse_hex_u8, parse_hex_u16, parse_unsigned};
use canopen_od::{
    AccessPdo, AccessSdo, AccessSrdo, DataType, ObjectType, OdObject, OdSubObject, ValueError,
};
use log::{trace, warn};

/// Resolves one `CANopenObject` and its sub-objects.
pub(super) fn resolve_object(
    object: &CanOpenObject,
    node_id: u8,
) -> Result<(u16, OdObject), XddError> {
    let index_text = required(object.index.as_deref(), "CANopenObject", "index")?;
    let location = format!("CANopenObject {index_text}");
    let index = typed_required(Some(index_text), &location, "index", "hex index", parse_hex_u16)?;
    let name = required(object.name.as_deref(), &location, "name")?.to_string();
    let object_type = typed_required(
        object.object_type.as_deref(),
        &location,
        "objectType",
        "object type code",
        ObjectType::parse,
    )?;

    let resolved = match object_type {
        ObjectType::Var => {
            if !object.sub_object.is_empty() {
                warn!(
                    "{location} is a VAR; ignoring its {} CANopenSubObject elements",
                    object.sub_object.len()
                );
            }
            let sub_name = object.sub_name.clone().unwrap_or_else(|| name.clone());
            let sub = resolve_value(
                &object.value_attributes(),
                sub_name,
                None,
                &location,
                node_id,
            )?;
            OdObject::var(name, sub)
        }
        ObjectType::Array | ObjectType::Record => {
            let mut resolved = OdObject::new(name, object_type);
            for sub in &object.sub_object {
                let (sub_index, sub) =
                    resolve_sub_object(sub, object.data_type.as_deref(), &location, node_id)?;
                if resolved.sub_objects.insert(sub_index, sub).is_some() {
                    warn!("{location} defines sub-index {sub_index:02X} more than once");
                }
            }
            let declared: Option<usize> = typed(
                object.sub_number.as_deref(),
                &location,
                "subNumber",
                "sub-object count",
                parse_unsigned,
            )?;
            if let Some(declared) = declared
                && declared != object.sub_object.len()
            {
                warn!(
                    "{location} declares subNumber={declared} but has {} CANopenSubObject elements",
                    object.sub_object.len()
                );
            }
            resolved
        }
    };

    trace!(
        "Resolved object 0x{index:04X} '{}' with {} sub-objects",
        resolved.name,
        resolved.sub_objects.len()
    );
    Ok((index, resolved))
}

fn resolve_sub_object(
    sub: &CanOpenSubObject,
    parent_type: Option<&str>,
    parent_location: &str,
    node_id: u8,
) -> Result<(u8, OdSubObject), XddError> {
    let sub_index_text = required(sub.sub_index.as_deref(), parent_location, "subIndex")?;
    let location = format!("{parent_location} / CANopenSubObject {sub_index_text}");
    let sub_index = typed_required(
        Some(sub_index_text),
        &location,
        "subIndex",
        "hex sub-index",
        parse_hex_u8,
    )?;
    let name = required(sub.name.as_deref(), &location, "name")?.to_string();
    if let Some(object_type) = typed(
        sub.object_type.as_deref(),
        &location,
        "objectType",
        "object type code",
        ObjectType::parse,
    )? && object_type != ObjectType::Var
    {
        warn!("{location} declares objectType {object_type:?}; nested objects are read as VAR");
    }

    let value = resolve_value(&sub.value_attributes(), name, parent_type, &location, node_id)?;
    Ok((sub_index, value))
}

/// Types the value attributes shared by VAR objects and sub-objects.
fn resolve_value(
    attributes: &ValueAttributes,
    name: String,
    parent_type: Option<&str>,
    location: &str,
    node_id: u8,
) -> Result<OdSubObject, XddError> {
    let data_type_text = match (attributes.data_type.as_deref(), parent_type) {
        (Some(text), _) => Some(text),
        (None, Some(parent)) => {
            warn!("{location} has no dataType, using its parent's {parent}");
            Some(parent)
        }
        (None, None) => None,
    };
    let data_type = typed_required(
        data_type_text,
        location,
        "dataType",
        "data type code",
        DataType::parse,
    )?;
    let access_sdo = typed_required(
        attributes.access_type.as_deref(),
        location,
        "accessType",
        "access type",
        AccessSdo::parse,
    )?;

    let checked = |value: Option<&str>, attribute: &'static str| {
        typed(value, location, attribute, data_type.name(), |text| {
            match parse_value(data_type, text, node_id) {
                // Range violations are left for the validator to report.
                Ok(_) | Err(ValueError::OutOfRange { .. }) => Some(text.to_string()),
                Err(ValueError::Unparseable { .. }) => None,
            }
        })
    };
    let default_value = checked(attributes.default_value.as_deref(), "defaultValue")?;
    let actual_value = checked(attributes.actual_value.as_deref(), "actualValue")?;
    let low_limit = checked(attributes.low_limit.as_deref(), "lowLimit")?;
    let high_limit = checked(attributes.high_limit.as_deref(), "highLimit")?;

    let pdo_mapping = typed(
        attributes.pdo_mapping_flag.as_deref(),
        location,
        "PDOmappingFlag",
        "boolean",
        parse_bool,
    )?;
    let access_pdo = typed(
        attributes.pdo_mapping.as_deref(),
        location,
        "PDOmapping",
        "PDO mapping",
        AccessPdo::from_xdd_token,
    )?
    .unwrap_or(if pdo_mapping == Some(true) {
        AccessPdo::Optional
    } else {
        AccessPdo::No
    });
    let access_srdo = typed(
        attributes.srdo_mapping.as_deref(),
        location,
        "SRDOmapping",
        "SRDO mapping",
        AccessSrdo::parse,
    )?
    .unwrap_or(AccessSrdo::No);

    Ok(OdSubObject {
        name,
        data_type,
        access_sdo,
        access_pdo,
        access_srdo,
        default_value: default_value.unwrap_or_default(),
        actual_value,
        low_limit,
        high_limit,
        pdo_mapping,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(index: &str, data_type: &str, default_value: &str) -> CanOpenObject {
        let mut object = CanOpenObject {
            index: Some(index.into()),
            name: Some("Value".into()),
            object_type: Some("7".into()),
            ..Default::default()
        };
        object.set_value_attributes(ValueAttributes {
            data_type: Some(data_type.into()),
            access_type: Some("rw".into()),
            default_value: Some(default_value.into()),
            ..Default::default()
        });
        object
    }

    #[test]
    fn test_var_value_lives_in_sub_zero() {
        let (index, object) = resolve_object(&var("2000", "0006", "0x10"), 0).unwrap();
        assert_eq!(index, 0x2000);
        let sub = object.sub(0).unwrap();
        assert_eq!(sub.name, "Value");
        assert_eq!(sub.data_type, DataType::Unsigned16);
        assert_eq!(sub.default_value, "0x10");
        assert_eq!(sub.access_pdo, AccessPdo::No);
        assert_eq!(sub.access_srdo, AccessSrdo::No);
    }

    #[test]
    fn test_var_value_name_comes_from_sub_name() {
        let mut object = var("2000", "0006", "0");
        object.sub_name = Some("Value setpoint".into());
        let (_, object) = resolve_object(&object, 0).unwrap();
        assert_eq!(object.name, "Value");
        assert_eq!(object.sub(0).unwrap().name, "Value setpoint");
    }

    #[test]
    fn test_unparseable_default_is_a_type_error() {
        let err = resolve_object(&var("2000", "0006", "ten"), 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "CANopenObject 2000: defaultValue=\"ten\" is not a valid UNSIGNED16"
        );
    }

    #[test]
    fn test_out_of_range_default_is_kept() {
        let (_, object) = resolve_object(&var("2000", "0005", "300"), 0).unwrap();
        assert_eq!(object.sub(0).unwrap().default_value, "300");
    }

    #[test]
    fn test_sub_object_inherits_parent_data_type() {
        let mut array = CanOpenObject {
            index: Some("6000".into()),
            name: Some("Inputs".into()),
            object_type: Some("8".into()),
            data_type: Some("0005".into()),
            ..Default::default()
        };
        array.sub_object.push(CanOpenSubObject {
            sub_index: Some("01".into()),
            name: Some("Input 1".into()),
            access_type: Some("ro".into()),
            pdo_mapping: Some("TPDO".into()),
            ..Default::default()
        });

        let (_, object) = resolve_object(&array, 0).unwrap();
        let sub = object.sub(1).unwrap();
        assert_eq!(sub.data_type, DataType::Unsigned8);
        assert_eq!(sub.access_pdo, AccessPdo::Optional);
        assert_eq!(sub.default_value, "");
    }

    #[test]
    fn test_missing_sub_index_names_the_parent() {
        let mut record = var("1018", "0007", "0");
        record.object_type = Some("9".into());
        record.sub_object.push(CanOpenSubObject {
            name: Some("Vendor-ID".into()),
            ..Default::default()
        });
        let err = resolve_object(&record, 0).unwrap_err();
        assert!(matches!(
            err,
            XddError::Schema {
                ref location,
                missing: "subIndex"
            } if location == "CANopenObject 1018"
        ));
    }
}
