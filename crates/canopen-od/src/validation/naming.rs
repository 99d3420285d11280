// crates/canopen-od/src/validation/naming.rs

use super::{Finding, FindingCode, RuleContext};
use crate::error::Cancelled;
use crate::export::identifier::{base_identifier, field_identifier, is_reserved, struct_fields};
use std::collections::BTreeMap;

pub(super) fn check_names(
    ctx: &RuleContext<'_>,
    findings: &mut Vec<Finding>,
) -> Result<(), Cancelled> {
    let mut first_use: BTreeMap<&str, u16> = BTreeMap::new();

    for (index, object) in ctx.device.object_dictionary.iter() {
        ctx.checkpoint()?;
        let name = object.name.trim();
        if name.is_empty() {
            findings.push(
                Finding::warning(
                    FindingCode::EmptyName,
                    format!("Object 0x{index:04X} has no name"),
                )
                .at(index, None),
            );
        } else if let Some(first) = first_use.get(name) {
            findings.push(
                Finding::warning(
                    FindingCode::DuplicateName,
                    format!("Object 0x{index:04X} reuses the name '{name}' of 0x{first:04X}"),
                )
                .at(index, None),
            );
        } else {
            first_use.insert(name, index);
        }

        for (sub_index, sub) in &object.sub_objects {
            if sub.name.trim().is_empty() {
                findings.push(
                    Finding::warning(
                        FindingCode::EmptyName,
                        format!("Sub-index {sub_index} of 0x{index:04X} has no name"),
                    )
                    .at(index, Some(*sub_index)),
                );
            }
        }
    }
    Ok(())
}

/// Flags ARRAY/RECORD members whose generated C field names coincide or are
/// reserved C words.
pub(super) fn check_identifiers(
    ctx: &RuleContext<'_>,
    findings: &mut Vec<Finding>,
) -> Result<(), Cancelled> {
    for (index, object) in ctx.device.object_dictionary.iter() {
        if !object.object_type.is_complex() {
            continue;
        }
        ctx.checkpoint()?;

        let mut by_identifier: BTreeMap<String, Vec<u8>> = BTreeMap::new();
        for (sub_index, sub) in &object.sub_objects {
            let base = base_identifier(&sub.name, *sub_index);
            if is_reserved(&base) {
                findings.push(
                    Finding::warning(
                        FindingCode::ReservedIdentifier,
                        format!(
                            "Sub-index {sub_index} of 0x{index:04X} is named after the C word \
                             '{base}'; the field becomes '{base}_'"
                        ),
                    )
                    .at(index, Some(*sub_index)),
                );
            }
            by_identifier
                .entry(field_identifier(&sub.name, *sub_index))
                .or_default()
                .push(*sub_index);
        }
        for (identifier, subs) in by_identifier.iter().filter(|(_, subs)| subs.len() > 1) {
            let list = subs
                .iter()
                .map(u8::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            findings.push(
                Finding::warning(
                    FindingCode::IdentifierCollision,
                    format!(
                        "Sub-indices {list} of 0x{index:04X} all generate the field '{identifier}'"
                    ),
                )
                .at(index, None),
            );
        }

        // A name can also clash with a suffix generated for an earlier collision.
        for (sub_index, field) in struct_fields(object) {
            let Some(sub) = object.sub_objects.get(&sub_index) else {
                continue;
            };
            let raw = field_identifier(&sub.name, sub_index);
            let collided = by_identifier.get(&raw).is_some_and(|subs| subs.len() > 1);
            let expected = if collided {
                format!("{raw}_sub{sub_index}")
            } else {
                raw
            };
            if field != expected {
                findings.push(
                    Finding::warning(
                        FindingCode::IdentifierCollision,
                        format!(
                            "Sub-index {sub_index} of 0x{index:04X} generates '{expected}', which \
                             is already taken; the field becomes '{field}'"
                        ),
                    )
                    .at(index, Some(sub_index)),
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::device::Device;
    use crate::od::{OdObject, OdSubObject};
    use crate::types::{AccessSdo, DataType, ObjectType};
    use crate::validation::{FindingCode, ValidationOptions, validate};

    fn u8_sub(name: &str) -> OdSubObject {
        OdSubObject::new(name, DataType::Unsigned8, AccessSdo::ReadWrite, "0")
    }

    #[test]
    fn test_naming_findings() {
        let mut device = Device::minimal_profile();
        let od = &mut device.object_dictionary;
        od.insert(0x2000, OdObject::var("Speed", u8_sub("Speed")));
        od.insert(0x2001, OdObject::var("Speed", u8_sub("")));
        od.insert(
            0x2002,
            OdObject::new("Limits", ObjectType::Record)
                .with_sub(
                    0,
                    OdSubObject::new("Count", DataType::Unsigned8, AccessSdo::ReadOnly, "2"),
                )
                .with_sub(1, u8_sub("Max value"))
                .with_sub(2, u8_sub("Max-value")),
        );

        let found: Vec<_> = validate(&device, &ValidationOptions::default())
            .into_iter()
            .map(|f| (f.code, f.index, f.sub_index))
            .collect();
        assert_eq!(
            found,
            vec![
                (FindingCode::DuplicateName, Some(0x2001), None),
                (FindingCode::EmptyName, Some(0x2001), Some(0)),
                (FindingCode::IdentifierCollision, Some(0x2002), None),
            ]
        );
    }

    #[test]
    fn test_reserved_and_suffix_clash_findings() {
        let mut device = Device::minimal_profile();
        let od = &mut device.object_dictionary;
        od.insert(
            0x2000,
            OdObject::new("Keywords", ObjectType::Record)
                .with_sub(0, u8_sub("Count"))
                .with_sub(1, u8_sub("int")),
        );
        od.insert(
            0x2001,
            OdObject::new("Values", ObjectType::Array)
                .with_sub(0, u8_sub("Value"))
                .with_sub(1, u8_sub("Value"))
                .with_sub(2, u8_sub("Value sub1")),
        );

        let found: Vec<_> = validate(&device, &ValidationOptions::default())
            .into_iter()
            .filter(|f| {
                matches!(
                    f.code,
                    FindingCode::ReservedIdentifier | FindingCode::IdentifierCollision
                )
            })
            .map(|f| (f.code, f.index, f.sub_index))
            .collect();
        assert_eq!(
            found,
            vec![
                (FindingCode::ReservedIdentifier, Some(0x2000), Some(1)),
                (FindingCode::IdentifierCollision, Some(0x2001), None),
                (FindingCode::IdentifierCollision, Some(0x2001), Some(2)),
            ]
        );
    }
}
