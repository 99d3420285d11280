// crates/canopen-od/src/validation/pdo.rs

use super::{Finding, FindingCode, RuleContext};
use crate::error::Cancelled;
use crate::od::{OdObject, OdSubObject};
use crate::pdo::{CobId, PdoDirection, PdoMappingEntry};
use crate::types::DataType;
use log::trace;
use std::collections::BTreeMap;

/// Checks every RPDO/TPDO mapping parameter object.
pub(super) fn check_mappings(
    ctx: &RuleContext<'_>,
    findings: &mut Vec<Finding>,
) -> Result<(), Cancelled> {
    for (index, object) in ctx.device.object_dictionary.iter() {
        let Some(direction) = PdoDirection::of_mapping(index) else {
            continue;
        };
        ctx.checkpoint()?;
        check_mapping(ctx, index, direction, object, findings);
    }
    Ok(())
}

fn check_mapping(
    ctx: &RuleContext<'_>,
    index: u16,
    direction: PdoDirection,
    object: &OdObject,
    findings: &mut Vec<Finding>,
) {
    // An unparseable or missing count is reported by the structure and value rules.
    let Some(count) = object.declared_count(ctx.node_id) else {
        return;
    };
    let od = &ctx.device.object_dictionary;
    let mut total_bits: u32 = 0;

    for n in 1..=count.min(u64::from(u8::MAX)) {
        let sub_index = n as u8;
        let mut report = |finding: Finding| findings.push(finding.at(index, Some(sub_index)));

        let Some(raw) = object
            .sub(sub_index)
            .and_then(|sub| sub.parsed_effective(ctx.node_id).ok())
            .and_then(|value| value.as_u64())
            .and_then(|value| u32::try_from(value).ok())
        else {
            report(Finding::error(
                FindingCode::PdoMappingInvalidEntry,
                format!(
                    "{} mapping 0x{index:04X} entry {sub_index} is missing or not a 32-bit mapping value",
                    direction.name()
                ),
            ));
            continue;
        };

        let entry = PdoMappingEntry::from_u32(raw);
        if entry.length_bits == 0 {
            report(Finding::error(
                FindingCode::PdoMappingInvalidEntry,
                format!(
                    "{} mapping 0x{index:04X} entry {sub_index} (0x{raw:08X}) maps zero bits",
                    direction.name()
                ),
            ));
            continue;
        }
        total_bits += u32::from(entry.length_bits);

        // Dummy entries name a data type rather than an object.
        let expected_bits = if entry.is_dummy() {
            DataType::from_code(entry.index).and_then(DataType::bit_length)
        } else {
            match od.get_sub(entry.index, entry.sub_index) {
                None => {
                    report(Finding::error(
                        FindingCode::PdoMappingMissingTarget,
                        format!(
                            "{} mapping 0x{index:04X} entry {sub_index} references 0x{:04X}sub{}, which does not exist",
                            direction.name(),
                            entry.index,
                            entry.sub_index
                        ),
                    ));
                    continue;
                }
                Some(target) => {
                    if !target.is_pdo_mappable() {
                        report(not_mappable(index, sub_index, &entry, target));
                    }
                    target.data_type.bit_length()
                }
            }
        };

        if let Some(expected) = expected_bits
            && expected != u32::from(entry.length_bits)
        {
            report(Finding::warning(
                FindingCode::PdoMappingLengthMismatch,
                format!(
                    "Mapping 0x{index:04X} entry {sub_index} maps {} bits of 0x{:04X}sub{}, whose type has {expected}",
                    entry.length_bits, entry.index, entry.sub_index
                ),
            ));
        }
    }

    trace!(
        "{} mapping 0x{index:04X}: {count} entries, {total_bits} bits",
        direction.name()
    );
    if total_bits > ctx.options.max_pdo_bits {
        findings.push(
            Finding::error(
                FindingCode::PdoMappingOverflow,
                format!(
                    "{} mapping 0x{index:04X} maps {total_bits} bits, exceeding the {}-bit limit",
                    direction.name(),
                    ctx.options.max_pdo_bits
                ),
            )
            .at(index, None),
        );
    }
}

fn not_mappable(
    index: u16,
    sub_index: u8,
    entry: &PdoMappingEntry,
    target: &OdSubObject,
) -> Finding {
    Finding::error(
        FindingCode::PdoMappingNotMappable,
        format!(
            "Mapping 0x{index:04X} entry {sub_index} references '{}' (0x{:04X}sub{}), which is not PDO-mappable",
            target.name, entry.index, entry.sub_index
        ),
    )
}

/// Checks sub-index 1 of every PDO communication parameter object.
pub(super) fn check_cob_ids(
    ctx: &RuleContext<'_>,
    findings: &mut Vec<Finding>,
) -> Result<(), Cancelled> {
    // (direction, extended frame, CAN id) -> first index using it
    let mut seen: BTreeMap<(bool, bool, u32), u16> = BTreeMap::new();

    for (index, object) in ctx.device.object_dictionary.iter() {
        let Some(direction) = PdoDirection::of_communication(index) else {
            continue;
        };
        ctx.checkpoint()?;

        // Missing or unparseable entries are reported by the structure and value rules.
        let Some(value) = object
            .sub(1)
            .and_then(|sub| sub.parsed_effective(ctx.node_id).ok())
            .and_then(|value| value.as_u64())
        else {
            continue;
        };
        let Ok(raw) = u32::try_from(value) else {
            findings.push(
                Finding::error(
                    FindingCode::CobIdOutOfRange,
                    format!("COB-ID 0x{value:X} of 0x{index:04X} does not fit 32 bits"),
                )
                .at(index, Some(1)),
            );
            continue;
        };

        let cob_id = CobId { raw };
        if !cob_id.is_enabled() {
            trace!("{} 0x{index:04X} is disabled", direction.name());
            continue;
        }
        if !cob_id.is_in_range() {
            findings.push(
                Finding::error(
                    FindingCode::CobIdOutOfRange,
                    format!(
                        "COB-ID 0x{:X} of {} 0x{index:04X} does not fit an 11-bit identifier",
                        cob_id.can_id(),
                        direction.name()
                    ),
                )
                .at(index, Some(1)),
            );
            continue;
        }

        let key = (
            direction == PdoDirection::Transmit,
            cob_id.is_extended(),
            cob_id.can_id(),
        );
        match seen.get(&key) {
            Some(first) => findings.push(
                Finding::error(
                    FindingCode::CobIdCollision,
                    format!(
                        "COB-ID 0x{:X} of {} 0x{index:04X} collides with 0x{first:04X}",
                        cob_id.can_id(),
                        direction.name()
                    ),
                )
                .at(index, Some(1)),
            ),
            None => {
                seen.insert(key, index);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::device::Device;
    use crate::od::{OdObject, OdSubObject};
    use crate::types::{AccessPdo, AccessSdo, DataType, ObjectType};
    use crate::validation::{Finding, FindingCode, ValidationOptions, validate};

    fn mappable(name: &str, data_type: DataType) -> OdSubObject {
        OdSubObject::new(name, data_type, AccessSdo::ReadWrite, "0")
            .with_access_pdo(AccessPdo::Optional)
    }

    fn mapping(entries: &[&str]) -> OdObject {
        let count = OdSubObject::new(
            "Number of mapped objects",
            DataType::Unsigned8,
            AccessSdo::ReadWrite,
            entries.len().to_string(),
        );
        let mut object = OdObject::new("TPDO mapping", ObjectType::Record).with_sub(0, count);
        for (n, value) in entries.iter().enumerate() {
            let sub = OdSubObject::new(
                format!("Mapped object {}", n + 1),
                DataType::Unsigned32,
                AccessSdo::ReadWrite,
                *value,
            );
            object = object.with_sub(n as u8 + 1, sub);
        }
        object
    }

    fn comm(name: &str, cob_id: &str) -> OdObject {
        OdObject::new(name, ObjectType::Record)
            .with_sub(
                0,
                OdSubObject::new(
                    "Highest sub-index",
                    DataType::Unsigned8,
                    AccessSdo::ReadOnly,
                    "1",
                ),
            )
            .with_sub(
                1,
                OdSubObject::new("COB-ID", DataType::Unsigned32, AccessSdo::ReadWrite, cob_id),
            )
    }

    fn device_with_targets() -> Device {
        let mut device = Device::minimal_profile();
        let od = &mut device.object_dictionary;
        od.insert(0x6000, OdObject::var("Input 32", mappable("Input 32", DataType::Unsigned32)));
        od.insert(0x6001, OdObject::var("Input 8", mappable("Input 8", DataType::Unsigned8)));
        od.insert(
            0x6002,
            OdObject::var(
                "Not mappable",
                OdSubObject::new("Not mappable", DataType::Unsigned8, AccessSdo::ReadWrite, "0"),
            ),
        );
        device
    }

    fn pdo_findings(device: &Device) -> Vec<Finding> {
        validate(device, &ValidationOptions::default())
            .into_iter()
            .filter(|f| {
                matches!(
                    f.code,
                    FindingCode::PdoMappingInvalidEntry
                        | FindingCode::PdoMappingMissingTarget
                        | FindingCode::PdoMappingNotMappable
                        | FindingCode::PdoMappingLengthMismatch
                        | FindingCode::PdoMappingOverflow
                        | FindingCode::CobIdOutOfRange
                        | FindingCode::CobIdCollision
                )
            })
            .collect()
    }

    #[test]
    fn test_mapping_of_exactly_64_bits_is_accepted() {
        let mut device = device_with_targets();
        device
            .object_dictionary
            .insert(0x1A00, mapping(&["0x60000020", "0x60000020"]));
        assert!(pdo_findings(&device).is_empty());
    }

    #[test]
    fn test_mapping_of_65_bits_overflows() {
        let mut device = device_with_targets();
        device.object_dictionary.insert(
            0x1A00,
            mapping(&["0x60000020", "0x60000020", "0x00010001"]),
        );
        let found = pdo_findings(&device);
        let overflow: Vec<_> = found
            .iter()
            .filter(|f| f.code == FindingCode::PdoMappingOverflow)
            .collect();
        assert_eq!(overflow.len(), 1);
        assert_eq!(overflow[0].index, Some(0x1A00));
        assert!(overflow[0].message.contains("65"));
    }

    #[test]
    fn test_mapping_entry_problems() {
        let mut device = device_with_targets();
        device.object_dictionary.insert(
            0x1600,
            mapping(&["0x70000108", "0x60020008", "0x60010010", "0x60000000"]),
        );
        let codes: Vec<_> = pdo_findings(&device).into_iter().map(|f| f.code).collect();
        assert_eq!(
            codes,
            vec![
                FindingCode::PdoMappingMissingTarget,
                FindingCode::PdoMappingNotMappable,
                FindingCode::PdoMappingLengthMismatch,
                FindingCode::PdoMappingInvalidEntry,
            ]
        );
    }

    #[test]
    fn test_only_active_entries_are_checked() {
        let mut device = device_with_targets();
        let mut object = mapping(&["0x60000020", "0x70000108"]);
        object.sub_objects.get_mut(&0).unwrap().default_value = "1".into();
        device.object_dictionary.insert(0x1A00, object);
        assert!(pdo_findings(&device).is_empty());
    }

    #[test]
    fn test_cob_id_collision_names_both_objects() {
        let mut device = Device::minimal_profile();
        device.commissioning.node_id = 1;
        let od = &mut device.object_dictionary;
        od.insert(0x1800, comm("TPDO1", "$NODEID+0x180"));
        od.insert(0x1801, comm("TPDO2", "0x181"));
        // Disabled and receive-side PDOs do not collide with transmit ones.
        od.insert(0x1802, comm("TPDO3", "0x80000181"));
        od.insert(0x1400, comm("RPDO1", "0x181"));

        let found = pdo_findings(&device);
        assert_eq!(found.len(), 1);
        let collision = &found[0];
        assert_eq!(collision.code, FindingCode::CobIdCollision);
        assert_eq!(collision.index, Some(0x1801));
        assert!(collision.message.contains("0x1800"));
        assert!(collision.message.contains("0x1801"));
    }

    #[test]
    fn test_cob_id_out_of_range() {
        let mut device = Device::minimal_profile();
        let od = &mut device.object_dictionary;
        od.insert(0x1800, comm("TPDO1", "0x800"));
        od.insert(0x1801, comm("TPDO2", "0x20000800"));
        let found = pdo_findings(&device);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, FindingCode::CobIdOutOfRange);
        assert_eq!(found[0].index, Some(0x1800));
    }
}
