// crates/canopen-od/src/validation/structure.rs

use super::{Finding, FindingCode, RuleContext};
use crate::error::Cancelled;
use crate::types::ObjectType;

pub(super) fn check_mandatory(
    ctx: &RuleContext<'_>,
    findings: &mut Vec<Finding>,
) -> Result<(), Cancelled> {
    let od = &ctx.device.object_dictionary;
    for required in &ctx.options.mandatory_objects {
        ctx.checkpoint()?;
        match od.get(required.index) {
            None => findings.push(
                Finding::error(
                    FindingCode::MandatoryObjectMissing,
                    format!(
                        "Mandatory object 0x{:04X} ({}) is missing",
                        required.index, required.name
                    ),
                )
                .at(required.index, None),
            ),
            Some(object) if object.object_type != required.object_type => findings.push(
                Finding::error(
                    FindingCode::ObjectTypeMismatch,
                    format!(
                        "Mandatory object 0x{:04X} ({}) must be a {}, found {}",
                        required.index, required.name, required.object_type, object.object_type
                    ),
                )
                .at(required.index, None),
            ),
            Some(_) => {}
        }
    }
    Ok(())
}

pub(super) fn check_structure(
    ctx: &RuleContext<'_>,
    findings: &mut Vec<Finding>,
) -> Result<(), Cancelled> {
    for (index, object) in ctx.device.object_dictionary.iter() {
        ctx.checkpoint()?;

        if object.sub_objects.is_empty() {
            findings.push(
                Finding::error(
                    FindingCode::EmptyObject,
                    format!("Object 0x{index:04X} has no sub-objects"),
                )
                .at(index, None),
            );
            continue;
        }

        match object.object_type {
            ObjectType::Var => {
                let only_sub0 =
                    object.sub_objects.len() == 1 && object.sub_objects.contains_key(&0);
                if !only_sub0 {
                    findings.push(
                        Finding::error(
                            FindingCode::VarSubObjects,
                            format!(
                                "VAR object 0x{index:04X} must hold exactly sub-index 0, found {} sub-objects",
                                object.sub_objects.len()
                            ),
                        )
                        .at(index, None),
                    );
                }
            }
            ObjectType::Array | ObjectType::Record => {
                let Some(count_entry) = object.sub(0) else {
                    findings.push(
                        Finding::error(
                            FindingCode::MissingCountEntry,
                            format!("Object 0x{index:04X} has no sub-index 0 entry count"),
                        )
                        .at(index, None),
                    );
                    continue;
                };

                // Data entries must run 1, 2, 3, ... without holes.
                let gap = object
                    .sub_objects
                    .range(1..)
                    .zip(1u16..)
                    .find(|((sub_index, _), expected)| u16::from(**sub_index) != *expected)
                    .map(|(_, expected)| expected);
                if let Some(missing) = gap {
                    findings.push(
                        Finding::error(
                            FindingCode::SubIndexGap,
                            format!(
                                "Object 0x{index:04X} skips sub-index {missing}; data entries must be contiguous from 1"
                            ),
                        )
                        .at(index, u8::try_from(missing).ok()),
                    );
                }

                // An unparseable count is reported by the value rule.
                if let Ok(value) = count_entry.parsed_effective(ctx.node_id) {
                    let actual = object.data_sub_count();
                    let declared = value.as_u64();
                    if declared != u64::try_from(actual).ok() {
                        findings.push(
                            Finding::error(
                                FindingCode::CountMismatch,
                                format!(
                                    "Object 0x{index:04X} declares {} entries in sub-index 0 but has {actual}",
                                    count_entry.effective_value()
                                ),
                            )
                            .at(index, Some(0)),
                        );
                    }
                }
            }
        }
    }
    Ok(())
}
