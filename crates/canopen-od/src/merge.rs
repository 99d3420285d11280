// crates/canopen-od/src/merge.rs

//! Merging a module's objects into a base device.

use crate::device::Device;
use crate::od::OdObject;
use log::{debug, trace};

/// Which side wins when both devices define the same sub-object differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    #[default]
    KeepBase,
    PreferModule,
}

/// One entry both devices define differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub index: u16,
    /// `None` when the objects disagree on their object type, in which case
    /// the whole object is kept or replaced.
    pub sub_index: Option<u8>,
    pub resolution: MergePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeReport {
    pub added_objects: Vec<u16>,
    pub added_sub_objects: Vec<(u16, u8)>,
    pub conflicts: Vec<MergeConflict>,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Merges the objects of `module` into `base`.
///
/// Objects missing from `base` are inserted whole. For objects both define,
/// sub-objects missing from `base` are added and differing ones are resolved
/// by `policy`. Sub-index 0 of an ARRAY or RECORD is recomputed rather than
/// compared. The metadata of `base` is left alone.
pub fn merge_module(base: &mut Device, module: &Device, policy: MergePolicy) -> MergeReport {
    let mut report = MergeReport::default();

    for (index, incoming) in module.object_dictionary.iter() {
        let Some(existing) = base.object_dictionary.get(index) else {
            trace!("Merging new object 0x{index:04X}");
            base.object_dictionary.insert(index, incoming.clone());
            report.added_objects.push(index);
            continue;
        };

        if existing.object_type != incoming.object_type {
            report.conflicts.push(MergeConflict {
                index,
                sub_index: None,
                resolution: policy,
            });
            if policy == MergePolicy::PreferModule {
                base.object_dictionary.insert(index, incoming.clone());
            }
            continue;
        }

        let merged = merge_object(index, existing, incoming, policy, &mut report);
        if &merged != existing {
            base.object_dictionary.insert(index, merged);
        }
    }

    debug!(
        "Merged module: {} objects added, {} sub-objects added, {} conflicts",
        report.added_objects.len(),
        report.added_sub_objects.len(),
        report.conflicts.len()
    );
    report
}

fn merge_object(
    index: u16,
    existing: &OdObject,
    incoming: &OdObject,
    policy: MergePolicy,
    report: &mut MergeReport,
) -> OdObject {
    let complex = existing.object_type.is_complex();
    let mut merged = existing.clone();
    let mut added = false;

    for (sub_index, sub) in &incoming.sub_objects {
        if complex && *sub_index == 0 {
            continue;
        }
        match existing.sub(*sub_index) {
            None => {
                merged.sub_objects.insert(*sub_index, sub.clone());
                report.added_sub_objects.push((index, *sub_index));
                added = true;
            }
            Some(current) if current != sub => {
                report.conflicts.push(MergeConflict {
                    index,
                    sub_index: Some(*sub_index),
                    resolution: policy,
                });
                if policy == MergePolicy::PreferModule {
                    merged.sub_objects.insert(*sub_index, sub.clone());
                }
            }
            Some(_) => {}
        }
    }

    if complex && added {
        merged.sync_count();
    }
    merged
}
