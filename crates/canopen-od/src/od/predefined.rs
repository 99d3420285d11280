// crates/canopen-od/src/od/predefined.rs

use super::entry::{OdObject, OdSubObject};
use crate::types::{AccessSdo, DataType, ObjectType};

/// The object a fresh `add_index` creates for each object type.
pub(super) fn default_object(object_type: ObjectType) -> OdObject {
    match object_type {
        ObjectType::Var => OdObject::var(
            "New Object",
            OdSubObject::new("New Object", DataType::Unsigned32, AccessSdo::ReadWrite, "0"),
        ),
        ObjectType::Array | ObjectType::Record => OdObject::new("New Object", object_type)
            .with_sub(0, count_entry(1))
            .with_sub(
                1,
                OdSubObject::new("Sub-index 1", DataType::Unsigned32, AccessSdo::ReadWrite, "0"),
            ),
    }
}

/// Sub-index 0 of an ARRAY or RECORD.
pub(super) fn count_entry(count: u8) -> OdSubObject {
    OdSubObject::new(
        "Highest sub-index supported",
        DataType::Unsigned8,
        AccessSdo::ReadOnly,
        format_count(count),
    )
}

pub(super) fn format_count(count: u8) -> String {
    format!("0x{count:02X}")
}

/// The communication profile objects every CANopen device must carry.
/// (Reference: CiA 301, Table 49: 1000h, 1001h and 1018h)
pub(crate) fn mandatory_profile_objects() -> Vec<(u16, OdObject)> {
    let ro_u32 =
        |name: &str| OdSubObject::new(name, DataType::Unsigned32, AccessSdo::ReadOnly, "0");
    vec![
        (
            0x1000,
            OdObject::var(
                "Device type",
                OdSubObject::new(
                    "Device type",
                    DataType::Unsigned32,
                    AccessSdo::ReadOnly,
                    "0x00000000",
                ),
            ),
        ),
        (
            0x1001,
            OdObject::var(
                "Error register",
                OdSubObject::new("Error register", DataType::Unsigned8, AccessSdo::ReadOnly, "0"),
            ),
        ),
        (
            0x1018,
            OdObject::new("Identity", ObjectType::Record)
                .with_sub(0, count_entry(4))
                .with_sub(1, ro_u32("Vendor-ID"))
                .with_sub(2, ro_u32("Product code"))
                .with_sub(3, ro_u32("Revision number"))
                .with_sub(4, ro_u32("Serial number")),
        ),
    ]
}
