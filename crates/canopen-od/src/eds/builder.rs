// crates/canopen-od/src/eds/builder.rs

use super::{
    COMMENTS, DATE_FORMAT, DEVICE_COMMISSIONING, DEVICE_INFO, DUMMY_USAGE, FILE_INFO,
    MANDATORY_OBJECTS, MANUFACTURER_OBJECTS, OPTIONAL_OBJECTS, ObjectList, SUB_PARAMETER_NAME,
    TIME_FORMAT, TIME_FORMAT_SECONDS, escape,
};
use crate::device::{BaudRates, Device};
use crate::od::{OdObject, OdSubObject, format_index};
use crate::pdo::DUMMY_ENTRIES;
use crate::types::ObjectType;
use chrono::{NaiveDateTime, Timelike};
use core::fmt::Display;

/// Serializes a [`Device`] into EDS text.
///
/// Section and key order is fixed, so equal devices always produce identical
/// text. The object lists and `[DummyUsage]` are derived from the dictionary.
pub fn save_eds_to_string(device: &Device) -> String {
    let mut w = EdsWriter::default();
    let info = &device.file_info;

    w.section(FILE_INFO);
    w.key("FileName", &info.file_name);
    w.key("FileVersion", info.file_version);
    w.key("FileRevision", info.file_revision);
    w.key("EDSVersion", &info.eds_version);
    w.key("Description", &info.description);
    w.timestamp("CreationTime", "CreationDate", info.creation);
    w.key("CreatedBy", &info.created_by);
    w.timestamp("ModificationTime", "ModificationDate", info.modification);
    w.key("ModifiedBy", &info.modified_by);

    let dev = &device.device_info;
    w.section(DEVICE_INFO);
    w.key("VendorName", &dev.vendor_name);
    w.key("VendorNumber", hex_u32(dev.vendor_number));
    w.key("ProductName", &dev.product_name);
    w.key("ProductNumber", hex_u32(dev.product_number));
    w.key("RevisionNumber", hex_u32(dev.revision_number));
    w.key("OrderCode", &dev.order_code);
    for rate in BaudRates::RATES {
        w.key(&format!("BaudRate_{rate}"), flag(dev.baud_rates.supports(rate)));
    }
    w.key("SimpleBootUpMaster", flag(dev.simple_boot_up_master));
    w.key("SimpleBootUpSlave", flag(dev.simple_boot_up_slave));
    w.key("Granularity", dev.granularity);
    w.key("DynamicChannelsSupported", dev.dynamic_channels_supported);
    w.key("GroupMessaging", flag(dev.group_messaging));
    w.key("NrOfRXPDO", dev.nr_of_rx_pdo);
    w.key("NrOfTXPDO", dev.nr_of_tx_pdo);
    w.key("LSS_Supported", flag(dev.lss_supported));

    w.section(DUMMY_USAGE);
    for index in DUMMY_ENTRIES {
        w.key(&format!("Dummy{index:04X}"), 1);
    }

    w.section(COMMENTS);
    w.key("Lines", device.comments.len());
    for (n, line) in device.comments.iter().enumerate() {
        w.key(&format!("Line{}", n + 1), line);
    }

    let od = &device.object_dictionary;
    for (list, name) in [
        (ObjectList::Mandatory, MANDATORY_OBJECTS),
        (ObjectList::Optional, OPTIONAL_OBJECTS),
        (ObjectList::Manufacturer, MANUFACTURER_OBJECTS),
    ] {
        let indices: Vec<u16> = od
            .iter()
            .map(|(index, _)| index)
            .filter(|index| ObjectList::of(*index) == list)
            .collect();
        w.section(name);
        w.key("SupportedObjects", indices.len());
        for (n, index) in indices.iter().enumerate() {
            w.key(&(n + 1).to_string(), format!("0x{index:04X}"));
        }
    }

    for (index, object) in od.iter() {
        write_object(&mut w, index, object);
    }

    let com = &device.commissioning;
    w.section(DEVICE_COMMISSIONING);
    w.key("NodeID", format!("0x{:02X}", com.node_id));
    w.key("NodeName", &com.node_name);
    w.key("Baudrate", com.baud_rate);
    w.key("NetNumber", com.net_number);
    w.key("NetworkName", &com.network_name);
    w.key("CANopenManager", flag(com.canopen_manager));
    w.key("LSS_SerialNumber", com.lss_serial_number);

    for section in &device.vendor_sections {
        w.section(&section.name);
        for (key, value) in &section.entries {
            w.key(key, value);
        }
    }

    w.out
}

fn write_object(w: &mut EdsWriter, index: u16, object: &OdObject) {
    let name = format_index(index);
    match object.object_type {
        ObjectType::Var => {
            w.section(&name);
            w.key("ParameterName", &object.name);
            w.key("ObjectType", format!("0x{:X}", object.object_type.code()));
            if let Some(sub) = object.sub(0) {
                if sub.name != object.name {
                    w.key(SUB_PARAMETER_NAME, &sub.name);
                }
                write_sub_fields(w, sub);
            }
        }
        ObjectType::Array | ObjectType::Record => {
            w.section(&name);
            w.key("ParameterName", &object.name);
            w.key("ObjectType", format!("0x{:X}", object.object_type.code()));
            w.key("SubNumber", object.sub_objects.len());
            for (sub_index, sub) in &object.sub_objects {
                w.section(&format!("{name}sub{sub_index:X}"));
                w.key("ParameterName", &sub.name);
                w.key("ObjectType", format!("0x{:X}", ObjectType::Var.code()));
                write_sub_fields(w, sub);
            }
        }
    }
}

fn write_sub_fields(w: &mut EdsWriter, sub: &OdSubObject) {
    w.key("DataType", format!("0x{:04X}", sub.data_type.code()));
    w.key("AccessType", sub.access_sdo.token());
    w.key("DefaultValue", &sub.default_value);
    if let Some(value) = &sub.actual_value {
        w.key("ParameterValue", value);
    }
    if let Some(low) = &sub.low_limit {
        w.key("LowLimit", low);
    }
    if let Some(high) = &sub.high_limit {
        w.key("HighLimit", high);
    }
    if let Some(mapping) = sub.pdo_mapping {
        w.key("PDOMapping", flag(mapping));
    }
    w.key("AccessPDO", sub.access_pdo.eds_token());
    w.key("AccessSRDO", sub.access_srdo.token());
}

fn flag(value: bool) -> u8 {
    u8::from(value)
}

fn hex_u32(value: Option<u32>) -> String {
    value.map(|v| format!("0x{v:08X}")).unwrap_or_default()
}

#[derive(Default)]
struct EdsWriter {
    out: String,
}

impl EdsWriter {
    fn section(&mut self, name: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.push('[');
        self.out.push_str(name);
        self.out.push_str("]\n");
    }

    fn key(&mut self, key: &str, value: impl Display) {
        let value = value.to_string();
        self.out.push_str(&format!("{key}={}\n", escape(&value)));
    }

    fn timestamp(&mut self, time_key: &str, date_key: &str, at: Option<NaiveDateTime>) {
        if let Some(at) = at {
            let format = if at.second() == 0 {
                TIME_FORMAT
            } else {
                TIME_FORMAT_SECONDS
            };
            self.key(time_key, at.format(format));
            self.key(date_key, at.format(DATE_FORMAT));
        }
    }
}
