// crates/canopen-od-xdd/tests/cross_format.rs

//! The EDS and XDD readers produce the same `Device` for the same description.

use canopen_od::{
    AccessSdo, DataType, Device, OdObject, OdSubObject, VendorSection, load_eds_from_str,
    save_eds_to_string,
};
use canopen_od_xdd::{load_xdd_from_str, save_xdd_to_string};
use std::fs;
use std::path::PathBuf;

fn read(path: PathBuf) -> String {
    let _ = env_logger::builder().is_test(true).try_init();
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read test file {:?}: {}", path, e))
}

fn demo_eds() -> Device {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../canopen-od/tests/data/demo_device.eds");
    load_eds_from_str(&read(path)).expect("Failed to parse demo EDS")
}

fn demo_xdd() -> Device {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data/demo_device.xdd");
    load_xdd_from_str(&read(path)).expect("Failed to parse demo XDD")
}

#[test]
fn test_fixtures_describe_the_same_device() {
    assert_eq!(demo_eds(), demo_xdd());
}

#[test]
fn test_eds_through_xdd_is_lossless() {
    let from_eds = demo_eds();
    let xml = save_xdd_to_string(&from_eds).expect("Failed to serialize XDD");
    let reloaded = load_xdd_from_str(&xml).expect("Failed to parse serialized XDD");
    assert_eq!(from_eds, reloaded);
}

#[test]
fn test_xdd_through_eds_is_lossless() {
    let from_xdd = demo_xdd();
    let eds = save_eds_to_string(&from_xdd);
    let reloaded = load_eds_from_str(&eds).expect("Failed to parse serialized EDS");
    assert_eq!(from_xdd, reloaded);
}

#[test]
fn test_xdd_only_text_survives_eds() {
    let mut device = demo_xdd();
    device.file_info.description = "line one\nline two".into();
    device.file_info.creation = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|date| date.and_hms_opt(10, 11, 12));
    device.comments.push("first\nsecond".into());
    device.vendor_sections.push(VendorSection {
        name: "Tool".into(),
        entries: vec![("Path".into(), r"C:\new\tool".into())],
    });
    device.object_dictionary.insert(
        0x2100,
        OdObject::var(
            "Label",
            OdSubObject::new("Label text", DataType::VisibleString, AccessSdo::ReadWrite, "a\nb"),
        ),
    );

    let xml = save_xdd_to_string(&device).expect("Failed to serialize XDD");
    let from_xdd = load_xdd_from_str(&xml).expect("Failed to parse serialized XDD");
    assert_eq!(from_xdd, device);

    let eds = save_eds_to_string(&from_xdd);
    let from_eds = load_eds_from_str(&eds).expect("Failed to parse serialized EDS");
    assert_eq!(from_eds, device);
}
