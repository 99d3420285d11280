// crates/canopen-od/tests/code_generation.rs

use canopen_od::{
    AccessSdo, CancelToken, Cancelled, DataType, Device, ExportOptions, OdObject, OdSubObject,
    generate, generate_with_cancel, load_eds_from_str, save_eds_to_string,
};
use chrono::{TimeZone, Utc};
use std::fs;
use std::path::PathBuf;

fn load_test_file(name: &str) -> String {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(name);

    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read test file {:?}: {}", path, e))
}

fn demo_device() -> Device {
    load_eds_from_str(&load_test_file("demo_device.eds")).expect("Failed to parse demo EDS")
}

fn fixed_options() -> ExportOptions {
    ExportOptions {
        generated_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).single(),
        ..ExportOptions::default()
    }
}

#[test]
fn test_header_matches_fixture() {
    let output = generate(&demo_device(), &fixed_options());
    assert!(output.errors.is_empty(), "unexpected errors: {:?}", output.errors);
    assert_eq!(output.header, load_test_file("demo_device.h"));
}

#[test]
fn test_source_matches_fixture() {
    let output = generate(&demo_device(), &fixed_options());
    assert_eq!(output.source, load_test_file("demo_device.c"));
}

#[test]
fn test_generation_is_idempotent() {
    let device = demo_device();
    let first = generate(&device, &fixed_options());
    let second = generate(&device, &fixed_options());
    assert_eq!(first, second);

    // The same content read back from written EDS generates the same code.
    let reloaded = load_eds_from_str(&save_eds_to_string(&device)).unwrap();
    assert_eq!(generate(&reloaded, &fixed_options()), first);
}

#[test]
fn test_error_register_identifier() {
    let output = generate(&demo_device(), &ExportOptions::default());
    assert!(output.header.contains("extern uint8_t OD_1001;"));
    assert!(!output.header.contains("Generated:"));
}

#[test]
fn test_domain_object_is_reported_and_skipped() {
    let mut device = demo_device();
    device.object_dictionary.insert(
        0x2001,
        OdObject::var(
            "Firmware image",
            OdSubObject::new("Firmware image", DataType::Domain, AccessSdo::WriteOnly, ""),
        ),
    );

    let output = generate(&device, &fixed_options());

    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].index, 0x2001);
    assert_eq!(
        output.errors[0].to_string(),
        "object 0x2001 sub-index 0: DOMAIN values have no static initializer"
    );
    // Everything else is unchanged.
    assert_eq!(output.header, load_test_file("demo_device.h"));
    assert_eq!(output.source, load_test_file("demo_device.c"));
}

#[test]
fn test_cancelled_generation() {
    let cancel = CancelToken::new();
    cancel.cancel();
    assert_eq!(
        generate_with_cancel(&demo_device(), &fixed_options(), &cancel),
        Err(Cancelled)
    );
}
