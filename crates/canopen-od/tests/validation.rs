// crates/canopen-od/tests/validation.rs

use canopen_od::validation::has_blocking_findings;
use canopen_od::{
    AccessSdo, CancelToken, Cancelled, DataType, Device, FindingCode, OdSubObject,
    ValidationOptions, load_eds_from_str, validate, validate_with_cancel,
};
use std::fs;
use std::path::PathBuf;

fn demo_device() -> Device {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data/demo_device.eds");
    let text = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read test file {:?}: {}", path, e));
    load_eds_from_str(&text).expect("Failed to parse demo EDS")
}

fn mapping(name: &str, value: &str) -> OdSubObject {
    OdSubObject::new(name, DataType::Unsigned32, AccessSdo::ReadWrite, value)
}

/// Appends mapping entries to TPDO 1 and updates its count.
fn extend_tpdo_mapping(device: &mut Device, values: &[&str]) {
    device
        .object_dictionary
        .modify(0x1A00, |object| {
            let first = object.data_sub_count() as u8 + 1;
            for (i, value) in values.iter().enumerate() {
                let sub_index = first + i as u8;
                object
                    .sub_objects
                    .insert(sub_index, mapping(&format!("Mapped object {sub_index}"), value));
            }
            object.sync_count();
        })
        .unwrap();
}

#[test]
fn test_demo_device_is_clean() {
    let findings = validate(&demo_device(), &ValidationOptions::default());
    assert!(findings.is_empty(), "unexpected findings: {findings:#?}");
}

#[test]
fn test_validation_is_deterministic() {
    let mut device = demo_device();
    device.object_dictionary.remove(0x1001);
    extend_tpdo_mapping(&mut device, &["0x30000008"]);

    let first = validate(&device, &ValidationOptions::default());
    let second = validate(&device, &ValidationOptions::default());
    assert_eq!(first, second);
    assert!(has_blocking_findings(&first));
}

#[test]
fn test_pdo_mapping_limit_boundary() {
    // 8 (input block) + 32 + 3 * 8 dummy bits = 64: allowed.
    let mut device = demo_device();
    extend_tpdo_mapping(
        &mut device,
        &["0x00070020", "0x00050008", "0x00050008", "0x00050008"],
    );
    let findings = validate(&device, &ValidationOptions::default());
    assert!(findings.is_empty(), "unexpected findings: {findings:#?}");

    // One more BOOLEAN dummy makes 65.
    extend_tpdo_mapping(&mut device, &["0x00010001"]);
    let findings = validate(&device, &ValidationOptions::default());
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].code, FindingCode::PdoMappingOverflow);
    assert_eq!(findings[0].index, Some(0x1A00));
    assert!(findings[0].message.contains("65 bits"));
}

#[test]
fn test_cob_id_collision_names_both_objects() {
    let mut device = demo_device();
    let mut second_tpdo = device.object_dictionary.get(0x1800).unwrap().clone();
    second_tpdo.name = "TPDO 2 communication parameter".into();
    device.object_dictionary.insert(0x1801, second_tpdo);

    let findings = validate(&device, &ValidationOptions::default());

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].code, FindingCode::CobIdCollision);
    assert_eq!(findings[0].index, Some(0x1801));
    assert_eq!(
        findings[0].message,
        "COB-ID 0x185 of TPDO 0x1801 collides with 0x1800"
    );
}

#[test]
fn test_node_id_override_changes_cob_ids() {
    let mut device = demo_device();
    // A second TPDO at a fixed identifier that only collides for node 6.
    let mut second_tpdo = device.object_dictionary.get(0x1800).unwrap().clone();
    second_tpdo.name = "TPDO 2 communication parameter".into();
    second_tpdo.sub_objects.insert(1, mapping("COB-ID used by TPDO", "0x186"));
    device.object_dictionary.insert(0x1801, second_tpdo);

    assert!(validate(&device, &ValidationOptions::default()).is_empty());

    let options = ValidationOptions {
        node_id: Some(6),
        ..ValidationOptions::default()
    };
    let findings = validate(&device, &options);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].code, FindingCode::CobIdCollision);
}

#[test]
fn test_validation_does_not_mutate() {
    let device = demo_device();
    let before = device.clone();
    let _ = validate(&device, &ValidationOptions::default());
    assert_eq!(device, before);
}

#[test]
fn test_cancelled_validation() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let result = validate_with_cancel(&demo_device(), &ValidationOptions::default(), &cancel);
    assert_eq!(result, Err(Cancelled));
}

#[test]
fn test_missing_mandatory_object() {
    let mut device = demo_device();
    device.object_dictionary.remove(0x1018);

    let findings = validate(&device, &ValidationOptions::default());
    let codes: Vec<FindingCode> = findings.iter().map(|f| f.code).collect();
    assert_eq!(codes, vec![FindingCode::MandatoryObjectMissing]);
}
