// crates/canopen-od/src/export/identifier.rs

//! C identifier derivation.

use crate::od::OdObject;
use std::collections::{BTreeMap, BTreeSet};

/// C keywords, C23 ones included, plus the `<stdint.h>` type names.
const RESERVED: &[&str] = &[
    "_Alignas", "_Alignof", "_Atomic", "_Bool", "_Complex", "_Generic", "_Imaginary",
    "_Noreturn", "_Static_assert", "_Thread_local", "auto", "bool", "break", "case", "char",
    "const", "continue", "default", "do", "double", "else", "enum", "extern", "false", "float",
    "for", "goto", "if", "inline", "int", "long", "register", "restrict", "return", "short",
    "signed", "sizeof", "static", "struct", "switch", "true", "typedef", "union", "unsigned",
    "void", "volatile", "while", "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t",
    "uint16_t", "uint32_t", "uint64_t",
];

/// Global symbol of an object: `OD_1018`.
pub fn object_symbol(index: u16) -> String {
    format!("OD_{index:04X}")
}

/// Typedef name of an ARRAY/RECORD object: `OD_1018_t`.
pub fn type_name(index: u16) -> String {
    format!("OD_{index:04X}_t")
}

/// Derives a struct field name from a sub-object name.
///
/// Runs of characters outside `[A-Za-z0-9]` become one `_`, leading and
/// trailing `_` are dropped, and names that do not start with a letter get a
/// `sub<n>_` prefix. Reserved C words get a trailing `_`.
pub fn field_identifier(name: &str, sub_index: u8) -> String {
    let identifier = base_identifier(name, sub_index);
    if is_reserved(&identifier) {
        format!("{identifier}_")
    } else {
        identifier
    }
}

/// `true` if `identifier` is a C keyword or a standard integer type name.
pub fn is_reserved(identifier: &str) -> bool {
    RESERVED.contains(&identifier)
}

/// The sanitized name before reserved words are escaped.
pub(crate) fn base_identifier(name: &str, sub_index: u8) -> String {
    let mut collapsed = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            collapsed.push(c);
        } else if !collapsed.ends_with('_') {
            collapsed.push('_');
        }
    }
    let trimmed = collapsed.trim_matches('_');
    match trimmed.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => trimmed.to_string(),
        Some(_) => format!("sub{sub_index}_{trimmed}"),
        None => format!("sub{sub_index}"),
    }
}

/// Field names for every sub-object of `object`, in sub-index order.
///
/// Colliding names get a `_sub<n>` suffix. A suffixed name that still clashes
/// with an earlier field is suffixed again until every name is distinct.
pub fn struct_fields(object: &OdObject) -> Vec<(u8, String)> {
    let raw: Vec<(u8, String)> = object
        .sub_objects
        .iter()
        .map(|(sub_index, sub)| (*sub_index, field_identifier(&sub.name, *sub_index)))
        .collect();

    let mut uses: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, name) in &raw {
        *uses.entry(name.as_str()).or_default() += 1;
    }

    let mut taken: BTreeSet<String> = BTreeSet::new();
    raw.iter()
        .map(|(sub_index, name)| {
            let mut field = if uses.get(name.as_str()).copied().unwrap_or(0) > 1 {
                format!("{name}_sub{sub_index}")
            } else {
                name.clone()
            };
            while taken.contains(&field) {
                field.push_str(&format!("_sub{sub_index}"));
            }
            taken.insert(field.clone());
            (*sub_index, field)
        })
        .collect()
}

/// `CO_OD.h` -> `CO_OD_H`
pub fn include_guard(header_name: &str) -> String {
    header_file_name(header_name)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// The last path component of `header_name`.
pub fn header_file_name(header_name: &str) -> &str {
    header_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(header_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::od::OdSubObject;
    use crate::types::{AccessSdo, DataType, ObjectType};

    #[test]
    fn test_field_identifier() {
        assert_eq!(
            field_identifier("Number of mapped objects", 0),
            "Number_of_mapped_objects"
        );
        assert_eq!(field_identifier("  COB-ID used by RPDO ", 1), "COB_ID_used_by_RPDO");
        assert_eq!(field_identifier("2nd value", 2), "sub2_2nd_value");
        assert_eq!(field_identifier("---", 3), "sub3");
        assert_eq!(field_identifier("Température", 4), "Temp_rature");
        assert_eq!(field_identifier("int", 5), "int_");
        assert_eq!(field_identifier(" default ", 6), "default_");
        assert_eq!(field_identifier("uint8_t", 7), "uint8_t_");
        assert!(!is_reserved("Int"));
    }

    #[test]
    fn test_struct_fields_disambiguate() {
        let sub =
            |name: &str| OdSubObject::new(name, DataType::Unsigned8, AccessSdo::ReadOnly, "0");
        let object = OdObject::new("Values", ObjectType::Array)
            .with_sub(0, sub("Count"))
            .with_sub(1, sub("Value"))
            .with_sub(2, sub("Value"));
        assert_eq!(
            struct_fields(&object),
            vec![
                (0, "Count".to_string()),
                (1, "Value_sub1".to_string()),
                (2, "Value_sub2".to_string())
            ]
        );
    }

    #[test]
    fn test_struct_fields_stay_distinct_after_suffixing() {
        let sub =
            |name: &str| OdSubObject::new(name, DataType::Unsigned8, AccessSdo::ReadOnly, "0");
        let object = OdObject::new("Values", ObjectType::Array)
            .with_sub(0, sub("Value"))
            .with_sub(1, sub("Value"))
            .with_sub(2, sub("Value sub1"));
        assert_eq!(
            struct_fields(&object),
            vec![
                (0, "Value_sub0".to_string()),
                (1, "Value_sub1".to_string()),
                (2, "Value_sub1_sub2".to_string())
            ]
        );
    }

    #[test]
    fn test_include_guard() {
        assert_eq!(include_guard("CO_OD.h"), "CO_OD_H");
        assert_eq!(include_guard("gen/od-app.h"), "OD_APP_H");
        assert_eq!(object_symbol(0x1001), "OD_1001");
    }
}
