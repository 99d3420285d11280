// crates/canopen-od/src/od/entry.rs

use super::predefined;
use super::value::{OdValue, parse_value};
use crate::error::ValueError;
use crate::types::{AccessPdo, AccessSdo, AccessSrdo, DataType, ObjectType};
use std::collections::BTreeMap;

/// One addressable value slot of an object.
///
/// Values are kept as the literal text they were read from so that
/// `$NODEID` expressions and the exact spelling survive a round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct OdSubObject {
    pub name: String,
    pub data_type: DataType,
    pub access_sdo: AccessSdo,
    pub access_pdo: AccessPdo,
    pub access_srdo: AccessSrdo,
    pub default_value: String,
    pub actual_value: Option<String>,
    pub low_limit: Option<String>,
    pub high_limit: Option<String>,
    /// Legacy `PDOMapping=0/1` flag, kept separately from `access_pdo`.
    pub pdo_mapping: Option<bool>,
}

impl OdSubObject {
    pub fn new(
        name: impl Into<String>,
        data_type: DataType,
        access_sdo: AccessSdo,
        default_value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            access_sdo,
            access_pdo: AccessPdo::No,
            access_srdo: AccessSrdo::No,
            default_value: default_value.into(),
            actual_value: None,
            low_limit: None,
            high_limit: None,
            pdo_mapping: None,
        }
    }

    pub fn with_access_pdo(mut self, access_pdo: AccessPdo) -> Self {
        self.access_pdo = access_pdo;
        self
    }

    pub fn with_limits(mut self, low: impl Into<String>, high: impl Into<String>) -> Self {
        self.low_limit = Some(low.into());
        self.high_limit = Some(high.into());
        self
    }

    /// A sub-object is mappable if either PDO axis allows it.
    pub fn is_pdo_mappable(&self) -> bool {
        self.pdo_mapping == Some(true) || self.access_pdo != AccessPdo::No
    }

    /// The actual value when present, else the default.
    pub fn effective_value(&self) -> &str {
        self.actual_value.as_deref().unwrap_or(&self.default_value)
    }

    pub fn parsed_default(&self, node_id: u8) -> Result<OdValue, ValueError> {
        parse_value(self.data_type, &self.default_value, node_id)
    }

    pub fn parsed_effective(&self, node_id: u8) -> Result<OdValue, ValueError> {
        parse_value(self.data_type, self.effective_value(), node_id)
    }
}

/// A dictionary entry: a named object with its sub-objects keyed by sub-index.
///
/// VAR objects hold their value in sub-index 0. ARRAY and RECORD objects hold
/// the entry count in sub-index 0 and their data in 1..=n.
#[derive(Debug, Clone, PartialEq)]
pub struct OdObject {
    pub name: String,
    pub object_type: ObjectType,
    pub sub_objects: BTreeMap<u8, OdSubObject>,
}

impl OdObject {
    pub fn new(name: impl Into<String>, object_type: ObjectType) -> Self {
        Self {
            name: name.into(),
            object_type,
            sub_objects: BTreeMap::new(),
        }
    }

    /// A VAR object whose single value is `sub`.
    pub fn var(name: impl Into<String>, sub: OdSubObject) -> Self {
        let mut object = Self::new(name, ObjectType::Var);
        object.sub_objects.insert(0, sub);
        object
    }

    pub fn with_sub(mut self, sub_index: u8, sub: OdSubObject) -> Self {
        self.sub_objects.insert(sub_index, sub);
        self
    }

    pub fn sub(&self, sub_index: u8) -> Option<&OdSubObject> {
        self.sub_objects.get(&sub_index)
    }

    /// Number of data entries (every sub-index except 0).
    pub fn data_sub_count(&self) -> usize {
        self.sub_objects.range(1..).count()
    }

    /// Highest sub-index in use.
    pub fn last_sub_index(&self) -> Option<u8> {
        self.sub_objects.keys().next_back().copied()
    }

    /// Rewrites sub-index 0 to the current number of data entries.
    pub fn sync_count(&mut self) {
        let count = u8::try_from(self.data_sub_count()).unwrap_or(u8::MAX);
        match self.sub_objects.get_mut(&0) {
            Some(sub0) => {
                sub0.default_value = predefined::format_count(count);
                sub0.actual_value = None;
            }
            None => {
                self.sub_objects.insert(0, predefined::count_entry(count));
            }
        }
    }

    /// The count declared by sub-index 0, if present and numeric.
    pub fn declared_count(&self, node_id: u8) -> Option<u64> {
        self.sub(0)?.parsed_effective(node_id).ok()?.as_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_value_prefers_actual() {
        let mut sub = OdSubObject::new("Value", DataType::Unsigned8, AccessSdo::ReadWrite, "1");
        assert_eq!(sub.effective_value(), "1");
        sub.actual_value = Some("7".into());
        assert_eq!(sub.effective_value(), "7");
        assert_eq!(sub.parsed_effective(0), Ok(OdValue::Unsigned(7)));
    }

    #[test]
    fn test_pdo_mappable_from_either_axis() {
        let mut sub = OdSubObject::new("Value", DataType::Unsigned8, AccessSdo::ReadWrite, "0");
        assert!(!sub.is_pdo_mappable());
        sub.pdo_mapping = Some(true);
        assert!(sub.is_pdo_mappable());
        sub.pdo_mapping = Some(false);
        sub.access_pdo = AccessPdo::Optional;
        assert!(sub.is_pdo_mappable());
    }

    #[test]
    fn test_record_counts() {
        let record = OdObject::new("Identity", ObjectType::Record)
            .with_sub(
                0,
                OdSubObject::new("Count", DataType::Unsigned8, AccessSdo::ReadOnly, "0x02"),
            )
            .with_sub(
                1,
                OdSubObject::new("Vendor", DataType::Unsigned32, AccessSdo::ReadOnly, "0"),
            )
            .with_sub(
                2,
                OdSubObject::new("Product", DataType::Unsigned32, AccessSdo::ReadOnly, "0"),
            );
        assert_eq!(record.data_sub_count(), 2);
        assert_eq!(record.declared_count(0), Some(2));
        assert_eq!(record.last_sub_index(), Some(2));
    }
}
