// crates/canopen-od/src/od/mod.rs

mod entry;
pub(crate) mod predefined;
mod value;

pub use entry::{OdObject, OdSubObject};
pub use value::{OdValue, has_node_id_reference, parse_value};

use crate::error::OdError;
use crate::types::ObjectType;
use crate::utils;
use log::{debug, trace};
use std::collections::BTreeMap;
use std::fmt;

/// A change applied to an [`ObjectDictionary`], delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OdChange<'a> {
    Added {
        index: u16,
        new: &'a OdObject,
    },
    Replaced {
        index: u16,
        old: &'a OdObject,
        new: &'a OdObject,
    },
    Removed {
        index: u16,
        old: &'a OdObject,
    },
    /// Every entry was removed at once.
    Reset,
}

/// Handle returned by [`ObjectDictionary::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&OdChange<'_>) + Send>;

/// Parses a 4-hex-digit index string such as `"1018"`.
pub fn parse_index(text: &str) -> Result<u16, OdError> {
    utils::parse_hex_u16(text).ok_or_else(|| OdError::InvalidIndex(text.to_string()))
}

/// Renders an index the way both file formats key it.
pub fn format_index(index: u16) -> String {
    format!("{index:04X}")
}

/// The Object Dictionary: objects ordered by their 16-bit index.
#[derive(Default)]
pub struct ObjectDictionary {
    entries: BTreeMap<u16, OdObject>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl fmt::Debug for ObjectDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectDictionary")
            .field("entries", &self.entries)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Clones the entries only; subscriptions stay with the original.
impl Clone for ObjectDictionary {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }
}

impl PartialEq for ObjectDictionary {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl ObjectDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, index: u16) -> bool {
        self.entries.contains_key(&index)
    }

    pub fn get(&self, index: u16) -> Option<&OdObject> {
        self.entries.get(&index)
    }

    pub fn get_sub(&self, index: u16, sub_index: u8) -> Option<&OdSubObject> {
        self.entries.get(&index)?.sub(sub_index)
    }

    /// Objects in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &OdObject)> {
        self.entries.iter().map(|(index, object)| (*index, object))
    }

    /// Inserts or replaces the object at `index`, returning the previous one.
    pub fn insert(&mut self, index: u16, object: OdObject) -> Option<OdObject> {
        let old = self.entries.insert(index, object);
        if let Some(new) = self.entries.get(&index) {
            let change = match &old {
                Some(old) => OdChange::Replaced { index, old, new },
                None => OdChange::Added { index, new },
            };
            notify(&mut self.subscribers, &change);
        }
        old
    }

    pub fn remove(&mut self, index: u16) -> Option<OdObject> {
        let old = self.entries.remove(&index)?;
        notify(&mut self.subscribers, &OdChange::Removed { index, old: &old });
        Some(old)
    }

    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.clear();
        notify(&mut self.subscribers, &OdChange::Reset);
    }

    /// Edits the object at `index` in place.
    ///
    /// Subscribers see a single `Replaced` change if the closure altered the
    /// object, and nothing otherwise.
    pub fn modify<R>(
        &mut self,
        index: u16,
        edit: impl FnOnce(&mut OdObject) -> R,
    ) -> Result<R, OdError> {
        let entry = self
            .entries
            .get_mut(&index)
            .ok_or(OdError::IndexNotFound(index))?;
        let old = entry.clone();
        let result = edit(entry);
        let new: &OdObject = entry;
        if *new != old {
            notify(
                &mut self.subscribers,
                &OdChange::Replaced {
                    index,
                    old: &old,
                    new,
                },
            );
        }
        Ok(result)
    }

    /// Creates a new object at `index` populated with type-appropriate defaults.
    pub fn add_index(&mut self, index: u16, object_type: ObjectType) -> Result<&OdObject, OdError> {
        if self.contains(index) {
            return Err(OdError::IndexExists(index));
        }
        debug!("Adding {object_type} object at 0x{index:04X}");
        self.insert(index, predefined::default_object(object_type));
        self.entries.get(&index).ok_or(OdError::IndexNotFound(index))
    }

    /// Appends a data sub-object to an ARRAY or RECORD, copying the type and
    /// access of the previous last entry. Returns the new sub-index.
    pub fn add_sub_object(&mut self, index: u16) -> Result<u8, OdError> {
        let object = self.get(index).ok_or(OdError::IndexNotFound(index))?;
        if !object.object_type.is_complex() {
            return Err(OdError::NotComplex(index));
        }
        let next = match object.last_sub_index() {
            Some(u8::MAX) => return Err(OdError::SubIndexExhausted(index)),
            Some(last) => last + 1,
            None => 1,
        };
        let mut template = match object.sub_objects.range(1..).next_back() {
            Some((_, last)) => last.clone(),
            None => predefined::default_object(object.object_type)
                .sub_objects
                .remove(&1)
                .ok_or(OdError::SubIndexNotFound {
                    index,
                    sub_index: 1,
                })?,
        };
        template.name = format!("Sub-index {next}");
        template.actual_value = None;

        self.modify(index, |object| {
            object.sub_objects.insert(next, template);
            object.sync_count();
        })?;
        trace!("Added sub-index {next} to 0x{index:04X}");
        Ok(next)
    }

    /// Drops the highest data sub-object of an ARRAY or RECORD.
    pub fn remove_last_sub_object(&mut self, index: u16) -> Result<OdSubObject, OdError> {
        let object = self.get(index).ok_or(OdError::IndexNotFound(index))?;
        if !object.object_type.is_complex() {
            return Err(OdError::NotComplex(index));
        }
        let last = object
            .sub_objects
            .range(1..)
            .next_back()
            .map(|(sub_index, _)| *sub_index)
            .ok_or(OdError::SubIndexNotFound {
                index,
                sub_index: 1,
            })?;

        self.modify(index, |object| {
            let removed = object.sub_objects.remove(&last);
            object.sync_count();
            removed
        })?
        .ok_or(OdError::SubIndexNotFound {
            index,
            sub_index: last,
        })
    }

    /// Registers a callback invoked after every change.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&OdChange<'_>) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }
}

fn notify(subscribers: &mut [(SubscriptionId, Subscriber)], change: &OdChange<'_>) {
    for (_, callback) in subscribers.iter_mut() {
        callback(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccessSdo, DataType};
    use std::sync::{Arc, Mutex};

    fn record_events(od: &mut ObjectDictionary) -> Arc<Mutex<Vec<String>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        od.subscribe(move |change| {
            let text = match change {
                OdChange::Added { index, .. } => format!("added {index:04X}"),
                OdChange::Replaced { index, .. } => format!("replaced {index:04X}"),
                OdChange::Removed { index, .. } => format!("removed {index:04X}"),
                OdChange::Reset => "reset".to_string(),
            };
            sink.lock().unwrap().push(text);
        });
        events
    }

    #[test]
    fn test_add_index_var_defaults() {
        let mut od = ObjectDictionary::new();
        let object = od.add_index(0x2000, ObjectType::Var).unwrap();
        assert_eq!(object.sub_objects.len(), 1);
        let sub = object.sub(0).unwrap();
        assert_eq!(sub.data_type, DataType::Unsigned32);
        assert_eq!(sub.access_sdo, AccessSdo::ReadWrite);
        assert_eq!(sub.default_value, "0");
    }

    #[test]
    fn test_add_index_record_defaults() {
        let mut od = ObjectDictionary::new();
        let object = od.add_index(0x2001, ObjectType::Record).unwrap();
        let keys: Vec<u8> = object.sub_objects.keys().copied().collect();
        assert_eq!(keys, vec![0, 1]);
        let count = object.sub(0).unwrap();
        assert_eq!(count.data_type, DataType::Unsigned8);
        assert_eq!(count.access_sdo, AccessSdo::ReadOnly);
        assert_eq!(count.default_value, "0x01");
        let data = object.sub(1).unwrap();
        assert_eq!(data.data_type, DataType::Unsigned32);
        assert_eq!(data.access_sdo, AccessSdo::ReadWrite);
        assert_eq!(data.default_value, "0");
    }

    #[test]
    fn test_add_index_rejects_existing() {
        let mut od = ObjectDictionary::new();
        od.add_index(0x2000, ObjectType::Var).unwrap();
        assert_eq!(
            od.add_index(0x2000, ObjectType::Array).unwrap_err(),
            OdError::IndexExists(0x2000)
        );
    }

    #[test]
    fn test_sub_object_editing_keeps_count() {
        let mut od = ObjectDictionary::new();
        od.add_index(0x2100, ObjectType::Array).unwrap();
        assert_eq!(od.add_sub_object(0x2100), Ok(2));
        assert_eq!(od.add_sub_object(0x2100), Ok(3));
        assert_eq!(od.get_sub(0x2100, 0).unwrap().default_value, "0x03");
        assert_eq!(od.get_sub(0x2100, 3).unwrap().data_type, DataType::Unsigned32);

        od.remove_last_sub_object(0x2100).unwrap();
        assert_eq!(od.get_sub(0x2100, 0).unwrap().default_value, "0x02");
        assert!(od.get_sub(0x2100, 3).is_none());

        od.add_index(0x2200, ObjectType::Var).unwrap();
        assert_eq!(od.add_sub_object(0x2200), Err(OdError::NotComplex(0x2200)));
    }

    #[test]
    fn test_change_notifications() {
        let mut od = ObjectDictionary::new();
        let events = record_events(&mut od);

        od.add_index(0x2000, ObjectType::Var).unwrap();
        od.modify(0x2000, |object| object.name = "Renamed".into()).unwrap();
        // An edit that leaves the object unchanged is not a change.
        od.modify(0x2000, |object| object.name = "Renamed".into()).unwrap();
        od.add_sub_object(0x2000).unwrap_err();
        od.remove(0x2000);
        od.add_index(0x2001, ObjectType::Array).unwrap();
        od.clear();

        assert_eq!(
            *events.lock().unwrap(),
            vec!["added 2000", "replaced 2000", "removed 2000", "added 2001", "reset"]
        );
    }

    #[test]
    fn test_unsubscribe_and_clone() {
        let mut od = ObjectDictionary::new();
        let events = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&events);
        let id = od.subscribe(move |_| *sink.lock().unwrap() += 1);

        od.add_index(0x2000, ObjectType::Var).unwrap();
        let mut copy = od.clone();
        copy.remove(0x2000);
        assert_eq!(*events.lock().unwrap(), 1);
        assert_ne!(od, copy);

        assert!(od.unsubscribe(id));
        assert!(!od.unsubscribe(id));
        od.remove(0x2000);
        assert_eq!(*events.lock().unwrap(), 1);
        assert_eq!(od, copy);
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("1018"), Ok(0x1018));
        assert_eq!(format_index(0x1A00), "1A00");
        assert!(matches!(parse_index("xyz"), Err(OdError::InvalidIndex(_))));
    }
}
