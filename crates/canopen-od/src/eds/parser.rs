// crates/canopen-od/src/eds/parser.rs

use super::{
    COMMENTS, DATE_FORMAT, DEVICE_COMMISSIONING, DEVICE_COMMISSIONING_ALT, DEVICE_INFO,
    DUMMY_USAGE, FILE_INFO, MANDATORY_OBJECTS, MANUFACTURER_OBJECTS, OPTIONAL_OBJECTS,
    SUB_PARAMETER_NAME, TIME_FORMAT, TIME_FORMAT_SECONDS, unescape,
};
use crate::device::{
    BaudRates, Device, DeviceCommissioning, DeviceInfo, FileInfo, VendorSection,
};
use crate::error::{EdsError, ParseReason, ValueError};
use crate::od::{OdObject, OdSubObject, parse_value};
use crate::types::{AccessPdo, AccessSdo, AccessSrdo, DataType, ObjectType};
use crate::utils;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, trace, warn};
use std::collections::{BTreeMap, HashSet};

/// Parses an EDS document into a [`Device`].
///
/// Named sections the engine does not interpret are kept as
/// [`VendorSection`]s so that writing the device back loses nothing.
///
/// # Errors
/// Returns `EdsError::Parse` with the 1-based line number and text of the
/// first offending line.
pub fn load_eds_from_str(content: &str) -> Result<Device, EdsError> {
    // 1. Split the text into sections of key/value lines.
    let sections = tokenize(content)?;

    // 2. Sort the sections by kind.
    let mut device = Device::new();
    let mut commissioning = None;
    let mut objects: BTreeMap<u16, ObjectSections<'_>> = BTreeMap::new();

    for section in &sections {
        match classify(section)? {
            SectionKind::FileInfo => device.file_info = parse_file_info(section)?,
            SectionKind::DeviceInfo => device.device_info = parse_device_info(section)?,
            SectionKind::Commissioning => commissioning = Some(section),
            SectionKind::Comments => device.comments = parse_comments(section)?,
            SectionKind::Regenerated => {
                debug!("Skipping [{}], it is regenerated on write", section.name);
            }
            SectionKind::Object { index, sub_index } => {
                let slot = objects.entry(index).or_default();
                match sub_index {
                    None => slot.main = Some(section),
                    Some(sub_index) => {
                        if slot.subs.insert(sub_index, section).is_some() {
                            return Err(section.error(ParseReason::DuplicateSection));
                        }
                    }
                }
            }
            SectionKind::Vendor => {
                warn!("Preserving unrecognized section [{}] verbatim", section.name);
                device.vendor_sections.push(VendorSection {
                    name: section.name.to_string(),
                    entries: section
                        .entries
                        .iter()
                        .map(|e| (e.key.to_string(), e.text()))
                        .collect(),
                });
            }
        }
    }

    // 3. The node id is needed to check `$NODEID` values, so commissioning goes first.
    if let Some(section) = commissioning {
        device.commissioning = parse_commissioning(section)?;
    }
    let node_id = device.commissioning.node_id;

    // 4. Build the object dictionary.
    for (index, sections) in &objects {
        let object = parse_object(sections, node_id)?;
        trace!(
            "Parsed object 0x{index:04X} '{}' with {} sub-objects",
            object.name,
            object.sub_objects.len()
        );
        device.object_dictionary.insert(*index, object);
    }
    debug!(
        "Loaded EDS with {} objects and {} vendor sections",
        device.object_dictionary.len(),
        device.vendor_sections.len()
    );

    Ok(device)
}

struct RawEntry<'a> {
    key: &'a str,
    value: &'a str,
    line: usize,
    text: &'a str,
}

impl RawEntry<'_> {
    /// The value with line escapes undone.
    fn text(&self) -> String {
        unescape(self.value).into_owned()
    }

    fn invalid(&self, data_type: Option<DataType>) -> EdsError {
        parse_error(
            self.line,
            self.text,
            ParseReason::InvalidValue {
                key: self.key.to_string(),
                data_type,
            },
        )
    }
}

struct RawSection<'a> {
    name: &'a str,
    line: usize,
    text: &'a str,
    entries: Vec<RawEntry<'a>>,
}

impl<'a> RawSection<'a> {
    fn error(&self, reason: ParseReason) -> EdsError {
        parse_error(self.line, self.text, reason)
    }

    /// Keys are matched case-insensitively.
    fn get(&self, key: &str) -> Option<&RawEntry<'a>> {
        self.entries.iter().find(|e| e.key.eq_ignore_ascii_case(key))
    }

    fn required(&self, key: &'static str) -> Result<&RawEntry<'a>, EdsError> {
        self.get(key)
            .ok_or_else(|| self.error(ParseReason::MissingKey(key)))
    }

    fn text(&self, key: &str) -> String {
        self.get(key).map(RawEntry::text).unwrap_or_default()
    }

    /// `None` when the key is absent or empty.
    fn number<T: TryFrom<u64>>(&self, key: &str) -> Result<Option<T>, EdsError> {
        match self.get(key) {
            Some(entry) if !entry.value.is_empty() => utils::parse_unsigned(entry.value)
                .map(Some)
                .ok_or_else(|| entry.invalid(None)),
            _ => Ok(None),
        }
    }

    fn flag(&self, key: &str) -> Result<bool, EdsError> {
        match self.get(key) {
            Some(entry) if !entry.value.is_empty() => {
                utils::parse_bool(entry.value).ok_or_else(|| entry.invalid(None))
            }
            _ => Ok(false),
        }
    }

    fn timestamp(&self, time_key: &str, date_key: &str) -> Result<Option<NaiveDateTime>, EdsError> {
        let Some(date_entry) = self.get(date_key).filter(|e| !e.value.is_empty()) else {
            return Ok(None);
        };
        let date = NaiveDate::parse_from_str(date_entry.value, DATE_FORMAT)
            .map_err(|_| date_entry.invalid(None))?;
        let time = match self.get(time_key).filter(|e| !e.value.is_empty()) {
            Some(entry) => {
                let value = entry.value.replace(' ', "");
                NaiveTime::parse_from_str(&value, TIME_FORMAT)
                    .or_else(|_| NaiveTime::parse_from_str(&value, TIME_FORMAT_SECONDS))
                    .map_err(|_| entry.invalid(None))?
            }
            None => NaiveTime::MIN,
        };
        Ok(Some(date.and_time(time)))
    }
}

fn parse_error(line: usize, text: &str, reason: ParseReason) -> EdsError {
    EdsError::Parse {
        line,
        text: text.to_string(),
        reason,
    }
}

fn tokenize(content: &str) -> Result<Vec<RawSection<'_>>, EdsError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut sections: Vec<RawSection<'_>> = Vec::new();
    let mut seen = HashSet::new();

    for (i, raw_line) in content.lines().enumerate() {
        let line = i + 1;
        let text = raw_line.trim();
        if text.is_empty() || text.starts_with(';') {
            continue;
        }

        if let Some(rest) = text.strip_prefix('[') {
            let name = rest
                .strip_suffix(']')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| parse_error(line, text, ParseReason::MalformedLine))?;
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(parse_error(line, text, ParseReason::DuplicateSection));
            }
            sections.push(RawSection {
                name,
                line,
                text,
                entries: Vec::new(),
            });
        } else if let Some((key, value)) = text.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                return Err(parse_error(line, text, ParseReason::MalformedLine));
            }
            let section = sections
                .last_mut()
                .ok_or_else(|| parse_error(line, text, ParseReason::KeyOutsideSection))?;
            section.entries.push(RawEntry {
                key,
                value: value.trim(),
                line,
                text,
            });
        } else {
            return Err(parse_error(line, text, ParseReason::MalformedLine));
        }
    }
    Ok(sections)
}

enum SectionKind {
    FileInfo,
    DeviceInfo,
    Commissioning,
    Comments,
    /// Object lists and dummy usage, rebuilt from the dictionary on write.
    Regenerated,
    Object { index: u16, sub_index: Option<u8> },
    Vendor,
}

fn classify(section: &RawSection<'_>) -> Result<SectionKind, EdsError> {
    let name = section.name;
    if name.len() >= 4 && name.as_bytes()[..4].iter().all(u8::is_ascii_hexdigit) {
        // The first four bytes are ASCII, so slicing at 4 is on a char boundary.
        let (index_text, rest) = name.split_at(4);
        let index = utils::parse_hex_u16(index_text)
            .ok_or_else(|| section.error(ParseReason::InvalidSectionName))?;
        if rest.is_empty() {
            return Ok(SectionKind::Object {
                index,
                sub_index: None,
            });
        }
        let sub_index = rest
            .get(..3)
            .filter(|prefix| prefix.eq_ignore_ascii_case("sub"))
            .and_then(|_| rest.get(3..))
            .and_then(utils::parse_hex_u8)
            .ok_or_else(|| section.error(ParseReason::InvalidSectionName))?;
        return Ok(SectionKind::Object {
            index,
            sub_index: Some(sub_index),
        });
    }

    let is = |expected: &str| name.eq_ignore_ascii_case(expected);
    Ok(if is(FILE_INFO) {
        SectionKind::FileInfo
    } else if is(DEVICE_INFO) {
        SectionKind::DeviceInfo
    } else if is(DEVICE_COMMISSIONING) || is(DEVICE_COMMISSIONING_ALT) {
        SectionKind::Commissioning
    } else if is(COMMENTS) {
        SectionKind::Comments
    } else if is(MANDATORY_OBJECTS)
        || is(OPTIONAL_OBJECTS)
        || is(MANUFACTURER_OBJECTS)
        || is(DUMMY_USAGE)
    {
        SectionKind::Regenerated
    } else {
        SectionKind::Vendor
    })
}

fn parse_file_info(section: &RawSection<'_>) -> Result<FileInfo, EdsError> {
    debug!("Parsing [{}]", section.name);
    Ok(FileInfo {
        file_name: section.text("FileName"),
        file_version: section.number("FileVersion")?.unwrap_or(0),
        file_revision: section.number("FileRevision")?.unwrap_or(0),
        eds_version: section.text("EDSVersion"),
        description: section.text("Description"),
        creation: section.timestamp("CreationTime", "CreationDate")?,
        created_by: section.text("CreatedBy"),
        modification: section.timestamp("ModificationTime", "ModificationDate")?,
        modified_by: section.text("ModifiedBy"),
    })
}

fn parse_device_info(section: &RawSection<'_>) -> Result<DeviceInfo, EdsError> {
    debug!("Parsing [{}]", section.name);
    let mut baud_rates = BaudRates::default();
    for rate in BaudRates::RATES {
        baud_rates.set(rate, section.flag(&format!("BaudRate_{rate}"))?);
    }
    Ok(DeviceInfo {
        vendor_name: section.text("VendorName"),
        vendor_number: section.number("VendorNumber")?,
        product_name: section.text("ProductName"),
        product_number: section.number("ProductNumber")?,
        revision_number: section.number("RevisionNumber")?,
        order_code: section.text("OrderCode"),
        baud_rates,
        simple_boot_up_master: section.flag("SimpleBootUpMaster")?,
        simple_boot_up_slave: section.flag("SimpleBootUpSlave")?,
        granularity: section.number("Granularity")?.unwrap_or(0),
        dynamic_channels_supported: section.number("DynamicChannelsSupported")?.unwrap_or(0),
        group_messaging: section.flag("GroupMessaging")?,
        nr_of_rx_pdo: section.number("NrOfRXPDO")?.unwrap_or(0),
        nr_of_tx_pdo: section.number("NrOfTXPDO")?.unwrap_or(0),
        lss_supported: section.flag("LSS_Supported")?,
    })
}

fn parse_commissioning(section: &RawSection<'_>) -> Result<DeviceCommissioning, EdsError> {
    debug!("Parsing [{}]", section.name);
    Ok(DeviceCommissioning {
        node_id: section.number("NodeID")?.unwrap_or(0),
        node_name: section.text("NodeName"),
        baud_rate: section.number("Baudrate")?.unwrap_or(0),
        net_number: section.number("NetNumber")?.unwrap_or(0),
        network_name: section.text("NetworkName"),
        canopen_manager: section.flag("CANopenManager")?,
        lss_serial_number: section.number("LSS_SerialNumber")?.unwrap_or(0),
    })
}

/// Reads the `LineN` keys numbered up to `Lines`. Missing lines are dropped,
/// so the result never outgrows the section.
fn parse_comments(section: &RawSection<'_>) -> Result<Vec<String>, EdsError> {
    let declared: u32 = section.number("Lines")?.unwrap_or(0);
    let mut lines: BTreeMap<u32, String> = BTreeMap::new();
    for entry in &section.entries {
        let number = entry
            .key
            .get(..4)
            .filter(|prefix| prefix.eq_ignore_ascii_case("Line"))
            .and_then(|_| entry.key[4..].parse::<u32>().ok());
        if let Some(n) = number.filter(|n| (1..=declared).contains(n)) {
            lines.insert(n, entry.text());
        }
    }
    if lines.len() as u64 != u64::from(declared) {
        warn!(
            "[{}] declares Lines={declared} but has {} of those lines",
            section.name,
            lines.len()
        );
    }
    Ok(lines.into_values().collect())
}

#[derive(Default)]
struct ObjectSections<'s> {
    main: Option<&'s RawSection<'s>>,
    subs: BTreeMap<u8, &'s RawSection<'s>>,
}

fn parse_object(sections: &ObjectSections<'_>, node_id: u8) -> Result<OdObject, EdsError> {
    let main = match sections.main {
        Some(main) => main,
        None => {
            // Only sub sections were seen for this index.
            let orphan = sections.subs.values().next();
            return Err(match orphan {
                Some(orphan) => orphan.error(ParseReason::MissingParentSection),
                None => parse_error(0, "", ParseReason::MissingParentSection),
            });
        }
    };

    let name = main.required("ParameterName")?.text();
    let object_type = match main.get("ObjectType").filter(|e| !e.value.is_empty()) {
        Some(entry) => ObjectType::parse(entry.value).ok_or_else(|| entry.invalid(None))?,
        None => ObjectType::Var,
    };

    match object_type {
        ObjectType::Var => {
            if !sections.subs.is_empty() {
                warn!(
                    "[{}] is a VAR; ignoring its {} sub-index sections",
                    main.name,
                    sections.subs.len()
                );
            }
            let mut sub = parse_sub_object(main, None, node_id)?;
            if let Some(entry) = main.get(SUB_PARAMETER_NAME) {
                sub.name = entry.text();
            }
            Ok(OdObject::var(name, sub))
        }
        ObjectType::Array | ObjectType::Record => {
            let parent_type = main.get("DataType");
            let mut object = OdObject::new(name, object_type);
            for (sub_index, section) in &sections.subs {
                let sub = parse_sub_object(section, parent_type, node_id)?;
                object.sub_objects.insert(*sub_index, sub);
            }
            if let Some(entry) = main.get("SubNumber") {
                let declared: usize = utils::parse_unsigned(entry.value)
                    .ok_or_else(|| entry.invalid(None))?;
                if declared != sections.subs.len() {
                    warn!(
                        "[{}] declares SubNumber={declared} but has {} sub-index sections",
                        main.name,
                        sections.subs.len()
                    );
                }
            }
            if main.get("CompactSubObj").is_some() {
                warn!("[{}] uses CompactSubObj, which is not expanded", main.name);
            }
            Ok(object)
        }
    }
}

fn parse_sub_object(
    section: &RawSection<'_>,
    parent_type: Option<&RawEntry<'_>>,
    node_id: u8,
) -> Result<OdSubObject, EdsError> {
    let name = section.required("ParameterName")?.text();

    let data_type = match (section.get("DataType"), parent_type) {
        (Some(entry), _) => entry,
        (None, Some(parent)) => {
            warn!(
                "[{}] has no DataType, using its parent's {}",
                section.name, parent.value
            );
            parent
        }
        (None, None) => return Err(section.error(ParseReason::MissingKey("DataType"))),
    };
    let data_type = DataType::parse(data_type.value).ok_or_else(|| data_type.invalid(None))?;

    let access = section.required("AccessType")?;
    let access_sdo = AccessSdo::parse(access.value).ok_or_else(|| access.invalid(None))?;

    let default_value = match section.get("DefaultValue") {
        Some(entry) => checked_value(entry, data_type, node_id)?,
        None => String::new(),
    };
    let optional = |key: &str| -> Result<Option<String>, EdsError> {
        section
            .get(key)
            .filter(|e| !e.value.is_empty())
            .map(|e| checked_value(e, data_type, node_id))
            .transpose()
    };
    let actual_value = optional("ParameterValue")?;
    let low_limit = optional("LowLimit")?;
    let high_limit = optional("HighLimit")?;

    let pdo_mapping = match section.get("PDOMapping").filter(|e| !e.value.is_empty()) {
        Some(entry) => Some(utils::parse_bool(entry.value).ok_or_else(|| entry.invalid(None))?),
        None => None,
    };
    let access_pdo = match section.get("AccessPDO") {
        Some(entry) => AccessPdo::from_eds_token(entry.value).ok_or_else(|| entry.invalid(None))?,
        None if pdo_mapping == Some(true) => AccessPdo::Optional,
        None => AccessPdo::No,
    };
    let access_srdo = match section.get("AccessSRDO") {
        Some(entry) => AccessSrdo::parse(entry.value).ok_or_else(|| entry.invalid(None))?,
        None => AccessSrdo::No,
    };

    Ok(OdSubObject {
        name,
        data_type,
        access_sdo,
        access_pdo,
        access_srdo,
        default_value,
        actual_value,
        low_limit,
        high_limit,
        pdo_mapping,
    })
}

/// Rejects values that do not fit the grammar of `data_type`. Values that parse
/// but exceed the type's range are left for the validator to report.
fn checked_value(
    entry: &RawEntry<'_>,
    data_type: DataType,
    node_id: u8,
) -> Result<String, EdsError> {
    let value = entry.text();
    match parse_value(data_type, &value, node_id) {
        Ok(_) | Err(ValueError::OutOfRange { .. }) => Ok(value),
        Err(ValueError::Unparseable { .. }) => Err(entry.invalid(Some(data_type))),
    }
}
