// crates/canopen-od/src/validation/mod.rs

//! Rule-based checks over a [`Device`].
//!
//! Rules run in a fixed order and each one reports every problem it sees; a
//! failing rule never stops the ones after it. The device is only read.

mod naming;
mod pdo;
mod structure;
mod values;

use crate::cancel::CancelToken;
use crate::device::Device;
use crate::error::Cancelled;
use crate::types::ObjectType;
use core::fmt;
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

/// Stable identifier of the check that produced a [`Finding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingCode {
    MandatoryObjectMissing,
    ObjectTypeMismatch,
    EmptyObject,
    VarSubObjects,
    MissingCountEntry,
    SubIndexGap,
    CountMismatch,
    DefaultUnparseable,
    LimitUnparseable,
    ValueOutOfRange,
    LimitsInverted,
    DefaultOutsideLimits,
    PdoMappableWithoutLength,
    PdoMappingInvalidEntry,
    PdoMappingMissingTarget,
    PdoMappingNotMappable,
    PdoMappingLengthMismatch,
    PdoMappingOverflow,
    CobIdOutOfRange,
    CobIdCollision,
    EmptyName,
    DuplicateName,
    IdentifierCollision,
    ReservedIdentifier,
}

impl FindingCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            FindingCode::MandatoryObjectMissing => "MANDATORY_OBJECT_MISSING",
            FindingCode::ObjectTypeMismatch => "OBJECT_TYPE_MISMATCH",
            FindingCode::EmptyObject => "EMPTY_OBJECT",
            FindingCode::VarSubObjects => "VAR_SUB_OBJECTS",
            FindingCode::MissingCountEntry => "MISSING_COUNT_ENTRY",
            FindingCode::SubIndexGap => "SUB_INDEX_GAP",
            FindingCode::CountMismatch => "COUNT_MISMATCH",
            FindingCode::DefaultUnparseable => "DEFAULT_UNPARSEABLE",
            FindingCode::LimitUnparseable => "LIMIT_UNPARSEABLE",
            FindingCode::ValueOutOfRange => "VALUE_OUT_OF_RANGE",
            FindingCode::LimitsInverted => "LIMITS_INVERTED",
            FindingCode::DefaultOutsideLimits => "DEFAULT_OUTSIDE_LIMITS",
            FindingCode::PdoMappableWithoutLength => "PDO_MAPPABLE_WITHOUT_LENGTH",
            FindingCode::PdoMappingInvalidEntry => "PDO_MAPPING_INVALID_ENTRY",
            FindingCode::PdoMappingMissingTarget => "PDO_MAPPING_MISSING_TARGET",
            FindingCode::PdoMappingNotMappable => "PDO_MAPPING_NOT_MAPPABLE",
            FindingCode::PdoMappingLengthMismatch => "PDO_MAPPING_LENGTH_MISMATCH",
            FindingCode::PdoMappingOverflow => "PDO_MAPPING_OVERFLOW",
            FindingCode::CobIdOutOfRange => "COB_ID_OUT_OF_RANGE",
            FindingCode::CobIdCollision => "COB_ID_COLLISION",
            FindingCode::EmptyName => "EMPTY_NAME",
            FindingCode::DuplicateName => "DUPLICATE_NAME",
            FindingCode::IdentifierCollision => "IDENTIFIER_COLLISION",
            FindingCode::ReservedIdentifier => "RESERVED_IDENTIFIER",
        }
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub code: FindingCode,
    pub index: Option<u16>,
    pub sub_index: Option<u8>,
    pub message: String,
}

impl Finding {
    pub(crate) fn error(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            index: None,
            sub_index: None,
            message: message.into(),
        }
    }

    pub(crate) fn warning(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message)
        }
    }

    pub(crate) fn at(mut self, index: u16, sub_index: Option<u8>) -> Self {
        self.index = Some(index);
        self.sub_index = sub_index;
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.severity, self.code)?;
        match (self.index, self.sub_index) {
            (Some(index), Some(sub)) => write!(f, " 0x{index:04X}sub{sub}")?,
            (Some(index), None) => write!(f, " 0x{index:04X}")?,
            _ => {}
        }
        write!(f, ": {}", self.message)
    }
}

/// An object a device must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MandatoryObject {
    pub index: u16,
    pub object_type: ObjectType,
    pub name: String,
}

impl MandatoryObject {
    pub fn new(index: u16, object_type: ObjectType, name: impl Into<String>) -> Self {
        Self {
            index,
            object_type,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    pub mandatory_objects: Vec<MandatoryObject>,
    /// Largest total mapping length of one PDO, in bits.
    pub max_pdo_bits: u32,
    /// Overrides the commissioning node id when evaluating `$NODEID`.
    pub node_id: Option<u8>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            mandatory_objects: vec![
                MandatoryObject::new(0x1000, ObjectType::Var, "Device type"),
                MandatoryObject::new(0x1001, ObjectType::Var, "Error register"),
                MandatoryObject::new(0x1018, ObjectType::Record, "Identity"),
            ],
            max_pdo_bits: 64,
            node_id: None,
        }
    }
}

/// Read-only state handed to every rule.
pub(crate) struct RuleContext<'a> {
    pub device: &'a Device,
    pub options: &'a ValidationOptions,
    pub node_id: u8,
    cancel: &'a CancelToken,
}

impl RuleContext<'_> {
    /// Called between per-object units of work.
    pub fn checkpoint(&self) -> Result<(), Cancelled> {
        self.cancel.checkpoint()
    }
}

type Rule = fn(&RuleContext<'_>, &mut Vec<Finding>) -> Result<(), Cancelled>;

const RULES: [(&str, Rule); 7] = [
    ("mandatory objects", structure::check_mandatory),
    ("object structure", structure::check_structure),
    ("values", values::check_values),
    ("PDO mapping", pdo::check_mappings),
    ("COB-ID", pdo::check_cob_ids),
    ("naming", naming::check_names),
    ("identifiers", naming::check_identifiers),
];

/// Runs every rule against `device`.
pub fn validate(device: &Device, options: &ValidationOptions) -> Vec<Finding> {
    // A token nobody else holds can never fire.
    validate_with_cancel(device, options, &CancelToken::new()).unwrap_or_default()
}

/// Like [`validate`], stopping with `Err(Cancelled)` once `cancel` fires.
pub fn validate_with_cancel(
    device: &Device,
    options: &ValidationOptions,
    cancel: &CancelToken,
) -> Result<Vec<Finding>, Cancelled> {
    let ctx = RuleContext {
        device,
        options,
        node_id: options.node_id.unwrap_or(device.commissioning.node_id),
        cancel,
    };
    let mut findings = Vec::new();
    for (name, rule) in RULES {
        let before = findings.len();
        rule(&ctx, &mut findings)?;
        trace!("Rule '{name}' reported {} findings", findings.len() - before);
    }
    for finding in &findings {
        trace!("{finding}");
    }
    let counts = SeverityCounts::from_findings(&findings);
    debug!(
        "Validation finished: {} errors, {} warnings, {} info",
        counts.errors, counts.warnings, counts.info
    );
    Ok(findings)
}

/// `true` if any finding is an error.
pub fn has_blocking_findings(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeverityCounts {
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

impl SeverityCounts {
    pub fn from_findings(findings: &[Finding]) -> Self {
        findings
            .iter()
            .fold(Self::default(), |mut counts, finding| {
                match finding.severity {
                    Severity::Error => counts.errors += 1,
                    Severity::Warning => counts.warnings += 1,
                    Severity::Info => counts.info += 1,
                }
                counts
            })
    }
}
