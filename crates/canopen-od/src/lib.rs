// src/lib.rs

#![doc = "CANopen object dictionary engine."]
#![doc = ""]
#![doc = "Holds a device description in memory and provides:"]
#![doc = "- `load_eds_from_str` / `save_eds_to_string`: the INI-style EDS format."]
#![doc = "- `validate`: rule-based consistency checks producing `Finding`s."]
#![doc = "- `generate`: CANopenNode-style `CO_OD.h` / `CO_OD.c` text."]
#![doc = "- `merge_module`: folding a module's objects into a base device."]
#![doc = ""]
#![doc = "The XML (XDD) format lives in the `canopen-od-xdd` crate."]

// --- Foundation Modules ---
pub mod cancel;
pub mod error;
pub mod types;
pub mod utils;

// --- Model ---
pub mod device;
pub mod od;
pub mod pdo;

// --- Services ---
pub mod eds;
pub mod export;
pub mod merge;
pub mod validation;

// --- Top-level Exports ---
pub use cancel::CancelToken;
pub use device::{BaudRates, Device, DeviceCommissioning, DeviceInfo, FileInfo, VendorSection};
pub use eds::{load_eds_from_str, save_eds_to_string};
pub use error::{Cancelled, EdsError, OdError, ParseReason, ValueError};
pub use export::{ExportError, ExportOptions, ExportOutput, generate, generate_with_cancel};
pub use merge::{MergeConflict, MergePolicy, MergeReport, merge_module};
pub use od::{ObjectDictionary, OdChange, OdObject, OdSubObject, OdValue, SubscriptionId};
pub use types::{AccessPdo, AccessSdo, AccessSrdo, DataType, ObjectType};
pub use validation::{
    Finding, FindingCode, Severity, SeverityCounts, ValidationOptions, validate,
    validate_with_cancel,
};
