// src/lib.rs

#![doc = "Reads and writes CANopen XML device descriptions (CiA 311 XDD/XDC)."]
#![doc = ""]
#![doc = "The XML is mapped onto the same `canopen_od::Device` the EDS reader produces:"]
#![doc = "- `load_xdd_from_str`: parses an XDD/XDC document into a `Device`."]
#![doc = "- `save_xdd_to_string`: serializes a `Device` back into an XDD document."]

// --- Crate Modules ---

mod builder;
mod error;
mod model;
mod parser;
mod resolver;

// --- Public API Re-exports ---

pub use builder::save_xdd_to_string;
pub use error::XddError;
pub use parser::load_xdd_from_str;
