// crates/canopen-od/src/export/mod.rs

//! CANopenNode-style `CO_OD.h` / `CO_OD.c` generation.

pub mod identifier;
mod literal;

use crate::cancel::CancelToken;
use crate::device::Device;
use crate::error::{Cancelled, ValueError};
use crate::od::OdObject;
use crate::types::ObjectType;
use chrono::{DateTime, Utc};
use identifier::{include_guard, header_file_name, object_symbol, struct_fields, type_name};
use literal::render;
use log::{debug, info, warn};
use thiserror::Error;

/// Why one object could not be generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportFailure {
    #[error("DOMAIN values have no static initializer")]
    Domain,
    #[error("an empty OCTET_STRING has no C representation")]
    EmptyOctetString,
    #[error(transparent)]
    InvalidValue(ValueError),
    #[error("the object has no sub-objects")]
    EmptyObject,
    #[error("the VAR object has no sub-index 0")]
    MissingValue,
    #[error("{0}")]
    Unsupported(String),
}

/// A per-object generation failure. The object is left out of both files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("object 0x{index:04X} sub-index {sub_index}: {reason}")]
pub struct ExportError {
    pub index: u16,
    pub sub_index: u8,
    pub reason: ExportFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// File name used for the include guard and the source's `#include`.
    pub header_name: String,
    /// Timestamp for the banner comment; the line is left out when `None`.
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            header_name: "CO_OD.h".to_string(),
            generated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportOutput {
    pub header: String,
    pub source: String,
    pub errors: Vec<ExportError>,
}

/// Generates the header and source text for `device`.
pub fn generate(device: &Device, options: &ExportOptions) -> ExportOutput {
    // A token nobody else holds can never fire.
    generate_with_cancel(device, options, &CancelToken::new()).unwrap_or_default()
}

/// Like [`generate`], stopping with `Err(Cancelled)` once `cancel` fires.
pub fn generate_with_cancel(
    device: &Device,
    options: &ExportOptions,
    cancel: &CancelToken,
) -> Result<ExportOutput, Cancelled> {
    let guard = include_guard(&options.header_name);
    let mut output = ExportOutput {
        header: banner("header", options),
        source: banner("source", options),
        errors: Vec::new(),
    };
    output.header.push_str(&format!(
        "#ifndef {guard}\n#define {guard}\n\n#include <stdint.h>\n\n"
    ));
    output.source.push_str(&format!(
        "#include \"{}\"\n\n",
        header_file_name(&options.header_name)
    ));

    for (index, object) in device.object_dictionary.iter() {
        if cancel.is_cancelled() {
            info!("Code generation cancelled before object 0x{index:04X}");
            return Err(Cancelled);
        }
        match emit_object(index, object) {
            Ok((declaration, definition)) => {
                output.header.push_str(&declaration);
                output.source.push_str(&definition);
            }
            Err(err) => {
                warn!("Skipping {err}");
                output.errors.push(err);
            }
        }
    }

    output.header.push_str(&format!("\n#endif /* {guard} */\n"));
    debug!(
        "Generated {} objects, skipped {}",
        device.object_dictionary.len() - output.errors.len(),
        output.errors.len()
    );
    Ok(output)
}

fn banner(kind: &str, options: &ExportOptions) -> String {
    let mut text = format!("/*\n * CANopenNode object dictionary {kind}\n");
    if let Some(at) = options.generated_at {
        text.push_str(&format!(" * Generated: {}\n", at.format("%Y-%m-%d %H:%M:%SZ")));
    }
    text.push_str(" */\n");
    text
}

/// Renders one object's header declaration and source definition.
fn emit_object(index: u16, object: &OdObject) -> Result<(String, String), ExportError> {
    let fail = |sub_index: u8, reason: ExportFailure| ExportError {
        index,
        sub_index,
        reason,
    };
    let symbol = object_symbol(index);

    match object.object_type {
        ObjectType::Var => {
            let sub = object.sub(0).ok_or_else(|| fail(0, ExportFailure::MissingValue))?;
            let rendered = render(sub).map_err(|reason| fail(0, reason))?;
            let declarator = rendered.ctype.declare(&symbol);
            Ok((
                format!("extern {declarator};\n"),
                format!("{declarator} = {};\n", rendered.literal),
            ))
        }
        ObjectType::Array | ObjectType::Record => {
            if object.sub_objects.is_empty() {
                return Err(fail(0, ExportFailure::EmptyObject));
            }
            let type_name = type_name(index);
            let mut declaration = String::from("\ntypedef struct {\n");
            let mut definition = format!("\n{type_name} {symbol} = {{\n");

            for (sub_index, field) in struct_fields(object) {
                let Some(sub) = object.sub(sub_index) else {
                    continue;
                };
                let rendered = render(sub).map_err(|reason| fail(sub_index, reason))?;
                declaration.push_str(&format!(
                    "    {}; /* sub{sub_index} */\n",
                    rendered.ctype.declare(&field)
                ));
                definition.push_str(&format!("    .{field} = {},\n", rendered.literal));
            }

            declaration.push_str(&format!("}} {type_name};\nextern {type_name} {symbol};\n"));
            definition.push_str("};\n");
            Ok((declaration, definition))
        }
    }
}
