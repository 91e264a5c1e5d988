//! Rust source renderers.
//!
//! Each template turns one view model into the text of a Rust module. Output
//! is a pure function of the view: rendering the same view twice gives the
//! same bytes.

pub mod constants;
pub mod dto;
pub mod model;
pub mod registry;

pub use constants::ConstantsTemplate;
pub use dto::DtoTemplate;
pub use model::ModelTemplate;
pub use registry::RegistryTemplate;

use std::fmt::{self, Write};

use crate::builders::FieldView;

/// Banner written at the top of every generated file.
pub const HEADER: &str = "// Code generated by tqlgen; DO NOT EDIT.";

/// Derives of generated data structs.
pub(crate) const DATA_DERIVES: &str = "Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize";

/// Banner and module doc line. Macro output is wrapped in `pub mod` by the
/// caller and skips both.
pub(crate) fn write_header(out: &mut String, enabled: bool, module: &str) -> fmt::Result {
    if enabled {
        writeln!(out, "{HEADER}")?;
        writeln!(out)?;
        if !module.is_empty() {
            writeln!(out, "//! Generated `{module}` module.")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Leave exactly one newline at the end of the output.
pub(crate) fn trim_trailing_blank(out: &mut String) {
    while out.ends_with("\n\n") {
        out.pop();
    }
}

/// Write a struct with one doc line per entry of `doc`.
pub(crate) fn write_struct(
    out: &mut String,
    doc: &[String],
    derives: &str,
    ident: &str,
    fields: &[FieldView],
) -> fmt::Result {
    for line in doc {
        if line.is_empty() {
            writeln!(out, "///")?;
        } else {
            writeln!(out, "/// {line}")?;
        }
    }
    writeln!(out, "#[derive({derives})]")?;
    if fields.is_empty() {
        return writeln!(out, "pub struct {ident} {{}}");
    }
    writeln!(out, "pub struct {ident} {{")?;
    for field in fields {
        write_field(out, field)?;
    }
    writeln!(out, "}}")
}

pub(crate) fn write_field(out: &mut String, field: &FieldView) -> fmt::Result {
    for line in &field.doc {
        writeln!(out, "    /// {line}")?;
    }
    if !field.serde.is_empty() {
        writeln!(out, "    #[serde({})]", field.serde.join(", "))?;
    }
    writeln!(out, "    pub {}: {},", field.ident, field.ty)
}

/// `&["a", "b"]`
pub(crate) fn str_slice<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("{:?}", s.as_ref())).collect();
    format!("&[{}]", quoted.join(", "))
}

/// `pub const NAME: &[&str] = &[...];`
pub(crate) fn write_name_list(
    out: &mut String,
    doc: &str,
    ident: &str,
    items: &[String],
) -> fmt::Result {
    writeln!(out, "/// {doc}")?;
    writeln!(out, "pub const {ident}: &[&str] = {};", str_slice(items))?;
    writeln!(out)
}
