//! Type mapping from schema value kinds to Rust and JSON-schema types.

use tqlgen_schema::{Schema, ValueKind};

/// Rust type for a value kind.
pub fn rust_type(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Text => "String",
        ValueKind::Integer => "i64",
        ValueKind::Decimal => "f64",
        ValueKind::Boolean => "bool",
        ValueKind::Timestamp => "chrono::DateTime<chrono::Utc>",
    }
}

/// JSON-schema type name for a value kind. Timestamps are ISO 8601 strings.
pub fn json_type(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Text | ValueKind::Timestamp => "string",
        ValueKind::Integer => "integer",
        ValueKind::Decimal => "number",
        ValueKind::Boolean => "boolean",
    }
}

/// Wrap a type in `Option` when the field is not required.
pub fn apply_required(ty: &str, required: bool) -> String {
    if required {
        ty.to_string()
    } else {
        format!("Option<{ty}>")
    }
}

/// Value kind of an owned attribute. Attributes missing from the schema are text.
pub fn attribute_kind(schema: &Schema, attribute: &str) -> ValueKind {
    schema
        .attribute(attribute)
        .map_or(ValueKind::Text, |a| a.value_kind())
}
