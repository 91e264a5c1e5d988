//! Render-data builders.
//!
//! Each builder reads an (optionally accumulated) [`Schema`] and returns a
//! self-contained, sorted view model. Builders never modify the schema.

pub mod dto;
pub mod model;
pub mod registry;

pub use dto::{
    BaseStructView, CompositeView, DtoBuilder, DtoTraits, DtoView, EntityDtoView,
    RelationDtoView,
};
pub use model::{ModelBuilder, ModelView, StructView, TypeView};
pub use registry::{
    ConstView, FunctionView, RegistryBuilder, RegistryView, RoleView, schema_fingerprint,
};

use tqlgen_schema::{AttributeSpec, OwnsSpec, Schema};

use crate::naming::{Naming, dedupe};
use crate::types::{apply_required, attribute_kind, rust_type};

/// A struct field with its serde attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    /// Rust identifier, possibly raw.
    pub ident: String,
    /// Serialized name.
    pub name: String,
    /// Rust type.
    pub ty: String,
    /// Entries of the `#[serde(...)]` attribute, already escaped.
    pub serde: Vec<String>,
    /// Doc comment lines.
    pub doc: Vec<String>,
}

impl FieldView {
    /// A field serialized under `name`.
    pub fn new(naming: &Naming, name: &str, ty: impl Into<String>) -> Self {
        Self::with_ident(naming.field_name(name), name, ty)
    }

    /// A field with an explicit identifier.
    pub fn with_ident(ident: impl Into<String>, name: &str, ty: impl Into<String>) -> Self {
        let mut field = Self {
            ident: ident.into(),
            name: name.to_string(),
            ty: ty.into(),
            serde: Vec::new(),
            doc: Vec::new(),
        };
        field.sync_rename();
        field
    }

    /// Keep the `rename` entry in step with the identifier.
    fn sync_rename(&mut self) {
        self.serde.retain(|entry| !entry.starts_with("rename"));
        let bare = self.ident.strip_prefix("r#").unwrap_or(&self.ident);
        if bare != self.name {
            self.serde.insert(0, format!("rename = {:?}", self.name));
        }
    }

    /// Flatten the field's struct into the parent.
    pub fn flattened(mut self) -> Self {
        self.serde = vec!["flatten".to_string()];
        self
    }

    /// Leave the field out when serializing `None`.
    pub fn skip_none(mut self) -> Self {
        if self.ty.starts_with("Option<") {
            self.serde.push("skip_serializing_if = \"Option::is_none\"".to_string());
        }
        self
    }

    /// Add a doc line.
    pub fn documented(mut self, line: impl Into<String>) -> Self {
        self.doc.push(line.into());
        self
    }

    /// Whether the field is wrapped in `Option`.
    pub fn is_optional(&self) -> bool {
        self.ty.starts_with("Option<")
    }
}

/// An enum generated from an attribute's `@values`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumView {
    /// Rust type name.
    pub ident: String,
    /// Attribute name.
    pub attribute: String,
    /// Variants in declaration order.
    pub variants: Vec<VariantView>,
}

/// One enumerated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantView {
    pub ident: String,
    pub value: String,
}

impl EnumView {
    /// Build the enum for an attribute, deduplicating repeated values.
    pub fn from_attribute(naming: &Naming, attribute: &AttributeSpec) -> Self {
        let mut values: Vec<&str> = Vec::new();
        for value in &attribute.values {
            if !values.contains(&value.as_str()) {
                values.push(value);
            }
        }
        let mut idents: Vec<String> = values.iter().map(|v| naming.variant_name(v)).collect();
        dedupe(&mut idents);

        Self {
            ident: naming.type_name(&attribute.name),
            attribute: attribute.name.to_string(),
            variants: idents
                .into_iter()
                .zip(values)
                .map(|(ident, value)| VariantView {
                    ident,
                    value: value.to_string(),
                })
                .collect(),
        }
    }
}

/// Ownership entries sorted by attribute name.
pub(crate) fn sorted_owns(owns: &[OwnsSpec]) -> Vec<&OwnsSpec> {
    let mut sorted: Vec<&OwnsSpec> = owns.iter().collect();
    sorted.sort_by(|a, b| a.attribute.cmp(&b.attribute));
    sorted
}

/// Ownership annotations as written, e.g. `@key @card(1..3)`. Empty when
/// the ownership carries none.
pub(crate) fn ownership_annotations(owns: &OwnsSpec) -> String {
    let mut parts = Vec::new();
    if owns.key {
        parts.push("@key".to_string());
    }
    if owns.unique {
        parts.push("@unique".to_string());
    }
    if let Some(card) = &owns.card {
        parts.push(format!("@card({card})"));
    }
    parts.join(" ")
}

/// Rust type of an owned attribute with the requiredness applied.
pub(crate) fn owned_type(schema: &Schema, attribute: &str, required: bool) -> String {
    apply_required(rust_type(attribute_kind(schema, attribute)), required)
}

/// Make serialized names and then identifiers unique within one struct.
/// Earlier fields keep their names; flattened fields have no key of their own.
pub(crate) fn dedupe_fields(fields: &mut [FieldView]) {
    let keyed: Vec<usize> = (0..fields.len())
        .filter(|&i| !fields[i].serde.iter().any(|entry| entry == "flatten"))
        .collect();
    let mut names: Vec<String> = keyed.iter().map(|&i| fields[i].name.clone()).collect();
    dedupe(&mut names);
    for (&i, name) in keyed.iter().zip(names) {
        let field = &mut fields[i];
        if let Some(suffix) = name.strip_prefix(field.name.as_str()).filter(|s| !s.is_empty()) {
            field.ident = format!("{}{suffix}", field.ident.trim_start_matches("r#"));
            field.name = name.clone();
            field.sync_rename();
        }
    }

    let mut idents: Vec<String> = fields.iter().map(|f| f.ident.clone()).collect();
    dedupe(&mut idents);
    for (field, ident) in fields.iter_mut().zip(idents) {
        if field.ident != ident {
            field.ident = ident;
            field.sync_rename();
        }
    }
}
