//! Registry template.
//!
//! Tables are `pub static` slices sorted by key; the generated getters look
//! entries up with binary search.

use std::fmt::{self, Write};

use super::{str_slice, trim_trailing_blank, write_header, write_name_list};
use crate::builders::{ConstView, RegistryView};
use crate::error::CodegenResult;

/// Renders a [`RegistryView`] as constant tables and lookup functions.
#[derive(Debug, Clone)]
pub struct RegistryTemplate {
    pub header: bool,
}

impl Default for RegistryTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryTemplate {
    pub fn new() -> Self {
        Self { header: true }
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn render(&self, view: &RegistryView) -> CodegenResult<String> {
        let mut out = String::new();
        write_header(&mut out, self.header, &view.module_name)?;

        write_schema_info(&mut out, view)?;
        write_type_constants(&mut out, view, true)?;
        write_enum_constants(&mut out, view)?;

        let uses_lookup = !view.entity_parents.is_empty()
            || !view.relation_parents.is_empty()
            || !view.entity_keys.is_empty()
            || !view.entity_attributes.is_empty()
            || !view.relation_attributes.is_empty()
            || !view.attribute_value_types.is_empty()
            || !view.attribute_values.is_empty()
            || !view.relation_roles.is_empty()
            || !view.entity_annotations.is_empty()
            || !view.relation_annotations.is_empty()
            || !view.attribute_annotations.is_empty()
            || !view.json_schemas.is_empty();
        if uses_lookup {
            writeln!(out, "fn lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {{")?;
            writeln!(out, "    table")?;
            writeln!(out, "        .binary_search_by(|(k, _)| (*k).cmp(key))")?;
            writeln!(out, "        .ok()")?;
            writeln!(out, "        .map(|i| table[i].1)")?;
            writeln!(out, "}}")?;
            writeln!(out)?;
        }

        write_pairs(
            &mut out,
            "ENTITY_PARENTS",
            "Direct supertype of each entity with one.",
            &view.entity_parents,
            "entity_parent",
        )?;
        write_pairs(
            &mut out,
            "RELATION_PARENTS",
            "Direct supertype of each relation with one.",
            &view.relation_parents,
            "relation_parent",
        )?;
        write_membership(
            &mut out,
            "ABSTRACT_ENTITIES",
            "Abstract entity types.",
            &view.abstract_entities,
            "is_abstract_entity",
        )?;
        write_membership(
            &mut out,
            "ABSTRACT_RELATIONS",
            "Abstract relation types.",
            &view.abstract_relations,
            "is_abstract_relation",
        )?;
        write_lists(
            &mut out,
            "ENTITY_KEYS",
            "Key attributes of each entity.",
            &view.entity_keys,
            "entity_keys",
        )?;
        write_lists(
            &mut out,
            "ENTITY_ATTRIBUTES",
            "Attributes owned by each entity, inherited ones included.",
            &view.entity_attributes,
            "entity_attributes",
        )?;
        write_lists(
            &mut out,
            "RELATION_ATTRIBUTES",
            "Attributes owned by each relation.",
            &view.relation_attributes,
            "relation_attributes",
        )?;
        write_pairs(
            &mut out,
            "ATTRIBUTE_VALUE_TYPES",
            "Declared value type of each attribute.",
            &view.attribute_value_types,
            "attribute_value_type",
        )?;
        write_lists(
            &mut out,
            "ATTRIBUTE_VALUES",
            "Allowed values of enumerated attributes.",
            &view.attribute_values,
            "attribute_values",
        )?;
        write_roles(&mut out, view)?;

        if !view.all_entities.is_empty() {
            write_name_list(&mut out, "Every entity type.", "ALL_ENTITIES", &view.all_entities)?;
        }
        if !view.all_relations.is_empty() {
            write_name_list(&mut out, "Every relation type.", "ALL_RELATIONS", &view.all_relations)?;
        }
        if !view.all_attributes.is_empty() {
            write_name_list(
                &mut out,
                "Every attribute type.",
                "ALL_ATTRIBUTES",
                &view.all_attributes,
            )?;
        }

        write_annotations(&mut out, "ENTITY", "entity", &view.entity_annotations)?;
        write_annotations(&mut out, "RELATION", "relation", &view.relation_annotations)?;
        write_annotations(&mut out, "ATTRIBUTE", "attribute", &view.attribute_annotations)?;
        write_functions(&mut out, view)?;
        write_pairs(
            &mut out,
            "JSON_SCHEMAS",
            "JSON-schema document of each concrete type.",
            &view.json_schemas,
            "json_schema",
        )?;

        trim_trailing_blank(&mut out);
        Ok(out)
    }
}

pub(crate) fn write_schema_info(out: &mut String, view: &RegistryView) -> fmt::Result {
    if let Some(version) = &view.schema_version {
        writeln!(out, "/// Version of the schema this registry was generated from.")?;
        writeln!(out, "pub const SCHEMA_VERSION: &str = {version:?};")?;
        writeln!(out)?;
    }
    if let Some(hash) = &view.schema_hash {
        writeln!(out, "/// Fingerprint of the schema source.")?;
        writeln!(out, "pub const SCHEMA_HASH: &str = {hash:?};")?;
        writeln!(out)?;
    }
    Ok(())
}

/// Entity and relation constants, plus attribute constants when `attributes`
/// is set. Typed mode wraps each group in its newtype.
pub(crate) fn write_type_constants(
    out: &mut String,
    view: &RegistryView,
    attributes: bool,
) -> fmt::Result {
    let mut groups = vec![
        ("EntityType", "Entity types.", &view.entity_constants),
        ("RelationType", "Relation types.", &view.relation_constants),
    ];
    if attributes {
        groups.push(("AttributeType", "Attribute types.", &view.attribute_constants));
    }

    for (newtype, doc, constants) in groups {
        if constants.is_empty() {
            continue;
        }
        if view.typed {
            write_newtype(out, newtype, "A schema type name.")?;
        }
        writeln!(out, "// {doc}")?;
        for c in constants {
            if view.typed {
                writeln!(out, "pub const {}: {newtype} = {newtype}({:?});", c.ident, c.value)?;
            } else {
                writeln!(out, "pub const {}: &str = {:?};", c.ident, c.value)?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_newtype(out: &mut String, name: &str, doc: &str) -> fmt::Result {
    writeln!(out, "/// {doc}")?;
    writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]")?;
    writeln!(out, "pub struct {name}(pub &'static str);")?;
    writeln!(out)?;
    writeln!(out, "impl {name} {{")?;
    writeln!(out, "    pub const fn as_str(&self) -> &'static str {{")?;
    writeln!(out, "        self.0")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl std::fmt::Display for {name} {{")?;
    writeln!(
        out,
        "    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {{"
    )?;
    writeln!(out, "        f.write_str(self.0)")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)
}

pub(crate) fn write_enum_constants(out: &mut String, view: &RegistryView) -> fmt::Result {
    for (attribute, constants) in &view.enum_constants {
        let newtype = view
            .enum_types
            .iter()
            .find(|(a, _)| a == attribute)
            .map(|(_, t)| t.as_str());
        if let Some(t) = newtype {
            write_newtype(out, t, &format!("A value of the `{attribute}` attribute."))?;
        }
        writeln!(out, "// Values of `{attribute}`.")?;
        for ConstView { ident, value } in constants {
            match newtype {
                Some(t) => writeln!(out, "pub const {ident}: {t} = {t}({value:?});")?,
                None => writeln!(out, "pub const {ident}: &str = {value:?};")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// A name to name table with an `Option<&str>` getter.
fn write_pairs(
    out: &mut String,
    table: &str,
    doc: &str,
    rows: &[(String, String)],
    getter: &str,
) -> fmt::Result {
    if rows.is_empty() {
        return Ok(());
    }
    writeln!(out, "/// {doc}")?;
    writeln!(out, "pub static {table}: &[(&str, &str)] = &[")?;
    for (key, value) in rows {
        writeln!(out, "    ({key:?}, {value:?}),")?;
    }
    writeln!(out, "];")?;
    writeln!(out)?;
    writeln!(out, "pub fn {getter}(name: &str) -> Option<&'static str> {{")?;
    writeln!(out, "    lookup({table}, name)")?;
    writeln!(out, "}}")?;
    writeln!(out)
}

/// A name to name-list table with a slice getter, empty for unknown names.
fn write_lists(
    out: &mut String,
    table: &str,
    doc: &str,
    rows: &[(String, Vec<String>)],
    getter: &str,
) -> fmt::Result {
    if rows.is_empty() {
        return Ok(());
    }
    writeln!(out, "/// {doc}")?;
    writeln!(out, "pub static {table}: &[(&str, &[&str])] = &[")?;
    for (key, values) in rows {
        writeln!(out, "    ({key:?}, {}),", str_slice(values))?;
    }
    writeln!(out, "];")?;
    writeln!(out)?;
    writeln!(out, "pub fn {getter}(name: &str) -> &'static [&'static str] {{")?;
    writeln!(out, "    lookup({table}, name).unwrap_or(&[])")?;
    writeln!(out, "}}")?;
    writeln!(out)
}

/// A sorted name set with a membership test.
fn write_membership(
    out: &mut String,
    table: &str,
    doc: &str,
    names: &[String],
    getter: &str,
) -> fmt::Result {
    if names.is_empty() {
        return Ok(());
    }
    writeln!(out, "/// {doc}")?;
    writeln!(out, "pub static {table}: &[&str] = {};", str_slice(names))?;
    writeln!(out)?;
    writeln!(out, "pub fn {getter}(name: &str) -> bool {{")?;
    writeln!(out, "    {table}.binary_search_by(|probe| (*probe).cmp(name)).is_ok()")?;
    writeln!(out, "}}")?;
    writeln!(out)
}

fn write_roles(out: &mut String, view: &RegistryView) -> fmt::Result {
    if view.relation_roles.is_empty() {
        return Ok(());
    }
    writeln!(out, "/// A role of a relation and the most specific types that play it.")?;
    writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq)]")?;
    writeln!(out, "pub struct RoleInfo {{")?;
    writeln!(out, "    pub role_name: &'static str,")?;
    writeln!(out, "    pub player_types: &'static [&'static str],")?;
    writeln!(out, "    pub min_card: u64,")?;
    writeln!(out, "    /// Cardinality as written in the schema.")?;
    writeln!(out, "    pub card: Option<&'static str>,")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "/// Roles of each relation, sorted by role name.")?;
    writeln!(out, "pub static RELATION_ROLES: &[(&str, &[RoleInfo])] = &[")?;
    for (relation, roles) in &view.relation_roles {
        writeln!(out, "    (")?;
        writeln!(out, "        {relation:?},")?;
        writeln!(out, "        &[")?;
        for role in roles {
            writeln!(
                out,
                "            RoleInfo {{ role_name: {:?}, player_types: {}, min_card: {}, card: {:?} }},",
                role.role,
                str_slice(&role.players),
                role.min_card,
                role.card.as_deref()
            )?;
        }
        writeln!(out, "        ],")?;
        writeln!(out, "    ),")?;
    }
    writeln!(out, "];")?;
    writeln!(out)?;

    writeln!(out, "pub fn relation_roles(relation: &str) -> &'static [RoleInfo] {{")?;
    writeln!(out, "    lookup(RELATION_ROLES, relation).unwrap_or(&[])")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(
        out,
        "pub fn role_info(relation: &str, role: &str) -> Option<&'static RoleInfo> {{"
    )?;
    writeln!(out, "    relation_roles(relation).iter().find(|r| r.role_name == role)")?;
    writeln!(out, "}}")?;
    writeln!(out)
}

fn write_annotations(
    out: &mut String,
    prefix: &str,
    kind: &str,
    rows: &[(String, Vec<(String, String)>)],
) -> fmt::Result {
    if rows.is_empty() {
        return Ok(());
    }
    writeln!(out, "/// Comment annotations of {kind} types.")?;
    writeln!(out, "pub static {prefix}_ANNOTATIONS: &[(&str, &[(&str, &str)])] = &[")?;
    for (name, pairs) in rows {
        let pairs: Vec<String> = pairs.iter().map(|(k, v)| format!("({k:?}, {v:?})")).collect();
        writeln!(out, "    ({name:?}, &[{}]),", pairs.join(", "))?;
    }
    writeln!(out, "];")?;
    writeln!(out)?;
    writeln!(
        out,
        "pub fn {kind}_annotation(name: &str, key: &str) -> Option<&'static str> {{"
    )?;
    writeln!(
        out,
        "    lookup({prefix}_ANNOTATIONS, name).and_then(|pairs| lookup(pairs, key))"
    )?;
    writeln!(out, "}}")?;
    writeln!(out)
}

fn write_functions(out: &mut String, view: &RegistryView) -> fmt::Result {
    if view.functions.is_empty() {
        return Ok(());
    }
    writeln!(out, "/// Signature of a schema function.")?;
    writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq)]")?;
    writeln!(out, "pub struct FunctionInfo {{")?;
    writeln!(out, "    pub name: &'static str,")?;
    writeln!(out, "    pub parameters: &'static [(&'static str, &'static str)],")?;
    writeln!(out, "    pub return_type: Option<&'static str>,")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "/// Schema functions sorted by name.")?;
    writeln!(out, "pub static FUNCTIONS: &[FunctionInfo] = &[")?;
    for f in &view.functions {
        let parameters: Vec<String> = f
            .parameters
            .iter()
            .map(|(name, ty)| format!("({name:?}, {ty:?})"))
            .collect();
        let return_type = match &f.return_type {
            Some(ty) => format!("Some({ty:?})"),
            None => "None".to_string(),
        };
        writeln!(out, "    FunctionInfo {{")?;
        writeln!(out, "        name: {:?},", f.name)?;
        writeln!(out, "        parameters: &[{}],", parameters.join(", "))?;
        writeln!(out, "        return_type: {return_type},")?;
        writeln!(out, "    }},")?;
    }
    writeln!(out, "];")?;
    writeln!(out)?;

    writeln!(out, "pub fn function(name: &str) -> Option<&'static FunctionInfo> {{")?;
    writeln!(out, "    FUNCTIONS")?;
    writeln!(out, "        .binary_search_by(|f| f.name.cmp(name))")?;
    writeln!(out, "        .ok()")?;
    writeln!(out, "        .map(|i| &FUNCTIONS[i])")?;
    writeln!(out, "}}")?;
    writeln!(out)
}
