//! Introspection registry view.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tqlgen_schema::{AnnotationMap, Schema, ThingType, extract_annotations};
use tracing::debug;

use crate::config::RegistryConfig;
use crate::error::CodegenResult;
use crate::naming::{Naming, dedupe};
use crate::roles::RolePlayers;
use crate::types::{attribute_kind, json_type};

/// Name to list-of-names table.
pub type NameTable = Vec<(String, Vec<String>)>;

/// Name to key/value annotation table.
pub type AnnotationTable = Vec<(String, Vec<(String, String)>)>;

/// Everything the registry and constants templates render. Every table is
/// sorted by its first column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistryView {
    pub module_name: String,
    pub schema_version: Option<String>,
    /// `sha256:` fingerprint of the schema source.
    pub schema_hash: Option<String>,
    /// Emit newtype-wrapped constants.
    pub typed: bool,
    pub entity_constants: Vec<ConstView>,
    pub relation_constants: Vec<ConstView>,
    /// Only filled in typed mode.
    pub attribute_constants: Vec<ConstView>,
    /// Enum value constants grouped by attribute.
    pub enum_constants: Vec<(String, Vec<ConstView>)>,
    /// Attribute to value newtype of each enum group. Only filled in typed mode.
    pub enum_types: Vec<(String, String)>,
    pub entity_parents: Vec<(String, String)>,
    pub relation_parents: Vec<(String, String)>,
    pub abstract_entities: Vec<String>,
    pub abstract_relations: Vec<String>,
    pub entity_keys: NameTable,
    pub entity_attributes: NameTable,
    pub relation_attributes: NameTable,
    pub attribute_value_types: Vec<(String, String)>,
    pub attribute_values: NameTable,
    pub relation_roles: Vec<(String, Vec<RoleView>)>,
    pub all_entities: Vec<String>,
    pub all_relations: Vec<String>,
    pub all_attributes: Vec<String>,
    pub entity_annotations: AnnotationTable,
    pub relation_annotations: AnnotationTable,
    pub attribute_annotations: AnnotationTable,
    pub functions: Vec<FunctionView>,
    /// Compact JSON-schema document per concrete entity and relation.
    pub json_schemas: Vec<(String, String)>,
}

/// A named string constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstView {
    pub ident: String,
    pub value: String,
}

/// One role of a relation and the types that play it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleView {
    pub role: String,
    pub players: Vec<String>,
    pub min_card: u64,
    /// Cardinality expression as written, e.g. `1..3`.
    pub card: Option<String>,
}

/// A function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionView {
    pub name: String,
    /// Parameter name and type pairs in declaration order.
    pub parameters: Vec<(String, String)>,
    pub return_type: Option<String>,
}

/// Fingerprint of schema source: `sha256:` and the hex of the first 8 digest bytes.
pub fn schema_fingerprint(source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    format!("sha256:{}", hex::encode(&digest[..8]))
}

/// Builds a [`RegistryView`] from a schema.
#[derive(Debug, Clone)]
pub struct RegistryBuilder<'c> {
    config: &'c RegistryConfig,
    naming: Naming,
    source: Option<&'c str>,
}

impl<'c> RegistryBuilder<'c> {
    pub fn new(config: &'c RegistryConfig) -> Self {
        Self {
            config,
            naming: config.naming(),
            source: None,
        }
    }

    /// Supply the schema text for the fingerprint and comment annotations.
    pub fn with_source(mut self, source: &'c str) -> Self {
        self.source = Some(source);
        self
    }

    /// Build the view.
    pub fn build(&self, schema: &Schema) -> CodegenResult<RegistryView> {
        let annotations = match self.source {
            Some(source) => extract_annotations(source)?,
            None => AnnotationMap::new(),
        };

        let entities: Vec<&dyn ThingType> = sorted_things(schema.entities.values());
        let relations: Vec<&dyn ThingType> = sorted_things(schema.relations.values());
        let emitted = |t: &dyn ThingType| !(self.config.skip_abstract && t.is_abstract());

        let mut entity_constants: Vec<ConstView> = entities
            .iter()
            .filter(|t| emitted(**t))
            .map(|t| self.constant(&self.config.type_prefix, t.name()))
            .collect();
        let mut relation_constants: Vec<ConstView> = relations
            .iter()
            .filter(|t| emitted(**t))
            .map(|t| self.constant(&self.config.rel_prefix, t.name()))
            .collect();

        let mut attributes: Vec<&str> = schema.attributes.keys().map(|k| k.as_str()).collect();
        attributes.sort_unstable();

        let mut attribute_constants: Vec<ConstView> = if self.config.typed_constants {
            attributes
                .iter()
                .map(|a| self.constant(&self.config.attr_prefix, a))
                .collect()
        } else {
            Vec::new()
        };

        let mut enum_constants: Vec<(String, Vec<ConstView>)> = if self.config.enums {
            attributes
                .iter()
                .filter_map(|a| schema.attribute(a))
                .filter(|a| a.is_enum())
                .map(|a| {
                    let mut seen = BTreeSet::new();
                    let constants = a
                        .values
                        .iter()
                        .filter(|v| seen.insert(v.as_str()))
                        .map(|v| ConstView {
                            ident: self.naming.const_name(&a.name, v),
                            value: v.clone(),
                        })
                        .collect();
                    (a.name.to_string(), constants)
                })
                .collect()
        } else {
            Vec::new()
        };
        let enum_types: Vec<(String, String)> = if self.config.typed_constants {
            let mut idents: Vec<String> = enum_constants
                .iter()
                .map(|(attribute, _)| format!("{}Value", self.naming.type_name(attribute)))
                .collect();
            dedupe(&mut idents);
            enum_constants
                .iter()
                .map(|(attribute, _)| attribute.clone())
                .zip(idents)
                .collect()
        } else {
            Vec::new()
        };
        dedupe_constants(
            &mut entity_constants,
            &mut relation_constants,
            &mut attribute_constants,
            &mut enum_constants,
        );

        let players = RolePlayers::new(schema);
        let relation_roles = relations
            .iter()
            .filter_map(|t| schema.relation(t.name()))
            .filter(|r| !r.relates.is_empty())
            .map(|r| {
                let mut roles: BTreeMap<&str, RoleView> = BTreeMap::new();
                for relates in &r.relates {
                    roles.entry(relates.role.as_str()).or_insert_with(|| RoleView {
                        role: relates.role.to_string(),
                        players: players
                            .players(&r.name, &relates.role)
                            .into_iter()
                            .map(str::to_string)
                            .collect(),
                        min_card: relates.min_card(),
                        card: relates.card.as_deref().map(str::to_string),
                    });
                }
                (r.name.to_string(), roles.into_values().collect())
            })
            .collect();

        let (entity_annotations, relation_annotations, attribute_annotations) =
            split_annotations(schema, annotations);

        let mut functions: Vec<FunctionView> = schema
            .functions
            .values()
            .map(|f| FunctionView {
                name: f.name.to_string(),
                parameters: f
                    .parameters
                    .iter()
                    .map(|p| (p.name.to_string(), p.type_name.clone()))
                    .collect(),
                return_type: f.return_type.clone(),
            })
            .collect();
        functions.sort_by(|a, b| a.name.cmp(&b.name));

        let mut json_schemas: Vec<(String, String)> = if self.config.json_schema {
            entities
                .iter()
                .chain(&relations)
                .filter(|t| !t.is_abstract())
                .map(|t| (t.name().to_string(), json_schema(schema, *t)))
                .collect()
        } else {
            Vec::new()
        };
        json_schemas.sort();

        let view = RegistryView {
            module_name: self.config.module_name.clone(),
            schema_version: self.config.schema_version.clone(),
            schema_hash: self
                .source
                .filter(|_| self.config.fingerprint)
                .map(schema_fingerprint),
            typed: self.config.typed_constants,
            entity_constants,
            relation_constants,
            attribute_constants,
            enum_constants,
            enum_types,
            entity_parents: parents(&entities),
            relation_parents: parents(&relations),
            abstract_entities: names(entities.iter().filter(|t| t.is_abstract())),
            abstract_relations: names(relations.iter().filter(|t| t.is_abstract())),
            entity_keys: entities
                .iter()
                .filter(|t| emitted(**t))
                .map(|t| {
                    let keys = t.owns().iter().filter(|o| o.key).map(|o| o.attribute.as_str());
                    (t.name().to_string(), sorted_names(keys))
                })
                .filter(|(_, keys)| !keys.is_empty())
                .collect(),
            entity_attributes: owned_table(entities.iter().filter(|t| emitted(**t))),
            relation_attributes: owned_table(relations.iter()),
            attribute_value_types: attributes
                .iter()
                .filter_map(|a| schema.attribute(a))
                .map(|a| (a.name.to_string(), a.value_type.to_string()))
                .collect(),
            attribute_values: attributes
                .iter()
                .filter_map(|a| schema.attribute(a))
                .filter(|a| a.is_enum())
                .map(|a| {
                    let mut values = Vec::new();
                    for v in &a.values {
                        if !values.contains(v) {
                            values.push(v.clone());
                        }
                    }
                    (a.name.to_string(), values)
                })
                .collect(),
            relation_roles,
            all_entities: names(entities.iter()),
            all_relations: names(relations.iter()),
            all_attributes: attributes.iter().map(|a| a.to_string()).collect(),
            entity_annotations,
            relation_annotations,
            attribute_annotations,
            functions,
            json_schemas,
        };

        debug!(
            entities = view.all_entities.len(),
            relations = view.all_relations.len(),
            attributes = view.all_attributes.len(),
            functions = view.functions.len(),
            "built registry view"
        );
        Ok(view)
    }

    fn constant(&self, prefix: &str, name: &str) -> ConstView {
        ConstView {
            ident: self.naming.const_name(prefix, name),
            value: name.to_string(),
        }
    }
}

fn sorted_things<'s, T: ThingType + 's>(
    things: impl Iterator<Item = &'s T>,
) -> Vec<&'s dyn ThingType> {
    let mut sorted: Vec<&dyn ThingType> = things.map(|t| t as &dyn ThingType).collect();
    sorted.sort_by(|a, b| a.name().cmp(b.name()));
    sorted
}

fn names<'a, 's: 'a>(things: impl Iterator<Item = &'a &'s dyn ThingType>) -> Vec<String> {
    things.map(|t| t.name().to_string()).collect()
}

fn sorted_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<&str> = names.collect();
    set.into_iter().map(str::to_string).collect()
}

fn parents(things: &[&dyn ThingType]) -> Vec<(String, String)> {
    things
        .iter()
        .filter_map(|t| t.parent().map(|p| (t.name().to_string(), p.to_string())))
        .collect()
}

fn owned_table<'a, 's: 'a>(things: impl Iterator<Item = &'a &'s dyn ThingType>) -> NameTable {
    things
        .map(|t| {
            let owned = t.owns().iter().map(|o| o.attribute.as_str());
            (t.name().to_string(), sorted_names(owned))
        })
        .collect()
}

/// Give every constant a unique identifier across all groups.
fn dedupe_constants(
    entities: &mut [ConstView],
    relations: &mut [ConstView],
    attributes: &mut [ConstView],
    enums: &mut [(String, Vec<ConstView>)],
) {
    let mut all: Vec<&mut ConstView> = entities
        .iter_mut()
        .chain(relations.iter_mut())
        .chain(attributes.iter_mut())
        .chain(enums.iter_mut().flat_map(|(_, c)| c.iter_mut()))
        .collect();
    let mut idents: Vec<String> = all.iter().map(|c| c.ident.clone()).collect();
    dedupe(&mut idents);
    for (constant, ident) in all.iter_mut().zip(idents) {
        constant.ident = ident;
    }
}

/// Split comment annotations by the kind of the annotated type. Annotations on
/// structs and unknown names are dropped.
fn split_annotations(
    schema: &Schema,
    annotations: AnnotationMap,
) -> (AnnotationTable, AnnotationTable, AnnotationTable) {
    let mut entities = Vec::new();
    let mut relations = Vec::new();
    let mut attributes = Vec::new();
    for (name, pairs) in annotations {
        let pairs: Vec<(String, String)> = pairs.into_iter().collect();
        if schema.entity(&name).is_some() {
            entities.push((name, pairs));
        } else if schema.relation(&name).is_some() {
            relations.push((name, pairs));
        } else if schema.attribute(&name).is_some() {
            attributes.push((name, pairs));
        }
    }
    (entities, relations, attributes)
}

/// Draft-07 JSON-schema document for a type's owned attributes.
fn json_schema(schema: &Schema, thing: &dyn ThingType) -> String {
    let mut properties = serde_json::Map::new();
    let mut required = BTreeSet::new();
    for owns in thing.owns() {
        let attribute = owns.attribute.as_str();
        let mut property = json!({ "type": json_type(attribute_kind(schema, attribute)) });
        if let Some(spec) = schema.attribute(attribute).filter(|a| a.is_enum()) {
            property["enum"] = json!(spec.values);
        }
        properties.insert(attribute.to_string(), property);
        if owns.is_required() {
            required.insert(attribute);
        }
    }
    let document: Value = json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": thing.name(),
        "type": "object",
        "properties": properties,
        "required": required,
    });
    document.to_string()
}
