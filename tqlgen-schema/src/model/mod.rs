//! Domain model built from a parsed schema.

mod convert;
mod spec;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::ast::DefinitionKind;
use crate::error::{SchemaError, SchemaResult};

pub use spec::*;

/// The full set of declarations read from one schema file.
///
/// Every map keeps declaration order and rejects duplicate names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub attributes: IndexMap<SmolStr, AttributeSpec>,
    pub entities: IndexMap<SmolStr, EntitySpec>,
    pub relations: IndexMap<SmolStr, RelationSpec>,
    pub structs: IndexMap<SmolStr, StructSpec>,
    pub functions: IndexMap<SmolStr, FunctionSpec>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_attribute(&mut self, attribute: AttributeSpec) -> SchemaResult<()> {
        insert_unique(&mut self.attributes, DefinitionKind::Attribute, attribute.name.clone(), attribute)
    }

    pub fn add_entity(&mut self, entity: EntitySpec) -> SchemaResult<()> {
        insert_unique(&mut self.entities, DefinitionKind::Entity, entity.name.clone(), entity)
    }

    pub fn add_relation(&mut self, relation: RelationSpec) -> SchemaResult<()> {
        insert_unique(&mut self.relations, DefinitionKind::Relation, relation.name.clone(), relation)
    }

    pub fn add_struct(&mut self, spec: StructSpec) -> SchemaResult<()> {
        insert_unique(&mut self.structs, DefinitionKind::Struct, spec.name.clone(), spec)
    }

    pub fn add_function(&mut self, function: FunctionSpec) -> SchemaResult<()> {
        insert_unique(&mut self.functions, DefinitionKind::Function, function.name.clone(), function)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.get(name)
    }

    pub fn entity(&self, name: &str) -> Option<&EntitySpec> {
        self.entities.get(name)
    }

    pub fn relation(&self, name: &str) -> Option<&RelationSpec> {
        self.relations.get(name)
    }

    /// Look up an entity or relation type by name.
    pub fn thing(&self, name: &str) -> Option<&dyn ThingType> {
        match self.entities.get(name) {
            Some(entity) => Some(entity as &dyn ThingType),
            None => self.relations.get(name).map(|r| r as &dyn ThingType),
        }
    }

    /// Entities and relations in declaration order, entities first.
    pub fn things(&self) -> impl Iterator<Item = &dyn ThingType> {
        self.entities
            .values()
            .map(|e| e as &dyn ThingType)
            .chain(self.relations.values().map(|r| r as &dyn ThingType))
    }

    /// Declared parent of an entity or relation.
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.thing(name).and_then(|t| t.parent())
    }

    /// Ancestors of a type, nearest first.
    ///
    /// Stops at a missing parent or when the chain revisits a name, so it
    /// terminates even on schemas that were never accumulated.
    pub fn ancestors(&self, name: &str) -> Vec<&str> {
        let mut chain: Vec<&str> = Vec::new();
        let mut current = self.parent_of(name);
        while let Some(parent) = current {
            if parent == name || chain.contains(&parent) {
                break;
            }
            let Some(thing) = self.thing(parent) else {
                break;
            };
            chain.push(thing.name());
            current = thing.parent();
        }
        chain
    }

    /// Whether `ancestor` appears in the parent chain of `name`.
    pub fn is_ancestor(&self, ancestor: &str, name: &str) -> bool {
        self.ancestors(name).contains(&ancestor)
    }

    /// Definition counts.
    pub fn stats(&self) -> SchemaStats {
        SchemaStats {
            attributes: self.attributes.len(),
            entities: self.entities.len(),
            relations: self.relations.len(),
            structs: self.structs.len(),
            functions: self.functions.len(),
        }
    }
}

fn insert_unique<T>(
    map: &mut IndexMap<SmolStr, T>,
    kind: DefinitionKind,
    name: SmolStr,
    value: T,
) -> SchemaResult<()> {
    if map.contains_key(&name) {
        return Err(SchemaError::duplicate(kind.as_str(), name.as_str()));
    }
    map.insert(name, value);
    Ok(())
}

/// Number of definitions of each kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchemaStats {
    pub attributes: usize,
    pub entities: usize,
    pub relations: usize,
    pub structs: usize,
    pub functions: usize,
}

impl std::fmt::Display for SchemaStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} attributes, {} entities, {} relations, {} structs, {} functions",
            self.attributes, self.entities, self.relations, self.structs, self.functions
        )
    }
}
