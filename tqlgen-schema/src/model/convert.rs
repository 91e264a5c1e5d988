//! Parse tree to domain model conversion.

use tracing::debug;

use super::*;
use crate::ast::{
    Annotation, AnnotationKind, AttributeDef, Definition, EntityClause, EntityDef, FunctionDef,
    OwnsClause, PlaysClause, RelatesClause, RelationClause, RelationDef, SchemaFile, StructDef,
};
use crate::signature::extract_signature;

impl Schema {
    /// Build the domain model from a parse tree in a single walk.
    pub fn from_ast(file: &SchemaFile) -> SchemaResult<Self> {
        let mut schema = Schema::new();

        for definition in &file.definitions {
            match definition {
                Definition::Attribute(def) => schema.add_attribute(convert_attribute(def))?,
                Definition::Entity(def) => schema.add_entity(convert_entity(def))?,
                Definition::Relation(def) => schema.add_relation(convert_relation(def))?,
                Definition::Struct(def) => schema.add_struct(convert_struct(def))?,
                Definition::Function(def) => schema.add_function(convert_function(def))?,
            }
        }

        debug!(
            attributes = schema.attributes.len(),
            entities = schema.entities.len(),
            relations = schema.relations.len(),
            structs = schema.structs.len(),
            functions = schema.functions.len(),
            "converted schema model"
        );
        Ok(schema)
    }
}

fn convert_attribute(def: &AttributeDef) -> AttributeSpec {
    let mut spec = AttributeSpec::new(def.name.name.clone(), def.value_type.name.clone());
    for annotation in &def.annotations {
        match &annotation.kind {
            AnnotationKind::Regex(pattern) => spec.regex = Some(unescape(pattern)),
            AnnotationKind::Values(values) => spec.values.extend(values.iter().map(|v| unescape(v))),
            AnnotationKind::Range(range) => spec.range = Some(range.clone()),
            AnnotationKind::Key | AnnotationKind::Unique | AnnotationKind::Card(_) => {}
        }
    }
    spec
}

fn convert_entity(def: &EntityDef) -> EntitySpec {
    let mut spec = EntitySpec::new(def.name.name.clone());
    spec.parent = def.parent.as_ref().map(|p| p.name.clone());
    spec.is_abstract = def.is_abstract;
    for clause in &def.clauses {
        match clause {
            EntityClause::Owns(owns) => spec.owns.push(convert_owns(owns)),
            EntityClause::Plays(plays) => spec.plays.push(convert_plays(plays)),
        }
    }
    spec
}

fn convert_relation(def: &RelationDef) -> RelationSpec {
    let mut spec = RelationSpec::new(def.name.name.clone());
    spec.parent = def.parent.as_ref().map(|p| p.name.clone());
    spec.is_abstract = def.is_abstract;
    for clause in &def.clauses {
        match clause {
            RelationClause::Relates(relates) => spec.relates.push(convert_relates(relates)),
            RelationClause::Owns(owns) => spec.owns.push(convert_owns(owns)),
            RelationClause::Plays(plays) => spec.plays.push(convert_plays(plays)),
        }
    }
    spec
}

fn convert_owns(clause: &OwnsClause) -> OwnsSpec {
    let mut spec = OwnsSpec::new(clause.attribute.name.clone());
    for annotation in &clause.annotations {
        match &annotation.kind {
            AnnotationKind::Key => spec.key = true,
            AnnotationKind::Unique => spec.unique = true,
            AnnotationKind::Card(expr) => spec.card = Some(expr.clone()),
            _ => {}
        }
    }
    spec
}

fn convert_plays(clause: &PlaysClause) -> PlaysSpec {
    let mut spec = PlaysSpec::new(clause.relation.name.clone(), clause.role.name.clone());
    spec.card = last_card(&clause.annotations);
    spec
}

fn convert_relates(clause: &RelatesClause) -> RelatesSpec {
    let mut spec = RelatesSpec::new(clause.role.name.clone());
    spec.overrides = clause.overrides.as_ref().map(|o| o.name.clone());
    spec.card = last_card(&clause.annotations);
    spec
}

fn last_card(annotations: &[Annotation]) -> Option<SmolStr> {
    annotations.iter().rev().find_map(|a| match &a.kind {
        AnnotationKind::Card(expr) => Some(expr.clone()),
        _ => None,
    })
}

fn convert_struct(def: &StructDef) -> StructSpec {
    StructSpec {
        name: def.name.name.clone(),
        fields: def
            .fields
            .iter()
            .map(|f| StructFieldSpec {
                name: f.name.name.clone(),
                value_type: f.value_type.name.clone(),
                optional: f.optional,
            })
            .collect(),
    }
}

fn convert_function(def: &FunctionDef) -> FunctionSpec {
    let signature = extract_signature(&def.body);
    FunctionSpec {
        name: def.name.name.clone(),
        parameters: signature.parameters,
        return_type: signature.return_type,
    }
}

/// Strip the quotes from a string literal and resolve `\"` and `\\`.
/// Other escapes are kept as written.
fn unescape(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped @ ('"' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
