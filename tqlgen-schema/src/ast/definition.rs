//! Parse tree for schema definitions.
//!
//! The tree mirrors the source closely: string literals keep their quotes and
//! escapes, clauses keep their declaration order, and function bodies stay a
//! flat token list. [`Schema::from_ast`](crate::Schema::from_ast) turns it into
//! the domain model.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::types::{Ident, Span};
use crate::lexer::Token;

/// A whole `define` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Definitions in source order.
    pub definitions: Vec<Definition>,
}

impl SchemaFile {
    /// Number of definitions of the given kind.
    pub fn count(&self, kind: DefinitionKind) -> usize {
        self.definitions.iter().filter(|d| d.kind() == kind).count()
    }
}

/// The five definition kinds of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefinitionKind {
    Attribute,
    Entity,
    Relation,
    Struct,
    Function,
}

impl DefinitionKind {
    /// Keyword that introduces the definition.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attribute => "attribute",
            Self::Entity => "entity",
            Self::Relation => "relation",
            Self::Struct => "struct",
            Self::Function => "fun",
        }
    }
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One top-level definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Definition {
    Attribute(AttributeDef),
    Entity(EntityDef),
    Relation(RelationDef),
    Struct(StructDef),
    Function(FunctionDef),
}

impl Definition {
    /// Name of the defined type or function.
    pub fn name(&self) -> &Ident {
        match self {
            Self::Attribute(def) => &def.name,
            Self::Entity(def) => &def.name,
            Self::Relation(def) => &def.name,
            Self::Struct(def) => &def.name,
            Self::Function(def) => &def.name,
        }
    }

    /// Kind discriminant.
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Attribute(_) => DefinitionKind::Attribute,
            Self::Entity(_) => DefinitionKind::Entity,
            Self::Relation(_) => DefinitionKind::Relation,
            Self::Struct(_) => DefinitionKind::Struct,
            Self::Function(_) => DefinitionKind::Function,
        }
    }
}

/// `attribute name, value kind @annotations;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub name: Ident,
    pub value_type: Ident,
    pub annotations: Vec<Annotation>,
    pub span: Span,
}

/// `entity name sub parent @abstract, clauses;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDef {
    pub name: Ident,
    pub parent: Option<Ident>,
    pub is_abstract: bool,
    pub clauses: Vec<EntityClause>,
    pub span: Span,
}

/// Clauses allowed on an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityClause {
    Owns(OwnsClause),
    Plays(PlaysClause),
}

/// `relation name sub parent @abstract, clauses;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDef {
    pub name: Ident,
    pub parent: Option<Ident>,
    pub is_abstract: bool,
    pub clauses: Vec<RelationClause>,
    pub span: Span,
}

/// Clauses allowed on a relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RelationClause {
    Relates(RelatesClause),
    Owns(OwnsClause),
    Plays(PlaysClause),
}

/// `owns attribute @annotations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnsClause {
    pub attribute: Ident,
    pub annotations: Vec<Annotation>,
    pub span: Span,
}

/// `plays relation:role @annotations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaysClause {
    pub relation: Ident,
    pub role: Ident,
    pub annotations: Vec<Annotation>,
    pub span: Span,
}

/// `relates role as parent-role @annotations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatesClause {
    pub role: Ident,
    pub overrides: Option<Ident>,
    pub annotations: Vec<Annotation>,
    pub span: Span,
}

/// An inline `@` annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub span: Span,
}

/// Annotation payloads. String payloads are kept as written, quotes included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationKind {
    Key,
    Unique,
    Card(SmolStr),
    Regex(SmolStr),
    Values(Vec<SmolStr>),
    Range(SmolStr),
}

impl AnnotationKind {
    /// Annotation name without the `@`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Unique => "unique",
            Self::Card(_) => "card",
            Self::Regex(_) => "regex",
            Self::Values(_) => "values",
            Self::Range(_) => "range",
        }
    }
}

/// `struct name: fields;` or `struct name, fields;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: Ident,
    pub layout: FieldLayout,
    pub fields: Vec<StructFieldDef>,
    pub span: Span,
}

/// Which of the two struct field orders the definition used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldLayout {
    /// `field value kind`, introduced by `:`.
    Named,
    /// `value field kind`, introduced by `,`.
    Legacy,
}

/// One struct field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructFieldDef {
    pub name: Ident,
    pub value_type: Ident,
    pub optional: bool,
    pub span: Span,
}

/// `fun name ...` with its body kept as raw tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: Ident,
    pub body: Vec<Token>,
    pub span: Span,
}
