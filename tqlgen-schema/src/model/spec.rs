//! Descriptors for each schema definition kind.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Base value kind of an attribute or struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Text,
    Integer,
    Decimal,
    Boolean,
    Timestamp,
}

impl ValueKind {
    /// Map a TypeQL value-type name to its kind. Unknown names are text.
    pub fn from_value_type(name: &str) -> Self {
        match name {
            "integer" | "long" => Self::Integer,
            "double" | "decimal" => Self::Decimal,
            "boolean" => Self::Boolean,
            "datetime" | "datetime-tz" | "date" => Self::Timestamp,
            _ => Self::Text,
        }
    }
}

/// A parsed `@card` expression such as `0..1`, `1..` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    pub min: u64,
    /// `None` when unbounded.
    pub max: Option<u64>,
}

impl Cardinality {
    /// Split a cardinality expression. An unreadable minimum counts as zero.
    pub fn parse(expr: &str) -> Self {
        match expr.split_once("..") {
            Some((min, max)) => Self {
                min: min.trim().parse().unwrap_or(0),
                max: max.trim().parse().ok(),
            },
            None => {
                let exact = expr.trim().parse().ok();
                Self {
                    min: exact.unwrap_or(0),
                    max: exact,
                }
            }
        }
    }
}

/// `attribute name, value kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: SmolStr,
    /// Value-type name as written.
    pub value_type: SmolStr,
    pub regex: Option<String>,
    pub values: Vec<String>,
    pub range: Option<SmolStr>,
}

impl AttributeSpec {
    /// Create an attribute with no constraints.
    pub fn new(name: impl Into<SmolStr>, value_type: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            value_type: value_type.into(),
            regex: None,
            values: Vec::new(),
            range: None,
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        ValueKind::from_value_type(&self.value_type)
    }

    /// Whether the attribute is restricted to an enumerated value set.
    pub fn is_enum(&self) -> bool {
        !self.values.is_empty()
    }
}

/// An `owns` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnsSpec {
    pub attribute: SmolStr,
    pub key: bool,
    pub unique: bool,
    pub card: Option<SmolStr>,
}

impl OwnsSpec {
    /// Create an ownership with no annotations.
    pub fn new(attribute: impl Into<SmolStr>) -> Self {
        Self {
            attribute: attribute.into(),
            key: false,
            unique: false,
            card: None,
        }
    }

    pub fn cardinality(&self) -> Option<Cardinality> {
        self.card.as_deref().map(Cardinality::parse)
    }

    /// Key and unique attributes are required, as is any attribute whose
    /// cardinality demands at least one value.
    pub fn is_required(&self) -> bool {
        self.key || self.unique || self.cardinality().is_some_and(|c| c.min >= 1)
    }
}

/// A `plays relation:role` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaysSpec {
    pub relation: SmolStr,
    pub role: SmolStr,
    pub card: Option<SmolStr>,
}

impl PlaysSpec {
    pub fn new(relation: impl Into<SmolStr>, role: impl Into<SmolStr>) -> Self {
        Self {
            relation: relation.into(),
            role: role.into(),
            card: None,
        }
    }
}

/// A `relates role` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatesSpec {
    pub role: SmolStr,
    /// Parent role named by `as`.
    pub overrides: Option<SmolStr>,
    pub card: Option<SmolStr>,
}

impl RelatesSpec {
    pub fn new(role: impl Into<SmolStr>) -> Self {
        Self {
            role: role.into(),
            overrides: None,
            card: None,
        }
    }

    /// Minimum number of players, zero when no cardinality is given.
    pub fn min_card(&self) -> u64 {
        self.card.as_deref().map_or(0, |c| Cardinality::parse(c).min)
    }
}

/// Behavior shared by entity and relation types.
pub trait ThingType {
    fn name(&self) -> &str;
    fn parent(&self) -> Option<&str>;
    fn is_abstract(&self) -> bool;
    fn owns(&self) -> &[OwnsSpec];
    fn plays(&self) -> &[PlaysSpec];

    /// The ownership entry for `attribute`, if declared.
    fn owned(&self, attribute: &str) -> Option<&OwnsSpec> {
        self.owns().iter().find(|o| o.attribute == attribute)
    }
}

/// An `entity` type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub name: SmolStr,
    pub parent: Option<SmolStr>,
    pub is_abstract: bool,
    pub owns: Vec<OwnsSpec>,
    pub plays: Vec<PlaysSpec>,
}

impl EntitySpec {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            is_abstract: false,
            owns: Vec::new(),
            plays: Vec::new(),
        }
    }
}

impl ThingType for EntitySpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    fn owns(&self) -> &[OwnsSpec] {
        &self.owns
    }

    fn plays(&self) -> &[PlaysSpec] {
        &self.plays
    }
}

/// A `relation` type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSpec {
    pub name: SmolStr,
    pub parent: Option<SmolStr>,
    pub is_abstract: bool,
    pub relates: Vec<RelatesSpec>,
    pub owns: Vec<OwnsSpec>,
    pub plays: Vec<PlaysSpec>,
}

impl RelationSpec {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            is_abstract: false,
            relates: Vec::new(),
            owns: Vec::new(),
            plays: Vec::new(),
        }
    }
}

impl ThingType for RelationSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    fn owns(&self) -> &[OwnsSpec] {
        &self.owns
    }

    fn plays(&self) -> &[PlaysSpec] {
        &self.plays
    }
}

/// A `struct` value type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructSpec {
    pub name: SmolStr,
    pub fields: Vec<StructFieldSpec>,
}

/// One field of a struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructFieldSpec {
    pub name: SmolStr,
    pub value_type: SmolStr,
    pub optional: bool,
}

impl StructFieldSpec {
    pub fn value_kind(&self) -> ValueKind {
        ValueKind::from_value_type(&self.value_type)
    }
}

/// A `fun` definition reduced to its signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: SmolStr,
    pub parameters: Vec<ParameterSpec>,
    /// Return type as written, e.g. `integer` or `{ string }`.
    pub return_type: Option<String>,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Variable name without the `$`.
    pub name: SmolStr,
    pub type_name: String,
}
