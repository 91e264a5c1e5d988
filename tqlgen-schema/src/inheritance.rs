//! Inheritance accumulation.
//!
//! Copies ownership (and, for relations, role) declarations from every
//! ancestor into its descendants. A descendant's own entry always wins over an
//! inherited entry of the same name, and the nearest ancestor wins over
//! further ones. Role-play declarations are not inherited.

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use crate::ast::DefinitionKind;
use crate::error::{SchemaError, SchemaResult};
use crate::model::{OwnsSpec, RelatesSpec, Schema, ThingType};

impl Schema {
    /// Merge inherited declarations into every subtype. See
    /// [`accumulate_inheritance`].
    pub fn accumulate_inheritance(&mut self) -> SchemaResult<()> {
        accumulate_inheritance(self)
    }
}

/// Merge inherited ownership and role declarations into every subtype.
///
/// Merging reads each ancestor's declared lists, so the result does not
/// depend on iteration order and a second run changes nothing. A parent that
/// does not exist ends the chain. A cyclic chain is an error and leaves the
/// schema untouched.
pub fn accumulate_inheritance(schema: &mut Schema) -> SchemaResult<()> {
    let entity_chains = ancestor_chains(&schema.entities, DefinitionKind::Entity)?;
    let relation_chains = ancestor_chains(&schema.relations, DefinitionKind::Relation)?;

    let declared_entity_owns: IndexMap<SmolStr, Vec<OwnsSpec>> = schema
        .entities
        .iter()
        .map(|(name, e)| (name.clone(), e.owns.clone()))
        .collect();

    for (name, chain) in &entity_chains {
        let Some(entity) = schema.entities.get_mut(name) else {
            continue;
        };
        for ancestor in chain {
            if let Some(inherited) = declared_entity_owns.get(ancestor) {
                entity.owns = merge_declared(inherited, std::mem::take(&mut entity.owns));
            }
            trace!(entity = %name, ancestor = %ancestor, "merged inherited ownership");
        }
    }

    let declared_relations: IndexMap<SmolStr, (Vec<OwnsSpec>, Vec<RelatesSpec>)> = schema
        .relations
        .iter()
        .map(|(name, r)| (name.clone(), (r.owns.clone(), r.relates.clone())))
        .collect();

    for (name, chain) in &relation_chains {
        let Some(relation) = schema.relations.get_mut(name) else {
            continue;
        };
        for ancestor in chain {
            if let Some((owns, relates)) = declared_relations.get(ancestor) {
                relation.owns = merge_declared(owns, std::mem::take(&mut relation.owns));
                relation.relates = merge_declared(relates, std::mem::take(&mut relation.relates));
            }
            trace!(relation = %name, ancestor = %ancestor, "merged inherited ownership and roles");
        }
    }

    debug!(
        entities = entity_chains.len(),
        relations = relation_chains.len(),
        "accumulated inheritance"
    );
    Ok(())
}

/// Entries merged by name during accumulation.
trait Declared: Clone {
    fn key(&self) -> &str;
}

impl Declared for OwnsSpec {
    fn key(&self) -> &str {
        &self.attribute
    }
}

impl Declared for RelatesSpec {
    fn key(&self) -> &str {
        &self.role
    }
}

/// Ancestor entries the descendant does not declare, followed by the
/// descendant's own entries.
fn merge_declared<T: Declared>(ancestor: &[T], own: Vec<T>) -> Vec<T> {
    let mut merged: Vec<T> = ancestor
        .iter()
        .filter(|a| !own.iter().any(|o| o.key() == a.key()))
        .cloned()
        .collect();
    merged.extend(own);
    merged
}

/// Ancestor names of every subtype, nearest first.
fn ancestor_chains<T: ThingType>(
    types: &IndexMap<SmolStr, T>,
    kind: DefinitionKind,
) -> SchemaResult<Vec<(SmolStr, Vec<SmolStr>)>> {
    let mut chains = Vec::new();

    for (name, spec) in types {
        let mut chain: Vec<SmolStr> = Vec::new();
        let mut current = spec.parent();

        while let Some(parent) = current {
            if parent == name.as_str() || chain.iter().any(|c| c == parent) {
                let mut path: Vec<&str> = vec![name.as_str()];
                path.extend(chain.iter().map(SmolStr::as_str));
                path.push(parent);
                return Err(SchemaError::cyclic(kind.as_str(), name.as_str(), &path));
            }
            match types.get(parent) {
                Some(found) => {
                    chain.push(SmolStr::new(found.name()));
                    current = found.parent();
                }
                None => {
                    warn!(%kind, name = %name, parent, "parent type not found, chain ends here");
                    break;
                }
            }
        }

        if !chain.is_empty() {
            chains.push((name.clone(), chain));
        }
    }

    Ok(chains)
}
