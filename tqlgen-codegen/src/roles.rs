//! Role-player resolution.

use std::collections::{BTreeMap, BTreeSet};

use tqlgen_schema::Schema;

/// Index of `relation:role` to the types declared to play it.
#[derive(Debug)]
pub struct RolePlayers<'a> {
    schema: &'a Schema,
    index: BTreeMap<&'a str, BTreeMap<&'a str, BTreeSet<&'a str>>>,
}

impl<'a> RolePlayers<'a> {
    /// Scan the plays lists of every entity and relation.
    pub fn new(schema: &'a Schema) -> Self {
        let mut index: BTreeMap<&str, BTreeMap<&str, BTreeSet<&str>>> = BTreeMap::new();
        for thing in schema.things() {
            for plays in thing.plays() {
                index
                    .entry(plays.relation.as_str())
                    .or_default()
                    .entry(plays.role.as_str())
                    .or_default()
                    .insert(thing.name());
            }
        }
        Self { schema, index }
    }

    /// Most specific players of a role, sorted by name.
    ///
    /// A player is dropped when another listed player is one of its
    /// descendants. A role nobody plays has no players.
    pub fn players(&self, relation: &str, role: &str) -> Vec<&'a str> {
        let Some(candidates) = self.index.get(relation).and_then(|roles| roles.get(role)) else {
            return Vec::new();
        };
        candidates
            .iter()
            .copied()
            .filter(|candidate| {
                !candidates
                    .iter()
                    .any(|other| other != candidate && self.schema.is_ancestor(candidate, other))
            })
            .collect()
    }
}
