//! Plain data-model view.

use std::collections::BTreeMap;

use tqlgen_schema::{Schema, ThingType};
use tracing::debug;

use super::{EnumView, FieldView, dedupe_fields, ownership_annotations, sorted_owns};
use crate::config::ModelConfig;
use crate::naming::Naming;
use crate::roles::RolePlayers;
use crate::types::{apply_required, attribute_kind, rust_type};

/// Everything the model template renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelView {
    pub module_name: String,
    pub schema_version: Option<String>,
    pub enums: Vec<EnumView>,
    pub structs: Vec<StructView>,
    pub entities: Vec<TypeView>,
    pub relations: Vec<TypeView>,
}

/// A struct descriptor rendered as a Rust struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructView {
    pub ident: String,
    pub type_name: String,
    pub fields: Vec<FieldView>,
}

/// An entity or relation rendered as a Rust struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeView {
    pub ident: String,
    pub type_name: String,
    pub parent: Option<String>,
    pub is_abstract: bool,
    /// Key attributes sorted by name.
    pub keys: Vec<String>,
    /// Instance id followed by attributes sorted by name.
    pub fields: Vec<FieldView>,
    /// Role fields sorted by role name; empty for entities.
    pub roles: Vec<FieldView>,
}

/// Builds a [`ModelView`] from a schema.
#[derive(Debug, Clone)]
pub struct ModelBuilder<'c> {
    config: &'c ModelConfig,
    naming: Naming,
}

impl<'c> ModelBuilder<'c> {
    pub fn new(config: &'c ModelConfig) -> Self {
        Self {
            config,
            naming: config.naming(),
        }
    }

    /// Build the view. Types and fields are sorted by schema name, enum
    /// variants keep declaration order.
    pub fn build(&self, schema: &Schema) -> ModelView {
        let enum_types: BTreeMap<&str, EnumView> = if self.config.enums {
            schema
                .attributes
                .values()
                .filter(|a| a.is_enum())
                .map(|a| (a.name.as_str(), EnumView::from_attribute(&self.naming, a)))
                .collect()
        } else {
            BTreeMap::new()
        };

        let mut structs: Vec<StructView> = schema
            .structs
            .values()
            .map(|s| StructView {
                ident: self.naming.type_name(&s.name),
                type_name: s.name.to_string(),
                fields: s
                    .fields
                    .iter()
                    .map(|f| {
                        let ty = apply_required(rust_type(f.value_kind()), !f.optional);
                        FieldView::new(&self.naming, &f.name, ty)
                    })
                    .collect(),
            })
            .collect();
        structs.sort_by(|a, b| a.type_name.cmp(&b.type_name));
        for s in &mut structs {
            dedupe_fields(&mut s.fields);
        }

        let players = RolePlayers::new(schema);
        let entities = self.types(schema, schema.entities.values(), &enum_types, |_| Vec::new());
        let relations = self.types(schema, schema.relations.values(), &enum_types, |name| {
            schema
                .relation(name)
                .map(|r| {
                    let roles = r.relates.iter().map(|x| x.role.as_str());
                    self.role_fields(schema, &players, name, roles)
                })
                .unwrap_or_default()
        });

        debug!(
            enums = enum_types.len(),
            structs = structs.len(),
            entities = entities.len(),
            relations = relations.len(),
            "built model view"
        );

        ModelView {
            module_name: self.config.module_name.clone(),
            schema_version: self.config.schema_version.clone(),
            enums: enum_types.into_values().collect(),
            structs,
            entities,
            relations,
        }
    }

    fn emitted(&self, thing: &dyn ThingType) -> bool {
        !(self.config.skip_abstract && thing.is_abstract())
    }

    fn types<'s, T, I, F>(
        &self,
        schema: &Schema,
        things: I,
        enum_types: &BTreeMap<&str, EnumView>,
        roles: F,
    ) -> Vec<TypeView>
    where
        T: ThingType + 's,
        I: Iterator<Item = &'s T>,
        F: Fn(&str) -> Vec<FieldView>,
    {
        let mut views: Vec<TypeView> = things
            .filter(|t| self.emitted(*t))
            .map(|t| {
                let mut fields = Vec::new();
                let iid = &self.config.instance_id_field;
                if !iid.is_empty() && t.owned(iid).is_none() {
                    fields.push(FieldView::new(&self.naming, iid, "Option<String>").skip_none());
                }
                for owns in sorted_owns(t.owns()) {
                    let base = match enum_types.get(owns.attribute.as_str()) {
                        Some(e) => e.ident.clone(),
                        None => rust_type(attribute_kind(schema, &owns.attribute)).to_string(),
                    };
                    let ty = apply_required(&base, owns.is_required());
                    let mut field = FieldView::new(&self.naming, &owns.attribute, ty).skip_none();
                    let annotations = ownership_annotations(owns);
                    if !annotations.is_empty() {
                        field = field.documented(annotations);
                    }
                    fields.push(field);
                }
                let keys = sorted_owns(t.owns())
                    .into_iter()
                    .filter(|o| o.key)
                    .map(|o| o.attribute.to_string())
                    .collect();
                let mut roles = roles(t.name());
                dedupe_fields(&mut fields);
                let taken: Vec<String> = fields.iter().map(|f| f.ident.clone()).collect();
                for role in &mut roles {
                    if taken.contains(&role.ident) {
                        let ident = format!("{}_role", role.ident.trim_start_matches("r#"));
                        *role = FieldView::with_ident(ident, &role.name, role.ty.clone())
                            .skip_none();
                    }
                }

                TypeView {
                    ident: self.naming.type_name(t.name()),
                    type_name: t.name().to_string(),
                    parent: t.parent().map(str::to_string),
                    is_abstract: t.is_abstract(),
                    keys,
                    fields,
                    roles,
                }
            })
            .collect();
        views.sort_by(|a, b| a.type_name.cmp(&b.type_name));
        views
    }

    /// One boxed, optional field per role, typed by its first emitted player.
    fn role_fields<'r>(
        &self,
        schema: &Schema,
        players: &RolePlayers<'_>,
        relation: &str,
        roles: impl Iterator<Item = &'r str>,
    ) -> Vec<FieldView> {
        let mut roles: Vec<&str> = roles.collect();
        roles.sort_unstable();
        roles.dedup();

        roles
            .into_iter()
            .map(|role| {
                let player = players
                    .players(relation, role)
                    .into_iter()
                    .find(|p| schema.thing(p).is_some_and(|t| self.emitted(t)));
                let ty = match player {
                    Some(p) => format!("Option<Box<{}>>", self.naming.type_name(p)),
                    None => "Option<String>".to_string(),
                };
                FieldView::new(&self.naming, role, ty).skip_none()
            })
            .collect()
    }
}
