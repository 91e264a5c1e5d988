//! Out/Create/Patch transfer-object view.

use std::collections::{BTreeMap, BTreeSet};

use tqlgen_schema::{EntitySpec, OwnsSpec, Schema, ThingType};
use tracing::debug;

use super::{FieldView, dedupe_fields, owned_type, sorted_owns};
use crate::config::{BaseStructConfig, DtoConfig, DtoVariant};
use crate::naming::Naming;

/// Everything the DTO template renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtoView {
    pub module_name: String,
    pub traits: DtoTraits,
    pub bases: Vec<BaseStructView>,
    pub entities: Vec<EntityDtoView>,
    pub relations: Vec<RelationDtoView>,
    pub composites: Vec<CompositeView>,
    /// Schema names of emitted, non-abstract entities.
    pub concrete_entities: Vec<String>,
    /// Schema names of emitted, non-abstract relations.
    pub concrete_relations: Vec<String>,
}

/// Trait names implemented by the generated DTOs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtoTraits {
    pub entity_out: String,
    pub entity_create: String,
    pub entity_patch: String,
    pub relation_out: String,
    pub relation_create: String,
}

/// `{name}Out`, `{name}Create` and `{name}Patch` shared by a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseStructView {
    pub name: String,
    pub source_entity: String,
    pub out: Vec<FieldView>,
    pub create: Vec<FieldView>,
    pub patch: Vec<FieldView>,
}

/// The three DTOs of one entity. Field lists are complete, including the
/// flattened base, the id and the type discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDtoView {
    pub ident: String,
    pub type_name: String,
    pub is_abstract: bool,
    pub base: Option<String>,
    pub out: Vec<FieldView>,
    pub create: Vec<FieldView>,
    pub patch: Vec<FieldView>,
}

/// The DTOs of one relation. `out` is `None` when relation Out DTOs are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDtoView {
    pub ident: String,
    pub type_name: String,
    pub is_abstract: bool,
    pub out: Option<Vec<FieldView>>,
    pub create: Vec<FieldView>,
}

/// A flat Out DTO over several entity types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeView {
    pub ident: String,
    pub type_name: String,
    pub entities: Vec<String>,
    pub fields: Vec<FieldView>,
}

/// Requiredness overrides of one entity field, per variant.
#[derive(Debug, Clone, Copy, Default)]
struct Override {
    out: Option<bool>,
    create: Option<bool>,
    patch: Option<bool>,
}

/// Builds a [`DtoView`] from a schema.
#[derive(Debug, Clone)]
pub struct DtoBuilder<'c> {
    config: &'c DtoConfig,
    naming: Naming,
}

impl<'c> DtoBuilder<'c> {
    pub fn new(config: &'c DtoConfig) -> Self {
        Self {
            config,
            naming: config.naming(),
        }
    }

    /// Build the view. Types, fields and name tables are sorted by schema name.
    pub fn build(&self, schema: &Schema) -> DtoView {
        let bases: Vec<BaseStructView> = self
            .config
            .base_structs
            .iter()
            .filter_map(|b| schema.entity(&b.source_entity).map(|e| self.base_struct(schema, b, e)))
            .collect();

        let overrides = self.override_index();
        let excluded_entities: BTreeSet<&str> =
            self.config.exclude_entities.iter().map(String::as_str).collect();
        let excluded_relations: BTreeSet<&str> =
            self.config.exclude_relations.iter().map(String::as_str).collect();

        let mut entities: Vec<EntityDtoView> = schema
            .entities
            .values()
            .filter(|e| !excluded_entities.contains(e.name.as_str()) && self.emitted(*e))
            .map(|e| self.entity(schema, e, &overrides))
            .collect();
        entities.sort_by(|a, b| a.type_name.cmp(&b.type_name));

        let mut relations: Vec<RelationDtoView> = schema
            .relations
            .values()
            .filter(|r| !excluded_relations.contains(r.name.as_str()) && self.emitted(*r))
            .map(|r| self.relation(schema, r))
            .collect();
        relations.sort_by(|a, b| a.type_name.cmp(&b.type_name));

        let composites: Vec<CompositeView> = self
            .config
            .composites
            .iter()
            .map(|c| {
                let mut owns: BTreeMap<&str, &OwnsSpec> = BTreeMap::new();
                for entity in c.entities.iter().filter_map(|name| schema.entity(name)) {
                    for o in &entity.owns {
                        owns.entry(o.attribute.as_str()).or_insert(o);
                    }
                }
                let mut fields = self.header_fields(true);
                fields.extend(owns.keys().map(|attribute| {
                    FieldView::new(&self.naming, attribute, owned_type(schema, attribute, false))
                        .skip_none()
                }));
                dedupe_fields(&mut fields);
                CompositeView {
                    ident: c.name.clone(),
                    type_name: c.type_name.clone(),
                    entities: c.entities.clone(),
                    fields,
                }
            })
            .collect();

        let concrete_entities: Vec<String> = entities
            .iter()
            .filter(|e| !e.is_abstract)
            .map(|e| e.type_name.clone())
            .collect();
        let concrete_relations: Vec<String> = relations
            .iter()
            .filter(|r| !r.is_abstract)
            .map(|r| r.type_name.clone())
            .collect();

        debug!(
            bases = bases.len(),
            entities = entities.len(),
            relations = relations.len(),
            composites = composites.len(),
            "built dto view"
        );

        DtoView {
            module_name: self.config.module_name.clone(),
            traits: DtoTraits {
                entity_out: self.config.entity_out_trait.clone(),
                entity_create: self.config.entity_create_trait.clone(),
                entity_patch: self.config.entity_patch_trait.clone(),
                relation_out: self.config.relation_out_trait.clone(),
                relation_create: self.config.relation_create_trait.clone(),
            },
            bases,
            entities,
            relations,
            composites,
            concrete_entities,
            concrete_relations,
        }
    }

    fn emitted(&self, thing: &dyn ThingType) -> bool {
        !(self.config.skip_abstract && thing.is_abstract())
    }

    fn override_index(&self) -> BTreeMap<(&str, &str), Override> {
        let mut index: BTreeMap<(&str, &str), Override> = BTreeMap::new();
        for o in &self.config.overrides {
            let entry = index
                .entry((o.entity.as_str(), o.field.as_str()))
                .or_default();
            match o.variant {
                DtoVariant::Out => entry.out = o.required.or(entry.out),
                DtoVariant::Create => entry.create = o.required.or(entry.create),
                DtoVariant::Patch => entry.patch = o.required.or(entry.patch),
            }
        }
        index
    }

    /// The id field of Out DTOs and the `type` discriminator.
    fn header_fields(&self, with_id: bool) -> Vec<FieldView> {
        let mut fields = Vec::new();
        if with_id {
            let id = &self.config.id_field_name;
            fields.push(FieldView::with_ident(
                self.naming.field_name(id),
                &id.to_lowercase(),
                "String",
            ));
        }
        fields.push(FieldView::with_ident("type_name", "type", "String"));
        fields
    }

    fn out_required(&self, required: bool) -> bool {
        self.config.strict_out && required
    }

    fn base_struct(
        &self,
        schema: &Schema,
        config: &BaseStructConfig,
        source: &EntitySpec,
    ) -> BaseStructView {
        let mut inherited: Vec<&str> = config.inherited_attrs.iter().map(String::as_str).collect();
        inherited.sort_unstable();
        inherited.dedup();

        let mut out = Vec::new();
        let mut create = Vec::new();
        let mut patch = Vec::new();
        for attribute in inherited {
            let required = source.owned(attribute).is_some_and(OwnsSpec::is_required);
            out.push(
                FieldView::new(
                    &self.naming,
                    attribute,
                    owned_type(schema, attribute, self.out_required(required)),
                )
                .skip_none(),
            );
            create.push(
                FieldView::new(&self.naming, attribute, owned_type(schema, attribute, required))
                    .skip_none(),
            );
            patch.push(
                FieldView::new(&self.naming, attribute, owned_type(schema, attribute, false))
                    .skip_none(),
            );
        }
        for (name, ty) in &config.extra_fields {
            out.push(FieldView::new(&self.naming, name, ty.clone()));
            create.push(FieldView::new(&self.naming, name, ty.clone()));
            patch.push(FieldView::new(&self.naming, name, format!("Option<{ty}>")).skip_none());
        }
        for fields in [&mut out, &mut create, &mut patch] {
            dedupe_fields(fields);
        }

        BaseStructView {
            name: config.base_name.clone(),
            source_entity: config.source_entity.clone(),
            out,
            create,
            patch,
        }
    }

    /// Base struct of an entity: the one whose source is the entity itself or
    /// its nearest ancestor.
    fn base_of<'s>(&'s self, schema: &Schema, entity: &str) -> Option<&'s BaseStructConfig> {
        std::iter::once(entity)
            .chain(schema.ancestors(entity))
            .find_map(|name| {
                self.config
                    .base_structs
                    .iter()
                    .find(|b| b.source_entity == name && schema.entity(name).is_some())
            })
    }

    fn entity(
        &self,
        schema: &Schema,
        entity: &EntitySpec,
        overrides: &BTreeMap<(&str, &str), Override>,
    ) -> EntityDtoView {
        let base = self
            .base_of(schema, &entity.name)
            .filter(|b| b.source_entity != entity.name.as_str());
        let skipped: BTreeSet<&str> = base
            .map(|b| b.inherited_attrs.iter().map(String::as_str).collect())
            .unwrap_or_default();

        let mut out = Vec::new();
        let mut create = Vec::new();
        let mut patch = Vec::new();
        if let Some(b) = base {
            out.push(FieldView::new(&self.naming, "base", format!("{}Out", b.base_name)).flattened());
            create.push(
                FieldView::new(&self.naming, "base", format!("{}Create", b.base_name)).flattened(),
            );
            patch.push(
                FieldView::new(&self.naming, "base", format!("{}Patch", b.base_name)).flattened(),
            );
        }
        out.extend(self.header_fields(true));
        create.extend(self.header_fields(false));

        for owns in sorted_owns(&entity.owns) {
            let attribute = owns.attribute.as_str();
            if skipped.contains(attribute) {
                continue;
            }
            let required = owns.is_required();
            let o = overrides
                .get(&(entity.name.as_str(), attribute))
                .copied()
                .unwrap_or_default();

            let out_required = o.out.unwrap_or_else(|| self.out_required(required));
            let create_required = o.create.unwrap_or(required);
            let patch_required = o.patch.unwrap_or(false);

            out.push(
                FieldView::new(&self.naming, attribute, owned_type(schema, attribute, out_required))
                    .skip_none(),
            );
            create.push(
                FieldView::new(
                    &self.naming,
                    attribute,
                    owned_type(schema, attribute, create_required),
                )
                .skip_none(),
            );
            patch.push(
                FieldView::new(
                    &self.naming,
                    attribute,
                    owned_type(schema, attribute, patch_required),
                )
                .skip_none(),
            );
        }
        for fields in [&mut out, &mut create, &mut patch] {
            dedupe_fields(fields);
        }

        EntityDtoView {
            ident: self.naming.type_name(&entity.name),
            type_name: entity.name.to_string(),
            is_abstract: entity.is_abstract,
            base: base.map(|b| b.base_name.clone()),
            out,
            create,
            patch,
        }
    }

    fn relation(&self, schema: &Schema, relation: &tqlgen_schema::RelationSpec) -> RelationDtoView {
        let id = self.config.id_field_name.to_lowercase();
        let mut roles: Vec<&str> = relation.relates.iter().map(|r| r.role.as_str()).collect();
        roles.sort_unstable();
        roles.dedup();
        let owns = sorted_owns(&relation.owns);

        let out = (!self.config.skip_relation_out).then(|| {
            let mut fields = self.header_fields(true);
            for role in &roles {
                let name = format!("{role}_{id}");
                fields.push(FieldView::new(&self.naming, &name, "Option<String>").skip_none());
            }
            for o in &owns {
                let ty = owned_type(schema, &o.attribute, self.out_required(o.is_required()));
                fields.push(FieldView::new(&self.naming, &o.attribute, ty).skip_none());
            }
            dedupe_fields(&mut fields);
            fields
        });

        let mut create = Vec::new();
        if let Some(embed) = &self.config.relation_create_embed {
            create.push(FieldView::new(&self.naming, embed, embed.clone()).flattened());
        }
        create.extend(self.header_fields(false));
        for role in &roles {
            let name = format!("{role}_id");
            create.push(FieldView::new(&self.naming, &name, "String"));
        }
        for o in &owns {
            let ty = owned_type(schema, &o.attribute, o.is_required());
            create.push(FieldView::new(&self.naming, &o.attribute, ty).skip_none());
        }
        dedupe_fields(&mut create);

        RelationDtoView {
            ident: self.naming.type_name(&relation.name),
            type_name: relation.name.to_string(),
            is_abstract: relation.is_abstract,
            out,
            create,
        }
    }
}
