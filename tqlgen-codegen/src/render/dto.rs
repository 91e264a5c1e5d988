//! Transfer-object template.

use std::fmt::{self, Write};

use super::{DATA_DERIVES, trim_trailing_blank, write_header, write_name_list, write_struct};
use crate::builders::{DtoView, FieldView};
use crate::error::CodegenResult;

const PATCH_DERIVES: &str =
    "Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize";

/// Renders a [`DtoView`] as Out/Create/Patch structs and their traits.
#[derive(Debug, Clone)]
pub struct DtoTemplate {
    pub header: bool,
}

impl Default for DtoTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl DtoTemplate {
    pub fn new() -> Self {
        Self { header: true }
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn render(&self, view: &DtoView) -> CodegenResult<String> {
        let mut out = String::new();
        write_header(&mut out, self.header, &view.module_name)?;

        let traits = &view.traits;
        let has_entities = !view.entities.is_empty() || !view.composites.is_empty();
        if has_entities {
            write_trait(&mut out, &traits.entity_out, "Read model of an entity.")?;
        }
        if !view.entities.is_empty() {
            write_trait(&mut out, &traits.entity_create, "Insert payload of an entity.")?;
            write_trait(&mut out, &traits.entity_patch, "Partial update of an entity.")?;
        }
        if view.relations.iter().any(|r| r.out.is_some()) {
            write_trait(&mut out, &traits.relation_out, "Read model of a relation.")?;
        }
        if !view.relations.is_empty() {
            write_trait(&mut out, &traits.relation_create, "Insert payload of a relation.")?;
        }

        for base in &view.bases {
            let doc = |variant: &str| {
                vec![format!(
                    "Shared {variant} fields of `{}` and its subtypes.",
                    base.source_entity
                )]
            };
            write_struct(
                &mut out,
                &doc("read"),
                DATA_DERIVES,
                &format!("{}Out", base.name),
                &base.out,
            )?;
            writeln!(out)?;
            write_struct(
                &mut out,
                &doc("insert"),
                DATA_DERIVES,
                &format!("{}Create", base.name),
                &base.create,
            )?;
            writeln!(out)?;
            write_struct(
                &mut out,
                &doc("update"),
                PATCH_DERIVES,
                &format!("{}Patch", base.name),
                &base.patch,
            )?;
            writeln!(out)?;
        }

        for entity in &view.entities {
            let name = &entity.type_name;
            write_dto(&mut out, &entity.ident, "Out", name, &entity.out, &traits.entity_out)?;
            write_dto(
                &mut out,
                &entity.ident,
                "Create",
                name,
                &entity.create,
                &traits.entity_create,
            )?;
            write_dto(
                &mut out,
                &entity.ident,
                "Patch",
                name,
                &entity.patch,
                &traits.entity_patch,
            )?;
        }

        for relation in &view.relations {
            let name = &relation.type_name;
            if let Some(fields) = &relation.out {
                write_dto(&mut out, &relation.ident, "Out", name, fields, &traits.relation_out)?;
            }
            write_dto(
                &mut out,
                &relation.ident,
                "Create",
                name,
                &relation.create,
                &traits.relation_create,
            )?;
        }

        for composite in &view.composites {
            let doc = vec![format!(
                "Read model over {}.",
                composite
                    .entities
                    .iter()
                    .map(|e| format!("`{e}`"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )];
            let ident = format!("{}Out", composite.ident);
            write_struct(&mut out, &doc, DATA_DERIVES, &ident, &composite.fields)?;
            writeln!(out)?;
            write_trait_impl(&mut out, &traits.entity_out, &ident, &composite.type_name)?;
        }

        if !view.concrete_entities.is_empty() {
            write_name_list(
                &mut out,
                "Entity types with DTOs that can be instantiated.",
                "CONCRETE_ENTITIES",
                &view.concrete_entities,
            )?;
        }
        if !view.concrete_relations.is_empty() {
            write_name_list(
                &mut out,
                "Relation types with DTOs that can be instantiated.",
                "CONCRETE_RELATIONS",
                &view.concrete_relations,
            )?;
        }

        trim_trailing_blank(&mut out);
        Ok(out)
    }
}

fn write_trait(out: &mut String, name: &str, doc: &str) -> fmt::Result {
    writeln!(out, "/// {doc}")?;
    writeln!(out, "pub trait {name} {{")?;
    writeln!(out, "    /// Schema type name.")?;
    writeln!(out, "    const TYPE_NAME: &'static str;")?;
    writeln!(out, "}}")?;
    writeln!(out)
}

fn write_trait_impl(out: &mut String, name: &str, ident: &str, type_name: &str) -> fmt::Result {
    writeln!(out, "impl {name} for {ident} {{")?;
    writeln!(out, "    const TYPE_NAME: &'static str = {type_name:?};")?;
    writeln!(out, "}}")?;
    writeln!(out)
}

fn write_dto(
    out: &mut String,
    ident: &str,
    variant: &str,
    type_name: &str,
    fields: &[FieldView],
    trait_name: &str,
) -> fmt::Result {
    let (doc, derives) = match variant {
        "Out" => ("Read model", DATA_DERIVES),
        "Create" => ("Insert payload", DATA_DERIVES),
        _ => ("Partial update", PATCH_DERIVES),
    };
    let ident = format!("{ident}{variant}");
    write_struct(out, &[format!("{doc} of `{type_name}`.")], derives, &ident, fields)?;
    writeln!(out)?;
    write_trait_impl(out, trait_name, &ident, type_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::DtoBuilder;
    use crate::config::{BaseStructConfig, CompositeConfig, DtoConfig};
    use crate::render::HEADER;
    use std::collections::BTreeMap;
    use tqlgen_schema::parse_schema;

    const SCHEMA: &str = r#"define
attribute name, value string;
attribute priority, value integer;
attribute since, value datetime;
entity artifact @abstract, owns name @key;
entity task sub artifact, owns priority @card(1);
entity person, owns name @key, plays assignment:assignee;
relation assignment, relates task, relates assignee, owns since;
"#;

    fn view(config: &DtoConfig) -> DtoView {
        let mut schema = parse_schema(SCHEMA).unwrap();
        schema.accumulate_inheritance().unwrap();
        DtoBuilder::new(config).build(&schema)
    }

    fn full_config() -> DtoConfig {
        DtoConfig {
            base_structs: vec![BaseStructConfig {
                source_entity: "artifact".to_string(),
                base_name: "BaseArtifact".to_string(),
                inherited_attrs: vec!["name".to_string()],
                extra_fields: BTreeMap::new(),
            }],
            composites: vec![CompositeConfig {
                name: "Anything".to_string(),
                entities: vec!["task".to_string(), "person".to_string()],
                type_name: "anything".to_string(),
            }],
            ..DtoConfig::default()
        }
    }

    #[test]
    fn test_render_parses_as_rust() {
        let code = DtoTemplate::new().render(&view(&full_config())).unwrap();
        syn::parse_file(&code).unwrap();

        assert!(code.starts_with(HEADER));
        assert!(code.contains("pub trait EntityOut {"));
        assert!(code.contains("pub struct BaseArtifactPatch {"));
        assert!(code.contains("    #[serde(flatten)]\n    pub base: BaseArtifactOut,"));
        assert!(code.contains("    #[serde(rename = \"type\")]\n    pub type_name: String,"));
        assert!(code.contains("impl EntityCreate for TaskCreate {"));
        assert!(code.contains("impl RelationOut for AssignmentOut {"));
        assert!(code.contains("pub task_id: String,"));
        assert!(code.contains(
            "impl EntityOut for AnythingOut {\n    const TYPE_NAME: &'static str = \"anything\";"
        ));
        assert!(code.contains(
            "pub const CONCRETE_ENTITIES: &[&str] = &[\"person\", \"task\"];"
        ));
        assert!(code.contains("pub const CONCRETE_RELATIONS: &[&str] = &[\"assignment\"];"));
    }

    #[test]
    fn test_patch_derives_default() {
        let code = DtoTemplate::new().render(&view(&DtoConfig::default())).unwrap();
        assert!(code.contains(
            "#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]\n\
             pub struct PersonPatch {"
        ));
    }

    #[test]
    fn test_skip_relation_out_and_custom_traits() {
        let config = DtoConfig {
            skip_relation_out: true,
            relation_create_trait: "NewEdge".to_string(),
            ..DtoConfig::default()
        };
        let code = DtoTemplate::new().render(&view(&config)).unwrap();
        syn::parse_file(&code).unwrap();
        assert!(!code.contains("AssignmentOut"));
        assert!(!code.contains("pub trait RelationOut"));
        assert!(code.contains("impl NewEdge for AssignmentCreate {"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let view = view(&full_config());
        let template = DtoTemplate::new().with_header(false);
        let first = template.render(&view).unwrap();
        assert_eq!(first, template.render(&view).unwrap());
        assert!(!first.contains(HEADER));
    }
}
