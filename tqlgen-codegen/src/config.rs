//! Configuration for `tqlgen.toml` and the three builders.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CodegenError, CodegenResult};
use crate::naming::{Naming, default_acronyms};

/// File name searched for next to the schema and in the working directory.
pub const CONFIG_FILE_NAME: &str = "tqlgen.toml";

/// Main configuration structure for `tqlgen.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TqlgenConfig {
    /// Schema file settings.
    #[serde(default)]
    pub schema: SchemaSection,

    /// Data-model generation settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Transfer-object generation settings.
    #[serde(default)]
    pub dto: DtoConfig,

    /// Registry and leaf-constant generation settings.
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl TqlgenConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> CodegenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CodegenError::io(path.display().to_string(), e))?;

        toml::from_str(&content).map_err(|source| CodegenError::Config {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> CodegenResult<Self> {
        toml::from_str(content).map_err(|source| CodegenError::Config {
            path: CONFIG_FILE_NAME.to_string(),
            source,
        })
    }

    /// Find `tqlgen.toml` in `start` or up to five of its parent directories.
    pub fn find(start: &Path) -> Option<PathBuf> {
        let mut search_dir = Some(start);
        for _ in 0..=5 {
            let dir = search_dir?;
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            search_dir = dir.parent();
        }
        None
    }
}

/// Schema file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaSection {
    /// Path to the schema file, relative to the config file.
    pub path: Option<PathBuf>,

    /// Merge inherited ownership and roles before building.
    #[serde(default = "default_true")]
    pub inherit: bool,
}

impl Default for SchemaSection {
    fn default() -> Self {
        Self {
            path: None,
            inherit: true,
        }
    }
}

/// Plain data-model generation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Name of the generated module.
    #[serde(default = "default_model_module")]
    pub module_name: String,

    /// Render table words fully upper-case in type names.
    #[serde(default = "default_true")]
    pub use_acronyms: bool,

    /// Words treated as acronyms.
    #[serde(default = "default_acronyms")]
    pub acronyms: Vec<String>,

    /// Leave abstract types out.
    #[serde(default = "default_true")]
    pub skip_abstract: bool,

    /// Generate enums for attributes with `@values`.
    #[serde(default = "default_true")]
    pub enums: bool,

    /// Version string emitted as `SCHEMA_VERSION`.
    #[serde(default)]
    pub schema_version: Option<String>,

    /// Instance id field added to every type; empty leaves it out.
    #[serde(default = "default_instance_id")]
    pub instance_id_field: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            module_name: default_model_module(),
            use_acronyms: true,
            acronyms: default_acronyms(),
            skip_abstract: true,
            enums: true,
            schema_version: None,
            instance_id_field: default_instance_id(),
        }
    }
}

impl ModelConfig {
    /// Naming rules for this configuration.
    pub fn naming(&self) -> Naming {
        Naming::new(self.use_acronyms, &self.acronyms)
    }
}

/// Out/Create/Patch transfer-object generation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DtoConfig {
    /// Name of the generated module.
    #[serde(default = "default_dto_module")]
    pub module_name: String,

    /// Render table words fully upper-case in type names.
    #[serde(default = "default_true")]
    pub use_acronyms: bool,

    /// Words treated as acronyms.
    #[serde(default = "default_acronyms")]
    pub acronyms: Vec<String>,

    /// Leave abstract types out.
    #[serde(default = "default_true")]
    pub skip_abstract: bool,

    /// Name of the id field in Out DTOs; its lower-case form is the JSON key.
    #[serde(default = "default_id_field")]
    pub id_field_name: String,

    /// Keep required fields non-optional in Out DTOs.
    #[serde(default)]
    pub strict_out: bool,

    /// Do not generate Out DTOs for relations.
    #[serde(default)]
    pub skip_relation_out: bool,

    /// Entities to leave out.
    #[serde(default)]
    pub exclude_entities: Vec<String>,

    /// Relations to leave out.
    #[serde(default)]
    pub exclude_relations: Vec<String>,

    /// Shared base structs for entity hierarchies.
    #[serde(default)]
    pub base_structs: Vec<BaseStructConfig>,

    /// Per-entity, per-variant requiredness overrides.
    #[serde(default)]
    pub overrides: Vec<FieldOverride>,

    /// Flat DTOs merging several entity types.
    #[serde(default)]
    pub composites: Vec<CompositeConfig>,

    #[serde(default = "default_entity_out_trait")]
    pub entity_out_trait: String,

    #[serde(default = "default_entity_create_trait")]
    pub entity_create_trait: String,

    #[serde(default = "default_entity_patch_trait")]
    pub entity_patch_trait: String,

    #[serde(default = "default_relation_out_trait")]
    pub relation_out_trait: String,

    #[serde(default = "default_relation_create_trait")]
    pub relation_create_trait: String,

    /// Struct flattened into every relation Create DTO.
    #[serde(default)]
    pub relation_create_embed: Option<String>,
}

impl Default for DtoConfig {
    fn default() -> Self {
        Self {
            module_name: default_dto_module(),
            use_acronyms: true,
            acronyms: default_acronyms(),
            skip_abstract: true,
            id_field_name: default_id_field(),
            strict_out: false,
            skip_relation_out: false,
            exclude_entities: Vec::new(),
            exclude_relations: Vec::new(),
            base_structs: Vec::new(),
            overrides: Vec::new(),
            composites: Vec::new(),
            entity_out_trait: default_entity_out_trait(),
            entity_create_trait: default_entity_create_trait(),
            entity_patch_trait: default_entity_patch_trait(),
            relation_out_trait: default_relation_out_trait(),
            relation_create_trait: default_relation_create_trait(),
            relation_create_embed: None,
        }
    }
}

impl DtoConfig {
    /// Naming rules for this configuration.
    pub fn naming(&self) -> Naming {
        Naming::new(self.use_acronyms, &self.acronyms)
    }
}

/// A base struct shared by an entity hierarchy.
///
/// Descendants of `source_entity` flatten `{base_name}Out`, `{base_name}Create`
/// and `{base_name}Patch` instead of repeating `inherited_attrs`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BaseStructConfig {
    pub source_entity: String,
    pub base_name: String,
    #[serde(default)]
    pub inherited_attrs: Vec<String>,
    /// Additional fields as JSON name to Rust type.
    #[serde(default)]
    pub extra_fields: BTreeMap<String, String>,
}

/// DTO variant an override applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DtoVariant {
    Out,
    Create,
    Patch,
}

/// Requiredness override for one field of one entity variant.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FieldOverride {
    pub entity: String,
    /// Attribute name.
    pub field: String,
    pub variant: DtoVariant,
    /// Replaces the schema classification; `None` keeps it.
    #[serde(default)]
    pub required: Option<bool>,
}

/// A flat Out DTO over several entity types.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompositeConfig {
    /// Struct name prefix of the composite.
    pub name: String,
    pub entities: Vec<String>,
    /// Value of the composite's `TYPE_NAME`.
    pub type_name: String,
}

/// Registry and leaf-constant generation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Name of the generated module.
    #[serde(default = "default_registry_module")]
    pub module_name: String,

    /// Render table words fully upper-case in the value newtypes of typed
    /// mode. Constants are SCREAMING_SNAKE_CASE either way.
    #[serde(default = "default_true")]
    pub use_acronyms: bool,

    /// Words treated as acronyms.
    #[serde(default = "default_acronyms")]
    pub acronyms: Vec<String>,

    /// Leave abstract types out of constants, keys and attribute tables.
    #[serde(default = "default_true")]
    pub skip_abstract: bool,

    /// Generate constants for `@values` entries.
    #[serde(default = "default_true")]
    pub enums: bool,

    #[serde(default = "default_type_prefix")]
    pub type_prefix: String,

    #[serde(default = "default_rel_prefix")]
    pub rel_prefix: String,

    #[serde(default = "default_attr_prefix")]
    pub attr_prefix: String,

    /// Wrap type constants in `EntityType`, `RelationType` and `AttributeType`.
    #[serde(default)]
    pub typed_constants: bool,

    /// Emit JSON-schema documents per concrete type.
    #[serde(default)]
    pub json_schema: bool,

    /// Version string emitted as `SCHEMA_VERSION`.
    #[serde(default)]
    pub schema_version: Option<String>,

    /// Emit `SCHEMA_HASH` when the schema source is available.
    #[serde(default = "default_true")]
    pub fingerprint: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            module_name: default_registry_module(),
            use_acronyms: true,
            acronyms: default_acronyms(),
            skip_abstract: true,
            enums: true,
            type_prefix: default_type_prefix(),
            rel_prefix: default_rel_prefix(),
            attr_prefix: default_attr_prefix(),
            typed_constants: false,
            json_schema: false,
            schema_version: None,
            fingerprint: true,
        }
    }
}

impl RegistryConfig {
    /// Naming rules for this configuration.
    pub fn naming(&self) -> Naming {
        Naming::new(self.use_acronyms, &self.acronyms)
    }
}

fn default_true() -> bool {
    true
}

fn default_model_module() -> String {
    "models".to_string()
}

fn default_dto_module() -> String {
    "dto".to_string()
}

fn default_registry_module() -> String {
    "registry".to_string()
}

fn default_instance_id() -> String {
    "iid".to_string()
}

fn default_id_field() -> String {
    "ID".to_string()
}

fn default_entity_out_trait() -> String {
    "EntityOut".to_string()
}

fn default_entity_create_trait() -> String {
    "EntityCreate".to_string()
}

fn default_entity_patch_trait() -> String {
    "EntityPatch".to_string()
}

fn default_relation_out_trait() -> String {
    "RelationOut".to_string()
}

fn default_relation_create_trait() -> String {
    "RelationCreate".to_string()
}

fn default_type_prefix() -> String {
    "TYPE".to_string()
}

fn default_rel_prefix() -> String {
    "REL".to_string()
}

fn default_attr_prefix() -> String {
    "ATTR".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = TqlgenConfig::default();
        assert!(config.schema.inherit);
        assert_eq!(config.schema.path, None);
        assert_eq!(config.model.module_name, "models");
        assert_eq!(config.model.instance_id_field, "iid");
        assert_eq!(config.dto.module_name, "dto");
        assert_eq!(config.dto.id_field_name, "ID");
        assert_eq!(config.dto.entity_out_trait, "EntityOut");
        assert_eq!(config.registry.type_prefix, "TYPE");
        assert!(config.registry.fingerprint);
        assert!(!config.registry.typed_constants);
    }

    #[test]
    fn test_empty_file_matches_defaults() {
        let config = TqlgenConfig::from_str("").unwrap();
        let defaults = TqlgenConfig::default();
        assert_eq!(config.model.acronyms, defaults.model.acronyms);
        assert_eq!(config.dto.relation_create_trait, defaults.dto.relation_create_trait);
        assert_eq!(config.registry.attr_prefix, defaults.registry.attr_prefix);
        assert!(config.model.skip_abstract);
    }

    #[test]
    fn test_parse_full_config() {
        let config = TqlgenConfig::from_str(
            r#"
            [schema]
            path = "schema.tql"
            inherit = false

            [model]
            module_name = "domain"
            enums = false
            schema_version = "1.2.0"

            [dto]
            strict_out = true
            exclude_entities = ["audit-log"]

            [[dto.base_structs]]
            source_entity = "artifact"
            base_name = "BaseArtifact"
            inherited_attrs = ["name", "created-at"]
            extra_fields = { tags = "Vec<String>" }

            [[dto.overrides]]
            entity = "task"
            field = "priority"
            variant = "create"
            required = true

            [[dto.composites]]
            name = "Artifact"
            entities = ["task", "note"]
            type_name = "artifact"

            [registry]
            typed_constants = true
            json_schema = true
            fingerprint = false
            "#,
        )
        .unwrap();

        assert_eq!(config.schema.path, Some(PathBuf::from("schema.tql")));
        assert!(!config.schema.inherit);
        assert_eq!(config.model.module_name, "domain");
        assert!(!config.model.enums);
        assert_eq!(config.model.schema_version.as_deref(), Some("1.2.0"));
        assert!(config.dto.strict_out);
        assert_eq!(config.dto.exclude_entities, vec!["audit-log"]);
        assert_eq!(config.dto.base_structs[0].base_name, "BaseArtifact");
        assert_eq!(
            config.dto.base_structs[0].extra_fields["tags"],
            "Vec<String>"
        );
        assert_eq!(config.dto.overrides[0].variant, DtoVariant::Create);
        assert_eq!(config.dto.overrides[0].required, Some(true));
        assert_eq!(config.dto.composites[0].entities, vec!["task", "note"]);
        assert!(config.registry.typed_constants);
        assert!(config.registry.json_schema);
        assert!(!config.registry.fingerprint);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = TqlgenConfig::from_str("[model]\nmodule = \"x\"\n").unwrap_err();
        assert!(matches!(err, CodegenError::Config { .. }));

        assert!(TqlgenConfig::from_str("[generator]\n").is_err());
    }

    #[test]
    fn test_from_file_and_find() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[registry]\nrel_prefix = \"RELATION\"\n").unwrap();

        assert_eq!(TqlgenConfig::find(&nested), Some(path.clone()));
        let config = TqlgenConfig::from_file(&path).unwrap();
        assert_eq!(config.registry.rel_prefix, "RELATION");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TqlgenConfig::from_file("/definitely/not/here/tqlgen.toml").unwrap_err();
        assert!(matches!(err, CodegenError::Io { .. }));
    }
}
