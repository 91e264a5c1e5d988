//! Source text to generated module, in one call.

use std::fmt;
use std::path::Path;

use tqlgen_schema::{Schema, parse_schema, read_schema_source};
use tracing::{debug, info};

use crate::builders::{DtoBuilder, ModelBuilder, RegistryBuilder};
use crate::config::{RegistryConfig, TqlgenConfig};
use crate::error::CodegenResult;
use crate::render::{ConstantsTemplate, DtoTemplate, ModelTemplate, RegistryTemplate};

/// Kind of module to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Model,
    Dto,
    Registry,
    Constants,
}

impl Target {
    pub const ALL: [Target; 4] = [Self::Model, Self::Dto, Self::Registry, Self::Constants];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Dto => "dto",
            Self::Registry => "registry",
            Self::Constants => "constants",
        }
    }

    /// Module name configured for this target.
    pub fn module_name<'c>(&self, config: &'c TqlgenConfig) -> &'c str {
        match self {
            Self::Model => &config.model.module_name,
            Self::Dto => &config.dto.module_name,
            Self::Registry | Self::Constants => &config.registry.module_name,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse schema text and accumulate inheritance when `inherit` is set.
pub fn load_schema(source: &str, inherit: bool) -> CodegenResult<Schema> {
    let mut schema = parse_schema(source)?;
    if inherit {
        schema.accumulate_inheritance()?;
    }
    debug!(inherit, "schema loaded");
    Ok(schema)
}

/// Runs parse, accumulate, build and render for one target.
#[derive(Debug, Clone)]
pub struct Generator<'c> {
    config: &'c TqlgenConfig,
    header: bool,
}

impl<'c> Generator<'c> {
    pub fn new(config: &'c TqlgenConfig) -> Self {
        Self {
            config,
            header: true,
        }
    }

    /// Include the generated-code banner (default on).
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Generate a module from schema source text.
    pub fn generate(&self, source: &str, target: Target) -> CodegenResult<String> {
        let schema = load_schema(source, self.config.schema.inherit)?;
        let code = self.render(&schema, source, target)?;
        info!(%target, bytes = code.len(), "generated module");
        Ok(code)
    }

    /// Generate a module from a schema file.
    pub fn generate_file(&self, path: impl AsRef<Path>, target: Target) -> CodegenResult<String> {
        let source = read_schema_source(path.as_ref())?;
        self.generate(&source, target)
    }

    /// Build and render an already loaded schema. `source` feeds the registry
    /// fingerprint and comment annotations.
    pub fn render(&self, schema: &Schema, source: &str, target: Target) -> CodegenResult<String> {
        match target {
            Target::Model => {
                let view = ModelBuilder::new(&self.config.model).build(schema);
                ModelTemplate::new().with_header(self.header).render(&view)
            }
            Target::Dto => {
                let view = DtoBuilder::new(&self.config.dto).build(schema);
                DtoTemplate::new().with_header(self.header).render(&view)
            }
            Target::Registry => {
                let view = RegistryBuilder::new(&self.config.registry)
                    .with_source(source)
                    .build(schema)?;
                RegistryTemplate::new().with_header(self.header).render(&view)
            }
            Target::Constants => {
                let config = RegistryConfig {
                    enums: true,
                    ..self.config.registry.clone()
                };
                let view = RegistryBuilder::new(&config).with_source(source).build(schema)?;
                ConstantsTemplate::new().with_header(self.header).render(&view)
            }
        }
    }
}
