//! Config file discovery and command-line overrides.
//!
//! Settings resolve in order: command-line flags, then `tqlgen.toml`, then
//! the built-in defaults.

use std::path::{Path, PathBuf};

use tqlgen_codegen::{CONFIG_FILE_NAME, Target, TqlgenConfig};
use tracing::debug;

use crate::cli::{CommonArgs, DtoArgs, ModelArgs, RegistryArgs};
use crate::error::{CliError, CliResult};

/// A configuration and the file it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: TqlgenConfig,
    /// `None` when the defaults are in use.
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Load `explicit`, or `./tqlgen.toml` when present, or the defaults.
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        let path = match explicit {
            Some(path) if !path.is_file() => {
                return Err(CliError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let candidate = PathBuf::from(CONFIG_FILE_NAME);
                candidate.is_file().then_some(candidate)
            }
        };

        let config = match &path {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                TqlgenConfig::from_file(path)?
            }
            None => TqlgenConfig::default(),
        };
        Ok(Self { config, path })
    }

    /// The schema given on the command line, else `[schema].path` resolved
    /// against the config file's directory.
    pub fn schema_path(&self, flag: Option<&Path>) -> CliResult<PathBuf> {
        if let Some(path) = flag {
            return Ok(path.to_path_buf());
        }
        let Some(configured) = &self.config.schema.path else {
            return Err(CliError::Config(
                "no schema file given; pass --schema or set [schema].path in tqlgen.toml"
                    .to_string(),
            ));
        };
        let base = self
            .path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new(""));
        Ok(base.join(configured))
    }
}

impl CommonArgs {
    /// Apply the shared flags to the section `target` renders from.
    pub fn apply(&self, target: Target, config: &mut TqlgenConfig) {
        if let Some(inherit) = self.inherit {
            config.schema.inherit = inherit;
        }

        let (module, acronyms, skip_abstract) = match target {
            Target::Model => (
                &mut config.model.module_name,
                &mut config.model.use_acronyms,
                &mut config.model.skip_abstract,
            ),
            Target::Dto => (
                &mut config.dto.module_name,
                &mut config.dto.use_acronyms,
                &mut config.dto.skip_abstract,
            ),
            Target::Registry | Target::Constants => (
                &mut config.registry.module_name,
                &mut config.registry.use_acronyms,
                &mut config.registry.skip_abstract,
            ),
        };
        if let Some(name) = &self.module {
            *module = name.clone();
        }
        if let Some(value) = self.acronyms {
            *acronyms = value;
        }
        if let Some(value) = self.skip_abstract {
            *skip_abstract = value;
        }
    }
}

impl ModelArgs {
    pub fn apply(&self, config: &mut TqlgenConfig) {
        if let Some(enums) = self.enums {
            config.model.enums = enums;
        }
        if let Some(version) = &self.schema_version {
            config.model.schema_version = Some(version.clone());
        }
    }
}

impl DtoArgs {
    pub fn apply(&self, config: &mut TqlgenConfig) {
        if let Some(id) = &self.id_field {
            config.dto.id_field_name = id.clone();
        }
        // Switches only ever turn a setting on.
        if self.strict_out {
            config.dto.strict_out = true;
        }
        if self.skip_relation_out {
            config.dto.skip_relation_out = true;
        }
    }
}

impl RegistryArgs {
    pub fn apply(&self, config: &mut TqlgenConfig) {
        let registry = &mut config.registry;
        if let Some(enums) = self.enums {
            registry.enums = enums;
        }
        if self.typed_constants {
            registry.typed_constants = true;
        }
        if self.json_schema {
            registry.json_schema = true;
        }
        if let Some(version) = &self.schema_version {
            registry.schema_version = Some(version.clone());
        }
        if self.no_fingerprint {
            registry.fingerprint = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let err = LoadedConfig::load(Some(Path::new("/nonexistent/tqlgen.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_schema_path_relative_to_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("tqlgen.toml");
        fs::write(&config_path, "[schema]\npath = \"schema/app.tql\"\n").unwrap();

        let loaded = LoadedConfig::load(Some(&config_path)).unwrap();
        assert_eq!(
            loaded.schema_path(None).unwrap(),
            dir.path().join("schema/app.tql")
        );
        assert_eq!(
            loaded.schema_path(Some(Path::new("other.tql"))).unwrap(),
            PathBuf::from("other.tql")
        );
    }

    #[test]
    fn test_schema_path_required() {
        let loaded = LoadedConfig::default();
        assert!(matches!(loaded.schema_path(None), Err(CliError::Config(_))));
    }

    #[test]
    fn test_flags_override_config() {
        let mut config =
            TqlgenConfig::from_str("[registry]\nmodule_name = \"reg\"\nuse_acronyms = true\n")
                .unwrap();
        let common = CommonArgs {
            acronyms: Some(false),
            inherit: Some(false),
            ..CommonArgs::default()
        };
        common.apply(Target::Constants, &mut config);

        assert_eq!(config.registry.module_name, "reg");
        assert!(!config.registry.use_acronyms);
        assert!(!config.schema.inherit);
        assert!(config.model.use_acronyms);

        let common = CommonArgs {
            module: Some("types".to_string()),
            ..CommonArgs::default()
        };
        common.apply(Target::Model, &mut config);
        assert_eq!(config.model.module_name, "types");
    }

    #[test]
    fn test_registry_switches() {
        let mut config = TqlgenConfig::default();
        let args = RegistryArgs {
            common: CommonArgs::default(),
            enums: Some(false),
            typed_constants: true,
            json_schema: false,
            schema_version: Some("3".to_string()),
            no_fingerprint: true,
        };
        args.apply(&mut config);

        assert!(!config.registry.enums);
        assert!(config.registry.typed_constants);
        assert!(!config.registry.json_schema);
        assert_eq!(config.registry.schema_version.as_deref(), Some("3"));
        assert!(!config.registry.fingerprint);
    }
}
