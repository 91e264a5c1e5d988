//! Schema and config file reading at compile time.

use std::env;
use std::path::{Path, PathBuf};

use tqlgen_codegen::{CONFIG_FILE_NAME, TqlgenConfig};

/// Schema text with the settings that apply to it.
pub struct SchemaWithConfig {
    /// Resolved schema path.
    pub path: PathBuf,
    /// Schema source text.
    pub source: String,
    /// Settings from the nearest `tqlgen.toml`, or defaults.
    pub config: TqlgenConfig,
}

/// Read a schema file, resolving the path relative to the crate root, along
/// with the nearest `tqlgen.toml`.
pub fn read_schema_with_config(path: &str) -> Result<SchemaWithConfig, SchemaReadError> {
    let full_path = resolve_schema_path(path)?;

    let source = std::fs::read_to_string(&full_path).map_err(|e| SchemaReadError::Io {
        path: full_path.display().to_string(),
        error: e.to_string(),
    })?;

    let config = match find_config(&full_path) {
        Some(config_path) => {
            TqlgenConfig::from_file(&config_path).map_err(|e| SchemaReadError::Config {
                path: config_path.display().to_string(),
                error: e.to_string(),
            })?
        }
        None => TqlgenConfig::default(),
    };

    Ok(SchemaWithConfig {
        path: full_path,
        source,
        config,
    })
}

/// `tqlgen.toml` in the schema's directory or up to 5 parent directories.
fn find_config(schema_path: &Path) -> Option<PathBuf> {
    TqlgenConfig::find(schema_path.parent()?)
}

/// Resolve a schema path relative to the crate root.
fn resolve_schema_path(path: &str) -> Result<PathBuf, SchemaReadError> {
    // CARGO_MANIFEST_DIR is set while the calling crate compiles
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        let full_path = PathBuf::from(manifest_dir).join(path);
        if full_path.exists() {
            return Ok(full_path);
        }
    }

    let absolute = PathBuf::from(path);
    if absolute.is_absolute() && absolute.exists() {
        return Ok(absolute);
    }

    let current_dir = env::current_dir().map_err(|e| SchemaReadError::PathResolution {
        path: path.to_string(),
        error: e.to_string(),
    })?;

    let relative_path = current_dir.join(path);
    if relative_path.exists() {
        return Ok(relative_path);
    }

    Err(SchemaReadError::NotFound {
        path: path.to_string(),
        searched: vec![
            format!("CARGO_MANIFEST_DIR/{}", path),
            format!("(absolute) {}", path),
            format!("(current_dir) {}", path),
        ],
    })
}

/// Errors that can occur when reading a schema file.
#[derive(Debug)]
pub enum SchemaReadError {
    /// File not found.
    NotFound { path: String, searched: Vec<String> },
    /// IO error reading the file.
    Io { path: String, error: String },
    /// The `tqlgen.toml` next to the schema is invalid.
    Config { path: String, error: String },
    /// Error resolving the schema path.
    PathResolution { path: String, error: String },
}

impl std::fmt::Display for SchemaReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { path, searched } => {
                write!(
                    f,
                    "Schema file '{}' not found. Searched in:\n{}",
                    path,
                    searched
                        .iter()
                        .map(|s| format!("  - {}", s))
                        .collect::<Vec<_>>()
                        .join("\n")
                )
            }
            Self::Io { path, error } => {
                write!(f, "Failed to read schema file '{}': {}", path, error)
            }
            Self::Config { path, error } => {
                write!(f, "Failed to load '{}': {}", path, error)
            }
            Self::PathResolution { path, error } => {
                write!(f, "Failed to resolve path '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for SchemaReadError {}
