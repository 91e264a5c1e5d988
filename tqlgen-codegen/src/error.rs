//! Error types for configuration loading, view building and rendering.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;
use tqlgen_schema::SchemaError;

/// Result type for code generation.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Errors that can occur while generating code.
#[derive(Error, Debug, Diagnostic)]
pub enum CodegenError {
    /// The configuration file could not be decoded.
    #[error("invalid configuration in {path}: {source}")]
    #[diagnostic(
        code(tqlgen::codegen::config),
        help("see the [schema], [model], [dto] and [registry] sections of tqlgen.toml")
    )]
    Config {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Error reading or writing a file.
    #[error("failed to access file: {path}")]
    #[diagnostic(code(tqlgen::codegen::io_error))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the generated text failed.
    #[error("failed to render generated code")]
    #[diagnostic(code(tqlgen::codegen::render))]
    Render(#[from] std::fmt::Error),

    /// The schema could not be parsed or resolved.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] SchemaError),
}

impl CodegenError {
    /// Create an IO error for a path.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(unused_assignments)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let source = toml::from_str::<toml::Value>("a = ").unwrap_err();
        let err = CodegenError::Config {
            path: "tqlgen.toml".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid configuration in tqlgen.toml"));
    }

    #[test]
    fn test_schema_error_is_transparent() {
        let err: CodegenError = SchemaError::duplicate("entity", "person").into();
        assert_eq!(err.to_string(), "duplicate entity `person`");
    }

    #[test]
    fn test_render_error() {
        let err: CodegenError = std::fmt::Error.into();
        assert_eq!(err.to_string(), "failed to render generated code");
    }
}
