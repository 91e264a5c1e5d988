//! CLI error types and result alias.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;
use tqlgen_codegen::CodegenError;
use tqlgen_schema::SchemaError;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(tqlgen::cli::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(tqlgen::cli::config))]
    Config(String),

    /// Schema reading or parsing error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] SchemaError),

    /// Code generation error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Codegen(#[from] CodegenError),

    /// Command error
    #[error("Command error: {0}")]
    #[diagnostic(code(tqlgen::cli::command))]
    Command(String),
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Command(format!("Failed to serialize schema: {}", err))
    }
}

#[cfg(test)]
#[allow(unused_assignments)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = CliError::Config("no schema file given".to_string());
        assert_eq!(err.to_string(), "Configuration error: no schema file given");
    }

    #[test]
    fn test_schema_error_keeps_its_message() {
        let err: CliError = SchemaError::duplicate("entity", "person").into();
        assert_eq!(err.to_string(), "duplicate entity `person`");
    }

    #[test]
    fn test_codegen_error_keeps_its_code() {
        let err: CliError = CodegenError::from(std::fmt::Error).into();
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("tqlgen::codegen::render"));
    }
}
