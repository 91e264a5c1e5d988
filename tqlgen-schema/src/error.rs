//! Error types for schema tokenizing, parsing and model resolution.

// These warnings are false positives - the fields are used by derive macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while turning schema text into a [`Schema`](crate::Schema).
#[derive(Error, Debug, Diagnostic)]
pub enum SchemaError {
    /// Error reading a file.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(tqlgen::schema::io_error))]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A character sequence no token rule accepts.
    #[error("lexical error at {line}:{column}: {message}")]
    #[diagnostic(code(tqlgen::schema::lexical_error))]
    LexicalError {
        #[source_code]
        src: String,
        #[label("unrecognized input")]
        span: miette::SourceSpan,
        line: usize,
        column: usize,
        message: String,
    },

    /// Syntax error in the schema file.
    #[error("syntax error at {line}:{column}: {message}")]
    #[diagnostic(code(tqlgen::schema::syntax_error))]
    SyntaxError {
        #[source_code]
        src: String,
        #[label("error here")]
        span: miette::SourceSpan,
        line: usize,
        column: usize,
        message: String,
    },

    /// Two definitions of the same kind share a name.
    #[error("duplicate {kind} `{name}`")]
    #[diagnostic(code(tqlgen::schema::duplicate))]
    DuplicateDefinition { kind: String, name: String },

    /// A parent chain loops back on itself.
    #[error("cyclic inheritance for {kind} `{name}`: {chain}")]
    #[diagnostic(
        code(tqlgen::schema::cyclic_inheritance),
        help("remove one of the `sub` declarations in the chain")
    )]
    CyclicInheritance {
        kind: String,
        name: String,
        chain: String,
    },

    /// A line pattern failed to compile.
    #[error("invalid pattern: {0}")]
    #[diagnostic(code(tqlgen::schema::pattern))]
    Pattern(#[from] regex_lite::Error),
}

/// Source position shared by lexical and syntax errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Byte offset of the error.
    pub offset: usize,
    /// Length of the highlighted region in bytes.
    pub len: usize,
    /// One-based line.
    pub line: usize,
    /// One-based column.
    pub column: usize,
}

impl SchemaError {
    /// Create a lexical error with source location.
    pub fn lexical(src: impl Into<String>, at: Location, message: impl Into<String>) -> Self {
        Self::LexicalError {
            src: src.into(),
            span: (at.offset, at.len).into(),
            line: at.line,
            column: at.column,
            message: message.into(),
        }
    }

    /// Create a syntax error with source location.
    pub fn syntax(src: impl Into<String>, at: Location, message: impl Into<String>) -> Self {
        Self::SyntaxError {
            src: src.into(),
            span: (at.offset, at.len).into(),
            line: at.line,
            column: at.column,
            message: message.into(),
        }
    }

    /// Create a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a cyclic inheritance error from the walked chain.
    pub fn cyclic(kind: impl Into<String>, name: impl Into<String>, chain: &[&str]) -> Self {
        Self::CyclicInheritance {
            kind: kind.into(),
            name: name.into(),
            chain: chain.join(" -> "),
        }
    }

    /// Whether the error stems from malformed schema text.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::LexicalError { .. } | Self::SyntaxError { .. })
    }
}

#[cfg(test)]
#[allow(unused_assignments)]
mod tests {
    use super::*;

    fn at(offset: usize, len: usize) -> Location {
        Location {
            offset,
            len,
            line: 1,
            column: offset + 1,
        }
    }

    #[test]
    fn test_syntax_error() {
        let err = SchemaError::syntax("define entity ;", at(14, 1), "expected identifier");

        match err {
            SchemaError::SyntaxError {
                src,
                span,
                line,
                column,
                message,
            } => {
                assert_eq!(src, "define entity ;");
                assert_eq!(span.offset(), 14);
                assert_eq!(span.len(), 1);
                assert_eq!(line, 1);
                assert_eq!(column, 15);
                assert_eq!(message, "expected identifier");
            }
            _ => panic!("Expected SyntaxError"),
        }
    }

    #[test]
    fn test_lexical_error_display() {
        let err = SchemaError::lexical("define &", at(7, 1), "unexpected `&`");
        let display = err.to_string();
        assert!(display.contains("lexical error at 1:8"));
        assert!(display.contains("unexpected `&`"));
        assert!(err.is_syntax());
    }

    #[test]
    fn test_duplicate_display() {
        let err = SchemaError::duplicate("entity", "person");
        assert_eq!(err.to_string(), "duplicate entity `person`");
        assert!(!err.is_syntax());
    }

    #[test]
    fn test_cyclic_display() {
        let err = SchemaError::cyclic("entity", "a", &["a", "b", "a"]);
        assert_eq!(err.to_string(), "cyclic inheritance for entity `a`: a -> b -> a");
    }

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SchemaError::IoError {
            path: "schema.tql".to_string(),
            source: io_err,
        };

        assert!(err.to_string().contains("schema.tql"));
    }
}
