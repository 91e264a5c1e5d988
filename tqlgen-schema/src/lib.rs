//! # tqlgen-schema
//!
//! Tokenizer, parser and domain model for TypeQL schema files.
//!
//! This crate provides:
//! - A tokenizer and pest grammar for `define` blocks (attributes, entities,
//!   relations, structs and functions)
//! - The parse tree ([`ast`]) and the flat domain model ([`Schema`])
//! - Inheritance accumulation across `sub` chains
//! - Comment annotation extraction
//!
//! ## Example
//!
//! ```rust
//! use tqlgen_schema::{ThingType, parse_schema};
//!
//! let mut schema = parse_schema(r#"
//!     define
//!     attribute name, value string;
//!     entity artifact @abstract, owns name @key;
//!     entity task sub artifact;
//! "#)?;
//! schema.accumulate_inheritance()?;
//!
//! assert!(schema.entity("task").unwrap().owned("name").is_some());
//! # Ok::<(), tqlgen_schema::SchemaError>(())
//! ```

pub mod annotations;
pub mod ast;
pub mod error;
pub mod inheritance;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod signature;

pub use annotations::{AnnotationMap, extract_annotations};
pub use error::{SchemaError, SchemaResult};
pub use inheritance::accumulate_inheritance;
pub use lexer::{Token, TokenKind, tokenize};
pub use model::*;
pub use parser::{parse_definitions, parse_schema, parse_schema_file, read_schema_source};
