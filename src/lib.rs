//! # tqlgen
//!
//! A compiler from TypeQL schema definitions to Rust source.
//!
//! tqlgen reads a TypeQL `define` block (attributes, entities, relations,
//! structs and functions), resolves `sub` inheritance, and emits:
//! - plain serde data types for every concrete entity and relation
//! - Out/Create/Patch transfer objects for APIs
//! - an introspection registry of type constants and sorted lookup tables
//!
//! ## Quick Start
//!
//! Generate modules at compile time:
//!
//! ```rust,ignore
//! tqlgen::schema_models!("schema/library.tql");
//! tqlgen::schema_registry!("schema/library.tql");
//!
//! assert_eq!(registry::entity_parent("book"), Some("work"));
//! let title = models::Book::TYPE_NAME;
//! ```
//!
//! Or drive the pipeline directly:
//!
//! ```rust
//! use tqlgen::prelude::*;
//!
//! let config = TqlgenConfig::default();
//! let code = Generator::new(&config).generate(
//!     "define attribute name, value string; entity person, owns name @key;",
//!     Target::Registry,
//! )?;
//! assert!(code.contains("pub const TYPE_PERSON: &str = \"person\";"));
//! # Ok::<(), tqlgen::CodegenError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Schema parsing and the domain model.
pub mod schema {
    pub use tqlgen_schema::*;
}

/// View-model builders, renderers and configuration.
pub mod codegen {
    pub use tqlgen_codegen::*;
}

// Re-export proc macros
pub use tqlgen_macros::{schema_dtos, schema_models, schema_registry};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::codegen::{Generator, Target, TqlgenConfig};
    pub use crate::schema::{Schema, ThingType, parse_schema, parse_schema_file};
    pub use crate::{schema_dtos, schema_models, schema_registry};
}

// Re-export key types at the crate root
pub use codegen::{CodegenError, CodegenResult, Generator, Target, TqlgenConfig};
pub use schema::{Schema, SchemaError, SchemaResult};
