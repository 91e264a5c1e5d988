//! # tqlgen-codegen
//!
//! Turns a parsed TypeQL [`Schema`](tqlgen_schema::Schema) into Rust source.
//!
//! Generation runs in two steps. A builder reads the schema and its config
//! section and produces a sorted view model; a template renders that view as
//! the text of a Rust module:
//!
//! | Target | Builder | Template |
//! |---|---|---|
//! | data model | [`ModelBuilder`] | [`ModelTemplate`] |
//! | Out/Create/Patch DTOs | [`DtoBuilder`] | [`DtoTemplate`] |
//! | introspection registry | [`RegistryBuilder`] | [`RegistryTemplate`] |
//! | leaf constants | [`RegistryBuilder`] | [`ConstantsTemplate`] |
//!
//! ## Example
//!
//! ```rust
//! use tqlgen_codegen::{Generator, Target, TqlgenConfig};
//!
//! let config = TqlgenConfig::default();
//! let code = Generator::new(&config).generate(
//!     "define attribute name, value string; entity person, owns name @key;",
//!     Target::Model,
//! )?;
//! assert!(code.contains("pub struct Person {"));
//! # Ok::<(), tqlgen_codegen::CodegenError>(())
//! ```

pub mod builders;
pub mod config;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod render;
pub mod roles;
pub mod types;

pub use builders::{
    DtoBuilder, DtoView, ModelBuilder, ModelView, RegistryBuilder, RegistryView,
    schema_fingerprint,
};
pub use config::{
    CONFIG_FILE_NAME, DtoConfig, ModelConfig, RegistryConfig, SchemaSection, TqlgenConfig,
};
pub use error::{CodegenError, CodegenResult};
pub use naming::Naming;
pub use pipeline::{Generator, Target, load_schema};
pub use render::{ConstantsTemplate, DtoTemplate, HEADER, ModelTemplate, RegistryTemplate};
pub use roles::RolePlayers;
