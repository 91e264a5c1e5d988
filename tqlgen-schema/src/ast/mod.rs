//! Parse tree types for TypeQL schema files.

mod definition;
mod types;

pub use definition::*;
pub use types::*;
