//! Procedural macros for tqlgen.
//!
//! Each macro reads a TypeQL schema at compile time and expands to a module
//! holding the generated code. Settings come from the nearest `tqlgen.toml`
//! next to the schema (or up to five directories above it); without one the
//! defaults apply.
//!
//! # Macros
//!
//! - [`schema_models!`] - plain data types, `pub mod models`
//! - [`schema_dtos!`] - Out/Create/Patch transfer objects, `pub mod dto`
//! - [`schema_registry!`] - introspection tables and lookups, `pub mod registry`
//!
//! # Example
//!
//! ```rust,ignore
//! tqlgen::schema_models!("schema/library.tql");
//!
//! let book = models::Book {
//!     iid: None,
//!     title: "Dune".to_string(),
//!     pages: Some(412),
//! };
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{LitStr, parse_macro_input};
use tqlgen_codegen::{Generator, Target};

mod schema_reader;

use schema_reader::read_schema_with_config;

/// Generate plain data types from a schema file.
///
/// Expands to `pub mod <model.module_name> { ... }` with one struct per
/// concrete entity and relation, one enum per attribute with `@values`, and
/// one struct per struct definition.
#[proc_macro]
pub fn schema_models(input: TokenStream) -> TokenStream {
    expand(input, Target::Model)
}

/// Generate Out/Create/Patch transfer objects from a schema file.
///
/// Expands to `pub mod <dto.module_name> { ... }`.
#[proc_macro]
pub fn schema_dtos(input: TokenStream) -> TokenStream {
    expand(input, Target::Dto)
}

/// Generate the introspection registry of a schema file.
///
/// Expands to `pub mod <registry.module_name> { ... }` with type constants,
/// sorted lookup tables and their accessor functions.
#[proc_macro]
pub fn schema_registry(input: TokenStream) -> TokenStream {
    expand(input, Target::Registry)
}

fn expand(input: TokenStream, target: Target) -> TokenStream {
    let literal = parse_macro_input!(input as LitStr);

    match generate_module(&literal, target) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Read the schema, render the target and wrap it in its module.
fn generate_module(
    literal: &LitStr,
    target: Target,
) -> Result<proc_macro2::TokenStream, syn::Error> {
    let span = literal.span();
    let schema = read_schema_with_config(&literal.value())
        .map_err(|e| syn::Error::new(span, e.to_string()))?;

    let code = Generator::new(&schema.config)
        .with_header(false)
        .generate(&schema.source, target)
        .map_err(|e| {
            syn::Error::new(
                span,
                format!("failed to generate {target} from '{}': {e}", schema.path.display()),
            )
        })?;

    let body: proc_macro2::TokenStream = code
        .parse()
        .map_err(|e| syn::Error::new(span, format!("generated {target} code is invalid: {e}")))?;

    let module_name = target.module_name(&schema.config);
    let module: syn::Ident = syn::parse_str(module_name).map_err(|_| {
        syn::Error::new(span, format!("'{module_name}' is not a valid module name"))
    })?;

    // Recompile when the schema changes.
    let tracked = schema.path.display().to_string();

    Ok(quote! {
        pub mod #module {
            const _: &str = include_str!(#tracked);

            #body
        }
    })
}
