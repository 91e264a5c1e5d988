//! CLI argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// tqlgen - TypeQL schema compiler for Rust
#[derive(Parser, Debug)]
#[command(name = "tqlgen")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "tqlgen - TypeQL schema compiler for Rust", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace); TQLGEN_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate plain data types from a schema
    Model(ModelArgs),

    /// Generate Out/Create/Patch transfer objects from a schema
    Dto(DtoArgs),

    /// Generate the introspection registry of a schema
    Registry(RegistryArgs),

    /// Generate type and enum-value constants only
    Constants(CommonArgs),

    /// Parse a schema and report what it defines
    Validate(ValidateArgs),

    /// Display version information
    Version,
}

// =============================================================================
// Shared Arguments
// =============================================================================

/// Arguments accepted by every generation command
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// Path to schema file (defaults to [schema].path in the config)
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Name of the generated module
    #[arg(short, long)]
    pub module: Option<String>,

    /// Path to config file (defaults to ./tqlgen.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Keep acronyms upper-case in type names
    #[arg(long, value_name = "BOOL")]
    pub acronyms: Option<bool>,

    /// Leave abstract types out of the output
    #[arg(long, value_name = "BOOL")]
    pub skip_abstract: Option<bool>,

    /// Merge inherited ownership and roles before generating
    #[arg(long, value_name = "BOOL")]
    pub inherit: Option<bool>,
}

// =============================================================================
// Model Command
// =============================================================================

/// Arguments for the `model` command
#[derive(Args, Debug)]
pub struct ModelArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Generate enums for attributes with @values
    #[arg(long, value_name = "BOOL")]
    pub enums: Option<bool>,

    /// Version string emitted as SCHEMA_VERSION
    #[arg(long)]
    pub schema_version: Option<String>,
}

// =============================================================================
// Dto Command
// =============================================================================

/// Arguments for the `dto` command
#[derive(Args, Debug)]
pub struct DtoArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Name of the id field on Out DTOs
    #[arg(long)]
    pub id_field: Option<String>,

    /// Keep required attributes required on Out DTOs
    #[arg(long)]
    pub strict_out: bool,

    /// Skip Out DTOs for relations
    #[arg(long)]
    pub skip_relation_out: bool,
}

// =============================================================================
// Registry Command
// =============================================================================

/// Arguments for the `registry` command
#[derive(Args, Debug)]
pub struct RegistryArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Generate constants for attribute @values
    #[arg(long, value_name = "BOOL")]
    pub enums: Option<bool>,

    /// Wrap type constants in EntityType/RelationType/AttributeType newtypes
    #[arg(long)]
    pub typed_constants: bool,

    /// Embed a JSON Schema document per concrete type
    #[arg(long)]
    pub json_schema: bool,

    /// Version string emitted as SCHEMA_VERSION
    #[arg(long)]
    pub schema_version: Option<String>,

    /// Leave SCHEMA_HASH out
    #[arg(long)]
    pub no_fingerprint: bool,
}

// =============================================================================
// Validate Command
// =============================================================================

/// Arguments for the `validate` command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to schema file (defaults to [schema].path in the config)
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Path to config file (defaults to ./tqlgen.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Merge inherited ownership and roles before reporting
    #[arg(long, value_name = "BOOL")]
    pub inherit: Option<bool>,

    /// Print the resolved schema model as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_model_flags() {
        let cli = Cli::try_parse_from([
            "tqlgen",
            "model",
            "-s",
            "schema.tql",
            "--acronyms",
            "false",
            "--enums",
            "false",
            "--schema-version",
            "2.0",
        ])
        .unwrap();
        let Command::Model(args) = cli.command else {
            panic!("expected model command");
        };
        assert_eq!(args.common.schema, Some(PathBuf::from("schema.tql")));
        assert_eq!(args.common.acronyms, Some(false));
        assert_eq!(args.common.inherit, None);
        assert_eq!(args.enums, Some(false));
        assert_eq!(args.schema_version.as_deref(), Some("2.0"));
    }

    #[test]
    fn test_parse_registry_switches_and_verbosity() {
        let cli = Cli::try_parse_from([
            "tqlgen",
            "-vv",
            "registry",
            "--typed-constants",
            "--no-fingerprint",
            "-o",
            "registry.rs",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Registry(args) = cli.command else {
            panic!("expected registry command");
        };
        assert!(args.typed_constants);
        assert!(args.no_fingerprint);
        assert!(!args.json_schema);
        assert_eq!(args.common.out, Some(PathBuf::from("registry.rs")));
    }

    #[test]
    fn test_bool_flags_need_a_value() {
        assert!(Cli::try_parse_from(["tqlgen", "dto", "--skip-abstract", "maybe"]).is_err());
    }
}
