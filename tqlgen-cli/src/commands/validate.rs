//! `tqlgen validate` command - Parse a schema and report what it defines.

use tqlgen_codegen::{RolePlayers, load_schema};
use tqlgen_schema::{Schema, ThingType, read_schema_source};

use crate::cli::ValidateArgs;
use crate::config::LoadedConfig;
use crate::error::CliResult;
use crate::output::{self, success, warn};

/// Run the validate command
pub fn run(args: &ValidateArgs) -> CliResult<()> {
    let mut loaded = LoadedConfig::load(args.config.as_deref())?;
    if let Some(inherit) = args.inherit {
        loaded.config.schema.inherit = inherit;
    }
    let schema_path = loaded.schema_path(args.schema.as_deref())?;

    let source = read_schema_source(&schema_path)?;
    let schema = load_schema(&source, loaded.config.schema.inherit)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    output::header("Validate Schema");
    output::kv("Schema", &schema_path.display().to_string());
    output::newline();

    let warnings = check_references(&schema);
    if warnings.is_empty() {
        success("Schema is valid!");
    } else {
        success("Schema is valid with warnings:");
        output::newline();
        for warning in &warnings {
            warn(warning);
        }
    }
    output::newline();

    let stats = schema.stats();
    output::section("Schema Summary");
    output::kv("Attributes", &stats.attributes.to_string());
    output::kv("Entities", &stats.entities.to_string());
    output::kv("Relations", &stats.relations.to_string());
    output::kv("Structs", &stats.structs.to_string());
    output::kv("Functions", &stats.functions.to_string());

    Ok(())
}

/// Names that point at nothing. None of these stop generation.
fn check_references(schema: &Schema) -> Vec<String> {
    let mut warnings = Vec::new();

    for thing in schema.things() {
        if let Some(parent) = thing.parent().filter(|p| schema.thing(p).is_none()) {
            warnings.push(format!(
                "'{}' is a subtype of undefined type '{}'",
                thing.name(),
                parent
            ));
        }
        for owns in thing.owns() {
            if schema.attribute(&owns.attribute).is_none() {
                warnings.push(format!(
                    "'{}' owns undefined attribute '{}'",
                    thing.name(),
                    owns.attribute
                ));
            }
        }
        for plays in thing.plays() {
            if schema.relation(&plays.relation).is_none() {
                warnings.push(format!(
                    "'{}' plays a role in undefined relation '{}'",
                    thing.name(),
                    plays.relation
                ));
            }
        }
    }

    let players = RolePlayers::new(schema);
    for relation in schema.relations.values() {
        for relates in &relation.relates {
            if players.players(&relation.name, &relates.role).is_empty() {
                warnings.push(format!(
                    "role '{}:{}' has no players",
                    relation.name, relates.role
                ));
            }
        }
    }

    warnings
}
