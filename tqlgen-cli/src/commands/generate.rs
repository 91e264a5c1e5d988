//! `tqlgen model|dto|registry|constants` - Generate a Rust module from a schema.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tqlgen_codegen::{Generator, Target, TqlgenConfig};
use tqlgen_schema::read_schema_source;
use tracing::info;

use crate::cli::CommonArgs;
use crate::config::LoadedConfig;
use crate::error::CliResult;
use crate::output::{self, success};

/// Run a generation command. `overrides` applies the command's own flags
/// after the shared ones.
pub fn run(
    target: Target,
    args: &CommonArgs,
    overrides: impl FnOnce(&mut TqlgenConfig),
) -> CliResult<()> {
    let start = Instant::now();

    let mut loaded = LoadedConfig::load(args.config.as_deref())?;
    args.apply(target, &mut loaded.config);
    overrides(&mut loaded.config);
    let schema_path = loaded.schema_path(args.schema.as_deref())?;

    output::header(&format!("Generate {target}"));
    output::kv("Schema", &schema_path.display().to_string());
    if let Some(path) = &loaded.path {
        output::kv("Config", &path.display().to_string());
    }
    output::kv("Module", target.module_name(&loaded.config));
    output::newline();

    output::step(1, 3, "Reading schema...");
    let source = read_schema_source(&schema_path)?;

    output::step(2, 3, "Generating code...");
    let code = Generator::new(&loaded.config).generate(&source, target)?;

    output::step(3, 3, "Writing output...");
    match &args.out {
        Some(path) => write_file(path, &code)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(code.as_bytes())?;
            stdout.flush()?;
        }
    }

    let destination = args
        .out
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());
    info!(%target, bytes = code.len(), destination = %destination, "wrote module");
    success(&format!(
        "Generated {} module ({} bytes) to {} in {:.2}s",
        target,
        code.len(),
        destination,
        start.elapsed().as_secs_f64()
    ));

    Ok(())
}

fn write_file(path: &Path, code: &str) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, code)?;
    Ok(())
}
