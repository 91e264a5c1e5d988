//! `tqlgen version` command - Display version information.

use tqlgen_codegen::Target;

use crate::error::CliResult;

/// Package version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the version command
pub fn run() -> CliResult<()> {
    #[cfg(debug_assertions)]
    let build_mode = "debug";
    #[cfg(not(debug_assertions))]
    let build_mode = "release";

    let targets: Vec<&str> = Target::ALL.iter().map(Target::as_str).collect();

    println!("tqlgen {VERSION}");
    println!("  Build: {build_mode}");
    println!("  Targets: {}", targets.join(", "));
    println!("  Components:");
    println!("    tqlgen-schema {VERSION}");
    println!("    tqlgen-codegen {VERSION}");

    Ok(())
}
