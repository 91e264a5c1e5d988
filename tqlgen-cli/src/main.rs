//! tqlgen CLI - Command-line interface for the TypeQL schema compiler.

use clap::Parser;

use tqlgen_cli::cli::{Cli, Command};
use tqlgen_cli::commands;
use tqlgen_cli::error::CliResult;
use tqlgen_cli::logging;
use tqlgen_codegen::Target;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Model(args) => {
            commands::generate::run(Target::Model, &args.common, |c| args.apply(c))
        }
        Command::Dto(args) => commands::generate::run(Target::Dto, &args.common, |c| args.apply(c)),
        Command::Registry(args) => {
            commands::generate::run(Target::Registry, &args.common, |c| args.apply(c))
        }
        Command::Constants(args) => commands::generate::run(Target::Constants, &args, |_| {}),
        Command::Validate(args) => commands::validate::run(&args),
        Command::Version => commands::version::run(),
    }
}
