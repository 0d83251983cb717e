//! Locus CLI: locator candidates and self-correcting verification
//!
//! ## Usage
//!
//! ```bash
//! locus candidates --elements elements.json          # Rank locators per element
//! locus verify -a test_login.py -r refs.json -e elements.json
//! locus check-syntax --artifact test_login.py
//! locus config                                       # Effective resolver settings
//! ```

use clap::Parser;
use locus_cli::{handlers, init_tracing, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    init_tracing(&config)?;

    match cli.command {
        Commands::Candidates(args) => handlers::execute_candidates(&config, &args),
        Commands::Verify(args) => handlers::execute_verify(&config, &args),
        Commands::CheckSyntax(args) => handlers::execute_check_syntax(&config, &args),
        Commands::Config(args) => handlers::execute_config(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.verbose, cli.quiet))
        .with_color(color)
        .with_log_json(cli.log_json)
}
