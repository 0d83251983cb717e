//! Config command handler

use locus::ResolverConfig;
use std::path::Path;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{OutputFormat, Reporter};
use crate::ConfigArgs;

/// Effective resolver configuration: file (or defaults), then `LOCUS_*`
/// environment overrides.
pub fn load_resolver_config(path: Option<&Path>) -> CliResult<ResolverConfig> {
    let base = match path {
        Some(path) => ResolverConfig::from_path(path)?,
        None => ResolverConfig::default(),
    };
    Ok(base.apply_env()?)
}

/// Execute the config command
pub fn execute_config(config: &CliConfig, args: &ConfigArgs) -> CliResult<()> {
    let resolver = load_resolver_config(args.config.as_deref())?;
    match OutputFormat::from(args.format) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolver)?),
        OutputFormat::Text => print_config(config, &resolver),
    }
    Ok(())
}

fn print_config(config: &CliConfig, resolver: &ResolverConfig) {
    let reporter = Reporter::new(config.color.should_color(), false);
    reporter.line("Current configuration:");
    reporter.line(&format!("  Max corrections: {}", resolver.max_corrections));
    reporter.line(&format!(
        "  Hidden matches pass: {}",
        resolver.verify_hidden_as_success
    ));
    reporter.line(&format!("  Verbosity: {:?}", config.verbosity));
    reporter.line(&format!("  Color: {:?}", config.color));
}
