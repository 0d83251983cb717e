//! Check-syntax command handler

use locus::{LocusError, PythonSyntax, SyntaxCheck};

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;
use crate::CheckSyntaxArgs;

/// Execute the check-syntax command
pub fn execute_check_syntax(config: &CliConfig, args: &CheckSyntaxArgs) -> CliResult<()> {
    let code = std::fs::read_to_string(&args.artifact)?;
    PythonSyntax
        .check(&code)
        .map_err(LocusError::from)?;
    Reporter::new(config.color.should_color(), config.verbosity.is_quiet())
        .success(&format!("{}: syntax ok", args.artifact.display()));
    Ok(())
}
