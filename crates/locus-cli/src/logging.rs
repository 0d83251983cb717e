//! Log subscriber installation

use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the verbosity flags. Logs go to stderr so that JSON
/// reports on stdout stay machine-readable.
pub fn init_tracing(config: &CliConfig) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_directive()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(config.verbosity.is_debug());

    let installed = if config.log_json {
        builder.json().try_init()
    } else {
        builder.with_ansi(config.color.should_color()).try_init()
    };
    installed.map_err(|e| CliError::config(format!("failed to install log subscriber: {e}")))
}
