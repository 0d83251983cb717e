//! Locus CLI library
//!
//! Command definitions, configuration and handlers behind the `locus`
//! binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod logging;
mod output;

pub use commands::{
    CandidatesArgs, CheckSyntaxArgs, Cli, ColorArg, Commands, ConfigArgs, FormatArg, VerifyArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::init_tracing;
pub use output::{OutputFormat, Reporter};
