//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Locus: rank element locators and self-correct the ones embedded in
/// generated browser tests
#[derive(Parser, Debug)]
#[command(name = "locus")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print ranked locator candidates for discovered elements
    Candidates(CandidatesArgs),

    /// Verify the locators in a generated test and correct failing ones
    Verify(VerifyArgs),

    /// Check generated test code for syntax errors
    CheckSyntax(CheckSyntaxArgs),

    /// Show the effective resolver configuration
    Config(ConfigArgs),
}

/// Arguments for the candidates command
#[derive(Parser, Debug)]
pub struct CandidatesArgs {
    /// Discovery output (JSON array or exploration object)
    #[arg(short, long)]
    pub elements: PathBuf,

    /// Only show this element
    #[arg(short, long)]
    pub index: Option<usize>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the verify command
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Generated test code
    #[arg(short, long)]
    pub artifact: PathBuf,

    /// Locator references: JSON array of `{literal, elementIndex}`
    #[arg(short, long)]
    pub refs: PathBuf,

    /// Discovery output used as the offline document
    #[arg(short, long, required_unless_present = "url")]
    pub elements: Option<PathBuf>,

    /// Verify against a live page instead of the discovery snapshot
    #[arg(long)]
    pub url: Option<String>,

    /// Resolver configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum correction passes
    #[arg(short, long)]
    pub max_corrections: Option<usize>,

    /// Count hidden matches as failures
    #[arg(long)]
    pub hidden_fails: bool,

    /// Launch Chromium without its sandbox (containers, CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the corrected code to this file
    #[arg(short, long)]
    pub write_artifact: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: FormatArg,
}

/// Arguments for the check-syntax command
#[derive(Parser, Debug)]
pub struct CheckSyntaxArgs {
    /// Generated test code
    #[arg(short, long)]
    pub artifact: PathBuf,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Resolver configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
