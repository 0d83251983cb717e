//! Verify command handler

use locus::{
    suggest_corrections, CheckStatus, CodeArtifact, DocumentQuery, ElementStore, LiveVerifier,
    LocusError, ReportReason, Resolution, ResolutionState, ResolverConfig,
    SelfCorrectingResolver, SnapshotDocument, VerificationReport,
};
use serde::Serialize;
use tracing::{info, warn};

use super::config::load_resolver_config;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, Reporter};
use crate::VerifyArgs;

/// JSON document printed by `locus verify`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOutput<'a> {
    /// Terminal resolution state
    pub state: ResolutionState,
    /// Final report
    pub report: &'a VerificationReport,
    /// Hints for the locators that still fail
    pub suggestions: Vec<String>,
}

impl<'a> VerifyOutput<'a> {
    /// Summarise a resolution
    #[must_use]
    pub fn new(resolution: &'a Resolution) -> Self {
        Self {
            state: resolution.state,
            report: &resolution.report,
            suggestions: suggest_corrections(&resolution.report),
        }
    }
}

/// Execute the verify command
pub fn execute_verify(config: &CliConfig, args: &VerifyArgs) -> CliResult<()> {
    let resolver_config = effective_config(args)?;
    let artifact = CodeArtifact::from_paths(&args.artifact, &args.refs)?;
    info!(
        artifact = %args.artifact.display(),
        references = artifact.references.len(),
        max_corrections = resolver_config.max_corrections,
        "verifying artifact"
    );

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::config(format!("Failed to create runtime: {e}")))?;
    let resolution = runtime.block_on(resolve(args, &artifact, resolver_config))?;

    emit(config, args, &resolution)?;
    if let Some(path) = &args.write_artifact {
        std::fs::write(path, &resolution.artifact)?;
    }
    outcome(&resolution)
}

fn effective_config(args: &VerifyArgs) -> CliResult<ResolverConfig> {
    let mut config = load_resolver_config(args.config.as_deref())?;
    if let Some(max) = args.max_corrections {
        config = config.with_max_corrections(max);
    }
    if args.hidden_fails {
        config = config.with_hidden_as_success(false);
    }
    Ok(config)
}

async fn resolve(
    args: &VerifyArgs,
    artifact: &CodeArtifact,
    config: ResolverConfig,
) -> CliResult<Resolution> {
    if let Some(url) = &args.url {
        #[cfg(feature = "browser")]
        return resolve_live(url, args, artifact, config).await;
        #[cfg(not(feature = "browser"))]
        return Err(CliError::invalid_argument(format!(
            "cannot open {url}: live verification needs the `browser` feature"
        )));
    }

    let path = args
        .elements
        .as_ref()
        .ok_or_else(|| CliError::invalid_argument("--elements or --url is required"))?;
    let store = ElementStore::from_path(path)?;
    let document = SnapshotDocument::new(store.clone());
    Ok(run(&document, &store, artifact, config).await)
}

#[cfg(feature = "browser")]
async fn resolve_live(
    url: &str,
    args: &VerifyArgs,
    artifact: &CodeArtifact,
    config: ResolverConfig,
) -> CliResult<Resolution> {
    use locus::{BrowserConfig, ChromiumBrowser};

    let mut browser_config = BrowserConfig::default();
    if args.no_sandbox {
        browser_config = browser_config.with_no_sandbox();
    }
    let browser = ChromiumBrowser::launch(browser_config).await?;
    let result: CliResult<Resolution> = async {
        let document = browser.new_document().await?;
        document.goto(url).await?;
        let store = match &args.elements {
            Some(path) => ElementStore::from_path(path)?,
            None => document.discover().await?,
        };
        info!(url, elements = store.len(), "page ready");
        Ok(run(&document, &store, artifact, config).await)
    }
    .await;
    finish(result, browser.close().await)
}

/// Combine a session result with the browser shutdown; the session error wins.
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
fn finish<T>(result: CliResult<T>, closed: Result<(), LocusError>) -> CliResult<T> {
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err.into()),
        (Err(err), closed) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "browser did not close cleanly");
            }
            Err(err)
        }
    }
}

async fn run(
    document: &dyn DocumentQuery,
    store: &ElementStore,
    artifact: &CodeArtifact,
    config: ResolverConfig,
) -> Resolution {
    SelfCorrectingResolver::new(LiveVerifier::new(document), store)
        .with_config(config)
        .resolve(artifact)
        .await
}

fn emit(config: &CliConfig, args: &VerifyArgs, resolution: &Resolution) -> CliResult<()> {
    let output = VerifyOutput::new(resolution);
    let json = serde_json::to_string_pretty(&output)?;
    if let Some(path) = &args.output {
        std::fs::write(path, &json)?;
    }

    match OutputFormat::from(args.format) {
        OutputFormat::Json => {
            if args.output.is_none() && !config.verbosity.is_quiet() {
                println!("{json}");
            }
        }
        OutputFormat::Text => print_summary(config, &output),
    }
    Ok(())
}

fn print_summary(config: &CliConfig, output: &VerifyOutput<'_>) {
    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
    reporter.header("Locator verification");
    for check in &output.report.checks {
        let line = format!("[{}] {}", check.element_index, check.literal);
        match check.result.status {
            CheckStatus::Success => reporter.success(&line),
            CheckStatus::Skipped => reporter.warning(&format!("{line} (skipped)")),
            status => reporter.failure(&format!("{line} ({status})")),
        }
    }
    for correction in output.report.applied_corrections() {
        reporter.info(&format!(
            "[{}] {} -> {} (pass {})",
            correction.element_index,
            correction.original_literal,
            correction.replacement_literal,
            correction.attempt_number
        ));
    }
    for suggestion in &output.suggestions {
        reporter.warning(suggestion);
    }
    reporter.line(&format!("Overall: {}", output.report.overall_status));
}

fn outcome(resolution: &Resolution) -> CliResult<()> {
    if resolution.report.is_success() {
        return Ok(());
    }
    if let Some(ReportReason::SyntaxInvalid {
        message,
        line,
        column,
    }) = &resolution.report.reason
    {
        return Err(LocusError::SyntaxInvalid {
            message: message.clone(),
            line: *line,
            column: *column,
        }
        .into());
    }
    Err(CliError::Unverified {
        status: resolution.report.overall_status,
        failed: resolution.report.failed_checks().count(),
    })
}
