//! Candidates command handler

use locus::{
    generate_candidates, Confidence, ElementDescriptor, ElementStore, LocusError, RenderedLocator,
    Strategy,
};
use serde::Serialize;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{OutputFormat, Reporter};
use crate::CandidatesArgs;

/// One rendered candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRow {
    /// Addressing strategy
    pub strategy: Strategy,
    /// Rank, lower is better
    pub priority: u8,
    /// Static confidence
    pub confidence: Confidence,
    /// Selector in query form
    pub selector: String,
    /// Locator call as embedded in test code
    pub code: String,
}

impl From<RenderedLocator> for CandidateRow {
    fn from(rendered: RenderedLocator) -> Self {
        Self {
            strategy: rendered.candidate.strategy,
            priority: rendered.candidate.priority,
            confidence: rendered.candidate.confidence,
            selector: rendered.selector.to_string(),
            code: rendered.code,
        }
    }
}

/// Ranked candidates for one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementCandidates {
    /// Discovery index
    pub element_index: usize,
    /// Tag name
    pub tag: String,
    /// Candidates, best first
    pub candidates: Vec<CandidateRow>,
}

/// Render every candidate of an element
#[must_use]
pub fn element_candidates(element: &ElementDescriptor) -> ElementCandidates {
    ElementCandidates {
        element_index: element.index,
        tag: element.tag.clone(),
        candidates: generate_candidates(element)
            .into_iter()
            .map(|candidate| RenderedLocator::new(candidate).into())
            .collect(),
    }
}

/// Execute the candidates command
pub fn execute_candidates(config: &CliConfig, args: &CandidatesArgs) -> CliResult<()> {
    let store = ElementStore::from_path(&args.elements)?;
    let elements: Vec<&ElementDescriptor> = match args.index {
        Some(index) => vec![store
            .get(index)
            .ok_or(LocusError::ElementNotFound { index })?],
        None => store.iter().collect(),
    };
    let listing: Vec<ElementCandidates> = elements.into_iter().map(element_candidates).collect();

    match OutputFormat::from(args.format) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
        OutputFormat::Text => {
            let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
            for entry in &listing {
                print_element(&reporter, entry, config.verbosity.is_verbose());
            }
        }
    }
    Ok(())
}

fn print_element(reporter: &Reporter, entry: &ElementCandidates, show_selectors: bool) {
    reporter.header(&format!("[{}] <{}>", entry.element_index, entry.tag));
    for row in &entry.candidates {
        reporter.line(&format!(
            "  {:>2}  {:<10} {:<6} {}",
            row.priority,
            row.strategy.to_string(),
            row.confidence.to_string(),
            row.code
        ));
        if show_selectors {
            reporter.line(&format!("      {}", row.selector));
        }
    }
}
