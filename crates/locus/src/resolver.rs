//! Self-correcting locator resolution.
//!
//! The resolver takes generated test code plus the list of locator literals
//! the generator embedded in it (each tied to the element it was generated
//! for), verifies every literal against a live document, and swaps failing
//! literals for the element's next candidate until everything passes or the
//! pass budget runs out.
//!
//! ```text
//! Unverified ─▶ Verifying ─┬─▶ Verified
//!                          └─▶ NeedsCorrection ─┬─▶ Corrected ─▶ Verifying
//!                                               └─▶ GaveUp
//! (syntax failure ─▶ Rejected, no document ─▶ Unavailable)
//! ```
//!
//! Locators are never discovered by scanning the code: the k-th reference
//! with a given literal is the k-th occurrence of that literal, and its byte
//! offset is tracked through every patch.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::element::{ElementDescriptor, ElementStore};
use crate::locator::{generate_candidates, LocatorCandidate};
use crate::patcher::{nth_occurrence, patch_at, PatchOutcome};
use crate::result::{LocusError, LocusResult};
use crate::selector::{parse_code_literal, render_code, RenderedLocator, Selector};
use crate::syntax::{PythonSyntax, SyntaxCheck, SyntaxError};
use crate::verifier::{CheckStatus, LiveVerifier, VerificationResult};

/// A locator literal embedded in an artifact, with the element it targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatorReference {
    /// Exact literal as it appears in the code
    pub literal: String,
    /// Discovery index of the target element
    #[serde(alias = "element_index")]
    pub element_index: usize,
}

impl LocatorReference {
    /// Create a reference
    #[must_use]
    pub fn new(literal: impl Into<String>, element_index: usize) -> Self {
        Self {
            literal: literal.into(),
            element_index,
        }
    }
}

/// Generated test code and the locators it contains
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeArtifact {
    /// Source text
    pub code: String,
    /// Embedded locators, in any order
    pub references: Vec<LocatorReference>,
}

impl CodeArtifact {
    /// Create an artifact with no references
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            references: Vec::new(),
        }
    }

    /// Add a reference
    #[must_use]
    pub fn with_reference(mut self, literal: impl Into<String>, element_index: usize) -> Self {
        self.references
            .push(LocatorReference::new(literal, element_index));
        self
    }

    /// Add references
    #[must_use]
    pub fn with_references(mut self, references: impl IntoIterator<Item = LocatorReference>) -> Self {
        self.references.extend(references);
        self
    }

    /// Parse a JSON array of `{literal, elementIndex}` objects
    pub fn references_from_json(json: &str) -> LocusResult<Vec<LocatorReference>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load code and a reference list from files
    pub fn from_paths(code: impl AsRef<Path>, references: impl AsRef<Path>) -> LocusResult<Self> {
        let code = std::fs::read_to_string(code)?;
        let references = Self::references_from_json(&std::fs::read_to_string(references)?)?;
        Ok(Self { code, references })
    }
}

/// Verification of one embedded locator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatorCheck {
    /// Literal as it stood when checked
    pub literal: String,
    /// Target element
    pub element_index: usize,
    /// Generated candidate the literal corresponds to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<LocatorCandidate>,
    /// Selector that was queried
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<Selector>,
    /// Verification outcome
    pub result: VerificationResult,
}

/// One attempted literal substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionRecord {
    /// Literal that failed
    pub original_literal: String,
    /// Literal substituted for it
    pub replacement_literal: String,
    /// Target element
    pub element_index: usize,
    /// Correction pass, starting at 1
    pub attempt_number: usize,
    /// Byte offset of the substitution; `None` when the literal was not
    /// found in the artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    /// Whether the artifact was actually changed
    pub applied: bool,
}

/// Aggregate outcome of a verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    /// Every locator passed
    Success,
    /// Some locators pass, or corrections were applied without full success
    Partial,
    /// Nothing usable
    Error,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Error => "error",
        })
    }
}

/// Why a report is not a success
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReportReason {
    /// Artifact failed the syntax gate
    SyntaxInvalid {
        /// Parser message
        message: String,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
    },
    /// No document could be queried
    VerifierUnavailable,
    /// No failing locator had a usable replacement
    NoCorrectionPossible,
    /// Pass budget spent with locators still failing
    CorrectionsExhausted,
}

impl From<SyntaxError> for ReportReason {
    fn from(err: SyntaxError) -> Self {
        Self::SyntaxInvalid {
            message: err.message,
            line: err.line,
            column: err.column,
        }
    }
}

/// Result of verifying (and possibly correcting) one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    /// Aggregate status
    pub overall_status: OverallStatus,
    /// Per-locator checks, in artifact order
    pub checks: Vec<LocatorCheck>,
    /// Correction attempts, in the order made
    pub corrections: Vec<CorrectionRecord>,
    /// Why the report is not a success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReportReason>,
}

impl VerificationReport {
    fn rejected(err: SyntaxError) -> Self {
        Self {
            overall_status: OverallStatus::Error,
            checks: Vec::new(),
            corrections: Vec::new(),
            reason: Some(err.into()),
        }
    }

    fn unavailable(checks: Vec<LocatorCheck>) -> Self {
        Self {
            overall_status: OverallStatus::Error,
            checks,
            corrections: Vec::new(),
            reason: Some(ReportReason::VerifierUnavailable),
        }
    }

    /// Whether every locator passed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.overall_status == OverallStatus::Success
    }

    /// Checks that did not pass
    pub fn failed_checks(&self) -> impl Iterator<Item = &LocatorCheck> {
        self.checks.iter().filter(|c| !c.result.status.is_success())
    }

    /// Corrections that changed the artifact
    pub fn applied_corrections(&self) -> impl Iterator<Item = &CorrectionRecord> {
        self.corrections.iter().filter(|c| c.applied)
    }
}

/// Lifecycle of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolutionState {
    /// Not yet checked
    Unverified,
    /// Queries in flight
    Verifying,
    /// Every locator passed
    Verified,
    /// At least one locator failed
    NeedsCorrection,
    /// A pass applied substitutions
    Corrected,
    /// Budget spent or no correction possible
    GaveUp,
    /// Syntax gate failed
    Rejected,
    /// No document to verify against
    Unavailable,
}

/// Outcome of [`SelfCorrectingResolver::resolve`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Report from the first verification pass
    pub initial: VerificationReport,
    /// Final report
    pub report: VerificationReport,
    /// Artifact text after all applied corrections
    pub artifact: String,
    /// Terminal state
    pub state: ResolutionState,
}

#[derive(Debug, Clone)]
struct TrackedLocator {
    literal: String,
    element_index: usize,
    offset: Option<usize>,
    overlapping: bool,
}

/// Pair each reference with its occurrence in the code, in artifact order.
fn locate(code: &str, references: &[LocatorReference]) -> Vec<TrackedLocator> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut tracked: Vec<TrackedLocator> = references
        .iter()
        .map(|reference| {
            let nth = seen.entry(reference.literal.as_str()).or_insert(0);
            let offset = nth_occurrence(code, &reference.literal, *nth);
            *nth += 1;
            TrackedLocator {
                literal: reference.literal.clone(),
                element_index: reference.element_index,
                offset,
                overlapping: false,
            }
        })
        .collect();
    tracked.sort_by_key(|t| t.offset.unwrap_or(usize::MAX));

    // A span starting inside an earlier one cannot be patched independently.
    let mut covered_until = 0;
    for locator in &mut tracked {
        let Some(offset) = locator.offset else {
            continue;
        };
        if offset < covered_until {
            locator.offset = None;
            locator.overlapping = true;
        } else {
            covered_until = offset + locator.literal.len();
        }
    }
    tracked
}

fn shift_after(tracked: &mut [TrackedLocator], at: usize, removed: usize, inserted: usize) {
    for locator in tracked {
        if let Some(offset) = locator.offset.as_mut() {
            if *offset > at {
                *offset = (*offset + inserted).saturating_sub(removed);
            }
        }
    }
}

fn all_skipped(checks: &[LocatorCheck]) -> bool {
    !checks.is_empty() && checks.iter().all(|c| c.result.status == CheckStatus::Skipped)
}

fn all_passed(checks: &[LocatorCheck]) -> bool {
    checks.iter().all(|c| c.result.status.is_success())
}

/// Next candidate to try for a failing literal.
///
/// The failing literal is matched to the element's candidate list (by
/// rendered code, else by strategy). The first later candidate with a
/// different strategy wins; when none remains the first candidate is
/// used again.
#[must_use]
pub fn next_candidate(failing_literal: &str, element: &ElementDescriptor) -> Option<RenderedLocator> {
    let rendered: Vec<RenderedLocator> = generate_candidates(element)
        .into_iter()
        .map(RenderedLocator::new)
        .collect();

    let position = rendered
        .iter()
        .position(|r| r.code == failing_literal)
        .or_else(|| {
            let strategy = parse_code_literal(failing_literal)?.strategy;
            rendered.iter().position(|r| r.candidate.strategy == strategy)
        });

    let chosen = match position.and_then(|i| rendered.get(i).map(|r| (i, r.candidate.strategy))) {
        Some((i, failing)) => rendered
            .iter()
            .enumerate()
            .skip(i + 1)
            .find(|(_, r)| r.candidate.strategy != failing)
            .map_or(0, |(j, _)| j),
        None => rendered.iter().position(|r| r.code != failing_literal)?,
    };
    rendered.into_iter().nth(chosen)
}

/// Human-readable hints for every failure in a report
#[must_use]
pub fn suggest_corrections(report: &VerificationReport) -> Vec<String> {
    let mut suggestions = Vec::new();
    if report.is_success() {
        return suggestions;
    }

    match &report.reason {
        Some(ReportReason::SyntaxInvalid {
            message,
            line,
            column,
        }) => {
            suggestions.push("Fix syntax errors first".to_string());
            suggestions.push(format!("Syntax error at line {line}, column {column}: {message}"));
        }
        Some(ReportReason::VerifierUnavailable) => {
            suggestions.push("Ensure a browser page is available for verification".to_string());
        }
        _ => {}
    }

    for check in report.failed_checks() {
        if check.result.status == CheckStatus::Skipped {
            continue;
        }
        suggestions.push(format!("Try alternative locator for: {}", check.literal));
        suggestions.push(match check.result.status {
            CheckStatus::NotFound => {
                "Try alternative locator strategy or verify element exists".to_string()
            }
            _ => match &check.result.error_message {
                Some(error) => format!("Locator may be invalid: {error}"),
                None => "Locator may be invalid".to_string(),
            },
        });
    }
    suggestions
}

/// Verifies embedded locators and patches failing ones
pub struct SelfCorrectingResolver<'a> {
    verifier: LiveVerifier<'a>,
    store: &'a ElementStore,
    syntax: &'a dyn SyntaxCheck,
    config: ResolverConfig,
}

impl fmt::Debug for SelfCorrectingResolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelfCorrectingResolver")
            .field("verifier", &self.verifier)
            .field("elements", &self.store.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> SelfCorrectingResolver<'a> {
    /// Create a resolver with default configuration and Python syntax checking
    #[must_use]
    pub fn new(verifier: LiveVerifier<'a>, store: &'a ElementStore) -> Self {
        Self {
            verifier,
            store,
            syntax: &PythonSyntax,
            config: ResolverConfig::default(),
        }
    }

    /// Replace the syntax checker
    #[must_use]
    pub fn with_syntax_check(mut self, syntax: &'a dyn SyntaxCheck) -> Self {
        self.syntax = syntax;
        self
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.verifier = self
            .verifier
            .with_hidden_as_success(config.verify_hidden_as_success);
        self.config = config;
        self
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    async fn check(&self, locator: &TrackedLocator) -> LocatorCheck {
        let candidate = self.store.get(locator.element_index).and_then(|element| {
            generate_candidates(element)
                .into_iter()
                .find(|c| render_code(c) == locator.literal)
        });
        let parsed = parse_code_literal(&locator.literal);
        let selector = parsed.map(|p| p.selector);

        let result = if !self.verifier.is_available() {
            VerificationResult::skipped()
        } else if locator.overlapping {
            VerificationResult::error("Locator literal overlaps another locator")
        } else if locator.offset.is_none() {
            VerificationResult::error("Locator literal not present in artifact")
        } else if let Some(selector) = &selector {
            self.verifier.verify(selector).await
        } else {
            VerificationResult::error("Unrecognised locator call")
        };

        LocatorCheck {
            literal: locator.literal.clone(),
            element_index: locator.element_index,
            candidate,
            selector,
            result,
        }
    }

    async fn verify_all(&self, tracked: &[TrackedLocator]) -> Vec<LocatorCheck> {
        let mut checks = Vec::with_capacity(tracked.len());
        for locator in tracked {
            checks.push(self.check(locator).await);
        }
        checks
    }

    /// Verify every locator once, without corrections.
    ///
    /// Success when all pass, partial when some pass, error otherwise.
    pub async fn verify_artifact(&self, artifact: &CodeArtifact) -> VerificationReport {
        if let Err(err) = self.syntax.check(&artifact.code) {
            warn!(line = err.line, column = err.column, "artifact failed syntax check");
            return VerificationReport::rejected(err);
        }

        let checks = self.verify_all(&locate(&artifact.code, &artifact.references)).await;
        if all_skipped(&checks) {
            return VerificationReport::unavailable(checks);
        }

        let issues = checks.iter().filter(|c| !c.result.status.is_success()).count();
        let overall_status = if issues == 0 {
            OverallStatus::Success
        } else if issues < checks.len() {
            OverallStatus::Partial
        } else {
            OverallStatus::Error
        };
        VerificationReport {
            overall_status,
            checks,
            corrections: Vec::new(),
            reason: None,
        }
    }

    /// Like [`resolve`](Self::resolve), but a syntax failure is an error.
    pub async fn resolve_strict(&self, artifact: &CodeArtifact) -> LocusResult<Resolution> {
        self.syntax
            .check(&artifact.code)
            .map_err(LocusError::from)?;
        Ok(self.resolve(artifact).await)
    }

    /// Verify, correct and re-verify an artifact.
    pub async fn resolve(&self, artifact: &CodeArtifact) -> Resolution {
        let mut code = artifact.code.clone();

        if let Err(err) = self.syntax.check(&code) {
            warn!(line = err.line, column = err.column, "artifact failed syntax check");
            let report = VerificationReport::rejected(err);
            return Resolution {
                initial: report.clone(),
                report,
                artifact: code,
                state: ResolutionState::Rejected,
            };
        }

        let mut tracked = locate(&code, &artifact.references);
        let mut state = ResolutionState::Verifying;
        debug!(?state, locators = tracked.len(), "verifying artifact");
        let mut checks = self.verify_all(&tracked).await;

        if all_skipped(&checks) {
            warn!("no document available, locators not verified");
            let report = VerificationReport::unavailable(checks);
            return Resolution {
                initial: report.clone(),
                report,
                artifact: code,
                state: ResolutionState::Unavailable,
            };
        }

        let initial = VerificationReport {
            overall_status: if all_passed(&checks) {
                OverallStatus::Success
            } else {
                OverallStatus::Error
            },
            checks: checks.clone(),
            corrections: Vec::new(),
            reason: None,
        };
        if initial.is_success() {
            info!(locators = checks.len(), "all locators verified");
            return Resolution {
                report: initial.clone(),
                initial,
                artifact: code,
                state: ResolutionState::Verified,
            };
        }

        let mut corrections: Vec<CorrectionRecord> = Vec::new();
        let mut exhausted = true;

        for pass in 1..=self.config.max_corrections {
            state = ResolutionState::NeedsCorrection;
            debug!(?state, pass, "starting correction pass");
            let failing: Vec<usize> = checks
                .iter()
                .enumerate()
                .filter(|(_, c)| c.result.status.is_failure())
                .map(|(i, _)| i)
                .collect();

            let mut applied_this_pass = 0;
            for i in failing {
                let Some(locator) = tracked.get(i).cloned() else {
                    continue;
                };
                let Some(element) = self.store.get(locator.element_index) else {
                    warn!(element_index = locator.element_index, "unknown element, cannot correct");
                    continue;
                };
                let Some(replacement) = next_candidate(&locator.literal, element) else {
                    continue;
                };

                let mut applied = false;
                if let Some(offset) = locator.offset {
                    if let PatchOutcome::Applied { artifact, .. } =
                        patch_at(&code, offset, &locator.literal, &replacement.code)
                    {
                        code = artifact;
                        shift_after(&mut tracked, offset, locator.literal.len(), replacement.code.len());
                        if let Some(slot) = tracked.get_mut(i) {
                            slot.literal.clone_from(&replacement.code);
                        }
                        applied = true;
                        applied_this_pass += 1;
                    }
                }
                info!(
                    element_index = locator.element_index,
                    strategy = %replacement.candidate.strategy,
                    pass,
                    applied,
                    "correcting locator"
                );
                corrections.push(CorrectionRecord {
                    original_literal: locator.literal,
                    replacement_literal: replacement.code,
                    element_index: locator.element_index,
                    attempt_number: pass,
                    offset: locator.offset,
                    applied,
                });
            }

            if applied_this_pass == 0 {
                exhausted = false;
                break;
            }

            state = ResolutionState::Corrected;
            debug!(?state, pass, applied = applied_this_pass, "re-verifying artifact");
            checks = self.verify_all(&tracked).await;
            if all_passed(&checks) {
                break;
            }
        }

        let any_applied = corrections.iter().any(|c| c.applied);
        let (overall_status, reason) = if all_passed(&checks) {
            state = ResolutionState::Verified;
            (OverallStatus::Success, None)
        } else {
            state = ResolutionState::GaveUp;
            let reason = if exhausted {
                ReportReason::CorrectionsExhausted
            } else {
                ReportReason::NoCorrectionPossible
            };
            let status = if any_applied {
                OverallStatus::Partial
            } else {
                OverallStatus::Error
            };
            (status, Some(reason))
        };

        info!(
            status = %overall_status,
            corrections = corrections.len(),
            "resolution finished"
        );
        Resolution {
            initial,
            report: VerificationReport {
                overall_status,
                checks,
                corrections,
                reason,
            },
            artifact: code,
            state,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDocument, QueryError, QueryOutcome};
    use crate::locator::Strategy;
    use crate::snapshot::SnapshotDocument;
    use crate::syntax::NoSyntaxCheck;

    const SUBMIT_ID: &str = "page.locator(\"#submit-btn\")";
    const SUBMIT_NAME: &str = "page.locator(\"[name=\\\"submit\\\"]\")";
    const SUBMIT_XPATH: &str = "page.locator(\"//button[@id='submit-btn']\")";
    const SUBMIT_TEXT: &str = "page.get_by_text(\"Submit\")";

    fn submit_button() -> ElementDescriptor {
        ElementDescriptor::new(0, "button")
            .with_id("submit-btn")
            .with_name("submit")
            .with_text("Submit")
    }

    fn store() -> ElementStore {
        ElementStore::from_descriptors([
            submit_button(),
            ElementDescriptor::new(1, "input").with_id("email"),
        ])
        .unwrap()
    }

    fn artifact() -> CodeArtifact {
        CodeArtifact::new(format!(
            "def test_submit(page):\n    page.locator(\"#email\").fill(\"a@b.c\")\n    {SUBMIT_ID}.click()\n"
        ))
        .with_reference(SUBMIT_ID, 0)
        .with_reference("page.locator(\"#email\")", 1)
    }

    mod locate_tests {
        use super::*;

        #[test]
        fn test_locate_orders_by_appearance() {
            let a = artifact();
            let tracked = locate(&a.code, &a.references);
            assert_eq!(tracked[0].element_index, 1);
            assert_eq!(tracked[1].element_index, 0);
            assert!(tracked[0].offset.unwrap() < tracked[1].offset.unwrap());
        }

        #[test]
        fn test_repeated_literal_maps_to_kth_occurrence() {
            let code = "page.locator(\"#a\").click()\npage.locator(\"#a\").click()\n";
            let refs = [
                LocatorReference::new("page.locator(\"#a\")", 3),
                LocatorReference::new("page.locator(\"#a\")", 4),
            ];
            let tracked = locate(code, &refs);
            assert_eq!(tracked[0].offset, Some(0));
            assert_eq!(tracked[1].offset, Some(27));
            assert_eq!(tracked[1].element_index, 4);
        }

        #[test]
        fn test_missing_literal_sorts_last() {
            let refs = [
                LocatorReference::new("page.locator(\"#gone\")", 0),
                LocatorReference::new("page.locator(\"#a\")", 1),
            ];
            let tracked = locate("page.locator(\"#a\")", &refs);
            assert_eq!(tracked[0].element_index, 1);
            assert_eq!(tracked[1].offset, None);
        }

        #[test]
        fn test_overlapping_span_is_marked() {
            let code = "page.locator(\"#a\").click()\n";
            let refs = [
                LocatorReference::new("page.locator(\"#a\")", 0),
                LocatorReference::new("locator(\"#a\")", 1),
            ];
            let tracked = locate(code, &refs);
            assert_eq!(tracked[0].offset, Some(0));
            assert!(!tracked[0].overlapping);
            assert_eq!(tracked[1].element_index, 1);
            assert_eq!(tracked[1].offset, None);
            assert!(tracked[1].overlapping);
        }

        #[test]
        fn test_adjacent_spans_do_not_overlap() {
            let code = "page.locator(\"#a\")page.locator(\"#b\")";
            let refs = [
                LocatorReference::new("page.locator(\"#b\")", 1),
                LocatorReference::new("page.locator(\"#a\")", 0),
            ];
            let tracked = locate(code, &refs);
            assert!(tracked.iter().all(|t| !t.overlapping && t.offset.is_some()));
        }

        #[test]
        fn test_shift_after_never_underflows() {
            let mut tracked = vec![TrackedLocator {
                literal: String::new(),
                element_index: 0,
                offset: Some(6),
                overlapping: false,
            }];
            shift_after(&mut tracked, 5, 20, 2);
            assert_eq!(tracked[0].offset, Some(0));
        }

        #[test]
        fn test_shift_after() {
            let mut tracked = vec![
                TrackedLocator { literal: String::new(), element_index: 0, offset: Some(5), overlapping: false },
                TrackedLocator { literal: String::new(), element_index: 1, offset: Some(40), overlapping: false },
            ];
            shift_after(&mut tracked, 5, 10, 25);
            assert_eq!(tracked[0].offset, Some(5));
            assert_eq!(tracked[1].offset, Some(55));
            shift_after(&mut tracked, 5, 25, 10);
            assert_eq!(tracked[1].offset, Some(40));
        }
    }

    mod next_candidate_tests {
        use super::*;

        #[test]
        fn test_moves_to_next_strategy() {
            let next = next_candidate(SUBMIT_ID, &submit_button()).unwrap();
            assert_eq!(next.candidate.strategy, Strategy::Name);
            assert_eq!(next.code, SUBMIT_NAME);
        }

        #[test]
        fn test_follows_chain_from_replacement() {
            let next = next_candidate(SUBMIT_NAME, &submit_button()).unwrap();
            assert_eq!(next.candidate.strategy, Strategy::XPath);
            let last = next_candidate(SUBMIT_XPATH, &submit_button()).unwrap();
            assert_eq!(last.code, SUBMIT_TEXT);
        }

        #[test]
        fn test_wraps_to_first_candidate() {
            let wrapped = next_candidate(SUBMIT_TEXT, &submit_button()).unwrap();
            assert_eq!(wrapped.code, SUBMIT_ID);
        }

        #[test]
        fn test_unrecognised_literal_uses_first_differing_candidate() {
            let next = next_candidate("page.locator(\"div >> nth=0\")", &submit_button()).unwrap();
            // classified as css; no css candidate, so the first differing one is taken
            assert_eq!(next.code, SUBMIT_ID);
        }

        #[test]
        fn test_stale_value_matches_by_strategy() {
            let next = next_candidate("page.locator(\"#submit\")", &submit_button()).unwrap();
            assert_eq!(next.candidate.strategy, Strategy::Name);
        }
    }

    mod verify_artifact_tests {
        use super::*;

        #[tokio::test]
        async fn test_all_pass() {
            let store = store();
            let doc = SnapshotDocument::new(store.clone());
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store);
            let report = resolver.verify_artifact(&artifact()).await;
            assert_eq!(report.overall_status, OverallStatus::Success);
            assert_eq!(report.checks.len(), 2);
            assert!(report.checks[1].candidate.is_some());
        }

        #[tokio::test]
        async fn test_some_pass_is_partial() {
            let store = store();
            let doc = MockDocument::new()
                .with_answer(&Selector::css("#email"), QueryOutcome::visible("input"));
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store);
            let report = resolver.verify_artifact(&artifact()).await;
            assert_eq!(report.overall_status, OverallStatus::Partial);
            assert!(report.corrections.is_empty());
        }

        #[tokio::test]
        async fn test_none_pass_is_error() {
            let store = store();
            let doc = MockDocument::new();
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store);
            let report = resolver.verify_artifact(&artifact()).await;
            assert_eq!(report.overall_status, OverallStatus::Error);
        }
    }

    mod resolve_tests {
        use super::*;

        #[tokio::test]
        async fn test_verified_without_corrections() {
            let store = store();
            let doc = SnapshotDocument::new(store.clone());
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store);
            let resolution = resolver.resolve(&artifact()).await;
            assert_eq!(resolution.state, ResolutionState::Verified);
            assert!(resolution.report.corrections.is_empty());
            assert_eq!(resolution.artifact, artifact().code);
        }

        #[tokio::test]
        async fn test_corrects_missing_id() {
            let store = store();
            // The page renamed the button id; name still matches.
            let doc = MockDocument::new()
                .with_answer(&Selector::css("#email"), QueryOutcome::visible("input"))
                .with_answer(&Selector::css("[name=\"submit\"]"), QueryOutcome::visible("button"));
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store);
            let resolution = resolver.resolve(&artifact()).await;

            assert_eq!(resolution.report.overall_status, OverallStatus::Success);
            assert_eq!(resolution.initial.overall_status, OverallStatus::Error);
            assert_eq!(resolution.report.corrections.len(), 1);
            let record = &resolution.report.corrections[0];
            assert_eq!(record.original_literal, SUBMIT_ID);
            assert_eq!(record.replacement_literal, SUBMIT_NAME);
            assert_eq!(record.attempt_number, 1);
            assert!(record.applied);
            assert!(resolution.artifact.contains(&format!("{SUBMIT_NAME}.click()")));
            assert!(!resolution.artifact.contains(SUBMIT_ID));
            // the untouched locator is still checked at its original place
            assert!(resolution.artifact.contains("page.locator(\"#email\").fill"));
        }

        #[tokio::test]
        async fn test_exhausts_budget_as_partial() {
            let store = store();
            let doc = MockDocument::new()
                .with_answer(&Selector::css("#email"), QueryOutcome::visible("input"));
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store);
            let resolution = resolver.resolve(&artifact()).await;

            let report = &resolution.report;
            assert_eq!(report.overall_status, OverallStatus::Partial);
            assert_eq!(report.reason, Some(ReportReason::CorrectionsExhausted));
            assert_eq!(report.corrections.len(), 2);
            assert!(report.corrections.iter().all(|c| c.attempt_number <= 2));
            assert_eq!(report.corrections[1].original_literal, SUBMIT_NAME);
            assert_eq!(report.corrections[1].replacement_literal, SUBMIT_XPATH);
            assert_eq!(resolution.state, ResolutionState::GaveUp);
            // initial report is untouched by the correction loop
            assert!(resolution.initial.corrections.is_empty());
            assert_eq!(resolution.initial.checks[1].literal, SUBMIT_ID);
        }

        #[tokio::test]
        async fn test_budget_is_configurable() {
            let store = store();
            let doc = MockDocument::new()
                .with_answer(&Selector::css("#email"), QueryOutcome::visible("input"))
                .with_answer(&Selector::text("Submit"), QueryOutcome::visible("button"));
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store)
                .with_config(ResolverConfig::default().with_max_corrections(3));
            let resolution = resolver.resolve(&artifact()).await;
            assert_eq!(resolution.report.overall_status, OverallStatus::Success);
            assert_eq!(resolution.report.corrections.len(), 3);
            assert!(resolution.artifact.contains(SUBMIT_TEXT));
        }

        #[tokio::test]
        async fn test_zero_budget_is_error() {
            let store = store();
            let doc = MockDocument::new();
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store)
                .with_config(ResolverConfig::default().with_max_corrections(0));
            let resolution = resolver.resolve(&artifact()).await;
            assert_eq!(resolution.report.overall_status, OverallStatus::Error);
            assert!(resolution.report.corrections.is_empty());
        }

        #[tokio::test]
        async fn test_unknown_element_cannot_be_corrected() {
            let store = store();
            let doc = MockDocument::new();
            let code = "page.locator(\"#ghost\").click()\n";
            let artifact = CodeArtifact::new(code).with_reference("page.locator(\"#ghost\")", 99);
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store);
            let resolution = resolver.resolve(&artifact).await;
            assert_eq!(resolution.report.overall_status, OverallStatus::Error);
            assert_eq!(resolution.report.reason, Some(ReportReason::NoCorrectionPossible));
            assert!(resolution.report.corrections.is_empty());
            assert_eq!(resolution.artifact, code);
        }

        #[tokio::test]
        async fn test_absent_literal_records_unapplied_correction() {
            let store = store();
            let doc = MockDocument::new();
            let code = "page.locator(\"#other\").click()\n";
            let artifact = CodeArtifact::new(code).with_reference(SUBMIT_ID, 0);
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store);
            let resolution = resolver.resolve(&artifact).await;

            let report = &resolution.report;
            assert_eq!(report.overall_status, OverallStatus::Error);
            assert_eq!(report.reason, Some(ReportReason::NoCorrectionPossible));
            assert_eq!(report.corrections.len(), 1);
            let record = &report.corrections[0];
            assert!(!record.applied);
            assert_eq!(record.offset, None);
            assert_eq!(record.original_literal, SUBMIT_ID);
            assert_eq!(record.replacement_literal, SUBMIT_NAME);
            assert_eq!(resolution.artifact, code);
            assert_eq!(
                report.checks[0].result.error_message.as_deref(),
                Some("Locator literal not present in artifact")
            );
        }

        #[tokio::test]
        async fn test_two_failures_in_one_pass_keep_offsets_consistent() {
            let store = store();
            let email_replacement = next_candidate("page.locator(\"#email\")", store.get(1).unwrap())
                .unwrap()
                .code;
            assert_eq!(email_replacement, "page.locator(\"//input[@id='email']\")");

            let doc = MockDocument::new()
                .with_answer(&Selector::xpath("//input[@id='email']"), QueryOutcome::visible("input"))
                .with_answer(&Selector::css("[name=\"submit\"]"), QueryOutcome::visible("button"));
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store);
            let resolution = resolver.resolve(&artifact()).await;

            assert_eq!(resolution.report.overall_status, OverallStatus::Success);
            let corrections = &resolution.report.corrections;
            assert_eq!(corrections.len(), 2);
            // artifact order: the email field precedes the submit button
            assert_eq!(corrections[0].element_index, 1);
            assert_eq!(corrections[1].element_index, 0);
            assert!(corrections.iter().all(|c| c.applied && c.attempt_number == 1));
            assert_eq!(corrections[1].offset, resolution.artifact.find(SUBMIT_NAME));
            assert_eq!(
                resolution.artifact,
                format!(
                    "def test_submit(page):\n    {email_replacement}.fill(\"a@b.c\")\n    {SUBMIT_NAME}.click()\n"
                )
            );
        }

        #[tokio::test]
        async fn test_overlapping_references_do_not_panic() {
            let store = store();
            let doc = MockDocument::new();
            let code = "page.locator(\"#a\").click()\n";
            let artifact = CodeArtifact::new(code)
                .with_reference("page.locator(\"#a\")", 0)
                .with_reference("locator(\"#a\")", 1);
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store);
            let resolution = resolver.resolve(&artifact).await;

            let overlap = resolution
                .report
                .checks
                .iter()
                .find(|c| c.element_index == 1)
                .unwrap();
            assert_eq!(overlap.result.status, CheckStatus::AmbiguousOrError);
            assert_eq!(
                overlap.result.error_message.as_deref(),
                Some("Locator literal overlaps another locator")
            );
            assert!(resolution
                .report
                .corrections
                .iter()
                .filter(|c| c.element_index == 1)
                .all(|c| !c.applied));
        }

        #[tokio::test]
        async fn test_hidden_counts_as_success_by_default() {
            let store = store();
            let doc = MockDocument::new().with_fallback(Ok(QueryOutcome::hidden("button")));
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store);
            assert!(resolver.resolve(&artifact()).await.report.is_success());

            let strict = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store)
                .with_config(ResolverConfig::default().with_hidden_as_success(false));
            assert!(!strict.resolve(&artifact()).await.report.is_success());
        }
    }

    mod rejection_tests {
        use super::*;

        #[tokio::test]
        async fn test_syntax_failure_rejects() {
            let store = store();
            let doc = MockDocument::new();
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store);
            let broken = CodeArtifact::new("def test(page:\n    page.locator(\"#a\").click()\n")
                .with_reference("page.locator(\"#a\")", 0);

            let resolution = resolver.resolve(&broken).await;
            assert_eq!(resolution.state, ResolutionState::Rejected);
            assert_eq!(resolution.report.overall_status, OverallStatus::Error);
            assert!(resolution.report.checks.is_empty());
            assert!(resolution.report.corrections.is_empty());
            assert!(matches!(
                resolution.report.reason,
                Some(ReportReason::SyntaxInvalid { line: 1, .. })
            ));
            assert_eq!(doc.call_count(), 0);

            let strict = resolver.resolve_strict(&broken).await;
            assert!(matches!(strict, Err(LocusError::SyntaxInvalid { .. })));
        }

        #[tokio::test]
        async fn test_syntax_check_is_injectable() {
            let store = store();
            let doc = SnapshotDocument::new(store.clone());
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store)
                .with_syntax_check(&NoSyntaxCheck);
            let artifact = CodeArtifact::new("page.locator(\"#email\").fill((")
                .with_reference("page.locator(\"#email\")", 1);
            assert!(resolver.resolve(&artifact).await.report.is_success());
        }

        #[tokio::test]
        async fn test_no_document_is_unavailable() {
            let store = store();
            let resolver = SelfCorrectingResolver::new(LiveVerifier::unavailable(), &store);
            let resolution = resolver.resolve(&artifact()).await;
            assert_eq!(resolution.state, ResolutionState::Unavailable);
            assert_eq!(resolution.report.overall_status, OverallStatus::Error);
            assert_eq!(resolution.report.reason, Some(ReportReason::VerifierUnavailable));
            assert!(resolution
                .report
                .checks
                .iter()
                .all(|c| c.result.status == CheckStatus::Skipped));
            assert!(resolution.report.corrections.is_empty());
        }

        #[tokio::test]
        async fn test_document_reporting_unavailable() {
            let store = store();
            let doc = MockDocument::new().with_fallback(Err(QueryError::Unavailable));
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store);
            let report = resolver.verify_artifact(&artifact()).await;
            assert_eq!(report.reason, Some(ReportReason::VerifierUnavailable));
            assert_eq!(report.checks.len(), 2);
        }
    }

    mod suggestion_tests {
        use super::*;

        #[tokio::test]
        async fn test_suggestions_for_failures() {
            let store = store();
            let doc = MockDocument::new()
                .with_answer(&Selector::css("#email"), QueryOutcome::visible("input"))
                .with_error(&Selector::css("#submit-btn"), QueryError::Timeout("30s".into()));
            let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store);
            let report = resolver.verify_artifact(&artifact()).await;
            let suggestions = suggest_corrections(&report);
            assert_eq!(suggestions.len(), 2);
            assert!(suggestions[0].contains(SUBMIT_ID));
            assert!(suggestions[1].contains("30s"));
        }

        #[test]
        fn test_suggestions_for_syntax() {
            let report = VerificationReport::rejected(SyntaxError {
                message: "'(' was never closed".into(),
                line: 2,
                column: 5,
            });
            let suggestions = suggest_corrections(&report);
            assert_eq!(suggestions[0], "Fix syntax errors first");
            assert!(suggestions[1].contains("line 2"));
        }

        #[test]
        fn test_report_serializes_camel_case() {
            let report = VerificationReport::unavailable(Vec::new());
            let json = serde_json::to_value(&report).unwrap();
            assert_eq!(json["overallStatus"], "error");
            assert_eq!(json["reason"]["kind"], "verifierUnavailable");
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::{prop_assert, proptest, ProptestConfig};

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn prop_passes_never_exceed_budget(budget in 0usize..5) {
                let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
                let store = store();
                let doc = MockDocument::new();
                let resolver = SelfCorrectingResolver::new(LiveVerifier::new(&doc), &store)
                    .with_config(ResolverConfig::default().with_max_corrections(budget));
                let resolution = runtime.block_on(resolver.resolve(&artifact()));
                prop_assert!(resolution
                    .report
                    .corrections
                    .iter()
                    .all(|c| c.attempt_number >= 1 && c.attempt_number <= budget));
                prop_assert!(resolution.report.corrections.len() <= budget * 2);
            }
        }
    }
}
