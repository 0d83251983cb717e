//! Locus: locator resolution and self-correcting verification for generated
//! browser tests.
//!
//! Given the interactive elements discovered on a page, Locus ranks the ways
//! each element can be addressed, renders them as Playwright locator calls,
//! checks the calls embedded in generated test code against a live document,
//! and swaps failing calls for the element's next-best candidate.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ ElementStore │──►│  Candidate   │──►│   Selector   │
//! │ (discovery)  │   │  Generator   │   │   Renderer   │
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                              │
//!       ┌──────────────┐   ┌──────────────┐    │
//!       │   Patcher    │◄──│   Resolver   │◄───┘
//!       │  (artifact)  │   │ (bounded     │
//!       └──────────────┘   │  passes)     │──► LiveVerifier ──► DocumentQuery
//!                          └──────────────┘      (Chromium / Snapshot / Mock)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use locus::prelude::*;
//!
//! # async fn run() -> LocusResult<()> {
//! let store = ElementStore::from_path("elements.json")?;
//! let document = SnapshotDocument::new(store.clone());
//! let artifact = CodeArtifact::new("page.locator(\"#submit-btn\").click()\n")
//!     .with_reference("page.locator(\"#submit-btn\")", 0);
//!
//! let resolution = SelfCorrectingResolver::new(LiveVerifier::new(&document), &store)
//!     .resolve(&artifact)
//!     .await;
//! println!("{}", resolution.report.overall_status);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod browser;
mod config;
mod driver;
mod element;
mod locator;
mod patcher;
mod resolver;
mod result;
mod selector;
mod snapshot;
mod syntax;
mod verifier;

pub use browser::{BrowserConfig, DEFAULT_QUERY_TIMEOUT};
#[cfg(feature = "browser")]
pub use browser::{ChromiumBrowser, ChromiumDocument};
pub use config::{ResolverConfig, DEFAULT_MAX_CORRECTIONS, ENV_HIDDEN_AS_SUCCESS, ENV_MAX_CORRECTIONS};
pub use driver::{DocumentQuery, MockDocument, LookupResponse, QueryError, QueryOutcome};
pub use element::{ElementDescriptor, ElementStore, Rect, DISCOVERY_SCRIPT, MAX_TEXT_CHARS};
pub use locator::{
    element_xpath, generate_candidates, select_best, xpath_literal, Confidence, LocatorCandidate,
    LocatorChoice, Strategy, FALLBACK_COUNT, MAX_TEXT_LOCATOR_CHARS,
};
pub use patcher::{apply, is_locator_call, nth_occurrence, patch, patch_at, PatchFailure, PatchOutcome};
pub use resolver::{
    next_candidate, suggest_corrections, CodeArtifact, CorrectionRecord, LocatorCheck,
    LocatorReference, OverallStatus, ReportReason, Resolution, ResolutionState,
    SelfCorrectingResolver, VerificationReport,
};
pub use result::{LocusError, LocusResult};
pub use selector::{
    code_for_selector, is_clickable_role, parse_code_literal, render, render_code, ParsedLocator,
    RenderedLocator, Selector, SelectorKind,
};
pub use snapshot::SnapshotDocument;
pub use syntax::{DelimiterCheck, NoSyntaxCheck, PythonSyntax, SyntaxCheck, SyntaxError};
pub use verifier::{CheckStatus, LiveVerifier, VerificationResult};

/// Common imports
pub mod prelude {
    #[cfg(feature = "browser")]
    pub use super::{ChromiumBrowser, ChromiumDocument};
    pub use super::{
        generate_candidates, render, render_code, select_best, suggest_corrections, BrowserConfig,
        CheckStatus, CodeArtifact, Confidence, CorrectionRecord, DocumentQuery,
        ElementDescriptor, ElementStore, LiveVerifier, LocatorCandidate, LocatorReference,
        LocusError, LocusResult, OverallStatus, PythonSyntax, Resolution, ResolverConfig, Selector,
        SelfCorrectingResolver, SnapshotDocument, Strategy, SyntaxCheck, VerificationReport,
    };
}
