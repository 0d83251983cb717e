//! Code artifact patching.
//!
//! Substitutions are exact and case-sensitive, and only whole locator calls
//! (`page.` … `)`) are ever replaced. A bare attribute value such as
//! `submit-btn` is rejected, since it may also appear in comments, URLs or
//! unrelated strings.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::resolver::CorrectionRecord;

/// Why a patch was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PatchFailure {
    /// Original literal does not occur (at the offset, for `patch_at`)
    Missing,
    /// Original literal occurs more than once
    Ambiguous {
        /// Number of occurrences
        count: usize,
    },
    /// Original is not a complete locator call
    NotALocatorCall,
    /// Replacement is already in place
    AlreadyApplied,
    /// Replacement equals the original
    Unchanged,
}

impl fmt::Display for PatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("original locator not found in artifact"),
            Self::Ambiguous { count } => {
                write!(f, "original locator occurs {count} times in artifact")
            }
            Self::NotALocatorCall => f.write_str("original is not a complete locator call"),
            Self::AlreadyApplied => f.write_str("replacement already applied"),
            Self::Unchanged => f.write_str("replacement equals original"),
        }
    }
}

/// Result of a patch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Substitution performed
    Applied {
        /// Patched artifact
        artifact: String,
        /// Byte offset of the substitution
        offset: usize,
    },
    /// Artifact left untouched
    NotApplied(PatchFailure),
}

impl PatchOutcome {
    /// Whether the substitution happened
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Patched artifact, if applied
    #[must_use]
    pub fn artifact(&self) -> Option<&str> {
        match self {
            Self::Applied { artifact, .. } => Some(artifact),
            Self::NotApplied(_) => None,
        }
    }

    /// Patched artifact, or `unchanged` when nothing was applied
    #[must_use]
    pub fn into_artifact_or(self, unchanged: &str) -> String {
        match self {
            Self::Applied { artifact, .. } => artifact,
            Self::NotApplied(_) => unchanged.to_string(),
        }
    }
}

/// Whether a literal is a complete locator call
#[must_use]
pub fn is_locator_call(literal: &str) -> bool {
    literal.starts_with("page.") && literal.ends_with(')') && literal.contains('(')
}

/// Replace the single occurrence of `original` with `replacement`.
#[must_use]
pub fn patch(artifact: &str, original: &str, replacement: &str) -> PatchOutcome {
    if !is_locator_call(original) {
        return PatchOutcome::NotApplied(PatchFailure::NotALocatorCall);
    }
    let offsets: Vec<usize> = artifact.match_indices(original).map(|(i, _)| i).collect();
    match offsets.as_slice() {
        [] => PatchOutcome::NotApplied(PatchFailure::Missing),
        [offset] => patch_at(artifact, *offset, original, replacement),
        many => PatchOutcome::NotApplied(PatchFailure::Ambiguous { count: many.len() }),
    }
}

/// Replace the occurrence of `original` starting at byte `offset`.
#[must_use]
pub fn patch_at(artifact: &str, offset: usize, original: &str, replacement: &str) -> PatchOutcome {
    if !is_locator_call(original) {
        return PatchOutcome::NotApplied(PatchFailure::NotALocatorCall);
    }
    if original == replacement {
        return PatchOutcome::NotApplied(PatchFailure::Unchanged);
    }
    let Some(tail) = artifact.get(offset..) else {
        return PatchOutcome::NotApplied(PatchFailure::Missing);
    };

    let has_original = tail.starts_with(original);
    let has_replacement = tail.starts_with(replacement);
    if has_replacement && (!has_original || replacement.len() > original.len()) {
        return PatchOutcome::NotApplied(PatchFailure::AlreadyApplied);
    }
    if !has_original {
        return PatchOutcome::NotApplied(PatchFailure::Missing);
    }

    let mut patched = String::with_capacity(artifact.len() - original.len() + replacement.len());
    patched.push_str(&artifact[..offset]);
    patched.push_str(replacement);
    patched.push_str(&tail[original.len()..]);
    PatchOutcome::Applied {
        artifact: patched,
        offset,
    }
}

/// Re-apply a recorded correction; applying it twice is a no-op.
#[must_use]
pub fn apply(artifact: &str, record: &CorrectionRecord) -> PatchOutcome {
    let Some(offset) = record.offset else {
        return PatchOutcome::NotApplied(PatchFailure::Missing);
    };
    patch_at(
        artifact,
        offset,
        &record.original_literal,
        &record.replacement_literal,
    )
}

/// Byte offset of the `nth` (0-based) occurrence of `needle`
#[must_use]
pub fn nth_occurrence(haystack: &str, needle: &str, nth: usize) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack.match_indices(needle).nth(nth).map(|(i, _)| i)
}
