//! Candidate locator generation.
//!
//! Every discovered element can be addressed several ways. This module turns
//! an [`ElementDescriptor`] into a ranked list of [`LocatorCandidate`]s.
//!
//! # Ranking
//!
//! | Strategy | Priority | Confidence |
//! |----------|----------|------------|
//! | `id` | 1 | high |
//! | `name` | 2 | high |
//! | `semanticAriaLabel` | 2 | high |
//! | `css` (first class) | 3 | medium |
//! | `semanticRole` | 3 | medium |
//! | `xpath` | 4 | medium (low when it is the only option) |
//! | `text` | 5 | medium |
//!
//! Equal priorities keep generation order, so the list is a total order and
//! generating twice yields the same list.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::element::{truncate_chars, ElementDescriptor};

/// Maximum number of characters of text used by a text locator
pub const MAX_TEXT_LOCATOR_CHARS: usize = 50;

/// Number of fallbacks carried by a [`LocatorChoice`]
pub const FALLBACK_COUNT: usize = 2;

/// How a locator addresses an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// `id` attribute
    #[serde(rename = "id")]
    Id,
    /// `name` attribute
    #[serde(rename = "name")]
    Name,
    /// First CSS class
    #[serde(rename = "css")]
    Css,
    /// XPath expression
    #[serde(rename = "xpath")]
    XPath,
    /// Accessible name from `aria-label`
    #[serde(rename = "semanticAriaLabel")]
    SemanticAriaLabel,
    /// ARIA role
    #[serde(rename = "semanticRole")]
    SemanticRole,
    /// Visible text
    #[serde(rename = "text")]
    Text,
}

impl Strategy {
    /// Fixed rank of the strategy (lower is better)
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Id => 1,
            Self::Name | Self::SemanticAriaLabel => 2,
            Self::Css | Self::SemanticRole => 3,
            Self::XPath => 4,
            Self::Text => 5,
        }
    }

    /// Wire name of the strategy
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::SemanticAriaLabel => "semanticAriaLabel",
            Self::SemanticRole => "semanticRole",
            Self::Text => "text",
        }
    }

    /// Whether the strategy queries the accessibility tree
    #[must_use]
    pub const fn is_semantic(self) -> bool {
        matches!(self, Self::SemanticAriaLabel | Self::SemanticRole)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative trust in a locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Fragile or unverified
    Low,
    /// Usable
    Medium,
    /// Stable
    High,
}

impl Confidence {
    /// Static confidence for a priority: high iff priority <= 2
    #[must_use]
    pub const fn from_priority(priority: u8) -> Self {
        if priority <= 2 {
            Self::High
        } else {
            Self::Medium
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// One way to address an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatorCandidate {
    /// Addressing strategy
    pub strategy: Strategy,
    /// Raw attribute/text value driving the selector
    pub value: String,
    /// Rank, lower is better
    pub priority: u8,
    /// Static confidence
    pub confidence: Confidence,
    /// Accessible-name hint for role locators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_hint: Option<String>,
}

impl LocatorCandidate {
    /// Create a candidate with the strategy's fixed priority and confidence
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        let priority = strategy.priority();
        Self {
            strategy,
            value: value.into(),
            priority,
            confidence: Confidence::from_priority(priority),
            name_hint: None,
        }
    }

    /// Attach an accessible-name hint
    #[must_use]
    pub fn with_name_hint(mut self, hint: impl Into<String>) -> Self {
        self.name_hint = Some(hint.into());
        self
    }

    /// Override the confidence label
    #[must_use]
    pub const fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }
}

/// Generate every candidate for an element, ranked by priority.
#[must_use]
pub fn generate_candidates(element: &ElementDescriptor) -> Vec<LocatorCandidate> {
    let mut candidates = Vec::with_capacity(6);

    if let Some(id) = present(element.id.as_deref()) {
        candidates.push(LocatorCandidate::new(Strategy::Id, id));
    }

    if let Some(name) = present(element.name.as_deref()) {
        candidates.push(LocatorCandidate::new(Strategy::Name, name));
    }

    if let Some(class) = element.first_class() {
        candidates.push(LocatorCandidate::new(Strategy::Css, format!(".{class}")));
    }

    if let Some(label) = present(element.aria_label.as_deref()) {
        candidates.push(LocatorCandidate::new(Strategy::SemanticAriaLabel, label));
    } else if let Some(role) = present(element.role.as_deref()) {
        let mut candidate = LocatorCandidate::new(Strategy::SemanticRole, role);
        if let Some(text) = element.trimmed_text() {
            candidate = candidate.with_name_hint(truncate_chars(text, MAX_TEXT_LOCATOR_CHARS));
        }
        candidates.push(candidate);
    }

    let xpath = LocatorCandidate::new(Strategy::XPath, element_xpath(element));
    let text = element
        .trimmed_text()
        .map(|t| LocatorCandidate::new(Strategy::Text, truncate_chars(t, MAX_TEXT_LOCATOR_CHARS)));

    if candidates.is_empty() && text.is_none() {
        // Bare `//tag` is all that is left.
        return vec![xpath.with_confidence(Confidence::Low)];
    }

    candidates.push(xpath);
    candidates.extend(text);

    // Stable: equal priorities keep generation order.
    candidates.sort_by_key(|c| c.priority);
    candidates
}

/// Attribute value usable in a locator; blank strings count as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// XPath for an element: by id, else name, else first class, else bare tag
#[must_use]
pub fn element_xpath(element: &ElementDescriptor) -> String {
    let tag = &element.tag;
    if let Some(id) = present(element.id.as_deref()) {
        format!("//{tag}[@id={}]", xpath_literal(id))
    } else if let Some(name) = present(element.name.as_deref()) {
        format!("//{tag}[@name={}]", xpath_literal(name))
    } else if let Some(class) = element.first_class() {
        format!("//{tag}[@class={}]", xpath_literal(class))
    } else {
        format!("//{tag}")
    }
}

/// Quote a value as an XPath string literal
#[must_use]
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{value}'")
    } else if !value.contains('"') {
        format!("\"{value}\"")
    } else {
        let parts: Vec<String> = value
            .split('\'')
            .map(|part| format!("'{part}'"))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

/// Best locator for an element together with its next fallbacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorChoice {
    /// Highest-ranked candidate
    pub best: LocatorCandidate,
    /// Up to [`FALLBACK_COUNT`] next candidates
    pub fallbacks: Vec<LocatorCandidate>,
    /// Why no real candidate could be produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LocatorChoice {
    /// Placeholder choice matching any element
    #[must_use]
    pub fn unresolved(error: impl Into<String>) -> Self {
        Self {
            best: LocatorCandidate::new(Strategy::XPath, "//*").with_confidence(Confidence::Low),
            fallbacks: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Select the best candidate for an element plus up to two fallbacks.
#[must_use]
pub fn select_best(element: &ElementDescriptor) -> LocatorChoice {
    let mut candidates = generate_candidates(element).into_iter();
    match candidates.next() {
        Some(best) => LocatorChoice {
            best,
            fallbacks: candidates.take(FALLBACK_COUNT).collect(),
            error: None,
        },
        None => LocatorChoice::unresolved(format!("no locator for element {}", element.index)),
    }
}
