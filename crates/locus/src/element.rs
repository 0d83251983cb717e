//! Element descriptors produced by page discovery.
//!
//! Discovery runs upstream (in the browser) and hands over one record per
//! interactive element. The store keeps them keyed by their discovery index,
//! which is the only cross-reference used by generated test code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::locator::{select_best, LocatorChoice};
use crate::result::{LocusError, LocusResult};

/// Maximum number of characters of visible text kept per element
pub const MAX_TEXT_CHARS: usize = 100;

/// Page script collecting every visible interactive element in document
/// order, in the record shape [`ElementStore::from_value`] accepts.
pub const DISCOVERY_SCRIPT: &str = r#"(() => {
    const selectors = ['a[href]', 'button', 'input', 'select', 'textarea',
        '[onclick]', '[role="button"]', '[role="link"]'];
    const elements = [];
    document.querySelectorAll(selectors.join(',')).forEach((el) => {
        const rect = el.getBoundingClientRect();
        if (rect.width <= 0 || rect.height <= 0) {
            return;
        }
        elements.push({
            elementIndex: elements.length,
            tag: el.tagName.toLowerCase(),
            type: el.type || null,
            id: el.id || null,
            class: (typeof el.className === 'string' ? el.className : null) || null,
            name: el.getAttribute('name') || null,
            text: (el.innerText || el.value || '').substring(0, 100) || null,
            href: el.getAttribute('href') ? el.href : null,
            role: el.getAttribute('role') || null,
            ariaLabel: el.getAttribute('aria-label') || null,
            placeholder: el.getAttribute('placeholder') || null,
            visible: true,
            position: { top: rect.top, left: rect.left, width: rect.width, height: rect.height }
        });
    });
    return elements;
})()"#;

/// On-page rectangle of an element
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Distance from the top of the viewport
    pub top: f64,
    /// Distance from the left of the viewport
    pub left: f64,
    /// Width in CSS pixels
    pub width: f64,
    /// Height in CSS pixels
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle
    #[must_use]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Whether the rectangle covers any area
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// One discovered UI element.
///
/// Optional attributes are `None` when discovery reported them missing or
/// empty, so "non-empty" checks reduce to `is_some()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    /// Stable position within the page's element list
    pub index: usize,
    /// Lower-case tag name
    pub tag: String,
    /// Element type (e.g. input type)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    /// `id` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `name` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw `class` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_attribute: Option<String>,
    /// Visible text, at most [`MAX_TEXT_CHARS`] characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Link target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// ARIA role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// `aria-label` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    /// Placeholder text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Whether the element was rendered with a non-empty box
    #[serde(default)]
    pub visible: bool,
    /// Bounding rectangle at discovery time
    #[serde(default)]
    pub position: Rect,
}

impl ElementDescriptor {
    /// Create a visible descriptor with only a tag
    #[must_use]
    pub fn new(index: usize, tag: impl Into<String>) -> Self {
        Self {
            index,
            tag: tag.into().to_lowercase(),
            element_type: None,
            id: None,
            name: None,
            class_attribute: None,
            text: None,
            href: None,
            role: None,
            aria_label: None,
            placeholder: None,
            visible: true,
            position: Rect::default(),
        }
    }

    /// Set the `id` attribute
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = non_empty(id.into());
        self
    }

    /// Set the `name` attribute
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(name.into());
        self
    }

    /// Set the `class` attribute
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class_attribute = non_empty(class.into());
        self
    }

    /// Set the visible text (truncated to [`MAX_TEXT_CHARS`])
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = non_empty(truncate_chars(&text.into(), MAX_TEXT_CHARS));
        self
    }

    /// Set the ARIA role
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = non_empty(role.into());
        self
    }

    /// Set the `aria-label` attribute
    #[must_use]
    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = non_empty(label.into());
        self
    }

    /// Set the element type
    #[must_use]
    pub fn with_type(mut self, element_type: impl Into<String>) -> Self {
        self.element_type = non_empty(element_type.into());
        self
    }

    /// Set visibility
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set the bounding rectangle
    #[must_use]
    pub const fn with_position(mut self, position: Rect) -> Self {
        self.position = position;
        self
    }

    /// First whitespace-delimited class token
    #[must_use]
    pub fn first_class(&self) -> Option<&str> {
        self.class_attribute
            .as_deref()
            .and_then(|c| c.split_whitespace().next())
    }

    /// Whether the class attribute contains the given token
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.class_attribute
            .as_deref()
            .is_some_and(|c| c.split_whitespace().any(|token| token == class))
    }

    /// Trimmed visible text, if any remains after trimming
    #[must_use]
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    fn from_discovered(position: usize, raw: DiscoveredElement) -> Self {
        Self {
            index: raw.element_index.or(raw.index).unwrap_or(position),
            tag: raw
                .tag
                .and_then(non_empty)
                .map_or_else(|| "div".to_string(), |t| t.to_lowercase()),
            element_type: raw.element_type.and_then(non_empty),
            id: raw.id.and_then(non_empty),
            name: raw.name.and_then(non_empty),
            class_attribute: raw.class.and_then(non_empty),
            text: raw
                .text
                .map(|t| truncate_chars(&t, MAX_TEXT_CHARS))
                .and_then(non_empty),
            href: raw.href.and_then(non_empty),
            role: raw.role.and_then(non_empty),
            aria_label: raw.aria_label.and_then(non_empty),
            placeholder: raw.placeholder.and_then(non_empty),
            visible: raw.visible.unwrap_or_else(|| raw.position.has_area()),
            position: raw.position,
        }
    }
}

/// Element record as emitted by the discovery script
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscoveredElement {
    #[serde(default, alias = "element_index")]
    element_index: Option<usize>,
    #[serde(default)]
    index: Option<usize>,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default, rename = "type")]
    element_type: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "classAttribute")]
    class: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    href: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default, alias = "aria_label")]
    aria_label: Option<String>,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    visible: Option<bool>,
    #[serde(default)]
    position: Rect,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DiscoveryDocument {
    List(Vec<DiscoveredElement>),
    Exploration {
        interactive_elements: Vec<DiscoveredElement>,
    },
}

/// Read-only map from discovery index to element descriptor
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: BTreeMap<usize, ElementDescriptor>,
}

impl ElementStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from descriptors, rejecting duplicate indices
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = ElementDescriptor>,
    ) -> LocusResult<Self> {
        let mut store = Self::new();
        for descriptor in descriptors {
            store.insert(descriptor)?;
        }
        Ok(store)
    }

    /// Parse discovery output: either a JSON array of elements or an
    /// exploration object with an `interactive_elements` array.
    pub fn from_json(json: &str) -> LocusResult<Self> {
        Self::from_document(serde_json::from_str(json)?)
    }

    /// Build a store from an already-parsed discovery result
    pub fn from_value(value: serde_json::Value) -> LocusResult<Self> {
        Self::from_document(serde_json::from_value(value)?)
    }

    fn from_document(document: DiscoveryDocument) -> LocusResult<Self> {
        let raw = match document {
            DiscoveryDocument::List(list)
            | DiscoveryDocument::Exploration {
                interactive_elements: list,
            } => list,
        };
        Self::from_descriptors(
            raw.into_iter()
                .enumerate()
                .map(|(position, element)| ElementDescriptor::from_discovered(position, element)),
        )
    }

    /// Load discovery output from a file
    pub fn from_path(path: impl AsRef<Path>) -> LocusResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Insert a descriptor; its index must not already be present
    pub fn insert(&mut self, descriptor: ElementDescriptor) -> LocusResult<()> {
        if self.elements.contains_key(&descriptor.index) {
            return Err(LocusError::config(format!(
                "duplicate element index {}",
                descriptor.index
            )));
        }
        self.elements.insert(descriptor.index, descriptor);
        Ok(())
    }

    /// Look up a descriptor by index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ElementDescriptor> {
        self.elements.get(&index)
    }

    /// Number of descriptors
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate descriptors in index order
    pub fn iter(&self) -> impl Iterator<Item = &ElementDescriptor> {
        self.elements.values()
    }

    /// Best locator for an element, or a low-confidence `//*` placeholder
    /// when the index is unknown.
    #[must_use]
    pub fn resolve(&self, index: usize) -> LocatorChoice {
        self.get(index).map_or_else(
            || LocatorChoice::unresolved(format!("Element index {index} out of range")),
            select_best,
        )
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

pub(crate) fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
