//! Offline document over a discovered element list.
//!
//! [`SnapshotDocument`] answers selector queries from the descriptors captured
//! at discovery time, without a browser. It understands the selector forms the
//! renderer produces; anything else is reported as an invalid selector.

use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

use crate::driver::{DocumentQuery, QueryError, QueryOutcome};
use crate::element::{ElementDescriptor, ElementStore};
use crate::selector::{css_unescape_ident, text_matches, Selector};

struct Grammar {
    css_tag: Regex,
    css_part: Regex,
    xpath: Regex,
    xpath_concat_arg: Regex,
}

fn grammar() -> Result<&'static Grammar, QueryError> {
    static GRAMMAR: OnceLock<Result<Grammar, regex::Error>> = OnceLock::new();
    GRAMMAR
        .get_or_init(|| {
            const IDENT: &str = r"(?:\\[0-9a-fA-F]{1,6} ?|\\[^0-9a-fA-F]|[\w-])+";
            Ok(Grammar {
                css_tag: Regex::new(r"^(\*|[a-zA-Z][a-zA-Z0-9-]*)")?,
                css_part: Regex::new(&format!(
                    r#"^(?:#(?P<id>{IDENT})|\.(?P<class>{IDENT})|\[(?P<attr>[\w-]+)(?:=(?:"(?P<dq>(?:\\.|[^"\\])*)"|'(?P<sq>[^']*)'|(?P<bare>[\w-]+)))?\])"#
                ))?,
                xpath: Regex::new(
                    r#"^//(?P<tag>\*|[a-zA-Z][a-zA-Z0-9-]*)(?:\[@(?P<attr>[\w-]+)=(?:'(?P<sq>[^']*)'|"(?P<dq>[^"]*)"|concat\((?P<concat>.*)\))\])?$"#,
                )?,
                xpath_concat_arg: Regex::new(r#"'([^']*)'|"([^"]*)""#)?,
            })
        })
        .as_ref()
        .map_err(|e| QueryError::Other(format!("selector grammar: {e}")))
}

/// Attribute constraint in a simple selector
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrTest {
    name: String,
    /// `None` tests presence only
    value: Option<String>,
}

/// A compound CSS selector such as `button.primary[name="go"]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CompoundSelector {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

impl CompoundSelector {
    fn parse(selector: &str) -> Result<Self, QueryError> {
        let grammar = grammar()?;
        let invalid = || QueryError::InvalidSelector(selector.to_string());
        let mut rest = selector.trim();
        if rest.is_empty() {
            return Err(invalid());
        }

        let mut parsed = Self::default();
        if let Some(m) = grammar.css_tag.find(rest) {
            if m.as_str() != "*" {
                parsed.tag = Some(m.as_str().to_lowercase());
            }
            rest = &rest[m.end()..];
        }

        while !rest.is_empty() {
            let caps = grammar.css_part.captures(rest).ok_or_else(invalid)?;
            if let Some(id) = caps.name("id") {
                parsed.ids.push(css_unescape_ident(id.as_str()));
            } else if let Some(class) = caps.name("class") {
                parsed.classes.push(css_unescape_ident(class.as_str()));
            } else if let Some(attr) = caps.name("attr") {
                let value = caps
                    .name("dq")
                    .map(|v| unescape_css_string(v.as_str()))
                    .or_else(|| caps.name("sq").map(|v| v.as_str().to_string()))
                    .or_else(|| caps.name("bare").map(|v| v.as_str().to_string()));
                parsed.attrs.push(AttrTest {
                    name: attr.as_str().to_lowercase(),
                    value,
                });
            }
            let consumed = caps.get(0).map_or(0, |m| m.end());
            if consumed == 0 {
                return Err(invalid());
            }
            rest = &rest[consumed..];
        }
        Ok(parsed)
    }

    fn matches(&self, element: &ElementDescriptor) -> bool {
        self.tag.as_ref().map_or(true, |tag| *tag == element.tag)
            && self
                .ids
                .iter()
                .all(|id| element.id.as_deref() == Some(id.as_str()))
            && self.classes.iter().all(|class| element.has_class(class))
            && self.attrs.iter().all(|test| {
                match (attribute(element, &test.name), &test.value) {
                    (Some(_), None) => true,
                    (Some(actual), Some(expected)) => actual == expected,
                    (None, _) => false,
                }
            })
    }
}

fn unescape_css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Attribute value of a descriptor by HTML attribute name
fn attribute<'a>(element: &'a ElementDescriptor, name: &str) -> Option<&'a str> {
    match name {
        "id" => element.id.as_deref(),
        "name" => element.name.as_deref(),
        "class" => element.class_attribute.as_deref(),
        "type" => element.element_type.as_deref(),
        "href" => element.href.as_deref(),
        "role" => element.role.as_deref(),
        "aria-label" => element.aria_label.as_deref(),
        "placeholder" => element.placeholder.as_deref(),
        _ => None,
    }
}

/// Role an element has without an explicit `role` attribute
fn implicit_role(element: &ElementDescriptor) -> Option<&'static str> {
    let input_type = element.element_type.as_deref().unwrap_or("text");
    match element.tag.as_str() {
        "button" => Some("button"),
        "a" if element.href.is_some() => Some("link"),
        "input" => match input_type {
            "submit" | "button" | "reset" | "image" => Some("button"),
            "checkbox" => Some("checkbox"),
            "radio" => Some("radio"),
            "text" | "email" | "password" | "search" | "tel" | "url" => Some("textbox"),
            _ => None,
        },
        "textarea" => Some("textbox"),
        "select" => Some("combobox"),
        "nav" => Some("navigation"),
        _ => None,
    }
}

fn has_role(element: &ElementDescriptor, role: &str) -> bool {
    element
        .role
        .as_deref()
        .or_else(|| implicit_role(element))
        .is_some_and(|r| r.eq_ignore_ascii_case(role))
}

fn xpath_matcher(expression: &str) -> Result<impl Fn(&ElementDescriptor) -> bool, QueryError> {
    let grammar = grammar()?;
    let caps = grammar
        .xpath
        .captures(expression.trim())
        .ok_or_else(|| QueryError::InvalidSelector(expression.to_string()))?;

    let tag = caps
        .name("tag")
        .map(|t| t.as_str().to_lowercase())
        .filter(|t| t != "*");
    let attr = caps.name("attr").map(|a| a.as_str().to_string());
    let value = caps
        .name("sq")
        .or_else(|| caps.name("dq"))
        .map(|v| v.as_str().to_string())
        .or_else(|| {
            caps.name("concat").map(|args| {
                grammar
                    .xpath_concat_arg
                    .captures_iter(args.as_str())
                    .filter_map(|c| c.get(1).or_else(|| c.get(2)))
                    .map(|m| m.as_str())
                    .collect::<String>()
            })
        });

    Ok(move |element: &ElementDescriptor| {
        tag.as_ref().map_or(true, |tag| *tag == element.tag)
            && match (&attr, &value) {
                (Some(attr), Some(value)) => attribute(element, attr) == Some(value.as_str()),
                _ => true,
            }
    })
}

/// Offline [`DocumentQuery`] backed by an [`ElementStore`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotDocument {
    store: Option<ElementStore>,
}

impl SnapshotDocument {
    /// Document over a discovered element list
    #[must_use]
    pub const fn new(store: ElementStore) -> Self {
        Self { store: Some(store) }
    }

    /// Document with no page behind it; every query is unavailable
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { store: None }
    }

    /// Underlying element store
    #[must_use]
    pub const fn store(&self) -> Option<&ElementStore> {
        self.store.as_ref()
    }

    /// Every descriptor a selector matches, in index order
    pub fn matching<'a>(
        &'a self,
        selector: &Selector,
    ) -> Result<Vec<&'a ElementDescriptor>, QueryError> {
        let store = self.store.as_ref().ok_or(QueryError::Unavailable)?;
        let elements = store.iter();
        let matched = match selector {
            Selector::Css { selector } => {
                let compound = CompoundSelector::parse(selector)?;
                elements.filter(|e| compound.matches(e)).collect()
            }
            Selector::XPath { expression } => {
                let matches = xpath_matcher(expression)?;
                elements.filter(|e| matches(e)).collect()
            }
            Selector::Text { text, exact } => elements
                .filter(|e| {
                    e.text
                        .as_deref()
                        .is_some_and(|t| text_matches(t, text, *exact))
                })
                .collect(),
            Selector::Label { label } => elements
                .filter(|e| {
                    e.aria_label
                        .as_deref()
                        .is_some_and(|l| text_matches(l, label, false))
                })
                .collect(),
            Selector::Role { role, name } => elements
                .filter(|e| has_role(e, role))
                .filter(|e| {
                    name.as_ref().map_or(true, |name| {
                        e.aria_label
                            .as_deref()
                            .or(e.text.as_deref())
                            .is_some_and(|accessible| text_matches(accessible, name, false))
                    })
                })
                .collect(),
        };
        Ok(matched)
    }
}

#[async_trait]
impl DocumentQuery for SnapshotDocument {
    async fn query(&self, selector: &Selector) -> Result<QueryOutcome, QueryError> {
        let matched = self.matching(selector)?;
        Ok(match matched.first() {
            None => QueryOutcome::not_found(),
            Some(first) => QueryOutcome {
                found: true,
                visible: first.visible,
                matched_tag: Some(first.tag.clone()),
                match_count: Some(matched.len()),
            },
        })
    }
}
