//! Selector rendering.
//!
//! A [`LocatorCandidate`] becomes two things here: a [`Selector`] that the
//! document query layer executes, and the code literal embedded in generated
//! Playwright test code. Both come from the same match so that verification
//! checks exactly what the test will run.
//!
//! | Strategy | Selector | Code literal |
//! |----------|----------|--------------|
//! | id | `#value` | `page.locator("#value")` |
//! | name | `[name="value"]` | `page.locator("[name=\"value\"]")` |
//! | css | `.class` | `page.locator(".class")` |
//! | xpath | `//tag[...]` | `page.locator("//tag[...]")` |
//! | semanticAriaLabel | label | `page.get_by_label("value")` |
//! | semanticRole | role (+ name) | `page.get_by_role("button", name="Go")` |
//! | text | text contains | `page.get_by_text("value")` |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::locator::{LocatorCandidate, Strategy};

/// Roles that accept an accessible-name hint
pub const CLICKABLE_ROLES: &[&str] = &[
    "button", "link", "menuitem", "tab", "checkbox", "radio", "switch", "option",
];

/// Query language of a selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
    /// Visible-text match
    Text,
    /// Accessible label match
    Label,
    /// ARIA role match
    Role,
}

/// A runnable selector, tagged with its query language
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Selector {
    /// CSS selector (e.g. `#submit`, `.btn`)
    Css {
        /// Selector text
        selector: String,
    },
    /// XPath expression
    XPath {
        /// Expression text
        expression: String,
    },
    /// Text content match
    Text {
        /// Text to match
        text: String,
        /// Whole-text match instead of substring
        exact: bool,
    },
    /// Accessible label (`aria-label` or associated `<label>`)
    Label {
        /// Label text
        label: String,
    },
    /// ARIA role with optional accessible name
    Role {
        /// Role name
        role: String,
        /// Accessible name filter
        name: Option<String>,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css {
            selector: selector.into(),
        }
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath {
            expression: expression.into(),
        }
    }

    /// Create a substring text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            exact: false,
        }
    }

    /// Create a label selector
    #[must_use]
    pub fn label(label: impl Into<String>) -> Self {
        Self::Label {
            label: label.into(),
        }
    }

    /// Create a role selector
    #[must_use]
    pub fn role(role: impl Into<String>, name: Option<String>) -> Self {
        Self::Role {
            role: role.into(),
            name,
        }
    }

    /// Query language of this selector
    #[must_use]
    pub const fn kind(&self) -> SelectorKind {
        match self {
            Self::Css { .. } => SelectorKind::Css,
            Self::XPath { .. } => SelectorKind::XPath,
            Self::Text { .. } => SelectorKind::Text,
            Self::Label { .. } => SelectorKind::Label,
            Self::Role { .. } => SelectorKind::Role,
        }
    }

    /// Selector text in Playwright selector-engine syntax
    #[must_use]
    pub fn selector_text(&self) -> String {
        match self {
            Self::Css { selector } => selector.clone(),
            Self::XPath { expression } => format!("xpath={expression}"),
            Self::Text { text, exact } => {
                if *exact {
                    format!("text={}", js_string(text))
                } else {
                    format!("text={text}")
                }
            }
            Self::Label { label } => format!("label={label}"),
            Self::Role { role, name } => match name {
                Some(name) => format!("role={role}[name={}]", js_string(name)),
                None => format!("role={role}"),
            },
        }
    }

    /// JavaScript expression returning the first matching element (or null)
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("({}).at(0) ?? null", self.to_all_query())
    }

    /// JavaScript expression counting matching elements
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("({}).length", self.to_all_query())
    }

    /// JavaScript expression returning every matching element as an array
    #[must_use]
    pub fn to_all_query(&self) -> String {
        match self {
            Self::Css { selector } => {
                format!("Array.from(document.querySelectorAll({}))", js_string(selector))
            }
            Self::XPath { expression } => format!(
                "(() => {{ const r = document.evaluate({}, document, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                 return Array.from({{ length: r.snapshotLength }}, (_, i) => r.snapshotItem(i)); }})()",
                js_string(expression)
            ),
            Self::Text { text, exact } => {
                let test = text_test_js(text, *exact);
                format!(
                    "(() => {{ const t = {test}; \
                     return Array.from(document.querySelectorAll('body *')).filter(el => \
                     t(el.textContent) && !Array.from(el.children).some(c => t(c.textContent))); }})()"
                )
            }
            Self::Label { label } => {
                let test = text_test_js(label, false);
                format!(
                    "(() => {{ const t = {test}; \
                     return Array.from(document.querySelectorAll('*')).filter(el => \
                     t(el.getAttribute('aria-label')) || \
                     (el.labels && Array.from(el.labels).some(l => t(l.textContent)))); }})()"
                )
            }
            Self::Role { role, name } => {
                let implicit = implicit_role_selector(role)
                    .map(|css| format!(", {css}"))
                    .unwrap_or_default();
                let css = js_string(&format!("[role=\"{role}\"]{implicit}"));
                let filter = name.as_ref().map_or_else(String::new, |name| {
                    format!(
                        ".filter(el => ({})(el.getAttribute('aria-label') ?? el.textContent))",
                        text_test_js(name, false)
                    )
                });
                format!("Array.from(document.querySelectorAll({css})){filter}")
            }
        }
    }

    /// Self-contained JavaScript lookup returning
    /// `{found, visible, count, tag, error}` for the first match.
    #[must_use]
    pub fn to_lookup_script(&self) -> String {
        format!(
            "(() => {{ try {{ const all = {}; const el = all[0] ?? null; \
             return {{ found: el !== null, count: all.length, \
             visible: el ? (el.offsetWidth > 0 && el.offsetHeight > 0) : false, \
             tag: el ? el.tagName.toLowerCase() : null, error: null }}; \
             }} catch (e) {{ return {{ found: false, count: 0, visible: false, tag: null, error: String(e.message ?? e) }}; }} }})()",
            self.to_all_query()
        )
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector_text())
    }
}

/// A candidate together with its selector and code literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedLocator {
    /// Source candidate
    pub candidate: LocatorCandidate,
    /// Runnable selector
    pub selector: Selector,
    /// Literal as embedded in test code
    pub code: String,
}

impl RenderedLocator {
    /// Render a candidate
    #[must_use]
    pub fn new(candidate: LocatorCandidate) -> Self {
        let selector = render(&candidate);
        let code = render_code(&candidate);
        Self {
            candidate,
            selector,
            code,
        }
    }
}

/// Whether a role accepts an accessible-name hint
#[must_use]
pub fn is_clickable_role(role: &str) -> bool {
    let role = role.to_lowercase();
    CLICKABLE_ROLES.iter().any(|r| role.contains(r))
}

/// Render a candidate to a runnable selector
#[must_use]
pub fn render(candidate: &LocatorCandidate) -> Selector {
    let value = &candidate.value;
    match candidate.strategy {
        Strategy::Id => Selector::css(format!("#{}", css_escape_ident(value))),
        Strategy::Name => Selector::css(format!("[name=\"{}\"]", css_escape_string(value))),
        Strategy::Css => Selector::css(value.clone()),
        Strategy::XPath => Selector::xpath(value.clone()),
        Strategy::SemanticAriaLabel => Selector::label(value.clone()),
        Strategy::SemanticRole => Selector::role(value.clone(), role_name_hint(candidate)),
        Strategy::Text => Selector::text(value.clone()),
    }
}

/// Render a candidate to the literal embedded in generated test code
#[must_use]
pub fn render_code(candidate: &LocatorCandidate) -> String {
    code_for_selector(&render(candidate))
}

/// Code literal for a selector
#[must_use]
pub fn code_for_selector(selector: &Selector) -> String {
    match selector {
        Selector::Css { selector } => format!("page.locator({})", py_string(selector)),
        Selector::XPath { expression } => format!("page.locator({})", py_string(expression)),
        Selector::Text { text, exact } => {
            if *exact {
                format!("page.get_by_text({}, exact=True)", py_string(text))
            } else {
                format!("page.get_by_text({})", py_string(text))
            }
        }
        Selector::Label { label } => format!("page.get_by_label({})", py_string(label)),
        Selector::Role { role, name } => match name {
            Some(name) => format!(
                "page.get_by_role({}, name={})",
                py_string(role),
                py_string(name)
            ),
            None => format!("page.get_by_role({})", py_string(role)),
        },
    }
}

fn role_name_hint(candidate: &LocatorCandidate) -> Option<String> {
    if is_clickable_role(&candidate.value) {
        candidate.name_hint.clone()
    } else {
        None
    }
}

/// Classify a `page.locator(...)` argument by the strategy that renders it
#[must_use]
pub fn classify_css(selector: &str) -> Strategy {
    if selector.starts_with("//") || selector.starts_with("(//") || selector.starts_with("xpath=")
    {
        Strategy::XPath
    } else if selector.starts_with('#') {
        Strategy::Id
    } else if selector.starts_with("[name=") {
        Strategy::Name
    } else {
        Strategy::Css
    }
}

/// A code literal parsed back into strategy and selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLocator {
    /// Strategy the literal corresponds to
    pub strategy: Strategy,
    /// Selector the literal executes
    pub selector: Selector,
}

/// Parse a caller-supplied locator literal (`page.locator("…")`,
/// `page.get_by_label("…")`, `page.get_by_role("…", name="…")`,
/// `page.get_by_text("…")`).
///
/// This is the inverse of [`render_code`]; it is applied to literals the
/// caller attributes to an element, never to arbitrary code.
#[must_use]
pub fn parse_code_literal(literal: &str) -> Option<ParsedLocator> {
    let literal = literal.trim();
    let rest = literal.strip_prefix("page.")?;
    let open = rest.find('(')?;
    let method = &rest[..open];
    let args = rest[open + 1..].strip_suffix(')')?;
    let args = parse_call_args(args)?;

    match method {
        "locator" => {
            let selector = args.positional.first()?.clone();
            let strategy = classify_css(&selector);
            let selector = match selector.strip_prefix("xpath=") {
                Some(expression) => Selector::xpath(expression),
                None if strategy == Strategy::XPath => Selector::xpath(selector),
                None => Selector::css(selector),
            };
            Some(ParsedLocator { strategy, selector })
        }
        "get_by_label" => Some(ParsedLocator {
            strategy: Strategy::SemanticAriaLabel,
            selector: Selector::label(args.positional.first()?.clone()),
        }),
        "get_by_role" => Some(ParsedLocator {
            strategy: Strategy::SemanticRole,
            selector: Selector::role(args.positional.first()?.clone(), args.keyword("name")),
        }),
        "get_by_text" => Some(ParsedLocator {
            strategy: Strategy::Text,
            selector: Selector::Text {
                text: args.positional.first()?.clone(),
                exact: args.flag("exact"),
            },
        }),
        _ => None,
    }
}

#[derive(Debug, Default)]
struct CallArgs {
    positional: Vec<String>,
    keywords: Vec<(String, String)>,
}

impl CallArgs {
    fn keyword(&self, key: &str) -> Option<String> {
        self.keywords
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn flag(&self, key: &str) -> bool {
        self.keyword(key).is_some_and(|v| v == "True")
    }
}

/// Parse `"a", name="b", exact=True` into positional and keyword arguments.
fn parse_call_args(args: &str) -> Option<CallArgs> {
    let mut parsed = CallArgs::default();
    let mut chars = args.char_indices().peekable();

    loop {
        while chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
            chars.next();
        }
        let Some(&(start, first)) = chars.peek() else {
            break;
        };

        if first == '"' || first == '\'' {
            parsed.positional.push(read_py_string(&mut chars)?);
        } else {
            let mut key_end = start;
            while let Some(&(i, c)) = chars.peek() {
                if c == '=' {
                    break;
                }
                key_end = i + c.len_utf8();
                chars.next();
            }
            let key = args[start..key_end].trim().to_string();
            chars.next().filter(|(_, c)| *c == '=')?;
            while chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
                chars.next();
            }
            let value = match chars.peek() {
                Some((_, '"' | '\'')) => read_py_string(&mut chars)?,
                _ => {
                    let mut value = String::new();
                    while let Some(&(_, c)) = chars.peek() {
                        if c == ',' {
                            break;
                        }
                        value.push(c);
                        chars.next();
                    }
                    value.trim().to_string()
                }
            };
            parsed.keywords.push((key, value));
        }

        while chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            None => break,
            Some((_, ',')) => continue,
            Some(_) => return None,
        }
    }
    Some(parsed)
}

fn read_py_string(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Option<String> {
    let (_, quote) = chars.next()?;
    let mut value = String::new();
    loop {
        let (_, c) = chars.next()?;
        match c {
            '\\' => {
                let (_, escaped) = chars.next()?;
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
            }
            c if c == quote => return Some(value),
            c => value.push(c),
        }
    }
}

/// Quote a string as a double-quoted Python literal
#[must_use]
pub fn py_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Quote a string as a JavaScript string literal
#[must_use]
pub fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Escape a value for use as a CSS identifier (`#id`)
#[must_use]
pub fn css_escape_ident(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        if c.is_ascii_digit() && i == 0 {
            out.push_str(&format!("\\{:x} ", c as u32));
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

/// Unescape a CSS identifier produced by [`css_escape_ident`]
#[must_use]
pub fn css_unescape_ident(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut hex = String::new();
        while let Some(&h) = chars.peek() {
            if h.is_ascii_hexdigit() && hex.len() < 6 {
                hex.push(h);
                chars.next();
            } else {
                break;
            }
        }
        if hex.is_empty() {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            if chars.peek() == Some(&' ') {
                chars.next();
            }
            if let Some(decoded) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                out.push(decoded);
            }
        }
    }
    out
}

/// JavaScript predicate over a text value. Non-exact matching is a
/// case-insensitive substring test on whitespace-normalised text.
fn text_test_js(expected: &str, exact: bool) -> String {
    let norm = "(s ?? '').replace(/\\s+/g, ' ').trim()";
    if exact {
        format!("(s => {norm} === {})", js_string(&normalize_text(expected)))
    } else {
        format!(
            "(s => {norm}.toLowerCase().includes({}))",
            js_string(&normalize_text(expected).to_lowercase())
        )
    }
}

/// Collapse whitespace runs and trim
#[must_use]
pub fn normalize_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text match with the semantics of the text and label queries
#[must_use]
pub fn text_matches(haystack: &str, expected: &str, exact: bool) -> bool {
    let haystack = normalize_text(haystack);
    let expected = normalize_text(expected);
    if exact {
        haystack == expected
    } else {
        haystack.to_lowercase().contains(&expected.to_lowercase())
    }
}

fn css_escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn implicit_role_selector(role: &str) -> Option<&'static str> {
    match role {
        "button" => Some("button, input[type=\"submit\"], input[type=\"button\"]"),
        "link" => Some("a[href]"),
        "textbox" => Some("input:not([type]), input[type=\"text\"], input[type=\"email\"], textarea"),
        "checkbox" => Some("input[type=\"checkbox\"]"),
        "radio" => Some("input[type=\"radio\"]"),
        "combobox" => Some("select"),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod render_tests {
        use super::*;

        #[test]
        fn test_id_renders_css_id() {
            let candidate = LocatorCandidate::new(Strategy::Id, "submit-btn");
            assert_eq!(render(&candidate), Selector::css("#submit-btn"));
            assert_eq!(render_code(&candidate), "page.locator(\"#submit-btn\")");
        }

        #[test]
        fn test_name_renders_attribute_selector() {
            let candidate = LocatorCandidate::new(Strategy::Name, "email");
            assert_eq!(render(&candidate).selector_text(), "[name=\"email\"]");
            assert_eq!(
                render_code(&candidate),
                "page.locator(\"[name=\\\"email\\\"]\")"
            );
        }

        #[test]
        fn test_css_and_xpath_render_as_given() {
            let css = LocatorCandidate::new(Strategy::Css, ".btn");
            assert_eq!(render_code(&css), "page.locator(\".btn\")");
            let xpath = LocatorCandidate::new(Strategy::XPath, "//a[@class='btn']");
            let selector = render(&xpath);
            assert_eq!(selector.kind(), SelectorKind::XPath);
            assert_eq!(selector.selector_text(), "xpath=//a[@class='btn']");
            assert_eq!(render_code(&xpath), "page.locator(\"//a[@class='btn']\")");
        }

        #[test]
        fn test_aria_label_renders_label_query() {
            let candidate = LocatorCandidate::new(Strategy::SemanticAriaLabel, "Close dialog");
            assert_eq!(render(&candidate), Selector::label("Close dialog"));
            assert_eq!(render_code(&candidate), "page.get_by_label(\"Close dialog\")");
        }

        #[test]
        fn test_clickable_role_carries_name_hint() {
            let candidate =
                LocatorCandidate::new(Strategy::SemanticRole, "button").with_name_hint("Submit");
            assert_eq!(
                render_code(&candidate),
                "page.get_by_role(\"button\", name=\"Submit\")"
            );
        }

        #[test]
        fn test_non_clickable_role_drops_hint() {
            let candidate =
                LocatorCandidate::new(Strategy::SemanticRole, "navigation").with_name_hint("Main");
            assert_eq!(render(&candidate), Selector::role("navigation", None));
            assert_eq!(render_code(&candidate), "page.get_by_role(\"navigation\")");
        }

        #[test]
        fn test_text_is_substring_match() {
            let candidate = LocatorCandidate::new(Strategy::Text, "Sign in");
            assert_eq!(
                render(&candidate),
                Selector::Text {
                    text: "Sign in".to_string(),
                    exact: false
                }
            );
            assert_eq!(render_code(&candidate), "page.get_by_text(\"Sign in\")");
        }

        #[test]
        fn test_quotes_are_escaped_in_code() {
            let candidate = LocatorCandidate::new(Strategy::Text, "Say \"hi\"");
            assert_eq!(render_code(&candidate), r#"page.get_by_text("Say \"hi\"")"#);
        }

        #[test]
        fn test_id_with_special_characters_is_escaped() {
            let candidate = LocatorCandidate::new(Strategy::Id, "user.name");
            assert_eq!(render(&candidate), Selector::css("#user\\.name"));
            let numeric = LocatorCandidate::new(Strategy::Id, "1st");
            assert_eq!(render(&numeric), Selector::css("#\\31 st"));
        }
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_inverts_render_for_every_strategy() {
            let candidates = [
                LocatorCandidate::new(Strategy::Id, "submit-btn"),
                LocatorCandidate::new(Strategy::Name, "email"),
                LocatorCandidate::new(Strategy::Css, ".btn"),
                LocatorCandidate::new(Strategy::XPath, "//button[@id='x']"),
                LocatorCandidate::new(Strategy::SemanticAriaLabel, "Search"),
                LocatorCandidate::new(Strategy::SemanticRole, "button").with_name_hint("Go"),
                LocatorCandidate::new(Strategy::Text, "It's \"quoted\""),
            ];
            for candidate in candidates {
                let parsed = parse_code_literal(&render_code(&candidate)).unwrap();
                assert_eq!(parsed.strategy, candidate.strategy);
                assert_eq!(parsed.selector, render(&candidate));
            }
        }

        #[test]
        fn test_parse_single_quoted_and_exact() {
            let parsed = parse_code_literal("page.get_by_text('Welcome', exact=True)").unwrap();
            assert_eq!(
                parsed.selector,
                Selector::Text {
                    text: "Welcome".to_string(),
                    exact: true
                }
            );
        }

        #[test]
        fn test_parse_xpath_prefix() {
            let parsed = parse_code_literal("page.locator(\"xpath=//div\")").unwrap();
            assert_eq!(parsed.strategy, Strategy::XPath);
            assert_eq!(parsed.selector, Selector::xpath("//div"));
        }

        #[test]
        fn test_parse_rejects_non_locator_code() {
            assert!(parse_code_literal("submit-btn").is_none());
            assert!(parse_code_literal("page.goto(\"https://example.com\")").is_none());
            assert!(parse_code_literal("page.locator(\"#a\"").is_none());
            assert!(parse_code_literal("page.locator(\"#a\" \"#b\")").is_none());
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_css_query() {
            let query = Selector::css("button.primary").to_query();
            assert!(query.contains("querySelectorAll"));
            assert!(query.contains("\"button.primary\""));
        }

        #[test]
        fn test_xpath_count_query() {
            let query = Selector::xpath("//button").to_count_query();
            assert!(query.contains("SNAPSHOT"));
            assert!(query.ends_with(".length"));
        }

        #[test]
        fn test_role_query_includes_implicit_tags() {
            let query = Selector::role("button", Some("Go".to_string())).to_all_query();
            assert!(query.contains("[role=\\\"button\\\"]"));
            assert!(query.contains("input[type=\\\"submit\\\"]"));
            assert!(query.contains("\"go\""));
        }

        #[test]
        fn test_lookup_script_catches_errors() {
            let script = Selector::css("#x").to_lookup_script();
            assert!(script.contains("try"));
            assert!(script.contains("catch"));
            assert!(script.contains("offsetWidth"));
        }
    }

    mod escape_tests {
        use super::*;

        #[test]
        fn test_css_ident_round_trip() {
            for id in ["plain", "user.name", "1st", "a:b", "naïve"] {
                assert_eq!(css_unescape_ident(&css_escape_ident(id)), id);
            }
        }

        #[test]
        fn test_text_matches() {
            assert!(text_matches("  Sign\n  in now ", "sign IN", false));
            assert!(!text_matches("Sign in now", "Sign in", true));
            assert!(text_matches(" Sign  in ", "Sign in", true));
        }

        #[test]
        fn test_clickable_roles() {
            assert!(is_clickable_role("button"));
            assert!(is_clickable_role("menuitemcheckbox"));
            assert!(!is_clickable_role("navigation"));
        }
    }
}
