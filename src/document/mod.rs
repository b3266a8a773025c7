//! Document capability consumed by the resolver
//!
//! The resolver never talks to a browser directly. It queries an abstract
//! [`Document`] that yields [`ElementHandle`]s, so the same resolution loop
//! runs against a live CDP tab ([`cdp::TabDocument`]) or a scripted fixture
//! in tests. The capability is deliberately narrow:
//! - `query(selector)` returns zero or more handles, or a [`DocumentError`]
//! - a handle exposes its text, its attributes, and the two actuation
//!   primitives (`click`, `fill`)
//!
//! Actuation is invoked only by callers holding an unambiguously resolved
//! handle; resolution itself never mutates the document.

pub mod cdp;

pub use cdp::TabDocument;

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single concrete query against a document.
///
/// CSS is the primary form; XPath is kept as an alternative for targets that
/// CSS cannot reach (e.g. text-anchored ancestors).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "query", rename_all = "lowercase")]
pub enum Selector {
    /// CSS selector, evaluated with `querySelectorAll` semantics
    Css(String),
    /// XPath expression
    XPath(String),
}

impl Selector {
    /// Create a CSS selector
    pub fn css(selector: impl Into<String>) -> Self {
        Selector::Css(selector.into())
    }

    /// Create an XPath selector
    pub fn xpath(expression: impl Into<String>) -> Self {
        Selector::XPath(expression.into())
    }

    /// The raw query string
    pub fn query(&self) -> &str {
        match self {
            Selector::Css(q) | Selector::XPath(q) => q,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Css(q) => write!(f, "css:{}", q),
            Selector::XPath(q) => write!(f, "xpath:{}", q),
        }
    }
}

/// A located element in a live document.
///
/// Handles are only valid for the current action; the document can mutate
/// between steps (navigation, re-render), so they must never be stored.
pub trait ElementHandle {
    /// Visible text content of the element
    fn text(&self) -> std::result::Result<String, DocumentError>;

    /// All attributes of the element at read time
    fn attributes(&self) -> std::result::Result<HashMap<String, String>, DocumentError>;

    /// Single attribute lookup
    fn attribute(&self, name: &str) -> std::result::Result<Option<String>, DocumentError> {
        Ok(self.attributes()?.remove(name))
    }

    /// Click the element. Actuation primitive, caller-invoked only.
    fn click(&self) -> std::result::Result<(), DocumentError>;

    /// Type a value into the element. Actuation primitive, caller-invoked only.
    fn fill(&self, value: &str) -> std::result::Result<(), DocumentError>;
}

/// A live, queryable document snapshot supplied by the browser collaborator
pub trait Document {
    type Handle: ElementHandle;

    /// Run a query and return every matching element (possibly none)
    fn query(&self, selector: &Selector) -> std::result::Result<Vec<Self::Handle>, DocumentError>;
}

/// Text and attributes of an element captured at resolution time.
///
/// Snapshots outlive the handle they were taken from and are what reports
/// and `Ambiguous` outcomes carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Extracted text content, whitespace-trimmed
    pub text: String,

    /// Attribute map at resolution time
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl ElementSnapshot {
    /// Capture a snapshot from a live handle
    pub fn capture<H: ElementHandle>(handle: &H) -> std::result::Result<Self, DocumentError> {
        Ok(Self {
            text: handle.text()?.trim().to_string(),
            attributes: handle.attributes()?,
        })
    }

    /// Build a snapshot from parts (fixtures, tests)
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: HashMap::new(),
        }
    }

    /// Builder method: add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attribute lookup
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_constructors() {
        let css = Selector::css("button[type='submit']");
        assert_eq!(css.query(), "button[type='submit']");
        assert_eq!(css.to_string(), "css:button[type='submit']");

        let xpath = Selector::xpath("//button[text()='Follow']");
        assert_eq!(xpath.query(), "//button[text()='Follow']");
        assert_eq!(xpath.to_string(), "xpath://button[text()='Follow']");
    }

    #[test]
    fn test_selector_serialization() {
        let selector = Selector::css("header button");
        let json = serde_json::to_string(&selector).unwrap();
        assert!(json.contains("\"kind\":\"css\""));

        let deserialized: Selector = serde_json::from_str(&json).unwrap();
        assert_eq!(selector, deserialized);
    }

    #[test]
    fn test_snapshot_builder() {
        let snapshot = ElementSnapshot::new("Follow").with_attribute("aria-label", "Follow");

        assert_eq!(snapshot.text, "Follow");
        assert_eq!(snapshot.attribute("aria-label"), Some("Follow"));
        assert_eq!(snapshot.attribute("role"), None);
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = ElementSnapshot::new("Following").with_attribute("type", "button");

        let json = serde_json::to_string(&snapshot).unwrap();
        let deserialized: ElementSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, deserialized);
    }
}
