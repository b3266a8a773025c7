//! CDP-backed implementation of the [`Document`] capability
//!
//! Wraps a live `headless_chrome` tab. One [`TabDocument`] is borrowed from
//! the session for the duration of a single action and discarded afterwards,
//! matching the snapshot lifecycle: the page can navigate or re-render
//! between actions, so handles must not survive the action that resolved
//! them.

use crate::document::{Document, ElementHandle, Selector};
use crate::error::DocumentError;
use headless_chrome::{Element, Tab};
use std::collections::HashMap;
use std::sync::Arc;

/// Map a `headless_chrome` query failure onto the document error taxonomy.
///
/// The backend reports everything as a stringly-typed error, so this is a
/// message heuristic: selector parse failures are skippable per strategy,
/// while a closed or detached target makes the whole document unusable.
fn classify_query_error(selector: &Selector, err: impl std::fmt::Display) -> DocumentError {
    let message = err.to_string();
    let lowered = message.to_lowercase();

    if lowered.contains("not a valid selector")
        || lowered.contains("failed to parse")
        || lowered.contains("invalid selector")
        || lowered.contains("syntax error")
    {
        DocumentError::MalformedSelector {
            selector: selector.query().to_string(),
            reason: message,
        }
    } else if lowered.contains("detached")
        || lowered.contains("target closed")
        || lowered.contains("connection closed")
        || lowered.contains("websocket")
    {
        DocumentError::Detached(message)
    } else {
        DocumentError::Backend(message)
    }
}

/// A queryable view over the active tab of a browser session
pub struct TabDocument<'a> {
    tab: &'a Arc<Tab>,
}

impl<'a> TabDocument<'a> {
    /// Borrow a document view from a tab
    pub fn new(tab: &'a Arc<Tab>) -> Self {
        Self { tab }
    }

    /// Current URL of the underlying tab
    pub fn url(&self) -> String {
        self.tab.get_url()
    }
}

impl<'a> Document for TabDocument<'a> {
    type Handle = CdpElement<'a>;

    fn query(&self, selector: &Selector) -> Result<Vec<Self::Handle>, DocumentError> {
        let elements = match selector {
            Selector::Css(query) => self.tab.find_elements(query),
            Selector::XPath(query) => self.tab.find_elements_by_xpath(query),
        };

        match elements {
            Ok(found) => Ok(found.into_iter().map(CdpElement::new).collect()),
            Err(e) => {
                // headless_chrome reports "no element found" as an error for
                // some query paths; the resolver treats that as zero matches,
                // not as a fault.
                let message = e.to_string().to_lowercase();
                if message.contains("no element") || message.contains("no node") {
                    return Ok(Vec::new());
                }
                Err(classify_query_error(selector, e))
            }
        }
    }
}

/// An element handle backed by a live CDP node
pub struct CdpElement<'a> {
    element: Element<'a>,
}

impl<'a> CdpElement<'a> {
    fn new(element: Element<'a>) -> Self {
        Self { element }
    }

    /// The underlying `headless_chrome` element
    pub fn inner(&self) -> &Element<'a> {
        &self.element
    }
}

impl ElementHandle for CdpElement<'_> {
    fn text(&self) -> Result<String, DocumentError> {
        self.element
            .get_inner_text()
            .map_err(|e| DocumentError::Backend(format!("Failed to read element text: {}", e)))
    }

    fn attributes(&self) -> Result<HashMap<String, String>, DocumentError> {
        // CDP returns attributes as a flat [name, value, name, value, ...]
        // list.
        let flat = self
            .element
            .get_attributes()
            .map_err(|e| DocumentError::Backend(format!("Failed to read attributes: {}", e)))?
            .unwrap_or_default();

        let mut attributes = HashMap::with_capacity(flat.len() / 2);
        let mut pairs = flat.into_iter();
        while let (Some(name), Some(value)) = (pairs.next(), pairs.next()) {
            attributes.insert(name, value);
        }
        Ok(attributes)
    }

    fn click(&self) -> Result<(), DocumentError> {
        self.element
            .click()
            .map(|_| ())
            .map_err(|e| DocumentError::Backend(format!("Click failed: {}", e)))
    }

    fn fill(&self, value: &str) -> Result<(), DocumentError> {
        self.element
            .click()
            .map_err(|e| DocumentError::Backend(format!("Focus before fill failed: {}", e)))?;
        self.element
            .type_into(value)
            .map(|_| ())
            .map_err(|e| DocumentError::Backend(format!("Fill failed: {}", e)))
    }
}
