//! Scripted document fixtures for resolver and workflow tests.
//!
//! `FakeDocument` maps exact selector strings to canned elements, declared
//! failures, or artificial latency. `FakeElement` shares its node state
//! across cloned handles so a click can transition the text or an attribute
//! the way a real page flips "Follow" to "Following".

// Not every fixture helper is used by every test binary.
#![allow(dead_code)]

use element_resolve::{Document, DocumentError, ElementHandle, Selector};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Route resolver logs into the test harness output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug)]
struct FakeNode {
    text: String,
    attributes: HashMap<String, String>,
    clicks: u32,
    fills: Vec<String>,
    text_after_click: Option<String>,
    attribute_after_click: Option<(String, String)>,
}

/// An element handle backed by shared, mutable node state
#[derive(Debug, Clone)]
pub struct FakeElement {
    node: Rc<RefCell<FakeNode>>,
}

impl FakeElement {
    pub fn new(text: &str) -> Self {
        Self {
            node: Rc::new(RefCell::new(FakeNode {
                text: text.to_string(),
                attributes: HashMap::new(),
                clicks: 0,
                fills: Vec::new(),
                text_after_click: None,
                attribute_after_click: None,
            })),
        }
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.node
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Declare the text the element shows after being clicked
    pub fn text_transitions_to(self, text: &str) -> Self {
        self.node.borrow_mut().text_after_click = Some(text.to_string());
        self
    }

    /// Declare the attribute value the element carries after being clicked
    pub fn attribute_transitions_to(self, name: &str, value: &str) -> Self {
        self.node.borrow_mut().attribute_after_click = Some((name.to_string(), value.to_string()));
        self
    }

    pub fn clicks(&self) -> u32 {
        self.node.borrow().clicks
    }

    pub fn fills(&self) -> Vec<String> {
        self.node.borrow().fills.clone()
    }
}

impl ElementHandle for FakeElement {
    fn text(&self) -> Result<String, DocumentError> {
        Ok(self.node.borrow().text.clone())
    }

    fn attributes(&self) -> Result<HashMap<String, String>, DocumentError> {
        Ok(self.node.borrow().attributes.clone())
    }

    fn click(&self) -> Result<(), DocumentError> {
        let mut node = self.node.borrow_mut();
        node.clicks += 1;
        if let Some(text) = node.text_after_click.take() {
            node.text = text;
        }
        if let Some((name, value)) = node.attribute_after_click.take() {
            node.attributes.insert(name, value);
        }
        Ok(())
    }

    fn fill(&self, value: &str) -> Result<(), DocumentError> {
        self.node.borrow_mut().fills.push(value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum FakeFailure {
    Malformed(String),
    Detached(String),
}

/// A scripted document keyed by exact selector strings
#[derive(Default)]
pub struct FakeDocument {
    elements: HashMap<String, Vec<FakeElement>>,
    failures: RefCell<HashMap<String, FakeFailure>>,
    once_failures: RefCell<HashMap<String, FakeFailure>>,
    latency: HashMap<String, Duration>,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, selector: &str, elements: Vec<FakeElement>) -> Self {
        self.elements.insert(selector.to_string(), elements);
        self
    }

    /// Every query for this selector fails as a malformed selector
    pub fn malformed(self, selector: &str) -> Self {
        self.failures.borrow_mut().insert(
            selector.to_string(),
            FakeFailure::Malformed("not a valid selector".to_string()),
        );
        self
    }

    /// Every query for this selector reports the document as detached
    pub fn detached(self, selector: &str, reason: &str) -> Self {
        self.failures.borrow_mut().insert(
            selector.to_string(),
            FakeFailure::Detached(reason.to_string()),
        );
        self
    }

    /// Only the first query for this selector reports the document as
    /// detached; later queries behave normally
    pub fn detached_once(self, selector: &str, reason: &str) -> Self {
        self.once_failures.borrow_mut().insert(
            selector.to_string(),
            FakeFailure::Detached(reason.to_string()),
        );
        self
    }

    /// Every query for this selector blocks for the given duration first
    pub fn slow(mut self, selector: &str, latency: Duration) -> Self {
        self.latency.insert(selector.to_string(), latency);
        self
    }
}

fn to_error(selector: &str, failure: FakeFailure) -> DocumentError {
    match failure {
        FakeFailure::Malformed(reason) => DocumentError::MalformedSelector {
            selector: selector.to_string(),
            reason,
        },
        FakeFailure::Detached(reason) => DocumentError::Detached(reason),
    }
}

impl Document for FakeDocument {
    type Handle = FakeElement;

    fn query(&self, selector: &Selector) -> Result<Vec<FakeElement>, DocumentError> {
        let query = selector.query();

        if let Some(latency) = self.latency.get(query) {
            std::thread::sleep(*latency);
        }
        if let Some(failure) = self.once_failures.borrow_mut().remove(query) {
            return Err(to_error(query, failure));
        }
        if let Some(failure) = self.failures.borrow().get(query) {
            return Err(to_error(query, failure.clone()));
        }

        Ok(self.elements.get(query).cloned().unwrap_or_default())
    }
}
