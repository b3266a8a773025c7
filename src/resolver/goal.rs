use crate::document::{ElementSnapshot, Selector};
use crate::resolver::policy::StatePolicy;
use serde::Serialize;

/// One concrete way to locate an element for a goal.
///
/// Strategies are tried in list order; position in the goal's list is the
/// confidence rank. The optional text filter narrows matches the way
/// Playwright-style `:has-text()` queries do, which plain CSS cannot
/// express.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strategy {
    /// Query to issue against the document
    pub selector: Selector,

    /// Keep only matches whose trimmed text contains this fragment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_contains: Option<String>,
}

impl Strategy {
    /// Strategy from a CSS selector
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            selector: Selector::css(selector),
            text_contains: None,
        }
    }

    /// Strategy from an XPath expression
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self {
            selector: Selector::xpath(expression),
            text_contains: None,
        }
    }

    /// Builder method: require the element text to contain a fragment
    pub fn with_text(mut self, fragment: impl Into<String>) -> Self {
        self.text_contains = Some(fragment.into());
        self
    }

    /// Whether a snapshot passes this strategy's text filter
    pub fn matches_text(&self, snapshot: &ElementSnapshot) -> bool {
        match &self.text_contains {
            Some(fragment) => snapshot.text.contains(fragment.as_str()),
            None => true,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.text_contains {
            Some(fragment) => write!(f, "{} [text~=\"{}\"]", self.selector, fragment),
            None => write!(f, "{}", self.selector),
        }
    }
}

/// The semantic intent behind a lookup, independent of any one strategy.
///
/// A goal carries a non-empty, ordered strategy list (non-emptiness is
/// guaranteed by construction) and an optional state policy used both to
/// disambiguate matches and to classify the resolved element's state. The
/// resolver never reorders the list.
#[derive(Debug, Clone, Serialize)]
pub struct Goal {
    name: String,
    strategies: Vec<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    policy: Option<StatePolicy>,
}

impl Goal {
    /// Create a goal with its highest-confidence strategy
    pub fn new(name: impl Into<String>, first: Strategy) -> Self {
        Self {
            name: name.into(),
            strategies: vec![first],
            policy: None,
        }
    }

    /// Builder method: append a lower-ranked fallback strategy
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Builder method: attach a disambiguation/classification policy
    pub fn with_policy(mut self, policy: StatePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Semantic label of this goal
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered strategy list, highest confidence first
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Attached state policy, if any
    pub fn policy(&self) -> Option<&StatePolicy> {
        self.policy.as_ref()
    }
}
