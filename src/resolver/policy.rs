use crate::document::ElementSnapshot;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What actuating a resolved element should do, given its observed state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// The action has not happened yet: actuate
    Act,
    /// The action already happened: do nothing, report success
    Noop,
}

/// Where an element's state is read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateSource {
    /// Trimmed text content (e.g. a "Follow"/"Following" button label)
    Text,
    /// A named attribute (e.g. `aria-label` on a like toggle)
    Attribute(String),
}

/// Explicit mapping from an element's observed state to an action effect.
///
/// The policy plays two roles in one declaration:
/// - **Disambiguation**: during resolution, only elements whose observed
///   state appears in the map survive. A "Message" button next to "Follow"
///   is filtered out, not clicked.
/// - **Classification**: after resolution, the surviving state maps to
///   [`Effect::Act`] or [`Effect::Noop`], which is what makes repeated
///   actions idempotent.
///
/// States are matched exactly after trimming; undeclared states never
/// survive. Declaration order is preserved (and serialized) for stable
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePolicy {
    /// Where to read the state from
    pub source: StateSource,

    /// Declared state -> effect table
    pub states: IndexMap<String, Effect>,
}

impl StatePolicy {
    /// Policy reading state from element text
    pub fn on_text() -> Self {
        Self {
            source: StateSource::Text,
            states: IndexMap::new(),
        }
    }

    /// Policy reading state from a named attribute
    pub fn on_attribute(name: impl Into<String>) -> Self {
        Self {
            source: StateSource::Attribute(name.into()),
            states: IndexMap::new(),
        }
    }

    /// Builder method: declare a state and its effect
    pub fn state(mut self, state: impl Into<String>, effect: Effect) -> Self {
        self.states.insert(state.into(), effect);
        self
    }

    /// The observed state of a snapshot, per this policy's source
    pub fn observed_state<'a>(&self, snapshot: &'a ElementSnapshot) -> Option<&'a str> {
        match &self.source {
            StateSource::Text => Some(snapshot.text.trim()),
            StateSource::Attribute(name) => snapshot.attribute(name).map(str::trim),
        }
    }

    /// Whether a snapshot's observed state is declared (survives
    /// disambiguation)
    pub fn survives(&self, snapshot: &ElementSnapshot) -> bool {
        self.classify(snapshot).is_some()
    }

    /// Map a snapshot's observed state to its declared effect
    pub fn classify(&self, snapshot: &ElementSnapshot) -> Option<Effect> {
        let state = self.observed_state(snapshot)?;
        self.states.get(state).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn follow_policy() -> StatePolicy {
        StatePolicy::on_text()
            .state("Follow", Effect::Act)
            .state("Follow Back", Effect::Act)
            .state("Following", Effect::Noop)
            .state("Requested", Effect::Noop)
    }

    #[test]
    fn test_text_policy_classification() {
        let policy = follow_policy();

        assert_eq!(
            policy.classify(&ElementSnapshot::new("Follow")),
            Some(Effect::Act)
        );
        assert_eq!(
            policy.classify(&ElementSnapshot::new("Follow Back")),
            Some(Effect::Act)
        );
        assert_eq!(
            policy.classify(&ElementSnapshot::new("Following")),
            Some(Effect::Noop)
        );
        assert_eq!(
            policy.classify(&ElementSnapshot::new("Requested")),
            Some(Effect::Noop)
        );
    }

    #[test]
    fn test_undeclared_state_is_filtered_out() {
        let policy = follow_policy();

        assert!(!policy.survives(&ElementSnapshot::new("Message")));
        assert!(!policy.survives(&ElementSnapshot::new("")));
        assert!(policy.survives(&ElementSnapshot::new("Following")));
    }

    #[test]
    fn test_state_matching_trims_whitespace() {
        let policy = follow_policy();
        assert_eq!(
            policy.classify(&ElementSnapshot::new("  Follow \n")),
            Some(Effect::Act)
        );
    }

    #[test]
    fn test_attribute_policy() {
        let policy = StatePolicy::on_attribute("aria-label")
            .state("Like", Effect::Act)
            .state("Unlike", Effect::Noop);

        let like = ElementSnapshot::new("").with_attribute("aria-label", "Like");
        let unlike = ElementSnapshot::new("").with_attribute("aria-label", "Unlike");
        let share = ElementSnapshot::new("").with_attribute("aria-label", "Share");
        let bare = ElementSnapshot::new("");

        assert_eq!(policy.classify(&like), Some(Effect::Act));
        assert_eq!(policy.classify(&unlike), Some(Effect::Noop));
        assert_eq!(policy.classify(&share), None);
        // Missing attribute means no observable state at all
        assert_eq!(policy.classify(&bare), None);
    }

    #[test]
    fn test_policy_serialization_preserves_order() {
        let policy = follow_policy();
        let json = serde_json::to_string(&policy).unwrap();

        let follow_pos = json.find("\"Follow\"").unwrap();
        let following_pos = json.find("\"Following\"").unwrap();
        assert!(follow_pos < following_pos);

        let deserialized: StatePolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, deserialized);
    }
}
