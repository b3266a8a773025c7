use crate::document::{Document, ElementHandle};
use crate::error::{AutomationError, Result};
use crate::resolver::{Effect, Goal, Outcome, ResolutionRecord, Resolver, TransientCause};
use serde::Serialize;

/// What to do with a resolved element
#[derive(Debug, Clone, PartialEq)]
pub enum Actuation {
    /// Click the element
    Click,
    /// Type a value into the element (value is held in memory only)
    Fill(String),
}

/// How a single action against one goal ended.
///
/// `Performed` and `AlreadyDone` are the two success shapes: the second is
/// what makes repeated actions idempotent. The failure shapes mirror the
/// resolution outcome taxonomy; none of them is an error by itself, the
/// caller decides what aborts a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionStatus {
    /// The element was resolved, classified as actionable, and actuated
    Performed { strategy_index: usize },

    /// The element was resolved but its state says the action already
    /// happened; nothing was actuated
    AlreadyDone { state: String },

    /// No strategy produced a surviving match
    NotFound,

    /// More than one candidate survived; refused to pick one
    Ambiguous { candidates: usize },

    /// Retryable failure (timeout, cancellation, vanished document)
    TransientFailure { cause: TransientCause },
}

impl ActionStatus {
    /// Whether the action ended in a success shape
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ActionStatus::Performed { .. } | ActionStatus::AlreadyDone { .. }
        )
    }

    /// Whether a repeat attempt could change the answer
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ActionStatus::TransientFailure { cause } if *cause != TransientCause::Cancelled
        )
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionStatus::Performed { strategy_index } => {
                write!(f, "performed (strategy #{})", strategy_index)
            }
            ActionStatus::AlreadyDone { state } => write!(f, "already done (state '{}')", state),
            ActionStatus::NotFound => write!(f, "not found"),
            ActionStatus::Ambiguous { candidates } => {
                write!(f, "ambiguous ({} candidates)", candidates)
            }
            ActionStatus::TransientFailure { cause } => write!(f, "transient failure: {}", cause),
        }
    }
}

/// Status of one action plus the full resolution trail behind it
#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
    pub status: ActionStatus,
    pub resolution: ResolutionRecord,
}

/// Resolve a goal and, when its state calls for it, actuate the resolved
/// element.
///
/// Resolution and actuation stay two distinct steps: nothing is clicked or
/// filled unless exactly one element survived disambiguation, and a policy
/// classifying the state as [`Effect::Noop`] short-circuits into
/// [`ActionStatus::AlreadyDone`]. Only a failing actuation on a correctly
/// resolved element is a hard error.
pub fn perform<D: Document>(
    resolver: &Resolver,
    document: &D,
    goal: &Goal,
    actuation: &Actuation,
) -> Result<ActionReport> {
    let resolution = resolver.resolve(goal, document);
    let record = resolution.record();

    let status = match resolution.outcome {
        Outcome::Resolved(element) => {
            let effect = match goal.policy() {
                Some(policy) => policy.classify(&element.snapshot).unwrap_or(Effect::Act),
                None => Effect::Act,
            };

            match effect {
                Effect::Noop => {
                    let state = goal
                        .policy()
                        .and_then(|p| p.observed_state(&element.snapshot))
                        .unwrap_or(element.snapshot.text.as_str())
                        .to_string();
                    log::info!("goal '{}': already done, state '{}'", goal.name(), state);
                    ActionStatus::AlreadyDone { state }
                }
                Effect::Act => {
                    let actuated = match actuation {
                        Actuation::Click => element.handle.click(),
                        Actuation::Fill(value) => element.handle.fill(value),
                    };
                    actuated.map_err(|e| AutomationError::ActuationFailed {
                        goal: goal.name().to_string(),
                        reason: e.to_string(),
                    })?;
                    ActionStatus::Performed {
                        strategy_index: element.strategy_index,
                    }
                }
            }
        }
        Outcome::NotFound => ActionStatus::NotFound,
        Outcome::Ambiguous(candidates) => ActionStatus::Ambiguous {
            candidates: candidates.len(),
        },
        Outcome::Transient(cause) => ActionStatus::TransientFailure { cause },
    };

    Ok(ActionReport {
        status,
        resolution: record,
    })
}
