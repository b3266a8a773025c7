use crate::document::ElementSnapshot;
use serde::Serialize;
use std::time::Duration;

/// Why a resolution failed in a retryable way
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum TransientCause {
    /// The wall-clock budget for the whole resolution elapsed
    Timeout { budget: Duration },
    /// The caller cancelled the resolution
    Cancelled,
    /// The document went away mid-resolution (navigation, closed tab)
    DocumentGone { reason: String },
}

impl std::fmt::Display for TransientCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransientCause::Timeout { budget } => {
                write!(f, "timed out after budget of {:?}", budget)
            }
            TransientCause::Cancelled => write!(f, "cancelled"),
            TransientCause::DocumentGone { reason } => write!(f, "document gone: {}", reason),
        }
    }
}

/// A successfully located element: the live handle plus what was observed
/// about it at resolution time.
#[derive(Debug)]
pub struct ResolvedElement<H> {
    /// Live handle, valid only for the current action
    pub handle: H,

    /// Text and attributes captured at resolution time
    pub snapshot: ElementSnapshot,

    /// Rank of the strategy that found it (0 = highest confidence)
    pub strategy_index: usize,
}

/// Result of resolving one goal against one document
#[derive(Debug)]
pub enum Outcome<H> {
    /// Exactly one element survived disambiguation
    Resolved(ResolvedElement<H>),

    /// Every strategy was exhausted with no surviving match
    NotFound,

    /// More than one element survived disambiguation; never auto-picked
    Ambiguous(Vec<ElementSnapshot>),

    /// Retryable failure; the resolver itself never retries
    Transient(TransientCause),
}

impl<H> Outcome<H> {
    /// Whether this outcome carries a resolved element
    pub fn is_resolved(&self) -> bool {
        matches!(self, Outcome::Resolved(_))
    }
}

/// How a single strategy attempt ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AttemptResult {
    /// Query matched and disambiguation kept `surviving` of `matched`
    Matched { matched: usize, surviving: usize },

    /// Query returned zero elements
    NoMatch,

    /// Query matched but text filter / policy rejected everything
    FilteredOut { matched: usize },

    /// Query itself failed; recorded and skipped
    QueryFailed { error: String },

    /// Never attempted (budget exhausted or cancelled first)
    Skipped,
}

/// One entry in the per-goal attempt trail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyAttempt {
    /// Rank of the strategy in the goal's list
    pub index: usize,

    /// Human-readable strategy description
    pub strategy: String,

    /// How the attempt ended
    pub result: AttemptResult,
}

/// Complete record of one resolution: the outcome plus everything needed to
/// diagnose selector drift (which goal, which strategy index succeeded,
/// what each strategy saw, elapsed time).
#[derive(Debug)]
pub struct Resolution<H> {
    /// Goal label this resolution was for
    pub goal: String,

    /// Final outcome
    pub outcome: Outcome<H>,

    /// Per-strategy trail, in rank order
    pub attempts: Vec<StrategyAttempt>,

    /// Wall-clock time spent resolving
    pub elapsed: Duration,
}

/// Serializable view of a [`Resolution`], with the live handle dropped
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionRecord {
    pub goal: String,
    pub outcome: OutcomeRecord,
    pub attempts: Vec<StrategyAttempt>,
    pub elapsed: Duration,
}

/// Serializable outcome variant for reports and logs
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OutcomeRecord {
    Resolved {
        strategy_index: usize,
        snapshot: ElementSnapshot,
    },
    NotFound,
    Ambiguous {
        candidates: Vec<ElementSnapshot>,
    },
    Transient {
        #[serde(flatten)]
        cause: TransientCause,
    },
}

impl<H> Resolution<H> {
    /// Borrow the resolved element, if any
    pub fn resolved(&self) -> Option<&ResolvedElement<H>> {
        match &self.outcome {
            Outcome::Resolved(element) => Some(element),
            _ => None,
        }
    }

    /// Build the serializable record of this resolution
    pub fn record(&self) -> ResolutionRecord {
        let outcome = match &self.outcome {
            Outcome::Resolved(element) => OutcomeRecord::Resolved {
                strategy_index: element.strategy_index,
                snapshot: element.snapshot.clone(),
            },
            Outcome::NotFound => OutcomeRecord::NotFound,
            Outcome::Ambiguous(candidates) => OutcomeRecord::Ambiguous {
                candidates: candidates.clone(),
            },
            Outcome::Transient(cause) => OutcomeRecord::Transient {
                cause: cause.clone(),
            },
        };

        ResolutionRecord {
            goal: self.goal.clone(),
            outcome,
            attempts: self.attempts.clone(),
            elapsed: self.elapsed,
        }
    }

    /// Export the resolution record as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        self.record().to_json()
    }
}

impl ResolutionRecord {
    /// Export the record as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
