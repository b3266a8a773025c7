use crate::document::{Document, ElementSnapshot};
use crate::error::DocumentError;
use crate::resolver::goal::{Goal, Strategy};
use crate::resolver::outcome::{
    AttemptResult, Outcome, Resolution, ResolvedElement, StrategyAttempt, TransientCause,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Default wall-clock budget for one whole resolution
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Cooperative cancellation handle.
///
/// Checked between strategies: cancelling aborts the current resolution at
/// the next strategy boundary instead of completing the queued strategies.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, un-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// How one strategy attempt advances the resolution
enum StrategyStep<H> {
    Finished(Outcome<H>, AttemptResult),
    Continue(AttemptResult),
    Abort(TransientCause, AttemptResult),
}

/// Resolves semantic goals against a document by trying ranked strategies
/// in order.
///
/// The resolver is stateless across calls and never mutates the document;
/// it only queries and reads. Strategies are tried strictly sequentially
/// (a live document can race with navigation/re-render, so there is no
/// speculative parallel querying), first unambiguous match wins, and the
/// whole resolution shares a single wall-clock budget.
#[derive(Debug, Clone)]
pub struct Resolver {
    timeout: Duration,
    cancel: Option<CancelToken>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Resolver {
    /// Create a resolver with a wall-clock budget per resolution
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            cancel: None,
        }
    }

    /// Builder method: observe a cancellation token between strategies
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The configured per-resolution budget
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Resolve a goal against a document.
    ///
    /// Tries each strategy in rank order. A strategy whose query fails is
    /// recorded and skipped; a strategy with zero surviving matches lets the
    /// next, broader strategy run. Exactly one survivor resolves the goal;
    /// two or more end it as [`Outcome::Ambiguous`] immediately. Budget
    /// expiry or cancellation abandons the remaining strategies with a
    /// [`Outcome::Transient`] outcome.
    pub fn resolve<D: Document>(&self, goal: &Goal, document: &D) -> Resolution<D::Handle> {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let strategies = goal.strategies();
        let mut attempts: Vec<StrategyAttempt> = Vec::with_capacity(strategies.len());
        let mut outcome: Option<Outcome<D::Handle>> = None;

        for (index, strategy) in strategies.iter().enumerate() {
            if self.is_cancelled() {
                Self::record_skipped(&mut attempts, strategies, index);
                outcome = Some(Outcome::Transient(TransientCause::Cancelled));
                break;
            }

            if Instant::now() >= deadline {
                Self::record_skipped(&mut attempts, strategies, index);
                outcome = Some(Outcome::Transient(TransientCause::Timeout {
                    budget: self.timeout,
                }));
                break;
            }

            log::debug!(
                "goal '{}': trying strategy #{} ({})",
                goal.name(),
                index,
                strategy
            );

            match Self::try_strategy(goal, index, strategy, document) {
                StrategyStep::Finished(found, result) => {
                    attempts.push(StrategyAttempt {
                        index,
                        strategy: strategy.to_string(),
                        result,
                    });
                    outcome = Some(found);
                    break;
                }
                StrategyStep::Continue(result) => {
                    attempts.push(StrategyAttempt {
                        index,
                        strategy: strategy.to_string(),
                        result,
                    });
                }
                StrategyStep::Abort(cause, result) => {
                    attempts.push(StrategyAttempt {
                        index,
                        strategy: strategy.to_string(),
                        result,
                    });
                    Self::record_skipped(&mut attempts, strategies, index + 1);
                    outcome = Some(Outcome::Transient(cause));
                    break;
                }
            }
        }

        let outcome = outcome.unwrap_or(Outcome::NotFound);
        let elapsed = started.elapsed();

        match &outcome {
            Outcome::Resolved(element) => log::info!(
                "goal '{}': resolved by strategy #{} in {:?} (state: '{}')",
                goal.name(),
                element.strategy_index,
                elapsed,
                element.snapshot.text
            ),
            Outcome::NotFound => {
                log::info!("goal '{}': not found after {:?}", goal.name(), elapsed)
            }
            Outcome::Ambiguous(candidates) => log::warn!(
                "goal '{}': ambiguous, {} surviving candidates",
                goal.name(),
                candidates.len()
            ),
            Outcome::Transient(cause) => {
                log::warn!("goal '{}': transient failure: {}", goal.name(), cause)
            }
        }

        Resolution {
            goal: goal.name().to_string(),
            outcome,
            attempts,
            elapsed,
        }
    }

    fn try_strategy<D: Document>(
        goal: &Goal,
        index: usize,
        strategy: &Strategy,
        document: &D,
    ) -> StrategyStep<D::Handle> {
        let handles = match document.query(&strategy.selector) {
            Ok(handles) => handles,
            Err(DocumentError::Detached(reason)) => {
                return StrategyStep::Abort(
                    TransientCause::DocumentGone {
                        reason: reason.clone(),
                    },
                    AttemptResult::QueryFailed { error: reason },
                );
            }
            Err(e) => {
                // One bad strategy never aborts the goal.
                log::warn!(
                    "goal '{}': strategy #{} query failed, skipping: {}",
                    goal.name(),
                    index,
                    e
                );
                return StrategyStep::Continue(AttemptResult::QueryFailed {
                    error: e.to_string(),
                });
            }
        };

        let matched = handles.len();
        if matched == 0 {
            return StrategyStep::Continue(AttemptResult::NoMatch);
        }

        let mut survivors: Vec<(D::Handle, ElementSnapshot)> = Vec::new();
        for handle in handles {
            let snapshot = match ElementSnapshot::capture(&handle) {
                Ok(snapshot) => snapshot,
                Err(DocumentError::Detached(reason)) => {
                    return StrategyStep::Abort(
                        TransientCause::DocumentGone {
                            reason: reason.clone(),
                        },
                        AttemptResult::QueryFailed { error: reason },
                    );
                }
                Err(e) => {
                    // A partially readable match set is not trustworthy:
                    // picking among the readable ones could silently target
                    // the wrong element.
                    log::warn!(
                        "goal '{}': strategy #{} element read failed, skipping strategy: {}",
                        goal.name(),
                        index,
                        e
                    );
                    return StrategyStep::Continue(AttemptResult::QueryFailed {
                        error: e.to_string(),
                    });
                }
            };

            if !strategy.matches_text(&snapshot) {
                continue;
            }
            if let Some(policy) = goal.policy() {
                if !policy.survives(&snapshot) {
                    continue;
                }
            }
            survivors.push((handle, snapshot));
        }

        match survivors.len() {
            0 => StrategyStep::Continue(AttemptResult::FilteredOut { matched }),
            1 => {
                // survivors holds exactly one entry here
                let Some((handle, snapshot)) = survivors.pop() else {
                    return StrategyStep::Continue(AttemptResult::FilteredOut { matched });
                };
                StrategyStep::Finished(
                    Outcome::Resolved(ResolvedElement {
                        handle,
                        snapshot,
                        strategy_index: index,
                    }),
                    AttemptResult::Matched {
                        matched,
                        surviving: 1,
                    },
                )
            }
            surviving => StrategyStep::Finished(
                Outcome::Ambiguous(
                    survivors
                        .into_iter()
                        .map(|(_, snapshot)| snapshot)
                        .collect(),
                ),
                AttemptResult::Matched { matched, surviving },
            ),
        }
    }

    fn record_skipped(attempts: &mut Vec<StrategyAttempt>, strategies: &[Strategy], from: usize) {
        for (index, strategy) in strategies.iter().enumerate().skip(from) {
            attempts.push(StrategyAttempt {
                index,
                strategy: strategy.to_string(),
                result: AttemptResult::Skipped,
            });
        }
    }
}
