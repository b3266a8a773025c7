//! Resilient semantic element resolution
//!
//! The core of the crate: given a [`Goal`] (a semantic label plus a ranked,
//! non-empty list of [`Strategy`] candidates and an optional [`StatePolicy`]),
//! the [`Resolver`] tries each strategy in order against a live
//! [`crate::document::Document`] and yields a typed [`Outcome`]:
//! - `Resolved` when exactly one element survives disambiguation
//! - `NotFound` when every strategy is exhausted
//! - `Ambiguous` when several elements survive (never auto-picked)
//! - `Transient` on timeout, cancellation, or a vanished document
//!
//! Resolution is read-only; actuation on the resolved handle is a separate,
//! explicit caller step (see [`crate::workflow`]).

pub mod engine;
pub mod goal;
pub mod outcome;
pub mod policy;

pub use engine::{CancelToken, DEFAULT_TIMEOUT, Resolver};
pub use goal::{Goal, Strategy};
pub use outcome::{
    AttemptResult, Outcome, OutcomeRecord, Resolution, ResolutionRecord, ResolvedElement,
    StrategyAttempt, TransientCause,
};
pub use policy::{Effect, StatePolicy, StateSource};
