//! # element-resolve
//!
//! Resilient, strategy-ranked element resolution for browser automation via
//! Chrome DevTools Protocol (CDP), with an idempotent social-action workflow
//! layer.
//!
//! ## Features
//!
//! - **Resolver**: a semantic [`Goal`] carries an ordered list of candidate
//!   [`Strategy`] queries; the [`Resolver`] tries them in rank order against
//!   a live document and yields a typed [`Outcome`] instead of a guess
//! - **State policies**: explicit state→effect tables ([`StatePolicy`])
//!   disambiguate lookalike controls ("Follow" vs "Message") and classify
//!   already-done states ("Following", "Unlike") as no-ops
//! - **Refuse-on-ambiguity**: two surviving candidates end the resolution as
//!   [`Outcome::Ambiguous`]; the wrong element is never clicked
//! - **Workflow**: login → navigate → resolve → actuate as a strictly
//!   sequential pipeline with caller-owned retry/backoff and serializable
//!   run reports
//!
//! ## Resolving a goal
//!
//! ```rust,no_run
//! use element_resolve::{BrowserSession, LaunchOptions, Resolver};
//! use element_resolve::{Effect, Goal, StatePolicy, Strategy};
//!
//! # fn main() -> element_resolve::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://www.instagram.com/rustlang/")?;
//!
//! let goal = Goal::new("follow-button", Strategy::css("header section button"))
//!     .strategy(Strategy::css("header button"))
//!     .with_policy(
//!         StatePolicy::on_text()
//!             .state("Follow", Effect::Act)
//!             .state("Following", Effect::Noop),
//!     );
//!
//! // Handles borrow the tab, so reduce the resolution to its owned record
//! // before it leaves the document view.
//! let resolver = Resolver::default();
//! let record = session.with_document(|doc| resolver.resolve(&goal, doc).record())?;
//! println!("{}", record.to_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Running the workflow
//!
//! ```rust,no_run
//! use element_resolve::workflow::{Credentials, Workflow, WorkflowConfig};
//!
//! # fn main() -> element_resolve::Result<()> {
//! let workflow = Workflow::launch(WorkflowConfig::default())?;
//! workflow.login(&Credentials::new("me", "secret"))?;
//!
//! let report = workflow.run(&["rustlang"], true)?;
//! println!("{}", report.to_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`resolver`]: goals, strategies, state policies, and the resolution
//!   engine (start here)
//! - [`document`]: the queryable document capability and its CDP-backed
//!   implementation
//! - [`browser`]: browser session management and configuration
//! - [`workflow`]: the sequential action pipeline, retry policy, and run
//!   reports
//! - [`catalog`]: ready-made Instagram goal definitions
//! - [`error`]: error types and result alias

pub mod browser;
pub mod catalog;
pub mod document;
pub mod error;
pub mod resolver;
pub mod workflow;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use document::{Document, ElementHandle, ElementSnapshot, Selector, TabDocument};
pub use error::{AutomationError, DocumentError, Result};
pub use resolver::{
    CancelToken, Effect, Goal, Outcome, Resolution, Resolver, StatePolicy, Strategy,
    TransientCause,
};
pub use workflow::{ActionReport, ActionStatus, RetryPolicy, RunReport, Workflow};
