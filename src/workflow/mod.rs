//! Linear action pipeline over one browser session
//!
//! The caller layer the resolver reports to: login, then per target
//! navigate → resolve → actuate, strictly one action and one target at a
//! time. The workflow owns the retry policy (the resolver never hides
//! retries) and decides what is fatal: only login failing after all retries
//! aborts a run, everything else degrades and lands in the
//! [`report::RunReport`].

pub mod actions;
pub mod report;
pub mod retry;

pub use actions::{ActionReport, ActionStatus, Actuation};
pub use report::{RunReport, TargetReport};
pub use retry::RetryPolicy;

use crate::browser::{BrowserSession, LaunchOptions};
use crate::catalog;
use crate::error::{AutomationError, Result};
use crate::resolver::{CancelToken, Goal, Resolver};
use std::time::Duration;

/// Login credentials, held in memory for the duration of one run only
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Explicit context for a workflow run.
///
/// Everything that used to be implicit module-level knobs in script-style
/// automation lives here: how the browser launches, how long one resolution
/// may take, how long to let a page settle after navigation, and how
/// transient failures are retried.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Browser launch options
    pub launch: LaunchOptions,

    /// Wall-clock budget per resolution
    pub resolve_timeout: Duration,

    /// Delay after each navigation for client-side rendering to settle
    pub settle: Duration,

    /// Retry policy for transient failures
    pub retry: RetryPolicy,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            launch: LaunchOptions::default(),
            resolve_timeout: Duration::from_secs(10),
            settle: Duration::from_secs(3),
            retry: RetryPolicy::default(),
        }
    }
}

/// Sequential social-action workflow over one browser session
pub struct Workflow {
    session: BrowserSession,
    resolver: Resolver,
    config: WorkflowConfig,
}

impl Workflow {
    /// Launch a browser and build a workflow around it
    pub fn launch(config: WorkflowConfig) -> Result<Self> {
        let session = BrowserSession::launch(config.launch.clone())?;
        Ok(Self::with_session(session, config))
    }

    /// Build a workflow around an existing session
    pub fn with_session(session: BrowserSession, config: WorkflowConfig) -> Self {
        let resolver = Resolver::new(config.resolve_timeout);
        Self {
            session,
            resolver,
            config,
        }
    }

    /// Builder method: propagate a cancellation token into every resolution
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.resolver = self.resolver.with_cancel(token);
        self
    }

    /// The underlying browser session
    pub fn session(&self) -> &BrowserSession {
        &self.session
    }

    fn settle(&self) {
        std::thread::sleep(self.config.settle);
    }

    fn navigate_and_settle(&self, url: &str) -> Result<()> {
        log::info!("navigating to {}", url);
        self.session.navigate(url)?;
        if let Err(e) = self.session.wait_for_navigation() {
            // Single-page transitions often finish without a navigation
            // event; the settle delay below covers them.
            log::debug!("wait_for_navigation after {}: {}", url, e);
        }
        self.settle();
        Ok(())
    }

    /// Resolve and actuate one goal on the current page, retrying transient
    /// failures per the configured policy
    fn act(&self, goal: &Goal, actuation: Actuation) -> Result<ActionReport> {
        retry::with_retry(&self.config.retry, || {
            self.session
                .with_document(|doc| actions::perform(&self.resolver, doc, goal, &actuation))?
        })
    }

    /// Log into the platform.
    ///
    /// This is the one step whose failure is fatal for a run: every later
    /// action is meaningless without a session. A filled form that still
    /// lands back on the login page with an error banner means the
    /// credentials were rejected.
    pub fn login(&self, credentials: &Credentials) -> Result<()> {
        log::info!("logging in as {}", credentials.username);
        self.navigate_and_settle(&catalog::login_url())?;

        let steps: [(Goal, Actuation); 3] = [
            (
                catalog::login_username(),
                Actuation::Fill(credentials.username.clone()),
            ),
            (
                catalog::login_password(),
                Actuation::Fill(credentials.password.clone()),
            ),
            (catalog::login_submit(), Actuation::Click),
        ];

        for (goal, actuation) in steps {
            let report = self.act(&goal, actuation)?;
            if !report.status.is_success() {
                return Err(AutomationError::LoginFailed(format!(
                    "step '{}' failed: {}",
                    goal.name(),
                    report.status
                )));
            }
        }

        // Let the post-submit redirect happen before judging the result
        self.settle();

        let url = self.session.current_url()?;
        if url.contains("/accounts/login") && !url.contains("challenge") {
            let banner_resolved = self.session.with_document(|doc| {
                self.resolver
                    .resolve(&catalog::login_error_banner(), doc)
                    .outcome
                    .is_resolved()
            })?;
            if banner_resolved {
                return Err(AutomationError::LoginFailed(
                    "Incorrect credentials".to_string(),
                ));
            }
            log::warn!("still on the login page after submit, no error banner found");
        }

        log::info!("login successful");
        Ok(())
    }

    /// Follow a target account. Idempotent: an already-followed account
    /// reports [`ActionStatus::AlreadyDone`] without actuating.
    pub fn follow(&self, target: &str) -> Result<ActionReport> {
        log::info!("following {}", target);
        self.navigate_and_settle(&catalog::profile_url(target))?;
        self.act(&catalog::follow_button(), Actuation::Click)
    }

    /// Like the most recent post of a target account.
    ///
    /// Two resolution steps: open the newest post from the profile grid,
    /// then actuate the like toggle. If opening fails, its report is
    /// returned as the pipeline's outcome; the goal name inside says which
    /// step stopped it.
    pub fn like_recent_post(&self, target: &str) -> Result<ActionReport> {
        log::info!("liking most recent post of {}", target);
        self.navigate_and_settle(&catalog::profile_url(target))?;

        let opened = self.act(&catalog::recent_post_link(), Actuation::Click)?;
        if !opened.status.is_success() {
            return Ok(opened);
        }

        // Post view renders in place; give it the same settle time
        self.settle();
        self.act(&catalog::like_toggle(), Actuation::Click)
    }

    /// Process targets one at a time, sequentially.
    ///
    /// A target whose follow fails gets its like step skipped but never
    /// aborts the run; the report records every outcome.
    pub fn run(&self, targets: &[&str], like: bool) -> Result<RunReport> {
        let mut report = RunReport::default();

        for target in targets {
            let follow = self.follow(target)?;
            let followed = follow.status.is_success();

            let like_report = if like && followed {
                Some(self.like_recent_post(target)?)
            } else {
                if like && !followed {
                    log::warn!("skipping like for {}: follow did not succeed", target);
                }
                None
            };

            report.push(TargetReport {
                username: (*target).to_string(),
                follow,
                like: like_report,
            });
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = WorkflowConfig::default();
        assert_eq!(config.resolve_timeout, Duration::from_secs(10));
        assert_eq!(config.settle, Duration::from_secs(3));
        assert_eq!(config.retry, RetryPolicy::default());
        assert!(config.launch.headless);
    }

    #[test]
    fn test_credentials_constructor() {
        let credentials = Credentials::new("user", "pass");
        assert_eq!(credentials.username, "user");
        assert_eq!(credentials.password, "pass");
    }

    // Integration tests (require Chrome to be installed)
    #[test]
    #[ignore] // Run with: cargo test -- --ignored
    fn test_launch_workflow() {
        let config = WorkflowConfig {
            settle: Duration::from_millis(100),
            ..WorkflowConfig::default()
        };
        let workflow = Workflow::launch(config).expect("Failed to launch workflow");
        assert!(workflow.session().current_url().is_ok());
    }
}
