use crate::error::Result;
use crate::workflow::actions::ActionReport;
use std::time::Duration;

/// Explicit retry policy for transient resolution failures.
///
/// Retrying lives here, in the caller layer, never inside the resolver:
/// every repeat attempt is visible in logs and bounded by `attempts`.
/// Only transient outcomes (timeout, cancellation is excluded below,
/// vanished document) are retried; `NotFound` and `Ambiguous` are stable
/// answers and repeat attempts would not change them.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempt count, including the first (minimum 1)
    pub attempts: u32,

    /// Delay before the first retry; doubles each further retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn none() -> Self {
        Self {
            attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff delay before retry number `retry` (0-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << retry.min(16))
    }
}

/// Run an action attempt up to the policy's attempt count, backing off
/// between transient failures. Cancellation is honored immediately, never
/// retried.
pub fn with_retry(
    policy: &RetryPolicy,
    mut attempt_fn: impl FnMut() -> Result<ActionReport>,
) -> Result<ActionReport> {
    let attempts = policy.attempts.max(1);
    let mut report = attempt_fn()?;

    for retry in 0..attempts.saturating_sub(1) {
        if !report.status.is_retryable() {
            break;
        }

        let delay = policy.delay_for(retry);
        log::info!(
            "goal '{}': transient failure, retrying in {:?} ({}/{} attempts used)",
            report.resolution.goal,
            delay,
            retry + 1,
            attempts
        );
        std::thread::sleep(delay);
        report = attempt_fn()?;
    }

    Ok(report)
}
