use crate::workflow::actions::ActionReport;
use serde::Serialize;

/// Everything that happened for one target account
#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    /// The account the actions were aimed at
    pub username: String,

    /// Outcome of the follow action
    pub follow: ActionReport,

    /// Outcome of the like pipeline, when requested and reached.
    /// The report's goal name says which step it describes: opening the
    /// most recent post or toggling the like.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like: Option<ActionReport>,
}

impl TargetReport {
    /// Whether the follow action succeeded for this target
    pub fn followed(&self) -> bool {
        self.follow.status.is_success()
    }

    /// Whether the like pipeline ran and succeeded
    pub fn liked(&self) -> bool {
        self.like
            .as_ref()
            .is_some_and(|report| report.status.is_success())
    }
}

/// Full record of one sequential run over a list of targets
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub targets: Vec<TargetReport>,
}

impl RunReport {
    /// Append a target's report
    pub fn push(&mut self, target: TargetReport) {
        self.targets.push(target);
    }

    /// Number of targets whose follow action succeeded
    pub fn followed_count(&self) -> usize {
        self.targets.iter().filter(|t| t.followed()).count()
    }

    /// Whether every follow action in the run succeeded
    pub fn all_followed(&self) -> bool {
        self.targets.iter().all(TargetReport::followed)
    }

    /// Export the run report as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{OutcomeRecord, ResolutionRecord};
    use crate::workflow::actions::ActionStatus;
    use std::time::Duration;

    fn report_for(goal: &str, status: ActionStatus) -> ActionReport {
        ActionReport {
            status,
            resolution: ResolutionRecord {
                goal: goal.to_string(),
                outcome: OutcomeRecord::NotFound,
                attempts: Vec::new(),
                elapsed: Duration::from_millis(5),
            },
        }
    }

    #[test]
    fn test_target_report_accessors() {
        let target = TargetReport {
            username: "rustlang".to_string(),
            follow: report_for("follow-button", ActionStatus::Performed { strategy_index: 0 }),
            like: Some(report_for(
                "like-toggle",
                ActionStatus::AlreadyDone {
                    state: "Unlike".to_string(),
                },
            )),
        };

        assert!(target.followed());
        assert!(target.liked());
    }

    #[test]
    fn test_degraded_target_keeps_follow_success() {
        let target = TargetReport {
            username: "rustlang".to_string(),
            follow: report_for("follow-button", ActionStatus::Performed { strategy_index: 1 }),
            like: Some(report_for("recent-post-link", ActionStatus::NotFound)),
        };

        assert!(target.followed());
        assert!(!target.liked());
    }

    #[test]
    fn test_run_report_counts() {
        let mut run = RunReport::default();
        run.push(TargetReport {
            username: "a".to_string(),
            follow: report_for("follow-button", ActionStatus::Performed { strategy_index: 0 }),
            like: None,
        });
        run.push(TargetReport {
            username: "b".to_string(),
            follow: report_for("follow-button", ActionStatus::Ambiguous { candidates: 2 }),
            like: None,
        });

        assert_eq!(run.followed_count(), 1);
        assert!(!run.all_followed());
    }

    #[test]
    fn test_run_report_json() {
        let mut run = RunReport::default();
        run.push(TargetReport {
            username: "rustlang".to_string(),
            follow: report_for("follow-button", ActionStatus::NotFound),
            like: None,
        });

        let json = run.to_json().unwrap();
        assert!(json.contains("rustlang"));
        assert!(json.contains("not_found"));
        // Unreached like step is omitted entirely
        assert!(!json.contains("\"like\""));
    }
}
