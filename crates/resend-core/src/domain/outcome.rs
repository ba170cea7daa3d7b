//! Outcome model: what a replay run did, per aggregate.
//!
//! The log stays the primary channel for failures. This report is the
//! machine-readable summary returned to the caller of a replay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ReplayId, SnapshotId};
use super::record::Project;

/// Serialized as SUCCESS / FAILURE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Success,
    Failure,
}

/// Result of replaying one project aggregate.
///
/// `builds_sent` / `records_sent` count only the sends that returned Ok
/// before a failure stopped the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateOutcome {
    pub project: Project,
    pub kind: OutcomeKind,
    pub builds_sent: usize,
    pub records_sent: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AggregateOutcome {
    pub fn success(project: Project) -> Self {
        Self {
            project,
            kind: OutcomeKind::Success,
            builds_sent: 0,
            records_sent: 0,
            reason: None,
        }
    }

    pub fn record_sent(&mut self, records: usize) {
        self.builds_sent += 1;
        self.records_sent += records;
    }

    pub fn fail(mut self, reason: impl Into<String>) -> Self {
        self.kind = OutcomeKind::Failure;
        self.reason = Some(reason.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub replay_id: ReplayId,
    /// The snapshot that was replayed (the one observed before the run).
    pub snapshot_id: SnapshotId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outcomes: Vec<AggregateOutcome>,
}

impl ReplayReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.kind == OutcomeKind::Success)
            .count()
    }

    pub fn failed_projects(&self) -> Vec<&Project> {
        self.outcomes
            .iter()
            .filter(|o| o.kind == OutcomeKind::Failure)
            .map(|o| &o.project)
            .collect()
    }

    pub fn records_sent(&self) -> usize {
        self.outcomes.iter().map(|o| o.records_sent).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    #[test]
    fn outcome_kind_serializes_as_required_names() {
        let s = serde_json::to_string(&OutcomeKind::Success).unwrap();
        assert_eq!(s, "\"SUCCESS\"");
        let s = serde_json::to_string(&OutcomeKind::Failure).unwrap();
        assert_eq!(s, "\"FAILURE\"");
    }

    #[test]
    fn failed_outcome_keeps_partial_counts() {
        let mut outcome = AggregateOutcome::success(Project::new("libA"));
        outcome.record_sent(2);
        let outcome = outcome.fail("connection refused");

        assert_eq!(outcome.kind, OutcomeKind::Failure);
        assert_eq!(outcome.builds_sent, 1);
        assert_eq!(outcome.records_sent, 2);
        assert_eq!(outcome.reason.as_deref(), Some("connection refused"));
    }

    #[test]
    fn report_summaries() {
        let now = Utc::now();
        let mut ok = AggregateOutcome::success(Project::new("libA"));
        ok.record_sent(3);
        let report = ReplayReport {
            replay_id: ReplayId::from_ulid(Ulid::new()),
            snapshot_id: SnapshotId::from_ulid(Ulid::new()),
            started_at: now,
            finished_at: now,
            outcomes: vec![ok, AggregateOutcome::success(Project::new("libB")).fail("boom")],
        };

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.records_sent(), 3);
        assert_eq!(report.failed_projects(), vec![&Project::new("libB")]);
    }
}
