//! ReplayEngine - pending notification の一括再送
//!
//! 最後に refresh された snapshot（管理者が見ていたもの）を対象に、aggregate
//! ごとに sender を作って build 単位で send します。
//!
//! # 失敗の扱い
//! - sender の生成失敗 / send 失敗はその aggregate だけを打ち切る
//! - 次の aggregate は必ず試行する
//! - 最後に必ず refresh し、解決済みの record を一覧から消す
//!
//! 自動リトライはしない（管理者が再度 replay する）。

use std::sync::Arc;

use super::registry::FleetNotificationRegistry;
use crate::domain::{AggregateOutcome, ProjectAggregate, ReplayReport, ResendError};
use crate::ports::{Clock, IdGenerator, SenderFactory};

pub struct ReplayEngine {
    registry: Arc<FleetNotificationRegistry>,
    senders: Arc<dyn SenderFactory>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl ReplayEngine {
    pub fn new(
        registry: Arc<FleetNotificationRegistry>,
        senders: Arc<dyn SenderFactory>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            registry,
            senders,
            clock,
            ids,
        }
    }

    pub fn registry(&self) -> &Arc<FleetNotificationRegistry> {
        &self.registry
    }

    /// Replays every aggregate of the last refreshed snapshot, then refreshes.
    ///
    /// The caller is expected to be authorized already. Always runs to
    /// completion; per-project failures are logged and reported.
    pub async fn replay_all(&self) -> ReplayReport {
        let _guard = self.registry.admin_guard().await;

        let snapshot = self.registry.snapshot().await;
        let replay_id = self.ids.replay_id();
        let started_at = self.clock.now();
        tracing::info!(
            %replay_id,
            snapshot_id = %snapshot.id(),
            aggregates = snapshot.aggregates().len(),
            "replay started"
        );

        let mut outcomes = Vec::with_capacity(snapshot.aggregates().len());
        for aggregate in snapshot.aggregates() {
            let outcome = match self.replay_aggregate(aggregate).await {
                Ok(outcome) => {
                    tracing::info!(
                        %replay_id,
                        project = %aggregate.project(),
                        builds = outcome.builds_sent,
                        records = outcome.records_sent,
                        "notifications re-sent"
                    );
                    outcome
                }
                Err((partial, e)) => {
                    tracing::error!(
                        %replay_id,
                        project = %aggregate.project(),
                        kind = ?e.kind(),
                        error = %e,
                        "failed to re-send notifications"
                    );
                    partial.fail(e.to_string())
                }
            };
            outcomes.push(outcome);
        }

        self.registry.refresh_locked().await;

        let report = ReplayReport {
            replay_id,
            snapshot_id: snapshot.id(),
            started_at,
            finished_at: self.clock.now(),
            outcomes,
        };
        tracing::info!(
            %replay_id,
            succeeded = report.succeeded(),
            failed = report.failed_projects().len(),
            records = report.records_sent(),
            "replay finished"
        );
        report
    }

    /// On error, also returns the outcome accumulated before the failure.
    async fn replay_aggregate(
        &self,
        aggregate: &ProjectAggregate,
    ) -> Result<AggregateOutcome, (AggregateOutcome, ResendError)> {
        let mut outcome = AggregateOutcome::success(aggregate.project().clone());

        let sender = match self.senders.create(aggregate.config()) {
            Ok(sender) => sender,
            Err(e) => {
                let e = ResendError::sender_construction(aggregate.project().name(), e);
                return Err((outcome, e));
            }
        };

        for pending in aggregate.builds() {
            if let Err(e) = sender.send(&pending.build, &pending.records).await {
                return Err((outcome, ResendError::send(&pending.build, e)));
            }
            outcome.record_sent(pending.records.len());
        }
        Ok(outcome)
    }
}
