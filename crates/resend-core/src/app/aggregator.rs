//! ProjectNotificationAggregator - project 単位で pending record を束ねる
//!
//! # 存在ルール
//! aggregate は「pending record が 1 件以上ある」かつ「配送設定がある」ときだけ
//! 作られます。設定のない project は warn を出して黙って除外します（送り先がない）。

use std::sync::Arc;

use super::collector::BuildNotificationCollector;
use crate::domain::{BuildNotifications, Project, ProjectAggregate, ResendError};
use crate::ports::{DeliveryConfigLookup, FleetProjectSource};

pub struct ProjectNotificationAggregator {
    fleet: Arc<dyn FleetProjectSource>,
    collector: BuildNotificationCollector,
    configs: Arc<dyn DeliveryConfigLookup>,
}

impl ProjectNotificationAggregator {
    pub fn new(
        fleet: Arc<dyn FleetProjectSource>,
        collector: BuildNotificationCollector,
        configs: Arc<dyn DeliveryConfigLookup>,
    ) -> Self {
        Self {
            fleet,
            collector,
            configs,
        }
    }

    /// Any host error is wrapped as [`ResendError::Aggregation`] for `project`.
    pub async fn aggregate(
        &self,
        project: &Project,
    ) -> Result<Option<ProjectAggregate>, ResendError> {
        let wrap = |e| ResendError::aggregation(project.name(), e);

        let builds = self.fleet.list_builds(project).await.map_err(wrap)?;

        let mut pending = Vec::new();
        for build in builds {
            let records = self.collector.collect(&build).await.map_err(wrap)?;
            if !records.is_empty() {
                pending.push(BuildNotifications { build, records });
            }
        }
        if pending.is_empty() {
            tracing::debug!(project = %project, "no pending notifications");
            return Ok(None);
        }

        let config = self.configs.lookup(project).await.map_err(wrap)?;
        if config.is_none() {
            let records: usize = pending.iter().map(|b| b.records.len()).sum();
            tracing::warn!(
                project = %project,
                records,
                "pending notifications without delivery config; project skipped"
            );
        }
        Ok(ProjectAggregate::new(project.clone(), pending, config))
    }
}
