//! ProjectAggregate: a project's builds-with-pending-records plus the
//! configuration needed to resend them.

use serde::{Deserialize, Serialize};

use super::config::DeliveryConfig;
use super::record::{Build, PendingNotification, Project};

/// Pending records of one build, in host order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildNotifications {
    pub build: Build,
    pub records: Vec<PendingNotification>,
}

/// Invariant: at least one build with at least one record, and a config.
/// The only way to obtain one is [`ProjectAggregate::new`].
/// Not serializable: the config carries credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectAggregate {
    project: Project,
    builds: Vec<BuildNotifications>,
    config: DeliveryConfig,
}

impl ProjectAggregate {
    /// Returns `None` when no build has pending records or when the project
    /// has no delivery configuration. Builds without records are dropped.
    pub fn new(
        project: Project,
        builds: Vec<BuildNotifications>,
        config: Option<DeliveryConfig>,
    ) -> Option<Self> {
        let builds: Vec<BuildNotifications> = builds
            .into_iter()
            .filter(|b| !b.records.is_empty())
            .collect();
        if builds.is_empty() {
            return None;
        }
        Some(Self {
            project,
            builds,
            config: config?,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn builds(&self) -> &[BuildNotifications] {
        &self.builds
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    pub fn records(&self) -> impl Iterator<Item = &PendingNotification> {
        self.builds.iter().flat_map(|b| b.records.iter())
    }

    pub fn record_count(&self) -> usize {
        self.builds.iter().map(|b| b.records.len()).sum()
    }
}
