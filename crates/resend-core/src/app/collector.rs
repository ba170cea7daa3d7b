//! BuildNotificationCollector - 1 build の pending record を集める

use std::sync::Arc;

use crate::domain::{Build, PendingNotification, ResendError};
use crate::ports::BuildActionSource;

pub struct BuildNotificationCollector {
    source: Arc<dyn BuildActionSource>,
}

impl BuildNotificationCollector {
    pub fn new(source: Arc<dyn BuildActionSource>) -> Self {
        Self { source }
    }

    /// Pending records of `build`, in host order. No side effects.
    ///
    /// Records the host attributes to another build are dropped with a warning.
    pub async fn collect(&self, build: &Build) -> Result<Vec<PendingNotification>, ResendError> {
        let (records, foreign): (Vec<_>, Vec<_>) = self
            .source
            .pending_notifications(build)
            .await?
            .into_iter()
            .partition(|r| r.build == *build);
        for record in &foreign {
            tracing::warn!(
                build = %build,
                reported_build = %record.build,
                module = %record.module,
                version = %record.version,
                "host reported a record under another build; ignored"
            );
        }
        tracing::trace!(build = %build, records = records.len(), "collected pending notifications");
        Ok(records)
    }
}
