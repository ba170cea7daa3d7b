//! Sender ports - 通知の再送
//!
//! SenderFactory は aggregate の DeliveryConfig に束縛された sender を作ります。
//! sender 側のタイムアウトや再試行はこのクレートの関知しないところです。

use async_trait::async_trait;

use crate::domain::{Build, DeliveryConfig, PendingNotification, ResendError};

#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Resends every record of one build. On success the host is expected to
    /// stop reporting the records as pending.
    async fn send(&self, build: &Build, records: &[PendingNotification]) -> Result<(), ResendError>;
}

pub trait SenderFactory: Send + Sync {
    fn create(&self, config: &DeliveryConfig) -> Result<Box<dyn NotificationSender>, ResendError>;
}
