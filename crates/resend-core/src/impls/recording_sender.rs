//! RecordingSenderFactory - 送信内容を記録するだけの sender（dry-run / テスト用）
//!
//! endpoint 単位で失敗を注入できます。
//! - `fail_construction_for`: create() が InvalidConfig を返す
//! - `fail_send_for`: send() が Delivery エラーを返す

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::domain::{Build, DeliveryConfig, PendingNotification, ResendError};
use crate::ports::{NotificationSender, SenderFactory};

/// One `send` call as observed by the recording sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentBatch {
    pub endpoint: String,
    pub build: Build,
    pub records: Vec<PendingNotification>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSenderFactory {
    sent: Arc<Mutex<Vec<SentBatch>>>,
    attempts: Arc<Mutex<Vec<Build>>>,
    failing_construction: HashSet<String>,
    failing_send: HashSet<String>,
}

impl RecordingSenderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_construction_for(mut self, endpoint: impl Into<String>) -> Self {
        self.failing_construction.insert(endpoint.into());
        self
    }

    pub fn fail_send_for(mut self, endpoint: impl Into<String>) -> Self {
        self.failing_send.insert(endpoint.into());
        self
    }

    /// Successful sends, in call order.
    pub async fn sent(&self) -> Vec<SentBatch> {
        self.sent.lock().await.clone()
    }

    /// Every build a send was attempted for, including failed attempts.
    pub async fn attempts(&self) -> Vec<Build> {
        self.attempts.lock().await.clone()
    }
}

impl SenderFactory for RecordingSenderFactory {
    fn create(&self, config: &DeliveryConfig) -> Result<Box<dyn NotificationSender>, ResendError> {
        config.validate()?;
        if self.failing_construction.contains(&config.endpoint) {
            return Err(ResendError::InvalidConfig(format!(
                "endpoint {} refused",
                config.endpoint
            )));
        }
        Ok(Box::new(RecordingSender {
            endpoint: config.endpoint.clone(),
            fail: self.failing_send.contains(&config.endpoint),
            sent: Arc::clone(&self.sent),
            attempts: Arc::clone(&self.attempts),
        }))
    }
}

struct RecordingSender {
    endpoint: String,
    fail: bool,
    sent: Arc<Mutex<Vec<SentBatch>>>,
    attempts: Arc<Mutex<Vec<Build>>>,
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, build: &Build, records: &[PendingNotification]) -> Result<(), ResendError> {
        self.attempts.lock().await.push(build.clone());
        if self.fail {
            return Err(ResendError::Delivery(format!(
                "{} is unreachable",
                self.endpoint
            )));
        }
        self.sent.lock().await.push(SentBatch {
            endpoint: self.endpoint.clone(),
            build: build.clone(),
            records: records.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Project;

    #[tokio::test]
    async fn records_successful_sends() {
        let factory = RecordingSenderFactory::new();
        let sender = factory.create(&DeliveryConfig::new("http://a")).unwrap();
        let build = Build::new(Project::new("libA"), 1);
        let records = vec![PendingNotification::new(build.clone(), "core", "1.0")];

        sender.send(&build, &records).await.unwrap();

        let sent = factory.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].endpoint, "http://a");
        assert_eq!(sent[0].records, records);
    }

    #[tokio::test]
    async fn injected_send_failure_is_attempted_but_not_recorded() {
        let factory = RecordingSenderFactory::new().fail_send_for("http://down");
        let sender = factory.create(&DeliveryConfig::new("http://down")).unwrap();
        let build = Build::new(Project::new("libA"), 1);

        let err = sender.send(&build, &[]).await.unwrap_err();
        assert!(matches!(err, ResendError::Delivery(_)));
        assert!(factory.sent().await.is_empty());
        assert_eq!(factory.attempts().await, vec![build]);
    }

    #[test]
    fn injected_construction_failure() {
        let factory = RecordingSenderFactory::new().fail_construction_for("http://bad");
        assert!(factory.create(&DeliveryConfig::new("http://bad")).is_err());
    }
}
