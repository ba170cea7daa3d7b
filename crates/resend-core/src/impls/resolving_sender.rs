//! ResolvingSenderFactory - 送信成功時に InMemoryHost の pending を消す decorator
//!
//! 本物の host は配送成功を自分で検知して marker を消します。InMemoryHost には
//! その仕組みがないので、任意の SenderFactory をこれで包んで代わりに行います。

use std::sync::Arc;

use async_trait::async_trait;

use super::inmem_host::InMemoryHost;
use crate::domain::{Build, DeliveryConfig, PendingNotification, ResendError};
use crate::ports::{NotificationSender, SenderFactory};

pub struct ResolvingSenderFactory<F> {
    inner: F,
    host: Arc<InMemoryHost>,
}

impl<F: SenderFactory> ResolvingSenderFactory<F> {
    pub fn new(inner: F, host: Arc<InMemoryHost>) -> Self {
        Self { inner, host }
    }
}

impl<F: SenderFactory> SenderFactory for ResolvingSenderFactory<F> {
    fn create(&self, config: &DeliveryConfig) -> Result<Box<dyn NotificationSender>, ResendError> {
        Ok(Box::new(ResolvingSender {
            inner: self.inner.create(config)?,
            host: Arc::clone(&self.host),
        }))
    }
}

struct ResolvingSender {
    inner: Box<dyn NotificationSender>,
    host: Arc<InMemoryHost>,
}

#[async_trait]
impl NotificationSender for ResolvingSender {
    async fn send(&self, build: &Build, records: &[PendingNotification]) -> Result<(), ResendError> {
        self.inner.send(build, records).await?;
        self.host.resolve(build, records).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{FleetState, ProjectState, RecordingSenderFactory};
    use crate::ports::BuildActionSource;

    fn host() -> Arc<InMemoryHost> {
        Arc::new(InMemoryHost::new(FleetState::default().with_project(
            ProjectState::new("libA").with_build(1, &[("core", "1.0")]),
        )))
    }

    #[tokio::test]
    async fn successful_send_resolves_records() {
        let host = host();
        let factory = ResolvingSenderFactory::new(RecordingSenderFactory::new(), Arc::clone(&host));
        let build = Build::new(crate::domain::Project::new("libA"), 1);
        let pending = host.pending_notifications(&build).await.unwrap();

        let sender = factory.create(&DeliveryConfig::new("http://a")).unwrap();
        sender.send(&build, &pending).await.unwrap();

        assert!(host.pending_notifications(&build).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_send_keeps_records_pending() {
        let host = host();
        let factory = ResolvingSenderFactory::new(
            RecordingSenderFactory::new().fail_send_for("http://down"),
            Arc::clone(&host),
        );
        let build = Build::new(crate::domain::Project::new("libA"), 1);
        let pending = host.pending_notifications(&build).await.unwrap();

        let sender = factory.create(&DeliveryConfig::new("http://down")).unwrap();
        assert!(sender.send(&build, &pending).await.is_err());

        assert_eq!(host.pending_notifications(&build).await.unwrap(), pending);
    }
}
