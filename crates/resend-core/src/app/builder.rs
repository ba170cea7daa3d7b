//! ResendAppBuilder - ports のワイヤリング
//!
//! # Fail-fast 設計
//! - host 側の 3 つの port と SenderFactory は必須
//! - build() 時に不足している port をすべて列挙して BuildError を返す
//! - Clock / IdGenerator は省略時に SystemClock / UlidGenerator を使う

use std::sync::Arc;

use super::aggregator::ProjectNotificationAggregator;
use super::collector::BuildNotificationCollector;
use super::registry::FleetNotificationRegistry;
use super::replay::ReplayEngine;
use crate::ports::{
    BuildActionSource, Clock, DeliveryConfigLookup, FleetProjectSource, IdGenerator,
    SenderFactory, SystemClock, UlidGenerator,
};

/// # 使用例
/// ```ignore
/// let app = ResendAppBuilder::new()
///     .host(host.clone())
///     .sender_factory(Arc::new(HttpSenderFactory::new()))
///     .build()?;
/// app.registry.refresh().await;
/// let report = app.engine.replay_all().await;
/// ```
#[derive(Default)]
pub struct ResendAppBuilder {
    fleet: Option<Arc<dyn FleetProjectSource>>,
    build_actions: Option<Arc<dyn BuildActionSource>>,
    configs: Option<Arc<dyn DeliveryConfigLookup>>,
    senders: Option<Arc<dyn SenderFactory>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing ports: {0:?}. These must be provided before build().")]
    MissingPorts(Vec<&'static str>),
}

impl ResendAppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses one host object for project enumeration, build records and
    /// configuration lookup.
    pub fn host<H>(self, host: Arc<H>) -> Self
    where
        H: FleetProjectSource + BuildActionSource + DeliveryConfigLookup + 'static,
    {
        self.fleet_source(host.clone())
            .build_actions(host.clone())
            .config_lookup(host)
    }

    pub fn fleet_source(mut self, fleet: Arc<dyn FleetProjectSource>) -> Self {
        self.fleet = Some(fleet);
        self
    }

    pub fn build_actions(mut self, source: Arc<dyn BuildActionSource>) -> Self {
        self.build_actions = Some(source);
        self
    }

    pub fn config_lookup(mut self, configs: Arc<dyn DeliveryConfigLookup>) -> Self {
        self.configs = Some(configs);
        self
    }

    pub fn sender_factory(mut self, senders: Arc<dyn SenderFactory>) -> Self {
        self.senders = Some(senders);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn build(self) -> Result<ResendApp, BuildError> {
        let mut missing = Vec::new();
        if self.fleet.is_none() {
            missing.push("fleet_source");
        }
        if self.build_actions.is_none() {
            missing.push("build_actions");
        }
        if self.configs.is_none() {
            missing.push("config_lookup");
        }
        if self.senders.is_none() {
            missing.push("sender_factory");
        }
        let (Some(fleet), Some(build_actions), Some(configs), Some(senders)) =
            (self.fleet, self.build_actions, self.configs, self.senders)
        else {
            return Err(BuildError::MissingPorts(missing));
        };

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
        let ids = self.ids.unwrap_or_else(|| {
            Arc::new(UlidGenerator::new(Arc::clone(&clock))) as Arc<dyn IdGenerator>
        });

        let aggregator = ProjectNotificationAggregator::new(
            Arc::clone(&fleet),
            BuildNotificationCollector::new(build_actions),
            configs,
        );
        let registry = Arc::new(FleetNotificationRegistry::new(
            fleet,
            aggregator,
            Arc::clone(&clock),
            Arc::clone(&ids),
        ));
        let engine = ReplayEngine::new(Arc::clone(&registry), senders, clock, ids);

        Ok(ResendApp { registry, engine })
    }
}

pub struct ResendApp {
    pub registry: Arc<FleetNotificationRegistry>,
    pub engine: ReplayEngine,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DeliveryConfig;
    use crate::impls::{FleetState, InMemoryHost, ProjectState, RecordingSenderFactory};

    #[tokio::test]
    async fn test_build_success() {
        let host = Arc::new(InMemoryHost::new(FleetState::default().with_project(
            ProjectState::new("libA")
                .with_config(DeliveryConfig::new("http://a"))
                .with_build(1, &[("core", "1.0")]),
        )));
        let app = ResendAppBuilder::new()
            .host(host)
            .sender_factory(Arc::new(RecordingSenderFactory::new()))
            .build()
            .expect("all ports provided");

        assert_eq!(app.registry.pending_modules().await.len(), 1);
    }

    #[test]
    fn test_build_missing_ports() {
        let host = Arc::new(InMemoryHost::default());
        let app = ResendAppBuilder::new().fleet_source(host).build();
        assert!(matches!(
            app,
            Err(BuildError::MissingPorts(missing))
                if missing == vec!["build_actions", "config_lookup", "sender_factory"]
        ));
    }
}
