//! End-to-end scenarios over the in-memory host: discover, replay, refresh.

use std::sync::Arc;

use async_trait::async_trait;
use resend_core::app::{ResendApp, ResendAppBuilder};
use resend_core::domain::{Build, DeliveryConfig, OutcomeKind, Project, ResendError};
use resend_core::impls::{
    FleetState, InMemoryHost, ProjectState, RecordingSenderFactory, ResolvingSenderFactory,
};
use resend_core::ports::FleetProjectSource;

fn app(host: Arc<InMemoryHost>, recorder: RecordingSenderFactory) -> ResendApp {
    ResendAppBuilder::new()
        .host(host.clone())
        .sender_factory(Arc::new(ResolvingSenderFactory::new(recorder, host)))
        .build()
        .expect("all ports provided")
}

#[tokio::test]
async fn lib_a_aggregates_only_build_with_records() {
    let host = Arc::new(InMemoryHost::new(FleetState::default().with_project(
        ProjectState::new("libA")
            .with_config(DeliveryConfig::new("http://grapes.local"))
            .with_build(1, &[("core", "1.0")])
            .with_build(2, &[]),
    )));
    let app = app(host, RecordingSenderFactory::new());

    let snapshot = app.registry.refresh().await;

    assert_eq!(snapshot.aggregates().len(), 1);
    let aggregate = &snapshot.aggregates()[0];
    assert_eq!(aggregate.project(), &Project::new("libA"));
    assert_eq!(aggregate.builds().len(), 1);
    assert_eq!(aggregate.builds()[0].build.number, 1);
    assert_eq!(aggregate.record_count(), 1);
}

#[tokio::test]
async fn lib_b_without_config_contributes_nothing() {
    let host = Arc::new(InMemoryHost::new(
        FleetState::default()
            .with_project(
                ProjectState::new("libA")
                    .with_config(DeliveryConfig::new("http://grapes.local"))
                    .with_build(1, &[("core", "1.0")]),
            )
            .with_project(ProjectState::new("libB").with_build(1, &[("api", "2.0")])),
    ));
    let app = app(host, RecordingSenderFactory::new());

    let modules = app.registry.pending_modules().await;

    assert_eq!(modules.len(), 1);
    assert_eq!(modules.get("core").map(String::as_str), Some("1.0"));
    assert!(!modules.contains_key("api"));
}

#[tokio::test]
async fn failing_first_aggregate_does_not_block_the_second() {
    let host = Arc::new(InMemoryHost::new(
        FleetState::default()
            .with_project(
                ProjectState::new("libA")
                    .with_config(DeliveryConfig::new("http://down"))
                    .with_build(1, &[("core", "1.0")]),
            )
            .with_project(
                ProjectState::new("libC")
                    .with_config(DeliveryConfig::new("http://up"))
                    .with_build(3, &[("web", "3.0")]),
            ),
    ));
    let recorder = RecordingSenderFactory::new().fail_send_for("http://down");
    let app = app(host, recorder.clone());
    app.registry.refresh().await;

    let report = app.engine.replay_all().await;

    let kinds: Vec<OutcomeKind> = report.outcomes.iter().map(|o| o.kind).collect();
    assert_eq!(kinds, vec![OutcomeKind::Failure, OutcomeKind::Success]);
    let sent = recorder.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].build.project, Project::new("libC"));

    // libA stays pending for the next attempt, libC is gone
    let snapshot = app.registry.refresh().await;
    let remaining: Vec<&str> = snapshot
        .aggregates()
        .iter()
        .map(|a| a.project().name())
        .collect();
    assert_eq!(remaining, vec!["libA"]);
}

#[tokio::test]
async fn retry_after_fixing_the_endpoint_drains_the_view() {
    let host = Arc::new(InMemoryHost::new(FleetState::default().with_project(
        ProjectState::new("libA")
            .with_config(DeliveryConfig::new("http://down"))
            .with_build(1, &[("core", "1.0")]),
    )));
    let app = app(host.clone(), RecordingSenderFactory::new().fail_send_for("http://down"));
    app.registry.refresh().await;
    app.engine.replay_all().await;
    assert_eq!(app.registry.snapshot().await.aggregates().len(), 1);

    host.set_config("libA", Some(DeliveryConfig::new("http://up"))).await;
    app.registry.refresh().await;
    let report = app.engine.replay_all().await;

    assert_eq!(report.succeeded(), 1);
    assert!(app.registry.snapshot().await.is_empty());
}

/// A host whose project enumeration itself is down.
struct UnreachableHost;

#[async_trait]
impl FleetProjectSource for UnreachableHost {
    async fn list_projects(&self) -> Result<Vec<Project>, ResendError> {
        Err(ResendError::Host("connection reset".to_string()))
    }

    async fn list_builds(&self, _project: &Project) -> Result<Vec<Build>, ResendError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn unreachable_host_yields_empty_snapshot() {
    let host = Arc::new(InMemoryHost::default());
    let app = ResendAppBuilder::new()
        .host(host)
        .fleet_source(Arc::new(UnreachableHost))
        .sender_factory(Arc::new(RecordingSenderFactory::new()))
        .build()
        .expect("all ports provided");

    let snapshot = app.registry.refresh().await;
    assert!(snapshot.is_empty());
    assert_eq!(app.registry.refresh_count(), 1);

    let report = app.engine.replay_all().await;
    assert!(report.outcomes.is_empty());
}
