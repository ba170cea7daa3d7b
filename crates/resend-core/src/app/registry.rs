//! FleetNotificationRegistry - fleet 全体の pending notification の一覧
//!
//! # 設計原則
//! - refresh のたびに host から snapshot を作り直す（差分更新しない）
//! - 新しい snapshot は不変値で、`Arc` ごと差し替える（途中状態は見えない）
//! - project 単位の失敗はログに出して除外。refresh 自体は常に成功する
//! - refresh / replay は admin ロックで直列化する

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, MutexGuard, RwLock};

use super::aggregator::ProjectNotificationAggregator;
use super::status::RegistryStatus;
use crate::domain::RegistrySnapshot;
use crate::ports::{Clock, FleetProjectSource, IdGenerator};

pub struct FleetNotificationRegistry {
    fleet: Arc<dyn FleetProjectSource>,
    aggregator: ProjectNotificationAggregator,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    snapshot: RwLock<Arc<RegistrySnapshot>>,
    admin: Mutex<()>,
    refreshes: AtomicU64,
}

impl FleetNotificationRegistry {
    /// Starts with an empty snapshot; call [`refresh`](Self::refresh) to scan.
    pub fn new(
        fleet: Arc<dyn FleetProjectSource>,
        aggregator: ProjectNotificationAggregator,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let empty = RegistrySnapshot::empty(ids.snapshot_id(), clock.now());
        Self {
            fleet,
            aggregator,
            clock,
            ids,
            snapshot: RwLock::new(Arc::new(empty)),
            admin: Mutex::new(()),
            refreshes: AtomicU64::new(0),
        }
    }

    /// Rebuilds the snapshot from the live host state and swaps it in.
    pub async fn refresh(&self) -> Arc<RegistrySnapshot> {
        let _guard = self.admin.lock().await;
        self.refresh_locked().await
    }

    /// Last refreshed snapshot. Does not trigger a refresh.
    pub async fn snapshot(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Refreshes once, then maps module name → version to resend.
    ///
    /// A module pending in several versions keeps only the last one seen.
    /// Use [`pending_module_versions`](Self::pending_module_versions) to see
    /// all of them.
    pub async fn pending_modules(&self) -> HashMap<String, String> {
        self.refresh().await.modules()
    }

    /// Refreshes once, then maps module name → every pending version.
    pub async fn pending_module_versions(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.refresh().await.module_versions()
    }

    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    pub async fn status(&self) -> RegistryStatus {
        RegistryStatus::from_snapshot(&*self.snapshot().await, self.refresh_count())
    }

    pub(crate) async fn admin_guard(&self) -> MutexGuard<'_, ()> {
        self.admin.lock().await
    }

    /// Caller must hold the admin guard.
    pub(crate) async fn refresh_locked(&self) -> Arc<RegistrySnapshot> {
        let snapshot_id = self.ids.snapshot_id();
        let projects = match self.fleet.list_projects().await {
            Ok(projects) => projects,
            Err(e) => {
                tracing::error!(%snapshot_id, kind = ?e.kind(), error = %e, "failed to list projects");
                Vec::new()
            }
        };

        let mut aggregates = Vec::new();
        for project in &projects {
            match self.aggregator.aggregate(project).await {
                Ok(Some(aggregate)) => aggregates.push(aggregate),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(
                        %snapshot_id,
                        project = %project,
                        kind = ?e.kind(),
                        error = %e,
                        "project skipped"
                    );
                }
            }
        }

        let snapshot = Arc::new(RegistrySnapshot::new(snapshot_id, self.clock.now(), aggregates));
        *self.snapshot.write().await = Arc::clone(&snapshot);
        self.refreshes.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            %snapshot_id,
            scanned = projects.len(),
            aggregates = snapshot.aggregates().len(),
            "registry refreshed"
        );
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::collector::BuildNotificationCollector;
    use crate::domain::{DeliveryConfig, Project};
    use crate::impls::{FleetState, InMemoryHost, ProjectState};
    use crate::ports::{FixedClock, UlidGenerator};
    use chrono::{TimeZone, Utc};

    fn registry(host: Arc<InMemoryHost>) -> FleetNotificationRegistry {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        ));
        let aggregator = ProjectNotificationAggregator::new(
            host.clone(),
            BuildNotificationCollector::new(host.clone()),
            host.clone(),
        );
        FleetNotificationRegistry::new(
            host,
            aggregator,
            clock.clone(),
            Arc::new(UlidGenerator::new(clock)),
        )
    }

    fn fleet() -> FleetState {
        FleetState::default()
            .with_project(
                ProjectState::new("libA")
                    .with_config(DeliveryConfig::new("http://a"))
                    .with_build(1, &[("core", "1.0")])
                    .with_build(2, &[]),
            )
            .with_project(ProjectState::new("libB").with_build(1, &[("api", "2.0")]))
            .with_project(
                ProjectState::new("libC")
                    .with_config(DeliveryConfig::new("http://c"))
                    .with_build(4, &[("core", "1.1"), ("web", "3.0")]),
            )
    }

    #[tokio::test]
    async fn starts_empty_until_refreshed() {
        let registry = registry(Arc::new(InMemoryHost::new(fleet())));
        assert!(registry.snapshot().await.is_empty());
        assert_eq!(registry.refresh_count(), 0);

        let snapshot = registry.refresh().await;
        let projects: Vec<&str> = snapshot
            .aggregates()
            .iter()
            .map(|a| a.project().name())
            .collect();
        assert_eq!(projects, vec!["libA", "libC"]);
    }

    #[tokio::test]
    async fn refresh_twice_yields_identical_aggregates() {
        let registry = registry(Arc::new(InMemoryHost::new(fleet())));
        let first = registry.refresh().await;
        let second = registry.refresh().await;

        assert_eq!(first.aggregates(), second.aggregates());
        assert_eq!(first.taken_at(), second.taken_at());
        assert_ne!(first.id(), second.id());
    }

    #[tokio::test]
    async fn pending_modules_refreshes_exactly_once() {
        let registry = registry(Arc::new(InMemoryHost::new(fleet())));
        let before = registry.refresh_count();

        let modules = registry.pending_modules().await;

        assert_eq!(registry.refresh_count(), before + 1);
        // libB has no config; libC's core@1.1 overwrites libA's core@1.0
        assert_eq!(modules.len(), 2);
        assert_eq!(modules["core"], "1.1");
        assert_eq!(modules["web"], "3.0");
        assert!(!modules.contains_key("api"));
    }

    #[tokio::test]
    async fn pending_module_versions_keeps_all_versions() {
        let registry = registry(Arc::new(InMemoryHost::new(fleet())));
        let versions = registry.pending_module_versions().await;
        assert_eq!(versions["core"].len(), 2);
        assert_eq!(registry.refresh_count(), 1);
    }

    #[tokio::test]
    async fn broken_project_does_not_stop_the_scan() {
        let host = Arc::new(InMemoryHost::new(fleet()));
        host.set_broken("libA", true).await;
        let registry = registry(host);

        let snapshot = registry.refresh().await;
        let projects: Vec<&Project> = snapshot.aggregates().iter().map(|a| a.project()).collect();
        assert_eq!(projects, vec![&Project::new("libC")]);
    }

    #[tokio::test]
    async fn refresh_picks_up_host_changes() {
        let host = Arc::new(InMemoryHost::new(fleet()));
        let registry = registry(host.clone());
        registry.refresh().await;

        host.set_config("libB", Some(DeliveryConfig::new("http://b"))).await;
        let snapshot = registry.refresh().await;

        assert_eq!(snapshot.aggregates().len(), 3);
        assert_eq!(registry.status().await.projects, 3);
    }
}
