//! InMemoryHost - 開発・テスト用の host
//!
//! FleetProjectSource / BuildActionSource / DeliveryConfigLookup をまとめて
//! 実装します。状態は JSON の fleet ファイルから読み込めます。
//!
//! ```json
//! {
//!   "projects": [
//!     {
//!       "name": "libA",
//!       "config": { "endpoint": "http://grapes.local:8080" },
//!       "builds": [ { "number": 1, "pending": [ { "module": "core", "version": "1.0" } ] } ]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::domain::{Build, DeliveryConfig, PendingNotification, Project, ResendError};
use crate::ports::{BuildActionSource, DeliveryConfigLookup, FleetProjectSource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingModule {
    pub module: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildState {
    pub number: u64,
    #[serde(default)]
    pub pending: Vec<PendingModule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectState {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<DeliveryConfig>,

    #[serde(default)]
    pub builds: Vec<BuildState>,

    /// Makes build enumeration of this project fail.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub broken: bool,
}

impl ProjectState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: None,
            builds: Vec::new(),
            broken: false,
        }
    }

    pub fn with_config(mut self, config: DeliveryConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_build(mut self, number: u64, pending: &[(&str, &str)]) -> Self {
        self.builds.push(BuildState {
            number,
            pending: pending
                .iter()
                .map(|(module, version)| PendingModule {
                    module: module.to_string(),
                    version: version.to_string(),
                })
                .collect(),
        });
        self
    }

    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetState {
    #[serde(default)]
    pub projects: Vec<ProjectState>,
}

impl FleetState {
    pub fn with_project(mut self, project: ProjectState) -> Self {
        self.projects.push(project);
        self
    }

    fn project(&self, name: &str) -> Option<&ProjectState> {
        self.projects.iter().find(|p| p.name == name)
    }

    fn project_mut(&mut self, name: &str) -> Option<&mut ProjectState> {
        self.projects.iter_mut().find(|p| p.name == name)
    }
}

/// In-memory host holding a [`FleetState`].
///
/// # 使用例
/// ```ignore
/// let host = Arc::new(InMemoryHost::new(
///     FleetState::default().with_project(
///         ProjectState::new("libA")
///             .with_config(DeliveryConfig::new("http://grapes.local"))
///             .with_build(1, &[("core", "1.0")]),
///     ),
/// ));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryHost {
    state: Mutex<FleetState>,
}

impl InMemoryHost {
    pub fn new(state: FleetState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ResendError> {
        let bytes = std::fs::read(path)?;
        let state: FleetState = serde_json::from_slice(&bytes)?;
        Ok(Self::new(state))
    }

    pub async fn write_json_file(&self, path: impl AsRef<Path>) -> Result<(), ResendError> {
        let state = self.state().await;
        let json = serde_json::to_vec_pretty(&state)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub async fn state(&self) -> FleetState {
        self.state.lock().await.clone()
    }

    /// Clears the pending markers for `records` on `build`, the way the host
    /// does once a notification has been delivered.
    pub async fn resolve(&self, build: &Build, records: &[PendingNotification]) {
        let mut state = self.state.lock().await;
        let Some(project) = state.project_mut(build.project.name()) else {
            return;
        };
        if let Some(b) = project.builds.iter_mut().find(|b| b.number == build.number) {
            b.pending.retain(|p| {
                !records
                    .iter()
                    .any(|r| r.module == p.module && r.version == p.version)
            });
        }
    }

    pub async fn set_broken(&self, project: &str, broken: bool) {
        if let Some(p) = self.state.lock().await.project_mut(project) {
            p.broken = broken;
        }
    }

    pub async fn set_config(&self, project: &str, config: Option<DeliveryConfig>) {
        if let Some(p) = self.state.lock().await.project_mut(project) {
            p.config = config;
        }
    }
}

#[async_trait]
impl FleetProjectSource for InMemoryHost {
    async fn list_projects(&self) -> Result<Vec<Project>, ResendError> {
        let state = self.state.lock().await;
        Ok(state.projects.iter().map(|p| Project::new(&p.name)).collect())
    }

    async fn list_builds(&self, project: &Project) -> Result<Vec<Build>, ResendError> {
        let state = self.state.lock().await;
        let p = state
            .project(project.name())
            .ok_or_else(|| ResendError::Host(format!("unknown project '{project}'")))?;
        if p.broken {
            return Err(ResendError::Host(format!(
                "build history of '{project}' is unreadable"
            )));
        }
        Ok(p.builds
            .iter()
            .map(|b| Build::new(project.clone(), b.number))
            .collect())
    }
}

#[async_trait]
impl BuildActionSource for InMemoryHost {
    async fn pending_notifications(
        &self,
        build: &Build,
    ) -> Result<Vec<PendingNotification>, ResendError> {
        let state = self.state.lock().await;
        let pending = state
            .project(build.project.name())
            .and_then(|p| p.builds.iter().find(|b| b.number == build.number))
            .map(|b| {
                b.pending
                    .iter()
                    .map(|m| PendingNotification::new(build.clone(), &m.module, &m.version))
                    .collect()
            })
            .unwrap_or_default();
        Ok(pending)
    }
}

#[async_trait]
impl DeliveryConfigLookup for InMemoryHost {
    async fn lookup(&self, project: &Project) -> Result<Option<DeliveryConfig>, ResendError> {
        let state = self.state.lock().await;
        Ok(state.project(project.name()).and_then(|p| p.config.clone()))
    }
}
