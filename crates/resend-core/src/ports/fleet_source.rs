//! FleetProjectSource port - host の project / build 列挙
//!
//! host のオブジェクトグラフ（「全 project」「project の build 履歴」）を
//! この trait の裏に隠します。registry はこの契約だけに依存します。

use async_trait::async_trait;

use crate::domain::{Build, Project, ResendError};

#[async_trait]
pub trait FleetProjectSource: Send + Sync {
    /// Every project known to the host, in host order.
    async fn list_projects(&self) -> Result<Vec<Project>, ResendError>;

    /// Build history of one project, in host order.
    async fn list_builds(&self, project: &Project) -> Result<Vec<Build>, ResendError>;
}
