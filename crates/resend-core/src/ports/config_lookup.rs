//! DeliveryConfigLookup port - project ごとの配送設定

use async_trait::async_trait;

use crate::domain::{DeliveryConfig, Project, ResendError};

/// `Ok(None)` means the project has no configuration. That is not an error:
/// the project is simply left out of the registry.
#[async_trait]
pub trait DeliveryConfigLookup: Send + Sync {
    async fn lookup(&self, project: &Project) -> Result<Option<DeliveryConfig>, ResendError>;
}
