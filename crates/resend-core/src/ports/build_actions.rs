//! BuildActionSource port - build に付いている pending notification の列挙
//!
//! record の出現・消滅は host 側の配送状態で決まります。このクレートからは
//! 読み取りのみ。

use async_trait::async_trait;

use crate::domain::{Build, PendingNotification, ResendError};

#[async_trait]
pub trait BuildActionSource: Send + Sync {
    /// Records currently marked pending on `build`. Empty when none.
    async fn pending_notifications(
        &self,
        build: &Build,
    ) -> Result<Vec<PendingNotification>, ResendError>;
}
