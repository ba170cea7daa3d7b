//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: Clock の時刻 + ランダム部分で ULID を生成

use crate::domain::ids::{ReplayId, SnapshotId};
use crate::ports::Clock;
use ulid::Ulid;

pub trait IdGenerator: Send + Sync {
    fn snapshot_id(&self) -> SnapshotId;

    fn replay_id(&self) -> ReplayId;
}

/// UlidGenerator は Clock ベースの ULID 生成器
///
/// FixedClock を渡すと timestamp 部分が決定的になります。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn snapshot_id(&self) -> SnapshotId {
        SnapshotId::from(self.next())
    }

    fn replay_id(&self) -> ReplayId {
        ReplayId::from(self.next())
    }
}
