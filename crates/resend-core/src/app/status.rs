//! Status - registry の現在の snapshot の要約

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{RegistrySnapshot, SnapshotId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStatus {
    pub snapshot_id: SnapshotId,
    pub taken_at: DateTime<Utc>,
    pub projects: usize,
    pub builds: usize,
    pub records: usize,
    pub modules: usize,
    pub refreshes: u64,
}

impl RegistryStatus {
    pub fn from_snapshot(snapshot: &RegistrySnapshot, refreshes: u64) -> Self {
        let aggregates = snapshot.aggregates();
        let modules: HashSet<&str> = aggregates
            .iter()
            .flat_map(|a| a.records())
            .map(|r| r.module.as_str())
            .collect();
        Self {
            snapshot_id: snapshot.id(),
            taken_at: snapshot.taken_at(),
            projects: aggregates.len(),
            builds: aggregates.iter().map(|a| a.builds().len()).sum(),
            records: aggregates.iter().map(|a| a.record_count()).sum(),
            modules: modules.len(),
            refreshes,
        }
    }
}
