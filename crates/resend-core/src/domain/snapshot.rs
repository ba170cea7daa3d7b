//! RegistrySnapshot: the immutable result of one refresh pass.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use super::aggregate::ProjectAggregate;
use super::ids::SnapshotId;

#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    id: SnapshotId,
    taken_at: DateTime<Utc>,
    aggregates: Vec<ProjectAggregate>,
}

impl RegistrySnapshot {
    pub fn new(id: SnapshotId, taken_at: DateTime<Utc>, aggregates: Vec<ProjectAggregate>) -> Self {
        Self {
            id,
            taken_at,
            aggregates,
        }
    }

    pub fn empty(id: SnapshotId, taken_at: DateTime<Utc>) -> Self {
        Self::new(id, taken_at, Vec::new())
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn aggregates(&self) -> &[ProjectAggregate] {
        &self.aggregates
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    /// Module name → version to resend.
    ///
    /// When several records share a module name, the last one in snapshot
    /// order wins.
    pub fn modules(&self) -> HashMap<String, String> {
        let mut modules = HashMap::new();
        for record in self.aggregates.iter().flat_map(|a| a.records()) {
            modules.insert(record.module.clone(), record.version.clone());
        }
        modules
    }

    /// Module name → every pending version of that module.
    pub fn module_versions(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut modules: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for record in self.aggregates.iter().flat_map(|a| a.records()) {
            modules
                .entry(record.module.clone())
                .or_default()
                .insert(record.version.clone());
        }
        modules
    }
}
