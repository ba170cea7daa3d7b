//! Domain model (records, aggregates, snapshots, outcomes, errors).

pub mod aggregate;
pub mod config;
pub mod errors;
pub mod ids;
pub mod outcome;
pub mod record;
pub mod snapshot;

pub use aggregate::{BuildNotifications, ProjectAggregate};
pub use config::{Credentials, DeliveryConfig, PayloadFormat};
pub use errors::{ErrorKind, ResendError};
pub use ids::{ReplayId, SnapshotId};
pub use outcome::{AggregateOutcome, OutcomeKind, ReplayReport};
pub use record::{Build, PendingNotification, Project};
pub use snapshot::RegistrySnapshot;
