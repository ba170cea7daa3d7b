//! Host-side entities: projects, builds and the pending notification records
//! attached to builds.
//!
//! These are plain values. The host owns the real objects; this crate only
//! sees the identifying data it needs to resend a notification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named, persistent build definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Project {
    name: String,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One execution of a project, identified by project name and build number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Build {
    pub project: Project,
    pub number: u64,
}

impl Build {
    pub fn new(project: Project, number: u64) -> Self {
        Self { project, number }
    }
}

impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.project, self.number)
    }
}

/// A module/version whose delivery notification has not succeeded yet.
///
/// Immutable once created. The record stops being enumerable when the host
/// clears its marker on the build (typically after a successful resend).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingNotification {
    pub build: Build,
    pub module: String,
    pub version: String,
}

impl PendingNotification {
    pub fn new(build: Build, module: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            build,
            module: module.into(),
            version: version.into(),
        }
    }
}
