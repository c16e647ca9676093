//! Cleanup Service - best-effort deletion of transient artifacts.
//!
//! Each path is removed only if it exists. Failures are logged and recorded
//! but never abort the run.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::application::ports::Filesystem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum CleanupStatus {
    Deleted,
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupEntry {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: CleanupStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub entries: Vec<CleanupEntry>,
}

impl CleanupReport {
    pub fn deleted(&self) -> usize {
        self.count(|s| matches!(s, CleanupStatus::Deleted))
    }

    pub fn missing(&self) -> usize {
        self.count(|s| matches!(s, CleanupStatus::Missing))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, CleanupStatus::Failed(_)))
    }

    fn count(&self, f: impl Fn(&CleanupStatus) -> bool) -> usize {
        self.entries.iter().filter(|e| f(&e.status)).count()
    }
}

pub struct CleanupService {
    filesystem: Box<dyn Filesystem>,
}

impl CleanupService {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Delete every path in `paths` that exists. Never fails.
    #[instrument(skip_all, fields(count = paths.len()))]
    pub fn run<P: AsRef<Path>>(&self, paths: &[P]) -> CleanupReport {
        let entries = paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                CleanupEntry {
                    path: path.to_path_buf(),
                    status: self.remove(path),
                }
            })
            .collect();
        CleanupReport { entries }
    }

    fn remove(&self, path: &Path) -> CleanupStatus {
        if !self.filesystem.exists(path) {
            info!(path = %path.display(), "not present, nothing to delete");
            return CleanupStatus::Missing;
        }
        match self.filesystem.remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "deleted");
                CleanupStatus::Deleted
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not delete");
                CleanupStatus::Failed(e.to_string())
            }
        }
    }
}
