//! Materializer - idempotent create-if-absent for directories and files.
//!
//! Every operation produces its path at most once and never disturbs what is
//! already there, so a run interrupted halfway can simply be repeated.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::{
    application::ports::Filesystem,
    domain::{EntryKind, FileSpec, Materialized, Outcome},
    error::ScafeResult,
};

/// Create-if-absent front end over a [`Filesystem`] port.
pub struct Materializer {
    filesystem: Box<dyn Filesystem>,
}

impl Materializer {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Ensure `path` exists as a directory.
    ///
    /// The parent must already exist. An existing entry at `path` is left
    /// alone and reported as [`Outcome::Exists`].
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn ensure_dir(&self, path: &Path) -> ScafeResult<Materialized> {
        let outcome = if self.filesystem.exists(path) {
            Outcome::Exists
        } else {
            self.filesystem.create_dir(path)?
        };
        Ok(trace(path, EntryKind::Directory, outcome))
    }

    /// Ensure `path` exists as a file, writing `content` only if it is absent.
    ///
    /// Existing content is never compared or overwritten.
    #[instrument(skip_all, fields(path = %path.display(), bytes = content.len()))]
    pub fn ensure_file(&self, path: &Path, content: &str) -> ScafeResult<Materialized> {
        let outcome = if self.filesystem.exists(path) {
            Outcome::Exists
        } else {
            self.filesystem.write_new(path, content)?
        };
        Ok(trace(path, EntryKind::File, outcome))
    }

    /// Ensure a [`FileSpec`] under `base`, marking it executable when it was
    /// freshly created and flagged executable.
    pub fn ensure_spec(&self, base: &Path, spec: &FileSpec) -> ScafeResult<Materialized> {
        let path = base.join(spec.path.as_path());
        let entry = self.ensure_file(&path, &spec.content)?;
        if spec.executable && entry.is_created() {
            self.filesystem.set_permissions(&path, true)?;
        }
        Ok(entry)
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.filesystem.exists(path)
    }
}

fn trace(path: &Path, kind: EntryKind, outcome: Outcome) -> Materialized {
    match outcome {
        Outcome::Created => info!(path = %path.display(), ?kind, "created"),
        Outcome::Exists => debug!(path = %path.display(), ?kind, "exists"),
    }
    Materialized {
        path: path.to_path_buf(),
        kind,
        outcome,
    }
}
