//! In-memory filesystem adapter for testing and dry runs.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockWriteGuard},
};

use scafe_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::Outcome,
    error::ScafeResult,
};

/// In-memory filesystem.
///
/// Follows the same contract as [`super::LocalFilesystem`]: parents must
/// exist, nothing is overwritten. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    executables: HashSet<PathBuf>,
    failing: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing directory and all of its ancestors.
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let mut current = PathBuf::new();
            for component in path.as_ref().components() {
                current.push(component);
                inner.directories.insert(current.clone());
            }
        }
        self
    }

    /// Seed an existing file. Its parent is not checked.
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner
                .files
                .insert(path.as_ref().to_path_buf(), content.to_string());
        }
        self
    }

    /// Make every create or remove at `path` fail.
    pub fn fail_on(self, path: impl AsRef<Path>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing.insert(path.as_ref().to_path_buf());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    pub fn is_executable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.executables.contains(path))
            .unwrap_or(false)
    }

    /// All files, sorted by path.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// All directories, sorted by path.
    pub fn list_dirs(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.directories.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryFilesystemInner>, ApplicationError> {
        self.inner.write().map_err(|_| ApplicationError::LockPoisoned {
            name: "memory filesystem",
        })
    }
}

impl MemoryFilesystemInner {
    fn check(&self, path: &Path) -> Result<(), ApplicationError> {
        if self.failing.contains(path) {
            return Err(ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "Simulated failure".into(),
            });
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !self.directories.contains(parent) {
                return Err(ApplicationError::Filesystem {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                });
            }
        }
        Ok(())
    }

    fn occupied(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.occupied(path))
            .unwrap_or(false)
    }

    fn create_dir(&self, path: &Path) -> ScafeResult<Outcome> {
        let mut inner = self.write()?;
        if inner.occupied(path) {
            return Ok(Outcome::Exists);
        }
        inner.check(path)?;
        inner.directories.insert(path.to_path_buf());
        Ok(Outcome::Created)
    }

    fn write_new(&self, path: &Path, content: &str) -> ScafeResult<Outcome> {
        let mut inner = self.write()?;
        if inner.occupied(path) {
            return Ok(Outcome::Exists);
        }
        inner.check(path)?;
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(Outcome::Created)
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> ScafeResult<()> {
        let mut inner = self.write()?;
        if executable {
            inner.executables.insert(path.to_path_buf());
        } else {
            inner.executables.remove(path);
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> ScafeResult<()> {
        let mut inner = self.write()?;
        if inner.failing.contains(path) || inner.files.remove(path).is_none() {
            return Err(ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "Failed to remove file".into(),
            }
            .into());
        }
        inner.executables.remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_must_exist() {
        let fs = MemoryFilesystem::new().with_dir("/p");
        assert!(fs.create_dir(Path::new("/p/a/b")).is_err());
        assert_eq!(fs.create_dir(Path::new("/p/a")).unwrap(), Outcome::Created);
        assert_eq!(fs.create_dir(Path::new("/p/a/b")).unwrap(), Outcome::Created);
    }

    #[test]
    fn existing_file_is_kept() {
        let fs = MemoryFilesystem::new()
            .with_dir("/p")
            .with_file("/p/README.md", "mine");
        assert_eq!(
            fs.write_new(Path::new("/p/README.md"), "new").unwrap(),
            Outcome::Exists
        );
        assert_eq!(fs.read_file(Path::new("/p/README.md")).unwrap(), "mine");
    }

    #[test]
    fn injected_failure_surfaces() {
        let fs = MemoryFilesystem::new().with_dir("/p").fail_on("/p/x");
        assert!(fs.create_dir(Path::new("/p/x")).is_err());
        assert!(!fs.exists(Path::new("/p/x")));
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new().with_dir("/p");
        let other = fs.clone();
        other.write_new(Path::new("/p/f"), "x").unwrap();
        assert_eq!(fs.list_files(), vec![PathBuf::from("/p/f")]);
    }
}
