//! In-crate fake filesystem for service tests.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{
    application::ports::Filesystem,
    domain::Outcome,
    error::{ScafeError, ScafeResult},
};

#[derive(Debug, Default)]
struct State {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, String>,
    executables: HashSet<PathBuf>,
    failing: HashSet<PathBuf>,
    writes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FakeFilesystem {
    state: Arc<Mutex<State>>,
}

impl FakeFilesystem {
    pub fn with_dirs<const N: usize>(dirs: [&str; N]) -> Self {
        let fs = Self::default();
        {
            let mut state = fs.state.lock().unwrap();
            for dir in dirs {
                state.dirs.insert(PathBuf::from(dir));
            }
        }
        fs
    }

    pub fn put_file(&self, path: &str, content: &str) {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(PathBuf::from(path), content.to_string());
    }

    /// Make every operation on `path` fail.
    pub fn fail_on(&self, path: &str) {
        self.state.lock().unwrap().failing.insert(PathBuf::from(path));
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.state.lock().unwrap().dirs.contains(path)
    }

    pub fn read(&self, path: &Path) -> Option<String> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub fn is_executable(&self, path: &Path) -> bool {
        self.state.lock().unwrap().executables.contains(path)
    }

    pub fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    fn check(state: &State, path: &Path) -> ScafeResult<()> {
        if state.failing.contains(path) {
            return Err(ScafeError::filesystem(path, "injected failure"));
        }
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !state.dirs.contains(parent) => {
                Err(ScafeError::filesystem(path, "parent directory does not exist"))
            }
            _ => Ok(()),
        }
    }
}

impl Filesystem for FakeFilesystem {
    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.dirs.contains(path) || state.files.contains_key(path)
    }

    fn create_dir(&self, path: &Path) -> ScafeResult<Outcome> {
        let mut state = self.state.lock().unwrap();
        Self::check(&state, path)?;
        if state.dirs.insert(path.to_path_buf()) {
            state.writes += 1;
            Ok(Outcome::Created)
        } else {
            Ok(Outcome::Exists)
        }
    }

    fn write_new(&self, path: &Path, content: &str) -> ScafeResult<Outcome> {
        let mut state = self.state.lock().unwrap();
        Self::check(&state, path)?;
        if state.files.contains_key(path) {
            return Ok(Outcome::Exists);
        }
        state.files.insert(path.to_path_buf(), content.to_string());
        state.writes += 1;
        Ok(Outcome::Created)
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> ScafeResult<()> {
        let mut state = self.state.lock().unwrap();
        if executable {
            state.executables.insert(path.to_path_buf());
        } else {
            state.executables.remove(path);
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> ScafeResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.failing.contains(path) {
            return Err(ScafeError::filesystem(path, "injected failure"));
        }
        state
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| ScafeError::filesystem(path, "no such file"))
    }
}
