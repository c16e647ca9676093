//! Local filesystem adapter using std::fs.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use scafe_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::Outcome,
    error::{ScafeError, ScafeResult},
};

/// Production filesystem implementation using `std::fs`.
///
/// Creation is never recursive and never overwrites: an `AlreadyExists`
/// error from the OS is reported as [`Outcome::Exists`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling link still counts as present
        path.symlink_metadata().is_ok()
    }

    fn create_dir(&self, path: &Path) -> ScafeResult<Outcome> {
        match fs::create_dir(path) {
            Ok(()) => Ok(Outcome::Created),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(Outcome::Exists),
            Err(e) => Err(map_io_error(path, e, "create directory")),
        }
    }

    fn write_new(&self, path: &Path, content: &str) -> ScafeResult<Outcome> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(Outcome::Exists),
            Err(e) => return Err(map_io_error(path, e, "create file")),
        };
        file.write_all(content.as_bytes())
            .map_err(|e| map_io_error(path, e, "write file"))?;
        Ok(Outcome::Created)
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> ScafeResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)
                .map_err(|e| map_io_error(path, e, "get metadata"))?
                .permissions();
            let mode = perms.mode();
            perms.set_mode(if executable { mode | 0o111 } else { mode & !0o111 });
            fs::set_permissions(path, perms)
                .map_err(|e| map_io_error(path, e, "set permissions"))?;
        }
        #[cfg(not(unix))]
        {
            let _ = (path, executable);
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> ScafeResult<()> {
        fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ScafeError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_dir_reports_existing() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let dir = tmp.path().join("auth");

        assert_eq!(fs.create_dir(&dir).unwrap(), Outcome::Created);
        assert_eq!(fs.create_dir(&dir).unwrap(), Outcome::Exists);
    }

    #[test]
    fn create_dir_is_not_recursive() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFilesystem
            .create_dir(&tmp.path().join("a/b"))
            .unwrap_err();
        assert!(err.to_string().contains("create directory"));
    }

    #[test]
    fn write_new_never_overwrites() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("README.md");
        std::fs::write(&file, "mine").unwrap();

        let outcome = LocalFilesystem.write_new(&file, "generated").unwrap();

        assert_eq!(outcome, Outcome::Exists);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "mine");
    }

    #[test]
    fn write_new_creates_content() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("index.js");

        assert_eq!(
            LocalFilesystem.write_new(&file, "console.log(1);").unwrap(),
            Outcome::Created
        );
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "console.log(1);");
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_is_set() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("install.sh");
        LocalFilesystem.write_new(&file, "#!/bin/sh\n").unwrap();
        LocalFilesystem.set_permissions(&file, true).unwrap();

        let mode = std::fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn remove_file_deletes() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("setup.js");
        std::fs::write(&file, "").unwrap();

        LocalFilesystem.remove_file(&file).unwrap();
        assert!(!LocalFilesystem.exists(&file));
        assert!(LocalFilesystem.remove_file(&file).is_err());
    }
}
