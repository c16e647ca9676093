//! `node_modules` lookup for installed packages.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, instrument};

use scafe_core::{
    application::ports::ModuleResolver,
    domain::{PackageName, ResolveError, ResolvedModule},
};

#[derive(Debug, Deserialize)]
struct PackageManifest {
    name: Option<String>,
    version: Option<String>,
}

/// Resolves packages from `<root>/node_modules/<name>/package.json`.
///
/// A missing manifest is [`ResolveError::NotFound`]; an unreadable or
/// malformed one (or one naming a different package) is
/// [`ResolveError::Broken`].
#[derive(Debug, Clone)]
pub struct NodeModulesResolver {
    root: PathBuf,
}

impl NodeModulesResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn location(&self, package: &PackageName) -> PathBuf {
        // Scoped names (`@scope/pkg`) map onto nested directories.
        self.root.join("node_modules").join(package.as_str())
    }
}

impl ModuleResolver for NodeModulesResolver {
    #[instrument(skip(self), fields(package = %package))]
    fn resolve(&self, package: &PackageName) -> Result<ResolvedModule, ResolveError> {
        let location = self.location(package);
        let manifest_path = location.join("package.json");

        let raw = match fs::read_to_string(&manifest_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %manifest_path.display(), "not installed");
                return Err(ResolveError::NotFound {
                    package: package.to_string(),
                });
            }
            Err(e) => return Err(broken(package, &manifest_path, e)),
        };

        let manifest: PackageManifest =
            serde_json::from_str(&raw).map_err(|e| broken(package, &manifest_path, e))?;

        if let Some(name) = manifest.name.as_deref() {
            if name != package.as_str() {
                return Err(ResolveError::Broken {
                    package: package.to_string(),
                    reason: format!("{} declares name '{}'", manifest_path.display(), name),
                });
            }
        }

        debug!(version = ?manifest.version, "resolved");
        Ok(ResolvedModule {
            name: package.clone(),
            version: manifest.version,
            location,
        })
    }
}

fn broken(package: &PackageName, path: &Path, e: impl std::fmt::Display) -> ResolveError {
    ResolveError::Broken {
        package: package.to_string(),
        reason: format!("{}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn install(root: &Path, name: &str, manifest: &str) {
        let dir = root.join("node_modules").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("package.json"), manifest).unwrap();
    }

    fn pkg(name: &str) -> PackageName {
        PackageName::new(name).unwrap()
    }

    #[test]
    fn resolves_version() {
        let tmp = TempDir::new().unwrap();
        install(tmp.path(), "express", r#"{"name":"express","version":"4.19.2"}"#);

        let module = NodeModulesResolver::new(tmp.path())
            .resolve(&pkg("express"))
            .unwrap();
        assert_eq!(module.version.as_deref(), Some("4.19.2"));
        assert!(module.location.ends_with("node_modules/express"));
    }

    #[test]
    fn scoped_packages_are_nested() {
        let tmp = TempDir::new().unwrap();
        install(tmp.path(), "@prisma/client", r#"{"name":"@prisma/client"}"#);

        let module = NodeModulesResolver::new(tmp.path())
            .resolve(&pkg("@prisma/client"))
            .unwrap();
        assert_eq!(module.version, None);
    }

    #[test]
    fn missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = NodeModulesResolver::new(tmp.path())
            .resolve(&pkg("cors"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn invalid_json_is_broken() {
        let tmp = TempDir::new().unwrap();
        install(tmp.path(), "winston", "{ not json");
        let err = NodeModulesResolver::new(tmp.path())
            .resolve(&pkg("winston"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Broken { .. }));
    }

    #[test]
    fn mismatched_name_is_broken() {
        let tmp = TempDir::new().unwrap();
        install(tmp.path(), "qrcode", r#"{"name":"something-else"}"#);
        let err = NodeModulesResolver::new(tmp.path())
            .resolve(&pkg("qrcode"))
            .unwrap_err();
        assert!(!err.is_not_found());
    }
}
