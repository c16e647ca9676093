//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `scafe-adapters` crate provides implementations.

use std::path::Path;

#[cfg(test)]
use mockall::automock;

use crate::application::DependencyError;
use crate::domain::{DependencyGroup, Outcome, PackageName, ResolveError, ResolvedModule};
use crate::error::ScafeResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `scafe_adapters::filesystem::LocalFilesystem` (production)
/// - `scafe_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Creation is single-level: parents must already exist
/// - "Already exists" is reported as [`Outcome::Exists`], never as an error
/// - Writes use create-new semantics; existing content is never replaced
#[cfg_attr(test, automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create one directory whose parent exists.
    fn create_dir(&self, path: &Path) -> ScafeResult<Outcome>;

    /// Write `content` to a file that must not exist yet.
    fn write_new(&self, path: &Path, content: &str) -> ScafeResult<Outcome>;

    /// Set or clear the executable capability of a file.
    fn set_permissions(&self, path: &Path, executable: bool) -> ScafeResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> ScafeResult<()>;
}

/// Port for installing packages.
///
/// Implemented by:
/// - `scafe_adapters::package_manager::CommandPackageManager` (npm, pnpm, yarn)
#[cfg_attr(test, automock)]
pub trait PackageManager: Send + Sync {
    /// Executable name, for messages.
    fn name(&self) -> &'static str;

    /// Install `packages` into `group` with a single invocation.
    fn install(&self, packages: &[PackageName], group: DependencyGroup)
    -> Result<(), DependencyError>;
}

/// Port for checking whether a package is usable.
///
/// Implemented by:
/// - `scafe_adapters::resolver::NodeModulesResolver`
#[cfg_attr(test, automock)]
pub trait ModuleResolver: Send + Sync {
    /// Resolve an installed package.
    fn resolve(&self, package: &PackageName) -> Result<ResolvedModule, ResolveError>;
}
