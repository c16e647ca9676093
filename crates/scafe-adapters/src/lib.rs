//! Infrastructure adapters for Scafe.
//!
//! This crate implements the ports defined in `scafe-core::application::ports`
//! and owns everything that knows about Node projects: the blueprint and its
//! embedded templates, the package catalog and the installer script.

pub mod blueprint;
pub mod catalog;
pub mod filesystem;
pub mod installer;
pub mod package_manager;
pub mod resolver;
pub mod tree;

// Re-export commonly used adapters
pub use blueprint::Blueprint;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use installer::InstallerScript;
pub use package_manager::{CommandPackageManager, PackageManagerKind};
pub use resolver::NodeModulesResolver;
