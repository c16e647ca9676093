//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `scafe-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: create-if-absent file operations
//!   - `PackageManager`: package installation
//!   - `ModuleResolver`: installed-package lookup
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{Filesystem, ModuleResolver, PackageManager};

#[cfg(test)]
pub use output::{MockFilesystem, MockModuleResolver, MockPackageManager};
