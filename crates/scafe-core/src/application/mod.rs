//! Application layer for Scafe.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (Materializer, DependencyResolver,
//!   PlanExecutor, CleanupService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! rules itself. Every invariant lives in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CleanupEntry, CleanupReport, CleanupService, CleanupStatus, DependencyOutcome,
    DependencyResolver, EnsureMode, ExecutionReport, ExecutorOptions, Materializer, PlanExecutor, ServiceReport,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, ModuleResolver, PackageManager};

pub use error::{ApplicationError, DependencyError};
