//! Scafe Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Scafe
//! backend scaffolder, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            scafe-cli (CLI)              │
//! │   prompts, flags, config, output        │
//! └──────────────────┬──────────────────────┘
//!                    │ builds options, calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  PlanExecutor, Materializer,            │
//! │  DependencyResolver, CleanupService     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │ Filesystem, PackageManager,             │
//! │ ModuleResolver                          │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     scafe-adapters (Infrastructure)     │
//! │ LocalFilesystem, CommandPackageManager, │
//! │ NodeModulesResolver, blueprint          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scafe_core::prelude::*;
//!
//! let plan = ScaffoldPlan::builder("./shop")
//!     .service(ServiceSpec::new(ServiceName::new("auth")?).with_folder("config")?)
//!     .build()?;
//!
//! let executor = PlanExecutor::new(
//!     Materializer::new(filesystem),
//!     DependencyResolver::new(package_manager, module_resolver),
//! );
//! let report = executor.execute(&plan)?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CleanupReport, CleanupService, DependencyError, DependencyOutcome, DependencyResolver,
        EnsureMode, ExecutionReport, ExecutorOptions, Materializer, PlanExecutor, ServiceReport,
        ports::{Filesystem, ModuleResolver, PackageManager},
    };
    pub use crate::domain::{
        DatabaseKind, DependencyGroup, DependencySet, FileSpec, ManifestInfo, Materialized,
        Outcome, PackageName, ProjectOptions, ResolveError, ResolvedModule, ScaffoldPlan,
        ServiceName, ServiceSpec,
    };
    pub use crate::error::{ScafeError, ScafeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
