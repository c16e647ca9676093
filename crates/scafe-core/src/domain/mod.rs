// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Scafe.
//!
//! This module contains pure data and rules with no I/O. Filesystem and
//! package-manager access happen through ports defined in the application
//! layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or subprocess calls
//! - **No tracing**: Observability belongs to the application and CLI layers
//! - **Validated on construction**: names and paths cannot exist in an
//!   invalid state
pub mod common;
pub mod entities;
pub mod error;
pub mod value_objects;

mod validation;

pub use entities::{
    dependencies::{DependencySet, ResolveError, ResolvedModule},
    materialized::{EntryKind, Materialized, Outcome},
    options::{GATEWAY_SERVICE, ManifestInfo, ProjectOptions, ProjectOptionsBuilder},
    plan::{FileSpec, PlanBuilder, ScaffoldPlan, ServiceSpec},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{DatabaseKind, DependencyGroup, PackageName, ServiceName};

pub use common::RelativePath;
pub use validation::DomainValidator;
