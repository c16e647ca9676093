//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "materialize a plan" or "ensure a package".

pub mod cleanup;
pub mod dependency_resolver;
pub mod materializer;
pub mod plan_executor;

#[cfg(test)]
pub(crate) mod testing;

pub use cleanup::{CleanupEntry, CleanupReport, CleanupService, CleanupStatus};
pub use dependency_resolver::{DependencyOutcome, DependencyResolver, EnsureMode};
pub use materializer::Materializer;
pub use plan_executor::{ExecutionReport, ExecutorOptions, PlanExecutor, ServiceReport};
