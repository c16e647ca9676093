//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not rule
//! violations. Rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while executing a plan.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed for a reason other than pre-existence.
    #[error("Filesystem error at {path}: {reason}")]
    Filesystem { path: PathBuf, reason: String },

    /// A package could not be made available.
    #[error(transparent)]
    Dependency(#[from] DependencyError),

    /// Shared adapter state was poisoned by a panicking writer.
    #[error("Adapter state lock poisoned: {name}")]
    LockPoisoned { name: &'static str },

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Failures of the install-or-fallback routine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DependencyError {
    /// Resolution failed for a reason installing cannot fix.
    #[error("Package '{package}' could not be resolved: {reason}")]
    Unresolvable { package: String, reason: String },

    /// The package manager exited unsuccessfully (or could not be spawned).
    #[error("{manager} failed to install {}: {reason}", .packages.join(" "))]
    InstallFailed {
        manager: String,
        packages: Vec<String>,
        reason: String,
    },

    /// The single retry after installing still could not find the package.
    #[error("Package '{package}' is still missing after installing it")]
    StillMissing { package: String },
}

impl DependencyError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Unresolvable { package, .. } => vec![
                format!("Inspect node_modules/{}/package.json", package),
                format!("Remove node_modules/{} and run the command again", package),
            ],
            Self::InstallFailed { manager, .. } => vec![
                format!("Ensure '{}' is installed and on your PATH", manager),
                "Check your network connection and registry settings".into(),
                "Re-running is safe: existing files are left untouched".into(),
            ],
            Self::StillMissing { package } => vec![
                format!("The package manager reported success but '{}' is absent", package),
                "Check that the install ran in the project root".into(),
            ],
        }
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::Dependency(e) => e.suggestions(),
            Self::LockPoisoned { name } => vec![
                format!("Internal state '{}' is unusable", name),
                "This is likely a bug; please report it".into(),
            ],
            Self::ValidationFailed(_) => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Filesystem { .. } => ErrorCategory::Filesystem,
            Self::Dependency(_) => ErrorCategory::Dependency,
            Self::LockPoisoned { .. } => ErrorCategory::Internal,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_failure_lists_packages() {
        let err = DependencyError::InstallFailed {
            manager: "npm".into(),
            packages: vec!["express".into(), "cors".into()],
            reason: "exit status 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "npm failed to install express cors: exit status 1"
        );
    }

    #[test]
    fn dependency_errors_are_categorised() {
        let err: ApplicationError = DependencyError::StillMissing {
            package: "ioredis".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Dependency);
        assert!(!err.suggestions().is_empty());
    }
}
