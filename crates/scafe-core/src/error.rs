//! Unified error handling for Scafe Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use std::path::Path;

use thiserror::Error;

use crate::application::{ApplicationError, DependencyError};
use crate::domain::DomainError;

/// Root error type for Scafe Core operations.
#[derive(Debug, Error, Clone)]
pub enum ScafeError {
    /// Errors from the domain layer (invalid names, paths, plans).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (I/O, dependencies).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl From<DependencyError> for ScafeError {
    fn from(err: DependencyError) -> Self {
        Self::Application(ApplicationError::Dependency(err))
    }
}

impl ScafeError {
    /// Build the filesystem variant for `path`.
    pub fn filesystem(path: &Path, reason: impl Into<String>) -> Self {
        ApplicationError::Filesystem {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
        .into()
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Scafe".into(),
                "Please report this issue at: https://github.com/cosecruz/scafe/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(_) => ErrorCategory::Validation,
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether the failure came from the dependency stage.
    pub fn is_dependency(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::Dependency(_)))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Filesystem,
    Dependency,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type ScafeResult<T> = Result<T, ScafeError>;
