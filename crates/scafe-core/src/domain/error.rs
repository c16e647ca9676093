// ============================================================================
// domain/error.rs - DOMAIN VALIDATION ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports keep them after the run continues)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Naming
    // ========================================================================
    #[error("Invalid service name '{name}': {reason}")]
    InvalidServiceName { name: String, reason: String },

    #[error("Invalid package name '{name}': {reason}")]
    InvalidPackageName { name: String, reason: String },

    #[error("Unknown database '{0}'")]
    UnknownDatabase(String),

    // ========================================================================
    // Path containment
    // ========================================================================
    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path '{path}' escapes its base directory")]
    PathEscapesBase { path: String },

    #[error("Empty path not allowed")]
    EmptyPath,

    // ========================================================================
    // Plan consistency
    // ========================================================================
    #[error("Duplicate service in plan: {name}")]
    DuplicateService { name: String },

    #[error("Duplicate path in service '{service}': {path}")]
    DuplicatePath { service: String, path: String },

    #[error("Plan has no services")]
    EmptyPlan,
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidServiceName { .. } => vec![
                "Use letters, digits, '-' and '_' only".into(),
                "Examples: auth, user-service, billing_api".into(),
            ],
            Self::InvalidPackageName { name, .. } => vec![
                format!("'{}' is not a valid npm package name", name),
                "Package names are lowercase, URL-safe, optionally scoped (@scope/name)".into(),
            ],
            Self::UnknownDatabase(_) => vec![
                "Supported databases: postgres, mysql, mariadb, mongodb, sqlite".into(),
            ],
            Self::PathEscapesBase { path } | Self::AbsolutePathNotAllowed { path } => vec![
                format!("'{}' must stay inside the service directory", path),
                "Use a relative path without '..' components".into(),
            ],
            Self::DuplicateService { name } => vec![
                format!("Service '{}' was given more than once", name),
                "Note: 'gateway' is always generated".into(),
            ],
            Self::EmptyPlan => vec!["Declare at least one service".into()],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidServiceName { .. }
            | Self::InvalidPackageName { .. }
            | Self::UnknownDatabase(_)
            | Self::DuplicateService { .. }
            | Self::EmptyPlan => ErrorCategory::Validation,
            Self::AbsolutePathNotAllowed { .. }
            | Self::PathEscapesBase { .. }
            | Self::EmptyPath
            | Self::DuplicatePath { .. } => ErrorCategory::Containment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Containment,
}
