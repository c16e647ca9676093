//! Error handling for the scafe CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining
//! - Exit code mapping

use std::error::Error as _;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use scafe_core::{
    domain::DomainError,
    error::{ErrorCategory as CoreCategory, ScafeError},
};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// A path exists but is not a directory, so nothing can be created there.
    #[error("'{path}' exists and is not a directory")]
    NotADirectory { path: PathBuf },

    /// The question/answer session could not continue.
    #[error("Prompt failed: {message}")]
    Prompt {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Config errors ──────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unknown configuration key '{key}'")]
    UnknownConfigKey { key: String },

    // ── Core errors ────────────────────────────────────────────────────────
    /// Wrapped so suggestions can be drawn from the core error's category.
    #[error("Scaffolding failed: {0}")]
    Core(#[from] ScafeError),

    /// Some services could not be generated; the rest of the run finished.
    #[error("{} of {total} services failed: {}", failed.len(), failed.join(", "))]
    PartialScaffold { failed: Vec<String>, total: usize },

    // ── System errors ──────────────────────────────────────────────────────
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation cancelled")]
    Cancelled,

    /// Interactive prompts were needed but the build has no `interactive` feature.
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {message}"),
                "Use --help for usage information".into(),
            ],

            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{name}' is invalid: {reason}"),
                "Use lowercase letters, digits, '-', '_' and '.'".into(),
                "Examples: shop, my-api, acme-backend".into(),
            ],

            Self::NotADirectory { path } => vec![
                format!("Remove or rename '{}'", path.display()),
                "Or choose a different project name".into(),
            ],

            Self::Prompt { .. } => vec![
                "Answer the question again, or pass the matching flag".into(),
                "Use --yes to accept defaults without prompting".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                "Inspect the effective values: scafe config list".into(),
                "Recreate a default file: scafe init --force".into(),
            ],

            Self::UnknownConfigKey { .. } => {
                let mut out = vec!["Known keys:".to_string()];
                out.extend(
                    crate::config::AppConfig::KEYS
                        .iter()
                        .map(|k| format!("  • {k}")),
                );
                out
            }

            Self::Core(core_err) => core_err.suggestions(),

            Self::PartialScaffold { .. } => vec![
                "Fix the reported problem and run the same command again".into(),
                "Existing files are kept; only missing entries are created".into(),
            ],

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Cancelled => vec!["No changes were made".into()],

            Self::FeatureNotAvailable { feature } => vec![
                format!("The '{feature}' feature is not available in this build"),
                "Pass every answer as a flag, or add --yes to use defaults".into(),
                format!("Or reinstall with: cargo install scafe-cli --features {feature}"),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. }
            | Self::InvalidProjectName { .. }
            | Self::NotADirectory { .. }
            | Self::Prompt { .. }
            | Self::Cancelled => ErrorCategory::UserError,
            Self::ConfigError { .. } | Self::FeatureNotAvailable { .. } => {
                ErrorCategory::Configuration
            }
            Self::UnknownConfigKey { .. } => ErrorCategory::NotFound,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Filesystem | CoreCategory::Dependency | CoreCategory::Internal => {
                    ErrorCategory::Internal
                }
            },
            Self::PartialScaffold { .. } | Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`].
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = format!("\nError: {self}\n");

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Machine-readable form for `--output-format json`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.to_string(),
            "category": self.category().as_str(),
            "exit_code": self.exit_code(),
            "suggestions": self.suggestions(),
        })
    }

    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Validation or invalid arguments.
    UserError,
    NotFound,
    Configuration,
    /// Filesystem, package manager or a bug.
    Internal,
}

impl ErrorCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UserError => "user",
            Self::NotFound => "not_found",
            Self::Configuration => "configuration",
            Self::Internal => "internal",
        }
    }
}

impl From<DomainError> for CliError {
    fn from(err: DomainError) -> Self {
        CliError::Core(err.into())
    }
}

/// Map a dialoguer failure into [`CliError::Prompt`].
#[cfg(feature = "interactive")]
impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Prompt {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use scafe_core::application::{ApplicationError, DependencyError};

    use super::*;

    #[test]
    fn invalid_name_suggestions_non_empty() {
        let err = CliError::InvalidProjectName {
            name: ".hidden".into(),
            reason: "starts with '.'".into(),
        };
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn unknown_key_lists_known_keys() {
        let err = CliError::UnknownConfigKey { key: "nope".into() };
        assert!(err.suggestions().iter().any(|s| s.contains("install.manager")));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn exit_codes_follow_categories() {
        assert_eq!(
            CliError::InvalidInput {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            2
        );
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
        assert_eq!(
            CliError::FeatureNotAvailable {
                feature: "interactive"
            }
            .exit_code(),
            4
        );
    }

    #[test]
    fn core_errors_map_by_category() {
        let validation = CliError::Core(DomainError::EmptyPlan.into());
        assert_eq!(validation.exit_code(), 2);

        let dependency = CliError::Core(
            DependencyError::StillMissing {
                package: "ioredis".into(),
            }
            .into(),
        );
        assert_eq!(dependency.category(), ErrorCategory::Internal);

        let fs = CliError::Core(
            ApplicationError::Filesystem {
                path: "/x".into(),
                reason: "denied".into(),
            }
            .into(),
        );
        assert_eq!(fs.exit_code(), 1);
    }

    #[test]
    fn partial_scaffold_message_names_services() {
        let err = CliError::PartialScaffold {
            failed: vec!["auth".into()],
            total: 2,
        };
        assert_eq!(err.to_string(), "1 of 2 services failed: auth");
    }

    #[test]
    fn format_plain_contains_error_header() {
        let err = CliError::NotADirectory {
            path: PathBuf::from("/tmp/x"),
        };
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_shows_cause() {
        let err = CliError::IoError {
            message: "writing config".into(),
            source: io::Error::other("disk full"),
        };
        let s = err.format_plain(true);
        assert!(s.contains("Caused by: disk full"));
        assert!(!s.contains("--verbose"));
    }

    #[test]
    fn json_form_carries_exit_code() {
        let json = CliError::Cancelled.to_json();
        assert_eq!(json["exit_code"], 2);
        assert_eq!(json["category"], "user");
    }
}
