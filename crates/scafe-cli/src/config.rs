//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `SCAFE__SECTION__KEY`, e.g. `SCAFE__INSTALL__MANAGER=pnpm`
//! 3. The file given with `--config` / `SCAFE_CONFIG`
//! 4. `.scafe.toml` in the current directory
//! 5. The user config file ([`AppConfig::config_path`])
//! 6. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use scafe_adapters::PackageManagerKind;
use scafe_core::{application::EnsureMode, domain::DatabaseKind};

use crate::{
    cli::OutputFormat,
    error::{CliError, CliResult},
};

/// File name of the per-directory configuration.
pub const LOCAL_CONFIG_FILE: &str = ".scafe.toml";

const ENV_PREFIX: &str = "SCAFE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Answers used with `--yes` when no flag was given.
    pub defaults: Defaults,
    pub install: InstallConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub database: DatabaseKind,
    /// Services besides the gateway.
    pub services: Vec<String>,
    pub redis: bool,
    pub multi_db: bool,
    pub mail: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    pub manager: PackageManagerKind,
    /// Resolve before installing; `false` installs every package outright.
    pub verify: bool,
    /// Never run the package manager.
    pub skip: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            manager: PackageManagerKind::Npm,
            verify: true,
            skip: false,
        }
    }
}

impl InstallConfig {
    pub fn ensure_mode(&self) -> EnsureMode {
        if self.verify {
            EnsureMode::Verify
        } else {
            EnsureMode::Install
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// Used when `--output-format` is left at `auto`.
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// When set, a daily-rolling log file is written here as well.
    pub directory: Option<PathBuf>,
}

impl AppConfig {
    /// Keys accepted by `scafe config get|set`.
    pub const KEYS: [&'static str; 11] = [
        "defaults.database",
        "defaults.services",
        "defaults.redis",
        "defaults.multi_db",
        "defaults.mail",
        "install.manager",
        "install.verify",
        "install.skip",
        "output.no_color",
        "output.format",
        "logging.directory",
    ];

    /// Load and merge every configuration source.
    ///
    /// `explicit` is the `--config` path; unlike the implicit locations it
    /// must exist.
    pub fn load(explicit: Option<&PathBuf>) -> CliResult<Self> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Self::default()).map_err(config_error)?)
            .add_source(
                File::from(Self::config_path())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                File::from(Path::new(LOCAL_CONFIG_FILE))
                    .format(FileFormat::Toml)
                    .required(false),
            );

        if let Some(path) = explicit {
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("defaults.services")
                    .try_parsing(true),
            )
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)
    }

    /// Parse a TOML document on top of the defaults.
    pub fn from_toml(contents: &str) -> CliResult<Self> {
        Config::builder()
            .add_source(Config::try_from(&Self::default()).map_err(config_error)?)
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.scafe.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "scafe", "scafe")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The file `config set` writes to.
    pub fn active_path(explicit: Option<&PathBuf>) -> PathBuf {
        match explicit {
            Some(path) => path.clone(),
            None if Path::new(LOCAL_CONFIG_FILE).is_file() => PathBuf::from(LOCAL_CONFIG_FILE),
            None => Self::config_path(),
        }
    }

    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("failed to serialise configuration: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

fn config_error(err: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: err.to_string(),
        source: Some(Box::new(err)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn defaults_match_prompt_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.database, DatabaseKind::Postgres);
        assert!(cfg.defaults.services.is_empty());
        assert!(!cfg.defaults.redis);
        assert_eq!(cfg.install.manager, PackageManagerKind::Npm);
        assert_eq!(cfg.install.ensure_mode(), EnsureMode::Verify);
        assert!(cfg.logging.directory.is_none());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = AppConfig::from_toml(
            "[defaults]\ndatabase = \"mysql\"\nredis = true\n\n[install]\nmanager = \"pnpm\"\n",
        )
        .unwrap();
        assert_eq!(cfg.defaults.database, DatabaseKind::Mysql);
        assert!(cfg.defaults.redis);
        assert!(!cfg.defaults.mail);
        assert_eq!(cfg.install.manager, PackageManagerKind::Pnpm);
        assert!(cfg.install.verify);
    }

    #[test]
    fn invalid_value_is_a_config_error() {
        let err = AppConfig::from_toml("[defaults]\ndatabase = \"oracle\"\n").unwrap_err();
        assert!(matches!(err, CliError::ConfigError { .. }));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[install]\nverify = false\nskip = true").unwrap();
        let path = file.path().to_path_buf();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.install.ensure_mode(), EnsureMode::Install);
        assert!(cfg.install.skip);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = PathBuf::from("/definitely/not/here/scafe.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn toml_round_trips_through_loader() {
        let mut cfg = AppConfig::default();
        cfg.defaults.services = vec!["auth".into(), "billing".into()];
        cfg.output.format = OutputFormat::Json;

        let parsed = AppConfig::from_toml(&cfg.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn explicit_path_wins_for_writes() {
        let path = PathBuf::from("custom.toml");
        assert_eq!(AppConfig::active_path(Some(&path)), path);
    }
}
