//! `scafe config`: read and write configuration values.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    cmd: ConfigCommands,
    explicit: Option<&PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_value(&config, &key)?;
            if output.is_json() {
                output.json(&value)?;
            } else {
                output.print(&display_value(&value))?;
            }
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::active_path(explicit);
            set_value(&path, &key, &value)?;
            output.success(&format!("{key} = {value} ({})", path.display()))?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
            } else {
                output.print(config.to_toml()?.trim_end())?;
            }
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::active_path(explicit).display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn check_key(key: &str) -> CliResult<()> {
    if AppConfig::KEYS.contains(&key) {
        Ok(())
    } else {
        Err(CliError::UnknownConfigKey { key: key.into() })
    }
}

/// Look up a dotted key in the effective configuration.
fn get_value(config: &AppConfig, key: &str) -> CliResult<toml::Value> {
    check_key(key)?;
    let tree = toml::Value::try_from(config).map_err(|e| CliError::ConfigError {
        message: format!("failed to serialise configuration: {e}"),
        source: Some(Box::new(e)),
    })?;
    // Unset optional values are absent from the serialised tree.
    Ok(key
        .split('.')
        .try_fold(&tree, |node, part| node.get(part))
        .cloned()
        .unwrap_or_else(|| toml::Value::String(String::new())))
}

fn display_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Interpret a raw command-line value for `key`.
fn parse_value(key: &str, raw: &str) -> toml::Value {
    if key == "defaults.services" {
        return toml::Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| toml::Value::String(s.into()))
                .collect(),
        );
    }
    match raw {
        "true" => toml::Value::Boolean(true),
        "false" => toml::Value::Boolean(false),
        _ => toml::Value::String(raw.into()),
    }
}

/// Update one key in the file at `path`, validating the result first.
fn set_value(path: &Path, key: &str, raw: &str) -> CliResult<()> {
    check_key(key)?;

    let existing = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(CliError::IoError {
                message: format!("Failed to read '{}'", path.display()),
                source: e,
            });
        }
    };
    let mut table: toml::Table = existing.parse().map_err(|e: toml::de::Error| {
        CliError::ConfigError {
            message: format!("'{}' is not valid TOML: {e}", path.display()),
            source: Some(Box::new(e)),
        }
    })?;

    let (section, field) = key.split_once('.').ok_or_else(|| CliError::UnknownConfigKey {
        key: key.into(),
    })?;
    let entry = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    let toml::Value::Table(section_table) = entry else {
        return Err(CliError::ConfigError {
            message: format!("'{section}' in '{}' is not a table", path.display()),
            source: None,
        });
    };
    section_table.insert(field.to_string(), parse_value(key, raw));

    let rendered = toml::to_string_pretty(&table).map_err(|e| CliError::ConfigError {
        message: format!("failed to serialise configuration: {e}"),
        source: Some(Box::new(e)),
    })?;
    // Reject values the loader would not accept.
    AppConfig::from_toml(&rendered)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, rendered).map_err(|e| CliError::IoError {
        message: format!("Failed to write '{}'", path.display()),
        source: e,
    })?;
    debug!(key, path = %path.display(), "configuration updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use scafe_adapters::PackageManagerKind;
    use scafe_core::domain::DatabaseKind;

    use super::*;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        assert_eq!(
            display_value(&get_value(&cfg, "defaults.database").unwrap()),
            "postgres"
        );
        assert_eq!(
            display_value(&get_value(&cfg, "install.verify").unwrap()),
            "true"
        );
    }

    #[test]
    fn unset_optional_reads_empty() {
        let cfg = AppConfig::default();
        assert_eq!(
            display_value(&get_value(&cfg, "logging.directory").unwrap()),
            ""
        );
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_value(&cfg, "does.not.exist"),
            Err(CliError::UnknownConfigKey { .. })
        ));
    }

    #[test]
    fn set_creates_and_updates_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/config.toml");

        set_value(&path, "install.manager", "pnpm").unwrap();
        set_value(&path, "defaults.services", "auth, billing").unwrap();
        set_value(&path, "defaults.redis", "true").unwrap();

        let cfg = AppConfig::from_toml(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cfg.install.manager, PackageManagerKind::Pnpm);
        assert_eq!(cfg.defaults.services, ["auth", "billing"]);
        assert!(cfg.defaults.redis);
        assert_eq!(cfg.defaults.database, DatabaseKind::Postgres);
    }

    #[test]
    fn set_rejects_invalid_value_without_writing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        let err = set_value(&path, "defaults.database", "oracle").unwrap_err();
        assert!(matches!(err, CliError::ConfigError { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn set_rejects_unknown_key() {
        let tmp = TempDir::new().unwrap();
        let err = set_value(&tmp.path().join("c.toml"), "defaults.color", "x").unwrap_err();
        assert!(matches!(err, CliError::UnknownConfigKey { .. }));
    }
}
