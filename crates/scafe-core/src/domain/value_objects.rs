//! Domain value objects: ServiceName, PackageName, DependencyGroup, DatabaseKind.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. Each
//! validates on construction so that a value that exists is always usable as
//! a directory name or a package-manager argument.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ── ServiceName ──────────────────────────────────────────────────────────────

/// The name of one generated service; doubles as its directory name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    pub const MAX_LEN: usize = 64;

    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let invalid = |reason: &str| DomainError::InvalidServiceName {
            name: name.clone(),
            reason: reason.into(),
        };

        if name.is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if name.len() > Self::MAX_LEN {
            return Err(invalid("name is longer than 64 characters"));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(invalid("name cannot contain path separators"));
        }
        if !name.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err(invalid("name must start with a letter or digit"));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(invalid(&format!("character '{c}' is not allowed")));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ServiceName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ── PackageName ──────────────────────────────────────────────────────────────

/// An npm package name, optionally scoped (`@scope/name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    pub const MAX_LEN: usize = 214;

    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let invalid = |reason: &str| DomainError::InvalidPackageName {
            name: name.clone(),
            reason: reason.into(),
        };

        if name.is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if name.len() > Self::MAX_LEN {
            return Err(invalid("name is longer than 214 characters"));
        }

        let bare = match name.strip_prefix('@') {
            Some(scoped) => {
                let (scope, bare) = scoped
                    .split_once('/')
                    .ok_or_else(|| invalid("scoped names need the form @scope/name"))?;
                validate_segment(scope).map_err(|r| invalid(&r))?;
                bare
            }
            None => name.as_str(),
        };
        validate_segment(bare).map_err(|r| invalid(&r))?;

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scope of a scoped package (`@types/node` → `Some("types")`).
    pub fn scope(&self) -> Option<&str> {
        self.0
            .strip_prefix('@')
            .and_then(|s| s.split_once('/'))
            .map(|(scope, _)| scope)
    }
}

fn validate_segment(segment: &str) -> Result<(), String> {
    if segment.is_empty() {
        return Err("empty name segment".into());
    }
    if segment.starts_with('.') || segment.starts_with('_') {
        return Err("name cannot start with '.' or '_'".into());
    }
    match segment.chars().find(|c| {
        !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_' | '~'))
    }) {
        Some(c) => Err(format!("character '{c}' is not allowed")),
        None => Ok(()),
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PackageName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ── DependencyGroup ──────────────────────────────────────────────────────────

/// Which manifest section a package is installed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyGroup {
    Runtime,
    Development,
}

impl DependencyGroup {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Development => "development",
        }
    }
}

impl fmt::Display for DependencyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DatabaseKind ─────────────────────────────────────────────────────────────

/// Database the generated services are configured for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    #[default]
    Postgres,
    Mysql,
    Mariadb,
    Mongodb,
    Sqlite,
}

impl DatabaseKind {
    pub const ALL: [DatabaseKind; 5] = [
        Self::Postgres,
        Self::Mysql,
        Self::Mariadb,
        Self::Mongodb,
        Self::Sqlite,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Mariadb => "mariadb",
            Self::Mongodb => "mongodb",
            Self::Sqlite => "sqlite",
        }
    }

    /// Prisma datasource provider for the schema stub.
    pub const fn prisma_provider(&self) -> &'static str {
        match self {
            Self::Postgres => "postgresql",
            Self::Mysql | Self::Mariadb => "mysql",
            Self::Mongodb => "mongodb",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            "mariadb" => Ok(Self::Mariadb),
            "mongodb" | "mongo" => Ok(Self::Mongodb),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            other => Err(DomainError::UnknownDatabase(other.to_string())),
        }
    }
}
