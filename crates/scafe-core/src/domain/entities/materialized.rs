use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// What a create-if-absent operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Created,
    Exists,
}

impl Outcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Exists => "exists",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
}

/// One materialized filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Materialized {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub outcome: Outcome,
}

impl Materialized {
    pub fn is_created(&self) -> bool {
        self.outcome == Outcome::Created
    }
}
