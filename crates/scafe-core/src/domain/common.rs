use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::domain::error::DomainError;

/// A filesystem path guaranteed to be **relative** and **contained**.
///
/// Plans join these onto a service directory (or the project root), so a
/// `RelativePath` can never be absolute, carry a root/prefix component, or
/// climb out through `..`. `.` components are dropped on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Try to create a contained relative path.
    pub fn try_new(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        if path.is_absolute() {
            return Err(DomainError::AbsolutePathNotAllowed { path: display });
        }

        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(DomainError::PathEscapesBase { path: display });
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(DomainError::AbsolutePathNotAllowed { path: display });
                }
            }
        }

        if normalized.as_os_str().is_empty() {
            return Err(DomainError::EmptyPath);
        }

        Ok(Self(normalized))
    }

    /// Borrow as a `Path`.
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl TryFrom<&str> for RelativePath {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        RelativePath::try_new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
