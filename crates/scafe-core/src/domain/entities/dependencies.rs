//! Dependency model: which packages a project needs, and what resolving one
//! yields.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::domain::value_objects::{DependencyGroup, PackageName};

/// Packages to ensure available, partitioned into runtime and development.
///
/// Invariants:
/// - a package appears at most once per group (set semantics)
/// - a runtime package is never also a development package; adding a
///   package to runtime promotes it out of development
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencySet {
    runtime: BTreeSet<PackageName>,
    development: BTreeSet<PackageName>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package. Returns `false` if it was already present in a group
    /// that satisfies the request.
    pub fn add(&mut self, package: PackageName, group: DependencyGroup) -> bool {
        match group {
            DependencyGroup::Runtime => {
                self.development.remove(&package);
                self.runtime.insert(package)
            }
            DependencyGroup::Development => {
                if self.runtime.contains(&package) {
                    return false;
                }
                self.development.insert(package)
            }
        }
    }

    pub fn with(mut self, package: PackageName, group: DependencyGroup) -> Self {
        self.add(package, group);
        self
    }

    pub fn group(&self, group: DependencyGroup) -> impl Iterator<Item = &PackageName> {
        match group {
            DependencyGroup::Runtime => self.runtime.iter(),
            DependencyGroup::Development => self.development.iter(),
        }
    }

    pub fn runtime(&self) -> impl Iterator<Item = &PackageName> {
        self.runtime.iter()
    }

    pub fn development(&self) -> impl Iterator<Item = &PackageName> {
        self.development.iter()
    }

    /// Group a package belongs to, if any.
    pub fn group_of(&self, package: &PackageName) -> Option<DependencyGroup> {
        if self.runtime.contains(package) {
            Some(DependencyGroup::Runtime)
        } else if self.development.contains(package) {
            Some(DependencyGroup::Development)
        } else {
            None
        }
    }

    pub fn contains(&self, package: &PackageName) -> bool {
        self.group_of(package).is_some()
    }

    pub fn len(&self) -> usize {
        self.runtime.len() + self.development.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A package that resolved successfully on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedModule {
    pub name: PackageName,
    pub version: Option<String>,
    pub location: PathBuf,
}

/// Why a package could not be resolved.
///
/// Only [`ResolveError::NotFound`] is recoverable by installing; every other
/// variant means the package is present but unusable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("package '{package}' is not installed")]
    NotFound { package: String },

    #[error("package '{package}' is installed but unusable: {reason}")]
    Broken { package: String, reason: String },
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
