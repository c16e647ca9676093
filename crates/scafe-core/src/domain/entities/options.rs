//! The `ProjectOptions` aggregate and its builder.
//!
//! `ProjectOptions` is the fully-resolved, validated set of answers a user
//! gave (through prompts or flags). Every cross-answer rule is applied once
//! in [`ProjectOptionsBuilder::build`], so whatever order the questions were
//! asked in, the resulting options are consistent:
//!
//! - the `gateway` service is always present, exactly once
//! - service names are unique
//! - mail delivery implies Redis (the mail queue needs a Redis connection)
//!
//! # Domain purity
//!
//! This module must not import `tracing`. Inferences are returned as
//! [`ProjectOptions::notes`] for the caller to surface.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{
    error::DomainError,
    value_objects::{DatabaseKind, PackageName, ServiceName},
};

/// Name of the service that is generated for every project.
pub const GATEWAY_SERVICE: &str = "gateway";

/// Metadata for the generated `package.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestInfo {
    pub description: String,
    pub keywords: Vec<String>,
    pub author: String,
    pub repository: String,
}

impl ManifestInfo {
    /// Split a comma separated keyword answer, dropping empty entries.
    pub fn parse_keywords(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Resolved answers for one scaffolding run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectOptions {
    name: PackageName,
    services: Vec<ServiceName>,
    database: DatabaseKind,
    multi_db: bool,
    redis: bool,
    mail: bool,
    extra_packages: Vec<PackageName>,
    manifest: ManifestInfo,
    #[serde(skip)]
    notes: Vec<String>,
}

impl ProjectOptions {
    pub fn builder(name: PackageName) -> ProjectOptionsBuilder {
        ProjectOptionsBuilder::new(name)
    }

    pub fn name(&self) -> &PackageName {
        &self.name
    }
    pub fn services(&self) -> &[ServiceName] {
        &self.services
    }
    pub const fn database(&self) -> DatabaseKind {
        self.database
    }
    pub const fn multi_db(&self) -> bool {
        self.multi_db
    }
    pub const fn redis(&self) -> bool {
        self.redis
    }
    pub const fn mail(&self) -> bool {
        self.mail
    }
    pub fn extra_packages(&self) -> &[PackageName] {
        &self.extra_packages
    }
    pub fn manifest(&self) -> &ManifestInfo {
        &self.manifest
    }

    /// Human-readable notes about answers that were inferred or adjusted.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}

/// Builder for [`ProjectOptions`].
#[derive(Debug)]
pub struct ProjectOptionsBuilder {
    name: PackageName,
    services: Vec<ServiceName>,
    database: DatabaseKind,
    multi_db: bool,
    redis: bool,
    mail: bool,
    extra_packages: Vec<PackageName>,
    manifest: ManifestInfo,
}

impl ProjectOptionsBuilder {
    pub fn new(name: PackageName) -> Self {
        Self {
            name,
            services: Vec::new(),
            database: DatabaseKind::default(),
            multi_db: false,
            redis: false,
            mail: false,
            extra_packages: Vec::new(),
            manifest: ManifestInfo::default(),
        }
    }

    pub fn service(mut self, name: ServiceName) -> Self {
        self.services.push(name);
        self
    }

    pub fn services(mut self, names: impl IntoIterator<Item = ServiceName>) -> Self {
        self.services.extend(names);
        self
    }

    pub fn database(mut self, database: DatabaseKind) -> Self {
        self.database = database;
        self
    }

    pub fn multi_db(mut self, enabled: bool) -> Self {
        self.multi_db = enabled;
        self
    }

    pub fn redis(mut self, enabled: bool) -> Self {
        self.redis = enabled;
        self
    }

    pub fn mail(mut self, enabled: bool) -> Self {
        self.mail = enabled;
        self
    }

    pub fn extra_package(mut self, package: PackageName) -> Self {
        if !self.extra_packages.contains(&package) {
            self.extra_packages.push(package);
        }
        self
    }

    pub fn manifest(mut self, manifest: ManifestInfo) -> Self {
        self.manifest = manifest;
        self
    }

    /// Apply the cross-answer rules and validate.
    pub fn build(self) -> Result<ProjectOptions, DomainError> {
        let mut notes = Vec::new();

        let mut seen = HashSet::new();
        for service in &self.services {
            if !seen.insert(service.as_str()) {
                return Err(DomainError::DuplicateService {
                    name: service.to_string(),
                });
            }
        }

        let mut services = self.services;
        if !services.iter().any(|s| s.as_str() == GATEWAY_SERVICE) {
            services.push(ServiceName::new(GATEWAY_SERVICE)?);
        }

        let mut redis = self.redis;
        if self.mail && !redis {
            redis = true;
            notes.push("Redis enabled: the mail queue needs a Redis connection".to_string());
        }

        Ok(ProjectOptions {
            name: self.name,
            services,
            database: self.database,
            multi_db: self.multi_db,
            redis,
            mail: self.mail,
            extra_packages: self.extra_packages,
            manifest: self.manifest,
            notes,
        })
    }
}
