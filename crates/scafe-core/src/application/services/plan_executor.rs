//! Plan Executor - applies a [`ScaffoldPlan`] in a fixed order.
//!
//! 0. ensure the project root
//! 1. per service: its directory, then its subfolders
//! 2. per service that survived step 1: its files; then the manifest
//! 3. runtime dependencies, then development dependencies
//! 4. root files
//!
//! Failures in steps 1 and 2 are recorded against the service and the run
//! moves on. Every other failure aborts the run.

use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use tracing::{error, info, instrument, warn};

use crate::{
    application::services::{
        dependency_resolver::{DependencyOutcome, DependencyResolver, EnsureMode},
        materializer::Materializer,
    },
    domain::{
        DependencyGroup, DomainValidator, Materialized, PackageName, ScaffoldPlan, ServiceSpec,
    },
    error::{ScafeError, ScafeResult},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutorOptions {
    /// Skip step 3 entirely.
    pub skip_install: bool,
    pub ensure_mode: EnsureMode,
}

/// Result of materializing one service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceReport {
    pub name: String,
    pub entries: Vec<Materialized>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<ScafeError>,
}

impl ServiceReport {
    fn new(spec: &ServiceSpec) -> Self {
        Self {
            name: spec.name().to_string(),
            entries: Vec::new(),
            error: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything one run did.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    pub root: PathBuf,
    /// Root directory, manifest and root files.
    pub entries: Vec<Materialized>,
    pub services: Vec<ServiceReport>,
    pub dependencies: Vec<DependencyOutcome>,
    pub install_skipped: bool,
}

impl ExecutionReport {
    fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            entries: Vec::new(),
            services: Vec::new(),
            dependencies: Vec::new(),
            install_skipped: false,
        }
    }

    /// All materialized entries, root first.
    pub fn all_entries(&self) -> impl Iterator<Item = &Materialized> {
        self.entries
            .iter()
            .chain(self.services.iter().flat_map(|s| s.entries.iter()))
    }

    pub fn created_count(&self) -> usize {
        self.all_entries().filter(|e| e.is_created()).count()
    }

    pub fn existing_count(&self) -> usize {
        self.all_entries().filter(|e| !e.is_created()).count()
    }

    pub fn failed_services(&self) -> impl Iterator<Item = &ServiceReport> {
        self.services.iter().filter(|s| !s.succeeded())
    }

    /// Whether every service materialized without error.
    pub fn is_complete(&self) -> bool {
        self.services.iter().all(ServiceReport::succeeded)
    }

    pub fn service(&self, name: &str) -> Option<&ServiceReport> {
        self.services.iter().find(|s| s.name == name)
    }
}

fn serialize_error<S: Serializer>(error: &Option<ScafeError>, s: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => s.serialize_some(&e.to_string()),
        None => s.serialize_none(),
    }
}

/// Executes plans against a [`Materializer`] and a [`DependencyResolver`].
pub struct PlanExecutor {
    materializer: Materializer,
    dependencies: DependencyResolver,
    options: ExecutorOptions,
}

impl PlanExecutor {
    pub fn new(materializer: Materializer, dependencies: DependencyResolver) -> Self {
        Self {
            materializer,
            dependencies,
            options: ExecutorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExecutorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ExecutorOptions {
        self.options
    }

    #[instrument(
        skip_all,
        fields(root = %plan.root().display(), services = plan.services().len())
    )]
    pub fn execute(&self, plan: &ScaffoldPlan) -> ScafeResult<ExecutionReport> {
        DomainValidator::validate_plan(plan)?;

        let root = plan.root();
        let mut report = ExecutionReport::new(root);

        // Step 0
        report.entries.push(self.materializer.ensure_dir(root)?);

        // Step 1
        let mut services: Vec<ServiceReport> = plan
            .services()
            .iter()
            .map(|spec| {
                let mut service = ServiceReport::new(spec);
                if let Err(e) = self.ensure_folders(root, spec, &mut service.entries) {
                    error!(service = %spec.name(), error = %e, "service directories failed");
                    service.error = Some(e);
                }
                service
            })
            .collect();

        // Step 2
        for (spec, service) in plan.services().iter().zip(services.iter_mut()) {
            if !service.succeeded() {
                warn!(service = %spec.name(), "skipping files of failed service");
                continue;
            }
            if let Err(e) = self.ensure_files(root, spec, &mut service.entries) {
                error!(service = %spec.name(), error = %e, "service files failed");
                service.error = Some(e);
            }
        }
        report.services = services;

        if let Some(manifest) = plan.manifest() {
            report.entries.push(self.materializer.ensure_spec(root, manifest)?);
        }

        // Step 3
        if self.options.skip_install {
            info!("dependency installation skipped");
            report.install_skipped = true;
        } else {
            for group in [DependencyGroup::Runtime, DependencyGroup::Development] {
                let packages: Vec<PackageName> = plan.dependencies().group(group).cloned().collect();
                let outcomes = self
                    .dependencies
                    .ensure_group(group, &packages, self.options.ensure_mode)?;
                report.dependencies.extend(outcomes);
            }
        }

        // Step 4
        for file in plan.root_files() {
            report.entries.push(self.materializer.ensure_spec(root, file)?);
        }

        info!(
            created = report.created_count(),
            existing = report.existing_count(),
            failed = report.failed_services().count(),
            "plan executed"
        );
        Ok(report)
    }

    fn ensure_folders(
        &self,
        root: &Path,
        spec: &ServiceSpec,
        entries: &mut Vec<Materialized>,
    ) -> ScafeResult<()> {
        let dir = root.join(spec.name().as_str());
        entries.push(self.materializer.ensure_dir(&dir)?);
        for folder in spec.folders() {
            entries.push(self.materializer.ensure_dir(&dir.join(folder))?);
        }
        Ok(())
    }

    fn ensure_files(
        &self,
        root: &Path,
        spec: &ServiceSpec,
        entries: &mut Vec<Materialized>,
    ) -> ScafeResult<()> {
        let dir = root.join(spec.name().as_str());
        for file in spec.files() {
            entries.push(self.materializer.ensure_spec(&dir, file)?);
        }
        Ok(())
    }
}
