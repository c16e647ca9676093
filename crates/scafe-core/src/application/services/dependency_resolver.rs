//! Dependency Resolver - install-or-fallback for external packages.
//!
//! Resolution is attempted first; the package manager is only invoked when a
//! package is demonstrably absent ([`ResolveError::NotFound`]), and the
//! package is resolved again exactly once afterwards. Any other resolution
//! failure is fatal, since installing cannot repair a broken package.

use std::slice;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        DependencyError,
        ports::{ModuleResolver, PackageManager},
    },
    domain::{DependencyGroup, PackageName, ResolveError, ResolvedModule},
};

/// How a group of packages is ensured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnsureMode {
    /// Install every package unconditionally with one command.
    Install,
    /// Resolve first, install only the missing ones, then resolve again.
    #[default]
    Verify,
}

/// What happened to one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyOutcome {
    pub package: PackageName,
    pub group: DependencyGroup,
    /// Whether the package manager was invoked for this package.
    pub installed: bool,
    pub version: Option<String>,
}

/// Load-or-install-and-retry over the [`PackageManager`] and
/// [`ModuleResolver`] ports.
pub struct DependencyResolver {
    manager: Box<dyn PackageManager>,
    resolver: Box<dyn ModuleResolver>,
}

impl DependencyResolver {
    pub fn new(manager: Box<dyn PackageManager>, resolver: Box<dyn ModuleResolver>) -> Self {
        Self { manager, resolver }
    }

    pub fn manager_name(&self) -> &'static str {
        self.manager.name()
    }

    /// Ensure a single package is available.
    ///
    /// - `import_requested == false`: install and return `None`.
    /// - `import_requested == true`: resolve; on `NotFound` install once and
    ///   resolve once more. Returns the resolved module.
    #[instrument(skip(self), fields(package = %package, manager = self.manager.name()))]
    pub fn ensure(
        &self,
        package: &PackageName,
        group: DependencyGroup,
        import_requested: bool,
    ) -> Result<Option<ResolvedModule>, DependencyError> {
        if !import_requested {
            info!("installing without resolution");
            self.manager.install(slice::from_ref(package), group)?;
            return Ok(None);
        }

        if let Some(module) = self.lookup(package)? {
            return Ok(Some(module));
        }
        info!("package not found, installing");
        self.manager.install(slice::from_ref(package), group)?;
        self.retry(package).map(Some)
    }

    /// Ensure every package of `group`.
    ///
    /// Both modes issue at most one package-manager invocation for the whole
    /// group. In [`EnsureMode::Verify`] each missing package is re-resolved
    /// exactly once after that invocation.
    #[instrument(skip(self, packages), fields(group = %group, count = packages.len()))]
    pub fn ensure_group(
        &self,
        group: DependencyGroup,
        packages: &[PackageName],
        mode: EnsureMode,
    ) -> Result<Vec<DependencyOutcome>, DependencyError> {
        if packages.is_empty() {
            info!("no packages declared, skipping install");
            return Ok(Vec::new());
        }

        match mode {
            EnsureMode::Install => {
                self.manager.install(packages, group)?;
                info!("group installed");
                Ok(packages
                    .iter()
                    .map(|package| DependencyOutcome {
                        package: package.clone(),
                        group,
                        installed: true,
                        version: None,
                    })
                    .collect())
            }
            EnsureMode::Verify => self.verify_group(group, packages),
        }
    }

    fn verify_group(
        &self,
        group: DependencyGroup,
        packages: &[PackageName],
    ) -> Result<Vec<DependencyOutcome>, DependencyError> {
        let found = packages
            .iter()
            .map(|package| self.lookup(package))
            .collect::<Result<Vec<_>, _>>()?;

        let missing: Vec<PackageName> = packages
            .iter()
            .zip(&found)
            .filter(|(_, module)| module.is_none())
            .map(|(package, _)| package.clone())
            .collect();
        if missing.is_empty() {
            info!("all packages already present");
        } else {
            info!(missing = missing.len(), "installing missing packages");
            self.manager.install(&missing, group)?;
        }

        // Outcomes follow the declared order.
        packages
            .iter()
            .zip(found)
            .map(|(package, module)| {
                let (installed, module) = match module {
                    Some(module) => (false, module),
                    None => (true, self.retry(package)?),
                };
                Ok::<_, DependencyError>(DependencyOutcome {
                    package: package.clone(),
                    group,
                    installed,
                    version: module.version,
                })
            })
            .collect()
    }

    /// The first resolution attempt: `None` means the package is absent and
    /// may be installed; a broken package is fatal.
    fn lookup(&self, package: &PackageName) -> Result<Option<ResolvedModule>, DependencyError> {
        match self.resolver.resolve(package) {
            Ok(module) => {
                debug!(package = %package, version = ?module.version, "already resolvable");
                Ok(Some(module))
            }
            Err(ResolveError::NotFound { .. }) => Ok(None),
            Err(ResolveError::Broken { reason, .. }) => Err(DependencyError::Unresolvable {
                package: package.to_string(),
                reason,
            }),
        }
    }

    /// The single post-install resolution attempt.
    fn retry(&self, package: &PackageName) -> Result<ResolvedModule, DependencyError> {
        self.resolver.resolve(package).map_err(|e| {
            warn!(package = %package, error = %e, "resolution failed after install");
            match e {
                ResolveError::NotFound { .. } => DependencyError::StillMissing {
                    package: package.to_string(),
                },
                ResolveError::Broken { reason, .. } => DependencyError::Unresolvable {
                    package: package.to_string(),
                    reason,
                },
            }
        })
    }
}
