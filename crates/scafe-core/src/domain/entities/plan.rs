use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::{
    common::RelativePath,
    entities::dependencies::DependencySet,
    error::DomainError,
    value_objects::ServiceName,
};

/// A file to ensure exists, with its content as an opaque blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    pub path: RelativePath,
    pub content: String,
    pub executable: bool,
}

impl FileSpec {
    pub fn new(path: RelativePath, content: impl Into<String>) -> Self {
        Self {
            path,
            content: content.into(),
            executable: false,
        }
    }

    /// Parse `path` and build a spec.
    pub fn at(path: &str, content: impl Into<String>) -> Result<Self, DomainError> {
        Ok(Self::new(RelativePath::try_new(path)?, content))
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }
}

/// One service directory: its subfolders and the files inside it.
///
/// Folders form an ordered set; files are ordered and their paths unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    name: ServiceName,
    folders: Vec<RelativePath>,
    files: Vec<FileSpec>,
}

impl ServiceSpec {
    pub fn new(name: ServiceName) -> Self {
        Self {
            name,
            folders: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Declare a subfolder. Re-declaring an existing folder is a no-op.
    pub fn add_folder(&mut self, folder: &str) -> Result<(), DomainError> {
        let folder = RelativePath::try_new(folder)?;
        if !self.folders.contains(&folder) {
            self.folders.push(folder);
        }
        Ok(())
    }

    /// Declare a file. Two files with the same path are a plan error.
    pub fn add_file(&mut self, file: FileSpec) -> Result<(), DomainError> {
        if self.files.iter().any(|f| f.path == file.path) {
            return Err(DomainError::DuplicatePath {
                service: self.name.to_string(),
                path: file.path.to_string(),
            });
        }
        self.files.push(file);
        Ok(())
    }

    pub fn with_folder(mut self, folder: &str) -> Result<Self, DomainError> {
        self.add_folder(folder)?;
        Ok(self)
    }

    pub fn with_file(mut self, path: &str, content: impl Into<String>) -> Result<Self, DomainError> {
        self.add_file(FileSpec::at(path, content)?)?;
        Ok(self)
    }

    pub fn name(&self) -> &ServiceName {
        &self.name
    }

    pub fn folders(&self) -> &[RelativePath] {
        &self.folders
    }

    pub fn files(&self) -> &[FileSpec] {
        &self.files
    }

    /// A file path must not collide with a declared folder.
    pub fn validate(&self) -> Result<(), DomainError> {
        for file in &self.files {
            if self.folders.contains(&file.path) {
                return Err(DomainError::DuplicatePath {
                    service: self.name.to_string(),
                    path: file.path.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// The declarative description of everything one run materializes.
///
/// Built once from resolved options, executed once, then discarded.
#[derive(Debug, Clone)]
pub struct ScaffoldPlan {
    pub(crate) root: PathBuf,
    pub(crate) services: Vec<ServiceSpec>,
    pub(crate) manifest: Option<FileSpec>,
    pub(crate) root_files: Vec<FileSpec>,
    pub(crate) dependencies: DependencySet,
}

impl ScaffoldPlan {
    pub fn builder(root: impl Into<PathBuf>) -> PlanBuilder {
        PlanBuilder::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn services(&self) -> &[ServiceSpec] {
        &self.services
    }

    pub fn service(&self, name: &str) -> Option<&ServiceSpec> {
        self.services.iter().find(|s| s.name.as_str() == name)
    }

    pub fn manifest(&self) -> Option<&FileSpec> {
        self.manifest.as_ref()
    }

    pub fn root_files(&self) -> &[FileSpec] {
        &self.root_files
    }

    pub fn dependencies(&self) -> &DependencySet {
        &self.dependencies
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.services.is_empty() {
            return Err(DomainError::EmptyPlan);
        }

        let mut seen = HashSet::new();
        for service in &self.services {
            if !seen.insert(service.name.as_str()) {
                return Err(DomainError::DuplicateService {
                    name: service.name.to_string(),
                });
            }
            service.validate()?;
        }

        let mut root_paths = HashSet::new();
        for file in self.manifest.iter().chain(&self.root_files) {
            if !root_paths.insert(file.path.as_path()) {
                return Err(DomainError::DuplicatePath {
                    service: "<root>".into(),
                    path: file.path.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Total number of directory + file entries the plan declares.
    pub fn entry_count(&self) -> usize {
        let per_service: usize = self
            .services
            .iter()
            .map(|s| 1 + s.folders.len() + s.files.len())
            .sum();
        per_service + usize::from(self.manifest.is_some()) + self.root_files.len()
    }
}

/// Builder for [`ScaffoldPlan`]; `build()` validates every plan invariant.
#[derive(Debug)]
pub struct PlanBuilder {
    root: PathBuf,
    services: Vec<ServiceSpec>,
    manifest: Option<FileSpec>,
    root_files: Vec<FileSpec>,
    dependencies: DependencySet,
}

impl PlanBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            services: Vec::new(),
            manifest: None,
            root_files: Vec::new(),
            dependencies: DependencySet::new(),
        }
    }

    pub fn service(mut self, service: ServiceSpec) -> Self {
        self.services.push(service);
        self
    }

    pub fn manifest(mut self, manifest: FileSpec) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn root_file(mut self, file: FileSpec) -> Self {
        self.root_files.push(file);
        self
    }

    pub fn dependencies(mut self, dependencies: DependencySet) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn build(self) -> Result<ScaffoldPlan, DomainError> {
        let plan = ScaffoldPlan {
            root: self.root,
            services: self.services,
            manifest: self.manifest,
            root_files: self.root_files,
            dependencies: self.dependencies,
        };
        plan.validate()?;
        Ok(plan)
    }
}
