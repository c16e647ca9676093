//! Blueprint: turns resolved [`ProjectOptions`] into a [`ScaffoldPlan`].
//!
//! Everything the generated backend contains is decided here: the folder
//! layout of each service, which templates apply, the package sets, the
//! root manifest and the tooling files next to it. The plan is pure data;
//! nothing touches the filesystem until the executor runs it.

mod manifest;
mod templates;

use std::path::PathBuf;

use tracing::{debug, instrument};

use scafe_core::{
    domain::{
        DependencyGroup, DependencySet, FileSpec, PackageName, ProjectOptions, ScaffoldPlan,
        ServiceName, ServiceSpec,
    },
    error::ScafeResult,
};

use crate::installer::{INSTALLER_FILE, InstallerScript};

pub use manifest::{PackageJson, PrettierConfig};
pub use templates::{Feature, RenderContext, SERVICE_FILES, ServiceTemplate};

/// Subfolders every service gets, in creation order.
pub const SERVICE_FOLDERS: [&str; 7] = [
    "config",
    "controller",
    "middleware",
    "routes",
    "repo",
    "src",
    "utils",
];

pub const MAIL_FOLDER: &str = "utils/mail";

/// Runtime packages every project depends on.
pub const CORE_RUNTIME: [&str; 8] = [
    "express",
    "cors",
    "dotenv",
    "winston",
    "jsonwebtoken",
    "qrcode",
    "bcrypt",
    "status-map",
];

pub const REDIS_RUNTIME: [&str; 1] = ["ioredis"];
pub const MAIL_RUNTIME: [&str; 2] = ["nodemailer", "bullmq"];
pub const DEVELOPMENT: [&str; 2] = ["nodemon", "prettier"];

/// Root-level tooling files.
pub const GITIGNORE_FILE: &str = ".gitignore";
pub const PRETTIER_RC_FILE: &str = ".prettierrc";
pub const PRETTIER_IGNORE_FILE: &str = ".prettierignore";
pub const MANIFEST_FILE: &str = "package.json";

/// Builds a [`ScaffoldPlan`] from [`ProjectOptions`].
#[derive(Debug, Clone)]
pub struct Blueprint<'a> {
    options: &'a ProjectOptions,
    installer: Option<InstallerScript>,
}

impl<'a> Blueprint<'a> {
    pub fn new(options: &'a ProjectOptions) -> Self {
        Self {
            options,
            installer: None,
        }
    }

    /// Also emit an executable installer script at the root. Its package
    /// lists are filled in from the plan's dependency set.
    pub fn with_installer(mut self, installer: InstallerScript) -> Self {
        self.installer = Some(installer);
        self
    }

    /// The package sets implied by the options.
    pub fn dependencies(&self) -> ScafeResult<DependencySet> {
        let mut deps = DependencySet::new();
        let runtime = CORE_RUNTIME
            .iter()
            .chain(self.options.redis().then_some(&REDIS_RUNTIME[..]).unwrap_or_default())
            .chain(self.options.mail().then_some(&MAIL_RUNTIME[..]).unwrap_or_default());
        for name in runtime {
            deps.add(PackageName::new(*name)?, DependencyGroup::Runtime);
        }
        for extra in self.options.extra_packages() {
            deps.add(extra.clone(), DependencyGroup::Runtime);
        }
        for name in DEVELOPMENT {
            deps.add(PackageName::new(name)?, DependencyGroup::Development);
        }
        Ok(deps)
    }

    #[instrument(skip_all, fields(project = %self.options.name(), services = self.options.services().len()))]
    pub fn build(&self, root: impl Into<PathBuf>) -> ScafeResult<ScaffoldPlan> {
        let dependencies = self.dependencies()?;

        let mut builder = ScaffoldPlan::builder(root);
        for name in self.options.services() {
            builder = builder.service(self.service(name)?);
        }

        let manifest = PackageJson::from_options(self.options).render()?;
        builder = builder
            .manifest(FileSpec::at(MANIFEST_FILE, manifest)?)
            .root_file(FileSpec::at(GITIGNORE_FILE, templates::GITIGNORE)?)
            .root_file(FileSpec::at(
                PRETTIER_RC_FILE,
                PrettierConfig::default().render()?,
            )?)
            .root_file(FileSpec::at(PRETTIER_IGNORE_FILE, templates::PRETTIER_IGNORE)?);

        if let Some(installer) = &self.installer {
            let mut script = installer.clone();
            script.runtime = dependencies.runtime().cloned().collect();
            script.development = dependencies.development().cloned().collect();
            builder = builder.root_file(FileSpec::at(INSTALLER_FILE, script.render())?.executable());
        }

        let plan = builder.dependencies(dependencies).build()?;
        debug!(entries = plan.entry_count(), "plan built");
        Ok(plan)
    }

    fn service(&self, name: &ServiceName) -> ScafeResult<ServiceSpec> {
        let options = self.options;
        let ctx = RenderContext::new(options.name().as_str(), name.as_str(), options.database());

        let mut spec = ServiceSpec::new(name.clone());
        for folder in SERVICE_FOLDERS {
            spec.add_folder(folder)?;
        }
        if options.mail() {
            spec.add_folder(MAIL_FOLDER)?;
        }

        spec.add_file(FileSpec::at("README.md", self.readme(&ctx))?)?;
        for template in SERVICE_FILES.iter().filter(|t| self.enabled(t.feature)) {
            spec.add_file(FileSpec::at(template.path, ctx.render(template.body))?)?;
        }
        Ok(spec)
    }

    fn enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Always => true,
            Feature::Redis => self.options.redis(),
            Feature::MultiDb => self.options.multi_db(),
            Feature::Mail => self.options.mail(),
        }
    }

    fn readme(&self, ctx: &RenderContext) -> String {
        let mut readme = ctx.render(templates::README);
        if self.options.multi_db() {
            readme.push_str(
                "\nThis service is configured for multiple databases. See `config/dbs.js`.\n",
            );
        }
        if self.options.redis() {
            readme.push_str(
                "\nThis service uses Redis for caching. See `config/redis.js` and `utils/cache.js`.\n",
            );
        }
        if self.options.mail() {
            readme.push_str("\nMail is delivered through a BullMQ queue. See `utils/mail/`.\n");
        }
        readme
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use scafe_core::domain::{DatabaseKind, GATEWAY_SERVICE};

    use super::*;
    use crate::package_manager::PackageManagerKind;

    fn options(redis: bool, multi_db: bool, mail: bool) -> ProjectOptions {
        ProjectOptions::builder(PackageName::new("shop").unwrap())
            .service(ServiceName::new("auth").unwrap())
            .database(DatabaseKind::Mongodb)
            .redis(redis)
            .multi_db(multi_db)
            .mail(mail)
            .build()
            .unwrap()
    }

    fn paths(spec: &ServiceSpec) -> Vec<String> {
        spec.files().iter().map(|f| f.path.to_string()).collect()
    }

    #[test]
    fn redis_services_get_redis_files() {
        let opts = options(true, false, false);
        let plan = Blueprint::new(&opts).build("/work/shop").unwrap();

        assert_eq!(plan.services().len(), 2);
        for service in ["auth", GATEWAY_SERVICE] {
            let spec = plan.service(service).unwrap();
            assert_eq!(spec.folders().len(), 7);
            let files = paths(spec);
            assert!(files.contains(&"config/redis.js".to_string()));
            assert!(files.contains(&"utils/cache.js".to_string()));
            assert!(!files.contains(&"config/dbs.js".to_string()));
        }
    }

    #[test]
    fn ioredis_is_a_single_runtime_dependency() {
        let opts = ProjectOptions::builder(PackageName::new("shop").unwrap())
            .redis(true)
            .extra_package(PackageName::new("ioredis").unwrap())
            .build()
            .unwrap();
        let deps = Blueprint::new(&opts).dependencies().unwrap();

        let ioredis = PackageName::new("ioredis").unwrap();
        assert_eq!(deps.runtime().filter(|p| **p == ioredis).count(), 1);
        assert_eq!(deps.group_of(&ioredis), Some(DependencyGroup::Runtime));
        assert_eq!(deps.development().count(), 2);
    }

    #[test]
    fn mail_adds_folder_files_and_packages() {
        let opts = options(false, false, true);
        let plan = Blueprint::new(&opts).build("/work/shop").unwrap();

        let spec = plan.service("auth").unwrap();
        assert!(spec.folders().iter().any(|f| f.as_path() == Path::new("utils/mail")));
        assert!(paths(spec).contains(&"utils/mail/worker.js".to_string()));

        let bullmq = PackageName::new("bullmq").unwrap();
        let ioredis = PackageName::new("ioredis").unwrap();
        assert!(plan.dependencies().contains(&bullmq));
        // mail implies redis
        assert!(plan.dependencies().contains(&ioredis));
    }

    #[test]
    fn multi_db_readme_and_config() {
        let opts = options(false, true, false);
        let plan = Blueprint::new(&opts).build("/work/shop").unwrap();
        let spec = plan.service("auth").unwrap();

        let readme = spec.files().iter().find(|f| f.path.to_string() == "README.md").unwrap();
        assert!(readme.content.starts_with("# auth service"));
        assert!(readme.content.contains("multiple databases"));

        let dbs = spec.files().iter().find(|f| f.path.to_string() == "config/dbs.js").unwrap();
        assert!(dbs.content.contains("type: \"mongodb\""));
    }

    #[test]
    fn root_files_and_manifest() {
        let opts = options(false, false, false);
        let plan = Blueprint::new(&opts).build("/work/shop").unwrap();

        let roots: Vec<_> = plan.root_files().iter().map(|f| f.path.to_string()).collect();
        assert_eq!(roots, [".gitignore", ".prettierrc", ".prettierignore"]);
        assert!(plan.manifest().unwrap().content.contains("\"type\": \"module\""));
    }

    #[test]
    fn installer_is_executable_and_lists_packages() {
        let opts = options(true, false, false);
        let mut script = InstallerScript::new(PackageManagerKind::Yarn);
        script.self_destruct = true;
        let plan = Blueprint::new(&opts)
            .with_installer(script)
            .build("/work/shop")
            .unwrap();

        let installer = plan.root_files().last().unwrap();
        assert_eq!(installer.path.to_string(), INSTALLER_FILE);
        assert!(installer.executable);
        assert!(installer.content.contains("yarn add --dev nodemon prettier"));
        assert!(installer.content.contains("ioredis"));
    }
}
