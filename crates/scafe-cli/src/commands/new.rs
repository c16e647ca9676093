//! Implementation of the `scafe new` command.
//!
//! Responsibility: turn flags and answers into [`ProjectOptions`], build the
//! plan from the blueprint, run it with the real adapters and display the
//! report. No scaffolding rules live here.

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use serde::Serialize;
use tracing::{info, instrument};

use scafe_adapters::{
    Blueprint, CommandPackageManager, InstallerScript, LocalFilesystem, NodeModulesResolver,
    PackageManagerKind, installer::INSTALLER_FILE, tree,
};
use scafe_core::{
    application::{
        DependencyError, DependencyResolver, EnsureMode, ExecutionReport, ExecutorOptions,
        Materializer, PackageManager, PlanExecutor,
    },
    domain::{DependencyGroup, PackageName, ProjectOptions, ScaffoldPlan},
};

use crate::{
    cli::NewArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    prompt::{self, Answers, Questionnaire},
};

/// Depth of the tree printed after a run.
const TREE_DEPTH: usize = 2;

/// Execute `scafe new`.
///
/// 1. Validate the project name and target directory
/// 2. Resolve answers (flags, prompts, configured defaults)
/// 3. Build the plan; stop here on `--dry-run`
/// 4. Execute it and report per service
/// 5. Exit non-zero if any service failed
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(args: NewArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let name = validate_project_name(&args.name)?;
    let root = project_root(&std::env::current_dir()?, &name);
    check_target(&root, &output)?;

    let options = resolve_options(&args, &config, name)?;
    for note in options.notes() {
        output.info(note)?;
    }

    let manager = args
        .manager
        .map(PackageManagerKind::from)
        .unwrap_or(config.install.manager);
    let plan = build_plan(&args, &options, manager, &root)?;

    if args.dry_run {
        return show_dry_run(&plan, &output);
    }

    let executor_options = executor_options(&args, &config);
    output.header(&format!("Creating '{}'...", options.name()))?;
    info!(root = %root.display(), ?executor_options, "scaffold started");

    let spinner = output.spinner("Writing files");
    let executor = PlanExecutor::new(
        Materializer::new(Box::new(LocalFilesystem::new())),
        DependencyResolver::new(
            Box::new(ReportingInstaller::new(
                CommandPackageManager::new(manager, &root),
                spinner.clone(),
            )),
            Box::new(NodeModulesResolver::new(&root)),
        ),
    )
    .with_options(executor_options);
    let result = executor.execute(&plan);
    spinner.finish_and_clear();
    let report = result?;

    info!(
        created = report.created_count(),
        existing = report.existing_count(),
        "scaffold finished"
    );

    if output.is_json() {
        output.json(&report)?;
    } else {
        show_report(&report, &output)?;
        show_next_steps(&options, &args, manager, &output)?;
    }

    let failed: Vec<String> = report.failed_services().map(|s| s.name.clone()).collect();
    if failed.is_empty() {
        Ok(())
    } else {
        Err(CliError::PartialScaffold {
            total: report.services.len(),
            failed,
        })
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

/// The project name doubles as the npm package name and the directory name.
pub fn validate_project_name(raw: &str) -> CliResult<PackageName> {
    let invalid = |reason: &str| CliError::InvalidProjectName {
        name: raw.into(),
        reason: reason.into(),
    };
    if raw.contains('/') || raw.contains('\\') {
        return Err(invalid("name cannot contain path separators"));
    }
    PackageName::new(raw).map_err(|e| invalid(&e.to_string()))
}

fn check_target(root: &Path, output: &OutputManager) -> CliResult<()> {
    if root.exists() && !root.is_dir() {
        return Err(CliError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    if root.is_dir() {
        output.info(&format!(
            "'{}' already exists; only missing entries will be created",
            root.display()
        ))?;
    }
    Ok(())
}

// ── Options and plan ──────────────────────────────────────────────────────────

fn answers_from(args: &NewArgs) -> Answers {
    Answers {
        services: args.services.clone(),
        database: args.database,
        multi_db: args.multi_db,
        redis: args.redis,
        mail: args.mail,
        packages: args.packages.clone(),
        description: args.description.clone(),
        keywords: args.keywords.clone(),
        author: args.author.clone(),
        repository: args.repository.clone(),
    }
}

fn resolve_options(
    args: &NewArgs,
    config: &AppConfig,
    name: PackageName,
) -> CliResult<ProjectOptions> {
    let answers = answers_from(args);
    if args.yes {
        return Questionnaire::unattended(&config.defaults).resolve(name, answers);
    }
    let mut prompter = prompt::terminal();
    Questionnaire::interactive(&config.defaults, prompter.as_mut()).resolve(name, answers)
}

fn build_plan(
    args: &NewArgs,
    options: &ProjectOptions,
    manager: PackageManagerKind,
    root: &Path,
) -> CliResult<ScaffoldPlan> {
    let mut blueprint = Blueprint::new(options);
    if args.installer {
        let mut script = InstallerScript::new(manager);
        script.self_destruct = args.self_destruct;
        script.cleanup = args.cleanup.clone();
        blueprint = blueprint.with_installer(script);
    }
    Ok(blueprint.build(root)?)
}

fn executor_options(args: &NewArgs, config: &AppConfig) -> ExecutorOptions {
    let ensure_mode = if args.install_all {
        EnsureMode::Install
    } else if args.verify {
        EnsureMode::Verify
    } else {
        config.install.ensure_mode()
    };
    ExecutorOptions {
        skip_install: args.skip_install || args.installer || config.install.skip,
        ensure_mode,
    }
}

// ── Package manager with progress ─────────────────────────────────────────────

/// Shows the running install command on the spinner.
struct ReportingInstaller {
    inner: CommandPackageManager,
    spinner: ProgressBar,
}

impl ReportingInstaller {
    fn new(inner: CommandPackageManager, spinner: ProgressBar) -> Self {
        Self { inner, spinner }
    }
}

impl PackageManager for ReportingInstaller {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn install(
        &self,
        packages: &[PackageName],
        group: DependencyGroup,
    ) -> Result<(), DependencyError> {
        self.spinner
            .set_message(self.inner.kind().command_line(packages, group));
        let result = self.inner.install(packages, group);
        if result.is_ok() {
            self.spinner.println(format!(
                "\u{2713} installed {} {group} package(s)",
                packages.len()
            ));
        }
        self.spinner.set_message("Writing files");
        result
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct DryRun<'a> {
    root: &'a Path,
    services: Vec<&'a str>,
    entries: usize,
    runtime: Vec<&'a PackageName>,
    development: Vec<&'a PackageName>,
}

fn show_dry_run(plan: &ScaffoldPlan, output: &OutputManager) -> CliResult<()> {
    let deps = plan.dependencies();
    if output.is_json() {
        return output.json(&DryRun {
            root: plan.root(),
            services: plan.services().iter().map(|s| s.name().as_str()).collect(),
            entries: plan.entry_count(),
            runtime: deps.runtime().collect(),
            development: deps.development().collect(),
        });
    }

    output.header("Dry run: nothing was written")?;
    output.print("")?;
    output.print(tree::render_plan(plan).trim_end())?;
    output.print("")?;
    output.print(&format!("Runtime:     {}", join(deps.runtime())))?;
    output.print(&format!("Development: {}", join(deps.development())))?;
    Ok(())
}

fn join<'a>(packages: impl Iterator<Item = &'a PackageName>) -> String {
    packages.map(PackageName::as_str).collect::<Vec<_>>().join(" ")
}

fn show_report(report: &ExecutionReport, output: &OutputManager) -> CliResult<()> {
    for service in &report.services {
        match &service.error {
            Some(err) => output.warning(&format!("Service '{}' failed: {err}", service.name))?,
            None => {
                let created = service.entries.iter().filter(|e| e.is_created()).count();
                if created == 0 {
                    output.skipped(&format!("Service '{}' already complete", service.name))?;
                } else {
                    output.success(&format!(
                        "Created service '{}' ({created} new entries)",
                        service.name
                    ))?;
                }
            }
        }
    }

    if report.install_skipped {
        output.info("Dependency installation skipped")?;
    } else {
        let installed = report.dependencies.iter().filter(|d| d.installed).count();
        output.success(&format!(
            "{} packages available ({installed} installed now)",
            report.dependencies.len()
        ))?;
    }

    output.print("")?;
    output.print(&format!(
        "{} created, {} already present",
        report.created_count(),
        report.existing_count()
    ))?;

    if !output.is_quiet() {
        match tree::render_dir(&report.root, TREE_DEPTH) {
            Ok(rendered) => {
                output.print("")?;
                output.print(rendered.trim_end())?;
            }
            Err(err) => tracing::debug!(%err, "could not render the project tree"),
        }
    }
    Ok(())
}

fn show_next_steps(
    options: &ProjectOptions,
    args: &NewArgs,
    manager: PackageManagerKind,
    output: &OutputManager,
) -> CliResult<()> {
    let mut steps = vec![format!("cd {}", options.name())];
    if args.installer {
        steps.push(format!("./{INSTALLER_FILE}"));
    } else if args.skip_install {
        steps.push(format!("{manager} install"));
    }
    if options.multi_db() {
        steps.push("Configure your databases in <service>/config/dbs.js".into());
    }
    if options.redis() {
        steps.push("Set REDIS_URL in .env".into());
    }
    steps.push(format!("{manager} run dev"));

    output.print("")?;
    output.header("Next steps:")?;
    for (i, step) in steps.iter().enumerate() {
        output.print(&format!("  {}. {step}", i + 1))?;
    }
    Ok(())
}

/// Absolute project root for `name` under `base`.
pub fn project_root(base: &Path, name: &PackageName) -> PathBuf {
    base.join(name.as_str())
}
