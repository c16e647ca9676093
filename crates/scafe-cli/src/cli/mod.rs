//! CLI argument definitions using the clap derive API.
//!
//! Only argument names, help text and value enums live here. Flags mirror the
//! interactive questions one to one so a run can be fully scripted.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use scafe_adapters::PackageManagerKind;
use scafe_core::domain::DatabaseKind;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name    = "scafe",
    bin_name = "scafe",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Scaffold multi-service Node backends",
    long_about = "Scafe asks a few questions (or reads flags) and lays out a \
                  Node project with one directory per service plus a gateway, \
                  then installs the packages the generated code imports.",
    after_help = "EXAMPLES:\n\
        \x20 scafe new shop\n\
        \x20 scafe new shop --yes --service auth --service billing --db mysql --redis\n\
        \x20 scafe new shop --yes --installer --self-destruct\n\
        \x20 scafe list --format json\n\
        \x20 scafe completions zsh > ~/.zfunc/_scafe",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(
        visible_alias = "n",
        about = "Scaffold a new project",
        after_help = "EXAMPLES:\n\
            \x20 scafe new shop                                 # interactive\n\
            \x20 scafe new shop --yes --service auth --redis    # no questions\n\
            \x20 scafe new shop --yes --dry-run                 # print the tree only"
    )]
    New(NewArgs),

    #[command(
        visible_alias = "ls",
        about = "List the packages scafe knows about",
        after_help = "EXAMPLES:\n\
            \x20 scafe list\n\
            \x20 scafe list --optional\n\
            \x20 scafe list --format csv"
    )]
    List(ListArgs),

    #[command(
        about = "Delete leftover generator files",
        after_help = "EXAMPLES:\n\
            \x20 scafe cleanup install.sh\n\
            \x20 scafe cleanup setup.js generator.log"
    )]
    Cleanup(CleanupArgs),

    #[command(
        about = "Write a default configuration file",
        after_help = "EXAMPLES:\n\
            \x20 scafe init           # platform config directory\n\
            \x20 scafe init --local   # .scafe.toml in the current directory"
    )]
    Init(InitArgs),

    #[command(about = "Generate shell completions")]
    Completions(CompletionsArgs),

    #[command(subcommand, about = "Read and write configuration values")]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project (and npm package) name; also the directory created.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Service to generate besides the gateway. Repeat for several.
    #[arg(short = 's', long = "service", value_name = "NAME", action = ArgAction::Append)]
    pub services: Vec<String>,

    /// Database the services are configured for.
    #[arg(long = "db", value_name = "KIND", value_parser = parse_database)]
    pub database: Option<DatabaseKind>,

    /// Generate the multi-database config (`config/dbs.js`).
    #[arg(long = "multi-db", num_args = 0..=1, default_missing_value = "true")]
    pub multi_db: Option<bool>,

    /// Generate Redis client and cache helpers.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub redis: Option<bool>,

    /// Generate the mail queue and worker (implies Redis).
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub mail: Option<bool>,

    /// Extra npm package to install with the runtime dependencies.
    #[arg(short = 'p', long = "package", value_name = "PKG", action = ArgAction::Append)]
    pub packages: Vec<String>,

    #[arg(short = 'm', long, value_enum, value_name = "MANAGER")]
    pub manager: Option<PackageManagerArg>,

    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,

    /// Comma separated.
    #[arg(long, value_name = "LIST")]
    pub keywords: Option<String>,

    #[arg(long, value_name = "NAME")]
    pub author: Option<String>,

    #[arg(long, value_name = "URL")]
    pub repository: Option<String>,

    /// Answer every unanswered question with its default.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Print the planned tree without touching the disk.
    #[arg(long)]
    pub dry_run: bool,

    /// Write files only; do not run the package manager.
    #[arg(long)]
    pub skip_install: bool,

    /// Write an `install.sh` instead of installing now (implies --skip-install).
    #[arg(long)]
    pub installer: bool,

    /// Let `install.sh` delete itself once it has run.
    #[arg(long, requires = "installer")]
    pub self_destruct: bool,

    /// Path `install.sh` removes after a successful install. Repeatable.
    #[arg(long = "cleanup", value_name = "PATH", requires = "installer", action = ArgAction::Append)]
    pub cleanup: Vec<String>,

    /// Install every package without resolving it first.
    #[arg(long, conflicts_with = "verify")]
    pub install_all: bool,

    /// Resolve each package and install only the missing ones (default).
    #[arg(long)]
    pub verify: bool,
}

fn parse_database(raw: &str) -> Result<DatabaseKind, String> {
    raw.parse::<DatabaseKind>().map_err(|e| e.to_string())
}

/// clap-facing mirror of [`PackageManagerKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PackageManagerArg {
    Npm,
    Pnpm,
    Yarn,
}

impl From<PackageManagerArg> for PackageManagerKind {
    fn from(arg: PackageManagerArg) -> Self {
        match arg {
            PackageManagerArg::Npm => Self::Npm,
            PackageManagerArg::Pnpm => Self::Pnpm,
            PackageManagerArg::Yarn => Self::Yarn,
        }
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only packages pulled in by an opt-in feature.
    #[arg(long)]
    pub optional: bool,

    #[arg(short = 'f', long, value_enum, default_value = "table")]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Table,
    /// One package name per line.
    List,
    Json,
    Csv,
}

// ── cleanup ───────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CleanupArgs {
    /// Files to delete. Missing ones are reported, not treated as errors.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to the platform config directory.
    #[arg(long, conflicts_with = "local")]
    pub global: bool,

    /// Write `.scafe.toml` in the current directory.
    #[arg(long)]
    pub local: bool,

    /// Overwrite an existing file.
    #[arg(short = 'f', long)]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}

// ── config ────────────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one value, e.g. `defaults.database`.
    Get { key: String },
    /// Persist one value to the active configuration file.
    Set { key: String, value: String },
    /// Print the effective configuration as TOML.
    List,
    /// Print the configuration file path.
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("scafe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn bare_feature_flags_mean_true() {
        let cli = parse(&["new", "shop", "--redis", "--mail=false"]);
        let Commands::New(args) = cli.command else {
            panic!("expected new");
        };
        assert_eq!(args.redis, Some(true));
        assert_eq!(args.mail, Some(false));
        assert_eq!(args.multi_db, None);
    }

    #[test]
    fn services_and_packages_repeat() {
        let cli = parse(&["new", "shop", "-s", "auth", "-s", "billing", "-p", "zod", "--db", "pg"]);
        let Commands::New(args) = cli.command else {
            panic!("expected new");
        };
        assert_eq!(args.services, ["auth", "billing"]);
        assert_eq!(args.packages, ["zod"]);
        assert_eq!(args.database, Some(DatabaseKind::Postgres));
    }

    #[test]
    fn unknown_database_is_rejected() {
        assert!(Cli::try_parse_from(["scafe", "new", "shop", "--db", "oracle"]).is_err());
    }

    #[test]
    fn self_destruct_needs_installer() {
        assert!(Cli::try_parse_from(["scafe", "new", "shop", "--self-destruct"]).is_err());
        assert!(
            Cli::try_parse_from(["scafe", "new", "shop", "--installer", "--self-destruct"]).is_ok()
        );
    }

    #[test]
    fn install_modes_conflict() {
        assert!(Cli::try_parse_from(["scafe", "new", "shop", "--verify", "--install-all"]).is_err());
    }

    #[test]
    fn cleanup_requires_a_path() {
        assert!(Cli::try_parse_from(["scafe", "cleanup"]).is_err());
    }
}
