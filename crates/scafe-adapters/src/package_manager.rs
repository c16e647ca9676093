//! Subprocess package manager adapter (npm, pnpm, yarn).

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use scafe_core::{
    application::{DependencyError, ports::PackageManager},
    domain::{DependencyGroup, PackageName},
};

/// Supported Node package managers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
    #[default]
    Npm,
    Pnpm,
    Yarn,
}

impl PackageManagerKind {
    pub const ALL: [Self; 3] = [Self::Npm, Self::Pnpm, Self::Yarn];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
        }
    }

    /// Executable to spawn. Windows ships these as `.cmd` shims.
    pub fn program(&self) -> String {
        if cfg!(windows) {
            format!("{}.cmd", self.as_str())
        } else {
            self.as_str().to_string()
        }
    }

    /// Arguments that precede the package list.
    pub const fn install_args(&self, group: DependencyGroup) -> &'static [&'static str] {
        match (self, group) {
            (Self::Npm, DependencyGroup::Runtime) => &["install"],
            (Self::Npm, DependencyGroup::Development) => &["install", "--save-dev"],
            (Self::Pnpm, DependencyGroup::Runtime) => &["add"],
            (Self::Pnpm, DependencyGroup::Development) => &["add", "-D"],
            (Self::Yarn, DependencyGroup::Runtime) => &["add"],
            (Self::Yarn, DependencyGroup::Development) => &["add", "--dev"],
        }
    }

    /// The full shell-style command line, e.g. `npm install --save-dev nodemon`.
    pub fn command_line(&self, packages: &[PackageName], group: DependencyGroup) -> String {
        let mut parts: Vec<&str> = vec![self.as_str()];
        parts.extend(self.install_args(group));
        parts.extend(packages.iter().map(PackageName::as_str));
        parts.join(" ")
    }
}

impl fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManagerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "yarn" => Ok(Self::Yarn),
            other => Err(format!(
                "unknown package manager '{other}' (expected npm, pnpm or yarn)"
            )),
        }
    }
}

/// Runs the package manager as a child process in the project root.
#[derive(Debug, Clone)]
pub struct CommandPackageManager {
    kind: PackageManagerKind,
    root: PathBuf,
}

impl CommandPackageManager {
    pub fn new(kind: PackageManagerKind, root: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            root: root.into(),
        }
    }

    pub fn kind(&self) -> PackageManagerKind {
        self.kind
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn failure(&self, packages: &[PackageName], reason: String) -> DependencyError {
        DependencyError::InstallFailed {
            manager: self.kind.to_string(),
            packages: packages.iter().map(ToString::to_string).collect(),
            reason,
        }
    }
}

impl PackageManager for CommandPackageManager {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    #[instrument(skip_all, fields(manager = %self.kind, group = %group, count = packages.len()))]
    fn install(&self, packages: &[PackageName], group: DependencyGroup) -> Result<(), DependencyError> {
        if packages.is_empty() {
            return Ok(());
        }

        info!(command = %self.kind.command_line(packages, group), "running package manager");
        let output = Command::new(self.kind.program())
            .args(self.kind.install_args(group))
            .args(packages.iter().map(PackageName::as_str))
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.failure(packages, format!("could not start: {e}")))?;

        debug!(stdout = %String::from_utf8_lossy(&output.stdout).trim(), "package manager output");

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last = stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");
            warn!(exit_code = ?output.status.code(), stderr = %stderr.trim(), "install failed");
            return Err(self.failure(
                packages,
                format!("exited with {}: {}", output.status, last.trim()),
            ));
        }

        info!("install finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkgs(names: &[&str]) -> Vec<PackageName> {
        names.iter().map(|n| PackageName::new(*n).unwrap()).collect()
    }

    #[test]
    fn command_lines_per_manager() {
        let dev = pkgs(&["nodemon", "prettier"]);
        assert_eq!(
            PackageManagerKind::Npm.command_line(&dev, DependencyGroup::Development),
            "npm install --save-dev nodemon prettier"
        );
        assert_eq!(
            PackageManagerKind::Pnpm.command_line(&dev, DependencyGroup::Development),
            "pnpm add -D nodemon prettier"
        );
        assert_eq!(
            PackageManagerKind::Yarn.command_line(&pkgs(&["express"]), DependencyGroup::Runtime),
            "yarn add express"
        );
    }

    #[test]
    fn parses_kind() {
        assert_eq!("PNPM".parse::<PackageManagerKind>(), Ok(PackageManagerKind::Pnpm));
        assert!("bun".parse::<PackageManagerKind>().is_err());
    }

    #[test]
    fn missing_root_is_an_install_failure() {
        let pm = CommandPackageManager::new(
            PackageManagerKind::Npm,
            "/definitely/not/a/real/dir/for/scafe",
        );
        let err = pm
            .install(&pkgs(&["express"]), DependencyGroup::Runtime)
            .unwrap_err();
        match err {
            DependencyError::InstallFailed {
                manager, packages, ..
            } => {
                assert_eq!(manager, "npm");
                assert_eq!(packages, ["express"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_install_is_a_no_op() {
        let pm = CommandPackageManager::new(PackageManagerKind::Yarn, "/nowhere");
        assert!(pm.install(&[], DependencyGroup::Runtime).is_ok());
    }
}
