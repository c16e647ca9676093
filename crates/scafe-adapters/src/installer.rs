//! Self-deleting installer script.
//!
//! Renders a POSIX `sh` script that installs the declared dependencies when
//! the user is ready, then removes listed transient files. With
//! self-destruct enabled the script also removes itself, both after a normal
//! run and on `SIGINT`.

use chrono::{DateTime, Utc};

use scafe_core::domain::{DependencyGroup, PackageName};

use crate::package_manager::PackageManagerKind;

pub const INSTALLER_FILE: &str = "install.sh";

#[derive(Debug, Clone)]
pub struct InstallerScript {
    pub manager: PackageManagerKind,
    pub runtime: Vec<PackageName>,
    pub development: Vec<PackageName>,
    /// Paths deleted after a completed install, relative to the script.
    pub cleanup: Vec<String>,
    /// Whether the cleanup list is processed at all.
    pub completed: bool,
    pub self_destruct: bool,
    pub generated_at: DateTime<Utc>,
}

impl InstallerScript {
    pub fn new(manager: PackageManagerKind) -> Self {
        Self {
            manager,
            runtime: Vec::new(),
            development: Vec::new(),
            cleanup: Vec::new(),
            completed: true,
            self_destruct: false,
            generated_at: Utc::now(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("#!/bin/sh\n");
        out.push_str(&format!(
            "# Generated by scafe on {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str("# Installs project dependencies, then tidies up after itself.\n");
        out.push_str("set -e\n");
        out.push_str("cd \"$(dirname \"$0\")\"\n");
        // `$0` may be relative to the caller's directory, which the `cd` left.
        out.push_str("SELF=\"$(basename \"$0\")\"\n\n");

        out.push_str(&format!("SELF_DESTRUCT={}\n", self.self_destruct));
        out.push_str(&format!("COMPLETED={}\n\n", self.completed));

        out.push_str("self_destruct() {\n");
        out.push_str("  if [ \"$SELF_DESTRUCT\" = true ]; then\n");
        out.push_str(
            "    rm -f -- \"$SELF\" && echo \"Installer deleted.\" || echo \"Failed to delete installer\" >&2\n",
        );
        out.push_str("  fi\n");
        out.push_str("}\n");
        out.push_str("trap 'self_destruct; exit 130' INT\n\n");

        for (group, packages) in [
            (DependencyGroup::Runtime, &self.runtime),
            (DependencyGroup::Development, &self.development),
        ] {
            if packages.is_empty() {
                continue;
            }
            out.push_str(&format!("echo \"Installing {} dependencies...\"\n", group));
            out.push_str(&self.manager.command_line(packages, group));
            out.push('\n');
        }

        out.push_str("\nif [ \"$COMPLETED\" = true ]; then\n");
        if self.cleanup.is_empty() {
            out.push_str("  :\n");
        }
        for path in &self.cleanup {
            let quoted = shell_quote(path);
            out.push_str(&format!("  if [ -e {quoted} ]; then\n"));
            out.push_str(&format!(
                "    rm -f -- {quoted} && echo \"Deleted file: {}\" || echo \"Failed to delete file: {}\" >&2\n",
                escape_echo(path),
                escape_echo(path)
            ));
            out.push_str("  fi\n");
        }
        out.push_str("fi\n\n");

        out.push_str("if [ \"$SELF_DESTRUCT\" = true ]; then\n");
        out.push_str("  self_destruct\n");
        out.push_str("else\n");
        out.push_str("  echo \"Self-destruct is off: installer kept.\"\n");
        out.push_str("fi\n");
        out
    }
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn escape_echo(s: &str) -> String {
    s.replace('\\', r"\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
        .replace('`', "\\`")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn script() -> InstallerScript {
        let mut s = InstallerScript::new(PackageManagerKind::Npm);
        s.runtime = vec![PackageName::new("express").unwrap()];
        s.development = vec![PackageName::new("nodemon").unwrap()];
        s.generated_at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        s
    }

    #[test]
    fn installs_runtime_before_development() {
        let out = script().render();
        let runtime = out.find("npm install express").unwrap();
        let dev = out.find("npm install --save-dev nodemon").unwrap();
        assert!(runtime < dev);
        assert!(out.starts_with("#!/bin/sh\n# Generated by scafe on 2026-01-02 03:04:05 UTC"));
    }

    #[test]
    fn cleanup_checks_existence_and_never_fails() {
        let mut s = script();
        s.cleanup = vec!["setup.js".into(), "it's.tmp".into()];
        let out = s.render();

        assert!(out.contains("if [ -e 'setup.js' ]; then"));
        assert!(out.contains(r"'it'\''s.tmp'"));
        assert!(out.contains("|| echo \"Failed to delete file: setup.js\" >&2"));
    }

    #[test]
    fn self_destruct_traps_sigint() {
        let mut s = script();
        s.self_destruct = true;
        let out = s.render();
        assert!(out.contains("SELF_DESTRUCT=true"));
        assert!(out.contains("trap 'self_destruct; exit 130' INT"));
    }

    #[test]
    fn self_destruct_deletes_by_basename_and_never_fails() {
        let mut s = script();
        s.self_destruct = true;
        let out = s.render();

        let cd = out.find("cd \"$(dirname \"$0\")\"").unwrap();
        let self_name = out.find("SELF=\"$(basename \"$0\")\"").unwrap();
        assert!(cd < self_name);
        assert!(out.contains(
            "rm -f -- \"$SELF\" && echo \"Installer deleted.\" || echo \"Failed to delete installer\" >&2"
        ));
        assert!(!out.contains("rm -f -- \"$0\""));
    }

    #[test]
    fn empty_groups_are_omitted() {
        let mut s = InstallerScript::new(PackageManagerKind::Pnpm);
        s.development = vec![PackageName::new("prettier").unwrap()];
        let out = s.render();
        assert!(!out.contains("Installing runtime"));
        assert!(out.contains("pnpm add -D prettier"));
    }
}
