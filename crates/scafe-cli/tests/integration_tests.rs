//! Integration tests for the `scafe` binary.
//!
//! Every test runs in its own temporary directory with an explicit, empty
//! configuration file so the developer's own settings never leak in.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::{Command, cargo};
use predicates::prelude::*;
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
    config: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("scafe.toml");
        fs::write(&config, "").unwrap();
        Self { dir, config }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn scafe(&self) -> Command {
        let mut cmd = cargo::cargo_bin_cmd!("scafe");
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(&self.config);
        cmd
    }
}

#[test]
fn test_help_flag() {
    let mut cmd = cargo::cargo_bin_cmd!("scafe");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scaffold multi-service Node backends"))
        .stdout(predicate::str::contains("EXAMPLES"));
}

#[test]
fn test_version_flag() {
    let mut cmd = cargo::cargo_bin_cmd!("scafe");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_new_command_help() {
    let mut cmd = cargo::cargo_bin_cmd!("scafe");
    cmd.args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--service"))
        .stdout(predicate::str::contains("--db"))
        .stdout(predicate::str::contains("--installer"));
}

#[test]
fn test_list_shows_catalog() {
    let sandbox = Sandbox::new();
    sandbox
        .scafe()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("express"))
        .stdout(predicate::str::contains("ioredis"));
}

#[test]
fn test_list_json_is_parseable() {
    let sandbox = Sandbox::new();
    let out = sandbox
        .scafe()
        .args(["list", "--optional", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let names: Vec<_> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap().to_string())
        .collect();
    assert!(names.contains(&"ioredis".to_string()));
    assert!(!names.contains(&"express".to_string()));
}

#[test]
fn test_new_dry_run_writes_nothing() {
    let sandbox = Sandbox::new();
    sandbox
        .scafe()
        .args(["new", "shop", "--yes", "--dry-run", "-s", "auth"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("gateway"))
        .stdout(predicate::str::contains("auth"));

    assert!(!sandbox.path().join("shop").exists());
}

#[test]
fn test_new_project_success() {
    let sandbox = Sandbox::new();
    sandbox
        .scafe()
        .args(["new", "shop", "--yes", "--skip-install", "-s", "auth", "--redis"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created service 'auth'"));

    let root = sandbox.path().join("shop");
    assert!(root.join("package.json").is_file());
    assert!(root.join(".gitignore").is_file());
    assert!(root.join("gateway/index.js").is_file());
    assert!(root.join("auth/config/redis.js").is_file());
    assert!(root.join("auth/utils/cache.js").is_file());
    assert!(!root.join("auth/config/dbs.js").exists());

    let manifest = fs::read_to_string(root.join("package.json")).unwrap();
    assert!(manifest.contains("\"name\": \"shop\""));
}

#[test]
fn test_new_is_idempotent() {
    let sandbox = Sandbox::new();
    let args = ["new", "shop", "--yes", "--skip-install", "-s", "auth"];
    sandbox.scafe().args(args).assert().success();

    let index = sandbox.path().join("shop/auth/index.js");
    fs::write(&index, "// edited by hand\n").unwrap();

    sandbox
        .scafe()
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains("already complete"))
        .stdout(predicate::str::contains("0 created"));

    assert_eq!(fs::read_to_string(&index).unwrap(), "// edited by hand\n");
}

#[test]
fn test_new_with_installer_script() {
    let sandbox = Sandbox::new();
    sandbox
        .scafe()
        .args(["new", "shop", "--yes", "--installer", "--self-destruct"])
        .assert()
        .success()
        .stdout(predicate::str::contains("./install.sh"));

    let script = fs::read_to_string(sandbox.path().join("shop/install.sh")).unwrap();
    assert!(script.contains("express"));
    assert!(!sandbox.path().join("shop/node_modules").exists());
}

#[test]
fn test_new_json_report() {
    let sandbox = Sandbox::new();
    let out = sandbox
        .scafe()
        .args(["--output-format", "json", "new", "shop", "--yes", "--skip-install"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["install_skipped"], true);
    assert_eq!(report["services"][0]["name"], "gateway");
}

#[test]
fn test_cleanup_reports_missing_and_deleted() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.path().join("setup.js"), "x").unwrap();

    sandbox
        .scafe()
        .args(["cleanup", "setup.js", "generator.log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 deleted, 1 missing, 0 failed"));

    assert!(!sandbox.path().join("setup.js").exists());
}

#[test]
fn test_config_path_follows_explicit_file() {
    let sandbox = Sandbox::new();
    sandbox
        .scafe()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scafe.toml"));
}

#[test]
fn test_config_set_then_get() {
    let sandbox = Sandbox::new();
    sandbox
        .scafe()
        .args(["config", "set", "defaults.database", "mysql"])
        .assert()
        .success();

    sandbox
        .scafe()
        .args(["config", "get", "defaults.database"])
        .assert()
        .success()
        .stdout(predicate::str::diff("mysql\n"));
}

#[test]
fn test_env_overrides_file() {
    let sandbox = Sandbox::new();
    fs::write(&sandbox.config, "[defaults]\ndatabase = \"mysql\"\n").unwrap();

    sandbox
        .scafe()
        .env("SCAFE__DEFAULTS__DATABASE", "sqlite")
        .args(["config", "get", "defaults.database"])
        .assert()
        .success()
        .stdout(predicate::str::diff("sqlite\n"));
}

#[test]
fn test_init_local_writes_file_once() {
    let sandbox = Sandbox::new();
    sandbox.scafe().args(["init", "--local"]).assert().success();

    let written = sandbox.path().join(".scafe.toml");
    let contents = fs::read_to_string(&written).unwrap();
    assert!(contents.contains("[defaults]"));

    sandbox
        .scafe()
        .args(["init", "--local"])
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = cargo::cargo_bin_cmd!("scafe");
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scafe"));
}
