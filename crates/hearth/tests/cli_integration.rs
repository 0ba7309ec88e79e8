//! CLI integration tests for the hearth command-line interface.
//!
//! These tests cover help output, argument parsing, key generation, and
//! start-up refusals. None of them leave a server running.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the hearth binary with an isolated config directory.
fn hearth(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hearth").unwrap();
    cmd.env("HEARTH_CONFIG_DIR", config_dir.path())
        .env_remove("HEARTH_SESSION_KEY")
        .current_dir(config_dir.path());
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    hearth(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("keygen"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    hearth(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hearth"));
}

#[test]
fn test_start_help_lists_options() {
    let dir = TempDir::new().unwrap();
    hearth(&dir)
        .args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--bind"))
        .stdout(predicate::str::contains("--static-dir"))
        .stdout(predicate::str::contains("--webroot"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let dir = TempDir::new().unwrap();
    hearth(&dir).arg("frobnicate").assert().failure();
}

#[test]
fn test_keygen_prints_base64_key() {
    let dir = TempDir::new().unwrap();
    let output = hearth(&dir).arg("keygen").assert().success().get_output().stdout.clone();
    let key = String::from_utf8(output).unwrap();
    let key = key.trim();

    // 32 bytes of standard base64 with padding.
    assert_eq!(key.len(), 44);
    assert!(key.ends_with('='));
}

#[test]
fn test_keygen_export_line() {
    let dir = TempDir::new().unwrap();
    hearth(&dir)
        .args(["keygen", "--export"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("export HEARTH_SESSION_KEY="));
}

#[test]
fn test_start_without_key_fails() {
    let dir = TempDir::new().unwrap();
    hearth(&dir)
        .args(["start", "--bind", "127.0.0.1:0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HEARTH_SESSION_KEY"));
}

#[test]
fn test_start_with_malformed_key_fails() {
    let dir = TempDir::new().unwrap();
    hearth(&dir)
        .env("HEARTH_SESSION_KEY", "too-short")
        .args(["start", "--bind", "127.0.0.1:0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid session key"));
}

#[test]
fn test_start_with_missing_config_fails() {
    let dir = TempDir::new().unwrap();
    hearth(&dir)
        .args(["start", "--config", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn test_start_with_unrooted_webroot_fails() {
    let dir = TempDir::new().unwrap();
    hearth(&dir)
        .args(["start", "--bind", "127.0.0.1:0", "--webroot", "static"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must start with '/'"));
}
