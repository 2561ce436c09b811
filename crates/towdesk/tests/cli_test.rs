//! Integration tests for the `towdesk` binary.
//!
//! Argument parsing, help output, completions, config management and
//! error exit codes, all without a live backend. Commands that must reach
//! the network point at a closed local port.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Nothing listens here; connections are refused immediately.
const CLOSED_HOST: &str = "127.0.0.1:1";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `towdesk` binary with env isolation.
///
/// Clears every `TOWDESK_*` variable and points the config file into
/// `dir` so tests never touch the user's real configuration.
fn towdesk_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("towdesk");
    cmd.env("TOWDESK_CONFIG", dir.join("config.toml"))
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir)
        .env("RUST_LOG", "off")
        .env_remove("TOWDESK_PROFILE")
        .env_remove("TOWDESK_PROJECT")
        .env_remove("TOWDESK_API_KEY")
        .env_remove("TOWDESK_OUTPUT")
        .env_remove("TOWDESK_TIMEOUT")
        .env_remove("FIRESTORE_EMULATOR_HOST");
    cmd
}

fn emulator_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = towdesk_cmd(dir);
    cmd.args(["--project", "demo-towdesk", "--emulator", CLOSED_HOST]);
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let dir = TempDir::new().unwrap();
    let output = towdesk_cmd(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn help_lists_entity_commands() {
    let dir = TempDir::new().unwrap();
    towdesk_cmd(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("users")
            .and(predicate::str::contains("tow-requests"))
            .and(predicate::str::contains("insurers"))
            .and(predicate::str::contains("towing")),
    );
}

#[test]
fn version_flag() {
    let dir = TempDir::new().unwrap();
    towdesk_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("towdesk"));
}

#[test]
fn completions_zsh() {
    let dir = TempDir::new().unwrap();
    towdesk_cmd(dir.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn invalid_subcommand_is_usage_error() {
    let dir = TempDir::new().unwrap();
    towdesk_cmd(dir.path())
        .arg("dispatch")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("dispatch"));
}

// ── Backend resolution ──────────────────────────────────────────────

#[test]
fn missing_config_points_at_init() {
    let dir = TempDir::new().unwrap();
    towdesk_cmd(dir.path())
        .args(["roles", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("towdesk config init"));
}

#[test]
fn unknown_profile_flag_is_reported() {
    let dir = TempDir::new().unwrap();
    towdesk_cmd(dir.path())
        .args(["--profile", "staging", "users", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'staging' not found"));
}

#[test]
fn production_without_api_key_is_auth_error() {
    let dir = TempDir::new().unwrap();
    towdesk_cmd(dir.path())
        .args(["--profile", "towdesk-test-nokey"])
        .args(["config", "set", "project_id", "towdesk-prod"])
        .assert()
        .success();

    towdesk_cmd(dir.path())
        .args(["--profile", "towdesk-test-nokey", "towing", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No API key configured"));
}

// ── Validation before any request ───────────────────────────────────

#[test]
fn insurer_create_rejects_bad_email() {
    let dir = TempDir::new().unwrap();
    emulator_cmd(dir.path())
        .args(["insurers", "create", "--name", "Acme", "--email", "claims.acme.test"])
        .args(["--user-id", "u1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("contactEmail"));
}

#[test]
fn towing_update_cannot_blank_name() {
    let dir = TempDir::new().unwrap();
    emulator_cmd(dir.path())
        .args(["towing", "update", "t1", "--name", "  "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is required"));
}

#[test]
fn delete_without_yes_needs_confirmation() {
    let dir = TempDir::new().unwrap();
    emulator_cmd(dir.path())
        .args(["insurers", "delete", "c1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires confirmation"));
}

// ── Unreachable backend ─────────────────────────────────────────────

#[test]
fn list_against_dead_backend_shows_entity_message() {
    let dir = TempDir::new().unwrap();
    emulator_cmd(dir.path())
        .args(["tow-requests", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to fetch all tow requests"));
}

#[test]
fn reset_password_against_dead_backend_is_connection_error() {
    let dir = TempDir::new().unwrap();
    for (key, value) in [
        ("project_id", "demo-towdesk"),
        ("emulator_host", CLOSED_HOST),
        ("auth_emulator_host", CLOSED_HOST),
    ] {
        towdesk_cmd(dir.path())
            .args(["config", "set", key, value])
            .assert()
            .success();
    }

    towdesk_cmd(dir.path())
        .args(["auth", "reset-password", "ops@acme.test"])
        .assert()
        .code(7);
}

// ── Config management ───────────────────────────────────────────────

#[test]
fn config_set_then_show_as_json() {
    let dir = TempDir::new().unwrap();
    towdesk_cmd(dir.path())
        .args(["config", "set", "project_id", "towdesk-staging"])
        .assert()
        .success();
    towdesk_cmd(dir.path())
        .args(["config", "set", "api_key", "AIza-secret"])
        .assert()
        .success();

    towdesk_cmd(dir.path())
        .args(["--output", "json", "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("towdesk-staging")
                .and(predicate::str::contains("****"))
                .and(predicate::str::contains("AIza-secret").not()),
        );
}

#[test]
fn config_profiles_marks_default() {
    let dir = TempDir::new().unwrap();
    towdesk_cmd(dir.path())
        .args(["config", "set", "project_id", "towdesk-staging"])
        .assert()
        .success();

    towdesk_cmd(dir.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *"));
}

#[test]
fn config_use_unknown_profile_fails() {
    let dir = TempDir::new().unwrap();
    towdesk_cmd(dir.path())
        .args(["config", "use", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'nope' not found"));
}

#[test]
fn config_set_unknown_key_is_usage_error() {
    let dir = TempDir::new().unwrap();
    towdesk_cmd(dir.path())
        .args(["config", "set", "site", "default"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown config key"));
}
