//! Smoke tests for the shopcheck CLI

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the shopcheck binary
fn shopcheck() -> Command {
    let mut cmd = Command::cargo_bin("shopcheck").expect("shopcheck binary should exist");
    cmd.env_remove("RUST_LOG")
        .env_remove("SHOPCHECK_BACKEND")
        .env_remove("SHOPCHECK_BASE_URL")
        .env_remove("SHOPCHECK_TIMEOUT_MS")
        .env_remove("SHOPCHECK_HEADLESS")
        .env_remove("CHROMIUM_PATH");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    shopcheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    shopcheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("fixtures"));
}

#[test]
fn test_no_args_fails() {
    shopcheck().assert().failure();
}

// ============================================================================
// list
// ============================================================================

#[test]
fn test_list_shows_catalogue() {
    shopcheck()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("login_valid_users"))
        .stdout(predicate::str::contains("checkout_validation"))
        .stdout(predicate::str::contains("15 scenarios"));
}

#[test]
fn test_list_by_tag() {
    shopcheck()
        .args(["list", "--tag", "negative"])
        .assert()
        .success()
        .stdout(predicate::str::contains("login_invalid_users"))
        .stdout(predicate::str::contains("e2e_purchase").not());
}

#[test]
fn test_list_json() {
    let output = shopcheck()
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 15);
}

// ============================================================================
// fixtures
// ============================================================================

#[test]
fn test_fixtures_json() {
    shopcheck()
        .arg("fixtures")
        .assert()
        .success()
        .stdout(predicate::str::contains("standard_user"))
        .stdout(predicate::str::contains("Sauce Labs Backpack"));
}

#[test]
fn test_fixtures_yaml() {
    shopcheck()
        .args(["fixtures", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid_users:"));
}

#[test]
fn test_fixtures_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fixtures.yaml");
    let yaml = shopcheck()
        .args(["fixtures", "--format", "yaml"])
        .output()
        .unwrap()
        .stdout;
    fs::write(&path, yaml).unwrap();
    shopcheck()
        .args(["fixtures", "--fixtures"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("locked_out_user"));
}

#[test]
fn test_fixtures_bad_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fixtures.toml");
    fs::write(&path, "x = 1").unwrap();
    shopcheck()
        .args(["fixtures", "--fixtures"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_all_on_sim() {
    shopcheck()
        .args(["--color", "never", "run", "--timeout", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS e2e_purchase"))
        .stdout(predicate::str::contains("15 passed, 0 failed"));
}

#[test]
fn test_run_smoke_json() {
    let output = shopcheck()
        .args(["run", "--tag", "smoke", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["failed"], 0);
    assert_eq!(value["backend"], "sim");
    assert!(value["results"].as_array().unwrap().len() >= 4);
}

#[test]
fn test_run_writes_report_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    shopcheck()
        .args(["-q", "run", "--scenario", "logout", "--output"])
        .arg(&path)
        .assert()
        .success();
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(report["results"][0]["name"], "logout");
    assert_eq!(report["results"][0]["passed"], true);
}

#[test]
fn test_run_unknown_scenario() {
    shopcheck()
        .args(["run", "--scenario", "does_not_exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does_not_exist"));
}

#[test]
fn test_run_reads_headless_from_environment() {
    shopcheck()
        .env("SHOPCHECK_HEADLESS", "maybe")
        .args(["run", "--scenario", "logout"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SHOPCHECK_HEADLESS"));

    shopcheck()
        .env("SHOPCHECK_HEADLESS", "false")
        .args(["run", "--scenario", "logout"])
        .assert()
        .success();
}

#[test]
fn test_run_with_wrong_expectation_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fixtures.json");
    let json = shopcheck().arg("fixtures").output().unwrap().stdout;
    let mut fixtures: serde_json::Value = serde_json::from_slice(&json).unwrap();
    fixtures["invalid_users"]["locked_out_user"]["expected_error"] =
        serde_json::Value::from("Epic sadface: something else");
    fs::write(&path, serde_json::to_string(&fixtures).unwrap()).unwrap();

    shopcheck()
        .args(["--color", "never", "run", "--scenario", "login_invalid_users", "--timeout", "500", "--fixtures"])
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL login_invalid_users"))
        .stderr(predicate::str::contains("1 of 1 scenarios failed"));
}

#[cfg(not(feature = "browser"))]
#[test]
fn test_chromium_without_feature_fails() {
    shopcheck()
        .args(["--color", "never", "run", "--backend", "chromium", "--scenario", "logout"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed to launch browser"));
}
