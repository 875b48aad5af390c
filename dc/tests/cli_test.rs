//! CLI tests for the `dc` binary
//!
//! All runs use the offline `local` provider and a throwaway home directory.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("decide.yml"), "llm:\n  provider: local\n").expect("Failed to write config");
        Self { dir }
    }

    fn dc(&self) -> Command {
        let mut cmd = Command::cargo_bin("dc").expect("dc binary");
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .arg("--config")
            .arg(self.dir.path().join("decide.yml"));
        cmd
    }
}

#[test]
fn test_categories_text() {
    let sandbox = Sandbox::new();
    sandbox
        .dc()
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("meals"))
        .stdout(predicate::str::contains("Focus"))
        .stdout(predicate::str::contains("your own options"));
}

#[test]
fn test_categories_json() {
    let sandbox = Sandbox::new();
    let output = sandbox.dc().args(["categories", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let categories = json.as_array().unwrap();
    assert_eq!(categories.len(), 5);
    assert_eq!(categories[0]["id"], "meals");
    assert_eq!(categories[0]["label"], "Eat");
    assert_eq!(categories[4]["suggestions"].as_array().unwrap().len(), 0);
}

#[test]
fn test_decide_fixed_category_text() {
    let sandbox = Sandbox::new();
    sandbox
        .dc()
        .args(["decide", "meals", "--mood", "tired"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Eat:"));
}

#[test]
fn test_decide_custom_json() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .dc()
        .args(["decide", "custom", "-o", "Gym", "-o", "Gym", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["category"], "custom");
    assert_eq!(json["choice"], "Gym");
}

#[test]
fn test_decide_empty_custom_reports_message() {
    let sandbox = Sandbox::new();
    sandbox
        .dc()
        .args(["decide", "custom"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Add at least one option to your custom list first."));
}

#[test]
fn test_decide_unknown_category_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .dc()
        .args(["decide", "brunch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"));
}

#[test]
fn test_option_on_fixed_category_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .dc()
        .args(["decide", "work", "-o", "Nap"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_provider_fails() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.dir.path().join("decide.yml"), "llm:\n  provider: oracle\n").unwrap();
    sandbox
        .dc()
        .args(["decide", "meals"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("oracle"));
}
