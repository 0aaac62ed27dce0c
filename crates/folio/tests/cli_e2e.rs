#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn folio_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("folio"));
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env("HOME", home)
        .env_remove("FOLIO_DATA_DIR")
        .env_remove("FOLIO_BACKEND")
        .env_remove("FOLIO_ADMIN_EMAILS")
        .env_remove("FOLIO_BACKEND_TIMEOUT_MS")
        .env_remove("RUST_LOG");
    cmd
}

fn list_json(home: &Path, data: &Path, backend: &str, collection: &str) -> Vec<Value> {
    let output = folio_cmd(home)
        .args(["--backend", backend, "list", collection, "--json", "--data-dir"])
        .arg(data)
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice::<Value>(&output.stdout)
        .unwrap()
        .as_array()
        .unwrap()
        .clone()
}

#[test]
fn seed_list_show_delete_workflow() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");

    // 1. Empty store
    folio_cmd(temp.path())
        .args(["list", "projects", "--data-dir"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found."));

    // 2. Seed
    folio_cmd(temp.path())
        .args(["seed", "--data-dir"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("projects"));
    assert!(data.join("portfolio.json").exists());
    assert!(data.join("projects.json").exists());

    // 3. Seeding again changes nothing
    folio_cmd(temp.path())
        .args(["seed", "--data-dir"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to seed"));

    // 4. Show and delete a project
    let projects = list_json(temp.path(), &data, "json", "projects");
    assert!(!projects.is_empty());
    let id = projects[0]["id"].as_str().unwrap().to_string();
    let title = projects[0]["title"].as_str().unwrap().to_string();

    folio_cmd(temp.path())
        .args(["show", "projects", &id, "--data-dir"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains(title.as_str()));

    folio_cmd(temp.path())
        .args(["delete", "projects", &id, "--data-dir"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    // 5. Gone, and a second delete fails
    folio_cmd(temp.path())
        .args(["show", "projects", &id, "--data-dir"])
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No projects record"));

    folio_cmd(temp.path())
        .args(["delete", "projects", &id, "--data-dir"])
        .arg(&data)
        .assert()
        .failure();

    let remaining = list_json(temp.path(), &data, "json", "projects");
    assert_eq!(remaining.len(), projects.len() - 1);
}

#[test]
fn portfolio_prints_every_section() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");

    let output = folio_cmd(temp.path())
        .args(["portfolio", "--data-dir"])
        .arg(&data)
        .output()
        .unwrap();
    assert!(output.status.success());
    let aggregate: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(aggregate["personalInfo"].is_null());
    assert!(aggregate["experiences"].as_array().unwrap().is_empty());

    let output = folio_cmd(temp.path())
        .args(["portfolio", "--public", "--data-dir"])
        .arg(&data)
        .output()
        .unwrap();
    assert!(output.status.success());
    let public: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(public["personalInfo"]["name"].is_string());
    assert!(public["featuredProjects"].is_array());
}

#[test]
fn sqlite_backend_persists_between_runs() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");

    folio_cmd(temp.path())
        .args(["--backend", "sqlite", "seed", "--data-dir"])
        .arg(&data)
        .assert()
        .success();
    assert!(data.join("folio.db").exists());

    let experiences = list_json(temp.path(), &data, "sqlite", "experiences");
    assert!(!experiences.is_empty());

    folio_cmd(temp.path())
        .args(["--backend", "sqlite", "stats", "--data-dir"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("featured"));
}

#[test]
fn config_reads_data_dir_file() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("folio.toml"),
        "bind = \"0.0.0.0:9999\"\nadmin_emails = [\"owner@example.com\"]\n",
    )
    .unwrap();

    folio_cmd(temp.path())
        .args(["config", "--data-dir"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("0.0.0.0:9999"))
        .stdout(predicate::str::contains("owner@example.com"));

    folio_cmd(temp.path())
        .args(["config", "template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("identity_header"));
}

#[test]
fn unknown_collection_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    folio_cmd(temp.path())
        .args(["list", "blog-posts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown collection"));
}
