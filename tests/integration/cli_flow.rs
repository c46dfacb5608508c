//! Integration tests for the profile-maker binary
//!
//! Each test points PROFILE_MAKER_HOME at a temp dir so config and logs never
//! touch the real home directory.

use super::common::fixtures::{read_json, template_json, write_capture, write_json};
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn profile_maker(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("profile-maker").expect("Binary not built");
    cmd.env("PROFILE_MAKER_HOME", home)
        .env_remove("RUST_LOG")
        .current_dir(home);
    cmd
}

/// `facets` lists the sentinel first, then the sorted candidates
#[test]
fn test_facets_command() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let capture = write_capture(dir.path());

    profile_maker(dir.path())
        .arg("-f")
        .arg(&capture)
        .arg("facets")
        .assert()
        .success()
        .stdout(predicate::str::contains("method: All, GET, POST"))
        .stdout(predicate::str::contains(
            "host: All, cdn.example.com, www.example.org",
        ))
        .stdout(predicate::str::contains(
            "mime: [All MimeTypes], HTML, JSON, script, text",
        ));
}

/// `list --method POST` shows the two POSTs under their original ids
#[test]
fn test_list_filtered_by_method() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let capture = write_capture(dir.path());

    let output = profile_maker(dir.path())
        .arg("-f")
        .arg(&capture)
        .args(["list", "--method", "POST"])
        .output()
        .expect("Failed to run profile-maker");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Filters applied: method: POST"));
    assert!(stdout.contains("2 of 5 transactions"));
    assert!(stdout.contains("https://cdn.example.com/api/submit?id=7"));
    assert!(stdout.contains("https://www.example.org/collect"));
    assert!(!stdout.contains("favicon.ico"));

    let ids: Vec<&str> = stdout
        .lines()
        .filter(|line| line.contains("https://"))
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert_eq!(ids, vec!["1", "3"]);
}

/// Marks show up as role tags, and `--selected` hides everything else
#[test]
fn test_list_selected_with_role_tags() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let capture = write_capture(dir.path());

    profile_maker(dir.path())
        .arg("-f")
        .arg(&capture)
        .args(["list", "--selected", "--uri", "1", "--request", "1", "--blank", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[uri request]"))
        .stdout(predicate::str::contains("[blank]"))
        .stdout(predicate::str::contains("2 of 5 transactions | accepted URIs: 1"))
        .stdout(predicate::str::contains("jquery").not());
}

/// `show` prints the decoded transcripts of one transaction
#[test]
fn test_show_decodes_transaction() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let capture = write_capture(dir.path());

    profile_maker(dir.path())
        .arg("-f")
        .arg(&capture)
        .args(["show", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("URI: /favicon.ico"))
        .stdout(predicate::str::contains("HTTP/1.1 204 No Content"))
        .stdout(predicate::str::contains("[Empty body]"));
}

/// Unknown ids are reported instead of panicking
#[test]
fn test_show_unknown_id_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let capture = write_capture(dir.path());

    profile_maker(dir.path())
        .arg("-f")
        .arg(&capture)
        .args(["show", "42"])
        .assert()
        .failure();
}

/// A full export writes every marked field into the listener
#[test]
fn test_export_writes_profile() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let capture = write_capture(dir.path());
    let template = write_json(dir.path(), "template.json", &template_json());
    let output = dir.path().join("profile.json");

    profile_maker(dir.path())
        .arg("-f")
        .arg(&capture)
        .arg("export")
        .args(["--method", "POST", "--uris-from-view"])
        .args(["--request", "1", "--request-cursor", "1,6", "--panel-width", "10"])
        .args(["--response", "0", "--response-offset", "13"])
        .args(["--blank", "4"])
        .arg("-t")
        .arg(&template)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"))
        .stdout(predicate::str::contains("c2_uri"));

    let listener = read_json(&output)["listeners"]["templateListener"].clone();
    assert_eq!(listener["c2_uri"], json!(["/api/submit", "/collect"]));
    assert_eq!(listener["prepend"], json!("{\"id\":7,\"data\":\""));
    assert_eq!(listener["append"], json!("\"}"));
    assert_eq!(listener["prepend_response"], json!("/*! jQuery */"));
    assert_eq!(listener["append_response"], json!("var a=1;"));
    assert_eq!(listener["empty_response"], json!(""));
    assert_eq!(listener["port"], json!("443"));
}

/// A template without `listeners.templateListener` fails and leaves the output alone
#[test]
fn test_export_rejects_bad_template() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let capture = write_capture(dir.path());
    let template = write_json(dir.path(), "template.json", &json!({ "listeners": [] }));
    let output = dir.path().join("profile.json");
    fs::write(&output, b"keep me").unwrap();

    profile_maker(dir.path())
        .arg("-f")
        .arg(&capture)
        .args(["export", "--uri", "0"])
        .arg("-t")
        .arg(&template)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("listeners"));

    assert_eq!(fs::read(&output).unwrap(), b"keep me");
}

/// Commands that need a capture fail without `-f`
#[test]
fn test_missing_capture_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    profile_maker(dir.path())
        .arg("facets")
        .assert()
        .failure()
        .stderr(predicate::str::contains("-f <BURP_XML>"));
}

/// `config set-output` persists the default export destination
#[test]
fn test_config_set_output_is_used_by_export() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let capture = write_capture(dir.path());
    let template = write_json(dir.path(), "template.json", &template_json());
    let output = dir.path().join("from-config.json");

    profile_maker(dir.path())
        .arg("config")
        .arg("set-output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("export.output"));

    let config = fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(config.contains("[export]"));
    assert!(config.contains("from-config.json"));

    profile_maker(dir.path())
        .arg("-f")
        .arg(&capture)
        .args(["export", "--uri", "2"])
        .arg("-t")
        .arg(&template)
        .assert()
        .success();

    let listener = read_json(&output)["listeners"]["templateListener"].clone();
    assert_eq!(listener["c2_uri"], json!(["/"]));
}

/// An invalid config file is reported and the defaults are used
#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let capture = write_capture(dir.path());
    fs::write(
        dir.path().join("config.toml"),
        "[view]\npanel_width = \"wide\"\n",
    )
    .unwrap();

    profile_maker(dir.path())
        .arg("-f")
        .arg(&capture)
        .arg("facets")
        .assert()
        .success()
        .stdout(predicate::str::contains("method: All, GET, POST"))
        .stderr(predicate::str::contains("Invalid config"))
        .stderr(predicate::str::contains("Using default settings"));
}

/// `config set-*` creates a `--config` file that does not exist yet
#[test]
fn test_config_set_template_creates_named_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = dir.path().join("new.toml");

    profile_maker(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set-template", "t.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("export.template"));

    let contents = fs::read_to_string(&config).expect("Config file was not created");
    assert!(contents.contains("[export]"));
    assert!(contents.contains("template = \"t.json\""));
    assert!(!dir.path().join("config.toml").exists());
}
