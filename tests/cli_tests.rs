//! Integration tests for the wmap CLI
//!
//! These tests run the actual CLI binary and verify output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SAMPLE_JSON: &str = r#"{"collect":{"metric_namespaces":["/foo/bar"],"publish":[{"plugin_name":"rabbitmq","plugin_version":5}]}}"#;

const NESTED_YAML: &str = r#"
collect:
  metric_namespaces:
    - /intel/cpu/load
  process:
    - plugin_name: learn
      plugin_version: 3
      publish:
        - plugin_name: influx
          plugin_version: 2
  publish:
    - plugin_name: rabbitmq
      plugin_version: 5
"#;

/// Get the binary to test
fn wmap_cmd() -> Command {
    Command::cargo_bin("wmap").unwrap()
}

fn write_map(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_help_flag() {
    wmap_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("workflow maps"));
}

// ============================================================================
// render
// ============================================================================

#[test]
fn test_render_json() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_map(&temp_dir, "map.json", SAMPLE_JSON);

    wmap_cmd()
        .args(["render", &file])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Workflow\n\tCollect:\n"))
        .stdout(predicate::str::contains("\t\t\t\t/foo/bar\n"))
        .stdout(predicate::str::contains("\t\t\tName: rabbitmq\n"))
        .stdout(predicate::str::contains("\t\t\tVersion: 5\n"));
}

#[test]
fn test_render_empty_map() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_map(&temp_dir, "empty.json", "{}");

    wmap_cmd()
        .args(["render", &file])
        .assert()
        .success()
        .stdout("Workflow\n\tCollect:\n\n");
}

#[test]
fn test_render_explicit_format_overrides_extension() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_map(&temp_dir, "map.txt", NESTED_YAML);

    wmap_cmd()
        .args(["render", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot infer format"));

    wmap_cmd()
        .args(["render", &file, "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: learn"));
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn test_validate_nested_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_map(&temp_dir, "map.yaml", NESTED_YAML);

    wmap_cmd()
        .args(["validate", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"))
        .stdout(predicate::str::contains("Namespaces: 1"))
        .stdout(predicate::str::contains("Process nodes: 1"))
        .stdout(predicate::str::contains("Publish nodes: 1"))
        .stdout(predicate::str::contains("Total nodes: 3"));
}

#[test]
fn test_validate_malformed_json() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_map(&temp_dir, "broken.json", r#"{"collect": {"publish": ["#);

    wmap_cmd()
        .args(["validate", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("WMAP-011"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_validate_bad_namespace() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_map(
        &temp_dir,
        "map.yml",
        "collect:\n  metric_namespaces:\n    - foo/bar\n",
    );

    wmap_cmd()
        .args(["validate", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must start with '/'"));
}

#[test]
fn test_validate_missing_file() {
    wmap_cmd()
        .args(["validate", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

// ============================================================================
// convert / sample
// ============================================================================

#[test]
fn test_convert_json_to_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_map(&temp_dir, "map.json", SAMPLE_JSON);

    wmap_cmd()
        .args(["convert", &file, "--to", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("collect:"))
        .stdout(predicate::str::contains("- /foo/bar"))
        .stdout(predicate::str::contains("plugin_name: rabbitmq"));
}

#[test]
fn test_convert_yaml_to_pretty_json() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_map(&temp_dir, "map.yaml", NESTED_YAML);

    wmap_cmd()
        .args(["convert", &file, "--to", "json", "--pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"plugin_name\": \"learn\""));
}

#[test]
fn test_sample_defaults_to_json() {
    wmap_cmd()
        .arg("sample")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""metric_namespaces":["/foo/bar"]"#))
        .stdout(predicate::str::contains(r#""plugin_name":"rabbitmq""#));
}

#[test]
fn test_sample_yaml() {
    wmap_cmd()
        .args(["sample", "--to", "yml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("plugin_version: 5"));
}
