//! Tests for the language-model-converter binary

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_language-model-converter"))
        .args(args)
        .output()
        .expect("binary should start")
}

#[test]
fn test_prints_model_to_stdout() {
    let path = fixture("en-basic.yaml");
    let output = run(&[path.to_str().unwrap(), "-c", "en-us"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let model: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(model["culture"], "en-us");
    assert_eq!(model["utterances"].as_array().unwrap().len(), 6);
}

#[test]
fn test_writes_model_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("model.json");
    let path = fixture("es-cornercases.yaml");

    let output = run(&[
        path.to_str().unwrap(),
        "--culture",
        "es-es",
        "--output",
        target.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let model: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(model["culture"], "es-es");
}

#[test]
fn test_errors_fail_unless_allowed() {
    let path = fixture("en-too-few-examples.yaml");

    let rejected = run(&[path.to_str().unwrap()]);
    assert_eq!(rejected.status.code(), Some(1));
    assert!(rejected.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&rejected.stderr);
    assert!(stderr.contains("ERROR: The following intents have less than 3 examples"));

    let allowed = run(&[path.to_str().unwrap(), "--allow-errors"]);
    assert!(allowed.status.success());
    assert!(!allowed.stdout.is_empty());
}

#[test]
fn test_warnings_do_not_fail() {
    let path = fixture("en-unused-variables.yaml");
    let output = run(&[path.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("WARNING: The list \"color\""));
}

#[test]
fn test_directory_without_model_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "nothing here").unwrap();

    let output = run(&[dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No files found"));
}

#[test]
fn test_config_file_sets_model_header() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("converter.yaml");
    std::fs::write(&config, "culture: es-es\nmodel:\n  name: travel-bot\n").unwrap();
    let path = fixture("en-basic.yaml");

    let output = run(&[path.to_str().unwrap(), "--config", config.to_str().unwrap()]);

    assert!(output.status.success());
    let model: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(model["name"], "travel-bot");
    assert_eq!(model["desc"], "Bot Model");
    assert_eq!(model["culture"], "es-es");
}

#[test]
fn test_quoted_pattern_is_resolved() {
    let pattern = fixture("en-features-*.yaml");
    let output = run(&[pattern.to_str().unwrap()]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let model: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = model["model_features"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["name"].as_str())
        .collect();
    assert_eq!(names, vec!["strange", "numbers", "anotherlist"]);
}

#[test]
fn test_pattern_without_matches() {
    let pattern = fixture("nomatch*.yaml");
    let output = run(&[pattern.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No files found"));
}
