//! Integration tests for the tqlgen CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SCHEMA: &str = r#"define
attribute name, value string;
attribute url, value string;
attribute status, value string @values("up", "down");
entity service @abstract, owns name @key;
entity http-endpoint sub service, owns url @card(1), owns status, plays dependency:target;
entity worker sub service, plays dependency:dependent;
relation dependency, relates dependent, relates target;
"#;

/// Get the tqlgen binary
#[allow(deprecated)]
fn tqlgen_cmd() -> Command {
    Command::cargo_bin("tqlgen").unwrap()
}

fn write_schema(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("schema.tql");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_help_command() {
    tqlgen_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("TypeQL schema compiler"))
        .stdout(predicate::str::contains("Usage: tqlgen [OPTIONS] <COMMAND>"))
        .stdout(predicate::str::contains("model"))
        .stdout(predicate::str::contains("dto"))
        .stdout(predicate::str::contains("registry"))
        .stdout(predicate::str::contains("constants"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_version_command() {
    tqlgen_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tqlgen 0.4.0"))
        .stdout(predicate::str::contains("model, dto, registry, constants"));
}

#[test]
fn test_model_help() {
    tqlgen_cmd()
        .args(["model", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate plain data types"))
        .stdout(predicate::str::contains("--schema"))
        .stdout(predicate::str::contains("--skip-abstract <BOOL>"))
        .stdout(predicate::str::contains("--schema-version"));
}

#[test]
fn test_model_to_stdout() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, SCHEMA);

    tqlgen_cmd()
        .args(["model", "--schema", schema.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "// Code generated by tqlgen; DO NOT EDIT.",
        ))
        .stdout(predicate::str::contains("pub struct HTTPEndpoint {"))
        .stdout(predicate::str::contains("pub enum Status {"))
        .stdout(predicate::str::contains("pub struct Service {").not())
        .stderr(predicate::str::contains("Generated model module"));
}

#[test]
fn test_module_flag_names_the_module() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, SCHEMA);

    tqlgen_cmd()
        .args(["model", "-s", schema.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("//! Generated `models` module."));

    tqlgen_cmd()
        .args(["registry", "-s", schema.to_str().unwrap(), "-m", "schema_types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("//! Generated `schema_types` module."))
        .stdout(predicate::str::contains("`registry`").not());
}

#[test]
fn test_shared_flags_override_defaults() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, SCHEMA);

    tqlgen_cmd()
        .args([
            "model",
            "-s",
            schema.to_str().unwrap(),
            "--acronyms",
            "false",
            "--skip-abstract",
            "false",
            "--enums",
            "false",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("pub struct HttpEndpoint {"))
        .stdout(predicate::str::contains("pub struct Service {"))
        .stdout(predicate::str::contains("pub enum Status").not());
}

#[test]
fn test_dto_to_file() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, SCHEMA);
    let out = dir.path().join("src").join("generated").join("dto.rs");

    tqlgen_cmd()
        .args([
            "dto",
            "-s",
            schema.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--skip-relation-out",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let code = fs::read_to_string(&out).unwrap();
    assert!(code.contains("pub struct HTTPEndpointCreate {"));
    assert!(code.contains("pub struct WorkerPatch {"));
    assert!(code.contains("pub struct DependencyCreate {"));
    assert!(!code.contains("pub struct DependencyOut {"));
}

#[test]
fn test_registry_flags() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, SCHEMA);

    tqlgen_cmd()
        .args([
            "registry",
            "-s",
            schema.to_str().unwrap(),
            "--typed-constants",
            "--no-fingerprint",
            "--schema-version",
            "3.1.0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("pub struct EntityType(pub &'static str);"))
        .stdout(predicate::str::contains("pub const SCHEMA_VERSION: &str = \"3.1.0\";"))
        .stdout(predicate::str::contains("SCHEMA_HASH").not());
}

#[test]
fn test_constants_command() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, SCHEMA);

    tqlgen_cmd()
        .args(["constants", "-s", schema.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "pub const TYPE_HTTP_ENDPOINT: &str = \"http-endpoint\";",
        ))
        .stdout(predicate::str::contains("pub const STATUS_DOWN: &str = \"down\";"))
        .stdout(predicate::str::contains("fn entity_parent").not());
}

#[test]
fn test_config_file_supplies_schema_and_settings() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("schema")).unwrap();
    fs::write(dir.path().join("schema").join("app.tql"), SCHEMA).unwrap();
    fs::write(
        dir.path().join("tqlgen.toml"),
        r#"
[schema]
path = "schema/app.tql"

[model]
schema_version = "9.9.9"
"#,
    )
    .unwrap();

    tqlgen_cmd()
        .current_dir(dir.path())
        .arg("model")
        .assert()
        .success()
        .stdout(predicate::str::contains("pub const SCHEMA_VERSION: &str = \"9.9.9\";"));

    tqlgen_cmd()
        .current_dir(dir.path())
        .args(["model", "--schema-version", "1.0.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pub const SCHEMA_VERSION: &str = \"1.0.0\";"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, SCHEMA);
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[model]\nunknown_key = true\n").unwrap();

    tqlgen_cmd()
        .args([
            "model",
            "-s",
            schema.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn test_missing_schema_argument_fails() {
    let dir = TempDir::new().unwrap();

    tqlgen_cmd()
        .current_dir(dir.path())
        .arg("registry")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no schema file given"));
}

#[test]
fn test_syntax_error_fails() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "define entity person, owns;");

    tqlgen_cmd()
        .args(["model", "-s", schema.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("syntax error"));
}

#[test]
fn test_cyclic_inheritance_fails() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "define entity a sub b; entity b sub a;");

    tqlgen_cmd()
        .args(["dto", "-s", schema.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cyclic inheritance"));
}

#[test]
fn test_validate_reports_counts() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, SCHEMA);

    tqlgen_cmd()
        .args(["validate", "-s", schema.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Schema is valid!"))
        .stderr(predicate::str::contains("Entities"))
        .stderr(predicate::str::contains("Relations"));
}

#[test]
fn test_validate_warns_on_unplayed_role() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "define relation dependency, relates target;");

    tqlgen_cmd()
        .args(["validate", "-s", schema.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("role 'dependency:target' has no players"));
}

#[test]
fn test_validate_json_dump() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, SCHEMA);

    let output = tqlgen_cmd()
        .args(["validate", "--json", "-s", schema.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let model: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let endpoint = &model["entities"]["http-endpoint"];
    assert_eq!(endpoint["parent"], "service");

    // Inheritance is merged by default.
    let owned: Vec<&str> = endpoint["owns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["attribute"].as_str().unwrap())
        .collect();
    assert!(owned.contains(&"name"));
}
