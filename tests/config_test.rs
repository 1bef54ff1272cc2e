// tests/config_test.rs
use std::fs;
use std::io::Write;
use tagver::config::{find_config, load_config, Backend, Config, CONFIG_FILE_NAME};
use tagver::test_command::RunnerKind;
use tagver::TagverError;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_from_explicit_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[package]
name = "helpers"
description = "Setuptools helper functions"

[version]
trunk_branch = "main"
floor_tag = "0.1.0"

[test]
runner = "unittest"
test_dir = "checks"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let project = TempDir::new().unwrap();
    let config = load_config(Some(temp_file.path()), project.path()).unwrap();

    assert_eq!(config.package.name.as_deref(), Some("helpers"));
    assert_eq!(config.package.description, "Setuptools helper functions");
    assert_eq!(config.version.trunk_branch, "main");
    assert_eq!(config.version.floor_tag, "0.1.0");
    assert_eq!(config.version.backend, Backend::Git);
    assert_eq!(config.test.runner, RunnerKind::Unittest);
    assert_eq!(config.test.options.test_dir.as_deref(), Some("checks"));
}

#[test]
fn test_load_from_project_directory() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(CONFIG_FILE_NAME),
        "[ci]\nbranch_var = \"CI_COMMIT_REF_NAME\"\n",
    )
    .unwrap();

    assert_eq!(
        find_config(None, project.path()),
        Some(project.path().join(CONFIG_FILE_NAME))
    );

    let config = load_config(None, project.path()).unwrap();
    assert_eq!(config.ci.branch_var, "CI_COMMIT_REF_NAME");
    assert_eq!(config.ci.tag_var, "TRAVIS_TAG");
}

#[test]
fn test_explicit_path_wins_over_project_file() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(CONFIG_FILE_NAME),
        "[version]\ntrunk_branch = \"trunk\"\n",
    )
    .unwrap();
    let explicit = project.path().join("other.toml");
    fs::write(&explicit, "[version]\ntrunk_branch = \"main\"\n").unwrap();

    let config = load_config(Some(explicit.as_path()), project.path()).unwrap();
    assert_eq!(config.version.trunk_branch, "main");
}

#[test]
fn test_missing_explicit_file_is_error() {
    let project = TempDir::new().unwrap();
    let absent = project.path().join("absent.toml");
    let result = load_config(Some(absent.as_path()), project.path());
    assert!(matches!(result, Err(TagverError::Io(_))));
}

#[test]
fn test_malformed_file_names_the_path() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join(CONFIG_FILE_NAME), "[version\n").unwrap();

    let err = load_config(None, project.path()).unwrap_err();
    assert!(matches!(err, TagverError::Config(_)));
    assert!(err.to_string().contains(CONFIG_FILE_NAME), "got: {}", err);
}

#[test]
fn test_default_config_round_trips_through_toml() {
    let rendered = toml::to_string(&Config::default()).unwrap();
    let parsed: Config = toml::from_str(&rendered).unwrap();
    assert_eq!(parsed, Config::default());
}
