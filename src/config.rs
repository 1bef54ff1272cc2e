use crate::error::{Result, TagverError};
use crate::test_command::{RunnerKind, RunnerOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration file
pub const CONFIG_FILE_NAME: &str = "tagver.toml";

/// Represents the complete configuration for tagver.
///
/// Every section is optional; missing keys take the defaults below.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub version: VersionConfig,

    #[serde(default)]
    pub ci: CiConfig,

    #[serde(default)]
    pub test: TestConfig,
}

/// Package identity used when assembling metadata.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PackageConfig {
    #[serde(default)]
    pub name: Option<String>,

    /// Long description used when the project has no README
    #[serde(default)]
    pub description: String,
}

/// Which implementation answers source-control queries
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Spawn the `git` executable
    #[default]
    Git,
    /// Read the repository in-process with libgit2
    Libgit2,
}

fn default_trunk_branch() -> String {
    "master".to_string()
}

fn default_floor_tag() -> String {
    "0.0.1".to_string()
}

/// Settings for deriving a version from tags.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersionConfig {
    /// Branch that builds without a `+branch` local label
    #[serde(default = "default_trunk_branch")]
    pub trunk_branch: String,

    /// Tag assumed when the repository has none
    #[serde(default = "default_floor_tag")]
    pub floor_tag: String,

    #[serde(default)]
    pub backend: Backend,
}

impl Default for VersionConfig {
    fn default() -> Self {
        VersionConfig {
            trunk_branch: default_trunk_branch(),
            floor_tag: default_floor_tag(),
            backend: Backend::default(),
        }
    }
}

fn default_branch_var() -> String {
    "TRAVIS_BRANCH".to_string()
}

fn default_tag_var() -> String {
    "TRAVIS_TAG".to_string()
}

/// Environment variables a CI service sets for the build under way.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CiConfig {
    #[serde(default = "default_branch_var")]
    pub branch_var: String,

    #[serde(default = "default_tag_var")]
    pub tag_var: String,
}

impl Default for CiConfig {
    fn default() -> Self {
        CiConfig {
            branch_var: default_branch_var(),
            tag_var: default_tag_var(),
        }
    }
}

fn default_python() -> String {
    "python".to_string()
}

/// Test runner selection and its options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TestConfig {
    #[serde(default)]
    pub runner: RunnerKind,

    /// Interpreter used to launch the runner module
    #[serde(default = "default_python")]
    pub python: String,

    #[serde(flatten)]
    pub options: RunnerOptions,
}

impl Default for TestConfig {
    fn default() -> Self {
        TestConfig {
            runner: RunnerKind::default(),
            python: default_python(),
            options: RunnerOptions::default(),
        }
    }
}

/// Finds the configuration file to use, if any.
///
/// Search order:
/// 1. Custom path provided as parameter
/// 2. `tagver.toml` in `project_dir`
/// 3. `.tagver.toml` in the user config directory
pub fn find_config(config_path: Option<&Path>, project_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_path_buf());
    }

    let local = project_dir.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
        .filter(|path| path.exists())
}

/// Loads configuration from file or returns defaults.
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file was found but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, project_dir: &Path) -> Result<Config> {
    let Some(path) = find_config(config_path, project_dir) else {
        tracing::debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let config_str = fs::read_to_string(&path)?;
    toml::from_str(&config_str)
        .map_err(|e| TagverError::config(format!("{}: {}", path.display(), e)))
}

/// Parses configuration from TOML text.
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| TagverError::config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.version.trunk_branch, "master");
        assert_eq!(config.version.floor_tag, "0.0.1");
        assert_eq!(config.version.backend, Backend::Git);
        assert_eq!(config.ci.branch_var, "TRAVIS_BRANCH");
        assert_eq!(config.ci.tag_var, "TRAVIS_TAG");
        assert_eq!(config.test.runner, RunnerKind::Pytest);
        assert_eq!(config.test.python, "python");
        assert_eq!(config.package.name, None);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = parse_config(
            r#"
[version]
trunk_branch = "main"
backend = "libgit2"

[ci]
tag_var = "CI_COMMIT_TAG"
"#,
        )
        .unwrap();

        assert_eq!(config.version.trunk_branch, "main");
        assert_eq!(config.version.floor_tag, "0.0.1");
        assert_eq!(config.version.backend, Backend::Libgit2);
        assert_eq!(config.ci.branch_var, "TRAVIS_BRANCH");
        assert_eq!(config.ci.tag_var, "CI_COMMIT_TAG");
    }

    #[test]
    fn test_test_section_with_runner_options() {
        let config = parse_config(
            r#"
[test]
runner = "nose"
python = "python3"
cover = "mypkg"
detailed = false
"#,
        )
        .unwrap();

        assert_eq!(config.test.runner, RunnerKind::Nose);
        assert_eq!(config.test.python, "python3");
        assert_eq!(config.test.options.cover.as_deref(), Some("mypkg"));
        assert_eq!(config.test.options.detailed, Some(false));
        assert_eq!(config.test.options.verbose, None);
    }

    #[test]
    fn test_invalid_backend_is_config_error() {
        let err = parse_config("[version]\nbackend = \"svn\"\n").unwrap_err();
        assert!(matches!(err, TagverError::Config(_)), "got: {:?}", err);
    }
}
