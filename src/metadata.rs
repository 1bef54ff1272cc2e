use crate::config::Config;
use crate::description::{long_description, DescriptionSource};
use crate::error::{Result, TagverError};
use crate::git::Repository;
use crate::resolver::{CiOverrides, VersionResolver};
use crate::test_command::{test_command, RunnerOptions, TestCommand, TEST_COMMAND};
use crate::warning::Warning;
use serde::Serialize;
use std::path::Path;

/// Everything a packaging tool needs from tagver, in one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub version: String,
    pub long_description: String,
    pub test: TestCommand,
}

impl PackageMetadata {
    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| TagverError::config(e.to_string()))
    }
}

/// Gathers version, description and test command for the project in `dir`.
///
/// Configured runner options the runner does not understand are skipped;
/// `overrides` must all be recognised.
///
/// Returns the metadata along with every fallback taken to produce it.
pub fn collect<R: Repository>(
    repo: R,
    dir: &Path,
    config: &Config,
    ci: &CiOverrides,
    overrides: &RunnerOptions,
) -> Result<(PackageMetadata, Vec<Warning>)> {
    let resolved = VersionResolver::new(repo, config.version.clone()).resolve(ci)?;
    let mut warnings = resolved.warnings.clone();

    let description = long_description(dir, &config.package.description)?;
    if description.source == DescriptionSource::Fallback {
        warnings.push(Warning::MissingReadme);
    }

    let options = config
        .test
        .options
        .retain_recognised(config.test.runner)
        .merge(overrides);
    let mut commands = test_command(config.test.runner, &options)?;
    let test = commands
        .remove(TEST_COMMAND)
        .ok_or_else(|| TagverError::config("no test command was built"))?;

    let metadata = PackageMetadata {
        name: config.package.name.clone(),
        version: resolved.to_string(),
        long_description: description.text,
        test,
    };

    Ok((metadata, warnings))
}
