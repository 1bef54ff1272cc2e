//! Test command factory
//!
//! Builds the `test` command a packaging tool registers for its build
//! lifecycle. Each supported runner turns its recognised options into an
//! ordered argument list; running the command launches the runner as a Python
//! module and reports the runner's exit code.

pub mod nose;
pub mod pytest;
pub mod unittest;

pub use nose::{nose_command, NoseOptions};
pub use pytest::{pytest_command, PytestOptions};
pub use unittest::{unittest_command, UnittestOptions};

use crate::error::{Result, TagverError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::process::Command;

/// Key the test command is registered under
pub const TEST_COMMAND: &str = "test";

/// Commands to register with the packaging tool, keyed by command name
pub type CommandMap = HashMap<String, TestCommand>;

/// Supported test runners
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RunnerKind {
    #[default]
    Pytest,
    Nose,
    Unittest,
}

impl RunnerKind {
    /// Pick a runner from flags; nose wins over unittest, pytest is the default
    pub fn select(nose: bool, unittest: bool) -> Self {
        if nose {
            RunnerKind::Nose
        } else if unittest {
            RunnerKind::Unittest
        } else {
            RunnerKind::Pytest
        }
    }

    /// Python module that implements the runner
    pub fn module(&self) -> &'static str {
        match self {
            RunnerKind::Pytest => "pytest",
            RunnerKind::Nose => "nose",
            RunnerKind::Unittest => "unittest",
        }
    }

    /// Options this runner accepts
    pub fn recognised_options(&self) -> &'static [&'static str] {
        match self {
            RunnerKind::Pytest => &[
                "verbose",
                "exit_first",
                "pdb",
                "extra_fails",
                "cover",
                "test_dir",
            ],
            RunnerKind::Nose => &["verbose", "detailed", "cover"],
            RunnerKind::Unittest => &["test_dir"],
        }
    }
}

impl fmt::Display for RunnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.module())
    }
}

/// Runner options as supplied by the user; unset options take the runner's default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_first: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdb: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_fails: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_dir: Option<String>,
}

impl RunnerOptions {
    /// Names of the options that were explicitly set
    pub fn provided(&self) -> Vec<&'static str> {
        [
            ("verbose", self.verbose.is_some()),
            ("exit_first", self.exit_first.is_some()),
            ("pdb", self.pdb.is_some()),
            ("extra_fails", self.extra_fails.is_some()),
            ("detailed", self.detailed.is_some()),
            ("cover", self.cover.is_some()),
            ("test_dir", self.test_dir.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    /// Overlay `other` on top of these options
    pub fn merge(&self, other: &RunnerOptions) -> RunnerOptions {
        RunnerOptions {
            verbose: other.verbose.or(self.verbose),
            exit_first: other.exit_first.or(self.exit_first),
            pdb: other.pdb.or(self.pdb),
            extra_fails: other.extra_fails.or(self.extra_fails),
            detailed: other.detailed.or(self.detailed),
            cover: other.cover.clone().or_else(|| self.cover.clone()),
            test_dir: other.test_dir.clone().or_else(|| self.test_dir.clone()),
        }
    }

    /// Only the options `kind` understands; the rest are unset
    pub fn retain_recognised(&self, kind: RunnerKind) -> RunnerOptions {
        let keep = |name: &str| kind.recognised_options().contains(&name);
        RunnerOptions {
            verbose: self.verbose.filter(|_| keep("verbose")),
            exit_first: self.exit_first.filter(|_| keep("exit_first")),
            pdb: self.pdb.filter(|_| keep("pdb")),
            extra_fails: self.extra_fails.filter(|_| keep("extra_fails")),
            detailed: self.detailed.filter(|_| keep("detailed")),
            cover: self.cover.clone().filter(|_| keep("cover")),
            test_dir: self.test_dir.clone().filter(|_| keep("test_dir")),
        }
    }

    /// Fail if any option is set that `kind` does not understand
    pub fn check_recognised(&self, kind: RunnerKind) -> Result<()> {
        let recognised = kind.recognised_options();
        let unknown: Vec<&str> = self
            .provided()
            .into_iter()
            .filter(|name| !recognised.contains(name))
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(TagverError::config(format!(
                "{} runner does not recognise option(s): {}",
                kind,
                unknown.join(", ")
            )))
        }
    }
}

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// The `test` command: which runner to launch and with what arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCommand {
    pub runner: RunnerKind,
    pub test_args: Vec<String>,
    /// Discovery directory, for runners that take it at run time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_dir: Option<String>,
    pub test_suite: bool,
}

impl TestCommand {
    fn new(runner: RunnerKind, test_args: Vec<String>, test_dir: Option<String>) -> Self {
        TestCommand {
            runner,
            test_args,
            test_dir,
            test_suite: true,
        }
    }

    /// The process to launch, relative paths resolved against `workdir`.
    ///
    /// The unittest discovery directory is made absolute, since the runner
    /// itself is started inside `workdir`.
    pub fn invocation(&self, python: &str, workdir: &Path) -> Invocation {
        let mut args = vec!["-m".to_string(), self.runner.module().to_string()];

        match self.runner {
            RunnerKind::Unittest => {
                let dir = self.test_dir.as_deref().unwrap_or(unittest::DEFAULT_TEST_DIR);
                args.push("discover".to_string());
                args.push("-s".to_string());
                let discovery = workdir.join(dir);
                let discovery = std::path::absolute(&discovery).unwrap_or(discovery);
                args.push(discovery.display().to_string());
            }
            RunnerKind::Pytest | RunnerKind::Nose => args.extend(self.test_args.iter().cloned()),
        }

        Invocation {
            program: python.to_string(),
            args,
        }
    }

    /// Launch the runner and return its exit code.
    ///
    /// A runner killed by a signal reports 1.
    pub fn run(&self, python: &str, workdir: &Path) -> Result<i32> {
        let invocation = self.invocation(python, workdir);
        tracing::debug!(command = %invocation, "running tests");

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(workdir)
            .status()?;

        Ok(status.code().unwrap_or(1))
    }
}

/// Builds the command map for the selected runner.
///
/// # Arguments
/// * `runner` - Which runner to use (see [RunnerKind::select])
/// * `options` - Options for that runner; unset ones take the runner's defaults
///
/// # Returns
/// * `Ok(CommandMap)` - `{"test": TestCommand}`
/// * `Err` - If an option is set that the runner does not recognise
pub fn test_command(runner: RunnerKind, options: &RunnerOptions) -> Result<CommandMap> {
    options.check_recognised(runner)?;

    let command = match runner {
        RunnerKind::Pytest => pytest_command(&PytestOptions::from(options)),
        RunnerKind::Nose => nose_command(&NoseOptions::from(options)),
        RunnerKind::Unittest => unittest_command(&UnittestOptions::from(options)),
    };

    tracing::debug!(runner = %runner, args = ?command.test_args, "built test command");

    let mut commands = CommandMap::new();
    commands.insert(TEST_COMMAND.to_string(), command);
    Ok(commands)
}
