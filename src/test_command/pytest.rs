use crate::test_command::{RunnerKind, RunnerOptions, TestCommand};

/// Options understood by pytest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PytestOptions {
    /// Print verbose test output (`-v`)
    pub verbose: bool,
    /// Stop on the first failure (`-x`)
    pub exit_first: bool,
    /// Drop into pdb on failure (`--pdb`)
    pub pdb: bool,
    /// Report details of expected failures (`-rx`)
    pub extra_fails: bool,
    /// Module to report coverage for
    pub cover: Option<String>,
    /// Path handed to pytest for discovery
    pub test_dir: Option<String>,
}

impl Default for PytestOptions {
    fn default() -> Self {
        PytestOptions {
            verbose: true,
            exit_first: true,
            pdb: false,
            extra_fails: true,
            cover: None,
            test_dir: None,
        }
    }
}

impl From<&RunnerOptions> for PytestOptions {
    fn from(options: &RunnerOptions) -> Self {
        let defaults = PytestOptions::default();
        PytestOptions {
            verbose: options.verbose.unwrap_or(defaults.verbose),
            exit_first: options.exit_first.unwrap_or(defaults.exit_first),
            pdb: options.pdb.unwrap_or(defaults.pdb),
            extra_fails: options.extra_fails.unwrap_or(defaults.extra_fails),
            cover: options.cover.clone(),
            test_dir: options.test_dir.clone(),
        }
    }
}

impl PytestOptions {
    /// Command-line arguments, in the order pytest receives them
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.verbose {
            args.push("-v".to_string());
        }
        if self.exit_first {
            args.push("-x".to_string());
        }
        if self.pdb {
            args.push("--pdb".to_string());
        }
        if self.extra_fails {
            args.push("-rx".to_string());
        }
        if let Some(cover) = &self.cover {
            args.extend([
                "--cov".to_string(),
                cover.clone(),
                "--cov-report".to_string(),
                "term-missing".to_string(),
            ]);
        }
        if let Some(test_dir) = &self.test_dir {
            args.push(test_dir.clone());
        }
        args
    }
}

/// Returns the pytest `test` command
pub fn pytest_command(options: &PytestOptions) -> TestCommand {
    TestCommand::new(RunnerKind::Pytest, options.args(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let command = pytest_command(&PytestOptions::default());
        assert!(command.test_suite);
        assert_eq!(command.test_args, vec!["-v", "-x", "-rx"]);
    }

    #[test]
    fn test_all_options() {
        let command = pytest_command(&PytestOptions {
            pdb: true,
            cover: Some("foo".to_string()),
            test_dir: Some("bar".to_string()),
            ..Default::default()
        });
        assert_eq!(
            command.test_args,
            vec!["-v", "-x", "--pdb", "-rx", "--cov", "foo", "--cov-report", "term-missing", "bar"]
        );
    }

    #[test]
    fn test_everything_off() {
        let options = RunnerOptions {
            verbose: Some(false),
            exit_first: Some(false),
            extra_fails: Some(false),
            ..Default::default()
        };
        let command = pytest_command(&PytestOptions::from(&options));
        assert!(command.test_args.is_empty());
        assert_eq!(command.test_dir, None);
    }
}
