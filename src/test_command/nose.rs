use crate::test_command::{RunnerKind, RunnerOptions, TestCommand};

/// Options understood by nose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoseOptions {
    pub verbose: bool,
    /// Print extra detail on failure (`-d`)
    pub detailed: bool,
    pub cover: Option<String>,
}

impl Default for NoseOptions {
    fn default() -> Self {
        NoseOptions {
            verbose: true,
            detailed: true,
            cover: None,
        }
    }
}

impl From<&RunnerOptions> for NoseOptions {
    fn from(options: &RunnerOptions) -> Self {
        let defaults = NoseOptions::default();
        NoseOptions {
            verbose: options.verbose.unwrap_or(defaults.verbose),
            detailed: options.detailed.unwrap_or(defaults.detailed),
            cover: options.cover.clone(),
        }
    }
}

impl NoseOptions {
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.verbose {
            args.push("-v".to_string());
        }
        if self.detailed {
            args.push("-d".to_string());
        }
        if let Some(cover) = &self.cover {
            args.extend([
                "--with-coverage".to_string(),
                "--cov-report".to_string(),
                "term-missing".to_string(),
                "--cov".to_string(),
                cover.clone(),
            ]);
        }
        args
    }
}

/// Returns the nose `test` command
pub fn nose_command(options: &NoseOptions) -> TestCommand {
    TestCommand::new(RunnerKind::Nose, options.args(), None)
}
