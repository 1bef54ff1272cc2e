use crate::test_command::{RunnerKind, RunnerOptions, TestCommand};

/// Discovery directory used when none is configured
pub const DEFAULT_TEST_DIR: &str = "tests";

/// Options understood by unittest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnittestOptions {
    /// Directory searched for tests at run time
    pub test_dir: String,
}

impl Default for UnittestOptions {
    fn default() -> Self {
        UnittestOptions {
            test_dir: DEFAULT_TEST_DIR.to_string(),
        }
    }
}

impl From<&RunnerOptions> for UnittestOptions {
    fn from(options: &RunnerOptions) -> Self {
        UnittestOptions {
            test_dir: options
                .test_dir
                .clone()
                .unwrap_or_else(|| DEFAULT_TEST_DIR.to_string()),
        }
    }
}

/// Returns the unittest `test` command.
///
/// unittest takes no flags; the directory is only used for discovery.
pub fn unittest_command(options: &UnittestOptions) -> TestCommand {
    TestCommand::new(RunnerKind::Unittest, Vec::new(), Some(options.test_dir.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args() {
        let command = unittest_command(&UnittestOptions::default());
        assert!(command.test_suite);
        assert!(command.test_args.is_empty());
        assert_eq!(command.test_dir.as_deref(), Some(DEFAULT_TEST_DIR));
    }
}
