pub mod config;
pub mod description;
pub mod domain;
pub mod error;
pub mod git;
pub mod metadata;
pub mod resolver;
pub mod test_command;
pub mod ui;
pub mod warning;

pub use description::{find_version, long_description};
pub use error::{Result, TagverError};
pub use resolver::{git_version, CiOverrides, ResolvedVersion, VersionResolver};
pub use test_command::{test_command, CommandMap, RunnerKind, RunnerOptions, TestCommand};
