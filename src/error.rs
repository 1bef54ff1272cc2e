use thiserror::Error;

/// Unified error type for tagver operations
#[derive(Error, Debug)]
pub enum TagverError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Command `{program} {args}` failed ({status}): {stderr}")]
    Command {
        program: String,
        args: String,
        status: String,
        stderr: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in tagver
pub type Result<T> = std::result::Result<T, TagverError>;

impl TagverError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TagverError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        TagverError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        TagverError::Tag(msg.into())
    }

    /// Create a command failure from the program, its arguments and captured output
    pub fn command(
        program: impl Into<String>,
        args: &[&str],
        status: impl ToString,
        stderr: impl AsRef<str>,
    ) -> Self {
        TagverError::Command {
            program: program.into(),
            args: args.join(" "),
            status: status.to_string(),
            stderr: stderr.as_ref().trim().to_string(),
        }
    }
}
