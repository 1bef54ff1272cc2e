use crate::error::{Result, TagverError};
use crate::git::Repository;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Repository backed by the `git` executable
pub struct GitCli {
    program: String,
    workdir: PathBuf,
}

impl GitCli {
    /// Run `git` from `PATH` inside `workdir`
    pub fn new(workdir: impl AsRef<Path>) -> Self {
        GitCli::with_program("git", workdir)
    }

    /// Run a specific git executable inside `workdir`
    pub fn with_program(program: impl Into<String>, workdir: impl AsRef<Path>) -> Self {
        GitCli {
            program: program.into(),
            workdir: workdir.as_ref().to_path_buf(),
        }
    }

    /// Run git with `args`, returning stdout on success
    fn run(&self, args: &[&str]) -> Result<String> {
        tracing::debug!(program = %self.program, ?args, "running git");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            .output()?;

        if !output.status.success() {
            return Err(TagverError::command(
                &self.program,
                args,
                output.status,
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Repository for GitCli {
    fn list_tags(&self) -> Result<Vec<String>> {
        let stdout = self.run(&["tag"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn tag_ref(&self, tag: &str) -> Result<String> {
        let stdout = self.run(&["show-ref", "--tags", tag])?;
        stdout
            .split_whitespace()
            .next()
            .map(str::to_string)
            .ok_or_else(|| TagverError::tag(format!("No ref found for tag '{}'", tag)))
    }

    fn count_commits(&self, since: Option<&str>) -> Result<u64> {
        let range = match since {
            Some(reference) => format!("{}..HEAD", reference),
            None => "HEAD".to_string(),
        };
        let stdout = self.run(&["rev-list", "--no-merges", "--count", &range])?;
        stdout.trim().parse::<u64>().map_err(|_| {
            TagverError::command(
                &self.program,
                &["rev-list", "--no-merges", "--count", &range],
                "unexpected output",
                stdout.trim(),
            )
        })
    }

    fn current_branch(&self) -> Result<String> {
        let stdout = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(stdout.trim().to_string())
    }
}
