use crate::error::{Result, TagverError};
use crate::git::Repository;
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
///
/// Unset answers behave like git failing: an unset branch or total commit
/// count returns an error, as they would in an empty repository.
#[derive(Debug, Clone, Default)]
pub struct MockRepository {
    tags: Vec<(String, String)>,
    commits_since: HashMap<String, u64>,
    total_commits: Option<u64>,
    branch: Option<String>,
    tag_listing_fails: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag pointing at `reference`
    pub fn with_tag(mut self, name: impl Into<String>, reference: impl Into<String>) -> Self {
        self.tags.push((name.into(), reference.into()));
        self
    }

    /// Set the non-merge commit count between `reference` and HEAD
    pub fn with_commits_since(mut self, reference: impl Into<String>, count: u64) -> Self {
        self.commits_since.insert(reference.into(), count);
        self
    }

    /// Set the number of non-merge commits reachable from HEAD
    pub fn with_total_commits(mut self, count: u64) -> Self {
        self.total_commits = Some(count);
        self
    }

    /// Set the branch HEAD points at
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Make `list_tags` fail
    pub fn with_failing_tag_listing(mut self) -> Self {
        self.tag_listing_fails = true;
        self
    }

    fn failure(args: &[&str], stderr: &str) -> TagverError {
        TagverError::command("git", args, "exit status: 128", stderr)
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<String>> {
        if self.tag_listing_fails {
            return Err(Self::failure(&["tag"], "fatal: not a git repository"));
        }
        Ok(self.tags.iter().map(|(name, _)| name.clone()).collect())
    }

    fn tag_ref(&self, tag: &str) -> Result<String> {
        self.tags
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, reference)| reference.clone())
            .ok_or_else(|| Self::failure(&["show-ref", "--tags", tag], ""))
    }

    fn count_commits(&self, since: Option<&str>) -> Result<u64> {
        match since {
            Some(reference) => self.commits_since.get(reference).copied().ok_or_else(|| {
                Self::failure(
                    &["rev-list", "--no-merges", "--count", reference],
                    "fatal: bad revision",
                )
            }),
            None => self.total_commits.ok_or_else(|| {
                Self::failure(
                    &["rev-list", "--no-merges", "--count", "HEAD"],
                    "fatal: ambiguous argument 'HEAD'",
                )
            }),
        }
    }

    fn current_branch(&self) -> Result<String> {
        self.branch.clone().ok_or_else(|| {
            Self::failure(
                &["rev-parse", "--abbrev-ref", "HEAD"],
                "fatal: ambiguous argument 'HEAD'",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_tags() {
        let repo = MockRepository::new()
            .with_tag("1.0.0", "aaa")
            .with_tag("2.0.0", "bbb");

        assert_eq!(repo.list_tags().unwrap(), vec!["1.0.0", "2.0.0"]);
        assert_eq!(repo.tag_ref("2.0.0").unwrap(), "bbb");
        assert!(repo.tag_ref("3.0.0").is_err());
    }

    #[test]
    fn test_mock_repository_counts() {
        let repo = MockRepository::new()
            .with_commits_since("aaa", 4)
            .with_total_commits(9);

        assert_eq!(repo.count_commits(Some("aaa")).unwrap(), 4);
        assert_eq!(repo.count_commits(None).unwrap(), 9);
        assert!(repo.count_commits(Some("zzz")).is_err());
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.list_tags().unwrap().is_empty());
        assert!(repo.current_branch().is_err());
        assert!(repo.count_commits(None).is_err());
    }

    #[test]
    fn test_mock_repository_failing_listing() {
        let repo = MockRepository::new()
            .with_tag("1.0.0", "aaa")
            .with_failing_tag_listing();
        assert!(repo.list_tags().is_err());
    }
}
