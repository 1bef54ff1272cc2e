use crate::error::{Result, TagverError};
use crate::git::{Repository, DETACHED_HEAD};
use git2::{Oid, Repository as Git2Repo};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn peel_to_commit(&self, spec: &str) -> Result<Oid> {
        let object = self
            .repo
            .revparse_single(spec)
            .map_err(|e| TagverError::tag(format!("Cannot resolve '{}': {}", spec, e)))?;
        Ok(object.peel_to_commit()?.id())
    }
}

impl Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn tag_ref(&self, tag: &str) -> Result<String> {
        let reference_name = format!("refs/tags/{}", tag);

        let reference = self
            .repo
            .find_reference(&reference_name)
            .map_err(|e| TagverError::tag(format!("Cannot find tag '{}': {}", tag, e)))?;

        let oid = reference
            .target()
            .ok_or_else(|| TagverError::tag(format!("Tag '{}' has no target", tag)))?;

        Ok(oid.to_string())
    }

    fn count_commits(&self, since: Option<&str>) -> Result<u64> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;

        if let Some(spec) = since {
            revwalk.hide(self.peel_to_commit(spec)?)?;
        }

        let mut count = 0;
        for oid_result in revwalk {
            let commit = self.repo.find_commit(oid_result?)?;
            if commit.parent_count() <= 1 {
                count += 1;
            }
        }

        Ok(count)
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;

        if !head.is_branch() {
            return Ok(DETACHED_HEAD.to_string());
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| TagverError::tag("HEAD branch name is not valid UTF-8"))
    }
}
