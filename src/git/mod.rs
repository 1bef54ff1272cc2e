//! Git operations abstraction layer
//!
//! The version resolver only needs four answers from source control, so they
//! sit behind the [Repository] trait. Implementations:
//!
//! - [cli::GitCli]: spawns the `git` executable
//! - [repository::Git2Repository]: reads the repository through `git2`
//! - [mock::MockRepository]: in-memory fake for tests
//!
//! ```rust
//! # use tagver::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> tagver::Result<()> {
//! for tag in repo.list_tags()? {
//!     let reference = repo.tag_ref(&tag)?;
//!     let since = repo.count_commits(Some(reference.as_str()))?;
//!     println!("{}: {} commits since", tag, since);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod mock;
pub mod repository;

pub use cli::GitCli;
pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Branch name git reports for a detached HEAD
pub const DETACHED_HEAD: &str = "HEAD";

/// Source-control queries needed to derive a version
///
/// Every method maps onto one git invocation, noted below, and must fail
/// rather than guess when git cannot answer.
pub trait Repository {
    /// All tag names, in the order git lists them (`git tag`)
    fn list_tags(&self) -> Result<Vec<String>>;

    /// The object a tag points at (`git show-ref --tags <tag>`, first field)
    ///
    /// For annotated tags this is the tag object, which git peels when it is
    /// used as a revision.
    fn tag_ref(&self, tag: &str) -> Result<String>;

    /// Non-merge commits reachable from HEAD, excluding those reachable from
    /// `since` when given (`git rev-list --no-merges --count [<since>..]HEAD`)
    fn count_commits(&self, since: Option<&str>) -> Result<u64>;

    /// Abbreviated name of HEAD (`git rev-parse --abbrev-ref HEAD`)
    ///
    /// Returns [DETACHED_HEAD] when HEAD is not on a branch.
    fn current_branch(&self) -> Result<String>;
}

impl<R: Repository + ?Sized> Repository for &R {
    fn list_tags(&self) -> Result<Vec<String>> {
        (**self).list_tags()
    }

    fn tag_ref(&self, tag: &str) -> Result<String> {
        (**self).tag_ref(tag)
    }

    fn count_commits(&self, since: Option<&str>) -> Result<u64> {
        (**self).count_commits(since)
    }

    fn current_branch(&self) -> Result<String> {
        (**self).current_branch()
    }
}

impl<R: Repository + ?Sized> Repository for Box<R> {
    fn list_tags(&self) -> Result<Vec<String>> {
        (**self).list_tags()
    }

    fn tag_ref(&self, tag: &str) -> Result<String> {
        (**self).tag_ref(tag)
    }

    fn count_commits(&self, since: Option<&str>) -> Result<u64> {
        (**self).count_commits(since)
    }

    fn current_branch(&self) -> Result<String> {
        (**self).current_branch()
    }
}
