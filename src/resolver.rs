//! Version resolution from git tag history.
//!
//! The version is the newest tag by version order when HEAD is on it.
//! Otherwise the tag's last release component is incremented and `.devN`
//! appended, N being the non-merge commits since the tag. Repositories without
//! tags get the floor tag with N counted over all of history. Builds from a
//! branch other than trunk carry the branch name as a local label.
//!
//! A CI-supplied tag overrides all of this and is treated as a trunk release.

use crate::config::{CiConfig, Config, VersionConfig};
use crate::domain::{BranchContext, Tag};
use crate::error::Result;
use crate::git::{Repository, DETACHED_HEAD};
use crate::warning::Warning;
use std::env;
use std::fmt;

/// Branch and tag supplied by the CI service, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiOverrides {
    pub branch: Option<String>,
    pub tag: Option<String>,
}

impl CiOverrides {
    /// Read overrides from the environment variables named in `ci`.
    ///
    /// Unset and empty variables are both treated as absent.
    pub fn from_env(ci: &CiConfig) -> Self {
        let read = |name: &str| env::var(name).ok().filter(|value| !value.is_empty());
        CiOverrides {
            branch: read(&ci.branch_var),
            tag: read(&ci.tag_var),
        }
    }
}

/// Outcome of version resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Release part of the version, e.g. `1.2.4`
    pub tag: String,
    /// Commit count for dev releases
    pub dev: Option<u64>,
    pub branch: BranchContext,
    /// Fallbacks taken along the way
    pub warnings: Vec<Warning>,
}

impl ResolvedVersion {
    pub fn is_dev(&self) -> bool {
        self.dev.is_some()
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        if let Some(count) = self.dev {
            write!(f, ".dev{}", count)?;
        }
        write!(f, "{}", self.branch.local_suffix())
    }
}

/// Derives a version string from a repository's tags
pub struct VersionResolver<R> {
    repo: R,
    settings: VersionConfig,
}

impl<R: Repository> VersionResolver<R> {
    pub fn new(repo: R, settings: VersionConfig) -> Self {
        VersionResolver { repo, settings }
    }

    /// Resolve the version for HEAD.
    ///
    /// # Returns
    /// * `Ok(ResolvedVersion)` - The version, with any fallbacks recorded as warnings
    /// * `Err` - If git fails after tags were found to exist
    pub fn resolve(&self, ci: &CiOverrides) -> Result<ResolvedVersion> {
        let mut warnings = Vec::new();
        let trunk = self.settings.trunk_branch.as_str();

        if let Some(tag) = &ci.tag {
            tracing::debug!(tag = %tag, "using tag supplied by CI");
            return Ok(ResolvedVersion {
                tag: tag.clone(),
                dev: None,
                branch: BranchContext::trunk(trunk),
                warnings,
            });
        }

        let branch = self.detect_branch(ci, &mut warnings);

        let tags = self.tags();
        let (tag, dev) = match Tag::latest(tags) {
            Some(latest) => {
                let reference = self.repo.tag_ref(&latest.name)?;
                let since = self.repo.count_commits(Some(&reference))?;
                tracing::debug!(
                    tag = %latest.name,
                    reference = %reference,
                    commits = since,
                    "latest tag"
                );

                if since == 0 {
                    (latest.version.public(), None)
                } else {
                    (latest.version.bump_last()?.public(), Some(since))
                }
            }
            None => {
                warnings.push(Warning::NoTags {
                    floor: self.settings.floor_tag.clone(),
                });
                let total = match self.repo.count_commits(None) {
                    Ok(total) => total,
                    Err(e) => {
                        tracing::debug!(error = %e, "could not count commits");
                        warnings.push(Warning::NoCommits);
                        1
                    }
                };
                (self.settings.floor_tag.clone(), Some(total))
            }
        };

        Ok(ResolvedVersion {
            tag,
            dev,
            branch,
            warnings,
        })
    }

    /// All tags, or none when git cannot list them
    fn tags(&self) -> Vec<String> {
        self.repo.list_tags().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "could not list tags");
            Vec::new()
        })
    }

    fn detect_branch(&self, ci: &CiOverrides, warnings: &mut Vec<Warning>) -> BranchContext {
        let trunk = self.settings.trunk_branch.as_str();

        if let Some(branch) = &ci.branch {
            return BranchContext::new(branch.clone(), trunk);
        }

        match self.repo.current_branch() {
            Ok(branch) if branch == DETACHED_HEAD || branch.is_empty() => {
                warnings.push(Warning::DetachedHead {
                    trunk: trunk.to_string(),
                });
                BranchContext::trunk(trunk)
            }
            Ok(branch) => BranchContext::new(branch, trunk),
            Err(e) => {
                tracing::debug!(error = %e, "could not determine branch");
                warnings.push(Warning::BranchUndetermined {
                    trunk: trunk.to_string(),
                });
                BranchContext::trunk(trunk)
            }
        }
    }
}

/// Resolve the version of `repo` using CI overrides from the environment
pub fn git_version<R: Repository>(repo: R, config: &Config) -> Result<ResolvedVersion> {
    let ci = CiOverrides::from_env(&config.ci);
    VersionResolver::new(repo, config.version.clone()).resolve(&ci)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TagverError;
    use crate::git::MockRepository;

    fn resolve(repo: MockRepository) -> ResolvedVersion {
        VersionResolver::new(repo, VersionConfig::default())
            .resolve(&CiOverrides::default())
            .unwrap()
    }

    #[test]
    fn test_exact_tag() {
        let repo = MockRepository::new()
            .with_branch("master")
            .with_tag("1.2.3", "abc")
            .with_commits_since("abc", 0);

        let version = resolve(repo);
        assert_eq!(version.to_string(), "1.2.3");
        assert!(!version.is_dev());
        assert!(version.warnings.is_empty());
    }

    #[test]
    fn test_commits_after_tag() {
        let repo = MockRepository::new()
            .with_branch("master")
            .with_tag("1.2.3", "abc")
            .with_commits_since("abc", 5);

        assert_eq!(resolve(repo).to_string(), "1.2.4.dev5");
    }

    #[test]
    fn test_latest_tag_by_version_order() {
        let repo = MockRepository::new()
            .with_branch("master")
            .with_tag("1.10.0", "new")
            .with_tag("1.9.0", "old")
            .with_commits_since("new", 0)
            .with_commits_since("old", 12);

        assert_eq!(resolve(repo).to_string(), "1.10.0");
    }

    #[test]
    fn test_prefixed_tag_is_normalised() {
        let repo = MockRepository::new()
            .with_branch("master")
            .with_tag("v2.1", "abc")
            .with_commits_since("abc", 0);

        assert_eq!(resolve(repo).to_string(), "2.1");
    }

    #[test]
    fn test_no_tags_counts_all_commits() {
        let repo = MockRepository::new()
            .with_branch("master")
            .with_total_commits(3);

        let version = resolve(repo);
        assert_eq!(version.to_string(), "0.0.1.dev3");
        assert_eq!(
            version.warnings,
            vec![Warning::NoTags {
                floor: "0.0.1".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_repository() {
        let version = resolve(MockRepository::new());
        assert_eq!(version.to_string(), "0.0.1.dev1");
        assert!(version.warnings.contains(&Warning::NoCommits));
        assert!(version.warnings.contains(&Warning::BranchUndetermined {
            trunk: "master".to_string()
        }));
    }

    #[test]
    fn test_tag_listing_failure_means_no_tags() {
        let repo = MockRepository::new()
            .with_branch("master")
            .with_tag("1.0.0", "abc")
            .with_failing_tag_listing()
            .with_total_commits(7);

        assert_eq!(resolve(repo).to_string(), "0.0.1.dev7");
    }

    #[test]
    fn test_feature_branch_suffix() {
        let repo = MockRepository::new()
            .with_branch("feature-x")
            .with_tag("1.2.3", "abc")
            .with_commits_since("abc", 2);

        let version = resolve(repo);
        assert_eq!(version.to_string(), "1.2.4.dev2+feature-x");
        assert!(!version.branch.is_trunk);
    }

    #[test]
    fn test_detached_head_assumes_trunk() {
        let repo = MockRepository::new()
            .with_branch(DETACHED_HEAD)
            .with_tag("1.0", "abc")
            .with_commits_since("abc", 1);

        let version = resolve(repo);
        assert_eq!(version.to_string(), "1.1.dev1");
        assert_eq!(
            version.warnings,
            vec![Warning::DetachedHead {
                trunk: "master".to_string()
            }]
        );
    }

    #[test]
    fn test_ci_branch_overrides_git() {
        let repo = MockRepository::new()
            .with_branch("master")
            .with_tag("1.0.0", "abc")
            .with_commits_since("abc", 0);
        let ci = CiOverrides {
            branch: Some("pr-42".to_string()),
            tag: None,
        };

        let version = VersionResolver::new(repo, VersionConfig::default())
            .resolve(&ci)
            .unwrap();
        assert_eq!(version.to_string(), "1.0.0+pr-42");
    }

    #[test]
    fn test_ci_tag_is_verbatim_release() {
        let repo = MockRepository::new()
            .with_branch("feature-x")
            .with_tag("9.9.9", "abc")
            .with_commits_since("abc", 40);
        let ci = CiOverrides {
            branch: Some("feature-x".to_string()),
            tag: Some("2.0.0".to_string()),
        };

        let version = VersionResolver::new(repo, VersionConfig::default())
            .resolve(&ci)
            .unwrap();
        assert_eq!(version.to_string(), "2.0.0");
        assert!(version.branch.is_trunk);
    }

    #[test]
    fn test_missing_tag_ref_is_fatal() {
        let repo = MockRepository::new()
            .with_branch("master")
            .with_tag("1.0.0", "abc");

        let result = VersionResolver::new(repo, VersionConfig::default())
            .resolve(&CiOverrides::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_trunk_and_floor() {
        let settings = VersionConfig {
            trunk_branch: "main".to_string(),
            floor_tag: "0.1.0".to_string(),
            ..Default::default()
        };
        let repo = MockRepository::new()
            .with_branch("main")
            .with_total_commits(4);

        let version = VersionResolver::new(repo, settings)
            .resolve(&CiOverrides::default())
            .unwrap();
        assert_eq!(version.to_string(), "0.1.0.dev4");
    }

    #[test]
    fn test_unbumpable_tag_is_error() {
        let repo = MockRepository::new()
            .with_branch("master")
            .with_tag("1.18446744073709551615", "abc")
            .with_commits_since("abc", 1);

        let result = VersionResolver::new(repo, VersionConfig::default())
            .resolve(&CiOverrides::default());
        assert!(matches!(result, Err(TagverError::Version(_))));
    }
}
