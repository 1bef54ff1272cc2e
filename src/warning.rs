use std::fmt;

/// Non-fatal conditions met while deriving a version or description.
/// Each one has a documented fallback and is reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Git could not report the active branch; trunk is assumed
    BranchUndetermined { trunk: String },
    /// HEAD is detached; trunk is assumed
    DetachedHead { trunk: String },
    /// The repository has no tags; the floor tag is used
    NoTags { floor: String },
    /// Commits could not be counted; this is assumed to be the first dev release
    NoCommits,
    /// No README.md / README.rst; the supplied fallback text is used
    MissingReadme,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::BranchUndetermined { trunk } => {
                write!(f, "could not determine active git branch, assuming {}", trunk)
            }
            Warning::DetachedHead { trunk } => {
                write!(f, "HEAD is detached, assuming {} branch", trunk)
            }
            Warning::NoTags { floor } => {
                write!(
                    f,
                    "git tag version requested but no tags found, using {}",
                    floor
                )
            }
            Warning::NoCommits => {
                write!(f, "no commits found, assuming first dev release")
            }
            Warning::MissingReadme => {
                write!(f, "missing readme, falling back to supplied description")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = Warning::DetachedHead {
            trunk: "master".to_string(),
        };
        assert_eq!(warning.to_string(), "HEAD is detached, assuming master branch");

        let warning = Warning::NoTags {
            floor: "0.0.1".to_string(),
        };
        assert!(warning.to_string().contains("no tags found"));
        assert!(warning.to_string().ends_with("0.0.1"));
    }

    #[test]
    fn test_missing_readme_display() {
        assert_eq!(
            Warning::MissingReadme.to_string(),
            "missing readme, falling back to supplied description"
        );
    }
}
