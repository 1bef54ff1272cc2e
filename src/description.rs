//! Long description and `__version__` lookups for packaging metadata.

use crate::error::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Version reported when a file assigns no `__version__`
pub const UNKNOWN_VERSION: &str = "0.0.0";

const README_EXTENSIONS: [&str; 2] = ["md", "rst"];

/// Where a long description came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionSource {
    Readme(PathBuf),
    Fallback,
}

/// A package's long description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub text: String,
    pub source: DescriptionSource,
}

/// Reads a file as UTF-8 and returns the trimmed contents.
pub fn read_trimmed(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?.trim().to_string())
}

fn is_readme(path: &Path) -> bool {
    let stem_matches = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.eq_ignore_ascii_case("readme"));
    let extension_matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| README_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)));
    stem_matches && extension_matches
}

/// Finds `README.md` or `README.rst` in `dir`, ignoring case.
///
/// When several match, the first by file name wins.
pub fn find_readme(dir: &Path) -> Result<Option<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_readme(&path) {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates.into_iter().next())
}

/// Returns the README in `dir`, or `fallback` when there is none.
///
/// # Arguments
/// * `dir` - Directory to search, normally the project root
/// * `fallback` - Text to use without a README, supplied by the caller
pub fn long_description(dir: &Path, fallback: &str) -> Result<Description> {
    match find_readme(dir)? {
        Some(path) => {
            tracing::debug!(path = %path.display(), "reading long description");
            Ok(Description {
                text: read_trimmed(&path)?,
                source: DescriptionSource::Readme(path),
            })
        }
        None => Ok(Description {
            text: fallback.to_string(),
            source: DescriptionSource::Fallback,
        }),
    }
}

fn version_assignment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^__version__ = ['"]([^'"]*)['"]"#)
            .expect("version assignment pattern is valid")
    })
}

/// Pulls the value assigned to `__version__` out of a source file.
///
/// # Returns
/// * `Ok(version)` - The first assigned value, or `0.0.0` without an assignment
/// * `Err` - If the file cannot be read
pub fn find_version(path: &Path) -> Result<String> {
    let contents = read_trimmed(path)?;
    Ok(version_assignment()
        .captures(&contents)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| UNKNOWN_VERSION.to_string(), |m| m.as_str().to_string()))
}
