//! PEP 440-style version numbers.
//!
//! Tags are compared by release tuple first, then by pre-release, post-release,
//! dev-release and local segments. A version without a pre-release sorts above
//! any pre-release or dev-release of the same release tuple, so `1.2.4.dev3`
//! is older than `1.2.4`.

use crate::error::{TagverError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?ix)^\s*v?
            (?:(?P<epoch>[0-9]+)!)?
            (?P<release>[0-9]+(?:\.[0-9]+)*)
            (?P<pre>[-_.]?(?P<pre_l>alpha|a|beta|b|preview|pre|c|rc)[-_.]?(?P<pre_n>[0-9]+)?)?
            (?P<post>-(?P<post_n1>[0-9]+)|[-_.]?(?P<post_l>post|rev|r)[-_.]?(?P<post_n2>[0-9]+)?)?
            (?P<dev>[-_.]?dev[-_.]?(?P<dev_n>[0-9]+)?)?
            (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
            \s*$",
        )
        .expect("version pattern is valid")
    })
}

/// Pre-release phase, ordered alpha < beta < release candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreReleaseKind {
    Alpha,
    Beta,
    ReleaseCandidate,
}

impl PreReleaseKind {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "alpha" | "a" => PreReleaseKind::Alpha,
            "beta" | "b" => PreReleaseKind::Beta,
            _ => PreReleaseKind::ReleaseCandidate,
        }
    }
}

impl fmt::Display for PreReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreReleaseKind::Alpha => write!(f, "a"),
            PreReleaseKind::Beta => write!(f, "b"),
            PreReleaseKind::ReleaseCandidate => write!(f, "rc"),
        }
    }
}

/// One dot-separated piece of a local version label.
///
/// Variant order matters: numeric segments sort above alphanumeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocalSegment {
    Text(String),
    Number(u64),
}

impl fmt::Display for LocalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalSegment::Text(s) => write!(f, "{}", s),
            LocalSegment::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Sort key component with sentinels on both ends
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Bound<T> {
    Below,
    At(T),
    Above,
}

/// A parsed version: `[N!]N(.N)*[{a|b|rc}N][.postN][.devN][+local]`
#[derive(Debug, Clone)]
pub struct Version {
    pub epoch: u64,
    pub release: Vec<u64>,
    pub pre: Option<(PreReleaseKind, u64)>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    pub local: Vec<LocalSegment>,
}

impl Version {
    /// Create a release-only version from its components
    pub fn new(release: impl Into<Vec<u64>>) -> Self {
        Version {
            epoch: 0,
            release: release.into(),
            pre: None,
            post: None,
            dev: None,
            local: Vec::new(),
        }
    }

    /// The version every tag is compared against first: 0.0.0
    pub fn floor() -> Self {
        Version::new([0, 0, 0])
    }

    /// Parse a version, accepting an optional leading `v`
    pub fn parse(input: &str) -> Result<Self> {
        let caps = version_regex()
            .captures(input)
            .ok_or_else(|| TagverError::version(format!("Invalid version: '{}'", input)))?;

        let number = |name: &str| -> Result<Option<u64>> {
            caps.name(name)
                .map(|m| {
                    m.as_str().parse::<u64>().map_err(|_| {
                        TagverError::version(format!(
                            "Version component out of range in '{}': {}",
                            input,
                            m.as_str()
                        ))
                    })
                })
                .transpose()
        };

        let release = caps["release"]
            .split('.')
            .map(|part| {
                part.parse::<u64>().map_err(|_| {
                    TagverError::version(format!("Invalid release component: {}", part))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let pre = match caps.name("pre_l") {
            Some(label) => Some((
                PreReleaseKind::from_label(label.as_str()),
                number("pre_n")?.unwrap_or(0),
            )),
            None => None,
        };

        let post = if caps.name("post").is_some() {
            Some(number("post_n1")?.or(number("post_n2")?).unwrap_or(0))
        } else {
            None
        };

        let dev = if caps.name("dev").is_some() {
            Some(number("dev_n")?.unwrap_or(0))
        } else {
            None
        };

        let local = caps
            .name("local")
            .map(|m| {
                m.as_str()
                    .split(['-', '_', '.'])
                    .map(|seg| match seg.parse::<u64>() {
                        Ok(n) => LocalSegment::Number(n),
                        Err(_) => LocalSegment::Text(seg.to_ascii_lowercase()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Version {
            epoch: number("epoch")?.unwrap_or(0),
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    /// Parse a version, treating anything unparsable as [`Version::floor`]
    pub fn parse_or_floor(input: &str) -> Self {
        Version::parse(input).unwrap_or_else(|_| Version::floor())
    }

    /// Whether this is a dev release (`.devN`)
    pub fn is_dev(&self) -> bool {
        self.dev.is_some()
    }

    /// The normalised public form: everything but the local label
    pub fn public(&self) -> String {
        let mut out = String::new();
        if self.epoch != 0 {
            out.push_str(&format!("{}!", self.epoch));
        }
        let release: Vec<String> = self.release.iter().map(|n| n.to_string()).collect();
        out.push_str(&release.join("."));
        if let Some((kind, n)) = self.pre {
            out.push_str(&format!("{}{}", kind, n));
        }
        if let Some(n) = self.post {
            out.push_str(&format!(".post{}", n));
        }
        if let Some(n) = self.dev {
            out.push_str(&format!(".dev{}", n));
        }
        out
    }

    /// The release tuple with its least significant component incremented.
    ///
    /// Pre, post, dev and local parts are dropped: `1.2.3rc1` becomes `1.2.4`.
    /// Fails if the last component is already `u64::MAX`.
    pub fn bump_last(&self) -> Result<Self> {
        let mut release = self.release.clone();
        if let Some(last) = release.last_mut() {
            *last = last.checked_add(1).ok_or_else(|| {
                TagverError::version(format!("cannot increment {}: component overflows", self))
            })?;
        }
        Ok(Version {
            epoch: self.epoch,
            ..Version::new(release)
        })
    }

    fn release_key(&self) -> &[u64] {
        let significant = self
            .release
            .iter()
            .rposition(|&n| n != 0)
            .map_or(0, |i| i + 1);
        &self.release[..significant]
    }

    fn pre_key(&self) -> Bound<(PreReleaseKind, u64)> {
        match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => Bound::Below,
            (None, _, _) => Bound::Above,
            (Some(pre), _, _) => Bound::At(pre),
        }
    }

    fn post_key(&self) -> Bound<u64> {
        self.post.map_or(Bound::Below, Bound::At)
    }

    fn dev_key(&self) -> Bound<u64> {
        self.dev.map_or(Bound::Above, Bound::At)
    }

    fn local_key(&self) -> Bound<&[LocalSegment]> {
        if self.local.is_empty() {
            Bound::Below
        } else {
            Bound::At(self.local.as_slice())
        }
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.release_key().cmp(other.release_key()))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post_key().cmp(&other.post_key()))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
            .then_with(|| self.local_key().cmp(&other.local_key()))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = TagverError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.public())?;
        if !self.local.is_empty() {
            let local: Vec<String> = self.local.iter().map(|s| s.to_string()).collect();
            write!(f, "+{}", local.join("."))?;
        }
        Ok(())
    }
}
