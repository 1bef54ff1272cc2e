use crate::domain::version::Version;

/// A git tag together with the version it encodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub version: Version,
}

impl Tag {
    /// Create a tag from its name; names that are not versions order as 0.0.0
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let version = Version::parse_or_floor(&name);
        Tag { name, version }
    }

    /// Pick the tag with the greatest version.
    ///
    /// Ties keep the tag listed first.
    pub fn latest<I, S>(names: I) -> Option<Tag>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(Tag::new)
            .fold(None, |best: Option<Tag>, tag| match best {
                Some(current) if tag.version <= current.version => Some(current),
                _ => Some(tag),
            })
    }
}
