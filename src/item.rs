//! Identifiers shared by every kind of record

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};


/// The stable identifier of a row (task or meeting)
///
/// It is opaque: this crate generates random UUIDs, but any non-empty string read from a document is accepted as is.
/// An empty `RecordId` means "no ID yet", which happens for rows saved before identifiers were introduced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId {
    content: String,
}

impl RecordId {
    /// Generate a random RecordId.
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    /// The "no ID yet" value
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for RecordId {
    fn from(content: String) -> Self {
        Self { content: content.trim().to_string() }
    }
}
impl From<&str> for RecordId {
    fn from(content: &str) -> Self {
        Self::from(content.to_string())
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}



/// A VersionTag identifies a version of a remote file (e.g. a git blob `sha`). Whenever it changes, this means the data has changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTag {
    tag: String
}

impl From<String> for VersionTag {
    fn from(tag: String) -> VersionTag {
        Self { tag }
    }
}

impl VersionTag {
    /// Get the inner version tag (usually a git blob `sha`)
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// Generate a random VersionTag
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_hyphenated().to_string();
        Self { tag: random }
    }
}

impl Display for VersionTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.tag)
    }
}
