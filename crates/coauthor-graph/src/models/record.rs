//! Parsed bibliographic records, before they are linked into the graph.

use serde::{Deserialize, Serialize};

/// One publication as read from a fetched document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubmedRecord {
    /// External record id (PMID).
    pub id: String,

    /// Article title.
    pub title: String,

    /// Abstract text, empty when the record carries none.
    #[serde(default)]
    pub r#abstract: String,

    /// Listed authors in document order.
    #[serde(default)]
    pub authors: Vec<RecordAuthor>,
}

/// An author entry from a record's author list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAuthor {
    /// Given names (may be empty).
    #[serde(default)]
    pub fore_name: String,

    /// Family name, or the collective name for group authors (may be empty).
    #[serde(default)]
    pub last_name: String,

    /// First affiliation listed for this author on this record.
    #[serde(default)]
    pub affiliation: Option<String>,
}

impl RecordAuthor {
    /// Create an author entry without affiliation.
    #[must_use]
    pub fn new(fore_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self { fore_name: fore_name.into(), last_name: last_name.into(), affiliation: None }
    }

    /// Attach an affiliation.
    #[must_use]
    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = Some(affiliation.into());
        self
    }

    /// Raw name passed to identity resolution: "ForeName LastName".
    ///
    /// Missing parts yield a degraded name rather than an error.
    #[must_use]
    pub fn raw_name(&self) -> String {
        format!("{} {}", self.fore_name, self.last_name)
    }
}

impl PubmedRecord {
    /// Check whether an abstract is present.
    #[must_use]
    pub fn has_abstract(&self) -> bool {
        !self.r#abstract.is_empty()
    }
}
