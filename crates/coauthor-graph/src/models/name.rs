//! Person name normalization.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{GraphError, GraphResult};

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// "Last, First Middle" where every token is letters and hyphens.
static LAST_NAME_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\p{L}-]*(?: [\p{L}-]+)*)\s*,\s*([\p{L}-]*(?: [\p{L}-]+)*)$")
        .expect("valid last-name-first pattern")
});

/// A person name split into first, middle and last parts.
///
/// The canonical form is always "First Middle Last", whatever order the
/// input used, with whitespace collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonName {
    first: String,
    middle: String,
    last: String,
    full: String,
}

impl PersonName {
    /// Parse a free-text name.
    ///
    /// A single token is taken as a last name. Fails if the input is blank
    /// or nothing usable remains after parsing.
    pub fn parse(raw: &str) -> GraphResult<Self> {
        let cleaned = collapse(raw);
        if cleaned.is_empty() {
            return Err(GraphError::invalid_input("name", "name is blank"));
        }

        let (last, rest) = if let Some(caps) = LAST_NAME_FIRST.captures(&cleaned) {
            (caps[1].trim().to_string(), caps[2].trim().to_string())
        } else {
            match cleaned.rsplit_once(' ') {
                Some((rest, last)) => (last.to_string(), rest.to_string()),
                None => (cleaned.clone(), String::new()),
            }
        };

        let (first, middle) = match rest.split_once(' ') {
            Some((first, middle)) => (first.to_string(), middle.to_string()),
            None => (rest, String::new()),
        };

        let full = collapse(&format!("{first} {middle} {last}"));
        if full.is_empty() {
            return Err(GraphError::invalid_input("name", format!("no name parts in '{cleaned}'")));
        }

        Ok(Self { first, middle, last, full })
    }

    /// First name (may be empty).
    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Middle names joined by single spaces (may be empty).
    #[must_use]
    pub fn middle(&self) -> &str {
        &self.middle
    }

    /// Last name.
    #[must_use]
    pub fn last(&self) -> &str {
        &self.last
    }

    /// Canonical "First Middle Last" form, the primary identity key.
    #[must_use]
    pub fn full(&self) -> &str {
        &self.full
    }

    /// "First Last" form, used only as a secondary lookup key.
    #[must_use]
    pub fn short(&self) -> String {
        collapse(&format!("{} {}", self.first, self.last))
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

/// Canonicalize a free-text name into its "First Middle Last" key.
pub fn normalize(raw: &str) -> GraphResult<String> {
    PersonName::parse(raw).map(|name| name.full)
}

/// Trim and collapse every whitespace run to a single space.
#[must_use]
pub fn collapse(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}
