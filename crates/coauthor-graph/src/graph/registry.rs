//! Author identity registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{Author, AuthorId};
use crate::error::GraphResult;
use crate::models::PersonName;

/// Strategy for matching a name that is not known under its full canonical key.
///
/// The registry always stores authors under their full "First Middle Last"
/// key and always tries that key first. A resolver only decides which
/// secondary keys are probed after that.
pub trait IdentityResolver: fmt::Debug + Send + Sync {
    /// Strategy name for logs.
    fn name(&self) -> &'static str;

    /// Secondary keys to probe, in order, when the full key is unknown.
    fn fallback_keys(&self, name: &PersonName) -> Vec<String>;
}

/// Merges names that share "First Last", e.g. "John A Smith" into an
/// existing "John Smith".
///
/// Distinct people with the same first and last name are merged too.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortNameFallback;

impl IdentityResolver for ShortNameFallback {
    fn name(&self) -> &'static str {
        "short-name"
    }

    fn fallback_keys(&self, name: &PersonName) -> Vec<String> {
        let short = name.short();
        if short == name.full() { Vec::new() } else { vec![short] }
    }
}

/// Only identical full canonical names are the same person.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactName;

impl IdentityResolver for ExactName {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn fallback_keys(&self, _name: &PersonName) -> Vec<String> {
        Vec::new()
    }
}

/// Identity strategy selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum IdentityStrategy {
    /// Fall back to the "First Last" key.
    #[default]
    ShortName,
    /// Exact canonical names only.
    Exact,
}

impl IdentityStrategy {
    /// Build the resolver for this strategy.
    #[must_use]
    pub fn resolver(self) -> Arc<dyn IdentityResolver> {
        match self {
            Self::ShortName => Arc::new(ShortNameFallback),
            Self::Exact => Arc::new(ExactName),
        }
    }
}

/// Owns every [`Author`] of a run, keyed by canonical name.
///
/// `get_or_create` is the only way in; nothing is ever removed.
#[derive(Debug)]
pub struct AuthorRegistry {
    authors: Vec<Author>,
    keys: HashMap<String, AuthorId>,
    resolver: Arc<dyn IdentityResolver>,
}

impl Default for AuthorRegistry {
    fn default() -> Self {
        Self::with_resolver(Arc::new(ShortNameFallback))
    }
}

impl AuthorRegistry {
    /// Create an empty registry with the default resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with a custom resolver.
    #[must_use]
    pub fn with_resolver(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { authors: Vec::new(), keys: HashMap::new(), resolver }
    }

    /// Name of the active identity strategy.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        self.resolver.name()
    }

    /// Resolve a raw name to an author, creating one under the full
    /// canonical name if no key matches.
    pub fn get_or_create(&mut self, raw_name: &str) -> GraphResult<AuthorId> {
        let name = PersonName::parse(raw_name)?;
        if let Some(id) = self.resolve(&name) {
            return Ok(id);
        }

        let id = AuthorId(self.authors.len());
        self.authors.push(Author::new(id, name.full().to_string()));
        self.keys.insert(name.full().to_string(), id);
        tracing::trace!(name = name.full(), "Registered author");
        Ok(id)
    }

    /// Resolve a raw name without creating anything.
    #[must_use]
    pub fn lookup(&self, raw_name: &str) -> Option<AuthorId> {
        PersonName::parse(raw_name).ok().and_then(|name| self.resolve(&name))
    }

    fn resolve(&self, name: &PersonName) -> Option<AuthorId> {
        if let Some(id) = self.keys.get(name.full()) {
            return Some(*id);
        }

        self.resolver.fallback_keys(name).iter().find_map(|key| {
            let id = self.keys.get(key).copied();
            if id.is_some() {
                tracing::debug!(
                    name = name.full(),
                    matched = %key,
                    strategy = self.resolver.name(),
                    "Merged name variant into existing author"
                );
            }
            id
        })
    }

    /// Get an author by id.
    #[must_use]
    pub fn author(&self, id: AuthorId) -> &Author {
        &self.authors[id.0]
    }

    pub(super) fn author_mut(&mut self, id: AuthorId) -> &mut Author {
        &mut self.authors[id.0]
    }

    /// Get an author by exact canonical key.
    #[must_use]
    pub fn get(&self, canonical_name: &str) -> Option<&Author> {
        self.keys.get(canonical_name).map(|id| self.author(*id))
    }

    /// All authors, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Author> {
        self.authors.iter()
    }

    /// Number of distinct authors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.authors.len()
    }

    /// Check whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}
