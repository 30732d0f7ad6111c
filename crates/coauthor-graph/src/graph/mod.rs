//! Arena-backed co-authorship graph.
//!
//! Authors live in the [`AuthorRegistry`], articles in a separate store on
//! [`CoauthorGraph`]. Edges are id sets on both sides and are only ever
//! created through [`CoauthorGraph::add_author`], which writes both sides at
//! once.

mod affiliation;
mod registry;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;

pub use affiliation::AffiliationClass;
pub use registry::{
    AuthorRegistry, ExactName, IdentityResolver, IdentityStrategy, ShortNameFallback,
};

use crate::error::GraphResult;

/// Stable index of an author in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AuthorId(usize);

impl AuthorId {
    /// Position in the author store.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Stable index of an article in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ArticleId(usize);

impl ArticleId {
    /// Position in the article store.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One person and the publications they appear on.
#[derive(Debug, Clone)]
pub struct Author {
    id: AuthorId,
    name: String,
    affiliation: String,
    articles: BTreeSet<ArticleId>,
}

impl Author {
    fn new(id: AuthorId, name: String) -> Self {
        Self { id, name, affiliation: String::new(), articles: BTreeSet::new() }
    }

    /// Registry id.
    #[must_use]
    pub const fn id(&self) -> AuthorId {
        self.id
    }

    /// Canonical "First Middle Last" name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Affiliation text, empty when unknown.
    #[must_use]
    pub fn affiliation(&self) -> &str {
        &self.affiliation
    }

    /// Check whether an affiliation has been recorded.
    #[must_use]
    pub fn has_affiliation(&self) -> bool {
        !self.affiliation.is_empty()
    }

    /// Articles this author appears on.
    #[must_use]
    pub const fn articles(&self) -> &BTreeSet<ArticleId> {
        &self.articles
    }

    /// Number of articles this author appears on.
    #[must_use]
    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    /// Record an observed affiliation. The first non-empty value wins.
    ///
    /// Returns true if the affiliation was stored.
    pub(crate) fn observe_affiliation(&mut self, affiliation: &str) -> bool {
        let affiliation = affiliation.trim();
        if self.has_affiliation() || affiliation.is_empty() {
            return false;
        }
        self.affiliation = affiliation.to_string();
        true
    }
}

/// One publication and its author set.
#[derive(Debug, Clone)]
pub struct Article {
    id: ArticleId,
    external_id: String,
    title: String,
    r#abstract: String,
    authors: BTreeSet<AuthorId>,
}

impl Article {
    /// Graph id.
    #[must_use]
    pub const fn id(&self) -> ArticleId {
        self.id
    }

    /// External database identifier (PMID).
    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// Article title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Abstract text, empty when the record had none.
    #[must_use]
    pub fn abstract_text(&self) -> &str {
        &self.r#abstract
    }

    /// Authors listed on this article.
    #[must_use]
    pub const fn authors(&self) -> &BTreeSet<AuthorId> {
        &self.authors
    }

    /// Number of distinct authors.
    #[must_use]
    pub fn author_count(&self) -> usize {
        self.authors.len()
    }
}

/// Authors, articles and the edges between them for one run.
#[derive(Debug, Default)]
pub struct CoauthorGraph {
    registry: AuthorRegistry,
    articles: Vec<Article>,
    article_index: HashMap<String, ArticleId>,
}

impl CoauthorGraph {
    /// Create an empty graph with the default identity resolution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with a custom identity resolver.
    #[must_use]
    pub fn with_resolver(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self {
            registry: AuthorRegistry::with_resolver(resolver),
            articles: Vec::new(),
            article_index: HashMap::new(),
        }
    }

    /// The author registry.
    #[must_use]
    pub const fn registry(&self) -> &AuthorRegistry {
        &self.registry
    }

    /// Resolve a raw name to an author, creating one if needed.
    pub fn get_or_create_author(&mut self, raw_name: &str) -> GraphResult<AuthorId> {
        self.registry.get_or_create(raw_name)
    }

    /// Look up an author by raw name without creating one.
    #[must_use]
    pub fn find_author(&self, raw_name: &str) -> Option<&Author> {
        self.registry.lookup(raw_name).map(|id| self.author(id))
    }

    /// Get an author by id.
    #[must_use]
    pub fn author(&self, id: AuthorId) -> &Author {
        self.registry.author(id)
    }

    /// All authors, in creation order.
    pub fn authors(&self) -> impl Iterator<Item = &Author> {
        self.registry.iter()
    }

    /// Number of authors.
    #[must_use]
    pub fn author_count(&self) -> usize {
        self.registry.len()
    }

    /// Get an article by id.
    #[must_use]
    pub fn article(&self, id: ArticleId) -> &Article {
        &self.articles[id.0]
    }

    /// Find an article by its external identifier.
    #[must_use]
    pub fn article_by_external_id(&self, external_id: &str) -> Option<&Article> {
        self.article_index.get(external_id).map(|id| self.article(*id))
    }

    /// Check whether an article with this external identifier exists.
    #[must_use]
    pub fn contains_article(&self, external_id: &str) -> bool {
        self.article_index.contains_key(external_id)
    }

    /// All articles, in insertion order.
    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.articles.iter()
    }

    /// Number of articles.
    #[must_use]
    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    /// Insert an article, or return the existing one with the same external id.
    pub fn insert_article(
        &mut self,
        external_id: &str,
        title: &str,
        r#abstract: &str,
    ) -> ArticleId {
        if let Some(id) = self.article_index.get(external_id) {
            return *id;
        }

        let id = ArticleId(self.articles.len());
        self.articles.push(Article {
            id,
            external_id: external_id.to_string(),
            title: title.to_string(),
            r#abstract: r#abstract.to_string(),
            authors: BTreeSet::new(),
        });
        self.article_index.insert(external_id.to_string(), id);
        id
    }

    /// Link an author to an article, updating both sides.
    pub fn add_author(&mut self, article: ArticleId, author: AuthorId) {
        self.articles[article.0].authors.insert(author);
        self.registry.author_mut(author).articles.insert(article);
    }

    /// Record an observed affiliation for an author; the first non-empty
    /// value wins. Returns true if it was stored.
    pub fn observe_affiliation(&mut self, author: AuthorId, affiliation: &str) -> bool {
        self.registry.author_mut(author).observe_affiliation(affiliation)
    }

    /// Every other author sharing at least one article with `author`.
    #[must_use]
    pub fn collaborators(&self, author: AuthorId) -> BTreeSet<AuthorId> {
        self.author(author)
            .articles
            .iter()
            .flat_map(|article| self.article(*article).authors.iter().copied())
            .filter(|other| *other != author)
            .collect()
    }
}
