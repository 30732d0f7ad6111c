//! Graph building: one search per name, one fetch per returned record.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::client::{LiteratureSource, Pacer};
use crate::config::BuildOptions;
use crate::error::{ClientError, GraphError, GraphResult};
use crate::graph::{
    ArticleId, Author, AuthorId, CoauthorGraph, IdentityResolver, IdentityStrategy,
};
use crate::models::{PersonName, PubmedRecord};
use crate::parser::parse_pubmed_record;

/// Callback invoked with `(done, total)` after each name completes.
pub type ProgressObserver<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

/// A record left out of the graph, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// Record id as returned by the search.
    pub record_id: String,

    /// Name whose search returned the record.
    pub subject: String,

    /// Error message.
    pub reason: String,
}

/// The finished graph plus the authors that were searched for.
#[derive(Debug)]
pub struct AuthorGraph {
    graph: CoauthorGraph,
    subjects: BTreeMap<String, AuthorId>,
    skipped: Vec<SkippedRecord>,
}

impl AuthorGraph {
    /// The full graph, including co-authors that were not searched for.
    #[must_use]
    pub const fn graph(&self) -> &CoauthorGraph {
        &self.graph
    }

    /// Searched names (canonical form) and the authors they resolved to.
    pub fn subjects(&self) -> impl Iterator<Item = (&str, &Author)> {
        self.subjects.iter().map(|(name, id)| (name.as_str(), self.graph.author(*id)))
    }

    /// Number of searched names.
    #[must_use]
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// The author a searched name resolved to.
    #[must_use]
    pub fn subject(&self, raw_name: &str) -> Option<&Author> {
        let name = PersonName::parse(raw_name).ok()?;
        self.subjects.get(name.full()).map(|id| self.graph.author(*id))
    }

    /// Records that could not be parsed.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }
}

/// Drives search, fetch and parse against a [`LiteratureSource`] and links
/// the results into a fresh graph.
///
/// Names are processed one at a time, in input order, with a pause between
/// them enforced by the builder's [`Pacer`].
pub struct GraphBuilder {
    source: Arc<dyn LiteratureSource>,
    options: BuildOptions,
    pacer: Pacer,
    resolver: Arc<dyn IdentityResolver>,
}

impl GraphBuilder {
    /// Create a builder pacing names by `options.name_interval`.
    #[must_use]
    pub fn new(source: Arc<dyn LiteratureSource>, options: BuildOptions) -> Self {
        let pacer = Pacer::every(options.name_interval);
        Self { source, options, pacer, resolver: IdentityStrategy::default().resolver() }
    }

    /// Replace the name pacer.
    #[must_use]
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Replace the identity resolution strategy.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Build the co-authorship graph for `names`.
    ///
    /// All names are validated before any call to the source. An empty list
    /// yields an empty graph. Records that fail to parse are skipped and
    /// listed in [`AuthorGraph::skipped`]; transport errors end the run.
    pub async fn build<S: AsRef<str>>(
        &self,
        names: &[S],
        progress: Option<ProgressObserver<'_>>,
    ) -> GraphResult<AuthorGraph> {
        let names = validate_names(names)?;
        let total = names.len();

        let mut graph = CoauthorGraph::with_resolver(Arc::clone(&self.resolver));
        let mut subjects = BTreeMap::new();
        let mut skipped = Vec::new();

        for (index, name) in names.iter().enumerate() {
            self.pacer.ready().await;

            let author = graph.get_or_create_author(name)?;
            subjects.insert(name.clone(), author);
            let term = graph.author(author).name().to_string();

            let ids = self
                .source
                .search(&term, &self.options.search_field, self.options.max_results)
                .await
                .map_err(|e| abort_on(&term, e))?;
            tracing::info!(name = %term, records = ids.len(), "Searched author");

            for record_id in ids {
                if graph.contains_article(&record_id) {
                    tracing::debug!(record_id = %record_id, "Record already in graph");
                    continue;
                }

                let document =
                    self.source.fetch(&record_id).await.map_err(|e| abort_on(&record_id, e))?;
                let linked = parse_pubmed_record(&record_id, &document)
                    .and_then(|record| link_record(&mut graph, &record));
                match linked {
                    Ok(_) => {}
                    Err(e) if e.is_record_level() => {
                        tracing::warn!(record_id = %record_id, error = %e, "Skipping record");
                        skipped.push(SkippedRecord {
                            record_id,
                            subject: term.clone(),
                            reason: e.to_string(),
                        });
                    }
                    Err(e) => return Err(e),
                }
            }

            tracing::info!(done = index + 1, total, "Progress");
            if let Some(observer) = progress {
                observer(index + 1, total);
            }
        }

        tracing::info!(
            authors = graph.author_count(),
            articles = graph.article_count(),
            skipped = skipped.len(),
            "Graph complete"
        );

        Ok(AuthorGraph { graph, subjects, skipped })
    }

    /// Count matching records per name without fetching them.
    ///
    /// Counts are capped at `max_results`.
    pub async fn article_counts<S: AsRef<str>>(
        &self,
        names: &[S],
        progress: Option<ProgressObserver<'_>>,
    ) -> GraphResult<BTreeMap<String, usize>> {
        let names = validate_names(names)?;
        let total = names.len();
        let mut counts = BTreeMap::new();

        for (index, name) in names.into_iter().enumerate() {
            self.pacer.ready().await;

            let ids = self
                .source
                .search(&name, &self.options.search_field, self.options.max_results)
                .await
                .map_err(|e| abort_on(&name, e))?;
            tracing::info!(name = %name, records = ids.len(), "Counted records");
            counts.insert(name, ids.len());

            if let Some(observer) = progress {
                observer(index + 1, total);
            }
        }

        Ok(counts)
    }
}

impl std::fmt::Debug for GraphBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphBuilder")
            .field("options", &self.options)
            .field("pacer", &self.pacer)
            .field("resolver", &self.resolver)
            .finish()
    }
}

/// Log a transport failure that ends the run and wrap it.
fn abort_on(target: &str, error: ClientError) -> GraphError {
    tracing::error!(
        target_name = target,
        error = %error,
        retryable = error.is_retryable(),
        retry_after = ?error.retry_after(),
        "Source request failed, stopping"
    );
    GraphError::Client(error)
}

/// Normalize every input name, failing on the first unusable one.
fn validate_names<S: AsRef<str>>(names: &[S]) -> GraphResult<Vec<String>> {
    names
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            PersonName::parse(raw.as_ref())
                .map(|name| name.full().to_string())
                .map_err(|e| GraphError::invalid_input(format!("names[{i}]"), e.to_string()))
        })
        .collect()
}

/// Link a fully parsed record into the graph.
///
/// Every author name is resolved before the article is inserted, so an error
/// leaves the graph untouched. An author entry without any name gets a
/// placeholder identity unique to its record and position.
fn link_record(graph: &mut CoauthorGraph, record: &PubmedRecord) -> GraphResult<ArticleId> {
    let mut resolved = Vec::with_capacity(record.authors.len());
    for (position, entry) in record.authors.iter().enumerate() {
        let author = match graph.get_or_create_author(&entry.raw_name()) {
            Ok(author) => author,
            Err(_) => {
                let placeholder = anonymous_name(&record.id, position);
                tracing::warn!(
                    record_id = %record.id,
                    position,
                    placeholder = %placeholder,
                    "Author entry has no name"
                );
                graph.get_or_create_author(&placeholder)?
            }
        };
        resolved.push((author, entry.affiliation.as_deref()));
    }

    let article = graph.insert_article(&record.id, &record.title, &record.r#abstract);
    for (author, affiliation) in resolved {
        if let Some(affiliation) = affiliation {
            graph.observe_affiliation(author, affiliation);
        }
        graph.add_author(article, author);
    }

    tracing::debug!(
        record_id = %record.id,
        authors = graph.article(article).author_count(),
        "Linked record"
    );
    Ok(article)
}

/// Single-token placeholder, so no short-name fallback can merge two of them.
fn anonymous_name(record_id: &str, position: usize) -> String {
    format!("Anonymous-{record_id}-{}", position + 1)
}
