//! Shared fixtures: an instantaneous in-memory source and record documents.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use coauthor_graph::client::LiteratureSource;
use coauthor_graph::error::{ClientError, ClientResult};

pub const SOPH: &str = "University of Alabama at Birmingham School of Public Health";

/// Search results and documents served from memory, with call counters.
#[derive(Default)]
pub struct FakeSource {
    pub results: HashMap<String, Vec<String>>,
    pub documents: HashMap<String, String>,
    pub failing: Vec<String>,
    pub throttled: Vec<String>,
    pub searches: Mutex<Vec<(String, String)>>,
    pub fetches: AtomicUsize,
}

impl FakeSource {
    pub fn with_search(mut self, term: &str, ids: &[&str]) -> Self {
        self.results.insert(term.to_string(), ids.iter().map(ToString::to_string).collect());
        self
    }

    pub fn with_document(mut self, id: &str, xml: String) -> Self {
        self.documents.insert(id.to_string(), xml);
        self
    }

    pub fn with_failure(mut self, id: &str) -> Self {
        self.failing.push(id.to_string());
        self
    }

    pub fn with_rate_limit(mut self, id: &str) -> Self {
        self.throttled.push(id.to_string());
        self
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LiteratureSource for FakeSource {
    async fn search(
        &self,
        term: &str,
        field: &str,
        max_results: u32,
    ) -> ClientResult<Vec<String>> {
        self.searches.lock().unwrap().push((term.to_string(), field.to_string()));
        let ids = self.results.get(term).cloned().unwrap_or_default();
        Ok(ids.into_iter().take(max_results as usize).collect())
    }

    async fn fetch(&self, record_id: &str) -> ClientResult<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.iter().any(|id| id == record_id) {
            return Err(ClientError::server(503, "unavailable"));
        }
        if self.throttled.iter().any(|id| id == record_id) {
            return Err(ClientError::rate_limited(1));
        }
        self.documents
            .get(record_id)
            .cloned()
            .ok_or_else(|| ClientError::not_found(record_id))
    }
}

/// Build a one-article efetch document.
pub fn record_xml(pmid: &str, title: &str, authors: &[(&str, &str, Option<&str>)]) -> String {
    let authors: String = authors
        .iter()
        .map(|(fore, last, affiliation)| {
            let affiliation = affiliation
                .map(|a| {
                    format!("<AffiliationInfo><Affiliation>{a}</Affiliation></AffiliationInfo>")
                })
                .unwrap_or_default();
            format!(
                "<Author><LastName>{last}</LastName><ForeName>{fore}</ForeName>\
                 {affiliation}</Author>"
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\"?><PubmedArticleSet><PubmedArticle><MedlineCitation>\
         <PMID>{pmid}</PMID><Article><ArticleTitle>{title}</ArticleTitle>\
         <AuthorList>{authors}</AuthorList></Article></MedlineCitation></PubmedArticle>\
         </PubmedArticleSet>"
    )
}

/// Smith with Doe on A101 (affiliated), Smith with Lee on A102 (no affiliation).
pub fn smith_source() -> FakeSource {
    FakeSource::default()
        .with_search("John Smith", &["A101", "A102"])
        .with_document(
            "A101",
            record_xml("A101", "First", &[("John", "Smith", Some(SOPH)), ("Jane", "Doe", None)]),
        )
        .with_document(
            "A102",
            record_xml("A102", "Second", &[("John", "Smith", None), ("Kim", "Lee", None)]),
        )
}
