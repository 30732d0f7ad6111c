//! Integration tests against the live NCBI E-utilities service.
//!
//! Run with: `cargo test --features integration -- --nocapture`

#![cfg(feature = "integration")]

use std::sync::Arc;

use coauthor_graph::client::{EntrezClient, LiteratureSource};
use coauthor_graph::config::{BuildOptions, Config};
use coauthor_graph::parser::parse_pubmed_record;
use coauthor_graph::{CollaborationAnalyzer, GraphBuilder};

/// Author with a stable, modest publication list.
const AUTHOR: &str = "Stephen Mennemeyer";

fn client() -> EntrezClient {
    EntrezClient::new(Config::from_env().unwrap()).unwrap()
}

#[tokio::test]
async fn test_live_search_returns_ids() {
    let summary = client().search_details(AUTHOR, "author", 5).await.unwrap();

    assert!(summary.total > 0);
    assert!(!summary.ids.is_empty());
    assert!(summary.ids.len() <= 5);
}

#[tokio::test]
async fn test_live_fetch_parses() {
    let client = client();
    let ids = client.search(AUTHOR, "author", 1).await.unwrap();
    let document = client.fetch(&ids[0]).await.unwrap();

    let record = parse_pubmed_record(&ids[0], &document).unwrap();
    assert_eq!(record.id, ids[0]);
    assert!(!record.title.is_empty());
    assert!(!record.authors.is_empty());
}

#[tokio::test]
async fn test_live_build_small_graph() {
    let options = BuildOptions { max_results: 3, ..BuildOptions::default() };
    let graph =
        GraphBuilder::new(Arc::new(client()), options).build(&[AUTHOR], None).await.unwrap();

    let subject = graph.subject(AUTHOR).unwrap();
    assert!(subject.article_count() >= 1);

    let report = CollaborationAnalyzer::default().summarize(&graph);
    assert!(report.row(AUTHOR).is_some());
}
