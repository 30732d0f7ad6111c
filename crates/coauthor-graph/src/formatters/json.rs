//! JSON output formatting.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::analysis::{CollaborationAnalyzer, CollaborationReport};
use crate::builder::AuthorGraph;
use crate::graph::{Author, CoauthorGraph};

/// Report as `{"labels": [...], "data": {name: [six numbers]}}`.
#[must_use]
pub fn report_json(report: &CollaborationReport) -> Value {
    let data: serde_json::Map<String, Value> = report
        .data
        .iter()
        .map(|(name, row)| (name.clone(), json!(row.values())))
        .collect();

    json!({
        "labels": report.labels,
        "data": data,
    })
}

/// Record counts as `{name: count}`.
#[must_use]
pub fn counts_json(counts: &BTreeMap<String, usize>) -> Value {
    json!(counts)
}

/// Compact author representation.
#[must_use]
pub fn compact_author(
    graph: &CoauthorGraph,
    analyzer: &CollaborationAnalyzer,
    author: &Author,
) -> Value {
    let mut obj = json!({
        "name": author.name(),
        "articles": author.article_count(),
        "class": analyzer.classify(graph, author.id()),
    });

    if author.has_affiliation() {
        obj["affiliation"] = json!(author.affiliation());
    }

    obj
}

/// Detailed listing of every searched author with collaborators and articles.
#[must_use]
pub fn author_detail_json(authors: &AuthorGraph, analyzer: &CollaborationAnalyzer) -> Value {
    let graph = authors.graph();

    let subjects: Vec<Value> = authors
        .subjects()
        .map(|(query, author)| {
            let collaborators: Vec<Value> = graph
                .collaborators(author.id())
                .into_iter()
                .map(|id| compact_author(graph, analyzer, graph.author(id)))
                .collect();

            let articles: Vec<Value> = author
                .articles()
                .iter()
                .map(|id| {
                    let article = graph.article(*id);
                    let mut obj = json!({
                        "id": article.external_id(),
                        "title": article.title(),
                        "authors": article
                            .authors()
                            .iter()
                            .map(|a| graph.author(*a).name())
                            .collect::<Vec<_>>(),
                    });
                    if !article.abstract_text().is_empty() {
                        obj["abstract"] = json!(article.abstract_text());
                    }
                    obj
                })
                .collect();

            let mut obj = compact_author(graph, analyzer, author);
            obj["query"] = json!(query);
            obj["collaborators"] = json!(collaborators);
            obj["articleList"] = json!(articles);
            obj
        })
        .collect();

    json!({
        "authors": subjects,
        "totalAuthors": graph.author_count(),
        "totalArticles": graph.article_count(),
        "skipped": authors.skipped(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CollaborationRow;
    use crate::config::BreakdownMode;

    #[test]
    fn test_report_json_shape() {
        let mut data = BTreeMap::new();
        data.insert(
            "John Smith".to_string(),
            CollaborationRow { articles: 2, collaborators: 2, unknown: 2, ..Default::default() },
        );
        let report = CollaborationReport {
            labels: CollaborationAnalyzer::default().labels(),
            data,
            mode: BreakdownMode::default(),
        };

        let value = report_json(&report);
        assert_eq!(value["data"]["John Smith"], json!([2, 2, 0, 0, 0, 2]));
        assert_eq!(value["labels"][0], "Num of Articles");
        assert_eq!(value["labels"].as_array().map(Vec::len), Some(6));
    }

    #[test]
    fn test_compact_author_omits_empty_affiliation() {
        let mut graph = CoauthorGraph::new();
        let id = graph.get_or_create_author("Jane Doe").unwrap();
        let analyzer = CollaborationAnalyzer::default();

        let value = compact_author(&graph, &analyzer, graph.author(id));
        assert_eq!(value["name"], "Jane Doe");
        assert_eq!(value["class"], "unknown");
        assert!(value.get("affiliation").is_none());
    }
}
