//! Markdown output formatting.

use std::collections::BTreeMap;

use crate::analysis::{CollaborationAnalyzer, CollaborationReport};
use crate::builder::{AuthorGraph, SkippedRecord};
use crate::graph::{AffiliationClass, Author};

/// Format a collaboration report as a Markdown table.
#[must_use]
pub fn format_report_markdown(report: &CollaborationReport) -> String {
    if report.is_empty() {
        return "No authors found.".to_string();
    }

    let mut output = format!("# Collaboration Report ({} authors)\n\n", report.data.len());

    output.push_str(&format!("| Author | {} |\n", report.labels.join(" | ")));
    output.push_str(&format!("|---|{}\n", "---:|".repeat(report.labels.len())));

    for (name, row) in &report.data {
        let values: Vec<String> = row.values().iter().map(ToString::to_string).collect();
        output.push_str(&format!("| {} | {} |\n", name, values.join(" | ")));
    }

    output
}

/// Format per-name record counts as a Markdown table.
#[must_use]
pub fn format_counts_markdown(counts: &BTreeMap<String, usize>) -> String {
    if counts.is_empty() {
        return "No authors found.".to_string();
    }

    let mut output = format!("# Article Counts ({} authors)\n\n", counts.len());
    output.push_str("| Author | Articles |\n|---|---:|\n");

    for (name, count) in counts {
        output.push_str(&format!("| {name} | {count} |\n"));
    }

    output
}

/// Format skipped records as a Markdown list.
#[must_use]
pub fn format_skipped_markdown(skipped: &[SkippedRecord]) -> String {
    if skipped.is_empty() {
        return String::new();
    }

    let mut output = format!("## Skipped Records ({})\n\n", skipped.len());
    for record in skipped {
        output.push_str(&format!(
            "- **{}** (from {}): {}\n",
            record.record_id, record.subject, record.reason
        ));
    }
    output
}

/// Format a detailed listing of every searched author: affiliation,
/// collaborators and articles with their author lists.
#[must_use]
pub fn format_author_detail_markdown(
    authors: &AuthorGraph,
    analyzer: &CollaborationAnalyzer,
) -> String {
    if authors.subject_count() == 0 {
        return "No authors found.".to_string();
    }

    let mut output = String::new();
    for (_, author) in authors.subjects() {
        output.push_str(&format_author_detail(authors, analyzer, author));
        output.push_str("\n---\n\n");
    }

    output.push_str(&format_skipped_markdown(authors.skipped()));
    output
}

fn format_author_detail(
    authors: &AuthorGraph,
    analyzer: &CollaborationAnalyzer,
    author: &Author,
) -> String {
    let graph = authors.graph();
    let markers = analyzer.markers();
    let class = analyzer.classify(graph, author.id());

    let mut output = format!("## {}", author.name());
    if class.is_internal() {
        output.push_str(&format!(" ({})", class.tag(markers)));
    }
    output.push_str("\n\n");

    if author.has_affiliation() {
        output.push_str(&format!("**Affiliation**: {}\n\n", author.affiliation()));
    }

    // Collaborators
    let collaborators = graph.collaborators(author.id());
    output.push_str(&format!("**Collaborators**: {}\n\n", collaborators.len()));
    for collaborator in &collaborators {
        output.push_str(&format!("- {}\n", graph.author(*collaborator).name()));
    }
    if !collaborators.is_empty() {
        output.push('\n');
    }

    // Articles
    output.push_str(&format!("**Articles**: {}\n\n", author.article_count()));
    for article_id in author.articles() {
        let article = graph.article(*article_id);
        output.push_str(&format!(
            "### {} - {}\n\n**Authors** ({}):\n",
            article.external_id(),
            article.title(),
            article.author_count()
        ));

        for co_author in article.authors() {
            let co_author = graph.author(*co_author);
            let tag = if co_author.id() == author.id() {
                "author"
            } else {
                match analyzer.classify(graph, co_author.id()) {
                    class if class.is_internal() => class.tag(markers),
                    _ => AffiliationClass::Unknown.tag(markers),
                }
            };
            output.push_str(&format!("- {} ({})\n", co_author.name(), tag));
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CollaborationRow;
    use crate::config::BreakdownMode;

    #[test]
    fn test_empty_report() {
        let report = CollaborationReport {
            labels: CollaborationAnalyzer::default().labels(),
            data: BTreeMap::new(),
            mode: BreakdownMode::default(),
        };
        assert_eq!(format_report_markdown(&report), "No authors found.");
    }

    #[test]
    fn test_report_table_row() {
        let mut data = BTreeMap::new();
        data.insert(
            "John Smith".to_string(),
            CollaborationRow {
                articles: 2,
                collaborators: 2,
                institution: 0,
                department: 0,
                other: 0,
                unknown: 2,
            },
        );
        let report = CollaborationReport {
            labels: CollaborationAnalyzer::default().labels(),
            data,
            mode: BreakdownMode::default(),
        };

        let output = format_report_markdown(&report);
        assert!(output.contains("| Author | Num of Articles |"));
        assert!(output.contains("| John Smith | 2 | 2 | 0 | 0 | 0 | 2 |"));
    }

    #[test]
    fn test_counts_table() {
        let counts = BTreeMap::from([("Jane Doe".to_string(), 3)]);
        let output = format_counts_markdown(&counts);
        assert!(output.contains("| Jane Doe | 3 |"));
    }

    #[test]
    fn test_skipped_list() {
        assert!(format_skipped_markdown(&[]).is_empty());

        let skipped = vec![SkippedRecord {
            record_id: "99".to_string(),
            subject: "John Smith".to_string(),
            reason: "missing ArticleTitle".to_string(),
        }];
        let output = format_skipped_markdown(&skipped);
        assert!(output.contains("**99** (from John Smith): missing ArticleTitle"));
    }
}
