//! Per-author collaboration statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::builder::AuthorGraph;
use crate::config::{AffiliationMarkers, BreakdownMode};
use crate::graph::{AffiliationClass, AuthorId, CoauthorGraph};

/// Number of values in a report row.
pub const COLUMN_COUNT: usize = 6;

/// Statistics for one searched author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollaborationRow {
    /// Articles the author appears on.
    pub articles: usize,

    /// Distinct collaborators.
    pub collaborators: usize,

    /// Collaborators at the home institution, home department included.
    pub institution: usize,

    /// Collaborators in the home department.
    pub department: usize,

    /// Collaborators at other institutions.
    pub other: usize,

    /// Collaborators with no known affiliation.
    pub unknown: usize,
}

impl CollaborationRow {
    /// Values in report column order.
    #[must_use]
    pub const fn values(&self) -> [usize; COLUMN_COUNT] {
        [
            self.articles,
            self.collaborators,
            self.institution,
            self.department,
            self.other,
            self.unknown,
        ]
    }

    fn count(&mut self, class: AffiliationClass) {
        match class {
            AffiliationClass::InternalDepartment => {
                self.department += 1;
                self.institution += 1;
            }
            AffiliationClass::InternalInstitution => self.institution += 1,
            AffiliationClass::Other => self.other += 1,
            AffiliationClass::Unknown => self.unknown += 1,
        }
    }
}

/// Collaboration report: one row per searched author plus column labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollaborationReport {
    /// Column labels, parallel to [`CollaborationRow::values`].
    pub labels: [String; COLUMN_COUNT],

    /// Rows keyed by canonical author name.
    pub data: BTreeMap<String, CollaborationRow>,

    /// Breakdown mode the rows were computed with.
    #[serde(skip)]
    pub mode: BreakdownMode,
}

impl CollaborationReport {
    /// Row for an author.
    #[must_use]
    pub fn row(&self, name: &str) -> Option<&CollaborationRow> {
        self.data.get(name)
    }

    /// Check whether the report has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Derives collaboration statistics from a finished graph.
#[derive(Debug, Clone, Default)]
pub struct CollaborationAnalyzer {
    markers: AffiliationMarkers,
    mode: BreakdownMode,
}

impl CollaborationAnalyzer {
    /// Create an analyzer.
    #[must_use]
    pub const fn new(markers: AffiliationMarkers, mode: BreakdownMode) -> Self {
        Self { markers, mode }
    }

    /// Affiliation markers in use.
    #[must_use]
    pub const fn markers(&self) -> &AffiliationMarkers {
        &self.markers
    }

    /// Classify an author's own affiliation.
    #[must_use]
    pub fn classify(&self, graph: &CoauthorGraph, author: AuthorId) -> AffiliationClass {
        AffiliationClass::classify(graph.author(author).affiliation(), &self.markers)
    }

    /// Column labels for the configured markers.
    #[must_use]
    pub fn labels(&self) -> [String; COLUMN_COUNT] {
        [
            "Num of Articles".to_string(),
            "Num of Collaborators".to_string(),
            format!("Num from {}", self.markers.institution_label),
            format!("Num from {}", self.markers.department_label),
            "Num from Other Institutions".to_string(),
            "Num with Unknown Affiliation".to_string(),
        ]
    }

    /// Statistics for one author.
    #[must_use]
    pub fn row(&self, graph: &CoauthorGraph, author: AuthorId) -> CollaborationRow {
        let collaborators = graph.collaborators(author);
        let mut row = CollaborationRow {
            articles: graph.author(author).article_count(),
            collaborators: collaborators.len(),
            ..CollaborationRow::default()
        };

        let subject_class = self.classify(graph, author);
        for collaborator in collaborators {
            let class = match self.mode {
                BreakdownMode::CollaboratorAffiliation => self.classify(graph, collaborator),
                BreakdownMode::SubjectAffiliation => subject_class,
            };
            row.count(class);
        }

        row
    }

    /// Summarize every searched author of a built graph.
    #[must_use]
    pub fn summarize(&self, authors: &AuthorGraph) -> CollaborationReport {
        let graph = authors.graph();
        let data = authors
            .subjects()
            .map(|(name, author)| (name.to_string(), self.row(graph, author.id())))
            .collect();

        CollaborationReport { labels: self.labels(), data, mode: self.mode }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Subject at the department with one collaborator in each class.
    fn sample_graph() -> (CoauthorGraph, AuthorId) {
        let mut graph = CoauthorGraph::new();
        let subject = graph.get_or_create_author("John Smith").unwrap();
        let dept = graph.get_or_create_author("Dana Dept").unwrap();
        let inst = graph.get_or_create_author("Ira Inst").unwrap();
        let other = graph.get_or_create_author("Olga Other").unwrap();
        let unknown = graph.get_or_create_author("Uma Unknown").unwrap();

        graph.observe_affiliation(
            subject,
            "University of Alabama at Birmingham School of Public Health",
        );
        graph.observe_affiliation(
            dept,
            "School of Public Health, University of Alabama at Birmingham",
        );
        graph.observe_affiliation(inst, "University of Alabama at Birmingham, Dept of Medicine");
        graph.observe_affiliation(other, "Emory University");

        let a = graph.insert_article("1", "One", "");
        let b = graph.insert_article("2", "Two", "");
        for author in [subject, dept, inst] {
            graph.add_author(a, author);
        }
        for author in [subject, other, unknown, dept] {
            graph.add_author(b, author);
        }

        (graph, subject)
    }

    #[test]
    fn test_row_by_collaborator_affiliation() {
        let (graph, subject) = sample_graph();
        let analyzer = CollaborationAnalyzer::default();

        let row = analyzer.row(&graph, subject);
        assert_eq!(row.values(), [2, 4, 2, 1, 1, 1]);
    }

    #[test]
    fn test_row_by_subject_affiliation() {
        let (graph, subject) = sample_graph();
        let analyzer = CollaborationAnalyzer::new(
            AffiliationMarkers::default(),
            BreakdownMode::SubjectAffiliation,
        );

        // Every collaborator is counted under the subject's own class.
        let row = analyzer.row(&graph, subject);
        assert_eq!(row.values(), [2, 4, 4, 4, 0, 0]);
    }

    #[test]
    fn test_labels_follow_markers() {
        let analyzer = CollaborationAnalyzer::default();
        let labels = analyzer.labels();
        assert_eq!(labels[2], "Num from UAB");
        assert_eq!(labels[3], "Num from UAB SoPH");
        assert_eq!(labels.len(), COLUMN_COUNT);
    }

    #[test]
    fn test_author_without_articles() {
        let mut graph = CoauthorGraph::new();
        let loner = graph.get_or_create_author("Lone Author").unwrap();
        let row = CollaborationAnalyzer::default().row(&graph, loner);
        assert_eq!(row, CollaborationRow::default());
    }
}
