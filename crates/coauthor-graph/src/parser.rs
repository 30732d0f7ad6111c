//! PubMed efetch XML parsing.
//!
//! Reads the first `PubmedArticle` of a `PubmedArticleSet` document into a
//! [`PubmedRecord`]. The parser is pure: it never touches the graph, so a
//! record that fails here leaves no partial state behind.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesText, Event};

use crate::error::{GraphError, GraphResult};
use crate::models::{PubmedRecord, RecordAuthor, collapse};

/// Expected document root.
pub const ROOT_ELEMENT: &str = "PubmedArticleSet";

/// Which field the current text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Pmid,
    Title,
    Abstract,
    LastName,
    ForeName,
    CollectiveName,
    Affiliation,
}

#[derive(Debug, Default)]
struct AuthorParts {
    last_name: String,
    fore_name: String,
    collective_name: String,
    affiliation: Option<String>,
}

impl AuthorParts {
    fn finish(self) -> RecordAuthor {
        let last_name =
            if self.last_name.is_empty() { self.collective_name } else { self.last_name };
        RecordAuthor { fore_name: self.fore_name, last_name, affiliation: self.affiliation }
    }
}

/// Parse an efetch document fetched for `record_id`.
///
/// Fails with [`GraphError::MalformedResponse`] when the document is not
/// well-formed or its root is not `PubmedArticleSet`, and with
/// [`GraphError::RecordParse`] when the PMID or title is missing.
pub fn parse_pubmed_record(record_id: &str, xml: &str) -> GraphResult<PubmedRecord> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut path: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut seen_article = false;
    let mut in_article = false;

    let mut pmid: Option<String> = None;
    let mut title: Option<String> = None;
    let mut abstract_sections: Vec<String> = Vec::new();
    let mut authors: Vec<RecordAuthor> = Vec::new();
    let mut author: Option<AuthorParts> = None;

    // Field being captured and the depth of the element that opened it.
    let mut capture: Option<(Field, usize)> = None;
    let mut text = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| GraphError::malformed(record_id, format!("invalid XML: {e}")))?;

        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if !seen_root {
                    check_root(record_id, &name)?;
                    seen_root = true;
                }
                let parent = path.last().map(String::as_str);

                if name == "PubmedArticle" && path.len() == 1 && !seen_article {
                    seen_article = true;
                    in_article = true;
                } else if in_article && capture.is_none() {
                    let field = match (parent, name.as_str()) {
                        (Some("MedlineCitation"), "PMID") if pmid.is_none() => Some(Field::Pmid),
                        (Some("Article"), "ArticleTitle") if title.is_none() => Some(Field::Title),
                        (Some("Abstract"), "AbstractText") => Some(Field::Abstract),
                        (Some("AuthorList"), "Author") => {
                            author = Some(AuthorParts::default());
                            None
                        }
                        (_, "LastName") if author.is_some() => Some(Field::LastName),
                        (_, "ForeName") if author.is_some() => Some(Field::ForeName),
                        (_, "CollectiveName") if author.is_some() => Some(Field::CollectiveName),
                        (_, "Affiliation")
                            if author.as_ref().is_some_and(|a| a.affiliation.is_none()) =>
                        {
                            Some(Field::Affiliation)
                        }
                        _ => None,
                    };
                    if let Some(field) = field {
                        capture = Some((field, path.len()));
                        text.clear();
                    }
                }

                path.push(name);
            }
            Event::Empty(e) => {
                if !seen_root {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    check_root(record_id, &name)?;
                    seen_root = true;
                }
            }
            Event::End(e) => {
                path.pop();
                let depth = path.len();

                if let Some((field, opened_at)) = capture {
                    if opened_at == depth {
                        let value = collapse(&text);
                        match field {
                            Field::Pmid => pmid = Some(value),
                            Field::Title => title = Some(value),
                            Field::Abstract => {
                                if !value.is_empty() {
                                    abstract_sections.push(value);
                                }
                            }
                            Field::LastName | Field::ForeName | Field::CollectiveName => {
                                if let Some(parts) = author.as_mut() {
                                    let slot = match field {
                                        Field::LastName => &mut parts.last_name,
                                        Field::ForeName => &mut parts.fore_name,
                                        _ => &mut parts.collective_name,
                                    };
                                    *slot = value;
                                }
                            }
                            Field::Affiliation => {
                                if let Some(parts) = author.as_mut() {
                                    if !value.is_empty() {
                                        parts.affiliation = Some(value);
                                    }
                                }
                            }
                        }
                        capture = None;
                        text.clear();
                    }
                }

                match e.local_name().as_ref() {
                    b"Author" if in_article => {
                        if let Some(parts) = author.take() {
                            authors.push(parts.finish());
                        }
                    }
                    b"PubmedArticle" if in_article && depth == 1 => {
                        in_article = false;
                        break;
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                if capture.is_some() {
                    text.push_str(&decode_text(&t));
                }
            }
            Event::CData(t) => {
                if capture.is_some() {
                    text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(GraphError::malformed(record_id, "document has no root element"));
    }
    if !seen_article {
        return Err(GraphError::record_parse(record_id, "no PubmedArticle in document"));
    }
    if in_article {
        return Err(GraphError::malformed(record_id, "document ended inside PubmedArticle"));
    }

    let id = pmid
        .filter(|id| !id.is_empty())
        .ok_or_else(|| GraphError::record_parse(record_id, "missing PMID"))?;
    let title = title.ok_or_else(|| GraphError::record_parse(record_id, "missing ArticleTitle"))?;

    if id != record_id {
        tracing::debug!(requested = record_id, parsed = %id, "Record id differs from request");
    }

    Ok(PubmedRecord { id, title, r#abstract: abstract_sections.join(" "), authors })
}

fn check_root(record_id: &str, name: &str) -> GraphResult<()> {
    if name == ROOT_ELEMENT {
        Ok(())
    } else {
        Err(GraphError::malformed(
            record_id,
            format!("expected root <{ROOT_ELEMENT}>, found <{name}>"),
        ))
    }
}

/// Unescape text, keeping the raw bytes when an entity is unknown.
fn decode_text<'a>(t: &'a BytesText<'a>) -> Cow<'a, str> {
    t.unescape().unwrap_or_else(|_| String::from_utf8_lossy(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" ?>
<!DOCTYPE PubmedArticleSet PUBLIC "-//NLM//DTD PubMedArticle, 1st January 2024//EN" "https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd">
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">31234567</PMID>
      <Article PubModel="Print">
        <ArticleTitle>Effects of <i>in utero</i> exposure &amp; outcomes.</ArticleTitle>
        <Abstract>
          <AbstractText Label="BACKGROUND">First section.</AbstractText>
          <AbstractText Label="RESULTS">Second
            section.</AbstractText>
        </Abstract>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y">
            <LastName>Smith</LastName>
            <ForeName>John A</ForeName>
            <Initials>JA</Initials>
            <AffiliationInfo>
              <Affiliation>University of Alabama at Birmingham School of Public Health, Birmingham, AL, USA.</Affiliation>
            </AffiliationInfo>
            <AffiliationInfo>
              <Affiliation>Second affiliation.</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <LastName>Doe</LastName>
            <ForeName>Jane</ForeName>
          </Author>
          <Author ValidYN="Y">
            <CollectiveName>Heart Study Group</CollectiveName>
          </Author>
        </AuthorList>
      </Article>
      <CommentsCorrectionsList>
        <CommentsCorrections RefType="Cites">
          <RefSource>Other paper</RefSource>
          <PMID Version="1">11111111</PMID>
        </CommentsCorrections>
      </CommentsCorrectionsList>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

    #[test]
    fn test_parse_full_record() {
        let record = parse_pubmed_record("31234567", SAMPLE).unwrap();

        assert_eq!(record.id, "31234567");
        assert_eq!(record.title, "Effects of in utero exposure & outcomes.");
        assert_eq!(record.r#abstract, "First section. Second section.");
        assert_eq!(record.authors.len(), 3);

        let smith = &record.authors[0];
        assert_eq!(smith.fore_name, "John A");
        assert_eq!(smith.last_name, "Smith");
        assert_eq!(
            smith.affiliation.as_deref(),
            Some("University of Alabama at Birmingham School of Public Health, Birmingham, AL, USA.")
        );

        assert_eq!(record.authors[1].raw_name(), "Jane Doe");
        assert!(record.authors[1].affiliation.is_none());
        assert_eq!(record.authors[2].last_name, "Heart Study Group");
    }

    #[test]
    fn test_record_without_abstract() {
        let xml = "<PubmedArticleSet><PubmedArticle><MedlineCitation>\
                   <PMID>7</PMID><Article><ArticleTitle>Short</ArticleTitle></Article>\
                   </MedlineCitation></PubmedArticle></PubmedArticleSet>";
        let record = parse_pubmed_record("7", xml).unwrap();
        assert!(!record.has_abstract());
        assert!(record.authors.is_empty());
    }

    #[test]
    fn test_wrong_root_is_malformed() {
        let xml = "<eFetchResult><ERROR>Empty id list</ERROR></eFetchResult>";
        let err = parse_pubmed_record("1", xml).unwrap_err();
        assert!(matches!(err, GraphError::MalformedResponse { .. }));
        assert!(err.to_string().contains("eFetchResult"));
    }

    #[test]
    fn test_empty_document_is_malformed() {
        let err = parse_pubmed_record("1", "").unwrap_err();
        assert!(matches!(err, GraphError::MalformedResponse { .. }));
    }

    #[test]
    fn test_mismatched_tags_are_malformed() {
        let xml = "<PubmedArticleSet><PubmedArticle></MedlineCitation></PubmedArticleSet>";
        let err = parse_pubmed_record("1", xml).unwrap_err();
        assert!(matches!(err, GraphError::MalformedResponse { .. }));
    }

    #[test]
    fn test_missing_title_is_record_error() {
        let xml = "<PubmedArticleSet><PubmedArticle><MedlineCitation>\
                   <PMID>9</PMID><Article></Article>\
                   </MedlineCitation></PubmedArticle></PubmedArticleSet>";
        let err = parse_pubmed_record("9", xml).unwrap_err();
        assert!(matches!(err, GraphError::RecordParse { .. }));
        assert!(err.to_string().contains("ArticleTitle"));
    }

    #[test]
    fn test_missing_pmid_is_record_error() {
        let xml = "<PubmedArticleSet><PubmedArticle><MedlineCitation>\
                   <Article><ArticleTitle>T</ArticleTitle></Article>\
                   </MedlineCitation></PubmedArticle></PubmedArticleSet>";
        let err = parse_pubmed_record("9", xml).unwrap_err();
        assert!(matches!(err, GraphError::RecordParse { .. }));
    }

    #[test]
    fn test_empty_article_set_is_record_error() {
        let err = parse_pubmed_record("5", "<PubmedArticleSet/>").unwrap_err();
        assert!(matches!(err, GraphError::RecordParse { .. }));
    }

    #[test]
    fn test_only_first_article_is_read() {
        let xml = "<PubmedArticleSet>\
                   <PubmedArticle><MedlineCitation><PMID>1</PMID>\
                   <Article><ArticleTitle>One</ArticleTitle></Article>\
                   </MedlineCitation></PubmedArticle>\
                   <PubmedArticle><MedlineCitation><PMID>2</PMID>\
                   <Article><ArticleTitle>Two</ArticleTitle></Article>\
                   </MedlineCitation></PubmedArticle>\
                   </PubmedArticleSet>";
        let record = parse_pubmed_record("1", xml).unwrap();
        assert_eq!(record.id, "1");
        assert_eq!(record.title, "One");
    }
}
