//! Search result models matching the esearch JSON schema.

use serde::{Deserialize, Serialize};

/// Top-level esearch response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ESearchResponse {
    /// Search payload.
    #[serde(rename = "esearchresult")]
    pub result: ESearchResult,
}

/// Raw esearch payload. Counts arrive as strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ESearchResult {
    /// Total number of matching records in the database.
    #[serde(default)]
    pub count: Option<String>,

    /// Number of ids returned in this response.
    #[serde(default)]
    pub retmax: Option<String>,

    /// Offset of the first returned id.
    #[serde(default)]
    pub retstart: Option<String>,

    /// Returned record ids.
    #[serde(default)]
    pub idlist: Vec<String>,

    /// Query as translated by the service.
    #[serde(default)]
    pub querytranslation: Option<String>,

    /// Error message, present when the query was rejected.
    #[serde(default, rename = "ERROR")]
    pub error: Option<String>,
}

/// Summary of one author search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    /// Total matches in the database, regardless of how many were returned.
    pub total: u64,

    /// Offset of the first returned id.
    pub offset: u64,

    /// Page size actually returned.
    pub returned: u64,

    /// Query as translated by the service.
    pub query_translation: String,

    /// Returned record ids, in service order.
    pub ids: Vec<String>,
}

impl From<ESearchResult> for SearchSummary {
    fn from(raw: ESearchResult) -> Self {
        fn number(value: Option<&String>) -> u64 {
            value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
        }

        Self {
            total: number(raw.count.as_ref()),
            offset: number(raw.retstart.as_ref()),
            returned: number(raw.retmax.as_ref()),
            query_translation: raw.querytranslation.unwrap_or_default(),
            ids: raw.idlist,
        }
    }
}

impl std::fmt::Display for SearchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "query: '{}' - total results: {}", self.query_translation, self.total)
    }
}
