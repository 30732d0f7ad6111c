//! Configuration for the E-utilities client, the graph builder and the report.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for NCBI E-utilities.
    pub const EUTILS_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

    /// Bibliographic database queried by default.
    pub const DATABASE: &str = "pubmed";

    /// Tool name reported to NCBI.
    pub const TOOL: &str = "coauthor-graph";

    /// Search result ordering, newest first.
    pub const SORT: &str = "pub date";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Delay between requests without API key (3 req/s).
    pub const REQUEST_INTERVAL: Duration = Duration::from_millis(334);

    /// Delay between requests with API key (10 req/s).
    pub const REQUEST_INTERVAL_WITH_KEY: Duration = Duration::from_millis(100);

    /// Fetched record cache TTL (30 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(1800);

    /// Maximum cached records.
    pub const CACHE_MAX_SIZE: u64 = 5000;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 4;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Defaults for a graph building run.
pub mod defaults {
    use std::time::Duration;

    /// Search field used for name queries.
    pub const SEARCH_FIELD: &str = "author";

    /// Maximum record ids returned per name.
    pub const MAX_RESULTS: u32 = 1000;

    /// Pause between names.
    pub const NAME_INTERVAL: Duration = Duration::from_millis(500);

    /// Home institution marker.
    pub const INSTITUTION: &str = "University of Alabama at Birmingham";

    /// Home institution label.
    pub const INSTITUTION_LABEL: &str = "UAB";

    /// Home department marker.
    pub const DEPARTMENT: &str = "School of Public Health";

    /// Home department label.
    pub const DEPARTMENT_LABEL: &str = "UAB SoPH";
}

/// E-utilities client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// NCBI API key (optional).
    pub api_key: Option<String>,

    /// Contact email reported to NCBI (optional).
    pub email: Option<String>,

    /// Tool name reported to NCBI.
    pub tool: String,

    /// Base URL for E-utilities (for testing with mock servers).
    pub eutils_url: String,

    /// Database name.
    pub database: String,

    /// Search result ordering (`None` keeps the service default).
    pub sort: Option<String>,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Minimum interval between two requests.
    pub request_interval: Duration,

    /// Cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,

    /// Log raw response bodies at debug level.
    pub debug_responses: bool,
}

impl Config {
    /// Create a new configuration with optional API key.
    ///
    /// The request interval follows the NCBI usage policy:
    /// 3 req/s without a key, 10 req/s with one.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        let has_key = api_key.is_some();
        Self {
            api_key,
            email: None,
            tool: api::TOOL.to_string(),
            eutils_url: api::EUTILS_URL.to_string(),
            database: api::DATABASE.to_string(),
            sort: Some(api::SORT.to_string()),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            request_interval: if has_key {
                api::REQUEST_INTERVAL_WITH_KEY
            } else {
                api::REQUEST_INTERVAL
            },
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
            debug_responses: false,
        }
    }

    /// Create a test configuration pointing at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: None,
            email: None,
            tool: api::TOOL.to_string(),
            eutils_url: base_url.trim_end_matches('/').to_string(),
            database: api::DATABASE.to_string(),
            sort: None,
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            request_interval: Duration::ZERO, // No pacing in tests
            cache_ttl: Duration::from_secs(0), // No caching in tests
            cache_max_size: 0,
            debug_responses: false,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `NCBI_API_KEY`, `NCBI_EMAIL` and `NCBI_TOOL`.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new(std::env::var("NCBI_API_KEY").ok());
        config.email = std::env::var("NCBI_EMAIL").ok();
        if let Ok(tool) = std::env::var("NCBI_TOOL") {
            config.tool = tool;
        }
        Ok(config)
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Options for one graph building run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Search field for the name query.
    pub search_field: String,

    /// Maximum record ids per name.
    pub max_results: u32,

    /// Minimum pause between two names.
    pub name_interval: Duration,
}

impl BuildOptions {
    /// Options with no pause between names, for tests against fake sources.
    #[must_use]
    pub fn unpaced() -> Self {
        Self { name_interval: Duration::ZERO, ..Self::default() }
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            search_field: defaults::SEARCH_FIELD.to_string(),
            max_results: defaults::MAX_RESULTS,
            name_interval: defaults::NAME_INTERVAL,
        }
    }
}

/// Affiliation substrings that identify the home institution and department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliationMarkers {
    /// Text that marks the home institution.
    pub institution: String,

    /// Short label for the institution in reports.
    pub institution_label: String,

    /// Text that marks the home department.
    pub department: String,

    /// Short label for the department in reports.
    pub department_label: String,
}

impl Default for AffiliationMarkers {
    fn default() -> Self {
        Self {
            institution: defaults::INSTITUTION.to_string(),
            institution_label: defaults::INSTITUTION_LABEL.to_string(),
            department: defaults::DEPARTMENT.to_string(),
            department_label: defaults::DEPARTMENT_LABEL.to_string(),
        }
    }
}

/// Whose affiliation the per-collaborator breakdown counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BreakdownMode {
    /// Classify each collaborator by their own affiliation.
    #[default]
    #[value(name = "collaborator")]
    CollaboratorAffiliation,

    /// Count every collaborator under the subject author's own classification.
    #[value(name = "subject")]
    SubjectAffiliation,
}
