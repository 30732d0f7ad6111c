//! NCBI E-utilities client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff
//! - Request pacing per the NCBI usage policy (3 req/s, 10 req/s with key)
//! - In-memory caching of fetched records

mod pacer;

use std::time::Duration;

use moka::future::Cache;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

pub use pacer::Pacer;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{ESearchResponse, SearchSummary};

/// The two calls the graph builder needs from a bibliographic service.
#[async_trait::async_trait]
pub trait LiteratureSource: Send + Sync {
    /// Search `field` for `term`, returning at most `max_results` record ids
    /// in service order.
    async fn search(&self, term: &str, field: &str, max_results: u32)
    -> ClientResult<Vec<String>>;

    /// Fetch the full record document for one id.
    async fn fetch(&self, record_id: &str) -> ClientResult<String>;
}

/// E-utilities (esearch/efetch) client.
#[derive(Clone)]
pub struct EntrezClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Response cache.
    cache: Cache<String, String>,

    /// Shared request pacer.
    pacer: Pacer,

    /// API key (optional).
    api_key: Option<String>,

    /// Contact email (optional).
    email: Option<String>,

    /// Tool name.
    tool: String,

    /// E-utilities base URL.
    eutils_url: String,

    /// Database name.
    database: String,

    /// Search ordering.
    sort: Option<String>,

    /// Request timeout, reported on timeouts.
    request_timeout: Duration,

    /// Log raw response bodies.
    debug_responses: bool,
}

impl EntrezClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(30))
            .build_with_max_retries(3);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client,
            cache,
            pacer: Pacer::every(config.request_interval),
            api_key: config.api_key,
            email: config.email,
            tool: config.tool,
            eutils_url: config.eutils_url,
            database: config.database,
            sort: config.sort,
            request_timeout: config.request_timeout,
            debug_responses: config.debug_responses,
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Run an esearch query and return the full summary.
    ///
    /// # Errors
    ///
    /// Returns error on API failure or when the service rejects the query.
    pub async fn search_details(
        &self,
        term: &str,
        field: &str,
        max_results: u32,
    ) -> ClientResult<SearchSummary> {
        let url = format!("{}/esearch.fcgi", self.eutils_url);

        let mut params = vec![
            ("db".to_string(), self.database.clone()),
            ("term".to_string(), term.to_string()),
            ("field".to_string(), field.to_string()),
            ("retmax".to_string(), max_results.to_string()),
            ("retmode".to_string(), "json".to_string()),
        ];

        if let Some(ref sort) = self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }

        let body = self.get_text(&url, &params).await?;
        let response: ESearchResponse = serde_json::from_str(&body)?;

        if let Some(message) = response.result.error.clone() {
            return Err(ClientError::bad_request(message));
        }

        let summary = SearchSummary::from(response.result);
        tracing::debug!(
            term,
            field,
            total = summary.total,
            returned = summary.ids.len(),
            "esearch"
        );
        Ok(summary)
    }

    /// Fetch one record as efetch XML.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn fetch_record(&self, record_id: &str) -> ClientResult<String> {
        let url = format!("{}/efetch.fcgi", self.eutils_url);

        let params = vec![
            ("db".to_string(), self.database.clone()),
            ("id".to_string(), record_id.to_string()),
            ("retmode".to_string(), "xml".to_string()),
        ];

        self.get_text(&url, &params).await
    }

    /// Make a GET request and return the body text.
    async fn get_text(&self, url: &str, params: &[(String, String)]) -> ClientResult<String> {
        let params = self.with_identity(params);

        // Check cache
        let cache_key = self.cache_key("GET", url, &params);
        if let Some(cached) = self.cache.get(&cache_key).await {
            return Ok(cached);
        }

        self.pacer.ready().await;

        let response = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let response = self.handle_response(response).await?;
        let text = response.text().await?;

        if self.debug_responses {
            tracing::debug!(url, body = %text, "Response body");
        }

        self.cache.insert(cache_key, text.clone()).await;

        Ok(text)
    }

    /// Append tool, email and API key parameters.
    fn with_identity(&self, params: &[(String, String)]) -> Vec<(String, String)> {
        let mut params = params.to_vec();
        params.push(("tool".to_string(), self.tool.clone()));
        if let Some(ref email) = self.email {
            params.push(("email".to_string(), email.clone()));
        }
        if let Some(ref key) = self.api_key {
            params.push(("api_key".to_string(), key.clone()));
        }
        params
    }

    fn map_send_error(&self, error: reqwest_middleware::Error) -> ClientError {
        match error {
            reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => {
                ClientError::Timeout(self.request_timeout)
            }
            other => ClientError::from(other),
        }
    }

    /// Handle API response status codes.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1);

                Err(ClientError::rate_limited(retry_after))
            }
            404 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::not_found(text))
            }
            400 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::bad_request(text))
            }
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }

    /// Generate cache key.
    fn cache_key(&self, method: &str, url: &str, params: &[(String, String)]) -> String {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(method.as_bytes());
        hasher.update(b"|");
        hasher.update(url.as_bytes());
        hasher.update(b"|");

        for (k, v) in params {
            hasher.update(k.as_bytes());
            hasher.update(b"=");
            hasher.update(v.as_bytes());
            hasher.update(b"&");
        }

        format!("{:x}", hasher.finalize())
    }
}

#[async_trait::async_trait]
impl LiteratureSource for EntrezClient {
    async fn search(
        &self,
        term: &str,
        field: &str,
        max_results: u32,
    ) -> ClientResult<Vec<String>> {
        Ok(self.search_details(term, field, max_results).await?.ids)
    }

    async fn fetch(&self, record_id: &str) -> ClientResult<String> {
        self.fetch_record(record_id).await
    }
}

impl std::fmt::Debug for EntrezClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntrezClient")
            .field("has_api_key", &self.has_api_key())
            .field("database", &self.database)
            .field("pacer", &self.pacer)
            .finish()
    }
}
