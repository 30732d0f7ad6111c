//! Error types for the co-authorship graph builder.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

/// Errors from the E-utilities transport layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by the E-utilities service (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Invalid request parameters (400 response or esearch `ERROR` payload)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from the service
        message: String,
    },

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Timeout(_) | Self::Server { .. })
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

/// Errors from graph construction.
#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    /// A required input was missing or blank.
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput {
        /// Input that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// A fetched document does not have the expected schema root.
    #[error("Malformed response for record {record_id}: {message}")]
    MalformedResponse {
        /// Record the document was fetched for
        record_id: String,
        /// What was wrong with the document
        message: String,
    },

    /// A schema-valid document is missing a required field.
    #[error("Failed to parse record {record_id}: {message}")]
    RecordParse {
        /// Record the document was fetched for
        record_id: String,
        /// Missing or unusable field
        message: String,
    },

    /// Error from the transport layer
    #[error("Source error: {0}")]
    Client(#[from] ClientError),
}

impl GraphError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput { field: field.into(), message: message.into() }
    }

    /// Create a malformed response error.
    #[must_use]
    pub fn malformed(record_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse { record_id: record_id.into(), message: message.into() }
    }

    /// Create a record parse error.
    #[must_use]
    pub fn record_parse(record_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordParse { record_id: record_id.into(), message: message.into() }
    }

    /// Returns true if the error concerns a single record and the run can
    /// continue with the next one.
    #[must_use]
    pub const fn is_record_level(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. } | Self::RecordParse { .. })
    }

    /// How long the source asked us to wait, when the run ended on a rate limit.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Client(e) => e.retry_after(),
            _ => None,
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_retryable() {
        assert!(ClientError::rate_limited(60).is_retryable());
        assert!(ClientError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(ClientError::server(500, "Internal error").is_retryable());

        assert!(!ClientError::not_found("record 123").is_retryable());
        assert!(!ClientError::bad_request("invalid term").is_retryable());
    }

    #[test]
    fn test_client_error_retry_after() {
        let err = ClientError::rate_limited(60);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));

        let err = ClientError::not_found("record");
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_graph_error_retry_after_from_client() {
        let err = GraphError::from(ClientError::rate_limited(5));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(5)));

        assert_eq!(GraphError::record_parse("1", "no title").retry_after(), None);
    }

    #[test]
    fn test_graph_error_record_level() {
        assert!(GraphError::malformed("1", "unexpected root").is_record_level());
        assert!(GraphError::record_parse("1", "missing title").is_record_level());
        assert!(!GraphError::invalid_input("names", "empty").is_record_level());
        assert!(!GraphError::from(ClientError::Timeout(Duration::from_secs(1))).is_record_level());
    }

    #[test]
    fn test_graph_error_messages() {
        let err = GraphError::record_parse("12345", "missing ArticleTitle");
        let msg = err.to_string();
        assert!(msg.contains("12345"));
        assert!(msg.contains("ArticleTitle"));
    }
}
