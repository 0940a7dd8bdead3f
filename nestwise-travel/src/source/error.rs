//! Error types for external distance sources.

use thiserror::Error;

/// Errors from [`DistanceSource::batch_query`].
///
/// Every variant triggers the fallback estimator for the affected
/// mode; none of them is surfaced to end users as a failure.
///
/// [`DistanceSource::batch_query`]: super::DistanceSource::batch_query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistanceSourceError {
    /// No destinations were provided.
    ///
    /// Callers should pre-filter input to avoid this condition.
    #[error("at least one destination is required")]
    EmptyInput,
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The request failed below the HTTP layer.
    #[error("network failure for {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Error description.
        message: String,
    },
    /// The response body could not be interpreted.
    #[error("failed to parse distance source response: {message}")]
    Parse {
        /// Parse failure description.
        message: String,
    },
    /// The service reported an application-level error.
    #[error("distance source error {code}: {message}")]
    Service {
        /// Service status code, e.g. `"InvalidQuery"`.
        code: String,
        /// Service-provided message.
        message: String,
    },
    /// No external source is configured.
    #[error("no external distance source is configured")]
    Unavailable,
}

/// Error type for [`HttpDistanceSource`] construction failures.
///
/// [`HttpDistanceSource`]: super::HttpDistanceSource
#[derive(Debug)]
pub enum SourceBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// Failed to build the Tokio runtime.
    Runtime(std::io::Error),
}

impl std::fmt::Display for SourceBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
        }
    }
}

impl std::error::Error for SourceBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
        }
    }
}
