//! HTTP-based [`DistanceSource`] using an OSRM-style Table API.
//!
//! # Architecture
//!
//! The [`DistanceSource`] trait is synchronous to keep the engine
//! embeddable in synchronous contexts. This source bridges the async
//! HTTP calls to the sync interface by blocking on a Tokio runtime it
//! owns; when called from within an existing multi-threaded Tokio
//! runtime it uses that runtime's handle with
//! [`tokio::task::block_in_place`] to avoid nested-runtime panics.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use nestwise_core::TravelMode;
//! use nestwise_travel::{DistanceSource, HttpDistanceSource};
//!
//! let source = HttpDistanceSource::new("http://localhost:5000")?;
//! let outcomes = source.batch_query(
//!     Coord { x: -0.1, y: 51.5 },
//!     &[Coord { x: -0.2, y: 51.6 }],
//!     TravelMode::Walking,
//! )?;
//! assert_eq!(outcomes.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::time::Duration;

use geo::Coord;
use nestwise_core::TravelMode;
use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::osrm::TableResponse;
use super::{DistanceSource, DistanceSourceError, ElementOutcome, SourceBuildError};

/// Default user agent for table requests.
pub const DEFAULT_USER_AGENT: &str = "nestwise-travel/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpDistanceSource`].
#[derive(Debug, Clone)]
pub struct HttpDistanceSourceConfig {
    /// Base URL for the table service (e.g. `"http://localhost:5000"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpDistanceSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpDistanceSourceConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Routing profile segment for a travel mode.
const fn profile(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Walking => "walking",
        TravelMode::Driving => "driving",
        TravelMode::Transit => "transit",
    }
}

/// HTTP table-service client implementing [`DistanceSource`].
///
/// The client owns a Tokio runtime that is reused across calls,
/// avoiding the overhead of creating a new runtime per request.
pub struct HttpDistanceSource {
    client: Client,
    config: HttpDistanceSourceConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpDistanceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDistanceSource")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpDistanceSource {
    /// Create a new source with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client or Tokio runtime fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceBuildError> {
        Self::with_config(HttpDistanceSourceConfig::new(base_url))
    }

    /// Create a new source with explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client or Tokio runtime fails to
    /// build.
    pub fn with_config(config: HttpDistanceSourceConfig) -> Result<Self, SourceBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(SourceBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SourceBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Build the table URL for one origin, destination set and mode.
    ///
    /// The URL format is
    /// `{base_url}/table/v1/{profile}/{coordinates}?sources=0&...`
    /// where coordinates are semicolon-separated `lon,lat` pairs with
    /// the origin first, so destination indices start at 1.
    fn build_table_url(
        &self,
        origin: Coord<f64>,
        destinations: &[Coord<f64>],
        mode: TravelMode,
    ) -> String {
        let coords: String = std::iter::once(origin)
            .chain(destinations.iter().copied())
            .map(|c| format!("{},{}", c.x, c.y))
            .collect::<Vec<_>>()
            .join(";");
        let dest_indices: String = (1..=destinations.len())
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{coords}?sources=0&destinations={dest_indices}&annotations=duration,distance",
            self.config.base_url.trim_end_matches('/'),
            profile(mode),
        )
    }

    /// Fetch and convert one batch asynchronously.
    async fn fetch_batch_async(
        &self,
        origin: Coord<f64>,
        destinations: &[Coord<f64>],
        mode: TravelMode,
    ) -> Result<Vec<ElementOutcome>, DistanceSourceError> {
        let url = self.build_table_url(origin, destinations, mode);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let table: TableResponse =
            response
                .json()
                .await
                .map_err(|err| DistanceSourceError::Parse {
                    message: err.to_string(),
                })?;

        Self::convert_response(&table, destinations.len())
    }

    /// Convert a reqwest error to a [`DistanceSourceError`].
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> DistanceSourceError {
        if error.is_timeout() {
            return DistanceSourceError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return DistanceSourceError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        DistanceSourceError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// Convert a table response to per-destination outcomes.
    ///
    /// A cell resolves only when both its duration and distance are
    /// present, finite and non-negative; anything else (including a
    /// short row) is an unresolved element, never a batch failure.
    fn convert_response(
        response: &TableResponse,
        expected: usize,
    ) -> Result<Vec<ElementOutcome>, DistanceSourceError> {
        if !response.is_ok() {
            return Err(DistanceSourceError::Service {
                code: response.code.clone(),
                message: response.message.clone().unwrap_or_default(),
            });
        }

        let durations = response
            .durations
            .as_ref()
            .and_then(|rows| rows.first())
            .ok_or_else(|| DistanceSourceError::Parse {
                message: "table response missing durations row".to_owned(),
            })?;
        let distances = response
            .distances
            .as_ref()
            .and_then(|rows| rows.first())
            .ok_or_else(|| DistanceSourceError::Parse {
                message: "table response missing distances row".to_owned(),
            })?;

        let cell = |values: &[Option<f64>], i: usize| -> Option<f64> {
            values
                .get(i)
                .copied()
                .flatten()
                .filter(|v| v.is_finite() && *v >= 0.0)
        };

        Ok((0..expected)
            .map(|i| match (cell(durations, i), cell(distances, i)) {
                (Some(duration_s), Some(distance_m)) => ElementOutcome::Resolved {
                    distance_m,
                    duration_s,
                },
                _ => ElementOutcome::Unresolved,
            })
            .collect())
    }
}

impl DistanceSource for HttpDistanceSource {
    /// Query the table service for one origin, destination set and mode.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime
    /// must be multi-threaded; from a `current_thread` runtime the
    /// source falls back to its own internal runtime, which may block
    /// the caller's runtime.
    fn batch_query(
        &self,
        origin: Coord<f64>,
        destinations: &[Coord<f64>],
        mode: TravelMode,
    ) -> Result<Vec<ElementOutcome>, DistanceSourceError> {
        if destinations.is_empty() {
            return Err(DistanceSourceError::EmptyInput);
        }

        let future = self.fetch_batch_async(origin, destinations, mode);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // No runtime detected, or current_thread runtime: use our own.
            _ => self.runtime.block_on(future),
        }
    }
}
