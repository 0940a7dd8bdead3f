//! OSRM-style Table API response types.
//!
//! The table service reports distance and duration from a set of
//! source coordinates to a set of destination coordinates. Requests
//! are issued with a single source (the work location), so the
//! matrices hold exactly one row.

use serde::Deserialize;

/// Table API response.
///
/// The response carries duration and distance matrices on success or
/// an error message on failure; `code` indicates which.
#[derive(Debug, Deserialize)]
pub(crate) struct TableResponse {
    /// Status code from the service.
    ///
    /// Common values:
    /// - `"Ok"` - request was successful
    /// - `"InvalidQuery"` - invalid query parameters
    /// - `"NoTable"` - table computation failed
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Matrix of durations in seconds, one row per source.
    ///
    /// Cells are `None` when no route exists between a pair.
    pub durations: Option<Vec<Vec<Option<f64>>>>,

    /// Matrix of distances in metres, one row per source.
    pub distances: Option<Vec<Vec<Option<f64>>>>,
}

impl TableResponse {
    /// Check if the response indicates success.
    pub(crate) fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}
