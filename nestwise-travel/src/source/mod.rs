//! External distance/duration sources.
//!
//! The [`DistanceSource`] trait abstracts a batched table service that
//! reports distance and duration from one origin to many destinations
//! for a single travel mode. Per-destination failures are expressed as
//! [`ElementOutcome::Unresolved`] rather than failing the batch; a
//! total failure returns [`DistanceSourceError`] and the calculator
//! falls back to the great-circle estimator for the affected mode.

mod error;
mod http;
mod osrm;

pub use error::{DistanceSourceError, SourceBuildError};
pub use http::{HttpDistanceSource, HttpDistanceSourceConfig};

use geo::Coord;
use nestwise_core::TravelMode;

/// Largest number of destinations the external source accepts per
/// request. The calculator partitions larger sets into batches of this
/// size.
pub const MAX_BATCH_SIZE: usize = 10;

/// Result for one destination within a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementOutcome {
    /// The source resolved this destination.
    Resolved {
        /// Route distance in metres.
        distance_m: f64,
        /// Route duration in seconds.
        duration_s: f64,
    },
    /// The source could not resolve this destination.
    Unresolved,
}

impl ElementOutcome {
    /// Whether the element carries usable data.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Batched distance/duration lookup for one travel mode.
///
/// Implementations must return exactly one [`ElementOutcome`] per
/// destination, in input order, so `outcome[i]` always corresponds to
/// `destinations[i]`.
pub trait DistanceSource {
    /// Query distance and duration from `origin` to each destination.
    ///
    /// # Errors
    /// Returns [`DistanceSourceError`] when the whole request fails
    /// (network, timeout, malformed response). Per-destination
    /// failures are reported in-band as [`ElementOutcome::Unresolved`].
    fn batch_query(
        &self,
        origin: Coord<f64>,
        destinations: &[Coord<f64>],
        mode: TravelMode,
    ) -> Result<Vec<ElementOutcome>, DistanceSourceError>;
}

impl<S: DistanceSource + ?Sized> DistanceSource for Box<S> {
    fn batch_query(
        &self,
        origin: Coord<f64>,
        destinations: &[Coord<f64>],
        mode: TravelMode,
    ) -> Result<Vec<ElementOutcome>, DistanceSourceError> {
        (**self).batch_query(origin, destinations, mode)
    }
}

/// Stand-in source for offline operation.
///
/// Every query reports the source as unavailable, which routes the
/// calculator straight to the great-circle estimator.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExternalSource;

impl DistanceSource for NoExternalSource {
    fn batch_query(
        &self,
        _origin: Coord<f64>,
        _destinations: &[Coord<f64>],
        _mode: TravelMode,
    ) -> Result<Vec<ElementOutcome>, DistanceSourceError> {
        Err(DistanceSourceError::Unavailable)
    }
}
