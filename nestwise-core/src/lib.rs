//! Core domain types for the Nestwise housing-comparison engine.
//!
//! These models provide basic validation to keep downstream components
//! honest. Constructors return `Result` to surface invalid input early;
//! loosely typed records entering from the outside (forms, JSON files)
//! are validated at the boundary via [`Candidate::validate`].
//!
//! The crate also defines the seams the engine is assembled from: the
//! [`ScorePlugin`] scoring capability, the [`KeyValueStore`] persistence
//! abstraction, the [`Clock`] time source, and the [`EventSink`]
//! notification channel. All of them are traits so tests can substitute
//! deterministic implementations.

#![forbid(unsafe_code)]

mod amenity;
mod candidate;
mod clock;
mod config;
mod distance;
mod events;
mod plugin;
mod score;
mod store;
mod travel_time;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use amenity::{AmenityError, AmenityKind, AmenitySet, Laundry, RatedAmenity};
pub use candidate::{Candidate, CandidateError, CandidateKind};
pub use clock::{Clock, SystemClock};
pub use config::{
    AnalyticsConfig, MetricWeights, ScoreThresholds, WEIGHT_SUM_TOLERANCE,
};
pub use distance::{estimate_duration_min, great_circle_distance_m};
pub use events::{EngineEvent, EventSink, LogSink, NullSink};
pub use plugin::{DEFAULT_PLUGIN_WEIGHT, PluginError, PluginReport, ScorePlugin};
pub use score::{MAX_SCORE, MetricScore, ScoreBundle, sanitise_score};
pub use store::{KeyValueStore, MemoryStore, StoreError};
pub use travel_time::{LegEstimate, LegEstimateError, TravelMode, TravelTimeBundle};
