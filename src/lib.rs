//! Facade crate for the Nestwise housing-comparison engine.
//!
//! This crate re-exports the core domain types, the travel-time
//! subsystem and the analytics engine so applications can depend on a
//! single crate.

#![forbid(unsafe_code)]

pub use geo::Coord;
pub use nestwise_analytics::{
    AnalyticsEngine, AnalyticsReport, CalculationMeta, EngineError, RankedCandidate, metrics,
};
pub use nestwise_core::{
    AmenityKind, AmenitySet, AnalyticsConfig, Candidate, CandidateError, CandidateKind, Clock,
    EngineEvent, EventSink, KeyValueStore, Laundry, LegEstimate, LogSink, MemoryStore, MetricScore,
    MetricWeights, NullSink, PluginError, PluginReport, RatedAmenity, ScoreBundle, ScorePlugin,
    ScoreThresholds, StoreError, SystemClock, TravelMode, TravelTimeBundle, estimate_duration_min,
    great_circle_distance_m,
};
pub use nestwise_travel::{
    CacheStats, DistanceSource, DistanceSourceError, ElementOutcome, HttpDistanceSource,
    HttpDistanceSourceConfig, NoExternalSource, SourceBuildError, TravelTimeCache,
    TravelTimeCalculator,
};
