//! Travel-time computation for the Nestwise engine.
//!
//! The crate provides three pieces:
//! - the [`DistanceSource`] abstraction over an external batched
//!   distance/duration service, with an OSRM-style HTTP implementation
//!   and an always-offline stand-in;
//! - a [`TravelTimeCache`] with TTL expiry, capacity-bounded eviction
//!   and write-through persistence to a [`KeyValueStore`];
//! - a [`TravelTimeCalculator`] that batches lookups, isolates
//!   per-element failures, and degrades to a great-circle estimate per
//!   (destination, mode) when the external source fails.
//!
//! [`KeyValueStore`]: nestwise_core::KeyValueStore

#![forbid(unsafe_code)]

mod cache;
mod calculator;
pub mod source;

pub use cache::{CACHE_TTL_MS, CacheEntry, CacheStats, MAX_CACHE_ENTRIES, TravelTimeCache};
pub use calculator::{DEFAULT_BATCH_DELAY, TravelTimeCalculator};
pub use source::{
    DistanceSource, DistanceSourceError, ElementOutcome, HttpDistanceSource,
    HttpDistanceSourceConfig, MAX_BATCH_SIZE, NoExternalSource, SourceBuildError,
};
