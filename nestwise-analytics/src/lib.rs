//! Scoring and ranking engine for the Nestwise comparison tool.
//!
//! The [`AnalyticsEngine`] runs every registered [`ScorePlugin`] over a
//! candidate set, combines the per-metric scores into a weighted
//! overall score per candidate, ranks the set, and merges the plugins'
//! human-readable insights. The four core metrics (commute, cost,
//! amenities, size) ship pre-registered; further plugins can be added
//! and removed at runtime.
//!
//! [`ScorePlugin`]: nestwise_core::ScorePlugin

#![forbid(unsafe_code)]

mod engine;
mod error;
mod insights;
pub mod metrics;
mod report;

pub use engine::AnalyticsEngine;
pub use error::EngineError;
pub use report::{AnalyticsReport, CalculationMeta, RankedCandidate};
