//! The four core scoring metrics.
//!
//! Each metric is a [`ScorePlugin`] that maps every candidate to a
//! score in `0.0..=100.0` with an explanation users can read as the
//! rationale. Missing data scores zero with a reason rather than
//! failing; the only way to tell "unknown" from "poor" is the text.
//!
//! [`ScorePlugin`]: nestwise_core::ScorePlugin

mod amenity;
mod commute;
mod cost;
mod size;

pub use amenity::AmenityPlugin;
pub use commute::CommutePlugin;
pub use cost::CostPlugin;
pub use size::SizePlugin;
