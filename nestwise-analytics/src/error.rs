//! Engine-level errors.

use thiserror::Error;

/// Errors returned by [`AnalyticsEngine`] operations.
///
/// Per-plugin failures are not errors; the engine skips the failing
/// plugin and keeps going. The one escalated case is a re-entrant
/// calculation, where proceeding would interleave writes to shared
/// score state.
///
/// [`AnalyticsEngine`]: crate::AnalyticsEngine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A calculation was requested while another is still running.
    #[error("an analytics calculation is already in progress")]
    CalculationInProgress,
}
