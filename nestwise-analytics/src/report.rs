//! Calculation results.

use std::collections::BTreeMap;

use nestwise_core::ScoreBundle;
use serde::Serialize;

/// One candidate's position in the overall ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    /// Rank starting at 1 for the best overall score.
    pub rank: usize,
    /// Candidate identifier.
    pub candidate_id: String,
    /// Candidate display name.
    pub name: String,
    /// Weighted overall score in `0.0..=100.0`.
    pub overall: f64,
}

/// Bookkeeping about one calculation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationMeta {
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
    /// Number of candidates scored.
    pub candidate_count: usize,
    /// Identifiers of the plugins that produced scores, in execution
    /// order. Failed plugins are absent.
    pub plugins_executed: Vec<String>,
}

/// Full output of one [`AnalyticsEngine::calculate`] run.
///
/// [`AnalyticsEngine::calculate`]: crate::AnalyticsEngine::calculate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    /// Overall and per-plugin scores keyed by candidate id.
    pub scores: BTreeMap<String, ScoreBundle>,
    /// Candidates ordered best first.
    pub ranking: Vec<RankedCandidate>,
    /// Set-level observations merged across plugins and the engine.
    pub insights: Vec<String>,
    /// Set-level suggestions merged across plugins.
    pub recommendations: Vec<String>,
    /// Run bookkeeping.
    pub meta: CalculationMeta,
}

impl AnalyticsReport {
    /// Overall score for one candidate, if it was scored.
    #[must_use]
    pub fn overall(&self, candidate_id: &str) -> Option<f64> {
        self.scores.get(candidate_id).map(|bundle| bundle.overall)
    }
}
