//! Score values produced by the analytics plugins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Upper bound of every metric and overall score.
pub const MAX_SCORE: f64 = 100.0;

/// Clamp and validate a raw score.
///
/// Returns `0.0` for non-finite values and clamps to `0.0..=100.0`.
#[must_use]
pub fn sanitise_score(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    raw.clamp(0.0, MAX_SCORE)
}

/// One plugin's score for one candidate, with the user-facing rationale.
///
/// The explanation is a required output: a sentinel score of zero for
/// missing data is only distinguishable from a genuinely poor score
/// through its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricScore {
    /// Score in `0.0..=100.0`.
    pub score: f64,
    /// Human-readable rationale embedding the computed values.
    pub explanation: String,
    /// Per-factor breakdown lines.
    pub factors: Vec<String>,
}

impl MetricScore {
    /// Build a score, sanitising the raw value.
    #[must_use]
    pub fn new(raw: f64, explanation: impl Into<String>) -> Self {
        Self {
            score: sanitise_score(raw),
            explanation: explanation.into(),
            factors: Vec::new(),
        }
    }

    /// The "score of ignorance": zero with an explanatory reason.
    #[must_use]
    pub fn no_data(reason: impl Into<String>) -> Self {
        Self::new(0.0, reason)
    }

    /// Append a factor line while consuming `self`, enabling chaining.
    #[must_use]
    pub fn with_factor(mut self, factor: impl Into<String>) -> Self {
        self.factors.push(factor.into());
        self
    }
}

/// Overall and per-plugin scores attached to a candidate after a
/// calculation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBundle {
    /// Weighted overall score in `0.0..=100.0`.
    pub overall: f64,
    /// Score per plugin id.
    pub by_plugin: BTreeMap<String, f64>,
}

impl ScoreBundle {
    /// Score for one plugin, if that plugin ran.
    #[must_use]
    pub fn plugin_score(&self, plugin_id: &str) -> Option<f64> {
        self.by_plugin.get(plugin_id).copied()
    }
}
