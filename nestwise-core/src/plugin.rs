//! The scoring-plugin capability.
//!
//! A [`ScorePlugin`] scores every candidate in a comparison set and
//! reports its own weight for the overall aggregation. Carrying the
//! weight on the plugin keeps third-party plugins first class: the
//! engine never matches on well-known plugin ids.

use thiserror::Error;

use crate::{AnalyticsConfig, Candidate, MetricScore};

/// Weight used by plugins that do not override [`ScorePlugin::weight`].
///
/// Third-party plugins contribute to the overall score without
/// requiring a configuration update.
pub const DEFAULT_PLUGIN_WEIGHT: f64 = 0.25;

/// A scoring plugin failed for the whole calculation.
///
/// The engine catches this, logs it, and continues with the remaining
/// plugins.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("plugin {plugin} failed: {message}")]
pub struct PluginError {
    /// Identifier of the failing plugin.
    pub plugin: String,
    /// Human-readable failure description.
    pub message: String,
}

impl PluginError {
    /// Build an error for `plugin`.
    #[must_use]
    pub fn new(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            message: message.into(),
        }
    }
}

/// Output of one plugin over one candidate set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PluginReport {
    /// One score per candidate, index-aligned with the input slice.
    pub scores: Vec<MetricScore>,
    /// Set-level observations ("Maple Street has the shortest commute").
    pub insights: Vec<String>,
    /// Set-level suggestions ("consider Maple Street for value").
    pub recommendations: Vec<String>,
}

impl PluginReport {
    /// Build a report from per-candidate scores.
    #[must_use]
    pub fn new(scores: Vec<MetricScore>) -> Self {
        Self {
            scores,
            insights: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    /// Append an insight while consuming `self`, enabling chaining.
    #[must_use]
    pub fn with_insight(mut self, insight: impl Into<String>) -> Self {
        self.insights.push(insight.into());
        self
    }

    /// Append a recommendation while consuming `self`.
    #[must_use]
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendations.push(recommendation.into());
        self
    }
}

/// Score a candidate set for one metric.
///
/// Implementations must be pure over their inputs: no external calls
/// and no hidden state. Travel times are attached to candidates before
/// the commute plugin runs. Scores must already be sanitised into
/// `0.0..=100.0`; use [`MetricScore::new`], which clamps.
///
/// # Examples
///
/// ```
/// use nestwise_core::{
///     AnalyticsConfig, Candidate, MetricScore, PluginError, PluginReport, ScorePlugin,
/// };
///
/// struct FlatScore;
///
/// impl ScorePlugin for FlatScore {
///     fn id(&self) -> &str {
///         "flat-score"
///     }
///     fn name(&self) -> &str {
///         "Flat"
///     }
///     fn calculate(
///         &self,
///         candidates: &[Candidate],
///         _config: &AnalyticsConfig,
///     ) -> Result<PluginReport, PluginError> {
///         let scores = candidates
///             .iter()
///             .map(|_| MetricScore::new(50.0, "flat"))
///             .collect();
///         Ok(PluginReport::new(scores))
///     }
/// }
///
/// let report = FlatScore
///     .calculate(&[], &AnalyticsConfig::default())
///     .unwrap();
/// assert!(report.scores.is_empty());
/// ```
pub trait ScorePlugin {
    /// Stable identifier, e.g. `"commute-score"`.
    fn id(&self) -> &str;

    /// Display name for result tables.
    fn name(&self) -> &str;

    /// One-line description of what the metric measures.
    fn description(&self) -> &str {
        ""
    }

    /// Score every candidate in `candidates`.
    ///
    /// The returned report's `scores` must be index-aligned with the
    /// input; a mismatch is treated as a plugin failure by the engine.
    ///
    /// # Errors
    /// Returns [`PluginError`] when the plugin cannot produce scores at
    /// all; per-candidate missing data is expressed as a sentinel score
    /// instead.
    fn calculate(
        &self,
        candidates: &[Candidate],
        config: &AnalyticsConfig,
    ) -> Result<PluginReport, PluginError>;

    /// Weight of this plugin in the overall score.
    fn weight(&self, config: &AnalyticsConfig) -> f64 {
        let _ = config;
        DEFAULT_PLUGIN_WEIGHT
    }
}
