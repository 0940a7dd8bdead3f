//! Plugin registry and calculation orchestrator.

use std::collections::BTreeMap;
use std::time::Instant;

use log::warn;
use nestwise_core::{
    AnalyticsConfig, Candidate, EngineEvent, EventSink, LogSink, NullSink, ScoreBundle,
    ScorePlugin, sanitise_score,
};

use crate::error::EngineError;
use crate::insights::ranking_insights;
use crate::metrics::{AmenityPlugin, CommutePlugin, CostPlugin, SizePlugin};
use crate::report::{AnalyticsReport, CalculationMeta, RankedCandidate};

/// Scoring engine: plugin registry, active configuration and the
/// single-flight calculation guard.
///
/// The four core metrics are pre-registered; [`Self::register`] adds
/// or replaces plugins for subsequent calculations. Registration,
/// removal and configuration updates never affect a calculation that
/// is already running.
pub struct AnalyticsEngine {
    plugins: Vec<Box<dyn ScorePlugin>>,
    config: AnalyticsConfig,
    in_flight: bool,
    sink: Box<dyn EventSink>,
}

impl std::fmt::Debug for AnalyticsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsEngine")
            .field("plugins", &self.plugin_ids())
            .field("config", &self.config)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsEngine {
    /// Create an engine with the four core metrics registered, the
    /// default configuration and a logging event sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: vec![
                Box::new(CommutePlugin),
                Box::new(CostPlugin),
                Box::new(AmenityPlugin),
                Box::new(SizePlugin),
            ],
            config: AnalyticsConfig::default(),
            in_flight: false,
            sink: Box::new(LogSink),
        }
    }

    /// Create an engine without any plugins or event reporting, for
    /// composing a fully custom registry.
    #[must_use]
    pub fn bare() -> Self {
        Self {
            plugins: Vec::new(),
            config: AnalyticsConfig::default(),
            in_flight: false,
            sink: Box::new(NullSink),
        }
    }

    /// Replace the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Register `plugin`, replacing any plugin with the same id.
    pub fn register(&mut self, plugin: impl ScorePlugin + 'static) {
        let id = plugin.id().to_owned();
        if let Some(existing) = self.plugins.iter_mut().find(|p| p.id() == id) {
            *existing = Box::new(plugin);
        } else {
            self.plugins.push(Box::new(plugin));
        }
        self.sink.publish(&EngineEvent::PluginRegistered { id });
    }

    /// Remove the plugin with `id`. Returns whether one was present.
    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.plugins.len();
        self.plugins.retain(|plugin| plugin.id() != id);
        let removed = self.plugins.len() < before;
        if removed {
            self.sink
                .publish(&EngineEvent::PluginUnregistered { id: id.to_owned() });
        }
        removed
    }

    /// Registered plugin ids, in execution order.
    #[must_use]
    pub fn plugin_ids(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.id()).collect()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Apply `config` if it validates; otherwise fall back to the
    /// defaults and report why.
    ///
    /// Returns the validation findings, empty when the configuration
    /// was accepted. Falling back rather than rejecting keeps a bad
    /// saved configuration from wedging the engine.
    pub fn update_config(&mut self, config: AnalyticsConfig) -> Vec<String> {
        let findings = config.validate();
        if findings.is_empty() {
            self.config = config;
            self.sink.publish(&EngineEvent::ConfigUpdated);
        } else {
            for finding in &findings {
                warn!("rejected analytics configuration: {finding}");
            }
            self.config = AnalyticsConfig::default();
            self.sink.publish(&EngineEvent::ConfigRejected {
                findings: findings.clone(),
            });
        }
        findings
    }

    /// Restore the default configuration.
    pub fn reset_config(&mut self) {
        self.config = AnalyticsConfig::default();
        self.sink.publish(&EngineEvent::ConfigUpdated);
    }

    /// Score, rank and summarise `candidates`, attaching a
    /// [`ScoreBundle`] to each.
    ///
    /// Failing plugins are skipped and reported through the event
    /// sink; their metric is simply absent from the results.
    ///
    /// # Errors
    /// Returns [`EngineError::CalculationInProgress`] when invoked
    /// re-entrantly while another calculation is running. `&mut self`
    /// already rules that out for direct callers; the explicit flag
    /// keeps the contract stable for drivers that hold the engine
    /// behind a shared handle and re-enter between suspension points.
    pub fn calculate(
        &mut self,
        candidates: &mut [Candidate],
    ) -> Result<AnalyticsReport, EngineError> {
        if self.in_flight {
            return Err(EngineError::CalculationInProgress);
        }
        self.in_flight = true;
        let report = self.run(candidates);
        self.in_flight = false;
        Ok(report)
    }

    fn run(&mut self, candidates: &mut [Candidate]) -> AnalyticsReport {
        let started = Instant::now();
        self.sink.publish(&EngineEvent::CalculationStarted {
            candidate_count: candidates.len(),
        });

        let mut overall = vec![0.0_f64; candidates.len()];
        let mut by_plugin: Vec<BTreeMap<String, f64>> =
            vec![BTreeMap::new(); candidates.len()];
        let mut insights = Vec::new();
        let mut recommendations = Vec::new();
        let mut plugins_executed = Vec::new();

        for plugin in &self.plugins {
            let report = match plugin.calculate(candidates, &self.config) {
                Ok(report) if report.scores.len() == candidates.len() => report,
                Ok(report) => {
                    let message = format!(
                        "returned {} scores for {} candidates",
                        report.scores.len(),
                        candidates.len()
                    );
                    warn!("plugin {} skipped: {message}", plugin.id());
                    self.sink.publish(&EngineEvent::PluginFailed {
                        id: plugin.id().to_owned(),
                        message,
                    });
                    continue;
                }
                Err(err) => {
                    warn!("plugin {} skipped: {err}", plugin.id());
                    self.sink.publish(&EngineEvent::PluginFailed {
                        id: plugin.id().to_owned(),
                        message: err.message,
                    });
                    continue;
                }
            };

            let weight = plugin.weight(&self.config);
            for (i, metric) in report.scores.iter().enumerate() {
                overall[i] += metric.score * weight;
                by_plugin[i].insert(plugin.id().to_owned(), metric.score);
            }
            insights.extend(report.insights);
            recommendations.extend(report.recommendations);
            plugins_executed.push(plugin.id().to_owned());
        }

        let mut scores = BTreeMap::new();
        for ((candidate, raw), per_plugin) in candidates.iter_mut().zip(overall).zip(by_plugin) {
            let bundle = ScoreBundle {
                overall: sanitise_score(raw),
                by_plugin: per_plugin,
            };
            scores.insert(candidate.id.clone(), bundle.clone());
            candidate.scores = Some(bundle);
        }

        let ranking = Self::rank(candidates);
        insights.extend(ranking_insights(&ranking));

        let duration_ms =
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.sink.publish(&EngineEvent::CalculationCompleted {
            candidate_count: candidates.len(),
            duration_ms,
        });

        AnalyticsReport {
            scores,
            ranking,
            insights,
            recommendations,
            meta: CalculationMeta {
                duration_ms,
                candidate_count: candidates.len(),
                plugins_executed,
            },
        }
    }

    /// Order candidates by overall score descending, rank 1 first.
    fn rank(candidates: &[Candidate]) -> Vec<RankedCandidate> {
        let mut ordered: Vec<(&Candidate, f64)> = candidates
            .iter()
            .map(|candidate| {
                let overall = candidate
                    .scores
                    .as_ref()
                    .map_or(0.0, |bundle| bundle.overall);
                (candidate, overall)
            })
            .collect();
        ordered.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        ordered
            .into_iter()
            .enumerate()
            .map(|(index, (candidate, overall))| RankedCandidate {
                rank: index + 1,
                candidate_id: candidate.id.clone(),
                name: candidate.name.clone(),
                overall,
            })
            .collect()
    }
}
