//! Test-only doubles shared by unit and behaviour tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use geo::Coord;

use crate::{
    AnalyticsConfig, Candidate, CandidateKind, Clock, EngineEvent, EventSink, MetricScore,
    PluginError, PluginReport, ScorePlugin,
};

/// Manually advanced [`Clock`] for TTL tests.
///
/// Clones share the same underlying instant, so a test can hand one
/// clone to a cache and advance time through the other.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<u64>>,
}

impl ManualClock {
    /// Create a clock fixed at `now_ms`.
    #[must_use]
    pub fn at(now_ms: u64) -> Self {
        let clock = Self::default();
        clock.now_ms.set(now_ms);
        clock
    }

    /// Advance the shared instant by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.set(self.now_ms.get().saturating_add(delta_ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

/// [`EventSink`] that records every published event.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<EngineEvent>>>,
}

impl RecordingSink {
    /// Snapshot of the events published so far.
    #[must_use]
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.borrow().clone()
    }

    /// Whether an event satisfying `predicate` was published.
    pub fn saw(&self, predicate: impl Fn(&EngineEvent) -> bool) -> bool {
        self.events.borrow().iter().any(predicate)
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &EngineEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Plugin returning the same score for every candidate.
#[derive(Debug, Clone)]
pub struct FixedScorePlugin {
    id: String,
    score: f64,
    weight: f64,
}

impl FixedScorePlugin {
    /// Create a plugin with a fixed per-candidate score and weight.
    #[must_use]
    pub fn new(id: impl Into<String>, score: f64, weight: f64) -> Self {
        Self {
            id: id.into(),
            score,
            weight,
        }
    }
}

impl ScorePlugin for FixedScorePlugin {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Fixed"
    }

    fn calculate(
        &self,
        candidates: &[Candidate],
        _config: &AnalyticsConfig,
    ) -> Result<PluginReport, PluginError> {
        let scores = candidates
            .iter()
            .map(|_| MetricScore::new(self.score, "fixed score"))
            .collect();
        Ok(PluginReport::new(scores))
    }

    fn weight(&self, _config: &AnalyticsConfig) -> f64 {
        self.weight
    }
}

/// Plugin whose `calculate` always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingPlugin;

impl ScorePlugin for FailingPlugin {
    fn id(&self) -> &str {
        "failing-plugin"
    }

    fn name(&self) -> &str {
        "Failing"
    }

    fn calculate(
        &self,
        _candidates: &[Candidate],
        _config: &AnalyticsConfig,
    ) -> Result<PluginReport, PluginError> {
        Err(PluginError::new("failing-plugin", "always fails"))
    }
}

/// Minimal valid candidate for fixtures.
#[must_use]
pub fn sample_candidate(id: &str, lng: f64, lat: f64) -> Candidate {
    Candidate::new(
        id,
        format!("Listing {id}"),
        CandidateKind::Apartment,
        Coord { x: lng, y: lat },
    )
    .with_rent_cents(180_000)
    .with_floor_area_sqft(800)
    .with_rooms(2, 1)
}
