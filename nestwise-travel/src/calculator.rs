//! Batched travel-time computation with caching and fallback.
//!
//! The calculator answers "how long from the work location to each
//! candidate, per mode" without ever failing: the cache is consulted
//! first, the external source next, and a great-circle estimate covers
//! whatever the source could not resolve. External lookups are issued
//! in fixed-size batches with a pause between them so a large
//! comparison does not hammer the service.

use std::thread;
use std::time::Duration;

use geo::Coord;
use log::warn;
use nestwise_core::{
    Candidate, EngineEvent, EventSink, LegEstimate, LogSink, TravelMode, TravelTimeBundle,
    estimate_duration_min, great_circle_distance_m,
};

use crate::cache::TravelTimeCache;
use crate::source::{DistanceSource, ElementOutcome, MAX_BATCH_SIZE};

/// Pause between consecutive external batches.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(100);

/// Travel-time front end combining cache, external source and fallback
/// estimator.
pub struct TravelTimeCalculator {
    source: Box<dyn DistanceSource>,
    cache: TravelTimeCache,
    batch_delay: Duration,
    sink: Box<dyn EventSink>,
}

impl std::fmt::Debug for TravelTimeCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelTimeCalculator")
            .field("cache", &self.cache)
            .field("batch_delay", &self.batch_delay)
            .finish_non_exhaustive()
    }
}

impl TravelTimeCalculator {
    /// Create a calculator over `source` and `cache`.
    pub fn new(source: impl DistanceSource + 'static, cache: TravelTimeCache) -> Self {
        Self {
            source: Box::new(source),
            cache,
            batch_delay: DEFAULT_BATCH_DELAY,
            sink: Box::new(LogSink),
        }
    }

    /// Replace the pause between external batches. A zero delay skips
    /// sleeping entirely.
    #[must_use]
    pub fn with_batch_delay(mut self, batch_delay: Duration) -> Self {
        self.batch_delay = batch_delay;
        self
    }

    /// Replace the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Access the underlying cache.
    #[must_use]
    pub const fn cache(&self) -> &TravelTimeCache {
        &self.cache
    }

    /// Mutable access to the underlying cache, for invalidation and
    /// cleanup.
    pub const fn cache_mut(&mut self) -> &mut TravelTimeCache {
        &mut self.cache
    }

    /// Drop cached entries computed for `stale_origin`.
    ///
    /// Returns the number of entries removed. Call with the outgoing
    /// origin when the work location changes; without this, its entries
    /// stay until their TTL runs out.
    pub fn invalidate_stale_origin(&mut self, stale_origin: Coord<f64>) -> usize {
        let removed = self.cache.invalidate_by_origin(stale_origin);
        if removed > 0 {
            self.sink.publish(&EngineEvent::CacheInvalidated { removed });
        }
        removed
    }

    /// Empty the cache and reset its statistics.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.sink.publish(&EngineEvent::CacheCleared);
    }

    /// Compute one bundle per destination, in input order.
    ///
    /// Cached pairs are answered without touching the external source.
    /// The remainder is fetched in batches of at most [`MAX_BATCH_SIZE`]
    /// destinations, pausing between batches. Every destination gets a
    /// usable bundle; per-element and per-mode source failures fall
    /// back to the great-circle estimate.
    pub fn compute_batch(
        &mut self,
        origin: Coord<f64>,
        destinations: &[Coord<f64>],
    ) -> Vec<TravelTimeBundle> {
        let mut bundles: Vec<Option<TravelTimeBundle>> = destinations
            .iter()
            .map(|&destination| self.cache.get(origin, destination))
            .collect();

        let pending: Vec<usize> = (0..destinations.len())
            .filter(|&i| bundles[i].is_none())
            .collect();

        for (batch_index, chunk) in pending.chunks(MAX_BATCH_SIZE).enumerate() {
            if batch_index > 0 && !self.batch_delay.is_zero() {
                thread::sleep(self.batch_delay);
            }
            let chunk_destinations: Vec<Coord<f64>> =
                chunk.iter().map(|&i| destinations[i]).collect();
            let computed = self.compute_chunk(origin, &chunk_destinations);
            for (&i, bundle) in chunk.iter().zip(computed) {
                if bundle.is_computed() {
                    self.cache.set(origin, destinations[i], bundle);
                }
                bundles[i] = Some(bundle);
            }
        }

        bundles
            .into_iter()
            .map(|bundle| bundle.unwrap_or_default())
            .collect()
    }

    /// Compute the bundle for a single destination.
    pub fn compute_single(
        &mut self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> TravelTimeBundle {
        self.compute_batch(origin, &[destination])
            .first()
            .copied()
            .unwrap_or_default()
    }

    /// Attach travel times to each candidate for `origin`.
    ///
    /// Returns the number of candidates annotated. With no origin this
    /// is a no-op: candidates keep whatever travel times they already
    /// carry.
    pub fn annotate(&mut self, origin: Option<Coord<f64>>, candidates: &mut [Candidate]) -> usize {
        let Some(origin) = origin else {
            return 0;
        };
        let destinations: Vec<Coord<f64>> = candidates
            .iter()
            .map(|candidate| candidate.location)
            .collect();
        let bundles = self.compute_batch(origin, &destinations);
        for (candidate, bundle) in candidates.iter_mut().zip(bundles) {
            candidate.travel_times = Some(bundle);
        }
        candidates.len()
    }

    /// Query the external source for one chunk, all three modes.
    fn compute_chunk(
        &mut self,
        origin: Coord<f64>,
        destinations: &[Coord<f64>],
    ) -> Vec<TravelTimeBundle> {
        let mut bundles = vec![TravelTimeBundle::default(); destinations.len()];
        let mut resolved = 0_usize;
        let mut estimated = 0_usize;

        for mode in TravelMode::ALL {
            let outcomes = match self.source.batch_query(origin, destinations, mode) {
                Ok(outcomes) if outcomes.len() == destinations.len() => Some(outcomes),
                Ok(outcomes) => {
                    warn!(
                        "{} source returned {} outcomes for {} destinations, estimating instead",
                        mode.label(),
                        outcomes.len(),
                        destinations.len()
                    );
                    None
                }
                Err(err) => {
                    warn!("{} source failed, estimating instead: {err}", mode.label());
                    None
                }
            };
            if outcomes.is_none() {
                self.sink.publish(&EngineEvent::FallbackUsed { mode });
            }

            for (i, &destination) in destinations.iter().enumerate() {
                let leg = match outcomes.as_ref().map(|o| o[i]) {
                    Some(ElementOutcome::Resolved {
                        distance_m,
                        duration_s,
                    }) => match LegEstimate::new(distance_m, duration_s / 60.0) {
                        Ok(leg) => {
                            resolved += 1;
                            leg
                        }
                        Err(_) => {
                            estimated += 1;
                            Self::fallback_leg(origin, destination, mode)
                        }
                    },
                    Some(ElementOutcome::Unresolved) | None => {
                        estimated += 1;
                        Self::fallback_leg(origin, destination, mode)
                    }
                };
                bundles[i].set_leg(mode, leg);
            }
        }

        self.sink.publish(&EngineEvent::TravelTimesComputed {
            resolved,
            estimated,
        });
        bundles
    }

    /// Great-circle estimate for one leg.
    ///
    /// A degenerate distance (non-finite input coordinates) yields the
    /// unresolved zero leg rather than poisoning the bundle.
    fn fallback_leg(origin: Coord<f64>, destination: Coord<f64>, mode: TravelMode) -> LegEstimate {
        let distance_m = great_circle_distance_m(origin, destination);
        if !distance_m.is_finite() {
            return LegEstimate::ZERO;
        }
        let duration_min = estimate_duration_min(distance_m, mode);
        LegEstimate::new(distance_m, duration_min).unwrap_or(LegEstimate::ZERO)
    }
}
