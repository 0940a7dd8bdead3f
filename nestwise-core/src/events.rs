//! Fire-and-forget change notifications.
//!
//! The engine and travel subsystem publish named events through an
//! injected [`EventSink`] owned by the caller; nothing is required to
//! listen. This replaces ambient global broadcast with an explicit
//! seam so tests can record the stream.

use crate::TravelMode;

/// Notifications emitted by the engine and the travel subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A calculation began.
    CalculationStarted {
        /// Number of candidates under comparison.
        candidate_count: usize,
    },
    /// A calculation finished.
    CalculationCompleted {
        /// Number of candidates scored.
        candidate_count: usize,
        /// Wall-clock duration of the calculation.
        duration_ms: u64,
    },
    /// A plugin was added to the registry.
    PluginRegistered {
        /// Plugin identifier.
        id: String,
    },
    /// A plugin was removed from the registry.
    PluginUnregistered {
        /// Plugin identifier.
        id: String,
    },
    /// A plugin failed during a calculation and was skipped.
    PluginFailed {
        /// Plugin identifier.
        id: String,
        /// Failure description.
        message: String,
    },
    /// A new configuration took effect.
    ConfigUpdated,
    /// A configuration was rejected and defaults were applied instead.
    ConfigRejected {
        /// Validation findings that caused the rejection.
        findings: Vec<String>,
    },
    /// Travel times were computed for a destination batch.
    TravelTimesComputed {
        /// Legs resolved by the external source.
        resolved: usize,
        /// Legs resolved by the fallback estimator.
        estimated: usize,
    },
    /// The fallback estimator replaced the external source for a mode.
    FallbackUsed {
        /// Mode that fell back.
        mode: TravelMode,
    },
    /// The travel-time cache was emptied.
    CacheCleared,
    /// Cache entries for a stale origin were dropped.
    CacheInvalidated {
        /// Number of entries removed.
        removed: usize,
    },
}

/// Receiver of [`EngineEvent`] notifications.
///
/// Publishing must never fail or block; sinks that forward elsewhere
/// swallow their own errors.
pub trait EventSink {
    /// Deliver one event.
    fn publish(&self, event: &EngineEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: &EngineEvent) {}
}

/// Sink that forwards events to the `log` facade at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&self, event: &EngineEvent) {
        log::debug!("engine event: {event:?}");
    }
}
