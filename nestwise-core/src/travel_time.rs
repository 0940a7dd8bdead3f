//! Per-mode travel estimates attached to candidates.
//!
//! A [`TravelTimeBundle`] holds one [`LegEstimate`] per [`TravelMode`].
//! A bundle whose durations are all zero is treated as "not yet
//! computed": a genuinely zero-duration trip cannot occur because every
//! real leg has a positive distance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mode of travel between the work location and a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// On foot.
    Walking,
    /// By car.
    Driving,
    /// Public transport.
    Transit,
}

impl TravelMode {
    /// All modes, in the order estimates are computed and reported.
    pub const ALL: [Self; 3] = [Self::Walking, Self::Driving, Self::Transit];

    /// Average speed in metres per minute used by the fallback
    /// estimator.
    ///
    /// Driving already includes a traffic fudge factor and transit
    /// includes typical wait time. These are documented approximations,
    /// not routing results.
    #[must_use]
    pub const fn average_speed_m_per_min(self) -> f64 {
        match self {
            Self::Walking => 80.0,
            Self::Driving => 1000.0,
            Self::Transit => 300.0,
        }
    }

    /// Human-readable label used in explanations.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Driving => "driving",
            Self::Transit => "transit",
        }
    }
}

/// Errors returned by [`LegEstimate::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LegEstimateError {
    /// Distance was negative or non-finite.
    #[error("leg distance must be a finite, non-negative number of metres")]
    InvalidDistance,
    /// Duration was negative or non-finite.
    #[error("leg duration must be a finite, non-negative number of minutes")]
    InvalidDuration,
}

/// Distance and duration for one travel mode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LegEstimate {
    /// Travel distance in metres.
    pub distance_m: f64,
    /// Travel duration in minutes.
    pub duration_min: f64,
}

impl LegEstimate {
    /// The unresolved leg: zero distance, zero duration.
    pub const ZERO: Self = Self {
        distance_m: 0.0,
        duration_min: 0.0,
    };

    /// Validates and constructs a [`LegEstimate`].
    ///
    /// # Errors
    /// Returns [`LegEstimateError`] when either field is negative or
    /// non-finite.
    pub fn new(distance_m: f64, duration_min: f64) -> Result<Self, LegEstimateError> {
        if !distance_m.is_finite() || distance_m < 0.0 {
            return Err(LegEstimateError::InvalidDistance);
        }
        if !duration_min.is_finite() || duration_min < 0.0 {
            return Err(LegEstimateError::InvalidDuration);
        }
        Ok(Self {
            distance_m,
            duration_min,
        })
    }

    /// Whether this leg carries a usable duration.
    ///
    /// A zero duration marks a leg that could not be resolved, not an
    /// instantaneous trip.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.duration_min > 0.0
    }
}

/// Travel estimates for all three modes between one origin and one
/// candidate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TravelTimeBundle {
    /// Walking estimate.
    pub walking: LegEstimate,
    /// Driving estimate.
    pub driving: LegEstimate,
    /// Transit estimate.
    pub transit: LegEstimate,
}

impl TravelTimeBundle {
    /// Return the leg for `mode`.
    #[must_use]
    pub const fn leg(&self, mode: TravelMode) -> LegEstimate {
        match mode {
            TravelMode::Walking => self.walking,
            TravelMode::Driving => self.driving,
            TravelMode::Transit => self.transit,
        }
    }

    /// Replace the leg for `mode`.
    pub const fn set_leg(&mut self, mode: TravelMode, leg: LegEstimate) {
        match mode {
            TravelMode::Walking => self.walking = leg,
            TravelMode::Driving => self.driving = leg,
            TravelMode::Transit => self.transit = leg,
        }
    }

    /// Builder-style variant of [`Self::set_leg`].
    #[must_use]
    pub const fn with_leg(mut self, mode: TravelMode, leg: LegEstimate) -> Self {
        self.set_leg(mode, leg);
        self
    }

    /// Whether any mode was resolved.
    ///
    /// An all-zero bundle means "travel time unknown", never "zero
    /// travel time".
    #[must_use]
    pub fn is_computed(&self) -> bool {
        TravelMode::ALL.iter().any(|&m| self.leg(m).is_resolved())
    }

    /// Fastest resolved duration across modes, in minutes.
    ///
    /// Unresolved legs (zero duration) are ignored; returns `None` when
    /// no mode resolved.
    #[must_use]
    pub fn best_duration_min(&self) -> Option<f64> {
        TravelMode::ALL
            .iter()
            .map(|&m| self.leg(m))
            .filter(LegEstimate::is_resolved)
            .map(|leg| leg.duration_min)
            .min_by(f64::total_cmp)
    }

    /// Number of resolved modes with a duration at or under
    /// `limit_min` minutes.
    #[must_use]
    pub fn modes_within(&self, limit_min: f64) -> usize {
        TravelMode::ALL
            .iter()
            .map(|&m| self.leg(m))
            .filter(|leg| leg.is_resolved() && leg.duration_min <= limit_min)
            .count()
    }
}
