//! Typed amenity model for candidates.
//!
//! The amenity payload is a concrete tagged structure rather than a
//! free-form map: rated amenities (gym, pool, outdoor space) enforce
//! the "rating implies presence" and 1–5 range invariants at
//! construction, and again via [`AmenitySet::validate`] for records
//! deserialised from external input.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three amenities that carry an optional 1–5 rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmenityKind {
    /// On-site gym.
    Gym,
    /// Pool.
    Pool,
    /// Balcony, patio, garden or shared outdoor space.
    OutdoorSpace,
}

impl AmenityKind {
    /// All rated amenity kinds.
    pub const ALL: [Self; 3] = [Self::Gym, Self::Pool, Self::OutdoorSpace];

    /// Human-readable label used in explanations.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gym => "gym",
            Self::Pool => "pool",
            Self::OutdoorSpace => "outdoor space",
        }
    }
}

impl fmt::Display for AmenityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors raised by amenity constructors and [`AmenitySet::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmenityError {
    /// A rating fell outside the 1–5 range.
    #[error("rating {rating} for {kind} must be between 1 and 5")]
    RatingOutOfRange {
        /// Amenity the rating belongs to.
        kind: AmenityKind,
        /// Offending rating value.
        rating: u8,
    },
    /// A rating was supplied for an amenity not marked present.
    #[error("{kind} carries a rating but is not marked present")]
    RatingWithoutPresence {
        /// Amenity the rating belongs to.
        kind: AmenityKind,
    },
}

/// Presence flag plus optional 1–5 rating for one amenity.
///
/// Fields are private so the invariants (rating in range, rating
/// implies presence) hold for values built through the constructors.
/// Deserialised values are re-checked by [`AmenitySet::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RatedAmenity {
    present: bool,
    rating: Option<u8>,
}

impl RatedAmenity {
    /// Amenity not offered.
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            present: false,
            rating: None,
        }
    }

    /// Amenity offered but not yet rated.
    #[must_use]
    pub const fn present() -> Self {
        Self {
            present: true,
            rating: None,
        }
    }

    /// Amenity offered with a rating.
    ///
    /// # Errors
    /// Returns [`AmenityError::RatingOutOfRange`] unless
    /// `rating` is in `1..=5`.
    pub fn rated(kind: AmenityKind, rating: u8) -> Result<Self, AmenityError> {
        if !(1..=5).contains(&rating) {
            return Err(AmenityError::RatingOutOfRange { kind, rating });
        }
        Ok(Self {
            present: true,
            rating: Some(rating),
        })
    }

    /// Whether the amenity is offered.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.present
    }

    /// Rating, when one was given.
    #[must_use]
    pub const fn rating(&self) -> Option<u8> {
        self.rating
    }

    fn validate(&self, kind: AmenityKind) -> Result<(), AmenityError> {
        if let Some(rating) = self.rating {
            if !self.present {
                return Err(AmenityError::RatingWithoutPresence { kind });
            }
            if !(1..=5).contains(&rating) {
                return Err(AmenityError::RatingOutOfRange { kind, rating });
            }
        }
        Ok(())
    }
}

/// Laundry arrangement for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Laundry {
    /// Washer and dryer inside the unit.
    InUnit,
    /// Shared machines in the building.
    Building,
    /// No laundry on site.
    #[default]
    None,
}

/// The full amenity record for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AmenitySet {
    /// Dedicated parking available.
    pub parking: bool,
    /// Laundry arrangement.
    pub laundry: Laundry,
    /// Pets allowed.
    pub pets_allowed: bool,
    /// Gym presence and rating.
    pub gym: RatedAmenity,
    /// Pool presence and rating.
    pub pool: RatedAmenity,
    /// Outdoor-space presence and rating.
    pub outdoor_space: RatedAmenity,
}

impl AmenitySet {
    /// Return the rated amenity for `kind`.
    #[must_use]
    pub const fn get(&self, kind: AmenityKind) -> RatedAmenity {
        match kind {
            AmenityKind::Gym => self.gym,
            AmenityKind::Pool => self.pool,
            AmenityKind::OutdoorSpace => self.outdoor_space,
        }
    }

    /// Builder-style parking flag.
    #[must_use]
    pub const fn with_parking(mut self, parking: bool) -> Self {
        self.parking = parking;
        self
    }

    /// Builder-style laundry arrangement.
    #[must_use]
    pub const fn with_laundry(mut self, laundry: Laundry) -> Self {
        self.laundry = laundry;
        self
    }

    /// Builder-style pets flag.
    #[must_use]
    pub const fn with_pets_allowed(mut self, pets_allowed: bool) -> Self {
        self.pets_allowed = pets_allowed;
        self
    }

    /// Builder-style rated amenity.
    #[must_use]
    pub const fn with_amenity(mut self, kind: AmenityKind, amenity: RatedAmenity) -> Self {
        match kind {
            AmenityKind::Gym => self.gym = amenity,
            AmenityKind::Pool => self.pool = amenity,
            AmenityKind::OutdoorSpace => self.outdoor_space = amenity,
        }
        self
    }

    /// Re-check invariants for a record built outside the constructors
    /// (typically deserialised input).
    ///
    /// # Errors
    /// Returns the first [`AmenityError`] found across the rated
    /// amenities.
    pub fn validate(&self) -> Result<(), AmenityError> {
        for kind in AmenityKind::ALL {
            self.get(kind).validate(kind)?;
        }
        Ok(())
    }
}
