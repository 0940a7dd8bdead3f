//! Candidate listings under comparison.
//!
//! A [`Candidate`] is owned by the surrounding application; the engine
//! only reads it and annotates travel times and scores. Numeric
//! invariants (non-negative rent, area and room counts) are carried by
//! the unsigned field types; the remaining invariants are checked by
//! [`Candidate::validate`] at the boundary where external data enters.

use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AmenityError, AmenitySet, ScoreBundle, TravelTimeBundle};

/// Category of a candidate listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    /// Apartment in a multi-unit building.
    Apartment,
    /// Detached house.
    House,
    /// Condominium.
    Condo,
    /// Townhouse.
    Townhouse,
}

/// Errors returned by [`Candidate::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum CandidateError {
    /// The candidate id was empty.
    #[error("candidate id must not be empty")]
    EmptyId,
    /// The display name was empty.
    #[error("candidate name must not be empty")]
    EmptyName,
    /// The location was outside valid degree ranges or non-finite.
    #[error("candidate location ({lat}, {lng}) is not a valid coordinate")]
    InvalidLocation {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lng: f64,
    },
    /// An amenity invariant was violated.
    #[error(transparent)]
    Amenity(#[from] AmenityError),
}

/// A single listing under comparison.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use nestwise_core::{Candidate, CandidateKind};
///
/// let candidate = Candidate::new(
///     "maple-101",
///     "Maple Street 101",
///     CandidateKind::Apartment,
///     Coord { x: -122.4194, y: 37.7749 },
/// )
/// .with_rent_cents(185_000)
/// .with_floor_area_sqft(820)
/// .with_rooms(2, 1);
/// assert!(candidate.validate().is_ok());
/// assert_eq!(candidate.rent_dollars(), 1850.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Opaque identifier.
    pub id: String,
    /// Identifier of the owning user.
    #[serde(default)]
    pub owner: String,
    /// Display name.
    pub name: String,
    /// Listing category.
    pub kind: CandidateKind,
    /// Geographic position, `x` = longitude, `y` = latitude.
    pub location: Coord<f64>,
    /// Monthly rent in the smallest currency unit.
    #[serde(default)]
    pub rent_cents: u32,
    /// Floor area in square feet.
    #[serde(default)]
    pub floor_area_sqft: u32,
    /// Bedroom count.
    #[serde(default)]
    pub bedrooms: u8,
    /// Bathroom count.
    #[serde(default)]
    pub bathrooms: u8,
    /// Amenity record.
    #[serde(default)]
    pub amenities: AmenitySet,
    /// Travel times to the work location, once computed.
    #[serde(default)]
    pub travel_times: Option<TravelTimeBundle>,
    /// Scores from the last calculation, once computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<ScoreBundle>,
}

impl Candidate {
    /// Construct a candidate with empty numeric attributes.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: CandidateKind,
        location: Coord<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            owner: String::new(),
            name: name.into(),
            kind,
            location,
            rent_cents: 0,
            floor_area_sqft: 0,
            bedrooms: 0,
            bathrooms: 0,
            amenities: AmenitySet::default(),
            travel_times: None,
            scores: None,
        }
    }

    /// Builder-style owner id.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Builder-style monthly rent in cents.
    #[must_use]
    pub const fn with_rent_cents(mut self, rent_cents: u32) -> Self {
        self.rent_cents = rent_cents;
        self
    }

    /// Builder-style floor area in square feet.
    #[must_use]
    pub const fn with_floor_area_sqft(mut self, floor_area_sqft: u32) -> Self {
        self.floor_area_sqft = floor_area_sqft;
        self
    }

    /// Builder-style room counts.
    #[must_use]
    pub const fn with_rooms(mut self, bedrooms: u8, bathrooms: u8) -> Self {
        self.bedrooms = bedrooms;
        self.bathrooms = bathrooms;
        self
    }

    /// Builder-style amenity record.
    #[must_use]
    pub const fn with_amenities(mut self, amenities: AmenitySet) -> Self {
        self.amenities = amenities;
        self
    }

    /// Builder-style travel-time bundle.
    #[must_use]
    pub const fn with_travel_times(mut self, travel_times: TravelTimeBundle) -> Self {
        self.travel_times = Some(travel_times);
        self
    }

    /// Monthly rent in whole currency units.
    #[must_use]
    pub fn rent_dollars(&self) -> f64 {
        f64::from(self.rent_cents) / 100.0
    }

    /// Check the boundary invariants of a record built from external
    /// input.
    ///
    /// # Errors
    /// Returns the first [`CandidateError`] found.
    pub fn validate(&self) -> Result<(), CandidateError> {
        if self.id.trim().is_empty() {
            return Err(CandidateError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(CandidateError::EmptyName);
        }
        let (lat, lng) = (self.location.y, self.location.x);
        if !lat.is_finite() || !lng.is_finite() || lat.abs() > 90.0 || lng.abs() > 180.0 {
            return Err(CandidateError::InvalidLocation { lat, lng });
        }
        self.amenities.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn sample() -> Candidate {
        Candidate::new(
            "maple-101",
            "Maple Street 101",
            CandidateKind::Apartment,
            Coord {
                x: -122.4194,
                y: 37.7749,
            },
        )
        .with_rent_cents(185_000)
        .with_floor_area_sqft(820)
        .with_rooms(2, 1)
    }

    #[rstest]
    fn valid_candidate_passes(sample: Candidate) {
        assert!(sample.validate().is_ok());
    }

    #[rstest]
    fn empty_id_is_rejected(mut sample: Candidate) {
        sample.id = "  ".to_owned();
        assert_eq!(sample.validate(), Err(CandidateError::EmptyId));
    }

    #[rstest]
    fn empty_name_is_rejected(mut sample: Candidate) {
        sample.name = String::new();
        assert_eq!(sample.validate(), Err(CandidateError::EmptyName));
    }

    #[rstest]
    #[case(91.0, 0.0)]
    #[case(0.0, -181.0)]
    #[case(f64::NAN, 0.0)]
    fn out_of_range_location_is_rejected(
        mut sample: Candidate,
        #[case] lat: f64,
        #[case] lng: f64,
    ) {
        sample.location = Coord { x: lng, y: lat };
        assert!(matches!(
            sample.validate(),
            Err(CandidateError::InvalidLocation { .. })
        ));
    }

    #[rstest]
    fn location_error_reports_the_offending_coordinates(mut sample: Candidate) {
        sample.location = Coord { x: -0.1, y: 95.5 };
        assert_eq!(
            sample.validate(),
            Err(CandidateError::InvalidLocation {
                lat: 95.5,
                lng: -0.1
            })
        );
    }

    #[rstest]
    fn deserialised_record_is_validated_at_the_boundary() {
        let json = r#"{
            "id": "oak-12",
            "name": "Oak Avenue 12",
            "kind": "condo",
            "location": { "x": -122.27, "y": 37.80 },
            "rent_cents": 210000,
            "amenities": { "gym": { "present": false, "rating": 3 } }
        }"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();
        assert!(matches!(
            candidate.validate(),
            Err(CandidateError::Amenity(_))
        ));
    }

    #[rstest]
    fn optional_fields_default_on_deserialisation() {
        let json = r#"{
            "id": "oak-12",
            "name": "Oak Avenue 12",
            "kind": "house",
            "location": { "x": -122.27, "y": 37.80 }
        }"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.rent_cents, 0);
        assert!(candidate.travel_times.is_none());
        assert!(candidate.scores.is_none());
    }
}
