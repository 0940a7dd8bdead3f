//! Great-circle distance and degraded duration estimates.
//!
//! These helpers back the fallback path of the travel-time calculator:
//! when the external distance source is unavailable, a commute is
//! approximated as the Haversine distance at a fixed average speed per
//! mode. This is an explicit approximation, not routing.

use geo::Coord;

use crate::TravelMode;

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance between two coordinates, in metres.
///
/// Coordinates are degree pairs with `x` = longitude and `y` =
/// latitude. The result is non-negative for finite input; non-finite
/// input (for example a NaN latitude from an unresolved geocode)
/// propagates, and callers must treat a non-finite result as unusable.
#[must_use]
pub fn great_circle_distance_m(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lat_a = a.y.to_radians();
    let lat_b = b.y.to_radians();
    let d_lat = (b.y - a.y).to_radians();
    let d_lng = (b.x - a.x).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Estimate a trip duration in whole minutes from a distance.
///
/// Uses the per-mode average-speed table on [`TravelMode`]: walking
/// 80 m/min, driving 1000 m/min, transit 300 m/min. The result is
/// rounded to the nearest minute, so very short distances round to
/// zero and the resulting leg reads as unresolved.
#[must_use]
pub fn estimate_duration_min(distance_m: f64, mode: TravelMode) -> f64 {
    (distance_m / mode.average_speed_m_per_min()).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    const EPSILON_FRACTION: f64 = 0.01;

    fn coord(lng: f64, lat: f64) -> Coord<f64> {
        Coord { x: lng, y: lat }
    }

    #[rstest]
    fn zero_distance_for_identical_points() {
        let p = coord(-122.4194, 37.7749);
        assert_eq!(great_circle_distance_m(p, p), 0.0);
    }

    #[rstest]
    // One degree of latitude is roughly 111.2 km everywhere.
    #[case(coord(0.0, 0.0), coord(0.0, 1.0), 111_195.0)]
    // One degree of longitude at the equator matches the latitude case.
    #[case(coord(0.0, 0.0), coord(1.0, 0.0), 111_195.0)]
    // Pole to equator along a meridian is a quarter of the circumference.
    #[case(coord(0.0, 90.0), coord(0.0, 0.0), 10_007_543.0)]
    fn known_distances(
        #[case] a: Coord<f64>,
        #[case] b: Coord<f64>,
        #[case] expected_m: f64,
    ) {
        let got = great_circle_distance_m(a, b);
        let tolerance = expected_m * EPSILON_FRACTION;
        assert!(
            (got - expected_m).abs() < tolerance,
            "expected ~{expected_m} m, got {got} m"
        );
    }

    #[rstest]
    fn distance_is_symmetric() {
        let a = coord(-122.4194, 37.7749);
        let b = coord(-122.2712, 37.8044);
        let forward = great_circle_distance_m(a, b);
        let back = great_circle_distance_m(b, a);
        assert!((forward - back).abs() < 1e-6);
    }

    #[rstest]
    fn nan_input_propagates() {
        let a = coord(f64::NAN, 37.0);
        let b = coord(-122.0, 37.0);
        assert!(great_circle_distance_m(a, b).is_nan());
    }

    #[rstest]
    #[case(TravelMode::Walking, 1_600.0, 20.0)]
    #[case(TravelMode::Driving, 10_000.0, 10.0)]
    #[case(TravelMode::Transit, 3_000.0, 10.0)]
    fn durations_follow_speed_table(
        #[case] mode: TravelMode,
        #[case] distance_m: f64,
        #[case] expected_min: f64,
    ) {
        assert_eq!(estimate_duration_min(distance_m, mode), expected_min);
    }

    #[rstest]
    fn tiny_distances_round_to_zero() {
        assert_eq!(estimate_duration_min(10.0, TravelMode::Driving), 0.0);
    }

    proptest! {
        #[test]
        fn distance_is_non_negative_and_symmetric(
            lng_a in -180.0f64..=180.0,
            lat_a in -90.0f64..=90.0,
            lng_b in -180.0f64..=180.0,
            lat_b in -90.0f64..=90.0,
        ) {
            let a = coord(lng_a, lat_a);
            let b = coord(lng_b, lat_b);
            let forward = great_circle_distance_m(a, b);
            prop_assert!(forward >= 0.0);
            prop_assert!((forward - great_circle_distance_m(b, a)).abs() < 1e-6);
        }
    }
}
