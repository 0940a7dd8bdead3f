//! Amenity metric.
//!
//! Additive point scheme with a 100-point ceiling: fixed points for
//! the basic amenities (parking, laundry, pets) and rating-scaled
//! points for gym, pool and outdoor space. A present-but-unrated
//! amenity earns partial credit; presence is informative on its own.

use nestwise_core::{
    AmenityKind, AmenitySet, AnalyticsConfig, Candidate, Laundry, MetricScore, PluginError,
    PluginReport, ScorePlugin,
};

const PARKING_POINTS: f64 = 10.0;
const IN_UNIT_LAUNDRY_POINTS: f64 = 15.0;
const BUILDING_LAUNDRY_POINTS: f64 = 8.0;
const PETS_POINTS: f64 = 5.0;

/// Full points for a rated amenity at the top rating.
const RATED_AMENITY_POINTS: f64 = 20.0;

/// Credit fraction for a present but unrated amenity.
const UNRATED_CREDIT: f64 = 0.6;

/// Scores candidates by their amenity set.
#[derive(Debug, Default, Clone, Copy)]
pub struct AmenityPlugin;

impl AmenityPlugin {
    fn score_candidate(amenities: &AmenitySet) -> MetricScore {
        let mut points = 0.0;
        let mut factors = Vec::new();

        if amenities.parking {
            points += PARKING_POINTS;
            factors.push(format!("parking (+{PARKING_POINTS:.0})"));
        }
        match amenities.laundry {
            Laundry::InUnit => {
                points += IN_UNIT_LAUNDRY_POINTS;
                factors.push(format!("in-unit laundry (+{IN_UNIT_LAUNDRY_POINTS:.0})"));
            }
            Laundry::Building => {
                points += BUILDING_LAUNDRY_POINTS;
                factors.push(format!("building laundry (+{BUILDING_LAUNDRY_POINTS:.0})"));
            }
            Laundry::None => {}
        }
        if amenities.pets_allowed {
            points += PETS_POINTS;
            factors.push(format!("pets allowed (+{PETS_POINTS:.0})"));
        }

        for kind in AmenityKind::ALL {
            let amenity = amenities.get(kind);
            if !amenity.is_present() {
                continue;
            }
            if let Some(rating) = amenity.rating() {
                let earned = f64::from(rating) / 5.0 * RATED_AMENITY_POINTS;
                points += earned;
                factors.push(format!("{kind} rated {rating}/5 (+{earned:.0})"));
            } else {
                let earned = RATED_AMENITY_POINTS * UNRATED_CREDIT;
                points += earned;
                factors.push(format!("{kind} present, unrated (+{earned:.0})"));
            }
        }

        let explanation = if factors.is_empty() {
            "No amenities recorded".to_owned()
        } else {
            format!("{} amenities contribute {points:.0} points", factors.len())
        };
        let mut metric = MetricScore::new(points, explanation);
        metric.factors = factors;
        metric
    }
}

impl ScorePlugin for AmenityPlugin {
    fn id(&self) -> &str {
        "amenities-score"
    }

    fn name(&self) -> &str {
        "Amenities"
    }

    fn description(&self) -> &str {
        "Parking, laundry, pets and rated on-site amenities"
    }

    fn calculate(
        &self,
        candidates: &[Candidate],
        _config: &AnalyticsConfig,
    ) -> Result<PluginReport, PluginError> {
        let scores: Vec<MetricScore> = candidates
            .iter()
            .map(|candidate| Self::score_candidate(&candidate.amenities))
            .collect();
        let mut report = PluginReport::new(scores);

        let best = candidates
            .iter()
            .zip(&report.scores)
            .filter(|(_, score)| score.score > 0.0)
            .max_by(|(_, a), (_, b)| a.score.total_cmp(&b.score));
        if let Some((candidate, score)) = best {
            report.insights.push(format!(
                "{} has the best amenity package ({:.0} points)",
                candidate.name, score.score
            ));
        }
        Ok(report)
    }

    fn weight(&self, config: &AnalyticsConfig) -> f64 {
        config.weights.amenities
    }
}

#[cfg(test)]
mod tests {
    use nestwise_core::RatedAmenity;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn empty_set_scores_zero() {
        let score = AmenityPlugin::score_candidate(&AmenitySet::default());
        assert_eq!(score.score, 0.0);
        assert_eq!(score.explanation, "No amenities recorded");
    }

    #[rstest]
    fn basic_amenities_sum_to_thirty() {
        let set = AmenitySet::default()
            .with_parking(true)
            .with_laundry(Laundry::InUnit)
            .with_pets_allowed(true);
        // 10 parking + 15 in-unit laundry + 5 pets.
        assert_eq!(AmenityPlugin::score_candidate(&set).score, 30.0);
    }

    #[rstest]
    #[case(Laundry::InUnit, 15.0)]
    #[case(Laundry::Building, 8.0)]
    #[case(Laundry::None, 0.0)]
    fn laundry_points(#[case] laundry: Laundry, #[case] expected: f64) {
        let set = AmenitySet::default().with_laundry(laundry);
        assert_eq!(AmenityPlugin::score_candidate(&set).score, expected);
    }

    #[rstest]
    #[case(1, 4.0)]
    #[case(4, 16.0)]
    #[case(5, 20.0)]
    fn rated_amenity_scales_with_rating(#[case] rating: u8, #[case] expected: f64) {
        let set = AmenitySet::default().with_amenity(
            AmenityKind::Gym,
            RatedAmenity::rated(AmenityKind::Gym, rating).unwrap(),
        );
        assert_eq!(AmenityPlugin::score_candidate(&set).score, expected);
    }

    #[rstest]
    fn unrated_presence_earns_partial_credit() {
        let set = AmenitySet::default().with_amenity(AmenityKind::Pool, RatedAmenity::present());
        assert_eq!(AmenityPlugin::score_candidate(&set).score, 12.0);
    }

    #[rstest]
    fn full_set_sums_basic_and_rated_points() {
        let mut set = AmenitySet::default()
            .with_parking(true)
            .with_laundry(Laundry::InUnit)
            .with_pets_allowed(true);
        for kind in AmenityKind::ALL {
            set = set.with_amenity(kind, RatedAmenity::rated(kind, 5).unwrap());
        }
        // 30 basic + 60 rated.
        assert_eq!(AmenityPlugin::score_candidate(&set).score, 90.0);
    }
}
