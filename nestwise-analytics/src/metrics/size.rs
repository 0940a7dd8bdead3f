//! Size metric.
//!
//! Floor area is normalised within the candidate set to at most 50
//! points; bedrooms, bathrooms and meeting the configured minimum
//! area add fixed points on top, with a final clamp to 100.

use nestwise_core::{
    AnalyticsConfig, Candidate, MetricScore, PluginError, PluginReport, ScorePlugin,
};

/// Ceiling of the relative floor-area component.
const AREA_POINTS: f64 = 50.0;

/// Bonus for meeting the configured minimum floor area.
const MIN_AREA_BONUS: f64 = 10.0;

const POINTS_PER_BEDROOM: f64 = 10.0;
const MAX_CREDITED_BEDROOMS: u8 = 3;
const POINTS_PER_BATHROOM: f64 = 5.0;
const MAX_CREDITED_BATHROOMS: u8 = 2;

/// Scores candidates by floor area and room counts.
#[derive(Debug, Default, Clone, Copy)]
pub struct SizePlugin;

impl SizePlugin {
    fn score_candidate(
        candidate: &Candidate,
        min_area: f64,
        max_area: f64,
        min_threshold: f64,
    ) -> MetricScore {
        if candidate.floor_area_sqft == 0 {
            return MetricScore::no_data("No floor area recorded");
        }
        let area = f64::from(candidate.floor_area_sqft);

        let base = if max_area <= min_area {
            AREA_POINTS
        } else {
            (AREA_POINTS * (area - min_area) / (max_area - min_area)).clamp(0.0, AREA_POINTS)
        };

        let mut score = base;
        let mut factors = vec![format!(
            "{area:.0} sqft scores {base:.0} of {AREA_POINTS:.0} relative to the set"
        )];
        if area >= min_threshold {
            score += MIN_AREA_BONUS;
            factors.push(format!(
                "+{MIN_AREA_BONUS:.0} at or above the {min_threshold:.0} sqft minimum"
            ));
        }

        let credited_bedrooms = candidate.bedrooms.min(MAX_CREDITED_BEDROOMS);
        if credited_bedrooms > 0 {
            let earned = f64::from(credited_bedrooms) * POINTS_PER_BEDROOM;
            score += earned;
            factors.push(format!("{credited_bedrooms} bedrooms (+{earned:.0})"));
        }
        let credited_bathrooms = candidate.bathrooms.min(MAX_CREDITED_BATHROOMS);
        if credited_bathrooms > 0 {
            let earned = f64::from(credited_bathrooms) * POINTS_PER_BATHROOM;
            score += earned;
            factors.push(format!("{credited_bathrooms} bathrooms (+{earned:.0})"));
        }

        let mut metric = MetricScore::new(
            score,
            format!(
                "{area:.0} sqft, {} bed / {} bath",
                candidate.bedrooms, candidate.bathrooms
            ),
        );
        metric.factors = factors;
        metric
    }
}

impl ScorePlugin for SizePlugin {
    fn id(&self) -> &str {
        "size-score"
    }

    fn name(&self) -> &str {
        "Size"
    }

    fn description(&self) -> &str {
        "Floor area and room counts"
    }

    fn calculate(
        &self,
        candidates: &[Candidate],
        config: &AnalyticsConfig,
    ) -> Result<PluginReport, PluginError> {
        let areas: Vec<f64> = candidates
            .iter()
            .filter(|candidate| candidate.floor_area_sqft > 0)
            .map(|candidate| f64::from(candidate.floor_area_sqft))
            .collect();
        let min_area = areas.iter().copied().fold(f64::INFINITY, f64::min);
        let max_area = areas.iter().copied().fold(0.0, f64::max);
        let min_threshold = f64::from(config.thresholds.min_floor_area_sqft);

        let scores = candidates
            .iter()
            .map(|candidate| Self::score_candidate(candidate, min_area, max_area, min_threshold))
            .collect();
        let mut report = PluginReport::new(scores);

        let largest = candidates
            .iter()
            .filter(|candidate| candidate.floor_area_sqft > 0)
            .max_by_key(|candidate| candidate.floor_area_sqft);
        if let Some(candidate) = largest {
            report = report.with_insight(format!(
                "{} is the largest at {} sqft",
                candidate.name, candidate.floor_area_sqft
            ));
        }
        Ok(report)
    }

    fn weight(&self, config: &AnalyticsConfig) -> f64 {
        config.weights.size
    }
}
