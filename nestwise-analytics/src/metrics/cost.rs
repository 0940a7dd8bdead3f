//! Cost metric.
//!
//! Rent is normalised within the candidate set, with the set maximum
//! clamped to the configured rent ceiling so one extreme listing does
//! not compress every other score. A near-cheapest bonus and an
//! absolute-expensiveness penalty then adjust the relative base; the
//! penalty keys off the configured ceiling, not the set, so a
//! uniformly expensive set cannot make everything look cheap. The
//! base is clamped before the adjustments and the sum is clamped
//! again at the end; the intermediate interplay is a product decision
//! and is preserved as is.

use nestwise_core::{
    AnalyticsConfig, Candidate, MetricScore, PluginError, PluginReport, ScorePlugin,
};

/// Rent within 110% of the set minimum earns the bonus.
const CHEAP_BONUS_FACTOR: f64 = 1.1;
const CHEAP_BONUS: f64 = 10.0;

/// Rent at or above 80% of the configured ceiling takes the penalty.
const EXPENSIVE_PENALTY_FACTOR: f64 = 0.8;
const EXPENSIVE_PENALTY: f64 = 15.0;

/// Scores candidates by monthly rent, relative to the set.
#[derive(Debug, Default, Clone, Copy)]
pub struct CostPlugin;

impl CostPlugin {
    fn score_candidate(
        candidate: &Candidate,
        min_rent: f64,
        clamped_max: f64,
        ceiling: f64,
    ) -> MetricScore {
        if candidate.rent_cents == 0 {
            return MetricScore::no_data("No rent recorded");
        }
        let rent = f64::from(candidate.rent_cents);

        let base = if clamped_max <= min_rent {
            100.0
        } else {
            (100.0 * (clamped_max - rent) / (clamped_max - min_rent)).clamp(0.0, 100.0)
        };

        let mut score = base;
        let mut factors = vec![format!(
            "${:.0}/month scores {base:.0} relative to the set",
            candidate.rent_dollars()
        )];
        if rent <= min_rent * CHEAP_BONUS_FACTOR {
            score += CHEAP_BONUS;
            factors.push(format!("+{CHEAP_BONUS:.0} near the cheapest in the set"));
        }
        if rent >= ceiling * EXPENSIVE_PENALTY_FACTOR {
            score -= EXPENSIVE_PENALTY;
            factors.push(format!(
                "-{EXPENSIVE_PENALTY:.0} close to the ${:.0} rent ceiling",
                ceiling / 100.0
            ));
        }

        let descriptor = if base >= 80.0 {
            "affordable within this set"
        } else if base >= 50.0 {
            "mid-range within this set"
        } else {
            "expensive within this set"
        };
        let mut metric = MetricScore::new(
            score,
            format!(
                "Rent is ${:.0}/month ({descriptor})",
                candidate.rent_dollars()
            ),
        );
        metric.factors = factors;
        metric
    }
}

impl ScorePlugin for CostPlugin {
    fn id(&self) -> &str {
        "cost-score"
    }

    fn name(&self) -> &str {
        "Cost"
    }

    fn description(&self) -> &str {
        "Monthly rent relative to the other candidates"
    }

    fn calculate(
        &self,
        candidates: &[Candidate],
        config: &AnalyticsConfig,
    ) -> Result<PluginReport, PluginError> {
        let rents: Vec<f64> = candidates
            .iter()
            .filter(|candidate| candidate.rent_cents > 0)
            .map(|candidate| f64::from(candidate.rent_cents))
            .collect();
        let min_rent = rents.iter().copied().fold(f64::INFINITY, f64::min);
        let max_rent = rents.iter().copied().fold(0.0, f64::max);
        let ceiling = f64::from(config.thresholds.max_rent_cents);
        let clamped_max = max_rent.min(ceiling);

        let scores = candidates
            .iter()
            .map(|candidate| Self::score_candidate(candidate, min_rent, clamped_max, ceiling))
            .collect();
        let mut report = PluginReport::new(scores);

        let cheapest = candidates
            .iter()
            .filter(|candidate| candidate.rent_cents > 0)
            .min_by_key(|candidate| candidate.rent_cents);
        if let Some(candidate) = cheapest {
            report = report
                .with_insight(format!(
                    "{} has the lowest rent at ${:.0}/month",
                    candidate.name,
                    candidate.rent_dollars()
                ))
                .with_recommendation(format!("Consider {} for value", candidate.name));
        }
        Ok(report)
    }

    fn weight(&self, config: &AnalyticsConfig) -> f64 {
        config.weights.cost
    }
}

#[cfg(test)]
mod tests {
    use nestwise_core::test_support::sample_candidate;
    use rstest::rstest;

    use super::*;

    fn with_rent(id: &str, rent_cents: u32) -> Candidate {
        let mut candidate = sample_candidate(id, -0.2, 51.6);
        candidate.rent_cents = rent_cents;
        candidate
    }

    fn scores_for(rents: &[u32]) -> Vec<MetricScore> {
        let candidates: Vec<Candidate> = rents
            .iter()
            .enumerate()
            .map(|(i, &rent)| with_rent(&format!("c{i}"), rent))
            .collect();
        CostPlugin
            .calculate(&candidates, &AnalyticsConfig::default())
            .unwrap()
            .scores
    }

    #[rstest]
    fn cheapest_scores_highest() {
        let scores = scores_for(&[150_000, 200_000, 250_000]);
        assert_eq!(scores[0].score, 100.0);
        assert!(scores[0].score > scores[1].score);
        assert!(scores[1].score > scores[2].score);
    }

    #[rstest]
    fn equal_rents_all_score_full_base() {
        let scores = scores_for(&[180_000, 180_000]);
        // Base 100 plus the cheap bonus, clamped.
        assert_eq!(scores[0].score, 100.0);
        assert_eq!(scores[1].score, 100.0);
    }

    #[rstest]
    fn zero_rent_scores_zero_with_reason() {
        let scores = scores_for(&[0, 180_000]);
        assert_eq!(scores[0].score, 0.0);
        assert!(scores[0].explanation.contains("No rent"));
        // The zero-rent record does not drag the set minimum down.
        assert_eq!(scores[1].score, 100.0);
    }

    #[rstest]
    fn expensive_penalty_applies_near_the_ceiling() {
        // Default ceiling is 300000 cents; 80% is 240000.
        let scores = scores_for(&[150_000, 250_000]);
        assert!(scores[1].factors.iter().any(|f| f.contains("ceiling")));
        assert_eq!(scores[1].score, 0.0);
    }

    #[rstest]
    fn outlier_above_ceiling_does_not_compress_the_rest() {
        // The 500000 outlier is clamped to the 300000 ceiling before
        // the range is computed.
        let scores = scores_for(&[150_000, 200_000, 500_000]);
        let spread_score = scores[1].score;

        let without_outlier = scores_for(&[150_000, 200_000, 300_000]);
        assert_eq!(spread_score, without_outlier[1].score);
    }

    #[rstest]
    fn scenario_two_candidates() {
        // $1500 vs $2000 with a $3000 ceiling: the cheaper one takes
        // 100 plus the bonus (clamped), the dearer one takes base 0
        // and no penalty since 200000 < 240000.
        let scores = scores_for(&[150_000, 200_000]);
        assert_eq!(scores[0].score, 100.0);
        assert_eq!(scores[1].score, 0.0);
    }

    #[rstest]
    fn lowering_rent_never_lowers_the_score() {
        let before = scores_for(&[180_000, 220_000]);
        let after = scores_for(&[170_000, 220_000]);
        assert!(after[0].score >= before[0].score);
    }
}
