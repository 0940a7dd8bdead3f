//! Commute metric.
//!
//! Scores the fastest travel mode through a step function rather than
//! a continuous curve, matching the good/fair/poor buckets people
//! actually reason in, and rewards modal flexibility with a bonus when
//! at least two modes stay under half an hour.

use nestwise_core::{
    AnalyticsConfig, Candidate, MetricScore, PluginError, PluginReport, ScorePlugin,
    TravelTimeBundle,
};

/// Duration under which a mode counts towards the flexibility bonus.
const FLEXIBLE_LIMIT_MIN: f64 = 30.0;

/// Bonus for having at least two modes within the flexible limit.
const FLEXIBILITY_BONUS: f64 = 10.0;

/// Step score for the best commute duration.
const fn step_score(best_min: f64) -> f64 {
    if best_min <= 15.0 {
        100.0
    } else if best_min <= 30.0 {
        85.0
    } else if best_min <= 45.0 {
        70.0
    } else if best_min <= 60.0 {
        50.0
    } else {
        25.0
    }
}

const fn bucket_label(best_min: f64) -> &'static str {
    if best_min <= 15.0 {
        "excellent"
    } else if best_min <= 30.0 {
        "good"
    } else if best_min <= 45.0 {
        "fair"
    } else if best_min <= 60.0 {
        "long"
    } else {
        "very long"
    }
}

/// Scores candidates by their fastest commute mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommutePlugin;

impl CommutePlugin {
    fn score_candidate(bundle: Option<&TravelTimeBundle>) -> MetricScore {
        let Some(best) = bundle.and_then(TravelTimeBundle::best_duration_min) else {
            return MetricScore::no_data("No travel time data available");
        };
        let base = step_score(best);
        let flexible = bundle.map_or(0, |b| b.modes_within(FLEXIBLE_LIMIT_MIN));

        let mut score = base;
        let mut result_factors = vec![format!(
            "{best:.0} min best commute scores {base:.0} ({})",
            bucket_label(best)
        )];
        if flexible >= 2 {
            score += FLEXIBILITY_BONUS;
            result_factors.push(format!(
                "+{FLEXIBILITY_BONUS:.0} flexibility bonus: {flexible} modes within {FLEXIBLE_LIMIT_MIN:.0} min"
            ));
        }

        let mut metric = MetricScore::new(
            score,
            format!("Best commute is {best:.0} min ({})", bucket_label(best)),
        );
        metric.factors = result_factors;
        metric
    }
}

impl ScorePlugin for CommutePlugin {
    fn id(&self) -> &str {
        "commute-score"
    }

    fn name(&self) -> &str {
        "Commute"
    }

    fn description(&self) -> &str {
        "Travel time to work across walking, driving and transit"
    }

    fn calculate(
        &self,
        candidates: &[Candidate],
        _config: &AnalyticsConfig,
    ) -> Result<PluginReport, PluginError> {
        let scores = candidates
            .iter()
            .map(|candidate| Self::score_candidate(candidate.travel_times.as_ref()))
            .collect();
        let mut report = PluginReport::new(scores);

        let shortest = candidates
            .iter()
            .filter_map(|candidate| {
                candidate
                    .travel_times
                    .as_ref()
                    .and_then(TravelTimeBundle::best_duration_min)
                    .map(|best| (candidate, best))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b));
        if let Some((candidate, best)) = shortest {
            report = report.with_insight(format!(
                "{} has the shortest commute at {best:.0} min",
                candidate.name
            ));
            if best <= FLEXIBLE_LIMIT_MIN {
                report = report.with_recommendation(format!(
                    "Consider {} for an easy commute",
                    candidate.name
                ));
            }
        }
        Ok(report)
    }

    fn weight(&self, config: &AnalyticsConfig) -> f64 {
        config.weights.commute
    }
}

#[cfg(test)]
mod tests {
    use nestwise_core::test_support::sample_candidate;
    use nestwise_core::{LegEstimate, TravelMode};
    use rstest::rstest;

    use super::*;

    fn bundle_with_best(best_min: f64) -> TravelTimeBundle {
        TravelTimeBundle::default().with_leg(
            TravelMode::Driving,
            LegEstimate::new(best_min * 1000.0, best_min).unwrap(),
        )
    }

    #[rstest]
    #[case(10.0, 100.0)]
    #[case(15.0, 100.0)]
    #[case(16.0, 85.0)]
    #[case(30.0, 85.0)]
    #[case(45.0, 70.0)]
    #[case(60.0, 50.0)]
    #[case(90.0, 25.0)]
    fn step_function_buckets(#[case] best: f64, #[case] expected: f64) {
        let score = CommutePlugin::score_candidate(Some(&bundle_with_best(best)));
        assert_eq!(score.score, expected);
    }

    #[rstest]
    fn missing_bundle_scores_zero_with_reason() {
        let score = CommutePlugin::score_candidate(None);
        assert_eq!(score.score, 0.0);
        assert!(score.explanation.contains("No travel time data"));
    }

    #[rstest]
    fn unresolved_bundle_counts_as_no_data() {
        let score = CommutePlugin::score_candidate(Some(&TravelTimeBundle::default()));
        assert_eq!(score.score, 0.0);
    }

    #[rstest]
    fn flexibility_bonus_applies_with_two_fast_modes() {
        let bundle = TravelTimeBundle::default()
            .with_leg(
                TravelMode::Driving,
                LegEstimate::new(10_000.0, 12.0).unwrap(),
            )
            .with_leg(
                TravelMode::Transit,
                LegEstimate::new(10_000.0, 28.0).unwrap(),
            );
        let score = CommutePlugin::score_candidate(Some(&bundle));
        // 12 min scores 100; the bonus is capped at the maximum.
        assert_eq!(score.score, 100.0);
        assert!(score.factors.iter().any(|f| f.contains("flexibility")));
    }

    #[rstest]
    fn bonus_lifts_a_sub_maximum_score() {
        let bundle = TravelTimeBundle::default()
            .with_leg(
                TravelMode::Driving,
                LegEstimate::new(18_000.0, 20.0).unwrap(),
            )
            .with_leg(
                TravelMode::Transit,
                LegEstimate::new(18_000.0, 29.0).unwrap(),
            );
        let score = CommutePlugin::score_candidate(Some(&bundle));
        assert_eq!(score.score, 95.0);
    }

    #[rstest]
    fn shorter_best_time_never_scores_lower() {
        let faster = CommutePlugin::score_candidate(Some(&bundle_with_best(20.0)));
        let slower = CommutePlugin::score_candidate(Some(&bundle_with_best(50.0)));
        assert!(faster.score >= slower.score);
    }

    #[rstest]
    fn insight_names_the_shortest_commute() {
        let mut a = sample_candidate("a", -0.2, 51.6);
        a.travel_times = Some(bundle_with_best(25.0));
        let mut b = sample_candidate("b", -0.3, 51.4);
        b.travel_times = Some(bundle_with_best(12.0));

        let report = CommutePlugin
            .calculate(&[a, b], &AnalyticsConfig::default())
            .unwrap();

        assert!(report.insights[0].contains("Listing b"));
        assert!(!report.recommendations.is_empty());
    }
}
