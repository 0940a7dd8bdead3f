//! Behaviour tests for the analytics engine over the core metrics.

use nestwise_analytics::AnalyticsEngine;
use nestwise_core::test_support::{FailingPlugin, FixedScorePlugin, sample_candidate};
use nestwise_core::{
    AmenityKind, AmenitySet, Candidate, LegEstimate, RatedAmenity, TravelMode, TravelTimeBundle,
};
use rstest::{fixture, rstest};

const TOLERANCE: f64 = 1e-9;

/// Candidate A from the worked comparison: cheap, roomy, gym rated 4,
/// no travel data.
fn candidate_a() -> Candidate {
    sample_candidate("a", -0.2, 51.6)
        .with_rent_cents(150_000)
        .with_floor_area_sqft(900)
        .with_rooms(2, 1)
        .with_amenities(
            AmenitySet::default().with_amenity(
                AmenityKind::Gym,
                RatedAmenity::rated(AmenityKind::Gym, 4).expect("rating in range"),
            ),
        )
}

/// Candidate B: dearer and smaller, no amenities, but a 12-minute
/// commute with two modes under half an hour.
fn candidate_b() -> Candidate {
    let travel = TravelTimeBundle::default()
        .with_leg(
            TravelMode::Driving,
            LegEstimate::new(9_000.0, 12.0).expect("valid leg"),
        )
        .with_leg(
            TravelMode::Transit,
            LegEstimate::new(9_000.0, 25.0).expect("valid leg"),
        );
    sample_candidate("b", -0.3, 51.4)
        .with_rent_cents(200_000)
        .with_floor_area_sqft(700)
        .with_rooms(1, 1)
        .with_travel_times(travel)
}

#[fixture]
fn scenario() -> Vec<Candidate> {
    vec![candidate_a(), candidate_b()]
}

#[rstest]
fn worked_comparison_matches_the_documented_scores(mut scenario: Vec<Candidate>) {
    let mut engine = AnalyticsEngine::new();
    let report = engine.calculate(&mut scenario).expect("should calculate");

    let a = &report.scores["a"];
    let b = &report.scores["b"];

    // A has no travel data; B is under 15 minutes with the bonus
    // capped at the maximum.
    assert_eq!(a.plugin_score("commute-score"), Some(0.0));
    assert_eq!(b.plugin_score("commute-score"), Some(100.0));

    // A is the set minimum with the cheap bonus clamped; B is the
    // maximum and stays under the expensive-penalty threshold.
    assert_eq!(a.plugin_score("cost-score"), Some(100.0));
    assert_eq!(b.plugin_score("cost-score"), Some(0.0));

    // Gym rated 4 of 5 earns 16 points; B recorded nothing.
    assert_eq!(a.plugin_score("amenities-score"), Some(16.0));
    assert_eq!(b.plugin_score("amenities-score"), Some(0.0));

    // A: 50 relative + 10 minimum + 20 bedrooms + 5 bathrooms.
    assert_eq!(a.plugin_score("size-score"), Some(85.0));
    assert_eq!(b.plugin_score("size-score"), Some(25.0));
}

#[rstest]
fn all_scores_stay_in_bounds(mut scenario: Vec<Candidate>) {
    let mut engine = AnalyticsEngine::new();
    let report = engine.calculate(&mut scenario).expect("should calculate");

    for bundle in report.scores.values() {
        assert!((0.0..=100.0).contains(&bundle.overall));
        for score in bundle.by_plugin.values() {
            assert!((0.0..=100.0).contains(score));
        }
    }
}

#[rstest]
fn repeated_runs_are_deterministic(mut scenario: Vec<Candidate>) {
    let mut engine = AnalyticsEngine::new();
    let first = engine.calculate(&mut scenario).expect("should calculate");
    let second = engine.calculate(&mut scenario).expect("should calculate");

    assert_eq!(first.scores, second.scores);
    assert_eq!(first.ranking, second.ranking);
}

#[rstest]
fn overall_is_the_weighted_sum_of_plugin_scores() {
    let mut engine = AnalyticsEngine::bare();
    engine.register(FixedScorePlugin::new("p1", 80.0, 0.6));
    engine.register(FixedScorePlugin::new("p2", 40.0, 0.4));
    let mut candidates = vec![
        sample_candidate("a", -0.2, 51.6),
        sample_candidate("b", -0.3, 51.4),
    ];

    let report = engine.calculate(&mut candidates).expect("should calculate");

    let expected = 80.0_f64.mul_add(0.6, 40.0 * 0.4);
    for bundle in report.scores.values() {
        assert!((bundle.overall - expected).abs() < TOLERANCE);
    }
}

#[rstest]
fn broken_plugin_does_not_change_other_scores(mut scenario: Vec<Candidate>) {
    let mut engine = AnalyticsEngine::new();
    let baseline = engine.calculate(&mut scenario).expect("should calculate");

    engine.register(FailingPlugin);
    let mut again = vec![candidate_a(), candidate_b()];
    let with_failure = engine.calculate(&mut again).expect("should calculate");

    assert_eq!(baseline.scores, with_failure.scores);
    assert!(
        !with_failure
            .meta
            .plugins_executed
            .iter()
            .any(|id| id == "failing-plugin")
    );
}

#[rstest]
fn ranking_orders_by_overall_descending(mut scenario: Vec<Candidate>) {
    let mut engine = AnalyticsEngine::new();
    let report = engine.calculate(&mut scenario).expect("should calculate");

    // A: 0.3*0 + 0.3*100 + 0.2*16 + 0.2*85 = 50.2
    // B: 0.3*100 + 0.3*0 + 0.2*0 + 0.2*25 = 35.0
    assert_eq!(report.ranking[0].candidate_id, "a");
    assert_eq!(report.ranking[0].rank, 1);
    assert!((report.ranking[0].overall - 50.2).abs() < 1e-6);
    assert_eq!(report.ranking[1].candidate_id, "b");
    assert_eq!(report.ranking[1].rank, 2);
    assert!((report.ranking[1].overall - 35.0).abs() < 1e-6);
}

#[rstest]
fn insights_and_recommendations_are_merged(mut scenario: Vec<Candidate>) {
    let mut engine = AnalyticsEngine::new();
    let report = engine.calculate(&mut scenario).expect("should calculate");

    // Commute, cost, amenities and size each contribute, plus the
    // ranking summary.
    assert!(report.insights.iter().any(|i| i.contains("commute")));
    assert!(report.insights.iter().any(|i| i.contains("lowest rent")));
    assert!(report.insights.iter().any(|i| i.contains("ranks first")));
    assert!(!report.recommendations.is_empty());
}

#[rstest]
fn metadata_records_the_run(mut scenario: Vec<Candidate>) {
    let mut engine = AnalyticsEngine::new();
    let report = engine.calculate(&mut scenario).expect("should calculate");

    assert_eq!(report.meta.candidate_count, 2);
    assert_eq!(
        report.meta.plugins_executed,
        vec![
            "commute-score",
            "cost-score",
            "amenities-score",
            "size-score"
        ]
    );
}

#[rstest]
fn empty_candidate_set_is_a_valid_run() {
    let mut engine = AnalyticsEngine::new();
    let mut candidates: Vec<Candidate> = Vec::new();

    let report = engine.calculate(&mut candidates).expect("should calculate");

    assert!(report.scores.is_empty());
    assert!(report.ranking.is_empty());
    assert_eq!(report.meta.candidate_count, 0);
}
