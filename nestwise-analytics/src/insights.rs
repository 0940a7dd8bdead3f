//! Engine-level observations over a finished ranking.

use crate::report::RankedCandidate;

/// Margin under which the top two candidates are called a close race.
const CLOSE_RACE_MARGIN: f64 = 5.0;

/// Summarise the ranking itself, complementing the per-metric
/// insights the plugins produce.
pub(crate) fn ranking_insights(ranking: &[RankedCandidate]) -> Vec<String> {
    let mut insights = Vec::new();
    let Some(top) = ranking.first() else {
        return insights;
    };
    insights.push(format!(
        "{} ranks first overall with a score of {:.0}",
        top.name, top.overall
    ));
    if let Some(runner_up) = ranking.get(1) {
        if (top.overall - runner_up.overall).abs() < CLOSE_RACE_MARGIN {
            insights.push(format!(
                "{} and {} are within {CLOSE_RACE_MARGIN:.0} points; compare individual factors",
                top.name, runner_up.name
            ));
        }
    }
    insights
}
