//! Analytics configuration: metric weights and scoring thresholds.
//!
//! Validation is soft by design: [`AnalyticsConfig::validate`] returns
//! human-readable findings and leaves the caller to decide whether to
//! reject or fall back to defaults. The engine falls back to defaults
//! and reports the findings through its event sink.

use serde::{Deserialize, Serialize};

/// Allowed deviation of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Relative importance of each core metric.
///
/// Each weight lies in `[0.0, 1.0]` and the four are expected to sum
/// to 1.0 within [`WEIGHT_SUM_TOLERANCE`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricWeights {
    /// Weight of the commute score.
    pub commute: f64,
    /// Weight of the cost score.
    pub cost: f64,
    /// Weight of the amenities score.
    pub amenities: f64,
    /// Weight of the size score.
    pub size: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            commute: 0.3,
            cost: 0.3,
            amenities: 0.2,
            size: 0.2,
        }
    }
}

impl MetricWeights {
    /// Sum of the four weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.commute + self.cost + self.amenities + self.size
    }

    fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("commute", self.commute),
            ("cost", self.cost),
            ("amenities", self.amenities),
            ("size", self.size),
        ]
    }
}

/// Absolute thresholds used by individual scoring algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreThresholds {
    /// Longest commute, in minutes, still considered acceptable.
    pub max_commute_min: f64,
    /// Rent ceiling in cents; also clamps the cost normalisation range
    /// so one extreme listing does not compress every other score.
    pub max_rent_cents: u32,
    /// Smallest acceptable floor area in square feet.
    pub min_floor_area_sqft: u32,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            max_commute_min: 45.0,
            max_rent_cents: 300_000,
            min_floor_area_sqft: 600,
        }
    }
}

/// Active analytics configuration: weights plus thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Metric weights.
    pub weights: MetricWeights,
    /// Scoring thresholds.
    pub thresholds: ScoreThresholds,
}

impl AnalyticsConfig {
    /// Check the configuration and describe every problem found.
    ///
    /// An empty result means the configuration is usable. Callers
    /// choose the enforcement policy; the engine logs the findings and
    /// falls back to defaults.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut findings = Vec::new();
        for (name, weight) in self.weights.entries() {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                findings.push(format!(
                    "{name} weight {weight} must be between 0.0 and 1.0"
                ));
            }
        }
        let sum = self.weights.sum();
        if !sum.is_finite() || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            findings.push(format!("metric weights sum to {sum:.3}, expected 1.0"));
        }
        if !self.thresholds.max_commute_min.is_finite() || self.thresholds.max_commute_min <= 0.0 {
            findings.push(format!(
                "max commute threshold {} must be a positive number of minutes",
                self.thresholds.max_commute_min
            ));
        }
        if self.thresholds.max_rent_cents == 0 {
            findings.push("max rent threshold must be positive".to_owned());
        }
        if self.thresholds.min_floor_area_sqft == 0 {
            findings.push("min floor area threshold must be positive".to_owned());
        }
        findings
    }

    /// Whether [`Self::validate`] finds no problems.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_config_is_valid() {
        let config = AnalyticsConfig::default();
        assert!(config.validate().is_empty());
        assert!((config.weights.sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
    }

    #[rstest]
    fn out_of_range_weight_is_reported() {
        let mut config = AnalyticsConfig::default();
        config.weights.cost = 1.4;
        let findings = config.validate();
        assert!(findings.iter().any(|f| f.contains("cost weight")));
    }

    #[rstest]
    fn bad_weight_sum_is_reported() {
        let mut config = AnalyticsConfig::default();
        config.weights.commute = 0.1;
        let findings = config.validate();
        assert!(findings.iter().any(|f| f.contains("sum to")));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    fn non_positive_commute_threshold_is_reported(#[case] threshold: f64) {
        let mut config = AnalyticsConfig::default();
        config.thresholds.max_commute_min = threshold;
        assert!(!config.is_valid());
    }

    #[rstest]
    fn zero_rent_threshold_is_reported() {
        let mut config = AnalyticsConfig::default();
        config.thresholds.max_rent_cents = 0;
        assert!(!config.is_valid());
    }

    #[rstest]
    fn weight_sum_within_tolerance_passes() {
        let mut config = AnalyticsConfig::default();
        config.weights.commute = 0.305;
        config.weights.cost = 0.3;
        // Sum is 1.005, inside the 0.01 tolerance.
        assert!(config.is_valid());
    }
}
