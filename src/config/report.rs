use serde::{Deserialize, Serialize};

use super::validation::{validate_ascending, validate_weight_sum};

/// Weights of the six component scores in the overall score.
///
/// A set that does not sum to ~1.0 still computes, but the overall score can
/// then leave [0, 100]; call [`QualityWeights::validate`] to rule that out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityWeights {
    #[serde(default = "default_complexity_weight")]
    pub complexity: f64,
    #[serde(default = "default_duplication_weight")]
    pub duplication: f64,
    #[serde(default = "default_debt_weight")]
    pub debt: f64,
    #[serde(default = "default_coverage_weight")]
    pub coverage: f64,
    #[serde(default = "default_performance_weight")]
    pub performance: f64,
    #[serde(default = "default_maintainability_weight")]
    pub maintainability: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            complexity: default_complexity_weight(),
            duplication: default_duplication_weight(),
            debt: default_debt_weight(),
            coverage: default_coverage_weight(),
            performance: default_performance_weight(),
            maintainability: default_maintainability_weight(),
        }
    }
}

impl QualityWeights {
    pub fn validate(&self) -> Result<(), String> {
        validate_weight_sum(
            "Quality",
            &[
                self.complexity,
                self.duplication,
                self.debt,
                self.coverage,
                self.performance,
                self.maintainability,
            ],
        )
    }
}

/// Lower bounds of the Excellent, Good and Fair grades; anything below Fair is Poor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeThresholds {
    #[serde(default = "default_excellent")]
    pub excellent: f64,
    #[serde(default = "default_good")]
    pub good: f64,
    #[serde(default = "default_fair")]
    pub fair: f64,
}

impl Default for GradeThresholds {
    fn default() -> Self {
        Self {
            excellent: default_excellent(),
            good: default_good(),
            fair: default_fair(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub weights: QualityWeights,
    #[serde(default)]
    pub grades: GradeThresholds,
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
    /// Cost of one engineering hour in the resource plan
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate: f64,
    #[serde(default = "default_true")]
    pub include_executive_summary: bool,
    #[serde(default = "default_true")]
    pub include_trends: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            weights: QualityWeights::default(),
            grades: GradeThresholds::default(),
            max_recommendations: default_max_recommendations(),
            hourly_rate: default_hourly_rate(),
            include_executive_summary: default_true(),
            include_trends: default_true(),
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.weights.validate()?;
        validate_ascending(
            "Grade thresholds",
            &[self.grades.fair, self.grades.good, self.grades.excellent],
        )?;
        if self.hourly_rate < 0.0 {
            return Err("Hourly rate must be non-negative".into());
        }
        Ok(())
    }
}

fn default_complexity_weight() -> f64 {
    0.20
}
fn default_duplication_weight() -> f64 {
    0.15
}
fn default_debt_weight() -> f64 {
    0.25
}
fn default_coverage_weight() -> f64 {
    0.20
}
fn default_performance_weight() -> f64 {
    0.10
}
fn default_maintainability_weight() -> f64 {
    0.10
}
fn default_excellent() -> f64 {
    90.0
}
fn default_good() -> f64 {
    75.0
}
fn default_fair() -> f64 {
    60.0
}
fn default_max_recommendations() -> usize {
    20
}
fn default_hourly_rate() -> f64 {
    100.0
}
fn default_true() -> bool {
    true
}
