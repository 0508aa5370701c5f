use serde::{Deserialize, Serialize};

use super::validation::{validate_ascending, validate_weight_sum};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestabilityWeights {
    #[serde(default = "default_complexity_weight")]
    pub complexity: f64,
    #[serde(default = "default_coupling_weight")]
    pub coupling: f64,
    #[serde(default = "default_dependency_weight")]
    pub dependency: f64,
    #[serde(default = "default_size_weight")]
    pub size: f64,
    #[serde(default = "default_pattern_weight")]
    pub pattern: f64,
}

impl Default for TestabilityWeights {
    fn default() -> Self {
        Self {
            complexity: default_complexity_weight(),
            coupling: default_coupling_weight(),
            dependency: default_dependency_weight(),
            size: default_size_weight(),
            pattern: default_pattern_weight(),
        }
    }
}

impl TestabilityWeights {
    pub fn validate(&self) -> Result<(), String> {
        validate_weight_sum(
            "Testability",
            &[
                self.complexity,
                self.coupling,
                self.dependency,
                self.size,
                self.pattern,
            ],
        )
    }
}

/// Two cut points splitting a raw figure into the low/medium/high factor buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorThresholds {
    pub low: f64,
    pub high: f64,
}

impl FactorThresholds {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestabilityConfig {
    #[serde(default)]
    pub weights: TestabilityWeights,
    #[serde(default = "default_complexity_thresholds")]
    pub complexity_thresholds: FactorThresholds,
    #[serde(default = "default_coupling_thresholds")]
    pub coupling_thresholds: FactorThresholds,
    #[serde(default = "default_dependency_thresholds")]
    pub dependency_thresholds: FactorThresholds,
    /// Coverage points lost per untested path
    #[serde(default = "default_untested_path_penalty")]
    pub untested_path_penalty: f64,
    /// Coverage points lost per required mock
    #[serde(default = "default_mock_penalty")]
    pub mock_penalty: f64,
}

impl Default for TestabilityConfig {
    fn default() -> Self {
        Self {
            weights: TestabilityWeights::default(),
            complexity_thresholds: default_complexity_thresholds(),
            coupling_thresholds: default_coupling_thresholds(),
            dependency_thresholds: default_dependency_thresholds(),
            untested_path_penalty: default_untested_path_penalty(),
            mock_penalty: default_mock_penalty(),
        }
    }
}

impl TestabilityConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.weights.validate()?;
        for (name, t) in [
            ("Testability complexity", self.complexity_thresholds),
            ("Testability coupling", self.coupling_thresholds),
            ("Testability dependency", self.dependency_thresholds),
        ] {
            validate_ascending(name, &[t.low, t.high])?;
        }
        if self.untested_path_penalty < 0.0 || self.mock_penalty < 0.0 {
            return Err("Testability penalties must be non-negative".into());
        }
        Ok(())
    }
}

fn default_complexity_weight() -> f64 {
    0.30
}
fn default_coupling_weight() -> f64 {
    0.20
}
fn default_dependency_weight() -> f64 {
    0.20
}
fn default_size_weight() -> f64 {
    0.15
}
fn default_pattern_weight() -> f64 {
    0.15
}
fn default_complexity_thresholds() -> FactorThresholds {
    FactorThresholds::new(5.0, 15.0)
}
fn default_coupling_thresholds() -> FactorThresholds {
    FactorThresholds::new(5.0, 10.0)
}
fn default_dependency_thresholds() -> FactorThresholds {
    FactorThresholds::new(3.0, 6.0)
}
fn default_untested_path_penalty() -> f64 {
    5.0
}
fn default_mock_penalty() -> f64 {
    8.0
}
