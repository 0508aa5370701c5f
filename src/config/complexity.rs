use serde::{Deserialize, Serialize};

use super::validation::{validate_ascending, validate_weight_sum};

/// Weights of the five factors folded into a function's weighted complexity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityWeights {
    #[serde(default = "default_cyclomatic_weight")]
    pub cyclomatic: f64,
    #[serde(default = "default_cognitive_weight")]
    pub cognitive: f64,
    #[serde(default = "default_nesting_weight")]
    pub nesting: f64,
    #[serde(default = "default_nested_loops_weight")]
    pub nested_loops: f64,
    #[serde(default = "default_decision_points_weight")]
    pub decision_points: f64,
}

impl Default for ComplexityWeights {
    fn default() -> Self {
        Self {
            cyclomatic: default_cyclomatic_weight(),
            cognitive: default_cognitive_weight(),
            nesting: default_nesting_weight(),
            nested_loops: default_nested_loops_weight(),
            decision_points: default_decision_points_weight(),
        }
    }
}

impl ComplexityWeights {
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.cyclomatic,
            self.cognitive,
            self.nesting,
            self.nested_loops,
            self.decision_points,
        ]
    }

    /// Validate that weights sum to 1.0 (with small tolerance for floating point)
    pub fn validate(&self) -> Result<(), String> {
        validate_weight_sum("Complexity", &self.as_array())
    }
}

/// Cyclomatic values at which a function enters each severity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    #[serde(default = "default_medium_threshold")]
    pub medium: u32,
    #[serde(default = "default_high_threshold")]
    pub high: u32,
    #[serde(default = "default_severe_threshold")]
    pub severe: u32,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            medium: default_medium_threshold(),
            high: default_high_threshold(),
            severe: default_severe_threshold(),
        }
    }
}

impl SeverityThresholds {
    pub fn validate(&self) -> Result<(), String> {
        validate_ascending(
            "Complexity severity",
            &[self.medium as f64, self.high as f64, self.severe as f64],
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexityConfig {
    #[serde(default)]
    pub weights: ComplexityWeights,
    #[serde(default)]
    pub severity: SeverityThresholds,
}

impl ComplexityConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.weights.validate()?;
        self.severity.validate()
    }
}

pub fn default_cyclomatic_weight() -> f64 {
    0.4
}
pub fn default_cognitive_weight() -> f64 {
    0.3
}
pub fn default_nesting_weight() -> f64 {
    0.2
}
pub fn default_nested_loops_weight() -> f64 {
    0.05
}
pub fn default_decision_points_weight() -> f64 {
    0.05
}
fn default_medium_threshold() -> u32 {
    10
}
fn default_high_threshold() -> u32 {
    15
}
fn default_severe_threshold() -> u32 {
    20
}
