use serde::{Deserialize, Serialize};

use super::validation::{validate_ascending, validate_weight_sum};

/// Share of the debt health score charged to each debt category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    #[serde(default = "default_code_smells_weight")]
    pub code_smells: f64,
    #[serde(default = "default_architecture_weight")]
    pub architecture: f64,
    #[serde(default = "default_performance_weight")]
    pub performance: f64,
    #[serde(default = "default_complexity_weight")]
    pub complexity: f64,
    #[serde(default = "default_duplication_weight")]
    pub duplication: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            code_smells: default_code_smells_weight(),
            architecture: default_architecture_weight(),
            performance: default_performance_weight(),
            complexity: default_complexity_weight(),
            duplication: default_duplication_weight(),
        }
    }
}

impl CategoryWeights {
    pub fn validate(&self) -> Result<(), String> {
        validate_weight_sum(
            "Debt category",
            &[
                self.code_smells,
                self.architecture,
                self.performance,
                self.complexity,
                self.duplication,
            ],
        )
    }
}

/// Blend of impact and change frequency that drives an item's priority.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    #[serde(default = "default_impact_weight")]
    pub impact: f64,
    #[serde(default = "default_change_frequency_weight")]
    pub change_frequency: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            impact: default_impact_weight(),
            change_frequency: default_change_frequency_weight(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityThresholds {
    #[serde(default = "default_critical_priority")]
    pub critical: f64,
    #[serde(default = "default_high_priority")]
    pub high: f64,
    #[serde(default = "default_medium_priority")]
    pub medium: f64,
}

impl Default for PriorityThresholds {
    fn default() -> Self {
        Self {
            critical: default_critical_priority(),
            high: default_high_priority(),
            medium: default_medium_priority(),
        }
    }
}

/// Base debt score per severity before the effort multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityScores {
    #[serde(default = "default_low_score")]
    pub low: f64,
    #[serde(default = "default_medium_score")]
    pub medium: f64,
    #[serde(default = "default_high_score")]
    pub high: f64,
}

impl Default for SeverityScores {
    fn default() -> Self {
        Self {
            low: default_low_score(),
            medium: default_medium_score(),
            high: default_high_score(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtScoringConfig {
    #[serde(default)]
    pub category_weights: CategoryWeights,
    #[serde(default)]
    pub priority_weights: PriorityWeights,
    #[serde(default)]
    pub priority_thresholds: PriorityThresholds,
    #[serde(default)]
    pub severity_scores: SeverityScores,
}

impl DebtScoringConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.category_weights.validate()?;
        validate_weight_sum(
            "Debt priority",
            &[
                self.priority_weights.impact,
                self.priority_weights.change_frequency,
            ],
        )?;
        let t = &self.priority_thresholds;
        validate_ascending("Debt priority thresholds", &[t.medium, t.high, t.critical])?;
        let s = &self.severity_scores;
        validate_ascending("Debt severity scores", &[s.low, s.medium, s.high])
    }
}

fn default_code_smells_weight() -> f64 {
    0.20
}
fn default_architecture_weight() -> f64 {
    0.25
}
fn default_performance_weight() -> f64 {
    0.20
}
fn default_complexity_weight() -> f64 {
    0.20
}
fn default_duplication_weight() -> f64 {
    0.15
}
fn default_impact_weight() -> f64 {
    0.7
}
fn default_change_frequency_weight() -> f64 {
    0.3
}
fn default_critical_priority() -> f64 {
    60.0
}
fn default_high_priority() -> f64 {
    35.0
}
fn default_medium_priority() -> f64 {
    15.0
}
fn default_low_score() -> f64 {
    10.0
}
fn default_medium_score() -> f64 {
    25.0
}
fn default_high_score() -> f64 {
    50.0
}
