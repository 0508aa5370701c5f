use serde::{Deserialize, Serialize};

use super::validation::validate_ascending;

/// Multipliers on the four terms of the maintainability index.
///
/// These are not a convex combination; each defaults to 1.0, which yields the
/// classic SEI formula with the comment term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaintainabilityWeights {
    #[serde(default = "default_term_weight")]
    pub halstead: f64,
    #[serde(default = "default_term_weight")]
    pub complexity: f64,
    #[serde(default = "default_term_weight")]
    pub lines: f64,
    #[serde(default = "default_term_weight")]
    pub comments: f64,
}

impl Default for MaintainabilityWeights {
    fn default() -> Self {
        Self {
            halstead: default_term_weight(),
            complexity: default_term_weight(),
            lines: default_term_weight(),
            comments: default_term_weight(),
        }
    }
}

/// Lower bounds of the Good and Fair classification bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    #[serde(default = "default_good_threshold")]
    pub good: f64,
    #[serde(default = "default_fair_threshold")]
    pub fair: f64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            good: default_good_threshold(),
            fair: default_fair_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintainabilityConfig {
    #[serde(default)]
    pub weights: MaintainabilityWeights,
    #[serde(default = "default_scale")]
    pub complexity_scale: f64,
    #[serde(default = "default_scale")]
    pub lines_scale: f64,
    #[serde(default)]
    pub classification: ClassificationThresholds,
}

impl Default for MaintainabilityConfig {
    fn default() -> Self {
        Self {
            weights: MaintainabilityWeights::default(),
            complexity_scale: default_scale(),
            lines_scale: default_scale(),
            classification: ClassificationThresholds::default(),
        }
    }
}

impl MaintainabilityConfig {
    pub fn validate(&self) -> Result<(), String> {
        let w = &self.weights;
        if [w.halstead, w.complexity, w.lines, w.comments, self.complexity_scale, self.lines_scale]
            .iter()
            .any(|v| *v < 0.0 || !v.is_finite())
        {
            return Err("Maintainability weights and scales must be finite and non-negative".into());
        }
        validate_ascending(
            "Maintainability classification",
            &[self.classification.fair, self.classification.good],
        )
    }
}

fn default_term_weight() -> f64 {
    1.0
}
fn default_scale() -> f64 {
    1.0
}
fn default_good_threshold() -> f64 {
    85.0
}
fn default_fair_threshold() -> f64 {
    70.0
}
