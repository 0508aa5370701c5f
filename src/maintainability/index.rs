use serde::{Deserialize, Serialize};

use crate::config::{ClassificationThresholds, MaintainabilityConfig};
use crate::core::{ratio_or, round_to};

use super::halstead::MIN_VOLUME;

/// Upper bound on the estimated comment density.
pub const MAX_COMMENT_RATIO: f64 = 0.25;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaintainabilityClass {
    Poor,
    Fair,
    Good,
}

impl std::fmt::Display for MaintainabilityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaintainabilityClass::Poor => write!(f, "Poor"),
            MaintainabilityClass::Fair => write!(f, "Fair"),
            MaintainabilityClass::Good => write!(f, "Good"),
        }
    }
}

/// Step function of size plus bonuses for wide signatures and exported API.
pub fn comment_ratio_estimate(line_count: usize, parameter_count: usize, is_exported: bool) -> f64 {
    let base: f64 = if line_count < 20 {
        0.05
    } else if line_count < 50 {
        0.10
    } else {
        0.15
    };
    let parameter_bonus = if parameter_count > 3 { 0.03 } else { 0.0 };
    let export_bonus = if is_exported { 0.05 } else { 0.0 };
    round_to((base + parameter_bonus + export_bonus).min(MAX_COMMENT_RATIO), 4)
}

/// Cyclomatic stand-in when no complexity score is available.
pub fn fallback_cyclomatic(line_count: usize, parameter_count: usize, is_async: bool) -> f64 {
    1.0 + line_count as f64 / 15.0
        + parameter_count as f64 / 2.0
        + if is_async { 2.0 } else { 0.0 }
}

/// `171 − 5.2·ln(V) − 0.23·G − 16.2·ln(LOC) + 50·sin(√(2.4·CM))`, each term weighted, clamped to [0, 100].
pub fn maintainability_index(
    volume: f64,
    cyclomatic: f64,
    line_count: usize,
    comment_ratio: f64,
    config: &MaintainabilityConfig,
) -> f64 {
    let w = &config.weights;
    let volume = if volume > 0.0 { volume } else { MIN_VOLUME };
    let loc = (line_count as f64).max(1.0);
    let comment_ratio = comment_ratio.clamp(0.0, MAX_COMMENT_RATIO);

    let raw = 171.0
        - w.halstead * 5.2 * volume.ln()
        - w.complexity * 0.23 * cyclomatic * config.complexity_scale
        - w.lines * 16.2 * loc.ln() * config.lines_scale
        + w.comments * 50.0 * (2.4 * comment_ratio).sqrt().sin();

    if raw.is_finite() {
        round_to(raw.clamp(0.0, 100.0), 2)
    } else {
        0.0
    }
}

pub fn classify(index: f64, thresholds: &ClassificationThresholds) -> MaintainabilityClass {
    if index >= thresholds.good {
        MaintainabilityClass::Good
    } else if index >= thresholds.fair {
        MaintainabilityClass::Fair
    } else {
        MaintainabilityClass::Poor
    }
}

/// Average of `(index, lines)` pairs weighted by lines; no lines at all is a perfect 100.
pub fn line_weighted_index(entries: impl IntoIterator<Item = (f64, usize)>) -> f64 {
    let (weighted, lines) = entries
        .into_iter()
        .fold((0.0, 0.0), |(acc, total), (index, lines)| {
            (acc + index * lines as f64, total + lines as f64)
        });
    round_to(ratio_or(weighted, lines, 100.0), 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_boundaries() {
        let t = ClassificationThresholds::default();
        assert_eq!(classify(85.0, &t), MaintainabilityClass::Good);
        assert_eq!(classify(84.99, &t), MaintainabilityClass::Fair);
        assert_eq!(classify(70.0, &t), MaintainabilityClass::Fair);
        assert_eq!(classify(69.99, &t), MaintainabilityClass::Poor);
    }

    #[test]
    fn comment_ratio_is_capped() {
        assert_eq!(comment_ratio_estimate(10, 0, false), 0.05);
        assert_eq!(comment_ratio_estimate(30, 0, false), 0.10);
        assert_eq!(comment_ratio_estimate(80, 5, true), 0.23);
        assert!(comment_ratio_estimate(1000, 50, true) <= MAX_COMMENT_RATIO);
    }

    #[test]
    fn tiny_function_is_clamped_to_one_hundred() {
        let config = MaintainabilityConfig::default();
        assert_eq!(maintainability_index(50.0, 1.0, 3, 0.05, &config), 100.0);
    }

    #[test]
    fn non_positive_volume_is_treated_as_one() {
        let config = MaintainabilityConfig::default();
        assert_eq!(
            maintainability_index(0.0, 5.0, 200, 0.1, &config),
            maintainability_index(1.0, 5.0, 200, 0.1, &config)
        );
    }

    #[test]
    fn huge_function_floors_at_zero() {
        let config = MaintainabilityConfig::default();
        assert_eq!(maintainability_index(1e12, 500.0, 100_000, 0.0, &config), 0.0);
    }

    #[test]
    fn large_functions_dominate_weighted_average() {
        let weighted = line_weighted_index([(100.0, 10), (40.0, 190)]);
        assert!(weighted < 45.0);
        assert_eq!(line_weighted_index(std::iter::empty()), 100.0);
    }

    #[test]
    fn fallback_cyclomatic_formula() {
        assert_eq!(fallback_cyclomatic(30, 2, true), 1.0 + 2.0 + 1.0 + 2.0);
    }
}
