//! Component scores on a common 0-100 scale.
//!
//! Each analyzer reports its headline figure differently; one conversion per
//! analyzer maps it onto a [`NormalizedScore`] before any blending happens.

use serde::{Deserialize, Serialize};

use crate::adapters::{DuplicationMetrics, PerformanceMetrics};
use crate::complexity::ComplexityMetrics;
use crate::config::{GradeThresholds, QualityWeights};
use crate::core::{round_to, NormalizedScore};
use crate::debt::DebtMetrics;
use crate::maintainability::MaintainabilityMetrics;
use crate::testability::TestabilityMetrics;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Complexity,
    Duplication,
    Debt,
    Coverage,
    Performance,
    Maintainability,
}

impl Component {
    pub const ALL: [Component; 6] = [
        Component::Complexity,
        Component::Duplication,
        Component::Debt,
        Component::Coverage,
        Component::Performance,
        Component::Maintainability,
    ];

    pub fn weight(self, weights: &QualityWeights) -> f64 {
        match self {
            Component::Complexity => weights.complexity,
            Component::Duplication => weights.duplication,
            Component::Debt => weights.debt,
            Component::Coverage => weights.coverage,
            Component::Performance => weights.performance,
            Component::Maintainability => weights.maintainability,
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Component::Complexity => write!(f, "Complexity"),
            Component::Duplication => write!(f, "Duplication"),
            Component::Debt => write!(f, "Technical Debt"),
            Component::Coverage => write!(f, "Test Coverage"),
            Component::Performance => write!(f, "Performance"),
            Component::Maintainability => write!(f, "Maintainability"),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QualityGrade {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl std::fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityGrade::Excellent => write!(f, "Excellent"),
            QualityGrade::Good => write!(f, "Good"),
            QualityGrade::Fair => write!(f, "Fair"),
            QualityGrade::Poor => write!(f, "Poor"),
        }
    }
}

pub fn grade(score: f64, thresholds: &GradeThresholds) -> QualityGrade {
    if score >= thresholds.excellent {
        QualityGrade::Excellent
    } else if score >= thresholds.good {
        QualityGrade::Good
    } else if score >= thresholds.fair {
        QualityGrade::Fair
    } else {
        QualityGrade::Poor
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ComponentScores {
    pub complexity: NormalizedScore,
    pub duplication: NormalizedScore,
    pub debt: NormalizedScore,
    pub coverage: NormalizedScore,
    pub performance: NormalizedScore,
    pub maintainability: NormalizedScore,
}

impl ComponentScores {
    pub fn from_complexity(metrics: &ComplexityMetrics) -> NormalizedScore {
        metrics.overall_score
    }

    /// The detector's own score, so injected detectors can weigh clusters their way.
    pub fn from_duplication(metrics: &DuplicationMetrics) -> NormalizedScore {
        metrics.overall_score
    }

    pub fn from_debt(metrics: &DebtMetrics) -> NormalizedScore {
        metrics.overall_score
    }

    /// Mean testability stands in for coverage.
    pub fn from_testability(metrics: &TestabilityMetrics) -> NormalizedScore {
        NormalizedScore::new(metrics.summary.average_testability)
    }

    pub fn from_performance(metrics: &PerformanceMetrics) -> NormalizedScore {
        metrics.overall_score
    }

    pub fn from_maintainability(metrics: &MaintainabilityMetrics) -> NormalizedScore {
        NormalizedScore::new(metrics.overall_index)
    }

    pub fn get(&self, component: Component) -> NormalizedScore {
        match component {
            Component::Complexity => self.complexity,
            Component::Duplication => self.duplication,
            Component::Debt => self.debt,
            Component::Coverage => self.coverage,
            Component::Performance => self.performance,
            Component::Maintainability => self.maintainability,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Component, NormalizedScore)> + '_ {
        Component::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Weighted sum. Not clamped: weights that do not sum to 1 push it out of range.
    pub fn weighted_overall(&self, weights: &QualityWeights) -> f64 {
        round_to(
            self.iter()
                .map(|(c, s)| c.weight(weights) * s.value())
                .sum(),
            2,
        )
    }
}
