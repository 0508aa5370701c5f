use serde::{Deserialize, Serialize};

use crate::config::GradeThresholds;
use crate::core::{ratio_or, round_to};

use super::normalize::{grade, Component, ComponentScores, QualityGrade};
use super::ReportDetails;

const PROGRESS_TARGET: f64 = 80.0;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthIndicator {
    pub component: Component,
    pub score: f64,
    pub status: QualityGrade,
    pub color: String,
    pub icon: String,
}

impl HealthIndicator {
    pub fn new(component: Component, score: f64, thresholds: &GradeThresholds) -> Self {
        let status = grade(score, thresholds);
        let (color, icon) = match status {
            QualityGrade::Excellent => ("green", "✅"),
            QualityGrade::Good => ("blue", "👍"),
            QualityGrade::Fair => ("yellow", "⚠️"),
            QualityGrade::Poor => ("red", "❌"),
        };
        Self {
            component,
            score: round_to(score, 2),
            status,
            color: color.to_string(),
            icon: icon.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QualityAlert {
    pub level: AlertLevel,
    pub component: Component,
    pub message: String,
    pub score: f64,
    pub threshold: f64,
}

/// Alert rules: level, component, and the score below which the alert fires.
static ALERT_RULES: &[(AlertLevel, Component, f64)] = &[
    (AlertLevel::Critical, Component::Debt, 40.0),
    (AlertLevel::Critical, Component::Performance, 50.0),
    (AlertLevel::Warning, Component::Complexity, 60.0),
    (AlertLevel::Warning, Component::Coverage, 70.0),
    (AlertLevel::Warning, Component::Duplication, 70.0),
    (AlertLevel::Info, Component::Maintainability, 80.0),
];

pub fn alerts(scores: &ComponentScores) -> Vec<QualityAlert> {
    ALERT_RULES
        .iter()
        .filter_map(|&(level, component, threshold)| {
            let score = scores.get(component).value();
            (score < threshold).then(|| QualityAlert {
                level,
                component,
                message: format!(
                    "{component} score {score:.1} is below {threshold:.0}"
                ),
                score: round_to(score, 2),
                threshold,
            })
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    OnTarget,
    NearTarget,
    OffTarget,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KeyMetric {
    pub name: String,
    pub value: f64,
    pub target: f64,
    pub unit: String,
    pub direction: MetricDirection,
    pub status: TargetStatus,
}

impl KeyMetric {
    pub fn new(
        name: &str,
        value: f64,
        target: f64,
        unit: &str,
        direction: MetricDirection,
    ) -> Self {
        Self {
            name: name.to_string(),
            value: round_to(value, 2),
            target,
            unit: unit.to_string(),
            direction,
            status: target_status(value, target, direction),
        }
    }
}

/// Lower-is-better metrics compare target/value; a zero value is always on target.
pub fn target_status(value: f64, target: f64, direction: MetricDirection) -> TargetStatus {
    let ratio = match direction {
        MetricDirection::HigherIsBetter => ratio_or(value, target, 1.0),
        MetricDirection::LowerIsBetter if value <= 0.0 => 1.0,
        MetricDirection::LowerIsBetter => ratio_or(target, value, 1.0),
    };
    if ratio >= 1.0 {
        TargetStatus::OnTarget
    } else if ratio >= 0.8 {
        TargetStatus::NearTarget
    } else {
        TargetStatus::OffTarget
    }
}

pub fn key_metrics(overall: f64, details: &ReportDetails) -> Vec<KeyMetric> {
    use MetricDirection::*;
    vec![
        KeyMetric::new("Overall quality", overall, 80.0, "points", HigherIsBetter),
        KeyMetric::new(
            "Average cyclomatic complexity",
            details.complexity.summary.average_cyclomatic,
            10.0,
            "paths",
            LowerIsBetter,
        ),
        KeyMetric::new(
            "Duplication",
            details.duplication.duplication_percentage,
            5.0,
            "%",
            LowerIsBetter,
        ),
        KeyMetric::new(
            "Technical debt",
            details.debt.summary.total_hours,
            40.0,
            "hours",
            LowerIsBetter,
        ),
        KeyMetric::new(
            "Estimated coverage",
            details.testability.summary.average_coverage,
            80.0,
            "%",
            HigherIsBetter,
        ),
        KeyMetric::new(
            "Maintainability index",
            details.maintainability.overall_index,
            85.0,
            "points",
            HigherIsBetter,
        ),
        KeyMetric::new(
            "Performance",
            details.performance.overall_score.value(),
            80.0,
            "points",
            HigherIsBetter,
        ),
    ]
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Complete,
    OnTrack,
    AtRisk,
    Behind,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressIndicator {
    pub component: Component,
    pub current: f64,
    pub target: f64,
    /// Capped at 100
    pub percent: f64,
    pub status: ProgressStatus,
}

pub fn progress(component: Component, current: f64) -> ProgressIndicator {
    let percent = round_to((current / PROGRESS_TARGET * 100.0).min(100.0), 2);
    let status = if percent >= 100.0 {
        ProgressStatus::Complete
    } else if percent >= 75.0 {
        ProgressStatus::OnTrack
    } else if percent >= 50.0 {
        ProgressStatus::AtRisk
    } else {
        ProgressStatus::Behind
    };
    ProgressIndicator {
        component,
        current: round_to(current, 2),
        target: PROGRESS_TARGET,
        percent,
        status,
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Dashboard {
    pub health: Vec<HealthIndicator>,
    pub alerts: Vec<QualityAlert>,
    pub key_metrics: Vec<KeyMetric>,
    pub progress: Vec<ProgressIndicator>,
}

pub fn build_dashboard(
    scores: &ComponentScores,
    overall: f64,
    details: &ReportDetails,
    thresholds: &GradeThresholds,
) -> Dashboard {
    Dashboard {
        health: scores
            .iter()
            .map(|(c, s)| HealthIndicator::new(c, s.value(), thresholds))
            .collect(),
        alerts: alerts(scores),
        key_metrics: key_metrics(overall, details),
        progress: scores.iter().map(|(c, s)| progress(c, s.value())).collect(),
    }
}
