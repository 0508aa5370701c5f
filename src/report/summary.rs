use serde::{Deserialize, Serialize};

use crate::config::QualityWeights;
use crate::core::{round_to, RiskLevel};

use super::normalize::{Component, ComponentScores, QualityGrade};
use super::recommendations::QualityRecommendation;
use super::roadmap::Roadmap;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BusinessImpact {
    /// 1.0 is baseline maintenance cost; 2.0 doubles it
    pub maintenance_cost_multiplier: f64,
    pub development_velocity: String,
    pub risk_assessment: String,
    pub customer_impact: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InvestmentSummary {
    pub total_hours: f64,
    pub estimated_cost: f64,
    pub expected_savings: f64,
    pub average_roi: f64,
    pub payback_period: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExecutiveSummary {
    pub overall_score: f64,
    pub grade: QualityGrade,
    pub risk_level: RiskLevel,
    pub headline: String,
    pub key_findings: Vec<String>,
    pub business_impact: BusinessImpact,
    pub investment: InvestmentSummary,
}

pub fn overall_risk(overall: f64) -> RiskLevel {
    if overall >= 80.0 {
        RiskLevel::Low
    } else if overall >= 60.0 {
        RiskLevel::Medium
    } else if overall >= 40.0 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

/// `1 + ((100 − complexity) + (100 − debt) + (100 − maintainability)) / 300`.
pub fn cost_multiplier(scores: &ComponentScores) -> f64 {
    let gap = (100.0 - scores.complexity.value())
        + (100.0 - scores.debt.value())
        + (100.0 - scores.maintainability.value());
    round_to(1.0 + gap / 300.0, 2)
}

fn velocity(multiplier: f64) -> &'static str {
    if multiplier > 1.5 {
        "Significantly reduced: most changes touch hard-to-modify code"
    } else if multiplier > 1.2 {
        "Moderately reduced: complex areas slow down feature work"
    } else {
        "Minimal impact: the codebase supports steady delivery"
    }
}

fn risk_assessment(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::Critical => "Critical: defects and outages are likely without intervention",
        RiskLevel::High => "High: quality issues are accumulating faster than they are fixed",
        RiskLevel::Medium => "Medium: isolated hotspots need attention",
        RiskLevel::Low => "Low: quality is under control",
    }
}

fn customer_impact(performance: f64, coverage: f64) -> &'static str {
    let worst = performance.min(coverage);
    if worst < 50.0 {
        "High: users are exposed to slow paths and untested behavior"
    } else if worst < 75.0 {
        "Moderate: occasional regressions may reach users"
    } else {
        "Low: user-facing quality is stable"
    }
}

pub fn payback_period(average_roi: f64) -> &'static str {
    if average_roi >= 5.0 {
        "1-3 months"
    } else if average_roi >= 2.0 {
        "3-6 months"
    } else if average_roi >= 1.0 {
        "6-12 months"
    } else {
        "12+ months"
    }
}

fn key_findings(scores: &ComponentScores) -> Vec<String> {
    let mut ranked: Vec<(Component, f64)> = scores.iter().map(|(c, s)| (c, s.value())).collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(3)
        .map(|(component, score)| format!("{component} scores {score:.1} out of 100"))
        .collect()
}

pub fn build_summary(
    overall: f64,
    grade: QualityGrade,
    scores: &ComponentScores,
    recommendations: &[QualityRecommendation],
    roadmap: &Roadmap,
) -> ExecutiveSummary {
    let risk = overall_risk(overall);
    let multiplier = cost_multiplier(scores);
    let average_roi = if recommendations.is_empty() {
        0.0
    } else {
        recommendations.iter().map(|r| r.roi).sum::<f64>() / recommendations.len() as f64
    };
    let cost = roadmap.resources.estimated_cost;

    ExecutiveSummary {
        overall_score: overall,
        grade,
        risk_level: risk,
        headline: format!(
            "Code quality is {grade} ({overall:.1}/100) with {risk} risk; {} improvements planned",
            recommendations.len()
        ),
        key_findings: key_findings(scores),
        business_impact: BusinessImpact {
            maintenance_cost_multiplier: multiplier,
            development_velocity: velocity(multiplier).to_string(),
            risk_assessment: risk_assessment(risk).to_string(),
            customer_impact: customer_impact(scores.performance.value(), scores.coverage.value())
                .to_string(),
        },
        investment: InvestmentSummary {
            total_hours: roadmap.resources.total_hours,
            estimated_cost: cost,
            expected_savings: round_to(2.0 * cost, 2),
            average_roi: round_to(average_roi, 2),
            payback_period: payback_period(average_roi).to_string(),
        },
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ComponentTrend {
    pub component: Component,
    pub current: f64,
    pub projected: f64,
    pub direction: TrendDirection,
}

/// Projection from the current snapshot; no history is stored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrendAnalysis {
    pub components: Vec<ComponentTrend>,
    pub current_overall: f64,
    pub projected_overall: f64,
}

fn direction(projected: f64) -> TrendDirection {
    if projected >= 75.0 {
        TrendDirection::Improving
    } else if projected >= 60.0 {
        TrendDirection::Stable
    } else {
        TrendDirection::Declining
    }
}

pub fn project_trends(
    scores: &ComponentScores,
    overall: f64,
    recommendations: &[QualityRecommendation],
    weights: &QualityWeights,
) -> TrendAnalysis {
    let components: Vec<ComponentTrend> = scores
        .iter()
        .map(|(component, score)| {
            let benefit: f64 = recommendations
                .iter()
                .filter(|r| r.category.component() == component)
                .map(|r| r.benefit)
                .sum();
            let projected = round_to((score.value() + 0.1 * benefit).min(100.0), 2);
            ComponentTrend {
                component,
                current: score.rounded(),
                projected,
                direction: direction(projected),
            }
        })
        .collect();

    let projected_overall = round_to(
        components
            .iter()
            .map(|t| t.component.weight(weights) * t.projected)
            .sum(),
        2,
    );

    TrendAnalysis {
        components,
        current_overall: overall,
        projected_overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::uniform_scores;

    #[test]
    fn risk_buckets() {
        assert_eq!(overall_risk(80.0), RiskLevel::Low);
        assert_eq!(overall_risk(60.0), RiskLevel::Medium);
        assert_eq!(overall_risk(40.0), RiskLevel::High);
        assert_eq!(overall_risk(39.0), RiskLevel::Critical);
    }

    #[test]
    fn cost_multiplier_range() {
        assert_eq!(cost_multiplier(&uniform_scores(100.0)), 1.0);
        assert_eq!(cost_multiplier(&uniform_scores(0.0)), 2.0);
        assert_eq!(cost_multiplier(&uniform_scores(70.0)), 1.3);
    }

    #[test]
    fn payback_buckets() {
        assert_eq!(payback_period(6.0), "1-3 months");
        assert_eq!(payback_period(2.0), "3-6 months");
        assert_eq!(payback_period(1.5), "6-12 months");
        assert_eq!(payback_period(0.0), "12+ months");
    }

    #[test]
    fn trends_without_recommendations_stay_flat() {
        let scores = uniform_scores(65.0);
        let trends = project_trends(&scores, 65.0, &[], &QualityWeights::default());
        assert!(trends
            .components
            .iter()
            .all(|t| t.projected == 65.0 && t.direction == TrendDirection::Stable));
        assert_eq!(trends.projected_overall, 65.0);
    }
}
