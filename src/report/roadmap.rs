//! Phased improvement roadmap.
//!
//! Recommendations are grouped by category into four fixed-length phases.
//! Only phases that receive at least one recommendation are emitted, and
//! milestone dates accumulate phase lengths from the report timestamp.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{round_to, RiskLevel};

use super::normalize::{Component, ComponentScores};
use super::recommendations::{QualityRecommendation, RecommendationCategory};

const HOURS_PER_WEEK: f64 = 40.0;
const MIN_TEAM_SIZE: usize = 2;

struct PhaseTemplate {
    name: &'static str,
    weeks: u32,
    categories: &'static [RecommendationCategory],
    objective: &'static str,
}

static PHASES: &[PhaseTemplate] = &[
    PhaseTemplate {
        name: "Quick Wins",
        weeks: 2,
        categories: &[
            RecommendationCategory::Duplication,
            RecommendationCategory::Maintainability,
        ],
        objective: "Remove duplicated code and lift the least maintainable files",
    },
    PhaseTemplate {
        name: "Critical Fixes",
        weeks: 4,
        categories: &[
            RecommendationCategory::Performance,
            RecommendationCategory::TechnicalDebt,
        ],
        objective: "Resolve performance bottlenecks and the heaviest technical debt",
    },
    PhaseTemplate {
        name: "Strategic Improvements",
        weeks: 4,
        categories: &[RecommendationCategory::Complexity],
        objective: "Restructure the most complex functions",
    },
    PhaseTemplate {
        name: "Long-term Goals",
        weeks: 2,
        categories: &[RecommendationCategory::Testing],
        objective: "Bring high-risk code under test",
    },
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoadmapPhase {
    pub name: String,
    pub objective: String,
    pub duration_weeks: u32,
    pub categories: Vec<RecommendationCategory>,
    pub recommendation_ids: Vec<String>,
    pub total_hours: f64,
    pub expected_benefit: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    pub phase: String,
    pub week: u32,
    pub target_date: DateTime<Utc>,
    pub deliverables: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ResourcePlan {
    pub total_hours: f64,
    pub development_hours: f64,
    pub qa_hours: f64,
    pub review_hours: f64,
    pub timeframe_weeks: u32,
    pub team_size: usize,
    pub estimated_cost: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoadmapRisk {
    pub description: String,
    pub likelihood: RiskLevel,
    pub mitigation: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SuccessMetric {
    pub component: Component,
    pub current: f64,
    pub target: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Roadmap {
    pub phases: Vec<RoadmapPhase>,
    pub milestones: Vec<Milestone>,
    pub resources: ResourcePlan,
    pub risks: Vec<RoadmapRisk>,
    pub success_metrics: Vec<SuccessMetric>,
}

fn phases(recommendations: &[QualityRecommendation]) -> Vec<RoadmapPhase> {
    PHASES
        .iter()
        .filter_map(|template| {
            let members: Vec<&QualityRecommendation> = recommendations
                .iter()
                .filter(|r| template.categories.contains(&r.category))
                .collect();
            if members.is_empty() {
                return None;
            }
            let present: BTreeSet<RecommendationCategory> =
                members.iter().map(|r| r.category).collect();
            Some(RoadmapPhase {
                name: template.name.to_string(),
                objective: template.objective.to_string(),
                duration_weeks: template.weeks,
                categories: present.into_iter().collect(),
                recommendation_ids: members.iter().map(|r| r.id.clone()).collect(),
                total_hours: round_to(members.iter().map(|r| r.effort_hours).sum(), 2),
                expected_benefit: round_to(members.iter().map(|r| r.benefit).sum(), 2),
            })
        })
        .collect()
}

fn milestones(phases: &[RoadmapPhase], start: DateTime<Utc>) -> Vec<Milestone> {
    let mut week = 0;
    phases
        .iter()
        .map(|phase| {
            week += phase.duration_weeks;
            Milestone {
                phase: phase.name.clone(),
                week,
                target_date: start + Duration::weeks(i64::from(week)),
                deliverables: vec![
                    format!("{} recommendations completed", phase.recommendation_ids.len()),
                    format!("{:.1} score points recovered", phase.expected_benefit),
                ],
            }
        })
        .collect()
}

pub fn resource_plan(total_hours: f64, timeframe_weeks: u32, hourly_rate: f64) -> ResourcePlan {
    let capacity = HOURS_PER_WEEK * timeframe_weeks as f64;
    let needed = if capacity > 0.0 {
        (total_hours / capacity).ceil() as usize
    } else {
        0
    };
    ResourcePlan {
        total_hours: round_to(total_hours, 2),
        development_hours: round_to(total_hours * 0.7, 2),
        qa_hours: round_to(total_hours * 0.2, 2),
        review_hours: round_to(total_hours * 0.1, 2),
        timeframe_weeks,
        team_size: needed.max(MIN_TEAM_SIZE),
        estimated_cost: round_to(total_hours * hourly_rate, 2),
    }
}

fn risks() -> Vec<RoadmapRisk> {
    [
        (
            "Refactoring introduces regressions",
            RiskLevel::Medium,
            "Add characterization tests before changing behavior",
        ),
        (
            "Feature work competes for the same engineers",
            RiskLevel::High,
            "Reserve a fixed share of each iteration for quality work",
        ),
        (
            "Estimates are based on code shape and may be optimistic",
            RiskLevel::Medium,
            "Re-run the analysis after each phase and re-plan",
        ),
    ]
    .into_iter()
    .map(|(description, likelihood, mitigation)| RoadmapRisk {
        description: description.to_string(),
        likelihood,
        mitigation: mitigation.to_string(),
    })
    .collect()
}

pub fn build_roadmap(
    recommendations: &[QualityRecommendation],
    scores: &ComponentScores,
    start: DateTime<Utc>,
    hourly_rate: f64,
) -> Roadmap {
    let phases = phases(recommendations);
    let weeks: u32 = phases.iter().map(|p| p.duration_weeks).sum();
    let total_hours: f64 = phases.iter().map(|p| p.total_hours).sum();

    Roadmap {
        milestones: milestones(&phases, start),
        resources: resource_plan(total_hours, weeks, hourly_rate),
        risks: risks(),
        success_metrics: scores
            .iter()
            .map(|(component, score)| SuccessMetric {
                component,
                current: score.rounded(),
                target: (score.value() + 20.0).min(100.0).round(),
            })
            .collect(),
        phases,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Priority;
    use crate::report::recommendations::{EffortLevel, ImpactLevel};
    use chrono::TimeZone;

    fn rec(id: &str, category: RecommendationCategory, hours: f64) -> QualityRecommendation {
        QualityRecommendation {
            id: id.into(),
            category,
            title: String::new(),
            description: String::new(),
            location: String::new(),
            priority: Priority::Medium,
            impact: ImpactLevel::Medium,
            effort: EffortLevel::Medium,
            effort_hours: hours,
            benefit: 10.0,
            roi: 10.0 / hours,
            steps: vec![],
        }
    }

    #[test]
    fn only_populated_phases_are_emitted() {
        let recs = vec![
            rec("a", RecommendationCategory::Testing, 4.0),
            rec("b", RecommendationCategory::Duplication, 2.0),
        ];
        let p = phases(&recs);
        let names: Vec<&str> = p.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Quick Wins", "Long-term Goals"]);
    }

    #[test]
    fn milestones_accumulate_weeks() {
        let start = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
        let recs = vec![
            rec("a", RecommendationCategory::Performance, 4.0),
            rec("b", RecommendationCategory::Complexity, 2.0),
        ];
        let roadmap = build_roadmap(
            &recs,
            &crate::report::tests::uniform_scores(70.0),
            start,
            100.0,
        );
        assert_eq!(roadmap.milestones[0].week, 4);
        assert_eq!(roadmap.milestones[1].week, 8);
        assert_eq!(roadmap.milestones[1].target_date, start + Duration::weeks(8));
    }

    #[test]
    fn team_size_has_a_floor() {
        let plan = resource_plan(10.0, 2, 100.0);
        assert_eq!(plan.team_size, 2);
        assert_eq!(plan.estimated_cost, 1000.0);
        assert_eq!(plan.development_hours, 7.0);

        let big = resource_plan(1000.0, 4, 100.0);
        assert_eq!(big.team_size, 7);
    }

    #[test]
    fn success_targets_are_capped() {
        let roadmap = build_roadmap(
            &[],
            &crate::report::tests::uniform_scores(95.0),
            Utc::now(),
            100.0,
        );
        assert!(roadmap.phases.is_empty());
        assert!(roadmap.success_metrics.iter().all(|m| m.target == 100.0));
        assert_eq!(roadmap.resources.team_size, 2);
    }
}
