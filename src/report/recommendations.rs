//! Cross-analyzer recommendations.
//!
//! Every analyzer contributes one recommendation per flagged issue. Each one
//! carries an effort estimate and an expected benefit in score points; the
//! combined list is ranked by return on effort and truncated.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::complexity::ComplexityScore;
use crate::core::{ratio_or, round_to, FunctionId, Priority};
use crate::debt::FileDebt;

use super::normalize::Component;
use super::ReportDetails;

const COMPLEXITY_LIMIT: u32 = 15;
const DEBT_FILE_LIMIT: usize = 10;
const DEBT_HEALTH_CEILING: f64 = 60.0;
const TESTABILITY_FLOOR: f64 = 50.0;
const MAINTAINABILITY_FILE_LIMIT: usize = 5;
const MAINTAINABILITY_FLOOR: f64 = 70.0;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Complexity,
    Duplication,
    TechnicalDebt,
    Testing,
    Performance,
    Maintainability,
}

impl RecommendationCategory {
    /// Component whose score the recommendation moves.
    pub fn component(self) -> Component {
        match self {
            RecommendationCategory::Complexity => Component::Complexity,
            RecommendationCategory::Duplication => Component::Duplication,
            RecommendationCategory::TechnicalDebt => Component::Debt,
            RecommendationCategory::Testing => Component::Coverage,
            RecommendationCategory::Performance => Component::Performance,
            RecommendationCategory::Maintainability => Component::Maintainability,
        }
    }
}

impl std::fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationCategory::Complexity => write!(f, "Complexity"),
            RecommendationCategory::Duplication => write!(f, "Duplication"),
            RecommendationCategory::TechnicalDebt => write!(f, "Technical Debt"),
            RecommendationCategory::Testing => write!(f, "Testing"),
            RecommendationCategory::Performance => write!(f, "Performance"),
            RecommendationCategory::Maintainability => write!(f, "Maintainability"),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    pub fn from_benefit(benefit: f64) -> Self {
        if benefit >= 20.0 {
            ImpactLevel::High
        } else if benefit >= 10.0 {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EffortLevel {
    Small,
    Medium,
    Large,
}

impl EffortLevel {
    pub fn from_hours(hours: f64) -> Self {
        if hours < 4.0 {
            EffortLevel::Small
        } else if hours < 16.0 {
            EffortLevel::Medium
        } else {
            EffortLevel::Large
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QualityRecommendation {
    pub id: String,
    pub category: RecommendationCategory,
    pub title: String,
    pub description: String,
    pub location: String,
    pub priority: Priority,
    pub impact: ImpactLevel,
    pub effort: EffortLevel,
    pub effort_hours: f64,
    /// Expected gain in component score points
    pub benefit: f64,
    pub roi: f64,
    pub steps: Vec<String>,
}

impl QualityRecommendation {
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: String,
        category: RecommendationCategory,
        title: String,
        description: String,
        location: String,
        priority: Priority,
        effort_hours: f64,
        benefit: f64,
        steps: &[&str],
    ) -> Self {
        let effort_hours = effort_hours.max(0.5);
        Self {
            id,
            category,
            title,
            description,
            location,
            priority,
            impact: ImpactLevel::from_benefit(benefit),
            effort: EffortLevel::from_hours(effort_hours),
            effort_hours: round_to(effort_hours, 2),
            benefit: round_to(benefit, 2),
            roi: round_to(ratio_or(benefit, effort_hours, 0.0), 2),
            steps: steps.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn complexity_priority(score: &ComplexityScore) -> Priority {
    match score.cyclomatic {
        c if c > 25 => Priority::Critical,
        c if c > 20 => Priority::High,
        _ => Priority::Medium,
    }
}

fn complexity_recommendations(details: &ReportDetails) -> Vec<QualityRecommendation> {
    details
        .complexity
        .functions
        .iter()
        .filter(|f| f.score.cyclomatic > COMPLEXITY_LIMIT)
        .map(|f| {
            let cyclomatic = f.score.cyclomatic;
            QualityRecommendation::new(
                format!("complexity:{}", f.id),
                RecommendationCategory::Complexity,
                format!("Reduce complexity of '{}'", f.id.name),
                format!(
                    "Cyclomatic complexity {cyclomatic} exceeds {COMPLEXITY_LIMIT}; split decision logic into smaller functions"
                ),
                f.id.to_string(),
                complexity_priority(&f.score),
                2.0 + cyclomatic as f64 / 4.0,
                ((cyclomatic - 10) as f64 * 2.0).min(30.0),
                &[
                    "Map the independent branches of the function",
                    "Extract each branch group into a named helper",
                    "Replace nested conditionals with early returns",
                    "Add tests for each extracted path",
                ],
            )
        })
        .collect()
}

fn duplication_recommendations(details: &ReportDetails) -> Vec<QualityRecommendation> {
    details
        .duplication
        .exact_clusters()
        .filter(|c| c.priority >= Priority::Medium)
        .filter_map(|c| {
            let first = c.instances.first()?;
            let burden = c.maintenance_burden as f64;
            Some(QualityRecommendation::new(
                format!("duplication:{}", c.id),
                RecommendationCategory::Duplication,
                format!("Consolidate {} copies of '{}'", c.instances.len(), first.function),
                format!(
                    "{} duplicated lines across {} locations",
                    c.maintenance_burden,
                    c.instances.len()
                ),
                first.file.display().to_string(),
                c.priority,
                1.0 + burden / 30.0,
                (burden / 5.0).min(40.0),
                &[
                    "Extract the shared body into one function",
                    "Replace every copy with a call to it",
                    "Delete the copies once callers are migrated",
                ],
            ))
        })
        .collect()
}

fn debt_priority(file: &FileDebt) -> Priority {
    match file.health() {
        h if h < 20.0 => Priority::Critical,
        h if h < 40.0 => Priority::High,
        _ => Priority::Medium,
    }
}

/// Top debt files only, and only those whose health is already at or below the ceiling.
fn debt_recommendations(details: &ReportDetails) -> Vec<QualityRecommendation> {
    details
        .debt
        .files
        .iter()
        .filter(|f| f.item_count > 0)
        .take(DEBT_FILE_LIMIT)
        .filter(|f| f.health() <= DEBT_HEALTH_CEILING)
        .map(|f| {
            QualityRecommendation::new(
                format!("debt:{}", f.path.display()),
                RecommendationCategory::TechnicalDebt,
                format!("Pay down debt in {}", f.path.display()),
                format!(
                    "{} debt items totalling {:.1} points and {:.1} hours",
                    f.item_count, f.total_score, f.total_hours
                ),
                f.path.display().to_string(),
                debt_priority(f),
                f.total_hours,
                (f.total_score / 4.0).min(50.0),
                &[
                    "Review the file's debt items by priority",
                    "Fix the highest-impact items first",
                    "Re-run the analysis to confirm the reduction",
                ],
            )
        })
        .collect()
}

fn testing_recommendations(details: &ReportDetails) -> Vec<QualityRecommendation> {
    let efforts: HashMap<&FunctionId, f64> = details
        .testability
        .effort_estimates
        .iter()
        .map(|e| (&e.id, e.effort_hours))
        .collect();

    details
        .testability
        .high_risk_functions(TESTABILITY_FLOOR)
        .map(|f| {
            let risk = 100.0 - f.testability_score;
            let mocks: Vec<String> = f.required_mocks.iter().map(|m| m.to_string()).collect();
            QualityRecommendation::new(
                format!("testing:{}", f.id),
                RecommendationCategory::Testing,
                format!("Add tests for '{}'", f.id.name),
                format!(
                    "Testability {:.1} ({} risk); needs mocks for [{}] and {} edge paths",
                    f.testability_score,
                    f.risk_level,
                    mocks.join(", "),
                    f.untested_paths.len()
                ),
                f.id.to_string(),
                f.priority,
                efforts.get(&f.id).copied().unwrap_or(2.0),
                risk / 4.0,
                &[
                    "Introduce seams for the external dependencies",
                    "Write happy-path tests through the public entry point",
                    "Cover error handling and optional parameters",
                ],
            )
        })
        .collect()
}

fn performance_recommendations(details: &ReportDetails) -> Vec<QualityRecommendation> {
    details
        .performance
        .anti_patterns
        .iter()
        .filter(|p| p.severity >= Priority::High)
        .map(|p| {
            QualityRecommendation::new(
                format!("performance:{}:{}:{}", p.kind, p.file.display(), p.function),
                RecommendationCategory::Performance,
                format!("Fix {} in '{}'", p.kind, p.function),
                p.impact.description.clone(),
                p.file.display().to_string(),
                p.severity,
                if p.severity == Priority::Critical { 8.0 } else { 4.0 },
                p.impact.score / 4.0,
                &[
                    "Profile the function under realistic load",
                    "Remove the identified bottleneck",
                    "Add a benchmark to guard against regressions",
                ],
            )
        })
        .collect()
}

fn maintainability_recommendations(details: &ReportDetails) -> Vec<QualityRecommendation> {
    details
        .maintainability
        .lowest_files(MAINTAINABILITY_FILE_LIMIT)
        .into_iter()
        .filter(|f| f.function_count > 0 && f.maintainability_index < MAINTAINABILITY_FLOOR)
        .map(|f| {
            let mi = f.maintainability_index;
            QualityRecommendation::new(
                format!("maintainability:{}", f.path.display()),
                RecommendationCategory::Maintainability,
                format!("Improve maintainability of {}", f.path.display()),
                format!("Maintainability index {mi:.1} is below {MAINTAINABILITY_FLOOR:.0}"),
                f.path.display().to_string(),
                if mi < 50.0 {
                    Priority::Critical
                } else {
                    Priority::High
                },
                2.0 + f.total_lines as f64 / 100.0,
                ((85.0 - mi) / 2.0).min(40.0),
                &[
                    "Split the longest functions in the file",
                    "Document exported functions",
                    "Reduce parameter lists with option objects",
                ],
            )
        })
        .collect()
}

/// ROI, then impact, then priority, all descending; id breaks remaining ties.
pub fn rank(recommendations: &mut [QualityRecommendation]) {
    recommendations.sort_by(|a, b| {
        b.roi
            .total_cmp(&a.roi)
            .then_with(|| b.impact.cmp(&a.impact))
            .then_with(|| b.priority.cmp(&a.priority))
            .then_with(|| a.id.cmp(&b.id))
    });
}

pub fn generate(details: &ReportDetails, limit: usize) -> Vec<QualityRecommendation> {
    let mut all: Vec<QualityRecommendation> = [
        complexity_recommendations(details),
        duplication_recommendations(details),
        debt_recommendations(details),
        testing_recommendations(details),
        performance_recommendations(details),
        maintainability_recommendations(details),
    ]
    .into_iter()
    .flatten()
    .collect();
    rank(&mut all);
    all.truncate(limit);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effort_levels() {
        assert_eq!(EffortLevel::from_hours(3.9), EffortLevel::Small);
        assert_eq!(EffortLevel::from_hours(4.0), EffortLevel::Medium);
        assert_eq!(EffortLevel::from_hours(16.0), EffortLevel::Large);
    }

    #[test]
    fn roi_is_benefit_over_effort() {
        let r = QualityRecommendation::new(
            "x".into(),
            RecommendationCategory::Complexity,
            String::new(),
            String::new(),
            String::new(),
            Priority::Medium,
            4.0,
            20.0,
            &[],
        );
        assert_eq!(r.roi, 5.0);
        assert_eq!(r.impact, ImpactLevel::High);
        assert_eq!(r.effort, EffortLevel::Medium);
    }

    #[test]
    fn ranking_breaks_ties_by_id() {
        let make = |id: &str| {
            QualityRecommendation::new(
                id.into(),
                RecommendationCategory::Testing,
                String::new(),
                String::new(),
                String::new(),
                Priority::Low,
                2.0,
                2.0,
                &[],
            )
        };
        let mut all = vec![make("b"), make("a")];
        rank(&mut all);
        assert_eq!(all[0].id, "a");
    }
}
