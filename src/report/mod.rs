//! Composite quality report (stage 5).
//!
//! Blends the six analyzer bundles into one weighted score and grade, then
//! derives the dashboard, ranked recommendations, roadmap, and the optional
//! executive summary and trend projection. The finished [`QualityReport`]
//! owns every bundle it was built from.

pub mod dashboard;
pub mod normalize;
pub mod pipeline;
pub mod recommendations;
pub mod roadmap;
pub mod summary;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapters::{DuplicationMetrics, PerformanceMetrics};
use crate::complexity::ComplexityMetrics;
use crate::config::ReportConfig;
use crate::core::{QualityError, Result};
use crate::debt::DebtMetrics;
use crate::maintainability::MaintainabilityMetrics;
use crate::observability::AnalysisStage;
use crate::testability::TestabilityMetrics;

pub use dashboard::Dashboard;
pub use normalize::{grade, Component, ComponentScores, QualityGrade};
pub use pipeline::{CancellationFlag, QualityReportGenerator};
pub use recommendations::{QualityRecommendation, RecommendationCategory};
pub use roadmap::Roadmap;
pub use summary::{ExecutiveSummary, TrendAnalysis};

/// A file the parser rejected; the run continued without it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseFailure {
    pub file: PathBuf,
    pub message: String,
}

/// Finished bundles of all six analyzers.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReportDetails {
    pub complexity: ComplexityMetrics,
    pub duplication: DuplicationMetrics,
    pub debt: DebtMetrics,
    pub testability: TestabilityMetrics,
    pub performance: PerformanceMetrics,
    pub maintainability: MaintainabilityMetrics,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QualityReport {
    pub generated_at: DateTime<Utc>,
    pub files_analyzed: usize,
    pub parse_failures: Vec<ParseFailure>,
    pub scores: ComponentScores,
    pub overall_score: f64,
    pub grade: QualityGrade,
    pub dashboard: Dashboard,
    pub recommendations: Vec<QualityRecommendation>,
    pub roadmap: Roadmap,
    pub executive_summary: Option<ExecutiveSummary>,
    pub trends: Option<TrendAnalysis>,
    pub details: ReportDetails,
}

/// Collects the bundles for report assembly. Every bundle is required.
#[derive(Debug, Default)]
pub struct ReportInputs {
    complexity: Option<ComplexityMetrics>,
    duplication: Option<DuplicationMetrics>,
    debt: Option<DebtMetrics>,
    testability: Option<TestabilityMetrics>,
    performance: Option<PerformanceMetrics>,
    maintainability: Option<MaintainabilityMetrics>,
    files_analyzed: usize,
    parse_failures: Vec<ParseFailure>,
    generated_at: Option<DateTime<Utc>>,
}

impl ReportInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn complexity(mut self, metrics: ComplexityMetrics) -> Self {
        self.complexity = Some(metrics);
        self
    }

    pub fn duplication(mut self, metrics: DuplicationMetrics) -> Self {
        self.duplication = Some(metrics);
        self
    }

    pub fn debt(mut self, metrics: DebtMetrics) -> Self {
        self.debt = Some(metrics);
        self
    }

    pub fn testability(mut self, metrics: TestabilityMetrics) -> Self {
        self.testability = Some(metrics);
        self
    }

    pub fn performance(mut self, metrics: PerformanceMetrics) -> Self {
        self.performance = Some(metrics);
        self
    }

    pub fn maintainability(mut self, metrics: MaintainabilityMetrics) -> Self {
        self.maintainability = Some(metrics);
        self
    }

    pub fn files_analyzed(mut self, count: usize) -> Self {
        self.files_analyzed = count;
        self
    }

    pub fn parse_failures(mut self, failures: Vec<ParseFailure>) -> Self {
        self.parse_failures = failures;
        self
    }

    /// Fix the report timestamp; defaults to now.
    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    fn into_details(self) -> Result<(ReportDetails, usize, Vec<ParseFailure>, DateTime<Utc>)> {
        let missing = |requires| QualityError::missing(AnalysisStage::ReportAssembly, requires);
        let details = ReportDetails {
            complexity: self
                .complexity
                .ok_or_else(|| missing(AnalysisStage::Complexity))?,
            duplication: self
                .duplication
                .ok_or_else(|| missing(AnalysisStage::Duplication))?,
            debt: self.debt.ok_or_else(|| missing(AnalysisStage::Debt))?,
            testability: self
                .testability
                .ok_or_else(|| missing(AnalysisStage::Testability))?,
            performance: self
                .performance
                .ok_or_else(|| missing(AnalysisStage::Performance))?,
            maintainability: self
                .maintainability
                .ok_or_else(|| missing(AnalysisStage::Maintainability))?,
        };
        Ok((
            details,
            self.files_analyzed,
            self.parse_failures,
            self.generated_at.unwrap_or_else(Utc::now),
        ))
    }
}

/// Build the composite report from finished bundles.
pub fn assemble(inputs: ReportInputs, config: &ReportConfig) -> Result<QualityReport> {
    let (details, files_analyzed, parse_failures, generated_at) = inputs.into_details()?;

    let scores = ComponentScores {
        complexity: ComponentScores::from_complexity(&details.complexity),
        duplication: ComponentScores::from_duplication(&details.duplication),
        debt: ComponentScores::from_debt(&details.debt),
        coverage: ComponentScores::from_testability(&details.testability),
        performance: ComponentScores::from_performance(&details.performance),
        maintainability: ComponentScores::from_maintainability(&details.maintainability),
    };
    let overall_score = scores.weighted_overall(&config.weights);
    let grade = grade(overall_score, &config.grades);

    let dashboard = dashboard::build_dashboard(&scores, overall_score, &details, &config.grades);
    let recommendations = recommendations::generate(&details, config.max_recommendations);
    let roadmap =
        roadmap::build_roadmap(&recommendations, &scores, generated_at, config.hourly_rate);
    let executive_summary = config.include_executive_summary.then(|| {
        summary::build_summary(overall_score, grade, &scores, &recommendations, &roadmap)
    });
    let trends = config.include_trends.then(|| {
        summary::project_trends(&scores, overall_score, &recommendations, &config.weights)
    });

    debug!(
        overall = overall_score,
        grade = %grade,
        recommendations = recommendations.len(),
        phases = roadmap.phases.len(),
        "Report assembled"
    );

    Ok(QualityReport {
        generated_at,
        files_analyzed,
        parse_failures,
        scores,
        overall_score,
        grade,
        dashboard,
        recommendations,
        roadmap,
        executive_summary,
        trends,
        details,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::NormalizedScore;

    pub(crate) fn uniform_scores(value: f64) -> ComponentScores {
        let s = NormalizedScore::new(value);
        ComponentScores {
            complexity: s,
            duplication: s,
            debt: s,
            coverage: s,
            performance: s,
            maintainability: s,
        }
    }

    fn perfect_inputs() -> ReportInputs {
        ReportInputs::new()
            .complexity(ComplexityMetrics::default())
            .duplication(DuplicationMetrics::default())
            .debt(DebtMetrics::default())
            .testability(TestabilityMetrics::default())
            .performance(PerformanceMetrics::default())
    }

    #[test]
    fn missing_bundle_fails_loudly() {
        let err = assemble(perfect_inputs(), &ReportConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            QualityError::MissingDependency {
                stage: AnalysisStage::ReportAssembly,
                requires: AnalysisStage::Maintainability,
            }
        ));
    }

    #[test]
    fn empty_bundles_make_a_perfect_report() {
        let inputs = perfect_inputs().maintainability(MaintainabilityMetrics::default());
        let report = assemble(inputs, &ReportConfig::default()).unwrap();
        assert_eq!(report.overall_score, 100.0);
        assert_eq!(report.grade, QualityGrade::Excellent);
        assert!(report.recommendations.is_empty());
        assert!(report.dashboard.alerts.is_empty());
        assert!(report.executive_summary.is_some());
        assert!(report.trends.is_some());
    }

    #[test]
    fn optional_sections_follow_config() {
        let config = ReportConfig {
            include_executive_summary: false,
            include_trends: false,
            ..ReportConfig::default()
        };
        let inputs = perfect_inputs().maintainability(MaintainabilityMetrics::default());
        let report = assemble(inputs, &config).unwrap();
        assert!(report.executive_summary.is_none());
        assert!(report.trends.is_none());
    }
}
