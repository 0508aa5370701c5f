mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::sample_project;
use pretty_assertions::assert_eq;
use qualitymap::adapters::{
    DuplicationDetector, PerformanceAnalyzer, ShapeDuplicationDetector, ShapePerformanceAnalyzer,
};
use qualitymap::config::ReportConfig;
use qualitymap::report::{grade, RecommendationCategory};
use qualitymap::{
    assemble, ComplexityScorer, DebtScorer, MaintainabilityScorer, QualityReport, ReportInputs,
    TestabilityScorer,
};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()
}

fn inputs() -> ReportInputs {
    let files = sample_project();
    let complexity = ComplexityScorer::default().analyze(&files).unwrap();
    let duplication = ShapeDuplicationDetector.detect(&files);
    let debt = DebtScorer::default()
        .with_complexity(&complexity)
        .with_duplication(&duplication)
        .analyze(&files)
        .unwrap();
    let testability = TestabilityScorer::default().analyze(&files, Some(&complexity));
    let performance = ShapePerformanceAnalyzer::default().analyze(&files, &complexity);
    let maintainability = MaintainabilityScorer::default().analyze(&files, Some(&complexity));

    ReportInputs::new()
        .files_analyzed(files.len())
        .generated_at(start())
        .complexity(complexity)
        .duplication(duplication)
        .debt(debt)
        .testability(testability)
        .performance(performance)
        .maintainability(maintainability)
}

fn report() -> QualityReport {
    assemble(inputs(), &ReportConfig::default()).unwrap()
}

#[test]
fn overall_score_is_graded_with_the_configured_thresholds() {
    let report = report();
    let config = ReportConfig::default();

    assert!((0.0..=100.0).contains(&report.overall_score));
    assert!(report.overall_score < 100.0);
    assert_eq!(report.grade, grade(report.overall_score, &config.grades));
    assert_eq!(
        report.overall_score,
        report.scores.weighted_overall(&config.weights)
    );
}

#[test]
fn severe_function_gets_a_complexity_recommendation() {
    let report = report();
    let rec = report
        .recommendations
        .iter()
        .find(|r| r.category == RecommendationCategory::Complexity)
        .unwrap();

    assert!(rec.title.contains("reconcile"));
    assert_eq!(rec.benefit, 20.0);
    assert_eq!(rec.effort_hours, 7.0);
}

#[test]
fn recommendations_are_ranked_and_bounded() {
    let report = report();
    assert!(report.recommendations.len() <= ReportConfig::default().max_recommendations);
    assert!(report
        .recommendations
        .windows(2)
        .all(|w| w[0].roi >= w[1].roi));
}

#[test]
fn roadmap_milestones_accumulate_from_the_report_date() {
    let report = report();
    let roadmap = &report.roadmap;

    assert!(!roadmap.phases.is_empty());
    assert_eq!(roadmap.milestones.len(), roadmap.phases.len());

    let mut week = 0;
    for (phase, milestone) in roadmap.phases.iter().zip(&roadmap.milestones) {
        week += phase.duration_weeks;
        assert_eq!(milestone.phase, phase.name);
        assert_eq!(milestone.week, week);
        assert_eq!(milestone.target_date, start() + Duration::weeks(i64::from(week)));
    }
    assert_eq!(roadmap.resources.timeframe_weeks, week);
}

#[test]
fn every_recommendation_lands_in_exactly_one_phase() {
    let report = report();
    let phased: usize = report
        .roadmap
        .phases
        .iter()
        .map(|p| p.recommendation_ids.len())
        .sum();
    assert_eq!(phased, report.recommendations.len());
}

#[test]
fn dashboard_covers_all_six_components() {
    let report = report();
    assert_eq!(report.dashboard.health.len(), 6);
    assert_eq!(report.dashboard.progress.len(), 6);
    assert_eq!(report.roadmap.success_metrics.len(), 6);
    let trends = report.trends.as_ref().unwrap();
    assert_eq!(trends.components.len(), 6);
    assert_eq!(trends.current_overall, report.overall_score);
}

#[test]
fn executive_summary_reflects_the_headline_numbers() {
    let report = report();
    let summary = report.executive_summary.as_ref().unwrap();

    assert_eq!(summary.overall_score, report.overall_score);
    assert_eq!(summary.grade, report.grade);
    assert_eq!(summary.key_findings.len(), 3);
    assert_eq!(
        summary.investment.total_hours,
        report.roadmap.resources.total_hours
    );
    assert!(summary.business_impact.maintenance_cost_multiplier >= 1.0);
}

#[test]
fn assembly_is_deterministic_for_a_fixed_timestamp() {
    let config = ReportConfig::default();
    let first = assemble(inputs(), &config).unwrap();
    let second = assemble(inputs(), &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn report_serializes_to_json() {
    let value = serde_json::to_value(report()).unwrap();
    assert!(value["overall_score"].is_number());
    assert_eq!(value["files_analyzed"], 2);
    assert!(value["details"]["complexity"]["functions"].is_array());
}
