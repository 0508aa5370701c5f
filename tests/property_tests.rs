mod common;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use qualitymap::adapters::{
    DuplicationDetector, PerformanceAnalyzer, ShapeDuplicationDetector, ShapePerformanceAnalyzer,
};
use qualitymap::complexity::scorer::estimate_cyclomatic;
use qualitymap::complexity::classify_severity;
use qualitymap::config::{
    ClassificationThresholds, ComplexityConfig, QualityConfig, QualityWeights, ReportConfig,
    SeverityThresholds,
};
use qualitymap::maintainability::classify;
use qualitymap::core::Parameter;
use qualitymap::report::ComponentScores;
use qualitymap::{
    assemble, ComplexityScorer, DebtScorer, FileFacts, FunctionRecord, MaintainabilityScorer,
    NormalizedScore, ReportInputs, TestabilityScorer,
};

const FILE: &str = "src/generated.ts";

/// (line span, parameter count, async, exported) per function.
fn shapes() -> impl Strategy<Value = Vec<(usize, usize, bool, bool)>> {
    prop::collection::vec((1usize..300, 0usize..12, any::<bool>(), any::<bool>()), 1..16)
}

fn file_from(shapes: &[(usize, usize, bool, bool)]) -> FileFacts {
    let mut facts = FileFacts::new(FILE);
    let mut start = 1;
    for (i, (lines, params, is_async, exported)) in shapes.iter().enumerate() {
        let mut f = FunctionRecord::new(format!("f{i}"), FILE, start, start + lines - 1);
        f.parameters = (0..*params).map(|p| Parameter::new(format!("p{p}"))).collect();
        f.is_async = *is_async;
        f.is_exported = *exported;
        facts.functions.push(f);
        start += lines + 1;
    }
    facts
}

fn in_range(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn severity_and_classification_are_monotone(
        cyclomatic in 1u32..60,
        step in 0u32..20,
        index in 0.0f64..100.0,
        raise in 0.0f64..50.0,
    ) {
        let severity = SeverityThresholds::default();
        prop_assert!(
            classify_severity(cyclomatic + step, &severity) >= classify_severity(cyclomatic, &severity)
        );
        let tiers = ClassificationThresholds::default();
        prop_assert!(classify((index + raise).min(100.0), &tiers) >= classify(index, &tiers));
    }

    #[test]
    fn cyclomatic_never_drops_as_functions_grow(
        lines in 1usize..400,
        extra_lines in 0usize..400,
        params in 0usize..20,
        extra_params in 0usize..20,
        is_async in any::<bool>(),
    ) {
        let base = estimate_cyclomatic(lines, params, is_async);
        prop_assert!(estimate_cyclomatic(lines + extra_lines, params, is_async) >= base);
        prop_assert!(estimate_cyclomatic(lines, params + extra_params, is_async) >= base);
    }

    #[test]
    fn weighted_complexity_never_drops_with_length(
        lines in 1usize..400,
        extra_lines in 0usize..400,
        params in 0usize..12,
    ) {
        let config = ComplexityConfig::default();
        let mut short = FunctionRecord::new("f", FILE, 1, lines);
        short.parameters = (0..params).map(|p| Parameter::new(format!("p{p}"))).collect();
        let mut long = short.clone();
        long.end_line = lines + extra_lines;

        let scorer = ComplexityScorer::new(config);
        prop_assert!(
            scorer.score_function(&long).weighted_score
                >= scorer.score_function(&short).weighted_score
        );
    }

    #[test]
    fn every_function_lands_in_one_bucket(shapes in shapes()) {
        let files = vec![file_from(&shapes)];
        let complexity = ComplexityScorer::default().analyze(&files).unwrap();
        let testability = TestabilityScorer::default().analyze(&files, Some(&complexity));
        let maintainability = MaintainabilityScorer::default().analyze(&files, Some(&complexity));

        prop_assert_eq!(complexity.summary.distribution.total(), shapes.len());
        prop_assert_eq!(testability.priority_matrix.total(), shapes.len());
        prop_assert_eq!(maintainability.distribution.total(), shapes.len());
    }

    #[test]
    fn component_and_overall_scores_stay_bounded(shapes in shapes()) {
        let files = vec![file_from(&shapes)];
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

        let inputs = ReportInputs::new()
            .files_analyzed(1)
            .generated_at(Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap())
            .complexity(complexity)
            .duplication(duplication)
            .debt(debt)
            .testability(testability)
            .performance(performance)
            .maintainability(maintainability);
        let report = assemble(inputs, &ReportConfig::default()).unwrap();

        for (_, score) in report.scores.iter() {
            prop_assert!(in_range(score.value()));
        }
        prop_assert!(in_range(report.overall_score));
        for f in &report.details.testability.functions {
            prop_assert!(in_range(f.testability_score));
        }
        for f in &report.details.maintainability.functions {
            prop_assert!(in_range(f.maintainability_index));
        }
    }

    #[test]
    fn default_weights_preserve_a_uniform_score(value in 0u8..=100) {
        let s = NormalizedScore::new(f64::from(value));
        let scores = ComponentScores {
            complexity: s,
            duplication: s,
            debt: s,
            coverage: s,
            performance: s,
            maintainability: s,
        };
        prop_assert_eq!(
            scores.weighted_overall(&QualityWeights::default()),
            f64::from(value)
        );
    }

    #[test]
    fn analysis_is_repeatable(shapes in shapes()) {
        let files = vec![file_from(&shapes)];
        let first = ComplexityScorer::default().analyze(&files).unwrap();
        let second = ComplexityScorer::default().analyze(&files).unwrap();
        prop_assert_eq!(&first, &second);

        let first = TestabilityScorer::default().analyze(&files, None);
        let second = TestabilityScorer::default().analyze(&files, None);
        prop_assert_eq!(&first, &second);
    }
}

#[test]
fn default_weight_sets_sum_to_one() {
    let config = QualityConfig::default();
    let report: f64 = config.report.weights.complexity
        + config.report.weights.duplication
        + config.report.weights.debt
        + config.report.weights.coverage
        + config.report.weights.performance
        + config.report.weights.maintainability;
    assert!((report - 1.0).abs() <= 0.01);
    assert!(config.validate().is_ok());
}

#[test]
fn lopsided_weights_fail_validation_but_still_score() {
    let config: QualityConfig = QualityConfig::from_toml_str(
        "[report.weights]\ndebt = 0.9\n",
    )
    .unwrap();
    assert!(config.validate().is_err());

    let s = NormalizedScore::new(100.0);
    let scores = ComponentScores {
        complexity: s,
        duplication: s,
        debt: s,
        coverage: s,
        performance: s,
        maintainability: s,
    };
    assert!(scores.weighted_overall(&config.report.weights) > 100.0);
}
