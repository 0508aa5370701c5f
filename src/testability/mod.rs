//! Testability scoring (stage 3).
//!
//! Rates how hard each function would be to put under test from five shape
//! factors, estimates the coverage a typical suite would reach, lists the
//! paths and mocks such a suite would need, and ranks the testing work.

pub mod factors;
pub mod paths;
pub mod priority;

use std::collections::BTreeSet;
use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complexity::ComplexityMetrics;
use crate::config::TestabilityConfig;
use crate::core::{
    ratio_or, round_to, DependencyKind, FileFacts, FunctionId, FunctionRecord, ImportRecord,
    NormalizedScore, Priority, RiskLevel,
};

pub use factors::TestabilityFactors;
pub use paths::UntestedPath;
pub use priority::{PriorityMatrix, TestingEffort};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionTestability {
    pub id: FunctionId,
    pub is_exported: bool,
    pub factors: TestabilityFactors,
    pub testability_score: f64,
    pub estimated_coverage: f64,
    pub risk_level: RiskLevel,
    pub priority: Priority,
    pub required_mocks: BTreeSet<DependencyKind>,
    pub untested_paths: BTreeSet<UntestedPath>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FileTestability {
    pub path: PathBuf,
    pub function_count: usize,
    pub average_testability: f64,
    pub average_coverage: f64,
    pub risk_level: RiskLevel,
    pub required_mocks: BTreeSet<DependencyKind>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TestabilitySummary {
    pub total_functions: usize,
    pub average_testability: f64,
    pub average_coverage: f64,
    pub high_risk_functions: usize,
    pub untested_path_count: usize,
    pub total_effort_hours: f64,
}

impl Default for TestabilitySummary {
    fn default() -> Self {
        Self {
            total_functions: 0,
            average_testability: 100.0,
            average_coverage: 100.0,
            high_risk_functions: 0,
            untested_path_count: 0,
            total_effort_hours: 0.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TestabilityMetrics {
    pub functions: Vec<FunctionTestability>,
    pub files: Vec<FileTestability>,
    pub priority_matrix: PriorityMatrix,
    /// Highest priority, then best ROI, first
    pub effort_estimates: Vec<TestingEffort>,
    pub summary: TestabilitySummary,
    pub overall_score: NormalizedScore,
}

impl Default for TestabilityMetrics {
    fn default() -> Self {
        Self {
            functions: Vec::new(),
            files: Vec::new(),
            priority_matrix: PriorityMatrix::default(),
            effort_estimates: Vec::new(),
            summary: TestabilitySummary::default(),
            overall_score: NormalizedScore::PERFECT,
        }
    }
}

impl TestabilityMetrics {
    /// Functions that are both hard to test and risky to leave untested.
    pub fn high_risk_functions(&self, max_score: f64) -> impl Iterator<Item = &FunctionTestability> {
        self.functions.iter().filter(move |f| {
            f.testability_score < max_score
                && matches!(f.risk_level, RiskLevel::High | RiskLevel::Critical)
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TestabilityScorer {
    config: TestabilityConfig,
}

impl TestabilityScorer {
    pub fn new(config: TestabilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TestabilityConfig {
        &self.config
    }

    /// Score one function in the context of its file's imports.
    pub fn score_function(
        &self,
        function: &FunctionRecord,
        imports: &[ImportRecord],
        weighted_complexity: Option<f64>,
    ) -> (FunctionTestability, TestingEffort) {
        let factors = factors::compute_factors(function, imports, weighted_complexity, &self.config);
        let testability = round_to(factors.score(&self.config), 2);
        let required_mocks = paths::required_mocks(imports);
        let untested_paths = paths::untested_paths(function);

        let coverage = (testability
            - self.config.untested_path_penalty * untested_paths.len() as f64
            - self.config.mock_penalty * required_mocks.len() as f64)
            .clamp(0.0, 100.0);

        let risk_score = 100.0 - testability;
        let effort = TestingEffort::new(
            function.id(),
            risk_score,
            priority::impact_score(testability, function.is_exported),
            priority::effort_hours(
                function.line_count(),
                required_mocks.len(),
                untested_paths.len(),
            ),
            1 + untested_paths.len() + function.parameter_count(),
        );

        let scored = FunctionTestability {
            id: function.id(),
            is_exported: function.is_exported,
            factors,
            testability_score: testability,
            estimated_coverage: round_to(coverage, 2),
            risk_level: priority::risk_level(testability),
            priority: effort.priority,
            required_mocks,
            untested_paths,
        };
        (scored, effort)
    }

    /// Never fails: no functions at all is a perfect, empty report.
    pub fn analyze(
        &self,
        files: &[FileFacts],
        complexity: Option<&ComplexityMetrics>,
    ) -> TestabilityMetrics {
        let lookup = complexity.map(ComplexityMetrics::lookup);

        let per_file: Vec<(FileTestability, Vec<(FunctionTestability, TestingEffort)>)> = files
            .par_iter()
            .map(|facts| {
                let scored: Vec<(FunctionTestability, TestingEffort)> = facts
                    .all_functions()
                    .map(|f| {
                        let weighted = lookup
                            .as_ref()
                            .and_then(|l| l.get(&f.id()))
                            .map(|s| s.weighted_score);
                        self.score_function(f, &facts.imports, weighted)
                    })
                    .collect();
                (roll_up_file(facts, &scored), scored)
            })
            .collect();

        let mut metrics = TestabilityMetrics::default();
        for (file, scored) in per_file {
            metrics.files.push(file);
            for (function, effort) in scored {
                metrics.priority_matrix.record(function.priority);
                metrics.functions.push(function);
                metrics.effort_estimates.push(effort);
            }
        }
        priority::rank_efforts(&mut metrics.effort_estimates);
        metrics.summary = summarize(&metrics);
        metrics.overall_score = NormalizedScore::new(metrics.summary.average_testability);

        debug!(
            functions = metrics.summary.total_functions,
            critical = metrics.priority_matrix.critical,
            score = metrics.overall_score.value(),
            "Testability scoring complete"
        );
        metrics
    }
}

fn mean(values: impl Iterator<Item = f64>, fallback: f64) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    round_to(ratio_or(sum, count as f64, fallback), 2)
}

fn roll_up_file(facts: &FileFacts, scored: &[(FunctionTestability, TestingEffort)]) -> FileTestability {
    let average_testability = mean(scored.iter().map(|(f, _)| f.testability_score), 100.0);
    FileTestability {
        path: facts.path.clone(),
        function_count: scored.len(),
        average_testability,
        average_coverage: mean(scored.iter().map(|(f, _)| f.estimated_coverage), 100.0),
        risk_level: priority::risk_level(average_testability),
        required_mocks: paths::required_mocks(&facts.imports),
    }
}

fn summarize(metrics: &TestabilityMetrics) -> TestabilitySummary {
    let functions = &metrics.functions;
    TestabilitySummary {
        total_functions: functions.len(),
        average_testability: mean(functions.iter().map(|f| f.testability_score), 100.0),
        average_coverage: mean(functions.iter().map(|f| f.estimated_coverage), 100.0),
        high_risk_functions: functions
            .iter()
            .filter(|f| matches!(f.risk_level, RiskLevel::High | RiskLevel::Critical))
            .count(),
        untested_path_count: functions.iter().map(|f| f.untested_paths.len()).sum(),
        total_effort_hours: round_to(
            metrics.effort_estimates.iter().map(|e| e.effort_hours).sum(),
            2,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complexity::ComplexityScorer;
    use crate::core::Parameter;

    fn service_file() -> FileFacts {
        let mut facts = FileFacts::new("src/user_service.ts");
        facts.imports = ["database", "http", "redis", "fs"]
            .into_iter()
            .map(ImportRecord::new)
            .collect();
        let mut sync = FunctionRecord::new("find", "src/user_service.ts", 1, 8);
        sync.is_exported = true;
        let mut heavy = FunctionRecord::new("sync_all", "src/user_service.ts", 10, 120);
        heavy.is_async = true;
        heavy.parameters = (0..5).map(|i| Parameter::new(format!("p{i}"))).collect();
        facts.functions = vec![sync, heavy];
        facts
    }

    #[test]
    fn empty_input_is_perfect() {
        let metrics = TestabilityScorer::default().analyze(&[], None);
        assert_eq!(metrics.overall_score, NormalizedScore::PERFECT);
        assert_eq!(metrics.priority_matrix.total(), 0);
    }

    #[test]
    fn matrix_partitions_functions() {
        let facts = service_file();
        let complexity = ComplexityScorer::default()
            .analyze(std::slice::from_ref(&facts))
            .unwrap();
        let metrics = TestabilityScorer::default().analyze(&[facts], Some(&complexity));
        assert_eq!(metrics.priority_matrix.total(), metrics.functions.len());
        assert_eq!(metrics.effort_estimates.len(), metrics.functions.len());
    }

    #[test]
    fn mocks_and_paths_reduce_coverage() {
        let metrics = TestabilityScorer::default().analyze(&[service_file()], None);
        let heavy = metrics
            .functions
            .iter()
            .find(|f| f.id.name == "sync_all")
            .unwrap();
        assert!(heavy.required_mocks.len() >= 4);
        assert_eq!(heavy.untested_paths.len(), 4);
        let expected = (heavy.testability_score - 5.0 * 4.0 - 8.0 * 4.0).max(0.0);
        assert!((heavy.estimated_coverage - expected).abs() < 0.01);
    }

    #[test]
    fn scores_stay_in_range() {
        let metrics = TestabilityScorer::default().analyze(&[service_file()], None);
        for f in &metrics.functions {
            assert!((0.0..=100.0).contains(&f.testability_score));
            assert!((0.0..=100.0).contains(&f.estimated_coverage));
        }
    }
}
