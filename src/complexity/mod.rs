//! Complexity scoring (stage 1).
//!
//! Scores every function and method from its shape, rolls the scores up to
//! classes and files, and summarizes the codebase as a severity distribution
//! plus a 0-100 headline score.

pub mod patterns;
pub mod rollup;
pub mod scorer;

use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ComplexityConfig;
use crate::core::{
    ratio_or, round_to, FileFacts, FunctionId, FunctionRecord, NormalizedScore, QualityError,
    Result, RiskLevel,
};
use crate::observability::AnalysisStage;

pub use rollup::{ClassComplexity, FileComplexity};
pub use scorer::{classify_severity, score_function};

const HOTSPOT_LIMIT: usize = 10;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ComplexitySeverity {
    Low,
    Medium,
    High,
    Severe,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AntiPattern {
    LargeFunction,
    HighComplexity,
    DeepNesting,
    TooManyParameters,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TestingDifficulty {
    Easy,
    Moderate,
    Hard,
    VeryHard,
}

/// Shape-derived complexity estimate of one function.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ComplexityScore {
    pub cyclomatic: u32,
    pub cognitive: u32,
    pub nesting_depth: u32,
    pub weighted_score: f64,
    pub severity: ComplexitySeverity,
    pub refactoring_risk: RiskLevel,
    pub testing_difficulty: TestingDifficulty,
    pub anti_patterns: BTreeSet<AntiPattern>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionComplexity {
    pub id: FunctionId,
    pub class_name: Option<String>,
    pub line_count: usize,
    pub parameter_count: usize,
    pub score: ComplexityScore,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeverityDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub severe: usize,
}

impl SeverityDistribution {
    pub fn record(&mut self, severity: ComplexitySeverity) {
        match severity {
            ComplexitySeverity::Low => self.low += 1,
            ComplexitySeverity::Medium => self.medium += 1,
            ComplexitySeverity::High => self.high += 1,
            ComplexitySeverity::Severe => self.severe += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.severe
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ComplexitySummary {
    pub total_functions: usize,
    pub average_cyclomatic: f64,
    pub average_cognitive: f64,
    pub max_cyclomatic: u32,
    pub distribution: SeverityDistribution,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ComplexityMetrics {
    pub functions: Vec<FunctionComplexity>,
    pub classes: Vec<ClassComplexity>,
    pub files: Vec<FileComplexity>,
    pub summary: ComplexitySummary,
    /// Highest weighted scores first
    pub hotspots: Vec<FunctionComplexity>,
    pub overall_score: NormalizedScore,
}

impl Default for ComplexityMetrics {
    fn default() -> Self {
        Self {
            functions: Vec::new(),
            classes: Vec::new(),
            files: Vec::new(),
            summary: ComplexitySummary::default(),
            hotspots: Vec::new(),
            overall_score: NormalizedScore::PERFECT,
        }
    }
}

impl ComplexityMetrics {
    /// Index of function scores by identity, for downstream stages.
    pub fn lookup(&self) -> HashMap<&FunctionId, &ComplexityScore> {
        self.functions.iter().map(|f| (&f.id, &f.score)).collect()
    }

    pub fn functions_with_severity(
        &self,
        severities: &[ComplexitySeverity],
    ) -> impl Iterator<Item = &FunctionComplexity> {
        let severities = severities.to_vec();
        self.functions
            .iter()
            .filter(move |f| severities.contains(&f.score.severity))
    }
}

/// Headline score: 100 minus the weighted share of medium/high/severe functions.
pub fn complexity_health(distribution: &SeverityDistribution) -> NormalizedScore {
    let total = distribution.total();
    if total == 0 {
        return NormalizedScore::PERFECT;
    }
    let burden = 0.25 * distribution.medium as f64
        + 0.6 * distribution.high as f64
        + 1.0 * distribution.severe as f64;
    NormalizedScore::new(round_to(100.0 * (1.0 - burden / total as f64), 2))
}

struct FileScores {
    functions: Vec<FunctionComplexity>,
    classes: Vec<ClassComplexity>,
    file: FileComplexity,
}

#[derive(Debug, Clone, Default)]
pub struct ComplexityScorer {
    config: ComplexityConfig,
}

impl ComplexityScorer {
    pub fn new(config: ComplexityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComplexityConfig {
        &self.config
    }

    pub fn score_function(&self, function: &FunctionRecord) -> ComplexityScore {
        scorer::score_function(function, &self.config)
    }

    /// Score every file. No files at all is an error; files without functions are not.
    pub fn analyze(&self, files: &[FileFacts]) -> Result<ComplexityMetrics> {
        if files.is_empty() {
            return Err(QualityError::no_input(AnalysisStage::Complexity));
        }

        let per_file: Vec<FileScores> = files.par_iter().map(|f| self.score_file(f)).collect();

        let mut metrics = ComplexityMetrics::default();
        for scores in per_file {
            metrics.functions.extend(scores.functions);
            metrics.classes.extend(scores.classes);
            metrics.files.push(scores.file);
        }
        metrics.summary = summarize(&metrics.functions);
        metrics.hotspots = hotspots(&metrics.functions);
        metrics.overall_score = complexity_health(&metrics.summary.distribution);

        debug!(
            functions = metrics.summary.total_functions,
            files = metrics.files.len(),
            score = metrics.overall_score.value(),
            "Complexity scoring complete"
        );
        Ok(metrics)
    }

    fn score_file(&self, facts: &FileFacts) -> FileScores {
        let functions: Vec<FunctionComplexity> = facts
            .functions
            .iter()
            .map(|f| self.function_complexity(f, None))
            .collect();

        let mut all_scored = functions.clone();
        let mut classes = Vec::with_capacity(facts.classes.len());
        for class in &facts.classes {
            let methods: Vec<FunctionComplexity> = class
                .methods
                .iter()
                .map(|m| self.function_complexity(m, Some(&class.name)))
                .collect();
            classes.push(rollup::roll_up_class(
                &class.name,
                facts.path.clone(),
                &methods,
            ));
            all_scored.extend(methods);
        }

        let file = rollup::roll_up_file(facts.path.clone(), &functions, &classes, &all_scored);
        FileScores {
            functions: all_scored,
            classes,
            file,
        }
    }

    fn function_complexity(
        &self,
        function: &FunctionRecord,
        class_name: Option<&str>,
    ) -> FunctionComplexity {
        FunctionComplexity {
            id: function.id(),
            class_name: class_name.map(str::to_string),
            line_count: function.line_count(),
            parameter_count: function.parameter_count(),
            score: self.score_function(function),
        }
    }
}

fn summarize(functions: &[FunctionComplexity]) -> ComplexitySummary {
    let mut distribution = SeverityDistribution::default();
    for f in functions {
        distribution.record(f.score.severity);
    }
    let n = functions.len() as f64;
    ComplexitySummary {
        total_functions: functions.len(),
        average_cyclomatic: round_to(
            ratio_or(
                functions.iter().map(|f| f.score.cyclomatic as f64).sum(),
                n,
                0.0,
            ),
            2,
        ),
        average_cognitive: round_to(
            ratio_or(
                functions.iter().map(|f| f.score.cognitive as f64).sum(),
                n,
                0.0,
            ),
            2,
        ),
        max_cyclomatic: functions
            .iter()
            .map(|f| f.score.cyclomatic)
            .max()
            .unwrap_or(0),
        distribution,
    }
}

fn hotspots(functions: &[FunctionComplexity]) -> Vec<FunctionComplexity> {
    let mut ranked: Vec<&FunctionComplexity> = functions.iter().collect();
    ranked.sort_by(|a, b| {
        b.score
            .weighted_score
            .total_cmp(&a.score.weighted_score)
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked.into_iter().take(HOTSPOT_LIMIT).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClassRecord;

    fn facts() -> FileFacts {
        let mut facts = FileFacts::new("src/orders.ts");
        facts
            .functions
            .push(FunctionRecord::new("small", "src/orders.ts", 1, 10));
        facts
            .functions
            .push(FunctionRecord::new("huge", "src/orders.ts", 20, 220));
        facts.classes.push(ClassRecord {
            name: "OrderService".into(),
            start_line: 230,
            end_line: 300,
            methods: vec![
                FunctionRecord::new("a", "src/orders.ts", 231, 240),
                FunctionRecord::new("b", "src/orders.ts", 241, 299),
            ],
            property_count: 2,
            extends: None,
            implements: vec![],
        });
        facts
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = ComplexityScorer::default().analyze(&[]).unwrap_err();
        assert!(err.to_string().contains("no parse results"));
    }

    #[test]
    fn file_without_functions_is_a_zero_bundle() {
        let metrics = ComplexityScorer::default()
            .analyze(&[FileFacts::new("empty.ts")])
            .unwrap();
        assert!(metrics.functions.is_empty());
        assert_eq!(metrics.summary.total_functions, 0);
        assert_eq!(metrics.overall_score, NormalizedScore::PERFECT);
        assert_eq!(metrics.files[0].density, 0.0);
    }

    #[test]
    fn methods_are_scored_and_rolled_up() {
        let metrics = ComplexityScorer::default().analyze(&[facts()]).unwrap();
        assert_eq!(metrics.functions.len(), 4);
        assert_eq!(metrics.classes.len(), 1);

        let class = &metrics.classes[0];
        assert_eq!(class.method_count, 2);
        // a: 10 lines -> 1, b: 59 lines -> 3
        assert_eq!(class.total_cyclomatic, 4);
        assert_eq!(class.max_cyclomatic, 3);

        let file = &metrics.files[0];
        // small 1 + huge 3 + class 4
        assert_eq!(file.total_complexity, 8);
        assert_eq!(file.density, round_to(8.0 / 3.0, 2));
    }

    #[test]
    fn distribution_partitions_functions() {
        let metrics = ComplexityScorer::default().analyze(&[facts()]).unwrap();
        assert_eq!(
            metrics.summary.distribution.total(),
            metrics.summary.total_functions
        );
    }

    #[test]
    fn hotspots_rank_by_weighted_score() {
        let metrics = ComplexityScorer::default().analyze(&[facts()]).unwrap();
        assert_eq!(metrics.hotspots[0].id.name, "huge");
    }

    #[test]
    fn health_penalizes_severe_functions_most() {
        let all_severe = SeverityDistribution {
            severe: 2,
            ..Default::default()
        };
        let all_medium = SeverityDistribution {
            medium: 2,
            ..Default::default()
        };
        assert_eq!(complexity_health(&all_severe).value(), 0.0);
        assert_eq!(complexity_health(&all_medium).value(), 75.0);
    }
}
