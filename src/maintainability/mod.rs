//! Maintainability index (stage 2).
//!
//! Combines an estimated Halstead volume, a cyclomatic figure, line count and
//! an estimated comment density into the classic 0-100 maintainability index.
//! When complexity scores are available they supply the cyclomatic figure;
//! otherwise a size-based fallback is used.

pub mod halstead;
pub mod index;
pub mod suggestions;

use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complexity::ComplexityMetrics;
use crate::config::MaintainabilityConfig;
use crate::core::{round_to, FileFacts, FunctionId, FunctionRecord, NormalizedScore};

pub use halstead::{estimate_halstead, HalsteadEstimate};
pub use index::{
    classify, comment_ratio_estimate, fallback_cyclomatic, line_weighted_index,
    maintainability_index, MaintainabilityClass,
};
pub use suggestions::{ImprovementSuggestion, SuggestionKind, SuggestionTarget};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionMaintainability {
    pub id: FunctionId,
    pub line_count: usize,
    pub parameter_count: usize,
    pub cyclomatic: f64,
    pub halstead: HalsteadEstimate,
    pub comment_ratio: f64,
    pub maintainability_index: f64,
    pub classification: MaintainabilityClass,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FileMaintainability {
    pub path: PathBuf,
    pub function_count: usize,
    pub total_lines: usize,
    /// Line-weighted average of the file's function indices
    pub maintainability_index: f64,
    pub classification: MaintainabilityClass,
    pub average_volume: f64,
    pub lowest_function: Option<FunctionId>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassDistribution {
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
}

impl ClassDistribution {
    fn record(&mut self, class: MaintainabilityClass) {
        match class {
            MaintainabilityClass::Good => self.good += 1,
            MaintainabilityClass::Fair => self.fair += 1,
            MaintainabilityClass::Poor => self.poor += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.good + self.fair + self.poor
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MaintainabilityMetrics {
    pub functions: Vec<FunctionMaintainability>,
    pub files: Vec<FileMaintainability>,
    pub overall_index: f64,
    pub distribution: ClassDistribution,
    pub suggestions: Vec<ImprovementSuggestion>,
    pub overall_score: NormalizedScore,
}

impl Default for MaintainabilityMetrics {
    fn default() -> Self {
        Self {
            functions: Vec::new(),
            files: Vec::new(),
            overall_index: 100.0,
            distribution: ClassDistribution::default(),
            suggestions: Vec::new(),
            overall_score: NormalizedScore::PERFECT,
        }
    }
}

impl MaintainabilityMetrics {
    /// Files ordered from least to most maintainable.
    pub fn lowest_files(&self, limit: usize) -> Vec<&FileMaintainability> {
        let mut files: Vec<&FileMaintainability> = self.files.iter().collect();
        files.sort_by(|a, b| {
            a.maintainability_index
                .total_cmp(&b.maintainability_index)
                .then_with(|| a.path.cmp(&b.path))
        });
        files.truncate(limit);
        files
    }
}

#[derive(Debug, Clone, Default)]
pub struct MaintainabilityScorer {
    config: MaintainabilityConfig,
}

impl MaintainabilityScorer {
    pub fn new(config: MaintainabilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MaintainabilityConfig {
        &self.config
    }

    /// Index one function; `cyclomatic` overrides the size-based fallback.
    pub fn score_function(
        &self,
        function: &FunctionRecord,
        cyclomatic: Option<f64>,
    ) -> FunctionMaintainability {
        let lines = function.line_count();
        let params = function.parameter_count();
        let halstead = estimate_halstead(lines, params, function.is_async);
        let cyclomatic = cyclomatic
            .unwrap_or_else(|| fallback_cyclomatic(lines, params, function.is_async));
        let comment_ratio = comment_ratio_estimate(lines, params, function.is_exported);
        let mi = maintainability_index(
            halstead.volume,
            cyclomatic,
            lines,
            comment_ratio,
            &self.config,
        );

        FunctionMaintainability {
            id: function.id(),
            line_count: lines,
            parameter_count: params,
            cyclomatic: round_to(cyclomatic, 2),
            halstead,
            comment_ratio,
            maintainability_index: mi,
            classification: classify(mi, &self.config.classification),
        }
    }

    /// Never fails: no files, or files without functions, index as a perfect 100.
    pub fn analyze(
        &self,
        files: &[FileFacts],
        complexity: Option<&ComplexityMetrics>,
    ) -> MaintainabilityMetrics {
        let lookup = complexity.map(ComplexityMetrics::lookup);

        let per_file: Vec<(FileMaintainability, Vec<FunctionMaintainability>)> = files
            .par_iter()
            .map(|facts| {
                let functions: Vec<FunctionMaintainability> = facts
                    .all_functions()
                    .map(|f| {
                        let cyclomatic = lookup
                            .as_ref()
                            .and_then(|l| l.get(&f.id()))
                            .map(|s| s.cyclomatic as f64);
                        self.score_function(f, cyclomatic)
                    })
                    .collect();
                (self.roll_up_file(facts.path.clone(), &functions), functions)
            })
            .collect();

        let mut metrics = MaintainabilityMetrics::default();
        for (file, functions) in per_file {
            metrics.files.push(file);
            metrics.functions.extend(functions);
        }

        for f in &metrics.functions {
            metrics.distribution.record(f.classification);
        }
        metrics.overall_index = line_weighted_index(
            metrics
                .functions
                .iter()
                .map(|f| (f.maintainability_index, f.line_count)),
        );
        metrics.overall_score = NormalizedScore::new(metrics.overall_index);
        metrics.suggestions = self.suggestions(&metrics);

        debug!(
            functions = metrics.functions.len(),
            overall_index = metrics.overall_index,
            suggestions = metrics.suggestions.len(),
            "Maintainability scoring complete"
        );
        metrics
    }

    fn roll_up_file(
        &self,
        path: PathBuf,
        functions: &[FunctionMaintainability],
    ) -> FileMaintainability {
        let total_lines = functions
            .iter()
            .map(|f| f.line_count)
            .fold(0, usize::saturating_add);
        let mi = line_weighted_index(
            functions
                .iter()
                .map(|f| (f.maintainability_index, f.line_count)),
        );
        let average_volume = if functions.is_empty() {
            0.0
        } else {
            round_to(
                functions.iter().map(|f| f.halstead.volume).sum::<f64>() / functions.len() as f64,
                2,
            )
        };
        let lowest_function = functions
            .iter()
            .min_by(|a, b| {
                a.maintainability_index
                    .total_cmp(&b.maintainability_index)
                    .then_with(|| a.id.cmp(&b.id))
            })
            .map(|f| f.id.clone());

        FileMaintainability {
            path,
            function_count: functions.len(),
            total_lines,
            maintainability_index: mi,
            classification: classify(mi, &self.config.classification),
            average_volume,
            lowest_function,
        }
    }

    fn suggestions(&self, metrics: &MaintainabilityMetrics) -> Vec<ImprovementSuggestion> {
        let thresholds = &self.config.classification;
        let mut all: Vec<ImprovementSuggestion> = metrics
            .functions
            .iter()
            .filter_map(|f| suggestions::suggest_for_function(f, thresholds))
            .chain(
                metrics
                    .files
                    .iter()
                    .filter(|f| f.function_count > 0)
                    .filter_map(|f| suggestions::suggest_for_file(f, thresholds)),
            )
            .collect();
        suggestions::rank(&mut all);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complexity::ComplexityScorer;
    use crate::core::Parameter;

    fn file_with(functions: Vec<FunctionRecord>) -> FileFacts {
        let mut facts = FileFacts::new("src/billing.ts");
        facts.functions = functions;
        facts
    }

    #[test]
    fn empty_input_is_perfect() {
        let metrics = MaintainabilityScorer::default().analyze(&[], None);
        assert_eq!(metrics.overall_index, 100.0);
        assert_eq!(metrics.overall_score, NormalizedScore::PERFECT);
        assert!(metrics.suggestions.is_empty());
    }

    #[test]
    fn small_function_is_good() {
        let facts = file_with(vec![FunctionRecord::new("tiny", "src/billing.ts", 1, 5)]);
        let metrics = MaintainabilityScorer::default().analyze(&[facts], None);
        assert_eq!(metrics.functions[0].classification, MaintainabilityClass::Good);
        assert_eq!(metrics.distribution.good, 1);
    }

    #[test]
    fn long_function_is_poor_and_gets_a_suggestion() {
        let mut big = FunctionRecord::new("reconcile", "src/billing.ts", 1, 400);
        big.parameters = (0..6).map(|i| Parameter::new(format!("p{i}"))).collect();
        let metrics = MaintainabilityScorer::default().analyze(&[file_with(vec![big])], None);

        assert_eq!(metrics.functions[0].classification, MaintainabilityClass::Poor);
        let first = &metrics.suggestions[0];
        assert!(first.impact_estimate > 0.0);
        assert!(metrics
            .suggestions
            .iter()
            .any(|s| s.kind == SuggestionKind::SplitFunction));
    }

    #[test]
    fn complexity_scores_replace_the_fallback() {
        let facts = file_with(vec![FunctionRecord::new("f", "src/billing.ts", 1, 60)]);
        let complexity = ComplexityScorer::default()
            .analyze(std::slice::from_ref(&facts))
            .unwrap();
        let expected = complexity.functions[0].score.cyclomatic as f64;

        let metrics = MaintainabilityScorer::default().analyze(&[facts], Some(&complexity));
        assert_eq!(metrics.functions[0].cyclomatic, expected);
    }

    #[test]
    fn file_index_is_line_weighted() {
        let facts = file_with(vec![
            FunctionRecord::new("a", "src/billing.ts", 1, 4),
            FunctionRecord::new("b", "src/billing.ts", 10, 300),
        ]);
        let metrics = MaintainabilityScorer::default().analyze(&[facts], None);
        let file = &metrics.files[0];
        let b = &metrics.functions[1];
        assert!((file.maintainability_index - b.maintainability_index).abs() < 5.0);
        assert_eq!(file.lowest_function.as_ref().map(|id| id.name.as_str()), Some("b"));
    }
}
