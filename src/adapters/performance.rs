use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complexity::ComplexityMetrics;
use crate::config::SeverityThresholds;
use crate::core::{FileFacts, NormalizedScore, Priority};

use super::PerformanceAnalyzer;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PerformancePatternKind {
    NestedIteration,
    BlockingAsync,
    OversizedHotPath,
}

impl std::fmt::Display for PerformancePatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PerformancePatternKind::NestedIteration => write!(f, "nested_iteration"),
            PerformancePatternKind::BlockingAsync => write!(f, "blocking_async"),
            PerformancePatternKind::OversizedHotPath => write!(f, "oversized_hot_path"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PerformanceImpact {
    pub score: f64,
    pub description: String,
    pub category: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PerformanceAntiPattern {
    pub kind: PerformancePatternKind,
    pub severity: Priority,
    pub file: PathBuf,
    pub function: String,
    pub impact: PerformanceImpact,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PerformanceMetrics {
    pub anti_patterns: Vec<PerformanceAntiPattern>,
    pub overall_score: NormalizedScore,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            anti_patterns: Vec::new(),
            overall_score: NormalizedScore::PERFECT,
        }
    }
}

impl PerformanceMetrics {
    pub fn count_at_least(&self, severity: Priority) -> usize {
        self.anti_patterns
            .iter()
            .filter(|p| p.severity >= severity)
            .count()
    }
}

fn penalty(severity: Priority) -> f64 {
    match severity {
        Priority::Critical => 15.0,
        Priority::High => 8.0,
        Priority::Medium => 4.0,
        Priority::Low => 1.0,
    }
}

/// Built-in analyzer flagging shapes that tend to be slow.
#[derive(Debug, Clone, Default)]
pub struct ShapePerformanceAnalyzer {
    severity: SeverityThresholds,
}

impl ShapePerformanceAnalyzer {
    pub fn new(severity: SeverityThresholds) -> Self {
        Self { severity }
    }
}

impl PerformanceAnalyzer for ShapePerformanceAnalyzer {
    fn analyze(&self, files: &[FileFacts], complexity: &ComplexityMetrics) -> PerformanceMetrics {
        let lookup = complexity.lookup();
        let mut anti_patterns = Vec::new();

        for function in files.iter().flat_map(FileFacts::all_functions) {
            let lines = function.line_count();
            let params = function.parameter_count();
            let mut flag = |kind, severity, score: f64, description: String, category: &str| {
                anti_patterns.push(PerformanceAntiPattern {
                    kind,
                    severity,
                    file: function.file.clone(),
                    function: function.name.clone(),
                    impact: PerformanceImpact {
                        score,
                        description,
                        category: category.to_string(),
                    },
                });
            };

            let Some(score) = lookup.get(&function.id()) else {
                continue;
            };

            if score.nesting_depth >= 4 && params >= 2 {
                let severity = if score.nesting_depth >= 5 {
                    Priority::High
                } else {
                    Priority::Medium
                };
                flag(
                    PerformancePatternKind::NestedIteration,
                    severity,
                    10.0 * score.nesting_depth as f64,
                    format!(
                        "'{}' likely iterates {} levels deep over {params} inputs",
                        function.name, score.nesting_depth
                    ),
                    "cpu",
                );
            }
            if function.is_async && lines > 40 {
                let severity = if lines > 100 {
                    Priority::High
                } else {
                    Priority::Medium
                };
                flag(
                    PerformancePatternKind::BlockingAsync,
                    severity,
                    (lines as f64 / 2.0).min(100.0),
                    format!(
                        "Async '{}' spans {lines} lines and may block the event loop",
                        function.name
                    ),
                    "latency",
                );
            }
            if score.cyclomatic >= self.severity.severe {
                let severity = if score.cyclomatic >= self.severity.severe * 2 {
                    Priority::Critical
                } else {
                    Priority::High
                };
                flag(
                    PerformancePatternKind::OversizedHotPath,
                    severity,
                    (score.cyclomatic as f64 * 3.0).min(100.0),
                    format!(
                        "'{}' branches {} ways on what may be a hot path",
                        function.name, score.cyclomatic
                    ),
                    "cpu",
                );
            }
        }

        let total_penalty: f64 = anti_patterns.iter().map(|p| penalty(p.severity)).sum();
        let overall_score = NormalizedScore::new(100.0 - total_penalty);

        debug!(
            anti_patterns = anti_patterns.len(),
            score = overall_score.value(),
            "Performance analysis complete"
        );
        PerformanceMetrics {
            anti_patterns,
            overall_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complexity::ComplexityScorer;
    use crate::core::{FunctionRecord, Parameter};

    fn analyze(function: FunctionRecord) -> PerformanceMetrics {
        let mut facts = FileFacts::new("src/jobs.ts");
        facts.functions.push(function);
        let files = vec![facts];
        let complexity = ComplexityScorer::default().analyze(&files).unwrap();
        ShapePerformanceAnalyzer::default().analyze(&files, &complexity)
    }

    #[test]
    fn small_function_is_clean() {
        let metrics = analyze(FunctionRecord::new("tick", "src/jobs.ts", 1, 10));
        assert!(metrics.anti_patterns.is_empty());
        assert_eq!(metrics.overall_score, NormalizedScore::PERFECT);
    }

    #[test]
    fn long_async_function_with_inputs() {
        let mut f = FunctionRecord::new("drain", "src/jobs.ts", 1, 150);
        f.is_async = true;
        f.parameters = vec![Parameter::new("queue"), Parameter::new("limit")];
        let metrics = analyze(f);

        let kinds: Vec<_> = metrics.anti_patterns.iter().map(|p| p.kind).collect();
        assert!(kinds.contains(&PerformancePatternKind::NestedIteration));
        assert!(kinds.contains(&PerformancePatternKind::BlockingAsync));
        // two high-severity findings
        assert_eq!(metrics.overall_score.value(), 84.0);
    }
}
