//! Technical-debt detection and prioritization (stage 4).
//!
//! Runs the fixed rule set over every function, class and file, bridges high
//! complexity scores and large exact clones into the same item shape, scores
//! each item, then aggregates by category and file and plans remediation.

pub mod aggregation;
pub mod remediation;
pub mod rules;
pub mod scoring;

use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapters::DuplicationMetrics;
use crate::complexity::ComplexityMetrics;
use crate::config::DebtScoringConfig;
use crate::core::{FileFacts, NormalizedScore, Priority, QualityError, Result};
use crate::observability::AnalysisStage;

pub use aggregation::{CategorySummary, DebtSummary, DebtTrend, FileDebt};
pub use remediation::RemediationGroup;
pub use rules::Finding;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DebtCategory {
    CodeSmells,
    Architecture,
    Performance,
    Complexity,
    Duplication,
}

impl DebtCategory {
    pub const ALL: [DebtCategory; 5] = [
        DebtCategory::CodeSmells,
        DebtCategory::Architecture,
        DebtCategory::Performance,
        DebtCategory::Complexity,
        DebtCategory::Duplication,
    ];
}

impl std::fmt::Display for DebtCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebtCategory::CodeSmells => write!(f, "Code Smells"),
            DebtCategory::Architecture => write!(f, "Architecture Violations"),
            DebtCategory::Performance => write!(f, "Performance Issues"),
            DebtCategory::Complexity => write!(f, "Complexity Debt"),
            DebtCategory::Duplication => write!(f, "Duplication Debt"),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DebtType {
    LongMethod,
    TooManyParameters,
    LargeClass,
    TooManyMethods,
    CircularDependency,
    GodObject,
    TightCoupling,
    LayeringViolation,
    NestedLoops,
    SyncInAsync,
    MemoryLeakRisk,
    ExcessiveImports,
    HighComplexity,
    ExactDuplication,
}

impl DebtType {
    pub fn as_str(self) -> &'static str {
        match self {
            DebtType::LongMethod => "long_method",
            DebtType::TooManyParameters => "too_many_parameters",
            DebtType::LargeClass => "large_class",
            DebtType::TooManyMethods => "too_many_methods",
            DebtType::CircularDependency => "circular_dependency",
            DebtType::GodObject => "god_object",
            DebtType::TightCoupling => "tight_coupling",
            DebtType::LayeringViolation => "layering_violation",
            DebtType::NestedLoops => "nested_loops",
            DebtType::SyncInAsync => "sync_in_async",
            DebtType::MemoryLeakRisk => "memory_leak_risk",
            DebtType::ExcessiveImports => "excessive_imports",
            DebtType::HighComplexity => "high_complexity",
            DebtType::ExactDuplication => "exact_duplication",
        }
    }

    pub fn category(self) -> DebtCategory {
        match self {
            DebtType::LongMethod
            | DebtType::TooManyParameters
            | DebtType::LargeClass
            | DebtType::TooManyMethods => DebtCategory::CodeSmells,
            DebtType::CircularDependency
            | DebtType::GodObject
            | DebtType::TightCoupling
            | DebtType::LayeringViolation => DebtCategory::Architecture,
            DebtType::NestedLoops
            | DebtType::SyncInAsync
            | DebtType::MemoryLeakRisk
            | DebtType::ExcessiveImports => DebtCategory::Performance,
            DebtType::HighComplexity => DebtCategory::Complexity,
            DebtType::ExactDuplication => DebtCategory::Duplication,
        }
    }

    /// Offset from the base confidence: counted facts score higher than inferred ones.
    pub fn confidence_adjustment(self) -> f64 {
        match self {
            DebtType::LongMethod
            | DebtType::TooManyParameters
            | DebtType::LargeClass
            | DebtType::TooManyMethods
            | DebtType::ExcessiveImports
            | DebtType::HighComplexity
            | DebtType::ExactDuplication => 0.2,
            DebtType::CircularDependency
            | DebtType::LayeringViolation
            | DebtType::NestedLoops
            | DebtType::SyncInAsync
            | DebtType::MemoryLeakRisk => -0.1,
            DebtType::GodObject | DebtType::TightCoupling => 0.0,
        }
    }

    pub fn remediation_steps(self) -> &'static [&'static str] {
        match self {
            DebtType::LongMethod => &[
                "Identify independent blocks inside the function",
                "Extract each block into a named helper",
                "Cover the extracted helpers with focused tests",
            ],
            DebtType::TooManyParameters => &[
                "Group related parameters into a parameter object",
                "Move optional parameters into an options argument",
            ],
            DebtType::LargeClass | DebtType::TooManyMethods | DebtType::GodObject => &[
                "List the responsibilities the unit currently holds",
                "Extract cohesive groups of members into new modules",
                "Route callers through the narrower interfaces",
            ],
            DebtType::CircularDependency => &[
                "Map the import cycle between the affected modules",
                "Move shared definitions into a lower-level module",
            ],
            DebtType::TightCoupling | DebtType::ExcessiveImports => &[
                "Audit imports and remove unused ones",
                "Introduce a facade for clusters of related dependencies",
            ],
            DebtType::LayeringViolation => &[
                "Route the call through the intended layer boundary",
                "Inject the dependency instead of importing it directly",
            ],
            DebtType::NestedLoops => &[
                "Replace inner scans with keyed lookups",
                "Precompute data reused across iterations",
            ],
            DebtType::SyncInAsync => &[
                "Replace blocking calls with their async counterparts",
                "Move CPU-heavy work off the async path",
            ],
            DebtType::MemoryLeakRisk => &[
                "Release listeners and handles when work completes",
                "Avoid capturing large inputs in long-lived closures",
            ],
            DebtType::HighComplexity => &[
                "Flatten nested conditionals with early returns",
                "Extract decision logic into smaller functions",
                "Cover each branch with a targeted test",
            ],
            DebtType::ExactDuplication => &[
                "Extract the duplicated body into a shared function",
                "Replace each copy with a call to the shared function",
            ],
        }
    }
}

impl std::fmt::Display for DebtType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored instance of technical debt. Never modified after scoring.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DebtItem {
    pub id: String,
    pub debt_type: DebtType,
    pub category: DebtCategory,
    pub severity: Severity,
    pub file: PathBuf,
    pub line: usize,
    pub subject: String,
    pub description: String,
    pub estimated_hours: f64,
    pub debt_score: f64,
    pub confidence: f64,
    pub change_frequency: f64,
    pub impact_score: f64,
    pub priority: Priority,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DebtMetrics {
    /// Highest priority, then highest impact, first
    pub items: Vec<DebtItem>,
    pub categories: Vec<CategorySummary>,
    pub files: Vec<FileDebt>,
    pub remediation_plan: Vec<RemediationGroup>,
    pub summary: DebtSummary,
    pub overall_score: NormalizedScore,
}

impl Default for DebtMetrics {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            categories: aggregation::summarize_categories(&[]),
            files: Vec::new(),
            remediation_plan: Vec::new(),
            summary: DebtSummary::default(),
            overall_score: NormalizedScore::PERFECT,
        }
    }
}

impl DebtMetrics {
    pub fn items_in(&self, category: DebtCategory) -> impl Iterator<Item = &DebtItem> {
        self.items.iter().filter(move |i| i.category == category)
    }

    pub fn category(&self, category: DebtCategory) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// Debt stage. Both upstream bundles must be attached before [`DebtScorer::analyze`].
#[derive(Debug, Clone, Default)]
pub struct DebtScorer<'a> {
    config: DebtScoringConfig,
    complexity: Option<&'a ComplexityMetrics>,
    duplication: Option<&'a DuplicationMetrics>,
}

impl<'a> DebtScorer<'a> {
    pub fn new(config: DebtScoringConfig) -> Self {
        Self {
            config,
            complexity: None,
            duplication: None,
        }
    }

    pub fn with_complexity(mut self, complexity: &'a ComplexityMetrics) -> Self {
        self.complexity = Some(complexity);
        self
    }

    pub fn with_duplication(mut self, duplication: &'a DuplicationMetrics) -> Self {
        self.duplication = Some(duplication);
        self
    }

    pub fn config(&self) -> &DebtScoringConfig {
        &self.config
    }

    pub fn analyze(&self, files: &[FileFacts]) -> Result<DebtMetrics> {
        let complexity = self
            .complexity
            .ok_or_else(|| QualityError::missing(AnalysisStage::Debt, AnalysisStage::Complexity))?;
        let duplication = self
            .duplication
            .ok_or_else(|| QualityError::missing(AnalysisStage::Debt, AnalysisStage::Duplication))?;

        let mut findings: Vec<Finding> = files.par_iter().flat_map_iter(detect_file).collect();
        findings.extend(rules::complexity_findings(complexity));
        findings.extend(rules::duplication_findings(duplication));

        let mut items: Vec<DebtItem> = findings
            .into_iter()
            .map(|f| scoring::score_finding(f, &self.config))
            .collect();
        rank_items(&mut items);

        let units: usize = files
            .iter()
            .map(|f| f.all_functions().count() + f.class_count())
            .sum();
        let categories = aggregation::summarize_categories(&items);
        let overall_score = NormalizedScore::new(aggregation::debt_health(
            &categories,
            units,
            &self.config.category_weights,
        ));

        let metrics = DebtMetrics {
            files: aggregation::summarize_files(files, &items),
            remediation_plan: remediation::build_plan(&items),
            summary: aggregation::summarize(&items),
            categories,
            items,
            overall_score,
        };

        debug!(
            items = metrics.summary.total_items,
            hours = metrics.summary.total_hours,
            score = metrics.overall_score.value(),
            "Debt scoring complete"
        );
        Ok(metrics)
    }
}

fn detect_file(facts: &FileFacts) -> Vec<Finding> {
    let mut findings: Vec<Finding> = facts.all_functions().flat_map(rules::function_findings).collect();
    for class in &facts.classes {
        findings.extend(rules::class_findings(class, &facts.path));
    }
    findings.extend(rules::file_findings(facts));
    findings
}

fn rank_items(items: &mut [DebtItem]) {
    items.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.impact_score.total_cmp(&a.impact_score))
            .then_with(|| a.id.cmp(&b.id))
    });
}
