use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ClassificationThresholds;
use crate::core::{ratio_or, round_to, FunctionId, Priority};

use super::index::MaintainabilityClass;
use super::{FileMaintainability, FunctionMaintainability};

const CRITICAL_INDEX: f64 = 50.0;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SuggestionTarget {
    Function(FunctionId),
    File(PathBuf),
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    SplitFunction,
    ReduceComplexity,
    ReduceParameters,
    AddDocumentation,
    RestructureFile,
}

impl SuggestionKind {
    /// Index points the change is expected to recover before tier capping.
    fn raw_impact(self) -> f64 {
        match self {
            SuggestionKind::SplitFunction => 15.0,
            SuggestionKind::ReduceComplexity => 10.0,
            SuggestionKind::ReduceParameters => 5.0,
            SuggestionKind::AddDocumentation => 8.0,
            SuggestionKind::RestructureFile => 12.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ImprovementSuggestion {
    pub target: SuggestionTarget,
    pub kind: SuggestionKind,
    pub description: String,
    pub current_index: f64,
    pub priority: Priority,
    /// Never more than the distance to the next classification tier
    pub impact_estimate: f64,
    pub effort_hours: f64,
    pub roi: f64,
}

/// Points needed to reach the next tier, or `None` when already Good.
pub fn distance_to_next_tier(
    index: f64,
    class: MaintainabilityClass,
    thresholds: &ClassificationThresholds,
) -> Option<f64> {
    match class {
        MaintainabilityClass::Good => None,
        MaintainabilityClass::Fair => Some((thresholds.good - index).max(0.0)),
        MaintainabilityClass::Poor => Some((thresholds.fair - index).max(0.0)),
    }
}

fn priority_for(index: f64, class: MaintainabilityClass) -> Priority {
    match class {
        _ if index < CRITICAL_INDEX => Priority::Critical,
        MaintainabilityClass::Poor => Priority::High,
        MaintainabilityClass::Fair => Priority::Medium,
        MaintainabilityClass::Good => Priority::Low,
    }
}

fn dominant_cause(function: &FunctionMaintainability) -> SuggestionKind {
    if function.line_count > 50 {
        SuggestionKind::SplitFunction
    } else if function.cyclomatic > 10.0 {
        SuggestionKind::ReduceComplexity
    } else if function.parameter_count > 4 {
        SuggestionKind::ReduceParameters
    } else {
        SuggestionKind::AddDocumentation
    }
}

fn describe(kind: SuggestionKind, subject: &str, index: f64) -> String {
    match kind {
        SuggestionKind::SplitFunction => format!(
            "Split '{}' into smaller functions (maintainability index {:.1})",
            subject, index
        ),
        SuggestionKind::ReduceComplexity => format!(
            "Simplify control flow in '{}' (maintainability index {:.1})",
            subject, index
        ),
        SuggestionKind::ReduceParameters => format!(
            "Group the parameters of '{}' into an options object (maintainability index {:.1})",
            subject, index
        ),
        SuggestionKind::AddDocumentation => format!(
            "Document the intent and contract of '{}' (maintainability index {:.1})",
            subject, index
        ),
        SuggestionKind::RestructureFile => format!(
            "Break up {} along its responsibilities (maintainability index {:.1})",
            subject, index
        ),
    }
}

fn build(
    target: SuggestionTarget,
    kind: SuggestionKind,
    subject: &str,
    index: f64,
    class: MaintainabilityClass,
    effort_hours: f64,
    thresholds: &ClassificationThresholds,
) -> Option<ImprovementSuggestion> {
    let cap = distance_to_next_tier(index, class, thresholds)?;
    let impact_estimate = round_to(kind.raw_impact().min(cap), 2);
    Some(ImprovementSuggestion {
        target,
        kind,
        description: describe(kind, subject, index),
        current_index: index,
        priority: priority_for(index, class),
        impact_estimate,
        effort_hours: round_to(effort_hours, 2),
        roi: round_to(ratio_or(impact_estimate, effort_hours, 0.0), 2),
    })
}

pub fn suggest_for_function(
    function: &FunctionMaintainability,
    thresholds: &ClassificationThresholds,
) -> Option<ImprovementSuggestion> {
    build(
        SuggestionTarget::Function(function.id.clone()),
        dominant_cause(function),
        &function.id.name,
        function.maintainability_index,
        function.classification,
        1.0 + function.line_count as f64 / 25.0,
        thresholds,
    )
}

pub fn suggest_for_file(
    file: &FileMaintainability,
    thresholds: &ClassificationThresholds,
) -> Option<ImprovementSuggestion> {
    build(
        SuggestionTarget::File(file.path.clone()),
        SuggestionKind::RestructureFile,
        &file.path.display().to_string(),
        file.maintainability_index,
        file.classification,
        2.0 + file.total_lines as f64 / 100.0,
        thresholds,
    )
}

/// Highest priority first, then best return, then target for a stable order.
pub fn rank(suggestions: &mut [ImprovementSuggestion]) {
    suggestions.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.roi.total_cmp(&a.roi))
            .then_with(|| a.target.cmp(&b.target))
    });
}
