use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{ratio_or, round_to, RiskLevel};

use super::FunctionComplexity;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassComplexity {
    pub name: String,
    pub file: PathBuf,
    pub method_count: usize,
    pub total_cyclomatic: u32,
    pub max_cyclomatic: u32,
    pub total_cognitive: u32,
    pub average_cyclomatic: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FileComplexity {
    pub path: PathBuf,
    pub function_count: usize,
    pub class_count: usize,
    pub total_complexity: u32,
    pub average_complexity: f64,
    pub max_complexity: u32,
    /// Total complexity per declared unit (function or class)
    pub density: f64,
    pub maintainability_risk: RiskLevel,
}

pub fn roll_up_class(name: &str, file: PathBuf, methods: &[FunctionComplexity]) -> ClassComplexity {
    let total_cyclomatic: u32 = methods.iter().map(|m| m.score.cyclomatic).sum();
    ClassComplexity {
        name: name.to_string(),
        file,
        method_count: methods.len(),
        total_cyclomatic,
        max_cyclomatic: methods.iter().map(|m| m.score.cyclomatic).max().unwrap_or(0),
        total_cognitive: methods.iter().map(|m| m.score.cognitive).sum(),
        average_cyclomatic: round_to(
            ratio_or(total_cyclomatic as f64, methods.len() as f64, 0.0),
            2,
        ),
    }
}

/// `functions` are the file's top-level functions; `all_scored` also includes methods.
pub fn roll_up_file(
    path: PathBuf,
    functions: &[FunctionComplexity],
    classes: &[ClassComplexity],
    all_scored: &[FunctionComplexity],
) -> FileComplexity {
    let total_complexity = functions.iter().map(|f| f.score.cyclomatic).sum::<u32>()
        + classes.iter().map(|c| c.total_cyclomatic).sum::<u32>();
    let unit_count = functions.len() + classes.len();
    let average_complexity = round_to(
        ratio_or(
            all_scored.iter().map(|f| f.score.cyclomatic as f64).sum(),
            all_scored.len() as f64,
            0.0,
        ),
        2,
    );
    let max_complexity = all_scored
        .iter()
        .map(|f| f.score.cyclomatic)
        .max()
        .unwrap_or(0);

    FileComplexity {
        path,
        function_count: functions.len(),
        class_count: classes.len(),
        total_complexity,
        average_complexity,
        max_complexity,
        density: round_to(ratio_or(total_complexity as f64, unit_count as f64, 0.0), 2),
        maintainability_risk: maintainability_risk(average_complexity, max_complexity),
    }
}

/// File-level risk from the (average, max) complexity pair.
pub fn maintainability_risk(average: f64, max: u32) -> RiskLevel {
    if average > 15.0 || max > 30 {
        RiskLevel::Critical
    } else if average > 10.0 || max > 20 {
        RiskLevel::High
    } else if average > 5.0 || max > 10 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
