//! Per-function complexity estimation.
//!
//! Every figure here is derived from function shape (line span, parameter
//! count, async-ness). There is no control-flow graph: a function's
//! "cyclomatic" value is an estimate of how many paths a function of that
//! shape typically has, not a count of its branches.

use crate::config::{ComplexityConfig, ComplexityWeights, SeverityThresholds};
use crate::core::{round_to, FunctionRecord, RiskLevel};

use super::patterns::detect_anti_patterns;
use super::{ComplexityScore, ComplexitySeverity, TestingDifficulty};

/// Base 1, plus a third of the parameters, plus one for async, plus a size penalty.
pub fn estimate_cyclomatic(line_count: usize, parameter_count: usize, is_async: bool) -> u32 {
    let size_penalty = if line_count > 50 {
        2
    } else if line_count > 20 {
        1
    } else {
        0
    };

    1 + (parameter_count / 3) as u32 + u32::from(is_async) + size_penalty
}

/// Cognitive load adds a nesting proxy once the span passes 30 lines.
pub fn estimate_cognitive(cyclomatic: u32, line_count: usize) -> u32 {
    if line_count > 30 {
        cyclomatic + 2
    } else {
        cyclomatic
    }
}

/// Step function of line count: 1..=5 for <15/<30/<50/<100/>=100 lines.
pub fn nesting_depth_for(line_count: usize) -> u32 {
    match line_count {
        0..=14 => 1,
        15..=29 => 2,
        30..=49 => 3,
        50..=99 => 4,
        _ => 5,
    }
}

pub fn nested_loop_factor(nesting_depth: u32) -> u32 {
    nesting_depth.saturating_sub(2)
}

pub fn decision_point_factor(cyclomatic: u32) -> u32 {
    cyclomatic.saturating_sub(1)
}

pub fn weighted_score(
    cyclomatic: u32,
    cognitive: u32,
    nesting_depth: u32,
    weights: &ComplexityWeights,
) -> f64 {
    let raw = weights.cyclomatic * cyclomatic as f64
        + weights.cognitive * cognitive as f64
        + weights.nesting * nesting_depth as f64
        + weights.nested_loops * nested_loop_factor(nesting_depth) as f64
        + weights.decision_points * decision_point_factor(cyclomatic) as f64;
    round_to(raw, 2)
}

pub fn classify_severity(cyclomatic: u32, thresholds: &SeverityThresholds) -> ComplexitySeverity {
    if cyclomatic >= thresholds.severe {
        ComplexitySeverity::Severe
    } else if cyclomatic >= thresholds.high {
        ComplexitySeverity::High
    } else if cyclomatic >= thresholds.medium {
        ComplexitySeverity::Medium
    } else {
        ComplexitySeverity::Low
    }
}

pub fn refactoring_risk(cyclomatic: u32, nesting_depth: u32) -> RiskLevel {
    if cyclomatic > 20 || nesting_depth > 4 {
        RiskLevel::High
    } else if cyclomatic > 10 || nesting_depth > 3 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn testing_difficulty(cyclomatic: u32, nesting_depth: u32) -> TestingDifficulty {
    match cyclomatic + 2 * nesting_depth {
        s if s >= 30 => TestingDifficulty::VeryHard,
        s if s >= 20 => TestingDifficulty::Hard,
        s if s >= 10 => TestingDifficulty::Moderate,
        _ => TestingDifficulty::Easy,
    }
}

/// Assemble a full score from already-known shape figures.
pub fn score_from_parts(
    line_count: usize,
    parameter_count: usize,
    cyclomatic: u32,
    cognitive: u32,
    config: &ComplexityConfig,
) -> ComplexityScore {
    let nesting_depth = nesting_depth_for(line_count);
    ComplexityScore {
        cyclomatic,
        cognitive,
        nesting_depth,
        weighted_score: weighted_score(cyclomatic, cognitive, nesting_depth, &config.weights),
        severity: classify_severity(cyclomatic, &config.severity),
        refactoring_risk: refactoring_risk(cyclomatic, nesting_depth),
        testing_difficulty: testing_difficulty(cyclomatic, nesting_depth),
        anti_patterns: detect_anti_patterns(
            line_count,
            parameter_count,
            cyclomatic,
            nesting_depth,
            &config.severity,
        ),
    }
}

pub fn score_function(function: &FunctionRecord, config: &ComplexityConfig) -> ComplexityScore {
    let lines = function.line_count();
    let params = function.parameter_count();
    let cyclomatic = estimate_cyclomatic(lines, params, function.is_async);
    let cognitive = estimate_cognitive(cyclomatic, lines);
    score_from_parts(lines, params, cyclomatic, cognitive, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complexity::AntiPattern;
    use crate::core::Parameter;

    #[test]
    fn long_sync_function_without_parameters() {
        let f = FunctionRecord::new("render", "a.ts", 1, 150);
        let score = score_function(&f, &ComplexityConfig::default());

        assert_eq!(score.cyclomatic, 3);
        assert_eq!(score.nesting_depth, 5);
        assert!(score.anti_patterns.contains(&AntiPattern::LargeFunction));
    }

    #[test]
    fn async_and_parameters_raise_cyclomatic() {
        let mut f = FunctionRecord::new("load", "a.ts", 1, 10);
        f.is_async = true;
        f.parameters = (0..6).map(|i| Parameter::new(format!("p{i}"))).collect();

        assert_eq!(score_function(&f, &ComplexityConfig::default()).cyclomatic, 4);
    }

    #[test]
    fn cognitive_adds_nesting_proxy_after_thirty_lines() {
        assert_eq!(estimate_cognitive(3, 30), 3);
        assert_eq!(estimate_cognitive(3, 31), 5);
    }

    #[test]
    fn nesting_steps() {
        let steps: Vec<u32> = [1, 14, 15, 29, 30, 49, 50, 99, 100, 400]
            .iter()
            .map(|l| nesting_depth_for(*l))
            .collect();
        assert_eq!(steps, vec![1, 1, 2, 2, 3, 3, 4, 4, 5, 5]);
    }

    #[test]
    fn weighted_score_uses_default_weights() {
        // 0.4*3 + 0.3*5 + 0.2*5 + 0.05*3 + 0.05*2
        let w = weighted_score(3, 5, 5, &ComplexityWeights::default());
        assert_eq!(w, 3.95);
    }

    #[test]
    fn severity_band_edges() {
        let t = SeverityThresholds::default();
        assert_eq!(classify_severity(9, &t), ComplexitySeverity::Low);
        assert_eq!(classify_severity(10, &t), ComplexitySeverity::Medium);
        assert_eq!(classify_severity(15, &t), ComplexitySeverity::High);
        assert_eq!(classify_severity(20, &t), ComplexitySeverity::Severe);
    }

    #[test]
    fn risk_and_difficulty_ladders_are_independent() {
        assert_eq!(refactoring_risk(5, 5), RiskLevel::High);
        assert_eq!(testing_difficulty(5, 5), TestingDifficulty::Moderate);
        assert_eq!(refactoring_risk(12, 1), RiskLevel::Medium);
        assert_eq!(testing_difficulty(25, 3), TestingDifficulty::VeryHard);
    }
}
