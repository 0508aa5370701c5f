use std::collections::BTreeSet;

use crate::config::SeverityThresholds;

use super::AntiPattern;

const LARGE_FUNCTION_LINES: usize = 50;
const DEEP_NESTING_DEPTH: u32 = 3;
const MAX_PARAMETERS: usize = 5;

/// Flag every anti-pattern the shape exhibits. Tags are independent and can co-occur.
pub fn detect_anti_patterns(
    line_count: usize,
    parameter_count: usize,
    cyclomatic: u32,
    nesting_depth: u32,
    thresholds: &SeverityThresholds,
) -> BTreeSet<AntiPattern> {
    let checks = [
        (line_count > LARGE_FUNCTION_LINES, AntiPattern::LargeFunction),
        (cyclomatic > thresholds.medium, AntiPattern::HighComplexity),
        (nesting_depth > DEEP_NESTING_DEPTH, AntiPattern::DeepNesting),
        (parameter_count > MAX_PARAMETERS, AntiPattern::TooManyParameters),
    ];

    checks
        .into_iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, pattern)| pattern)
        .collect()
}
