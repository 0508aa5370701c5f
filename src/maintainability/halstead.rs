//! Halstead software-science figures estimated from function shape.
//!
//! Operator and operand counts are not lexed; they are extrapolated from line
//! count, parameter count and async-ness with fixed multipliers, so the
//! resulting volume tracks function size rather than token content.

use serde::{Deserialize, Serialize};

use crate::core::round_to;

/// Fallback used wherever a volume is not strictly positive.
pub const MIN_VOLUME: f64 = 1.0;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HalsteadEstimate {
    pub unique_operators: u64,
    pub unique_operands: u64,
    pub total_operators: u64,
    pub total_operands: u64,
    pub vocabulary: u64,
    pub length: u64,
    pub volume: f64,
    pub difficulty: f64,
    pub effort: f64,
    pub time_seconds: f64,
    pub estimated_bugs: f64,
}

/// Counts saturate instead of wrapping, so absurd spans still yield finite figures.
pub fn estimate_halstead(line_count: usize, parameter_count: usize, is_async: bool) -> HalsteadEstimate {
    let lines = u64::try_from(line_count).unwrap_or(u64::MAX);
    let params = u64::try_from(parameter_count).unwrap_or(u64::MAX);

    let unique_operators = (5 + lines / 4).saturating_add(if is_async { 2 } else { 0 });
    let unique_operands = (3 + lines / 3).saturating_add(params);
    let total_operators = unique_operators
        .saturating_mul(2)
        .saturating_add(lines.saturating_mul(2));
    let total_operands = unique_operands
        .saturating_mul(2)
        .saturating_add((lines / 2).saturating_mul(3).saturating_add(lines % 2));

    let vocabulary = unique_operators.saturating_add(unique_operands);
    let length = total_operators.saturating_add(total_operands);

    let volume = if vocabulary > 1 {
        length as f64 * (vocabulary as f64).log2()
    } else {
        MIN_VOLUME
    };
    let difficulty = if unique_operands > 0 {
        (unique_operators as f64 / 2.0) * (total_operands as f64 / unique_operands as f64)
    } else {
        0.0
    };
    let effort = difficulty * volume;

    HalsteadEstimate {
        unique_operators,
        unique_operands,
        total_operators,
        total_operands,
        vocabulary,
        length,
        volume: round_to(volume, 2),
        difficulty: round_to(difficulty, 2),
        effort: round_to(effort, 2),
        time_seconds: round_to(effort / 18.0, 2),
        estimated_bugs: round_to(volume / 3000.0, 4),
    }
}
