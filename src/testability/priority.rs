use serde::{Deserialize, Serialize};

use crate::core::{ratio_or, round_to, FunctionId, Priority, RiskLevel};

/// Risk from a testability score: the less testable, the riskier.
pub fn risk_level(testability: f64) -> RiskLevel {
    if testability >= 80.0 {
        RiskLevel::Low
    } else if testability >= 60.0 {
        RiskLevel::Medium
    } else if testability >= 40.0 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

/// `(100 − testability)`, boosted for exported functions, capped at 100.
pub fn impact_score(testability: f64, is_exported: bool) -> f64 {
    let risk = 100.0 - testability;
    let multiplier = if is_exported { 1.5 } else { 1.0 };
    (risk * multiplier).min(100.0)
}

pub fn effort_hours(line_count: usize, mock_count: usize, path_count: usize) -> f64 {
    0.5 + line_count as f64 / 20.0 + 0.5 * mock_count as f64 + 0.25 * path_count as f64
}

/// Descending ladder; the first rung whose risk or ROI bar is met wins.
pub fn testing_priority(risk_score: f64, roi: f64) -> Priority {
    static LADDER: &[(f64, f64, Priority)] = &[
        (80.0, 8.0, Priority::Critical),
        (60.0, 5.0, Priority::High),
        (40.0, 2.0, Priority::Medium),
    ];

    LADDER
        .iter()
        .find(|(risk, min_roi, _)| risk_score >= *risk || roi >= *min_roi)
        .map(|(_, _, priority)| *priority)
        .unwrap_or(Priority::Low)
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriorityMatrix {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityMatrix {
    pub fn record(&mut self, priority: Priority) {
        match priority {
            Priority::Critical => self.critical += 1,
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

/// Testing work for one function, ranked across the codebase.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TestingEffort {
    pub id: FunctionId,
    pub priority: Priority,
    pub risk_score: f64,
    pub impact_score: f64,
    pub effort_hours: f64,
    pub roi: f64,
    pub recommended_test_cases: usize,
}

impl TestingEffort {
    pub fn new(
        id: FunctionId,
        risk_score: f64,
        impact_score: f64,
        effort_hours: f64,
        recommended_test_cases: usize,
    ) -> Self {
        let roi = ratio_or(impact_score, effort_hours, 0.0);
        Self {
            id,
            priority: testing_priority(risk_score, roi),
            risk_score: round_to(risk_score, 2),
            impact_score: round_to(impact_score, 2),
            effort_hours: round_to(effort_hours, 2),
            roi: round_to(roi, 2),
            recommended_test_cases,
        }
    }
}

/// Priority first, then ROI, then identity.
pub fn rank_efforts(efforts: &mut [TestingEffort]) {
    efforts.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.roi.total_cmp(&a.roi))
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_ladder_edges() {
        assert_eq!(risk_level(80.0), RiskLevel::Low);
        assert_eq!(risk_level(79.9), RiskLevel::Medium);
        assert_eq!(risk_level(40.0), RiskLevel::High);
        assert_eq!(risk_level(39.9), RiskLevel::Critical);
    }

    #[test]
    fn first_matching_rung_wins() {
        assert_eq!(testing_priority(85.0, 0.0), Priority::Critical);
        assert_eq!(testing_priority(10.0, 9.0), Priority::Critical);
        assert_eq!(testing_priority(65.0, 1.0), Priority::High);
        assert_eq!(testing_priority(10.0, 2.0), Priority::Medium);
        assert_eq!(testing_priority(10.0, 1.0), Priority::Low);
    }

    #[test]
    fn exported_impact_is_capped() {
        assert_eq!(impact_score(20.0, true), 100.0);
        assert_eq!(impact_score(80.0, true), 30.0);
        assert_eq!(impact_score(80.0, false), 20.0);
    }

    #[test]
    fn effort_formula() {
        assert_eq!(effort_hours(40, 2, 4), 0.5 + 2.0 + 1.0 + 1.0);
    }
}
