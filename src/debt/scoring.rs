use std::path::Path;

use crate::config::DebtScoringConfig;
use crate::core::{round_to, Priority};

use super::rules::Finding;
use super::{DebtItem, Severity};

const BASE_CONFIDENCE: f64 = 0.7;
const BASE_CHANGE_FREQUENCY: f64 = 0.5;

pub fn severity_base_score(severity: Severity, config: &DebtScoringConfig) -> f64 {
    match severity {
        Severity::Low => config.severity_scores.low,
        Severity::Medium => config.severity_scores.medium,
        Severity::High => config.severity_scores.high,
    }
}

/// Base score scaled by up to 3x as the estimated effort grows.
pub fn debt_score(severity: Severity, hours: f64, config: &DebtScoringConfig) -> f64 {
    severity_base_score(severity, config) * (1.0 + (hours / 10.0).min(2.0))
}

/// Simulated from path naming; there is no version history to consult.
pub fn change_frequency(path: &Path) -> f64 {
    let path = path.to_string_lossy().to_lowercase();
    let mut frequency = BASE_CHANGE_FREQUENCY;
    if path.contains("service") || path.contains("controller") {
        frequency += 0.3;
    }
    if path.contains("component") {
        frequency += 0.2;
    }
    if path.contains("util") || path.contains("helper") {
        frequency -= 0.1;
    }
    round_to(frequency.clamp(0.1, 1.0), 2)
}

/// `impact_weight × impact + change_frequency_weight × change_frequency` on the
/// four-tier ladder. Ranking by this value can disagree with ranking by impact.
pub fn priority_for(impact: f64, change_frequency: f64, config: &DebtScoringConfig) -> Priority {
    let w = &config.priority_weights;
    let t = &config.priority_thresholds;
    let value = w.impact * impact + w.change_frequency * change_frequency;
    if value >= t.critical {
        Priority::Critical
    } else if value >= t.high {
        Priority::High
    } else if value >= t.medium {
        Priority::Medium
    } else {
        Priority::Low
    }
}

pub fn score_finding(finding: Finding, config: &DebtScoringConfig) -> DebtItem {
    let hours = finding.estimated_hours.max(0.1);
    let score = debt_score(finding.severity, hours, config);
    let confidence = (BASE_CONFIDENCE + finding.debt_type.confidence_adjustment()).clamp(0.0, 1.0);
    let change_frequency = change_frequency(&finding.file);
    let impact = score * confidence;

    DebtItem {
        id: format!(
            "{}:{}:{}:{}",
            finding.debt_type.as_str(),
            finding.file.display(),
            finding.line,
            finding.subject
        ),
        category: finding.debt_type.category(),
        debt_type: finding.debt_type,
        severity: finding.severity,
        file: finding.file,
        line: finding.line,
        subject: finding.subject,
        description: finding.description,
        estimated_hours: round_to(hours, 2),
        debt_score: round_to(score, 2),
        confidence: round_to(confidence, 2),
        change_frequency: round_to(change_frequency, 2),
        impact_score: round_to(impact, 2),
        priority: priority_for(impact, change_frequency, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debt::DebtType;
    use std::path::PathBuf;

    fn finding(debt_type: DebtType, severity: Severity, hours: f64, file: &str) -> Finding {
        Finding {
            debt_type,
            severity,
            file: PathBuf::from(file),
            line: 1,
            subject: "f".into(),
            description: String::new(),
            estimated_hours: hours,
        }
    }

    #[test]
    fn score_multiplier_is_capped_at_three() {
        let config = DebtScoringConfig::default();
        assert_eq!(debt_score(Severity::High, 5.0, &config), 75.0);
        assert_eq!(debt_score(Severity::High, 100.0, &config), 150.0);
    }

    #[test]
    fn change_frequency_heuristics() {
        assert_eq!(change_frequency(Path::new("src/order_service.ts")), 0.8);
        assert_eq!(change_frequency(Path::new("src/Button.component.tsx")), 0.7);
        assert_eq!(change_frequency(Path::new("src/string_utils.ts")), 0.4);
        assert_eq!(change_frequency(Path::new("src/index.ts")), 0.5);
    }

    #[test]
    fn reliable_types_are_more_confident() {
        let config = DebtScoringConfig::default();
        let long = score_finding(finding(DebtType::LongMethod, Severity::Low, 1.0, "a.ts"), &config);
        let leak = score_finding(
            finding(DebtType::MemoryLeakRisk, Severity::Low, 1.0, "a.ts"),
            &config,
        );
        assert_eq!(long.confidence, 0.9);
        assert_eq!(leak.confidence, 0.6);
        assert_eq!(long.impact_score, round_to(long.debt_score * 0.9, 2));
    }

    #[test]
    fn priority_ladder() {
        let config = DebtScoringConfig::default();
        assert_eq!(priority_for(100.0, 0.5, &config), Priority::Critical);
        assert_eq!(priority_for(50.0, 0.5, &config), Priority::High);
        assert_eq!(priority_for(22.0, 0.5, &config), Priority::Medium);
        assert_eq!(priority_for(5.0, 1.0, &config), Priority::Low);
    }
}
