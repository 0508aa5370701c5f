use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{ratio_or, round_to};

use super::{DebtCategory, DebtItem};

/// All items of one category, planned as a single body of work.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RemediationGroup {
    pub category: DebtCategory,
    pub item_ids: Vec<String>,
    pub total_hours: f64,
    pub total_impact: f64,
    /// Summed impact over summed hours for the whole group, not a sum or mean
    /// of per-item ratios. Zero when the group carries no hours.
    pub roi: f64,
    pub affected_files: BTreeSet<PathBuf>,
    /// Deduplicated, in first-seen order
    pub steps: Vec<String>,
}

/// Group items by category, largest summed impact first.
pub fn build_plan(items: &[DebtItem]) -> Vec<RemediationGroup> {
    let mut groups: Vec<RemediationGroup> = DebtCategory::ALL
        .iter()
        .filter_map(|&category| {
            let members: Vec<&DebtItem> = items.iter().filter(|i| i.category == category).collect();
            if members.is_empty() {
                return None;
            }

            let total_hours: f64 = members.iter().map(|i| i.estimated_hours).sum();
            let total_impact: f64 = members.iter().map(|i| i.impact_score).sum();
            let mut steps: Vec<String> = Vec::new();
            for item in &members {
                for step in item.debt_type.remediation_steps() {
                    if !steps.iter().any(|s| s == step) {
                        steps.push((*step).to_string());
                    }
                }
            }

            Some(RemediationGroup {
                category,
                item_ids: members.iter().map(|i| i.id.clone()).collect(),
                total_hours: round_to(total_hours, 2),
                total_impact: round_to(total_impact, 2),
                roi: round_to(ratio_or(total_impact, total_hours, 0.0), 2),
                affected_files: members.iter().map(|i| i.file.clone()).collect(),
                steps,
            })
        })
        .collect();

    groups.sort_by(|a, b| {
        b.total_impact
            .total_cmp(&a.total_impact)
            .then_with(|| a.category.cmp(&b.category))
    });
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Priority;
    use crate::debt::{DebtType, Severity};

    fn item(id: &str, hours: f64, impact: f64) -> DebtItem {
        DebtItem {
            id: id.to_string(),
            debt_type: DebtType::LongMethod,
            category: DebtCategory::CodeSmells,
            severity: Severity::Medium,
            file: PathBuf::from("a.ts"),
            line: 1,
            subject: id.to_string(),
            description: String::new(),
            estimated_hours: hours,
            debt_score: impact,
            confidence: 1.0,
            change_frequency: 0.5,
            impact_score: impact,
            priority: Priority::Medium,
        }
    }

    #[test]
    fn roi_is_group_impact_over_group_hours() {
        let plan = build_plan(&[item("quick", 1.0, 10.0), item("slow", 9.0, 10.0)]);
        assert_eq!(plan.len(), 1);
        let group = &plan[0];
        assert_eq!(group.total_hours, 10.0);
        assert_eq!(group.total_impact, 20.0);
        // Per-item ratios would sum to 11.11 and average to 5.56.
        assert_eq!(group.roi, 2.0);
    }

    #[test]
    fn zero_hour_group_has_no_roi() {
        let plan = build_plan(&[item("free", 0.0, 5.0)]);
        assert_eq!(plan[0].roi, 0.0);
    }
}
