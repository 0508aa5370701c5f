use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::CategoryWeights;
use crate::core::{classify_imports, round_to, DependencyKind, FileFacts, Priority};

use super::{DebtCategory, DebtItem, Severity};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DebtTrend {
    Improving,
    Stable,
    Worsening,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub category: DebtCategory,
    pub item_count: usize,
    pub total_score: f64,
    pub total_hours: f64,
    pub high_severity_count: usize,
    pub trend: DebtTrend,
    pub priority: Priority,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FileDebt {
    pub path: PathBuf,
    pub item_count: usize,
    pub total_score: f64,
    pub total_hours: f64,
    pub by_category: BTreeMap<DebtCategory, f64>,
    /// 1-based rank by total score, highest first
    pub remediation_order: usize,
    pub dependency_kinds: BTreeSet<DependencyKind>,
}

impl FileDebt {
    /// `100 − min(100, total score)`.
    pub fn health(&self) -> f64 {
        100.0 - self.total_score.min(100.0)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DebtSummary {
    pub total_items: usize,
    pub total_score: f64,
    pub total_hours: f64,
    pub high_severity_items: usize,
    pub critical_items: usize,
    pub high_priority_items: usize,
}

fn trend(high: usize, total: usize) -> DebtTrend {
    if total == 0 {
        return DebtTrend::Improving;
    }
    let ratio = high as f64 / total as f64;
    if ratio > 0.5 {
        DebtTrend::Worsening
    } else if ratio > 0.2 {
        DebtTrend::Stable
    } else {
        DebtTrend::Improving
    }
}

fn category_priority(items: &[&DebtItem]) -> Priority {
    let critical = items.iter().filter(|i| i.priority == Priority::Critical).count();
    let high = items.iter().filter(|i| i.priority == Priority::High).count();
    if critical > 0 {
        Priority::Critical
    } else if high >= 2 {
        Priority::High
    } else if !items.is_empty() {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// One summary per category, in category order, including empty ones.
pub fn summarize_categories(items: &[DebtItem]) -> Vec<CategorySummary> {
    DebtCategory::ALL
        .iter()
        .map(|&category| {
            let members: Vec<&DebtItem> = items.iter().filter(|i| i.category == category).collect();
            let high = members
                .iter()
                .filter(|i| i.severity == Severity::High)
                .count();
            CategorySummary {
                category,
                item_count: members.len(),
                total_score: round_to(members.iter().map(|i| i.debt_score).sum(), 2),
                total_hours: round_to(members.iter().map(|i| i.estimated_hours).sum(), 2),
                high_severity_count: high,
                trend: trend(high, members.len()),
                priority: category_priority(&members),
            }
        })
        .collect()
}

/// Per-file totals for every analyzed file, ranked by total score.
pub fn summarize_files(files: &[FileFacts], items: &[DebtItem]) -> Vec<FileDebt> {
    let mut summaries: Vec<FileDebt> = files
        .iter()
        .map(|facts| {
            let members: Vec<&DebtItem> = items.iter().filter(|i| i.file == facts.path).collect();
            let mut by_category = BTreeMap::new();
            for item in &members {
                *by_category.entry(item.category).or_insert(0.0) += item.debt_score;
            }
            FileDebt {
                path: facts.path.clone(),
                item_count: members.len(),
                total_score: round_to(members.iter().map(|i| i.debt_score).sum(), 2),
                total_hours: round_to(members.iter().map(|i| i.estimated_hours).sum(), 2),
                by_category,
                remediation_order: 0,
                dependency_kinds: classify_imports(facts.imports.iter().map(|i| i.source.as_str())),
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.total_score
            .total_cmp(&a.total_score)
            .then_with(|| a.path.cmp(&b.path))
    });
    for (rank, file) in summaries.iter_mut().enumerate() {
        file.remediation_order = rank + 1;
    }
    summaries
}

pub fn summarize(items: &[DebtItem]) -> DebtSummary {
    DebtSummary {
        total_items: items.len(),
        total_score: round_to(items.iter().map(|i| i.debt_score).sum(), 2),
        total_hours: round_to(items.iter().map(|i| i.estimated_hours).sum(), 2),
        high_severity_items: items.iter().filter(|i| i.severity == Severity::High).count(),
        critical_items: items
            .iter()
            .filter(|i| i.priority == Priority::Critical)
            .count(),
        high_priority_items: items
            .iter()
            .filter(|i| i.priority == Priority::High)
            .count(),
    }
}

/// `100 − Σ w_c · min(100, 10 · score_c / max(1, units))`, clamped to [0, 100].
pub fn debt_health(categories: &[CategorySummary], units: usize, weights: &CategoryWeights) -> f64 {
    let units = units.max(1) as f64;
    let penalty: f64 = categories
        .iter()
        .map(|c| {
            let weight = match c.category {
                DebtCategory::CodeSmells => weights.code_smells,
                DebtCategory::Architecture => weights.architecture,
                DebtCategory::Performance => weights.performance,
                DebtCategory::Complexity => weights.complexity,
                DebtCategory::Duplication => weights.duplication,
            };
            weight * (10.0 * c.total_score / units).min(100.0)
        })
        .sum();
    round_to((100.0 - penalty).clamp(0.0, 100.0), 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_thresholds() {
        assert_eq!(trend(0, 0), DebtTrend::Improving);
        assert_eq!(trend(1, 10), DebtTrend::Improving);
        assert_eq!(trend(3, 10), DebtTrend::Stable);
        assert_eq!(trend(6, 10), DebtTrend::Worsening);
    }

    #[test]
    fn no_debt_is_full_health() {
        let categories = summarize_categories(&[]);
        assert_eq!(categories.len(), 5);
        assert_eq!(debt_health(&categories, 0, &CategoryWeights::default()), 100.0);
    }
}
