//! Duplicate-function detection from signature shape.
//!
//! Two functions with the same parameter list, return type, async-ness and
//! line span are reported as exact clones; dropping parameter names from the
//! fingerprint yields near clones. Fingerprints are SHA-256 digests so cluster
//! ids are stable across runs.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::core::{ratio_or, round_to, FileFacts, FunctionRecord, NormalizedScore, Priority};

use super::DuplicationDetector;

pub const MIN_DUPLICATE_LINES: usize = 6;
pub const NEAR_SIMILARITY: f64 = 0.85;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKind {
    Exact,
    Near,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct DuplicateInstance {
    pub file: PathBuf,
    pub function: String,
    pub start_line: usize,
    pub end_line: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DuplicateCluster {
    pub id: String,
    pub kind: DuplicateKind,
    pub instances: Vec<DuplicateInstance>,
    pub similarity: f64,
    /// Lines per instance
    pub lines: usize,
    /// Lines that would disappear if the copies were merged
    pub maintenance_burden: usize,
    pub priority: Priority,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DuplicationMetrics {
    /// Largest maintenance burden first
    pub clusters: Vec<DuplicateCluster>,
    pub total_lines: usize,
    pub duplicated_lines: usize,
    pub duplication_percentage: f64,
    pub overall_score: NormalizedScore,
}

impl Default for DuplicationMetrics {
    fn default() -> Self {
        Self {
            clusters: Vec::new(),
            total_lines: 0,
            duplicated_lines: 0,
            duplication_percentage: 0.0,
            overall_score: NormalizedScore::PERFECT,
        }
    }
}

impl DuplicationMetrics {
    pub fn exact_clusters(&self) -> impl Iterator<Item = &DuplicateCluster> {
        self.clusters
            .iter()
            .filter(|c| c.kind == DuplicateKind::Exact)
    }
}

pub fn burden_priority(burden: usize) -> Priority {
    match burden {
        b if b > 200 => Priority::Critical,
        b if b > 100 => Priority::High,
        b if b > 40 => Priority::Medium,
        _ => Priority::Low,
    }
}

fn fingerprint(function: &FunctionRecord, with_names: bool) -> String {
    let mut hasher = Sha256::new();
    for p in &function.parameters {
        if with_names {
            hasher.update(p.name.as_bytes());
        }
        hasher.update(b":");
        hasher.update(p.type_name.as_deref().unwrap_or("_").as_bytes());
        hasher.update(if p.optional { b"?;" } else { b";;" });
    }
    hasher.update(b"->");
    hasher.update(function.return_type.as_deref().unwrap_or("_").as_bytes());
    hasher.update(if function.is_async { b"async" } else { b"sync " });
    hasher.update(function.line_count().to_le_bytes());
    format!("{:x}", hasher.finalize())
}

fn instance(function: &FunctionRecord) -> DuplicateInstance {
    DuplicateInstance {
        file: function.file.clone(),
        function: function.name.clone(),
        start_line: function.start_line,
        end_line: function.end_line,
    }
}

fn cluster(
    kind: DuplicateKind,
    hash: &str,
    mut instances: Vec<DuplicateInstance>,
    lines: usize,
) -> DuplicateCluster {
    instances.sort();
    let burden = (instances.len() - 1).saturating_mul(lines);
    let prefix = match kind {
        DuplicateKind::Exact => "exact",
        DuplicateKind::Near => "near",
    };
    DuplicateCluster {
        id: format!("{prefix}-{}", &hash[..12]),
        kind,
        instances,
        similarity: match kind {
            DuplicateKind::Exact => 1.0,
            DuplicateKind::Near => NEAR_SIMILARITY,
        },
        lines,
        maintenance_burden: burden,
        priority: burden_priority(burden),
    }
}

fn group<'a>(
    functions: impl Iterator<Item = &'a FunctionRecord>,
    with_names: bool,
) -> BTreeMap<String, Vec<&'a FunctionRecord>> {
    let mut groups: BTreeMap<String, Vec<&FunctionRecord>> = BTreeMap::new();
    for f in functions {
        groups.entry(fingerprint(f, with_names)).or_default().push(f);
    }
    groups.retain(|_, members| members.len() > 1);
    groups
}

/// Built-in detector working from signature shape alone.
#[derive(Debug, Clone, Default)]
pub struct ShapeDuplicationDetector;

impl DuplicationDetector for ShapeDuplicationDetector {
    fn detect(&self, files: &[FileFacts]) -> DuplicationMetrics {
        let candidates: Vec<&FunctionRecord> = files
            .iter()
            .flat_map(FileFacts::all_functions)
            .filter(|f| f.line_count() >= MIN_DUPLICATE_LINES)
            .collect();

        let mut clusters = Vec::new();
        let mut in_exact: BTreeSet<(PathBuf, usize, String)> = BTreeSet::new();

        for (hash, members) in group(candidates.iter().copied(), true) {
            for f in &members {
                in_exact.insert((f.file.clone(), f.start_line, f.name.clone()));
            }
            let lines = members[0].line_count();
            clusters.push(cluster(
                DuplicateKind::Exact,
                &hash,
                members.into_iter().map(instance).collect(),
                lines,
            ));
        }

        let remaining = candidates
            .iter()
            .copied()
            .filter(|f| !in_exact.contains(&(f.file.clone(), f.start_line, f.name.clone())));
        for (hash, members) in group(remaining, false) {
            let lines = members[0].line_count();
            clusters.push(cluster(
                DuplicateKind::Near,
                &hash,
                members.into_iter().map(instance).collect(),
                lines,
            ));
        }

        clusters.sort_by(|a, b| {
            b.maintenance_burden
                .cmp(&a.maintenance_burden)
                .then_with(|| a.id.cmp(&b.id))
        });

        let total_lines = files
            .iter()
            .map(FileFacts::total_function_lines)
            .fold(0, usize::saturating_add);
        let duplicated_lines = clusters
            .iter()
            .map(|c| c.maintenance_burden)
            .fold(0, usize::saturating_add);
        let percentage = round_to(
            ratio_or(duplicated_lines as f64 * 100.0, total_lines as f64, 0.0),
            2,
        );

        debug!(
            clusters = clusters.len(),
            duplicated_lines,
            percentage,
            "Duplication detection complete"
        );

        DuplicationMetrics {
            clusters,
            total_lines,
            duplicated_lines,
            duplication_percentage: percentage,
            overall_score: NormalizedScore::new(100.0 - (2.0 * percentage).min(100.0)),
        }
    }
}
