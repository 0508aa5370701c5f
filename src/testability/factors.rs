//! The five testability factors.
//!
//! Each factor is a difficulty figure where higher means harder to test. The
//! three threshold factors (complexity, coupling, dependency) land in one of
//! three buckets; size and pattern are fixed ladders over function shape.

use serde::{Deserialize, Serialize};

use crate::config::{FactorThresholds, TestabilityConfig};
use crate::core::{FunctionRecord, ImportRecord};

pub const LOW_FACTOR: f64 = 20.0;
pub const MEDIUM_FACTOR: f64 = 50.0;
pub const HIGH_FACTOR: f64 = 80.0;

/// Import-text families that make a function harder to isolate, with their weight.
static DEPENDENCY_FAMILIES: &[(&str, f64, &[&str])] = &[
    (
        "database",
        3.0,
        &[
            "database", "db", "sql", "mongo", "postgres", "mysql", "prisma", "sequelize",
            "typeorm", "knex",
        ],
    ),
    (
        "network",
        2.0,
        &["http", "axios", "fetch", "request", "socket", "websocket", "net"],
    ),
    ("filesystem", 1.0, &["fs", "file", "path", "stream"]),
    ("api", 2.0, &["api", "graphql", "grpc", "rest", "client"]),
];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct TestabilityFactors {
    pub complexity: f64,
    pub coupling: f64,
    pub dependency: f64,
    pub size: f64,
    pub pattern: f64,
}

impl TestabilityFactors {
    /// `Σ weight × (100 − factor)`, clamped to [0, 100].
    pub fn score(&self, config: &TestabilityConfig) -> f64 {
        let w = &config.weights;
        let raw = w.complexity * (100.0 - self.complexity)
            + w.coupling * (100.0 - self.coupling)
            + w.dependency * (100.0 - self.dependency)
            + w.size * (100.0 - self.size)
            + w.pattern * (100.0 - self.pattern);
        if raw.is_finite() {
            raw.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

pub fn bucket(value: f64, thresholds: &FactorThresholds) -> f64 {
    if value < thresholds.low {
        LOW_FACTOR
    } else if value < thresholds.high {
        MEDIUM_FACTOR
    } else {
        HIGH_FACTOR
    }
}

/// Bucketed weighted complexity, or a size/parameter stand-in when unscored.
pub fn complexity_factor(
    function: &FunctionRecord,
    weighted_score: Option<f64>,
    thresholds: &FactorThresholds,
) -> f64 {
    let raw = weighted_score.unwrap_or_else(|| {
        function.line_count() as f64 / 10.0 + function.parameter_count() as f64
    });
    bucket(raw, thresholds)
}

pub fn coupling_factor(imports: &[ImportRecord], thresholds: &FactorThresholds) -> f64 {
    let external = imports.iter().filter(|i| i.is_external()).count();
    let internal = imports.len() - external;
    bucket((external * 2 + internal) as f64, thresholds)
}

/// Weighted count of import sources that hit a dependency family.
pub fn dependency_weight(imports: &[ImportRecord]) -> f64 {
    imports
        .iter()
        .map(|import| {
            let source = import.source.to_lowercase();
            DEPENDENCY_FAMILIES
                .iter()
                .filter(|(_, _, words)| words.iter().any(|w| source.contains(w)))
                .map(|(_, weight, _)| weight)
                .sum::<f64>()
        })
        .sum()
}

pub fn dependency_factor(imports: &[ImportRecord], thresholds: &FactorThresholds) -> f64 {
    bucket(dependency_weight(imports), thresholds)
}

pub fn size_factor(line_count: usize) -> f64 {
    match line_count {
        0..=19 => LOW_FACTOR,
        20..=49 => MEDIUM_FACTOR,
        _ => HIGH_FACTOR,
    }
}

/// Async code is harder to drive; exported functions have a public seam to test through.
pub fn pattern_factor(function: &FunctionRecord) -> f64 {
    let mut factor = MEDIUM_FACTOR;
    if function.is_async {
        factor += 10.0;
    }
    if function.is_exported {
        factor -= 20.0;
    }
    factor
}

pub fn compute_factors(
    function: &FunctionRecord,
    imports: &[ImportRecord],
    weighted_score: Option<f64>,
    config: &TestabilityConfig,
) -> TestabilityFactors {
    TestabilityFactors {
        complexity: complexity_factor(function, weighted_score, &config.complexity_thresholds),
        coupling: coupling_factor(imports, &config.coupling_thresholds),
        dependency: dependency_factor(imports, &config.dependency_thresholds),
        size: size_factor(function.line_count()),
        pattern: pattern_factor(function),
    }
}
