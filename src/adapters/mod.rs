//! Seams to the collaborators the scoring chain consumes but does not own.
//!
//! The report generator only sees these traits. Built-in implementations work
//! from the same shape heuristics as the scorers; real parsers and detectors
//! can be plugged in through [`crate::report::QualityReportGenerator`].

pub mod duplication;
pub mod parser;
pub mod performance;

use std::path::Path;

use crate::complexity::ComplexityMetrics;
use crate::core::{FileFacts, Result};

pub use duplication::{
    DuplicateCluster, DuplicateInstance, DuplicateKind, DuplicationMetrics,
    ShapeDuplicationDetector,
};
pub use parser::FactsJsonParser;
pub use performance::{
    PerformanceAntiPattern, PerformanceImpact, PerformanceMetrics, PerformancePatternKind,
    ShapePerformanceAnalyzer,
};

/// Turns one file's source text into facts. A failure skips that file only.
pub trait SourceParser: Send + Sync {
    fn parse(&self, path: &Path, source: &str) -> Result<FileFacts>;
}

pub trait DuplicationDetector: Send + Sync {
    fn detect(&self, files: &[FileFacts]) -> DuplicationMetrics;
}

pub trait PerformanceAnalyzer: Send + Sync {
    fn analyze(&self, files: &[FileFacts], complexity: &ComplexityMetrics) -> PerformanceMetrics;
}
