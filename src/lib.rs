// Export modules for library usage
pub mod adapters;
pub mod cli;
pub mod complexity;
pub mod config;
pub mod core;
pub mod debt;
pub mod maintainability;
pub mod observability;
pub mod report;
pub mod testability;

// Re-export commonly used types
pub use crate::core::{
    FileFacts, FunctionId, FunctionRecord, NormalizedScore, Priority, QualityError, Result,
    RiskLevel,
};

pub use crate::config::QualityConfig;

pub use crate::complexity::{ComplexityMetrics, ComplexityScorer};
pub use crate::debt::{DebtMetrics, DebtScorer};
pub use crate::maintainability::{MaintainabilityMetrics, MaintainabilityScorer};
pub use crate::testability::{TestabilityMetrics, TestabilityScorer};

pub use crate::adapters::{
    DuplicationDetector, DuplicationMetrics, FactsJsonParser, PerformanceAnalyzer,
    PerformanceMetrics, SourceParser,
};

pub use crate::report::{
    assemble, CancellationFlag, QualityGrade, QualityReport, QualityReportGenerator,
    ReportInputs,
};
