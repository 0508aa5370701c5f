//! Stage tracking for logs and errors.
//!
//! The report chain runs a fixed sequence of stages. Each stage opens a
//! `tracing` span named after its [`AnalysisStage`], and errors carry the
//! stage they were raised in so a failure report says where the chain stopped.
//!
//! ## Usage
//!
//! ```ignore
//! use qualitymap::observability::{stage_span, AnalysisStage};
//!
//! let _span = stage_span(AnalysisStage::Complexity).entered();
//! // scoring work...
//! ```

use serde::Serialize;
use tracing::{info_span, Span};

/// Stages of the scoring chain, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    /// Turning source text into facts
    Parsing,
    /// Complexity scoring
    Complexity,
    /// External duplication detection
    Duplication,
    /// Technical-debt detection and prioritization
    Debt,
    /// Testability scoring
    Testability,
    /// External performance analysis
    Performance,
    /// Maintainability index scoring
    Maintainability,
    /// Composite score, dashboard, recommendations and roadmap
    ReportAssembly,
}

impl AnalysisStage {
    /// Every stage in execution order.
    pub const ALL: [AnalysisStage; 8] = [
        AnalysisStage::Parsing,
        AnalysisStage::Complexity,
        AnalysisStage::Duplication,
        AnalysisStage::Debt,
        AnalysisStage::Testability,
        AnalysisStage::Performance,
        AnalysisStage::Maintainability,
        AnalysisStage::ReportAssembly,
    ];

    /// The six analyzer stages whose bundles feed the composite score.
    pub const ANALYZERS: [AnalysisStage; 6] = [
        AnalysisStage::Complexity,
        AnalysisStage::Duplication,
        AnalysisStage::Debt,
        AnalysisStage::Testability,
        AnalysisStage::Performance,
        AnalysisStage::Maintainability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parsing => "parsing",
            Self::Complexity => "complexity",
            Self::Duplication => "duplication",
            Self::Debt => "debt",
            Self::Testability => "testability",
            Self::Performance => "performance",
            Self::Maintainability => "maintainability",
            Self::ReportAssembly => "report_assembly",
        }
    }
}

impl std::fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Span covering one stage of the chain.
pub fn stage_span(stage: AnalysisStage) -> Span {
    info_span!("stage", name = stage.as_str())
}
