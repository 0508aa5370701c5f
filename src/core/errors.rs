//! Shared error types for the scoring pipeline

use crate::observability::AnalysisStage;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for qualitymap operations
#[derive(Debug, Error)]
pub enum QualityError {
    /// Nothing to analyze at the top of the chain
    #[error("no parse results ({stage})")]
    NoInput { stage: AnalysisStage },

    /// A stage was invoked without a finished upstream bundle
    #[error("{stage} requires the {requires} bundle, which was not supplied")]
    MissingDependency {
        stage: AnalysisStage,
        requires: AnalysisStage,
    },

    /// The caller stopped waiting; `stage` is where the chain was at that moment
    #[error("analysis cancelled at {stage}")]
    Cancelled { stage: AnalysisStage },

    /// The caller-supplied deadline elapsed before the chain finished
    #[error("analysis deadline of {limit:?} exceeded")]
    DeadlineExceeded { limit: Duration },

    /// Per-file parse failure
    #[error("Parse error in {}: {message}", file.display())]
    Parse { file: PathBuf, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The blocking worker that runs the chain failed
    #[error("Worker task failed: {0}")]
    Task(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl QualityError {
    pub fn no_input(stage: AnalysisStage) -> Self {
        Self::NoInput { stage }
    }

    pub fn missing(stage: AnalysisStage, requires: AnalysisStage) -> Self {
        Self::MissingDependency { stage, requires }
    }

    /// Create a parse error for one file
    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Cancellation and deadline expiry, as opposed to computation failures
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::DeadlineExceeded { .. })
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, QualityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_input_mentions_parse_results() {
        let err = QualityError::no_input(AnalysisStage::Complexity);
        assert!(err.to_string().contains("no parse results"));
    }

    #[test]
    fn cancellation_is_distinguishable() {
        assert!(QualityError::Cancelled {
            stage: AnalysisStage::Debt
        }
        .is_cancellation());
        assert!(QualityError::DeadlineExceeded {
            limit: Duration::from_millis(5)
        }
        .is_cancellation());
        assert!(!QualityError::missing(AnalysisStage::Debt, AnalysisStage::Complexity)
            .is_cancellation());
    }

    #[test]
    fn missing_dependency_names_both_stages() {
        let msg = QualityError::missing(AnalysisStage::Debt, AnalysisStage::Duplication).to_string();
        assert!(msg.contains("debt"));
        assert!(msg.contains("duplication"));
    }
}
