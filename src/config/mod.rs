// Sub-modules
mod complexity;
mod debt;
pub mod loader;
mod maintainability;
mod report;
mod testability;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::{QualityError, Result};

pub use complexity::{ComplexityConfig, ComplexityWeights, SeverityThresholds};
pub use debt::{
    CategoryWeights, DebtScoringConfig, PriorityThresholds, PriorityWeights, SeverityScores,
};
pub use loader::{discover_config, load_config_file, parse_config, CONFIG_FILE_NAME};
pub use maintainability::{
    ClassificationThresholds, MaintainabilityConfig, MaintainabilityWeights,
};
pub use report::{GradeThresholds, QualityWeights, ReportConfig};
pub use testability::{FactorThresholds, TestabilityConfig, TestabilityWeights};

/// Root configuration, one section per stage.
///
/// Every field has a pure default; a TOML document only needs the keys it
/// overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    #[serde(default)]
    pub complexity: ComplexityConfig,
    #[serde(default)]
    pub maintainability: MaintainabilityConfig,
    #[serde(default)]
    pub testability: TestabilityConfig,
    #[serde(default)]
    pub debt: DebtScoringConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl QualityConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        parse_config(contents)
    }

    pub fn load(path: &Path) -> Result<Self> {
        load_config_file(path)
    }

    /// Check every section, collecting all problems into one error.
    pub fn validate(&self) -> Result<()> {
        let problems: Vec<String> = [
            self.complexity.validate(),
            self.maintainability.validate(),
            self.testability.validate(),
            self.debt.validate(),
            self.report.validate(),
        ]
        .into_iter()
        .filter_map(|r| r.err())
        .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(QualityError::Configuration(problems.join("; ")))
        }
    }
}
