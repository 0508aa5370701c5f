pub mod dependencies;
pub mod errors;
pub mod score_types;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use dependencies::{classify_import, classify_imports, DependencyKind};
pub use errors::{QualityError, Result};
pub use score_types::NormalizedScore;

/// A single declared parameter of a function.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            optional: false,
        }
    }

    pub fn typed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Function facts produced by the upstream source parser.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionRecord {
    pub name: String,
    #[serde(default)]
    pub file: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_exported: bool,
}

impl FunctionRecord {
    pub fn new(
        name: impl Into<String>,
        file: impl Into<PathBuf>,
        start_line: usize,
        end_line: usize,
    ) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            start_line,
            end_line,
            parameters: Vec::new(),
            return_type: None,
            is_async: false,
            is_exported: false,
        }
    }

    /// Inclusive line span; a record whose end precedes its start counts as one line.
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line).saturating_add(1)
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn optional_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.optional)
    }

    pub fn id(&self) -> FunctionId {
        FunctionId::new(self.file.clone(), self.name.clone(), self.start_line)
    }
}

/// Class facts produced by the upstream source parser.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassRecord {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    #[serde(default)]
    pub methods: Vec<FunctionRecord>,
    #[serde(default)]
    pub property_count: usize,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
}

impl ClassRecord {
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line).saturating_add(1)
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    #[default]
    Named,
    Default,
    Namespace,
    SideEffect,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportRecord {
    pub source: String,
    #[serde(default)]
    pub kind: ImportKind,
}

impl ImportRecord {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind: ImportKind::Named,
        }
    }

    /// Relative and absolute specifiers point inside the project; everything else is a package.
    pub fn is_external(&self) -> bool {
        !(self.source.starts_with('.') || self.source.starts_with('/'))
    }
}

/// Everything the parser knows about one source file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FileFacts {
    #[serde(default)]
    pub path: PathBuf,
    #[serde(default)]
    pub functions: Vec<FunctionRecord>,
    #[serde(default)]
    pub classes: Vec<ClassRecord>,
    #[serde(default)]
    pub imports: Vec<ImportRecord>,
}

impl FileFacts {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Top-level functions followed by class methods, in declaration order.
    pub fn all_functions(&self) -> impl Iterator<Item = &FunctionRecord> {
        self.functions
            .iter()
            .chain(self.classes.iter().flat_map(|c| c.methods.iter()))
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn import_count(&self) -> usize {
        self.imports.len()
    }

    /// Exported top-level functions plus declared classes.
    pub fn export_count(&self) -> usize {
        self.functions.iter().filter(|f| f.is_exported).count() + self.classes.len()
    }

    pub fn external_import_count(&self) -> usize {
        self.imports.iter().filter(|i| i.is_external()).count()
    }

    pub fn internal_import_count(&self) -> usize {
        self.imports.len() - self.external_import_count()
    }

    pub fn total_function_lines(&self) -> usize {
        self.all_functions()
            .map(FunctionRecord::line_count)
            .fold(0, usize::saturating_add)
    }

    /// Re-stamp every record with this file's path.
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        for function in &mut self.functions {
            function.file = path.clone();
        }
        for class in &mut self.classes {
            for method in &mut class.methods {
                method.file = path.clone();
            }
        }
        self.path = path;
        self
    }
}

/// Stable identity of a function across all stage outputs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId {
    pub file: PathBuf,
    pub name: String,
    pub line: usize,
}

impl FunctionId {
    pub fn new(file: impl Into<PathBuf>, name: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
            line,
        }
    }
}

impl std::fmt::Display for FunctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, Ord, PartialOrd)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(Priority, &str)] = &[
            (Priority::Low, "Low"),
            (Priority::Medium, "Medium"),
            (Priority::High, "High"),
            (Priority::Critical, "Critical"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(p, _)| p == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// Four-step risk ladder shared by several stages.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, Ord, PartialOrd)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

/// Round to a fixed number of decimals.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Divide, substituting `fallback` when the denominator is zero or the result is not finite.
pub fn ratio_or(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator == 0.0 {
        return fallback;
    }
    let value = numerator / denominator;
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
