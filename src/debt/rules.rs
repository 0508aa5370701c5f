//! Fixed detection rules.
//!
//! Every rule inspects one function, class or file and yields zero or more
//! [`Finding`]s: the raw observation with its severity and estimated effort.
//! Scoring and prioritization happen later, in `scoring`.

use std::path::{Path, PathBuf};

use crate::adapters::{DuplicateKind, DuplicationMetrics};
use crate::complexity::{ComplexityMetrics, ComplexitySeverity};
use crate::core::{ClassRecord, FileFacts, FunctionRecord, Priority};

use super::{DebtType, Severity};

const UI_MARKERS: &[&str] = &["component", "view", "page", "screen", "ui", "widget"];
const SERVICE_MARKERS: &[&str] = &["service", "repository", "repo", "dao", "store", "model"];

/// One rule hit before scoring.
#[derive(Clone, Debug, PartialEq)]
pub struct Finding {
    pub debt_type: DebtType,
    pub severity: Severity,
    pub file: PathBuf,
    pub line: usize,
    /// Function, class or file the finding is about
    pub subject: String,
    pub description: String,
    pub estimated_hours: f64,
}

impl Finding {
    fn new(
        debt_type: DebtType,
        severity: Severity,
        file: &Path,
        line: usize,
        subject: impl Into<String>,
        description: String,
        estimated_hours: f64,
    ) -> Self {
        Self {
            debt_type,
            severity,
            file: file.to_path_buf(),
            line,
            subject: subject.into(),
            description,
            estimated_hours,
        }
    }
}

/// Three-step severity ladder: above `high` is high, above `medium` is medium.
fn ladder(value: usize, medium: usize, high: usize) -> Severity {
    if value > high {
        Severity::High
    } else if value > medium {
        Severity::Medium
    } else {
        Severity::Low
    }
}

pub fn function_findings(function: &FunctionRecord) -> Vec<Finding> {
    let lines = function.line_count();
    let params = function.parameter_count();
    let file = function.file.as_path();
    let line = function.start_line;
    let name = function.name.as_str();
    let mut findings = Vec::new();

    if lines > 30 {
        findings.push(Finding::new(
            DebtType::LongMethod,
            ladder(lines, 50, 100),
            file,
            line,
            name,
            format!("Function '{name}' spans {lines} lines"),
            2.0 + lines as f64 / 50.0,
        ));
    }
    if params > 5 {
        findings.push(Finding::new(
            DebtType::TooManyParameters,
            ladder(params, 6, 8),
            file,
            line,
            name,
            format!("Function '{name}' takes {params} parameters"),
            1.0 + (params - 5) as f64 * 0.5,
        ));
    }
    if lines > 20 && params > 2 {
        findings.push(Finding::new(
            DebtType::NestedLoops,
            ladder(lines, 30, 50),
            file,
            line,
            name,
            format!("Function '{name}' is likely to iterate over several of its {params} inputs"),
            2.0 + lines as f64 / 40.0,
        ));
    }
    if function.is_async && lines > 15 {
        let severity = if lines > 40 {
            Severity::Medium
        } else {
            Severity::Low
        };
        findings.push(Finding::new(
            DebtType::SyncInAsync,
            severity,
            file,
            line,
            name,
            format!("Async function '{name}' is long enough to hide blocking work"),
            1.5,
        ));
    }
    if lines > 30 && params > 3 {
        findings.push(Finding::new(
            DebtType::MemoryLeakRisk,
            ladder(lines, 60, 80),
            file,
            line,
            name,
            format!("Function '{name}' holds {params} inputs across {lines} lines"),
            3.0,
        ));
    }
    findings
}

pub fn class_findings(class: &ClassRecord, file: &Path) -> Vec<Finding> {
    let methods = class.method_count();
    let lines = class.line_count();
    let name = class.name.as_str();
    let mut findings = Vec::new();

    if methods > 20 || lines > 500 {
        let severity = if methods > 40 || lines > 1000 {
            Severity::High
        } else if methods > 30 || lines > 750 {
            Severity::Medium
        } else {
            Severity::Low
        };
        findings.push(Finding::new(
            DebtType::LargeClass,
            severity,
            file,
            class.start_line,
            name,
            format!("Class '{name}' has {methods} methods over {lines} lines"),
            4.0 + methods as f64 / 10.0 * 2.0,
        ));
    }
    if methods > 15 {
        findings.push(Finding::new(
            DebtType::TooManyMethods,
            ladder(methods, 20, 30),
            file,
            class.start_line,
            name,
            format!("Class '{name}' declares {methods} methods"),
            2.0 + methods as f64 / 10.0,
        ));
    }
    findings
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Lowercase words of a file name or import path. Splits on separators and
/// camelCase humps, so `userRepository` and `user_repository` both yield
/// `["user", "repository"]` while `guide` stays one word.
fn words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        let hump = c.is_uppercase()
            && i > 0
            && (chars[i - 1].is_lowercase()
                || chars[i - 1].is_ascii_digit()
                || (chars[i - 1].is_uppercase()
                    && chars.get(i + 1).is_some_and(|n| n.is_lowercase())));
        if hump && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Whole-word match, plurals included (`services` carries `service`).
fn has_marker(text: &str, markers: &[&str]) -> bool {
    words(text).iter().any(|word| {
        markers
            .iter()
            .any(|m| word == m || word.strip_suffix('s') == Some(m))
    })
}

pub fn file_findings(facts: &FileFacts) -> Vec<Finding> {
    let path = facts.path.as_path();
    let label = file_label(path);
    let imports = facts.import_count();
    let exports = facts.export_count();
    let mut findings = Vec::new();

    if imports > 10 && exports > 5 {
        let severity = if imports > 20 {
            Severity::High
        } else {
            Severity::Medium
        };
        findings.push(Finding::new(
            DebtType::CircularDependency,
            severity,
            path,
            1,
            &label,
            format!("{label} both imports {imports} modules and exports {exports} symbols"),
            6.0,
        ));
    }

    let units = facts.function_count() + 3 * facts.class_count();
    if units > 50 {
        findings.push(Finding::new(
            DebtType::GodObject,
            ladder(units, 75, 100),
            path,
            1,
            &label,
            format!(
                "{label} holds {} functions and {} classes",
                facts.function_count(),
                facts.class_count()
            ),
            8.0 + (units - 50) as f64 / 10.0,
        ));
    }
    if imports > 15 {
        findings.push(Finding::new(
            DebtType::TightCoupling,
            ladder(imports, 20, 25),
            path,
            1,
            &label,
            format!("{label} depends on {imports} modules"),
            3.0 + imports as f64 / 10.0,
        ));
    }
    if imports > 20 {
        findings.push(Finding::new(
            DebtType::ExcessiveImports,
            ladder(imports, 30, 40),
            path,
            1,
            &label,
            format!("{label} has {imports} import statements"),
            1.0 + imports as f64 / 20.0,
        ));
    }
    findings.extend(layering_findings(facts, &label));
    findings
}

/// UI-named files importing service-layer modules, and the reverse. Internal imports only.
fn layering_findings(facts: &FileFacts, label: &str) -> Vec<Finding> {
    let is_ui = has_marker(label, UI_MARKERS);
    let is_service = has_marker(label, SERVICE_MARKERS);
    if is_ui == is_service {
        return Vec::new();
    }
    let forbidden = if is_ui { SERVICE_MARKERS } else { UI_MARKERS };

    facts
        .imports
        .iter()
        .filter(|i| !i.is_external())
        .filter(|i| has_marker(&i.source, forbidden))
        .map(|i| {
            Finding::new(
                DebtType::LayeringViolation,
                Severity::Medium,
                &facts.path,
                1,
                label,
                format!("{label} reaches across layers into '{}'", i.source),
                4.0,
            )
        })
        .collect()
}

/// High and severe complexity scores become debt.
pub fn complexity_findings(complexity: &ComplexityMetrics) -> Vec<Finding> {
    complexity
        .functions_with_severity(&[ComplexitySeverity::High, ComplexitySeverity::Severe])
        .map(|f| {
            let cyclomatic = f.score.cyclomatic;
            let severity = if f.score.severity == ComplexitySeverity::Severe {
                Severity::High
            } else {
                Severity::Medium
            };
            Finding::new(
                DebtType::HighComplexity,
                severity,
                &f.id.file,
                f.id.line,
                f.id.name.as_str(),
                format!("Function '{}' has cyclomatic complexity {cyclomatic}", f.id.name),
                2.0 + cyclomatic as f64 / 5.0,
            )
        })
        .collect()
}

/// Exact clones with high or critical maintenance priority become debt, one item per cluster.
pub fn duplication_findings(duplication: &DuplicationMetrics) -> Vec<Finding> {
    duplication
        .clusters
        .iter()
        .filter(|c| c.kind == DuplicateKind::Exact)
        .filter(|c| c.priority >= Priority::High)
        .filter_map(|c| {
            let first = c.instances.first()?;
            let severity = if c.priority == Priority::Critical {
                Severity::High
            } else {
                Severity::Medium
            };
            let copies = c.instances.len();
            Some(Finding::new(
                DebtType::ExactDuplication,
                severity,
                &first.file,
                first.start_line,
                first.function.as_str(),
                format!(
                    "{} lines of '{}' are duplicated {} times",
                    c.lines, first.function, copies
                ),
                2.0 + copies.saturating_sub(1) as f64 * c.lines as f64 / 50.0,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ImportRecord, Parameter};

    fn types(findings: &[Finding]) -> Vec<DebtType> {
        findings.iter().map(|f| f.debt_type).collect()
    }

    #[test]
    fn short_function_is_clean() {
        let f = FunctionRecord::new("ok", "a.ts", 1, 10);
        assert!(function_findings(&f).is_empty());
    }

    #[test]
    fn long_wide_function_trips_several_rules() {
        let mut f = FunctionRecord::new("process", "a.ts", 1, 120);
        f.parameters = (0..9).map(|i| Parameter::new(format!("p{i}"))).collect();
        let findings = function_findings(&f);
        let kinds = types(&findings);
        assert!(kinds.contains(&DebtType::LongMethod));
        assert!(kinds.contains(&DebtType::TooManyParameters));
        assert!(kinds.contains(&DebtType::NestedLoops));
        assert!(kinds.contains(&DebtType::MemoryLeakRisk));

        let long = findings
            .iter()
            .find(|f| f.debt_type == DebtType::LongMethod)
            .unwrap();
        assert_eq!(long.severity, Severity::High);
        assert_eq!(long.estimated_hours, 2.0 + 120.0 / 50.0);

        let params = findings
            .iter()
            .find(|f| f.debt_type == DebtType::TooManyParameters)
            .unwrap();
        assert_eq!(params.severity, Severity::High);
        assert_eq!(params.estimated_hours, 3.0);
    }

    #[test]
    fn large_class_hours() {
        let class = ClassRecord {
            name: "Everything".into(),
            start_line: 1,
            end_line: 100,
            methods: (0..25)
                .map(|i| FunctionRecord::new(format!("m{i}"), "a.ts", i + 1, i + 2))
                .collect(),
            property_count: 0,
            extends: None,
            implements: vec![],
        };
        let findings = class_findings(&class, Path::new("a.ts"));
        assert_eq!(
            types(&findings),
            vec![DebtType::LargeClass, DebtType::TooManyMethods]
        );
        assert_eq!(findings[0].estimated_hours, 9.0);
    }

    #[test]
    fn ui_file_importing_service_is_a_layering_violation() {
        let mut facts = FileFacts::new("src/ProfileView.tsx");
        facts.imports = vec![
            ImportRecord::new("./userService"),
            ImportRecord::new("react"),
            ImportRecord::new("./format"),
        ];
        let findings = file_findings(&facts);
        assert_eq!(types(&findings), vec![DebtType::LayeringViolation]);
    }

    #[test]
    fn markers_match_whole_words_only() {
        assert_eq!(words("userRepository.ts"), vec!["user", "repository", "ts"]);
        assert_eq!(words("UIButton.tsx"), vec!["ui", "button", "tsx"]);
        assert_eq!(words("../shared/order-store"), vec!["shared", "order", "store"]);

        assert!(!has_marker("build_service.ts", UI_MARKERS));
        assert!(has_marker("build_service.ts", SERVICE_MARKERS));
        assert!(!has_marker("guide.ts", UI_MARKERS));
        assert!(!has_marker("restore.ts", SERVICE_MARKERS));
        assert!(!has_marker("./remodel", SERVICE_MARKERS));
        assert!(has_marker("./services/api", SERVICE_MARKERS));
        assert!(has_marker("UIButton.tsx", UI_MARKERS));
    }

    #[test]
    fn substring_lookalikes_are_not_layering_violations() {
        let mut service = FileFacts::new("src/build_service.ts");
        service.imports = vec![ImportRecord::new("./guide"), ImportRecord::new("./pageant")];
        assert!(file_findings(&service).is_empty());

        let mut plain = FileFacts::new("src/guide.ts");
        plain.imports = vec![ImportRecord::new("./userRepository")];
        assert!(file_findings(&plain).is_empty());

        let mut view = FileFacts::new("src/restore_view.ts");
        view.imports = vec![
            ImportRecord::new("./restore"),
            ImportRecord::new("./storeHelpers"),
        ];
        let findings = file_findings(&view);
        assert_eq!(types(&findings), vec![DebtType::LayeringViolation]);
        assert!(findings[0].description.contains("./storeHelpers"));
    }

    #[test]
    fn heavy_importer_is_coupled() {
        let mut facts = FileFacts::new("src/app.ts");
        facts.imports = (0..22)
            .map(|i| ImportRecord::new(format!("pkg{i}")))
            .collect();
        let kinds = types(&file_findings(&facts));
        assert!(kinds.contains(&DebtType::TightCoupling));
        assert!(kinds.contains(&DebtType::ExcessiveImports));
        assert!(!kinds.contains(&DebtType::CircularDependency));
    }
}
