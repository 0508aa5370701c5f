use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::{classify_imports, DependencyKind, FunctionRecord, ImportRecord};

/// A code path that ordinary happy-path tests are unlikely to reach.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(tag = "kind", content = "parameter", rename_all = "snake_case")]
pub enum UntestedPath {
    AsyncErrorHandling,
    PromiseRejection,
    ParameterValidation,
    EdgeCaseParameters,
    OptionalParameter(String),
}

impl std::fmt::Display for UntestedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UntestedPath::AsyncErrorHandling => write!(f, "async_error_handling"),
            UntestedPath::PromiseRejection => write!(f, "promise_rejection"),
            UntestedPath::ParameterValidation => write!(f, "parameter_validation"),
            UntestedPath::EdgeCaseParameters => write!(f, "edge_case_parameters"),
            UntestedPath::OptionalParameter(name) => write!(f, "optional_parameter:{name}"),
        }
    }
}

pub fn untested_paths(function: &FunctionRecord) -> BTreeSet<UntestedPath> {
    let mut paths = BTreeSet::new();
    if function.is_async {
        paths.insert(UntestedPath::AsyncErrorHandling);
        paths.insert(UntestedPath::PromiseRejection);
    }
    if function.parameter_count() > 3 {
        paths.insert(UntestedPath::ParameterValidation);
        paths.insert(UntestedPath::EdgeCaseParameters);
    }
    paths.extend(
        function
            .optional_parameters()
            .map(|p| UntestedPath::OptionalParameter(p.name.clone())),
    );
    paths
}

/// Mocks a test of any function in this file would need.
pub fn required_mocks(imports: &[ImportRecord]) -> BTreeSet<DependencyKind> {
    classify_imports(imports.iter().map(|i| i.source.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Parameter;

    #[test]
    fn sync_small_function_has_no_paths() {
        let f = FunctionRecord::new("f", "a.ts", 1, 3);
        assert!(untested_paths(&f).is_empty());
    }

    #[test]
    fn async_wide_function_with_optionals() {
        let mut f = FunctionRecord::new("f", "a.ts", 1, 30);
        f.is_async = true;
        f.parameters = vec![
            Parameter::new("a"),
            Parameter::new("b"),
            Parameter::new("c").optional(),
            Parameter::new("d").optional(),
        ];
        let paths = untested_paths(&f);
        assert_eq!(paths.len(), 6);
        assert!(paths.contains(&UntestedPath::OptionalParameter("c".into())));
    }

    #[test]
    fn mocks_cover_every_matched_kind() {
        let imports: Vec<ImportRecord> = ["database", "http", "redis", "fs"]
            .into_iter()
            .map(ImportRecord::new)
            .collect();
        assert!(required_mocks(&imports).len() >= 4);
    }
}
