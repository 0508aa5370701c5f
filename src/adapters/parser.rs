use std::path::Path;

use crate::core::{FileFacts, QualityError, Result};

use super::SourceParser;

/// Reads facts that an upstream parser already serialized as JSON.
///
/// The document's own `path` is replaced by the path it was submitted under,
/// and every function and method is re-stamped to match.
#[derive(Debug, Clone, Default)]
pub struct FactsJsonParser;

impl SourceParser for FactsJsonParser {
    fn parse(&self, path: &Path, source: &str) -> Result<FileFacts> {
        let facts: FileFacts =
            serde_json::from_str(source).map_err(|e| QualityError::parse(path, e.to_string()))?;
        Ok(facts.with_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn parses_facts_and_restamps_paths() {
        let source = indoc! {r#"
            {
              "path": "elsewhere.ts",
              "functions": [
                {"name": "load", "start_line": 1, "end_line": 12, "is_async": true,
                 "parameters": [{"name": "id", "type": "string"}]}
              ],
              "classes": [
                {"name": "Repo", "start_line": 14, "end_line": 40,
                 "methods": [{"name": "save", "start_line": 15, "end_line": 30}]}
              ],
              "imports": [{"source": "pg"}, {"source": "./model", "kind": "default"}]
            }
        "#};

        let facts = FactsJsonParser
            .parse(Path::new("src/repo.ts"), source)
            .unwrap();
        assert_eq!(facts.path, Path::new("src/repo.ts"));
        assert!(facts
            .all_functions()
            .all(|f| f.file == Path::new("src/repo.ts")));
        assert_eq!(facts.functions[0].parameters[0].type_name.as_deref(), Some("string"));
        assert_eq!(facts.external_import_count(), 1);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = FactsJsonParser
            .parse(Path::new("bad.ts"), "{ not json")
            .unwrap_err();
        assert!(matches!(err, QualityError::Parse { .. }));
        assert!(err.to_string().contains("bad.ts"));
    }
}
