//! Import-source classification.
//!
//! Maps an import specifier onto the kinds of external resource it most likely
//! talks to. Matching is a case-insensitive substring test against a fixed
//! keyword table; it is an estimate from import text, not a resolution of what
//! the module actually does.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    Database,
    Http,
    Filesystem,
    Cache,
    Email,
    Auth,
}

static KEYWORDS: &[(DependencyKind, &[&str])] = &[
    (
        DependencyKind::Database,
        &[
            "database", "db", "sql", "mongo", "postgres", "mysql", "prisma", "sequelize",
            "typeorm", "knex",
        ],
    ),
    (
        DependencyKind::Http,
        &["http", "axios", "fetch", "request", "got", "superagent"],
    ),
    (DependencyKind::Filesystem, &["fs", "file", "path"]),
    (DependencyKind::Cache, &["redis", "cache", "memcache"]),
    (
        DependencyKind::Email,
        &["mail", "smtp", "nodemailer", "sendgrid"],
    ),
    (
        DependencyKind::Auth,
        &["auth", "jwt", "passport", "oauth", "bcrypt", "session"],
    ),
];

impl DependencyKind {
    pub fn keywords(self) -> &'static [&'static str] {
        KEYWORDS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, words)| *words)
            .unwrap_or(&[])
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DependencyKind::Database => "database",
            DependencyKind::Http => "http",
            DependencyKind::Filesystem => "filesystem",
            DependencyKind::Cache => "cache",
            DependencyKind::Email => "email",
            DependencyKind::Auth => "auth",
        }
    }
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every dependency kind whose keyword table matches `source`.
pub fn classify_import(source: &str) -> BTreeSet<DependencyKind> {
    let lowered = source.to_lowercase();
    KEYWORDS
        .iter()
        .filter(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(kind, _)| *kind)
        .collect()
}

/// Union of the kinds matched by each source.
pub fn classify_imports<'a>(sources: impl IntoIterator<Item = &'a str>) -> BTreeSet<DependencyKind> {
    sources.into_iter().flat_map(classify_import).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        assert!(classify_import("@Prisma/Client").contains(&DependencyKind::Database));
        assert!(classify_import("AXIOS").contains(&DependencyKind::Http));
    }

    #[test]
    fn four_sources_yield_four_kinds() {
        let kinds = classify_imports(["database", "http", "redis", "fs"]);
        assert_eq!(
            kinds.into_iter().collect::<Vec<_>>(),
            vec![
                DependencyKind::Database,
                DependencyKind::Http,
                DependencyKind::Filesystem,
                DependencyKind::Cache,
            ]
        );
    }

    #[test]
    fn unrelated_import_matches_nothing() {
        assert!(classify_import("lodash").is_empty());
    }
}
