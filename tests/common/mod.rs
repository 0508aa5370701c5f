#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use qualitymap::core::{ClassRecord, ImportRecord, Parameter};
use qualitymap::{FileFacts, FunctionRecord};

pub fn function(name: &str, file: &str, start: usize, end: usize) -> FunctionRecord {
    FunctionRecord::new(name, file, start, end)
}

/// Function with `params` untyped parameters named `p0..`.
pub fn wide_function(
    name: &str,
    file: &str,
    start: usize,
    end: usize,
    params: usize,
    is_async: bool,
) -> FunctionRecord {
    let mut f = FunctionRecord::new(name, file, start, end);
    f.parameters = (0..params).map(|i| Parameter::new(format!("p{i}"))).collect();
    f.is_async = is_async;
    f
}

pub fn imports(sources: &[&str]) -> Vec<ImportRecord> {
    sources.iter().map(|s| ImportRecord::new(*s)).collect()
}

pub fn class(name: &str, start: usize, end: usize, methods: Vec<FunctionRecord>) -> ClassRecord {
    ClassRecord {
        name: name.to_string(),
        start_line: start,
        end_line: end,
        methods,
        property_count: 0,
        extends: None,
        implements: vec![],
    }
}

pub const SERVICE_FILE: &str = "src/services/order_service.ts";
pub const UTIL_FILE: &str = "src/utils/strings.ts";

/// A service file with one oversized async function and a tidy utility file.
pub fn sample_project() -> Vec<FileFacts> {
    let mut service = FileFacts::new(SERVICE_FILE);
    let mut reconcile = wide_function("reconcile", SERVICE_FILE, 1, 150, 48, true);
    reconcile.is_exported = true;
    service.functions.push(reconcile);
    service
        .functions
        .push(function("formatTotal", SERVICE_FILE, 160, 170));
    service.imports = imports(&["database", "http", "redis", "fs"]);

    let mut util = FileFacts::new(UTIL_FILE);
    util.functions.push(function("trim", UTIL_FILE, 1, 5));
    let mut pad = function("pad", UTIL_FILE, 7, 12);
    pad.parameters = vec![Parameter::typed("value", "string"), Parameter::typed("width", "number")];
    pad.is_exported = true;
    util.functions.push(pad);

    vec![service, util]
}

/// Serialize facts the way the upstream parser hands them over.
pub fn sources(files: &[FileFacts]) -> BTreeMap<PathBuf, String> {
    files
        .iter()
        .map(|f| {
            let json = serde_json::to_string(f).expect("facts serialize");
            (f.path.clone(), json)
        })
        .collect()
}
