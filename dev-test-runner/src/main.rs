//! Runs the JSON fixtures under `fixtures/` through the validation engine.
//!
//! usage: dev-test-runner [FILTER_REGEX] [--dir FIXTURE_DIR]
use std::path::PathBuf;
use std::process::ExitCode;

use claim_check::{path_de, validate, Claim, Lookup, ValidateError, Validation, Value};
use regex::Regex;
use serde::Deserialize;

#[derive(Deserialize)]
struct Fixture {
    claim: Claim,
    #[serde(default)]
    lookup: Lookup,
    cases: Vec<Case>,
}

#[derive(Deserialize)]
struct Case {
    name: String,
    value: Value,
    /// a bare `validationType` name, or the full serialized result
    #[serde(default)]
    expect: Option<serde_json::Value>,
    /// name of the fatal error variant
    #[serde(default)]
    error: Option<String>,
}

fn error_name(error: &ValidateError) -> &'static str {
    match error {
        ValidateError::UnresolvedReference { .. } => "UnresolvedReference",
        ValidateError::ReferenceCycle { .. } => "ReferenceCycle",
    }
}

fn check_case(fixture: &Fixture, case: &Case) -> Result<(), String> {
    let outcome = validate(&fixture.claim, &case.value, &fixture.lookup);
    match (outcome, &case.expect, &case.error) {
        (Ok(validation), Some(expect), None) => compare(&validation, expect),
        (Err(error), None, Some(name)) if error_name(&error) == name => Ok(()),
        (Err(error), _, _) => Err(format!("aborted: {error}")),
        (Ok(validation), _, _) => Err(format!("expected an abort, got {}", to_json(&validation))),
    }
}

fn compare(validation: &Validation, expect: &serde_json::Value) -> Result<(), String> {
    let actual = to_json(validation);
    let matched = match expect {
        serde_json::Value::String(kind) => actual["validationType"] == *kind.as_str(),
        full => actual == *full,
    };
    if matched { Ok(()) } else { Err(format!("expected {expect}, got {actual}")) }
}

fn to_json(validation: &Validation) -> serde_json::Value {
    serde_json::to_value(validation).unwrap_or(serde_json::Value::Null)
}

fn main() -> ExitCode {
    let mut filter: Option<Regex> = None;
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../fixtures");
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--dir" {
            match args.next() {
                Some(d) => dir = PathBuf::from(d),
                None => {
                    eprintln!("--dir needs a value");
                    return ExitCode::from(2);
                }
            }
            continue;
        }
        match Regex::new(&arg) {
            Ok(rx) => filter = Some(rx),
            Err(error) => {
                eprintln!("bad filter: {error}");
                return ExitCode::from(2);
            }
        }
    }

    let mut paths: Vec<PathBuf> = match std::fs::read_dir(&dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect(),
        Err(error) => {
            eprintln!("cannot read {}: {error}", dir.display());
            return ExitCode::from(2);
        }
    };
    paths.sort();

    let (mut passed, mut failed) = (0usize, 0usize);
    for path in paths {
        let file = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        let fixture: Fixture = match std::fs::read(&path).map_err(|e| e.to_string()).and_then(|bytes| {
            path_de::from_slice_with_path(&bytes).map_err(|e| e.to_string())
        }) {
            Ok(f) => f,
            Err(error) => {
                eprintln!("❌ {file}: {error}");
                failed += 1;
                continue;
            }
        };
        for case in &fixture.cases {
            let id = format!("{file}::{}", case.name);
            if filter.as_ref().is_some_and(|rx| !rx.is_match(&id)) {
                continue;
            }
            match check_case(&fixture, case) {
                Ok(()) => {
                    passed += 1;
                    eprintln!("✅ {id}");
                }
                Err(why) => {
                    failed += 1;
                    eprintln!("❌ {id}: {why}");
                }
            }
        }
    }

    eprintln!("—— {passed} passed, {failed} failed ——");
    if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
