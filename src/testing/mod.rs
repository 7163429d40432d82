//! Test infrastructure for checker expectation tests.
//!
//! This module provides a framework for writing checker tests where the
//! expected diagnostics are embedded directly in fixture sources using
//! `//~` comments.
//!
//! # Test Organization
//!
//! Each fixture directory is one project; each `.rs` file inside it is
//! checked as one module, so cross-module scenarios are a matter of
//! splitting the fixture into two files:
//!
//! ```rust,ignore
//! // util.rs - declares the marker and the gated API
//! #[experimental(severity = warning, scope = source_only)]
//! pub struct FastIndex;
//!
//! // app.rs - uses it without relief
//! fn run() {
//!     build_index(); //~ warning FastIndex opt-in
//! }
//! ```
//!
//! Matching is exact in both directions: every expectation must be
//! satisfied by a diagnostic on its line, and every diagnostic must be
//! asked for by an expectation.

pub mod error;
pub mod expectation;

pub use error::{ExpectationFailure, ModuleTestResult, ProjectTestResult, VerificationError};
pub use expectation::{Expectation, ExpectationSet, ExpectedKind, ExpectedRelief};

use std::path::Path;

use crate::output::Diagnostic;
use crate::resolve::{check_sources, ProjectIndex};
use crate::util::{compute_line_starts, offset_to_line};

/// Verify the expectations of a fixture project directory.
pub fn verify_project(dir: &Path) -> Result<ProjectTestResult, VerificationError> {
    let files = read_fixture_files(dir)?;
    if files.is_empty() {
        return Err(VerificationError::NoFixtures(dir.to_path_buf()));
    }
    verify_sources(dir, &files)
}

/// Verify expectations over in-memory `(module, source)` pairs.
pub fn verify_sources(
    origin: &Path,
    files: &[(String, String)],
) -> Result<ProjectTestResult, VerificationError> {
    let (index, diagnostics) = check_sources(files).map_err(VerificationError::Project)?;

    let mut modules = Vec::new();
    for module in index.modules() {
        modules.push(verify_module(&index, module, &diagnostics));
    }

    let result = ProjectTestResult {
        path: origin.to_path_buf(),
        modules,
    };
    if result.passed() {
        Ok(result)
    } else {
        Err(VerificationError::TestFailures(result))
    }
}

fn verify_module(
    index: &ProjectIndex,
    module: crate::resolve::ModuleId,
    diagnostics: &[Diagnostic],
) -> ModuleTestResult {
    let source = index.module_source(module);
    let line_starts = compute_line_starts(source);

    let (expectations, parse_errors) = ExpectationSet::parse(source);
    let mut failures: Vec<ExpectationFailure> = parse_errors
        .into_iter()
        .map(ExpectationFailure::Parse)
        .collect();

    let reported: Vec<&Diagnostic> = diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.module == module)
        .collect();
    let lines: Vec<u32> = reported
        .iter()
        .map(|diagnostic| offset_to_line(&line_starts, diagnostic.span.start))
        .collect();
    let mut matched = vec![false; reported.len()];

    for expectation in expectations.in_order() {
        let hit = reported
            .iter()
            .enumerate()
            .position(|(i, diagnostic)| {
                !matched[i] && lines[i] == expectation.line && expectation.matches(diagnostic)
            });
        match hit {
            Some(i) => matched[i] = true,
            None => failures.push(ExpectationFailure::Unfulfilled {
                line: expectation.line,
                raw: expectation.raw.clone(),
            }),
        }
    }

    for (i, diagnostic) in reported.iter().enumerate() {
        if !matched[i] {
            failures.push(ExpectationFailure::Unexpected {
                line: lines[i],
                kind: diagnostic.kind.name(),
                message: diagnostic.message.clone(),
            });
        }
    }

    ModuleTestResult {
        name: index.module_name(module).to_string(),
        failures,
    }
}

/// All `.rs` files of a fixture directory as `(module, source)` pairs,
/// sorted by name for reproducible module ids.
fn read_fixture_files(dir: &Path) -> Result<Vec<(String, String)>, VerificationError> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| VerificationError::Io(format!("{}: {}", dir.display(), e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| VerificationError::Io(e.to_string()))?;
        let path = entry.path();
        if path.extension().map(|ext| ext == "rs").unwrap_or(false) {
            let stem = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default()
                .to_string();
            let source = std::fs::read_to_string(&path)
                .map_err(|e| VerificationError::Io(format!("{}: {}", path.display(), e)))?;
            files.push((stem, source));
        }
    }
    files.sort();
    Ok(files)
}

/// Format test results for display.
pub fn format_results(result: &ProjectTestResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", result.path.display()));

    for module in &result.modules {
        if module.passed() {
            output.push_str(&format!("  \u{2713} {}\n", module.name));
        } else {
            output.push_str(&format!("  \u{2717} {}\n", module.name));
            for failure in &module.failures {
                output.push_str(&format!("      {}\n", failure));
            }
        }
    }

    output.push_str(&format!(
        "\n{} passed, {} failed\n",
        result.pass_count(),
        result.fail_count()
    ));

    output
}
