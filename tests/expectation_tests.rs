//! Expectation-based integration tests.
//!
//! This test runner discovers the fixture projects in
//! test-fixtures/specs and verifies that the diagnostics the checker
//! reports match the `//~` expectation comments, in both directions.
//!
//! # Test Organization
//!
//! - Each directory under specs/ is one project ("describe")
//! - Each `.rs` file in it is checked as one module
//! - `//~` comments define the expected diagnostics
//!
//! # Example
//!
//! ```rust,ignore
//! // test-fixtures/specs/opt_in_basic/app.rs
//! fn unrelieved() {
//!     build_index(); //~ warning FastIndex opt-in
//! }
//! ```

use rs_optin::testing::{format_results, verify_project, VerificationError};
use std::path::PathBuf;

fn specs_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test-fixtures")
        .join("specs")
}

/// Discover all fixture project directories.
fn discover_projects() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(entries) = std::fs::read_dir(specs_dir()) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
    }

    dirs.sort();
    dirs
}

#[test]
fn run_expectation_tests() {
    let projects = discover_projects();

    assert!(
        !projects.is_empty(),
        "no fixture projects found in {:?}",
        specs_dir()
    );

    let mut total_pass = 0;
    let mut total_fail = 0;
    let mut all_output = String::new();

    for dir in &projects {
        match verify_project(dir) {
            Ok(result) => {
                total_pass += result.pass_count();
                total_fail += result.fail_count();
                all_output.push_str(&format_results(&result));
            }
            Err(VerificationError::TestFailures(result)) => {
                total_pass += result.pass_count();
                total_fail += result.fail_count();
                all_output.push_str(&format_results(&result));
            }
            Err(e) => {
                all_output.push_str(&format!("{}: {}\n", dir.display(), e));
                total_fail += 1;
            }
        }
    }

    println!("\n{}", all_output);
    println!("Total: {} passed, {} failed", total_pass, total_fail);

    if total_fail > 0 {
        panic!("{} expectation test(s) failed", total_fail);
    }
}

/// Test basic opt-in relief.
#[test]
fn test_opt_in_basic_specs() {
    run_spec_project("opt_in_basic");
}

/// Test propagation through signatures.
#[test]
fn test_propagation_specs() {
    run_spec_project("propagation");
}

/// Test binary-scope markers.
#[test]
fn test_binary_scope_specs() {
    run_spec_project("binary_scope");
}

/// Test same-module acceptance.
#[test]
fn test_same_module_specs() {
    run_spec_project("same_module");
}

/// Test declaration validation.
#[test]
fn test_declarations_specs() {
    run_spec_project("declarations");
}

/// Test tuple-struct construction gating.
#[test]
fn test_constructor_specs() {
    run_spec_project("constructor");
}

/// Test container fallback through methods.
#[test]
fn test_methods_specs() {
    run_spec_project("methods");
}

fn run_spec_project(name: &str) {
    let dir = specs_dir().join(name);
    assert!(dir.exists(), "{} fixtures missing", name);

    match verify_project(&dir) {
        Ok(result) => {
            println!("{}", format_results(&result));
            assert!(result.passed(), "all {} specs should pass", name);
        }
        Err(VerificationError::TestFailures(result)) => {
            println!("{}", format_results(&result));
            panic!("{} specs failed", name);
        }
        Err(e) => {
            panic!("error running {} specs: {}", name, e);
        }
    }
}
