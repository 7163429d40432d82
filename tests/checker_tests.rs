//! End-to-end checker properties over in-memory projects.
//!
//! Exercises the acceptance rules through the public `check_sources`
//! entry point: marker extraction, body-usage classification, the
//! same-module / opt-in / propagation ladder, and the declaration
//! validator.

use rs_optin::output::Diagnostic;
use rs_optin::resolve::check_sources;
use rs_optin::DiagnosticKind;

const UTIL: &str = r#"
#[experimental(severity = warning, scope = source_only)]
pub struct FastIndex;

#[experimental(severity = error, scope = binary)]
pub struct Hazard;

#[FastIndex]
pub struct Indexer(pub u32);

#[FastIndex]
pub fn build_index() {}

#[Hazard]
pub fn unsafe_speedup() {}

pub fn plain() {}
"#;

fn check(app: &str) -> Vec<Diagnostic> {
    let (index, diagnostics) = check_sources(&[("util", UTIL), ("app", app)]).unwrap();
    let app_module = index.module_named("app").unwrap();
    diagnostics
        .into_iter()
        .filter(|d| d.module == app_module)
        .collect()
}

#[test]
fn unmarked_symbols_never_report() {
    let diagnostics = check("fn run() { plain(); plain(); }");
    assert!(diagnostics.is_empty());
}

#[test]
fn body_usage_of_source_only_warning_marker_reports_once() {
    let diagnostics = check("fn run() { build_index(); }");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UsageWarning);
    assert!(diagnostics[0].requires_opt_in, "fix is an opt-in");
    assert_eq!(
        diagnostics[0].marker.as_ref().map(|m| m.0.as_str()),
        Some("util::FastIndex")
    );
}

#[test]
fn enclosing_opt_in_silences_the_usage() {
    let diagnostics = check("#[opt_in(util::FastIndex)]\nfn run() { build_index(); }");
    assert!(diagnostics.is_empty());
}

#[test]
fn file_level_opt_in_silences_the_whole_module() {
    let diagnostics = check("#![opt_in(util::FastIndex)]\nfn run() { build_index(); }");
    assert!(diagnostics.is_empty());
}

#[test]
fn signature_usage_is_not_relieved_by_opt_in() {
    // The opt-in is present but the reference can leak into the public
    // signature, so only propagation helps.
    let diagnostics = check("#[opt_in(util::FastIndex)]\npub fn handle(indexer: Indexer) {}");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UsageWarning);
    assert!(!diagnostics[0].requires_opt_in, "fix is propagation");
}

#[test]
fn signature_usage_accepted_by_propagation() {
    let diagnostics = check("#[util::FastIndex]\npub fn handle(indexer: Indexer) {}");
    assert!(diagnostics.is_empty());
}

#[test]
fn binary_marker_ignores_opt_in_even_in_bodies() {
    let diagnostics = check("#[opt_in(util::Hazard)]\nfn run() { unsafe_speedup(); }");
    // The usage still reports, and the opt-in argument itself is a
    // configuration error.
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::UsageError && !d.requires_opt_in));
    assert!(diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::ArgumentBinaryScope));
}

#[test]
fn binary_marker_accepted_by_propagation() {
    let diagnostics = check("#[util::Hazard]\npub fn run() { unsafe_speedup(); }");
    assert!(diagnostics.is_empty());
}

#[test]
fn same_module_body_usage_is_always_accepted() {
    let (index, diagnostics) = check_sources(&[("util", UTIL)]).unwrap();
    let _ = index;
    assert!(
        diagnostics.is_empty(),
        "util's own declarations reference nothing cross-module: {:?}",
        diagnostics
    );

    let same_module = r#"
#[experimental(severity = error, scope = binary)]
pub struct Hazard;

#[Hazard]
pub fn unsafe_speedup() {}

pub fn internal() { unsafe_speedup(); }
"#;
    let (_, diagnostics) = check_sources(&[("solo", same_module)]).unwrap();
    assert!(diagnostics.is_empty(), "same-module body usage: {:?}", diagnostics);
}

#[test]
fn cross_module_usage_of_the_same_pattern_reports() {
    let diagnostics = check("fn external() { unsafe_speedup(); }");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UsageError);
}

#[test]
fn local_redeclaration_does_not_propagate() {
    let diagnostics = check(
        r#"
pub fn run() {
    #[util::FastIndex]
    fn helper() { build_index(); }
    helper();
}
"#,
    );
    assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UsageWarning);
}

#[test]
fn empty_opt_in_reports_and_gives_no_relief() {
    let diagnostics = check("#[opt_in]\nfn run() { build_index(); }");
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::OptInWithoutArguments));
    assert!(diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::UsageWarning));
}

#[test]
fn disallowed_targets_report_once_per_entry() {
    let source = r#"
#[experimental(severity = warning, scope = source_only)]
#[target(fn, expr, file)]
pub struct Marker;
"#;
    let (_, diagnostics) = check_sources(&[("markers", source)]).unwrap();
    let disallowed: Vec<&Diagnostic> = diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::DisallowedTarget)
        .collect();
    assert_eq!(disallowed.len(), 2, "one per offending entry");
}

#[test]
fn construction_gates_call_and_classifier_independently() {
    let diagnostics = check("fn run() { let _ = Indexer(1); }");
    assert_eq!(diagnostics.len(), 2, "constructor call and classifier reference");
    assert!(diagnostics.iter().all(|d| d.kind == DiagnosticKind::UsageWarning));
    assert!(diagnostics.iter().all(|d| d.requires_opt_in));

    let relieved = check("#[opt_in(util::FastIndex)]\nfn run() { let _ = Indexer(1); }");
    assert!(relieved.is_empty(), "one opt-in covers both anchors");
}

#[test]
fn two_markers_on_one_symbol_report_independently() {
    let util = r#"
#[experimental(severity = warning, scope = source_only)]
pub struct FastIndex;

#[experimental(severity = error, scope = binary)]
pub struct Hazard;

#[FastIndex]
#[Hazard]
pub fn rebuild_all() {}
"#;
    let (index, diagnostics) =
        check_sources(&[("util", util), ("app", "fn run() { rebuild_all(); }")]).unwrap();
    let app = index.module_named("app").unwrap();
    let mine: Vec<&Diagnostic> = diagnostics.iter().filter(|d| d.module == app).collect();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().any(|d| d.kind == DiagnosticKind::UsageWarning));
    assert!(mine.iter().any(|d| d.kind == DiagnosticKind::UsageError));
}

#[test]
fn diagnostics_come_out_in_stable_position_order() {
    let diagnostics = check(
        r#"
fn first() { build_index(); }
fn second() { unsafe_speedup(); }
"#,
    );
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics[0].span.start < diagnostics[1].span.start);
}
