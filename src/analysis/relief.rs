//! Acceptance rules for affected usages.
//!
//! A usage of a marked declaration is accepted when any of the
//! following holds, tested in this order (first hit wins; the order
//! only matters for cost, not for the outcome):
//!
//! 1. same-module body usage — internal consumption of one's own
//!    experimental surface cannot leak through a signature;
//! 2. opt-in relief — the marker is source-only, the usage is a body
//!    usage, and an enclosing `opt_in` attribute names the marker;
//! 3. propagation — the nearest non-local enclosing declaration
//!    re-declares the same marker, so its own callers already carry the
//!    obligation.

use ra_ap_syntax::ast;
use ra_ap_syntax::{AstNode, SyntaxKind, SyntaxNode};

use crate::analysis::policy::{self, Experimentality, MarkerId, MarkerScope};
use crate::resolve::{ModuleId, SymbolTable};
use crate::util::attrs;

/// Full acceptance test for one usage against one marker policy.
///
/// `same_module` and `body_usage` are computed once by the orchestrator
/// and threaded through to keep the parent walks off the fast path.
pub fn is_accepted(
    usage: &SyntaxNode,
    usage_module: ModuleId,
    policy: &Experimentality,
    same_module: bool,
    body_usage: bool,
    table: &dyn SymbolTable,
) -> bool {
    if same_module && body_usage {
        return true;
    }
    if policy.scope == MarkerScope::SourceOnly
        && body_usage
        && covered_by_opt_in(usage, usage_module, &policy.marker, table)
    {
        return true;
    }
    accepted_by_propagation(usage, usage_module, &policy.marker, table)
}

/// Does any enclosing attribute list (including the usage site itself
/// and file-level inner attributes) carry an `opt_in` naming this
/// marker?
///
/// Membership is all that counts here; whether the directive is
/// otherwise well formed is the declaration validator's concern.
pub fn covered_by_opt_in(
    usage: &SyntaxNode,
    usage_module: ModuleId,
    marker: &MarkerId,
    table: &dyn SymbolTable,
) -> bool {
    for ancestor in usage.ancestors() {
        for attr in attrs::attrs_of(&ancestor) {
            if !attrs::attr_is(&attr, policy::OPT_IN_ATTR) {
                continue;
            }
            for arg in attrs::word_args(&attr) {
                if resolves_to_marker(&arg, usage_module, marker, table) {
                    return true;
                }
            }
        }
    }
    false
}

/// Does the nearest non-local enclosing declaration re-declare this
/// marker?
///
/// Only the nearest one is consulted: a local function re-declaring the
/// marker shields nothing outside itself, and an outer declaration's
/// marker does not reach past an unannotated inner one.
pub fn accepted_by_propagation(
    usage: &SyntaxNode,
    usage_module: ModuleId,
    marker: &MarkerId,
    table: &dyn SymbolTable,
) -> bool {
    let Some(declaration) = nearest_non_local_declaration(usage) else {
        return false;
    };
    attrs::attrs_of(declaration.syntax())
        .iter()
        .filter_map(|attr| attrs::attr_path(attr))
        .any(|path| resolves_to_marker(&path, usage_module, marker, table))
}

/// The closest enclosing declaration that can appear in an externally
/// visible signature.
pub fn nearest_non_local_declaration(usage: &SyntaxNode) -> Option<ast::Item> {
    usage
        .ancestors()
        .filter_map(ast::Item::cast)
        .find(|item| !is_local_item(item))
}

/// An item is local when it is nested inside some block expression and
/// therefore invisible outside its defining scope.
fn is_local_item(item: &ast::Item) -> bool {
    item.syntax()
        .ancestors()
        .skip(1)
        .any(|ancestor| ancestor.kind() == SyntaxKind::BLOCK_EXPR)
}

fn resolves_to_marker(
    path: &str,
    from: ModuleId,
    marker: &MarkerId,
    table: &dyn SymbolTable,
) -> bool {
    table
        .resolve_path(path, from)
        .is_some_and(|class| table.declaration(class).qualified_name == marker.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::policy::Severity;
    use crate::resolve::ProjectIndex;

    const UTIL: &str = r#"
#[experimental(severity = warning, scope = source_only)]
pub struct FastIndex;

#[FastIndex]
pub fn build_index() {}
"#;

    fn project(app: &str) -> (ProjectIndex, ModuleId, SyntaxNode) {
        let index = ProjectIndex::build(&[("util", UTIL), ("app", app)]).unwrap();
        let app_module = index.module_named("app").unwrap();
        let usage = index
            .module_tree(app_module)
            .syntax()
            .descendants()
            .find(|node| node.text() == "build_index()")
            .expect("app should call build_index()");
        (index, app_module, usage)
    }

    fn fast_index(scope: MarkerScope) -> Experimentality {
        Experimentality {
            marker: MarkerId("util::FastIndex".into()),
            severity: Severity::Warning,
            scope,
        }
    }

    #[test]
    fn test_opt_in_on_enclosing_fn() {
        let (index, app, usage) = project(
            r#"
#[opt_in(util::FastIndex)]
fn run() { build_index(); }
"#,
        );
        assert!(covered_by_opt_in(
            &usage,
            app,
            &MarkerId("util::FastIndex".into()),
            &index
        ));
        assert!(is_accepted(
            &usage,
            app,
            &fast_index(MarkerScope::SourceOnly),
            false,
            true,
            &index
        ));
    }

    #[test]
    fn test_file_level_opt_in() {
        let (index, app, usage) = project(
            r#"
#![opt_in(util::FastIndex)]

fn run() { build_index(); }
"#,
        );
        assert!(covered_by_opt_in(
            &usage,
            app,
            &MarkerId("util::FastIndex".into()),
            &index
        ));
    }

    #[test]
    fn test_opt_in_naming_other_marker_is_no_relief() {
        let (index, app, usage) = project(
            r#"
#[opt_in(util::Other)]
fn run() { build_index(); }
"#,
        );
        assert!(!covered_by_opt_in(
            &usage,
            app,
            &MarkerId("util::FastIndex".into()),
            &index
        ));
    }

    #[test]
    fn test_binary_scope_ignores_opt_in() {
        let (index, app, usage) = project(
            r#"
#[opt_in(util::FastIndex)]
fn run() { build_index(); }
"#,
        );
        assert!(!is_accepted(
            &usage,
            app,
            &fast_index(MarkerScope::Binary),
            false,
            true,
            &index
        ));
    }

    #[test]
    fn test_same_module_body_usage_always_accepted() {
        let (index, app, usage) = project("fn run() { build_index(); }");
        assert!(is_accepted(
            &usage,
            app,
            &fast_index(MarkerScope::Binary),
            true,
            true,
            &index
        ));
    }

    #[test]
    fn test_propagation_by_enclosing_fn() {
        let (index, app, usage) = project(
            r#"
#[util::FastIndex]
pub fn run() { build_index(); }
"#,
        );
        assert!(accepted_by_propagation(
            &usage,
            app,
            &MarkerId("util::FastIndex".into()),
            &index
        ));
    }

    #[test]
    fn test_local_fn_does_not_propagate() {
        // The re-declaration sits on a function local to `run`; the
        // nearest non-local declaration is the unannotated `run`, so
        // nothing propagates.
        let (index, app, usage) = project(
            r#"
pub fn run() {
    #[util::FastIndex]
    fn helper() { build_index(); }
    helper();
}
"#,
        );
        assert!(!accepted_by_propagation(
            &usage,
            app,
            &MarkerId("util::FastIndex".into()),
            &index
        ));
    }

    #[test]
    fn test_no_relief_without_anything() {
        let (index, app, usage) = project("fn run() { build_index(); }");
        assert!(!is_accepted(
            &usage,
            app,
            &fast_index(MarkerScope::SourceOnly),
            false,
            true,
            &index
        ));
    }
}
