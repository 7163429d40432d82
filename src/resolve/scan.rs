//! Reference discovery - feeds every resolved reference in a module to
//! the usage checker.
//!
//! Call-like references (call expressions, method calls, tuple-struct
//! construction) and bare classifier references (path expressions, path
//! types, record literals) are discovered syntactically. A reference the
//! bundled index cannot resolve produces no diagnostics; discovery
//! fidelity beyond this is the host engine's responsibility.

use ra_ap_syntax::ast;
use ra_ap_syntax::AstNode;

use crate::analysis::{declaration, UsageChecker};
use crate::output::{Diagnostic, DiagnosticSink};
use crate::resolve::{DeclKind, ModuleId, ProjectError, ProjectIndex, SymbolTable};
use crate::util::attrs;

/// Check one module: validate every declaration's attribute list, then
/// check every discovered reference.
pub fn check_module(index: &ProjectIndex, module: ModuleId, sink: &DiagnosticSink) {
    let checker = UsageChecker::new(index);
    let tree = index.module_tree(module);

    // File-level inner attributes are an annotation list like any other.
    declaration::check_declaration(tree.syntax(), module, index, sink);

    for node in tree.syntax().descendants() {
        if ast::Item::cast(node.clone()).is_some() {
            declaration::check_declaration(&node, module, index, sink);
        }

        if let Some(path_expr) = ast::PathExpr::cast(node.clone()) {
            scan_path_expr(&checker, index, module, &path_expr, sink);
        } else if let Some(path_type) = ast::PathType::cast(node.clone()) {
            // An `impl` header names the type on its declaring side; that
            // is not a usage of it.
            let in_impl_header = path_type
                .syntax()
                .parent()
                .is_some_and(|parent| parent.kind() == ra_ap_syntax::SyntaxKind::IMPL);
            if in_impl_header {
                continue;
            }
            if let Some(path) = path_type.path() {
                check_path(&checker, index, module, &path, path_type.syntax(), sink);
            }
        } else if let Some(record) = ast::RecordExpr::cast(node.clone()) {
            if let Some(path) = record.path() {
                let usage = path.syntax().clone();
                check_path(&checker, index, module, &path, &usage, sink);
            }
        } else if let Some(method_call) = ast::MethodCallExpr::cast(node.clone()) {
            scan_method_call(&checker, index, module, &method_call, sink);
        }
    }
}

/// Index the given `(module name, source)` pairs, check every module,
/// and return the diagnostics in stable presentation order.
pub fn check_sources<N, S>(files: &[(N, S)]) -> Result<(ProjectIndex, Vec<Diagnostic>), ProjectError>
where
    N: AsRef<str>,
    S: AsRef<str>,
{
    let index = ProjectIndex::build(files)?;
    let sink = DiagnosticSink::new();
    for module in index.modules() {
        check_module(&index, module, &sink);
    }
    Ok((index, sink.into_sorted()))
}

fn scan_path_expr(
    checker: &UsageChecker<'_>,
    index: &ProjectIndex,
    module: ModuleId,
    path_expr: &ast::PathExpr,
    sink: &DiagnosticSink,
) {
    let Some(path) = path_expr.path() else {
        return;
    };

    // Tuple-struct construction gates twice: the call site against the
    // implicit constructor, and the path itself as a classifier
    // reference, each independently relievable.
    if let Some(call) = callee_of(path_expr) {
        let target = attrs::path_to_string(&path).and_then(|text| index.resolve_path(&text, module));
        if let Some(target) = target {
            if index.declaration(target).kind == DeclKind::Struct {
                if let Some(constructor) = index.constructor_of(target) {
                    checker.check_reference(constructor, call.syntax(), module, sink);
                }
            }
        }
    }

    check_path(checker, index, module, &path, path_expr.syntax(), sink);
}

/// The call expression this path is the callee of, if any.
fn callee_of(path_expr: &ast::PathExpr) -> Option<ast::CallExpr> {
    let call = path_expr.syntax().parent().and_then(ast::CallExpr::cast)?;
    let callee = call.expr()?;
    (callee.syntax() == path_expr.syntax()).then_some(call)
}

/// Check a resolved path reference, and its type qualifier when it has
/// one (`Engine::start` is also a reference to `Engine`).
fn check_path(
    checker: &UsageChecker<'_>,
    index: &ProjectIndex,
    module: ModuleId,
    path: &ast::Path,
    usage: &ra_ap_syntax::SyntaxNode,
    sink: &DiagnosticSink,
) {
    if let Some(qualifier) = path.qualifier() {
        let qualifier_target = attrs::path_to_string(&qualifier)
            .and_then(|text| index.resolve_path(&text, module));
        if let Some(target) = qualifier_target {
            if index.declaration(target).kind.is_type_like() {
                checker.check_reference(target, qualifier.syntax(), module, sink);
            }
        }
    }

    let Some(text) = attrs::path_to_string(path) else {
        return;
    };
    let Some(target) = index.resolve_path(&text, module) else {
        tracing::debug!("unresolved reference `{}`", text);
        return;
    };
    checker.check_reference(target, usage, module, sink);
}

/// Receiver-less method lookup: only a project-wide unique name resolves.
fn scan_method_call(
    checker: &UsageChecker<'_>,
    index: &ProjectIndex,
    module: ModuleId,
    method_call: &ast::MethodCallExpr,
    sink: &DiagnosticSink,
) {
    let Some(name_ref) = method_call.name_ref() else {
        return;
    };
    let name = name_ref.text().to_string();
    let Some(target) = index.method_by_name(&name) else {
        tracing::debug!("skipping method call `{}` with ambiguous receiver", name);
        return;
    };
    checker.check_reference(target, method_call.syntax(), module, sink);
}
