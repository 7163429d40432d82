//! Validation of marker and opt-in declarations themselves.
//!
//! Runs wherever a declaration's attribute list is checked, whether or
//! not the declaration is ever used. All findings are independent,
//! non-fatal configuration diagnostics anchored at the offending
//! attribute.

use ra_ap_syntax::ast::{self, HasAttrs};
use ra_ap_syntax::{AstNode, SyntaxNode};

use crate::analysis::policy::{self, MarkerScope};
use crate::output::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::resolve::{ModuleId, SymbolTable};
use crate::util::attrs;

/// Target-list entries that are never legitimately annotatable with an
/// opt-in burden.
const FORBIDDEN_TARGETS: [&str; 2] = ["expr", "file"];

/// Validate every attribute on one declaration (or on the file itself,
/// for inner attributes).
pub fn check_declaration(
    node: &SyntaxNode,
    module: ModuleId,
    table: &dyn SymbolTable,
    sink: &DiagnosticSink,
) {
    let attr_list: Vec<ast::Attr> = match ast::AnyHasAttrs::cast(node.clone()) {
        Some(has_attrs) => has_attrs.attrs().collect(),
        None => return,
    };

    for attr in &attr_list {
        if attrs::attr_is(attr, policy::OPT_IN_ATTR) {
            check_opt_in(attr, module, table, sink);
        }
    }

    // A target restriction only matters on a marker declaration; the
    // presence of the declaring attribute is what makes it one, even if
    // its severity/scope arguments are broken.
    let is_marker_decl = attr_list
        .iter()
        .any(|attr| attrs::attr_is(attr, policy::EXPERIMENTAL_ATTR));
    if is_marker_decl {
        for attr in &attr_list {
            if attrs::attr_is(attr, policy::TARGET_ATTR) {
                check_target_list(attr, module, sink);
            }
        }
    }
}

/// An opt-in must name at least one marker, and every named class must
/// be a source-only marker declaration.
fn check_opt_in(
    attr: &ast::Attr,
    module: ModuleId,
    table: &dyn SymbolTable,
    sink: &DiagnosticSink,
) {
    let arguments = attrs::word_args(attr);
    if arguments.is_empty() {
        sink.report(Diagnostic::config(
            module,
            attr.syntax().text_range(),
            DiagnosticKind::OptInWithoutArguments,
            None,
            "opt-in directive has no arguments".to_string(),
        ));
        return;
    }

    for argument in arguments {
        let resolved = table
            .resolve_path(&argument, module)
            .map(|class| table.declaration(class));
        let Some(marker) = resolved.and_then(policy::marker_policy) else {
            sink.report(Diagnostic::config(
                module,
                attr.syntax().text_range(),
                DiagnosticKind::ArgumentNotMarker,
                None,
                format!("`{}` is not an experimental marker", argument),
            ));
            continue;
        };
        if marker.scope == MarkerScope::Binary {
            sink.report(Diagnostic::config(
                module,
                attr.syntax().text_range(),
                DiagnosticKind::ArgumentBinaryScope,
                Some(marker.marker.clone()),
                format!(
                    "`{}` has binary scope and cannot be named in an opt-in",
                    marker.marker
                ),
            ));
        }
    }
}

/// One diagnostic per forbidden entry in a marker's target list.
fn check_target_list(attr: &ast::Attr, module: ModuleId, sink: &DiagnosticSink) {
    for entry in attrs::word_args(attr) {
        if FORBIDDEN_TARGETS.contains(&entry.as_str()) {
            sink.report(Diagnostic::config(
                module,
                attr.syntax().text_range(),
                DiagnosticKind::DisallowedTarget,
                None,
                format!("experimental marker must not target `{}`", entry),
            ));
        }
    }
}
