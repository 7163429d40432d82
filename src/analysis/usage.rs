//! The usage checker: one acceptance decision per resolved reference.
//!
//! Invoked by the host for every resolved reference, call-like or bare
//! classifier. The overwhelming majority of symbols carry no markers, so
//! the empty-policy fast path returns before any tree walk happens.

use ra_ap_syntax::{SyntaxKind, SyntaxNode};

use crate::analysis::policy::{self, MarkerScope};
use crate::analysis::{context, relief};
use crate::output::{Diagnostic, DiagnosticSink};
use crate::resolve::{DeclId, ModuleId, SymbolTable};

/// Stateless checker service over a host symbol table.
///
/// Purely functional over resolved, immutable inputs; the diagnostic
/// sink is the only output channel, and nothing else is mutated.
pub struct UsageChecker<'a> {
    table: &'a dyn SymbolTable,
}

impl<'a> UsageChecker<'a> {
    pub fn new(table: &'a dyn SymbolTable) -> Self {
        UsageChecker { table }
    }

    /// Check one resolved reference to `target`, anchored at `usage`.
    ///
    /// Each applicable marker is tested independently; a usage with two
    /// unaccepted markers yields two diagnostics.
    ///
    /// The usage node must be genuine parsed source. A node
    /// reconstructed from anything else is a contract violation by the
    /// host pipeline and asserts rather than mis-locating a diagnostic.
    pub fn check_reference(
        &self,
        target: DeclId,
        usage: &SyntaxNode,
        usage_module: ModuleId,
        sink: &DiagnosticSink,
    ) {
        let policies = policy::experimentalities(target, self.table);
        if policies.is_empty() {
            return;
        }

        let root_kind = usage.ancestors().last().map(|root| root.kind());
        assert_eq!(
            root_kind,
            Some(SyntaxKind::SOURCE_FILE),
            "usage checked against a node that is not part of a parsed source file"
        );

        let declaration = self.table.declaration(target);
        tracing::debug!(
            "`{}` carries {} marker(s) at {:?}",
            declaration.qualified_name,
            policies.len(),
            usage.text_range(),
        );

        let same_module = declaration.module == usage_module;
        // Memoized across the per-marker loop; the walk runs at most once
        // per check invocation.
        let mut body_usage: Option<bool> = None;

        for exp in policies {
            let body = *body_usage.get_or_insert_with(|| context::is_body_usage(usage));
            if relief::is_accepted(usage, usage_module, &exp, same_module, body, self.table) {
                continue;
            }
            let requires_opt_in = exp.scope == MarkerScope::SourceOnly && body;
            sink.report(Diagnostic::usage(
                usage_module,
                usage.text_range(),
                exp.severity,
                exp.marker,
                requires_opt_in,
            ));
        }
    }
}
