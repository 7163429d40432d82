//! Marker policy model and extraction.
//!
//! A *marker* is a declaration carrying
//! `#[experimental(severity = ..., scope = ...)]`; applying the marker's
//! name as an attribute to another declaration gates every reference to
//! that declaration. This module derives the policies that apply to a
//! resolved symbol: its own marker attributes, plus (for anything that
//! is not a constructor) the markers of its containing type.

use crate::resolve::{DeclId, Declaration, SymbolTable};
use crate::util::attrs;

/// Attribute that declares a marker on its carrying declaration.
pub const EXPERIMENTAL_ATTR: &str = "experimental";
/// Attribute that waives named markers for the annotated scope.
pub const OPT_IN_ATTR: &str = "opt_in";
/// Attribute restricting where a marker may be applied.
pub const TARGET_ATTR: &str = "target";

/// Identity of a marker: the qualified name of its declaring class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerId(pub String);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Diagnostic class of an unaccepted usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Advisory; never blocks a successful run.
    Warning,
    /// Blocks a successful run.
    Error,
}

/// How far a marker's obligation reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerScope {
    /// May be waived by an opt-in that exists only in source.
    SourceOnly,
    /// Only propagation or same-module locality can satisfy it.
    Binary,
}

/// An applicable marker policy: identity, severity, scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experimentality {
    pub marker: MarkerId,
    pub severity: Severity,
    pub scope: MarkerScope,
}

/// Derive a policy from a marker declaration itself.
///
/// Returns `None` unless the declaration carries an `experimental`
/// attribute whose `severity` and `scope` arguments are both recognized
/// enum literals. Malformed marker declarations are inert here; the
/// declaration validator reports them separately.
pub fn marker_policy(class: &Declaration) -> Option<Experimentality> {
    let attr = class
        .attrs
        .iter()
        .find(|attr| attrs::attr_is(attr, EXPERIMENTAL_ATTR))?;
    let args = attrs::parse_args(attr);
    let severity = match attrs::named_value(&args, "severity")? {
        "warning" => Severity::Warning,
        "error" => Severity::Error,
        _ => return None,
    };
    let scope = match attrs::named_value(&args, "scope")? {
        "source_only" => MarkerScope::SourceOnly,
        "binary" => MarkerScope::Binary,
        _ => return None,
    };
    Some(Experimentality {
        marker: MarkerId(class.qualified_name.clone()),
        severity,
        scope,
    })
}

/// All distinct marker policies applying to a symbol.
///
/// Every attribute directly present on the symbol is resolved to its
/// class and derived via [`marker_policy`]. Unless the symbol is a
/// constructor, the same derivation runs over the attributes of its
/// containing type declaration; constructor references are gated by the
/// constructor's own list alone, so construction is never double-gated
/// through the container.
pub fn experimentalities(symbol: DeclId, table: &dyn SymbolTable) -> Vec<Experimentality> {
    let decl = table.declaration(symbol);
    let mut result = Vec::new();
    collect_marker_policies(decl, table, &mut result);

    if decl.kind != crate::resolve::DeclKind::Constructor {
        if let Some(container) = decl.container {
            let container = table.declaration(container);
            if container.kind.is_type_like() {
                collect_marker_policies(container, table, &mut result);
            }
        }
    }

    result
}

fn collect_marker_policies(
    decl: &Declaration,
    table: &dyn SymbolTable,
    result: &mut Vec<Experimentality>,
) {
    for attr in &decl.attrs {
        let Some(path) = attrs::attr_path(attr) else {
            continue;
        };
        let Some(class_id) = table.resolve_path(&path, decl.module) else {
            continue;
        };
        let Some(policy) = marker_policy(table.declaration(class_id)) else {
            continue;
        };
        if !result.iter().any(|known| known.marker == policy.marker) {
            result.push(policy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ProjectIndex;

    fn index_of(source: &str) -> ProjectIndex {
        ProjectIndex::build(&[("util", source)]).expect("index should build")
    }

    fn module_of(index: &ProjectIndex) -> crate::resolve::ModuleId {
        index.modules().next().expect("index has a module")
    }

    #[test]
    fn test_marker_policy_recognized() {
        let index = index_of(
            r#"
#[experimental(severity = warning, scope = source_only)]
pub struct FastIndex;
"#,
        );
        let id = index.resolve_path("FastIndex", module_of(&index)).unwrap();
        let policy = marker_policy(index.declaration(id)).unwrap();
        assert_eq!(policy.marker, MarkerId("util::FastIndex".into()));
        assert_eq!(policy.severity, Severity::Warning);
        assert_eq!(policy.scope, MarkerScope::SourceOnly);
    }

    #[test]
    fn test_marker_policy_dropped_not_defaulted() {
        let index = index_of(
            r#"
#[experimental(severity = loud, scope = source_only)]
pub struct BadSeverity;

#[experimental(severity = warning)]
pub struct MissingScope;

pub struct NoAttr;
"#,
        );
        for name in ["BadSeverity", "MissingScope", "NoAttr"] {
            let id = index.resolve_path(name, module_of(&index)).unwrap();
            assert!(
                marker_policy(index.declaration(id)).is_none(),
                "{} should not form a policy",
                name
            );
        }
    }

    #[test]
    fn test_container_fallback_for_methods() {
        let index = index_of(
            r#"
#[experimental(severity = error, scope = binary)]
pub struct Hazard;

#[Hazard]
pub struct Engine;

impl Engine {
    pub fn start(&self) {}
}
"#,
        );
        let start = index
            .resolve_path("Engine::start", module_of(&index))
            .unwrap();
        let policies = experimentalities(start, &index);
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].marker, MarkerId("util::Hazard".into()));
        assert_eq!(policies[0].severity, Severity::Error);
    }

    #[test]
    fn test_dedup_by_marker_identity() {
        let index = index_of(
            r#"
#[experimental(severity = warning, scope = source_only)]
pub struct FastIndex;

#[FastIndex]
pub struct Engine;

impl Engine {
    #[FastIndex]
    pub fn start(&self) {}
}
"#,
        );
        let start = index
            .resolve_path("Engine::start", module_of(&index))
            .unwrap();
        let policies = experimentalities(start, &index);
        assert_eq!(policies.len(), 1, "same marker on member and container");
    }
}
