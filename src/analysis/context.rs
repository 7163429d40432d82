//! Usage context classification.
//!
//! Decides whether a reference occurs in a *body* position: one of a
//! fixed set of syntactic slots that can never surface in a declaration's
//! externally visible signature. Only body usages qualify for the
//! lighter-weight opt-in relief available to source-only markers.

use ra_ap_syntax::ast;
use ra_ap_syntax::{AstNode, SyntaxKind, SyntaxNode};

/// The strictly-internal slots a node can occupy in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySlot {
    /// The block of a function or method.
    FnBody,
    /// The body expression of a closure.
    ClosureBody,
    /// The initializer of a `const` item.
    ConstInit,
    /// The initializer of a `static` item.
    StaticInit,
    /// The discriminant expression of an enum variant.
    VariantDiscriminant,
}

/// The body slot `node` occupies in `parent`, if any.
///
/// The test is for node identity against the parent's designated child,
/// not containment: a node merely *inside* a body is classified by the
/// walk in [`is_body_usage`], which reaches the slot child itself.
pub fn body_slot_of(node: &SyntaxNode, parent: &SyntaxNode) -> Option<BodySlot> {
    if let Some(function) = ast::Fn::cast(parent.clone()) {
        if function.body().is_some_and(|body| body.syntax() == node) {
            return Some(BodySlot::FnBody);
        }
    }
    if let Some(closure) = ast::ClosureExpr::cast(parent.clone()) {
        if closure.body().is_some_and(|body| body.syntax() == node) {
            return Some(BodySlot::ClosureBody);
        }
    }
    if let Some(konst) = ast::Const::cast(parent.clone()) {
        if konst.body().is_some_and(|init| init.syntax() == node) {
            return Some(BodySlot::ConstInit);
        }
    }
    if let Some(statik) = ast::Static::cast(parent.clone()) {
        if statik.body().is_some_and(|init| init.syntax() == node) {
            return Some(BodySlot::StaticInit);
        }
    }
    if let Some(variant) = ast::Variant::cast(parent.clone()) {
        if variant.expr().is_some_and(|expr| expr.syntax() == node) {
            return Some(BodySlot::VariantDiscriminant);
        }
    }
    None
}

/// Walk upward from a usage site and decide whether it sits inside a
/// body slot.
///
/// Terminates at the file root; parent links form a finite tree, so the
/// walk is bounded by the nesting depth of the file.
pub fn is_body_usage(usage: &SyntaxNode) -> bool {
    let mut element = usage.clone();
    loop {
        let Some(parent) = element.parent() else {
            return false;
        };
        if body_slot_of(&element, &parent).is_some() {
            return true;
        }
        if parent.kind() == SyntaxKind::SOURCE_FILE {
            return false;
        }
        element = parent;
    }
}
