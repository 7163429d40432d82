//! rs-optin: experimental-API usage gate for Rust source
//!
//! This library checks references to declarations gated by marker
//! attributes, and reports a diagnostic when neither same-module
//! locality, an enclosing opt-in, nor signature propagation legitimizes
//! the usage.

pub mod analysis;
pub mod output;
pub mod resolve;
pub mod testing;
pub mod util;

pub use analysis::{Experimentality, MarkerId, MarkerScope, Severity, UsageChecker};
pub use output::{render_json, render_text, Diagnostic, DiagnosticKind, DiagnosticSink, Span};
pub use resolve::{check_sources, DeclId, DeclKind, Declaration, ModuleId, ProjectIndex, SymbolTable};
