//! Diagnostic records, the append-only sink, and rendering.
//!
//! The checker writes structured [`Diagnostic`] records into a
//! [`DiagnosticSink`] and nothing else; presentation (stable position
//! sort, text or JSON rendering) happens afterwards in [`render`].

pub mod render;

pub use render::{render_json, render_text};

use std::sync::Mutex;
use std::sync::PoisonError;

use ra_ap_syntax::TextRange;

use crate::analysis::policy::{MarkerId, Severity};
use crate::resolve::ModuleId;

/// Byte span of a diagnostic within its module's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Span {
            start: range.start().into(),
            end: range.end().into(),
        }
    }
}

/// What a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Unaccepted usage of a warning-severity marker. Advisory.
    UsageWarning,
    /// Unaccepted usage of an error-severity marker. Blocks success.
    UsageError,
    /// An `opt_in` attribute with an empty argument list.
    OptInWithoutArguments,
    /// An `opt_in` argument that does not resolve to a marker.
    ArgumentNotMarker,
    /// An `opt_in` argument naming a binary-scope marker.
    ArgumentBinaryScope,
    /// A marker declaration whose target list admits expressions or files.
    DisallowedTarget,
}

impl DiagnosticKind {
    /// Stable machine-readable name.
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticKind::UsageWarning => "warning-usage",
            DiagnosticKind::UsageError => "error-usage",
            DiagnosticKind::OptInWithoutArguments => "opt-in-without-arguments",
            DiagnosticKind::ArgumentNotMarker => "argument-not-marker",
            DiagnosticKind::ArgumentBinaryScope => "argument-binary-scope",
            DiagnosticKind::DisallowedTarget => "disallowed-target",
        }
    }

    /// Presentation label. Configuration findings read as errors even
    /// though only [`DiagnosticKind::UsageError`] blocks a run.
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticKind::UsageWarning => "warning",
            _ => "error",
        }
    }

    /// Does this diagnostic block a successful run?
    pub fn is_fatal(self) -> bool {
        self == DiagnosticKind::UsageError
    }

    /// Is this a usage violation (as opposed to a configuration finding)?
    pub fn is_usage(self) -> bool {
        matches!(self, DiagnosticKind::UsageWarning | DiagnosticKind::UsageError)
    }
}

/// One reported violation.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub module: ModuleId,
    pub span: Span,
    pub kind: DiagnosticKind,
    /// The marker involved, where applicable.
    pub marker: Option<MarkerId>,
    /// True when the rejection was specifically a body usage of a
    /// source-only marker: the fix is an opt-in, not propagation.
    pub requires_opt_in: bool,
    pub message: String,
}

impl Diagnostic {
    /// A usage violation for one unaccepted marker.
    pub fn usage(
        module: ModuleId,
        range: TextRange,
        severity: Severity,
        marker: MarkerId,
        requires_opt_in: bool,
    ) -> Self {
        let kind = match severity {
            Severity::Warning => DiagnosticKind::UsageWarning,
            Severity::Error => DiagnosticKind::UsageError,
        };
        let message = if requires_opt_in {
            format!("`{}` is experimental and requires an explicit opt-in", marker)
        } else {
            format!(
                "`{}` is experimental and must be propagated to the enclosing declaration",
                marker
            )
        };
        Diagnostic {
            module,
            span: range.into(),
            kind,
            marker: Some(marker),
            requires_opt_in,
            message,
        }
    }

    /// A configuration finding from the declaration validator.
    pub fn config(
        module: ModuleId,
        range: TextRange,
        kind: DiagnosticKind,
        marker: Option<MarkerId>,
        message: String,
    ) -> Self {
        Diagnostic {
            module,
            span: range.into(),
            kind,
            marker,
            requires_opt_in: false,
            message,
        }
    }
}

/// Append-only collection of diagnostics.
///
/// Safe for concurrent append from parallel checks; no read-modify-write
/// happens under the lock. Ordering across markers of a single usage is
/// unspecified — [`DiagnosticSink::into_sorted`] applies the final
/// stable position sort.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one diagnostic.
    pub fn report(&self, diagnostic: Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// All diagnostics, stably sorted by module and position.
    pub fn into_sorted(self) -> Vec<Diagnostic> {
        let mut entries = self
            .entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        entries.sort_by_key(|d| (d.module.0, d.span.start, d.span.end));
        entries
    }
}
