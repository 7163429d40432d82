//! Diagnostic rendering - rustc-style text and a JSON form for tooling.

use serde::Serialize;

use crate::output::Diagnostic;
use crate::resolve::ProjectIndex;
use crate::util::offset_to_line_col;

/// Render diagnostics as rustc-style text with source excerpts.
pub fn render_text(index: &ProjectIndex, diagnostics: &[Diagnostic]) -> String {
    let mut output = String::new();
    for diagnostic in diagnostics {
        render_one(index, diagnostic, &mut output);
        output.push('\n');
    }
    output
}

fn render_one(index: &ProjectIndex, diagnostic: &Diagnostic, output: &mut String) {
    let source = index.module_source(diagnostic.module);
    let position = offset_to_line_col(source, diagnostic.span.start as usize);
    let line_text = source.lines().nth(position.line as usize).unwrap_or("");

    output.push_str(&format!(
        "{}: {}\n",
        diagnostic.kind.label(),
        diagnostic.message
    ));
    output.push_str(&format!(
        "  --> {}.rs:{}:{}\n",
        index.module_name(diagnostic.module),
        position.line + 1,
        position.col + 1
    ));

    let gutter = (position.line + 1).to_string();
    let pad = " ".repeat(gutter.len());
    output.push_str(&format!("{} |\n", pad));
    output.push_str(&format!("{} | {}\n", gutter, line_text));
    output.push_str(&format!(
        "{} | {}{}\n",
        pad,
        " ".repeat(position.col as usize),
        "^".repeat(underline_width(diagnostic, line_text, position.col)),
    ));

    if let Some(marker) = &diagnostic.marker {
        if diagnostic.kind.is_usage() {
            let help = if diagnostic.requires_opt_in {
                format!("annotate an enclosing declaration with `#[opt_in({})]`", marker)
            } else {
                format!("annotate the enclosing public declaration with `#[{}]`", marker)
            };
            output.push_str(&format!("{} = help: {}\n", pad, help));
        }
    }
}

/// Carets never run past the end of the anchored line.
fn underline_width(diagnostic: &Diagnostic, line_text: &str, col: u32) -> usize {
    let span_len = (diagnostic.span.end - diagnostic.span.start) as usize;
    let remaining = line_text.chars().count().saturating_sub(col as usize);
    span_len.clamp(1, remaining.max(1))
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    module: &'a str,
    /// 1-indexed, matching the text renderer.
    line: u32,
    col: u32,
    kind: &'static str,
    marker: Option<&'a str>,
    requires_opt_in: bool,
    message: &'a str,
}

/// Render diagnostics as a JSON array.
pub fn render_json(index: &ProjectIndex, diagnostics: &[Diagnostic]) -> String {
    let entries: Vec<JsonDiagnostic<'_>> = diagnostics
        .iter()
        .map(|diagnostic| {
            let source = index.module_source(diagnostic.module);
            let position = offset_to_line_col(source, diagnostic.span.start as usize);
            JsonDiagnostic {
                module: index.module_name(diagnostic.module),
                line: position.line + 1,
                col: position.col + 1,
                kind: diagnostic.kind.name(),
                marker: diagnostic.marker.as_ref().map(|m| m.0.as_str()),
                requires_opt_in: diagnostic.requires_opt_in,
                message: &diagnostic.message,
            }
        })
        .collect();
    serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
}
