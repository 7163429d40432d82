//! Expectation parsing for checker fixture tests.
//!
//! `//~` comments express the diagnostics a fixture line must produce.
//! Comments are extracted through the syntax tree's comment tokens, so
//! line numbers always agree with what the checker saw.
//!
//! # Syntax
//!
//! ```text
//! //~ warning FastIndex opt-in      // warning usage, fix is an opt-in
//! //~ error util::Hazard propagate  // error usage, fix is propagation
//! //~ warning FastIndex             // relief hint left open
//! //~ config argument-not-marker    // configuration finding
//! //~^ warning FastIndex opt-in     // applies to the line above
//! ```
//!
//! Unqualified marker names match any module prefix, so fixtures can
//! write `FastIndex` for `util::FastIndex`.

use std::collections::HashMap;

use ra_ap_syntax::{SourceFile, SyntaxKind, SyntaxToken};

use crate::output::{Diagnostic, DiagnosticKind};

/// Diagnostic class an expectation asserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedKind {
    Warning,
    Error,
    /// A configuration finding, by its machine-readable kind name.
    Config(String),
}

/// Which fix the diagnostic must suggest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedRelief {
    OptIn,
    Propagate,
}

/// A single expectation parsed from a `//~` comment.
#[derive(Debug, Clone)]
pub struct Expectation {
    /// Line number the diagnostic must anchor to (0-indexed).
    pub line: u32,
    pub kind: ExpectedKind,
    /// Expected marker, for usage expectations.
    pub marker: Option<String>,
    pub relief: Option<ExpectedRelief>,
    /// Original comment text for failure messages.
    pub raw: String,
}

impl Expectation {
    /// Does a reported diagnostic satisfy this expectation? Position is
    /// matched by the caller.
    pub fn matches(&self, diagnostic: &Diagnostic) -> bool {
        let kind_matches = match &self.kind {
            ExpectedKind::Warning => diagnostic.kind == DiagnosticKind::UsageWarning,
            ExpectedKind::Error => diagnostic.kind == DiagnosticKind::UsageError,
            ExpectedKind::Config(name) => diagnostic.kind.name() == name,
        };
        if !kind_matches {
            return false;
        }
        if let Some(expected) = &self.marker {
            let Some(actual) = &diagnostic.marker else {
                return false;
            };
            let suffix_match = actual.0.ends_with(&format!("::{}", expected));
            if actual.0 != *expected && !suffix_match {
                return false;
            }
        }
        match self.relief {
            Some(ExpectedRelief::OptIn) => diagnostic.requires_opt_in,
            Some(ExpectedRelief::Propagate) => !diagnostic.requires_opt_in,
            None => true,
        }
    }
}

/// Error during expectation parsing.
#[derive(Debug, Clone)]
pub enum ParseError {
    /// First word is not `warning`, `error`, or `config`.
    UnknownKind { line: u32, word: String },
    /// Usage expectation without a marker name.
    MissingMarker { line: u32 },
    /// Unrecognized relief flag.
    UnknownRelief { line: u32, word: String },
    /// `config` expectation with a kind name this checker never emits.
    UnknownConfigKind { line: u32, word: String },
    /// Nothing after the `//~` marker.
    Empty { line: u32 },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnknownKind { line, word } => {
                write!(f, "line {}: unknown expectation kind '{}'", line + 1, word)
            }
            ParseError::MissingMarker { line } => {
                write!(f, "line {}: usage expectation needs a marker name", line + 1)
            }
            ParseError::UnknownRelief { line, word } => {
                write!(f, "line {}: unknown relief flag '{}'", line + 1, word)
            }
            ParseError::UnknownConfigKind { line, word } => {
                write!(f, "line {}: unknown config kind '{}'", line + 1, word)
            }
            ParseError::Empty { line } => {
                write!(f, "line {}: empty expectation", line + 1)
            }
        }
    }
}

impl std::error::Error for ParseError {}

const CONFIG_KINDS: [&str; 4] = [
    "opt-in-without-arguments",
    "argument-not-marker",
    "argument-binary-scope",
    "disallowed-target",
];

/// All expectations for one module, grouped by line (0-indexed).
#[derive(Debug, Default)]
pub struct ExpectationSet {
    pub by_line: HashMap<u32, Vec<Expectation>>,
}

impl ExpectationSet {
    /// Parse all `//~` expectations from source code.
    ///
    /// Returns the set and any parse errors encountered.
    pub fn parse(source: &str) -> (Self, Vec<ParseError>) {
        let mut set = ExpectationSet::default();
        let mut errors = Vec::new();

        let parse = SourceFile::parse(source, ra_ap_syntax::Edition::Edition2021);
        for token in parse
            .syntax_node()
            .descendants_with_tokens()
            .filter_map(|element| element.into_token())
        {
            if !is_expectation_comment(&token) {
                continue;
            }
            let comment_line = byte_offset_to_line(source, token.text_range().start().into());
            let after_marker = &token.text()[3..];
            let (line, text) = apply_line_offset(after_marker, comment_line);

            match parse_expectation(text.trim(), line) {
                Ok(expectation) => set.by_line.entry(line).or_default().push(expectation),
                Err(error) => errors.push(error),
            }
        }

        (set, errors)
    }

    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_line.values().map(Vec::len).sum()
    }

    /// All expectations in line order.
    pub fn in_order(&self) -> Vec<&Expectation> {
        let mut all: Vec<&Expectation> = self.by_line.values().flatten().collect();
        all.sort_by_key(|expectation| expectation.line);
        all
    }
}

fn is_expectation_comment(token: &SyntaxToken) -> bool {
    token.kind() == SyntaxKind::COMMENT && token.text().starts_with("//~")
}

/// Convert byte offset to 0-indexed line number.
fn byte_offset_to_line(source: &str, offset: usize) -> u32 {
    source[..offset.min(source.len())]
        .chars()
        .filter(|&c| c == '\n')
        .count() as u32
}

/// `^` markers shift the target line upward, one line per caret.
fn apply_line_offset(text: &str, comment_line: u32) -> (u32, &str) {
    let trimmed = text.trim_start();
    let carets = trimmed.chars().take_while(|&c| c == '^').count();
    (
        comment_line.saturating_sub(carets as u32),
        &trimmed[carets..],
    )
}

fn parse_expectation(text: &str, line: u32) -> Result<Expectation, ParseError> {
    let mut words = text.split_whitespace();
    let Some(kind_word) = words.next() else {
        return Err(ParseError::Empty { line });
    };

    let kind = match kind_word {
        "warning" => ExpectedKind::Warning,
        "error" => ExpectedKind::Error,
        "config" => {
            let Some(name) = words.next() else {
                return Err(ParseError::Empty { line });
            };
            if !CONFIG_KINDS.contains(&name) {
                return Err(ParseError::UnknownConfigKind {
                    line,
                    word: name.to_string(),
                });
            }
            return Ok(Expectation {
                line,
                kind: ExpectedKind::Config(name.to_string()),
                marker: None,
                relief: None,
                raw: text.to_string(),
            });
        }
        other => {
            return Err(ParseError::UnknownKind {
                line,
                word: other.to_string(),
            })
        }
    };

    let Some(marker) = words.next() else {
        return Err(ParseError::MissingMarker { line });
    };

    let relief = match words.next() {
        None => None,
        Some("opt-in") => Some(ExpectedRelief::OptIn),
        Some("propagate") => Some(ExpectedRelief::Propagate),
        Some(other) => {
            return Err(ParseError::UnknownRelief {
                line,
                word: other.to_string(),
            })
        }
    };

    Ok(Expectation {
        line,
        kind,
        marker: Some(marker.to_string()),
        relief,
        raw: text.to_string(),
    })
}
