//! Text position utilities for converting between byte offsets and line/column pairs.

/// A zero-indexed line/column position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Convert a byte offset to a line/column position.
///
/// Handles UTF-8 correctly by counting characters, not bytes.
pub fn offset_to_line_col(text: &str, offset: usize) -> LineCol {
    let mut line = 0;
    let mut col = 0;
    let mut current_offset = 0;

    for ch in text.chars() {
        if current_offset >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
        current_offset += ch.len_utf8();
    }

    LineCol { line, col }
}

/// Compute line start offsets for a source string.
///
/// The result always contains at least one entry (offset 0), so a binary
/// search over it never comes up empty.
pub fn compute_line_starts(source: &str) -> Vec<u32> {
    let mut starts = vec![0];
    for (i, c) in source.char_indices() {
        if c == '\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}

/// Convert a byte offset to a 0-indexed line number using precomputed line starts.
pub fn offset_to_line(line_starts: &[u32], offset: u32) -> u32 {
    match line_starts.binary_search(&offset) {
        Ok(line) => line as u32,
        Err(line) => line.saturating_sub(1) as u32,
    }
}
