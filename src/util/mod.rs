//! Shared utilities for rs-optin.

pub mod attrs;
mod position;

pub use attrs::{attr_is, attr_path, named_value, parse_args, path_to_string, word_args, AttrArg};
pub use position::{compute_line_starts, offset_to_line, offset_to_line_col, LineCol};
