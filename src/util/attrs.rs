//! Attribute inspection helpers.
//!
//! The policy layer reads three attribute shapes:
//!
//! ```text
//! #[experimental(severity = warning, scope = source_only)]   // name = value pairs
//! #[opt_in(util::FastIndex, Hazard)]                         // path list
//! #[target(fn, struct, expr)]                                // word list
//! ```
//!
//! Arguments are recovered from the raw token tree, so keyword entries
//! like `fn` work the same as identifiers.

use ra_ap_syntax::ast::{self, HasAttrs};
use ra_ap_syntax::{AstNode, NodeOrToken, SyntaxKind};

/// A single parsed attribute argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrArg {
    /// A bare path or keyword: `util::FastIndex`, `fn`.
    Word(String),
    /// A `name = value` pair with both sides joined from raw tokens.
    NameValue { name: String, value: String },
}

/// Render a path as written, dropping any generic arguments.
pub fn path_to_string(path: &ast::Path) -> Option<String> {
    let segment = path.segment()?.name_ref()?.text().to_string();
    match path.qualifier() {
        Some(qualifier) => Some(format!("{}::{}", path_to_string(&qualifier)?, segment)),
        None => Some(segment),
    }
}

/// The attribute's path as written: `opt_in`, `util::FastIndex`, ...
pub fn attr_path(attr: &ast::Attr) -> Option<String> {
    path_to_string(&attr.path()?)
}

/// Does the attribute's path match `name` exactly?
pub fn attr_is(attr: &ast::Attr, name: &str) -> bool {
    attr_path(attr).as_deref() == Some(name)
}

/// Parse the attribute's argument list from its token tree.
///
/// Returns an empty vec both for `#[attr]` and `#[attr()]`; the caller
/// decides whether that is legal.
pub fn parse_args(attr: &ast::Attr) -> Vec<AttrArg> {
    let Some(tree) = attr.token_tree() else {
        return Vec::new();
    };

    let mut args = Vec::new();
    // Token texts for the current entry, with the `=` position if seen.
    let mut current: Vec<String> = Vec::new();
    let mut eq_at: Option<usize> = None;

    let mut flush = |current: &mut Vec<String>, eq_at: &mut Option<usize>| {
        if !current.is_empty() {
            args.push(build_arg(current, *eq_at));
        }
        current.clear();
        *eq_at = None;
    };

    for element in tree.syntax().children_with_tokens() {
        let token = match element {
            NodeOrToken::Token(token) => token,
            // Nested token trees do not occur in the attribute shapes we
            // read; treat their text as opaque words.
            NodeOrToken::Node(node) => {
                current.push(node.text().to_string());
                continue;
            }
        };
        match token.kind() {
            SyntaxKind::L_PAREN | SyntaxKind::R_PAREN => {}
            SyntaxKind::WHITESPACE | SyntaxKind::COMMENT => {}
            SyntaxKind::COMMA => flush(&mut current, &mut eq_at),
            SyntaxKind::EQ => eq_at = Some(current.len()),
            _ => current.push(token.text().to_string()),
        }
    }
    flush(&mut current, &mut eq_at);

    args
}

fn build_arg(tokens: &[String], eq_at: Option<usize>) -> AttrArg {
    match eq_at {
        Some(split) => AttrArg::NameValue {
            name: tokens[..split].concat(),
            value: tokens[split..].concat(),
        },
        None => AttrArg::Word(tokens.concat()),
    }
}

/// Look up the value of a `name = value` argument.
pub fn named_value<'a>(args: &'a [AttrArg], name: &str) -> Option<&'a str> {
    args.iter().find_map(|arg| match arg {
        AttrArg::NameValue { name: n, value } if n == name => Some(value.as_str()),
        _ => None,
    })
}

/// All bare-word arguments, in source order.
pub fn word_args(attr: &ast::Attr) -> Vec<String> {
    parse_args(attr)
        .into_iter()
        .filter_map(|arg| match arg {
            AttrArg::Word(word) => Some(word),
            AttrArg::NameValue { .. } => None,
        })
        .collect()
}

/// All attributes of a syntax node, if it is a node kind that carries them.
pub fn attrs_of(node: &ra_ap_syntax::SyntaxNode) -> Vec<ast::Attr> {
    match ast::AnyHasAttrs::cast(node.clone()) {
        Some(has_attrs) => has_attrs.attrs().collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ra_ap_syntax::{AstNode, SourceFile};

    fn first_attr(source: &str) -> ast::Attr {
        let parse = SourceFile::parse(source, ra_ap_syntax::Edition::Edition2021);
        parse
            .tree()
            .syntax()
            .descendants()
            .find_map(ast::Attr::cast)
            .expect("source should contain an attribute")
    }

    #[test]
    fn test_attr_path() {
        let attr = first_attr("#[opt_in(Fast)] fn f() {}");
        assert_eq!(attr_path(&attr).as_deref(), Some("opt_in"));
        assert!(attr_is(&attr, "opt_in"));
        assert!(!attr_is(&attr, "experimental"));
    }

    #[test]
    fn test_qualified_attr_path() {
        let attr = first_attr("#[util::FastIndex] fn f() {}");
        assert_eq!(attr_path(&attr).as_deref(), Some("util::FastIndex"));
    }

    #[test]
    fn test_name_value_args() {
        let attr = first_attr("#[experimental(severity = warning, scope = source_only)] struct M;");
        let args = parse_args(&attr);
        assert_eq!(named_value(&args, "severity"), Some("warning"));
        assert_eq!(named_value(&args, "scope"), Some("source_only"));
        assert_eq!(named_value(&args, "missing"), None);
    }

    #[test]
    fn test_word_args_with_paths_and_keywords() {
        let attr = first_attr("#[opt_in(util::FastIndex, Hazard)] fn f() {}");
        assert_eq!(word_args(&attr), vec!["util::FastIndex", "Hazard"]);

        let attr = first_attr("#[target(fn, struct, expr)] struct M;");
        assert_eq!(word_args(&attr), vec!["fn", "struct", "expr"]);
    }

    #[test]
    fn test_empty_args() {
        let attr = first_attr("#[opt_in()] fn f() {}");
        assert!(parse_args(&attr).is_empty());
        let attr = first_attr("#[opt_in] fn f() {}");
        assert!(parse_args(&attr).is_empty());
    }
}
