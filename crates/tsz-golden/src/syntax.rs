//! Formatting-insensitive view of emitted JavaScript.
//!
//! Output is parsed with tree-sitter and flattened into its leaf tokens.
//! Comments and the whitespace between tokens disappear. String, regex and
//! template text is kept byte for byte, since it is part of program meaning.

use thiserror::Error;
use tree_sitter::{Language, LanguageError, Node, Parser};

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("failed to load the JavaScript grammar: {0}")]
    Language(#[from] LanguageError),

    #[error("parser produced no tree")]
    NoTree,

    #[error("syntax error at line {line}, column {column}")]
    Invalid { line: usize, column: usize },
}

/// One leaf of the syntax tree: its grammar kind and exact source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxToken {
    pub kind: &'static str,
    pub text: String,
}

/// Kinds compared by their whole text instead of by their children.
const OPAQUE_KINDS: &[&str] = &["string", "regex", "number"];

const COMMENT_KINDS: &[&str] = &["comment", "html_comment"];

fn javascript() -> Language {
    tree_sitter_javascript::LANGUAGE.into()
}

/// Parse `source` and return its tokens in source order.
///
/// Input that does not parse cleanly is an error rather than a partial
/// token list, so recovery nodes never make two outputs look equal.
pub fn syntax_tokens(source: &str) -> Result<Vec<SyntaxToken>, SyntaxError> {
    let mut parser = Parser::new();
    parser.set_language(&javascript())?;
    let tree = parser.parse(source, None).ok_or(SyntaxError::NoTree)?;

    let root = tree.root_node();
    if root.has_error() {
        let position = first_error(root).unwrap_or(root).start_position();
        return Err(SyntaxError::Invalid {
            line: position.row + 1,
            column: position.column + 1,
        });
    }

    let mut tokens = Vec::new();
    collect(root, source, &mut tokens);
    Ok(tokens)
}

fn collect(node: Node<'_>, source: &str, tokens: &mut Vec<SyntaxToken>) {
    let kind = node.kind();
    if COMMENT_KINDS.contains(&kind) {
        return;
    }
    if kind == "template_string" {
        collect_template(node, source, tokens);
        return;
    }
    if node.child_count() == 0 || OPAQUE_KINDS.contains(&kind) {
        push_span(kind, source, node.start_byte(), node.end_byte(), tokens);
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, source, tokens);
    }
}

/// Literal template chunks keep every byte between substitutions, including
/// whitespace the grammar does not cover with a node.
fn collect_template(node: Node<'_>, source: &str, tokens: &mut Vec<SyntaxToken>) {
    let mut start = node.start_byte();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "template_substitution" {
            continue;
        }
        push_span("template_chunk", source, start, child.start_byte(), tokens);
        collect(child, source, tokens);
        start = child.end_byte();
    }
    push_span("template_chunk", source, start, node.end_byte(), tokens);
}

fn push_span(kind: &'static str, source: &str, start: usize, end: usize, tokens: &mut Vec<SyntaxToken>) {
    // Zero-width leaves such as automatic semicolons carry no text.
    if start == end {
        return;
    }
    tokens.push(SyntaxToken {
        kind,
        text: source[start..end].to_string(),
    });
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}
