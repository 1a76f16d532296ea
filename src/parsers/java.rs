//! Java parser using tree-sitter
//!
//! Parses source text with tree-sitter-java and copies the result into an
//! owned [`SyntaxTree`]. The tree-sitter tree is dropped before returning.

use super::tree::{NodeId, SyntaxTree};
use crate::models::Position;
use tree_sitter::{Node, Parser};

/// Syntax error location and description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Parse Java source into an owned syntax tree.
///
/// Any ERROR or MISSING node makes the whole file invalid.
pub fn parse_tree(source: &str) -> Result<SyntaxTree, SyntaxError> {
    let mut parser = Parser::new();
    let language = tree_sitter_java::LANGUAGE;
    parser
        .set_language(&language.into())
        .map_err(|e| SyntaxError {
            line: 1,
            column: 1,
            message: format!("Failed to set Java language: {}", e),
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| SyntaxError {
        line: 1,
        column: 1,
        message: "Failed to parse Java source".to_string(),
    })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(first_error(root, source));
    }

    Ok(copy_tree(root, source))
}

/// 1-based position with the column counted in chars, like token positions.
/// tree-sitter reports byte columns.
fn position_of(node: &Node, source: &str) -> Position {
    let point = node.start_position();
    let start = node.start_byte();
    let column = start
        .checked_sub(point.column)
        .and_then(|line_start| source.get(line_start..start))
        .map(|prefix| prefix.chars().count())
        .unwrap_or(point.column);
    Position::new(point.row + 1, column + 1)
}

/// Locate the first ERROR or MISSING node in pre-order.
fn first_error(root: Node, source: &str) -> SyntaxError {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let position = position_of(&node, source);
            let message = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                let snippet: String = node
                    .utf8_text(source.as_bytes())
                    .unwrap_or("")
                    .chars()
                    .take(40)
                    .collect();
                format!("unexpected `{}`", snippet.trim())
            };
            return SyntaxError {
                line: position.line,
                column: position.column,
                message,
            };
        }

        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }

    // has_error() was true on the root, so this is only reached if the
    // error flag sits on a node we could not descend into.
    let position = position_of(&root, source);
    SyntaxError {
        line: position.line,
        column: position.column,
        message: "syntax error".to_string(),
    }
}

/// Copy a tree-sitter tree into the arena, pre-order, without recursion.
fn copy_tree(root: Node, source: &str) -> SyntaxTree {
    let mut tree = SyntaxTree::new();
    let mut stack: Vec<(Node, Option<NodeId>)> = vec![(root, None)];

    while let Some((node, parent)) = stack.pop() {
        let id = tree.push(
            parent,
            node.kind(),
            node.is_named(),
            (node.start_byte(), node.end_byte()),
            position_of(&node, source),
        );

        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        for child in children.into_iter().rev() {
            stack.push((child, Some(id)));
        }
    }

    tree
}
