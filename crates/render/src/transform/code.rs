//! Code block body normalization as an AST stage.

use markdown::mdast::Node;
use mark_core::{normalize_code, walk_mut};

/// Normalizes the body of every fenced and indented code block.
pub fn normalize_code_blocks(root: &mut Node) {
    walk_mut(root, &mut |node: &mut Node| {
        if let Node::Code(code) = node {
            code.value = normalize_code(&code.value);
        }
    });
}
