//! Type definitions for the renderer.

use crate::tree::Node;
use serde::Serialize;

/// Heading metadata collected during rendering.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct HeadingNode {
    /// Heading rank (1-6).
    pub rank: u8,
    /// Visible heading text.
    pub text: String,
    /// Unique per-document identifier.
    pub slug: String,
}

/// Result of rendering one document body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    /// Top-level render nodes.
    pub tree: Vec<Node>,
    /// Headings in document order.
    pub headings: Vec<HeadingNode>,
}

/// What a render pass produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The whole document.
    #[default]
    Full,
    /// Only headings, each wrapping its content in a link to its slug.
    Toc,
}

/// The kind of container currently being rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    /// Document root.
    Root,
    /// Inside a list; tight lists drop paragraph wrappers.
    List {
        /// Whether the list is loose.
        spread: bool,
    },
    /// Inside an anchor; nested links render their content only.
    Anchor,
}
