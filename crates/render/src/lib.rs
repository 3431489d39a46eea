#![deny(missing_docs)]
//! mark rendering engine: markdown documents to owned render trees.

/// Syntax highlighting of code blocks.
pub mod highlight;
/// HTML serialization of the render tree.
pub mod html;
/// Document pipeline (frontmatter, body, table of contents).
pub mod pipeline;
/// Rendering layer (MDAST to render tree).
pub mod renderer;
/// Transform stages (alerts, code normalization, emoji).
pub mod transform;
/// Render tree types.
pub mod tree;

pub use html::to_html;
pub use pipeline::{Document, render_document, render_toc};
pub use renderer::{HeadingNode, Mode, RenderOptions, Rendered, to_tree};
pub use tree::{Element, Node};
