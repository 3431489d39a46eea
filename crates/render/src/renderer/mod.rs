//! MDAST-based markdown to render tree renderer.
//!
//! # Module Structure
//!
//! - `types` - Type definitions (HeadingNode, Rendered, Mode, Scope)
//! - `context` - Rendering context for tracking state during traversal
//! - `render` - AST node rendering functions

mod context;
pub mod render;
mod types;

pub use context::{Context, Definition};
pub use types::{HeadingNode, Mode, Rendered, Scope};

use crate::transform::code::normalize_code_blocks;
use crate::transform::emoji::emoji_transform;
use mark_core::{MarkError, Metadata, ParseOptions, ParserPipeline, Placeholders};
use render::{render_node, render_toc_node};
use serde::{Deserialize, Serialize};

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Replace `:shortcode:` emoji in text.
    pub emoji: bool,
    /// Render `> [!NOTE]` style block quotes as alert callouts.
    pub alerts: bool,
    /// Tokenize code blocks into highlight spans.
    pub highlight: bool,
    /// Pass raw HTML through instead of rendering it as text.
    /// Only for trusted documents.
    pub raw_html: bool,
    /// Add `loading="lazy"` to images.
    pub lazy_images: bool,
    /// Wrap heading content in a link to the heading itself.
    pub heading_autolinks: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            emoji: true,
            alerts: true,
            highlight: true,
            raw_html: false,
            lazy_images: false,
            heading_autolinks: false,
        }
    }
}

impl RenderOptions {
    /// Builds the parse pipeline for one document.
    ///
    /// Placeholders are substituted on the text before parsing; emoji and
    /// code normalization run on the tree afterwards.
    pub fn pipeline(&self, metadata: &Metadata) -> ParserPipeline {
        let parse_options = ParseOptions {
            raw_html: self.raw_html,
            ..ParseOptions::default()
        };

        let mut pipeline = ParserPipeline::new(parse_options)
            .with_text_transform(Placeholders::new(metadata.clone()));
        if self.emoji {
            pipeline = pipeline.with_ast_transform(emoji_transform);
        }
        pipeline.with_ast_transform(normalize_code_blocks)
    }
}

/// Renders a document body (frontmatter already removed).
///
/// # Examples
///
/// ```
/// use mark_render::renderer::{Mode, RenderOptions, to_tree};
///
/// let rendered = to_tree("# Hi", &Default::default(), &RenderOptions::default(), Mode::Full)
///     .unwrap();
/// assert_eq!(rendered.headings[0].slug, "hi");
/// ```
pub fn to_tree(
    body: &str,
    metadata: &Metadata,
    options: &RenderOptions,
    mode: Mode,
) -> Result<Rendered, MarkError> {
    let root = options.pipeline(metadata).parse(body)?;

    let mut ctx = Context::with_mode(options, mode);
    let mut tree = Vec::new();
    match mode {
        Mode::Full => {
            ctx.collect_definitions(&root);
            render_node(&root, &mut ctx, &mut tree);
        }
        Mode::Toc => render_toc_node(&root, &mut ctx, &mut tree),
    }

    Ok(ctx.finish(tree))
}
