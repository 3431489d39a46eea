//! Document pipeline: source text in, renderable document out.

use crate::renderer::{HeadingNode, Mode, RenderOptions, Rendered, to_tree};
use crate::tree::{Element, Node};
use mark_core::{
    FrontmatterExtraction, Metadata, ParseDiagnostics, RecoverableError, extract_frontmatter,
};
use serde::Serialize;

/// A rendered document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Frontmatter metadata, in source order.
    pub metadata: Metadata,
    /// Table of contents.
    pub toc: Vec<HeadingNode>,
    /// Render tree of the body.
    pub tree: Vec<Node>,
    /// Problems that did not stop rendering.
    pub diagnostics: ParseDiagnostics,
}

impl Document {
    /// The `title` metadata value, when it is a string.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(|value| value.as_str())
    }
}

/// Renders a complete document: frontmatter, body and table of contents.
///
/// Never fails. Metadata decode errors are reported in `diagnostics`; if the
/// markdown parser rejects the body it is rendered as one escaped paragraph.
pub fn render_document(source: &str, options: &RenderOptions) -> Document {
    let FrontmatterExtraction {
        metadata,
        errors,
        body_start,
    } = extract_frontmatter(source);

    let mut diagnostics = ParseDiagnostics::default();
    diagnostics.extend(errors.iter().map(|err| err.to_diagnostic()));

    let body = &source[body_start..];
    let Rendered { tree, headings } =
        render_or_degrade(body, &metadata, options, Mode::Full, &mut diagnostics);

    log::debug!(
        "Rendered document: {} metadata keys, {} headings",
        metadata.len(),
        headings.len()
    );

    Document {
        metadata,
        toc: headings,
        tree,
        diagnostics,
    }
}

/// Renders only the heading outline of a document, each heading linking to
/// its slug in the full render.
pub fn render_toc(source: &str, options: &RenderOptions) -> Vec<Node> {
    let extraction = extract_frontmatter(source);
    let body = &source[extraction.body_start..];
    let mut diagnostics = ParseDiagnostics::default();
    render_or_degrade(body, &extraction.metadata, options, Mode::Toc, &mut diagnostics).tree
}

fn render_or_degrade(
    body: &str,
    metadata: &Metadata,
    options: &RenderOptions,
    mode: Mode,
    diagnostics: &mut ParseDiagnostics,
) -> Rendered {
    match to_tree(body, metadata, options, mode) {
        Ok(rendered) => rendered,
        Err(err) => {
            log::warn!("Markdown rendering failed, falling back to text: {err}");
            let location = err.location();
            diagnostics.push(RecoverableError::error(
                err.to_string(),
                location.line,
                location.column,
            ));
            degraded(body, mode)
        }
    }
}

fn degraded(body: &str, mode: Mode) -> Rendered {
    let tree = match mode {
        Mode::Full => vec![Element::new("p").child(Node::text(body)).into()],
        Mode::Toc => Vec::new(),
    };
    Rendered {
        tree,
        headings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::to_html;

    const GUIDE: &str = "---\ntitle: \"Guide\"\nversion: 3\nbroken: nope\n---\n# {{meta.title}}\n\nSee [setup](setup.md) :rocket:\n\n## Install\n\n## Install\n";

    #[test]
    fn renders_metadata_toc_and_tree() {
        let document = render_document(GUIDE, &RenderOptions::default());

        assert_eq!(document.title(), Some("Guide"));
        assert_eq!(
            document.metadata.keys().collect::<Vec<_>>(),
            ["title", "version"]
        );

        let slugs: Vec<_> = document.toc.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, ["guide", "install", "install-1"]);

        insta::assert_snapshot!(
            to_html(&document.tree),
            @r#"<h1 id="guide">Guide</h1><p>See <a href="setup">setup</a> 🚀</p><h2 id="install">Install</h2><h2 id="install-1">Install</h2>"#
        );
    }

    #[test]
    fn decode_errors_become_warnings() {
        let document = render_document(GUIDE, &RenderOptions::default());
        assert_eq!(document.diagnostics.count(), 1);
        assert!(!document.diagnostics.has_errors());
        assert_eq!(document.diagnostics.entries[0].location.line, 4);
        assert!(document.diagnostics.entries[0].message.contains("broken"));
    }

    #[test]
    fn toc_render_links_to_full_render_slugs() {
        let toc = render_toc(GUIDE, &RenderOptions::default());
        insta::assert_snapshot!(
            to_html(&toc),
            @r##"<h1><a href="#guide">Guide</a></h1><h2><a href="#install">Install</a></h2><h2><a href="#install-1">Install</a></h2>"##
        );
    }

    #[test]
    fn unterminated_frontmatter_is_body() {
        let document = render_document("---\ntitle: \"x\"\n\nText", &RenderOptions::default());
        assert!(document.metadata.is_empty());
        assert_eq!(document.title(), None);
        assert_eq!(
            to_html(&document.tree),
            "<hr><p>title: \"x\"</p><p>Text</p>"
        );
    }

    #[test]
    fn degraded_render_is_one_escaped_paragraph() {
        let rendered = degraded("<b>raw</b>", Mode::Full);
        assert_eq!(to_html(&rendered.tree), "<p>&lt;b&gt;raw&lt;/b&gt;</p>");
        assert!(degraded("# x", Mode::Toc).tree.is_empty());
    }

    #[test]
    fn rendering_is_deterministic() {
        let options = RenderOptions::default();
        let a = render_document(GUIDE, &options);
        let b = render_document(GUIDE, &options);
        assert_eq!(a.tree, b.tree);
        assert_eq!(a.toc, b.toc);
    }
}
