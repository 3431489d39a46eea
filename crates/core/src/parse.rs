//! Parsing: text stages, one markdown-rs parse, then tree stages.

use crate::MarkError;
use markdown::Constructs;
use markdown::mdast::Node;
use std::borrow::Cow;
use std::fmt;

/// Which markdown constructs a document may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// GitHub Flavored Markdown: tables, strikethrough, autolink literals,
    /// task lists and footnotes.
    pub gfm: bool,
    /// Parse raw HTML as HTML nodes. When off, markup stays literal text.
    pub raw_html: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            raw_html: false,
        }
    }
}

impl ParseOptions {
    /// markdown-rs constructs for these options. Frontmatter is never a
    /// construct: it is stripped before parsing.
    pub fn constructs(self) -> Constructs {
        let gfm = self.gfm;
        Constructs {
            frontmatter: false,
            html_flow: self.raw_html,
            html_text: self.raw_html,
            gfm_autolink_literal: gfm,
            gfm_footnote_definition: gfm,
            gfm_label_start_footnote: gfm,
            gfm_strikethrough: gfm,
            gfm_table: gfm,
            gfm_task_list_item: gfm,
            ..Constructs::default()
        }
    }

    /// Convert to markdown-rs `ParseOptions`.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        markdown::ParseOptions {
            constructs: self.constructs(),
            ..markdown::ParseOptions::default()
        }
    }
}

/// A rewrite of the source text before parsing.
pub trait TextTransform {
    /// Returns the rewritten text, borrowed when nothing changed.
    fn apply<'a>(&self, input: &'a str) -> Cow<'a, str>;
}

impl<F> TextTransform for F
where
    F: for<'a> Fn(&'a str) -> Cow<'a, str>,
{
    fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        self(input)
    }
}

/// An in-place rewrite of the parsed tree.
pub trait AstTransform {
    /// Mutates the tree rooted at `root`.
    fn apply(&self, root: &mut Node);
}

impl<F> AstTransform for F
where
    F: Fn(&mut Node),
{
    fn apply(&self, root: &mut Node) {
        self(root)
    }
}

/// Parses one document through ordered stages.
///
/// Text stages run in registration order on the raw text, the result is
/// parsed once, then tree stages run in registration order.
pub struct ParserPipeline {
    options: markdown::ParseOptions,
    text_stages: Vec<Box<dyn TextTransform>>,
    tree_stages: Vec<Box<dyn AstTransform>>,
}

impl ParserPipeline {
    /// A pipeline with no stages.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options: options.to_markdown(),
            text_stages: Vec::new(),
            tree_stages: Vec::new(),
        }
    }

    /// Appends a text stage.
    pub fn with_text_transform(mut self, stage: impl TextTransform + 'static) -> Self {
        self.text_stages.push(Box::new(stage));
        self
    }

    /// Appends a tree stage.
    pub fn with_ast_transform(mut self, stage: impl AstTransform + 'static) -> Self {
        self.tree_stages.push(Box::new(stage));
        self
    }

    /// Runs every stage over `input`.
    pub fn parse(&self, input: &str) -> Result<Node, MarkError> {
        let mut text = Cow::Borrowed(input);
        for stage in &self.text_stages {
            let rewritten = match stage.apply(&text) {
                Cow::Borrowed(_) => None,
                Cow::Owned(rewritten) => Some(rewritten),
            };
            if let Some(rewritten) = rewritten {
                text = Cow::Owned(rewritten);
            }
        }

        let mut root = markdown::to_mdast(&text, &self.options)?;
        for stage in &self.tree_stages {
            stage.apply(&mut root);
        }
        Ok(root)
    }
}

impl fmt::Debug for ParserPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserPipeline")
            .field("text_stages", &self.text_stages.len())
            .field("tree_stages", &self.tree_stages.len())
            .finish_non_exhaustive()
    }
}

/// Parses `input` without any stages.
pub fn parse_mdast(input: &str, options: &ParseOptions) -> Result<Node, MarkError> {
    Ok(markdown::to_mdast(input, &options.to_markdown())?)
}

/// Visits every node of the tree, parents before children.
pub fn walk_mut(node: &mut Node, visit: &mut dyn FnMut(&mut Node)) {
    visit(node);
    if let Some(children) = node.children_mut() {
        for child in children {
            walk_mut(child, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finalize(input: &str) -> Cow<'_, str> {
        if input.contains("draft") {
            Cow::Owned(input.replace("draft", "final"))
        } else {
            Cow::Borrowed(input)
        }
    }

    fn shout(root: &mut Node) {
        walk_mut(root, &mut |node: &mut Node| {
            if let Node::Text(text) = node {
                text.value = text.value.to_uppercase();
            }
        });
    }

    fn first_inline(root: &Node) -> Option<&Node> {
        root.children()?.first()?.children()?.first()
    }

    #[test]
    fn text_stages_run_before_tree_stages() {
        let pipeline = ParserPipeline::new(ParseOptions::default())
            .with_text_transform(finalize)
            .with_ast_transform(shout);

        let root = pipeline.parse("a draft note").expect("parse should succeed");
        match first_inline(&root) {
            Some(Node::Text(text)) => assert_eq!(text.value, "A FINAL NOTE"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn gfm_can_be_disabled() {
        let root = parse_mdast("~~gone~~", &ParseOptions::default()).expect("parse");
        assert!(matches!(first_inline(&root), Some(Node::Delete(_))));

        let plain = ParseOptions {
            gfm: false,
            ..ParseOptions::default()
        };
        let root = parse_mdast("~~gone~~", &plain).expect("parse");
        assert!(matches!(first_inline(&root), Some(Node::Text(_))));
    }

    #[test]
    fn html_is_literal_unless_enabled() {
        let root = parse_mdast("<b>x</b>", &ParseOptions::default()).expect("parse");
        assert!(matches!(first_inline(&root), Some(Node::Text(_))));

        let trusted = ParseOptions {
            raw_html: true,
            ..ParseOptions::default()
        };
        let root = parse_mdast("<b>x</b>", &trusted).expect("parse");
        assert!(matches!(first_inline(&root), Some(Node::Html(_))));
    }

    #[test]
    fn frontmatter_fence_is_markdown() {
        let root = parse_mdast("---\na: 1\n---", &ParseOptions::default()).expect("parse");
        assert!(matches!(
            root.children().and_then(|c| c.first()),
            Some(Node::ThematicBreak(_))
        ));
    }
}
