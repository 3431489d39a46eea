//! Rendering context for the renderer.

use super::RenderOptions;
use super::types::{HeadingNode, Mode, Rendered, Scope};
use crate::tree::{Element, Node};
use mark_core::{Slugger, slugify};
use markdown::mdast;
use std::collections::HashMap;

/// A link reference definition (`[id]: url "title"`).
#[derive(Debug, Clone)]
pub struct Definition {
    /// Destination as written.
    pub url: String,
    /// Optional title.
    pub title: Option<String>,
}

/// A collected footnote definition.
#[derive(Debug)]
struct Footnote {
    id: String,
    children: Vec<Node>,
}

/// State tracked while traversing one document.
pub struct Context<'a> {
    /// Headings in document order.
    pub headings: Vec<HeadingNode>,

    options: &'a RenderOptions,
    mode: Mode,
    slugger: Slugger,
    stack: Vec<Scope>,
    definitions: HashMap<String, Definition>,
    footnote_ordinals: HashMap<String, usize>,
    footnote_refs: HashMap<String, usize>,
    footnotes: Vec<Footnote>,
}

impl<'a> Context<'a> {
    /// Creates a context for a full render.
    pub fn new(options: &'a RenderOptions) -> Self {
        Self::with_mode(options, Mode::Full)
    }

    /// Creates a context for the given render mode.
    pub fn with_mode(options: &'a RenderOptions, mode: Mode) -> Self {
        Self {
            headings: Vec::new(),
            options,
            mode,
            slugger: Slugger::new(),
            stack: vec![Scope::Root],
            definitions: HashMap::new(),
            footnote_ordinals: HashMap::new(),
            footnote_refs: HashMap::new(),
            footnotes: Vec::new(),
        }
    }

    /// Render options for this pass.
    pub fn options(&self) -> &RenderOptions {
        self.options
    }

    /// Render mode for this pass.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Enters a new scope.
    pub fn enter(&mut self, scope: Scope) {
        self.stack.push(scope);
    }

    /// Exits the current scope.
    pub fn exit(&mut self) -> Option<Scope> {
        self.stack.pop()
    }

    /// Returns true if the current container is a tight list.
    pub fn is_in_tight_list(&self) -> bool {
        matches!(self.stack.last(), Some(Scope::List { spread: false }))
    }

    /// Returns true inside an anchor.
    pub fn is_in_anchor(&self) -> bool {
        self.stack.iter().any(|scope| matches!(scope, Scope::Anchor))
    }

    /// Records every link reference definition under `root`.
    ///
    /// Definitions may follow their uses, so this runs before rendering.
    /// The first definition of an identifier wins.
    pub fn collect_definitions(&mut self, root: &mdast::Node) {
        if let mdast::Node::Definition(definition) = root {
            self.definitions
                .entry(definition.identifier.clone())
                .or_insert_with(|| Definition {
                    url: definition.url.clone(),
                    title: definition.title.clone(),
                });
        }
        if let Some(children) = root.children() {
            for child in children {
                self.collect_definitions(child);
            }
        }
    }

    /// Looks up a link reference definition by normalized identifier.
    pub fn definition(&self, identifier: &str) -> Option<&Definition> {
        self.definitions.get(identifier)
    }

    /// Assigns the next unique slug and records the heading.
    pub fn add_heading(&mut self, rank: u8, text: String) -> String {
        let slug = self.slugger.next_slug(&text);
        self.headings.push(HeadingNode {
            rank,
            text,
            slug: slug.clone(),
        });
        slug
    }

    /// Element id of a footnote definition.
    pub fn footnote_id(identifier: &str) -> String {
        format!("user-content-fn-{}", slugify(identifier))
    }

    /// Element id of the `n`th reference to a footnote (1-based).
    pub fn footnote_ref_id(identifier: &str, n: usize) -> String {
        let base = format!("user-content-fnref-{}", slugify(identifier));
        if n == 1 { base } else { format!("{base}-{n}") }
    }

    /// Returns the display ordinal of a footnote and the reference number
    /// of this use.
    pub fn next_footnote_ref(&mut self, identifier: &str) -> (usize, usize) {
        let next = self.footnote_ordinals.len() + 1;
        let ordinal = *self
            .footnote_ordinals
            .entry(identifier.to_string())
            .or_insert(next);
        let count = self.footnote_refs.entry(identifier.to_string()).or_insert(0);
        *count += 1;
        (ordinal, *count)
    }

    /// Stores the rendered body of a footnote definition.
    pub fn push_footnote(&mut self, identifier: &str, children: Vec<Node>) {
        self.footnotes.push(Footnote {
            id: identifier.to_string(),
            children,
        });
    }

    /// Consumes the context, appending the footnote section if any
    /// referenced footnote was defined.
    pub fn finish(self, mut tree: Vec<Node>) -> Rendered {
        if let Some(section) = self.footnote_section() {
            tree.push(section);
        }
        Rendered {
            tree,
            headings: self.headings,
        }
    }

    fn footnote_section(&self) -> Option<Node> {
        let mut referenced: Vec<(usize, &Footnote)> = self
            .footnotes
            .iter()
            .filter_map(|note| {
                self.footnote_ordinals
                    .get(&note.id)
                    .map(|ordinal| (*ordinal, note))
            })
            .collect();
        if referenced.is_empty() {
            return None;
        }
        referenced.sort_by_key(|(ordinal, _)| *ordinal);

        let items = referenced
            .into_iter()
            .map(|(_, note)| self.footnote_item(note))
            .collect();

        Some(
            Element::new("section")
                .class("footnotes")
                .attr("data-footnotes", "")
                .child(
                    Element::new("h2")
                        .class("sr-only")
                        .attr("id", "footnote-label")
                        .child(Node::text("Footnotes")),
                )
                .child(Element::new("ol").children(items))
                .into(),
        )
    }

    fn footnote_item(&self, note: &Footnote) -> Node {
        let refs = self.footnote_refs.get(&note.id).copied().unwrap_or(1);
        let backrefs: Vec<Node> = (1..=refs)
            .map(|n| {
                Element::new("a")
                    .attr("href", format!("#{}", Self::footnote_ref_id(&note.id, n)))
                    .class("data-footnote-backref")
                    .attr("aria-label", "Back to reference")
                    .child(Node::text("↩"))
                    .into()
            })
            .collect();

        let mut children = note.children.clone();
        match children.last_mut() {
            Some(Node::Element(last)) if last.tag_name == "p" => {
                for backref in backrefs {
                    last.children.push(Node::text(" "));
                    last.children.push(backref);
                }
            }
            _ => children.extend(backrefs),
        }

        Element::new("li")
            .attr("id", Self::footnote_id(&note.id))
            .children(children)
            .into()
    }
}
