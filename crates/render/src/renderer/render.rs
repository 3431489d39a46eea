//! AST node rendering functions.

use super::Context;
use super::types::{Mode, Scope};
use crate::highlight::highlight;
use crate::transform::alerts::split_alert;
use crate::tree::{Element, Node};
use markdown::mdast::{self, AlignKind};
use mark_core::transform_url;

/// Extracts plain text from inline nodes (used for heading slugs).
pub fn extract_text_from_nodes(nodes: &[mdast::Node]) -> String {
    let mut buffer = String::new();
    for node in nodes {
        extract_text_from_node(node, &mut buffer);
    }
    buffer
}

fn extract_text_from_node(node: &mdast::Node, buffer: &mut String) {
    match node {
        mdast::Node::Text(t) => buffer.push_str(&t.value),
        mdast::Node::InlineCode(code) => buffer.push_str(&code.value),
        mdast::Node::Image(img) => buffer.push_str(&img.alt),
        mdast::Node::Strong(_)
        | mdast::Node::Emphasis(_)
        | mdast::Node::Delete(_)
        | mdast::Node::Link(_)
        | mdast::Node::LinkReference(_) => {
            if let Some(children) = node.children() {
                for child in children {
                    extract_text_from_node(child, buffer);
                }
            }
        }
        // Ignore other node types in headings
        _ => {}
    }
}

fn render_children(children: &[mdast::Node], ctx: &mut Context) -> Vec<Node> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        render_node(child, ctx, &mut out);
    }
    out
}

/// Renders the children of a block container, where paragraphs always keep
/// their wrapper.
fn render_block_children(children: &[mdast::Node], ctx: &mut Context) -> Vec<Node> {
    ctx.enter(Scope::Root);
    let out = render_children(children, ctx);
    ctx.exit();
    out
}

fn wrap(tag: &str, children: &[mdast::Node], ctx: &mut Context) -> Node {
    Element::new(tag)
        .children(render_children(children, ctx))
        .into()
}

/// Renders a list node as `<ul>` or `<ol>`.
///
/// A list is loose when it or any of its items is spread; loose lists keep
/// paragraph wrappers around item content.
fn render_list(list: &mdast::List, ctx: &mut Context) -> Node {
    let mut element = Element::new(if list.ordered { "ol" } else { "ul" });
    if let Some(start) = list.start.filter(|start| list.ordered && *start != 1) {
        element = element.attr("start", start.to_string());
    }

    let mut spread = list.spread;
    let mut tasks = false;
    for child in &list.children {
        if let mdast::Node::ListItem(item) = child {
            spread |= item.spread;
            tasks |= item.checked.is_some();
        }
    }
    if tasks {
        element = element.class("contains-task-list");
    }

    ctx.enter(Scope::List { spread });
    let children = render_children(&list.children, ctx);
    ctx.exit();

    element.children(children).into()
}

/// Renders a list item node as `<li>`, with a disabled checkbox for tasks.
fn render_list_item(item: &mdast::ListItem, ctx: &mut Context) -> Node {
    let mut children = render_children(&item.children, ctx);
    let Some(checked) = item.checked else {
        return Element::new("li").children(children).into();
    };

    let mut checkbox = Element::new("input")
        .attr("type", "checkbox")
        .attr("disabled", "");
    if checked {
        checkbox = checkbox.attr("checked", "");
    }
    let prefix = [Node::from(checkbox), Node::text(" ")];

    // The checkbox goes inside the first paragraph of a loose item.
    match children.first_mut() {
        Some(Node::Element(paragraph)) if paragraph.tag_name == "p" => {
            prepend(&mut paragraph.children, prefix)
        }
        _ => prepend(&mut children, prefix),
    }

    Element::new("li")
        .class("task-list-item")
        .children(children)
        .into()
}

fn prepend(nodes: &mut Vec<Node>, prefix: [Node; 2]) {
    if let Some(Node::Text { value }) = nodes.first_mut() {
        *value = value.trim_start().to_string();
    }
    nodes.splice(0..0, prefix);
}

/// Renders a table row, using `th` cells for the header row.
fn render_table_row(
    row: &mdast::TableRow,
    ctx: &mut Context,
    is_header: bool,
    aligns: &[AlignKind],
) -> Node {
    let tag = if is_header { "th" } else { "td" };
    let cells = row
        .children
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| match cell {
            mdast::Node::TableCell(cell) => Some((i, cell)),
            _ => None,
        })
        .map(|(i, cell)| {
            let mut element = Element::new(tag);
            let align = match aligns.get(i) {
                Some(AlignKind::Left) => Some("left"),
                Some(AlignKind::Right) => Some("right"),
                Some(AlignKind::Center) => Some("center"),
                Some(AlignKind::None) | None => None,
            };
            if let Some(align) = align {
                element = element.attr("align", align);
            }
            element
                .children(render_children(&cell.children, ctx))
                .into()
        })
        .collect();

    Element::new("tr").children(cells).into()
}

/// Renders a table node as `<table>` with `<thead>` and optional `<tbody>`.
fn render_table(table: &mdast::Table, ctx: &mut Context) -> Node {
    let mut rows = table.children.iter().filter_map(|row| match row {
        mdast::Node::TableRow(row) => Some(row),
        _ => None,
    });

    let mut element = Element::new("table");
    if let Some(header) = rows.next() {
        element = element.child(
            Element::new("thead").child(render_table_row(header, ctx, true, &table.align)),
        );
    }

    let body: Vec<Node> = rows
        .map(|row| render_table_row(row, ctx, false, &table.align))
        .collect();
    if !body.is_empty() {
        element = element.child(Element::new("tbody").children(body));
    }

    element.into()
}

/// Renders a paragraph, suppressing the `<p>` wrapper in tight lists.
fn render_paragraph(para: &mdast::Paragraph, ctx: &mut Context, out: &mut Vec<Node>) {
    let children = render_children(&para.children, ctx);
    if ctx.is_in_tight_list() {
        out.extend(children);
    } else {
        out.push(Element::new("p").children(children).into());
    }
}

fn link_element(url: &str, title: Option<&String>) -> Element {
    let mut element = Element::new("a").attr("href", transform_url(url));
    if let Some(title) = title {
        element = element.attr("title", title.as_str());
    }
    element
}

/// Renders a link node as `<a>`, or its content alone inside another anchor.
fn render_link(
    url: &str,
    title: Option<&String>,
    children: &[mdast::Node],
    ctx: &mut Context,
    out: &mut Vec<Node>,
) {
    if ctx.is_in_anchor() {
        out.extend(render_children(children, ctx));
        return;
    }

    ctx.enter(Scope::Anchor);
    let children = render_children(children, ctx);
    ctx.exit();
    out.push(link_element(url, title).children(children).into());
}

/// Renders a reference-style link, falling back to its content when the
/// definition is missing.
fn render_link_reference(
    reference: &mdast::LinkReference,
    ctx: &mut Context,
    out: &mut Vec<Node>,
) {
    match ctx.definition(&reference.identifier).cloned() {
        Some(definition) => render_link(
            &definition.url,
            definition.title.as_ref(),
            &reference.children,
            ctx,
            out,
        ),
        None => out.extend(render_children(&reference.children, ctx)),
    }
}

fn image_element(url: &str, alt: &str, title: Option<&String>, ctx: &Context) -> Node {
    let mut element = Element::new("img")
        .attr("src", transform_url(url))
        .attr("alt", alt);
    if let Some(title) = title {
        element = element.attr("title", title.as_str());
    }
    if ctx.options().lazy_images {
        element = element.attr("loading", "lazy");
    }
    element.into()
}

fn render_image_reference(reference: &mdast::ImageReference, ctx: &Context) -> Node {
    match ctx.definition(&reference.identifier) {
        Some(definition) => image_element(
            &definition.url,
            &reference.alt,
            definition.title.as_ref(),
            ctx,
        ),
        None => Node::text(reference.alt.as_str()),
    }
}

/// Returns true if any inline node is a link.
fn children_contain_link(children: &[mdast::Node]) -> bool {
    children.iter().any(|child| match child {
        mdast::Node::Link(_) | mdast::Node::LinkReference(_) => true,
        other => other.children().is_some_and(|c| children_contain_link(c)),
    })
}

/// Renders a heading with its slug id and records it for the table of
/// contents. In TOC mode the content is wrapped in a link to the slug
/// instead.
fn render_heading(heading: &mdast::Heading, ctx: &mut Context) -> Node {
    let text = extract_text_from_nodes(&heading.children);
    let slug = ctx.add_heading(heading.depth, text);
    let tag = format!("h{}", heading.depth);

    let self_link = match ctx.mode() {
        Mode::Toc => true,
        Mode::Full => {
            ctx.options().heading_autolinks && !children_contain_link(&heading.children)
        }
    };

    let mut element = Element::new(tag);
    if ctx.mode() == Mode::Full {
        element = element.attr("id", slug.as_str());
    }

    if self_link {
        ctx.enter(Scope::Anchor);
        let children = render_children(&heading.children, ctx);
        ctx.exit();
        element
            .child(
                Element::new("a")
                    .attr("href", format!("#{slug}"))
                    .children(children),
            )
            .into()
    } else {
        element
            .children(render_children(&heading.children, ctx))
            .into()
    }
}

/// Renders a code block as `pre > code`, highlighted when enabled.
fn render_code(code: &mdast::Code, ctx: &mut Context) -> Node {
    let lang = code.lang.as_deref();
    let element = if ctx.options().highlight {
        let highlighted = highlight(&code.value, lang);
        let class = match (&highlighted.language, highlighted.tokenized) {
            (Some(language), true) => Some(format!("hljs language-{language}")),
            (Some(language), false) => Some(format!("language-{language}")),
            (None, _) => None,
        };
        let element = Element::new("code").children(highlighted.nodes);
        match class {
            Some(class) => element.class(class),
            None => element,
        }
    } else {
        let element = Element::new("code");
        let element = match lang {
            Some(lang) => element.class(format!("language-{lang}")),
            None => element,
        };
        if code.value.is_empty() {
            element
        } else {
            element.child(Node::text(code.value.as_str()))
        }
    };

    Element::new("pre").child(element).into()
}

/// Renders a block quote, or an alert callout when it opens with a marker.
fn render_blockquote(quote: &mdast::Blockquote, ctx: &mut Context) -> Node {
    if ctx.options().alerts
        && let Some((kind, body)) = split_alert(&quote.children)
    {
        let title = Element::new("p")
            .class("markdown-alert-title")
            .child(Node::text(kind.title()));
        return Element::new("div")
            .class(format!("markdown-alert markdown-alert-{}", kind.as_str()))
            .child(title)
            .append(render_block_children(&body, ctx))
            .into();
    }

    Element::new("blockquote")
        .children(render_block_children(&quote.children, ctx))
        .into()
}

/// Renders raw HTML, passing it through only when allowed.
fn render_html(html: &mdast::Html, ctx: &Context) -> Node {
    if ctx.options().raw_html {
        Node::Raw {
            value: html.value.clone(),
        }
    } else {
        log::debug!("Raw HTML rendered as text: {}", html.value);
        Node::text(html.value.as_str())
    }
}

/// Renders a footnote reference as `<sup><a href="#fn">n</a></sup>`.
fn render_footnote_reference(fnref: &mdast::FootnoteReference, ctx: &mut Context) -> Node {
    let (ordinal, n) = ctx.next_footnote_ref(&fnref.identifier);
    Element::new("sup")
        .child(
            Element::new("a")
                .attr("href", format!("#{}", Context::footnote_id(&fnref.identifier)))
                .attr("id", Context::footnote_ref_id(&fnref.identifier, n))
                .attr("data-footnote-ref", "")
                .attr("aria-describedby", "footnote-label")
                .child(Node::text(ordinal.to_string())),
        )
        .into()
}

/// Renders a footnote definition body; it is emitted at the end of the
/// document by [`Context::finish`].
fn render_footnote_definition(fndef: &mdast::FootnoteDefinition, ctx: &mut Context) {
    let children = render_block_children(&fndef.children, ctx);
    ctx.push_footnote(&fndef.identifier, children);
}

/// Renders an AST node, appending the result to `out`.
pub fn render_node(node: &mdast::Node, ctx: &mut Context, out: &mut Vec<Node>) {
    match node {
        mdast::Node::Root(root) => {
            for child in &root.children {
                render_node(child, ctx, out);
            }
        }
        mdast::Node::Text(text) => out.push(Node::text(text.value.as_str())),
        mdast::Node::Paragraph(para) => render_paragraph(para, ctx, out),
        mdast::Node::Link(link) => {
            render_link(&link.url, link.title.as_ref(), &link.children, ctx, out)
        }
        mdast::Node::LinkReference(reference) => render_link_reference(reference, ctx, out),
        mdast::Node::Strong(strong) => out.push(wrap("strong", &strong.children, ctx)),
        mdast::Node::Emphasis(emphasis) => out.push(wrap("em", &emphasis.children, ctx)),
        mdast::Node::Delete(delete) => out.push(wrap("del", &delete.children, ctx)),
        mdast::Node::InlineCode(code) => out.push(
            Element::new("code")
                .child(Node::text(code.value.as_str()))
                .into(),
        ),
        mdast::Node::Break(_) => out.push(Element::new("br").into()),
        mdast::Node::Heading(heading) => out.push(render_heading(heading, ctx)),
        mdast::Node::List(list) => out.push(render_list(list, ctx)),
        mdast::Node::ListItem(item) => out.push(render_list_item(item, ctx)),
        mdast::Node::Code(code) => out.push(render_code(code, ctx)),
        mdast::Node::Blockquote(quote) => out.push(render_blockquote(quote, ctx)),
        mdast::Node::Image(img) => {
            out.push(image_element(&img.url, &img.alt, img.title.as_ref(), ctx))
        }
        mdast::Node::ImageReference(reference) => {
            out.push(render_image_reference(reference, ctx))
        }
        mdast::Node::ThematicBreak(_) => out.push(Element::new("hr").into()),
        mdast::Node::Html(html) => out.push(render_html(html, ctx)),
        mdast::Node::Table(table) => out.push(render_table(table, ctx)),
        mdast::Node::FootnoteReference(fnref) => out.push(render_footnote_reference(fnref, ctx)),
        mdast::Node::FootnoteDefinition(fndef) => render_footnote_definition(fndef, ctx),
        mdast::Node::Definition(_)
        | mdast::Node::Yaml(_)
        | mdast::Node::Toml(_)
        | mdast::Node::TableRow(_)
        | mdast::Node::TableCell(_) => {}
        _ => {
            log::warn!("Unhandled markdown node type: {:?}", node);
        }
    }
}

/// Renders only the headings under `node`, in document order.
pub fn render_toc_node(node: &mdast::Node, ctx: &mut Context, out: &mut Vec<Node>) {
    match node {
        mdast::Node::Heading(heading) => out.push(render_heading(heading, ctx)),
        other => {
            if let Some(children) = other.children() {
                for child in children {
                    render_toc_node(child, ctx, out);
                }
            }
        }
    }
}
