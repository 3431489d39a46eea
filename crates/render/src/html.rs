//! HTML serialization of the render tree.

use crate::tree::{Element, Node};

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input"];

/// Serializes nodes to an HTML string.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::with_capacity(1024);
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text { value } => {
            html_escape::encode_text_to_string(value, out);
        }
        Node::Raw { value } => out.push_str(value),
        Node::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag_name);
    for (name, value) in &element.properties {
        out.push(' ');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            html_escape::encode_double_quoted_attribute_to_string(value, out);
            out.push('"');
        }
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.tag_name.as_str()) {
        return;
    }

    for child in &element.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&element.tag_name);
    out.push('>');
}
