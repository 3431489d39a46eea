//! Owned render tree handed to the presentation layer.

use serde::Serialize;
use std::collections::BTreeMap;

/// A node of the render tree.
///
/// Serializes as tagged JSON (`{"type": "element", ...}` or
/// `{"type": "text", "value": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// An element with attributes and children.
    Element(Element),
    /// A run of text. Never contains markup.
    Text {
        /// The text content.
        value: String,
    },
    /// Trusted raw HTML, only produced when raw HTML passthrough is enabled.
    Raw {
        /// The markup.
        value: String,
    },
}

impl Node {
    /// Creates a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text { .. } | Node::Raw { .. } => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut buffer = String::new();
        self.collect_text(&mut buffer);
        buffer
    }

    fn collect_text(&self, buffer: &mut String) {
        match self {
            Node::Text { value } => buffer.push_str(value),
            Node::Raw { .. } => {}
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(buffer);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Lowercase tag name (`p`, `h2`, `span`, ...).
    pub tag_name: String,
    /// Attributes, kept sorted by name so output is deterministic.
    pub properties: BTreeMap<String, String>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element without attributes or children.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Sets the `class` attribute.
    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    /// Replaces the children.
    pub fn children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Appends one child.
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Appends several children.
    pub fn append(mut self, children: Vec<Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Returns an attribute value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_text_content() {
        let node: Node = Element::new("p")
            .class("lead")
            .child(Node::text("Hello "))
            .child(Element::new("strong").child(Node::text("world")))
            .into();

        assert_eq!(node.text_content(), "Hello world");
        assert_eq!(node.as_element().and_then(|e| e.get("class")), Some("lead"));
    }

    #[test]
    fn serializes_as_tagged_json() {
        let node: Node = Element::new("a")
            .attr("href", "#x")
            .child(Node::text("x"))
            .into();
        let json = serde_json::to_value(&node).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "type": "element",
                "tagName": "a",
                "properties": {"href": "#x"},
                "children": [{"type": "text", "value": "x"}]
            })
        );
    }
}
