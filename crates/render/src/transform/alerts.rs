//! GitHub alert callouts (`> [!NOTE]`).

use markdown::mdast::Node;

/// The kinds of alert a block quote can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// `[!NOTE]`
    Note,
    /// `[!TIP]`
    Tip,
    /// `[!IMPORTANT]`
    Important,
    /// `[!WARNING]`
    Warning,
    /// `[!CAUTION]`
    Caution,
}

impl AlertKind {
    /// Parses a marker label, ignoring case.
    pub fn parse(label: &str) -> Option<Self> {
        let kind = match label.to_ascii_lowercase().as_str() {
            "note" => AlertKind::Note,
            "tip" => AlertKind::Tip,
            "important" => AlertKind::Important,
            "warning" => AlertKind::Warning,
            "caution" => AlertKind::Caution,
            _ => return None,
        };
        Some(kind)
    }

    /// Lowercase name used in class names.
    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::Note => "note",
            AlertKind::Tip => "tip",
            AlertKind::Important => "important",
            AlertKind::Warning => "warning",
            AlertKind::Caution => "caution",
        }
    }

    /// Capitalized title shown above the alert body.
    pub fn title(self) -> &'static str {
        match self {
            AlertKind::Note => "Note",
            AlertKind::Tip => "Tip",
            AlertKind::Important => "Important",
            AlertKind::Warning => "Warning",
            AlertKind::Caution => "Caution",
        }
    }
}

/// Returns the alert kind and the block quote body without the marker, if
/// the first line of the quote is an alert marker.
pub fn split_alert(children: &[Node]) -> Option<(AlertKind, Vec<Node>)> {
    let Some(Node::Paragraph(first)) = children.first() else {
        return None;
    };
    let Some(Node::Text(text)) = first.children.first() else {
        return None;
    };

    let (kind, rest) = parse_marker(&text.value)?;
    let marker_alone = rest.contains('\n')
        || matches!(first.children.get(1), None | Some(Node::Break(_)));
    if !marker_alone {
        return None;
    }

    let mut paragraph = first.clone();
    let rest = rest.trim_start();
    if rest.is_empty() {
        paragraph.children.remove(0);
        if matches!(paragraph.children.first(), Some(Node::Break(_))) {
            paragraph.children.remove(0);
        }
    } else if let Some(Node::Text(text)) = paragraph.children.first_mut() {
        text.value = rest.to_string();
    }

    let mut body = Vec::with_capacity(children.len());
    if !paragraph.children.is_empty() {
        body.push(Node::Paragraph(paragraph));
    }
    body.extend(children[1..].iter().cloned());
    Some((kind, body))
}

/// Splits `[!KIND]` off the start of a text value. The rest of the marker
/// line must be blank.
fn parse_marker(value: &str) -> Option<(AlertKind, &str)> {
    let inner = value.trim_start().strip_prefix("[!")?;
    let end = inner.find(']')?;
    let kind = AlertKind::parse(&inner[..end])?;
    let rest = &inner[end + 1..];
    let line = rest.split('\n').next().unwrap_or_default();
    line.trim().is_empty().then_some((kind, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mark_core::{ParseOptions, parse_mdast};

    fn quote_children(input: &str) -> Vec<Node> {
        let root = parse_mdast(input, &ParseOptions::default()).expect("parse");
        let Node::Root(root) = root else {
            panic!("expected root");
        };
        match root.children.into_iter().next() {
            Some(Node::Blockquote(quote)) => quote.children,
            other => panic!("expected blockquote, got {other:?}"),
        }
    }

    #[test]
    fn marker_line_is_removed() {
        let children = quote_children("> [!NOTE]\n> Read this first.");
        let (kind, body) = split_alert(&children).expect("alert");
        assert_eq!(kind, AlertKind::Note);
        let Some(Node::Paragraph(paragraph)) = body.first() else {
            panic!("expected paragraph");
        };
        assert!(matches!(&paragraph.children[0], Node::Text(t) if t.value == "Read this first."));
    }

    #[test]
    fn kinds_are_case_insensitive() {
        let children = quote_children("> [!warning]\n> Careful.");
        assert_eq!(split_alert(&children).map(|(kind, _)| kind), Some(AlertKind::Warning));
    }

    #[test]
    fn marker_only_quote_has_empty_body() {
        let children = quote_children("> [!TIP]");
        let (kind, body) = split_alert(&children).expect("alert");
        assert_eq!(kind, AlertKind::Tip);
        assert!(body.is_empty());
    }

    #[test]
    fn later_blocks_are_kept() {
        let children = quote_children("> [!CAUTION]\n>\n> First.\n>\n> Second.");
        let (_, body) = split_alert(&children).expect("alert");
        assert_eq!(body.len(), 2);
    }

    #[test]
    fn ordinary_quotes_are_not_alerts() {
        assert!(split_alert(&quote_children("> Just a quote.")).is_none());
        assert!(split_alert(&quote_children("> [!NOTE] inline text")).is_none());
        assert!(split_alert(&quote_children("> [!FYI]\n> Unknown kind.")).is_none());
    }
}
