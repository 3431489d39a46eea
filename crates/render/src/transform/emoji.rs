//! `:shortcode:` emoji replacement in text nodes.

use markdown::mdast::Node;
use mark_core::walk_mut;
use std::borrow::Cow;

/// Looks up the emoji for a GitHub shortcode name (without colons).
pub fn lookup(name: &str) -> Option<&'static str> {
    emojis::get_by_shortcode(name).map(|emoji| emoji.as_str())
}

/// Replaces known `:name:` shortcodes in `text`. Unknown names are kept.
pub fn replace_shortcodes(text: &str) -> Cow<'_, str> {
    if !text.contains(':') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut replaced = false;

    while let Some(start) = rest.find(':') {
        let after = &rest[start + 1..];
        let emoji = after
            .find(':')
            .filter(|end| is_name(&after[..*end]))
            .and_then(|end| lookup(&after[..end]).map(|emoji| (emoji, end)));

        match emoji {
            Some((emoji, end)) => {
                out.push_str(&rest[..start]);
                out.push_str(emoji);
                rest = &after[end + 1..];
                replaced = true;
            }
            None => {
                out.push_str(&rest[..=start]);
                rest = after;
            }
        }
    }

    if !replaced {
        return Cow::Borrowed(text);
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn is_name(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'_' | b'+' | b'-'))
}

/// AST transform replacing shortcodes in every text node.
///
/// Code spans and code blocks carry their content outside text nodes and
/// are left untouched.
pub fn emoji_transform(root: &mut Node) {
    walk_mut(root, &mut |node: &mut Node| {
        if let Node::Text(text) = node
            && let Cow::Owned(value) = replace_shortcodes(&text.value)
        {
            text.value = value;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use mark_core::{ParseOptions, parse_mdast};

    #[test]
    fn replaces_known_shortcodes() {
        assert_eq!(replace_shortcodes("Ship it :rocket: :tada:"), "Ship it 🚀 🎉");
        assert_eq!(replace_shortcodes(":+1:"), "👍");
    }

    #[test]
    fn covers_the_github_set() {
        assert_eq!(replace_shortcodes(":arrow_right:"), "➡️");
        assert_eq!(replace_shortcodes(":cat: :red_circle:"), "🐱 🔴");
        assert_eq!(replace_shortcodes(":heavy_plus_sign:"), "➕");
    }

    #[test]
    fn keeps_unknown_and_partial_codes() {
        assert_eq!(replace_shortcodes("time 12:30:45"), "time 12:30:45");
        assert_eq!(replace_shortcodes(":nope: :smile"), ":nope: :smile");
        assert!(matches!(replace_shortcodes("a: b"), Cow::Borrowed(_)));
    }

    #[test]
    fn adjacent_codes_share_no_colon() {
        assert_eq!(replace_shortcodes(":smile::wink:"), "😄😉");
        assert_eq!(replace_shortcodes("a:b:smile:"), "a:b😄");
    }

    #[test]
    fn transform_skips_code() {
        let mut root =
            parse_mdast("hi :wave: `:wave:`\n\n```\n:wave:\n```", &ParseOptions::default())
                .expect("parse");
        emoji_transform(&mut root);

        let Node::Root(root) = root else {
            panic!("expected root");
        };
        let Some(Node::Paragraph(paragraph)) = root.children.first() else {
            panic!("expected paragraph");
        };
        assert!(matches!(&paragraph.children[0], Node::Text(t) if t.value == "hi 👋 "));
        assert!(matches!(&paragraph.children[1], Node::InlineCode(c) if c.value == ":wave:"));
        assert!(matches!(&root.children[1], Node::Code(c) if c.value == ":wave:"));
    }
}
