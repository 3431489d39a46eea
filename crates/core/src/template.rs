//! Metadata placeholder substitution.
//!
//! `{{meta.<dotted.key>}}` is replaced with the matching frontmatter value
//! before the text is parsed. `\{{meta.<key>}}` is the literal form: the
//! backslash is consumed and the braces are kept.

use crate::frontmatter::Metadata;
use crate::parse::TextTransform;
use serde_json::Value as JsonValue;
use std::borrow::Cow;

const OPEN: &str = "{{meta.";
const CLOSE: &str = "}}";

/// Substitutes every metadata placeholder in `input`.
///
/// Unknown keys render as an empty string.
pub fn substitute_placeholders<'a>(input: &'a str, metadata: &Metadata) -> Cow<'a, str> {
    if !input.contains(OPEN) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open
            .find(CLOSE)
            .filter(|end| is_key(&after_open[..*end]))
        else {
            out.push_str(&rest[..start + OPEN.len()]);
            rest = after_open;
            continue;
        };

        let key = &after_open[..end];
        let placeholder_end = start + OPEN.len() + end + CLOSE.len();

        if rest[..start].ends_with('\\') {
            out.push_str(&rest[..start - 1]);
            out.push_str(&rest[start..placeholder_end]);
        } else {
            out.push_str(&rest[..start]);
            match lookup(metadata, key) {
                Some(value) => out.push_str(&display(value)),
                None => log::debug!("Unresolved metadata placeholder: meta.{key}"),
            }
        }

        rest = &rest[placeholder_end..];
    }

    out.push_str(rest);
    Cow::Owned(out)
}

/// Text transform substituting placeholders from one document's metadata.
#[derive(Debug, Clone)]
pub struct Placeholders {
    metadata: Metadata,
}

impl Placeholders {
    /// Creates a transform over the given metadata.
    pub fn new(metadata: Metadata) -> Self {
        Self { metadata }
    }
}

impl TextTransform for Placeholders {
    fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        substitute_placeholders(input, &self.metadata)
    }
}

/// Resolves a dotted path through nested objects (and array indexes).
pub fn lookup<'m>(metadata: &'m Metadata, path: &str) -> Option<&'m JsonValue> {
    let mut segments = path.split('.');
    let mut current = metadata.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            JsonValue::Object(map) => map.get(segment)?,
            JsonValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// String coercion used for substituted values.
pub fn display(value: &JsonValue) -> Cow<'_, str> {
    match value {
        JsonValue::String(s) => Cow::Borrowed(s),
        JsonValue::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

fn is_key(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        })
}
