use crate::error::RecoverableError;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Ordered document metadata decoded from the frontmatter block.
pub type Metadata = serde_json::Map<String, JsonValue>;

/// Result returned after extracting frontmatter from a Markdown document.
#[derive(Debug, Default)]
pub struct FrontmatterExtraction {
    /// Successfully decoded entries, in block order.
    pub metadata: Metadata,
    /// Entries whose value could not be decoded; their keys are absent from `metadata`.
    pub errors: Vec<MetaDecodeError>,
    /// Byte offset inside the original document where Markdown content begins.
    pub body_start: usize,
}

/// A single frontmatter entry whose value is not a JSON literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for frontmatter key '{key}' on line {line}: {message}")]
pub struct MetaDecodeError {
    /// Key of the offending entry.
    pub key: String,
    /// 1-indexed line in the source document.
    pub line: usize,
    /// Decoder message.
    pub message: String,
}

impl MetaDecodeError {
    /// Converts the failure into a rendering diagnostic.
    pub fn to_diagnostic(&self) -> RecoverableError {
        RecoverableError::warning(self.to_string(), self.line, 1)
    }
}

/// Extracts the leading `---` fenced metadata block from an input document.
///
/// Every `key: <JSON literal>` line is decoded on its own, so one malformed
/// value only drops that key. A document without a closed block has no
/// frontmatter and its body starts at offset zero.
pub fn extract_frontmatter(input: &str) -> FrontmatterExtraction {
    let Some(block) = find_block(input) else {
        return FrontmatterExtraction::default();
    };

    let mut extraction = FrontmatterExtraction {
        body_start: block.body_start,
        ..Default::default()
    };

    for (index, line) in block.text.lines().enumerate() {
        let Some((key, raw)) = split_entry(line) else {
            continue;
        };

        match serde_json::from_str::<JsonValue>(raw) {
            Ok(value) => {
                extraction.metadata.insert(key.to_string(), value);
            }
            Err(err) => {
                let error = MetaDecodeError {
                    key: key.to_string(),
                    line: block.first_line + index,
                    message: err.to_string(),
                };
                log::warn!("{error}");
                extraction.errors.push(error);
            }
        }
    }

    extraction
}

/// Located frontmatter block.
struct Block<'a> {
    /// Lines between the fences.
    text: &'a str,
    /// Document line number of the first block line.
    first_line: usize,
    /// Offset of the first byte after the closing fence line.
    body_start: usize,
}

/// The opening fence must be the first line, after an optional BOM.
fn find_block(input: &str) -> Option<Block<'_>> {
    let (without_bom, bom_len) = strip_bom(input);
    let (first, block_start) = next_line(without_bom, 0)?;
    if !is_fence(first) {
        return None;
    }

    let mut scan_cursor = block_start;
    loop {
        let Some((line, next_cursor)) = next_line(without_bom, scan_cursor) else {
            log::debug!("Unterminated frontmatter fence; treating document as body");
            return None;
        };
        if is_fence(line) {
            return Some(Block {
                text: &without_bom[block_start..scan_cursor],
                first_line: 2,
                body_start: bom_len + next_cursor,
            });
        }
        scan_cursor = next_cursor;
    }
}

/// Splits `key: value` into its trimmed parts; keys are ASCII word characters.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty()
        || !key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
    {
        return None;
    }
    Some((key, value.trim()))
}

fn strip_bom(input: &str) -> (&str, usize) {
    if let Some(stripped) = input.strip_prefix('\u{feff}') {
        (stripped, '\u{feff}'.len_utf8())
    } else {
        (input, 0)
    }
}

fn next_line(input: &str, start: usize) -> Option<(&str, usize)> {
    if start >= input.len() {
        return None;
    }

    let bytes = &input.as_bytes()[start..];
    if let Some(pos) = bytes.iter().position(|b| *b == b'\n') {
        let line_end = start + pos;
        Some((&input[start..line_end], line_end + 1))
    } else {
        Some((&input[start..], input.len()))
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches('\r').trim_end() == "---"
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn returns_empty_when_no_frontmatter() {
        let result = extract_frontmatter("# Title\nBody");
        assert_eq!(result.body_start, 0);
        assert!(result.metadata.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn decodes_json_literals() {
        let input = "---\ntitle: \"Intro\"\ndraft: false\nweight: 3\ntags: [\"a\", \"b\"]\nauthor: {\"name\": \"x\"}\n---\n# Content";
        let result = extract_frontmatter(input);
        assert_eq!(result.body_start, input.find("# Content").unwrap());
        assert_eq!(result.metadata.get("title"), Some(&json!("Intro")));
        assert_eq!(result.metadata.get("draft"), Some(&json!(false)));
        assert_eq!(result.metadata.get("weight"), Some(&json!(3)));
        assert_eq!(result.metadata.get("tags"), Some(&json!(["a", "b"])));
        assert_eq!(result.metadata.get("author"), Some(&json!({"name": "x"})));
    }

    #[test]
    fn preserves_key_order() {
        let input = "---\nzeta: 1\nalpha: 2\nmid: 3\n---\n";
        let result = extract_frontmatter(input);
        let keys: Vec<&str> = result.metadata.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn malformed_value_does_not_drop_other_keys() {
        let input = "---\ntitle: \"Ok\"\nbroken: not json\nversion: \"1.0\"\n---\nBody";
        let result = extract_frontmatter(input);
        assert_eq!(result.metadata.get("title"), Some(&json!("Ok")));
        assert_eq!(result.metadata.get("version"), Some(&json!("1.0")));
        assert!(!result.metadata.contains_key("broken"));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].key, "broken");
        assert_eq!(result.errors[0].line, 3);
    }

    #[test]
    fn later_duplicate_overwrites_earlier() {
        let input = "---\ntitle: \"first\"\nother: 1\ntitle: \"second\"\n---\n";
        let result = extract_frontmatter(input);
        assert_eq!(result.metadata.get("title"), Some(&json!("second")));
        assert_eq!(result.metadata.len(), 2);
    }

    #[test]
    fn ignores_lines_without_key_pattern() {
        let input = "---\n# comment\n  - item\nkey with space: 1\nok: true\n---\n";
        let result = extract_frontmatter(input);
        assert_eq!(result.metadata.len(), 1);
        assert_eq!(result.metadata.get("ok"), Some(&json!(true)));
        assert!(result.errors.is_empty());
    }

    #[test]
    fn handles_empty_block() {
        let input = "---\n---\n# Body";
        let result = extract_frontmatter(input);
        assert!(result.metadata.is_empty());
        assert_eq!(result.body_start, input.find("# Body").unwrap());
    }

    #[test]
    fn skips_bom() {
        let input = "\u{feff}---\nfoo: \"bar\"\n---\nBody";
        let result = extract_frontmatter(input);
        assert_eq!(result.metadata.get("foo"), Some(&json!("bar")));
        assert_eq!(result.body_start, input.find("Body").unwrap());
    }

    #[test]
    fn fence_after_blank_line_is_body() {
        let input = "\n---\nfoo: 1\n---\n";
        let result = extract_frontmatter(input);
        assert!(result.metadata.is_empty());
        assert_eq!(result.body_start, 0);
    }

    #[test]
    fn crlf_line_endings() {
        let input = "---\r\ntitle: \"Win\"\r\n---\r\nBody";
        let result = extract_frontmatter(input);
        assert_eq!(result.metadata.get("title"), Some(&json!("Win")));
        assert_eq!(result.body_start, input.find("Body").unwrap());
    }

    #[test]
    fn unterminated_block_is_body() {
        let input = "---\ntitle: \"test\"";
        let result = extract_frontmatter(input);
        assert!(result.metadata.is_empty());
        assert_eq!(result.body_start, 0);
    }

    #[test]
    fn decode_error_becomes_warning() {
        let input = "---\nbad: [1,\n---\n";
        let result = extract_frontmatter(input);
        let diagnostic = result.errors[0].to_diagnostic();
        assert_eq!(diagnostic.location.line, 2);
        assert!(diagnostic.message.contains("bad"));
    }
}
