//! Syntax highlighting of code blocks.
//!
//! Code is tokenized with syntect's bundled grammars and turned into
//! `span.hl-<scope>` render nodes. Styling is left to the stylesheet.

use crate::tree::{Element, Node};
use once_cell::sync::Lazy;
use syntect::easy::ScopeRangeIterator;
use syntect::parsing::{
    ParseState, ParsingError, Scope, ScopeError, ScopeStack, SyntaxReference, SyntaxSet,
};
use syntect::util::LinesWithEndings;
use thiserror::Error;

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

/// Scope roots that only describe structure and never get a class.
const STRUCTURAL_SCOPES: &[&str] = &["source", "text", "meta"];

/// Tokenizer failure. The caller falls back to plain code.
#[derive(Debug, Error)]
pub enum HighlightError {
    /// The grammar failed on a line.
    #[error("grammar failed: {0}")]
    Parsing(#[from] ParsingError),
    /// The grammar produced an unbalanced scope stack.
    #[error("scope stack error: {0:?}")]
    Scope(ScopeError),
}

impl From<ScopeError> for HighlightError {
    fn from(err: ScopeError) -> Self {
        HighlightError::Scope(err)
    }
}

/// Highlighted code block content.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlighted {
    /// Language name for the `language-<lang>` class, if known.
    pub language: Option<String>,
    /// Whether `nodes` carry highlight spans.
    pub tokenized: bool,
    /// Children of the `code` element.
    pub nodes: Vec<Node>,
}

/// Highlights `code` in the declared language, or in the language detected
/// from its first line when none is declared.
///
/// Unknown languages and tokenizer failures give a single text node.
pub fn highlight(code: &str, lang: Option<&str>) -> Highlighted {
    let declared = lang.map(str::trim).filter(|lang| !lang.is_empty());
    let syntax = match declared {
        Some(lang) => SYNTAXES
            .find_syntax_by_token(lang)
            .filter(|syntax| syntax.name != "Plain Text"),
        None => SYNTAXES
            .find_syntax_by_first_line(code)
            .filter(|syntax| syntax.name != "Plain Text"),
    };

    let language = declared
        .map(str::to_ascii_lowercase)
        .or_else(|| syntax.map(language_name));

    let Some(syntax) = syntax else {
        return Highlighted {
            language,
            tokenized: false,
            nodes: plain(code),
        };
    };

    match tokenize(code, syntax) {
        Ok(nodes) => Highlighted {
            language,
            tokenized: true,
            nodes,
        },
        Err(err) => {
            log::warn!("Highlighting {} failed: {err}", syntax.name);
            Highlighted {
                language,
                tokenized: false,
                nodes: plain(code),
            }
        }
    }
}

fn plain(code: &str) -> Vec<Node> {
    if code.is_empty() {
        Vec::new()
    } else {
        vec![Node::text(code)]
    }
}

fn language_name(syntax: &SyntaxReference) -> String {
    syntax
        .file_extensions
        .first()
        .cloned()
        .unwrap_or_else(|| syntax.name.to_ascii_lowercase().replace(' ', "-"))
}

fn tokenize(code: &str, syntax: &SyntaxReference) -> Result<Vec<Node>, HighlightError> {
    let mut state = ParseState::new(syntax);
    let mut stack = ScopeStack::new();
    let mut nodes = Vec::new();

    for line in LinesWithEndings::from(code) {
        let ops = state.parse_line(line, &SYNTAXES)?;
        for (range, op) in ScopeRangeIterator::new(&ops, line) {
            stack.apply(op)?;
            if range.is_empty() {
                continue;
            }
            push_token(&mut nodes, token_class(&stack), &line[range]);
        }
    }

    Ok(nodes)
}

/// Class of the innermost scope that is not purely structural.
fn token_class(stack: &ScopeStack) -> Option<String> {
    stack
        .as_slice()
        .iter()
        .rev()
        .map(root_atom)
        .find(|atom| !STRUCTURAL_SCOPES.contains(&atom.as_str()))
        .map(|atom| format!("hl-{atom}"))
}

fn root_atom(scope: &Scope) -> String {
    let name = scope.build_string();
    match name.split_once('.') {
        Some((root, _)) => root.to_string(),
        None => name,
    }
}

/// Appends a token, merging it into the previous node when the class matches.
fn push_token(nodes: &mut Vec<Node>, class: Option<String>, text: &str) {
    if let Some(last) = nodes.last_mut() {
        match (last, &class) {
            (Node::Text { value }, None) => {
                value.push_str(text);
                return;
            }
            (Node::Element(span), Some(class)) if span.get("class") == Some(class.as_str()) => {
                if let Some(Node::Text { value }) = span.children.last_mut() {
                    value.push_str(text);
                    return;
                }
            }
            _ => {}
        }
    }

    let node = match class {
        Some(class) => Element::new("span")
            .class(class)
            .child(Node::text(text))
            .into(),
        None => Node::text(text),
    };
    nodes.push(node);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(nodes: &[Node]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(Node::as_element)
            .filter_map(|span| span.get("class").map(str::to_string))
            .collect()
    }

    fn text(nodes: &[Node]) -> String {
        nodes.iter().map(Node::text_content).collect()
    }

    #[test]
    fn declared_language_is_tokenized() {
        let code = "fn main() {\n  let x = \"hi\";\n}";
        let out = highlight(code, Some("rust"));
        assert!(out.tokenized);
        assert_eq!(out.language.as_deref(), Some("rust"));
        assert_eq!(text(&out.nodes), code);
        let classes = classes(&out.nodes);
        assert!(classes.iter().any(|c| c == "hl-storage" || c == "hl-keyword"));
        assert!(classes.iter().any(|c| c == "hl-string"));
    }

    #[test]
    fn unknown_language_renders_plain() {
        let out = highlight("some <text>", Some("no-such-language"));
        assert!(!out.tokenized);
        assert_eq!(out.language.as_deref(), Some("no-such-language"));
        assert_eq!(out.nodes, vec![Node::text("some <text>")]);
    }

    #[test]
    fn detects_language_from_first_line() {
        let out = highlight("#!/bin/bash\necho hi", None);
        assert!(out.tokenized);
        assert!(out.language.is_some());
        assert_eq!(text(&out.nodes), "#!/bin/bash\necho hi");
    }

    #[test]
    fn undetectable_code_is_plain_without_language() {
        let out = highlight("just words", None);
        assert!(!out.tokenized);
        assert_eq!(out.language, None);
    }

    #[test]
    fn adjacent_tokens_of_one_class_merge() {
        let mut nodes = Vec::new();
        push_token(&mut nodes, Some("hl-string".into()), "\"a");
        push_token(&mut nodes, Some("hl-string".into()), "b\"");
        push_token(&mut nodes, None, " ");
        push_token(&mut nodes, None, ";");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].text_content(), "\"ab\"");
        assert_eq!(nodes[1], Node::text(" ;"));
    }
}
