#![deny(missing_docs)]
//! Mark core: frontmatter extraction, slugs, placeholders, code blocks, and links.

/// Code block body normalization.
pub mod code_block;
/// Core error and diagnostic types.
pub mod error;
/// Frontmatter metadata extraction.
pub mod frontmatter;
/// Link and asset URL rewriting.
pub mod links;
/// Markdown parsing utilities and extension hooks.
pub mod parse;
/// Slug generation utilities.
pub mod slug;
/// Metadata placeholder substitution.
pub mod template;

pub use code_block::normalize_code;
pub use error::{ErrorSeverity, MarkError, ParseDiagnostics, RecoverableError, SourceLocation};
pub use frontmatter::{FrontmatterExtraction, MetaDecodeError, Metadata, extract_frontmatter};
pub use links::{is_external, rewrite_url, sanitize_url, transform_url};
pub use parse::{AstTransform, ParseOptions, ParserPipeline, TextTransform, parse_mdast, walk_mut};
pub use slug::{Slugger, slugify};
pub use template::{Placeholders, substitute_placeholders};
