//! Transform stages applied between parsing and rendering.
//!
//! - `alerts`: GitHub alert callout detection in block quotes.
//! - `code`: code block body normalization.
//! - `emoji`: `:shortcode:` replacement in text nodes.

/// GitHub alert callout detection.
pub mod alerts;
/// Code block body normalization.
pub mod code;
/// Emoji shortcode replacement.
pub mod emoji;
