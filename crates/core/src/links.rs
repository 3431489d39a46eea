//! Link and asset URL rewriting.
//!
//! Authored documents reference each other through `.md` files and
//! `index.md` directory documents; rendered output exposes clean URLs
//! instead. The navigation layer resolves clean URLs back to the files.

use std::borrow::Cow;

/// URI schemes that survive sanitization.
const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto", "tel", "irc", "ircs", "xmpp"];

/// Returns the URI scheme of `url`, if it has one.
///
/// A scheme is a leading ASCII letter followed by letters, digits, `+`, `-` or
/// `.`, terminated by `:` before any `/`, `?` or `#`.
pub fn scheme(url: &str) -> Option<&str> {
    let colon = url.find(':')?;
    let candidate = &url[..colon];
    let mut chars = candidate.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        .then_some(candidate)
}

/// Returns true for scheme-qualified or protocol-relative URLs.
pub fn is_external(url: &str) -> bool {
    scheme(url).is_some() || url.starts_with("//")
}

/// Blanks URLs whose scheme could execute code (`javascript:`, `data:`, ...).
pub fn sanitize_url(url: &str) -> Cow<'_, str> {
    match scheme(url) {
        Some(scheme)
            if !SAFE_SCHEMES
                .iter()
                .any(|safe| safe.eq_ignore_ascii_case(scheme)) =>
        {
            log::debug!("Dropping URL with unsafe scheme: {url}");
            Cow::Borrowed("")
        }
        _ => Cow::Borrowed(url),
    }
}

/// Rewrites a document reference to its clean URL.
///
/// `a/index.md` becomes `a/`, `a/b.md` becomes `a/b`; query and fragment are
/// kept. External URLs and already clean URLs are returned unchanged.
pub fn rewrite_url(url: &str) -> Cow<'_, str> {
    if is_external(url) {
        return Cow::Borrowed(url);
    }

    let split = url.find(['?', '#']).unwrap_or(url.len());
    let (path, suffix) = url.split_at(split);

    let clean = if let Some(dir) = path.strip_suffix("/index.md") {
        &path[..dir.len() + 1]
    } else if let Some(stem) = path.strip_suffix(".md") {
        stem
    } else {
        return Cow::Borrowed(url);
    };

    Cow::Owned(format!("{}{}", clean, suffix))
}

/// Sanitizes and rewrites a URL found in a document.
pub fn transform_url(url: &str) -> String {
    let sanitized = sanitize_url(url);
    rewrite_url(&sanitized).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_index_document() {
        assert_eq!(rewrite_url("a/index.md"), "a/");
        assert_eq!(rewrite_url("/guide/index.md"), "/guide/");
    }

    #[test]
    fn strips_md_extension() {
        assert_eq!(rewrite_url("a/b.md"), "a/b");
        assert_eq!(rewrite_url("../setup.md"), "../setup");
        assert_eq!(rewrite_url("index.md"), "index");
    }

    #[test]
    fn keeps_query_and_fragment() {
        assert_eq!(rewrite_url("a/b.md#usage"), "a/b#usage");
        assert_eq!(rewrite_url("docs/index.md?v=2#top"), "docs/?v=2#top");
    }

    #[test]
    fn clean_urls_unchanged() {
        for url in ["a/b", "a/", "#section", "/", "", "image.png", "a.mdx"] {
            assert_eq!(rewrite_url(url), url);
            assert!(matches!(rewrite_url(url), Cow::Borrowed(_)));
        }
    }

    #[test]
    fn idempotent() {
        for url in ["a/index.md", "a/b.md", "x/y", "a/b.md#frag"] {
            let once = rewrite_url(url).into_owned();
            assert_eq!(rewrite_url(&once), once);
        }
    }

    #[test]
    fn external_urls_pass_through() {
        assert_eq!(
            rewrite_url("https://example.com/readme.md"),
            "https://example.com/readme.md"
        );
        assert_eq!(rewrite_url("//cdn.example.com/a.md"), "//cdn.example.com/a.md");
        assert_eq!(rewrite_url("mailto:team@example.com"), "mailto:team@example.com");
    }

    #[test]
    fn scheme_detection() {
        assert_eq!(scheme("https://x"), Some("https"));
        assert_eq!(scheme("svn+ssh://x"), Some("svn+ssh"));
        assert_eq!(scheme("a/b:c"), None);
        assert_eq!(scheme("1abc:x"), None);
        assert_eq!(scheme("relative.md"), None);
    }

    #[test]
    fn unsafe_schemes_are_blanked() {
        assert_eq!(transform_url("javascript:alert(1)"), "");
        assert_eq!(transform_url("JAVASCRIPT:alert(1)"), "");
        assert_eq!(transform_url("data:text/html,x"), "");
        assert_eq!(transform_url("HTTPS://example.com"), "HTTPS://example.com");
        assert_eq!(transform_url("guide/index.md"), "guide/");
    }
}
