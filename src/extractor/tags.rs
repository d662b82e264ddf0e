//! Static tag dispatch tables.
//!
//! Consulted on every open/close event: which tags never take a matching
//! close (and so never enter the tag stack), and which tags force a
//! paragraph boundary when opened or closed. Provided as arrays for
//! inspection and `HashSet`s for O(1) lookup.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Void tags: elements with no matching close tag, never pushed onto the
/// tag stack.
pub static VOID_TAGS: [&str; 13] = [
    "area", "base", "basefont", "br", "col", "frame", "hr", "img", "input", "isindex", "link",
    "meta", "param",
];

/// Tags whose open event starts a new paragraph.
pub static PARAGRAPH_ON_OPEN_TAGS: [&str; 43] = [
    "address", "blockquote", "br", "center", "dd", "dir", "div", "dl", "dt", "embed", "fieldset",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "iframe", "img", "input", "isindex",
    "keygen", "legend", "li", "listing", "marquee", "menu", "multicol", "ol", "option", "p",
    "plaintext", "pre", "q", "select", "table", "td", "textarea", "th", "ul", "xmp",
];

/// Tags whose close event starts a new paragraph.
///
/// A subset of the open list: tags that only render as open events (img,
/// input, embed and similar) have no close entry.
pub static PARAGRAPH_ON_CLOSE_TAGS: [&str; 36] = [
    "address", "blockquote", "br", "center", "dd", "dir", "div", "dl", "dt", "fieldset", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "hr", "iframe", "legend", "li", "listing", "marquee",
    "menu", "ol", "option", "p", "pre", "q", "select", "table", "td", "textarea", "th", "ul",
    "xmp",
];

/// `VOID_TAGS` as a `HashSet`
static VOID_TAG_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| VOID_TAGS.into_iter().collect());

/// `PARAGRAPH_ON_OPEN_TAGS` as a `HashSet`
static PARAGRAPH_ON_OPEN_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| PARAGRAPH_ON_OPEN_TAGS.into_iter().collect());

/// `PARAGRAPH_ON_CLOSE_TAGS` as a `HashSet`
static PARAGRAPH_ON_CLOSE_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| PARAGRAPH_ON_CLOSE_TAGS.into_iter().collect());

/// Check if a tag has no matching close tag (br, img, meta, ...).
#[inline]
#[must_use]
pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAG_SET.contains(tag)
}

/// Check if opening `tag` forces a paragraph boundary.
#[inline]
#[must_use]
pub fn breaks_paragraph_on_open(tag: &str) -> bool {
    PARAGRAPH_ON_OPEN_SET.contains(tag)
}

/// Check if closing `tag` forces a paragraph boundary.
#[inline]
#[must_use]
pub fn breaks_paragraph_on_close(tag: &str) -> bool {
    PARAGRAPH_ON_CLOSE_SET.contains(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_tags_cover_the_usual_suspects() {
        assert!(is_void_tag("br"));
        assert!(is_void_tag("img"));
        assert!(is_void_tag("meta"));
        assert!(is_void_tag("hr"));
        assert!(!is_void_tag("p"));
        assert!(!is_void_tag("a"));
        assert!(!is_void_tag("b"));
    }

    #[test]
    fn headings_break_paragraphs_both_ways() {
        for tag in ["h1", "h2", "h3", "h4", "h5", "h6", "hr"] {
            assert!(breaks_paragraph_on_open(tag), "open {tag}");
            assert!(breaks_paragraph_on_close(tag), "close {tag}");
        }
    }

    #[test]
    fn open_only_boundaries_have_no_close_entry() {
        for tag in ["embed", "img", "input", "isindex", "keygen", "multicol", "plaintext"] {
            assert!(breaks_paragraph_on_open(tag), "open {tag}");
            assert!(!breaks_paragraph_on_close(tag), "close {tag}");
        }
    }

    #[test]
    fn inline_tags_are_not_boundaries() {
        for tag in ["a", "b", "i", "em", "strong", "span", "title", "body"] {
            assert!(!breaks_paragraph_on_open(tag), "open {tag}");
            assert!(!breaks_paragraph_on_close(tag), "close {tag}");
        }
    }

    #[test]
    fn close_list_is_a_subset_of_open_list() {
        for tag in &PARAGRAPH_ON_CLOSE_TAGS {
            assert!(breaks_paragraph_on_open(tag), "missing in open list: {tag}");
        }
    }
}
