//! Result types for extraction output.
//!
//! This module defines the structured output of a parse: the document-level
//! record plus the per-link and per-tag records it contains. Everything here
//! is plain owned data, fully detached from the parser state that produced
//! it.

use serde::{Deserialize, Serialize};

/// Snapshot of an open element, taken at element-open time.
///
/// Copied (never referenced) into link ancestor/descendant lists, so later
/// mutation of the live tag stack cannot affect captured history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementTag {
    /// Lowercased tag name.
    pub name: String,

    /// Value of the `class` attribute, or empty.
    pub class: String,

    /// Value of the `id` attribute, or empty.
    pub id: String,
}

impl ElementTag {
    /// Create a tag snapshot with empty class and id.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// A hyperlink captured from an anchor element, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URL from the `href` attribute, verbatim (empty if absent).
    pub target: String,

    /// Text accumulated between anchor open and close.
    pub text: String,

    /// Text of the paragraph containing the link.
    ///
    /// Filled in once the enclosing paragraph is closed; stays empty if no
    /// paragraph boundary fires after the link opens.
    pub paragraph_text: String,

    /// Offset of the link text into the document body text.
    pub text_start_offset: usize,

    /// Open elements enclosing the anchor at open time, outermost first.
    /// The final entry is the anchor element itself.
    pub ancestor_tags: Vec<ElementTag>,

    /// Elements opened inside the anchor, in open order regardless of
    /// nesting depth. A flat list, not a tree.
    pub descendant_tags: Vec<ElementTag>,
}

/// Result of parsing an HTML document.
///
/// Built incrementally across the whole parse and finalized exactly once,
/// whichever termination path fires (natural end of input, `</body>`, or a
/// robots `noindex` directive).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Content of the first non-empty `<title>` element.
    pub title: String,

    /// Whitespace-normalized body text.
    pub body_text: String,

    /// Content of the first `<meta name="description">` tag, entity-decoded.
    pub description: String,

    /// Contents of all `<meta name="keywords">` tags, entity-decoded and
    /// joined with single spaces.
    pub keywords: String,

    /// Document character set: the caller-fixed value verbatim, or the
    /// sniffed `Content-Type` value lowercased, or the HTML default.
    pub charset: String,

    /// False when a robots meta tag contained `none` or `noindex`.
    pub indexing_allowed: bool,

    /// True when byte-level input could not be decoded cleanly and
    /// replacement characters were substituted.
    pub badly_encoded: bool,

    /// Links in document order.
    pub links: Vec<Link>,

    /// Paragraph start offsets into `body_text`, non-decreasing.
    pub paragraph_starts: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_tag_named_leaves_class_and_id_empty() {
        let tag = ElementTag::named("div");
        assert_eq!(tag.name, "div");
        assert_eq!(tag.class, "");
        assert_eq!(tag.id, "");
    }

    #[test]
    fn parsed_document_serializes_round_trip() {
        let doc = ParsedDocument {
            title: "t".to_string(),
            body_text: "hello world".to_string(),
            charset: "utf-8".to_string(),
            indexing_allowed: true,
            links: vec![Link {
                target: "x".to_string(),
                text: "world".to_string(),
                text_start_offset: 6,
                ancestor_tags: vec![ElementTag::named("body"), ElementTag::named("a")],
                ..Link::default()
            }],
            paragraph_starts: vec![0, 11],
            ..ParsedDocument::default()
        };

        let json = serde_json::to_string(&doc).unwrap();
        let back: ParsedDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
