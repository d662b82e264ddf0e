//! The callback-driven extraction state machine.
//!
//! [`DocumentExtractor`] consumes tokenizer events and maintains all
//! derived state: the stack of open elements, the whitespace-normalized
//! body text, paragraph boundaries, captured links with their tag context,
//! and document metadata from `<meta>` and `<title>` elements.
//!
//! One extractor instance covers exactly one document: construct, feed
//! events (normally via [`crate::tokenizer::tokenize`]), then call
//! [`DocumentExtractor::finish`] to obtain the result. All three
//! termination paths (input exhausted, `</body>`, robots `noindex`) go
//! through the same finalization.

pub mod accumulator;
pub mod meta;
pub mod tags;

use crate::entities::decode_entities;
use crate::result::{ElementTag, Link, ParsedDocument};
use crate::tokenizer::{AttrMap, ElementHandler, ParseFlow};

use accumulator::{OffsetAnchors, TextAccumulator};

/// The historical HTML default character set, used when the caller fixes
/// nothing and no `Content-Type` meta tag declares one.
pub const DEFAULT_CHARSET: &str = "ISO-8859-1";

/// Extraction state machine for a single document.
pub struct DocumentExtractor {
    charset: String,
    fixed_charset: bool,
    in_script: bool,
    in_style: bool,
    title: String,
    description: String,
    keywords: String,
    indexing_allowed: bool,
    acc: TextAccumulator,
    anchors: OffsetAnchors,
    /// Currently open elements, outermost first. Void tags never enter.
    tags: Vec<ElementTag>,
    links: Vec<Link>,
    /// Indices into `links` collected since the last paragraph boundary,
    /// waiting for their paragraph text.
    paragraph_links: Vec<usize>,
    /// Index of the one open link, if any.
    current_link: Option<usize>,
    paragraph_starts: Vec<usize>,
}

impl DocumentExtractor {
    /// New extractor with the default charset; a `Content-Type` meta tag
    /// may override it.
    #[must_use]
    pub fn new() -> Self {
        Self::build(DEFAULT_CHARSET.to_string(), false)
    }

    /// New extractor with a caller-fixed charset; meta sniffing is
    /// disabled.
    #[must_use]
    pub fn with_charset(charset: &str) -> Self {
        Self::build(charset.to_string(), true)
    }

    fn build(charset: String, fixed_charset: bool) -> Self {
        Self {
            charset,
            fixed_charset,
            in_script: false,
            in_style: false,
            title: String::new(),
            description: String::new(),
            keywords: String::new(),
            indexing_allowed: true,
            acc: TextAccumulator::new(),
            anchors: OffsetAnchors::default(),
            tags: Vec::new(),
            links: Vec::new(),
            paragraph_links: Vec::new(),
            current_link: None,
            paragraph_starts: vec![0],
        }
    }

    /// Finalize and return the document result.
    ///
    /// Flushes the last paragraph and force-closes any links still open,
    /// innermost first.
    #[must_use]
    pub fn finish(mut self) -> ParsedDocument {
        self.new_paragraph();
        for j in (0..self.tags.len()).rev() {
            if self.tags[j].name == "a" {
                self.close_link();
            }
        }
        ParsedDocument {
            title: self.title,
            body_text: self.acc.take_text(),
            description: self.description,
            keywords: self.keywords,
            charset: self.charset,
            indexing_allowed: self.indexing_allowed,
            badly_encoded: false,
            links: self.links,
            paragraph_starts: self.paragraph_starts,
        }
    }

    /// Close the finished paragraph and start a new one at the current end
    /// of the accumulator.
    ///
    /// The finished paragraph's text is assigned to every link collected
    /// since the previous boundary.
    fn new_paragraph(&mut self) {
        self.acc.force_separator();
        if !self.paragraph_links.is_empty() {
            let paragraph_text = self.acc.slice_from(self.anchors.paragraph_start).to_string();
            for idx in self.paragraph_links.drain(..) {
                self.links[idx].paragraph_text = paragraph_text.clone();
            }
        }
        self.anchors.paragraph_start = self.acc.len();
        self.paragraph_starts.push(self.anchors.paragraph_start);
    }

    /// Throw away accumulated text and paragraph state. Used when the body
    /// starts (head text must not leak into the body) and after a title is
    /// captured.
    fn reset_text(&mut self) {
        self.acc.reset();
        self.anchors.paragraph_start = 0;
        self.paragraph_starts = vec![0];
    }

    /// Open a new link; any link still current is closed first, since
    /// anchors cannot meaningfully nest.
    ///
    /// The ancestor snapshot is taken after the anchor's own tag was pushed,
    /// so it includes the anchor itself.
    fn open_link(&mut self, attrs: &AttrMap) {
        self.close_link();
        self.anchors.link_text_start = self.acc.len();
        let link = Link {
            target: attrs.get("href").cloned().unwrap_or_default(),
            text_start_offset: self.anchors.link_text_start,
            ancestor_tags: self.tags.clone(),
            ..Link::default()
        };
        let idx = self.links.len();
        self.links.push(link);
        self.paragraph_links.push(idx);
        self.current_link = Some(idx);
    }

    /// Fix the current link's text span, if it has one, and clear the
    /// current-link marker. No-op when no link is open.
    fn close_link(&mut self) {
        let Some(idx) = self.current_link.take() else {
            return;
        };
        if self.acc.len() > self.anchors.link_text_start {
            self.links[idx].text = self.acc.slice_from(self.anchors.link_text_start).to_string();
        }
    }

    /// Consume a `<meta>` element's attributes.
    fn handle_meta(&mut self, attrs: &AttrMap) -> ParseFlow {
        let Some(content) = attrs.get("content") else {
            return ParseFlow::Continue;
        };
        if let Some(name) = attrs.get("name") {
            match name.to_lowercase().as_str() {
                "description" => {
                    if self.description.is_empty() {
                        self.description = decode_entities(content);
                    }
                }
                "keywords" => {
                    if !self.keywords.is_empty() {
                        self.keywords.push(' ');
                    }
                    self.keywords.push_str(&decode_entities(content));
                }
                "robots" => {
                    if meta::robots_forbids_indexing(content) {
                        self.indexing_allowed = false;
                        return ParseFlow::Halt;
                    }
                }
                _ => {}
            }
        }
        if let Some(http_equiv) = attrs.get("http-equiv") {
            if http_equiv.eq_ignore_ascii_case("content-type") && !self.fixed_charset {
                if let Some(charset) = meta::charset_from_content_type(content) {
                    self.charset = charset;
                }
            }
        }
        ParseFlow::Continue
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementHandler for DocumentExtractor {
    fn on_open(&mut self, name: &str, attrs: &AttrMap) -> ParseFlow {
        if name.is_empty() {
            return ParseFlow::Continue;
        }
        let tag = ElementTag {
            name: name.to_string(),
            class: attrs.get("class").cloned().unwrap_or_default(),
            id: attrs.get("id").cloned().unwrap_or_default(),
        };
        if !tags::is_void_tag(name) {
            self.tags.push(tag.clone());
        }
        if name != "a" {
            if let Some(idx) = self.current_link {
                self.links[idx].descendant_tags.push(tag);
            }
        }
        match name {
            "a" => self.open_link(attrs),
            "body" => {
                self.new_paragraph();
                self.reset_text();
            }
            "meta" => return self.handle_meta(attrs),
            "script" => self.in_script = true,
            "style" => self.in_style = true,
            _ => {
                if tags::breaks_paragraph_on_open(name) {
                    self.new_paragraph();
                }
            }
        }
        ParseFlow::Continue
    }

    fn on_close(&mut self, name: &str) -> ParseFlow {
        if name.is_empty() {
            return ParseFlow::Continue;
        }
        // Recover from unbalanced markup: close the most recent matching
        // open tag, discarding anything opened above it. Open anchors above
        // the match are forcibly closed first. An unmatched close leaves the
        // stack alone.
        if let Some(pos) = self.tags.iter().rposition(|t| t.name == name) {
            if self.current_link.is_some() {
                for j in (pos..self.tags.len()).rev() {
                    if self.tags[j].name == "a" {
                        self.close_link();
                    }
                }
            }
            self.tags.truncate(pos);
        }
        match name {
            "a" => self.close_link(),
            "body" => return ParseFlow::Halt,
            "script" => self.in_script = false,
            "style" => self.in_style = false,
            "title" => {
                if self.title.is_empty() {
                    self.title = self.acc.take_text();
                    self.reset_text();
                }
            }
            _ => {
                if tags::breaks_paragraph_on_close(name) {
                    self.new_paragraph();
                }
            }
        }
        ParseFlow::Continue
    }

    fn on_text(&mut self, text: &str) -> ParseFlow {
        if !text.is_empty() && !self.in_script && !self.in_style {
            self.acc.append(text, &mut self.anchors);
        }
        ParseFlow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(ex: &mut DocumentExtractor, name: &str) -> ParseFlow {
        ex.on_open(name, &AttrMap::new())
    }

    fn open_with(ex: &mut DocumentExtractor, name: &str, attrs: &[(&str, &str)]) -> ParseFlow {
        let attrs: AttrMap = attrs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ex.on_open(name, &attrs)
    }

    #[test]
    fn text_outside_script_and_style_accumulates() {
        let mut ex = DocumentExtractor::new();
        ex.on_text("a ");
        open(&mut ex, "script");
        ex.on_text("var x = 1;");
        ex.on_close("script");
        open(&mut ex, "style");
        ex.on_text("p {}");
        ex.on_close("style");
        ex.on_text("b");
        assert_eq!(ex.finish().body_text, "a b");
    }

    #[test]
    fn opening_second_anchor_closes_the_first() {
        let mut ex = DocumentExtractor::new();
        open(&mut ex, "body");
        open_with(&mut ex, "a", &[("href", "one")]);
        ex.on_text("first");
        open_with(&mut ex, "a", &[("href", "two")]);
        ex.on_text("second");
        let doc = ex.finish();
        assert_eq!(doc.links.len(), 2);
        assert_eq!(doc.links[0].text, "first");
        assert_eq!(doc.links[1].text, "second");
    }

    #[test]
    fn ancestor_snapshot_includes_the_anchor_itself() {
        let mut ex = DocumentExtractor::new();
        open(&mut ex, "body");
        open_with(&mut ex, "div", &[("class", "nav"), ("id", "top")]);
        open_with(&mut ex, "a", &[("href", "x")]);
        let doc = ex.finish();
        let names: Vec<_> = doc.links[0]
            .ancestor_tags
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, ["body", "div", "a"]);
        assert_eq!(doc.links[0].ancestor_tags[1].class, "nav");
        assert_eq!(doc.links[0].ancestor_tags[1].id, "top");
    }

    #[test]
    fn ancestor_snapshot_is_detached_from_the_live_stack() {
        let mut ex = DocumentExtractor::new();
        open(&mut ex, "body");
        open_with(&mut ex, "a", &[("href", "x")]);
        ex.on_close("a");
        ex.on_close("body");
        let doc = ex.finish();
        // Stack emptied since; the snapshot must survive untouched.
        let names: Vec<_> = doc.links[0]
            .ancestor_tags
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, ["body", "a"]);
    }

    #[test]
    fn descendant_tags_accumulate_flat_in_open_order() {
        let mut ex = DocumentExtractor::new();
        open(&mut ex, "body");
        open_with(&mut ex, "a", &[("href", "x")]);
        open(&mut ex, "i");
        open(&mut ex, "em");
        ex.on_close("em");
        ex.on_close("i");
        open(&mut ex, "b");
        let doc = ex.finish();
        let names: Vec<_> = doc.links[0]
            .descendant_tags
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, ["i", "em", "b"]);
    }

    #[test]
    fn closing_an_enclosing_tag_force_closes_the_anchor() {
        let mut ex = DocumentExtractor::new();
        open(&mut ex, "body");
        open(&mut ex, "span");
        open_with(&mut ex, "a", &[("href", "x")]);
        ex.on_text("inside");
        ex.on_close("span");
        ex.on_text(" outside");
        let doc = ex.finish();
        assert_eq!(doc.links[0].text, "inside");
    }

    #[test]
    fn unmatched_close_leaves_the_stack_alone() {
        let mut ex = DocumentExtractor::new();
        open(&mut ex, "body");
        open(&mut ex, "span");
        ex.on_close("div");
        open_with(&mut ex, "a", &[("href", "x")]);
        let doc = ex.finish();
        let names: Vec<_> = doc.links[0]
            .ancestor_tags
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        // div closed nothing; span is still open.
        assert_eq!(names, ["body", "span", "a"]);
    }

    #[test]
    fn unmatched_close_still_breaks_paragraphs_by_name() {
        let mut ex = DocumentExtractor::new();
        open(&mut ex, "body");
        ex.on_text("one");
        ex.on_close("p");
        ex.on_text("two");
        let doc = ex.finish();
        assert_eq!(doc.body_text, "one two");
        // The recorded boundary keeps the pre-separator offset; only the
        // live paragraph slice shifts past the inserted space.
        assert_eq!(doc.paragraph_starts, vec![0, 3, 7]);
    }

    #[test]
    fn body_close_halts() {
        let mut ex = DocumentExtractor::new();
        open(&mut ex, "body");
        ex.on_text("kept");
        assert_eq!(ex.on_close("body"), ParseFlow::Halt);
        let doc = ex.finish();
        assert_eq!(doc.body_text, "kept");
    }

    #[test]
    fn robots_noindex_halts_and_clears_the_flag() {
        let mut ex = DocumentExtractor::new();
        let flow = open_with(
            &mut ex,
            "meta",
            &[("name", "robots"), ("content", "noindex,follow")],
        );
        assert_eq!(flow, ParseFlow::Halt);
        let doc = ex.finish();
        assert!(!doc.indexing_allowed);
    }

    #[test]
    fn meta_without_content_attribute_is_ignored() {
        let mut ex = DocumentExtractor::new();
        let flow = open_with(&mut ex, "meta", &[("name", "robots")]);
        assert_eq!(flow, ParseFlow::Continue);
        assert!(ex.finish().indexing_allowed);
    }

    #[test]
    fn first_description_wins_keywords_accumulate() {
        let mut ex = DocumentExtractor::new();
        open_with(
            &mut ex,
            "meta",
            &[("name", "description"), ("content", "first &amp; best")],
        );
        open_with(
            &mut ex,
            "meta",
            &[("name", "Description"), ("content", "second")],
        );
        open_with(&mut ex, "meta", &[("name", "keywords"), ("content", "ab")]);
        open_with(&mut ex, "meta", &[("name", "KEYWORDS"), ("content", "cd")]);
        let doc = ex.finish();
        assert_eq!(doc.description, "first & best");
        assert_eq!(doc.keywords, "ab cd");
    }

    #[test]
    fn sniffed_charset_defers_to_a_fixed_one() {
        let mut ex = DocumentExtractor::with_charset("koi8-r");
        open_with(
            &mut ex,
            "meta",
            &[
                ("http-equiv", "Content-Type"),
                ("content", "text/html; charset=utf-8"),
            ],
        );
        assert_eq!(ex.finish().charset, "koi8-r");

        let mut ex = DocumentExtractor::new();
        open_with(
            &mut ex,
            "meta",
            &[
                ("http-equiv", "content-type"),
                ("content", "text/html; charset=UTF-8"),
            ],
        );
        assert_eq!(ex.finish().charset, "utf-8");
    }

    #[test]
    fn body_open_discards_head_text() {
        let mut ex = DocumentExtractor::new();
        ex.on_text("head noise");
        open(&mut ex, "body");
        ex.on_text("content");
        let doc = ex.finish();
        assert_eq!(doc.body_text, "content");
        assert_eq!(doc.paragraph_starts, vec![0, 7]);
    }

    #[test]
    fn finish_force_closes_open_anchors() {
        let mut ex = DocumentExtractor::new();
        open(&mut ex, "body");
        open_with(&mut ex, "a", &[("href", "x")]);
        ex.on_text("dangling");
        let doc = ex.finish();
        assert_eq!(doc.links[0].text, "dangling");
        assert_eq!(doc.links[0].paragraph_text, "dangling");
    }

    #[test]
    fn link_with_no_following_boundary_keeps_empty_paragraph_text_until_finish() {
        let mut ex = DocumentExtractor::new();
        open(&mut ex, "body");
        open_with(&mut ex, "a", &[("href", "x")]);
        ex.on_text("t");
        ex.on_close("a");
        // finish() flushes the final paragraph, which assigns it.
        let doc = ex.finish();
        assert_eq!(doc.links[0].paragraph_text, "t");
    }

    #[test]
    fn empty_tag_names_are_no_ops() {
        let mut ex = DocumentExtractor::new();
        assert_eq!(open(&mut ex, ""), ParseFlow::Continue);
        assert_eq!(ex.on_close(""), ParseFlow::Continue);
        let doc = ex.finish();
        assert_eq!(doc.paragraph_starts, vec![0, 0]);
    }
}
