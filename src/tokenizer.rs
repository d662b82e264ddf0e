//! Push tokenizer: raw markup to element events.
//!
//! Lexes an HTML document into open-tag, close-tag and text events and
//! pushes them, in document order, into an [`ElementHandler`]. Comments,
//! CDATA sections, doctypes and processing instructions are stripped. Tag
//! and attribute names are lowercased. Entity references are decoded in
//! text runs before delivery; attribute values are delivered raw, so the
//! consumer decides which of them to decode.
//!
//! `<script>` and `<style>` contents are lexed as raw text up to the
//! matching close tag: no tags are reported inside them and no entity
//! decoding is applied.
//!
//! The handler controls termination: every delivered event returns a
//! [`ParseFlow`], and the driver stops feeding events on the first `Halt`.
//! Malformed markup never fails; anything unparseable is either passed
//! through as text or dropped.

use std::collections::HashMap;

use memchr::{memchr, memmem};

use crate::entities::decode_entities;

/// Attribute name to value mapping for one open tag. Names are lowercased;
/// on duplicate attributes the first occurrence wins.
pub type AttrMap = HashMap<String, String>;

/// Per-event control signal returned by handler callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFlow {
    /// Keep feeding events.
    Continue,
    /// Stop the parse; a controlled termination, not an error.
    Halt,
}

impl ParseFlow {
    /// Whether this signal stops the event feed.
    #[must_use]
    pub fn is_halt(self) -> bool {
        matches!(self, Self::Halt)
    }
}

/// How a tokenize run ended.
///
/// Both outcomes leave the handler with a valid, finalizable state; `Halted`
/// only records that the handler cut the feed short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The input was consumed to its end.
    Completed,
    /// The handler returned [`ParseFlow::Halt`] mid-document.
    Halted,
}

/// Consumer of tokenizer events.
///
/// One concrete state machine implementing these three callbacks is all the
/// extraction core needs; the trait exists so tests and alternative
/// consumers can drive their own event streams.
pub trait ElementHandler {
    /// An element opened. Void elements and XHTML self-closing tags are
    /// delivered through this callback only, with no matching close.
    fn on_open(&mut self, name: &str, attrs: &AttrMap) -> ParseFlow;

    /// An element closed.
    fn on_close(&mut self, name: &str) -> ParseFlow;

    /// A run of character data, entity-decoded unless inside a raw-text
    /// element.
    fn on_text(&mut self, text: &str) -> ParseFlow;
}

#[inline]
fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

#[inline]
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

/// Tokenize `html` and push every event into `handler`.
///
/// Runs a single forward pass, checking the handler's [`ParseFlow`] after
/// each event and stopping early on `Halt`.
pub fn tokenize<H: ElementHandler>(html: &str, handler: &mut H) -> ParseOutcome {
    let bytes = html.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        let Some(off) = memchr(b'<', &bytes[pos..]) else {
            if handler.on_text(&decode_entities(&html[pos..])).is_halt() {
                return ParseOutcome::Halted;
            }
            return ParseOutcome::Completed;
        };
        let lt = pos + off;
        if lt > pos && handler.on_text(&decode_entities(&html[pos..lt])).is_halt() {
            return ParseOutcome::Halted;
        }

        let rest = &bytes[lt + 1..];
        pos = match rest.first() {
            Some(b'!') if rest.starts_with(b"!--") => skip_comment(bytes, lt),
            Some(b'!') if rest.starts_with(b"![CDATA[") => skip_cdata(bytes, lt),
            Some(b'!' | b'?') => skip_to_gt(bytes, lt + 1),
            Some(b'/') => match close_tag(html, lt, handler) {
                Step::At(next) => next,
                Step::Halted => return ParseOutcome::Halted,
            },
            Some(b) if b.is_ascii_alphabetic() => match open_tag(html, lt, handler) {
                Step::At(next) => next,
                Step::Halted => return ParseOutcome::Halted,
            },
            _ => {
                // Literal '<' in text.
                if handler.on_text("<").is_halt() {
                    return ParseOutcome::Halted;
                }
                lt + 1
            }
        };
    }
    ParseOutcome::Completed
}

/// Position after one tag (or raw-text region), or a halt from the handler.
enum Step {
    At(usize),
    Halted,
}

fn skip_comment(bytes: &[u8], lt: usize) -> usize {
    match memmem::find(&bytes[lt + 4..], b"-->") {
        Some(off) => lt + 4 + off + 3,
        None => bytes.len(),
    }
}

fn skip_cdata(bytes: &[u8], lt: usize) -> usize {
    match memmem::find(&bytes[lt + 9..], b"]]>") {
        Some(off) => lt + 9 + off + 3,
        None => bytes.len(),
    }
}

fn skip_to_gt(bytes: &[u8], from: usize) -> usize {
    match memchr(b'>', &bytes[from..]) {
        Some(off) => from + off + 1,
        None => bytes.len(),
    }
}

fn close_tag<H: ElementHandler>(html: &str, lt: usize, handler: &mut H) -> Step {
    let bytes = html.as_bytes();
    let name_start = lt + 2;
    let mut i = name_start;
    while i < bytes.len() && is_name_byte(bytes[i]) {
        i += 1;
    }
    let name = html[name_start..i].to_ascii_lowercase();
    let Some(off) = memchr(b'>', &bytes[i..]) else {
        // Tag truncated by end of input; drop it.
        return Step::At(bytes.len());
    };
    let next = i + off + 1;
    if !name.is_empty() && handler.on_close(&name).is_halt() {
        return Step::Halted;
    }
    Step::At(next)
}

fn open_tag<H: ElementHandler>(html: &str, lt: usize, handler: &mut H) -> Step {
    let bytes = html.as_bytes();
    let Some((name, attrs, next)) = lex_open_tag(html, lt) else {
        return Step::At(bytes.len());
    };
    if handler.on_open(&name, &attrs).is_halt() {
        return Step::Halted;
    }
    if name == "script" || name == "style" {
        return raw_text(html, next, &name, handler);
    }
    Step::At(next)
}

/// Lex one open tag starting at the `<` at `lt`. Returns the lowercased
/// name, attributes and the position just past the closing `>`, or `None`
/// when the tag is truncated by end of input.
fn lex_open_tag(html: &str, lt: usize) -> Option<(String, AttrMap, usize)> {
    let bytes = html.as_bytes();
    let mut i = lt + 1;
    let name_start = i;
    while i < bytes.len() && is_name_byte(bytes[i]) {
        i += 1;
    }
    let name = html[name_start..i].to_ascii_lowercase();
    let mut attrs = AttrMap::new();

    loop {
        // Stray '/' also covers XHTML self-closing syntax, which is
        // delivered as a plain open event.
        while i < bytes.len() && (is_ws(bytes[i]) || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        if bytes[i] == b'>' {
            return Some((name, attrs, i + 1));
        }

        let attr_start = i;
        while i < bytes.len() && !is_ws(bytes[i]) && !matches!(bytes[i], b'=' | b'>' | b'/') {
            i += 1;
        }
        let attr_name = html[attr_start..i].to_ascii_lowercase();

        while i < bytes.len() && is_ws(bytes[i]) {
            i += 1;
        }
        let mut value = String::new();
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && is_ws(bytes[i]) {
                i += 1;
            }
            if i < bytes.len() {
                match bytes[i] {
                    quote @ (b'"' | b'\'') => {
                        i += 1;
                        let value_start = i;
                        while i < bytes.len() && bytes[i] != quote {
                            i += 1;
                        }
                        if i >= bytes.len() {
                            return None;
                        }
                        value = html[value_start..i].to_string();
                        i += 1;
                    }
                    _ => {
                        let value_start = i;
                        while i < bytes.len() && !is_ws(bytes[i]) && bytes[i] != b'>' {
                            i += 1;
                        }
                        value = html[value_start..i].to_string();
                    }
                }
            }
        }
        if !attr_name.is_empty() {
            attrs.entry(attr_name).or_insert(value);
        }
    }
}

/// Deliver `<script>`/`<style>` contents as one raw text run, then the
/// close tag. An unterminated raw-text element swallows the rest of the
/// input.
fn raw_text<H: ElementHandler>(html: &str, from: usize, name: &str, handler: &mut H) -> Step {
    let bytes = html.as_bytes();
    let Some(close) = find_close_tag(bytes, from, name) else {
        if from < bytes.len() && handler.on_text(&html[from..]).is_halt() {
            return Step::Halted;
        }
        return Step::At(bytes.len());
    };
    if close > from && handler.on_text(&html[from..close]).is_halt() {
        return Step::Halted;
    }
    let next = skip_to_gt(bytes, close);
    if handler.on_close(name).is_halt() {
        return Step::Halted;
    }
    Step::At(next)
}

/// Find `</name` (case-insensitive, followed by whitespace or `>`), from
/// `from`.
fn find_close_tag(bytes: &[u8], from: usize, name: &str) -> Option<usize> {
    let mut pos = from;
    while let Some(off) = memchr(b'<', &bytes[pos..]) {
        let lt = pos + off;
        let rest = &bytes[lt..];
        if rest.len() > name.len() + 2
            && rest[1] == b'/'
            && rest[2..2 + name.len()].eq_ignore_ascii_case(name.as_bytes())
            && (is_ws(rest[2 + name.len()]) || rest[2 + name.len()] == b'>')
        {
            return Some(lt);
        }
        pos = lt + 1;
    }
    None
}
