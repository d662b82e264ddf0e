//! # rs-htmltotext
//!
//! Callback-driven HTML text, link and metadata extraction for full-text
//! indexing.
//!
//! This library turns an HTML document into the fields a full-text indexer
//! wants: whitespace-normalized body text with paragraph boundaries, the
//! links it contains (with their surrounding tag context and paragraph),
//! and document metadata (title, description, keywords, character set,
//! robots directive). It does not build a DOM tree and does not validate
//! markup; unbalanced documents are recovered from silently in a single
//! forward pass.
//!
//! ## Quick Start
//!
//! ```rust
//! let doc = rs_htmltotext::parse(r#"<p>Hello <a href="x">wor ld</a> done</p>"#);
//!
//! assert_eq!(doc.body_text, "Hello wor ld done");
//! assert_eq!(doc.links[0].target, "x");
//! assert_eq!(doc.links[0].text, "wor ld");
//! assert!(doc.indexing_allowed);
//! ```
//!
//! ## Architecture
//!
//! A push [`tokenizer`] lexes the markup into open-tag, close-tag and text
//! events, and a [`DocumentExtractor`] consumes them, maintaining the tag
//! stack, text accumulator, paragraph segmenter and link collector. The
//! extractor can halt the feed early (on `</body>` or a robots `noindex`
//! directive); every termination path produces the same finalized
//! [`ParsedDocument`].
//!
//! Advanced consumers can implement [`ElementHandler`] and drive the
//! tokenizer themselves, or feed a [`DocumentExtractor`] from another
//! event source.

mod error;
mod result;

/// HTML entity decoding (named and numeric references).
pub mod entities;

/// Byte-level charset detection and transcoding.
pub mod encoding;

/// The extraction state machine and its dispatch tables.
pub mod extractor;

/// Push tokenizer turning raw markup into element events.
pub mod tokenizer;

pub use entities::decode_entities;
pub use error::{Error, Result};
pub use extractor::{DocumentExtractor, DEFAULT_CHARSET};
pub use result::{ElementTag, Link, ParsedDocument};
pub use tokenizer::{AttrMap, ElementHandler, ParseFlow, ParseOutcome};

/// Parse an HTML document.
///
/// The charset starts as the historical HTML default ([`DEFAULT_CHARSET`])
/// and may be overridden by a `Content-Type` meta declaration found during
/// the parse.
///
/// # Example
///
/// ```rust
/// let doc = rs_htmltotext::parse(
///     r#"<head><title>Greeting</title></head><body><p>Hello  World</p></body>"#,
/// );
/// assert_eq!(doc.title, "Greeting");
/// assert_eq!(doc.body_text, "Hello World");
/// ```
#[must_use]
pub fn parse(html: &str) -> ParsedDocument {
    let mut extractor = DocumentExtractor::new();
    tokenizer::tokenize(html, &mut extractor);
    extractor.finish()
}

/// Parse an HTML document with a caller-fixed charset.
///
/// The charset is recorded verbatim in the result and meta-tag sniffing is
/// disabled: a `Content-Type` declaration in the document never overrides
/// it.
#[must_use]
pub fn parse_with_charset(html: &str, charset: &str) -> ParsedDocument {
    let mut extractor = DocumentExtractor::with_charset(charset);
    tokenizer::tokenize(html, &mut extractor);
    extractor.finish()
}

/// Parse an HTML document from raw bytes.
///
/// The charset is sniffed from a meta declaration in the head of the byte
/// stream (falling back to the HTML default), the input is transcoded to
/// UTF-8, and the document is parsed with that charset fixed. The result's
/// `charset` field holds the canonical name of the encoding used, and
/// `badly_encoded` is set when the input did not decode cleanly.
///
/// # Example
///
/// ```rust
/// let html = b"<meta charset=\"ISO-8859-1\"><title>Caf\xe9</title>";
/// let doc = rs_htmltotext::parse_bytes(html);
/// assert_eq!(doc.title, "Caf\u{e9}");
/// ```
#[must_use]
pub fn parse_bytes(html: &[u8]) -> ParsedDocument {
    let encoding = encoding::detect_encoding(html);
    let (text, badly_encoded) = encoding::decode(encoding, html);
    let mut doc = parse_with_charset(&text, encoding.name());
    doc.badly_encoded = badly_encoded;
    doc
}

/// Parse an HTML document from raw bytes with a caller-supplied charset
/// label.
///
/// Sniffing is disabled. This is the one fallible entry point: an
/// unrecognized label is an error.
///
/// # Errors
///
/// Returns [`Error::UnknownCharset`] when `charset` is not a label known to
/// the WHATWG encoding registry.
pub fn parse_bytes_with_charset(html: &[u8], charset: &str) -> Result<ParsedDocument> {
    let encoding = encoding::resolve_label(charset)
        .ok_or_else(|| Error::UnknownCharset(charset.to_string()))?;
    let (text, badly_encoded) = encoding::decode(encoding, html);
    let mut doc = parse_with_charset(&text, charset);
    doc.badly_encoded = badly_encoded;
    Ok(doc)
}
