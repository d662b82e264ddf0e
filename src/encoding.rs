//! Byte-level charset detection and transcoding.
//!
//! The extraction core works on UTF-8 strings; this module gets raw bytes
//! there. Detection scans the head of the byte stream for a meta-declared
//! charset and resolves it through `encoding_rs`'s label registry, falling
//! back to the historical HTML default. Decoding is always lossy: invalid
//! sequences become replacement characters and are reported through a flag,
//! never an error.

use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;

/// Matches a meta-declared charset: `<meta charset="...">` as well as the
/// `charset=` parameter of a `Content-Type` content value.
#[allow(clippy::expect_used)]
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s;>]+)"#).expect("valid regex")
});

/// Number of bytes examined for a charset declaration.
const SNIFF_WINDOW: usize = 1024;

/// Detect the character encoding declared in the head of an HTML byte
/// stream.
///
/// Only the first kilobyte is examined. Unknown labels and missing
/// declarations fall back to the HTML default, which `encoding_rs` maps to
/// windows-1252 per the WHATWG registry.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(SNIFF_WINDOW)];
    let head_str = String::from_utf8_lossy(head);
    META_CHARSET_RE
        .captures(&head_str)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
        .unwrap_or(encoding_rs::WINDOWS_1252)
}

/// Resolve a caller-supplied charset label against the WHATWG registry.
#[must_use]
pub fn resolve_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Decode `html` to UTF-8 with the given encoding.
///
/// Invalid sequences are replaced with U+FFFD; the returned flag is true
/// when any replacement happened.
#[must_use]
pub fn decode(encoding: &'static Encoding, html: &[u8]) -> (String, bool) {
    let (text, _encoding_used, had_errors) = encoding.decode(html);
    (text.into_owned(), had_errors)
}
