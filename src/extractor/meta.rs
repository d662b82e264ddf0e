//! `<meta>` attribute value parsing.
//!
//! The charset parameter of a `Content-Type` value uses HTTP-header-style
//! syntax: an unquoted token terminated by whitespace, a control character
//! or a separator, or a double-quoted string with backslash escapes.

use crate::entities::decode_entities;

/// HTTP separator characters that terminate an unquoted charset token.
const TOKEN_DELIMITERS: &[u8] = br#";()<>@,:\"/[]?={}"#;

/// Extract the charset parameter from a `Content-Type` meta value.
///
/// The whole value is lowercased first, so the returned token is always
/// lowercase. Returns `None` when there is no `charset=` key or the token
/// is empty, leaving the caller's charset unchanged.
#[must_use]
pub fn charset_from_content_type(content: &str) -> Option<String> {
    let value = content.to_ascii_lowercase();
    let start = value.find("charset=")? + "charset=".len();
    if start == value.len() {
        return None;
    }

    let token = if value.as_bytes()[start] == b'"' {
        quoted_token(&value[start + 1..])
    } else {
        unquoted_token(&value[start..])
    };
    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// Token runs until whitespace, a control character, a non-ASCII byte or a
/// separator.
fn unquoted_token(rest: &str) -> String {
    let bytes = rest.as_bytes();
    let mut end = 0;
    while end < bytes.len() {
        let b = bytes[end];
        if b <= 32 || b >= 127 || TOKEN_DELIMITERS.contains(&b) {
            break;
        }
        end += 1;
    }
    rest[..end].to_string()
}

/// Token runs to the next unescaped double quote; backslash escapes are
/// unescaped in place. An unterminated string runs to end of value.
fn quoted_token(rest: &str) -> String {
    let mut out = String::new();
    let mut chars = rest.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => break,
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Whether a robots meta value forbids indexing.
///
/// The value is entity-decoded and lowercased; any occurrence of `none` or
/// `noindex` as a substring counts.
#[must_use]
pub fn robots_forbids_indexing(content: &str) -> bool {
    let value = decode_entities(content).to_lowercase();
    value.contains("none") || value.contains("noindex")
}
