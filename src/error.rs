//! Error types for rs-htmltotext.
//!
//! Parsing itself has no fatal errors: malformed markup is recovered
//! silently. The only fallible operation is decoding raw bytes with a
//! caller-supplied charset label.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller-supplied charset label is not a known encoding.
    #[error("unknown charset label: {0:?}")]
    UnknownCharset(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
