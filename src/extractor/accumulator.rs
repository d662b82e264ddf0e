//! Whitespace-normalizing text accumulator.
//!
//! The single growing output buffer for body text. Runs of whitespace,
//! including runs spanning multiple `append` calls, collapse to at most one
//! literal space, and that separator is only written once non-whitespace
//! content follows it (the pending-space flag). A trailing run therefore
//! never materializes.
//!
//! Offsets into the buffer are captured elsewhere at "current length". When
//! a deferred separator is written at exactly such an offset, the recorded
//! position must shift past it, so every anchored offset lives in
//! [`OffsetAnchors`] and the correction happens here, in the one place a
//! separator can be inserted.

/// Whitespace characters that collapse: space, tab, CR, LF.
const WHITESPACE: [u8; 4] = [b' ', b'\t', b'\r', b'\n'];

#[inline]
fn is_ws(b: u8) -> bool {
    WHITESPACE.contains(&b)
}

/// Live offsets anchored to the accumulator's current end.
///
/// Both start at zero and are rewritten by the extractor as paragraphs and
/// links open; `append` bumps whichever of them sits exactly at the
/// insertion point of a materialized separator.
#[derive(Debug, Default)]
pub struct OffsetAnchors {
    /// Start of the paragraph currently being accumulated.
    pub paragraph_start: usize,

    /// Start of the current link's text span.
    pub link_text_start: usize,
}

impl OffsetAnchors {
    fn bump_at(&mut self, len: usize) {
        if self.paragraph_start == len {
            self.paragraph_start += 1;
        }
        if self.link_text_start == len {
            self.link_text_start += 1;
        }
    }
}

/// The growing body-text buffer with whitespace collapsing.
#[derive(Debug, Default)]
pub struct TextAccumulator {
    text: String,
    pending_space: bool,
}

impl TextAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw text run, collapsing whitespace.
    ///
    /// Separators are deferred: a run ending in whitespace only produces a
    /// space if more non-whitespace text ever arrives. No separator is
    /// written at the very start of the buffer.
    pub fn append(&mut self, raw: &str, anchors: &mut OffsetAnchors) {
        if raw.is_empty() {
            return;
        }
        let bytes = raw.as_bytes();
        let Some(mut b) = find_non_ws(bytes, 0) else {
            // All whitespace: just arm the separator.
            self.pending_space = true;
            return;
        };
        if b > 0 {
            self.pending_space = true;
        }
        loop {
            if self.pending_space && !self.text.is_empty() {
                anchors.bump_at(self.text.len());
                self.text.push(' ');
            }
            let Some(e) = find_ws(bytes, b) else {
                self.text.push_str(&raw[b..]);
                self.pending_space = false;
                return;
            };
            self.text.push_str(&raw[b..e]);
            self.pending_space = true;
            match find_non_ws(bytes, e + 1) {
                Some(next) => b = next,
                None => return,
            }
        }
    }

    /// Arm the separator so the next appended text is space-separated.
    pub fn force_separator(&mut self) {
        self.pending_space = true;
    }

    /// Discard all accumulated text. The pending-space flag is untouched.
    pub fn reset(&mut self) {
        self.text.clear();
    }

    /// Move the accumulated text out, leaving the buffer empty.
    pub fn take_text(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    /// Current buffer length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The accumulated text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Slice of the buffer from `start` to the current end.
    #[must_use]
    pub fn slice_from(&self, start: usize) -> &str {
        &self.text[start..]
    }
}

fn find_non_ws(bytes: &[u8], from: usize) -> Option<usize> {
    (from..bytes.len()).find(|&i| !is_ws(bytes[i]))
}

fn find_ws(bytes: &[u8], from: usize) -> Option<usize> {
    (from..bytes.len()).find(|&i| is_ws(bytes[i]))
}
