//! Literal text lookup in character offsets.
//!
//! Suggestion spans are located by content, not by their stored offsets. This module provides
//! the exact, case-sensitive substring search used for that, reporting matches as half-open
//! character ranges together with the matching byte range (for splicing).

use std::ops::Range;

/// A match expressed as a half-open character range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
    /// Byte range of the match in the searched text.
    pub bytes: Range<usize>,
}

impl TextMatch {
    /// Returns the length of the match in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[derive(Debug)]
struct CharIndex {
    char_to_byte: Vec<usize>,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self { char_to_byte }
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        match self.char_to_byte.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }
}

fn to_match(index: &CharIndex, byte_start: usize, needle: &str) -> TextMatch {
    let byte_end = byte_start + needle.len();
    TextMatch {
        start: index.byte_to_char(byte_start),
        end: index.byte_to_char(byte_end),
        bytes: byte_start..byte_end,
    }
}

/// Find the first (lowest offset) occurrence of `needle` in `text`.
///
/// Returns `None` if there is no match or if `needle` is empty.
pub fn find_first(text: &str, needle: &str) -> Option<TextMatch> {
    if needle.is_empty() {
        return None;
    }

    let byte_start = text.find(needle)?;
    let index = CharIndex::new(text);
    Some(to_match(&index, byte_start, needle))
}
