//! Structured text change deltas.
//!
//! Accepting a suggestion replaces the whole buffer. Consumers that want to know *what* changed
//! (highlighting the replaced region, logging, incremental re-analysis) receive a [`TextDelta`]
//! instead of diffing old/new text themselves. Offsets are **character offsets**.

/// A single text edit expressed in character offsets.
///
/// - `start` is a character offset in the buffer **before** the edit.
/// - The deleted range is defined by the length (in `char`s) of `deleted_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDeltaEdit {
    /// Start character offset of the edit.
    pub start: usize,
    /// Exact deleted text (may be empty).
    pub deleted_text: String,
    /// Exact inserted text (may be empty).
    pub inserted_text: String,
}

impl TextDeltaEdit {
    /// Length of `deleted_text` in characters.
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    /// Length of `inserted_text` in characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Exclusive end character offset in the pre-edit buffer.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.deleted_len())
    }
}

/// A structured description of a buffer change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDelta {
    /// Character count before applying `edits`.
    pub before_char_count: usize,
    /// Character count after applying `edits`.
    pub after_char_count: usize,
    /// Ordered list of edits that transforms the "before" buffer into the "after" buffer.
    pub edits: Vec<TextDeltaEdit>,
}

impl TextDelta {
    /// Build a delta holding a single edit applied to a buffer of `before_char_count` chars.
    pub fn single(before_char_count: usize, edit: TextDeltaEdit) -> Self {
        let after_char_count = (before_char_count + edit.inserted_len())
            .saturating_sub(edit.deleted_len());
        Self {
            before_char_count,
            after_char_count,
            edits: vec![edit],
        }
    }

    /// Returns `true` if this delta contains no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}
