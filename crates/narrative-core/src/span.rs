//! Suggestion span data model.
//!
//! A [`Span`] is one suggested edit produced by an external analysis pass. Spans are anchored to
//! character offsets of the buffer **as it was when the analysis ran**. After edits those
//! offsets are informational only: the mutator and overlay placement locate a span by its
//! `original_text` instead (see [`crate::mutator`]).

use thiserror::Error;

/// The fixed set of suggestion categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpanCategory {
    /// Grammar and tense problems.
    Grammar,
    /// Wording that could be clearer.
    Clarity,
    /// Stylistic improvements.
    Style,
    /// Consistency issues (pronouns, character names, vocabulary, ...).
    Consistency,
}

impl SpanCategory {
    /// All categories, in display order.
    pub const ALL: [Self; 4] = [Self::Grammar, Self::Clarity, Self::Style, Self::Consistency];

    /// Map an external analysis tag into a category.
    ///
    /// Unknown tags fall back to [`SpanCategory::Consistency`] so new upstream tags never get
    /// rejected.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "grammar" | "tense" => Self::Grammar,
            "clarity" => Self::Clarity,
            "style" => Self::Style,
            _ => Self::Consistency,
        }
    }

    /// Lowercase machine name (`"grammar"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grammar => "grammar",
            Self::Clarity => "clarity",
            Self::Style => "style",
            Self::Consistency => "consistency",
        }
    }

    /// Human-readable label (`"Grammar"`, ...).
    pub fn label(self) -> &'static str {
        match self {
            Self::Grammar => "Grammar",
            Self::Clarity => "Clarity",
            Self::Style => "Style",
            Self::Consistency => "Consistency",
        }
    }
}

impl std::fmt::Display for SpanCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A half-open character-offset range (`start..end`) in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpanRange {
    /// Range start offset (inclusive), in Unicode scalar values (`char`).
    pub start: usize,
    /// Range end offset (exclusive), in Unicode scalar values (`char`).
    pub end: usize,
}

impl SpanRange {
    /// Create a new span range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the range in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check `start <= end <= char_len`.
    pub fn check(&self, char_len: usize) -> Result<(), SpanError> {
        if self.start > self.end || self.end > char_len {
            return Err(SpanError::RangeOutOfBounds {
                start: self.start,
                end: self.end,
                len: char_len,
            });
        }
        Ok(())
    }
}

/// Errors produced while building spans.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanError {
    /// The range does not fit the buffer it was produced for.
    #[error("span range {start}..{end} is out of bounds for a buffer of {len} characters")]
    RangeOutOfBounds {
        /// Range start.
        start: usize,
        /// Range end.
        end: usize,
        /// Buffer length in characters.
        len: usize,
    },
}

/// A single suggested edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Range in the buffer the analysis ran on.
    pub range: SpanRange,
    /// Suggestion category.
    pub category: SpanCategory,
    /// The exact text this span refers to.
    pub original_text: String,
    /// Proposed replacement. Empty means "delete".
    pub suggestion_text: String,
    /// Why the change is suggested.
    pub rationale: String,
}

impl Span {
    /// Create a span without validating its range.
    pub fn new(
        range: SpanRange,
        category: SpanCategory,
        original_text: impl Into<String>,
        suggestion_text: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            range,
            category,
            original_text: original_text.into(),
            suggestion_text: suggestion_text.into(),
            rationale: rationale.into(),
        }
    }

    /// Create a span, checking its range against the buffer it was produced for.
    pub fn checked(
        buffer: &str,
        range: SpanRange,
        category: SpanCategory,
        original_text: impl Into<String>,
        suggestion_text: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Result<Self, SpanError> {
        range.check(buffer.chars().count())?;
        Ok(Self::new(
            range,
            category,
            original_text,
            suggestion_text,
            rationale,
        ))
    }

    /// Returns `true` if accepting this span deletes its text.
    pub fn is_deletion(&self) -> bool {
        self.suggestion_text.is_empty()
    }

    /// Change in buffer length (in chars) when this span is accepted and found.
    pub fn length_delta(&self) -> isize {
        self.suggestion_text.chars().count() as isize - self.original_text.chars().count() as isize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tags() {
        assert_eq!(SpanCategory::from_tag("grammar"), SpanCategory::Grammar);
        assert_eq!(SpanCategory::from_tag("Tense"), SpanCategory::Grammar);
        assert_eq!(SpanCategory::from_tag("clarity"), SpanCategory::Clarity);
        assert_eq!(SpanCategory::from_tag("style"), SpanCategory::Style);
        assert_eq!(SpanCategory::from_tag("pronoun"), SpanCategory::Consistency);
        assert_eq!(SpanCategory::from_tag("character"), SpanCategory::Consistency);
        assert_eq!(SpanCategory::from_tag("repetition"), SpanCategory::Consistency);
        assert_eq!(SpanCategory::from_tag(""), SpanCategory::Consistency);
    }

    #[test]
    fn test_checked_range() {
        let text = "a👋b";
        assert!(
            Span::checked(text, SpanRange::new(1, 3), SpanCategory::Style, "👋b", "x", "").is_ok()
        );
        assert_eq!(
            Span::checked(text, SpanRange::new(2, 4), SpanCategory::Style, "", "", ""),
            Err(SpanError::RangeOutOfBounds {
                start: 2,
                end: 4,
                len: 3
            })
        );
        assert!(
            Span::checked(text, SpanRange::new(2, 1), SpanCategory::Style, "", "", "").is_err()
        );
    }

    #[test]
    fn test_length_delta() {
        let span = Span::new(SpanRange::new(0, 3), SpanCategory::Clarity, "abc", "", "drop");
        assert!(span.is_deletion());
        assert_eq!(span.length_delta(), -3);
    }
}
