//! Accept/reject protocol.
//!
//! Accepting a span locates its `original_text` in the **current** buffer with a
//! first-occurrence search and replaces that occurrence with `suggestion_text`. The stored span
//! offsets are not used: they drift after earlier accepts and after direct user edits.
//!
//! When the text cannot be found the buffer is returned unchanged and the span is still
//! resolved. That is a normal outcome, not an error.

use crate::delta::TextDeltaEdit;
use crate::search;
use crate::span::Span;
use crate::span_set::SpanSet;

/// Result of accepting a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptance {
    /// The new buffer (equal to the input on a lookup miss).
    pub text: String,
    /// The applied edit, or `None` on a lookup miss.
    pub edit: Option<TextDeltaEdit>,
}

impl Acceptance {
    /// Returns `true` if the buffer changed.
    pub fn applied(&self) -> bool {
        self.edit.is_some()
    }
}

/// Replace the first occurrence of `span.original_text` in `buffer` with its suggestion.
///
/// Pure: does not touch any resolution state.
pub fn apply_suggestion(buffer: &str, span: &Span) -> Acceptance {
    let Some(found) = search::find_first(buffer, &span.original_text) else {
        tracing::debug!(
            original = %span.original_text,
            "suggestion text not found in buffer; leaving buffer unchanged"
        );
        return Acceptance {
            text: buffer.to_string(),
            edit: None,
        };
    };

    let mut text = String::with_capacity(
        buffer.len() - span.original_text.len() + span.suggestion_text.len(),
    );
    text.push_str(&buffer[..found.bytes.start]);
    text.push_str(&span.suggestion_text);
    text.push_str(&buffer[found.bytes.end..]);

    Acceptance {
        text,
        edit: Some(TextDeltaEdit {
            start: found.start,
            deleted_text: span.original_text.clone(),
            inserted_text: span.suggestion_text.clone(),
        }),
    }
}

/// Accept the span at `index`: compute the new buffer and resolve the span.
///
/// Returns `None` (and changes nothing) if `index` is not an active span.
pub fn accept(buffer: &str, spans: &mut SpanSet, index: usize) -> Option<Acceptance> {
    if !spans.is_active(index) {
        return None;
    }
    let acceptance = apply_suggestion(buffer, spans.get(index)?);
    spans.resolve(index);
    Some(acceptance)
}

/// Reject the span at `index`. The buffer is never touched.
///
/// Returns `true` if the span was newly resolved.
pub fn reject(spans: &mut SpanSet, index: usize) -> bool {
    spans.resolve(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{SpanCategory, SpanRange};

    fn span(original: &str, suggestion: &str) -> Span {
        Span::new(
            SpanRange::new(0, original.chars().count()),
            SpanCategory::Style,
            original,
            suggestion,
            "",
        )
    }

    #[test]
    fn test_apply_suggestion_multibyte() {
        let acceptance = apply_suggestion("héllo wörld", &span("wörld", "world"));
        assert_eq!(acceptance.text, "héllo world");
        let edit = acceptance.edit.unwrap();
        assert_eq!(edit.start, 6);
        assert_eq!(edit.end(), 11);
    }

    #[test]
    fn test_deletion() {
        let acceptance = apply_suggestion("in order to win", &span("in order ", ""));
        assert_eq!(acceptance.text, "to win");
        assert!(acceptance.applied());
    }

    #[test]
    fn test_empty_original_is_a_miss() {
        let acceptance = apply_suggestion("abc", &span("", "X"));
        assert_eq!(acceptance.text, "abc");
        assert!(!acceptance.applied());
    }

    #[test]
    fn test_accept_inactive_index_is_noop() {
        let mut set = SpanSet::new();
        set.load(vec![span("a", "b")]);
        assert!(reject(&mut set, 0));
        assert_eq!(accept("a", &mut set, 0), None);
        assert_eq!(accept("a", &mut set, 3), None);
    }
}
