//! Span set controller.
//!
//! [`SpanSet`] owns the current batch of suggestion spans and tracks which of them have been
//! resolved (accepted or rejected) and which one is open for inspection.
//!
//! Identity is the **index** in the batch as it was loaded: two spans with identical text are
//! different suggestions. Resolution is monotonic; a resolved index never shows up in
//! [`SpanSet::active`] again until a new batch is loaded.

use crate::search;
use crate::span::{Span, SpanCategory, SpanRange};
use std::collections::BTreeSet;

/// Number of active spans per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    /// Active grammar spans.
    pub grammar: usize,
    /// Active clarity spans.
    pub clarity: usize,
    /// Active style spans.
    pub style: usize,
    /// Active consistency spans.
    pub consistency: usize,
}

impl CategoryCounts {
    /// Count for a single category.
    pub fn get(&self, category: SpanCategory) -> usize {
        match category {
            SpanCategory::Grammar => self.grammar,
            SpanCategory::Clarity => self.clarity,
            SpanCategory::Style => self.style,
            SpanCategory::Consistency => self.consistency,
        }
    }

    fn bump(&mut self, category: SpanCategory) {
        match category {
            SpanCategory::Grammar => self.grammar += 1,
            SpanCategory::Clarity => self.clarity += 1,
            SpanCategory::Style => self.style += 1,
            SpanCategory::Consistency => self.consistency += 1,
        }
    }

    /// Sum over all categories.
    pub fn total(&self) -> usize {
        self.grammar + self.clarity + self.style + self.consistency
    }

    /// Categories with a non-zero count, in display order.
    pub fn non_zero(&self) -> impl Iterator<Item = (SpanCategory, usize)> + '_ {
        SpanCategory::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
            .filter(|(_, count)| *count > 0)
    }
}

/// Placement of an active span over the current buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayMark {
    /// Span index in the loaded batch.
    pub index: usize,
    /// Span category.
    pub category: SpanCategory,
    /// Where the span's original text currently sits (char offsets).
    pub range: SpanRange,
}

/// The ordered span batch plus resolution and selection state.
#[derive(Debug, Clone, Default)]
pub struct SpanSet {
    spans: Vec<Span>,
    resolved: BTreeSet<usize>,
    selected: Option<usize>,
}

impl SpanSet {
    /// Create an empty span set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire batch; clears resolution state and selection.
    pub fn load(&mut self, spans: Vec<Span>) {
        tracing::debug!(count = spans.len(), "loading suggestion batch");
        self.spans = spans;
        self.resolved.clear();
        self.selected = None;
    }

    /// Discard the batch.
    pub fn clear(&mut self) {
        self.load(Vec::new());
    }

    /// The whole loaded batch, including resolved spans.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Number of spans in the loaded batch.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` if no batch (or an empty batch) is loaded.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Get a span by index, resolved or not.
    pub fn get(&self, index: usize) -> Option<&Span> {
        self.spans.get(index)
    }

    /// Returns `true` if `index` has been accepted or rejected.
    pub fn is_resolved(&self, index: usize) -> bool {
        self.resolved.contains(&index)
    }

    /// Returns `true` if `index` names a loaded, unresolved span.
    pub fn is_active(&self, index: usize) -> bool {
        index < self.spans.len() && !self.is_resolved(index)
    }

    /// Number of resolved spans.
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    /// Active spans in batch order, paired with their index.
    pub fn active(&self) -> impl Iterator<Item = (usize, &Span)> + '_ {
        self.spans
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.resolved.contains(index))
    }

    /// Number of active spans.
    pub fn active_count(&self) -> usize {
        self.spans.len() - self.resolved.len()
    }

    /// Toggle the selection on `index`.
    ///
    /// Selecting the open span closes it. Selecting an index that is not active is a no-op.
    /// Returns `true` if the selection changed.
    pub fn select(&mut self, index: usize) -> bool {
        if !self.is_active(index) {
            return false;
        }
        self.selected = if self.selected == Some(index) {
            None
        } else {
            Some(index)
        };
        true
    }

    /// Close the detail view. Returns `true` if something was selected.
    pub fn clear_selection(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Index of the open span, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The open span, if any.
    pub fn selected_span(&self) -> Option<(usize, &Span)> {
        let index = self.selected?;
        self.spans.get(index).map(|span| (index, span))
    }

    /// Mark `index` resolved.
    ///
    /// Resolving twice (or an index outside the batch) leaves the state unchanged. Returns
    /// `true` only if the span was newly resolved.
    pub fn resolve(&mut self, index: usize) -> bool {
        if index >= self.spans.len() || !self.resolved.insert(index) {
            return false;
        }
        if self.selected == Some(index) {
            self.selected = None;
        }
        true
    }

    /// Active span counts per category.
    pub fn category_counts(&self) -> CategoryCounts {
        let mut counts = CategoryCounts::default();
        for (_, span) in self.active() {
            counts.bump(span.category);
        }
        counts
    }

    /// Place active spans over `buffer` by locating their original text.
    ///
    /// Spans whose text is no longer present are skipped.
    pub fn overlay(&self, buffer: &str) -> Vec<OverlayMark> {
        let mut marks: Vec<OverlayMark> = self
            .active()
            .filter_map(|(index, span)| {
                let found = search::find_first(buffer, &span.original_text)?;
                Some(OverlayMark {
                    index,
                    category: span.category,
                    range: SpanRange::new(found.start, found.end),
                })
            })
            .collect();
        marks.sort_by_key(|mark| (mark.range.start, mark.range.end, mark.index));
        marks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(category: SpanCategory, original: &str) -> Span {
        Span::new(SpanRange::new(0, 0), category, original, "x", "why")
    }

    #[test]
    fn test_select_toggles() {
        let mut set = SpanSet::new();
        set.load(vec![span(SpanCategory::Style, "a"), span(SpanCategory::Style, "b")]);

        assert!(set.select(1));
        assert_eq!(set.selected(), Some(1));
        assert!(set.select(1));
        assert_eq!(set.selected(), None);
        assert!(!set.select(7));
    }

    #[test]
    fn test_resolve_clears_selection() {
        let mut set = SpanSet::new();
        set.load(vec![span(SpanCategory::Grammar, "a"), span(SpanCategory::Style, "b")]);
        set.select(0);

        assert!(set.resolve(0));
        assert_eq!(set.selected(), None);
        assert!(!set.resolve(0));
        assert!(!set.resolve(99));
        assert_eq!(set.resolved_count(), 1);
        assert_eq!(set.active_count(), 1);
    }

    #[test]
    fn test_overlay_skips_missing_text() {
        let mut set = SpanSet::new();
        set.load(vec![
            span(SpanCategory::Clarity, "dog"),
            span(SpanCategory::Style, "missing"),
            span(SpanCategory::Grammar, "The"),
        ]);

        let marks = set.overlay("The lazy dog");
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].index, 2);
        assert_eq!(marks[0].range, SpanRange::new(0, 3));
        assert_eq!(marks[1].index, 0);
        assert_eq!(marks[1].range, SpanRange::new(9, 12));
    }

    #[test]
    fn test_counts_non_zero() {
        let mut set = SpanSet::new();
        set.load(vec![
            span(SpanCategory::Style, "a"),
            span(SpanCategory::Consistency, "b"),
            span(SpanCategory::Style, "c"),
        ]);
        let counts = set.category_counts();
        let non_zero: Vec<_> = counts.non_zero().collect();
        assert_eq!(
            non_zero,
            vec![(SpanCategory::Style, 2), (SpanCategory::Consistency, 1)]
        );
        assert_eq!(counts.total(), 3);
    }
}
