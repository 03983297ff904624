use narrative_core::{Span, SpanCategory, SpanRange, SpanSet};

fn batch() -> Vec<Span> {
    vec![
        Span::new(SpanRange::new(0, 3), SpanCategory::Grammar, "She", "He", "pronoun"),
        Span::new(SpanRange::new(4, 9), SpanCategory::Style, "walks", "strides", "verb"),
        Span::new(SpanRange::new(4, 9), SpanCategory::Style, "walks", "strides", "verb"),
    ]
}

#[test]
fn test_active_after_load_is_full_batch_in_order() {
    let mut set = SpanSet::new();
    set.load(batch());

    let active: Vec<(usize, &Span)> = set.active().collect();
    assert_eq!(active.len(), 3);
    for (i, (index, span)) in active.iter().enumerate() {
        assert_eq!(*index, i);
        assert_eq!(*span, &batch()[i]);
    }
}

#[test]
fn test_identical_spans_are_distinct() {
    let mut set = SpanSet::new();
    set.load(batch());

    set.resolve(1);
    let indices: Vec<usize> = set.active().map(|(index, _)| index).collect();
    assert_eq!(indices, vec![0, 2]);
}

#[test]
fn test_resolve_is_idempotent() {
    let mut set = SpanSet::new();
    set.load(batch());

    assert!(set.resolve(2));
    assert!(!set.resolve(2));
    assert_eq!(set.resolved_count(), 1);
    assert!(set.is_resolved(2));
    assert_eq!(set.active().count(), 2);
}

#[test]
fn test_selecting_resolved_span_is_noop() {
    let mut set = SpanSet::new();
    set.load(batch());

    set.select(1);
    set.resolve(0);
    assert!(!set.select(0));
    assert_eq!(set.selected(), Some(1));

    set.clear_selection();
    assert!(!set.select(0));
    assert_eq!(set.selected(), None);
}

#[test]
fn test_load_clears_resolution_and_selection() {
    let mut set = SpanSet::new();
    set.load(batch());
    set.resolve(0);
    set.select(1);

    set.load(batch());
    assert_eq!(set.resolved_count(), 0);
    assert_eq!(set.selected(), None);
    assert_eq!(set.active().count(), 3);

    set.load(Vec::new());
    set.load(Vec::new());
    assert!(set.is_empty());
    assert_eq!(set.active().count(), 0);
    assert_eq!(set.category_counts().total(), 0);
}

#[test]
fn test_category_counts_track_active_spans() {
    let mut set = SpanSet::new();
    set.load(batch());

    let counts = set.category_counts();
    assert_eq!(counts.get(SpanCategory::Grammar), 1);
    assert_eq!(counts.get(SpanCategory::Style), 2);

    set.resolve(1);
    let counts = set.category_counts();
    assert_eq!(counts.get(SpanCategory::Style), 1);
    assert_eq!(counts.total(), set.active().count());
}
