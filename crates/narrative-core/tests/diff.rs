use narrative_core::{BLANK_LINE_PLACEHOLDER, diff};

#[test]
fn test_single_changed_middle_line() {
    let view = diff::render("a\nb\nc", "a\nX\nc");
    assert_eq!(view.len(), 3);
    let changed: Vec<bool> = view.rows.iter().map(|row| row.changed).collect();
    assert_eq!(changed, vec![false, true, false]);
    assert_eq!(view.changed_count(), 1);
}

#[test]
fn test_candidate_longer() {
    let view = diff::render("a", "a\nb");
    assert_eq!(view.len(), 2);

    assert!(!view.rows[0].changed);
    assert_eq!(view.rows[0].original_text(), "a");
    assert_eq!(view.rows[0].candidate_text(), "a");

    assert!(view.rows[1].changed);
    assert_eq!(view.rows[1].original, None);
    assert_eq!(view.rows[1].original_text(), "");
    assert_eq!(view.rows[1].candidate_text(), "b");
}

#[test]
fn test_original_longer() {
    let view = diff::render("a\nb\nc", "a\nb");
    assert_eq!(view.len(), 3);
    assert!(view.rows[2].changed);
    assert_eq!(view.rows[2].candidate, None);
}

#[test]
fn test_inserted_line_misaligns_following_rows() {
    let view = diff::render("one\ntwo\nthree", "one\nNEW\ntwo\nthree");
    let changed: Vec<bool> = view.rows.iter().map(|row| row.changed).collect();
    assert_eq!(changed, vec![false, true, true, true]);
}

#[test]
fn test_missing_line_equals_blank_line() {
    // A trailing blank line on one side pairs with nothing on the other and compares equal.
    let view = diff::render("a\n", "a");
    assert_eq!(view.len(), 2);
    assert!(!view.rows[1].changed);
}

#[test]
fn test_blank_lines_are_preserved() {
    let view = diff::render("para one\n\npara two", "para one\n\npara 2");
    assert_eq!(view.len(), 3);
    assert_eq!(view.rows[1].original_display(), BLANK_LINE_PLACEHOLDER);
    assert_eq!(view.rows[1].candidate_display(), BLANK_LINE_PLACEHOLDER);
    assert!(!view.rows[1].changed);
    assert!(view.rows[2].changed);
}

#[test]
fn test_render_is_repeatable() {
    let first = diff::render("x\ny", "x\nz");
    let second = diff::render("x\ny", "x\nz");
    assert_eq!(first, second);
}
