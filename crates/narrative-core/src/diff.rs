//! Line-level diff rendering.
//!
//! [`render`] pairs the lines of two buffers **by position**: row `i` holds line `i` of each
//! side. There is no sequence alignment, so inserting or removing a whole line shifts every
//! later row and flags it as changed. A row is changed when its two sides are not exactly equal,
//! where a missing line compares as the empty string.
//!
//! Rendering is a pure projection over two borrowed strings and keeps no state.

use crate::text::{split_lines, strip_cr};
use std::borrow::Cow;
use unicode_width::UnicodeWidthChar;

/// Placeholder shown for blank (or missing) lines so they keep their height.
pub const BLANK_LINE_PLACEHOLDER: &str = "\u{00A0}";

/// One row of a two-column diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow {
    /// Line from the original buffer, `None` past its end.
    pub original: Option<String>,
    /// Line from the candidate buffer, `None` past its end.
    pub candidate: Option<String>,
    /// Whether the two sides differ.
    pub changed: bool,
}

impl DiffRow {
    /// Original side, with a missing line read as `""`.
    pub fn original_text(&self) -> &str {
        self.original.as_deref().unwrap_or("")
    }

    /// Candidate side, with a missing line read as `""`.
    pub fn candidate_text(&self) -> &str {
        self.candidate.as_deref().unwrap_or("")
    }

    /// Original side as displayed: a trailing `'\r'` is hidden and blank lines become
    /// [`BLANK_LINE_PLACEHOLDER`].
    pub fn original_display(&self) -> &str {
        display(self.original_text())
    }

    /// Candidate side as displayed, same rules as [`DiffRow::original_display`].
    pub fn candidate_display(&self) -> &str {
        display(self.candidate_text())
    }
}

fn display(line: &str) -> &str {
    let line = strip_cr(line);
    if line.is_empty() {
        BLANK_LINE_PLACEHOLDER
    } else {
        line
    }
}

/// A rendered diff: `max(original_lines, candidate_lines)` rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffView {
    /// Rows in line order.
    pub rows: Vec<DiffRow>,
}

impl DiffView {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows flagged as changed.
    pub fn changed_count(&self) -> usize {
        self.rows.iter().filter(|row| row.changed).count()
    }

    /// Returns `true` if no row is flagged as changed.
    pub fn is_identical(&self) -> bool {
        self.changed_count() == 0
    }
}

/// Pair `original` and `candidate` line by line.
pub fn render(original: &str, candidate: &str) -> DiffView {
    let original_lines = split_lines(original);
    let candidate_lines = split_lines(candidate);
    let row_count = original_lines.len().max(candidate_lines.len());

    let rows = (0..row_count)
        .map(|i| {
            let left = original_lines.get(i).copied();
            let right = candidate_lines.get(i).copied();
            DiffRow {
                changed: left.unwrap_or("") != right.unwrap_or(""),
                original: left.map(str::to_string),
                candidate: right.map(str::to_string),
            }
        })
        .collect();

    DiffView { rows }
}

/// Truncate or pad `text` to exactly `width` terminal cells.
fn fit_to_width(text: &str, width: usize) -> Cow<'_, str> {
    let mut used = 0usize;
    let mut end = text.len();
    for (byte, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            end = byte;
            break;
        }
        used += w;
    }

    if end == text.len() && used == width {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(end + width.saturating_sub(used));
    out.push_str(&text[..end]);
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    Cow::Owned(out)
}

/// Format a diff as plain side-by-side text with fixed-width columns.
///
/// Changed rows are prefixed with `~`. Column widths are measured in terminal cells, so wide
/// (CJK) characters line up.
pub fn format_side_by_side(view: &DiffView, column_width: usize) -> String {
    let mut out = String::new();
    out.push_str("  ");
    out.push_str(&fit_to_width("Original", column_width));
    out.push_str(" | ");
    out.push_str(&fit_to_width("Enhanced", column_width));
    out.push('\n');

    for row in &view.rows {
        out.push_str(if row.changed { "~ " } else { "  " });
        out.push_str(&fit_to_width(row.original_display(), column_width));
        out.push_str(" | ");
        out.push_str(fit_to_width(row.candidate_display(), column_width).trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_to_width_wide_chars() {
        assert_eq!(fit_to_width("你好世界", 5), "你好 ");
        assert_eq!(fit_to_width("ab", 4), "ab  ");
        assert_eq!(fit_to_width("abcd", 4), "abcd");
    }

    #[test]
    fn test_crlf_line_differs_from_lf_line() {
        let view = render("a\r\nb", "a\nb");
        assert_eq!(view.len(), 2);
        assert!(view.rows[0].changed);
        assert!(!view.rows[1].changed);
        assert_eq!(view.rows[0].original.as_deref(), Some("a\r"));
        // The carriage return is hidden when displayed.
        assert_eq!(view.rows[0].original_display(), "a");
    }

    #[test]
    fn test_empty_buffers() {
        let view = render("", "");
        assert_eq!(view.len(), 1);
        assert!(!view.rows[0].changed);
        assert_eq!(view.rows[0].original_display(), BLANK_LINE_PLACEHOLDER);
    }

    #[test]
    fn test_format_side_by_side_marks_changes() {
        let view = render("same\nold", "same\nnew");
        let out = format_side_by_side(&view, 6);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "  Origin | Enhanc");
        assert_eq!(lines[1], "  same   | same");
        assert_eq!(lines[2], "~ old    | new");
    }
}
