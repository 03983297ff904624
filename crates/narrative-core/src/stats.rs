//! Document statistics shown in the toolbar.

use unicode_segmentation::UnicodeSegmentation;

/// Words read per minute when estimating reading time.
pub const WORDS_PER_MINUTE: usize = 200;

/// Summary counts for a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentStats {
    /// Whitespace-separated words.
    pub word_count: usize,
    /// User-perceived characters (grapheme clusters).
    pub grapheme_count: usize,
    /// Number of lines (N newlines => N+1 lines).
    pub line_count: usize,
    /// Estimated reading time in whole minutes, never below 1.
    pub reading_minutes: usize,
}

impl DocumentStats {
    /// Compute stats for `text`.
    pub fn from_text(text: &str) -> Self {
        let word_count = text.split_whitespace().count();
        Self {
            word_count,
            grapheme_count: text.graphemes(true).count(),
            line_count: text.split('\n').count(),
            reading_minutes: word_count.div_ceil(WORDS_PER_MINUTE).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let stats = DocumentStats::from_text("  The quick\tbrown\n\nfox 👨‍👩‍👧 ");
        assert_eq!(stats.word_count, 5);
        assert_eq!(stats.line_count, 3);
        assert_eq!(stats.reading_minutes, 1);
        assert_eq!(stats.grapheme_count, 25);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        let text = "word ".repeat(201);
        assert_eq!(DocumentStats::from_text(&text).reading_minutes, 2);
        assert_eq!(DocumentStats::from_text("").reading_minutes, 1);
        assert_eq!(DocumentStats::from_text("").word_count, 0);
    }
}
