//! Service payloads -> `narrative-core` reports.
//!
//! Conversion is strict about anything that would corrupt editor state: a span range outside the
//! analyzed text or a score outside 0-100 rejects the whole payload as
//! [`AnalysisError::Malformed`]. Missing optional text falls back instead.

use crate::error::AnalysisError;
use crate::wire::{AnalyzeResponse, ConsistencyIssue, EditItem, EnhanceResponse};
use narrative_core::{
    AnalysisReport, EditLogEntry, EnhancementReport, Span, SpanCategory, SpanRange,
};

fn checked_score(score: i64) -> Result<u8, AnalysisError> {
    u8::try_from(score)
        .ok()
        .filter(|score| *score <= 100)
        .ok_or_else(|| AnalysisError::Malformed(format!("score {score} is outside 0-100")))
}

fn char_slice(text: &str, range: SpanRange) -> String {
    text.chars()
        .skip(range.start)
        .take(range.end - range.start)
        .collect()
}

/// Convert one reported issue into a span over `analyzed_text`.
///
/// - `type` maps through [`SpanCategory::from_tag`].
/// - A missing `original` is read from `analyzed_text[start..end)` (in characters).
/// - A missing `suggestion` falls back to the original text, so accepting it is a no-op edit.
pub fn issue_to_span(analyzed_text: &str, issue: &ConsistencyIssue) -> Result<Span, AnalysisError> {
    let range = SpanRange::new(issue.start, issue.end);
    range
        .check(analyzed_text.chars().count())
        .map_err(|err| AnalysisError::Malformed(err.to_string()))?;

    let original = issue
        .original
        .clone()
        .unwrap_or_else(|| char_slice(analyzed_text, range));
    let suggestion = issue
        .suggestion
        .clone()
        .unwrap_or_else(|| original.clone());

    Ok(Span::new(
        range,
        SpanCategory::from_tag(&issue.kind),
        original,
        suggestion,
        issue.message.clone(),
    ))
}

/// Convert an analyze response for `analyzed_text` into an [`AnalysisReport`].
pub fn analysis_report_from_response(
    analyzed_text: &str,
    response: AnalyzeResponse,
) -> Result<AnalysisReport, AnalysisError> {
    let overall_score = checked_score(response.overall_score)?;
    let spans = response
        .consistency_issues
        .iter()
        .map(|issue| issue_to_span(analyzed_text, issue))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnalysisReport {
        overall_score,
        spans,
        tense_consistent: response.tense_consistency,
        readability_score: response.readability_score.map(|score| score as f32),
    })
}

fn edit_log_entry(item: EditItem) -> EditLogEntry {
    EditLogEntry {
        operation: item.operation,
        original: item.original,
        modified: item.modified,
        reason: item.reason,
    }
}

/// Convert an enhance response into an [`EnhancementReport`].
pub fn enhancement_report_from_response(
    response: EnhanceResponse,
) -> Result<EnhancementReport, AnalysisError> {
    let overall_score = response.overall_score.map(checked_score).transpose()?;
    Ok(EnhancementReport {
        revised_text: response.enhanced_text,
        edit_log: response.edit_log.into_iter().map(edit_log_entry).collect(),
        overall_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert_eq!(checked_score(0).unwrap(), 0);
        assert_eq!(checked_score(100).unwrap(), 100);
        assert!(checked_score(101).is_err());
        assert!(checked_score(-1).is_err());
    }

    #[test]
    fn test_char_slice_counts_chars_not_bytes() {
        assert_eq!(char_slice("né été", SpanRange::new(3, 6)), "été");
    }
}
