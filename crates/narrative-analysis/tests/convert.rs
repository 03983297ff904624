use narrative_analysis::{
    AnalysisError, AnalyzeResponse, ConsistencyIssue, EnhanceRequest, EnhanceResponse,
    analysis_report_from_response, enhancement_report_from_response, issue_to_span,
    remote_error_message,
};
use narrative_core::{EnhanceOptions, EnhancementIntensity, SpanCategory, WritingStyle};
use serde_json::json;

const TEXT: &str = "She walks to school. He was tired. They run.";

fn analyze_payload() -> serde_json::Value {
    json!({
        "overall_score": 72,
        "consistency_issues": [
            {
                "type": "tense",
                "start": 4,
                "end": 9,
                "message": "Mixed tense",
                "original": "walks",
                "suggestion": "walked"
            },
            {
                "type": "pronoun",
                "start": 21,
                "end": 23,
                "message": "Ambiguous pronoun"
            },
            {
                "type": "dialogue",
                "start": 40,
                "end": 43,
                "message": "Unusual tag",
                "suggestion": "ran"
            }
        ],
        "tense_consistency": false,
        "readability_score": 81.5
    })
}

#[test]
fn test_analyze_payload_to_report() {
    let response: AnalyzeResponse = serde_json::from_value(analyze_payload()).unwrap();
    let report = analysis_report_from_response(TEXT, response).unwrap();

    assert_eq!(report.overall_score, 72);
    assert_eq!(report.tense_consistent, Some(false));
    assert_eq!(report.readability_score, Some(81.5));
    assert_eq!(report.spans.len(), 3);

    let tense = &report.spans[0];
    assert_eq!(tense.category, SpanCategory::Grammar);
    assert_eq!(tense.original_text, "walks");
    assert_eq!(tense.suggestion_text, "walked");
    assert_eq!(tense.rationale, "Mixed tense");

    // No original or suggestion: both come from the analyzed text.
    let pronoun = &report.spans[1];
    assert_eq!(pronoun.category, SpanCategory::Consistency);
    assert_eq!(pronoun.original_text, "He");
    assert_eq!(pronoun.suggestion_text, "He");

    // Unknown tag lands in the default category.
    let other = &report.spans[2];
    assert_eq!(other.category, SpanCategory::Consistency);
    assert_eq!(other.original_text, "run");
    assert_eq!(other.suggestion_text, "ran");
}

#[test]
fn test_optional_fields_default() {
    let response: AnalyzeResponse = serde_json::from_value(json!({ "overall_score": 90 })).unwrap();
    let report = analysis_report_from_response(TEXT, response).unwrap();
    assert!(report.spans.is_empty());
    assert_eq!(report.tense_consistent, None);
    assert_eq!(report.readability_score, None);
}

#[test]
fn test_out_of_bounds_range_is_malformed() {
    let issue = ConsistencyIssue {
        kind: "style".to_string(),
        start: 40,
        end: 400,
        message: "Too far".to_string(),
        original: None,
        suggestion: None,
    };
    let err = issue_to_span(TEXT, &issue).unwrap_err();
    assert!(matches!(err, AnalysisError::Malformed(_)));
}

#[test]
fn test_score_out_of_range_is_malformed() {
    let response: AnalyzeResponse =
        serde_json::from_value(json!({ "overall_score": 140, "consistency_issues": [] })).unwrap();
    assert!(matches!(
        analysis_report_from_response(TEXT, response),
        Err(AnalysisError::Malformed(_))
    ));

    let response: EnhanceResponse = serde_json::from_value(json!({
        "enhanced_text": "x",
        "edit_log": [],
        "overall_score": -3
    }))
    .unwrap();
    assert!(matches!(
        enhancement_report_from_response(response),
        Err(AnalysisError::Malformed(_))
    ));
}

#[test]
fn test_wrong_shape_fails_to_parse() {
    let missing_score = serde_json::from_value::<AnalyzeResponse>(json!({
        "consistency_issues": []
    }));
    assert!(missing_score.is_err());

    let negative_offset = serde_json::from_value::<AnalyzeResponse>(json!({
        "overall_score": 50,
        "consistency_issues": [{ "type": "style", "start": -1, "end": 2, "message": "" }]
    }));
    assert!(negative_offset.is_err());

    let err: AnalysisError = serde_json::from_str::<EnhanceResponse>("{}")
        .unwrap_err()
        .into();
    assert!(err.to_string().starts_with("malformed response"));
}

#[test]
fn test_enhance_payload_to_report() {
    let response: EnhanceResponse = serde_json::from_value(json!({
        "enhanced_text": "She walked to school.",
        "edit_log": [
            { "operation": "REPLACE", "original": "walks", "modified": "walked", "reason": "Tense" },
            { "operation": "INSERT", "original": "", "modified": "quietly", "reason": "Rhythm" }
        ],
        "overall_score": null
    }))
    .unwrap();

    let report = enhancement_report_from_response(response).unwrap();
    assert_eq!(report.revised_text, "She walked to school.");
    assert_eq!(report.overall_score, None);
    assert_eq!(report.edit_log.len(), 2);
    assert_eq!(report.edit_log[1].operation, "INSERT");
    assert_eq!(report.edit_log[1].modified, "quietly");
}

#[test]
fn test_enhance_request_uses_service_vocabulary() {
    let request = EnhanceRequest::new(
        "text",
        EnhanceOptions {
            style: WritingStyle::Academic,
            intensity: EnhancementIntensity::Conservative,
        },
    );
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({ "text": "text", "style": "academic", "enhancement_level": "light" })
    );
}

#[test]
fn test_remote_error_message_prefers_detail() {
    assert_eq!(
        remote_error_message(400, r#"{"detail": "Text exceeds maximum length"}"#),
        "Text exceeds maximum length"
    );

    let structured = remote_error_message(422, r#"{"detail": [{"loc": ["body", "text"]}]}"#);
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&structured).unwrap(),
        json!([{ "loc": ["body", "text"] }])
    );

    assert_eq!(remote_error_message(502, "Bad Gateway"), "Bad Gateway");
    assert_eq!(remote_error_message(503, ""), "API error: 503");
}
