//! JSON payloads exchanged with the analysis service.
//!
//! Field names follow the service exactly. Optional fields default so that older or leaner
//! servers still parse; required fields missing from a payload are a deserialization error.

use narrative_core::EnhanceOptions;
use serde::{Deserialize, Serialize};

/// Body of `POST {base}/analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    /// Full document text.
    pub text: &'a str,
}

/// Body of `POST {base}/enhance`.
#[derive(Debug, Clone, Serialize)]
pub struct EnhanceRequest<'a> {
    /// Full document text.
    pub text: &'a str,
    /// Writing style name (`neutral`, `formal`, ...).
    pub style: &'static str,
    /// Rewrite level in the service vocabulary (`light`, `moderate`, `heavy`).
    pub enhancement_level: &'static str,
}

impl<'a> EnhanceRequest<'a> {
    /// Build a request for `text` with the given options.
    pub fn new(text: &'a str, options: EnhanceOptions) -> Self {
        Self {
            text,
            style: options.style.as_str(),
            enhancement_level: options.intensity.external_level(),
        }
    }
}

/// One issue reported by the analyze endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyIssue {
    /// Category tag (`grammar`, `tense`, `pronoun`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Start character offset in the analyzed text.
    pub start: usize,
    /// End character offset (exclusive).
    pub end: usize,
    /// Explanation shown to the user.
    pub message: String,
    /// The text the issue refers to.
    #[serde(default)]
    pub original: Option<String>,
    /// Proposed replacement.
    #[serde(default)]
    pub suggestion: Option<String>,
}

/// Response of the analyze endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Overall quality score (expected 0-100).
    pub overall_score: i64,
    /// Reported issues, in service order.
    #[serde(default)]
    pub consistency_issues: Vec<ConsistencyIssue>,
    /// Whether tense is consistent, if checked.
    #[serde(default)]
    pub tense_consistency: Option<bool>,
    /// Readability score, if computed.
    #[serde(default)]
    pub readability_score: Option<f64>,
}

/// One entry of the enhancement edit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditItem {
    /// Operation tag.
    pub operation: String,
    /// Original fragment.
    #[serde(default)]
    pub original: String,
    /// Modified fragment.
    #[serde(default)]
    pub modified: String,
    /// Reason for the edit.
    #[serde(default)]
    pub reason: String,
}

/// Response of the enhance endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhanceResponse {
    /// The revised document.
    pub enhanced_text: String,
    /// Ordered edit log.
    #[serde(default)]
    pub edit_log: Vec<EditItem>,
    /// Score of the revised text, if computed.
    #[serde(default)]
    pub overall_score: Option<i64>,
}
