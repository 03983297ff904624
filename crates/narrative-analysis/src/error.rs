//! Error taxonomy for backend calls.

use serde_json::Value;
use thiserror::Error;

/// Why an analyze or enhance call failed. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The service answered with a non-success status.
    #[error("{message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Server-provided explanation (see [`remote_error_message`]).
        message: String,
    },
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("could not reach the analysis service: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response did not have the expected shape.
    #[error("malformed response from the analysis service: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Pick the message for a failed call.
///
/// A JSON body with a non-empty `detail` wins (strings verbatim, anything else serialized back to
/// JSON). Otherwise the raw body is used, and an empty body falls back to `API error: <status>`.
pub fn remote_error_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        match fields.get("detail") {
            Some(Value::String(detail)) if !detail.is_empty() => return detail.clone(),
            Some(Value::Null | Value::Bool(false)) | Some(Value::String(_)) | None => {}
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => {}
            Some(detail) => return detail.to_string(),
        }
    }
    if body.is_empty() {
        format!("API error: {status}")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display_is_the_message() {
        let err = AnalysisError::Remote {
            status: 413,
            message: "Text exceeds maximum length".to_string(),
        };
        assert_eq!(err.to_string(), "Text exceeds maximum length");
    }

    #[test]
    fn test_falsy_detail_uses_body() {
        let body = r#"{"detail": null}"#;
        assert_eq!(remote_error_message(500, body), body);
    }

    #[test]
    fn test_zero_detail_uses_body() {
        let body = r#"{"detail": 0}"#;
        assert_eq!(remote_error_message(500, body), body);
        assert_eq!(remote_error_message(500, r#"{"detail": 7}"#), "7");
    }
}
