use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// POST /api/v1/extract request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    /// Storage path of the document, e.g. "u1/123.pdf".  Defaults to empty
    /// when absent so the handler can reject it with a 400 rather than
    /// letting body deserialization fail.
    #[serde(rename = "filePath", default)]
    pub file_path: String,
}

/// POST /api/v1/extract response body.
///
/// `Text` carries both real extracted content and soft warnings — a warning
/// arrives as the diagnostic sentence behind a "⚠ " marker, in the same
/// `text` field.  Hard failures use the separate `error` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractResponse {
    Text { text: String },
    Error { error: String },
}

impl ExtractResponse {
    pub fn error(message: impl Into<String>) -> Self {
        ExtractResponse::Error { error: message.into() }
    }
}

impl From<Outcome> for ExtractResponse {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success { text } => ExtractResponse::Text { text },
            Outcome::Warning { text } => ExtractResponse::Text { text: format!("⚠ {text}") },
            Outcome::Failure { reason } => ExtractResponse::Error { error: reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{DOCX_EMPTY, PDF_FAILED};

    #[test]
    fn test_request_field_rename() {
        let req: ExtractRequest = serde_json::from_str(r#"{"filePath": "u1/123.pdf"}"#).unwrap();
        assert_eq!(req.file_path, "u1/123.pdf");
    }

    #[test]
    fn test_request_missing_field_defaults_empty() {
        let req: ExtractRequest = serde_json::from_str("{}").unwrap();
        assert!(req.file_path.is_empty());
    }

    #[test]
    fn test_success_serializes_to_text() {
        let resp = ExtractResponse::from(Outcome::success("Hello world"));
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"text":"Hello world"}"#);
    }

    #[test]
    fn test_warning_gets_marker_prefix() {
        let resp = ExtractResponse::from(Outcome::warning(DOCX_EMPTY));
        match resp {
            ExtractResponse::Text { text } => {
                assert_eq!(text, "⚠ DOCX contains no readable text.");
            }
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_serializes_to_error() {
        let resp = ExtractResponse::from(Outcome::failure(PDF_FAILED));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["error"], PDF_FAILED);
        assert!(json.get("text").is_none());
    }
}
