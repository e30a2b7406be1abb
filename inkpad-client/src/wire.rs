//! JSON bodies exchanged with the recognition service.

use inkpad_core::{Confidence, RecognitionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /process-ocr`.
#[derive(Debug, Clone, Serialize)]
pub struct RecognitionRequest<'a> {
    /// PNG data URL of the drawing.
    pub image: &'a str,
    /// Session user id.
    pub user_id: &'a str,
}

/// Suggestions block of a recognition response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefinedData {
    /// Ordered alternatives.
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Confidence label, normally `"low"`, `"medium"` or `"high"`.
    #[serde(default)]
    pub confidence: Option<Value>,
}

/// Body returned by `POST /process-ocr`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecognitionResponse {
    /// Whether recognition succeeded.
    #[serde(default)]
    pub success: bool,
    /// Recognized text.
    #[serde(default)]
    pub original_text: Option<String>,
    /// Older name for the recognized text.
    #[serde(default)]
    pub text: Option<String>,
    /// Service fingerprint of the submitted image.
    #[serde(default)]
    pub image_hash: Option<String>,
    /// Suggestions and confidence.
    #[serde(default)]
    pub refined_data: Option<RefinedData>,
    /// Failure description when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

impl RecognitionResponse {
    /// Convert a successful response into a [`RecognitionResult`].
    ///
    /// # Errors
    ///
    /// Returns the service's error text (or a generic one) when `success` is false.
    pub fn into_result(self) -> Result<RecognitionResult, String> {
        if !self.success {
            return Err(self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| "service reported failure".to_string()));
        }

        let raw_text = self
            .original_text
            .filter(|t| !t.is_empty())
            .or(self.text)
            .unwrap_or_default();
        let refined = self.refined_data.unwrap_or_default();
        let confidence = refined.confidence.as_ref().and_then(parse_confidence);

        Ok(RecognitionResult {
            raw_text,
            suggestions: refined.suggestions,
            confidence,
            image_fingerprint: self.image_hash.unwrap_or_default(),
        })
    }
}

fn parse_confidence(value: &Value) -> Option<Confidence> {
    let parsed = value.as_str().and_then(|s| s.parse().ok());
    if parsed.is_none() && !value.is_null() {
        tracing::warn!(confidence = %value, "Ignoring unknown confidence value");
    }
    parsed
}

/// Body returned by `POST /submit-feedback`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackResponse {
    /// Whether the correction was stored.
    #[serde(default)]
    pub success: bool,
    /// Failure description when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> RecognitionResponse {
        serde_json::from_value(value).expect("response")
    }

    #[test]
    fn test_full_response() {
        let result = parse(json!({
            "success": true,
            "original_text": "Hi",
            "image_hash": "abc123",
            "refined_data": { "suggestions": ["Hi", "Hello"], "confidence": "high" }
        }))
        .into_result()
        .expect("success");

        assert_eq!(result.raw_text, "Hi");
        assert_eq!(result.suggestions, vec!["Hi", "Hello"]);
        assert_eq!(result.confidence, Some(Confidence::High));
        assert_eq!(result.image_fingerprint, "abc123");
    }

    #[test]
    fn test_text_fallback_when_original_missing_or_empty() {
        let result = parse(json!({ "success": true, "text": "legacy" }))
            .into_result()
            .expect("success");
        assert_eq!(result.raw_text, "legacy");

        let result = parse(json!({ "success": true, "original_text": "", "text": "legacy" }))
            .into_result()
            .expect("success");
        assert_eq!(result.raw_text, "legacy");
    }

    #[test]
    fn test_missing_refined_data() {
        let result = parse(json!({ "success": true, "original_text": "x" }))
            .into_result()
            .expect("success");
        assert!(result.suggestions.is_empty());
        assert_eq!(result.confidence, None);
        assert_eq!(result.image_fingerprint, "");
    }

    #[test]
    fn test_unknown_confidence_is_absent() {
        let result = parse(json!({
            "success": true,
            "refined_data": { "suggestions": [], "confidence": "certain" }
        }))
        .into_result()
        .expect("success");
        assert_eq!(result.confidence, None);

        let result = parse(json!({
            "success": true,
            "refined_data": { "confidence": 0.9 }
        }))
        .into_result()
        .expect("success");
        assert_eq!(result.confidence, None);
    }

    #[test]
    fn test_failure_carries_error_field() {
        let err = parse(json!({ "success": false, "error": "blank image" }))
            .into_result()
            .expect_err("failure");
        assert_eq!(err, "blank image");

        let err = parse(json!({ "success": false }))
            .into_result()
            .expect_err("failure");
        assert_eq!(err, "service reported failure");
    }

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(RecognitionRequest {
            image: "data:image/png;base64,AAAA",
            user_id: "anonymous",
        })
        .expect("serialize");
        assert_eq!(
            body,
            json!({ "image": "data:image/png;base64,AAAA", "user_id": "anonymous" })
        );
    }
}
