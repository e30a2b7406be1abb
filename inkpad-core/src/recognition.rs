//! Recognition results, candidates and correction requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// User id sent when the session has none.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Confidence reported by the refinement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Low confidence.
    Low,
    /// Medium confidence.
    Medium,
    /// High confidence.
    High,
}

impl Confidence {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown confidence: {other}")),
        }
    }
}

/// Identity the recognition backend personalizes against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Build a user id; blank input becomes [`ANONYMOUS_USER`].
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        if id.trim().is_empty() {
            Self(ANONYMOUS_USER.to_string())
        } else {
            Self(id)
        }
    }

    /// The id as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self(ANONYMOUS_USER.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one successful recognition call. Immutable; the next call
/// replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Text as read by the recognizer.
    pub raw_text: String,
    /// Refined alternatives, best first.
    pub suggestions: Vec<String>,
    /// Refinement confidence, when the service reported one.
    pub confidence: Option<Confidence>,
    /// Service-side fingerprint of the submitted image.
    pub image_fingerprint: String,
}

/// One of the texts the user can pick from a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "lowercase")]
pub enum Candidate {
    /// The raw recognized text.
    Raw,
    /// A suggestion by position.
    Suggestion(usize),
}

impl RecognitionResult {
    /// Text selected when the result arrives: the raw text if it has any
    /// non-whitespace content, else the first suggestion, else nothing.
    #[must_use]
    pub fn initial_selection(&self) -> Option<&str> {
        if !self.raw_text.trim().is_empty() {
            return Some(&self.raw_text);
        }
        self.suggestions.first().map(String::as_str)
    }

    /// Text of a candidate, if it exists.
    #[must_use]
    pub fn candidate(&self, candidate: Candidate) -> Option<&str> {
        match candidate {
            Candidate::Raw => Some(&self.raw_text),
            Candidate::Suggestion(index) => self.suggestions.get(index).map(String::as_str),
        }
    }
}

/// Body of a feedback submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRequest {
    /// Text that was selected before the correction.
    pub original_text: String,
    /// Trimmed corrected text.
    pub corrected_text: String,
    /// Submitting user.
    pub user_id: UserId,
    /// Fingerprint of the image the original text came from.
    pub image_hash: String,
    /// Confidence of the result being corrected.
    pub confidence_score: Option<Confidence>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(raw: &str, suggestions: &[&str]) -> RecognitionResult {
        RecognitionResult {
            raw_text: raw.to_string(),
            suggestions: suggestions.iter().map(ToString::to_string).collect(),
            confidence: Some(Confidence::High),
            image_fingerprint: "abc".to_string(),
        }
    }

    #[test]
    fn initial_selection_prefers_raw_text() {
        assert_eq!(result("Hi", &["Hello"]).initial_selection(), Some("Hi"));
    }

    #[test]
    fn initial_selection_falls_back_to_first_suggestion() {
        assert_eq!(
            result("   ", &["Hello", "Help"]).initial_selection(),
            Some("Hello")
        );
        assert_eq!(result("", &[]).initial_selection(), None);
    }

    #[test]
    fn candidate_lookup() {
        let r = result("Hi", &["Hi", "Hello"]);
        assert_eq!(r.candidate(Candidate::Raw), Some("Hi"));
        assert_eq!(r.candidate(Candidate::Suggestion(1)), Some("Hello"));
        assert_eq!(r.candidate(Candidate::Suggestion(2)), None);
    }

    #[test]
    fn blank_user_id_is_anonymous() {
        assert_eq!(UserId::new("  ").as_str(), ANONYMOUS_USER);
        assert_eq!(UserId::new("ada").as_str(), "ada");
        assert_eq!(UserId::default().as_str(), ANONYMOUS_USER);
    }

    #[test]
    fn confidence_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Confidence>(), Ok(Confidence::High));
        assert_eq!(" medium ".parse::<Confidence>(), Ok(Confidence::Medium));
        assert!("certain".parse::<Confidence>().is_err());
    }

    #[test]
    fn correction_request_uses_wire_field_names() {
        let request = CorrectionRequest {
            original_text: "Hello".to_string(),
            corrected_text: "Hello!".to_string(),
            user_id: UserId::new("ada"),
            image_hash: "abc".to_string(),
            confidence_score: Some(Confidence::High),
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "original_text": "Hello",
                "corrected_text": "Hello!",
                "user_id": "ada",
                "image_hash": "abc",
                "confidence_score": "high"
            })
        );
    }
}
