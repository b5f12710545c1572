//! Feedback types returned by the analysis endpoint.
//!
//! Field names mirror the endpoint's JSON exactly (camelCase on the wire).
//! Numeric fields are passed through as received; only the renderer clamps
//! them for display.

use serde::{Deserialize, Serialize};

/// Confidence metrics for a spoken answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceScore {
    /// Confidence score, nominally 0-10
    pub score: f64,
    /// Number of hesitation words detected
    pub hesitation_words: u32,
    /// The detected hesitation tokens, in order of appearance
    pub hesitation_details: Vec<String>,
    /// Clarity score, nominally 0-10
    pub clarity: f64,
}

/// STAR-method breakdown of the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarAnalysis {
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
}

/// Full feedback for one analyzed answer.
///
/// Immutable once received: the workflow replaces it wholesale on a new
/// analysis and clears it when the user restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// Verbatim transcription of the recorded answer
    pub transcription: String,
    /// Free-text critique paragraph
    pub critique: String,
    /// STAR-method breakdown
    pub star_analysis: StarAnalysis,
    /// Confidence metrics
    pub confidence_score: ConfidenceScore,
    /// What went well
    pub strengths: Vec<String>,
    /// What to work on
    pub improvements: Vec<String>,
    /// Overall rating, nominally 0-10
    pub overall_rating: f64,
    /// Endpoint-assigned timestamp (RFC 3339)
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "transcription": "Hi",
        "critique": "Good",
        "starAnalysis": {"situation": "s", "task": "t", "action": "a", "result": "r"},
        "confidenceScore": {"score": 7.5, "hesitationWords": 1, "hesitationDetails": ["um"], "clarity": 8.0},
        "strengths": ["Clear"],
        "improvements": ["Pace"],
        "overallRating": 7.8,
        "timestamp": "2024-01-01T00:00:00Z"
    }"#;

    #[test]
    fn test_parses_wire_shape() {
        let feedback: Feedback = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(feedback.transcription, "Hi");
        assert_eq!(feedback.critique, "Good");
        assert_eq!(feedback.star_analysis.situation, "s");
        assert_eq!(feedback.star_analysis.result, "r");
        assert_eq!(feedback.confidence_score.score, 7.5);
        assert_eq!(feedback.confidence_score.hesitation_words, 1);
        assert_eq!(feedback.confidence_score.hesitation_details, vec!["um"]);
        assert_eq!(feedback.confidence_score.clarity, 8.0);
        assert_eq!(feedback.strengths, vec!["Clear"]);
        assert_eq!(feedback.improvements, vec!["Pace"]);
        assert_eq!(feedback.overall_rating, 7.8);
        assert_eq!(feedback.timestamp, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_serializes_back_to_camel_case() {
        let feedback: Feedback = serde_json::from_str(SAMPLE).unwrap();
        let value = serde_json::to_value(&feedback).unwrap();
        assert!(value.get("starAnalysis").is_some());
        assert!(value.get("overallRating").is_some());
        assert!(value["confidenceScore"].get("hesitationWords").is_some());
        // No snake_case leakage onto the wire
        assert!(value.get("star_analysis").is_none());
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let truncated = r#"{"transcription": "Hi", "critique": "Good"}"#;
        assert!(serde_json::from_str::<Feedback>(truncated).is_err());
    }
}
