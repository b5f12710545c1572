//! HTTP client for the external analysis endpoint.
//!
//! One multipart POST per analysis: the captured WAV under `file`, the
//! question prompt under `question`. The full response is awaited; there is
//! no streaming, no client-side timeout and no automatic retry — every retry
//! is a fresh user action.

use crate::analysis::Feedback;
use crate::error::{Error, Result};
use std::path::Path;

/// Client for the interview analysis endpoint.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    endpoint: String,
    client: reqwest::Client,
}

impl AnalysisClient {
    /// Creates a client for the given endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Uploads a captured answer and the question it responds to, and
    /// parses the returned feedback.
    ///
    /// # Errors
    /// - `Error::AnalysisFailed` if the WAV file cannot be read, the
    ///   request cannot be sent, or the endpoint answers non-2xx
    /// - `Error::MalformedResponse` if a 2xx body does not parse into the
    ///   feedback shape
    pub async fn analyze(&self, wav_path: &Path, question: &str) -> Result<Feedback> {
        let audio_data = std::fs::read(wav_path).map_err(|e| {
            Error::AnalysisFailed(format!("failed to read captured answer: {e}"))
        })?;

        let file_part = reqwest::multipart::Part::bytes(audio_data)
            .file_name("answer.wav")
            .mime_str("audio/wav")
            .map_err(|e| {
                Error::AnalysisFailed(format!("failed to build upload part: {e}"))
            })?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("question", question.to_string());

        tracing::debug!(
            "Analysis request:\n  URL: {}\n  Method: POST\n  Body: multipart (file=answer.wav, question={} chars)",
            self.endpoint,
            question.len()
        );

        let response = match self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let message = if e.is_connect() {
                    format!(
                        "could not connect to the analysis server at {}. Is it running?",
                        self.endpoint
                    )
                } else if e.is_timeout() {
                    "the analysis server did not respond in time".to_string()
                } else {
                    format!("network error: {e}")
                };
                return Err(Error::AnalysisFailed(message));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let human_readable = match status.as_u16() {
                400 => format!("the analysis server rejected the upload: {error_body}"),
                404 => format!(
                    "no analysis service at {}. Check the endpoint in your configuration.",
                    self.endpoint
                ),
                413 => "the recording is too large for the analysis server".to_string(),
                429 => "the analysis server is rate limiting requests. Wait and try again."
                    .to_string(),
                500..=599 => {
                    "the analysis server had an internal error. Try again later.".to_string()
                }
                _ => format!("analysis server error (status {status}): {error_body}"),
            };

            return Err(Error::AnalysisFailed(human_readable));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::AnalysisFailed(format!("failed to read response: {e}")))?;

        let feedback: Feedback = serde_json::from_str(&body)
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;

        tracing::debug!(
            "Analysis response: rating {:.1}, {} hesitation words, {} chars transcribed",
            feedback.overall_rating,
            feedback.confidence_score.hesitation_words,
            feedback.transcription.len()
        );

        Ok(feedback)
    }
}
