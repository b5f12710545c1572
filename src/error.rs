//! Error types for starprep.

use thiserror::Error;

/// Result type for starprep operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the recording and analysis workflow.
///
/// Every variant is recoverable: the wizard reports it and waits for the
/// user to act again. Nothing here aborts the process.
#[derive(Error, Debug)]
pub enum Error {
    /// The audio capture device could not be acquired (permission denied,
    /// no hardware, or already held elsewhere).
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The analysis endpoint could not be reached or answered with a
    /// non-success status.
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    /// The analysis endpoint answered 2xx but the body did not parse into
    /// the expected feedback shape. Handled the same way as a failed
    /// analysis: the captured answer stays intact for a retry.
    #[error("Analysis response malformed: {0}")]
    MalformedResponse(String),

    /// A workflow transition was requested from a step that does not
    /// permit it.
    #[error("Invalid workflow transition: {0}")]
    InvalidTransition(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// WAV encoding error (wraps hound::Error)
    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),
}

impl Error {
    /// True for errors the wizard treats as a failed analysis attempt:
    /// the captured audio is preserved and the user may retry.
    pub fn is_analysis_error(&self) -> bool {
        matches!(self, Error::AnalysisFailed(_) | Error::MalformedResponse(_))
    }
}
