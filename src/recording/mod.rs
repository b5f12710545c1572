//! Answer recording for the interview wizard.
//!
//! Provides microphone capture, ownership of the captured WAV resource, and
//! the recording terminal UI.

pub mod audio;
pub mod session;
pub mod ui;

pub use audio::AnswerRecorder;
pub use session::RecordingSession;
pub use ui::{RecorderCommand, RecorderTui};
