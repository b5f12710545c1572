//! Captured-answer ownership.
//!
//! A `RecordingSession` owns exactly one playable WAV file at a time. The
//! file lives in the system temp directory and is removed when the session
//! is dropped, so replacing or discarding a take never leaks the old audio.

use crate::error::Result;
use hound::WavWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter so re-records within one process get distinct files.
static TAKE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A captured answer: one playable WAV resource with exclusive ownership.
#[derive(Debug)]
pub struct RecordingSession {
    wav_path: PathBuf,
    sample_rate: u32,
    sample_count: usize,
}

impl RecordingSession {
    /// Writes the captured samples to a fresh WAV file and takes ownership
    /// of it.
    ///
    /// Samples must already be mono 16-bit PCM in capture order; they are
    /// written as-is, without reordering or loss.
    ///
    /// # Errors
    /// - If the WAV file cannot be created or written
    pub fn write(samples: &[i16], sample_rate: u32) -> Result<Self> {
        let take = TAKE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let wav_path = std::env::temp_dir().join(format!(
            "starprep_{}_{}.wav",
            std::process::id(),
            take
        ));

        let wav_spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = WavWriter::create(&wav_path, wav_spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;

        tracing::debug!(
            "Answer captured: {} ({} samples at {}Hz)",
            wav_path.display(),
            samples.len(),
            sample_rate
        );

        Ok(Self {
            wav_path,
            sample_rate,
            sample_count: samples.len(),
        })
    }

    /// Path to the playable WAV file.
    pub fn path(&self) -> &Path {
        &self.wav_path
    }

    /// Sample rate of the captured audio.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration of the captured audio in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.sample_count as f32 / self.sample_rate as f32
    }

    /// Reads the full WAV container for upload.
    ///
    /// # Errors
    /// - If the file cannot be read
    pub fn wav_bytes(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.wav_path)?)
    }

    /// Copies the WAV file to `dest`, e.g. to keep the last analyzed answer
    /// around for `starprep replay` after this session is discarded.
    ///
    /// # Errors
    /// - If the copy fails
    pub fn persist_copy(&self, dest: &Path) -> Result<()> {
        std::fs::copy(&self.wav_path, dest)?;
        tracing::debug!("Answer copied to {}", dest.display());
        Ok(())
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.wav_path) {
            tracing::debug!(
                "Failed to remove captured answer {}: {}",
                self.wav_path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_samples(path: &Path) -> Vec<i16> {
        let mut reader = hound::WavReader::open(path).unwrap();
        reader.samples::<i16>().map(|s| s.unwrap()).collect()
    }

    #[test]
    fn test_write_preserves_samples_in_order() {
        let samples: Vec<i16> = (0..2000).map(|i| (i % 321) as i16).collect();
        let session = RecordingSession::write(&samples, 16000).unwrap();

        let reader = hound::WavReader::open(session.path()).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 16000);

        assert_eq!(read_samples(session.path()), samples);
    }

    #[test]
    fn test_drop_removes_the_wav_file() {
        let session = RecordingSession::write(&[1, 2, 3], 16000).unwrap();
        let path = session.path().to_path_buf();
        assert!(path.exists());
        drop(session);
        assert!(!path.exists());
    }

    #[test]
    fn test_replacing_a_session_releases_the_prior_file() {
        let first = RecordingSession::write(&[1, 2, 3], 16000).unwrap();
        let first_path = first.path().to_path_buf();

        let mut slot = Some(first);
        let prior = slot.replace(RecordingSession::write(&[4, 5, 6], 16000).unwrap());
        drop(prior);
        let second_path = slot.as_ref().unwrap().path().to_path_buf();

        assert!(!first_path.exists());
        assert!(second_path.exists());
        assert_ne!(first_path, second_path);
    }

    #[test]
    fn test_duration_reflects_sample_count() {
        let samples = vec![0i16; 16000 * 2];
        let session = RecordingSession::write(&samples, 16000).unwrap();
        assert!((session.duration_secs() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_wav_bytes_returns_a_riff_container() {
        let session = RecordingSession::write(&[0i16; 100], 16000).unwrap();
        let bytes = session.wav_bytes().unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
    }
}
