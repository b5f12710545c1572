//! Microphone capture for answer recording.
//!
//! Captures PCM samples from a configured or default input device via cpal.
//! Multi-channel input is downmixed to mono by averaging. Stopping a capture
//! materializes the accumulated samples into a `RecordingSession` that owns
//! the playable WAV file.

use crate::error::{Error, Result};
use crate::recording::session::RecordingSession;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Records one spoken answer from the microphone.
///
/// The capture device is held exclusively from `start()` until `stop()` or
/// until the recorder is dropped. At most one capture is active at a time.
pub struct AnswerRecorder {
    /// Actual recording sample rate from device
    sample_rate: u32,
    /// Accumulated audio samples (i16 PCM mono, capture order)
    samples: Arc<Mutex<Vec<i16>>>,
    /// Active audio input stream (kept alive while capturing)
    stream: Option<cpal::Stream>,
    /// Device name, numeric index, or "default"
    device_name: String,
}

impl AnswerRecorder {
    /// Creates a recorder for the given device and requested sample rate.
    ///
    /// The actual rate may differ based on device capabilities; the rate of
    /// the materialized session is always the device rate.
    pub fn new(requested_sample_rate: u32, device_name: String) -> Self {
        Self {
            sample_rate: requested_sample_rate,
            samples: Arc::new(Mutex::new(Vec::new())),
            stream: None,
            device_name,
        }
    }

    /// Starts capturing from the configured input device.
    ///
    /// Any samples from a previous take are discarded first.
    ///
    /// # Errors
    /// - `Error::DeviceUnavailable` if a capture is already active, the
    ///   device cannot be found, or the stream cannot be opened. No partial
    ///   capture state remains on failure.
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Err(Error::DeviceUnavailable(
                "capture already in progress".to_string(),
            ));
        }

        // Get device while suppressing ALSA library warnings
        let device = suppress_alsa_warnings(|| {
            let host = cpal::default_host();

            if self.device_name == "default" {
                host.default_input_device().ok_or_else(|| {
                    Error::DeviceUnavailable("no audio input device available".to_string())
                })
            } else {
                find_device_by_name(&host, &self.device_name)
            }
        })?;

        let device_label = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Recording device: {}", device_label);

        let device_config = device.default_input_config().map_err(|e| {
            Error::DeviceUnavailable(format!("cannot query device configuration: {e}"))
        })?;
        let device_sample_rate = device_config.sample_rate().0;
        let num_channels = device_config.channels() as usize;

        if device_sample_rate != self.sample_rate {
            tracing::warn!(
                "Requested sample rate {}Hz but device uses {}Hz. Recording at device rate.",
                self.sample_rate,
                device_sample_rate
            );
        }

        tracing::debug!(
            "Device configuration: {}Hz, {} channels",
            device_sample_rate,
            num_channels
        );

        self.sample_rate = device_sample_rate;
        self.samples.lock().unwrap().clear();

        let samples_arc = Arc::clone(&self.samples);
        let callback_channels = num_channels;

        let stream = device
            .build_input_stream(
                &device_config.into(),
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    Self::handle_fragment(data, &samples_arc, callback_channels);
                },
                |err| {
                    tracing::error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| Error::DeviceUnavailable(format!("cannot open input stream: {e}")))?;

        stream
            .play()
            .map_err(|e| Error::DeviceUnavailable(format!("cannot start input stream: {e}")))?;
        self.stream = Some(stream);

        tracing::debug!("Audio stream started");
        Ok(())
    }

    /// Stops capturing and materializes the accumulated samples into a
    /// `RecordingSession`.
    ///
    /// Calling without an active capture is a no-op returning `Ok(None)`,
    /// as is stopping a capture that delivered no samples. Fragments are
    /// concatenated in delivery order; nothing is reordered or dropped.
    ///
    /// # Errors
    /// - If the WAV file cannot be written
    pub fn stop(&mut self) -> Result<Option<RecordingSession>> {
        if self.stream.take().is_none() {
            tracing::debug!("stop() without active capture: no-op");
            return Ok(None);
        }

        let samples = std::mem::take(&mut *self.samples.lock().unwrap());

        if samples.is_empty() {
            tracing::warn!("Recording stopped with no samples captured");
            return Ok(None);
        }

        let duration_secs = samples.len() as f32 / self.sample_rate as f32;
        tracing::info!(
            "Recording stopped: {:.2}s ({} samples at {}Hz)",
            duration_secs,
            samples.len(),
            self.sample_rate
        );

        let session = RecordingSession::write(&samples, self.sample_rate)?;
        Ok(Some(session))
    }

    /// Appends one delivered audio fragment, downmixing to mono.
    fn handle_fragment(data: &[i16], samples_arc: &Arc<Mutex<Vec<i16>>>, num_channels: usize) {
        let mut samples = samples_arc.lock().unwrap();

        match num_channels {
            1 => {
                samples.extend_from_slice(data);
            }
            2 => {
                for chunk in data.chunks_exact(2) {
                    let left = chunk[0] as i32;
                    let right = chunk[1] as i32;
                    samples.push(((left + right) / 2) as i16);
                }
            }
            _ => {
                for chunk in data.chunks_exact(num_channels) {
                    let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                    samples.push((sum / num_channels as i32) as i16);
                }
            }
        }
    }

    /// Returns a clone of all samples captured so far.
    pub fn samples(&self) -> Vec<i16> {
        self.samples.lock().unwrap().clone()
    }

    /// Number of samples captured so far.
    pub fn sample_count(&self) -> usize {
        self.samples.lock().unwrap().len()
    }

    /// Actual sample rate of the capture.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Finds an audio input device by name or numeric index.
///
/// # Errors
/// - `Error::DeviceUnavailable` if no device with the given name or index
///   exists
fn find_device_by_name(host: &cpal::Host, device_spec: &str) -> Result<cpal::Device> {
    // Try to parse as a numeric index first
    if let Ok(index) = device_spec.parse::<usize>() {
        let devices: Vec<_> = host
            .input_devices()
            .map_err(|e| Error::DeviceUnavailable(format!("failed to enumerate devices: {e}")))?
            .collect();

        if index < devices.len() {
            return Ok(devices.into_iter().nth(index).unwrap());
        } else {
            return Err(Error::DeviceUnavailable(format!(
                "device index {} is out of range (0-{})",
                index,
                devices.len().saturating_sub(1)
            )));
        }
    }

    let devices = host
        .input_devices()
        .map_err(|e| Error::DeviceUnavailable(format!("failed to enumerate devices: {e}")))?;

    for device in devices {
        if let Ok(name) = device.name() {
            if name == device_spec {
                return Ok(device);
            }
        }
    }

    Err(Error::DeviceUnavailable(format!(
        "audio input device '{device_spec}' not found. Use 'starprep list-devices' to see available devices."
    )))
}

/// Temporarily redirects stderr to /dev/null to suppress ALSA library warnings on Linux.
/// On non-Linux platforms, this is a no-op since ALSA doesn't exist.
#[cfg(target_os = "linux")]
fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .map_err(Error::Io)?;

    let dev_null_fd = dev_null.as_raw_fd();

    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(Error::DeviceUnavailable(
            "failed to duplicate stderr".to_string(),
        ));
    }

    let redirect_result = unsafe { libc::dup2(dev_null_fd, libc::STDERR_FILENO) };
    if redirect_result == -1 {
        unsafe { libc::close(old_stderr) };
        return Err(Error::DeviceUnavailable(
            "failed to redirect stderr".to_string(),
        ));
    }

    let result = f();

    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

/// On non-Linux platforms, no stderr suppression is needed since ALSA doesn't exist.
#[cfg(not(target_os = "linux"))]
fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_without_start_is_a_no_op() {
        let mut recorder = AnswerRecorder::new(16000, "default".to_string());
        let session = recorder.stop().unwrap();
        assert!(session.is_none());
        assert_eq!(recorder.sample_count(), 0);
    }

    #[test]
    fn test_fragments_accumulate_in_delivery_order() {
        let samples = Arc::new(Mutex::new(Vec::new()));

        AnswerRecorder::handle_fragment(&[1, 2, 3], &samples, 1);
        AnswerRecorder::handle_fragment(&[4, 5], &samples, 1);

        assert_eq!(*samples.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_stereo_fragments_downmix_by_averaging() {
        let samples = Arc::new(Mutex::new(Vec::new()));

        AnswerRecorder::handle_fragment(&[100, 200, -50, 50], &samples, 2);

        assert_eq!(*samples.lock().unwrap(), vec![150, 0]);
    }

    #[test]
    fn test_multichannel_fragments_downmix_by_averaging() {
        let samples = Arc::new(Mutex::new(Vec::new()));

        AnswerRecorder::handle_fragment(&[30, 60, 90], &samples, 3);

        assert_eq!(*samples.lock().unwrap(), vec![60]);
    }
}
