//! Replay recorded answers using the system audio player.

use crate::config;
use std::path::Path;
use std::process::Command;

/// Plays back the most recently analyzed answer.
///
/// The wizard keeps a copy of the last analyzed take in the data directory;
/// this command plays that copy.
///
/// # Errors
/// - If no answer has been kept yet
/// - If no audio player can be found
pub async fn handle_replay() -> Result<(), anyhow::Error> {
    tracing::info!("=== starprep replay ===");

    let audio_path = config::data_dir()?.join("last_answer.wav");

    if !audio_path.exists() {
        return Err(anyhow::anyhow!(
            "No recorded answer found. Complete a practice session first."
        ));
    }

    play_audio(&audio_path)?;

    tracing::info!("Playback finished");
    Ok(())
}

/// Plays an audio file with the system's default player.
///
/// On macOS: uses the `open` command.
/// On Linux: tries xdg-open first, then falls back to common audio players
/// (mpv, vlc, ffplay, paplay).
///
/// # Errors
/// - If no player can be found or the player fails to start
pub fn play_audio(audio_path: &Path) -> Result<(), anyhow::Error> {
    tracing::debug!("Playing {}", audio_path.display());

    #[cfg(target_os = "macos")]
    {
        Command::new("open")
            .arg(audio_path)
            .spawn()
            .map_err(|e| anyhow::anyhow!("Failed to open audio player: {e}"))?
            .wait()
            .map_err(|e| anyhow::anyhow!("Audio player error: {e}"))?;
    }

    #[cfg(target_os = "linux")]
    {
        let result = Command::new("xdg-open").arg(audio_path).spawn();

        match result {
            Ok(mut child) => {
                child
                    .wait()
                    .map_err(|e| anyhow::anyhow!("Audio player error: {e}"))?;
            }
            Err(_) => {
                // Fallback to common audio players if xdg-open fails
                let players = ["mpv", "vlc", "ffplay", "paplay"];
                let mut played = false;

                for player in players {
                    if let Ok(mut child) = Command::new(player).arg(audio_path).spawn() {
                        let _ = child.wait();
                        played = true;
                        break;
                    }
                }

                if !played {
                    return Err(anyhow::anyhow!(
                        "No audio player found. Install mpv, vlc, ffplay, or paplay"
                    ));
                }
            }
        }
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        return Err(anyhow::anyhow!(
            "Playback is not supported on this platform"
        ));
    }

    Ok(())
}
