//! Configuration file management for starprep.
//!
//! Configuration lives in a TOML file in the user's config directory and is
//! created with defaults on first run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Audio capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for the system default device
    /// - numeric index (0, 1, 2, etc.) from `starprep list-devices`
    /// - device name from `starprep list-devices`
    #[serde(default = "default_device")]
    pub device: String,
    /// Recording sample rate in Hz (16000 recommended for speech)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Peak volume threshold for the clipping indicator (0-100)
    #[serde(default = "default_peak_volume_threshold")]
    pub peak_volume_threshold: u8,
    /// Reference level in dBFS for 100% meter display (typical: -20 to -6 dBFS)
    #[serde(default = "default_reference_level_db")]
    pub reference_level_db: i8,
}

fn default_device() -> String {
    "default".to_string()
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_peak_volume_threshold() -> u8 {
    90
}

fn default_reference_level_db() -> i8 {
    -20
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            sample_rate: default_sample_rate(),
            peak_volume_threshold: default_peak_volume_threshold(),
            reference_level_db: default_reference_level_db(),
        }
    }
}

/// Analysis endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// URL of the analysis endpoint (multipart POST, fields `file` and `question`)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    "http://localhost:8000/analyze".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StarprepConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl StarprepConfig {
    /// Loads configuration from the user's config directory, writing the
    /// default file first if none exists.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be read or written
    /// - If the TOML is malformed
    pub fn load_or_create() -> anyhow::Result<Self> {
        let config_path = config_path()?;

        if !config_path.exists() {
            let defaults = StarprepConfig::default();
            defaults.save_to(&config_path)?;
            tracing::info!("Default configuration written to {}", config_path.display());
            return Ok(defaults);
        }

        Self::load_from(&config_path)
    }

    /// Loads configuration from a specific path.
    ///
    /// # Errors
    /// - If the file cannot be read or the TOML is malformed
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: StarprepConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to a specific path, creating parent directories.
    ///
    /// # Errors
    /// - If directories cannot be created or the file cannot be written
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::info!("Configuration saved");
        Ok(())
    }
}

/// Path of the configuration file (`~/.config/starprep/starprep.toml`).
///
/// # Errors
/// - If the home directory cannot be determined
pub fn config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.join(".config").join("starprep").join("starprep.toml"))
}

/// Directory for application data (history database, last answer audio).
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the directory cannot be created
pub fn data_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
        .join(".local")
        .join("share")
        .join("starprep");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("starprep.toml");

        let defaults = StarprepConfig::default();
        defaults.save_to(&path).unwrap();

        let loaded = StarprepConfig::load_from(&path).unwrap();
        assert_eq!(loaded.audio.device, "default");
        assert_eq!(loaded.audio.sample_rate, 16000);
        assert_eq!(loaded.analysis.endpoint, "http://localhost:8000/analyze");
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("starprep.toml");
        fs::write(&path, "[analysis]\nendpoint = \"http://example.test/analyze\"\n").unwrap();

        let loaded = StarprepConfig::load_from(&path).unwrap();
        assert_eq!(loaded.analysis.endpoint, "http://example.test/analyze");
        assert_eq!(loaded.audio.sample_rate, 16000);
        assert_eq!(loaded.audio.peak_volume_threshold, 90);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("starprep.toml");
        fs::write(&path, "[audio\ndevice = ").unwrap();
        assert!(StarprepConfig::load_from(&path).is_err());
    }
}
