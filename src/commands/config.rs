//! Open the configuration file in the user's preferred editor.

use crate::config::{config_path, StarprepConfig};
use std::process::Command;

/// Opens the configuration file in `$EDITOR`, falling back to nano or vim.
///
/// Creates the file with defaults first if it does not exist.
///
/// # Errors
/// - If the config path cannot be determined
/// - If no editor can be launched
pub fn handle_config() -> Result<(), anyhow::Error> {
    let path = config_path()?;

    if !path.exists() {
        StarprepConfig::default().save_to(&path)?;
        tracing::info!("Default configuration written to {}", path.display());
    }

    let editor = std::env::var("EDITOR").unwrap_or_default();
    let candidates: Vec<&str> = if editor.is_empty() {
        vec!["nano", "vim", "vi"]
    } else {
        vec![editor.as_str(), "nano", "vim", "vi"]
    };

    for candidate in candidates {
        match Command::new(candidate).arg(&path).status() {
            Ok(status) if status.success() => {
                tracing::info!("Configuration edited with {}", candidate);
                return Ok(());
            }
            Ok(status) => {
                return Err(anyhow::anyhow!(
                    "Editor '{candidate}' exited with status {status}"
                ));
            }
            Err(_) => continue,
        }
    }

    Err(anyhow::anyhow!(
        "No editor found. Set $EDITOR or install nano or vim.\nConfig file: {}",
        path.display()
    ))
}
