//! Configuration management for starprep.
//!
//! Loading and saving of the TOML configuration file plus the application
//! data directory paths.

pub mod file;

pub use file::{config_path, data_dir, AnalysisConfig, AudioConfig, StarprepConfig};
