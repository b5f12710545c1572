//! Application command handlers for starprep.
//!
//! This module organizes command handling into separate submodules, each
//! responsible for a specific application command.
//!
//! # Commands
//! - `practice`: the interview wizard (default command)
//! - `history`: browse past practice sessions
//! - `replay`: play back the most recently analyzed answer
//! - `config`: open configuration file in user's preferred editor
//! - `list_devices`: list available audio input devices
//! - `logs`: display recent log entries

pub mod config;
pub mod history;
pub mod list_devices;
pub mod logs;
pub mod practice;
pub mod replay;

pub use config::handle_config;
pub use history::handle_history;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
pub use practice::handle_practice;
pub use replay::handle_replay;
