//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::process;

/// A terminal-based interview practice tool with AI feedback
#[derive(Parser)]
#[command(name = "starprep")]
#[command(version)]
#[command(about = "Practice interview questions out loud and get STAR-method feedback")]
#[command(
    long_about = "Practice interview questions out loud and get STAR-method feedback.\n\nPick a topic, pick a question, record your answer through the microphone,\nand starprep uploads it to your analysis server for a transcription,\nconfidence scores and a STAR-method critique.\n\nDEFAULT COMMAND:\n    If no command is specified, 'practice' is used by default.\n\nEXAMPLES:\n    # Start a practice session\n    $ starprep\n\n    # Browse past sessions\n    $ starprep history\n\n    # Play back your last analyzed answer\n    $ starprep replay\n\n    # Edit configuration (audio device, analysis endpoint)\n    $ starprep config"
)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/starprep/starprep.toml\n    Session history:    ~/.local/share/starprep/\n    Logs:               ~/.local/state/starprep/starprep.log.*"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interview practice session (default)
    ///
    /// Pick a topic and a question, record your answer, and get feedback
    /// from the configured analysis server.
    #[command(visible_alias = "p")]
    Practice,

    /// View and browse past practice sessions
    ///
    /// Use arrow keys to navigate, Enter to view a session, Esc to exit.
    #[command(visible_alias = "h")]
    History,

    /// Play back the most recently analyzed answer
    ///
    /// Uses the system audio player.
    #[command(visible_alias = "rp")]
    Replay,

    /// Open configuration file in your preferred editor
    ///
    /// Edit the audio device, sample rate, and the analysis endpoint.
    /// Uses $EDITOR environment variable or falls back to nano/vim.
    #[command(visible_alias = "c")]
    Config,

    /// List available audio input devices
    ///
    /// Shows device IDs, names, and configurations to help configure
    /// the correct input device in starprep.toml.
    #[command(name = "list-devices")]
    ListDevices,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    /// Useful for troubleshooting issues.
    Logs,

    /// Generate shell completion script
    ///
    /// Generate completion script for your shell. Save the output to your
    /// shell's completion directory or source it directly.
    ///
    /// Examples:
    ///   starprep completions bash > starprep.bash
    ///   starprep completions zsh > _starprep
    ///   starprep completions fish > starprep.fish
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Exit Codes
/// - 0: Success
/// - 1: General error
/// - 2: Usage error (invalid arguments)
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Handle commands that don't need logging or config setup
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "starprep", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => {
            return match commands::handle_list_devices() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        Some(Commands::Logs) => {
            return match commands::handle_logs() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        _ => {}
    }

    // Initialize logging for all other commands
    logging::init_logging()?;

    // Route to appropriate command handler
    match cli.command {
        None | Some(Commands::Practice) => {
            if let Err(e) = commands::handle_practice().await {
                // Check if it's a cancellation error (cliclack already displayed the message)
                let err_msg = e.to_string();
                if err_msg.contains("cancelled") || err_msg.contains("interrupted") {
                    // Silent exit - cliclack already showed "Operation cancelled"
                    process::exit(0);
                } else {
                    return Err(e);
                }
            }
        }
        Some(Commands::History) => {
            commands::handle_history().await?;
        }
        Some(Commands::Replay) => {
            commands::handle_replay().await?;
        }
        Some(Commands::Config) => {
            commands::handle_config()?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::ListDevices) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
