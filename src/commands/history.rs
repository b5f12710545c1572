//! Browse past practice sessions.

use crate::config;
use crate::history::{HistoryBrowser, HistoryStore, SessionEntry};
use console::style;

/// Opens the interactive history browser and prints the selected session.
///
/// # Errors
/// - If the data directory or database cannot be accessed
/// - If the browser fails
pub async fn handle_history() -> Result<(), anyhow::Error> {
    tracing::info!("=== starprep history ===");

    let data_dir = config::data_dir()?;
    let mut store = HistoryStore::new(&data_dir)?;
    let sessions = store.get_all_sessions()?;

    if sessions.is_empty() {
        println!("No practice sessions yet. Run 'starprep' to record your first answer.");
        return Ok(());
    }

    let mut browser = HistoryBrowser::new(sessions)?;
    if let Some(entry) = browser.run()? {
        print_session(&entry);
    }

    Ok(())
}

/// Prints the stored details of one past session.
fn print_session(entry: &SessionEntry) {
    println!();
    println!(
        "{} {}",
        style(entry.created_at.format("%Y-%m-%d %H:%M").to_string()).dim(),
        style(format!("[{}]", entry.category)).dim()
    );
    println!("{}", style(&entry.question).bold());
    println!();
    println!(
        "  Confidence {:.1}/10 · Clarity {:.1}/10 · Overall {:.1}/10",
        entry.confidence_score, entry.clarity_score, entry.overall_rating
    );
    println!();
    println!("{}", style("Transcription").bold());
    println!("  {}", entry.transcription);
    println!();
    println!("{}", style("Critique").bold());
    println!("  {}", entry.critique);
    println!();
}
