//! Practice session history: SQLite storage and the interactive browser.

pub mod storage;
pub mod ui;

pub use storage::{HistoryStore, SessionEntry};
pub use ui::HistoryBrowser;
