//! Practice session history storage using SQLite.
//!
//! Every successfully analyzed answer is stored with its question, the
//! transcription and the headline scores, so progress over time can be
//! reviewed with `starprep history`.

use anyhow::Result;
use chrono::{DateTime, Local};
use rusqlite::OptionalExtension;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

use crate::analysis::Feedback;

/// A completed practice session in the history.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    /// Unique identifier for this session
    pub id: i64,
    /// The question that was answered
    pub question: String,
    /// Title of the question's category
    pub category: String,
    /// Transcription of the recorded answer
    pub transcription: String,
    /// Free-text critique from the analysis
    pub critique: String,
    /// Confidence score as returned by the analysis
    pub confidence_score: f64,
    /// Clarity score as returned by the analysis
    pub clarity_score: f64,
    /// Overall rating as returned by the analysis
    pub overall_rating: f64,
    /// When this session was completed
    pub created_at: DateTime<Local>,
}

/// Manages the practice session history database.
pub struct HistoryStore {
    /// Path to the SQLite database file
    database_path: PathBuf,
    /// Connection to the database (lazy-loaded)
    connection: Option<Connection>,
}

impl HistoryStore {
    /// Creates a history store for the given data directory.
    ///
    /// # Errors
    /// - If the data directory cannot be accessed
    pub fn new(data_dir: &Path) -> Result<Self> {
        let database_path = data_dir.join("session_history.db");

        Ok(Self {
            database_path,
            connection: None,
        })
    }

    /// Initializes database connection and creates tables if necessary.
    ///
    /// # Errors
    /// - If the database file cannot be opened
    /// - If table creation fails
    fn get_connection(&mut self) -> Result<&Connection> {
        if self.connection.is_none() {
            let connection = Connection::open(&self.database_path)?;

            connection.execute(
                "CREATE TABLE IF NOT EXISTS sessions (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    question TEXT NOT NULL,
                    category TEXT NOT NULL,
                    transcription TEXT NOT NULL,
                    critique TEXT NOT NULL,
                    confidence_score REAL NOT NULL,
                    clarity_score REAL NOT NULL,
                    overall_rating REAL NOT NULL,
                    created_at TEXT NOT NULL
                )",
                [],
            )?;

            self.connection = Some(connection);
        }

        Ok(self.connection.as_ref().unwrap())
    }

    /// Saves a completed session to the history database.
    ///
    /// # Errors
    /// - If database connection fails
    /// - If insertion fails
    pub fn save_session(
        &mut self,
        question: &str,
        category: &str,
        feedback: &Feedback,
    ) -> Result<i64> {
        let connection = self.get_connection()?;
        let timestamp = Local::now().to_rfc3339();

        connection.execute(
            "INSERT INTO sessions (
                question, category, transcription, critique,
                confidence_score, clarity_score, overall_rating, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                question,
                category,
                feedback.transcription,
                feedback.critique,
                feedback.confidence_score.score,
                feedback.confidence_score.clarity,
                feedback.overall_rating,
                timestamp,
            ],
        )?;

        let id = connection.last_insert_rowid();
        tracing::debug!("Session saved to history with id {}", id);
        Ok(id)
    }

    /// Retrieves all sessions ordered by most recent first.
    ///
    /// # Errors
    /// - If database connection fails
    /// - If query execution fails
    /// - If timestamp parsing fails
    pub fn get_all_sessions(&mut self) -> Result<Vec<SessionEntry>> {
        let connection = self.get_connection()?;

        let mut statement = connection.prepare(
            "SELECT id, question, category, transcription, critique,
                    confidence_score, clarity_score, overall_rating, created_at
             FROM sessions ORDER BY created_at DESC, id DESC",
        )?;

        let entries = statement
            .query_map([], row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Retrieves a single session by ID.
    ///
    /// # Errors
    /// - If database connection fails
    /// - If query execution fails
    pub fn get_session(&mut self, id: i64) -> Result<Option<SessionEntry>> {
        let connection = self.get_connection()?;

        let mut statement = connection.prepare(
            "SELECT id, question, category, transcription, critique,
                    confidence_score, clarity_score, overall_rating, created_at
             FROM sessions WHERE id = ?1",
        )?;

        let entry = statement.query_row(params![id], row_to_entry).optional()?;

        Ok(entry)
    }
}

/// Maps one sessions row to a `SessionEntry`.
fn row_to_entry(row: &rusqlite::Row<'_>) -> std::result::Result<SessionEntry, rusqlite::Error> {
    let timestamp_str = row.get::<_, String>(8)?;
    let created_at = DateTime::parse_from_rfc3339(&timestamp_str)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|_| {
            rusqlite::Error::InvalidParameterName("Invalid timestamp format".to_string())
        })?;

    Ok(SessionEntry {
        id: row.get(0)?,
        question: row.get(1)?,
        category: row.get(2)?,
        transcription: row.get(3)?,
        critique: row.get(4)?,
        confidence_score: row.get(5)?,
        clarity_score: row.get(6)?,
        overall_rating: row.get(7)?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ConfidenceScore, StarAnalysis};

    fn sample_feedback() -> Feedback {
        Feedback {
            transcription: "I would use a hash map.".to_string(),
            critique: "Solid structure.".to_string(),
            star_analysis: StarAnalysis {
                situation: "s".to_string(),
                task: "t".to_string(),
                action: "a".to_string(),
                result: "r".to_string(),
            },
            confidence_score: ConfidenceScore {
                score: 7.0,
                hesitation_words: 2,
                hesitation_details: vec!["um".to_string(), "like".to_string()],
                clarity: 8.5,
            },
            strengths: vec!["Concrete example".to_string()],
            improvements: vec!["Slow down".to_string()],
            overall_rating: 7.4,
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_save_and_list_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::new(dir.path()).unwrap();

        let id = store
            .save_session("What is a hash table?", "Data Structures", &sample_feedback())
            .unwrap();
        assert!(id > 0);

        let sessions = store.get_all_sessions().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].question, "What is a hash table?");
        assert_eq!(sessions[0].category, "Data Structures");
        assert_eq!(sessions[0].overall_rating, 7.4);
        assert_eq!(sessions[0].clarity_score, 8.5);
    }

    #[test]
    fn test_get_session_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::new(dir.path()).unwrap();

        let id = store
            .save_session("Explain closures.", "JavaScript", &sample_feedback())
            .unwrap();

        let entry = store.get_session(id).unwrap().expect("entry exists");
        assert_eq!(entry.transcription, "I would use a hash map.");
        assert_eq!(entry.critique, "Solid structure.");

        assert!(store.get_session(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_sessions_are_listed_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::new(dir.path()).unwrap();

        store
            .save_session("First", "Algorithms", &sample_feedback())
            .unwrap();
        store
            .save_session("Second", "Algorithms", &sample_feedback())
            .unwrap();

        let sessions = store.get_all_sessions().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].question, "Second");
        assert_eq!(sessions[1].question, "First");
    }
}
