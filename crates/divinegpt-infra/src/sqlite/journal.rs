//! SQLite emotional journal repository.
//!
//! Rows reference their conversation, so deleting a conversation also
//! removes the mood history recorded for it.

use divinegpt_core::journal::repository::JournalRepository;
use divinegpt_types::error::RepositoryError;
use divinegpt_types::journal::JournalEntry;
use sqlx::Row;
use uuid::Uuid;

use super::conversation::{format_datetime, parse_datetime};
use super::pool::DatabasePool;

pub struct SqliteJournalRepository {
    pool: DatabasePool,
}

impl SqliteJournalRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct JournalRow {
    emotion: String,
    message: String,
    conversation_id: String,
    timestamp: String,
}

impl JournalRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            emotion: row.try_get("emotion")?,
            message: row.try_get("message")?,
            conversation_id: row.try_get("conversation_id")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_entry(self) -> Result<JournalEntry, RepositoryError> {
        let session_id = Uuid::parse_str(&self.conversation_id)
            .map_err(|e| RepositoryError::Query(format!("invalid conversation_id: {e}")))?;

        Ok(JournalEntry {
            timestamp: parse_datetime(&self.timestamp)?,
            source_text: self.message,
            emotion: self.emotion,
            session_id,
        })
    }
}

impl JournalRepository for SqliteJournalRepository {
    async fn append_entry(&self, user_id: &str, entry: &JournalEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO emotional_journey (id, user_id, emotion, message, conversation_id, timestamp)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(user_id)
        .bind(&entry.emotion)
        .bind(&entry.source_text)
        .bind(entry.session_id.to_string())
        .bind(format_datetime(&entry.timestamp))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_entries(&self, user_id: &str) -> Result<Vec<JournalEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM emotional_journey WHERE user_id = ? ORDER BY timestamp ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                JournalRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_entry()
            })
            .collect()
    }
}
