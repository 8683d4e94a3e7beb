//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `divinegpt-core` using sqlx with
//! split read/write pools. The turn list is stored as a JSON array in the
//! `messages` column, one row per conversation.

use chrono::{DateTime, SecondsFormat, Utc};
use divinegpt_core::chat::repository::ConversationRepository;
use divinegpt_types::chat::{ConversationRecord, NewConversation, Turn};
use divinegpt_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to `ConversationRecord`.
struct ConversationRow {
    id: String,
    user_id: String,
    title: String,
    messages: String,
    preview: String,
    summary: String,
    timestamp: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            messages: row.try_get("messages")?,
            preview: row.try_get("preview")?,
            summary: row.try_get("summary")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_record(self) -> Result<ConversationRecord, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid conversation id: {e}")))?;
        let messages: Vec<Turn> = serde_json::from_str(&self.messages)
            .map_err(|e| RepositoryError::Query(format!("invalid messages json: {e}")))?;

        Ok(ConversationRecord {
            id,
            user_id: self.user_id,
            title: self.title,
            messages,
            preview: self.preview,
            timestamp: parse_datetime(&self.timestamp)?,
            summary: self.summary,
        })
    }
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width RFC 3339 so `ORDER BY timestamp` sorts chronologically.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn encode_messages(messages: &[Turn]) -> Result<String, RepositoryError> {
    serde_json::to_string(messages)
        .map_err(|e| RepositoryError::Query(format!("failed to encode messages: {e}")))
}

impl ConversationRepository for SqliteConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &NewConversation,
    ) -> Result<Uuid, RepositoryError> {
        let id = Uuid::now_v7();

        sqlx::query(
            r#"INSERT INTO conversations (id, user_id, title, messages, preview, summary, timestamp)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id.to_string())
        .bind(&conversation.user_id)
        .bind(&conversation.title)
        .bind(encode_messages(&conversation.messages)?)
        .bind(&conversation.preview)
        .bind(&conversation.summary)
        .bind(format_datetime(&conversation.timestamp))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(id)
    }

    async fn update_conversation(
        &self,
        id: &Uuid,
        messages: &[Turn],
        summary: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE conversations SET messages = ?, summary = ? WHERE id = ?")
            .bind(encode_messages(messages)?)
            .bind(summary)
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn get_conversation(
        &self,
        user_id: &str,
        id: &Uuid,
    ) -> Result<Option<ConversationRecord>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conversation_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conversation_row.into_record()?))
            }
            None => Ok(None),
        }
    }

    async fn list_conversations(
        &self,
        user_id: &str,
    ) -> Result<Vec<ConversationRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM conversations WHERE user_id = ? ORDER BY timestamp DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut conversations = Vec::with_capacity(rows.len());
        for row in &rows {
            let conversation_row = ConversationRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            conversations.push(conversation_row.into_record()?);
        }

        Ok(conversations)
    }

    async fn delete_conversation(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_all_conversations(&self, user_id: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM conversations WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
