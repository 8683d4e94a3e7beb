//! EmotionalJournal -- best-effort writer for journal entries.
//!
//! Journal writes never fail a turn. Errors are logged and dropped.

use chrono::Utc;
use divinegpt_types::error::{JournalError, RepositoryError};
use divinegpt_types::journal::JournalEntry;
use tracing::{debug, warn};
use uuid::Uuid;

use super::repository::JournalRepository;

pub struct EmotionalJournal<J> {
    repo: J,
    user_id: String,
}

impl<J: JournalRepository> EmotionalJournal<J> {
    pub fn new(repo: J, user_id: impl Into<String>) -> Self {
        Self {
            repo,
            user_id: user_id.into(),
        }
    }

    pub fn repo(&self) -> &J {
        &self.repo
    }

    /// Append an entry, swallowing any failure.
    ///
    /// `session_id` must already be a durable session identity.
    pub async fn record(&self, source_text: &str, emotion: &str, session_id: Uuid) {
        if let Err(e) = self.try_record(source_text, emotion, session_id).await {
            warn!(session_id = %session_id, error = %e, "Failed to record journal entry");
        }
    }

    async fn try_record(
        &self,
        source_text: &str,
        emotion: &str,
        session_id: Uuid,
    ) -> Result<(), JournalError> {
        let entry = JournalEntry {
            timestamp: Utc::now(),
            source_text: source_text.to_string(),
            emotion: emotion.to_string(),
            session_id,
        };
        self.repo.append_entry(&self.user_id, &entry).await?;
        debug!(session_id = %session_id, emotion = %emotion, "Journal entry recorded");
        Ok(())
    }

    /// Mood history for this user, oldest first.
    pub async fn history(&self) -> Result<Vec<JournalEntry>, RepositoryError> {
        self.repo.list_entries(&self.user_id).await
    }
}
