//! Create-or-update persistence for sessions.
//!
//! A session without an id is created (title and preview derived, identity
//! assigned by the repository); a session with an id is updated in place.
//! Identity is assigned here and nowhere else.

use chrono::Utc;
use divinegpt_types::chat::{ConversationRecord, NewConversation, Session, Turn, TurnRole};
use divinegpt_types::error::{PersistError, RepositoryError};
use tracing::{error, info};
use uuid::Uuid;

use super::repository::ConversationRepository;
use super::session::SharedSession;

pub const TITLE_MAX_CHARS: usize = 30;

pub const PREVIEW_MAX_CHARS: usize = 100;

/// Title and preview used when there is no text to derive them from.
pub const PLACEHOLDER_TITLE: &str = "New conversation";

/// Title for a new conversation from its first user message.
pub fn derive_title(content: &str) -> String {
    let content = content.trim();
    if content.is_empty() {
        return PLACEHOLDER_TITLE.to_string();
    }
    if content.chars().count() > TITLE_MAX_CHARS {
        let head: String = content.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}

/// Text the title is derived from: the session's first user message.
///
/// Falls back to `current` when the turn list carries no user turn.
fn title_source<'a>(turns: &'a [Turn], current: &'a Turn) -> &'a str {
    turns
        .iter()
        .find(|turn| turn.role == TurnRole::User)
        .unwrap_or(current)
        .content
        .as_str()
}

/// Preview text shown in conversation lists: the opening message, clipped.
pub fn derive_preview(turns: &[Turn]) -> String {
    match turns.first().map(|turn| turn.content.trim()) {
        Some(content) if !content.is_empty() => content.chars().take(PREVIEW_MAX_CHARS).collect(),
        _ => PLACEHOLDER_TITLE.to_string(),
    }
}

/// Where a persisted turn landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persisted {
    pub session_id: Uuid,
    /// True when this call gave the session its identity.
    pub created: bool,
}

pub struct ConversationPersistence<R> {
    repo: R,
    user_id: String,
}

impl<R: ConversationRepository> ConversationPersistence<R> {
    pub fn new(repo: R, user_id: impl Into<String>) -> Self {
        Self {
            repo,
            user_id: user_id.into(),
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Persist a session after a turn pair has been applied to it.
    ///
    /// On create failure the session keeps no id and the turns stay
    /// in memory only. On update failure the stored record is untouched.
    #[tracing::instrument(
        name = "persist_turn",
        skip_all,
        fields(handle = %session.handle(), assistant_turn = %assistant_turn.id)
    )]
    pub async fn persist(
        &self,
        session: &SharedSession,
        user_turn: &Turn,
        assistant_turn: &Turn,
        new_summary: &str,
    ) -> Result<Persisted, PersistError> {
        let snapshot = session.snapshot().await;

        match snapshot.id {
            Some(session_id) => {
                self.repo
                    .update_conversation(&session_id, &snapshot.turns, new_summary)
                    .await
                    .map_err(|source| {
                        error!(session_id = %session_id, error = %source, "Conversation update failed");
                        PersistError::Update { session_id, source }
                    })?;

                info!(session_id = %session_id, turns = snapshot.turns.len(), "Conversation updated");
                Ok(Persisted {
                    session_id,
                    created: false,
                })
            }
            None => {
                let title = derive_title(title_source(&snapshot.turns, user_turn));
                let conversation = NewConversation {
                    user_id: self.user_id.clone(),
                    title: title.clone(),
                    preview: derive_preview(&snapshot.turns),
                    messages: snapshot.turns,
                    summary: new_summary.to_string(),
                    timestamp: Utc::now(),
                };

                let assigned = self
                    .repo
                    .create_conversation(&conversation)
                    .await
                    .map_err(|source| {
                        error!(error = %source, "Conversation create failed");
                        PersistError::Create(source)
                    })?;

                let session_id = session.assign_identity(assigned, title).await;
                info!(session_id = %session_id, "Conversation created");
                Ok(Persisted {
                    session_id,
                    created: true,
                })
            }
        }
    }

    /// Load a stored conversation back into an in-memory session.
    pub async fn load(&self, id: &Uuid) -> Result<Option<Session>, RepositoryError> {
        Ok(self
            .repo
            .get_conversation(&self.user_id, id)
            .await?
            .map(ConversationRecord::into_session))
    }

    /// Stored conversations for this user, newest first.
    pub async fn list(&self) -> Result<Vec<ConversationRecord>, RepositoryError> {
        self.repo.list_conversations(&self.user_id).await
    }

    pub async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        self.repo.delete_conversation(id).await?;
        info!(session_id = %id, "Conversation deleted");
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let removed = self.repo.delete_all_conversations(&self.user_id).await?;
        info!(removed, "All conversations deleted");
        Ok(removed)
    }
}
