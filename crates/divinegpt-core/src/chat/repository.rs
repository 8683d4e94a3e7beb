//! ConversationRepository trait definition.
//!
//! Provides create/update/browse operations for stored conversations.
//! Follows the same RPITIT pattern as `JournalRepository`.

use divinegpt_types::chat::{ConversationRecord, NewConversation, Turn};
use divinegpt_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for conversation persistence.
///
/// Implementations live in divinegpt-infra (e.g., `SqliteConversationRepository`).
/// The repository performs no locking; callers serialize writes per session.
pub trait ConversationRepository: Send + Sync {
    /// Insert a new conversation and return the identity assigned to it.
    fn create_conversation(
        &self,
        conversation: &NewConversation,
    ) -> impl std::future::Future<Output = Result<Uuid, RepositoryError>> + Send;

    /// Overwrite the turn list and summary of an existing conversation.
    ///
    /// Returns `RepositoryError::NotFound` if no conversation has this id.
    fn update_conversation(
        &self,
        id: &Uuid,
        messages: &[Turn],
        summary: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get one conversation owned by `user_id`.
    fn get_conversation(
        &self,
        user_id: &str,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ConversationRecord>, RepositoryError>> + Send;

    /// List conversations owned by `user_id`, newest first.
    fn list_conversations(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationRecord>, RepositoryError>> + Send;

    /// Delete a conversation.
    fn delete_conversation(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete every conversation owned by `user_id`, returning how many went.
    fn delete_all_conversations(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
