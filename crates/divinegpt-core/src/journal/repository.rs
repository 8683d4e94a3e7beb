//! JournalRepository trait definition.

use divinegpt_types::error::RepositoryError;
use divinegpt_types::journal::JournalEntry;

/// Repository trait for emotional journal entries.
///
/// Implementations live in divinegpt-infra (e.g., `SqliteJournalRepository`).
pub trait JournalRepository: Send + Sync {
    /// Append one entry for `user_id`.
    fn append_entry(
        &self,
        user_id: &str,
        entry: &JournalEntry,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All entries for `user_id`, oldest first.
    fn list_entries(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<JournalEntry>, RepositoryError>> + Send;
}
