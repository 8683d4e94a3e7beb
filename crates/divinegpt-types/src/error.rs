use thiserror::Error;
use uuid::Uuid;

/// Why a call to the remote advisor did not produce a trusted result.
///
/// These never escape the advisor client; they only explain a degraded turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisorError {
    #[error("advisor transport failed: {message}")]
    Transport { message: String },

    #[error("advisor timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("advisor returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed advisory payload: {0}")]
    MalformedPayload(String),
}

/// Errors from repository operations (used by trait definitions in divinegpt-core).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// A conversation could not be made durable.
///
/// The in-memory turns remain usable; only durability is lost.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    #[error("failed to create conversation: {0}")]
    Create(RepositoryError),

    #[error("failed to update conversation {session_id}: {source}")]
    Update {
        session_id: Uuid,
        source: RepositoryError,
    },
}

/// A journal entry could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("journal write failed: {0}")]
pub struct JournalError(#[from] pub RepositoryError);

/// Errors that stop a turn from starting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("a turn is already in flight for session handle {handle}")]
    Busy { handle: Uuid },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisor_error_display() {
        let err = AdvisorError::Status {
            status: 503,
            body: "RAG service unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "advisor returned HTTP 503: RAG service unavailable"
        );
    }

    #[test]
    fn test_persist_error_display() {
        let id = Uuid::now_v7();
        let err = PersistError::Update {
            session_id: id,
            source: RepositoryError::NotFound,
        };
        assert!(err.to_string().contains(&id.to_string()));
        assert!(err.to_string().contains("entity not found"));
    }

    #[test]
    fn test_journal_error_from_repository_error() {
        let err: JournalError = RepositoryError::Query("disk full".to_string()).into();
        assert_eq!(err.to_string(), "journal write failed: query error: disk full");
    }
}
