//! Shared in-memory session and its state transitions.
//!
//! `SharedSession` is the handle the UI and the pipeline both hold. Reads are
//! open to everyone; writes go through crate-private methods so that only the
//! turn processor (turns, summary) and conversation persistence (identity)
//! ever mutate a session.

use std::sync::Arc;

use divinegpt_types::chat::{Session, Turn};
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

/// Append a turn. Turns are append-only; vector order is creation order.
pub fn apply_turn(mut session: Session, turn: Turn) -> Session {
    session.turns.push(turn);
    session
}

/// Replace the rolling summary.
pub fn apply_summary(mut session: Session, summary: String) -> Session {
    session.summary = summary;
    session
}

struct SessionCell {
    handle: Uuid,
    inner: RwLock<Session>,
}

/// Cloneable handle to one in-memory session.
///
/// `handle` is a client-side key that exists before the repository assigns
/// a durable id, so in-flight turns can be tracked for new sessions too.
#[derive(Clone)]
pub struct SharedSession(Arc<SessionCell>);

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self(Arc::new(SessionCell {
            handle: Uuid::now_v7(),
            inner: RwLock::new(session),
        }))
    }

    pub fn handle(&self) -> Uuid {
        self.0.handle
    }

    /// Copy of the current session state.
    pub async fn snapshot(&self) -> Session {
        self.0.inner.read().await.clone()
    }

    /// Durable id, if the session has been persisted.
    pub async fn id(&self) -> Option<Uuid> {
        self.0.inner.read().await.id
    }

    pub async fn turn_count(&self) -> usize {
        self.0.inner.read().await.turns.len()
    }

    /// Run a transition under the write lock and return its by-product.
    pub(crate) async fn transition<R>(&self, f: impl FnOnce(Session) -> (Session, R)) -> R {
        let mut guard = self.0.inner.write().await;
        let current = std::mem::take(&mut *guard);
        let (next, out) = f(current);
        *guard = next;
        out
    }

    /// Record the identity the repository just assigned.
    ///
    /// Identity is set at most once. If the session already has an id, that
    /// id wins and is returned.
    pub(crate) async fn assign_identity(&self, id: Uuid, title: String) -> Uuid {
        let mut guard = self.0.inner.write().await;
        match guard.id {
            Some(existing) => {
                warn!(
                    existing = %existing,
                    rejected = %id,
                    "Session already has an identity, keeping it"
                );
                existing
            }
            None => {
                guard.id = Some(id);
                guard.title = title;
                id
            }
        }
    }
}

impl std::fmt::Debug for SharedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSession")
            .field("handle", &self.0.handle)
            .finish_non_exhaustive()
    }
}
