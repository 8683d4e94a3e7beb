//! ChatService -- owns the active session and runs complete turns.
//!
//! A send claims the active session through the `TurnGate`, runs the
//! `TurnProcessor`, persists the result and, for resolved turns with a
//! durable identity, records the emotional journal entry. The permit is held
//! until all three are done.

use divinegpt_types::advisory::Tone;
use divinegpt_types::chat::{ConversationRecord, Session};
use divinegpt_types::error::{AdvisorError, PersistError, RepositoryError, TurnError};
use divinegpt_types::journal::JournalEntry;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::advisor::port::RemoteAdvisorPort;
use crate::journal::recorder::EmotionalJournal;
use crate::journal::repository::JournalRepository;

use super::epoch::Epoch;
use super::gate::{TurnGate, TurnPhase};
use super::persistence::{ConversationPersistence, Persisted};
use super::processor::{CompletedTurn, TurnOutcome, TurnProcessor};
use super::repository::ConversationRepository;
use super::session::SharedSession;

/// What happened to durability during a send.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceStatus {
    Created(Uuid),
    Updated(Uuid),
    Failed(PersistError),
    /// Nothing to persist (ignored or superseded turn).
    Skipped,
}

impl PersistenceStatus {
    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            PersistenceStatus::Created(id) | PersistenceStatus::Updated(id) => Some(*id),
            PersistenceStatus::Failed(_) | PersistenceStatus::Skipped => None,
        }
    }
}

/// Non-blocking notices for the UI. The conversation stays usable either way.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    AdvisorDegraded { reason: AdvisorError },
    PersistenceFailed(PersistError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub outcome: TurnOutcome,
    pub persistence: PersistenceStatus,
    pub notices: Vec<Notice>,
}

impl TurnReport {
    fn skipped(outcome: TurnOutcome) -> Self {
        Self {
            outcome,
            persistence: PersistenceStatus::Skipped,
            notices: Vec::new(),
        }
    }
}

pub struct ChatService<A, R, J> {
    processor: TurnProcessor<A>,
    persistence: ConversationPersistence<R>,
    journal: EmotionalJournal<J>,
    gate: TurnGate,
    epoch: Epoch,
    active: RwLock<SharedSession>,
}

impl<A, R, J> ChatService<A, R, J>
where
    A: RemoteAdvisorPort,
    R: ConversationRepository,
    J: JournalRepository,
{
    pub fn new(
        processor: TurnProcessor<A>,
        persistence: ConversationPersistence<R>,
        journal: EmotionalJournal<J>,
    ) -> Self {
        Self {
            processor,
            persistence,
            journal,
            gate: TurnGate::new(),
            epoch: Epoch::new(),
            active: RwLock::new(SharedSession::new(Session::new())),
        }
    }

    pub fn processor(&self) -> &TurnProcessor<A> {
        &self.processor
    }

    pub fn persistence(&self) -> &ConversationPersistence<R> {
        &self.persistence
    }

    pub async fn active_session(&self) -> SharedSession {
        self.active.read().await.clone()
    }

    /// Whether a turn is in flight on the active session.
    pub async fn is_busy(&self) -> bool {
        self.gate.is_busy(self.active_session().await.handle())
    }

    pub async fn phase(&self) -> TurnPhase {
        self.gate.phase(self.active_session().await.handle())
    }

    /// Replace the active session with a fresh one.
    ///
    /// Any turn still waiting on the advisor for the old session is superseded.
    pub async fn start_new_session(&self) -> SharedSession {
        self.switch_to(Session::new()).await
    }

    /// Make a stored conversation the active session.
    ///
    /// Returns `None` (leaving the active session alone) if it does not exist.
    pub async fn open_session(&self, id: &Uuid) -> Result<Option<SharedSession>, RepositoryError> {
        match self.persistence.load(id).await? {
            Some(session) => Ok(Some(self.switch_to(session).await)),
            None => Ok(None),
        }
    }

    async fn switch_to(&self, session: Session) -> SharedSession {
        let next = SharedSession::new(session);
        let mut active = self.active.write().await;
        self.epoch.advance();
        let previous = std::mem::replace(&mut *active, next.clone());
        self.gate.forget(previous.handle());
        debug!(from = %previous.handle(), to = %next.handle(), "Active session switched");
        next
    }

    /// Send one user message on the active session.
    ///
    /// Fails only with `TurnError::Busy` when a turn already holds the session.
    pub async fn send(&self, content: &str, tone: Tone) -> Result<TurnReport, TurnError> {
        if content.trim().is_empty() {
            return Ok(TurnReport::skipped(TurnOutcome::Ignored));
        }

        let session = self.active_session().await;
        let permit = self.gate.try_acquire(session.handle())?;
        let ticket = self.epoch.ticket();

        let outcome = self
            .processor
            .process(content, tone, &session, &permit, &ticket)
            .await;

        let Some(turn) = outcome.completed() else {
            return Ok(TurnReport::skipped(outcome));
        };

        let mut notices = Vec::new();
        if let TurnOutcome::Degraded { reason, .. } = &outcome {
            notices.push(Notice::AdvisorDegraded {
                reason: reason.clone(),
            });
        }

        let persistence = match self.persist(&session, turn).await {
            Ok(Persisted {
                session_id,
                created: true,
            }) => PersistenceStatus::Created(session_id),
            Ok(Persisted { session_id, .. }) => PersistenceStatus::Updated(session_id),
            Err(e) => {
                notices.push(Notice::PersistenceFailed(e.clone()));
                PersistenceStatus::Failed(e)
            }
        };

        if !outcome.is_degraded() {
            if let Some(session_id) = persistence.session_id() {
                self.journal
                    .record(&turn.user_turn.content, &turn.emotion, session_id)
                    .await;
            }
        }

        info!(
            handle = %session.handle(),
            degraded = outcome.is_degraded(),
            persisted = persistence.session_id().is_some(),
            "Turn complete"
        );
        drop(permit);

        Ok(TurnReport {
            outcome,
            persistence,
            notices,
        })
    }

    async fn persist(
        &self,
        session: &SharedSession,
        turn: &CompletedTurn,
    ) -> Result<Persisted, PersistError> {
        self.persistence
            .persist(
                session,
                &turn.user_turn,
                &turn.assistant_turn,
                &turn.updated_summary,
            )
            .await
    }

    pub async fn list_conversations(&self) -> Result<Vec<ConversationRecord>, RepositoryError> {
        self.persistence.list().await
    }

    /// Delete a stored conversation. Deleting the active one starts a new session.
    pub async fn delete_conversation(&self, id: &Uuid) -> Result<(), RepositoryError> {
        self.persistence.delete(id).await?;
        if self.active_session().await.id().await == Some(*id) {
            self.start_new_session().await;
        }
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let removed = self.persistence.delete_all().await?;
        if self.active_session().await.id().await.is_some() {
            self.start_new_session().await;
        }
        Ok(removed)
    }

    pub async fn journal_history(&self) -> Result<Vec<JournalEntry>, RepositoryError> {
        self.journal.history().await
    }
}
