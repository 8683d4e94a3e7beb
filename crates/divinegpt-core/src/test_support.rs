//! In-memory fakes shared by the core unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use divinegpt_types::advisory::{AdvisoryRequest, AdvisoryResult};
use divinegpt_types::chat::{ConversationRecord, NewConversation, ScriptureRef, Turn};
use divinegpt_types::error::{AdvisorError, RepositoryError};
use divinegpt_types::journal::JournalEntry;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::advisor::port::RemoteAdvisorPort;
use crate::chat::repository::ConversationRepository;
use crate::journal::repository::JournalRepository;

pub(crate) fn advisory(reply: &str, emotion: &str, summary: &str) -> AdvisoryResult {
    AdvisoryResult {
        reply_text: reply.to_string(),
        scripture_ref: Some(ScriptureRef {
            quote: "कर्मण्येवाधिकारस्ते मा फलेषु कदाचन".to_string(),
            source: "Bhagavad Gita 2.47".to_string(),
            transliteration: Some("karmaṇy-evādhikāras te mā phaleṣhu kadāchana".to_string()),
        }),
        emotion: emotion.to_string(),
        updated_summary: summary.to_string(),
    }
}

/// Scripted advisor: answers with queued replies in order.
pub(crate) struct FakeAdvisor {
    replies: Mutex<VecDeque<Result<AdvisoryResult, AdvisorError>>>,
    requests: Mutex<Vec<AdvisoryRequest>>,
    delay: Option<Duration>,
    hold: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl FakeAdvisor {
    pub(crate) fn replying(replies: Vec<Result<AdvisoryResult, AdvisorError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            delay: None,
            hold: None,
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Signal `started` once a call begins, then wait for `release`.
    pub(crate) fn with_hold(mut self, started: Arc<Notify>, release: Arc<Notify>) -> Self {
        self.hold = Some((started, release));
        self
    }

    pub(crate) fn requests(&self) -> Vec<AdvisoryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl RemoteAdvisorPort for FakeAdvisor {
    async fn ask(&self, request: &AdvisoryRequest) -> Result<AdvisoryResult, AdvisorError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();

        if let Some((started, release)) = &self.hold {
            started.notify_one();
            release.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        reply.unwrap_or_else(|| {
            Err(AdvisorError::Transport {
                message: "no scripted reply".to_string(),
            })
        })
    }
}

#[derive(Default)]
struct ConversationStore {
    records: HashMap<Uuid, ConversationRecord>,
}

/// Conversation repository backed by a HashMap, with failure switches.
#[derive(Clone, Default)]
pub(crate) struct InMemoryConversations {
    store: Arc<Mutex<ConversationStore>>,
    creates: Arc<AtomicUsize>,
    fail_creates: Arc<AtomicBool>,
    fail_updates: Arc<AtomicBool>,
}

impl InMemoryConversations {
    pub(crate) fn get(&self, id: &Uuid) -> Option<ConversationRecord> {
        self.store.lock().unwrap().records.get(id).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.store.lock().unwrap().records.len()
    }

    pub(crate) fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

impl ConversationRepository for InMemoryConversations {
    async fn create_conversation(
        &self,
        conversation: &NewConversation,
    ) -> Result<Uuid, RepositoryError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        let id = Uuid::now_v7();
        let record = ConversationRecord {
            id,
            user_id: conversation.user_id.clone(),
            title: conversation.title.clone(),
            messages: conversation.messages.clone(),
            preview: conversation.preview.clone(),
            timestamp: conversation.timestamp,
            summary: conversation.summary.clone(),
        };
        self.store.lock().unwrap().records.insert(id, record);
        Ok(id)
    }

    async fn update_conversation(
        &self,
        id: &Uuid,
        messages: &[Turn],
        summary: &str,
    ) -> Result<(), RepositoryError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("disk I/O error".to_string()));
        }
        let mut store = self.store.lock().unwrap();
        let record = store.records.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.messages = messages.to_vec();
        record.summary = summary.to_string();
        Ok(())
    }

    async fn get_conversation(
        &self,
        user_id: &str,
        id: &Uuid,
    ) -> Result<Option<ConversationRecord>, RepositoryError> {
        Ok(self.get(id).filter(|record| record.user_id == user_id))
    }

    async fn list_conversations(
        &self,
        user_id: &str,
    ) -> Result<Vec<ConversationRecord>, RepositoryError> {
        let store = self.store.lock().unwrap();
        let mut records: Vec<_> = store
            .records
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    async fn delete_conversation(&self, id: &Uuid) -> Result<(), RepositoryError> {
        self.store
            .lock()
            .unwrap()
            .records
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete_all_conversations(&self, user_id: &str) -> Result<u64, RepositoryError> {
        let mut store = self.store.lock().unwrap();
        let before = store.records.len();
        store.records.retain(|_, record| record.user_id != user_id);
        Ok((before - store.records.len()) as u64)
    }
}

/// Journal repository backed by a Vec, with a failure switch.
#[derive(Clone, Default)]
pub(crate) struct InMemoryJournal {
    entries: Arc<Mutex<Vec<(String, JournalEntry)>>>,
    fail_appends: Arc<AtomicBool>,
}

impl InMemoryJournal {
    pub(crate) fn entries(&self) -> Vec<JournalEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    pub(crate) fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }
}

impl JournalRepository for InMemoryJournal {
    async fn append_entry(&self, user_id: &str, entry: &JournalEntry) -> Result<(), RepositoryError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        self.entries
            .lock()
            .unwrap()
            .push((user_id.to_string(), entry.clone()));
        Ok(())
    }

    async fn list_entries(&self, user_id: &str) -> Result<Vec<JournalEntry>, RepositoryError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, entry)| entry.clone())
            .collect())
    }
}
