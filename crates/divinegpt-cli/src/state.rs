//! Application state wiring the chat service together.
//!
//! `ChatService` is generic over its advisor and repositories; AppState pins
//! it to the HTTP transport and the SQLite repositories.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use divinegpt_core::advisor::client::AdvisorClient;
use divinegpt_core::chat::persistence::ConversationPersistence;
use divinegpt_core::chat::processor::TurnProcessor;
use divinegpt_core::chat::service::ChatService;
use divinegpt_core::chat::window::ContextWindower;
use divinegpt_core::journal::recorder::EmotionalJournal;
use divinegpt_infra::advisor::client::HttpAdvisorTransport;
use divinegpt_infra::config::{load_config, resolve_data_dir};
use divinegpt_infra::sqlite::conversation::SqliteConversationRepository;
use divinegpt_infra::sqlite::journal::SqliteJournalRepository;
use divinegpt_infra::sqlite::pool::{database_url, DatabasePool};
use divinegpt_types::config::AppConfig;

pub type ConcreteChatService =
    ChatService<HttpAdvisorTransport, SqliteConversationRepository, SqliteJournalRepository>;

#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: AppConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;

        let db_pool = DatabasePool::new(&database_url(&data_dir))
            .await
            .context("Failed to open the conversation database")?;

        let transport = HttpAdvisorTransport::new(&config.advisor)?;
        tracing::debug!(endpoint = %transport.endpoint(), "Advisor transport ready");

        let processor = TurnProcessor::new(
            AdvisorClient::new(transport, config.advisor.timeout()),
            ContextWindower::new(config.history_window),
        );
        let persistence = ConversationPersistence::new(
            SqliteConversationRepository::new(db_pool.clone()),
            config.user_id.clone(),
        );
        let journal = EmotionalJournal::new(
            SqliteJournalRepository::new(db_pool),
            config.user_id.clone(),
        );

        Ok(Self {
            chat_service: Arc::new(ChatService::new(processor, persistence, journal)),
            config,
            data_dir,
        })
    }
}
