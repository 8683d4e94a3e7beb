//! Application configuration types for DivineGPT.
//!
//! `AppConfig` represents the top-level `config.toml` in the data directory.
//! Every field has a default so an empty or missing file is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::advisory::Tone;

/// Default number of prior turns sent to the advisor.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Smallest advisor timeout honored; lower configured values are raised to it.
pub const MIN_ADVISOR_TIMEOUT_SECS: u64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Owner stamped on stored conversations and journal entries.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Cap on prior turns sent with each request.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    #[serde(default)]
    pub default_tone: Tone,

    #[serde(default)]
    pub advisor: AdvisorConfig,
}

fn default_user_id() -> String {
    "local".to_string()
}

fn default_history_window() -> usize {
    DEFAULT_HISTORY_WINDOW
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            history_window: default_history_window(),
            default_tone: Tone::default(),
            advisor: AdvisorConfig::default(),
        }
    }
}

/// Where and how to reach the advisory gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_ask_path")]
    pub ask_path: String,

    /// Upper bound on a single advisor call. Read it through `timeout()`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AdvisorConfig {
    /// Configured timeout, raised to `MIN_ADVISOR_TIMEOUT_SECS` if lower.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(MIN_ADVISOR_TIMEOUT_SECS))
    }
}

fn default_base_url() -> String {
    "http://localhost:8002".to_string()
}

fn default_ask_path() -> String {
    "/ask".to_string()
}

fn default_timeout_secs() -> u64 {
    180
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ask_path: default_ask_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
