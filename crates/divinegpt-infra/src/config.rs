//! Configuration loader for DivineGPT.
//!
//! Reads `config.toml` from the data directory (`~/.divinegpt/` by default)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed, then applies environment overrides.

use std::path::{Path, PathBuf};

use divinegpt_types::config::AppConfig;

/// Overrides the data directory.
pub const DATA_DIR_ENV: &str = "DIVINEGPT_DATA_DIR";

/// Overrides `[advisor] base_url`.
pub const ADVISOR_URL_ENV: &str = "DIVINEGPT_ADVISOR_URL";

/// Data directory from `DIVINEGPT_DATA_DIR`, else `~/.divinegpt`.
pub fn resolve_data_dir() -> PathBuf {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".divinegpt"),
    }
}

/// Load configuration from `{data_dir}/config.toml`, with environment overrides.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config = read_config_file(data_dir).await;
    apply_advisor_url(config, std::env::var(ADVISOR_URL_ENV).ok())
}

async fn read_config_file(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

fn apply_advisor_url(mut config: AppConfig, url: Option<String>) -> AppConfig {
    if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
        tracing::debug!(base_url = %url, "Advisor URL overridden from environment");
        config.advisor.base_url = url;
    }
    config
}
