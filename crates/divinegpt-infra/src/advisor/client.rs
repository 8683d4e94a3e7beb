//! HttpAdvisorTransport -- concrete [`RemoteAdvisorPort`] over the gateway's
//! `POST /ask` endpoint.
//!
//! Every failure maps onto an [`AdvisorError`]: request timeouts to
//! `Timeout`, connection problems to `Transport`, non-2xx replies to
//! `Status`, and bodies that do not match the wire schema to
//! `MalformedPayload`. The core `AdvisorClient` turns all of them into the
//! fallback advisory.

use std::time::Duration;

use divinegpt_core::advisor::client::timeout_millis;
use divinegpt_core::advisor::port::RemoteAdvisorPort;
use divinegpt_types::advisory::{AdvisoryRequest, AdvisoryResult};
use divinegpt_types::config::AdvisorConfig;
use divinegpt_types::error::AdvisorError;
use tracing::debug;

use super::types::{AskRequest, AskResponse};

/// Longest error body kept in `AdvisorError::Status`.
const MAX_ERROR_BODY_CHARS: usize = 512;

pub struct HttpAdvisorTransport {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpAdvisorTransport {
    /// Build a transport from the `[advisor]` config section.
    pub fn new(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        Self::with_timeout(
            &config.base_url,
            &config.ask_path,
            config.timeout(),
        )
    }

    pub fn with_timeout(
        base_url: &str,
        ask_path: &str,
        timeout: Duration,
    ) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdvisorError::Transport {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: join_endpoint(base_url, ask_path),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_send_error(&self, err: reqwest::Error) -> AdvisorError {
        if err.is_timeout() {
            AdvisorError::Timeout {
                after_ms: timeout_millis(self.timeout),
            }
        } else {
            AdvisorError::Transport {
                message: err.to_string(),
            }
        }
    }
}

fn join_endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl RemoteAdvisorPort for HttpAdvisorTransport {
    async fn ask(&self, request: &AdvisoryRequest) -> Result<AdvisoryResult, AdvisorError> {
        let body = AskRequest::from(request);
        debug!(endpoint = %self.endpoint, history = body.history.len(), "POST advisor request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Status {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let decoded: AskResponse = serde_json::from_slice(&bytes)
            .map_err(|e| AdvisorError::MalformedPayload(e.to_string()))?;

        Ok(decoded.into_result())
    }
}
