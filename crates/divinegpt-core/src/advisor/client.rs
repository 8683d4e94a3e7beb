//! AdvisorClient -- timeout and fallback policy over a `RemoteAdvisorPort`.
//!
//! `ask` never fails. Transport errors, timeouts, non-success statuses and
//! malformed payloads all become `AdvisoryOutcome::Degraded` carrying the
//! fixed fallback advisory, so the turn pipeline consumes one result shape.

use std::time::Duration;

use divinegpt_types::advisory::{AdvisoryRequest, AdvisoryResult};
use divinegpt_types::error::AdvisorError;
use tracing::{debug, warn};

use super::fallback::fallback_result;
use super::port::RemoteAdvisorPort;

/// Default upper bound on a single advisor call.
pub const DEFAULT_ADVISOR_TIMEOUT: Duration = Duration::from_secs(180);

/// Result of one advisor call, tagged by whether it can be trusted.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvisoryOutcome {
    Resolved(AdvisoryResult),
    Degraded {
        result: AdvisoryResult,
        reason: AdvisorError,
    },
}

impl AdvisoryOutcome {
    pub fn result(&self) -> &AdvisoryResult {
        match self {
            AdvisoryOutcome::Resolved(result) => result,
            AdvisoryOutcome::Degraded { result, .. } => result,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, AdvisoryOutcome::Degraded { .. })
    }
}

pub struct AdvisorClient<P> {
    port: P,
    timeout: Duration,
}

impl<P: RemoteAdvisorPort> AdvisorClient<P> {
    pub fn new(port: P, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    /// Access the underlying transport.
    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Ask the advisor once, degrading to the fallback advisory on any failure.
    #[tracing::instrument(
        name = "ask_advisor",
        skip_all,
        fields(tone = %request.tone, history = request.history_window.len())
    )]
    pub async fn ask(&self, request: &AdvisoryRequest) -> AdvisoryOutcome {
        let attempt = tokio::time::timeout(self.timeout, self.port.ask(request)).await;

        let reason = match attempt {
            Ok(Ok(result)) => match check_result(&result) {
                Ok(()) => {
                    debug!(emotion = %result.emotion, "Advisor resolved");
                    return AdvisoryOutcome::Resolved(result);
                }
                Err(reason) => reason,
            },
            Ok(Err(reason)) => reason,
            Err(_) => AdvisorError::Timeout {
                after_ms: timeout_millis(self.timeout),
            },
        };

        warn!(error = %reason, "Advisor degraded, using fallback advisory");
        AdvisoryOutcome::Degraded {
            result: fallback_result(&request.prior_summary),
            reason,
        }
    }
}

/// Whole milliseconds in `timeout`, saturating at `u64::MAX`.
pub fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

/// A decoded result with no reply text is as untrustworthy as a missing field.
fn check_result(result: &AdvisoryResult) -> Result<(), AdvisorError> {
    if result.reply_text.trim().is_empty() {
        return Err(AdvisorError::MalformedPayload(
            "reply text is empty".to_string(),
        ));
    }
    Ok(())
}
