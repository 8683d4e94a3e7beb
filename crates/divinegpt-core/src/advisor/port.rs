//! RemoteAdvisorPort trait definition.

use divinegpt_types::advisory::{AdvisoryRequest, AdvisoryResult};
use divinegpt_types::error::AdvisorError;

/// Transport to the advisory service.
///
/// Implementations live in divinegpt-infra (e.g., `HttpAdvisorTransport`) and
/// report failures honestly; the fallback policy belongs to `AdvisorClient`.
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait RemoteAdvisorPort: Send + Sync {
    /// Send one request. At most one network attempt per call.
    fn ask(
        &self,
        request: &AdvisoryRequest,
    ) -> impl std::future::Future<Output = Result<AdvisoryResult, AdvisorError>> + Send;
}
