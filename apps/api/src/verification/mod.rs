// Proof verification: three independent sources (GitHub, on-chain activity, POAP badges)
// scored separately, then combined by the pipeline into a VerificationResult.
// Each source sits behind a trait so fixture and live providers are interchangeable.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::provider_client::ProviderError;

pub mod blockchain;
pub mod github;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod poap;

/// Awaits a provider call under `timeout`. Failures and timeouts are logged and
/// collapse to `None` so the caller can substitute a zeroed result.
pub(crate) async fn bounded<T, F>(timeout: Duration, source: &str, fut: F) -> Option<T>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!("{source} verification error: {e}");
            None
        }
        Err(_) => {
            warn!(
                "{source} verification timed out after {}ms",
                timeout.as_millis()
            );
            None
        }
    }
}
