//! Timeout and retry combinators for settlement.

use super::errors::SettlementError;
use crate::ports::outbound::LedgerClientError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Runs `fut` with a deadline, mapping expiry to [`SettlementError::Timeout`].
pub async fn with_deadline<T, F>(
    phase: &'static str,
    after: Duration,
    fut: F,
) -> Result<T, SettlementError>
where
    F: Future<Output = Result<T, LedgerClientError>>,
{
    match tokio::time::timeout(after, fut).await {
        Ok(result) => result.map_err(SettlementError::from),
        Err(_) => Err(SettlementError::Timeout { phase, after }),
    }
}

/// Re-runs `attempt` for as long as it times out.
///
/// Returns the first success or the first non-timeout error. `on_timeout`
/// is called once per abandoned attempt.
pub async fn retry_on_timeout<T, F, Fut>(
    mut attempt: F,
    mut on_timeout: impl FnMut(&SettlementError),
) -> Result<T, SettlementError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SettlementError>>,
{
    loop {
        match attempt().await {
            Err(error) if error.is_timeout() => {
                warn!(%error, "Retrying claim");
                on_timeout(&error);
            }
            outcome => return outcome,
        }
    }
}
