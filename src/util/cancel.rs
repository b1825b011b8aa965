//! Cancellation helpers for suspension points.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::ColloquyError;

/// Fail fast if `token` has already fired.
pub fn check_canceled(token: &CancellationToken) -> Result<(), ColloquyError> {
    if token.is_cancelled() {
        return Err(ColloquyError::Canceled);
    }
    Ok(())
}

/// Run `future` unless `token` fires first; the future is dropped on cancel.
pub async fn cancellable<T>(
    token: &CancellationToken,
    future: impl Future<Output = Result<T, ColloquyError>>,
) -> Result<T, ColloquyError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ColloquyError::Canceled),
        result = future => result,
    }
}
