use ragline_core::{RagError, Result};
use std::future::Future;
use std::time::Duration;

/// Await `fut`, giving up after `timeout_secs` (0 = wait forever).
///
/// The outer `Result` only carries [`RagError::Cancelled`]; the inner one is
/// the backend's own outcome, left for the caller to classify.
pub(crate) async fn bounded<F, T>(
    operation: &'static str,
    timeout_secs: u64,
    fut: F,
) -> Result<anyhow::Result<T>>
where
    F: Future<Output = anyhow::Result<T>>,
{
    if timeout_secs == 0 {
        return Ok(fut.await);
    }
    tokio::time::timeout(Duration::from_secs(timeout_secs), fut)
        .await
        .map_err(|_| RagError::Cancelled {
            operation,
            timeout_secs,
        })
}
