//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap each service call with its per-request deadline
//! - Cancel the in-flight operation cleanly on expiry
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; dropping the future cancels RPC and SQL work
//! - Timeout errors are distinct from other errors
//! - Timed-out requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

/// The deadline elapsed before the operation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{operation} timed out after {}s", .limit.as_secs())]
pub struct DeadlineExceeded {
    pub operation: &'static str,
    pub limit: Duration,
}

/// Run `fut` under `limit`, dropping it when the deadline passes.
pub async fn with_deadline<F, T>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> Result<T, DeadlineExceeded>
where
    F: Future<Output = T>,
{
    timeout(limit, fut).await.map_err(|_| {
        tracing::warn!(operation, limit_secs = limit.as_secs(), "Operation deadline exceeded");
        DeadlineExceeded { operation, limit }
    })
}
