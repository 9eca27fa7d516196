/// Time limits for fallible one-off operations
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Debug, thiserror::Error)]
pub enum TimeoutError {
    #[error("Operation timed out after {0:?}")]
    Elapsed(Duration),
    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Execute a fallible future with timeout
pub async fn with_timeout_result<F, T, E>(duration: Duration, future: F) -> Result<T, TimeoutError>
where
    F: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    match timeout(duration, future).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(e)) => Err(TimeoutError::OperationFailed(e.to_string())),
        Err(_) => Err(TimeoutError::Elapsed(duration)),
    }
}
