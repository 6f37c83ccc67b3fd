use std::time::Duration;

use domain::common::error::DomainError;

/// Retry policy for outbound deliveries: a handful of attempts with a
/// doubling backoff and a per-attempt timeout.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the initial attempt.
    pub max_retries: usize,
    /// Delay before the first retry; doubles on each subsequent one.
    pub initial_backoff: Duration,
    /// Timeout applied to every individual attempt.
    pub timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Run an async operation up to `1 + max_retries` times, sleeping with
/// doubling backoff between attempts. The last error wins.
pub async fn retry_with_backoff<F, Fut>(config: &RetryConfig, mut f: F) -> Result<(), DomainError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<(), DomainError>>,
{
    let mut delay = config.initial_backoff;
    let mut last_error = None;

    for attempt in 0..=config.max_retries {
        match tokio::time::timeout(config.timeout, f()).await {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(e)) => last_error = Some(e),
            Err(_elapsed) => {
                last_error = Some(DomainError::SendFailed("attempt timed out".to_string()));
            }
        }

        if attempt < config.max_retries {
            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }

    Err(last_error.unwrap_or_else(|| DomainError::SendFailed("no attempts made".to_string())))
}
