use std::future::Future;
use std::pin::Pin;

use application::retry::{RetryConfig, retry_with_backoff};
use domain::common::error::DomainError;
use ports::secondary::alert_sender::AlertSender;
use serde_json::json;

/// Alert sender that POSTs `{"text": ...}` payloads to a
/// Slack-compatible incoming webhook, retrying transient failures with
/// backoff. Delivery stays best-effort: the caller logs a final failure
/// and moves on.
pub struct SlackWebhookSender {
    client: reqwest::Client,
    webhook_url: String,
    retry: RetryConfig,
}

impl SlackWebhookSender {
    pub fn new(client: reqwest::Client, webhook_url: String, retry: RetryConfig) -> Self {
        Self {
            client,
            webhook_url,
            retry,
        }
    }
}

impl AlertSender for SlackWebhookSender {
    fn send<'a>(
        &'a self,
        message: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), DomainError>> + Send + 'a>> {
        Box::pin(async move {
            retry_with_backoff(&self.retry, || async {
                let response = self
                    .client
                    .post(&self.webhook_url)
                    .json(&json!({ "text": message }))
                    .send()
                    .await
                    .map_err(|e| DomainError::SendFailed(format!("webhook POST failed: {e}")))?;

                if response.status().is_success() {
                    Ok(())
                } else {
                    Err(DomainError::SendFailed(format!(
                        "webhook returned HTTP {}",
                        response.status()
                    )))
                }
            })
            .await
        })
    }
}
