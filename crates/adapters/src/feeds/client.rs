use std::time::Duration;

use domain::intel::error::FeedError;

/// Maximum feed response size: 50 MiB. Prevents OOM from a compromised
/// or misconfigured feed returning unbounded data.
const MAX_RESPONSE_SIZE: usize = 50 * 1024 * 1024;

/// Build the shared HTTP client used by all feed adapters: 30 s total
/// timeout, identifying user agent.
pub fn build_client() -> Result<reqwest::Client, FeedError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent("intelwatch-agent/0.1")
        .build()
        .map_err(|e| FeedError::InvalidConfig(format!("HTTP client init failed: {e}")))
}

/// Send a prepared request and read the body with a size cap.
///
/// Non-2xx statuses and oversized bodies are errors; callers fold them
/// into `FetchOutcome::Failed` at the adapter boundary.
pub(crate) async fn execute(request: reqwest::RequestBuilder) -> Result<Vec<u8>, FeedError> {
    let mut response = request
        .send()
        .await
        .map_err(|e| FeedError::Http(e.to_string()))?;

    if !response.status().is_success() {
        return Err(FeedError::Status(response.status().as_u16()));
    }

    let content_length: usize = response
        .content_length()
        .unwrap_or(0)
        .try_into()
        .unwrap_or(usize::MAX);
    if content_length > MAX_RESPONSE_SIZE {
        return Err(FeedError::Parse(format!(
            "response too large: {content_length} bytes (max {MAX_RESPONSE_SIZE})"
        )));
    }

    let mut body = Vec::with_capacity(content_length.min(MAX_RESPONSE_SIZE));
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| FeedError::Http(format!("body read failed: {e}")))?
    {
        if body.len() + chunk.len() > MAX_RESPONSE_SIZE {
            return Err(FeedError::Parse(format!(
                "response exceeded {MAX_RESPONSE_SIZE} byte limit"
            )));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}
