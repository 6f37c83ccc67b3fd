use std::future::Future;
use std::pin::Pin;

use domain::intel::entity::{MispEvent, RawRecord};
use domain::intel::error::FeedError;
use ports::secondary::feed_adapter::{FeedAdapter, FetchOutcome};
use serde::Deserialize;

use super::client::execute;
use super::outcome_from;

/// `/events/index` returns a bare array on most instances, but some
/// wrap it in `{"response": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MispIndexResponse {
    List(Vec<MispEvent>),
    Wrapped {
        #[serde(default)]
        response: Vec<MispEvent>,
    },
}

/// MISP instance event index. Requires both a base URL and an API key;
/// if either is absent the adapter opts out.
pub struct MispAdapter {
    client: reqwest::Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl MispAdapter {
    pub fn new(
        client: reqwest::Client,
        base_url: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    async fn try_fetch(&self, base_url: &str, api_key: &str) -> Result<Vec<RawRecord>, FeedError> {
        let base = base_url.trim_end_matches('/');
        let request = self
            .client
            .get(format!("{base}/events/index"))
            .header("Authorization", api_key)
            .header("Accept", "application/json");

        let body = execute(request).await?;
        let response: MispIndexResponse =
            serde_json::from_slice(&body).map_err(|e| FeedError::Parse(e.to_string()))?;
        let events = match response {
            MispIndexResponse::List(events) => events,
            MispIndexResponse::Wrapped { response } => response,
        };

        Ok(events
            .into_iter()
            .map(|mut event| {
                event.base_url = base.to_string();
                RawRecord::Misp(event)
            })
            .collect())
    }
}

impl FeedAdapter for MispAdapter {
    fn source(&self) -> &str {
        "MISP"
    }

    fn fetch(&self) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + '_>> {
        Box::pin(async {
            let (Some(base_url), Some(api_key)) = (&self.base_url, &self.api_key) else {
                return FetchOutcome::Disabled;
            };
            outcome_from(self.try_fetch(base_url, api_key).await)
        })
    }
}
