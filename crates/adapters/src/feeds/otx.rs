use std::future::Future;
use std::pin::Pin;

use domain::intel::entity::{OtxPulse, RawRecord};
use domain::intel::error::FeedError;
use ports::secondary::feed_adapter::{FeedAdapter, FetchOutcome};
use serde::Deserialize;

use super::client::execute;
use super::outcome_from;

const PULSES_URL: &str = "https://otx.alienvault.com/api/v1/pulses/subscribed";

/// The subscribed-pulses endpoint returns either a bare list or a
/// paginated object with a `results` array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OtxResponse {
    List(Vec<OtxPulse>),
    Page {
        #[serde(default)]
        results: Vec<OtxPulse>,
    },
}

/// AlienVault OTX subscribed pulses. Credential-gated: without an API
/// key the adapter opts out rather than failing.
pub struct OtxAdapter {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl OtxAdapter {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    async fn try_fetch(&self, api_key: &str) -> Result<Vec<RawRecord>, FeedError> {
        let request = self
            .client
            .get(PULSES_URL)
            .query(&[("page", "1")])
            .header("X-OTX-API-KEY", api_key);

        let body = execute(request).await?;
        let response: OtxResponse =
            serde_json::from_slice(&body).map_err(|e| FeedError::Parse(e.to_string()))?;
        let pulses = match response {
            OtxResponse::List(pulses) => pulses,
            OtxResponse::Page { results } => results,
        };
        Ok(pulses.into_iter().map(RawRecord::Otx).collect())
    }
}

impl FeedAdapter for OtxAdapter {
    fn source(&self) -> &str {
        "OTX"
    }

    fn fetch(&self) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + '_>> {
        Box::pin(async {
            let Some(ref api_key) = self.api_key else {
                return FetchOutcome::Disabled;
            };
            outcome_from(self.try_fetch(api_key).await)
        })
    }
}
