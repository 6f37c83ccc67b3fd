use std::future::Future;
use std::pin::Pin;

use domain::intel::entity::{RawRecord, ThreatFoxIoc};
use domain::intel::error::FeedError;
use ports::secondary::feed_adapter::{FeedAdapter, FetchOutcome};
use serde::Deserialize;
use serde_json::{Value, json};

use super::client::execute;
use super::outcome_from;

const API_URL: &str = "https://threatfox-api.abuse.ch/api/v1/";

/// `data` is an IOC array on success but a plain error string on
/// `no_result`, so it is kept loose and narrowed after the fact.
#[derive(Debug, Deserialize)]
struct ThreatFoxResponse {
    #[serde(default)]
    data: Value,
}

/// ThreatFox IOC query feed. Credential-gated POST: a fixed lookback
/// window is sent as the `days` query parameter.
pub struct ThreatFoxAdapter {
    client: reqwest::Client,
    auth_key: Option<String>,
    lookback_days: u32,
}

impl ThreatFoxAdapter {
    pub fn new(client: reqwest::Client, auth_key: Option<String>, lookback_days: u32) -> Self {
        Self {
            client,
            auth_key,
            lookback_days,
        }
    }

    async fn try_fetch(&self, auth_key: &str) -> Result<Vec<RawRecord>, FeedError> {
        let request = self
            .client
            .post(API_URL)
            .header("Auth-Key", auth_key)
            .json(&json!({ "query": "get_iocs", "days": self.lookback_days }));

        let body = execute(request).await?;
        let response: ThreatFoxResponse =
            serde_json::from_slice(&body).map_err(|e| FeedError::Parse(e.to_string()))?;

        let iocs = match response.data {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<ThreatFoxIoc>(item).ok())
                .map(RawRecord::ThreatFox)
                .collect(),
            _ => Vec::new(),
        };
        Ok(iocs)
    }
}

impl FeedAdapter for ThreatFoxAdapter {
    fn source(&self) -> &str {
        "ThreatFox"
    }

    fn fetch(&self) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + '_>> {
        Box::pin(async {
            let Some(ref auth_key) = self.auth_key else {
                return FetchOutcome::Disabled;
            };
            outcome_from(self.try_fetch(auth_key).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::client::build_client;

    #[tokio::test]
    async fn missing_auth_key_means_disabled_not_failed() {
        let adapter = ThreatFoxAdapter::new(build_client().unwrap(), None, 7);
        assert_eq!(adapter.fetch().await, FetchOutcome::Disabled);
    }

    #[test]
    fn ioc_array_parses() {
        let json = r#"{"query_status": "ok", "data": [
            {"id": "41", "ioc_type": "ip:port", "first_seen": "2024-04-02 11:22:33 UTC"}
        ]}"#;
        let response: ThreatFoxResponse = serde_json::from_str(json).unwrap();
        let Value::Array(items) = response.data else {
            panic!("expected array");
        };
        let ioc: ThreatFoxIoc = serde_json::from_value(items[0].clone()).unwrap();
        assert_eq!(ioc.id, "41");
        assert_eq!(ioc.ioc_type, "ip:port");
    }

    #[test]
    fn no_result_data_string_yields_no_records() {
        let json = r#"{"query_status": "no_result", "data": "Your search did not yield any results"}"#;
        let response: ThreatFoxResponse = serde_json::from_str(json).unwrap();
        assert!(!matches!(response.data, Value::Array(_)));
    }
}
