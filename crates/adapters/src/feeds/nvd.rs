use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Duration, Utc};
use domain::intel::entity::{NvdCve, RawRecord};
use domain::intel::error::FeedError;
use ports::secondary::feed_adapter::{FeedAdapter, FetchOutcome};
use serde::Deserialize;

use super::client::execute;
use super::outcome_from;

const CVES_URL: &str = "https://services.nvd.nist.gov/rest/json/cves/2.0";

#[derive(Debug, Deserialize)]
struct NvdResponse {
    #[serde(default)]
    vulnerabilities: Vec<NvdVulnerability>,
}

#[derive(Debug, Deserialize)]
struct NvdVulnerability {
    cve: Option<NvdCve>,
}

/// NVD CVE feed: CVEs published inside a rolling lookback window
/// computed from the current time at each fetch. An API key raises the
/// request rate limit but is not required.
pub struct NvdAdapter {
    client: reqwest::Client,
    api_key: Option<String>,
    lookback_days: i64,
}

impl NvdAdapter {
    pub fn new(client: reqwest::Client, api_key: Option<String>, lookback_days: i64) -> Self {
        Self {
            client,
            api_key,
            lookback_days,
        }
    }

    /// Publication window ending at `now`, formatted the way the NVD
    /// API expects (`YYYY-MM-DDTHH:MM:SS`, no sub-second part).
    fn window(now: DateTime<Utc>, lookback_days: i64) -> (String, String) {
        let start = now - Duration::days(lookback_days);
        let fmt = "%Y-%m-%dT%H:%M:%S";
        (start.format(fmt).to_string(), now.format(fmt).to_string())
    }

    async fn try_fetch(&self) -> Result<Vec<RawRecord>, FeedError> {
        let (start, end) = Self::window(Utc::now(), self.lookback_days);
        let mut request = self
            .client
            .get(CVES_URL)
            .query(&[("pubStartDate", start.as_str()), ("pubEndDate", end.as_str())]);
        if let Some(ref key) = self.api_key {
            request = request.header("apiKey", key);
        }

        let body = execute(request).await?;
        let response: NvdResponse =
            serde_json::from_slice(&body).map_err(|e| FeedError::Parse(e.to_string()))?;
        Ok(response
            .vulnerabilities
            .into_iter()
            .filter_map(|v| v.cve)
            .map(RawRecord::Nvd)
            .collect())
    }
}

impl FeedAdapter for NvdAdapter {
    fn source(&self) -> &str {
        "NVD"
    }

    fn fetch(&self) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + '_>> {
        Box::pin(async { outcome_from(self.try_fetch().await) })
    }
}
