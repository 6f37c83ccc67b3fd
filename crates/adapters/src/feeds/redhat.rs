use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Duration, Utc};
use domain::intel::entity::{RawRecord, RedHatCve};
use domain::intel::error::FeedError;
use ports::secondary::feed_adapter::{FeedAdapter, FetchOutcome};

use super::client::execute;
use super::outcome_from;

const CVE_URL: &str = "https://access.redhat.com/hydra/rest/securitydata/cve.json";

/// Red Hat security-data feed: CVEs published after a rolling cutoff
/// date. Public API, no credentials.
pub struct RedHatAdapter {
    client: reqwest::Client,
    lookback_days: i64,
}

impl RedHatAdapter {
    pub fn new(client: reqwest::Client, lookback_days: i64) -> Self {
        Self {
            client,
            lookback_days,
        }
    }

    /// Cutoff date for the `after` query parameter (`YYYY-MM-DD`).
    fn cutoff(now: DateTime<Utc>, lookback_days: i64) -> String {
        (now - Duration::days(lookback_days))
            .format("%Y-%m-%d")
            .to_string()
    }

    async fn try_fetch(&self) -> Result<Vec<RawRecord>, FeedError> {
        let after = Self::cutoff(Utc::now(), self.lookback_days);
        let request = self.client.get(CVE_URL).query(&[("after", after.as_str())]);

        let body = execute(request).await?;
        let cves: Vec<RedHatCve> =
            serde_json::from_slice(&body).map_err(|e| FeedError::Parse(e.to_string()))?;
        Ok(cves.into_iter().map(RawRecord::RedHat).collect())
    }
}

impl FeedAdapter for RedHatAdapter {
    fn source(&self) -> &str {
        "Red Hat"
    }

    fn fetch(&self) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + '_>> {
        Box::pin(async { outcome_from(self.try_fetch().await) })
    }
}
