use std::future::Future;
use std::pin::Pin;

use domain::intel::entity::{GithubAdvisory, RawRecord};
use domain::intel::error::FeedError;
use ports::secondary::feed_adapter::{FeedAdapter, FetchOutcome};

use super::client::execute;
use super::outcome_from;

const ADVISORIES_URL: &str = "https://api.github.com/advisories";

/// GitHub security advisories feed. Works unauthenticated; a token
/// raises the rate limit but is not a gate.
pub struct GithubAdvisoriesAdapter {
    client: reqwest::Client,
    token: Option<String>,
}

impl GithubAdvisoriesAdapter {
    pub fn new(client: reqwest::Client, token: Option<String>) -> Self {
        Self { client, token }
    }

    async fn try_fetch(&self) -> Result<Vec<RawRecord>, FeedError> {
        let mut request = self
            .client
            .get(ADVISORIES_URL)
            .query(&[("per_page", "100")])
            .header("Accept", "application/vnd.github+json");
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let body = execute(request).await?;
        let advisories: Vec<GithubAdvisory> =
            serde_json::from_slice(&body).map_err(|e| FeedError::Parse(e.to_string()))?;
        Ok(advisories.into_iter().map(RawRecord::Github).collect())
    }
}

impl FeedAdapter for GithubAdvisoriesAdapter {
    fn source(&self) -> &str {
        "GitHub"
    }

    fn fetch(&self) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + '_>> {
        Box::pin(async { outcome_from(self.try_fetch().await) })
    }
}
