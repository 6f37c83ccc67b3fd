use std::future::Future;
use std::pin::Pin;

use domain::intel::entity::{RawRecord, SyndicationItem};
use domain::intel::error::FeedError;
use ports::secondary::feed_adapter::{FeedAdapter, FetchOutcome};

use super::client::execute;

/// One configured syndication endpoint.
#[derive(Debug, Clone)]
pub struct SyndicationFeed {
    /// Human-readable name; becomes the alert's source tag.
    pub name: String,
    pub url: String,
}

/// News/advisory syndication family: a fixed list of independent
/// RSS/Atom endpoints fetched in sequence.
///
/// Isolation is per URL: one broken feed is logged and skipped while
/// the others still contribute, and the concatenated result is reported
/// as a successful fetch. An empty feed list is an opt-out.
pub struct SyndicationAdapter {
    client: reqwest::Client,
    feeds: Vec<SyndicationFeed>,
}

impl SyndicationAdapter {
    pub fn new(client: reqwest::Client, feeds: Vec<SyndicationFeed>) -> Self {
        Self { client, feeds }
    }

    async fn fetch_one(&self, feed: &SyndicationFeed) -> Result<Vec<RawRecord>, FeedError> {
        let body = execute(self.client.get(&feed.url)).await?;
        let parsed = feed_rs::parser::parse(body.as_slice())
            .map_err(|e| FeedError::Parse(e.to_string()))?;

        Ok(parsed
            .entries
            .into_iter()
            .map(|entry| {
                let link = entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_default();
                let published = entry
                    .published
                    .or(entry.updated)
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_default();
                RawRecord::Syndication(SyndicationItem {
                    source: feed.name.clone(),
                    id: entry.id,
                    title: entry.title.map(|t| t.content).unwrap_or_default(),
                    link,
                    published,
                })
            })
            .collect())
    }
}

impl FeedAdapter for SyndicationAdapter {
    fn source(&self) -> &str {
        "Syndication"
    }

    fn fetch(&self) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + '_>> {
        Box::pin(async {
            if self.feeds.is_empty() {
                return FetchOutcome::Disabled;
            }

            let mut records = Vec::new();
            for feed in &self.feeds {
                match self.fetch_one(feed).await {
                    Ok(items) => {
                        tracing::debug!(
                            feed = %feed.name,
                            item_count = items.len(),
                            "syndication feed fetched"
                        );
                        records.extend(items);
                    }
                    Err(error) => {
                        tracing::warn!(
                            feed = %feed.name,
                            url = %feed.url,
                            error = %error,
                            "syndication feed failed, skipping"
                        );
                    }
                }
            }
            FetchOutcome::Fetched(records)
        })
    }
}
