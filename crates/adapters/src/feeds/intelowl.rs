use std::future::Future;
use std::pin::Pin;

use ports::secondary::feed_adapter::{FeedAdapter, FetchOutcome};

/// IntelOwl integration point. No live API is wired in yet, so every
/// cycle gets an empty contribution; the adapter exists so the wiring,
/// configuration toggle, and source tag are already in place when an
/// instance becomes available.
pub struct IntelOwlAdapter;

impl FeedAdapter for IntelOwlAdapter {
    fn source(&self) -> &str {
        "IntelOwl"
    }

    fn fetch(&self) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + '_>> {
        Box::pin(async { FetchOutcome::Fetched(Vec::new()) })
    }
}
