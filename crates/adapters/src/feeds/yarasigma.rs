use std::future::Future;
use std::pin::Pin;

use ports::secondary::feed_adapter::{FeedAdapter, FetchOutcome};

/// YARA/Sigma rule-match source. The matching engine is not integrated
/// yet; a future engine only has to emit `RawRecord::RuleMatch` records
/// here, which are the one record kind that carries a kill-chain phase
/// through normalization.
pub struct YaraSigmaAdapter;

impl FeedAdapter for YaraSigmaAdapter {
    fn source(&self) -> &str {
        "YARA/Sigma"
    }

    fn fetch(&self) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + '_>> {
        Box::pin(async { FetchOutcome::Fetched(Vec::new()) })
    }
}
