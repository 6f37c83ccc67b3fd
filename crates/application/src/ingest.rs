use std::sync::Arc;

use domain::alert::entity::NewAlert;
use domain::intel::normalizer::normalize;
use ports::secondary::feed_adapter::{FeedAdapter, FetchOutcome};
use tokio::task::JoinSet;

/// Fetch every configured feed concurrently and normalize the results
/// into one combined alert list.
///
/// One task is spawned per adapter (fan-out) and all are joined
/// (fan-in). Failures are contained twice over: adapters reduce their
/// own errors to `FetchOutcome::Failed`, and a panicking adapter task is
/// caught at the join boundary without cancelling its siblings. The
/// combined list concatenates results in the fixed configured adapter
/// order, so a given set of fetch results always produces the same list.
pub async fn collect_alerts(adapters: &[Arc<dyn FeedAdapter>]) -> Vec<NewAlert> {
    let mut tasks = JoinSet::new();
    for (index, adapter) in adapters.iter().enumerate() {
        let adapter = Arc::clone(adapter);
        tasks.spawn(async move { (index, adapter.fetch().await) });
    }

    let mut outcomes: Vec<Option<FetchOutcome>> = vec![None; adapters.len()];
    while let Some(joined) = tasks.join_next().await {
        if let Ok((index, outcome)) = joined {
            outcomes[index] = Some(outcome);
        }
    }

    let mut alerts = Vec::new();
    for (adapter, outcome) in adapters.iter().zip(outcomes) {
        match outcome {
            Some(FetchOutcome::Fetched(records)) => {
                tracing::info!(
                    source = adapter.source(),
                    record_count = records.len(),
                    "feed fetched"
                );
                alerts.extend(records.iter().map(normalize));
            }
            Some(FetchOutcome::Disabled) => {
                tracing::debug!(source = adapter.source(), "feed not configured, skipping");
            }
            Some(FetchOutcome::Failed(error)) => {
                tracing::warn!(
                    source = adapter.source(),
                    error = %error,
                    "feed fetch failed, contributing nothing this cycle"
                );
            }
            None => {
                tracing::warn!(
                    source = adapter.source(),
                    "feed task panicked, contributing nothing this cycle"
                );
            }
        }
    }
    alerts
}
