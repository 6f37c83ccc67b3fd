use std::sync::Arc;

use domain::alert::error::AlertError;
use ports::secondary::alert_store::AlertStore;
use ports::secondary::feed_adapter::FeedAdapter;

use crate::ingest::collect_alerts;
use crate::notify::Notifier;

/// Counts from one completed ingestion cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    /// Alerts produced by fetch + normalization.
    pub collected: usize,
    /// Alerts committed to the snapshot (equals `collected` today).
    pub stored: usize,
    /// Notifications successfully dispatched.
    pub notified: usize,
}

/// One full fetch → normalize → persist → notify cycle over a fixed set
/// of feed adapters.
///
/// The cycle commits all-or-nothing: if the snapshot replace fails, the
/// previous snapshot stays in place and no notifications go out. Adapter
/// failures never reach this level; they are degraded to empty
/// contributions inside `collect_alerts`.
pub struct IngestPipeline {
    adapters: Vec<Arc<dyn FeedAdapter>>,
    store: Arc<dyn AlertStore>,
    notifier: Notifier,
}

impl IngestPipeline {
    pub fn new(
        adapters: Vec<Arc<dyn FeedAdapter>>,
        store: Arc<dyn AlertStore>,
        notifier: Notifier,
    ) -> Self {
        Self {
            adapters,
            store,
            notifier,
        }
    }

    /// Run a single cycle. An `Err` means the snapshot commit failed and
    /// the prior snapshot is still current; callers log and carry on.
    pub async fn run_cycle(&self) -> Result<CycleStats, AlertError> {
        let alerts = collect_alerts(&self.adapters).await;
        let collected = alerts.len();

        let stored = self.store.replace_all(alerts)?;
        tracing::info!(alert_count = stored.len(), "alert snapshot committed");

        let notified = self.notifier.dispatch(&stored).await;

        Ok(CycleStats {
            collected,
            stored: stored.len(),
            notified,
        })
    }
}
