use std::future::Future;
use std::pin::Pin;

use domain::intel::entity::RawRecord;

/// Result of one fetch attempt against an external feed.
///
/// Adapters never return an `Err` and never panic the cycle: a missing
/// credential is an opt-out (`Disabled`), and a transport/parse failure
/// is reduced to `Failed` at the adapter boundary. Both contribute zero
/// records; the distinction exists so callers and tests can tell an
/// opt-out from a genuine failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The adapter is not configured (missing credential or endpoint).
    Disabled,
    /// Fetch succeeded; the list may legitimately be empty.
    Fetched(Vec<RawRecord>),
    /// Fetch failed; the message is for logging only.
    Failed(String),
}

impl FetchOutcome {
    /// Records contributed to the cycle: empty unless `Fetched`.
    pub fn into_records(self) -> Vec<RawRecord> {
        match self {
            Self::Fetched(records) => records,
            Self::Disabled | Self::Failed(_) => Vec::new(),
        }
    }
}

/// Secondary port for one external feed (or feed family).
///
/// Uses `Pin<Box<dyn Future>>` return type (instead of RPITIT) so the
/// trait is dyn-compatible and can be used as `Arc<dyn FeedAdapter>`.
pub trait FeedAdapter: Send + Sync {
    /// Tag identifying the origin feed in logs. Syndication adapters
    /// cover several feeds and report a family tag here; the per-item
    /// source tag travels on the record itself.
    fn source(&self) -> &str;

    /// Fetch the current batch of raw records from the external system.
    fn fetch(&self) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + '_>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyAdapter;
    impl FeedAdapter for DummyAdapter {
        fn source(&self) -> &str {
            "dummy"
        }
        fn fetch(&self) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + '_>> {
            Box::pin(async { FetchOutcome::Fetched(vec![]) })
        }
    }

    #[test]
    fn feed_adapter_is_dyn_compatible() {
        let adapter: Box<dyn FeedAdapter> = Box::new(DummyAdapter);
        assert_eq!(adapter.source(), "dummy");
    }

    #[test]
    fn disabled_and_failed_contribute_no_records() {
        assert!(FetchOutcome::Disabled.into_records().is_empty());
        assert!(FetchOutcome::Failed("boom".to_string()).into_records().is_empty());
    }

    #[test]
    fn fetched_keeps_records() {
        let records = vec![RawRecord::Otx(domain::intel::entity::OtxPulse::default())];
        assert_eq!(FetchOutcome::Fetched(records.clone()).into_records(), records);
    }
}
