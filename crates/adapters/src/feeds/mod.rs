//! One adapter per external feed. Every adapter catches its own
//! transport and parse failures and reduces them to a `FetchOutcome`,
//! so a broken feed can never take the cycle down with it.

pub mod client;
pub mod github;
pub mod intelowl;
pub mod misp;
pub mod nvd;
pub mod otx;
pub mod redhat;
pub mod syndication;
pub mod threatfox;
pub mod yarasigma;

pub use github::GithubAdvisoriesAdapter;
pub use intelowl::IntelOwlAdapter;
pub use misp::MispAdapter;
pub use nvd::NvdAdapter;
pub use otx::OtxAdapter;
pub use redhat::RedHatAdapter;
pub use syndication::{SyndicationAdapter, SyndicationFeed};
pub use threatfox::ThreatFoxAdapter;
pub use yarasigma::YaraSigmaAdapter;

use domain::intel::entity::RawRecord;
use domain::intel::error::FeedError;
use ports::secondary::feed_adapter::FetchOutcome;

/// Fold an adapter's internal fetch result into the fail-open contract.
pub(crate) fn outcome_from(result: Result<Vec<RawRecord>, FeedError>) -> FetchOutcome {
    match result {
        Ok(records) => FetchOutcome::Fetched(records),
        Err(error) => FetchOutcome::Failed(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_fold_into_failed_not_panic() {
        let outcome = outcome_from(Err(FeedError::Status(503)));
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
    }

    #[test]
    fn records_fold_into_fetched() {
        let outcome = outcome_from(Ok(Vec::new()));
        assert_eq!(outcome, FetchOutcome::Fetched(Vec::new()));
    }
}
