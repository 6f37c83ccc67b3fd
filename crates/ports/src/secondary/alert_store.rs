use domain::alert::entity::{Alert, NewAlert};
use domain::alert::error::AlertError;
use domain::alert::query::AlertQuery;
use domain::common::entity::AlertStatus;

/// Pluggable persistence for the alert snapshot.
///
/// The store is the only component that assigns alert ids. One snapshot
/// generation lives between two `replace_all` calls; implementations
/// must make the replace atomic so readers never observe a
/// half-replaced table.
pub trait AlertStore: Send + Sync {
    /// Drop the entire prior alert set and insert `alerts` with fresh
    /// store-assigned ids, atomically. Returns the stored alerts.
    fn replace_all(&self, alerts: Vec<NewAlert>) -> Result<Vec<Alert>, AlertError>;

    /// Query the current snapshot. Results are ordered by severity rank
    /// descending, then date descending within each severity bucket.
    fn query_alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>, AlertError>;

    /// Set the triage status of exactly one alert and return the
    /// updated record. `AlertError::NotFound` if the id is not in the
    /// current snapshot; nothing is mutated in that case.
    fn update_status(&self, id: u64, status: AlertStatus) -> Result<Alert, AlertError>;

    /// Number of alerts in the current snapshot.
    fn alert_count(&self) -> Result<usize, AlertError>;
}
