use std::cmp::Ordering;

use super::entity::Alert;
use crate::common::entity::{AlertStatus, Severity};

/// Filter parameters for querying the stored alert snapshot.
///
/// All filters are optional; an empty query matches everything. The date
/// range is inclusive on both ends and compares ISO-8601 strings
/// lexicographically, which orders correctly for the formats the
/// normalizer emits.
#[derive(Debug, Clone, Default)]
pub struct AlertQuery {
    /// Filter by exact severity.
    pub severity: Option<Severity>,
    /// Filter by origin feed tag (exact match).
    pub source: Option<String>,
    /// Filter by triage status.
    pub status: Option<AlertStatus>,
    /// Start of the date range (inclusive).
    pub start: Option<String>,
    /// End of the date range (inclusive).
    pub end: Option<String>,
}

impl AlertQuery {
    /// Check whether an alert matches all active filters.
    pub fn matches(&self, alert: &Alert) -> bool {
        if let Some(severity) = self.severity
            && alert.severity != severity
        {
            return false;
        }
        if let Some(ref source) = self.source
            && alert.source != *source
        {
            return false;
        }
        if let Some(status) = self.status
            && alert.status != status
        {
            return false;
        }
        if let Some(ref start) = self.start
            && alert.date.as_str() < start.as_str()
        {
            return false;
        }
        if let Some(ref end) = self.end
            && alert.date.as_str() > end.as_str()
        {
            return false;
        }
        true
    }
}

/// Sort alerts for presentation: severity rank descending (Critical
/// first, Unknown last), then date descending within each severity
/// bucket. Dateless alerts sort to the end of their bucket.
pub fn sort_snapshot(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        match b.severity.rank().cmp(&a.severity.rank()) {
            Ordering::Equal => b.date.cmp(&a.date),
            other => other,
        }
    });
}
