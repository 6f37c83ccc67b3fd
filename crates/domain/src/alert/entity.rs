use serde::{Deserialize, Serialize};

use crate::alert::error::AlertError;
use crate::common::entity::{AlertStatus, AttackPhase, Severity};

/// Canonical threat-intelligence alert as stored and served.
///
/// The `id` is assigned by the persistence store when a snapshot is
/// committed; it is unique and stable for the row's lifetime within one
/// snapshot generation. Everything else is produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: u64,
    pub source: String,
    /// Origin-native identifier; empty when the source provides none.
    pub external_id: String,
    pub title: String,
    pub severity: Severity,
    /// ISO-8601 timestamp string, or empty if the source gave no date.
    pub date: String,
    /// Deep link to the origin record; may be empty.
    pub url: String,
    #[serde(default)]
    pub status: AlertStatus,
    #[serde(default)]
    pub attack_phase: AttackPhase,
}

impl Alert {
    /// Attach a store-assigned id to a normalized alert. This is the only
    /// way an `Alert` comes into existence, which keeps id assignment out
    /// of adapters and the normalizer by construction.
    pub fn from_new(id: u64, new: NewAlert) -> Self {
        Self {
            id,
            source: new.source,
            external_id: new.external_id,
            title: new.title,
            severity: new.severity,
            date: new.date,
            url: new.url,
            status: new.status,
            attack_phase: new.attack_phase,
        }
    }
}

/// A normalized alert that has not yet been committed to the store and
/// therefore has no id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    pub source: String,
    pub external_id: String,
    pub title: String,
    pub severity: Severity,
    pub date: String,
    pub url: String,
    pub status: AlertStatus,
    pub attack_phase: AttackPhase,
}

impl NewAlert {
    /// Construct an alert in its initial triage state: status Open,
    /// attack phase Unknown. Sources that classify the kill-chain stage
    /// override `attack_phase` afterwards.
    pub fn open(
        source: impl Into<String>,
        external_id: impl Into<String>,
        title: impl Into<String>,
        severity: Severity,
        date: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            external_id: external_id.into(),
            title: title.into(),
            severity,
            date: date.into(),
            url: url.into(),
            status: AlertStatus::Open,
            attack_phase: AttackPhase::Unknown,
        }
    }
}

/// Parse a status label arriving from the status-update interface.
///
/// A missing or unrecognized label is a validation failure, distinct
/// from `NotFound` on the id: nothing has been looked up yet.
pub fn parse_status(value: &str) -> Result<AlertStatus, AlertError> {
    AlertStatus::parse(value).ok_or_else(|| AlertError::InvalidStatus(value.to_string()))
}
