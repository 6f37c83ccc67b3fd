//! Outbound notification configuration.

use domain::common::entity::Severity;
use serde::{Deserialize, Serialize};

use super::common::{ConfigError, check_http_url};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Slack-compatible incoming webhook. Absent means notifications
    /// are off entirely.
    pub webhook_url: Option<String>,
    /// Minimum severity that triggers a notification.
    pub threshold: String,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            threshold: "High".to_string(),
        }
    }
}

impl NotificationsConfig {
    pub(super) fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.webhook_url.is_none() {
            self.webhook_url = lookup("SLACK_WEBHOOK_URL").filter(|v| !v.is_empty());
        }
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if Severity::parse(&self.threshold).is_none() {
            return Err(ConfigError::InvalidValue {
                field: "notifications.threshold".to_string(),
                value: self.threshold.clone(),
                expected: "Critical, High, Medium, Low, Unknown".to_string(),
            });
        }
        if let Some(ref url) = self.webhook_url {
            check_http_url("notifications.webhook_url", url)?;
        }
        Ok(())
    }

    /// The validated threshold as a severity. Falls back to High, which
    /// only matters before `validate` has run.
    pub fn threshold_severity(&self) -> Severity {
        Severity::parse(&self.threshold).unwrap_or(Severity::High)
    }
}
