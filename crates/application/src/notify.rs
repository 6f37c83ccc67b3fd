use std::sync::Arc;

use domain::alert::entity::Alert;
use domain::common::entity::Severity;
use ports::secondary::alert_sender::AlertSender;

/// Threshold-gated outbound notification for freshly ingested alerts.
///
/// With no sender configured the notifier is a no-op. Each qualifying
/// alert gets exactly one message; a failed send is logged and does not
/// stop the remaining dispatches (delivery is best-effort by design).
pub struct Notifier {
    sender: Option<Arc<dyn AlertSender>>,
    threshold: Severity,
}

impl Notifier {
    pub fn new(sender: Arc<dyn AlertSender>, threshold: Severity) -> Self {
        Self {
            sender: Some(sender),
            threshold,
        }
    }

    /// A notifier with no outbound destination configured.
    pub fn disabled() -> Self {
        Self {
            sender: None,
            threshold: Severity::High,
        }
    }

    /// Format the single-line notification for one alert.
    pub fn message(alert: &Alert) -> String {
        format!(
            "\u{26a0}\u{fe0f} New {} alert from {}: {} \n{}",
            alert.severity, alert.source, alert.title, alert.url
        )
    }

    /// Dispatch one message per alert whose severity ranks at or above
    /// the threshold. Returns the number of successful sends.
    pub async fn dispatch(&self, alerts: &[Alert]) -> usize {
        let Some(ref sender) = self.sender else {
            return 0;
        };

        let mut sent = 0;
        for alert in alerts {
            if alert.severity.rank() < self.threshold.rank() {
                continue;
            }
            match sender.send(&Self::message(alert)).await {
                Ok(()) => sent += 1,
                Err(error) => {
                    tracing::warn!(
                        source = %alert.source,
                        severity = %alert.severity,
                        error = %error,
                        "notification dispatch failed"
                    );
                }
            }
        }
        if sent > 0 {
            tracing::info!(sent, threshold = %self.threshold, "notifications dispatched");
        }
        sent
    }
}
