use std::future::Future;
use std::pin::Pin;

use domain::common::error::DomainError;

/// Secondary port for pushing one notification message to an outbound
/// channel (e.g. a Slack-compatible webhook).
///
/// Uses `Pin<Box<dyn Future>>` return type (instead of RPITIT) so the
/// trait is dyn-compatible and can be used as `Arc<dyn AlertSender>`.
pub trait AlertSender: Send + Sync {
    /// Deliver a single already-formatted message.
    fn send<'a>(
        &'a self,
        message: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), DomainError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummySender;
    impl AlertSender for DummySender {
        fn send<'a>(
            &'a self,
            _message: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<(), DomainError>> + Send + 'a>> {
            Box::pin(async { Ok(()) })
        }
    }

    #[test]
    fn alert_sender_is_dyn_compatible() {
        let sender: Box<dyn AlertSender> = Box::new(DummySender);
        let _ = sender;
    }
}
