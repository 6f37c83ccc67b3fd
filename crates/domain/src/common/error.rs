use thiserror::Error;

use crate::alert::error::AlertError;
use crate::intel::error::FeedError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("engine error: {0}")]
    EngineError(String),
}

impl From<FeedError> for DomainError {
    fn from(err: FeedError) -> Self {
        Self::EngineError(err.to_string())
    }
}

impl From<AlertError> for DomainError {
    fn from(err: AlertError) -> Self {
        Self::EngineError(err.to_string())
    }
}
